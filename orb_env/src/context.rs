//! Core environment context trait for the Orb stage.

use rand_chacha::ChaCha8Rng;
use std::time::Duration;

/// The central interface for environment interaction.
///
/// This trait abstracts the "real world" so that the stage can run
/// against both the system clock and a virtual simulation clock.
///
/// # Implementations
///
/// - **System**: `SystemContext` - wraps `std::time::Instant`, OS entropy
/// - **Simulation**: `SimContext` (in `orb_sim`) - virtual clock, seeded ChaCha8
///
/// # Determinism
///
/// For reproducible runs, all methods that would normally introduce
/// non-determinism (time, randomness) are controlled by the implementation.
pub trait StageContext: Send + Sync + 'static {
    /// Returns the current monotonic time since context creation.
    ///
    /// Used to stamp words as they land in a mailbox slot.
    /// In simulation, this is the virtual clock time.
    fn now(&self) -> Duration;

    /// Records that one observable event (a mailbox delivery) happened.
    ///
    /// A virtual clock advances by its resolution so that consecutive
    /// deliveries never share a stamp. The system clock ignores it.
    fn tick(&self) {}

    /// Derives a random number generator from a seed extension.
    ///
    /// The implementation combines the global seed with `seed_extension`
    /// to derive unique but reproducible streams.
    ///
    /// # Arguments
    /// * `seed_extension` - A value to combine with the global seed
    fn derive_rng(&self, seed_extension: u64) -> ChaCha8Rng;

    /// Returns the context's seed (for logging/debugging).
    ///
    /// The system context returns 0 (not seeded).
    fn seed(&self) -> u64;
}
