//! Orb Environment Abstraction Layer
//!
//! This crate provides the abstraction that lets the Orb stage run against
//! either the **System** clock or a **Simulation** (virtual) clock.
//!
//! # Core Concept
//!
//! The stage only ever touches two sources of non-determinism:
//! - Time (`now()`, `tick()`), used to stamp mailbox receipts
//! - Randomness (`derive_rng()`), used by harnesses to assign meters
//!
//! By deriving all entropy from a single 64-bit seed and driving time from a
//! virtual clock, any run becomes reproducible via its seed number.
//!
//! # Example
//!
//! ```ignore
//! use orb_env::{StageContext, SystemContext};
//!
//! fn stamp<Ctx: StageContext>(ctx: &Ctx) -> std::time::Duration {
//!     let at = ctx.now();
//!     ctx.tick();
//!     at
//! }
//! ```

mod context;
mod types;
mod error;
mod system_impl;

pub use context::StageContext;
pub use types::PerformerId;
pub use error::OrbError;
pub use system_impl::SystemContext;
