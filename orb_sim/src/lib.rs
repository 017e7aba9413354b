//! Orb Deterministic Simulation Harness
//!
//! This crate provides a controlled environment where a roster of Orb
//! performers runs reproducibly.
//!
//! # Core Principle
//!
//! All sources of non-determinism are pinned down:
//! - **Time**: a virtual clock stamps every mailbox delivery
//! - **Randomness**: meters are drawn from a stream derived from one 64-bit seed
//! - **Ordering**: the roster order fixes speak and delivery order
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                     StageRunner                      │
//! │  RosterConfig ──build──► Stage<SimContext>           │
//! │                              │                       │
//! │       ┌──────────┐   Speak   │   Route    ┌────────┐ │
//! │       │Performer │ ────────► Router ────► │Mailbox │ │
//! │       │ + Script │ ◄──────────────────────│ L | R  │ │
//! │       └──────────┘      next round        └────────┘ │
//! │                              │                       │
//! │                 Transcript / RunExport               │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use orb_sim::{StageRunner, ScenarioId};
//!
//! let result = StageRunner::new(42).run("duet", &ScenarioId::Duet.roster())?;
//! assert!(result.finished());
//! ```

mod context;
mod meters;
mod roster;
mod runner;
mod exporter;
mod transcript;
pub mod scenarios;

pub use context::SimContext;
pub use meters::{MeterAssigner, DEFAULT_MAX_METER};
pub use roster::{LinkConfig, PerformerConfig, RosterConfig, StageParts};
pub use runner::{RunResult, StageRunner, DEFAULT_MAX_ROUNDS};
pub use exporter::{RoundFrame, RunExport};
pub use transcript::{Transcript, ROW_ITEM_SIZE};
pub use scenarios::ScenarioId;
