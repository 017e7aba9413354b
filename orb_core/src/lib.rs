//! Orb Core - Round-Driven Word Exchange Engine
//!
//! A fixed roster of performers pass single words to each other over a
//! static topology:
//! 1. **Addressing**: every word is fanned out to `(performer, slot)` endpoints
//! 2. **Mailboxes**: each performer keeps only the latest word per slot
//! 3. **Policy**: echo, follow the most recent word, or advance the script on agreement
//!
//! A [`Stage`] drives the roster through Speak, Route and Listen phases
//! until every script is exhausted.

pub mod addressing;
pub mod router;
pub mod mailbox;
pub mod script;
pub mod performer;
pub mod stage;

// Re-export key types for convenience
pub use addressing::{Address, AddressSet, RoutedMessage, SentMessage, Slot};
pub use router::Router;
pub use mailbox::{MailRoom, Mailbox, Received};
pub use script::{Script, ScriptDb, Word};
pub use performer::{Meter, Performer, Roster};
pub use stage::{RoundReport, Stage, StageOutcome, StageState};
