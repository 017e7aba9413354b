//! Performers and the speaking decision policy.
//!
//! The policy is a pure function of the round number, the performer's
//! mailbox and its script. Rules, first match wins:
//!
//! 1. **Gating**: only rounds that are multiples of the meter are eligible.
//! 2. **Exhausted script**: say `Done`, every eligible round from then on.
//! 3. **Nothing heard**: say the current line.
//! 4. **One slot heard**: echo it, unless it is `Done` (then say the current line).
//! 5. **Both slots agree**: advance the script and say the new current line.
//! 6. **One side is `Done`**: follow the other side.
//! 7. **Disagreement**: follow the side heard most recently; Left wins ties.

use crate::addressing::SentMessage;
use crate::mailbox::Mailbox;
use crate::script::{Script, Word};
use orb_env::PerformerId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::num::NonZeroU64;

/// Speaking cadence: a performer may speak only on rounds divisible by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Meter(NonZeroU64);

impl Meter {
    /// Speaks every round.
    pub const EVERY_ROUND: Meter = Meter(NonZeroU64::MIN);

    /// Returns `None` for zero.
    pub fn new(value: u64) -> Option<Self> {
        NonZeroU64::new(value).map(Self)
    }

    pub fn get(&self) -> u64 {
        self.0.get()
    }

    /// True if `round` is an eligible speaking round.
    pub fn allows(&self, round: u64) -> bool {
        round % self.0.get() == 0
    }
}

impl Default for Meter {
    fn default() -> Self {
        Self::EVERY_ROUND
    }
}

impl TryFrom<u64> for Meter {
    type Error = String;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Meter::new(value).ok_or_else(|| "meter must be positive".to_string())
    }
}

impl From<Meter> for u64 {
    fn from(meter: Meter) -> Self {
        meter.get()
    }
}

/// A simulated speaker: identity plus cadence.
///
/// Holds no mutable state; the mailbox and script live in the stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Performer {
    pub id: PerformerId,
    pub meter: Meter,
}

impl Performer {
    pub fn new(id: impl Into<PerformerId>, meter: Meter) -> Self {
        Self {
            id: id.into(),
            meter,
        }
    }

    /// Decides what (if anything) this performer says on `round`.
    ///
    /// May advance `script` on agreement. Leaves the mailbox alone; clearing
    /// it after a `Some` is the caller's job.
    pub fn perform(&self, round: u64, mailbox: &Mailbox, script: &mut Script) -> Option<SentMessage> {
        if !self.meter.allows(round) {
            return None;
        }

        Some(SentMessage {
            sender: self.id.clone(),
            word: choose_word(mailbox, script),
        })
    }
}

/// Rules 2-7 of the policy, for a performer that is allowed to speak.
pub fn choose_word(mailbox: &Mailbox, script: &mut Script) -> Word {
    if script.is_done() {
        return Word::Done;
    }

    match (mailbox.left(), mailbox.right()) {
        (None, None) => script.current(),
        (Some(only), None) | (None, Some(only)) => {
            // Don't parrot a finished neighbour while we still have lines
            if only.word.is_done() {
                script.current()
            } else {
                only.word.clone()
            }
        }
        (Some(left), Some(right)) => {
            if left.word == right.word {
                script.advance();
                script.current()
            } else if left.word.is_done() {
                right.word.clone()
            } else if right.word.is_done() {
                left.word.clone()
            } else if right.at > left.at {
                right.word.clone()
            } else {
                left.word.clone()
            }
        }
    }
}

/// The fixed speaking order plus each performer's cadence.
///
/// An id listed in the order but missing from the performer table is
/// skipped by the stage rather than rejected.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    order: Vec<PerformerId>,
    performers: HashMap<PerformerId, Performer>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a performer to the speaking order.
    pub fn push(&mut self, performer: Performer) {
        if !self.performers.contains_key(&performer.id) {
            self.order.push(performer.id.clone());
        }
        self.performers.insert(performer.id.clone(), performer);
    }

    /// Builds a roster from an explicit order and a performer table.
    pub fn from_parts(order: Vec<PerformerId>, performers: HashMap<PerformerId, Performer>) -> Self {
        Self { order, performers }
    }

    /// Ids in speaking order.
    pub fn order(&self) -> &[PerformerId] {
        &self.order
    }

    pub fn get(&self, id: &PerformerId) -> Option<&Performer> {
        self.performers.get(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl FromIterator<Performer> for Roster {
    fn from_iter<I: IntoIterator<Item = Performer>>(iter: I) -> Self {
        let mut roster = Roster::new();
        for performer in iter {
            roster.push(performer);
        }
        roster
    }
}
