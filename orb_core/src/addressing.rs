//! Addressing - endpoints and the messages that travel between them.

use crate::script::Word;
use orb_env::PerformerId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Receiving position inside a performer's mailbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Left,
    Right,
}

/// A deliverable endpoint: one slot of one performer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address {
    pub performer: PerformerId,
    pub slot: Slot,
}

impl Address {
    pub fn new(performer: impl Into<PerformerId>, slot: Slot) -> Self {
        Self {
            performer: performer.into(),
            slot,
        }
    }

    pub fn left(performer: impl Into<PerformerId>) -> Self {
        Self::new(performer, Slot::Left)
    }

    pub fn right(performer: impl Into<PerformerId>) -> Self {
        Self::new(performer, Slot::Right)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = match self.slot {
            Slot::Left => "left",
            Slot::Right => "right",
        };
        write!(f, "{}/{}", self.performer, slot)
    }
}

/// The fan-out list of a single sender.
///
/// Set semantics: adding an address twice keeps one copy. Iteration is
/// ordered so that routing output is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressSet(BTreeSet<Address>);

impl AddressSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an address. Returns false if it was already present.
    pub fn add(&mut self, address: Address) -> bool {
        self.0.insert(address)
    }

    /// Removes an address if present.
    pub fn remove(&mut self, address: &Address) {
        self.0.remove(address);
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.0.contains(address)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.0.iter()
    }
}

impl FromIterator<Address> for AddressSet {
    fn from_iter<I: IntoIterator<Item = Address>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A word as spoken by one performer in one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub sender: PerformerId,
    pub word: Word,
}

/// A word on its way to one mailbox slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedMessage {
    pub address: Address,
    pub word: Word,
}
