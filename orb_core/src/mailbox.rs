//! Per-performer two-slot inboxes.

use crate::addressing::{RoutedMessage, Slot};
use crate::script::Word;
use orb_env::PerformerId;
use std::collections::HashMap;
use std::time::Duration;

/// A word sitting in a mailbox slot, stamped with when it landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Received {
    pub word: Word,
    pub at: Duration,
}

/// Latest word heard from each side.
///
/// A slot holds at most one word; a newer delivery overwrites an unread one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mailbox {
    left: Option<Received>,
    right: Option<Received>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the message's word in its target slot, replacing whatever was there.
    pub fn receive(&mut self, msg: &RoutedMessage, at: Duration) {
        let received = Received {
            word: msg.word.clone(),
            at,
        };
        match msg.address.slot {
            Slot::Left => self.left = Some(received),
            Slot::Right => self.right = Some(received),
        }
    }

    pub fn clear(&mut self) {
        self.left = None;
        self.right = None;
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub fn left(&self) -> Option<&Received> {
        self.left.as_ref()
    }

    pub fn right(&self) -> Option<&Received> {
        self.right.as_ref()
    }

    pub fn slot(&self, slot: Slot) -> Option<&Received> {
        match slot {
            Slot::Left => self.left(),
            Slot::Right => self.right(),
        }
    }
}

/// All mailboxes, keyed by owner.
#[derive(Debug, Clone, Default)]
pub struct MailRoom {
    boxes: HashMap<PerformerId, Mailbox>,
}

impl MailRoom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty mailbox for every id.
    pub fn for_performers<'a>(ids: impl IntoIterator<Item = &'a PerformerId>) -> Self {
        Self {
            boxes: ids.into_iter().map(|id| (id.clone(), Mailbox::new())).collect(),
        }
    }

    pub fn insert(&mut self, id: PerformerId, mailbox: Mailbox) {
        self.boxes.insert(id, mailbox);
    }

    pub fn get(&self, id: &PerformerId) -> Option<&Mailbox> {
        self.boxes.get(id)
    }

    pub fn get_mut(&mut self, id: &PerformerId) -> Option<&mut Mailbox> {
        self.boxes.get_mut(id)
    }

    pub fn contains(&self, id: &PerformerId) -> bool {
        self.boxes.contains_key(id)
    }

    /// Takes a mailbox out for exclusive use (concurrent speak phase).
    pub(crate) fn take(&mut self, id: &PerformerId) -> Option<Mailbox> {
        self.boxes.remove(id)
    }

    /// Delivers to the addressed mailbox. Returns false if it has no mailbox.
    pub fn deliver(&mut self, msg: &RoutedMessage, at: Duration) -> bool {
        match self.boxes.get_mut(&msg.address.performer) {
            Some(mailbox) => {
                mailbox.receive(msg, at);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addressing::Address;

    fn to(address: Address, word: &str) -> RoutedMessage {
        RoutedMessage {
            address,
            word: Word::line(word),
        }
    }

    #[test]
    fn test_receive_fills_target_slot() {
        let mut mailbox = Mailbox::new();
        assert!(mailbox.is_empty());

        mailbox.receive(&to(Address::left("tom"), "one"), Duration::from_nanos(1));

        assert_eq!(mailbox.left().map(|r| &r.word), Some(&Word::line("one")));
        assert!(mailbox.right().is_none());
        assert!(!mailbox.is_empty());
    }

    #[test]
    fn test_receive_overwrites_unread_word() {
        let mut mailbox = Mailbox::new();
        mailbox.receive(&to(Address::right("tom"), "one"), Duration::from_nanos(1));
        mailbox.receive(&to(Address::right("tom"), "two"), Duration::from_nanos(2));

        let right = mailbox.slot(Slot::Right).unwrap();
        assert_eq!(right.word, Word::line("two"));
        assert_eq!(right.at, Duration::from_nanos(2));
    }

    #[test]
    fn test_clear_empties_both_slots() {
        let mut mailbox = Mailbox::new();
        mailbox.receive(&to(Address::left("tom"), "one"), Duration::ZERO);
        mailbox.receive(&to(Address::right("tom"), "two"), Duration::ZERO);

        mailbox.clear();
        assert!(mailbox.is_empty());
    }

    #[test]
    fn test_deliver_to_unknown_mailbox() {
        let ids = [PerformerId::from("tom")];
        let mut room = MailRoom::for_performers(ids.iter());

        assert!(room.deliver(&to(Address::left("tom"), "one"), Duration::ZERO));
        assert!(!room.deliver(&to(Address::left("ghost"), "one"), Duration::ZERO));
        assert_eq!(room.len(), 1);
    }
}
