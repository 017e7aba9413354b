//! Static routing from a speaker to the slots that hear it.

use crate::addressing::{Address, AddressSet, RoutedMessage, SentMessage};
use orb_env::PerformerId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maps each performer to the addresses that receive its speech.
///
/// Immutable once a stage is running. A performer with no entry simply
/// has no listeners.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Router {
    /// sender -> listener addresses
    listeners: HashMap<PerformerId, AddressSet>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `listener` to the fan-out of `sender`.
    pub fn connect(&mut self, sender: impl Into<PerformerId>, listener: Address) {
        self.listeners
            .entry(sender.into())
            .or_default()
            .add(listener);
    }

    /// Builder-style variant of [`Router::connect`].
    pub fn with_link(mut self, sender: impl Into<PerformerId>, listener: Address) -> Self {
        self.connect(sender, listener);
        self
    }

    /// Returns the listener set of a sender, if it has one.
    pub fn listeners(&self, sender: &PerformerId) -> Option<&AddressSet> {
        self.listeners.get(sender)
    }

    /// Expands a spoken word into one delivery per listener.
    ///
    /// Unknown senders yield nothing. Pure: no mailbox is touched.
    pub fn route(&self, sent: &SentMessage) -> Vec<RoutedMessage> {
        let Some(receivers) = self.listeners.get(&sent.sender) else {
            return Vec::new();
        };

        receivers
            .iter()
            .map(|address| RoutedMessage {
                address: address.clone(),
                word: sent.word.clone(),
            })
            .collect()
    }
}

impl FromIterator<(PerformerId, AddressSet)> for Router {
    fn from_iter<I: IntoIterator<Item = (PerformerId, AddressSet)>>(iter: I) -> Self {
        Self {
            listeners: iter.into_iter().collect(),
        }
    }
}
