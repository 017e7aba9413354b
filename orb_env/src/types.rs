//! Common types for the Orb environment.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Unique identifier for a performer.
///
/// Opaque and comparable. Rosters name performers by plain strings
/// ("tom", "sue", ...), so the id serializes as a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PerformerId(String);

impl PerformerId {
    /// Creates a PerformerId from a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PerformerId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for PerformerId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for PerformerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PerformerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_performer_id_serializes_as_string() {
        let id = PerformerId::new("harry");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"harry\"");

        let back: PerformerId = serde_json::from_str("\"harry\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(PerformerId::from("mary"), 3);
        assert_eq!(map.get("mary"), Some(&3));
    }
}
