//! Identifier types.
//!
//! `ParticipantId` is an interned string key for participants, using
//! `Arc<str>` so that slots and standings can clone it cheaply.
//! `MatchId` is the 1-based, pool-scoped sequence index of a match.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// Interned string identifier for participants.
///
/// Two ids compare equal when their string content is equal, so callers
/// may use any stable key (a database id, a UUID string, a nickname).
///
/// # Examples
///
/// ```rust
/// use bracketry::ParticipantId;
///
/// let alice = ParticipantId::from_str("alice");
/// let alice2: ParticipantId = "alice".into();
/// let alice3: ParticipantId = String::from("alice").into();
///
/// assert_eq!(alice, alice2);
/// assert_eq!(alice, alice3);
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ParticipantId(Arc<str>);

impl Serialize for ParticipantId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ParticipantId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(ParticipantId::from(s))
    }
}

impl ParticipantId {
    /// Create a new `ParticipantId` from a string slice.
    pub fn from_str(s: &str) -> Self {
        Self(Arc::from(s))
    }

    /// Get the string representation of this id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sequence index of a match within a pool.
///
/// Ids start at 1 and increase in generation order across the winners
/// bracket, the losers bracket and the grand final. The match with id `k`
/// is stored at arena position `k - 1`.
///
/// # Examples
///
/// ```rust
/// use bracketry::MatchId;
///
/// let id = MatchId::new(5);
/// assert_eq!(id.get(), 5);
/// assert_eq!(id.to_string(), "#5");
/// ```
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(u32);

impl MatchId {
    /// Create a match id from its 1-based sequence number.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// The 1-based sequence number.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Arena position of the match, or `None` for the invalid id 0.
    pub(crate) fn index(self) -> Option<usize> {
        (self.0 as usize).checked_sub(1)
    }

    /// Id of the match stored at arena position `index`.
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_id_creation() {
        let id1 = ParticipantId::from_str("alice");
        let id2 = ParticipantId::from_str("alice");
        assert_eq!(id1, id2);
        assert_eq!(id1.as_str(), "alice");
    }

    #[test]
    fn test_participant_id_serde() {
        let id = ParticipantId::from_str("bob");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"bob\"");
        let back: ParticipantId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_match_id_index() {
        assert_eq!(MatchId::new(1).index(), Some(0));
        assert_eq!(MatchId::new(0).index(), None);
        assert_eq!(MatchId::from_index(4), MatchId::new(5));
    }

    #[test]
    fn test_match_id_ordering() {
        assert!(MatchId::new(2) < MatchId::new(10));
    }
}
