//! Error types for bracket construction and result entry.
//!
//! Redundant result entry (a bye, a match missing a side, an outcome that
//! already holds) is not an error and never shows up here. These variants
//! describe unknown ids and malformed link topology, which only arise from
//! hand-built or deserialized brackets.

use crate::ids::MatchId;
use thiserror::Error;

/// Format a cycle path as a readable string.
fn format_cycle_path(path: &[MatchId]) -> String {
    if path.is_empty() {
        return String::from("(empty cycle)");
    }
    path.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Errors that can occur while building, validating or mutating a bracket.
///
/// # Examples
///
/// ```rust
/// use bracketry::{BracketError, MatchId};
///
/// let err = BracketError::UnknownMatch(MatchId::new(42));
/// assert_eq!(err.to_string(), "Unknown match: #42");
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BracketError {
    /// No match with this id exists in the bracket.
    #[error("Unknown match: {0}")]
    UnknownMatch(MatchId),

    /// A predecessor link points at a match that does not exist.
    #[error("Match {from} links to missing predecessor {to}")]
    DanglingLink { from: MatchId, to: MatchId },

    /// A match feeds the same outcome (winner or loser) into two successors.
    #[error("Match {predecessor} feeds both {first} and {second}")]
    SharedPredecessor {
        predecessor: MatchId,
        first: MatchId,
        second: MatchId,
    },

    /// The predecessor links contain a cycle.
    ///
    /// The path is closed: its first and last entries are the same match.
    #[error("Cycle detected: {}", format_cycle_path(.path))]
    Cycle { path: Vec<MatchId> },

    /// Match ids are not 1-based and strictly increasing in arena order.
    #[error("Expected match {expected} but found {found}")]
    NonMonotonicIndex { expected: MatchId, found: MatchId },

    /// A winner names a side that holds no participant.
    #[error("Match {0} has a winner on an unresolved side")]
    StaleWinner(MatchId),

    /// A pool definition could not be parsed.
    #[error("Invalid pool definition: {0}")]
    InvalidDefinition(String),
}
