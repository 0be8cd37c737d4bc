//! Pool definitions.
//!
//! A `PoolDefinition` is the configuration a bracket is generated from: the
//! schedule kind, the handicap flag and the seeded participants. It is the
//! JSON-facing entry point of the crate.

use crate::bracket::Bracket;
use crate::error::BracketError;
use crate::participant::Participant;
use crate::schedule::ScheduleKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Everything needed to generate a pool's bracket.
///
/// # Examples
///
/// ```rust
/// use bracketry::{PoolDefinition, ScheduleKind};
///
/// let json = r#"{
///     "kind": "singleElimination",
///     "participants": [
///         { "id": "a", "name": "Ann", "seed": 1 },
///         { "id": "b", "name": "Ben", "seed": 2 },
///         { "id": "c", "name": "Cid", "seed": 3 }
///     ]
/// }"#;
///
/// let pool = PoolDefinition::from_json(json).unwrap();
/// assert_eq!(pool.kind, ScheduleKind::SingleElimination);
/// assert!(!pool.handicap);
///
/// let bracket = pool.generate();
/// assert_eq!(bracket.match_count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolDefinition {
    pub kind: ScheduleKind,
    #[serde(default)]
    pub handicap: bool,
    pub participants: Vec<Participant>,
}

impl PoolDefinition {
    pub fn new(kind: ScheduleKind, participants: Vec<Participant>) -> Self {
        Self {
            kind,
            handicap: false,
            participants,
        }
    }

    pub fn with_handicap(mut self, handicap: bool) -> Self {
        self.handicap = handicap;
        self
    }

    /// Parse a definition from JSON.
    ///
    /// Participants are put in seed order and renumbered `1..=N`, so gaps
    /// and duplicates in the input seeds are tolerated.
    ///
    /// # Errors
    ///
    /// Returns `BracketError::InvalidDefinition` if the JSON does not
    /// describe a pool or two participants share an id.
    pub fn from_json(json: &str) -> Result<Self, BracketError> {
        let mut pool: PoolDefinition = serde_json::from_str(json)
            .map_err(|err| BracketError::InvalidDefinition(err.to_string()))?;
        pool.check_ids()?;
        pool.renumber_seeds();
        Ok(pool)
    }

    pub fn to_json(&self) -> Result<String, BracketError> {
        serde_json::to_string_pretty(self)
            .map_err(|err| BracketError::InvalidDefinition(err.to_string()))
    }

    fn check_ids(&self) -> Result<(), BracketError> {
        let mut seen = HashSet::with_capacity(self.participants.len());
        for participant in &self.participants {
            if !seen.insert(&participant.id) {
                return Err(BracketError::InvalidDefinition(format!(
                    "duplicate participant id '{}'",
                    participant.id
                )));
            }
        }
        Ok(())
    }

    /// Sort participants by seed and renumber them `1..=N`.
    ///
    /// The sort is stable, so participants sharing a seed keep their order.
    pub fn renumber_seeds(&mut self) {
        self.participants.sort_by_key(|p| p.seed);
        for (index, participant) in self.participants.iter_mut().enumerate() {
            participant.seed = index as u32 + 1;
        }
    }

    /// Whether the participant count is one the schedule kind offers.
    pub fn has_allowed_seed_count(&self) -> bool {
        self.kind.is_allowed_seed_count(self.participants.len())
    }

    /// Generate the bracket for this pool.
    pub fn generate(&self) -> Bracket {
        if !self.has_allowed_seed_count() {
            log::warn!(
                "{} participant(s) is not an allowed seed count for {}",
                self.participants.len(),
                self.kind
            );
        }
        Bracket::generate(self.kind, self.participants.clone(), self.handicap)
    }
}
