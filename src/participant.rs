//! Participants and the entrants that occupy match sides.

use crate::ids::ParticipantId;
use serde::{Deserialize, Serialize};

/// A competitor in a pool.
///
/// # Examples
///
/// ```rust
/// use bracketry::Participant;
///
/// let p = Participant::new("p1", "Alice", 1).with_handicap(4);
/// assert_eq!(p.seed, 1);
/// assert_eq!(p.handicap_points, 4);
/// assert_eq!(p.to_string(), "1. Alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    /// 1-based initial rank.
    pub seed: u32,
    #[serde(default)]
    pub handicap_points: i32,
}

impl Participant {
    pub fn new(id: impl Into<ParticipantId>, name: impl Into<String>, seed: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            seed,
            handicap_points: 0,
        }
    }

    pub fn with_handicap(mut self, points: i32) -> Self {
        self.handicap_points = points;
        self
    }
}

impl std::fmt::Display for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {}", self.seed, self.name)
    }
}

/// The occupant of one side of a match.
///
/// Singles formats only use `lead`. American doubles fills `partner` with
/// the second player of the team.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entrant {
    pub lead: ParticipantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner: Option<ParticipantId>,
}

impl Entrant {
    pub fn single(lead: ParticipantId) -> Self {
        Self {
            lead,
            partner: None,
        }
    }

    pub fn pair(lead: ParticipantId, partner: ParticipantId) -> Self {
        Self {
            lead,
            partner: Some(partner),
        }
    }

    /// Every participant on this side, lead first.
    pub fn members(&self) -> impl Iterator<Item = &ParticipantId> {
        std::iter::once(&self.lead).chain(self.partner.as_ref())
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.members().any(|member| member == id)
    }
}

impl std::fmt::Display for Entrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.partner {
            Some(partner) => write!(f, "{} & {}", self.lead, partner),
            None => write!(f, "{}", self.lead),
        }
    }
}
