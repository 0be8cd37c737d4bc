//! Matches, rounds and the values that describe them.
//!
//! A `Match` is a plain value stored in the bracket's arena. Its sides are
//! `Slot`s: a tagged variant telling apart a side still waiting on a
//! predecessor, a bye, and a side with a known entrant. The winner is kept
//! as a `Side`, so it always refers to whatever currently sits on that side.

use crate::ids::MatchId;
use crate::participant::Entrant;
use serde::{Deserialize, Serialize};

/// One of the two sides of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A result entered for a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    Win(Side),
    Draw,
}

/// Which part of the pool a round belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Partition {
    /// The main bracket. Round robin and doubles rounds live here too, as
    /// does the grand final of a double elimination pool.
    Winners,
    /// The losers bracket of a double elimination pool.
    Losers,
}

/// The occupant of one side of a match.
///
/// # Examples
///
/// ```rust
/// use bracketry::{Entrant, Slot};
///
/// let slot = Slot::Resolved(Entrant::single("alice".into()));
/// assert!(slot.is_resolved());
/// assert!(!Slot::Bye.is_resolved());
/// assert_eq!(Slot::Unresolved.entrant(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Slot {
    /// Waiting on the outcome of a predecessor match.
    Unresolved,
    /// Nobody can ever occupy this side.
    Bye,
    /// A known entrant.
    Resolved(Entrant),
}

impl Slot {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Slot::Resolved(_))
    }

    pub fn is_bye(&self) -> bool {
        matches!(self, Slot::Bye)
    }

    pub fn entrant(&self) -> Option<&Entrant> {
        match self {
            Slot::Resolved(entrant) => Some(entrant),
            _ => None,
        }
    }
}

impl From<Option<Entrant>> for Slot {
    fn from(entrant: Option<Entrant>) -> Self {
        entrant.map_or(Slot::Unresolved, Slot::Resolved)
    }
}

/// A single match in a pool.
///
/// Fields are public for reading; a `Bracket` only hands out shared
/// references, so every mutation goes through its result-entry operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub partition: Partition,
    /// Ordinal of the round holding this match, 1-based within its partition.
    pub round: u32,
    pub left: Slot,
    pub right: Slot,
    pub winner: Option<Side>,
    pub is_draw: bool,
    pub is_bye: bool,
    pub is_finals: bool,
    pub left_score: i32,
    pub right_score: i32,
    pub prev_left: Option<MatchId>,
    pub prev_right: Option<MatchId>,
}

impl Match {
    /// Create a match with the given sides and no result.
    ///
    /// `is_bye` is derived from the sides.
    pub fn new(id: MatchId, partition: Partition, round: u32, left: Slot, right: Slot) -> Self {
        let is_bye = left.is_bye() || right.is_bye();
        Self {
            id,
            partition,
            round,
            left,
            right,
            winner: None,
            is_draw: false,
            is_bye,
            is_finals: false,
            left_score: 0,
            right_score: 0,
            prev_left: None,
            prev_right: None,
        }
    }

    pub fn slot(&self, side: Side) -> &Slot {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub(crate) fn slot_mut(&mut self, side: Side) -> &mut Slot {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn score(&self, side: Side) -> i32 {
        match side {
            Side::Left => self.left_score,
            Side::Right => self.right_score,
        }
    }

    pub fn prev(&self, side: Side) -> Option<MatchId> {
        match side {
            Side::Left => self.prev_left,
            Side::Right => self.prev_right,
        }
    }

    /// Predecessor links as `(side, predecessor)` pairs.
    pub fn predecessors(&self) -> impl Iterator<Item = (Side, MatchId)> + '_ {
        [Side::Left, Side::Right]
            .into_iter()
            .filter_map(move |side| self.prev(side).map(|prev| (side, prev)))
    }

    /// The current result, if any.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.is_draw {
            Some(Outcome::Draw)
        } else {
            self.winner.map(Outcome::Win)
        }
    }

    /// Whether a winner or a draw is recorded.
    pub fn is_decided(&self) -> bool {
        self.outcome().is_some()
    }

    pub fn has_both_sides(&self) -> bool {
        self.left.is_resolved() && self.right.is_resolved()
    }

    /// Both sides are byes: the match can never be played or won.
    pub fn is_void(&self) -> bool {
        self.left.is_bye() && self.right.is_bye()
    }

    pub fn winner_entrant(&self) -> Option<&Entrant> {
        self.winner.and_then(|side| self.slot(side).entrant())
    }

    pub fn loser_entrant(&self) -> Option<&Entrant> {
        self.winner
            .and_then(|side| self.slot(side.opposite()).entrant())
    }

    /// The side `entrant` occupies, if any.
    pub fn side_of(&self, entrant: &Entrant) -> Option<Side> {
        [Side::Left, Side::Right]
            .into_iter()
            .find(|side| self.slot(*side).entrant() == Some(entrant))
    }

    pub(crate) fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win(side) => {
                self.winner = Some(side);
                self.is_draw = false;
            }
            Outcome::Draw => {
                self.winner = None;
                self.is_draw = true;
            }
        }
    }

    pub(crate) fn clear_result(&mut self) {
        self.winner = None;
        self.is_draw = false;
    }

    /// Give the win to the only occupied side of an undecided bye match.
    ///
    /// Returns `true` when a winner was assigned.
    pub(crate) fn auto_advance(&mut self) -> bool {
        if !self.is_bye || self.is_decided() {
            return false;
        }
        let side = match (&self.left, &self.right) {
            (Slot::Resolved(_), Slot::Bye) => Side::Left,
            (Slot::Bye, Slot::Resolved(_)) => Side::Right,
            _ => return false,
        };
        self.winner = Some(side);
        true
    }
}

/// An ordered group of matches played in the same stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based ordinal within the partition.
    pub value: u32,
    pub partition: Partition,
    pub matches: Vec<MatchId>,
}

impl Round {
    pub fn new(value: u32, partition: Partition) -> Self {
        Self {
            value,
            partition,
            matches: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(name: &str) -> Slot {
        Slot::Resolved(Entrant::single(name.into()))
    }

    fn sample(left: Slot, right: Slot) -> Match {
        Match::new(MatchId::new(1), Partition::Winners, 1, left, right)
    }

    #[test]
    fn test_new_match_derives_bye_flag() {
        assert!(sample(single("a"), Slot::Bye).is_bye);
        assert!(!sample(single("a"), Slot::Unresolved).is_bye);
        assert!(sample(Slot::Bye, Slot::Bye).is_void());
    }

    #[test]
    fn test_winner_and_loser_entrants() {
        let mut m = sample(single("a"), single("b"));
        m.apply(Outcome::Win(Side::Right));
        assert_eq!(m.winner_entrant().map(|e| e.lead.as_str()), Some("b"));
        assert_eq!(m.loser_entrant().map(|e| e.lead.as_str()), Some("a"));
        assert_eq!(m.outcome(), Some(Outcome::Win(Side::Right)));
    }

    #[test]
    fn test_draw_clears_winner() {
        let mut m = sample(single("a"), single("b"));
        m.apply(Outcome::Win(Side::Left));
        m.apply(Outcome::Draw);
        assert_eq!(m.winner, None);
        assert!(m.is_draw);
        assert!(m.winner_entrant().is_none());
        m.clear_result();
        assert!(!m.is_decided());
    }

    #[test]
    fn test_auto_advance() {
        let mut m = sample(Slot::Bye, single("b"));
        assert!(m.auto_advance());
        assert_eq!(m.winner, Some(Side::Right));
        // Already decided
        assert!(!m.auto_advance());

        let mut waiting = sample(Slot::Unresolved, Slot::Bye);
        assert!(!waiting.auto_advance());

        let mut void = sample(Slot::Bye, Slot::Bye);
        assert!(!void.auto_advance());
    }

    #[test]
    fn test_side_of() {
        let m = sample(single("a"), single("b"));
        assert_eq!(m.side_of(&Entrant::single("b".into())), Some(Side::Right));
        assert_eq!(m.side_of(&Entrant::single("z".into())), None);
    }

    #[test]
    fn test_slot_serde_shape() {
        let json = serde_json::to_string(&Slot::Bye).unwrap();
        assert_eq!(json, "\"bye\"");
        let outcome: Outcome = serde_json::from_str(r#"{"win":"left"}"#).unwrap();
        assert_eq!(outcome, Outcome::Win(Side::Left));
    }
}
