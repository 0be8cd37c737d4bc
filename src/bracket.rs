//! The bracket of a pool.
//!
//! `Bracket` is the main entry point. It owns an arena of matches addressed
//! by `MatchId`, the rounds that group them, and a `LinkGraph` used to find
//! successors during result entry. A bracket is generated in one go and
//! replaced wholesale when the participants or the schedule kind change.

use crate::error::BracketError;
use crate::graph::{Feed, LinkGraph};
use crate::ids::{MatchId, ParticipantId};
use crate::matchup::{Match, Partition, Round, Side};
use crate::participant::{Entrant, Participant};
use crate::schedule::ScheduleKind;
use crate::scheduler::RoundsBuilder;
use crate::standings::{self, PoolStatistics, StandingRecord};
use serde::{Deserialize, Serialize};

/// A pool's complete round and match graph.
///
/// # Examples
///
/// ```rust
/// use bracketry::*;
///
/// let players: Vec<_> = ["Ann", "Ben", "Cid", "Dee"]
///     .iter()
///     .enumerate()
///     .map(|(i, name)| Participant::new(*name, *name, i as u32 + 1))
///     .collect();
///
/// let mut bracket = Bracket::generate(ScheduleKind::SingleElimination, players, false);
/// assert_eq!(bracket.match_count(), 3);
///
/// // Ann beats Dee, Ben beats Cid
/// bracket.record_result(MatchId::new(1), Outcome::Win(Side::Left)).unwrap();
/// bracket.record_result(MatchId::new(2), Outcome::Win(Side::Left)).unwrap();
///
/// let last = bracket.get(MatchId::new(3)).unwrap();
/// assert_eq!(last.left.entrant().unwrap().lead.as_str(), "Ann");
/// assert_eq!(last.right.entrant().unwrap().lead.as_str(), "Ben");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "BracketRecord")]
pub struct Bracket {
    pub(crate) kind: ScheduleKind,
    pub(crate) handicap: bool,
    pub(crate) participants: Vec<Participant>,
    pub(crate) matches: Vec<Match>,
    pub(crate) rounds: Vec<Round>,
    pub(crate) losers: Vec<Round>,
    pub(crate) first_loser_index: Option<MatchId>,
    #[serde(skip)]
    pub(crate) links: LinkGraph,
}

/// Serialized form of a bracket, validated on the way back in.
#[derive(Deserialize)]
struct BracketRecord {
    kind: ScheduleKind,
    handicap: bool,
    participants: Vec<Participant>,
    matches: Vec<Match>,
    rounds: Vec<Round>,
    losers: Vec<Round>,
    first_loser_index: Option<MatchId>,
}

impl TryFrom<BracketRecord> for Bracket {
    type Error = BracketError;

    fn try_from(record: BracketRecord) -> Result<Self, Self::Error> {
        let links = LinkGraph::build(&record.matches)?;
        let bracket = Bracket {
            kind: record.kind,
            handicap: record.handicap,
            participants: record.participants,
            matches: record.matches,
            rounds: record.rounds,
            losers: record.losers,
            first_loser_index: record.first_loser_index,
            links,
        };
        bracket.check_winners()?;
        Ok(bracket)
    }
}

impl Bracket {
    /// Generate the bracket for `participants`, given in seed order.
    ///
    /// Bye matches are decided and pushed forward before this returns, so
    /// later rounds start filled in wherever that is already determined.
    /// With `handicap` set, every playable match with two known sides gets
    /// its scores seeded from the participants' handicap points.
    pub fn generate(kind: ScheduleKind, participants: Vec<Participant>, handicap: bool) -> Self {
        if participants.len() < kind.minimum_seed_count() {
            log::warn!(
                "{} pool with {} participant(s) is below the minimum of {}; generating a degenerate bracket",
                kind,
                participants.len(),
                kind.minimum_seed_count()
            );
        }

        let mut builder = RoundsBuilder::new();
        kind.scheduler().schedule(&participants, &mut builder);
        let layout = builder.finish();

        // Schedulers only emit backward links to earlier matches
        let links = LinkGraph::build(&layout.matches).unwrap_or_else(|err| {
            debug_assert!(false, "generated bracket is malformed: {err}");
            LinkGraph::default()
        });

        let mut bracket = Bracket {
            kind,
            handicap,
            participants,
            matches: layout.matches,
            rounds: layout.rounds,
            losers: layout.losers,
            first_loser_index: layout.first_loser_index,
            links,
        };
        bracket.settle_byes();
        if handicap {
            bracket.seed_handicap_scores();
        }
        debug_assert!(bracket.validate().is_ok());

        log::debug!(
            "generated {} bracket: {} participants, {} rounds, {} losers rounds, {} matches",
            kind,
            bracket.participants.len(),
            bracket.rounds.len(),
            bracket.losers.len(),
            bracket.matches.len()
        );
        bracket
    }

    /// Discard the current graph and generate a new one.
    pub fn regenerate(&mut self, kind: ScheduleKind, participants: Vec<Participant>) {
        *self = Bracket::generate(kind, participants, self.handicap);
    }

    /// Push every decided bye match forward.
    fn settle_byes(&mut self) {
        let order = match self.links.topological_order() {
            Ok(order) => order,
            Err(_) => self.matches.iter().map(|m| m.id).collect(),
        };
        for id in order {
            if self.get(id).is_some_and(|m| m.is_bye && m.is_decided()) {
                self.promote(id);
            }
        }
    }

    fn seed_handicap_scores(&mut self) {
        let points = |entrant: &Entrant, participants: &[Participant]| -> i32 {
            entrant
                .members()
                .filter_map(|id| participants.iter().find(|p| &p.id == id))
                .map(|p| p.handicap_points)
                .sum()
        };

        for m in &mut self.matches {
            if m.is_bye {
                continue;
            }
            let (Some(left), Some(right)) = (m.left.entrant(), m.right.entrant()) else {
                continue;
            };
            let (left_score, right_score) = handicap_scores(
                points(left, &self.participants),
                points(right, &self.participants),
            );
            m.left_score = left_score;
            m.right_score = right_score;
        }
    }

    /// Check link topology and winner consistency.
    pub fn validate(&self) -> Result<(), BracketError> {
        LinkGraph::build(&self.matches)?;
        self.check_winners()
    }

    fn check_winners(&self) -> Result<(), BracketError> {
        match self
            .matches
            .iter()
            .find(|m| m.winner.is_some_and(|side| !m.slot(side).is_resolved()))
        {
            Some(m) => Err(BracketError::StaleWinner(m.id)),
            None => Ok(()),
        }
    }

    pub fn kind(&self) -> ScheduleKind {
        self.kind
    }

    pub fn is_handicap(&self) -> bool {
        self.handicap
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    /// All matches in id order.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn get(&self, id: MatchId) -> Option<&Match> {
        id.index().and_then(|index| self.matches.get(index))
    }

    pub(crate) fn get_mut(&mut self, id: MatchId) -> Option<&mut Match> {
        id.index().and_then(|index| self.matches.get_mut(index))
    }

    pub(crate) fn require(&self, id: MatchId) -> Result<&Match, BracketError> {
        self.get(id).ok_or(BracketError::UnknownMatch(id))
    }

    /// Winners-bracket rounds, including the grand final round.
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Losers-bracket rounds (double elimination only).
    pub fn losers(&self) -> &[Round] {
        &self.losers
    }

    /// Id of the first losers-bracket match (double elimination only).
    pub fn first_loser_index(&self) -> Option<MatchId> {
        self.first_loser_index
    }

    /// The round holding `id`.
    pub fn round_of(&self, id: MatchId) -> Option<&Round> {
        let m = self.get(id)?;
        let rounds = match m.partition {
            Partition::Winners => &self.rounds,
            Partition::Losers => &self.losers,
        };
        rounds.iter().find(|round| round.matches.contains(&id))
    }

    /// The match that receives the winner of `id`.
    pub fn successor(&self, id: MatchId) -> Option<(MatchId, Side)> {
        self.links.successor(id, Feed::Winner)
    }

    /// The match that receives the loser of `id` (double elimination only).
    pub fn loser_successor(&self, id: MatchId) -> Option<(MatchId, Side)> {
        self.links.successor(id, Feed::Loser)
    }

    /// The match that decides the pool in elimination formats.
    pub fn final_match(&self) -> Option<&Match> {
        if !self.kind.is_winner_promotable() {
            return None;
        }
        self.rounds
            .last()
            .and_then(|round| round.matches.last())
            .and_then(|id| self.get(*id))
    }

    /// Winner of the final match, once decided.
    pub fn champion(&self) -> Option<&Entrant> {
        self.final_match().and_then(Match::winner_entrant)
    }

    /// Whether every match that can be played has a result.
    pub fn is_complete(&self) -> bool {
        self.matches
            .iter()
            .all(|m| m.is_decided() || m.is_void())
    }

    /// Standings computed from the current results.
    pub fn standings(&self) -> Vec<StandingRecord> {
        standings::compute_standings(&self.participants, &self.matches)
    }

    pub fn statistics(&self) -> PoolStatistics {
        standings::pool_statistics(&self.participants, &self.matches)
    }

    /// Serialize the bracket to JSON.
    pub fn to_json(&self) -> Result<String, BracketError> {
        serde_json::to_string(self).map_err(|err| BracketError::InvalidDefinition(err.to_string()))
    }

    /// Restore a bracket from JSON, rebuilding and validating its links.
    pub fn from_json(json: &str) -> Result<Self, BracketError> {
        serde_json::from_str(json).map_err(|err| BracketError::InvalidDefinition(err.to_string()))
    }
}

/// Starting scores for a handicapped match.
///
/// Each side starts at half the handicap difference; the side with more
/// handicap points starts below zero.
fn handicap_scores(left_points: i32, right_points: i32) -> (i32, i32) {
    let half = (left_points - right_points).abs() / 2;
    if left_points > right_points {
        (-half, half)
    } else if left_points < right_points {
        (half, -half)
    } else {
        (0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchup::{Outcome, Slot};

    fn roster(names: &[&str]) -> Vec<Participant> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Participant::new(*name, *name, i as u32 + 1))
            .collect()
    }

    fn lead(slot: &Slot) -> Option<&str> {
        slot.entrant().map(|e| e.lead.as_str())
    }

    #[test]
    fn test_handicap_scores() {
        assert_eq!(handicap_scores(10, 4), (-3, 3));
        assert_eq!(handicap_scores(4, 10), (3, -3));
        assert_eq!(handicap_scores(5, 0), (-2, 2));
        assert_eq!(handicap_scores(7, 7), (0, 0));
    }

    #[test]
    fn test_generate_seeds_handicap() {
        let players = vec![
            Participant::new("a", "A", 1).with_handicap(8),
            Participant::new("b", "B", 2),
        ];
        let bracket = Bracket::generate(ScheduleKind::RoundRobin, players, true);
        let m = &bracket.matches()[0];
        assert_eq!((m.left_score, m.right_score), (-4, 4));
    }

    #[test]
    fn test_handicap_off_leaves_scores() {
        let players = vec![
            Participant::new("a", "A", 1).with_handicap(8),
            Participant::new("b", "B", 2),
        ];
        let bracket = Bracket::generate(ScheduleKind::RoundRobin, players, false);
        let m = &bracket.matches()[0];
        assert_eq!((m.left_score, m.right_score), (0, 0));
    }

    #[test]
    fn test_handicap_sums_doubles_partners() {
        let players = vec![
            Participant::new("a", "A", 1).with_handicap(2),
            Participant::new("b", "B", 2).with_handicap(2),
            Participant::new("c", "C", 3),
            Participant::new("d", "D", 4),
        ];
        let bracket = Bracket::generate(ScheduleKind::AmericanDoubles, players, true);
        let m = &bracket.matches()[0];
        // Team b&a (4 points) against c&d (0 points)
        assert_eq!((m.left_score, m.right_score), (-2, 2));
    }

    #[test]
    fn test_byes_settle_into_next_round() {
        let bracket = Bracket::generate(
            ScheduleKind::SingleElimination,
            roster(&["A", "B", "C"]),
            false,
        );
        // A has a bye and waits in the final for the winner of B vs C
        let last = bracket.get(MatchId::new(3)).unwrap();
        assert_eq!(lead(&last.left), Some("A"));
        assert_eq!(last.right, Slot::Unresolved);
        assert!(!last.is_decided());
    }

    #[test]
    fn test_single_participant_is_champion() {
        let bracket = Bracket::generate(ScheduleKind::SingleElimination, roster(&["A"]), false);
        assert_eq!(bracket.champion().map(|e| e.lead.as_str()), Some("A"));
        assert!(bracket.is_complete());
    }

    #[test]
    fn test_round_of_and_successor() {
        let bracket = Bracket::generate(
            ScheduleKind::DoubleElimination,
            roster(&["A", "B", "C", "D"]),
            false,
        );
        let losers_match = bracket.first_loser_index().unwrap();
        assert_eq!(bracket.round_of(losers_match).unwrap().partition, Partition::Losers);
        assert_eq!(
            bracket.successor(MatchId::new(1)),
            Some((MatchId::new(3), Side::Left))
        );
        assert_eq!(
            bracket.loser_successor(MatchId::new(3)),
            Some((MatchId::new(5), Side::Right))
        );
    }

    #[test]
    fn test_regenerate_replaces_graph() {
        let mut bracket = Bracket::generate(
            ScheduleKind::SingleElimination,
            roster(&["A", "B", "C", "D"]),
            false,
        );
        bracket
            .record_result(MatchId::new(1), Outcome::Win(Side::Left))
            .unwrap();

        bracket.regenerate(ScheduleKind::RoundRobin, roster(&["A", "B", "C", "D"]));
        assert_eq!(bracket.kind(), ScheduleKind::RoundRobin);
        assert_eq!(bracket.match_count(), 6);
        assert!(bracket.matches().iter().all(|m| !m.is_decided()));
        assert!(bracket.successor(MatchId::new(1)).is_none());
    }

    #[test]
    fn test_json_snapshot_keeps_links() {
        let mut bracket = Bracket::generate(
            ScheduleKind::DoubleElimination,
            roster(&["A", "B", "C", "D"]),
            false,
        );
        bracket
            .record_result(MatchId::new(1), Outcome::Win(Side::Right))
            .unwrap();

        let json = bracket.to_json().unwrap();
        let mut restored = Bracket::from_json(&json).unwrap();
        assert_eq!(restored.matches(), bracket.matches());

        // Links were rebuilt, so result entry still cascades
        restored
            .record_result(MatchId::new(2), Outcome::Win(Side::Left))
            .unwrap();
        let drop_in = restored.get(MatchId::new(4)).unwrap();
        assert_eq!(lead(&drop_in.left), Some("A"));
        assert_eq!(lead(&drop_in.right), Some("C"));
    }

    #[test]
    fn test_from_json_rejects_stale_winner() {
        let mut bracket =
            Bracket::generate(ScheduleKind::SingleElimination, roster(&["A", "B"]), false);
        bracket.matches[0].left = Slot::Unresolved;
        bracket.matches[0].winner = Some(Side::Left);
        let json = bracket.to_json().unwrap();

        let err = Bracket::from_json(&json).unwrap_err();
        assert!(matches!(err, BracketError::InvalidDefinition(msg) if msg.contains("#1")));
    }

    #[test]
    fn test_validate_generated_brackets() {
        for kind in ScheduleKind::ALL {
            for count in [0, 1, 2, 3, 5, 8, 13] {
                let names: Vec<String> = (0..count).map(|i| format!("P{i}")).collect();
                let refs: Vec<&str> = names.iter().map(String::as_str).collect();
                let bracket = Bracket::generate(kind, roster(&refs), false);
                assert!(bracket.validate().is_ok(), "{kind} with {count}");
            }
        }
    }
}
