//! Bracket generators.
//!
//! Each `ScheduleKind` has a `Scheduler` that lays out rounds and matches
//! for a seeded list of participants. Schedulers are deterministic: the
//! same participants in the same order always yield the same bracket.
//! Shuffling is left to the caller.
//!
//! Schedulers only describe shape. They emit matches through a
//! `RoundsBuilder`, which numbers matches, files them into rounds and
//! applies the bye rules for linked matches:
//!
//! - a slot fed by a predecessor's winner is a bye when both of the
//!   predecessor's slots are byes;
//! - a slot fed by a predecessor's loser is a bye when the predecessor has
//!   any bye slot, since such a match never produces a loser;
//! - a match with at least one bye slot is a bye match.

use crate::graph::Feed;
use crate::ids::MatchId;
use crate::matchup::{Match, Partition, Round, Slot};
use crate::participant::{Entrant, Participant};

/// Lays out the rounds of one schedule kind.
///
/// # Examples
///
/// ```rust
/// use bracketry::scheduler::{RoundRobinScheduler, RoundsBuilder, Scheduler};
/// use bracketry::Participant;
///
/// let players: Vec<_> = ["a", "b", "c", "d"]
///     .iter()
///     .enumerate()
///     .map(|(i, name)| Participant::new(*name, *name, i as u32 + 1))
///     .collect();
///
/// let mut builder = RoundsBuilder::new();
/// RoundRobinScheduler.schedule(&players, &mut builder);
/// assert_eq!(builder.rounds(bracketry::Partition::Winners).len(), 3);
/// ```
pub trait Scheduler: Send + Sync {
    /// Emit the rounds for `participants`, given in seed order.
    fn schedule(&self, participants: &[Participant], builder: &mut RoundsBuilder);
}

/// Accumulates matches and rounds in generation order.
#[derive(Debug, Default)]
pub struct RoundsBuilder {
    matches: Vec<Match>,
    rounds: Vec<Round>,
    losers: Vec<Round>,
    first_loser_index: Option<MatchId>,
}

/// What a `RoundsBuilder` produced.
#[derive(Debug, Default)]
pub(crate) struct Layout {
    pub matches: Vec<Match>,
    pub rounds: Vec<Round>,
    pub losers: Vec<Round>,
    pub first_loser_index: Option<MatchId>,
}

impl RoundsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next added match will receive.
    pub fn next_id(&self) -> MatchId {
        MatchId::from_index(self.matches.len())
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn rounds(&self, partition: Partition) -> &[Round] {
        match partition {
            Partition::Winners => &self.rounds,
            Partition::Losers => &self.losers,
        }
    }

    fn rounds_mut(&mut self, partition: Partition) -> &mut Vec<Round> {
        match partition {
            Partition::Winners => &mut self.rounds,
            Partition::Losers => &mut self.losers,
        }
    }

    /// Start a new round in `partition` and return its ordinal.
    pub fn open_round(&mut self, partition: Partition) -> u32 {
        let rounds = self.rounds_mut(partition);
        let value = rounds.len() as u32 + 1;
        rounds.push(Round::new(value, partition));
        value
    }

    /// Record that losers-bracket ids start with the next match.
    pub fn mark_losers_start(&mut self) {
        self.first_loser_index = Some(self.next_id());
    }

    fn push(&mut self, mut m: Match) -> MatchId {
        let id = m.id;
        let partition = m.partition;
        let rounds = self.rounds_mut(partition);
        if rounds.is_empty() {
            rounds.push(Round::new(1, partition));
        }
        if let Some(round) = rounds.last_mut() {
            m.round = round.value;
            round.matches.push(id);
        }
        self.matches.push(m);
        id
    }

    /// Add a match with known sides to the current round of `partition`.
    ///
    /// A match with exactly one bye side is decided for the other side
    /// right away.
    pub fn add_match(&mut self, partition: Partition, left: Slot, right: Slot) -> MatchId {
        let mut m = Match::new(self.next_id(), partition, 0, left, right);
        m.auto_advance();
        self.push(m)
    }

    /// Add a match whose sides are fed by two earlier matches.
    pub fn add_linked_match(
        &mut self,
        partition: Partition,
        prev_left: MatchId,
        prev_right: MatchId,
    ) -> MatchId {
        let left = self.fed_slot(prev_left, partition);
        let right = self.fed_slot(prev_right, partition);
        let mut m = Match::new(self.next_id(), partition, 0, left, right);
        m.prev_left = Some(prev_left);
        m.prev_right = Some(prev_right);
        self.push(m)
    }

    /// Flag an already added match as the grand final.
    pub fn mark_finals(&mut self, id: MatchId) {
        if let Some(m) = id.index().and_then(|index| self.matches.get_mut(index)) {
            m.is_finals = true;
        }
    }

    fn fed_slot(&self, prev: MatchId, partition: Partition) -> Slot {
        let Some(pred) = prev.index().and_then(|index| self.matches.get(index)) else {
            return Slot::Unresolved;
        };
        match Feed::between(pred.partition, partition) {
            Feed::Winner if pred.is_void() => Slot::Bye,
            Feed::Loser if pred.is_bye => Slot::Bye,
            _ => Slot::Unresolved,
        }
    }

    pub(crate) fn finish(self) -> Layout {
        Layout {
            matches: self.matches,
            rounds: self.rounds,
            losers: self.losers,
            first_loser_index: self.first_loser_index,
        }
    }
}

/// Pair the i-th item from the top with the i-th item from the bottom.
fn mirrored_pairs<T: Copy>(items: &[T]) -> Vec<(T, T)> {
    let len = items.len();
    (0..len / 2).map(|i| (items[i], items[len - 1 - i])).collect()
}

fn seat(participant: Option<&Participant>) -> Slot {
    participant.map_or(Slot::Bye, |p| Slot::Resolved(Entrant::single(p.id.clone())))
}

/// Seat list with one trailing empty seat when the count is odd.
fn even_lineup(participants: &[Participant]) -> Vec<Option<&Participant>> {
    let mut lineup: Vec<Option<&Participant>> = participants.iter().map(Some).collect();
    if lineup.len() % 2 == 1 {
        lineup.push(None);
    }
    lineup
}

/// Round robin by the circle method.
///
/// Seat 0 stays put while the other seats rotate one place per round, so
/// every pair meets exactly once over `seats - 1` rounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobinScheduler;

impl Scheduler for RoundRobinScheduler {
    fn schedule(&self, participants: &[Participant], builder: &mut RoundsBuilder) {
        let mut lineup = even_lineup(participants);
        let seats = lineup.len();

        for _ in 1..seats {
            builder.open_round(Partition::Winners);
            for i in 0..seats / 2 {
                builder.add_match(
                    Partition::Winners,
                    seat(lineup[i]),
                    seat(lineup[seats - 1 - i]),
                );
            }
            if let Some(last) = lineup.pop() {
                lineup.insert(1, last);
            }
        }
    }
}

/// Rotating doubles: two-person teams formed from four neighbouring seats.
///
/// Seats are walked from the middle outwards in steps of two, teaming
/// `(i, i - 1)` against the mirrored `(end - i, end - i + 1)`. A group that
/// includes the empty seat is skipped. Between rounds the second-to-last
/// seat moves to the front, which varies partners more than the round
/// robin rotation would.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmericanDoublesScheduler;

impl Scheduler for AmericanDoublesScheduler {
    fn schedule(&self, participants: &[Participant], builder: &mut RoundsBuilder) {
        if participants.len() < 4 {
            return;
        }
        let mut lineup = even_lineup(participants);
        let seats = lineup.len();
        let end = seats - 1;

        for _ in 1..seats {
            builder.open_round(Partition::Winners);
            let mut i = seats / 2 - 1;
            while i > 0 {
                let group = (lineup[i], lineup[i - 1], lineup[end - i], lineup[end - i + 1]);
                if let (Some(l1), Some(l2), Some(r1), Some(r2)) = group {
                    builder.add_match(
                        Partition::Winners,
                        Slot::Resolved(Entrant::pair(l1.id.clone(), l2.id.clone())),
                        Slot::Resolved(Entrant::pair(r1.id.clone(), r2.id.clone())),
                    );
                }
                i = i.saturating_sub(2);
            }
            let displaced = lineup.remove(seats - 2);
            lineup.insert(0, displaced);
        }
    }
}

/// Build a knockout tree over `participants`, padded with byes to a power
/// of two no smaller than `min_size`. Returns the match ids per round.
fn knockout_tree(
    participants: &[Participant],
    min_size: usize,
    builder: &mut RoundsBuilder,
) -> Vec<Vec<MatchId>> {
    let size = participants.len().max(min_size).next_power_of_two();
    let lineup: Vec<Option<&Participant>> = participants
        .iter()
        .map(Some)
        .chain(std::iter::repeat(None))
        .take(size)
        .collect();

    builder.open_round(Partition::Winners);
    let first: Vec<MatchId> = (0..size / 2)
        .map(|i| {
            builder.add_match(
                Partition::Winners,
                seat(lineup[i]),
                seat(lineup[size - 1 - i]),
            )
        })
        .collect();

    let mut tree = vec![first];
    while let Some(last) = tree.last().filter(|round| round.len() > 1) {
        let pairs = mirrored_pairs(last);
        builder.open_round(Partition::Winners);
        let next = pairs
            .into_iter()
            .map(|(left, right)| builder.add_linked_match(Partition::Winners, left, right))
            .collect();
        tree.push(next);
    }
    tree
}

/// Knockout bracket with top and bottom seeds kept apart.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleEliminationScheduler;

impl Scheduler for SingleEliminationScheduler {
    fn schedule(&self, participants: &[Participant], builder: &mut RoundsBuilder) {
        if participants.is_empty() {
            return;
        }
        knockout_tree(participants, 2, builder);
    }
}

/// Winners bracket, losers bracket and a grand final.
///
/// The losers bracket alternates two kinds of rounds. A drop-in round pairs
/// the matches of the feeding round mirrored. A merge round then pairs each
/// drop-in match with a loser coming down from the next winners round,
/// taken in reverse order so early rematches are less likely.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleEliminationScheduler;

impl Scheduler for DoubleEliminationScheduler {
    fn schedule(&self, participants: &[Participant], builder: &mut RoundsBuilder) {
        if participants.is_empty() {
            return;
        }
        // Four seats at least, so a losers bracket exists
        let winners = knockout_tree(participants, 4, builder);
        builder.mark_losers_start();

        let mut feeder = winners[0].clone();
        let mut dropping = winners.iter().skip(1);
        while feeder.len() > 1 {
            let Some(dropped) = dropping.next() else {
                break;
            };

            builder.open_round(Partition::Losers);
            let drop_in: Vec<MatchId> = mirrored_pairs(&feeder)
                .into_iter()
                .map(|(left, right)| builder.add_linked_match(Partition::Losers, left, right))
                .collect();

            let merge_source: Vec<MatchId> = drop_in
                .iter()
                .copied()
                .chain(dropped.iter().rev().copied())
                .collect();
            builder.open_round(Partition::Losers);
            feeder = mirrored_pairs(&merge_source)
                .into_iter()
                .map(|(left, right)| builder.add_linked_match(Partition::Losers, left, right))
                .collect();
        }

        let winners_final = winners.last().and_then(|round| round.first()).copied();
        let losers_final = feeder.first().copied();
        if let (Some(winners_final), Some(losers_final)) = (winners_final, losers_final) {
            builder.open_round(Partition::Winners);
            let finals = builder.add_linked_match(Partition::Winners, winners_final, losers_final);
            builder.mark_finals(finals);
        }
    }
}
