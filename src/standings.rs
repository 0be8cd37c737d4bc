//! Standings and pool statistics.
//!
//! Standings are derived on demand from the matches of both partitions;
//! nothing here is stored on the bracket.

use crate::ids::ParticipantId;
use crate::matchup::{Match, Side};
use crate::participant::Participant;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One participant's line in the standings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingRecord {
    /// 1-based position after sorting.
    pub rank: u32,
    /// Rank before play, i.e. the seed.
    pub prior_rank: u32,
    pub participant_id: ParticipantId,
    pub name: String,
    /// Matches the participant was drawn into, played or not.
    pub participated: u32,
    /// Matches with a winner or a draw.
    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    /// Bye matches the participant went through without playing.
    pub byes: u32,
    pub points_for: i32,
    pub points_against: i32,
    pub points_difference: i32,
}

impl StandingRecord {
    fn new(participant: &Participant) -> Self {
        Self {
            rank: 0,
            prior_rank: participant.seed,
            participant_id: participant.id.clone(),
            name: participant.name.clone(),
            participated: 0,
            played: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            byes: 0,
            points_for: 0,
            points_against: 0,
            points_difference: 0,
        }
    }

    fn record(&mut self, m: &Match, side: Side) {
        self.participated += 1;
        if !m.is_decided() {
            return;
        }
        self.played += 1;
        if m.is_draw {
            self.draws += 1;
        } else if m.winner == Some(side) {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        self.points_for += m.score(side);
        self.points_against += m.score(side.opposite());
        self.points_difference = self.points_for - self.points_against;
    }
}

/// Compute standings for `participants` from `matches`.
///
/// Bye matches count only towards `byes`. Doubles partners both get the
/// result and score of their side. Records are sorted by wins, then draws,
/// then points difference, all descending; ties keep seed order.
///
/// # Examples
///
/// ```rust
/// use bracketry::*;
///
/// let players = vec![Participant::new("a", "Alice", 1), Participant::new("b", "Bob", 2)];
/// let mut bracket = Bracket::generate(ScheduleKind::RoundRobin, players, false);
/// bracket.record_result(MatchId::new(1), Outcome::Win(Side::Right)).unwrap();
///
/// let table = bracket.standings();
/// assert_eq!(table[0].name, "Bob");
/// assert_eq!(table[0].rank, 1);
/// assert_eq!(table[0].prior_rank, 2);
/// ```
pub fn compute_standings<'a>(
    participants: &[Participant],
    matches: impl IntoIterator<Item = &'a Match>,
) -> Vec<StandingRecord> {
    let mut records: Vec<StandingRecord> = participants.iter().map(StandingRecord::new).collect();
    let positions: HashMap<&ParticipantId, usize> = participants
        .iter()
        .enumerate()
        .map(|(index, p)| (&p.id, index))
        .collect();

    for m in matches {
        for side in [Side::Left, Side::Right] {
            let Some(entrant) = m.slot(side).entrant() else {
                continue;
            };
            for member in entrant.members() {
                let Some(record) = positions.get(member).and_then(|i| records.get_mut(*i)) else {
                    continue;
                };
                if m.is_bye {
                    record.byes += 1;
                } else {
                    record.record(m, side);
                }
            }
        }
    }

    records.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then(b.draws.cmp(&a.draws))
            .then(b.points_difference.cmp(&a.points_difference))
    });
    for (position, record) in records.iter_mut().enumerate() {
        record.rank = position as u32 + 1;
    }
    records
}

/// Totals over a whole pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatistics {
    /// Playable matches (byes excluded).
    pub matches: u32,
    /// Playable matches with a winner.
    pub wins: u32,
    pub draws: u32,
    /// Bye matches that carried an entrant through.
    pub byes: u32,
    /// Matches the participant ranked first takes part in.
    pub n_over_p: u32,
}

impl PoolStatistics {
    /// Matches with a winner or a draw.
    pub fn finished(&self) -> u32 {
        self.wins + self.draws
    }

    pub fn is_finished(&self) -> bool {
        self.finished() == self.matches
    }
}

/// Gather `PoolStatistics` for `participants` over `matches`.
pub fn pool_statistics<'a>(
    participants: &[Participant],
    matches: impl IntoIterator<Item = &'a Match> + Clone,
) -> PoolStatistics {
    let mut stats = PoolStatistics::default();
    for m in matches.clone() {
        if m.is_bye {
            if !m.is_void() {
                stats.byes += 1;
            }
            continue;
        }
        stats.matches += 1;
        if m.is_draw {
            stats.draws += 1;
        } else if m.winner.is_some() {
            stats.wins += 1;
        }
    }
    stats.n_over_p = compute_standings(participants, matches)
        .first()
        .map_or(0, |leader| leader.participated);
    stats
}
