//! Schedule kinds and the seed-count policy attached to each.

use crate::scheduler::{
    AmericanDoublesScheduler, DoubleEliminationScheduler, RoundRobinScheduler, Scheduler,
    SingleEliminationScheduler,
};
use serde::{Deserialize, Serialize};

/// The format a pool is played under.
///
/// # Examples
///
/// ```rust
/// use bracketry::ScheduleKind;
///
/// let kind = ScheduleKind::AmericanDoubles;
/// assert!(kind.is_allowed_seed_count(8));
/// assert!(!kind.is_allowed_seed_count(6));
/// assert_eq!(kind.fit_seed_count(10), Some(9));
/// assert_eq!(kind.to_string(), "American Doubles");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScheduleKind {
    RoundRobin,
    AmericanDoubles,
    SingleElimination,
    DoubleElimination,
}

impl ScheduleKind {
    pub const ALL: [ScheduleKind; 4] = [
        ScheduleKind::RoundRobin,
        ScheduleKind::AmericanDoubles,
        ScheduleKind::SingleElimination,
        ScheduleKind::DoubleElimination,
    ];

    /// Seed counts a configuration surface should offer for this kind.
    ///
    /// American doubles leaves out counts where `count % 4 == 2`: those
    /// always strand two players per round.
    pub fn allowed_seed_counts(self) -> Vec<usize> {
        match self {
            ScheduleKind::AmericanDoubles => (4..=32).filter(|count| count % 4 != 2).collect(),
            ScheduleKind::RoundRobin => (2..=32).collect(),
            ScheduleKind::SingleElimination | ScheduleKind::DoubleElimination => (2..=64).collect(),
        }
    }

    pub fn minimum_seed_count(self) -> usize {
        match self {
            ScheduleKind::AmericanDoubles => 4,
            _ => 2,
        }
    }

    pub fn is_allowed_seed_count(self, count: usize) -> bool {
        self.allowed_seed_counts().contains(&count)
    }

    /// The largest allowed seed count not above `count`.
    ///
    /// Returns `None` when `count` is below every allowed count.
    pub fn fit_seed_count(self, count: usize) -> Option<usize> {
        self.allowed_seed_counts()
            .into_iter()
            .filter(|allowed| *allowed <= count)
            .last()
    }

    /// Whether winners advance into later matches (elimination formats).
    pub fn is_winner_promotable(self) -> bool {
        matches!(
            self,
            ScheduleKind::SingleElimination | ScheduleKind::DoubleElimination
        )
    }

    /// Whether standings should show how many matches each participant
    /// is due to play (formats where everyone plays a fixed number).
    pub fn shows_n_over_p(self) -> bool {
        matches!(self, ScheduleKind::RoundRobin | ScheduleKind::AmericanDoubles)
    }

    /// The generator for this kind.
    pub fn scheduler(self) -> Box<dyn Scheduler> {
        match self {
            ScheduleKind::RoundRobin => Box::new(RoundRobinScheduler),
            ScheduleKind::AmericanDoubles => Box::new(AmericanDoublesScheduler),
            ScheduleKind::SingleElimination => Box::new(SingleEliminationScheduler),
            ScheduleKind::DoubleElimination => Box::new(DoubleEliminationScheduler),
        }
    }
}

impl std::fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let description = match self {
            ScheduleKind::RoundRobin => "Round Robin",
            ScheduleKind::AmericanDoubles => "American Doubles",
            ScheduleKind::SingleElimination => "Single Elimination",
            ScheduleKind::DoubleElimination => "Double Elimination",
        };
        f.write_str(description)
    }
}
