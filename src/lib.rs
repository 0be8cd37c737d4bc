//! # bracketry - Deterministic Tournament Bracket Engine
//!
//! Generates the round and match graph of a tournament pool and keeps it
//! consistent while results come in:
//! - **Deterministic** generation (same participants in the same order,
//!   same bracket)
//! - **Four formats**: round robin, American doubles, single elimination
//!   and double elimination
//! - **Cascading** result entry: winners advance, losers drop into the
//!   losers bracket, and changed results invalidate everything downstream
//! - **Derived standings** computed on demand from the matches
//!
//! ## Core Concepts
//!
//! ### Match Graph
//!
//! Matches live in an arena addressed by [`MatchId`]. Elimination matches
//! point back at the two matches feeding their sides:
//!
//! ```text
//! [Match #1] ─┐
//!             ├─▶ [Match #3] ─▶ ...
//! [Match #2] ─┘
//! ```
//!
//! A side ([`Slot`]) is either waiting on its predecessor, a bye, or holds
//! a known [`Entrant`]. Byes are settled when the bracket is generated, so
//! a participant without an opponent already waits in the next round.
//!
//! ### Key Features
//!
//! - **Successor Index**: a [`graph::LinkGraph`] answers "where does this
//!   winner (or loser) go" without scanning rounds
//! - **Validation**: dangling links, shared predecessors and cycles are
//!   rejected when a bracket is loaded
//! - **Handicaps**: optional starting scores from participant handicaps
//! - **Snapshots**: brackets serialize to JSON and reload with their links
//!
//! ## Example
//!
//! ```rust
//! use bracketry::*;
//!
//! let players: Vec<_> = ["Ann", "Ben", "Cid", "Dee"]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, name)| Participant::new(*name, *name, i as u32 + 1))
//!     .collect();
//!
//! let mut bracket = Bracket::generate(ScheduleKind::SingleElimination, players, false);
//!
//! // First round: Ann vs Dee, Ben vs Cid
//! bracket.record_result(MatchId::new(1), Outcome::Win(Side::Left)).unwrap();
//! bracket.record_result(MatchId::new(2), Outcome::Win(Side::Right)).unwrap();
//! bracket.record_result(MatchId::new(3), Outcome::Win(Side::Right)).unwrap();
//!
//! assert_eq!(bracket.champion().map(|e| e.lead.as_str()), Some("Cid"));
//! assert_eq!(bracket.standings()[0].name, "Cid");
//! ```
//!
//! ## Modules
//!
//! - [`ids`] - Participant and match identifiers
//! - [`participant`] - Participants and match entrants
//! - [`matchup`] - Matches, slots and rounds
//! - [`schedule`] - Schedule kinds and seed-count policy
//! - [`scheduler`] - Bracket generators
//! - [`bracket`] - The bracket and its queries
//! - [`progression`] - Result entry and cascades
//! - [`standings`] - Standings and pool statistics
//! - [`pool`] - JSON pool definitions
//! - [`graph`] - Successor index and topology checks
//! - [`error`] - Error types

pub mod bracket;
pub mod error;
pub mod graph;
pub mod ids;
pub mod matchup;
pub mod participant;
pub mod pool;
pub mod progression;
pub mod schedule;
pub mod scheduler;
pub mod standings;

// Re-export main types for convenience
pub use bracket::Bracket;
pub use error::BracketError;
pub use ids::{MatchId, ParticipantId};
pub use matchup::{Match, Outcome, Partition, Round, Side, Slot};
pub use participant::{Entrant, Participant};
pub use pool::PoolDefinition;
pub use schedule::ScheduleKind;
pub use standings::{compute_standings, PoolStatistics, StandingRecord};
