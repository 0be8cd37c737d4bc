//! Result entry and the cascades it triggers.
//!
//! Entering a result promotes the winner (and, out of the winners bracket
//! of a double elimination pool, demotes the loser) into the successor
//! matches. When a successor already holds a different entrant, everything
//! that entrant went on to do is invalidated first. Resetting a match walks
//! the same links and unwinds whatever it fed.
//!
//! Both cascades keep an explicit stack, so arbitrarily deep brackets never
//! grow the call stack.

use crate::bracket::Bracket;
use crate::error::BracketError;
use crate::graph::Feed;
use crate::ids::MatchId;
use crate::matchup::{Match, Outcome, Slot};

/// The slot value `m` currently sends down `feed`.
fn fed_value(m: &Match, feed: Feed) -> Slot {
    match feed {
        Feed::Winner if m.is_void() => Slot::Bye,
        Feed::Loser if m.is_bye => Slot::Bye,
        Feed::Winner => m.winner_entrant().cloned().into(),
        Feed::Loser => m.loser_entrant().cloned().into(),
    }
}

impl Bracket {
    /// Record the outcome of a match and push it through the bracket.
    ///
    /// Returns `Ok(false)` without touching anything when the match is a
    /// bye, is missing a side, or already holds `outcome`.
    ///
    /// # Errors
    ///
    /// Returns `BracketError::UnknownMatch` if `id` is not in the bracket.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bracketry::*;
    ///
    /// let players = vec![Participant::new("a", "A", 1), Participant::new("b", "B", 2)];
    /// let mut bracket = Bracket::generate(ScheduleKind::SingleElimination, players, false);
    ///
    /// let id = MatchId::new(1);
    /// assert_eq!(bracket.record_result(id, Outcome::Win(Side::Right)), Ok(true));
    /// assert_eq!(bracket.record_result(id, Outcome::Win(Side::Right)), Ok(false));
    /// assert_eq!(bracket.champion().map(|e| e.lead.as_str()), Some("b"));
    /// ```
    pub fn record_result(&mut self, id: MatchId, outcome: Outcome) -> Result<bool, BracketError> {
        let m = self.require(id)?;
        if m.is_bye || !m.has_both_sides() || m.outcome() == Some(outcome) {
            log::trace!("ignoring {outcome:?} for match {id}");
            return Ok(false);
        }

        if let Some(m) = self.get_mut(id) {
            m.apply(outcome);
        }
        log::trace!("recorded {outcome:?} for match {id}");
        self.promote(id);
        Ok(true)
    }

    /// Clear the result of a match and of everything it fed.
    ///
    /// Returns `Ok(false)` for bye matches and matches without a result.
    ///
    /// # Errors
    ///
    /// Returns `BracketError::UnknownMatch` if `id` is not in the bracket.
    pub fn reset(&mut self, id: MatchId) -> Result<bool, BracketError> {
        let m = self.require(id)?;
        if m.is_bye || !m.is_decided() {
            return Ok(false);
        }
        self.invalidate(id);
        Ok(true)
    }

    /// Enter scores for a match without affecting its result.
    ///
    /// # Errors
    ///
    /// Returns `BracketError::UnknownMatch` if `id` is not in the bracket.
    pub fn set_scores(&mut self, id: MatchId, left: i32, right: i32) -> Result<bool, BracketError> {
        let m = self
            .get_mut(id)
            .ok_or(BracketError::UnknownMatch(id))?;
        if m.is_bye {
            return Ok(false);
        }
        m.left_score = left;
        m.right_score = right;
        Ok(true)
    }

    /// Move the current result of `id` into its successors.
    ///
    /// Bye matches that receive an entrant decide themselves and are
    /// promoted in turn.
    pub(crate) fn promote(&mut self, id: MatchId) {
        let mut work = vec![id];
        let mut steps = 0usize;

        while let Some(current) = work.pop() {
            steps += 1;
            debug_assert!(
                steps <= self.matches.len() + 1,
                "promotion from {id} did not terminate"
            );

            if let Some(next) = self.advance_winner(current) {
                work.push(next);
            }
            if let Some(next) = self.demote_loser(current) {
                work.push(next);
            }
        }
    }

    fn advance_winner(&mut self, id: MatchId) -> Option<MatchId> {
        self.feed_successor(id, Feed::Winner)
    }

    /// Send the loser of a winners-bracket match into the losers bracket.
    pub(crate) fn demote_loser(&mut self, id: MatchId) -> Option<MatchId> {
        self.feed_successor(id, Feed::Loser)
    }

    /// Place what `id` feeds down `feed` into the successor slot.
    ///
    /// Returns the successor when it auto-advanced and needs promoting.
    fn feed_successor(&mut self, id: MatchId, feed: Feed) -> Option<MatchId> {
        let (next, side) = self.links.successor(id, feed)?;
        let value = fed_value(self.get(id)?, feed);
        if value.is_bye() {
            return None;
        }

        let successor = self.get(next)?;
        if successor.slot(side) == &value {
            return None;
        }
        if successor.is_decided() {
            log::trace!("match {next} loses its result after match {id} changed");
            self.invalidate(next);
        }

        let successor = self.get_mut(next)?;
        *successor.slot_mut(side) = value;
        successor.clear_result();
        log::trace!("match {id} feeds {feed:?} into {next} ({side:?})");
        successor.auto_advance().then_some(next)
    }

    /// Clear the result of `root` and unwind every slot it fed.
    ///
    /// Successors are handled before the match that fed them, so a slot is
    /// only emptied once the match holding it has been reset.
    pub(crate) fn invalidate(&mut self, root: MatchId) {
        let mut stack = vec![(root, false)];

        while let Some((id, expanded)) = stack.pop() {
            let links = self.links.successors(id);

            if !expanded {
                stack.push((id, true));
                for (next, link) in &links {
                    let decided = self
                        .get(*next)
                        .is_some_and(|m| m.slot(link.side).is_resolved() && m.is_decided());
                    if decided {
                        stack.push((*next, false));
                    }
                }
                continue;
            }

            for (next, link) in links {
                if let Some(m) = self.get_mut(next) {
                    if m.slot(link.side).is_resolved() {
                        *m.slot_mut(link.side) = Slot::Unresolved;
                        m.clear_result();
                    }
                }
            }
            if let Some(m) = self.get_mut(id) {
                m.clear_result();
            }
            log::trace!("reset match {id}");
        }
    }
}
