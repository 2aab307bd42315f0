use serde::Serialize;

use crate::model::Rating;

/// Running tally for one learning session.
///
/// `total` is fixed at session start. `remaining` counts cards not yet
/// finally resolved: it drops by one on `Good`/`Easy` and never on `Again`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SessionCounters {
    total: u32,
    again: u32,
    good: u32,
    easy: u32,
    remaining: u32,
}

impl SessionCounters {
    /// Counters for a freshly started session over `total` due cards.
    #[must_use]
    pub fn starting(total: u32) -> Self {
        Self {
            total,
            again: 0,
            good: 0,
            easy: 0,
            remaining: total,
        }
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn again(&self) -> u32 {
        self.again
    }

    #[must_use]
    pub fn good(&self) -> u32 {
        self.good
    }

    #[must_use]
    pub fn easy(&self) -> u32 {
        self.easy
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Number of cards finally resolved so far.
    #[must_use]
    pub fn resolved(&self) -> u32 {
        self.good.saturating_add(self.easy)
    }

    /// Apply one rating to the tally.
    pub fn record(&mut self, rating: Rating) {
        match rating {
            Rating::Again => self.again = self.again.saturating_add(1),
            Rating::Good => {
                self.good = self.good.saturating_add(1);
                self.remaining = self.remaining.saturating_sub(1);
            }
            Rating::Easy => {
                self.easy = self.easy.saturating_add(1);
                self.remaining = self.remaining.saturating_sub(1);
            }
        }
    }

    /// Undo a rating previously passed to [`record`](Self::record).
    ///
    /// Used when the backend rejected the rating and the optimistic local
    /// update has to be rolled back.
    pub fn revert(&mut self, rating: Rating) {
        match rating {
            Rating::Again => self.again = self.again.saturating_sub(1),
            Rating::Good => {
                self.good = self.good.saturating_sub(1);
                self.remaining = self.remaining.saturating_add(1);
            }
            Rating::Easy => {
                self.easy = self.easy.saturating_sub(1);
                self.remaining = self.remaining.saturating_add(1);
            }
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_counters_are_full() {
        let counters = SessionCounters::starting(4);
        assert_eq!(counters.total(), 4);
        assert_eq!(counters.remaining(), 4);
        assert_eq!(counters.resolved(), 0);
    }

    #[test]
    fn again_never_decrements_remaining() {
        let mut counters = SessionCounters::starting(3);
        counters.record(Rating::Again);
        counters.record(Rating::Again);
        assert_eq!(counters.again(), 2);
        assert_eq!(counters.remaining(), 3);
    }

    #[test]
    fn good_and_easy_decrement_remaining_by_one() {
        let mut counters = SessionCounters::starting(3);
        counters.record(Rating::Good);
        assert_eq!(counters.remaining(), 2);
        counters.record(Rating::Easy);
        assert_eq!(counters.remaining(), 1);
        assert_eq!(counters.resolved(), 2);
    }

    #[test]
    fn revert_is_the_exact_inverse_of_record() {
        for rating in [Rating::Again, Rating::Good, Rating::Easy] {
            let mut counters = SessionCounters::starting(5);
            counters.record(Rating::Good);
            let before = counters;

            counters.record(rating);
            counters.revert(rating);
            assert_eq!(counters, before, "revert({rating}) must undo record");
        }
    }

    #[test]
    fn total_is_fixed_across_ratings() {
        let mut counters = SessionCounters::starting(2);
        counters.record(Rating::Again);
        counters.record(Rating::Good);
        counters.record(Rating::Easy);
        assert_eq!(counters.total(), 2);
    }
}
