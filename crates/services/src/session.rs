use chrono::{DateTime, Utc};
use std::fmt;

use flashdeck_core::model::{Card, CardId, DeckId, Rating, SessionCounters};

use crate::error::SessionError;
use crate::queue::LearnQueue;

//
// ─── APPLIED RATING ────────────────────────────────────────────────────────────
//

/// Record of an optimistic local rating update.
///
/// Carries everything needed to undo the update if the backend rejects the
/// rating: the rated card, the rating itself, and the queue slot an `Again`
/// card was reinserted at.
#[derive(Debug)]
pub struct AppliedRating {
    rating: Rating,
    card: Card,
    reinsert_slot: Option<usize>,
}

impl AppliedRating {
    #[must_use]
    pub fn rating(&self) -> Rating {
        self.rating
    }

    #[must_use]
    pub fn card_id(&self) -> &CardId {
        &self.card.id
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory learning session over one deck's due cards.
///
/// Owns the queue, the progress counters and the card currently awaiting a
/// rating — no other component touches them directly. This type is a pure
/// state machine; all I/O lives in [`LearnLoopService`](crate::workflow::LearnLoopService).
pub struct LearningSession {
    deck_id: DeckId,
    queue: LearnQueue,
    counters: SessionCounters,
    current: Option<Card>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl LearningSession {
    /// Create a session over the given due cards.
    ///
    /// `started_at` should come from the services layer clock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no cards are provided.
    pub fn new(
        deck_id: DeckId,
        cards: Vec<Card>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        Self::from_queue(deck_id, LearnQueue::new(cards), started_at)
    }

    /// Create a session with a fixed queue seed, for deterministic tests.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no cards are provided.
    pub fn with_seed(
        deck_id: DeckId,
        cards: Vec<Card>,
        started_at: DateTime<Utc>,
        seed: u64,
    ) -> Result<Self, SessionError> {
        Self::from_queue(deck_id, LearnQueue::with_seed(cards, seed), started_at)
    }

    fn from_queue(
        deck_id: DeckId,
        queue: LearnQueue,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if queue.is_empty() {
            return Err(SessionError::Empty);
        }

        let total = u32::try_from(queue.len()).unwrap_or(u32::MAX);
        Ok(Self {
            deck_id,
            counters: SessionCounters::starting(total),
            queue,
            current: None,
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn deck_id(&self) -> &DeckId {
        &self.deck_id
    }

    #[must_use]
    pub fn counters(&self) -> SessionCounters {
        self.counters
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// The card drawn from the queue and awaiting a rating, if any.
    #[must_use]
    pub fn current_card(&self) -> Option<&Card> {
        self.current.as_ref()
    }

    /// Number of cards still queued (not counting the current card).
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// True once every card has been finally resolved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.queue.is_empty() && self.current.is_none()
    }

    /// `remaining` must always equal queued cards plus the pending one.
    #[must_use]
    pub fn holds_remaining_invariant(&self) -> bool {
        let pending = u32::from(self.current.is_some());
        let queued = u32::try_from(self.queue.len()).unwrap_or(u32::MAX);
        queued.saturating_add(pending) == self.counters.remaining()
    }

    /// Draw the next card uniformly at random and set it as current.
    ///
    /// Returns `None` when the queue is empty, which ends the session.
    /// Drawing while a card is still awaiting a rating is a logic error.
    pub fn draw_next(&mut self) -> Option<&Card> {
        debug_assert!(self.current.is_none(), "draw with a rating still pending");
        let card = self.queue.draw()?;
        self.current = Some(card);
        self.current.as_ref()
    }

    /// Optimistically apply a rating to the current card.
    ///
    /// Counters are updated immediately; an `Again` card goes back into the
    /// queue at a uniformly random slot. The returned record carries the
    /// precomputed inverse so [`revert`](Self::revert) can restore the
    /// pre-rating state when persistence fails.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoCurrentCard`, with no state change, when no
    /// card is awaiting a rating.
    pub fn apply_rating(&mut self, rating: Rating) -> Result<AppliedRating, SessionError> {
        let card = self.current.take().ok_or(SessionError::NoCurrentCard)?;
        self.counters.record(rating);

        let reinsert_slot = if rating.resolves_card() {
            None
        } else {
            Some(self.queue.insert_random(card.clone()))
        };

        Ok(AppliedRating {
            rating,
            card,
            reinsert_slot,
        })
    }

    /// Roll back an optimistic rating after a persistence failure.
    ///
    /// Removes an `Again` reinsertion, reverts the counters and restores the
    /// card as current, leaving the session exactly as it was before the
    /// matching [`apply_rating`](Self::apply_rating) call.
    pub fn revert(&mut self, applied: AppliedRating) {
        if let Some(slot) = applied.reinsert_slot {
            let _ = self.queue.remove_at(slot);
        }
        self.counters.revert(applied.rating);
        self.current = Some(applied.card);
    }

    pub(crate) fn mark_completed(&mut self, at: DateTime<Utc>) {
        if self.completed_at.is_none() {
            self.completed_at = Some(at);
        }
    }

    /// Drop all session state: queue, current card and counters go to zero.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.current = None;
        self.counters = SessionCounters::default();
    }
}

impl fmt::Debug for LearningSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LearningSession")
            .field("deck_id", &self.deck_id)
            .field("queued", &self.queue.len())
            .field("current", &self.current.as_ref().map(|card| &card.id))
            .field("counters", &self.counters)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use flashdeck_core::time::fixed_now;

    fn build_card(id: &str) -> Card {
        Card::new(CardId::new(id), format!("q-{id}"), format!("a-{id}"))
    }

    fn build_session(ids: &[&str], seed: u64) -> LearningSession {
        let cards = ids.iter().map(|id| build_card(id)).collect();
        LearningSession::with_seed(DeckId::new("d1"), cards, fixed_now(), seed).unwrap()
    }

    #[test]
    fn empty_session_returns_error() {
        let err =
            LearningSession::new(DeckId::new("d1"), Vec::new(), fixed_now()).unwrap_err();
        assert!(matches!(err, SessionError::Empty));
    }

    #[test]
    fn start_initializes_counters() {
        let session = build_session(&["a", "b", "c"], 1);
        let counters = session.counters();
        assert_eq!(counters.total(), 3);
        assert_eq!(counters.remaining(), 3);
        assert_eq!(counters.again(), 0);
        assert!(session.current_card().is_none());
        assert!(!session.is_complete());
    }

    #[test]
    fn draining_with_good_takes_exactly_one_rating_per_card() {
        let mut session = build_session(&["a", "b", "c", "d"], 11);
        let mut ratings = 0;
        while session.draw_next().is_some() {
            session.apply_rating(Rating::Good).unwrap();
            ratings += 1;
            assert!(session.holds_remaining_invariant());
        }

        assert_eq!(ratings, 4);
        assert_eq!(session.counters().remaining(), 0);
        assert!(session.is_complete());
    }

    #[test]
    fn again_keeps_remaining_and_grows_queue_by_one() {
        let mut session = build_session(&["a", "b"], 2);
        session.draw_next().unwrap();
        let queued_before = session.queued();

        session.apply_rating(Rating::Again).unwrap();

        assert_eq!(session.counters().remaining(), 2);
        assert_eq!(session.counters().again(), 1);
        assert_eq!(session.queued(), queued_before + 1);
        assert!(session.holds_remaining_invariant());
    }

    #[test]
    fn again_rated_card_is_drawn_again_before_the_session_ends() {
        let mut session = build_session(&["a", "b", "c"], 5);

        let failed_id = session.draw_next().unwrap().id.clone();
        session.apply_rating(Rating::Again).unwrap();

        let mut redrawn = false;
        while let Some(card) = session.draw_next() {
            if card.id == failed_id {
                redrawn = true;
            }
            session.apply_rating(Rating::Good).unwrap();
        }

        assert!(redrawn, "a failed card must come back before the end");
        assert!(session.is_complete());
    }

    #[test]
    fn rating_without_current_card_mutates_nothing() {
        let mut session = build_session(&["a", "b"], 3);
        let counters_before = session.counters();
        let queued_before = session.queued();

        let err = session.apply_rating(Rating::Good).unwrap_err();

        assert!(matches!(err, SessionError::NoCurrentCard));
        assert_eq!(session.counters(), counters_before);
        assert_eq!(session.queued(), queued_before);
    }

    #[test]
    fn revert_restores_the_pre_rating_state() {
        for rating in [Rating::Again, Rating::Good, Rating::Easy] {
            let mut session = build_session(&["a", "b", "c"], 8);
            let drawn_id = session.draw_next().unwrap().id.clone();
            let counters_before = session.counters();
            let queued_before = session.queued();

            let applied = session.apply_rating(rating).unwrap();
            assert_eq!(applied.rating(), rating);
            assert_eq!(applied.card_id(), &drawn_id);
            session.revert(applied);

            assert_eq!(session.counters(), counters_before);
            assert_eq!(session.queued(), queued_before);
            assert_eq!(session.current_card().unwrap().id, drawn_id);
            assert!(session.holds_remaining_invariant());
        }
    }

    #[test]
    fn two_card_scenario_good_again_easy() {
        let mut session = build_session(&["one", "two"], 4);
        assert_eq!(session.counters().total(), 2);
        assert_eq!(session.counters().remaining(), 2);

        let first = session.draw_next().unwrap().id.clone();
        session.apply_rating(Rating::Good).unwrap();
        assert_eq!(session.counters().good(), 1);
        assert_eq!(session.counters().remaining(), 1);

        let second = session.draw_next().unwrap().id.clone();
        assert_ne!(first, second);
        session.apply_rating(Rating::Again).unwrap();
        assert_eq!(session.counters().again(), 1);
        assert_eq!(session.counters().remaining(), 1);
        assert_eq!(session.queued(), 1);

        let third = session.draw_next().unwrap().id.clone();
        assert_eq!(third, second);
        session.apply_rating(Rating::Easy).unwrap();
        assert_eq!(session.counters().easy(), 1);
        assert_eq!(session.counters().remaining(), 0);

        assert!(session.draw_next().is_none());
        assert!(session.is_complete());
    }

    #[test]
    fn reset_clears_queue_current_and_counters() {
        let mut session = build_session(&["a", "b"], 6);
        session.draw_next().unwrap();

        session.reset();

        assert!(session.is_complete());
        assert!(session.current_card().is_none());
        assert_eq!(session.counters(), SessionCounters::default());
    }
}
