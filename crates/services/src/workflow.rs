use std::sync::Arc;
use std::time::Duration;

use flashdeck_core::Clock;
use flashdeck_core::model::{DeckId, DeckStats, Rating, SessionCounters};

use crate::api::LearnBackend;
use crate::error::{ApiError, SessionError};
use crate::events::{NullObserver, SessionEvent, SessionObserver};
use crate::session::LearningSession;

/// Bound on the due-card fetch when starting a session.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of rating a single card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingOutcome {
    pub counters: SessionCounters,
    pub is_complete: bool,
}

/// Orchestrates session start, persisted ratings and teardown.
///
/// Holds the backend and the presentation observer; the session itself stays
/// with the caller, which matches the single-active-session model — all
/// mutation goes through `&mut LearningSession` on discrete user actions.
#[derive(Clone)]
pub struct LearnLoopService {
    clock: Clock,
    backend: Arc<dyn LearnBackend>,
    observer: Arc<dyn SessionObserver>,
    fetch_timeout: Duration,
    queue_seed: Option<u64>,
}

impl LearnLoopService {
    #[must_use]
    pub fn new(clock: Clock, backend: Arc<dyn LearnBackend>) -> Self {
        Self {
            clock,
            backend,
            observer: Arc::new(NullObserver),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            queue_seed: None,
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Fix the queue's random seed, making draw order deterministic.
    #[must_use]
    pub fn with_queue_seed(mut self, seed: u64) -> Self {
        self.queue_seed = Some(seed);
        self
    }

    fn emit(&self, event: SessionEvent) {
        self.observer.on_event(&event);
    }

    fn emit_counters(&self, session: &LearningSession) {
        self.emit(SessionEvent::CountersChanged(session.counters()));
    }

    /// Present the next card, or mark the session ended when drained.
    fn present_next(&self, session: &mut LearningSession) {
        match session.draw_next() {
            Some(card) => {
                let card = card.clone();
                self.emit(SessionEvent::CardPresented { card });
            }
            None => {
                session.mark_completed(self.clock.now());
                log::debug!("learning session for deck {} drained", session.deck_id());
                self.emit(SessionEvent::Ended);
            }
        }
    }

    /// Start a learning session for a deck.
    ///
    /// Fetches the due cards under the configured timeout, builds the session
    /// and presents its first card.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` when the deck has nothing due; that is
    /// the "nothing to learn" state, not a failure, and no `StartFailed`
    /// event is emitted for it.
    /// Returns `ApiError::Timeout` when the fetch exceeds the bound, and the
    /// underlying `ApiError` when it fails outright; both emit `StartFailed`
    /// and leave no partial state behind.
    pub async fn start_session(&self, deck_id: &DeckId) -> Result<LearningSession, SessionError> {
        let fetch = self.backend.fetch_due_cards(deck_id);
        let cards = match tokio::time::timeout(self.fetch_timeout, fetch).await {
            Ok(Ok(cards)) => cards,
            Ok(Err(err)) => {
                self.emit(SessionEvent::StartFailed {
                    reason: err.to_string(),
                });
                return Err(err.into());
            }
            Err(_elapsed) => {
                let err = ApiError::Timeout;
                self.emit(SessionEvent::StartFailed {
                    reason: err.to_string(),
                });
                return Err(err.into());
            }
        };

        if cards.is_empty() {
            return Err(SessionError::Empty);
        }

        let started_at = self.clock.now();
        let mut session = match self.queue_seed {
            Some(seed) => LearningSession::with_seed(deck_id.clone(), cards, started_at, seed)?,
            None => LearningSession::new(deck_id.clone(), cards, started_at)?,
        };

        log::debug!(
            "learning session started for deck {deck_id} with {} cards",
            session.counters().total()
        );
        self.emit(SessionEvent::Started {
            total: session.counters().total(),
        });
        self.emit_counters(&session);
        self.present_next(&mut session);
        Ok(session)
    }

    /// Rate the card currently awaiting a rating.
    ///
    /// The local update is applied optimistically, then the rating is
    /// persisted; only after the POST has resolved is the next card
    /// presented. On persistence failure the update is rolled back and the
    /// same card is re-presented, so the session never diverges from
    /// backend-recorded state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` when the session is already drained,
    /// `SessionError::NoCurrentCard` when no card is pending (a presentation
    /// layer bug; nothing is mutated), and `SessionError::Api` after a
    /// rollback when the POST failed — the session stays usable.
    pub async fn rate_current(
        &self,
        session: &mut LearningSession,
        rating: Rating,
    ) -> Result<RatingOutcome, SessionError> {
        if session.is_complete() {
            return Err(SessionError::Completed);
        }

        let Some(card_id) = session.current_card().map(|card| card.id.clone()) else {
            log::error!("rating {rating} submitted with no card pending");
            return Err(SessionError::NoCurrentCard);
        };

        let applied = session.apply_rating(rating)?;

        if let Err(err) = self.backend.submit_rating(&card_id, rating).await {
            log::warn!("rating for card {card_id} not persisted, rolling back: {err}");
            session.revert(applied);
            self.emit_counters(session);
            if let Some(card) = session.current_card() {
                let card = card.clone();
                self.emit(SessionEvent::CardPresented { card });
            }
            return Err(err.into());
        }

        self.emit_counters(session);
        self.present_next(session);

        Ok(RatingOutcome {
            counters: session.counters(),
            is_complete: session.is_complete(),
        })
    }

    /// End the session, clear its state and refresh deck statistics.
    ///
    /// Works both after the queue drained naturally and as a mid-session
    /// abort; the session is reset to idle either way.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Api` when the stats refresh fails.
    pub async fn end_session(
        &self,
        session: &mut LearningSession,
    ) -> Result<DeckStats, SessionError> {
        let deck_id = session.deck_id().clone();
        let was_complete = session.is_complete();
        session.reset();
        if !was_complete {
            self.emit(SessionEvent::Ended);
        }

        let stats = self.backend.fetch_deck_stats(&deck_id).await?;
        Ok(stats)
    }
}
