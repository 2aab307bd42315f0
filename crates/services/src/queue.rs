use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use flashdeck_core::model::Card;

/// Uniform-random worklist of cards for one learning session.
///
/// Supports exactly the operations the session needs: draw one card uniformly
/// at random over the current contents, reinsert a failed card at a uniformly
/// random slot, and remove a card by slot to undo a reinsertion. The
/// randomness source is owned by the queue so tests can seed it.
#[derive(Debug)]
pub struct LearnQueue {
    cards: Vec<Card>,
    rng: StdRng,
}

impl LearnQueue {
    /// Queue with a randomness source seeded from the operating system.
    #[must_use]
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            cards,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Queue with a fixed seed, for deterministic draws in tests.
    #[must_use]
    pub fn with_seed(cards: Vec<Card>, seed: u64) -> Self {
        Self {
            cards,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The queued cards in their current order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Remove and return one card chosen uniformly over the current contents,
    /// or `None` when the queue is empty.
    pub fn draw(&mut self) -> Option<Card> {
        if self.cards.is_empty() {
            return None;
        }
        let index = self.rng.random_range(0..self.cards.len());
        Some(self.cards.remove(index))
    }

    /// Insert the card at a uniformly random slot among `len + 1` positions,
    /// so a failed card is not guaranteed to reappear immediately.
    ///
    /// Returns the chosen slot so the insertion can be undone.
    pub fn insert_random(&mut self, card: Card) -> usize {
        let slot = self.rng.random_range(0..=self.cards.len());
        self.cards.insert(slot, card);
        slot
    }

    /// Remove and return the card at `slot`, undoing an earlier
    /// [`insert_random`](Self::insert_random).
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of bounds; callers only pass slots returned by
    /// `insert_random` on this queue.
    pub fn remove_at(&mut self, slot: usize) -> Card {
        self.cards.remove(slot)
    }

    /// Drop every queued card.
    pub fn clear(&mut self) {
        self.cards.clear();
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
