mod card;
mod counters;
mod ids;
mod rating;
mod stats;

pub use card::Card;
pub use counters::SessionCounters;
pub use ids::{CardId, DeckId, ParseIdError};
pub use rating::{Rating, RatingError};
pub use stats::DeckStats;
