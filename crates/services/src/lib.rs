#![forbid(unsafe_code)]

pub mod api;
pub mod error;
pub mod events;
pub mod queue;
pub mod session;
pub mod workflow;

pub use flashdeck_core::Clock;

pub use api::{BackendConfig, HttpBackend, LearnBackend};
pub use error::{ApiError, SessionError};
pub use events::{NullObserver, SessionEvent, SessionObserver};
pub use queue::LearnQueue;
pub use session::{AppliedRating, LearningSession};
pub use workflow::{DEFAULT_FETCH_TIMEOUT, LearnLoopService, RatingOutcome};
