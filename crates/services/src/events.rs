use flashdeck_core::model::{Card, SessionCounters};

/// Notifications the session manager pushes to the presentation surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A session became active with `total` due cards.
    Started { total: u32 },
    /// A card was drawn and is awaiting a rating.
    CardPresented { card: Card },
    /// The progress tally changed.
    CountersChanged(SessionCounters),
    /// The queue is exhausted or the session was torn down; the surface
    /// should leave "session active" mode.
    Ended,
    /// A session could not be started (fetch failure or timeout).
    StartFailed { reason: String },
}

/// Receiver for session events.
///
/// Implementations render the session; the manager never touches the
/// presentation surface directly, which keeps it testable with a recording
/// observer and no rendering at all.
pub trait SessionObserver: Send + Sync {
    fn on_event(&self, event: &SessionEvent);
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl SessionObserver for NullObserver {
    fn on_event(&self, _event: &SessionEvent) {}
}
