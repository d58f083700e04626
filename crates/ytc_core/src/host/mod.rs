//! Host boundary: events in, one-line notifications out.
//!
//! The core never sees the host's API surface. It receives exactly two
//! capabilities at construction time:
//! - `EventSource`: the host's event dispatch, delivering `HostEvent`s
//! - `Notifier`: the host's one-line user-notification channel
//!
//! UI buttons map to `UiAction`s the same way; the host resolves its own
//! heat identifiers to a `RaceStart` before an event reaches the core.

use crate::models::RaceStart;

/// An event delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The host finished starting up; restore persisted state.
    Startup,
    /// A race was staged; log a chapter for it.
    RaceStaged(RaceStart),
}

/// A user action forwarded from the host's UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Set the stream start time from the raw field contents.
    SetStartTime(String),
    /// Clear the chapter log, the durable record, and all exports.
    ResetLog,
    /// Export the current log as a chapter list artifact.
    ExportChapters,
}

/// Callback the host invokes with each event.
pub type EventCallback = Box<dyn FnMut(HostEvent) + Send>;

/// Subscription capability offered by the host's event dispatch.
pub trait EventSource {
    /// Register a callback to receive every host event.
    fn subscribe(&mut self, callback: EventCallback);
}

/// One-line user-notification channel offered by the host.
pub trait Notifier: Send + Sync {
    /// Show a single-line message to the user.
    fn notify(&self, message: &str);
}

/// Notifier that routes messages to the tracing log.
///
/// Stand-in for headless hosts without a notification surface.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        tracing::info!("{}", message);
    }
}
