//! Panel lifecycle events.
//!
//! ## Learning: Observer Pattern in Rust
//!
//! Instead of holding references to listeners, panels emit event values on
//! a `tokio::sync::broadcast` channel. The host (or a test) subscribes and
//! receives clones; panels never know who is listening.

use tokio::sync::broadcast;

use crate::session::SessionId;

/// Things a host may want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    /// A panel was created and its channel opened
    Created(SessionId),
    /// A panel became visible
    Shown(SessionId),
    /// A panel was hidden
    Hidden(SessionId),
    /// An inbound message changed the buffer
    ContentReplaced(SessionId),
    /// The transport went away; the channel will not recover by itself
    Disconnected(SessionId),
    /// A panel was torn down
    Destroyed(SessionId),
}

impl PanelEvent {
    /// The session the event is about.
    pub fn session(&self) -> &SessionId {
        match self {
            Self::Created(id)
            | Self::Shown(id)
            | Self::Hidden(id)
            | Self::ContentReplaced(id)
            | Self::Disconnected(id)
            | Self::Destroyed(id) => id,
        }
    }
}

/// Broadcasts panel events.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<PanelEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        // Capacity of 256 events in the buffer
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }

    /// Emits an event to all subscribers.
    pub fn emit(&self, event: PanelEvent) {
        // No receivers is fine
        let _ = self.sender.send(event);
    }

    /// Returns a receiver for all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<PanelEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Lag-tolerant wrapper around a receiver.
///
/// ## Example
///
/// ```ignore
/// let mut events = EventHandler::new(host.events());
/// while let Some(event) = events.next().await {
///     if let PanelEvent::Disconnected(id) = event {
///         // reconnect policy goes here
///     }
/// }
/// ```
pub struct EventHandler {
    receiver: broadcast::Receiver<PanelEvent>,
}

impl EventHandler {
    pub fn new(receiver: broadcast::Receiver<PanelEvent>) -> Self {
        Self { receiver }
    }

    /// Waits for the next event; `None` once every bus is gone.
    pub async fn next(&mut self) -> Option<PanelEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Event handler lagged, missed {} events", n);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
