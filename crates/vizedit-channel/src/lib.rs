//! # Vizedit Channel
//!
//! The persistent link between one editor panel and its backend session.
//!
//! ## Contract
//!
//! - `Channel::open(connector, session)` connects or fails with
//!   [`ChannelError::Connection`]
//! - `send` queues a text message and returns at once; messages leave in
//!   the order they were sent
//! - `on_message` installs the single inbound handler (replacing any
//!   previous one); messages reach it one at a time, in arrival order
//! - `on_disconnect` is told, once, when the transport goes away
//! - `close` releases the transport; later sends fail with
//!   [`ChannelError::Closed`]
//!
//! Nothing reconnects automatically; that is the host's call.
//!
//! ## Learning: Normalizing Transports
//!
//! Every transport is turned into a [`Link`]: an ordered outbound queue and
//! an ordered inbound queue of text frames. `Channel` only ever sees the
//! `Link`, so the WebSocket and in-memory transports share all of the
//! ordering, handler and shutdown logic.

mod channel;
pub mod memory;
pub mod ws;

pub use channel::{Channel, Connector, Link};
pub use memory::{BackendSession, MemoryAcceptor, MemoryConnector};
pub use ws::WsConnector;

use vizedit_core::SessionId;

/// Result type for channel operations
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Errors surfaced by the channel
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    /// No transport could be reached for the session
    #[error("Could not open channel for session {session}: {reason}")]
    Connection { session: SessionId, reason: String },

    /// The channel was closed, locally or by a disconnect
    #[error("Channel for session {0} is closed")]
    Closed(SessionId),
}

impl ChannelError {
    pub(crate) fn connection(session: &SessionId, reason: impl ToString) -> Self {
        Self::Connection {
            session: session.clone(),
            reason: reason.to_string(),
        }
    }
}
