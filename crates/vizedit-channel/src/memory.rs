//! In-process transport.
//!
//! A [`MemoryConnector`] hands each opened session to a [`MemoryAcceptor`]
//! as a [`BackendSession`], the backend's end of the link. Used by tests
//! and by hosts that embed the backend in the same process.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;

use vizedit_core::SessionId;

use crate::channel::{Connector, Link};
use crate::{ChannelError, ChannelResult};

struct HubState {
    accepting: AtomicBool,
    incoming: mpsc::UnboundedSender<BackendSession>,
}

/// Creates a connected connector/acceptor pair.
pub fn hub() -> (MemoryConnector, MemoryAcceptor) {
    let (incoming, sessions) = mpsc::unbounded_channel();
    let state = Arc::new(HubState {
        accepting: AtomicBool::new(true),
        incoming,
    });
    (
        MemoryConnector {
            state: state.clone(),
        },
        MemoryAcceptor { state, sessions },
    )
}

/// Client side of the hub.
#[derive(Clone)]
pub struct MemoryConnector {
    state: Arc<HubState>,
}

impl MemoryConnector {
    /// A connector with nothing listening; every open fails.
    pub fn unreachable() -> Self {
        let (connector, acceptor) = hub();
        drop(acceptor);
        connector
    }
}

impl Connector for MemoryConnector {
    async fn connect(&self, session: &SessionId) -> ChannelResult<Link> {
        if !self.state.accepting.load(Ordering::Acquire) {
            return Err(ChannelError::connection(session, "backend is not accepting"));
        }

        let (to_backend, from_client) = mpsc::unbounded_channel();
        let (to_client, from_backend) = mpsc::unbounded_channel();
        let backend = BackendSession {
            session: session.clone(),
            to_client: Some(to_client),
            from_client,
        };
        self.state
            .incoming
            .send(backend)
            .map_err(|_| ChannelError::connection(session, "backend is gone"))?;

        Ok(Link {
            outbound: to_backend,
            inbound: from_backend,
        })
    }
}

/// Backend side of the hub.
pub struct MemoryAcceptor {
    state: Arc<HubState>,
    sessions: mpsc::UnboundedReceiver<BackendSession>,
}

impl MemoryAcceptor {
    /// Waits for the next session to be opened.
    pub async fn accept(&mut self) -> Option<BackendSession> {
        self.sessions.recv().await
    }

    /// Refuses every later open.
    pub fn shutdown(&self) {
        self.state.accepting.store(false, Ordering::Release);
    }
}

impl Drop for MemoryAcceptor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// The backend's end of one session.
pub struct BackendSession {
    session: SessionId,
    to_client: Option<mpsc::UnboundedSender<String>>,
    from_client: mpsc::UnboundedReceiver<String>,
}

impl BackendSession {
    pub fn session(&self) -> &SessionId {
        &self.session
    }

    /// Pushes a message to the client. False if the client has gone.
    pub fn send(&self, message: impl Into<String>) -> bool {
        self.to_client
            .as_ref()
            .is_some_and(|tx| tx.send(message.into()).is_ok())
    }

    /// Next message from the client; `None` once the client closed.
    pub async fn recv(&mut self) -> Option<String> {
        self.from_client.recv().await
    }

    /// Drops the link from the backend side; the client sees a disconnect.
    pub fn hang_up(&mut self) {
        self.to_client.take();
    }
}
