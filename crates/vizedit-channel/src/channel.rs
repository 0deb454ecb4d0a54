//! The channel itself.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Notify, mpsc};
use tokio::task::JoinHandle;

use vizedit_core::SessionId;

use crate::{ChannelError, ChannelResult};

type MessageHandler = Box<dyn FnMut(String) + Send>;
type DisconnectHandler = Box<dyn FnOnce() + Send>;

/// A connected transport, reduced to two ordered queues of text frames.
///
/// The inbound queue ending means the transport disconnected.
pub struct Link {
    pub outbound: mpsc::UnboundedSender<String>,
    pub inbound: mpsc::UnboundedReceiver<String>,
}

/// Something that can open a [`Link`] for a session.
pub trait Connector: Send + Sync {
    fn connect(&self, session: &SessionId) -> impl Future<Output = ChannelResult<Link>> + Send;
}

/// State shared with the reader task.
#[derive(Default)]
struct Slots {
    handler: Option<MessageHandler>,
    /// Messages that arrived while no handler was installed
    pending: VecDeque<String>,
    on_disconnect: Option<DisconnectHandler>,
    /// Set once by `close` or a disconnect
    closed: bool,
    disconnected: bool,
}

struct Shared {
    slots: Mutex<Slots>,
    handler_installed: Notify,
}

impl Shared {
    /// Hands queued messages to the handler, one at a time.
    ///
    /// The handler runs outside the lock, so it may call back into the
    /// channel (replace itself, send, close).
    fn deliver(&self) {
        loop {
            let (mut handler, message) = {
                let mut slots = self.slots.lock();
                if slots.closed && !slots.disconnected {
                    return;
                }
                let Some(handler) = slots.handler.take() else {
                    return;
                };
                match slots.pending.pop_front() {
                    Some(message) => (handler, message),
                    None => {
                        slots.handler = Some(handler);
                        return;
                    }
                }
            };

            handler(message);

            let mut slots = self.slots.lock();
            if slots.closed && !slots.disconnected {
                // Closed while the handler ran; let it drop.
                return;
            }
            // A replacement installed from inside the handler wins.
            if slots.handler.is_none() {
                slots.handler = Some(handler);
            }
        }
    }
}

/// A persistent bidirectional link for one session.
///
/// Must be opened inside a tokio runtime: a reader task delivers inbound
/// messages to the registered handler.
pub struct Channel {
    session: SessionId,
    outbound: Mutex<Option<mpsc::UnboundedSender<String>>>,
    shared: Arc<Shared>,
    reader: JoinHandle<()>,
}

impl Channel {
    /// Opens the channel for `session`.
    ///
    /// Fails with [`ChannelError::Connection`] when the connector can't
    /// reach a transport. There is no timeout here; wrap the call in one
    /// if a bounded wait is needed.
    pub async fn open<C: Connector>(connector: &C, session: SessionId) -> ChannelResult<Self> {
        let link = connector.connect(&session).await?;
        tracing::info!("Opened channel for session {}", session);
        Ok(Self::from_link(session, link))
    }

    /// Wraps an already-connected link.
    pub fn from_link(session: SessionId, link: Link) -> Self {
        let shared = Arc::new(Shared {
            slots: Mutex::new(Slots::default()),
            handler_installed: Notify::new(),
        });
        let reader = tokio::spawn(read_loop(session.clone(), link.inbound, shared.clone()));

        Self {
            session,
            outbound: Mutex::new(Some(link.outbound)),
            shared,
            reader,
        }
    }

    /// The session this channel is addressed to.
    pub fn session(&self) -> &SessionId {
        &self.session
    }

    /// Queues a message for the backend.
    ///
    /// Returns as soon as the message is queued. Fails with
    /// [`ChannelError::Closed`] after `close` or a disconnect.
    pub fn send(&self, message: impl Into<String>) -> ChannelResult<()> {
        if self.shared.slots.lock().closed {
            return Err(ChannelError::Closed(self.session.clone()));
        }
        let outbound = self.outbound.lock();
        let sender = outbound
            .as_ref()
            .ok_or_else(|| ChannelError::Closed(self.session.clone()))?;
        let message = message.into();
        tracing::trace!("-> {} ({} bytes)", self.session, message.len());
        sender
            .send(message)
            .map_err(|_| ChannelError::Closed(self.session.clone()))
    }

    /// Installs the inbound handler, replacing the previous one.
    ///
    /// Messages that arrived before any handler was installed are handed
    /// to this one first, in order, even if the transport has gone since.
    pub fn on_message<F>(&self, handler: F)
    where
        F: FnMut(String) + Send + 'static,
    {
        let disconnected = {
            let mut slots = self.shared.slots.lock();
            slots.handler = Some(Box::new(handler));
            slots.disconnected
        };
        if disconnected {
            // The reader task is gone; drain what it left behind here.
            self.shared.deliver();
        } else {
            self.shared.handler_installed.notify_one();
        }
    }

    /// Installs the callback run once when the transport disconnects.
    ///
    /// A local `close` is not a disconnect. If the transport is already
    /// gone the callback runs immediately.
    pub fn on_disconnect<F>(&self, handler: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut slots = self.shared.slots.lock();
        if slots.disconnected {
            drop(slots);
            handler();
        } else {
            slots.on_disconnect = Some(Box::new(handler));
        }
    }

    /// Releases the transport. Idempotent.
    ///
    /// Queued sends that have not left yet are abandoned.
    pub fn close(&self) {
        {
            let mut slots = self.shared.slots.lock();
            if slots.closed {
                return;
            }
            slots.closed = true;
            slots.handler = None;
            slots.on_disconnect = None;
            slots.pending.clear();
        }
        self.outbound.lock().take();
        self.reader.abort();
        tracing::info!("Closed channel for session {}", self.session);
    }

    /// True after `close` or a disconnect.
    pub fn is_closed(&self) -> bool {
        self.shared.slots.lock().closed
    }
}

impl Drop for Channel {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("session", &self.session)
            .field("closed", &self.is_closed())
            .finish()
    }
}

async fn read_loop(
    session: SessionId,
    mut inbound: mpsc::UnboundedReceiver<String>,
    shared: Arc<Shared>,
) {
    loop {
        tokio::select! {
            message = inbound.recv() => match message {
                Some(message) => {
                    tracing::trace!("<- {} ({} bytes)", session, message.len());
                    shared.slots.lock().pending.push_back(message);
                    shared.deliver();
                }
                None => break,
            },
            _ = shared.handler_installed.notified() => shared.deliver(),
        }
    }

    let on_disconnect = {
        let mut slots = shared.slots.lock();
        if slots.closed {
            return;
        }
        slots.closed = true;
        slots.disconnected = true;
        slots.on_disconnect.take()
    };
    tracing::warn!("Channel for session {} disconnected", session);
    // A handler installed just before the hangup still gets the backlog.
    shared.deliver();
    if let Some(on_disconnect) = on_disconnect {
        on_disconnect();
    }
}
