//! The hosting application's side of the panel.
//!
//! The host owns the document, the connector and the event bus, and turns
//! `on_create(session, text)` into a ready panel. It also owns the
//! connection policy the channel leaves open: a bounded wait on `open`.

use tokio::sync::broadcast;

use vizedit_channel::{ChannelError, Connector};
use vizedit_core::{Config, Document, EventBus, Geometry, PanelEvent, SessionId, SharedDocument, Viewport};

use crate::panel::{Panel, PanelOptions};
use crate::PanelResult;

/// Creates panels against one backend.
pub struct Host<C: Connector> {
    connector: C,
    document: SharedDocument,
    config: Config,
    events: EventBus,
}

impl<C: Connector> Host<C> {
    /// Creates a host with a fresh document.
    pub fn new(connector: C, config: Config) -> Self {
        Self::with_document(connector, config, Document::shared())
    }

    /// Creates a host rendering into an existing document.
    pub fn with_document(connector: C, config: Config, document: SharedDocument) -> Self {
        Self {
            connector,
            document,
            config,
            events: EventBus::new(),
        }
    }

    /// Opens an editor for a script.
    ///
    /// Waits at most `channel.connect_timeout_ms` for the channel; running
    /// out of time is a [`ChannelError::Connection`]. The panel starts
    /// hidden and belongs to the caller.
    pub async fn on_create(&self, session: SessionId, initial_text: &str) -> PanelResult<Panel> {
        let timeout = self.config.channel.connect_timeout();
        let open = Panel::open(
            &self.connector,
            self.document.clone(),
            session.clone(),
            initial_text,
            PanelOptions::from_config(&self.config),
            self.events.clone(),
        );

        match tokio::time::timeout(timeout, open).await {
            Ok(panel) => panel,
            Err(_) => {
                tracing::warn!("Opening session {} timed out after {:?}", session, timeout);
                Err(ChannelError::Connection {
                    session,
                    reason: format!("timed out after {timeout:?}"),
                }
                .into())
            }
        }
    }

    /// Subscribes to events from every panel this host creates.
    pub fn events(&self) -> broadcast::Receiver<PanelEvent> {
        self.events.subscribe()
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Updates the layout used for panels created from now on.
    ///
    /// Existing panels keep their geometry until repositioned.
    pub fn set_layout(&mut self, viewport: Viewport, sibling: Geometry) {
        self.config.layout.viewport = viewport;
        self.config.layout.sibling = sibling;
    }
}
