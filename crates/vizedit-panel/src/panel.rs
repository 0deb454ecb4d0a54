//! The editor panel.
//!
//! ## Learning: Sharing with a Callback
//!
//! Inbound messages arrive on the channel's reader task, while `show`,
//! `hide` and local edits come from the host. Both need the surface, so it
//! lives in an `Arc<Mutex<_>>`: the handler keeps one clone, the panel the
//! other. Visibility is only ever touched by the panel, so it stays a
//! plain field and the handler applies updates whatever the state is.

use parking_lot::Mutex;
use std::sync::Arc;

use vizedit_channel::{Channel, Connector};
use vizedit_core::{
    Config, ContainerId, EventBus, Geometry, PanelEvent, SessionId, SharedDocument, Transition,
    Viewport, Visibility, compute_geometry,
};

use crate::{PanelError, PanelResult};
use crate::surface::{Surface, SurfaceOptions};

/// Everything a panel needs besides its session and text.
#[derive(Debug, Clone)]
pub struct PanelOptions {
    pub surface: SurfaceOptions,
    pub viewport: Viewport,
    /// Geometry of the visualization panel the editor sits beside
    pub sibling: Geometry,
    pub left_fraction: f64,
}

impl PanelOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            surface: SurfaceOptions::from(&config.editor),
            viewport: config.layout.viewport,
            sibling: config.layout.sibling,
            left_fraction: config.layout.left_fraction,
        }
    }
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// The narrow capability handed to menus, shortcuts and timers.
pub trait VisibilityControl {
    fn show(&mut self) -> PanelResult<()>;
    fn hide(&mut self) -> PanelResult<()>;
    fn toggle(&mut self) -> PanelResult<()>;
    fn visibility(&self) -> Visibility;
}

/// One editing session: channel, surface and visibility.
pub struct Panel {
    session: SessionId,
    channel: Arc<Channel>,
    surface: Arc<Mutex<Surface>>,
    document: SharedDocument,
    container: ContainerId,
    visibility: Visibility,
    geometry: Geometry,
    left_fraction: f64,
    events: EventBus,
    torn_down: bool,
}

impl Panel {
    /// Opens the session's channel and builds the panel around it.
    pub async fn open<C: Connector>(
        connector: &C,
        document: SharedDocument,
        session: SessionId,
        initial_text: &str,
        options: PanelOptions,
        events: EventBus,
    ) -> PanelResult<Self> {
        let channel = Channel::open(connector, session).await?;
        Self::with_channel(channel, document, initial_text, options, events)
    }

    /// Builds a panel around an open channel.
    ///
    /// Creates the container, attaches the surface, positions it and
    /// starts hidden. If any step fails the channel is closed and the
    /// container removed again.
    pub fn with_channel(
        channel: Channel,
        document: SharedDocument,
        initial_text: &str,
        options: PanelOptions,
        events: EventBus,
    ) -> PanelResult<Self> {
        let session = channel.session().clone();
        let container_id = format!("editor-{session}");
        let container = document
            .lock()
            .create_container(container_id.as_str())
            .map_err(|e| PanelError::SurfaceInit {
                container: ContainerId::new(container_id),
                reason: e.to_string(),
            })?;

        let geometry = compute_geometry(options.viewport, options.sibling, options.left_fraction);
        let surface = Surface::create(
            document.clone(),
            container.clone(),
            initial_text,
            options.surface,
        )
        .and_then(|mut surface| {
            document.lock().set_geometry(&container, geometry)?;
            surface.set_display(Visibility::Hidden.display())?;
            Ok(surface)
        });
        let surface = match surface {
            Ok(surface) => Arc::new(Mutex::new(surface)),
            Err(e) => {
                let _ = document.lock().remove(&container);
                return Err(e);
            }
        };

        let channel = Arc::new(channel);
        let inbound = surface.clone();
        let bus = events.clone();
        let id = session.clone();
        channel.on_message(move |message| {
            // Applied whatever the visibility; a hidden panel must not go stale.
            let changed = inbound.lock().set_text(&message);
            if changed {
                bus.emit(PanelEvent::ContentReplaced(id.clone()));
            }
        });
        let bus = events.clone();
        let id = session.clone();
        channel.on_disconnect(move || bus.emit(PanelEvent::Disconnected(id)));

        tracing::info!("Created editor panel for session {} in {}", session, container);
        events.emit(PanelEvent::Created(session.clone()));

        Ok(Self {
            session,
            channel,
            surface,
            document,
            container,
            visibility: Visibility::Hidden,
            geometry,
            left_fraction: options.left_fraction,
            events,
            torn_down: false,
        })
    }

    // ==================== Visibility ====================

    /// `Hidden -> Visible`; no-op when already visible.
    pub fn show(&mut self) -> PanelResult<()> {
        self.transition(Transition::Show)
    }

    /// `Visible -> Hidden`; no-op when already hidden.
    pub fn hide(&mut self) -> PanelResult<()> {
        self.transition(Transition::Hide)
    }

    /// Shows a hidden panel, hides a visible one.
    pub fn toggle(&mut self) -> PanelResult<()> {
        let concrete = self.visibility.resolve(Transition::Toggle);
        self.transition(concrete)
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Local only: the backend never hears about visibility.
    fn transition(&mut self, transition: Transition) -> PanelResult<()> {
        let next = self.visibility.apply(transition);
        if next == self.visibility {
            tracing::trace!("Panel {} already {}", self.session, next);
            return Ok(());
        }

        self.surface.lock().set_display(next.display())?;
        self.visibility = next;
        tracing::debug!("Panel {} is now {}", self.session, next);
        self.events.emit(match next {
            Visibility::Visible => PanelEvent::Shown(self.session.clone()),
            Visibility::Hidden => PanelEvent::Hidden(self.session.clone()),
        });
        Ok(())
    }

    // ==================== Content ====================

    /// Current buffer contents.
    pub fn text(&self) -> String {
        self.surface.lock().text()
    }

    /// Overwrites the buffer locally, without telling the backend.
    pub fn set_text(&self, text: &str) {
        self.surface.lock().set_text(text);
    }

    /// Runs a local edit against the widget.
    ///
    /// The surface stays locked while `f` runs, and inbound updates wait
    /// for it. `f` must not call back into this panel (`text`, `set_text`,
    /// `edit`): the lock is not reentrant and the call deadlocks.
    pub fn edit<R>(&self, f: impl FnOnce(&mut vizedit_buffer::TextBuffer) -> R) -> R {
        f(self.surface.lock().buffer_mut())
    }

    /// Sends the whole buffer to the backend as one message.
    pub fn send_content(&self) -> PanelResult<()> {
        let text = self.text();
        self.channel.send(text)?;
        Ok(())
    }

    /// Sends an arbitrary message on the session's channel.
    pub fn send(&self, message: impl Into<String>) -> PanelResult<()> {
        self.channel.send(message)?;
        Ok(())
    }

    // ==================== Session & Layout ====================

    pub fn session_id(&self) -> &SessionId {
        &self.session
    }

    /// A handle to the session's channel.
    pub fn channel(&self) -> Arc<Channel> {
        self.channel.clone()
    }

    pub fn container(&self) -> &ContainerId {
        &self.container
    }

    /// Geometry computed at creation or by the last `reposition`.
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Recomputes the geometry; panels never do this on their own.
    pub fn reposition(&mut self, viewport: Viewport, sibling: Geometry) -> PanelResult<()> {
        let geometry = compute_geometry(viewport, sibling, self.left_fraction);
        self.document.lock().set_geometry(&self.container, geometry)?;
        self.geometry = geometry;
        Ok(())
    }

    /// Runs `handler` in addition to the `Disconnected` event.
    pub fn on_disconnect<F>(&self, handler: F)
    where
        F: FnOnce(SessionId) + Send + 'static,
    {
        let bus = self.events.clone();
        let id = self.session.clone();
        self.channel.on_disconnect(move || {
            bus.emit(PanelEvent::Disconnected(id.clone()));
            handler(id);
        });
    }

    // ==================== Lifecycle ====================

    /// Closes the channel and removes the container.
    pub fn destroy(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        self.channel.close();
        if let Err(e) = self.document.lock().remove(&self.container) {
            tracing::warn!("Container for session {} already gone: {}", self.session, e);
        }
        tracing::info!("Destroyed editor panel for session {}", self.session);
        self.events.emit(PanelEvent::Destroyed(self.session.clone()));
    }
}

impl Drop for Panel {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl VisibilityControl for Panel {
    fn show(&mut self) -> PanelResult<()> {
        Panel::show(self)
    }

    fn hide(&mut self) -> PanelResult<()> {
        Panel::hide(self)
    }

    fn toggle(&mut self) -> PanelResult<()> {
        Panel::toggle(self)
    }

    fn visibility(&self) -> Visibility {
        Panel::visibility(self)
    }
}
