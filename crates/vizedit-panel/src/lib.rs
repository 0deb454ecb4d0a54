//! # Vizedit Panel
//!
//! The floating live-editing panel.
//!
//! A [`Panel`] composes three parts for one backend session:
//! - a [`Channel`](vizedit_channel::Channel) to the backend
//! - a [`Surface`] wrapping the text-editing widget inside its own container
//! - a geometry from the layout positioner
//!
//! and exposes the `show` / `hide` / `toggle` state machine. The [`Host`]
//! is the application side: it creates panels, owns them, and lends out
//! [`VisibilityControl`] to whatever drives visibility.
//!
//! ## Learning: Explicit Ownership over Globals
//!
//! Nothing here is reachable through a global. Code that needs to flip a
//! panel is handed `&mut dyn VisibilityControl` by whoever owns the panel.

mod host;
mod panel;
mod surface;

pub use host::Host;
pub use panel::{Panel, PanelOptions, VisibilityControl};
pub use surface::{Surface, SurfaceOptions};

use vizedit_buffer::BufferError;
use vizedit_channel::ChannelError;
use vizedit_core::{ContainerId, CoreError};

/// Result type for panel operations
pub type PanelResult<T> = Result<T, PanelError>;

/// Errors surfaced by panels and hosts
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// The editing widget could not attach to its container
    #[error("Surface failed to attach to {container}: {reason}")]
    SurfaceInit {
        container: ContainerId,
        reason: String,
    },

    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Buffer error: {0}")]
    Buffer(#[from] BufferError),
}
