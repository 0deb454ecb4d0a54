//! # Vizedit Core
//!
//! Shared vocabulary for the live editor panel.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────── Host ─────────────────────────────┐
//! │  ┌──────────────────────── Panel ──────────────────────────┐  │
//! │  │  SessionId ──► Channel          Visibility (Hidden/..)   │  │
//! │  │                   │ inbound                               │  │
//! │  │                   ▼                                       │  │
//! │  │               Surface ──► Container in Document           │  │
//! │  │                             ▲ geometry from layout        │  │
//! │  └─────────────────────────────────────────────────────────┘  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! This crate holds the pieces every other crate agrees on: session ids,
//! the visibility state machine, the layout positioner, the document model
//! that stands in for the browser DOM, configuration and events. The
//! help-annotation table and the pointer-exit guard live here too; the
//! panel never depends on them.

pub mod config;
pub mod dom;
pub mod event;
pub mod help;
pub mod layout;
pub mod pointer;
pub mod session;
pub mod visibility;

pub use config::Config;
pub use dom::{ContainerId, Display, Document, SharedDocument};
pub use event::{EventBus, EventHandler, PanelEvent};
pub use help::{HelpEntry, HelpKind};
pub use layout::{Geometry, Viewport, compute_geometry};
pub use session::SessionId;
pub use visibility::{Transition, Visibility};

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Container not found: {0}")]
    ContainerNotFound(ContainerId),

    #[error("Container {0} already hosts a surface")]
    ContainerInUse(ContainerId),

    #[error("Container id already exists: {0}")]
    DuplicateContainer(String),

    #[error("Invalid session id: {0:?}")]
    InvalidSessionId(String),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}
