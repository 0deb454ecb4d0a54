//! The document model the panel renders into.
//!
//! ## Learning: Host-driven UI
//!
//! The panel never touches a real browser. It mutates this model: a set of
//! containers, each with a CSS `display` and a geometry. An embedding
//! layer mirrors the model into the page; tests read it directly.
//!
//! Each container can host at most one surface, and only the panel that
//! claimed it may release it.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::layout::Geometry;
use crate::{CoreError, CoreResult};

/// A document shared between the host and every panel it creates.
pub type SharedDocument = Arc<Mutex<Document>>;

/// Identifier of a container element (its DOM `id`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContainerId(String);

impl ContainerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContainerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// CSS `display` values the panel uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    #[default]
    Block,
    None,
}

impl Display {
    /// The CSS keyword.
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::None => "none",
        }
    }
}

/// State of one container element.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Container {
    pub display: Display,
    pub geometry: Option<Geometry>,
    /// Whether a surface is attached
    pub occupied: bool,
}

/// All containers currently in the page.
#[derive(Debug, Default)]
pub struct Document {
    containers: BTreeMap<ContainerId, Container>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a new document for sharing.
    pub fn shared() -> SharedDocument {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Appends a container to the body.
    pub fn create_container(&mut self, id: impl Into<String>) -> CoreResult<ContainerId> {
        let id = ContainerId::new(id);
        if self.containers.contains_key(&id) {
            return Err(CoreError::DuplicateContainer(id.0));
        }
        tracing::debug!("Created container {}", id);
        self.containers.insert(id.clone(), Container::default());
        Ok(id)
    }

    /// Claims a container for a surface.
    pub fn attach(&mut self, id: &ContainerId) -> CoreResult<()> {
        let container = self.container_mut(id)?;
        if container.occupied {
            return Err(CoreError::ContainerInUse(id.clone()));
        }
        container.occupied = true;
        Ok(())
    }

    /// Removes a container and whatever it hosts.
    pub fn remove(&mut self, id: &ContainerId) -> CoreResult<Container> {
        let removed = self
            .containers
            .remove(id)
            .ok_or_else(|| CoreError::ContainerNotFound(id.clone()))?;
        tracing::debug!("Removed container {}", id);
        Ok(removed)
    }

    pub fn set_display(&mut self, id: &ContainerId, display: Display) -> CoreResult<()> {
        self.container_mut(id)?.display = display;
        Ok(())
    }

    pub fn set_geometry(&mut self, id: &ContainerId, geometry: Geometry) -> CoreResult<()> {
        self.container_mut(id)?.geometry = Some(geometry);
        Ok(())
    }

    pub fn get(&self, id: &ContainerId) -> Option<&Container> {
        self.containers.get(id)
    }

    pub fn contains(&self, id: &ContainerId) -> bool {
        self.containers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    fn container_mut(&mut self, id: &ContainerId) -> CoreResult<&mut Container> {
        self.containers
            .get_mut(id)
            .ok_or_else(|| CoreError::ContainerNotFound(id.clone()))
    }
}
