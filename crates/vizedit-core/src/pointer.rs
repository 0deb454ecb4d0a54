//! Pointer-exit guard.
//!
//! When the pointer leaves the browser window mid-drag, the page never
//! sees the button release and the drag sticks when the pointer comes
//! back. The guard watches `mouseout` on the root element and answers with
//! a synthetic `mouseup` on that root whenever the pointer went off-page.

use serde::{Deserialize, Serialize};

/// Node name the browser reports for the document root.
const ROOT_NODE_NAME: &str = "HTML";

/// A `mouseout` observed on the guarded root.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PointerOut {
    /// `nodeName` of the element the pointer moved to, if any
    pub related_node: Option<String>,
}

/// A synthesized event to dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntheticRelease {
    /// Element the release is dispatched on
    pub target: String,
    /// Always `mouseup`
    pub event: &'static str,
}

/// Guards one root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerExitGuard {
    root: String,
}

impl PointerExitGuard {
    /// Guards the element with DOM id `root`.
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Handles a `mouseout` on the root.
    ///
    /// Returns the release to dispatch when the pointer left the window:
    /// there is no related target, or the related target is the root
    /// `HTML` node. Moves between elements inside the page yield `None`.
    pub fn on_pointer_out(&self, event: &PointerOut) -> Option<SyntheticRelease> {
        let left_window = match event.related_node.as_deref() {
            None => true,
            Some(name) => name.eq_ignore_ascii_case(ROOT_NODE_NAME),
        };
        if !left_window {
            return None;
        }

        tracing::trace!("Pointer left the window; releasing on #{}", self.root);
        Some(SyntheticRelease {
            target: self.root.clone(),
            event: "mouseup",
        })
    }
}
