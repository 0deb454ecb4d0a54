//! Editor surface adapter.
//!
//! Wraps the text-editing widget (`TextBuffer`) and binds it to one
//! container of the document. Hiding and showing only touch the
//! container's `display`; the buffer, its undo history and the cursor are
//! left alone, so editing picks up where it left off.

use vizedit_buffer::{BufferConfig, TextBuffer};
use vizedit_core::config::EditorConfig;
use vizedit_core::{ContainerId, Display, SharedDocument};

use crate::{PanelError, PanelResult};

/// Widget settings applied at creation.
#[derive(Debug, Clone)]
pub struct SurfaceOptions {
    /// Theme name passed through to the renderer
    pub theme: String,
    /// Language mode passed through to the renderer
    pub mode: String,
    pub undo_limit: usize,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self::from(&EditorConfig::default())
    }
}

impl From<&EditorConfig> for SurfaceOptions {
    fn from(config: &EditorConfig) -> Self {
        Self {
            theme: config.theme.clone(),
            mode: config.mode.clone(),
            undo_limit: config.undo_limit,
        }
    }
}

/// The editing widget living in one container.
pub struct Surface {
    document: SharedDocument,
    container: ContainerId,
    buffer: TextBuffer,
    options: SurfaceOptions,
    display: Display,
}

impl Surface {
    /// Attaches a new widget to `container`, seeded with `initial_text`.
    ///
    /// Fails with [`PanelError::SurfaceInit`] if the container is missing
    /// or already hosts a surface.
    pub fn create(
        document: SharedDocument,
        container: ContainerId,
        initial_text: &str,
        options: SurfaceOptions,
    ) -> PanelResult<Self> {
        let display = {
            let mut doc = document.lock();
            doc.attach(&container)
                .map_err(|e| PanelError::SurfaceInit {
                    container: container.clone(),
                    reason: e.to_string(),
                })?;
            doc.get(&container).map(|c| c.display).unwrap_or_default()
        };

        let buffer = TextBuffer::seeded(
            initial_text,
            BufferConfig {
                max_history: options.undo_limit,
            },
        );
        tracing::debug!(
            "Attached surface to {} (theme {}, mode {})",
            container,
            options.theme,
            options.mode
        );

        Ok(Self {
            document,
            container,
            buffer,
            options,
            display,
        })
    }

    /// Current buffer contents.
    pub fn text(&self) -> String {
        self.buffer.text().into_owned()
    }

    /// Overwrites the buffer. Last write wins.
    ///
    /// Returns false when the buffer already held `text`.
    pub fn set_text(&mut self, text: &str) -> bool {
        self.buffer.replace_text(text)
    }

    /// Shows or hides the widget without touching its editing state.
    pub fn set_display(&mut self, display: Display) -> PanelResult<()> {
        self.document.lock().set_display(&self.container, display)?;
        self.display = display;
        Ok(())
    }

    pub fn display(&self) -> Display {
        self.display
    }

    pub fn container(&self) -> &ContainerId {
        &self.container
    }

    pub fn options(&self) -> &SurfaceOptions {
        &self.options
    }

    /// The wrapped widget, for reads.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// The wrapped widget, for local edits.
    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vizedit_core::Document;

    fn surface(text: &str) -> (SharedDocument, Surface) {
        let document = Document::shared();
        let id = document.lock().create_container("editor-s1").unwrap();
        let surface = Surface::create(document.clone(), id, text, SurfaceOptions::default()).unwrap();
        (document, surface)
    }

    #[test]
    fn test_create_seeds_text() {
        let (_doc, surface) = surface("x = 1");
        assert_eq!(surface.text(), "x = 1");
        assert_eq!(surface.options().mode, "python");
        assert!(!surface.buffer().can_undo());
    }

    #[test]
    fn test_missing_container_fails() {
        let document = Document::shared();
        let result = Surface::create(
            document,
            ContainerId::new("nowhere"),
            "",
            SurfaceOptions::default(),
        );
        assert!(matches!(result, Err(PanelError::SurfaceInit { .. })));
    }

    #[test]
    fn test_container_hosts_one_surface() {
        let (document, surface) = surface("");
        let again = Surface::create(
            document,
            surface.container().clone(),
            "",
            SurfaceOptions::default(),
        );
        assert!(matches!(again, Err(PanelError::SurfaceInit { .. })));
    }

    #[test]
    fn test_set_text_round_trips_while_hidden() {
        let (document, mut surface) = surface("x = 1");
        surface.set_display(Display::None).unwrap();
        surface.set_text("y = 2");
        assert_eq!(surface.text(), "y = 2");
        assert_eq!(
            document.lock().get(surface.container()).unwrap().display,
            Display::None
        );
    }

    #[test]
    fn test_hide_show_keeps_history_and_cursor() {
        let (_doc, mut surface) = surface("x = 1");
        surface.buffer_mut().set_cursor(5);
        surface.buffer_mut().type_text("0").unwrap();

        surface.set_display(Display::None).unwrap();
        surface.set_display(Display::Block).unwrap();

        assert_eq!(surface.buffer().cursor().offset(), 6);
        surface.buffer_mut().undo().unwrap();
        assert_eq!(surface.text(), "x = 1");
    }
}
