//! # Vizedit Buffer
//!
//! The text-editing widget that an editor surface wraps.
//!
//! The buffer owns three pieces of editing state that must survive the
//! panel being hidden and shown again:
//! - the text itself (a rope)
//! - the undo/redo history
//! - the cursor
//!
//! ## Learning: Ownership & Borrowing
//!
//! - `TextBuffer` owns the rope and the history
//! - `text()` hands out a borrowed `Cow<str>` where it can
//! - Every mutation takes `&mut self`, so nothing can observe a half-applied edit

mod buffer;
mod cursor;
mod history;

pub use buffer::{BufferConfig, TextBuffer};
pub use cursor::{Cursor, Position};
pub use history::{Edit, EditKind, History};

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during buffer operations
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("Position {line}:{column} is out of bounds")]
    PositionOutOfBounds { line: usize, column: usize },

    #[error("Invalid character index: {0}")]
    InvalidCharIndex(usize),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_creation() {
        let buffer = TextBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len_chars(), 0);
        assert!(!buffer.can_undo());
    }

    #[test]
    fn test_seeded_buffer_has_no_history() {
        let buffer = TextBuffer::from("x = 1");
        assert_eq!(buffer.text(), "x = 1");
        assert!(!buffer.can_undo());
    }

    #[test]
    fn test_replace_text_is_one_undo_step() {
        let mut buffer = TextBuffer::from("x = 1");
        buffer.replace_text("y = 2");
        assert_eq!(buffer.text(), "y = 2");

        buffer.undo().unwrap();
        assert_eq!(buffer.text(), "x = 1");

        buffer.redo().unwrap();
        assert_eq!(buffer.text(), "y = 2");
    }
}
