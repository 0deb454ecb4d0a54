//! Rope-backed text buffer.
//!
//! ## Why Rope?
//!
//! Scripts edited in the panel are small, but inbound updates replace the
//! whole buffer and local typing inserts in the middle of it. A rope keeps
//! both O(log n) and lets `text()` borrow when the content fits one chunk.

use ropey::Rope;
use std::borrow::Cow;
use std::ops::Range;

use crate::history::{Edit, EditKind, History};
use crate::{BufferError, BufferResult, Cursor, Position};

/// Configuration for buffer behavior
#[derive(Debug, Clone)]
pub struct BufferConfig {
    /// Maximum undo steps to keep
    pub max_history: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self { max_history: 1000 }
    }
}

/// A text buffer with undo history and a cursor.
///
/// # Thread Safety
///
/// `TextBuffer` is `Send` but not `Sync`; share it behind a lock.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    rope: Rope,
    history: History,
    cursor: Cursor,
    config: BufferConfig,
}

impl TextBuffer {
    /// Creates a new empty buffer.
    ///
    /// # Example
    /// ```
    /// use vizedit_buffer::TextBuffer;
    ///
    /// let buffer = TextBuffer::new();
    /// assert!(buffer.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_config(BufferConfig::default())
    }

    /// Creates a buffer with custom configuration.
    pub fn with_config(config: BufferConfig) -> Self {
        Self {
            rope: Rope::new(),
            history: History::new(config.max_history),
            cursor: Cursor::default(),
            config,
        }
    }

    /// Creates a buffer seeded with `text`.
    ///
    /// Seeding is not an edit: there is nothing to undo afterwards.
    pub fn seeded(text: &str, config: BufferConfig) -> Self {
        let mut buffer = Self::with_config(config);
        buffer.rope = Rope::from_str(text);
        buffer
    }

    // ==================== Text Access ====================

    /// Returns the entire text content.
    ///
    /// # Learning: Cow (Clone-on-Write)
    ///
    /// Borrows when the rope is a single chunk, allocates otherwise.
    #[inline]
    pub fn text(&self) -> Cow<'_, str> {
        self.rope.slice(..).into()
    }

    /// Returns a slice of text by character range.
    pub fn slice(&self, range: Range<usize>) -> BufferResult<Cow<'_, str>> {
        if range.start > range.end || range.end > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(range.end));
        }
        Ok(self.rope.slice(range).into())
    }

    /// Returns true if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Number of characters in the buffer.
    #[inline]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Number of lines; an empty buffer has one.
    #[inline]
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    // ==================== Mutations ====================

    /// Inserts text at a character index.
    ///
    /// # Learning: `&mut self`
    ///
    /// The borrow checker guarantees no reader sees the rope mid-insert.
    pub fn insert(&mut self, char_idx: usize, text: &str) -> BufferResult<()> {
        if char_idx > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(char_idx));
        }
        if text.is_empty() {
            return Ok(());
        }

        self.history.push(Edit::insert(char_idx, text));
        self.apply_insert(char_idx, text);
        Ok(())
    }

    /// Deletes text in a character range, returning what was removed.
    pub fn delete(&mut self, range: Range<usize>) -> BufferResult<String> {
        if range.start > range.end || range.end > self.len_chars() {
            return Err(BufferError::InvalidCharIndex(range.end));
        }
        if range.is_empty() {
            return Ok(String::new());
        }

        let deleted: String = self.rope.slice(range.clone()).into();
        self.history.push(Edit::delete(range.start, deleted.clone()));
        self.apply_delete(range);
        Ok(deleted)
    }

    /// Inserts text at the cursor and moves the cursor past it.
    pub fn type_text(&mut self, text: &str) -> BufferResult<()> {
        let at = self.cursor.offset();
        self.insert(at, text)
    }

    /// Replaces the whole buffer with `text`.
    ///
    /// Last write wins: no merging with what was there. Recorded as a
    /// single undo step; the cursor is clamped to the new length.
    /// Returns false, recording nothing, when the text is unchanged.
    pub fn replace_text(&mut self, text: &str) -> bool {
        if self.rope == text {
            return false;
        }

        self.history.begin_group();
        let old: String = self.rope.slice(..).into();
        if !old.is_empty() {
            self.history.push(Edit::delete(0, old));
        }
        if !text.is_empty() {
            self.history.push(Edit::insert(0, text));
        }
        self.history.end_group();

        let cursor = self.cursor.offset();
        self.rope = Rope::from_str(text);
        self.cursor.set(cursor, self.len_chars());
        true
    }

    fn apply_insert(&mut self, at: usize, text: &str) {
        self.rope.insert(at, text);
        self.cursor.after_insert(at, text.chars().count());
    }

    fn apply_delete(&mut self, range: Range<usize>) {
        let count = range.len();
        let at = range.start;
        self.rope.remove(range);
        self.cursor.after_delete(at, count);
    }

    fn apply(&mut self, edit: &Edit) {
        match edit.kind {
            EditKind::Insert => self.apply_insert(edit.position, &edit.content),
            EditKind::Delete => {
                let end = edit.position + edit.char_len();
                self.apply_delete(edit.position..end);
            }
        }
    }

    // ==================== Undo/Redo ====================

    /// Undoes the last step.
    ///
    /// # Learning: State Management
    ///
    /// A step is a group of edits; their inverses are applied last-first
    /// and without being recorded again.
    pub fn undo(&mut self) -> BufferResult<()> {
        let group = self.history.undo().ok_or(BufferError::NothingToUndo)?;
        for edit in group.iter().rev() {
            self.apply(&edit.inverse());
        }
        Ok(())
    }

    /// Redoes the last undone step.
    pub fn redo(&mut self) -> BufferResult<()> {
        let group = self.history.redo().ok_or(BufferError::NothingToRedo)?;
        for edit in &group {
            self.apply(edit);
        }
        Ok(())
    }

    /// Returns true if there are edits to undo.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Returns true if there are edits to redo.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ==================== Cursor ====================

    /// The cursor.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Moves the cursor to a character index, clamped to the buffer.
    pub fn set_cursor(&mut self, char_idx: usize) {
        self.history.seal();
        self.cursor.set(char_idx, self.len_chars());
    }

    /// Cursor as a line/column position.
    pub fn cursor_position(&self) -> Position {
        let offset = self.cursor.offset().min(self.len_chars());
        let line = self.rope.char_to_line(offset);
        Position::new(line, offset - self.rope.line_to_char(line))
    }

    // ==================== Position Conversion ====================

    /// Converts a line/column position to a character index.
    pub fn position_to_char_idx(&self, pos: Position) -> BufferResult<usize> {
        if pos.line >= self.len_lines() {
            return Err(BufferError::PositionOutOfBounds {
                line: pos.line,
                column: pos.column,
            });
        }

        let line_start = self.rope.line_to_char(pos.line);
        let line_len = self.rope.line(pos.line).len_chars();
        if pos.column > line_len {
            return Err(BufferError::PositionOutOfBounds {
                line: pos.line,
                column: pos.column,
            });
        }

        Ok(line_start + pos.column)
    }

    /// Returns the buffer's configuration.
    pub fn config(&self) -> &BufferConfig {
        &self.config
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TextBuffer {
    fn from(s: &str) -> Self {
        Self::seeded(s, BufferConfig::default())
    }
}

impl From<String> for TextBuffer {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_insert_and_delete() {
        let mut buffer = TextBuffer::new();
        buffer.insert(0, "Hello").unwrap();
        buffer.insert(5, ", World!").unwrap();
        assert_eq!(buffer.text(), "Hello, World!");

        let removed = buffer.delete(5..7).unwrap();
        assert_eq!(removed, ", ");
        assert_eq!(buffer.text(), "HelloWorld!");
    }

    #[test]
    fn test_out_of_bounds_insert() {
        let mut buffer = TextBuffer::from("abc");
        assert!(matches!(
            buffer.insert(10, "x"),
            Err(BufferError::InvalidCharIndex(10))
        ));
    }

    #[test]
    fn test_typing_follows_cursor() {
        let mut buffer = TextBuffer::from("x = 1");
        buffer.set_cursor(5);
        buffer.type_text("0").unwrap();
        buffer.type_text("0").unwrap();
        assert_eq!(buffer.text(), "x = 100");
        assert_eq!(buffer.cursor().offset(), 7);

        buffer.undo().unwrap();
        assert_eq!(buffer.text(), "x = 1");
    }

    #[test]
    fn test_replace_clamps_cursor() {
        let mut buffer = TextBuffer::from("a long line of text");
        buffer.set_cursor(15);
        buffer.replace_text("short");
        assert_eq!(buffer.cursor().offset(), 5);
    }

    #[test]
    fn test_replace_with_same_text_records_nothing() {
        let mut buffer = TextBuffer::from("same");
        assert!(!buffer.replace_text("same"));
        assert!(!buffer.can_undo());
        assert!(buffer.replace_text("other"));
    }

    #[test]
    fn test_cursor_position() {
        let mut buffer = TextBuffer::from("ab\ncd");
        buffer.set_cursor(4);
        assert_eq!(buffer.cursor_position(), Position::new(1, 1));
        assert_eq!(buffer.position_to_char_idx(Position::new(1, 1)).unwrap(), 4);
    }

    #[test]
    fn test_undo_on_fresh_buffer() {
        let mut buffer = TextBuffer::new();
        assert!(matches!(buffer.undo(), Err(BufferError::NothingToUndo)));
    }

    proptest! {
        #[test]
        fn replace_then_undo_restores(original in ".{0,40}", replacement in ".{0,40}") {
            let mut buffer = TextBuffer::from(original.as_str());
            buffer.replace_text(&replacement);
            prop_assert_eq!(buffer.text(), replacement.as_str());
            if original != replacement {
                buffer.undo().unwrap();
                prop_assert_eq!(buffer.text(), original.as_str());
            }
        }
    }
}
