//! Cursor and position types.
//!
//! ## Learning: Newtype Pattern
//!
//! `Position` names its fields instead of being a `(usize, usize)`, so
//! line and column can't be swapped by accident.

use serde::{Deserialize, Serialize};

/// A line/column position in the buffer, both 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Line number
    pub line: usize,
    /// Column, in characters not bytes
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Position at the start of the document.
    pub const ZERO: Position = Position { line: 0, column: 0 };
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 1-indexed for user-facing output
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// The insertion point, stored as a character index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    offset: usize,
}

impl Cursor {
    /// Creates a cursor at a character index.
    pub fn at(offset: usize) -> Self {
        Self { offset }
    }

    /// Character index of the cursor.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Moves the cursor, clamping to `len`.
    pub fn set(&mut self, offset: usize, len: usize) {
        self.offset = offset.min(len);
    }

    /// Shifts the cursor to account for `count` characters inserted at `at`.
    pub fn after_insert(&mut self, at: usize, count: usize) {
        if at <= self.offset {
            self.offset += count;
        }
    }

    /// Shifts the cursor to account for `count` characters removed at `at`.
    pub fn after_delete(&mut self, at: usize, count: usize) {
        if self.offset > at {
            self.offset = at.max(self.offset.saturating_sub(count));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new(0, 4).to_string(), "1:5");
    }

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(0, 9) < Position::new(1, 0));
        assert!(Position::new(2, 1) > Position::new(2, 0));
    }

    #[test]
    fn test_cursor_tracks_edits() {
        let mut cursor = Cursor::at(5);
        cursor.after_insert(2, 3);
        assert_eq!(cursor.offset(), 8);

        cursor.after_insert(9, 3);
        assert_eq!(cursor.offset(), 8);

        cursor.after_delete(6, 10);
        assert_eq!(cursor.offset(), 6);

        cursor.after_delete(0, 2);
        assert_eq!(cursor.offset(), 4);
    }

    #[test]
    fn test_cursor_clamps() {
        let mut cursor = Cursor::default();
        cursor.set(42, 10);
        assert_eq!(cursor.offset(), 10);
    }
}
