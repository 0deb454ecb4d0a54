//! Undo/redo history.
//!
//! ## Learning: The Command Pattern
//!
//! Every mutation of the buffer is recorded as an `Edit` that knows how to
//! reverse itself. Edits are collected into groups; one undo step reverses
//! a whole group, so a full-buffer replacement (delete everything, insert
//! the new text) is undone in one go.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// The type of edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditKind {
    /// Text was inserted
    Insert,
    /// Text was deleted
    Delete,
}

/// A single recorded edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    /// What kind of edit this is
    pub kind: EditKind,
    /// Character index where the edit occurred
    pub position: usize,
    /// The text that was inserted or deleted
    pub content: String,
}

impl Edit {
    /// Creates an insert edit.
    pub fn insert(position: usize, content: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Insert,
            position,
            content: content.into(),
        }
    }

    /// Creates a delete edit.
    pub fn delete(position: usize, content: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Delete,
            position,
            content: content.into(),
        }
    }

    /// Returns the inverse of this edit.
    pub fn inverse(&self) -> Self {
        Self {
            kind: match self.kind {
                EditKind::Insert => EditKind::Delete,
                EditKind::Delete => EditKind::Insert,
            },
            position: self.position,
            content: self.content.clone(),
        }
    }

    /// Number of characters this edit touches.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Returns true if `next` continues a run of typing started by `self`.
    ///
    /// Only single-line inserts that land right after the previous one are
    /// merged, so each line typed stays its own undo step.
    fn continues(&self, next: &Edit) -> bool {
        self.kind == EditKind::Insert
            && next.kind == EditKind::Insert
            && !self.content.contains('\n')
            && !next.content.contains('\n')
            && self.position + self.char_len() == next.position
    }
}

/// Bounded undo/redo stacks of edit groups.
///
/// ## Learning: VecDeque
///
/// The undo stack drops its oldest group once `max_size` is reached,
/// which is a pop from the front; `VecDeque` makes that O(1).
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<Vec<Edit>>,
    redo_stack: Vec<Vec<Edit>>,
    max_size: usize,
    /// Depth of open `begin_group` calls
    group_depth: usize,
    /// Set when the next push must start a fresh group
    sealed: bool,
}

impl History {
    /// Creates a new history keeping at most `max_size` undo steps.
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
            group_depth: 0,
            sealed: true,
        }
    }

    /// Records an edit, clearing the redo stack.
    pub fn push(&mut self, edit: Edit) {
        self.redo_stack.clear();

        if let Some(group) = self.undo_stack.back_mut() {
            if self.group_depth > 0 && !self.sealed {
                group.push(edit);
                return;
            }
            if !self.sealed {
                if let Some(last) = group.last_mut() {
                    if last.continues(&edit) {
                        last.content.push_str(&edit.content);
                        return;
                    }
                }
            }
        }

        self.undo_stack.push_back(vec![edit]);
        self.sealed = false;
        while self.undo_stack.len() > self.max_size {
            self.undo_stack.pop_front();
        }
    }

    /// Starts a group: every edit until the matching `end_group` is one step.
    pub fn begin_group(&mut self) {
        if self.group_depth == 0 {
            self.sealed = true;
        }
        self.group_depth += 1;
    }

    /// Ends the current group.
    pub fn end_group(&mut self) {
        self.group_depth = self.group_depth.saturating_sub(1);
        if self.group_depth == 0 {
            self.sealed = true;
        }
    }

    /// Stops the current typing run from absorbing further edits.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// Pops the most recent group for undoing.
    ///
    /// The edits come back in the order they were applied; the caller
    /// reverses them.
    pub fn undo(&mut self) -> Option<Vec<Edit>> {
        let group = self.undo_stack.pop_back()?;
        self.redo_stack.push(group.clone());
        self.sealed = true;
        Some(group)
    }

    /// Pops the most recently undone group for re-applying.
    pub fn redo(&mut self) -> Option<Vec<Edit>> {
        let group = self.redo_stack.pop()?;
        self.undo_stack.push_back(group.clone());
        self.sealed = true;
        Some(group)
    }

    /// Returns true if there are edits to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are edits to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo steps available.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Clears all history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.sealed = true;
    }
}
