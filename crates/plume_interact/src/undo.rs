//! Undo/redo history for geometric edits.
//!
//! A single linear stack with a cursor pointing at the most recently applied
//! action. Undo steps the cursor back, redo steps it forward, and pushing
//! while the cursor is not at the tail drops everything after it.
//!
//! ```text
//! push(A) push(B) push(C)      [A, B, C]  cursor = 2
//! undo() undo()                [A, B, C]  cursor = 0
//! redo()                       [A, B, C]  cursor = 1
//! push(D)                      [A, B, D]  cursor = 2
//! ```
//!
//! Actions only hold an [`ItemId`]. Entries whose item has since been removed
//! are dropped when undo/redo reaches them.

use std::fmt;

use plume_core::Point;

use crate::surface::{ItemId, PlotSurface};

/// Kind of edit an [`UndoAction`] reverts
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EditKind {
    /// Whole-item translation
    Move,
    /// Single control point drag
    MovePoint { handle: usize, ctrl: bool },
    /// Rotation about the item center
    Rotate,
}

/// A reversible edit.
///
/// Endpoints are kept in data coordinates and mapped to the surface only when
/// replayed, so panning or zooming in between does not skew the replay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UndoAction {
    pub item: ItemId,
    pub kind: EditKind,
    before: Point,
    after: Point,
}

impl UndoAction {
    /// Record an edit from `before` to `after`, both in surface coordinates.
    pub fn new(
        surface: &dyn PlotSurface,
        item: ItemId,
        kind: EditKind,
        before: Point,
        after: Point,
    ) -> Self {
        Self {
            item,
            kind,
            before: surface.canvas_to_axes(before),
            after: surface.canvas_to_axes(after),
        }
    }

    /// Target item is still attached to the surface
    pub fn is_valid(&self, surface: &dyn PlotSurface) -> bool {
        surface.contains_item(self.item)
    }

    fn positions(&self, surface: &dyn PlotSurface) -> (Point, Point) {
        (
            surface.axes_to_canvas(self.before),
            surface.axes_to_canvas(self.after),
        )
    }

    pub fn undo(&self, surface: &mut dyn PlotSurface) {
        let (before, after) = self.positions(surface);
        match self.kind {
            EditKind::Move => {
                surface.unselect_all();
                surface.move_shape(self.item, after, before);
            }
            EditKind::MovePoint { handle, ctrl } => {
                surface.move_point(self.item, handle, before, ctrl);
            }
            EditKind::Rotate => {
                surface.unselect_all();
                surface.rotate_shape(self.item, after, before);
            }
        }
    }

    pub fn redo(&self, surface: &mut dyn PlotSurface) {
        let (before, after) = self.positions(surface);
        match self.kind {
            EditKind::Move => {
                surface.unselect_all();
                surface.move_shape(self.item, before, after);
            }
            EditKind::MovePoint { handle, ctrl } => {
                surface.move_point(self.item, handle, after, ctrl);
            }
            EditKind::Rotate => {
                surface.unselect_all();
                surface.rotate_shape(self.item, before, after);
            }
        }
    }
}

/// Linear, truncating undo history
#[derive(Clone, Default)]
pub struct UndoStack {
    actions: Vec<UndoAction>,
    /// Index of the last applied action
    cursor: Option<usize>,
    /// Maximum retained actions (0 = unbounded)
    max_depth: usize,
}

impl fmt::Debug for UndoStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoStack")
            .field("len", &self.actions.len())
            .field("cursor", &self.cursor)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// History keeping at most `max_depth` actions; the oldest are evicted.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Index of the last applied action, `None` when everything is undone
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn actions(&self) -> &[UndoAction] {
        &self.actions
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.next_index() < self.actions.len()
    }

    fn next_index(&self) -> usize {
        self.cursor.map_or(0, |i| i + 1)
    }

    /// Append an already applied action, dropping any undone tail
    pub fn push(&mut self, action: UndoAction) {
        self.actions.truncate(self.next_index());
        self.actions.push(action);
        if self.max_depth > 0 && self.actions.len() > self.max_depth {
            let excess = self.actions.len() - self.max_depth;
            self.actions.drain(..excess);
        }
        self.cursor = Some(self.actions.len() - 1);
    }

    /// Revert the action at the cursor.
    ///
    /// Returns `false` if nothing was reverted, including when the entry
    /// pointed to a removed item and was dropped instead.
    pub fn undo(&mut self, surface: &mut dyn PlotSurface) -> bool {
        let Some(index) = self.cursor else {
            return false;
        };
        let action = self.actions[index];
        self.cursor = index.checked_sub(1);
        if !action.is_valid(surface) {
            tracing::debug!(index, "dropping undo entry for removed item");
            self.actions.remove(index);
            return false;
        }
        tracing::debug!(index, kind = ?action.kind, "undo");
        action.undo(surface);
        true
    }

    /// Re-apply the action after the cursor.
    ///
    /// A stale entry is dropped without moving the cursor, so the next call
    /// tries the entry that took its place.
    pub fn redo(&mut self, surface: &mut dyn PlotSurface) -> bool {
        let index = self.next_index();
        let Some(action) = self.actions.get(index).copied() else {
            return false;
        };
        if !action.is_valid(surface) {
            tracing::debug!(index, "dropping redo entry for removed item");
            self.actions.remove(index);
            return false;
        }
        tracing::debug!(index, kind = ?action.kind, "redo");
        action.redo(surface);
        self.cursor = Some(index);
        true
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.cursor = None;
    }
}
