//! Snapshot undo/redo history.
//!
//! Every structural mutation is preceded by a whole-document snapshot
//! pushed onto the undo stack. Undo swaps the current document onto the
//! redo stack and restores the popped snapshot; redo is symmetric. Any new
//! capture clears the redo stack, so history stays linear.
//!
//! Manual edits use **gesture batching**: the snapshot is taken when the
//! gesture begins and pushed only when it ends with a changed document, so
//! a whole drag is one undo step.

use comic_core::model::Snapshot;

/// Dual-stack history of document snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotHistory {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    /// Maximum undo depth.
    max_depth: usize,
    /// Gesture nesting depth (0 = not batching).
    gesture_depth: usize,
    /// Snapshot taken when the outermost gesture began.
    gesture_snapshot: Option<Snapshot>,
}

impl SnapshotHistory {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth.min(64)),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
            gesture_depth: 0,
            gesture_snapshot: None,
        }
    }

    /// Record `snapshot` as the state to return to. Clears redo.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Step back: `current` goes onto redo, the previous snapshot comes out.
    /// `None` (and no change) when there is nothing to undo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Step forward: `current` goes onto undo, the next snapshot comes out.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    /// Put a popped snapshot back after a failed restore, undoing the
    /// bookkeeping of the `undo` that produced it.
    pub fn revert_undo(&mut self, popped: Snapshot) {
        self.redo_stack.pop();
        self.undo_stack.push(popped);
    }

    /// Counterpart of `revert_undo` for `redo`.
    pub fn revert_redo(&mut self, popped: Snapshot) {
        self.undo_stack.pop();
        self.redo_stack.push(popped);
    }

    /// Start a gesture. Nested calls only bump the depth.
    pub fn begin_gesture(&mut self, current: Snapshot) {
        if self.gesture_depth == 0 {
            self.gesture_snapshot = Some(current);
        }
        self.gesture_depth += 1;
    }

    /// End a gesture. When the outermost gesture closes and the document
    /// differs from its starting snapshot, one undo step is recorded.
    ///
    /// Returns `true` if a step was recorded.
    pub fn end_gesture(&mut self, current: &Snapshot) -> bool {
        if self.gesture_depth == 0 {
            return false;
        }
        self.gesture_depth -= 1;
        if self.gesture_depth > 0 {
            return false;
        }
        match self.gesture_snapshot.take() {
            Some(before) if &before != current => {
                self.push(before);
                true
            }
            _ => false,
        }
    }

    /// End a gesture without a current snapshot to compare against.
    /// The outermost close records its starting snapshot unconditionally.
    pub fn force_end_gesture(&mut self) -> bool {
        if self.gesture_depth == 0 {
            return false;
        }
        self.gesture_depth -= 1;
        if self.gesture_depth > 0 {
            return false;
        }
        match self.gesture_snapshot.take() {
            Some(before) => {
                self.push(before);
                true
            }
            None => false,
        }
    }

    pub fn in_gesture(&self) -> bool {
        self.gesture_depth > 0
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.gesture_depth = 0;
        self.gesture_snapshot = None;
    }
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::new(200)
    }
}
