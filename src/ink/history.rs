use crate::ink::model::Annotation;

/// Ordered log of committed annotations plus the redo side-stack.
///
/// Insertion order is z-order: later records paint on top. `clear` moves
/// the whole log onto the redo stack as one coarse step, so a single
/// `undo` immediately afterwards restores the exact pre-clear log. Any
/// single-record `redo` dissolves that coarse group and undo/redo go back
/// to being strictly per-record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct History {
    committed: Vec<Annotation>,
    redo_stack: Vec<Annotation>,
    redo_is_clear_snapshot: bool,
}

impl History {
    /// Append a record and invalidate redo history.
    pub fn commit(&mut self, record: Annotation) {
        self.committed.push(record);
        self.redo_stack.clear();
        self.redo_is_clear_snapshot = false;
    }

    /// Returns `true` when something changed and a redraw is due.
    pub fn undo(&mut self) -> bool {
        if let Some(record) = self.committed.pop() {
            self.redo_stack.push(record);
            return true;
        }
        if self.redo_is_clear_snapshot {
            self.committed = std::mem::take(&mut self.redo_stack);
            self.redo_is_clear_snapshot = false;
            return true;
        }
        false
    }

    /// Returns `true` when something changed and a redraw is due.
    pub fn redo(&mut self) -> bool {
        let Some(record) = self.redo_stack.pop() else {
            return false;
        };
        // Taking a single record out of a clear snapshot breaks it up;
        // from here on the stack behaves per-record again.
        self.redo_is_clear_snapshot = false;
        self.committed.push(record);
        true
    }

    /// Returns `true` when something changed and a redraw is due.
    pub fn clear(&mut self) -> bool {
        if self.committed.is_empty() {
            return false;
        }
        self.redo_stack = std::mem::take(&mut self.committed);
        self.redo_is_clear_snapshot = true;
        true
    }

    pub fn records(&self) -> &[Annotation] {
        &self.committed
    }

    pub fn len(&self) -> usize {
        self.committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }
}
