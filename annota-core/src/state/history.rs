//! # History
//!
//! Snapshot-based undo. Each entry on the undo stack is the full state *after* an edit, so
//! undoing pops the top and restores whatever is left beneath it. Snapshots own deep copies, so
//! mutating the live state never reaches back into history.

/// Default cap on undo depth.
pub const DEFAULT_LIMIT: usize = 50;

/// What to restore after an undo or redo.
#[derive(Clone, PartialEq, Debug)]
pub enum Restore<T> {
    State(T),
    /// History ran out, go back to the empty default.
    Empty,
}

#[derive(Clone, Debug)]
pub struct SnapshotHistory<T: Clone> {
    undo: std::collections::VecDeque<T>,
    redo: Vec<T>,
    limit: usize,
}
impl<T: Clone> Default for SnapshotHistory<T> {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}
impl<T: Clone> SnapshotHistory<T> {
    /// History keeping at most `limit` undo steps. A limit of zero records nothing.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            undo: std::collections::VecDeque::with_capacity(limit.min(DEFAULT_LIMIT) + 1),
            redo: Vec::new(),
            limit,
        }
    }
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }
    /// Record a new state. Forgets every redo step, and the oldest undo step if over the limit.
    pub fn push(&mut self, state: T) {
        self.redo.clear();
        if self.limit == 0 {
            return;
        }
        self.undo.push_back(state);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
    }
    /// Step back. `None` if there was nothing to undo.
    pub fn undo(&mut self) -> Option<Restore<T>> {
        let top = self.undo.pop_back()?;
        self.redo.push(top);
        Some(
            self.undo
                .back()
                .cloned()
                .map_or(Restore::Empty, Restore::State),
        )
    }
    /// Step forward again. `None` if there was nothing to redo.
    pub fn redo(&mut self) -> Option<Restore<T>> {
        let state = self.redo.pop()?;
        self.undo.push_back(state.clone());
        Some(Restore::State(state))
    }
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
