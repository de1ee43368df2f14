//! # History
//!
//! Recording hook invoked by the store after every history-worthy dispatch.
//!
//! ## Design
//!
//! - The store hands the recorder the post-action state
//! - Which actions record is decided by the action and its `recordHistory` flag
//! - [`HistoryLog`] is a bounded snapshot log; the oldest entries go first
//! - Undo/redo is left to the host; the log only keeps what was recorded

use crate::config::EditorConfig;
use crate::state::AppState;
use std::cell::RefCell;
use std::rc::Rc;

/// Receives a snapshot of the state after each recorded dispatch
pub trait HistoryRecorder {
    fn record(&mut self, state: &AppState);
}

/// Adapts a closure into a [`HistoryRecorder`]
pub struct RecordFn<F>(pub F);

impl<F: FnMut(&AppState)> HistoryRecorder for RecordFn<F> {
    fn record(&mut self, state: &AppState) {
        (self.0)(state)
    }
}

/// Shared recorder, so the host can read the log while the store writes to it
impl<R: HistoryRecorder> HistoryRecorder for Rc<RefCell<R>> {
    fn record(&mut self, state: &AppState) {
        self.borrow_mut().record(state)
    }
}

/// Bounded log of recorded states
#[derive(Debug, Clone)]
pub struct HistoryLog {
    /// Recorded states (most recent last)
    entries: Vec<AppState>,

    /// Maximum number of entries kept (0 = unlimited)
    max_levels: usize,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_levels,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::with_max_levels(config.history_limit)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&AppState> {
        self.entries.last()
    }

    pub fn entries(&self) -> &[AppState] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl HistoryRecorder for HistoryLog {
    fn record(&mut self, state: &AppState) {
        self.entries.push(state.clone());

        if self.max_levels > 0 && self.entries.len() > self.max_levels {
            self.entries.remove(0);
        }
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonecraft_document::{Document, Node};

    fn state_with(id: &str) -> AppState {
        AppState::new(Document::with_root(vec![Node::new("Text", id)]))
    }

    #[test]
    fn test_history_log_creation() {
        let log = HistoryLog::new();
        assert!(log.is_empty());
        assert!(log.latest().is_none());
    }

    #[test]
    fn test_max_levels_enforced() {
        let mut log = HistoryLog::with_max_levels(2);

        for i in 0..3 {
            log.record(&state_with(&format!("n{}", i)));
        }

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].data.root[0].id, "n1");
        assert_eq!(log.latest().unwrap().data.root[0].id, "n2");
    }

    #[test]
    fn test_unlimited_log() {
        let mut log = HistoryLog::with_max_levels(0);
        for _ in 0..150 {
            log.record(&AppState::default());
        }
        assert_eq!(log.len(), 150);

        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_shared_and_closure_recorders() {
        let shared = Rc::new(RefCell::new(HistoryLog::new()));
        let mut handle = Rc::clone(&shared);
        handle.record(&state_with("a"));
        assert_eq!(shared.borrow().len(), 1);

        let mut count = 0;
        {
            let mut recorder = RecordFn(|_: &AppState| count += 1);
            recorder.record(&AppState::default());
            recorder.record(&AppState::default());
        }
        assert_eq!(count, 2);
    }
}
