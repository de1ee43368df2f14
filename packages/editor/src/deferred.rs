//! # Deferred Preview Store
//!
//! Private copy of the state that absorbs speculative drag actions. Nothing
//! dispatched here reaches the canonical store until [`DeferredStore::commit`]
//! folds the accumulated actions into one.

use crate::actions::{Action, StatePatch};
use crate::merge::{merge_actions, MergeError};
use crate::reducer::Reducer;
use crate::state::AppState;
use crate::store::Store;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeferredError {
    #[error("Deferred store is not active")]
    NotActive,

    #[error("Action '{0}' cannot be deferred; only insert and move are supported")]
    Unsupported(&'static str),
}

#[derive(Debug)]
pub struct DeferredStore {
    store: Store,
    actions: Vec<Action>,
    active: bool,
}

impl DeferredStore {
    pub fn new(reducer: Reducer) -> Self {
        Self {
            store: Store::new(AppState::default(), reducer),
            actions: Vec::new(),
            active: false,
        }
    }

    /// Snapshot the canonical state and start accepting speculative actions
    pub fn start(&mut self, canonical: &AppState) {
        self.store.dispatch(Action::set(StatePatch {
            data: Some(canonical.data.clone()),
            ui: Some(canonical.ui.clone()),
        }));
        self.actions.clear();
        self.active = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Apply a speculative insert or move to the private copy
    pub fn dispatch(&mut self, action: Action) -> Result<&AppState, DeferredError> {
        if !self.active {
            return Err(DeferredError::NotActive);
        }

        if !matches!(action, Action::Insert { .. } | Action::Move { .. }) {
            return Err(DeferredError::Unsupported(action.kind()));
        }

        debug!(action = action.kind(), pending = self.actions.len() + 1, "Deferring action");
        self.store.dispatch(action.clone());
        self.actions.push(action);

        Ok(self.store.state())
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Merge everything deferred so far and deactivate
    pub fn commit(&mut self) -> Result<Option<Action>, MergeError> {
        let merged = merge_actions(&self.actions);
        self.discard();
        merged
    }

    /// Drop all speculative state
    pub fn discard(&mut self) {
        self.actions.clear();
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ComponentConfig, ComponentRegistry};
    use std::sync::Arc;
    use zonecraft_document::{Document, IdGenerator, Node, Selector};

    fn deferred() -> DeferredStore {
        let registry = ComponentRegistry::new().with_component("Text", ComponentConfig::new());
        DeferredStore::new(Reducer::new(Arc::new(registry), IdGenerator::from_seed("d".to_string())))
    }

    fn canonical() -> AppState {
        AppState::new(Document::with_root(vec![Node::new("Text", "a"), Node::new("Text", "b")]))
    }

    #[test]
    fn test_dispatch_requires_start() {
        let mut store = deferred();
        assert_eq!(
            store.dispatch(Action::insert("Text", "root", 0)).unwrap_err(),
            DeferredError::NotActive
        );
    }

    #[test]
    fn test_rejects_non_speculative_actions() {
        let mut store = deferred();
        store.start(&canonical());

        assert_eq!(
            store.dispatch(Action::remove("root", 0)).unwrap_err(),
            DeferredError::Unsupported("remove")
        );
        assert!(store.actions().is_empty());
    }

    #[test]
    fn test_speculative_moves_do_not_touch_canonical() {
        let canonical = canonical();
        let mut store = deferred();
        store.start(&canonical);

        store
            .dispatch(Action::move_to(Selector::new("root", 0), Selector::new("root", 1)))
            .unwrap();

        assert_eq!(store.state().data.root[0].id, "b");
        assert_eq!(canonical.data.root[0].id, "a");

        let merged = store.commit().unwrap();
        assert_eq!(
            merged,
            Some(Action::move_to(Selector::new("root", 0), Selector::new("root", 1)))
        );
        assert!(!store.is_active());
        assert!(store.actions().is_empty());
    }

    #[test]
    fn test_restart_resets_snapshot() {
        let mut store = deferred();
        store.start(&canonical());
        store.dispatch(Action::insert("Text", "root", 0)).unwrap();
        assert_eq!(store.state().data.root.len(), 3);

        store.start(&canonical());
        assert_eq!(store.state().data.root.len(), 2);
        assert!(store.actions().is_empty());
    }
}
