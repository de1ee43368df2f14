use crate::actions::Dispatch;
use crate::history::HistoryRecorder;
use crate::reducer::Reducer;
use crate::state::AppState;
use tracing::debug;

/// Owns the current state and routes every dispatch through the reducer
pub struct Store {
    state: AppState,
    reducer: Reducer,
    recorder: Option<Box<dyn HistoryRecorder>>,
}

impl Store {
    pub fn new(state: AppState, reducer: Reducer) -> Self {
        Self {
            state,
            reducer,
            recorder: None,
        }
    }

    pub fn with_recorder(mut self, recorder: impl HistoryRecorder + 'static) -> Self {
        self.recorder = Some(Box::new(recorder));
        self
    }

    pub fn set_recorder(&mut self, recorder: impl HistoryRecorder + 'static) {
        self.recorder = Some(Box::new(recorder));
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn reducer(&self) -> &Reducer {
        &self.reducer
    }

    pub fn reducer_mut(&mut self) -> &mut Reducer {
        &mut self.reducer
    }

    /// Reduce the action into the current state, recording history when asked to
    pub fn dispatch(&mut self, dispatch: impl Into<Dispatch>) -> &AppState {
        let dispatch = dispatch.into();
        self.state = self.reducer.reduce(&self.state, &dispatch.action);

        if dispatch.should_record() {
            if let Some(recorder) = self.recorder.as_mut() {
                debug!(action = dispatch.action.kind(), "Recording history");
                recorder.record(&self.state);
            }
        }

        &self.state
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("recording", &self.recorder.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{Action, UiPatch};
    use crate::history::HistoryLog;
    use crate::registry::{ComponentConfig, ComponentRegistry};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;
    use zonecraft_document::{IdGenerator, ZoneKey};

    fn store() -> (Store, Rc<RefCell<HistoryLog>>) {
        let registry = ComponentRegistry::new().with_component("Text", ComponentConfig::new());
        let reducer = Reducer::new(Arc::new(registry), IdGenerator::from_seed("s".to_string()));
        let log = Rc::new(RefCell::new(HistoryLog::new()));
        let store = Store::new(AppState::default(), reducer).with_recorder(Rc::clone(&log));
        (store, log)
    }

    #[test]
    fn test_document_actions_record_history() {
        let (mut store, log) = store();

        store.dispatch(Action::insert("Text", "root", 0));
        store.dispatch(Action::reorder("root", 0, 0));

        assert_eq!(log.borrow().len(), 2);
        assert_eq!(store.state().data.root.len(), 1);
    }

    #[test]
    fn test_ui_and_zone_actions_skip_history() {
        let (mut store, log) = store();

        store.dispatch(Action::set_ui(UiPatch::dragging(true)));
        store.dispatch(Action::RegisterZone { zone: ZoneKey::from("a:b") });
        store.dispatch(Action::UnregisterZone { zone: ZoneKey::from("a:b") });

        assert!(log.borrow().is_empty());
        assert!(store.state().ui.is_dragging);
    }

    #[test]
    fn test_record_history_flag_overrides_default() {
        let (mut store, log) = store();

        store.dispatch(Action::set_ui(UiPatch::dragging(true)).record_history(true));
        assert_eq!(log.borrow().len(), 1);

        store.dispatch(Action::insert("Text", "root", 0).record_history(false));
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(store.state().data.root.len(), 1);
    }
}
