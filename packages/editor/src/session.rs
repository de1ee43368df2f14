//! # Edit Session
//!
//! One editor instance: the canonical store, the zone/path registry rebuilt
//! by the mount pass, the active drag (if any) and post-drop selections that
//! are still waiting for their delay to elapse.
//!
//! Everything the session needs is injected at construction; nothing is
//! shared through globals.

use crate::actions::{Action, Dispatch, UiPatch};
use crate::canvas::{self, CanvasZone};
use crate::config::EditorConfig;
use crate::drag::{DragItem, DragPhase, DragSession, DragSource, HoverOutcome};
use crate::history::HistoryRecorder;
use crate::hover::DropTarget;
use crate::listeners::{DragEvent, DragEventKind, DragListeners};
use crate::path_registry::PathRegistry;
use crate::reducer::Reducer;
use crate::registry::ComponentRegistry;
use crate::state::{AppState, UiState};
use crate::store::Store;
use crate::EditorError;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use zonecraft_document::{Document, IdGenerator, Selector, ZoneKey};

/// Selection to apply once the drop animation has had time to settle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSelection {
    pub due: Instant,
    pub selector: Selector,
}

pub struct EditSession {
    /// Unique session identifier
    pub id: String,

    config: EditorConfig,
    store: Store,
    paths: PathRegistry,
    drag: Option<DragSession>,
    listeners: DragListeners,

    /// Scheduled selections, oldest first
    pending_selections: Vec<PendingSelection>,
}

impl EditSession {
    pub fn new(
        id: impl Into<String>,
        document: Document,
        registry: ComponentRegistry,
        config: EditorConfig,
    ) -> Self {
        let id = id.into();
        let reducer = Reducer::new(Arc::new(registry), IdGenerator::new(&config.id_namespace));

        info!(session = %id, nodes = document.node_count(), "Edit session created");

        Self {
            id,
            config,
            store: Store::new(AppState::new(document), reducer),
            paths: PathRegistry::new(),
            drag: None,
            listeners: DragListeners::new(),
            pending_selections: Vec::new(),
        }
    }

    /// Load the persisted document format
    pub fn from_json(
        id: impl Into<String>,
        source: &str,
        registry: ComponentRegistry,
        config: EditorConfig,
    ) -> Result<Self, EditorError> {
        let document = zonecraft_document::from_json(source)?;
        document.validate()?;
        Ok(Self::new(id, document, registry, config))
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(zonecraft_document::to_json(self.document())?)
    }

    pub fn with_recorder(mut self, recorder: impl HistoryRecorder + 'static) -> Self {
        self.store.set_recorder(recorder);
        self
    }

    /// Subscribe to one kind of drag event
    pub fn on_drag(&mut self, kind: DragEventKind, listener: impl FnMut(&DragEvent<'_>) + 'static) {
        self.listeners.on(kind, listener);
    }

    pub fn listeners_mut(&mut self) -> &mut DragListeners {
        &mut self.listeners
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn registry(&self) -> &ComponentRegistry {
        self.store.reducer().registry()
    }

    /// Canonical state
    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn document(&self) -> &Document {
        &self.store.state().data
    }

    pub fn ui(&self) -> &UiState {
        &self.store.state().ui
    }

    pub fn paths(&self) -> &PathRegistry {
        &self.paths
    }

    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn pending_selections(&self) -> &[PendingSelection] {
        &self.pending_selections
    }

    /// State the canvas shows: the deferred copy while an existing node is dragged
    pub fn rendered_state(&self) -> &AppState {
        match &self.drag {
            Some(drag) if drag.phase() == DragPhase::DraggingExisting => drag.deferred_state(),
            _ => self.store.state(),
        }
    }

    /// Dispatch against the canonical store, keeping the zone table in sync
    pub fn dispatch(&mut self, dispatch: impl Into<Dispatch>) -> &AppState {
        let dispatch = dispatch.into();

        match &dispatch.action {
            Action::RegisterZone { zone } => {
                let priority = self.zone_priority(zone);
                let rules = self
                    .store
                    .reducer()
                    .registry()
                    .zone_rules(zone, &self.store.state().data);
                self.paths.register_zone(zone.clone(), priority, rules);
            }
            Action::UnregisterZone { zone } => self.paths.unregister_zone(zone),
            _ => {}
        }

        self.store.dispatch(dispatch)
    }

    fn zone_priority(&self, zone: &ZoneKey) -> u32 {
        let root = self.config.root_collision_priority;
        if zone.is_root() {
            return root;
        }

        let depth = self
            .paths
            .path(zone.area())
            .map(|data| data.path.len())
            .unwrap_or(1);
        root + depth as u32
    }

    /// Rebuild the path registry from the rendered state and return the canvas tree
    #[instrument(skip(self), fields(session = %self.id))]
    pub fn mount(&mut self) -> CanvasZone {
        self.paths.clear();

        let state = match &self.drag {
            Some(drag) if drag.phase() == DragPhase::DraggingExisting => drag.deferred_state(),
            _ => self.store.state(),
        };

        canvas::mount(
            &state.data,
            self.store.reducer().registry(),
            &mut self.paths,
            self.config.root_collision_priority,
        )
    }

    /// Begin dragging a palette item or an existing node
    pub fn drag_start(&mut self, item: &DragItem) -> Result<(), EditorError> {
        if self.drag.is_some() {
            self.drag_cancel();
        }

        let source = DragSource::from_sensor(item, self.document())?;
        if let DragSource::New { component_type, .. } = &source {
            if self.registry().get(component_type).is_none() {
                warn!(session = %self.id, component_type = %component_type, "Rejected drag of unknown component");
                return Err(EditorError::UnknownComponent(component_type.clone()));
            }
        }

        self.store.dispatch(Action::set_ui(
            UiPatch::selected_item(None).with_dragging(true),
        ));

        let reducer = self.store.reducer().clone();
        self.drag = Some(DragSession::start(source, self.store.state(), reducer));

        self.listeners.emit(&DragEvent::BeforeDragStart { item });
        Ok(())
    }

    /// Feed one pointer-over event to the active drag
    pub fn drag_over(&mut self, targets: &[DropTarget]) -> HoverOutcome {
        let Some(drag) = self.drag.as_mut() else {
            return HoverOutcome::Unchanged;
        };

        let outcome = drag.hover(targets, &self.paths);

        match &outcome {
            HoverOutcome::Preview(preview) => {
                self.store
                    .dispatch(Action::set_ui(UiPatch::preview(Some(preview.clone()))));
            }
            HoverOutcome::Moved(_) => {
                self.mount();
            }
            HoverOutcome::Unchanged => {}
        }

        if let Some(drag) = &self.drag {
            self.listeners.emit(&DragEvent::DragOver {
                targets,
                hovered: drag.hovered(),
                outcome: &outcome,
            });
        }

        outcome
    }

    /// Release: commit the drag as one canonical action.
    ///
    /// Returns the dispatched action; a release over no target cancels.
    pub fn drag_end(&mut self, now: Instant) -> Result<Option<Action>, EditorError> {
        let Some(mut drag) = self.drag.take() else {
            return Ok(None);
        };

        if drag.hovered().is_none() {
            debug!(session = %self.id, "Drag released over no target");
            drag.cancel();
            self.finish_cancel();
            return Ok(None);
        }

        let commit = drag.finish();
        self.reset_drag_ui();
        let commit = commit?;

        let action = commit.map(|commit| {
            self.store.dispatch(commit.action.clone());
            self.schedule_selection(commit.selection, now);
            commit.action
        });

        self.promote_placeholders();
        self.mount();

        if let Some(hovered) = drag.hovered() {
            self.listeners.emit(&DragEvent::DragEnd {
                hovered,
                action: action.as_ref(),
            });
        }

        debug!(session = %self.id, committed = action.is_some(), "Drag ended");
        Ok(action)
    }

    /// Abort the active drag without dispatching anything
    pub fn drag_cancel(&mut self) {
        let Some(mut drag) = self.drag.take() else {
            return;
        };

        drag.cancel();
        self.finish_cancel();
    }

    fn finish_cancel(&mut self) {
        self.reset_drag_ui();
        self.remove_placeholders();
        self.mount();
    }

    fn reset_drag_ui(&mut self) {
        self.store.dispatch(Action::set_ui(
            UiPatch::dragging(false).with_preview(None),
        ));
    }

    fn schedule_selection(&mut self, selector: Selector, now: Instant) {
        let delay = self.config.drop_selection_delay();

        if delay.is_zero() {
            self.store
                .dispatch(Action::set_ui(UiPatch::selected_item(Some(selector))));
        } else {
            self.pending_selections.push(PendingSelection {
                due: now + delay,
                selector,
            });
        }
    }

    /// Apply post-drop selections that are due; returns how many were applied
    pub fn tick(&mut self, now: Instant) -> usize {
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending_selections)
            .into_iter()
            .partition(|pending| pending.due <= now);
        self.pending_selections = waiting;

        for pending in &due {
            self.store.dispatch(Action::set_ui(UiPatch::selected_item(Some(
                pending.selector.clone(),
            ))));
        }

        due.len()
    }

    /// Turn leftover placeholder nodes into real nodes
    fn promote_placeholders(&mut self) {
        for selector in self.document().placeholders() {
            let Some(node) = self.document().get(&selector).cloned() else {
                continue;
            };

            let doc = self.document().clone();
            let id = self.store.reducer_mut().fresh_id(&node.component_type, &doc);
            debug!(from = %node.id, to = %id, "Promoting placeholder");
            self.store.dispatch(Action::replace(selector, node.promoted(id)));
        }
    }

    fn remove_placeholders(&mut self) {
        // Highest index first so earlier selectors stay valid
        let mut placeholders = self.document().placeholders();
        placeholders.sort_by(|a, b| b.index.cmp(&a.index));

        for selector in placeholders {
            debug!(zone = %selector.zone, index = selector.index, "Removing placeholder");
            self.store
                .dispatch(Action::remove(selector.zone, selector.index).record_history(false));
        }
    }
}

impl std::fmt::Debug for EditSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("id", &self.id)
            .field("store", &self.store)
            .field("dragging", &self.drag.is_some())
            .field("listeners", &self.listeners)
            .field("pending_selections", &self.pending_selections.len())
            .finish()
    }
}
