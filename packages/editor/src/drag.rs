//! # Drag Session
//!
//! ```text
//!            start(palette item)            finish
//!   idle ───────────────────────▶ DraggingNew ──────┐
//!     │                                              ▼
//!     │     start(existing node)               Committing ──▶ idle
//!     └─────────────────────────▶ DraggingExisting ─┘
//!                                      │
//!                   cancel ◀───────────┘ (either dragging phase)
//! ```
//!
//! New items only ever touch the UI preview. Existing nodes are moved
//! speculatively inside the session's [`DeferredStore`]; the canonical state
//! sees a single merged action at commit.

use crate::actions::Action;
use crate::deferred::DeferredStore;
use crate::errors::EditorError;
use crate::hover::{resolve_hover, Dragged, DropTarget, HoverTarget};
use crate::merge::MergeError;
use crate::path_registry::PathRegistry;
use crate::reducer::Reducer;
use crate::state::{AppState, Preview};
use serde::{Deserialize, Serialize};
use tracing::debug;
use zonecraft_document::{Document, Selector, ZoneKey};

/// `type` of drag sources coming from the component palette
pub const DRAWER_SOURCE: &str = "drawer";

/// Payload attached to a draggable by the pointer sensor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceData {
    /// `"drawer"` for palette items, otherwise the node id
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,

    #[serde(default, alias = "zone", skip_serializing_if = "Option::is_none")]
    pub group: Option<ZoneKey>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragItem {
    pub id: String,
    pub data: SourceData,
}

impl DragItem {
    /// A palette item for `component_type`
    pub fn drawer(component_type: impl Into<String>) -> Self {
        let component_type = component_type.into();
        Self {
            id: component_type.clone(),
            data: SourceData {
                source_type: Some(DRAWER_SOURCE.to_string()),
                group: None,
                index: None,
                component_type: Some(component_type),
            },
        }
    }

    /// The node `id` currently at `at`
    pub fn existing(id: impl Into<String>, at: Selector) -> Self {
        let id = id.into();
        Self {
            data: SourceData {
                source_type: Some(id.clone()),
                group: Some(at.zone),
                index: Some(at.index),
                component_type: None,
            },
            id,
        }
    }

    pub fn is_drawer(&self) -> bool {
        self.data.source_type.as_deref() == Some(DRAWER_SOURCE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSource {
    New {
        component_type: String,
        id: String,
    },
    Existing {
        id: String,
        component_type: String,
        origin: Selector,
    },
}

impl DragSource {
    /// Resolve a sensor payload against the canonical document
    pub fn from_sensor(item: &DragItem, document: &Document) -> Result<Self, EditorError> {
        if item.is_drawer() {
            return Ok(DragSource::New {
                component_type: item
                    .data
                    .component_type
                    .clone()
                    .unwrap_or_else(|| item.id.clone()),
                id: item.id.clone(),
            });
        }

        // Trust the reported position only if it still holds the node
        let reported = match (&item.data.group, item.data.index) {
            (Some(zone), Some(index)) => Some(Selector::new(zone.clone(), index)),
            _ => None,
        };
        let origin = reported
            .filter(|at| document.get(at).is_some_and(|n| n.id == item.id))
            .or_else(|| document.find(&item.id))
            .ok_or_else(|| EditorError::DragSourceNotFound(item.id.clone()))?;

        let component_type = document
            .get(&origin)
            .map(|n| n.component_type.clone())
            .ok_or_else(|| EditorError::DragSourceNotFound(item.id.clone()))?;

        Ok(DragSource::Existing {
            id: item.id.clone(),
            component_type,
            origin,
        })
    }

    pub fn id(&self) -> &str {
        match self {
            DragSource::New { id, .. } | DragSource::Existing { id, .. } => id,
        }
    }

    pub fn component_type(&self) -> &str {
        match self {
            DragSource::New { component_type, .. } | DragSource::Existing { component_type, .. } => {
                component_type
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    DraggingNew,
    DraggingExisting,
    Committing,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HoverOutcome {
    /// New preview for a palette item
    Preview(Preview),
    /// The dragged node moved inside the deferred store
    Moved(Selector),
    Unchanged,
}

/// What a finished drag hands back to the canonical store
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    pub action: Action,
    /// Where the dropped item ends up
    pub selection: Selector,
}

#[derive(Debug)]
pub struct DragSession {
    source: DragSource,
    phase: DragPhase,
    hovered: Option<HoverTarget>,
    preview: Option<Preview>,
    /// Current position of an existing node inside the deferred store
    position: Option<Selector>,
    deferred: DeferredStore,
}

impl DragSession {
    /// Snapshot `canonical` and enter the matching dragging phase
    pub fn start(source: DragSource, canonical: &AppState, reducer: Reducer) -> Self {
        let mut deferred = DeferredStore::new(reducer);
        deferred.start(canonical);

        let (phase, position) = match &source {
            DragSource::New { .. } => (DragPhase::DraggingNew, None),
            DragSource::Existing { origin, .. } => (DragPhase::DraggingExisting, Some(origin.clone())),
        };

        debug!(source = source.id(), phase = ?phase, "Drag started");

        Self {
            source,
            phase,
            hovered: None,
            preview: None,
            position,
            deferred,
        }
    }

    pub fn source(&self) -> &DragSource {
        &self.source
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn hovered(&self) -> Option<&HoverTarget> {
        self.hovered.as_ref()
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn position(&self) -> Option<&Selector> {
        self.position.as_ref()
    }

    /// State to render while the drag is live
    pub fn deferred_state(&self) -> &AppState {
        self.deferred.state()
    }

    pub fn deferred_actions(&self) -> &[Action] {
        self.deferred.actions()
    }

    /// Process one pointer-over event
    pub fn hover(&mut self, targets: &[DropTarget], paths: &PathRegistry) -> HoverOutcome {
        if self.phase == DragPhase::Committing {
            return HoverOutcome::Unchanged;
        }

        let dragged = Dragged {
            id: self.source.id(),
            component_type: self.source.component_type(),
            position: self.position.as_ref(),
        };

        let Some(target) = resolve_hover(targets, dragged, paths, &self.deferred.state().data) else {
            return HoverOutcome::Unchanged;
        };

        let outcome = match self.source.clone() {
            DragSource::New { component_type, id } => {
                let preview = Preview {
                    component_type,
                    zone: target.zone.clone(),
                    index: target.index,
                    id,
                };

                if self.preview.as_ref() == Some(&preview) {
                    HoverOutcome::Unchanged
                } else {
                    self.preview = Some(preview.clone());
                    HoverOutcome::Preview(preview)
                }
            }
            DragSource::Existing { id, .. } => self.move_speculatively(id, target.selector()),
        };

        debug!(zone = %target.zone, index = target.index, outcome = ?outcome, "Drag over");
        self.hovered = Some(target);
        outcome
    }

    fn move_speculatively(&mut self, id: String, to: Selector) -> HoverOutcome {
        let Some(from) = self.position.clone() else {
            return HoverOutcome::Unchanged;
        };

        if from == to {
            return HoverOutcome::Unchanged;
        }

        let state = match self.deferred.dispatch(Action::move_to(from, to)) {
            Ok(state) => state,
            Err(err) => {
                debug!(error = %err, "Speculative move rejected");
                return HoverOutcome::Unchanged;
            }
        };

        match state.data.find(&id) {
            Some(now) => {
                self.position = Some(now.clone());
                HoverOutcome::Moved(now)
            }
            None => HoverOutcome::Unchanged,
        }
    }

    /// Fold the session into one canonical action; `None` when nothing changes
    pub fn finish(&mut self) -> Result<Option<Commit>, MergeError> {
        self.phase = DragPhase::Committing;

        match &self.source {
            DragSource::New { component_type, .. } => {
                self.deferred.discard();
                Ok(self.preview.take().map(|preview| Commit {
                    action: Action::insert(component_type.clone(), preview.zone.clone(), preview.index),
                    selection: Selector::new(preview.zone, preview.index),
                }))
            }
            DragSource::Existing { origin, .. } => {
                let origin = origin.clone();
                let merged = self.deferred.commit()?;

                Ok(match (merged, self.position.clone()) {
                    (Some(action), Some(selection)) if selection != origin => Some(Commit { action, selection }),
                    _ => None,
                })
            }
        }
    }

    /// Drop everything speculative; nothing is dispatched
    pub fn cancel(&mut self) {
        debug!(source = self.source.id(), "Drag cancelled");
        self.deferred.discard();
        self.preview = None;
        self.hovered = None;
    }
}
