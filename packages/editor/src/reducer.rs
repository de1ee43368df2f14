//! # Reducer
//!
//! Maps `(state, action)` to a new state without touching the input.
//!
//! ## Action Semantics
//!
//! ### Insert
//! - Fresh id, registry default props overlaid with the supplied props
//! - Unknown component type: no-op
//! - Always clears `ui.preview`
//!
//! ### Reorder / Move
//! - Remove, then insert at the destination index of the shortened zone
//! - Move within one zone is a reorder
//! - Moving a node into its own subtree is a no-op
//!
//! ### Remove
//! - Cascades to every zone owned by the node, recursively
//!
//! ### Duplicate
//! - Fresh ids for the copy and for every node of its nested zones
//!
//! Indices are clamped; a source index that points past the end of its zone
//! makes the action a no-op.

use crate::actions::{Action, DataUpdate, StateUpdate, UiUpdate};
use crate::registry::ComponentRegistry;
use crate::state::{AppState, UiState};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};
use zonecraft_document::{Document, IdGenerator, Node, Props, Selector, ZoneKey};

/// State reducer bound to a component registry
#[derive(Debug, Clone)]
pub struct Reducer {
    registry: Arc<ComponentRegistry>,
    ids: IdGenerator,
}

impl Reducer {
    pub fn new(registry: Arc<ComponentRegistry>, ids: IdGenerator) -> Self {
        Self { registry, ids }
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Shared handle on the registry, for spawning sibling reducers
    pub fn registry_handle(&self) -> Arc<ComponentRegistry> {
        Arc::clone(&self.registry)
    }

    /// Generate an id no node of `doc` uses yet
    pub fn fresh_id(&mut self, component_type: &str, doc: &Document) -> String {
        self.ids.fresh_id(component_type, |id| doc.contains_id(id))
    }

    pub fn reduce(&mut self, state: &AppState, action: &Action) -> AppState {
        debug!(action = action.kind(), "Reducing action");

        if let Action::Set { state: update } = action {
            return match update {
                StateUpdate::Patch(patch) => patch.merge_into(state),
                StateUpdate::With(f) => f.apply(state),
            };
        }

        AppState {
            data: self.reduce_data(&state.data, action),
            ui: reduce_ui(&state.ui, action),
        }
    }

    pub fn reduce_data(&mut self, data: &Document, action: &Action) -> Document {
        let mut doc = data.clone();

        match action {
            Action::Insert {
                component_type,
                destination_zone,
                destination_index,
                props,
                id,
            } => self.apply_insert(
                &mut doc,
                component_type,
                destination_zone,
                *destination_index,
                props.as_ref(),
                id.as_deref(),
            ),

            Action::Reorder {
                source_zone,
                source_index,
                destination_index,
            } => Self::apply_reorder(&mut doc, source_zone, *source_index, *destination_index),

            Action::Move {
                source_zone,
                source_index,
                destination_zone,
                destination_index,
            } => Self::apply_move(
                &mut doc,
                source_zone,
                *source_index,
                destination_zone,
                *destination_index,
            ),

            Action::Replace {
                destination_zone,
                destination_index,
                data: node,
            } => Self::apply_replace(&mut doc, destination_zone, *destination_index, node),

            Action::Remove { zone, index } => Self::apply_remove(&mut doc, zone, *index),

            Action::Duplicate {
                source_zone,
                source_index,
            } => self.apply_duplicate(&mut doc, source_zone, *source_index),

            Action::SetData { data: update } => {
                doc = match update {
                    DataUpdate::Patch(patch) => patch.merge_into(data),
                    DataUpdate::With(f) => f.apply(data),
                };
            }

            Action::Set { .. }
            | Action::SetUi { .. }
            | Action::RegisterZone { .. }
            | Action::UnregisterZone { .. } => {}
        }

        doc
    }

    fn apply_insert(
        &mut self,
        doc: &mut Document,
        component_type: &str,
        zone: &ZoneKey,
        index: usize,
        props: Option<&Props>,
        requested_id: Option<&str>,
    ) {
        if !self.registry.contains(component_type) {
            warn!(component_type, zone = %zone, "Insert of unknown component type ignored");
            return;
        }

        let id = match requested_id {
            Some(id) if !doc.contains_id(id) => id.to_string(),
            _ => self.fresh_id(component_type, doc),
        };

        let props = self
            .registry
            .resolve_props(component_type, props.unwrap_or(&Props::new()));

        let node = Node::new(component_type, id).with_props(props);
        let nodes = doc.zone_mut(zone);
        let insert_index = index.min(nodes.len());
        nodes.insert(insert_index, node);
    }

    fn apply_reorder(doc: &mut Document, zone: &ZoneKey, from: usize, to: usize) {
        if from >= doc.zone_len(zone) {
            debug!(zone = %zone, index = from, "Reorder source out of range");
            return;
        }

        let nodes = doc.zone_mut(zone);
        let node = nodes.remove(from);
        let insert_index = to.min(nodes.len());
        nodes.insert(insert_index, node);
    }

    fn apply_move(doc: &mut Document, from_zone: &ZoneKey, from: usize, to_zone: &ZoneKey, to: usize) {
        if from_zone == to_zone {
            return Self::apply_reorder(doc, from_zone, from, to);
        }

        let Some(node_id) = doc.get(&Selector::new(from_zone.clone(), from)).map(|n| n.id.clone()) else {
            debug!(zone = %from_zone, index = from, "Move source out of range");
            return;
        };

        if to_zone.area() == node_id || doc.descendant_zones(&node_id).contains(to_zone) {
            warn!(node_id = %node_id, zone = %to_zone, "Refusing to move node into its own subtree");
            return;
        }

        let node = doc.zone_mut(from_zone).remove(from);
        let nodes = doc.zone_mut(to_zone);
        let insert_index = to.min(nodes.len());
        nodes.insert(insert_index, node);
    }

    fn apply_replace(doc: &mut Document, zone: &ZoneKey, index: usize, node: &Node) {
        let Some(old_id) = doc.get(&Selector::new(zone.clone(), index)).map(|n| n.id.clone()) else {
            debug!(zone = %zone, index, "Replace target out of range");
            return;
        };

        // Zones follow their owner when the id changes
        if old_id != node.id {
            for key in doc.owned_zones(&old_id) {
                if let Some(nodes) = doc.zones.remove(&key) {
                    doc.zones.insert(key.with_area(&node.id), nodes);
                }
            }
        }

        doc.zone_mut(zone)[index] = node.clone();
    }

    fn apply_remove(doc: &mut Document, zone: &ZoneKey, index: usize) {
        let Some(node_id) = doc.get(&Selector::new(zone.clone(), index)).map(|n| n.id.clone()) else {
            debug!(zone = %zone, index, "Remove target out of range");
            return;
        };

        doc.zone_mut(zone).remove(index);

        for key in doc.descendant_zones(&node_id) {
            doc.zones.remove(&key);
        }
    }

    fn apply_duplicate(&mut self, doc: &mut Document, zone: &ZoneKey, index: usize) {
        let Some(original) = doc.get(&Selector::new(zone.clone(), index)).cloned() else {
            debug!(zone = %zone, index, "Duplicate source out of range");
            return;
        };

        let source = doc.clone();
        let copy = self.copy_node(&original, doc);
        self.copy_zones(&source, doc, &original.id, &copy.id, &mut HashSet::new());

        doc.zone_mut(zone).insert(index + 1, copy);
    }

    /// Clone one node under a fresh id, filling in missing default props
    fn copy_node(&mut self, node: &Node, doc: &Document) -> Node {
        let id = self.fresh_id(&node.component_type, doc);
        let props = self.registry.resolve_props(&node.component_type, &node.props);
        Node::new(node.component_type.clone(), id).with_props(props)
    }

    /// Recreate every zone owned by `from_area` under `to_area`, recursively
    fn copy_zones(
        &mut self,
        source: &Document,
        target: &mut Document,
        from_area: &str,
        to_area: &str,
        copied: &mut HashSet<String>,
    ) {
        if !copied.insert(from_area.to_string()) {
            return;
        }

        for key in source.owned_zones(from_area) {
            let mut copies = Vec::new();

            for node in source.zone_or_empty(&key) {
                let copy = self.copy_node(node, target);
                // Reserve the id before generating the next one
                target.zone_mut(&key.with_area(to_area)).push(copy.clone());
                copies.push((node.id.clone(), copy.id));
            }

            // Keep empty zones so the copy renders the same slots
            target.zone_mut(&key.with_area(to_area));

            for (old_id, new_id) in copies {
                self.copy_zones(source, target, &old_id, &new_id, copied);
            }
        }
    }
}

pub fn reduce_ui(ui: &UiState, action: &Action) -> UiState {
    match action {
        Action::SetUi { ui: update } => match update {
            UiUpdate::Patch(patch) => patch.merge_into(ui),
            UiUpdate::With(f) => f.apply(ui),
        },
        Action::Insert { .. } => UiState {
            preview: None,
            ..ui.clone()
        },
        _ => ui.clone(),
    }
}
