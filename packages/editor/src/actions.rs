//! # Actions
//!
//! Every state change goes through one of these actions. They serialize as
//! `{"type": "insert", "destinationZone": ..., ...}`; the optional
//! `recordHistory` flag lives on the [`Dispatch`] envelope.
//!
//! `set`, `setData` and `setUi` accept either a patch (shallow merge) or a
//! function of the previous value. Function updates exist only in memory and
//! cannot be serialized.

use crate::state::{AppState, Preview, UiState};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use zonecraft_document::{Document, Node, Props, Selector, Zone, ZoneKey};

/// Shared state-producing function
pub struct Updater<T>(Arc<dyn Fn(&T) -> T + Send + Sync>);

impl<T> Updater<T> {
    pub fn new(f: impl Fn(&T) -> T + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn apply(&self, previous: &T) -> T {
        (self.0)(previous)
    }
}

impl<T> Clone for Updater<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Updater<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Updater(..)")
    }
}

impl<T> PartialEq for Updater<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Distinguishes an explicit `null` from an absent field
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Shallow patch of [`UiState`]; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiPatch {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub selected_item: Option<Option<Selector>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_dragging: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub preview: Option<Option<Preview>>,
}

impl UiPatch {
    pub fn selected_item(selector: Option<Selector>) -> Self {
        Self {
            selected_item: Some(selector),
            ..Self::default()
        }
    }

    pub fn preview(preview: Option<Preview>) -> Self {
        Self {
            preview: Some(preview),
            ..Self::default()
        }
    }

    pub fn dragging(is_dragging: bool) -> Self {
        Self {
            is_dragging: Some(is_dragging),
            ..Self::default()
        }
    }

    pub fn with_selected_item(mut self, selector: Option<Selector>) -> Self {
        self.selected_item = Some(selector);
        self
    }

    pub fn with_dragging(mut self, is_dragging: bool) -> Self {
        self.is_dragging = Some(is_dragging);
        self
    }

    pub fn with_preview(mut self, preview: Option<Preview>) -> Self {
        self.preview = Some(preview);
        self
    }

    pub fn merge_into(&self, ui: &UiState) -> UiState {
        UiState {
            selected_item: self.selected_item.clone().unwrap_or_else(|| ui.selected_item.clone()),
            is_dragging: self.is_dragging.unwrap_or(ui.is_dragging),
            preview: self.preview.clone().unwrap_or_else(|| ui.preview.clone()),
        }
    }
}

/// Shallow patch of [`Document`]: present sections replace the old ones
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Zone>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zones: Option<BTreeMap<ZoneKey, Zone>>,
}

impl DataPatch {
    pub fn merge_into(&self, data: &Document) -> Document {
        Document {
            root: self.content.clone().unwrap_or_else(|| data.root.clone()),
            zones: self.zones.clone().unwrap_or_else(|| data.zones.clone()),
        }
    }
}

/// Shallow patch of [`AppState`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Document>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui: Option<UiState>,
}

impl StatePatch {
    pub fn merge_into(&self, state: &AppState) -> AppState {
        AppState {
            data: self.data.clone().unwrap_or_else(|| state.data.clone()),
            ui: self.ui.clone().unwrap_or_else(|| state.ui.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateUpdate {
    Patch(StatePatch),
    #[serde(skip)]
    With(Updater<AppState>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataUpdate {
    Patch(DataPatch),
    #[serde(skip)]
    With(Updater<Document>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UiUpdate {
    Patch(UiPatch),
    #[serde(skip)]
    With(Updater<UiState>),
}

/// Editor actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    /// Create a node of `component_type` at a position
    #[serde(rename_all = "camelCase")]
    Insert {
        component_type: String,
        destination_zone: ZoneKey,
        destination_index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        props: Option<Props>,
        /// Requested id; a fresh one is generated when absent or taken
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },

    /// Move a node within one zone
    #[serde(rename_all = "camelCase")]
    Reorder {
        source_zone: ZoneKey,
        source_index: usize,
        destination_index: usize,
    },

    /// Move a node to another (or the same) zone
    #[serde(rename_all = "camelCase")]
    Move {
        source_zone: ZoneKey,
        source_index: usize,
        destination_zone: ZoneKey,
        destination_index: usize,
    },

    /// Overwrite the node at a position
    #[serde(rename_all = "camelCase")]
    Replace {
        destination_zone: ZoneKey,
        destination_index: usize,
        data: Node,
    },

    /// Delete a node and every zone it owns
    Remove { zone: ZoneKey, index: usize },

    /// Clone a node and its subtree right after the original
    #[serde(rename_all = "camelCase")]
    Duplicate {
        source_zone: ZoneKey,
        source_index: usize,
    },

    Set { state: StateUpdate },

    SetData { data: DataUpdate },

    SetUi { ui: UiUpdate },

    RegisterZone { zone: ZoneKey },

    UnregisterZone { zone: ZoneKey },
}

impl Action {
    pub fn insert(component_type: impl Into<String>, zone: impl Into<ZoneKey>, index: usize) -> Self {
        Action::Insert {
            component_type: component_type.into(),
            destination_zone: zone.into(),
            destination_index: index,
            props: None,
            id: None,
        }
    }

    pub fn reorder(zone: impl Into<ZoneKey>, source_index: usize, destination_index: usize) -> Self {
        Action::Reorder {
            source_zone: zone.into(),
            source_index,
            destination_index,
        }
    }

    pub fn move_to(from: Selector, to: Selector) -> Self {
        Action::Move {
            source_zone: from.zone,
            source_index: from.index,
            destination_zone: to.zone,
            destination_index: to.index,
        }
    }

    pub fn replace(at: Selector, data: Node) -> Self {
        Action::Replace {
            destination_zone: at.zone,
            destination_index: at.index,
            data,
        }
    }

    pub fn remove(zone: impl Into<ZoneKey>, index: usize) -> Self {
        Action::Remove {
            zone: zone.into(),
            index,
        }
    }

    pub fn duplicate(zone: impl Into<ZoneKey>, index: usize) -> Self {
        Action::Duplicate {
            source_zone: zone.into(),
            source_index: index,
        }
    }

    pub fn set_ui(patch: UiPatch) -> Self {
        Action::SetUi {
            ui: UiUpdate::Patch(patch),
        }
    }

    pub fn set_ui_with(f: impl Fn(&UiState) -> UiState + Send + Sync + 'static) -> Self {
        Action::SetUi {
            ui: UiUpdate::With(Updater::new(f)),
        }
    }

    pub fn set_data(patch: DataPatch) -> Self {
        Action::SetData {
            data: DataUpdate::Patch(patch),
        }
    }

    pub fn set_data_with(f: impl Fn(&Document) -> Document + Send + Sync + 'static) -> Self {
        Action::SetData {
            data: DataUpdate::With(Updater::new(f)),
        }
    }

    pub fn set(patch: StatePatch) -> Self {
        Action::Set {
            state: StateUpdate::Patch(patch),
        }
    }

    pub fn set_with(f: impl Fn(&AppState) -> AppState + Send + Sync + 'static) -> Self {
        Action::Set {
            state: StateUpdate::With(Updater::new(f)),
        }
    }

    /// Wire name of the action type
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Insert { .. } => "insert",
            Action::Reorder { .. } => "reorder",
            Action::Move { .. } => "move",
            Action::Replace { .. } => "replace",
            Action::Remove { .. } => "remove",
            Action::Duplicate { .. } => "duplicate",
            Action::Set { .. } => "set",
            Action::SetData { .. } => "setData",
            Action::SetUi { .. } => "setUi",
            Action::RegisterZone { .. } => "registerZone",
            Action::UnregisterZone { .. } => "unregisterZone",
        }
    }

    /// History policy when the dispatch carries no `recordHistory` flag
    pub fn records_history_by_default(&self) -> bool {
        !matches!(
            self,
            Action::RegisterZone { .. }
                | Action::UnregisterZone { .. }
                | Action::SetData { .. }
                | Action::SetUi { .. }
                | Action::Set { .. }
        )
    }

    /// Retarget an insert or move; other actions are returned unchanged
    pub fn with_destination(self, zone: ZoneKey, index: usize) -> Self {
        match self {
            Action::Insert {
                component_type,
                props,
                id,
                ..
            } => Action::Insert {
                component_type,
                destination_zone: zone,
                destination_index: index,
                props,
                id,
            },
            Action::Move {
                source_zone,
                source_index,
                ..
            } => Action::Move {
                source_zone,
                source_index,
                destination_zone: zone,
                destination_index: index,
            },
            other => other,
        }
    }

    pub fn record_history(self, record: bool) -> Dispatch {
        Dispatch {
            action: self,
            record_history: Some(record),
        }
    }
}

/// An action as dispatched, with its optional history override
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dispatch {
    #[serde(flatten)]
    pub action: Action,

    #[serde(rename = "recordHistory", default, skip_serializing_if = "Option::is_none")]
    pub record_history: Option<bool>,
}

impl Dispatch {
    pub fn should_record(&self) -> bool {
        self.record_history
            .unwrap_or_else(|| self.action.records_history_by_default())
    }
}

impl From<Action> for Dispatch {
    fn from(action: Action) -> Self {
        Self {
            action,
            record_history: None,
        }
    }
}
