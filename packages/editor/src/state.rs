use serde::{Deserialize, Serialize};
use zonecraft_document::{Document, Selector, ZoneKey};

/// Where a palette item would land if released now
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub component_type: String,
    pub zone: ZoneKey,
    pub index: usize,
    pub id: String,
}

/// Editor UI state, reduced independently of the document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub selected_item: Option<Selector>,
    pub is_dragging: bool,
    pub preview: Option<Preview>,
}

/// Document plus UI state: the value the reducer maps over
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub data: Document,
    pub ui: UiState,
}

impl AppState {
    pub fn new(data: Document) -> Self {
        Self {
            data,
            ui: UiState::default(),
        }
    }
}
