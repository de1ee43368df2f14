//! # Zonecraft Editor
//!
//! Headless core of the drag-and-drop zone editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: nodes, zones, persisted format    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: state changes + drag lifecycle      │
//! │  - Reducer: (state, action) → state         │
//! │  - Store: dispatch + history recording      │
//! │  - Canvas mount → path/zone registry        │
//! │  - Drag session over a deferred store       │
//! │  - Merge of speculative actions at commit   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ host: rendering, pointer sensor, undo/redo  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Actions are the only writers**: the document changes through the reducer, nowhere else
//! 2. **Drags are speculative**: hovering never touches canonical state or history
//! 3. **One drop, one action**: a drag commits as a single merged action
//! 4. **Registries are derived**: paths and zones are rebuilt by mounting
//!
//! ## Usage
//!
//! ```rust,ignore
//! use zonecraft_editor::{DragItem, DropTarget, EditSession, EditorConfig};
//!
//! let mut session = EditSession::from_json("main", source, registry, EditorConfig::headless())?;
//! session.mount();
//!
//! session.drag_start(&DragItem::drawer("Text"))?;
//! session.drag_over(&[DropTarget::zone("root")]);
//! session.drag_end(Instant::now())?;
//!
//! let saved = session.to_json()?;
//! ```

mod actions;
mod canvas;
mod config;
mod deferred;
mod drag;
mod errors;
mod history;
mod hover;
mod listeners;
mod merge;
mod path_registry;
mod reducer;
mod registry;
mod session;
mod state;
mod store;

pub use actions::{
    Action, DataPatch, DataUpdate, Dispatch, StatePatch, StateUpdate, UiPatch, UiUpdate, Updater,
};
pub use canvas::{mount, CanvasItem, CanvasZone, DropScope, ItemKind};
pub use config::{EditorConfig, DEFAULT_CONFIG_NAME};
pub use deferred::{DeferredError, DeferredStore};
pub use drag::{
    Commit, DragItem, DragPhase, DragSession, DragSource, HoverOutcome, SourceData, DRAWER_SOURCE,
};
pub use errors::EditorError;
pub use history::{HistoryLog, HistoryRecorder, RecordFn};
pub use hover::{resolve_hover, DropTarget, Dragged, HoverTarget, TargetData, TargetKind};
pub use listeners::{DragEvent, DragEventKind, DragListener, DragListeners};
pub use merge::{merge_actions, MergeError};
pub use path_registry::{PathData, PathRegistry, ZoneEntry, ZONE_TARGET_PREFIX};
pub use reducer::{reduce_ui, Reducer};
pub use registry::{ComponentConfig, ComponentRegistry, ZoneRules};
pub use session::{EditSession, PendingSelection};
pub use state::{AppState, Preview, UiState};
pub use store::Store;

// Re-export document types for convenience
pub use zonecraft_document::{Document, Node, Props, Selector, ZoneKey};
