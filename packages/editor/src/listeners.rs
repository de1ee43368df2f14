//! Drag event listeners
//!
//! Collaborators subscribe per event kind; the edit session notifies them
//! after its own handling of each drag step. Listeners are owned by the
//! session that fires them.

use crate::actions::Action;
use crate::drag::{DragItem, HoverOutcome};
use crate::hover::{DropTarget, HoverTarget};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragEventKind {
    BeforeDragStart,
    DragOver,
    DragEnd,
}

#[derive(Debug, Clone, Copy)]
pub enum DragEvent<'a> {
    /// A drag has been accepted; the selection is already cleared
    BeforeDragStart { item: &'a DragItem },
    DragOver {
        targets: &'a [DropTarget],
        /// Target the drag currently resolves to
        hovered: Option<&'a HoverTarget>,
        outcome: &'a HoverOutcome,
    },
    /// Released over a target; `action` is what reached the canonical store
    DragEnd {
        hovered: &'a HoverTarget,
        action: Option<&'a Action>,
    },
}

impl DragEvent<'_> {
    pub fn kind(&self) -> DragEventKind {
        match self {
            DragEvent::BeforeDragStart { .. } => DragEventKind::BeforeDragStart,
            DragEvent::DragOver { .. } => DragEventKind::DragOver,
            DragEvent::DragEnd { .. } => DragEventKind::DragEnd,
        }
    }
}

pub type DragListener = Box<dyn FnMut(&DragEvent<'_>)>;

/// Listeners in registration order
#[derive(Default)]
pub struct DragListeners {
    listeners: Vec<(DragEventKind, DragListener)>,
}

impl DragListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, kind: DragEventKind, listener: impl FnMut(&DragEvent<'_>) + 'static) {
        self.listeners.push((kind, Box::new(listener)));
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Call every listener subscribed to the event's kind
    pub fn emit(&mut self, event: &DragEvent<'_>) {
        let kind = event.kind();
        for (_, listener) in self.listeners.iter_mut().filter(|(k, _)| *k == kind) {
            listener(event);
        }
    }
}

impl fmt::Debug for DragListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragListeners")
            .field("count", &self.listeners.len())
            .finish()
    }
}
