//! # Hover Resolution
//!
//! Picks the single drop target for the droppables currently under the
//! pointer. Zone targets land at the end of their zone; sibling targets land
//! at the hovered item's index. The highest collision priority wins, the
//! first candidate wins ties, and a winner that would drop a node into its
//! own subtree yields no target at all.

use crate::path_registry::{PathRegistry, ZONE_TARGET_PREFIX};
use serde::{Deserialize, Serialize};
use tracing::debug;
use zonecraft_document::{Document, Selector, ZoneKey};

/// Payload attached to a droppable by the pointer sensor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetData {
    /// Whole-zone drop surface
    #[serde(default)]
    pub zone: bool,

    /// Zone of the hovered item (sibling targets)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<ZoneKey>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropTarget {
    pub id: String,
    pub data: TargetData,
}

impl DropTarget {
    pub fn zone(key: impl Into<ZoneKey>) -> Self {
        let key = key.into();
        Self {
            id: format!("{}{}", ZONE_TARGET_PREFIX, key),
            data: TargetData {
                zone: true,
                group: None,
                index: None,
            },
        }
    }

    /// The item `id` sitting at `index` of `zone`
    pub fn item(id: impl Into<String>, zone: impl Into<ZoneKey>, index: usize) -> Self {
        Self {
            id: id.into(),
            data: TargetData {
                zone: false,
                group: Some(zone.into()),
                index: Some(index),
            },
        }
    }

    fn zone_key(&self) -> Option<ZoneKey> {
        if self.data.zone {
            return self
                .id
                .strip_prefix(ZONE_TARGET_PREFIX)
                .map(ZoneKey::from)
                .or_else(|| self.data.group.clone());
        }
        self.data.group.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Empty drop surface of a zone
    Zone,
    /// Position next to an existing node
    Sibling,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverTarget {
    pub area: String,
    pub zone: ZoneKey,
    pub index: usize,
    pub kind: TargetKind,
    pub target_id: String,
}

impl HoverTarget {
    pub fn selector(&self) -> Selector {
        Selector::new(self.zone.clone(), self.index)
    }
}

/// What is being dragged, as far as hover resolution cares
#[derive(Debug, Clone, Copy)]
pub struct Dragged<'a> {
    pub id: &'a str,
    pub component_type: &'a str,
    /// Current position when the node is already in the document
    pub position: Option<&'a Selector>,
}

/// Resolve the droppables under the pointer to one target, if any.
///
/// Only the highest-priority candidate is checked against the self/descendant
/// veto. A vetoed winner yields `None`; lower-priority candidates under the
/// same pointer are not tried in its place.
pub fn resolve_hover(
    targets: &[DropTarget],
    dragged: Dragged<'_>,
    paths: &PathRegistry,
    document: &Document,
) -> Option<HoverTarget> {
    let mut best: Option<(u32, HoverTarget)> = None;

    for target in targets {
        let Some(zone) = target.zone_key() else {
            debug!(target = %target.id, "Drop target without zone");
            continue;
        };

        let Some(entry) = paths.zone(&zone) else {
            debug!(target = %target.id, zone = %zone, "Drop target in unmounted zone");
            continue;
        };

        if !entry.rules.accepts(dragged.component_type) {
            debug!(zone = %zone, component_type = dragged.component_type, "Zone does not accept component");
            continue;
        }

        let (kind, index, priority) = if target.data.zone {
            let mut end = document.zone_len(&zone);
            if dragged.position.is_some_and(|at| at.zone == zone) {
                end = end.saturating_sub(1);
            }
            (TargetKind::Zone, end, entry.collision_priority)
        } else {
            let index = target.data.index.unwrap_or(0);
            (TargetKind::Sibling, index, entry.collision_priority + 1)
        };

        if best.as_ref().map_or(true, |(p, _)| priority > *p) {
            best = Some((
                priority,
                HoverTarget {
                    area: zone.area().to_string(),
                    zone,
                    index,
                    kind,
                    target_id: target.id.clone(),
                },
            ));
        }
    }

    let (_, winner) = best?;

    if paths.is_illegal_drop(dragged.id, &winner.target_id) {
        debug!(dragged = dragged.id, target = %winner.target_id, "Vetoed drop into own subtree");
        return None;
    }

    Some(winner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::mount;
    use crate::registry::{ComponentConfig, ComponentRegistry, ZoneRules};
    use zonecraft_document::Node;

    fn setup() -> (Document, PathRegistry) {
        let registry = ComponentRegistry::new()
            .with_component("Text", ComponentConfig::new())
            .with_component(
                "Columns",
                ComponentConfig::new()
                    .with_zone("left", ZoneRules::default())
                    .with_zone("right", ZoneRules::allow(["Columns"])),
            );
        let doc = Document::with_root(vec![Node::new("Columns", "cols"), Node::new("Text", "a")])
            .with_zone("cols:left", vec![Node::new("Text", "b")]);
        let mut paths = PathRegistry::new();
        mount(&doc, &registry, &mut paths, 1);
        (doc, paths)
    }

    fn text(id: &str) -> Dragged<'_> {
        Dragged {
            id,
            component_type: "Text",
            position: None,
        }
    }

    #[test]
    fn test_nested_zone_beats_ancestor_zone() {
        let (doc, paths) = setup();
        let targets = [DropTarget::zone("root"), DropTarget::zone("cols:left")];

        let hit = resolve_hover(&targets, text("Text"), &paths, &doc).unwrap();
        assert_eq!(hit.zone, ZoneKey::from("cols:left"));
        assert_eq!(hit.area, "cols");
        assert_eq!(hit.kind, TargetKind::Zone);
        assert_eq!(hit.index, 1);
    }

    #[test]
    fn test_sibling_beats_its_zone() {
        let (doc, paths) = setup();
        let targets = [DropTarget::zone("root"), DropTarget::item("a", "root", 1)];

        let hit = resolve_hover(&targets, text("Text"), &paths, &doc).unwrap();
        assert_eq!(hit.kind, TargetKind::Sibling);
        assert_eq!(hit.selector(), Selector::new("root", 1));
    }

    #[test]
    fn test_zone_end_accounts_for_dragged_item() {
        let (doc, paths) = setup();
        let at = Selector::new("root", 1);
        let dragged = Dragged {
            id: "a",
            component_type: "Text",
            position: Some(&at),
        };

        let hit = resolve_hover(&[DropTarget::zone("root")], dragged, &paths, &doc).unwrap();
        assert_eq!(hit.index, 1);
    }

    #[test]
    fn test_rules_filter_candidates() {
        let (doc, paths) = setup();
        let targets = [DropTarget::zone("root"), DropTarget::zone("cols:right")];

        let hit = resolve_hover(&targets, text("Text"), &paths, &doc).unwrap();
        assert_eq!(hit.zone, ZoneKey::root());

        assert!(resolve_hover(&[DropTarget::zone("cols:right")], text("Text"), &paths, &doc).is_none());
    }

    #[test]
    fn test_self_and_descendant_targets_are_vetoed() {
        let (doc, paths) = setup();
        let dragged = Dragged {
            id: "cols",
            component_type: "Columns",
            position: None,
        };

        assert!(resolve_hover(&[DropTarget::zone("cols:left")], dragged, &paths, &doc).is_none());
        assert!(resolve_hover(&[DropTarget::item("b", "cols:left", 0)], dragged, &paths, &doc).is_none());
        assert!(resolve_hover(&[DropTarget::item("cols", "root", 0)], dragged, &paths, &doc).is_none());
        assert!(resolve_hover(&[DropTarget::item("a", "root", 1)], dragged, &paths, &doc).is_some());
    }

    #[test]
    fn test_vetoed_winner_hides_lower_candidates() {
        let (doc, paths) = setup();
        let dragged = Dragged {
            id: "cols",
            component_type: "Columns",
            position: None,
        };

        // the root zone is legal on its own but loses to the vetoed nested zone
        let targets = [DropTarget::zone("root"), DropTarget::zone("cols:left")];
        assert!(resolve_hover(&targets, dragged, &paths, &doc).is_none());
        assert!(resolve_hover(&targets[..1], dragged, &paths, &doc).is_some());
    }

    #[test]
    fn test_unmounted_zone_is_ignored() {
        let (doc, paths) = setup();
        assert!(resolve_hover(&[DropTarget::zone("ghost:slot")], text("Text"), &paths, &doc).is_none());
    }
}
