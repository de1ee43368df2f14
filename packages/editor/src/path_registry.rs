//! # Zone/Path Registry
//!
//! Rebuilt as the canvas mounts; never persisted. Maps every mounted node id
//! to the chain of zones leading from the document root to the zone the node
//! sits in, so ancestry questions cost one lookup plus a walk of that chain.
//!
//! ```text
//! root ──▶ [hero] ──▶ hero:left ──▶ [text]
//!
//! path(hero) = [root]
//! path(text) = [root, hero:left]
//! ```
//!
//! Entries may go stale while the document changes under a drag; lookups of
//! unknown ids simply report "no ancestry".

use crate::registry::ZoneRules;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;
use zonecraft_document::{Document, Selector, ZoneKey, ROOT_AREA};

/// Prefix of drop-target ids that denote a whole zone
pub const ZONE_TARGET_PREFIX: &str = "zone:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathData {
    pub path: Vec<ZoneKey>,
    pub label: String,
}

/// A mounted zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneEntry {
    pub collision_priority: u32,
    pub rules: ZoneRules,
}

#[derive(Debug, Clone, Default)]
pub struct PathRegistry {
    paths: HashMap<String, PathData>,
    areas_with_zones: BTreeSet<String>,
    zones: BTreeMap<ZoneKey, ZoneEntry>,
}

impl PathRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the path of the node at `selector`; ignored for stale selectors
    pub fn register_path(&mut self, selector: &Selector, document: &Document) {
        let Some(node) = document.get(selector) else {
            debug!(zone = %selector.zone, index = selector.index, "Skipping path of missing node");
            return;
        };

        let mut path = self
            .paths
            .get(selector.zone.area())
            .map(|parent| parent.path.clone())
            .unwrap_or_default();
        path.push(selector.zone.clone());

        self.paths.insert(
            node.id.clone(),
            PathData {
                path,
                label: node.component_type.clone(),
            },
        );
    }

    pub fn path(&self, id: &str) -> Option<&PathData> {
        self.paths.get(id)
    }

    pub fn unregister_path(&mut self, id: &str) {
        self.paths.remove(id);
    }

    /// Mark `area_id` as owning at least one zone
    pub fn register_zone_area(&mut self, area_id: &str) {
        self.areas_with_zones.insert(area_id.to_string());
    }

    pub fn has_zones(&self, area_id: &str) -> bool {
        self.areas_with_zones.contains(area_id)
    }

    pub fn register_zone(&mut self, zone: ZoneKey, collision_priority: u32, rules: ZoneRules) {
        self.areas_with_zones.insert(zone.area().to_string());
        self.zones.insert(
            zone,
            ZoneEntry {
                collision_priority,
                rules,
            },
        );
    }

    pub fn unregister_zone(&mut self, zone: &ZoneKey) {
        self.zones.remove(zone);

        let area = zone.area();
        if area != ROOT_AREA && !self.zones.keys().any(|z| z.area() == area) {
            self.areas_with_zones.remove(area);
        }
    }

    pub fn zone(&self, zone: &ZoneKey) -> Option<&ZoneEntry> {
        self.zones.get(zone)
    }

    pub fn zones(&self) -> impl Iterator<Item = (&ZoneKey, &ZoneEntry)> {
        self.zones.iter()
    }

    pub fn clear(&mut self) {
        self.paths.clear();
        self.areas_with_zones.clear();
        self.zones.clear();
    }

    /// Drop entries for nodes and zones no longer present in `document`
    pub fn retain_live(&mut self, document: &Document) {
        self.paths.retain(|id, _| document.contains_id(id));
        self.zones
            .retain(|zone, _| zone.is_root() || document.contains_id(zone.area()));
        self.areas_with_zones
            .retain(|area| area == ROOT_AREA || document.contains_id(area));
    }

    /// Whether `ancestor` is `id` itself or owns a zone on the path to `id`
    pub fn is_ancestor_or_self(&self, ancestor: &str, id: &str) -> bool {
        if ancestor == id {
            return true;
        }

        self.paths
            .get(id)
            .map(|data| data.path.iter().any(|zone| zone.area() == ancestor))
            .unwrap_or(false)
    }

    /// Whether dropping `dragged_id` onto the target `target_id` would create a cycle.
    ///
    /// Zone targets (`zone:<area>:<slot>`) are judged by the area owning them,
    /// node targets by the node itself.
    pub fn is_illegal_drop(&self, dragged_id: &str, target_id: &str) -> bool {
        let dragged = area_of(dragged_id);

        match target_id.strip_prefix(ZONE_TARGET_PREFIX) {
            Some(zone) => {
                let area = ZoneKey::from(zone).area().to_string();
                area != ROOT_AREA && self.is_ancestor_or_self(dragged, &area)
            }
            None => self.is_ancestor_or_self(dragged, area_of(target_id)),
        }
    }
}

fn area_of(id: &str) -> &str {
    id.split(':').next().unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonecraft_document::Node;

    fn nested() -> (Document, PathRegistry) {
        let doc = Document::with_root(vec![Node::new("Hero", "hero"), Node::new("Text", "a")])
            .with_zone("hero:left", vec![Node::new("Hero", "inner")])
            .with_zone("inner:left", vec![Node::new("Text", "deep")]);

        let mut paths = PathRegistry::new();
        paths.register_path(&Selector::new("root", 0), &doc);
        paths.register_path(&Selector::new("root", 1), &doc);
        paths.register_path(&Selector::new("hero:left", 0), &doc);
        paths.register_path(&Selector::new("inner:left", 0), &doc);
        (doc, paths)
    }

    #[test]
    fn test_paths_are_root_anchored() {
        let (_, paths) = nested();

        assert_eq!(paths.path("hero").unwrap().path, vec![ZoneKey::root()]);
        assert_eq!(
            paths.path("deep").unwrap().path,
            vec![ZoneKey::root(), ZoneKey::from("hero:left"), ZoneKey::from("inner:left")]
        );
        assert_eq!(paths.path("deep").unwrap().label, "Text");
    }

    #[test]
    fn test_ancestry() {
        let (_, paths) = nested();

        assert!(paths.is_ancestor_or_self("hero", "deep"));
        assert!(paths.is_ancestor_or_self("inner", "deep"));
        assert!(paths.is_ancestor_or_self("deep", "deep"));
        assert!(!paths.is_ancestor_or_self("a", "deep"));
        assert!(!paths.is_ancestor_or_self("deep", "hero"));
        assert!(!paths.is_ancestor_or_self("hero", "unknown"));
    }

    #[test]
    fn test_illegal_drops() {
        let (_, paths) = nested();

        assert!(paths.is_illegal_drop("hero", "hero"));
        assert!(paths.is_illegal_drop("hero", "zone:hero:left"));
        assert!(paths.is_illegal_drop("hero", "zone:inner:left"));
        assert!(paths.is_illegal_drop("hero", "deep"));
        assert!(!paths.is_illegal_drop("hero", "a"));
        assert!(!paths.is_illegal_drop("hero", "zone:root"));
        assert!(!paths.is_illegal_drop("deep", "zone:hero:left"));
    }

    #[test]
    fn test_zone_registration() {
        let (doc, mut paths) = nested();

        paths.register_zone(ZoneKey::from("hero:left"), 2, ZoneRules::default());
        paths.register_zone(ZoneKey::from("hero:right"), 2, ZoneRules::default());
        assert!(paths.has_zones("hero"));
        assert_eq!(paths.zone(&ZoneKey::from("hero:left")).unwrap().collision_priority, 2);

        paths.unregister_zone(&ZoneKey::from("hero:left"));
        assert!(paths.has_zones("hero"));
        paths.unregister_zone(&ZoneKey::from("hero:right"));
        assert!(!paths.has_zones("hero"));

        paths.register_zone(ZoneKey::from("gone:slot"), 2, ZoneRules::default());
        paths.retain_live(&doc);
        assert!(paths.zone(&ZoneKey::from("gone:slot")).is_none());
        assert!(!paths.has_zones("gone"));
        assert!(paths.path("deep").is_some());
    }

    #[test]
    fn test_stale_selector_is_ignored() {
        let (doc, mut paths) = nested();
        paths.register_path(&Selector::new("root", 9), &doc);
        assert!(paths.path("hero").is_some());
    }
}
