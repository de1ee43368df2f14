//! # Canvas Mount Pass
//!
//! Headless stand-in for rendering the editor canvas. Walks the document from
//! the root zone, resolves each node against the component registry and
//! registers every mounted node path and zone with the [`PathRegistry`].
//!
//! Nested zones are mounted with the scope produced by [`DropScope::descend`],
//! one collision-priority level above the zone their owner sits in.

use crate::path_registry::PathRegistry;
use crate::registry::{ComponentRegistry, ZoneRules};
use serde::Serialize;
use std::collections::BTreeSet;
use zonecraft_document::{Document, Props, Selector, ZoneKey, ROOT_AREA};

/// Drop context a zone is mounted under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropScope {
    pub area_id: String,
    /// Zones from the document root down to `area_id`
    pub path: Vec<ZoneKey>,
    pub collision_priority: u32,
}

impl DropScope {
    pub fn root(collision_priority: u32) -> Self {
        Self {
            area_id: ROOT_AREA.to_string(),
            path: Vec::new(),
            collision_priority,
        }
    }

    pub fn zone_key(&self, slot: &str) -> ZoneKey {
        ZoneKey::new(&self.area_id, slot)
    }

    /// Scope for the zones of `child_area_id`, which sits in `zone`
    pub fn descend(&self, zone: &ZoneKey, child_area_id: &str) -> DropScope {
        let mut path = self.path.clone();
        path.push(zone.clone());

        DropScope {
            area_id: child_area_id.to_string(),
            path,
            collision_priority: self.collision_priority + 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    Component,
    /// Node type missing from the registry
    Missing,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasItem {
    pub id: String,
    pub component_type: String,
    pub label: String,
    pub kind: ItemKind,
    pub selector: Selector,
    /// Registry defaults overlaid with the node's props
    pub props: Props,
    pub collision_priority: u32,
    pub zones: Vec<CanvasZone>,
}

impl CanvasItem {
    /// Inline error text shown instead of the component
    pub fn marker(&self) -> Option<String> {
        match self.kind {
            ItemKind::Missing => Some(format!("No configuration for {}", self.component_type)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasZone {
    pub key: ZoneKey,
    pub collision_priority: u32,
    pub rules: ZoneRules,
    pub items: Vec<CanvasItem>,
}

impl CanvasZone {
    /// Every item of this zone and its nested zones, depth first
    pub fn walk(&self) -> Vec<&CanvasItem> {
        let mut items = Vec::new();
        for item in &self.items {
            items.push(item);
            for zone in &item.zones {
                items.extend(zone.walk());
            }
        }
        items
    }
}

/// Mount the whole document, starting at the root zone
pub fn mount(
    document: &Document,
    registry: &ComponentRegistry,
    paths: &mut PathRegistry,
    root_collision_priority: u32,
) -> CanvasZone {
    let scope = DropScope::root(root_collision_priority);
    paths.register_zone_area(ROOT_AREA);
    mount_zone(document, registry, paths, &scope, ZoneKey::root())
}

fn mount_zone(
    document: &Document,
    registry: &ComponentRegistry,
    paths: &mut PathRegistry,
    scope: &DropScope,
    key: ZoneKey,
) -> CanvasZone {
    let rules = registry.zone_rules(&key, document);
    paths.register_zone(key.clone(), scope.collision_priority, rules.clone());

    let mut items = Vec::new();
    for (index, node) in document.zone_or_empty(&key).iter().enumerate() {
        let selector = Selector::new(key.clone(), index);
        paths.register_path(&selector, document);

        let config = registry.get(&node.component_type);
        let kind = if node.is_placeholder() {
            ItemKind::Placeholder
        } else if config.is_some() {
            ItemKind::Component
        } else {
            ItemKind::Missing
        };

        let mut zones = Vec::new();
        if kind == ItemKind::Component {
            let child_scope = scope.descend(&key, &node.id);

            // Declared slots plus any extra zones already in the document
            let mut slots: BTreeSet<String> = config
                .map(|c| c.zones.keys().cloned().collect())
                .unwrap_or_default();
            slots.extend(
                document
                    .owned_zones(&node.id)
                    .iter()
                    .map(|zone| zone.slot().to_string()),
            );

            if !slots.is_empty() {
                paths.register_zone_area(&node.id);
            }

            for slot in slots {
                let child_key = child_scope.zone_key(&slot);
                zones.push(mount_zone(document, registry, paths, &child_scope, child_key));
            }
        }

        items.push(CanvasItem {
            id: node.id.clone(),
            component_type: node.component_type.clone(),
            label: registry.label(&node.component_type),
            kind,
            selector,
            props: registry.resolve_props(&node.component_type, &node.props),
            collision_priority: scope.collision_priority + 1,
            zones,
        });
    }

    CanvasZone {
        key,
        collision_priority: scope.collision_priority,
        rules,
        items,
    }
}
