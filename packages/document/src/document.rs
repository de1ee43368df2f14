//! # Document
//!
//! Root zone plus nested zones, addressed by zone-compound keys.
//!
//! Invariants (checked by [`Document::validate`]):
//! - every node id is unique across all zones
//! - every non-empty nested zone is reachable from the root zone through its owners
//! - at most one placeholder node exists

use crate::{DocumentError, DocumentResult, Node, ZoneKey};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet, VecDeque};

/// Ordered nodes of one zone (position = render order)
pub type Zone = Vec<Node>;

/// Position of a node: zone plus index within that zone
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selector {
    pub zone: ZoneKey,
    pub index: usize,
}

impl Selector {
    pub fn new(zone: impl Into<ZoneKey>, index: usize) -> Self {
        Self {
            zone: zone.into(),
            index,
        }
    }
}

/// Persisted document: `{ content: Node[], zones: { key: Node[] } }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "content", default)]
    pub root: Zone,

    #[serde(default)]
    pub zones: BTreeMap<ZoneKey, Zone>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: Zone) -> Self {
        Self {
            root,
            zones: BTreeMap::new(),
        }
    }

    pub fn with_zone(mut self, key: impl Into<ZoneKey>, nodes: Zone) -> Self {
        let key = key.into();
        if key.is_root() {
            self.root = nodes;
        } else {
            self.zones.insert(key, nodes);
        }
        self
    }

    pub fn zone(&self, key: &ZoneKey) -> Option<&[Node]> {
        if key.is_root() {
            Some(&self.root)
        } else {
            self.zones.get(key).map(Vec::as_slice)
        }
    }

    /// Zone contents, empty when the zone has never been set up
    pub fn zone_or_empty(&self, key: &ZoneKey) -> &[Node] {
        self.zone(key).unwrap_or(&[])
    }

    /// Mutable zone contents, creating the zone on first access
    pub fn zone_mut(&mut self, key: &ZoneKey) -> &mut Zone {
        if key.is_root() {
            &mut self.root
        } else {
            self.zones.entry(key.clone()).or_default()
        }
    }

    pub fn zone_len(&self, key: &ZoneKey) -> usize {
        self.zone_or_empty(key).len()
    }

    pub fn get(&self, selector: &Selector) -> Option<&Node> {
        self.zone(&selector.zone)?.get(selector.index)
    }

    /// Locate a node by id
    pub fn find(&self, id: &str) -> Option<Selector> {
        if let Some(index) = self.root.iter().position(|n| n.id == id) {
            return Some(Selector::new(ZoneKey::root(), index));
        }

        self.zones.iter().find_map(|(key, nodes)| {
            nodes
                .iter()
                .position(|n| n.id == id)
                .map(|index| Selector::new(key.clone(), index))
        })
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.nodes().any(|n| n.id == id)
    }

    /// Every node in the document, root zone first
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.root.iter().chain(self.zones.values().flatten())
    }

    pub fn node_count(&self) -> usize {
        self.root.len() + self.zones.values().map(Vec::len).sum::<usize>()
    }

    /// Zones directly owned by the area `area_id`
    pub fn owned_zones(&self, area_id: &str) -> Vec<ZoneKey> {
        self.zones
            .keys()
            .filter(|key| key.area() == area_id)
            .cloned()
            .collect()
    }

    /// Zones owned by `area_id` and, recursively, by every node inside them
    pub fn descendant_zones(&self, area_id: &str) -> Vec<ZoneKey> {
        let mut found = Vec::new();
        let mut visited = HashSet::new();
        let mut queue: VecDeque<ZoneKey> = self.owned_zones(area_id).into();

        while let Some(zone) = queue.pop_front() {
            if !visited.insert(zone.clone()) {
                continue;
            }
            for node in self.zone_or_empty(&zone) {
                queue.extend(self.owned_zones(&node.id));
            }
            found.push(zone);
        }

        found
    }

    /// Positions of all placeholder nodes
    pub fn placeholders(&self) -> Vec<Selector> {
        let root = self
            .root
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_placeholder())
            .map(|(i, _)| Selector::new(ZoneKey::root(), i));

        let nested = self.zones.iter().flat_map(|(key, nodes)| {
            nodes
                .iter()
                .enumerate()
                .filter(|(_, n)| n.is_placeholder())
                .map(move |(i, _)| Selector::new(key.clone(), i))
        });

        root.chain(nested).collect()
    }

    /// Check the structural invariants
    pub fn validate(&self) -> DocumentResult<()> {
        let mut seen = HashSet::new();
        for node in self.nodes() {
            if !seen.insert(node.id.as_str()) {
                return Err(DocumentError::DuplicateId(node.id.clone()));
            }
        }

        let mut reachable: HashSet<ZoneKey> = self
            .root
            .iter()
            .flat_map(|node| self.descendant_zones(&node.id))
            .collect();
        reachable.extend(self.owned_zones(crate::ROOT_AREA));

        for (key, nodes) in &self.zones {
            if !nodes.is_empty() && !reachable.contains(key) {
                return Err(DocumentError::orphaned_zone(key));
            }
        }

        let placeholders = self.placeholders().len();
        if placeholders > 1 {
            return Err(DocumentError::MultiplePlaceholders(placeholders));
        }

        Ok(())
    }
}
