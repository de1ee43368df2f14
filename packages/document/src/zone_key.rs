use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved key of the document's root zone
pub const ROOT_ZONE: &str = "root";

/// Area id of the document root
pub const ROOT_AREA: &str = "root";

/// Zone-compound key: `<area-id>:<slot>`, or [`ROOT_ZONE`] for the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneKey(String);

impl ZoneKey {
    pub fn root() -> Self {
        Self(ROOT_ZONE.to_string())
    }

    /// Build the key of `slot` inside the area `area_id`.
    ///
    /// The root area's reserved slot maps back onto [`ROOT_ZONE`].
    pub fn new(area_id: &str, slot: &str) -> Self {
        if area_id == ROOT_AREA && slot == ROOT_ZONE {
            return Self::root();
        }
        Self(format!("{}:{}", area_id, slot))
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT_ZONE
    }

    /// Id of the area (node id or [`ROOT_AREA`]) that owns this zone
    pub fn area(&self) -> &str {
        match self.0.split_once(':') {
            Some((area, _)) => area,
            None => ROOT_AREA,
        }
    }

    pub fn slot(&self) -> &str {
        match self.0.split_once(':') {
            Some((_, slot)) => slot,
            None => &self.0,
        }
    }

    /// Same slot, re-keyed under another area. Used when duplicating subtrees.
    pub fn with_area(&self, area_id: &str) -> Self {
        Self::new(area_id, self.slot())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZoneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ZoneKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ZoneKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for ZoneKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
