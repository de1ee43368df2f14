use crate::ZoneKey;
use thiserror::Error;

pub type DocumentResult<T> = Result<T, DocumentError>;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate node id: {0}")]
    DuplicateId(String),

    #[error("Zone {zone} is not reachable from the root zone (owner {area})")]
    OrphanedZone { zone: ZoneKey, area: String },

    #[error("Found {0} placeholder nodes, at most one is allowed")]
    MultiplePlaceholders(usize),
}

impl DocumentError {
    pub fn orphaned_zone(zone: &ZoneKey) -> Self {
        Self::OrphanedZone {
            zone: zone.clone(),
            area: zone.area().to_string(),
        }
    }
}
