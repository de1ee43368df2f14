//! JSON serialization of the persisted document format.
//!
//! Nodes and zones are written back exactly as loaded, so a load → edit →
//! save cycle leaves untouched nodes byte-for-byte equivalent in structure.

use crate::{Document, DocumentResult};

/// Load a document from its persisted JSON form
pub fn from_json(source: &str) -> DocumentResult<Document> {
    Ok(serde_json::from_str(source)?)
}

pub fn to_json(doc: &Document) -> DocumentResult<String> {
    Ok(serde_json::to_string(doc)?)
}

pub fn to_json_pretty(doc: &Document) -> DocumentResult<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}
