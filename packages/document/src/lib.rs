//! # Zonecraft Document
//!
//! Data model for zone-based layout documents.
//!
//! A document is a root zone plus a flat map of nested zones. Nodes never
//! embed their children; a node owns the zones whose compound key starts
//! with its id (`<node-id>:<slot>`).
//!
//! ```text
//! content: [Hero#1, Text#2]
//! zones:
//!   "Hero#1:left"  → [Text#3]
//!   "Hero#1:right" → [Columns#4]
//!   "Columns#4:a"  → [Text#5]
//! ```

pub mod document;
pub mod error;
pub mod id_generator;
pub mod node;
pub mod serializer;
pub mod zone_key;

pub use document::{Document, Selector, Zone};
pub use error::{DocumentError, DocumentResult};
pub use id_generator::{get_namespace_seed, IdGenerator};
pub use node::{Node, Props, PLACEHOLDER_PROP};
pub use serializer::{from_json, to_json, to_json_pretty};
pub use zone_key::{ZoneKey, ROOT_AREA, ROOT_ZONE};
