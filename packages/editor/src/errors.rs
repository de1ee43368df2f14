//! Error types for the editor

use thiserror::Error;
use zonecraft_document::DocumentError;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Merge error: {0}")]
    Merge(#[from] crate::merge::MergeError),

    #[error("Deferred dispatch error: {0}")]
    Deferred(#[from] crate::deferred::DeferredError),

    #[error("Drag source not found in document: {0}")]
    DragSourceNotFound(String),

    #[error("No configuration for component type: {0}")]
    UnknownComponent(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}
