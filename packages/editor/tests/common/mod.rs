//! Shared fixtures for the editor integration tests
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use zonecraft_editor::{
    ComponentConfig, ComponentRegistry, Document, EditSession, EditorConfig, HistoryLog, Node,
    ZoneRules,
};

/// Route `tracing` output through the test harness; safe to call repeatedly
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn registry() -> ComponentRegistry {
    ComponentRegistry::new()
        .with_component(
            "Text",
            ComponentConfig::new()
                .with_label("Text")
                .with_default_prop("text", "Lorem ipsum"),
        )
        .with_component(
            "Heading",
            ComponentConfig::new().with_default_prop("level", 1),
        )
        .with_component(
            "Columns",
            ComponentConfig::new()
                .with_label("Columns")
                .with_zone("left", ZoneRules::default())
                .with_zone("right", ZoneRules::disallow(["Columns"])),
        )
}

/// `root: [cols, a, b]`, `cols:left: [inner]`, `inner:left: [deep]`
pub fn nested_document() -> Document {
    Document::with_root(vec![
        Node::new("Columns", "cols"),
        Node::new("Text", "a"),
        Node::new("Heading", "b"),
    ])
    .with_zone("cols:left", vec![Node::new("Columns", "inner")])
    .with_zone("cols:right", vec![])
    .with_zone("inner:left", vec![Node::new("Text", "deep")])
}

/// Mounted headless session with a shared history log
pub fn session(document: Document) -> (EditSession, Rc<RefCell<HistoryLog>>) {
    init_tracing();

    let log = Rc::new(RefCell::new(HistoryLog::new()));
    let mut session = EditSession::new("test", document, registry(), EditorConfig::headless())
        .with_recorder(Rc::clone(&log));
    session.mount();
    (session, log)
}

pub fn root_ids(doc: &Document) -> Vec<String> {
    doc.root.iter().map(|n| n.id.clone()).collect()
}
