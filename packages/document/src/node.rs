use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Component props: arbitrary JSON values keyed by name
pub type Props = serde_json::Map<String, Value>;

/// Prop flag marking a transient node dragged in from the palette
pub const PLACEHOLDER_PROP: &str = "__placeholder";

/// One component instance in the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Key into the component registry
    #[serde(rename = "type")]
    pub component_type: String,

    /// Globally unique within the document, stable across edits
    pub id: String,

    #[serde(default)]
    pub props: Props,
}

impl Node {
    pub fn new(component_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            component_type: component_type.into(),
            id: id.into(),
            props: Props::new(),
        }
    }

    pub fn with_props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.props.get(PLACEHOLDER_PROP), Some(Value::Bool(true)))
    }

    /// Promote a placeholder into a real node under a fresh id
    pub fn promoted(&self, id: impl Into<String>) -> Self {
        let mut props = self.props.clone();
        props.remove(PLACEHOLDER_PROP);
        Self {
            component_type: self.component_type.clone(),
            id: id.into(),
            props,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_flag() {
        let node = Node::new("Text", "Text-1");
        assert!(!node.is_placeholder());

        let placeholder = node.with_prop(PLACEHOLDER_PROP, true);
        assert!(placeholder.is_placeholder());

        let promoted = placeholder.promoted("Text-2");
        assert!(!promoted.is_placeholder());
        assert_eq!(promoted.id, "Text-2");
        assert!(!promoted.props.contains_key(PLACEHOLDER_PROP));
    }

    #[test]
    fn test_node_json_shape() {
        let node = Node::new("Heading", "Heading-1").with_prop("title", "Hello");
        let json = serde_json::to_value(&node).unwrap();

        assert_eq!(json["type"], "Heading");
        assert_eq!(json["id"], "Heading-1");
        assert_eq!(json["props"]["title"], "Hello");
    }
}
