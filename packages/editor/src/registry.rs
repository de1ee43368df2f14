//! # Component Registry
//!
//! Maps component type names to their editor configuration: default props,
//! display label, and the drop rules of every zone (slot) the component
//! renders. Rendering itself belongs to the host.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use zonecraft_document::{Document, Props, ZoneKey};

/// Which component types a zone accepts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disallow: Option<Vec<String>>,
}

impl ZoneRules {
    pub fn allow<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allow: Some(types.into_iter().map(Into::into).collect()),
            disallow: None,
        }
    }

    pub fn disallow<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allow: None,
            disallow: Some(types.into_iter().map(Into::into).collect()),
        }
    }

    /// Whether `component_type` may be dropped into the zone.
    ///
    /// `disallow` wins over `allow`, except for types listed in both.
    pub fn accepts(&self, component_type: &str) -> bool {
        let allow = self.allow.as_deref().unwrap_or(&[]);

        if let Some(disallow) = &self.disallow {
            let blocked = disallow
                .iter()
                .filter(|t| !allow.contains(t))
                .any(|t| t == component_type);
            return !blocked;
        }

        if self.allow.is_some() {
            return allow.iter().any(|t| t == component_type);
        }

        true
    }
}

/// Editor configuration of one component type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentConfig {
    #[serde(default)]
    pub default_props: Props,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Slots rendered by the component, with their drop rules
    #[serde(default)]
    pub zones: BTreeMap<String, ZoneRules>,
}

impl ComponentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_prop(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.default_props.insert(name.into(), value.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_zone(mut self, slot: impl Into<String>, rules: ZoneRules) -> Self {
        self.zones.insert(slot.into(), rules);
        self
    }
}

/// Component type name → configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRegistry {
    #[serde(default)]
    pub components: BTreeMap<String, ComponentConfig>,

    /// Drop rules of the document root zone
    #[serde(default)]
    pub root: ZoneRules,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_component(mut self, component_type: impl Into<String>, config: ComponentConfig) -> Self {
        self.register(component_type, config);
        self
    }

    pub fn with_root_rules(mut self, rules: ZoneRules) -> Self {
        self.root = rules;
        self
    }

    pub fn register(&mut self, component_type: impl Into<String>, config: ComponentConfig) {
        self.components.insert(component_type.into(), config);
    }

    pub fn get(&self, component_type: &str) -> Option<&ComponentConfig> {
        self.components.get(component_type)
    }

    pub fn contains(&self, component_type: &str) -> bool {
        self.components.contains_key(component_type)
    }

    /// Display label: the configured label, else the type name
    pub fn label(&self, component_type: &str) -> String {
        self.get(component_type)
            .and_then(|c| c.label.clone())
            .unwrap_or_else(|| component_type.to_string())
    }

    /// Registry defaults overlaid with the node's own props
    pub fn resolve_props(&self, component_type: &str, props: &Props) -> Props {
        let mut resolved = self
            .get(component_type)
            .map(|c| c.default_props.clone())
            .unwrap_or_default();

        for (key, value) in props {
            resolved.insert(key.clone(), value.clone());
        }

        resolved
    }

    /// Drop rules for a zone, looked up through the type of its owning node
    pub fn zone_rules(&self, zone: &ZoneKey, document: &Document) -> ZoneRules {
        if zone.is_root() {
            return self.root.clone();
        }

        document
            .find(zone.area())
            .and_then(|selector| document.get(&selector))
            .and_then(|owner| self.get(&owner.component_type))
            .and_then(|config| config.zones.get(zone.slot()))
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonecraft_document::Node;

    #[test]
    fn test_zone_rules_accepts() {
        assert!(ZoneRules::default().accepts("Anything"));

        let allow = ZoneRules::allow(["Text"]);
        assert!(allow.accepts("Text"));
        assert!(!allow.accepts("Hero"));

        let disallow = ZoneRules::disallow(["Hero"]);
        assert!(disallow.accepts("Text"));
        assert!(!disallow.accepts("Hero"));
    }

    #[test]
    fn test_allow_overrides_disallow_for_listed_types() {
        let rules = ZoneRules {
            allow: Some(vec!["Hero".to_string()]),
            disallow: Some(vec!["Hero".to_string(), "Columns".to_string()]),
        };

        assert!(rules.accepts("Hero"));
        assert!(!rules.accepts("Columns"));
        // with disallow present, allow does not restrict other types
        assert!(rules.accepts("Text"));
    }

    #[test]
    fn test_resolve_props_overlays_defaults() {
        let registry = ComponentRegistry::new().with_component(
            "Text",
            ComponentConfig::new()
                .with_default_prop("text", "Lorem")
                .with_default_prop("size", 16),
        );

        let mut props = Props::new();
        props.insert("text".to_string(), "Hello".into());

        let resolved = registry.resolve_props("Text", &props);
        assert_eq!(resolved["text"], "Hello");
        assert_eq!(resolved["size"], 16);
    }

    #[test]
    fn test_zone_rules_lookup() {
        let registry = ComponentRegistry::new()
            .with_root_rules(ZoneRules::disallow(["Footer"]))
            .with_component(
                "Columns",
                ComponentConfig::new().with_zone("left", ZoneRules::allow(["Text"])),
            );
        let doc = Document::with_root(vec![Node::new("Columns", "cols")]);

        let left = registry.zone_rules(&ZoneKey::from("cols:left"), &doc);
        assert!(!left.accepts("Hero"));

        let undeclared = registry.zone_rules(&ZoneKey::from("cols:right"), &doc);
        assert!(undeclared.accepts("Hero"));

        assert!(!registry.zone_rules(&ZoneKey::root(), &doc).accepts("Footer"));
    }

    #[test]
    fn test_label_falls_back_to_type() {
        let registry = ComponentRegistry::new()
            .with_component("Hero", ComponentConfig::new().with_label("Hero banner"));

        assert_eq!(registry.label("Hero"), "Hero banner");
        assert_eq!(registry.label("Unknown"), "Unknown");
    }

    #[test]
    fn test_registry_from_json() {
        let registry: ComponentRegistry = serde_json::from_str(
            r#"{
                "components": {
                    "Text": { "defaultProps": { "text": "Lorem" } },
                    "Columns": { "zones": { "left": { "allow": ["Text"] } } }
                }
            }"#,
        )
        .unwrap();

        assert!(registry.contains("Text"));
        assert_eq!(registry.get("Text").unwrap().default_props["text"], "Lorem");
        assert!(!registry.get("Columns").unwrap().zones["left"].accepts("Hero"));
    }
}
