use crate::EditorError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_NAME: &str = "zonecraft.config.json";

/// Editor configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Delay before the post-drop selection is applied (0 = synchronous)
    #[serde(default = "default_drop_selection_delay_ms")]
    pub drop_selection_delay_ms: u64,

    /// Maximum number of history entries kept by [`crate::HistoryLog`] (0 = unlimited)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Collision priority of the root zone; nested zones add one per level
    #[serde(default = "default_root_collision_priority")]
    pub root_collision_priority: u32,

    /// Namespace seeding generated node ids
    #[serde(default = "default_id_namespace")]
    pub id_namespace: String,
}

fn default_drop_selection_delay_ms() -> u64 {
    250
}

fn default_history_limit() -> usize {
    100
}

fn default_root_collision_priority() -> u32 {
    1
}

fn default_id_namespace() -> String {
    "zonecraft".to_string()
}

impl EditorConfig {
    /// Load config from a directory, falling back to defaults when absent
    pub fn load(dir: &Path) -> Result<Self, EditorError> {
        let config_path = dir.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(source: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Defaults with the post-drop delay disabled
    pub fn headless() -> Self {
        Self {
            drop_selection_delay_ms: 0,
            ..Self::default()
        }
    }

    pub fn drop_selection_delay(&self) -> Duration {
        Duration::from_millis(self.drop_selection_delay_ms)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            drop_selection_delay_ms: default_drop_selection_delay_ms(),
            history_limit: default_history_limit(),
            root_collision_priority: default_root_collision_priority(),
            id_namespace: default_id_namespace(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "dropSelectionDelayMs": 0,
            "historyLimit": 20,
            "idNamespace": "landing-page"
        }"#;

        let config = EditorConfig::from_json(json).unwrap();
        assert_eq!(config.drop_selection_delay_ms, 0);
        assert_eq!(config.history_limit, 20);
        assert_eq!(config.root_collision_priority, 1);
        assert_eq!(config.id_namespace, "landing-page");
    }

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.drop_selection_delay(), Duration::from_millis(250));
        assert_eq!(config.history_limit, 100);
        assert_eq!(EditorConfig::headless().drop_selection_delay(), Duration::ZERO);
    }

    #[test]
    fn test_load_missing_config_uses_defaults() {
        let dir = std::env::temp_dir().join("zonecraft-config-missing");
        let config = EditorConfig::load(&dir).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        assert!(matches!(
            EditorConfig::from_json("{ \"historyLimit\": \"many\" }"),
            Err(EditorError::Config(_))
        ));
    }
}
