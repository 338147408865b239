//! Dify applications and connection settings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Format marker for Dify app list files.
pub const DIFY_APPS_DOCUMENT_TYPE: &str = "dify_apps";
pub const DIFY_APPS_DOCUMENT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DifyAppType {
    #[default]
    Chat,
    Completion,
    Workflow,
}

impl DifyAppType {
    pub fn as_str(self) -> &'static str {
        match self {
            DifyAppType::Chat => "chat",
            DifyAppType::Completion => "completion",
            DifyAppType::Workflow => "workflow",
        }
    }
}

impl fmt::Display for DifyAppType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An application discovered on a Dify host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifyApp {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub app_type: DifyAppType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// Connection settings for a Dify host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DifyConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub api_key: String,
}

impl DifyConfig {
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            api_key: api_key.into(),
        }
    }

    /// Host without surrounding whitespace or trailing slashes.
    pub fn base_url(&self) -> &str {
        self.host.trim().trim_end_matches('/')
    }

    pub fn key(&self) -> &str {
        self.api_key.trim()
    }
}

/// An app that was registered with the backend as a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedApp {
    pub app: DifyApp,
    pub plugin_name: String,
    /// Milliseconds since the Unix epoch.
    pub registered_at: i64,
}

/// File format for exchanging Dify app lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifyAppsDocument {
    #[serde(rename = "type")]
    pub doc_type: String,
    #[serde(default)]
    pub version: Option<String>,
    pub apps: Vec<DifyApp>,
}

impl DifyAppsDocument {
    pub fn new(apps: Vec<DifyApp>) -> Self {
        Self {
            doc_type: DIFY_APPS_DOCUMENT_TYPE.to_string(),
            version: Some(DIFY_APPS_DOCUMENT_VERSION.to_string()),
            apps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trims_slashes() {
        let config = DifyConfig::new(" http://dify.local/// ", " app-1 ");
        assert_eq!(config.base_url(), "http://dify.local");
        assert_eq!(config.key(), "app-1");
    }

    #[test]
    fn test_app_type_wire_name() {
        let app: DifyApp = serde_json::from_str(
            r#"{"id":"x","name":"n","type":"workflow","description":"d"}"#,
        )
        .unwrap();
        assert_eq!(app.app_type, DifyAppType::Workflow);
        assert!(app.endpoint.is_none());
    }
}
