//! CLI configuration file support
//!
//! Loads configuration from ~/.config/flowdesk/config.toml

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flowdesk_core::client::BackendConfig;
use flowdesk_core::dify::ScanMode;
use flowdesk_core::models::{DifyConfig, FeatureFlags};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Default directory for exported workflows
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
    /// Workflow and plugin backend
    #[serde(default)]
    pub backend: BackendConfig,
    /// Who is looking at the resource list
    #[serde(default)]
    pub user: UserConfig,
    /// Menu feature toggles
    #[serde(default)]
    pub flags: FeatureFlags,
    /// Dify connection defaults
    #[serde(default)]
    pub dify: DifySection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    pub id: Option<String>,
    pub space_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DifySection {
    pub host: Option<String>,
    pub api_key: Option<String>,
    #[serde(default)]
    pub scan_mode: ScanMode,
}

impl CliConfig {
    /// Load configuration from a specific path. A missing or malformed
    /// file yields the defaults.
    pub fn load_from_path(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "Ignoring malformed config file");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Get the default configuration file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("flowdesk").join("config.toml"))
    }

    /// Directory for rolling log files
    pub fn log_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("flowdesk")
            .join("logs")
    }

    /// Apply command-line and environment overrides for the backend.
    pub fn apply_backend_overrides(&mut self, base_url: Option<String>, token: Option<String>) {
        if let Some(url) = base_url {
            self.backend.base_url = url;
        }
        if token.is_some() {
            self.backend.token = token;
        }
    }

    /// Dify form values, preferring explicit arguments over the file.
    pub fn dify_config(&self, host: Option<&str>, api_key: Option<&str>) -> DifyConfig {
        let host = host.or(self.dify.host.as_deref()).unwrap_or_default();
        let api_key = api_key.or(self.dify.api_key.as_deref()).unwrap_or_default();
        DifyConfig::new(host, api_key)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Write the configuration, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(path, self.to_toml()?)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = CliConfig::load_from_path(Some(temp.path().join("none.toml")));

        assert_eq!(config.backend.base_url, "http://localhost:8888");
        assert!(config.flags.export_enabled);
        assert!(!config.flags.publish_enabled);
        assert_eq!(config.dify.scan_mode, ScanMode::Probe);
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "backend = [not toml").unwrap();

        let config = CliConfig::load_from_path(Some(path));
        assert!(config.user.id.is_none());
    }

    #[test]
    fn test_partial_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[backend]
base_url = "https://coze.internal"
token = "tok"

[user]
id = "u1"

[flags]
publish_enabled = true

[dify]
host = "https://dify.example.com"
scan_mode = "mock"
"#,
        )
        .unwrap();

        let config = CliConfig::load_from_path(Some(path));
        assert_eq!(config.backend.base_url, "https://coze.internal");
        assert_eq!(config.backend.token.as_deref(), Some("tok"));
        assert_eq!(config.user.id.as_deref(), Some("u1"));
        assert!(config.flags.publish_enabled);
        assert!(config.flags.import_enabled);
        assert_eq!(config.dify.scan_mode, ScanMode::Mock);
    }

    #[test]
    fn test_arguments_override_file() {
        let mut config = CliConfig::default();
        config.dify.host = Some("http://from-file".to_string());
        config.dify.api_key = Some("app-file".to_string());

        let dify = config.dify_config(Some("http://from-flag/"), None);
        assert_eq!(dify.base_url(), "http://from-flag");
        assert_eq!(dify.key(), "app-file");

        config.apply_backend_overrides(Some("http://b".to_string()), None);
        assert_eq!(config.backend.base_url, "http://b");
        assert!(config.backend.token.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let mut config = CliConfig::default();
        config.user.space_id = Some("space-1".to_string());

        config.save(&path).unwrap();
        let loaded = CliConfig::load_from_path(Some(path));
        assert_eq!(loaded.user.space_id.as_deref(), Some("space-1"));
    }
}
