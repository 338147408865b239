//! Pieces shared by the command handlers: backend access, console alerts
//! and the row-action handlers the CLI can honour.

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use colored::Colorize;
use flowdesk_core::client::BackendClient;
use flowdesk_core::models::{EditPayload, ResourceRecord};
use flowdesk_core::traits::{AlertLevel, Notifier, ResourceActionHandlers};
use tracing::info;

use crate::config::CliConfig;

pub fn backend_client(config: &CliConfig) -> Result<Arc<BackendClient>> {
    let client = BackendClient::new(&config.backend)
        .with_context(|| format!("Invalid backend URL '{}'", config.backend.base_url))?;
    Ok(Arc::new(client))
}

/// Explicit argument first, then `user.space_id` from the config file.
pub fn require_space_id(config: &CliConfig, space_id: Option<String>) -> Result<String> {
    match space_id.or_else(|| config.user.space_id.clone()) {
        Some(id) if !id.trim().is_empty() => Ok(id),
        _ => bail!("No space id given; pass --space-id or set user.space_id"),
    }
}

pub fn load_record(path: &std::path::Path) -> Result<ResourceRecord> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("{} is not a resource record", path.display()))
}

/// Alerts go to stderr so JSON output on stdout stays parseable.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, level: AlertLevel, message: &str) {
        match level {
            AlertLevel::Success => eprintln!("{} {}", "✓".green().bold(), message),
            AlertLevel::Error => eprintln!("{} {}", "✗".red().bold(), message),
        }
    }
}

/// Row actions available from a terminal. Edit has no form to open, so
/// the payload is kept for the caller to print. Everything else keeps the
/// trait's refusal.
#[derive(Default)]
pub struct CliHandlers {
    edit: Mutex<Option<EditPayload>>,
}

impl CliHandlers {
    pub fn take_edit(&self) -> Option<EditPayload> {
        self.edit.lock().ok().and_then(|mut slot| slot.take())
    }
}

#[async_trait]
impl ResourceActionHandlers for CliHandlers {
    async fn edit(&self, payload: EditPayload) -> Result<()> {
        let mut slot = self
            .edit
            .lock()
            .map_err(|_| anyhow::anyhow!("edit payload lock poisoned"))?;
        *slot = Some(payload);
        Ok(())
    }

    async fn refresh(&self) -> Result<()> {
        info!("Resource list refresh requested; nothing cached in the CLI");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowdesk_core::models::FlowMode;

    #[test]
    fn test_space_id_prefers_argument() {
        let mut config = CliConfig::default();
        config.user.space_id = Some("from-file".to_string());

        assert_eq!(
            require_space_id(&config, Some("from-flag".to_string())).unwrap(),
            "from-flag"
        );
        assert_eq!(require_space_id(&config, None).unwrap(), "from-file");
    }

    #[test]
    fn test_space_id_missing() {
        let err = require_space_id(&CliConfig::default(), Some("  ".to_string())).unwrap_err();
        assert!(err.to_string().contains("No space id"));
    }

    #[tokio::test]
    async fn test_handlers_keep_edit_payload() {
        let handlers = CliHandlers::default();
        handlers
            .edit(EditPayload {
                workflow_id: "1".to_string(),
                space_id: "s".to_string(),
                name: "n".to_string(),
                desc: String::new(),
                icon_uri: None,
                icon_url: None,
                flow_mode: FlowMode::Workflow,
            })
            .await
            .unwrap();

        assert_eq!(handlers.take_edit().unwrap().workflow_id, "1");
        assert!(handlers.take_edit().is_none());
    }

    #[tokio::test]
    async fn test_unsupported_actions_fail() {
        let record = ResourceRecord {
            name: "Triage".to_string(),
            ..Default::default()
        };
        let err = CliHandlers::default().delete(&record).await.unwrap_err();
        assert_eq!(err.to_string(), "delete is not supported for Triage");
    }
}
