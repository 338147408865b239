use async_trait::async_trait;
use flowdesk_models::{EditPayload, ResourceRecord};

/// Side-effecting row actions owned by the caller.
///
/// Confirmation prompts, conversion calls and navigation happen inside the
/// implementation. Handlers that a caller does not support keep the
/// default, which fails with a descriptive error.
#[async_trait]
pub trait ResourceActionHandlers: Send + Sync {
    async fn edit(&self, payload: EditPayload) -> anyhow::Result<()>;

    async fn copy(&self, record: &ResourceRecord) -> anyhow::Result<()> {
        anyhow::bail!("copy is not supported for {}", record.name)
    }

    async fn delete(&self, record: &ResourceRecord) -> anyhow::Result<()> {
        anyhow::bail!("delete is not supported for {}", record.name)
    }

    async fn publish(&self, record: &ResourceRecord) -> anyhow::Result<()> {
        anyhow::bail!("publish is not supported for {}", record.name)
    }

    async fn switch_to_chatflow(&self, record: &ResourceRecord) -> anyhow::Result<()> {
        anyhow::bail!("chatflow conversion is not supported for {}", record.name)
    }

    async fn switch_to_workflow(&self, record: &ResourceRecord) -> anyhow::Result<()> {
        anyhow::bail!("workflow conversion is not supported for {}", record.name)
    }

    async fn custom(&self, action_id: &str, record: &ResourceRecord) -> anyhow::Result<()> {
        anyhow::bail!("action {action_id} is not supported for {}", record.name)
    }

    /// Reload the resource list after a successful import.
    async fn refresh(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
