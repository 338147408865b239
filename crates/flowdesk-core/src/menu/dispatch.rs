use std::path::PathBuf;
use std::sync::Arc;

use flowdesk_models::{MenuAction, MenuContext, ResourceMenu, ResourceRecord};
use flowdesk_traits::{
    AlertLevel, DownloadSink, FilePicker, Notifier, ResourceActionHandlers, WorkflowApi,
};
use tracing::{info, warn};

use super::{CommonActionsHook, MenuError, NoCommonActions, Result, build_menu, to_edit_payload};
use crate::transfer::{export_workflow, import_workflow};

/// Host services used by export and import.
#[derive(Clone)]
pub struct TransferHost {
    pub picker: Arc<dyn FilePicker>,
    pub sink: Arc<dyn DownloadSink>,
    pub notifier: Arc<dyn Notifier>,
}

/// What a dispatched action produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Handled,
    /// Path of the saved export, `None` when export gave up.
    Exported(Option<PathBuf>),
    /// Id of the created workflow, `None` when import was cancelled or failed.
    Imported(Option<String>),
}

/// Routes menu selections for one viewer.
pub struct ActionDispatcher {
    context: MenuContext,
    handlers: Arc<dyn ResourceActionHandlers>,
    workflows: Arc<dyn WorkflowApi>,
    host: TransferHost,
    hook: Arc<dyn CommonActionsHook>,
}

impl ActionDispatcher {
    pub fn new(
        context: MenuContext,
        handlers: Arc<dyn ResourceActionHandlers>,
        workflows: Arc<dyn WorkflowApi>,
        host: TransferHost,
    ) -> Self {
        Self {
            context,
            handlers,
            workflows,
            host,
            hook: Arc::new(NoCommonActions),
        }
    }

    /// Install the list page's common-actions hook.
    pub fn with_common_actions(mut self, hook: Arc<dyn CommonActionsHook>) -> Self {
        self.hook = hook;
        self
    }

    pub fn context(&self) -> &MenuContext {
        &self.context
    }

    pub fn menu(&self, record: &ResourceRecord) -> ResourceMenu {
        build_menu(record, &self.context, self.hook.as_ref())
    }

    /// Run an action. Entries that are hidden or disabled are refused
    /// before any handler runs.
    pub async fn dispatch(
        &self,
        action: &MenuAction,
        record: &ResourceRecord,
    ) -> Result<DispatchOutcome> {
        let menu = self.menu(record);
        let actionable = menu.find(action).is_some_and(|entry| entry.is_actionable());
        if !actionable {
            return Err(MenuError::ActionUnavailable(action.id().to_string()));
        }

        info!(action = action.id(), res_id = ?record.res_id, "Dispatching resource action");

        let handled = match action {
            MenuAction::Edit => {
                let Some(payload) = to_edit_payload(record) else {
                    warn!(res_id = ?record.res_id, "Edit refused: resource is missing ids");
                    return Err(MenuError::MissingIds(action.id().to_string()));
                };
                self.handlers.edit(payload).await
            }
            MenuAction::Export => {
                let saved = export_workflow(
                    self.workflows.as_ref(),
                    record,
                    self.host.sink.as_ref(),
                    Some(self.context.user_id.as_str()),
                )
                .await;
                return Ok(DispatchOutcome::Exported(saved));
            }
            MenuAction::Import => return Ok(DispatchOutcome::Imported(self.import(record).await)),
            MenuAction::Publish => self.handlers.publish(record).await,
            MenuAction::SwitchToChatflow => self.handlers.switch_to_chatflow(record).await,
            MenuAction::SwitchToWorkflow => self.handlers.switch_to_workflow(record).await,
            MenuAction::Copy => self.handlers.copy(record).await,
            MenuAction::Delete => self.handlers.delete(record).await,
            MenuAction::Custom(id) => self.handlers.custom(id, record).await,
        };

        handled.map_err(|err| MenuError::Handler {
            action: action.id().to_string(),
            message: format!("{err:#}"),
        })?;
        Ok(DispatchOutcome::Handled)
    }

    async fn import(&self, record: &ResourceRecord) -> Option<String> {
        let Some(space_id) = record.space_id.as_deref().filter(|id| !id.is_empty()) else {
            warn!("Import skipped: no target space");
            self.host
                .notifier
                .alert(AlertLevel::Error, "Import failed: no target space selected");
            return None;
        };

        let created = import_workflow(
            self.workflows.as_ref(),
            self.host.picker.as_ref(),
            self.host.notifier.as_ref(),
            space_id,
            chrono::Local::now(),
        )
        .await?;

        if let Err(err) = self.handlers.refresh().await {
            warn!(error = %err, "Resource list refresh failed after import");
        }
        Some(created)
    }
}
