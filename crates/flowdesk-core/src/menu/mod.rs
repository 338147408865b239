//! Resource row menu.
//!
//! `build_menu` is a pure function of the record and the caller context.
//! `ActionDispatcher` routes a chosen entry to the injected handlers or to
//! the export/import operations.

mod dispatch;

pub use dispatch::{ActionDispatcher, DispatchOutcome, TransferHost};

use flowdesk_models::{
    ActionDescriptor, ActionKey, CompositeActions, EditPayload, FlowMode, MenuAction, MenuContext,
    ResourceMenu, ResourceRecord, ResourceType,
};
use thiserror::Error;

pub const LABEL_EDIT: &str = "Edit";
pub const LABEL_SWITCH_TO_CHATFLOW: &str = "Switch to chatflow";
pub const LABEL_SWITCH_TO_WORKFLOW: &str = "Switch to workflow";
pub const LABEL_EXPORT: &str = "Export";
pub const LABEL_IMPORT: &str = "Import";
pub const LABEL_PUBLISH: &str = "Publish to store";
pub const LABEL_REPUBLISH: &str = "Resubmit to store";
pub const LABEL_COPY: &str = "Copy";
pub const LABEL_DELETE: &str = "Delete";

#[derive(Error, Debug)]
pub enum MenuError {
    #[error("Action '{0}' is not available for this resource")]
    ActionUnavailable(String),

    #[error("Action '{0}' needs a resource with both a workflow id and a space id")]
    MissingIds(String),

    #[error("Action '{action}' failed: {message}")]
    Handler { action: String, message: String },
}

pub type Result<T> = std::result::Result<T, MenuError>;

/// Extra entries supplied by the list page, appended after the built-ins.
pub trait CommonActionsHook: Send + Sync {
    fn extra_actions(&self, record: &ResourceRecord) -> Vec<ActionDescriptor>;
}

/// Hook that contributes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCommonActions;

impl CommonActionsHook for NoCommonActions {
    fn extra_actions(&self, _record: &ResourceRecord) -> Vec<ActionDescriptor> {
        Vec::new()
    }
}

impl<F> CommonActionsHook for F
where
    F: Fn(&ResourceRecord) -> Vec<ActionDescriptor> + Send + Sync,
{
    fn extra_actions(&self, record: &ResourceRecord) -> Vec<ActionDescriptor> {
        self(record)
    }
}

/// Build the row menu for a record. Rows that are not workflows get every
/// entry hidden, so dispatch refuses them.
pub fn build_menu(
    record: &ResourceRecord,
    context: &MenuContext,
    hook: &dyn CommonActionsHook,
) -> ResourceMenu {
    if record.res_type != ResourceType::Workflow {
        return hidden_menu(record);
    }

    let flags = &context.flags;

    let mut actions = vec![
        server_gated(record, ActionKey::Edit, MenuAction::Edit, LABEL_EDIT),
        server_gated(
            record,
            ActionKey::SwitchToChatflow,
            MenuAction::SwitchToChatflow,
            LABEL_SWITCH_TO_CHATFLOW,
        ),
        server_gated(
            record,
            ActionKey::SwitchToWorkflow,
            MenuAction::SwitchToWorkflow,
            LABEL_SWITCH_TO_WORKFLOW,
        ),
        ActionDescriptor::new(MenuAction::Export, LABEL_EXPORT, flags.export_enabled, true),
        ActionDescriptor::new(MenuAction::Import, LABEL_IMPORT, flags.import_enabled, true),
        ActionDescriptor::new(
            MenuAction::Publish,
            publish_label(record),
            publish_visible(record, context),
            true,
        ),
    ];
    actions.extend(hook.extra_actions(record));

    ResourceMenu {
        actions,
        composite: CompositeActions {
            copy: server_gated(record, ActionKey::Copy, MenuAction::Copy, LABEL_COPY),
            delete: server_gated(record, ActionKey::Delete, MenuAction::Delete, LABEL_DELETE),
        },
    }
}

fn hidden_menu(record: &ResourceRecord) -> ResourceMenu {
    let hidden = |action, label: &str| ActionDescriptor::new(action, label, false, false);

    ResourceMenu {
        actions: vec![
            hidden(MenuAction::Edit, LABEL_EDIT),
            hidden(MenuAction::SwitchToChatflow, LABEL_SWITCH_TO_CHATFLOW),
            hidden(MenuAction::SwitchToWorkflow, LABEL_SWITCH_TO_WORKFLOW),
            hidden(MenuAction::Export, LABEL_EXPORT),
            hidden(MenuAction::Import, LABEL_IMPORT),
            hidden(MenuAction::Publish, publish_label(record)),
        ],
        composite: CompositeActions {
            copy: hidden(MenuAction::Copy, LABEL_COPY),
            delete: hidden(MenuAction::Delete, LABEL_DELETE),
        },
    }
}

/// Visible only when the server listed the key; enabled unless it said `false`.
fn server_gated(
    record: &ResourceRecord,
    key: ActionKey,
    action: MenuAction,
    label: &str,
) -> ActionDescriptor {
    match record.action(key) {
        Some(entry) => ActionDescriptor::new(action, label, true, entry.enable),
        None => ActionDescriptor::new(action, label, false, false),
    }
}

/// Publishing requires the global switch, an allowed flow mode, ownership
/// and an attached plugin.
pub fn publish_visible(record: &ResourceRecord, context: &MenuContext) -> bool {
    let flags = &context.flags;
    if !flags.publish_enabled {
        return false;
    }
    if record.res_sub_type == FlowMode::Imageflow && !flags.imageflow_publish_enabled {
        return false;
    }
    if !record.is_created_by(&context.user_id) {
        return false;
    }
    record.biz_extend().plugin_id != 0
}

pub fn publish_label(record: &ResourceRecord) -> &'static str {
    if record.biz_extend().product_draft_status.has_been_submitted() {
        LABEL_REPUBLISH
    } else {
        LABEL_PUBLISH
    }
}

/// Shape a record into the edit form payload. `None` when ids are missing.
pub fn to_edit_payload(record: &ResourceRecord) -> Option<EditPayload> {
    let workflow_id = record.res_id.clone().filter(|id| !id.is_empty())?;
    let space_id = record.space_id.clone().filter(|id| !id.is_empty())?;

    Some(EditPayload {
        workflow_id,
        space_id,
        name: record.name.clone(),
        desc: record.desc.clone(),
        icon_uri: record.icon_uri.clone(),
        icon_url: record.icon_url.clone(),
        flow_mode: record.res_sub_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowdesk_models::{FeatureFlags, ResourceAction};

    fn record_with(actions: Vec<ResourceAction>) -> ResourceRecord {
        ResourceRecord {
            res_id: Some("7001".to_string()),
            space_id: Some("space-1".to_string()),
            name: "Order triage".to_string(),
            creator_id: Some("u1".to_string()),
            actions,
            biz_extend: Some(r#"{"plugin_id":"88","product_draft_status":"default"}"#.to_string()),
            ..Default::default()
        }
    }

    fn publish_context(user: &str) -> MenuContext {
        MenuContext::new(
            user,
            FeatureFlags {
                publish_enabled: true,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_missing_key_hides_entry() {
        let record = record_with(vec![ResourceAction::new(ActionKey::Copy, true)]);
        let menu = build_menu(&record, &MenuContext::default(), &NoCommonActions);

        assert!(menu.visible().all(|a| a.action != MenuAction::Edit));
        assert!(!menu.composite.delete.visible);
        assert!(menu.composite.copy.visible);
    }

    #[test]
    fn test_explicit_false_disables_but_shows() {
        let record = record_with(vec![ResourceAction::new(ActionKey::Edit, false)]);
        let menu = build_menu(&record, &MenuContext::default(), &NoCommonActions);
        let edit = menu.find(&MenuAction::Edit).unwrap();

        assert!(edit.visible);
        assert!(!edit.enabled);
    }

    #[test]
    fn test_export_and_import_always_visible() {
        let menu = build_menu(&ResourceRecord::default(), &MenuContext::default(), &NoCommonActions);
        let ids: Vec<_> = menu.visible().map(|a| a.action.clone()).collect();
        assert_eq!(ids, vec![MenuAction::Export, MenuAction::Import]);
    }

    #[test]
    fn test_row_order() {
        let record = record_with(vec![
            ResourceAction::new(ActionKey::SwitchToChatflow, true),
            ResourceAction::new(ActionKey::Edit, true),
        ]);
        let menu = build_menu(&record, &publish_context("u1"), &NoCommonActions);
        let ids: Vec<_> = menu.visible().map(|a| a.action.id().to_string()).collect();
        assert_eq!(
            ids,
            vec!["edit", "switch_to_chatflow", "export", "import", "publish"]
        );
    }

    #[test]
    fn test_publish_requires_creator() {
        let record = record_with(vec![]);
        assert!(publish_visible(&record, &publish_context("u1")));
        assert!(!publish_visible(&record, &publish_context("someone-else")));
    }

    #[test]
    fn test_publish_requires_flag_and_plugin() {
        let record = record_with(vec![]);
        assert!(!publish_visible(&record, &MenuContext::new("u1", FeatureFlags::default())));

        let mut no_plugin = record.clone();
        no_plugin.biz_extend = Some(r#"{"plugin_id":"0"}"#.to_string());
        assert!(!publish_visible(&no_plugin, &publish_context("u1")));
    }

    #[test]
    fn test_imageflow_publish_gate() {
        let mut record = record_with(vec![]);
        record.res_sub_type = FlowMode::Imageflow;
        assert!(!publish_visible(&record, &publish_context("u1")));

        let mut context = publish_context("u1");
        context.flags.imageflow_publish_enabled = true;
        assert!(publish_visible(&record, &context));
    }

    #[test]
    fn test_publish_label_by_draft_status() {
        let mut record = record_with(vec![]);
        assert_eq!(publish_label(&record), LABEL_PUBLISH);

        record.biz_extend = Some(r#"{"plugin_id":"88","product_draft_status":"rejected"}"#.to_string());
        assert_eq!(publish_label(&record), LABEL_REPUBLISH);
    }

    #[test]
    fn test_non_workflow_record_gets_hidden_menu() {
        let mut record = record_with(vec![
            ResourceAction::new(ActionKey::Edit, true),
            ResourceAction::new(ActionKey::Copy, true),
            ResourceAction::new(ActionKey::Delete, true),
        ]);
        record.res_type = ResourceType::Plugin;
        let hook = |_: &ResourceRecord| {
            vec![ActionDescriptor::new(MenuAction::Custom("pin".to_string()), "Pin", true, true)]
        };
        let menu = build_menu(&record, &publish_context("u1"), &hook);

        assert_eq!(menu.visible().count(), 0);
        assert!(!menu.find(&MenuAction::Export).unwrap().is_actionable());
        assert!(menu.find(&MenuAction::Custom("pin".to_string())).is_none());
        assert!(!menu.composite.copy.visible);
        assert!(!menu.composite.delete.visible);
    }

    #[test]
    fn test_numeric_draft_status_still_publishes() {
        let mut record = record_with(vec![]);
        record.biz_extend = Some(r#"{"product_draft_status":1,"plugin_id":"88"}"#.to_string());

        assert!(publish_visible(&record, &publish_context("u1")));
        assert_eq!(publish_label(&record), LABEL_REPUBLISH);
    }

    #[test]
    fn test_common_actions_hook_appends() {
        let hook = |record: &ResourceRecord| {
            vec![ActionDescriptor::new(
                MenuAction::Custom("pin".to_string()),
                format!("Pin {}", record.name),
                true,
                true,
            )]
        };
        let menu = build_menu(&ResourceRecord::default(), &MenuContext::default(), &hook);
        let last = menu.actions.last().unwrap();
        assert_eq!(last.action, MenuAction::Custom("pin".to_string()));
    }

    #[test]
    fn test_edit_payload() {
        let record = record_with(vec![]);
        let payload = to_edit_payload(&record).unwrap();
        assert_eq!(payload.workflow_id, "7001");
        assert_eq!(payload.space_id, "space-1");
        assert_eq!(payload.name, "Order triage");

        let mut missing = record.clone();
        missing.res_id = None;
        assert!(to_edit_payload(&missing).is_none());
    }
}
