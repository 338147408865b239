use serde::{Deserialize, Serialize};

use crate::resource::FlowMode;

/// Feature switches that gate menu entries.
///
/// Always passed explicitly; nothing reads flags from global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Publishing workflows to the store is available at all.
    pub publish_enabled: bool,
    /// Imageflow resources may be published.
    pub imageflow_publish_enabled: bool,
    pub export_enabled: bool,
    pub import_enabled: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            publish_enabled: false,
            imageflow_publish_enabled: false,
            export_enabled: true,
            import_enabled: true,
        }
    }
}

/// Ambient inputs for menu construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MenuContext {
    pub user_id: String,
    #[serde(default)]
    pub flags: FeatureFlags,
}

impl MenuContext {
    pub fn new(user_id: impl Into<String>, flags: FeatureFlags) -> Self {
        Self {
            user_id: user_id.into(),
            flags,
        }
    }
}

/// Row action identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuAction {
    Edit,
    SwitchToChatflow,
    SwitchToWorkflow,
    Export,
    Import,
    Publish,
    Copy,
    Delete,
    /// Entry contributed by the caller's common-actions hook.
    Custom(String),
}

impl MenuAction {
    pub fn id(&self) -> &str {
        match self {
            MenuAction::Edit => "edit",
            MenuAction::SwitchToChatflow => "switch_to_chatflow",
            MenuAction::SwitchToWorkflow => "switch_to_workflow",
            MenuAction::Export => "export",
            MenuAction::Import => "import",
            MenuAction::Publish => "publish",
            MenuAction::Copy => "copy",
            MenuAction::Delete => "delete",
            MenuAction::Custom(id) => id,
        }
    }

    /// Parse an action id as typed on the command line. Unrecognised ids
    /// are treated as custom actions.
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().replace('-', "_").as_str() {
            "edit" => MenuAction::Edit,
            "switch_to_chatflow" => MenuAction::SwitchToChatflow,
            "switch_to_workflow" => MenuAction::SwitchToWorkflow,
            "export" => MenuAction::Export,
            "import" => MenuAction::Import,
            "publish" => MenuAction::Publish,
            "copy" => MenuAction::Copy,
            "delete" => MenuAction::Delete,
            _ => MenuAction::Custom(input.trim().to_string()),
        }
    }
}

/// A single entry as rendered in the row menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub action: MenuAction,
    pub label: String,
    pub enabled: bool,
    pub visible: bool,
}

impl ActionDescriptor {
    pub fn new(action: MenuAction, label: impl Into<String>, visible: bool, enabled: bool) -> Self {
        Self {
            action,
            label: label.into(),
            enabled: visible && enabled,
            visible,
        }
    }

    pub fn is_actionable(&self) -> bool {
        self.visible && self.enabled
    }
}

/// Delete and copy render through a dedicated composite control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeActions {
    pub copy: ActionDescriptor,
    pub delete: ActionDescriptor,
}

/// Full menu for one resource row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMenu {
    pub actions: Vec<ActionDescriptor>,
    pub composite: CompositeActions,
}

impl ResourceMenu {
    /// Entries that render in the row list, in order.
    pub fn visible(&self) -> impl Iterator<Item = &ActionDescriptor> {
        self.actions.iter().filter(|a| a.visible)
    }

    /// Find an entry by action, including the composite control.
    pub fn find(&self, action: &MenuAction) -> Option<&ActionDescriptor> {
        self.actions
            .iter()
            .chain([&self.composite.copy, &self.composite.delete])
            .find(|a| &a.action == action)
    }
}

/// Payload handed to the edit form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditPayload {
    pub workflow_id: String,
    pub space_id: String,
    pub name: String,
    pub desc: String,
    pub icon_uri: Option<String>,
    pub icon_url: Option<String>,
    pub flow_mode: FlowMode,
}
