//! Workflow resource records as listed by the backend resource library.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Kind of library resource a row represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    #[default]
    Workflow,
    Plugin,
    Knowledge,
    Prompt,
    Database,
    #[serde(other)]
    Other,
}

/// Flow mode of a workflow resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FlowMode {
    #[default]
    Workflow,
    Chatflow,
    Imageflow,
}

impl FlowMode {
    pub fn as_str(self) -> &'static str {
        match self {
            FlowMode::Workflow => "workflow",
            FlowMode::Chatflow => "chatflow",
            FlowMode::Imageflow => "imageflow",
        }
    }
}

/// Action keys the backend can grant on a resource row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKey {
    Edit,
    Copy,
    Delete,
    SwitchToChatflow,
    SwitchToWorkflow,
    #[serde(other)]
    Unknown,
}

/// One server-granted action entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAction {
    pub key: ActionKey,
    /// Absent means enabled; only an explicit `false` disables.
    #[serde(default = "default_enable")]
    pub enable: bool,
}

fn default_enable() -> bool {
    true
}

impl ResourceAction {
    pub fn new(key: ActionKey, enable: bool) -> Self {
        Self { key, enable }
    }
}

/// Store review status of the plugin product attached to a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductDraftStatus {
    /// Never submitted.
    #[default]
    Default,
    Pending,
    Approved,
    Rejected,
    Offline,
    #[serde(other)]
    Unknown,
}

impl ProductDraftStatus {
    /// Numeric wire code used by older backends.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => ProductDraftStatus::Default,
            1 => ProductDraftStatus::Pending,
            2 => ProductDraftStatus::Approved,
            3 => ProductDraftStatus::Rejected,
            4 => ProductDraftStatus::Offline,
            _ => ProductDraftStatus::Unknown,
        }
    }

    pub fn has_been_submitted(self) -> bool {
        !matches!(self, ProductDraftStatus::Default)
    }
}

/// Structured view of the opaque `biz_extend` blob.
///
/// Each field is read on its own: a value of the wrong shape falls back to
/// that field's default without discarding the others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BizExtend {
    #[serde(default, deserialize_with = "lenient_status")]
    pub product_draft_status: ProductDraftStatus,
    /// Associated plugin id, `0` when none.
    #[serde(default, deserialize_with = "lenient_id")]
    pub plugin_id: u64,
}

impl BizExtend {
    /// Parse the raw blob. Malformed input degrades to the default value.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::default();
        };

        match serde_json::from_str(raw) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(error = %err, "Failed to parse biz_extend, using defaults");
                Self::default()
            }
        }
    }
}

/// The backend sends ids either as JSON numbers or as decimal strings.
fn lenient_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_u64().unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Status arrives as a snake_case name or as its numeric code.
fn lenient_status<'de, D>(deserializer: D) -> Result<ProductDraftStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => ProductDraftStatus::Default,
        serde_json::Value::Number(n) => n
            .as_i64()
            .map_or(ProductDraftStatus::Unknown, ProductDraftStatus::from_code),
        serde_json::Value::String(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(code) => ProductDraftStatus::from_code(code),
                Err(_) => serde_json::from_value(serde_json::Value::String(s.to_string()))
                    .unwrap_or(ProductDraftStatus::Unknown),
            }
        }
        _ => ProductDraftStatus::Unknown,
    })
}

/// A workflow resource row. Owned by the backend, read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ResourceRecord {
    #[serde(default)]
    pub res_id: Option<String>,
    #[serde(default)]
    pub space_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub icon_uri: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub res_type: ResourceType,
    #[serde(default)]
    pub res_sub_type: FlowMode,
    #[serde(default)]
    pub creator_id: Option<String>,
    #[serde(default)]
    pub actions: Vec<ResourceAction>,
    #[serde(default)]
    pub biz_extend: Option<String>,
}

impl ResourceRecord {
    /// Look up the server entry for an action key.
    pub fn action(&self, key: ActionKey) -> Option<&ResourceAction> {
        self.actions.iter().find(|a| a.key == key)
    }

    pub fn biz_extend(&self) -> BizExtend {
        BizExtend::parse(self.biz_extend.as_deref())
    }

    pub fn is_created_by(&self, user_id: &str) -> bool {
        self.creator_id.as_deref().is_some_and(|id| id == user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_enable_defaults_to_true() {
        let action: ResourceAction = serde_json::from_str(r#"{"key":"edit"}"#).unwrap();
        assert_eq!(action.key, ActionKey::Edit);
        assert!(action.enable);
    }

    #[test]
    fn test_unknown_action_key() {
        let action: ResourceAction =
            serde_json::from_str(r#"{"key":"enable_or_disable","enable":false}"#).unwrap();
        assert_eq!(action.key, ActionKey::Unknown);
    }

    #[test]
    fn test_retired_action_key_is_unknown() {
        let action: ResourceAction =
            serde_json::from_str(r#"{"key":"cross_space_copy"}"#).unwrap();
        assert_eq!(action.key, ActionKey::Unknown);
    }

    #[test]
    fn test_biz_extend_numeric_status() {
        let biz = BizExtend::parse(Some(r#"{"product_draft_status":1,"plugin_id":"88"}"#));
        assert_eq!(biz.product_draft_status, ProductDraftStatus::Pending);
        assert_eq!(biz.plugin_id, 88);

        let biz = BizExtend::parse(Some(r#"{"product_draft_status":"3"}"#));
        assert_eq!(biz.product_draft_status, ProductDraftStatus::Rejected);
    }

    #[test]
    fn test_biz_extend_bad_status_keeps_plugin_id() {
        let biz = BizExtend::parse(Some(r#"{"product_draft_status":99,"plugin_id":"88"}"#));
        assert_eq!(biz.product_draft_status, ProductDraftStatus::Unknown);
        assert_eq!(biz.plugin_id, 88);

        let biz = BizExtend::parse(Some(r#"{"product_draft_status":{"v":1},"plugin_id":7}"#));
        assert_eq!(biz.product_draft_status, ProductDraftStatus::Unknown);
        assert_eq!(biz.plugin_id, 7);

        let biz = BizExtend::parse(Some(r#"{"product_draft_status":null,"plugin_id":7}"#));
        assert_eq!(biz.product_draft_status, ProductDraftStatus::Default);
    }

    #[test]
    fn test_biz_extend_string_plugin_id() {
        let biz = BizExtend::parse(Some(
            r#"{"product_draft_status":"pending","plugin_id":"7301"}"#,
        ));
        assert_eq!(biz.plugin_id, 7301);
        assert_eq!(biz.product_draft_status, ProductDraftStatus::Pending);
    }

    #[test]
    fn test_biz_extend_numeric_plugin_id() {
        let biz = BizExtend::parse(Some(r#"{"plugin_id":42}"#));
        assert_eq!(biz.plugin_id, 42);
        assert_eq!(biz.product_draft_status, ProductDraftStatus::Default);
    }

    #[test]
    fn test_biz_extend_malformed() {
        assert_eq!(BizExtend::parse(Some("{not json")), BizExtend::default());
        assert_eq!(BizExtend::parse(None), BizExtend::default());
        assert_eq!(BizExtend::parse(Some("   ")), BizExtend::default());
    }

    #[test]
    fn test_is_created_by() {
        let record = ResourceRecord {
            creator_id: Some("u1".to_string()),
            ..Default::default()
        };
        assert!(record.is_created_by("u1"));
        assert!(!record.is_created_by("u2"));
        assert!(!ResourceRecord::default().is_created_by("u1"));
    }
}
