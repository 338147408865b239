//! Backend and external service contracts.
//!
//! Implementations live in `flowdesk-core::client`; tests substitute
//! in-memory fakes.

use std::collections::BTreeMap;

use async_trait::async_trait;
use flowdesk_models::{DifyConfig, FlowMode, WorkflowDetail};
use serde::{Deserialize, Serialize};

use crate::error::Result;

// ── WorkflowApi ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWorkflowRequest {
    pub space_id: String,
    pub name: String,
    pub desc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_uri: Option<String>,
    pub flow_mode: FlowMode,
}

#[async_trait]
pub trait WorkflowApi: Send + Sync {
    /// Fetch the full canvas detail. `Ok(None)` when the backend answers
    /// without a workflow body.
    async fn get_workflow_detail(
        &self,
        space_id: &str,
        workflow_id: &str,
    ) -> Result<Option<WorkflowDetail>>;

    /// Create an empty workflow resource and return its id.
    async fn create_workflow(&self, request: &CreateWorkflowRequest) -> Result<String>;

    /// Persist a canvas schema on an existing workflow.
    async fn save_workflow_schema(
        &self,
        space_id: &str,
        workflow_id: &str,
        schema: &str,
    ) -> Result<()>;
}

// ── PluginApi ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PluginIcon {
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonParam {
    pub name: String,
    pub value: String,
}

/// Body of `POST /api/plugin_api/register_plugin_meta`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterPluginMetaRequest {
    pub name: String,
    pub desc: String,
    pub url: String,
    pub icon: PluginIcon,
    pub plugin_type: i32,
    pub creation_method: i32,
    pub auth_type: Vec<i32>,
    pub sub_auth_type: i32,
    /// Where the credential is sent; `1` is a request header.
    pub location: i32,
    /// Header name carrying the credential.
    pub key: String,
    pub service_token: String,
    /// Keyed by parameter location; `"4"` is request headers.
    pub common_params: BTreeMap<String, Vec<CommonParam>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
}

#[async_trait]
pub trait PluginApi: Send + Sync {
    async fn register_plugin_meta(&self, request: &RegisterPluginMetaRequest) -> Result<()>;
}

// ── DifyProbe ────────────────────────────────────────────────────────

/// Subset of `GET /v1/info` used to label scanned apps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DifyAppInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[async_trait]
pub trait DifyProbe: Send + Sync {
    async fn fetch_app_info(&self, config: &DifyConfig) -> Result<DifyAppInfo>;
}
