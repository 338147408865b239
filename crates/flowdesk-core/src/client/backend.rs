//! Client for the workflow and plugin REST endpoints.

use std::time::Duration;

use async_trait::async_trait;
use flowdesk_models::WorkflowDetail;
use flowdesk_traits::{
    ApiError, CreateWorkflowRequest, PluginApi, RegisterPluginMetaRequest, Result, WorkflowApi,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::http::{DEFAULT_TIMEOUT_SECS, build_http_client};

const CANVAS_PATH: &str = "/api/workflow_api/canvas";
const CREATE_PATH: &str = "/api/workflow_api/create";
const SAVE_PATH: &str = "/api/workflow_api/save";
const REGISTER_PLUGIN_PATH: &str = "/api/plugin_api/register_plugin_meta";

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    /// Bearer token sent as `Authorization`
    #[serde(default)]
    pub token: Option<String>,
    /// Raw `Cookie` header for session-authenticated deployments
    #[serde(default)]
    pub cookie: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8888".to_string(),
            token: None,
            cookie: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// Standard `{code, msg, data}` response wrapper.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    msg: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct CanvasData {
    workflow: Option<WorkflowDetail>,
}

#[derive(Debug, Deserialize)]
struct CreateData {
    workflow_id: String,
}

pub struct BackendClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    cookie: Option<String>,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        url::Url::parse(&base_url)
            .map_err(|e| ApiError::InvalidRequest(format!("backend URL '{base_url}': {e}")))?;

        Ok(Self {
            client: build_http_client(Duration::from_secs(config.timeout_secs)),
            base_url,
            token: config.token.clone().filter(|t| !t.is_empty()),
            cookie: config.cookie.clone().filter(|c| !c.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post(&self, path: &str) -> RequestBuilder {
        let mut request = self.client.post(format!("{}{}", self.base_url, path));
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }
        if let Some(ref cookie) = self.cookie {
            request = request.header(reqwest::header::COOKIE, cookie);
        }
        request
    }

    async fn send(&self, path: &str, body: &impl Serialize) -> Result<reqwest::Response> {
        debug!(path, "POST backend");
        let response = self
            .post(path)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::status(status.as_u16(), message));
        }
        Ok(response)
    }

    /// POST and unwrap the envelope; a non-zero `code` is an error.
    async fn call<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<Option<T>> {
        let envelope: Envelope<T> = self
            .send(path, body)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        if envelope.code != 0 {
            return Err(ApiError::Backend {
                code: envelope.code,
                message: envelope.msg,
            });
        }
        Ok(envelope.data)
    }
}

#[async_trait]
impl WorkflowApi for BackendClient {
    async fn get_workflow_detail(
        &self,
        space_id: &str,
        workflow_id: &str,
    ) -> Result<Option<WorkflowDetail>> {
        let data: Option<CanvasData> = self
            .call(
                CANVAS_PATH,
                &json!({ "workflow_id": workflow_id, "space_id": space_id }),
            )
            .await?;
        Ok(data.and_then(|d| d.workflow))
    }

    async fn create_workflow(&self, request: &CreateWorkflowRequest) -> Result<String> {
        let data: Option<CreateData> = self.call(CREATE_PATH, request).await?;
        data.map(|d| d.workflow_id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::Decode("create response has no workflow_id".to_string()))
    }

    async fn save_workflow_schema(
        &self,
        space_id: &str,
        workflow_id: &str,
        schema: &str,
    ) -> Result<()> {
        let _: Option<serde_json::Value> = self
            .call(
                SAVE_PATH,
                &json!({ "workflow_id": workflow_id, "space_id": space_id, "schema": schema }),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl PluginApi for BackendClient {
    /// Any 2xx counts as registered.
    async fn register_plugin_meta(&self, request: &RegisterPluginMetaRequest) -> Result<()> {
        self.send(REGISTER_PLUGIN_PATH, request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = BackendClient::new(&BackendConfig::new("http://localhost:8888/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8888");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            BackendClient::new(&BackendConfig::new("not a url")),
            Err(ApiError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_envelope_without_data() {
        let envelope: Envelope<CanvasData> =
            serde_json::from_str(r#"{"code":0,"msg":"success"}"#).unwrap();
        assert!(envelope.data.is_none());
    }
}
