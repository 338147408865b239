use std::collections::BTreeMap;
use std::sync::Arc;

use flowdesk_models::{DifyApp, DifyConfig};
use flowdesk_traits::{
    CommonParam, DifyProbe, PluginApi, PluginIcon, RegisterPluginMetaRequest,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::infer::invocation_url;
use super::{DifyError, Result};

/// Static user agent sent with every plugin call.
pub const PLUGIN_USER_AGENT: &str = "Dify-Plugin/1.0";

const PLUGIN_TYPE_HTTP: i32 = 1;
const CREATION_METHOD_FORM: i32 = 1;
const AUTH_TYPE_SERVICE: i32 = 1;
const SUB_AUTH_TYPE_TOKEN: i32 = 0;
const LOCATION_HEADER: i32 = 1;
const PARAM_LOCATION_HEADER: &str = "4";

/// Build the plugin registration body for one app.
pub fn build_plugin_meta(
    app: &DifyApp,
    config: &DifyConfig,
    space_id: Option<&str>,
) -> RegisterPluginMetaRequest {
    let description = if app.description.trim().is_empty() {
        format!("Dify {} app imported from {}", app.app_type, config.base_url())
    } else {
        app.description.clone()
    };

    let url = app
        .endpoint
        .as_deref()
        .map(str::trim)
        .filter(|endpoint| !endpoint.is_empty())
        .map_or_else(|| invocation_url(config.base_url(), app), str::to_string);

    let mut common_params = BTreeMap::new();
    common_params.insert(
        PARAM_LOCATION_HEADER.to_string(),
        vec![CommonParam {
            name: "User-Agent".to_string(),
            value: PLUGIN_USER_AGENT.to_string(),
        }],
    );

    RegisterPluginMetaRequest {
        name: app.name.clone(),
        desc: description,
        url,
        icon: PluginIcon::default(),
        plugin_type: PLUGIN_TYPE_HTTP,
        creation_method: CREATION_METHOD_FORM,
        auth_type: vec![AUTH_TYPE_SERVICE],
        sub_auth_type: SUB_AUTH_TYPE_TOKEN,
        location: LOCATION_HEADER,
        key: "Authorization".to_string(),
        service_token: format!("Bearer {}", config.key()),
        common_params,
        space_id: space_id.map(str::to_string),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Registered,
    Failed(String),
    /// Not attempted because an earlier task failed.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationTask {
    pub app: DifyApp,
    pub status: TaskStatus,
}

/// Ordered list of apps to register, in selection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationPlan {
    tasks: Vec<RegistrationTask>,
}

impl RegistrationPlan {
    /// Refuses an empty selection.
    pub fn new(apps: Vec<DifyApp>) -> Result<Self> {
        if apps.is_empty() {
            return Err(DifyError::EmptySelection);
        }
        Ok(Self {
            tasks: apps
                .into_iter()
                .map(|app| RegistrationTask {
                    app,
                    status: TaskStatus::Pending,
                })
                .collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn tasks(&self) -> &[RegistrationTask] {
        &self.tasks
    }
}

/// Per-task outcome of a registration batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationReport {
    pub tasks: Vec<RegistrationTask>,
}

impl RegistrationReport {
    pub fn is_success(&self) -> bool {
        self.tasks
            .iter()
            .all(|t| t.status == TaskStatus::Registered)
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &DifyApp> {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Registered)
            .map(|t| &t.app)
    }

    pub fn failed(&self) -> Option<(&DifyApp, &str)> {
        self.tasks.iter().find_map(|t| match &t.status {
            TaskStatus::Failed(reason) => Some((&t.app, reason.as_str())),
            _ => None,
        })
    }

    pub fn summary(&self) -> String {
        let registered = self.succeeded().count();
        match self.failed() {
            Some((_, reason)) => format!(
                "Registration failed after {registered} of {} apps: {reason}",
                self.tasks.len()
            ),
            None => format!("Registered {registered} apps"),
        }
    }
}

/// Runs registration plans against the backend.
pub struct Registrar {
    plugins: Arc<dyn PluginApi>,
    probe: Option<Arc<dyn DifyProbe>>,
    space_id: Option<String>,
}

impl Registrar {
    pub fn new(plugins: Arc<dyn PluginApi>) -> Self {
        Self {
            plugins,
            probe: None,
            space_id: None,
        }
    }

    /// Re-check host reachability before each registration. Failures are
    /// logged only.
    pub fn with_reachability_check(mut self, probe: Arc<dyn DifyProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn with_space_id(mut self, space_id: impl Into<String>) -> Self {
        self.space_id = Some(space_id.into());
        self
    }

    /// Register each app in order, one awaited call at a time. Stops at the
    /// first rejection; earlier registrations stay in place.
    pub async fn run(&self, config: &DifyConfig, plan: RegistrationPlan) -> RegistrationReport {
        let mut tasks = plan.tasks;
        let mut aborted = false;

        for task in tasks.iter_mut() {
            if aborted {
                task.status = TaskStatus::Skipped;
                continue;
            }

            if let Some(probe) = &self.probe
                && let Err(err) = probe.fetch_app_info(config).await
            {
                warn!(app = %task.app.name, error = %err, "Dify host unreachable, registering anyway");
            }

            let request = build_plugin_meta(&task.app, config, self.space_id.as_deref());
            match self.plugins.register_plugin_meta(&request).await {
                Ok(()) => {
                    info!(app = %task.app.name, url = %request.url, "Registered Dify app as plugin");
                    task.status = TaskStatus::Registered;
                }
                Err(err) => {
                    warn!(app = %task.app.name, error = %err, "Plugin registration rejected");
                    task.status = TaskStatus::Failed(format!(
                        "failed to register '{}': {err}",
                        task.app.name
                    ));
                    aborted = true;
                }
            }
        }

        RegistrationReport { tasks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowdesk_models::DifyAppType;

    fn app(id: &str, app_type: DifyAppType) -> DifyApp {
        DifyApp {
            id: id.to_string(),
            name: format!("App {id}"),
            description: String::new(),
            app_type,
            endpoint: None,
        }
    }

    #[test]
    fn test_build_plugin_meta_chat() {
        let config = DifyConfig::new("http://h/", "app-abc");
        let meta = build_plugin_meta(&app("app-abc", DifyAppType::Chat), &config, Some("s1"));

        assert_eq!(meta.url, "http://h/v1/chat-messages");
        assert_eq!(meta.key, "Authorization");
        assert_eq!(meta.service_token, "Bearer app-abc");
        assert_eq!(meta.location, LOCATION_HEADER);
        assert_eq!(meta.space_id.as_deref(), Some("s1"));
        assert_eq!(meta.common_params["4"][0].value, PLUGIN_USER_AGENT);
        assert!(meta.desc.contains("chat"));
    }

    #[test]
    fn test_build_plugin_meta_serializes_header_params() {
        let config = DifyConfig::new("http://h", "workflow-1");
        let meta = build_plugin_meta(&app("wf", DifyAppType::Workflow), &config, None);
        let value = serde_json::to_value(&meta).unwrap();

        assert_eq!(value["url"], "http://h/v1/workflows/wf/run");
        assert_eq!(value["common_params"]["4"][0]["name"], "User-Agent");
        assert!(value.get("space_id").is_none());
    }

    #[test]
    fn test_build_plugin_meta_prefers_app_endpoint() {
        let config = DifyConfig::new("http://h", "app-abc");
        let mut custom = app("app-abc", DifyAppType::Chat);
        custom.endpoint = Some(" https://gateway.local/dify/chat ".to_string());

        let meta = build_plugin_meta(&custom, &config, None);
        assert_eq!(meta.url, "https://gateway.local/dify/chat");

        custom.endpoint = Some("   ".to_string());
        let meta = build_plugin_meta(&custom, &config, None);
        assert_eq!(meta.url, "http://h/v1/chat-messages");
    }

    #[test]
    fn test_empty_plan_rejected() {
        assert!(matches!(
            RegistrationPlan::new(vec![]),
            Err(DifyError::EmptySelection)
        ));
    }

    #[test]
    fn test_report_summary() {
        let report = RegistrationReport {
            tasks: vec![
                RegistrationTask {
                    app: app("a", DifyAppType::Chat),
                    status: TaskStatus::Registered,
                },
                RegistrationTask {
                    app: app("b", DifyAppType::Chat),
                    status: TaskStatus::Failed("failed to register 'App b': HTTP 500".to_string()),
                },
                RegistrationTask {
                    app: app("c", DifyAppType::Chat),
                    status: TaskStatus::Skipped,
                },
            ],
        };

        assert!(!report.is_success());
        assert_eq!(report.succeeded().count(), 1);
        assert_eq!(report.failed().unwrap().0.id, "b");
        assert_eq!(
            report.summary(),
            "Registration failed after 1 of 3 apps: failed to register 'App b': HTTP 500"
        );
    }
}
