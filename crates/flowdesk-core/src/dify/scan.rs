use std::sync::Arc;

use async_trait::async_trait;
use flowdesk_models::{DifyApp, DifyConfig};
use flowdesk_traits::DifyProbe;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::infer::{AppTypeInference, PrefixInference, invocation_url};

/// How candidate apps are discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// Ask the host for the app name, fall back to a synthesised one.
    #[default]
    Probe,
    /// Offline: synthesise candidates without touching the network.
    Mock,
}

/// Produces the candidate list for a configured host and key.
#[async_trait]
pub trait AppScanner: Send + Sync {
    async fn scan(&self, config: &DifyConfig) -> Vec<DifyApp>;
}

pub fn synthesized_name(api_key: &str) -> String {
    let key = api_key.trim();
    let prefix: String = key.chars().take(12).collect();
    if prefix.len() < key.len() {
        format!("Dify App ({prefix}…)")
    } else {
        format!("Dify App ({prefix})")
    }
}

fn candidate(
    config: &DifyConfig,
    inference: &dyn AppTypeInference,
    name: String,
    description: String,
) -> DifyApp {
    let mut app = DifyApp {
        id: config.key().to_string(),
        name,
        description,
        app_type: inference.infer(config.key()),
        endpoint: None,
    };
    app.endpoint = Some(invocation_url(config.base_url(), &app));
    app
}

/// Scanner that probes `GET {host}/v1/info` for a display name.
pub struct ProbeScanner {
    probe: Arc<dyn DifyProbe>,
    inference: Arc<dyn AppTypeInference>,
}

impl ProbeScanner {
    pub fn new(probe: Arc<dyn DifyProbe>) -> Self {
        Self {
            probe,
            inference: Arc::new(PrefixInference),
        }
    }

    pub fn with_inference(mut self, inference: Arc<dyn AppTypeInference>) -> Self {
        self.inference = inference;
        self
    }
}

#[async_trait]
impl AppScanner for ProbeScanner {
    async fn scan(&self, config: &DifyConfig) -> Vec<DifyApp> {
        let (name, description) = match self.probe.fetch_app_info(config).await {
            Ok(info) if !info.name.trim().is_empty() => {
                debug!(host = config.base_url(), name = %info.name, "Dify probe succeeded");
                (info.name, info.description)
            }
            Ok(_) => {
                warn!(host = config.base_url(), "Dify probe returned no name");
                (synthesized_name(config.key()), String::new())
            }
            Err(err) => {
                warn!(host = config.base_url(), error = %err, "Dify probe failed, using synthesized name");
                (synthesized_name(config.key()), String::new())
            }
        };

        vec![candidate(config, self.inference.as_ref(), name, description)]
    }
}

/// Scanner that never touches the network.
pub struct MockScanner {
    inference: Arc<dyn AppTypeInference>,
}

impl MockScanner {
    pub fn new() -> Self {
        Self {
            inference: Arc::new(PrefixInference),
        }
    }
}

impl Default for MockScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AppScanner for MockScanner {
    async fn scan(&self, config: &DifyConfig) -> Vec<DifyApp> {
        let description = format!("Application on {}", config.base_url());
        vec![candidate(
            config,
            self.inference.as_ref(),
            synthesized_name(config.key()),
            description,
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowdesk_models::DifyAppType;
    use flowdesk_traits::{ApiError, DifyAppInfo};

    struct FixedProbe(Option<DifyAppInfo>);

    #[async_trait]
    impl DifyProbe for FixedProbe {
        async fn fetch_app_info(&self, _config: &DifyConfig) -> flowdesk_traits::Result<DifyAppInfo> {
            self.0
                .clone()
                .ok_or_else(|| ApiError::Network("connection refused".to_string()))
        }
    }

    struct AlwaysWorkflow;

    impl AppTypeInference for AlwaysWorkflow {
        fn infer(&self, _api_key: &str) -> DifyAppType {
            DifyAppType::Workflow
        }
    }

    #[test]
    fn test_synthesized_name() {
        assert_eq!(synthesized_name("app-abc"), "Dify App (app-abc)");
        assert_eq!(
            synthesized_name("app-0123456789abcdef"),
            "Dify App (app-01234567…)"
        );
    }

    #[tokio::test]
    async fn test_probe_uses_remote_name() {
        let scanner = ProbeScanner::new(Arc::new(FixedProbe(Some(DifyAppInfo {
            name: "Support Bot".to_string(),
            description: "Answers tickets".to_string(),
            tags: vec![],
        }))));
        let apps = scanner.scan(&DifyConfig::new("http://h", "app-abc")).await;

        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].name, "Support Bot");
        assert_eq!(apps[0].id, "app-abc");
        assert_eq!(apps[0].app_type, DifyAppType::Chat);
        assert_eq!(apps[0].endpoint.as_deref(), Some("http://h/v1/chat-messages"));
    }

    #[tokio::test]
    async fn test_probe_failure_falls_back() {
        let scanner = ProbeScanner::new(Arc::new(FixedProbe(None)));
        let apps = scanner.scan(&DifyConfig::new("http://h", "workflow-1")).await;

        assert_eq!(apps[0].name, "Dify App (workflow-1)");
        assert_eq!(apps[0].app_type, DifyAppType::Workflow);
    }

    #[tokio::test]
    async fn test_custom_inference() {
        let scanner = ProbeScanner::new(Arc::new(FixedProbe(None)))
            .with_inference(Arc::new(AlwaysWorkflow));
        let apps = scanner.scan(&DifyConfig::new("http://h", "app-abc")).await;
        assert_eq!(apps[0].app_type, DifyAppType::Workflow);
    }

    #[tokio::test]
    async fn test_mock_scanner() {
        let apps = MockScanner::new()
            .scan(&DifyConfig::new("http://h/", "app-abc"))
            .await;
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].description, "Application on http://h");
        assert_eq!(apps[0].endpoint.as_deref(), Some("http://h/v1/chat-messages"));
    }
}
