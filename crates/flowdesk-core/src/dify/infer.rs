use flowdesk_models::{DifyApp, DifyAppType};

/// Strategy for deciding an app's type when the host does not say.
pub trait AppTypeInference: Send + Sync {
    fn infer(&self, api_key: &str) -> DifyAppType;
}

/// Key-prefix heuristic, see [`infer_app_type`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixInference;

impl AppTypeInference for PrefixInference {
    fn infer(&self, api_key: &str) -> DifyAppType {
        infer_app_type(api_key)
    }
}

/// `app-` keys are chat apps, `workflow-` keys are workflows, anything
/// else is treated as chat.
pub fn infer_app_type(api_key: &str) -> DifyAppType {
    let key = api_key.trim();
    if key.starts_with("workflow-") {
        DifyAppType::Workflow
    } else {
        DifyAppType::Chat
    }
}

/// Endpoint the registered plugin calls.
pub fn invocation_url(host: &str, app: &DifyApp) -> String {
    let host = host.trim().trim_end_matches('/');
    match app.app_type {
        DifyAppType::Chat => format!("{host}/v1/chat-messages"),
        DifyAppType::Completion | DifyAppType::Workflow => {
            format!("{host}/v1/workflows/{}/run", app.id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(id: &str, app_type: DifyAppType) -> DifyApp {
        DifyApp {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            app_type,
            endpoint: None,
        }
    }

    #[test]
    fn test_infer_app_type() {
        assert_eq!(infer_app_type("app-abc"), DifyAppType::Chat);
        assert_eq!(infer_app_type("workflow-abc"), DifyAppType::Workflow);
        assert_eq!(infer_app_type("sk-abc"), DifyAppType::Chat);
        assert_eq!(infer_app_type(""), DifyAppType::Chat);
    }

    #[test]
    fn test_chat_invocation_url() {
        let chat = app("app-abc", infer_app_type("app-abc"));
        assert_eq!(chat.app_type, DifyAppType::Chat);
        assert_eq!(invocation_url("http://h", &chat), "http://h/v1/chat-messages");
    }

    #[test]
    fn test_workflow_invocation_url() {
        let workflow = app("workflow-9", DifyAppType::Workflow);
        assert_eq!(
            invocation_url("http://h/", &workflow),
            "http://h/v1/workflows/workflow-9/run"
        );
        let completion = app("c1", DifyAppType::Completion);
        assert_eq!(
            invocation_url("http://h", &completion),
            "http://h/v1/workflows/c1/run"
        );
    }
}
