//! Dify integration: discover apps on a Dify host and register them as
//! backend plugins.
//!
//! The admin page flow lives in [`DifyPage`]; the companion import dialog
//! with its URL, file and text channels lives in [`ImportModal`].

mod infer;
mod modal;
mod page;
mod register;
mod scan;

pub use infer::{AppTypeInference, PrefixInference, infer_app_type, invocation_url};
pub use modal::{ImportModal, ImportSource, parse_apps_file, parse_apps_text};
pub use page::{DifyPage, PageState};
pub use register::{
    PLUGIN_USER_AGENT, Registrar, RegistrationPlan, RegistrationReport, RegistrationTask,
    TaskStatus, build_plugin_meta,
};
pub use scan::{AppScanner, MockScanner, ProbeScanner, ScanMode, synthesized_name};

use flowdesk_models::DifyConfig;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DifyError {
    #[error("Dify {0} is required")]
    MissingConfig(&'static str),

    #[error("Invalid Dify host: {0}")]
    InvalidHost(String),

    #[error("No apps selected")]
    EmptySelection,

    #[error("App '{0}' is not in the current scan results")]
    UnknownApp(String),

    #[error("Invalid app list: {0}")]
    InvalidAppList(String),

    #[error("{}", .0.summary())]
    BatchFailed(RegistrationReport),
}

pub type Result<T> = std::result::Result<T, DifyError>;

/// Check the form before any network use.
pub fn validate_config(config: &DifyConfig) -> Result<()> {
    let host = config.base_url();
    if host.is_empty() {
        return Err(DifyError::MissingConfig("host"));
    }
    if config.key().is_empty() {
        return Err(DifyError::MissingConfig("API key"));
    }

    let parsed = url::Url::parse(host).map_err(|e| DifyError::InvalidHost(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(DifyError::InvalidHost(format!(
            "scheme '{scheme}' is not supported"
        ))),
    }
}
