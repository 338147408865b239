use std::time::Duration;

use reqwest::Client;
use tracing::warn;

use crate::CLIENT_NAME;

const DISABLE_SYSTEM_PROXY_ENV: &str = "FLOWDESK_DISABLE_SYSTEM_PROXY";

/// Default timeout for backend and Dify calls (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub fn build_http_client(timeout: Duration) -> Client {
    let mut builder = Client::builder().timeout(timeout).user_agent(CLIENT_NAME);
    if should_disable_system_proxy() {
        builder = builder.no_proxy();
    }

    builder.build().unwrap_or_else(|err| {
        warn!(error = %err, "Falling back to default HTTP client");
        Client::new()
    })
}

fn should_disable_system_proxy() -> bool {
    if std::env::var_os(DISABLE_SYSTEM_PROXY_ENV).is_some() {
        return true;
    }

    cfg!(test)
}
