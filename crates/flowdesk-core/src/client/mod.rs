//! HTTP implementations of the backend and Dify contracts.

mod backend;
mod dify;
mod http;

pub use backend::{BackendClient, BackendConfig};
pub use dify::DifyClient;
pub use http::{DEFAULT_TIMEOUT_SECS, build_http_client};
