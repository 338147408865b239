//! FlowDesk core logic.
//!
//! - `menu`: derive row actions for a workflow resource and dispatch them
//! - `transfer`: workflow export/import documents
//! - `dify`: scan a Dify host, select apps, register them as plugins
//! - `client`: HTTP implementations of the backend and Dify contracts
//! - `host`: filesystem-backed file picker and download sink

pub mod client;
pub mod dify;
pub mod host;
pub mod menu;
pub mod transfer;

pub use flowdesk_models as models;
pub use flowdesk_traits as traits;

/// Identifier stamped into export metadata and request user agents.
pub const CLIENT_NAME: &str = concat!("flowdesk/", env!("CARGO_PKG_VERSION"));
