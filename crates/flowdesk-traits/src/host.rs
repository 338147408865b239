//! Host-side interaction: choosing files, saving downloads, alerting the user.

use std::path::PathBuf;

use async_trait::async_trait;

/// A file chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub name: String,
    pub contents: Vec<u8>,
}

#[async_trait]
pub trait FilePicker: Send + Sync {
    /// `Ok(None)` when the user cancelled.
    async fn pick_json_file(&self) -> std::io::Result<Option<PickedFile>>;
}

#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Save a generated file and return where it landed.
    async fn save(&self, file_name: &str, contents: &[u8]) -> std::io::Result<PathBuf>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Success,
    Error,
}

/// Blocking user-facing messages.
pub trait Notifier: Send + Sync {
    fn alert(&self, level: AlertLevel, message: &str);
}
