//! Filesystem-backed host services for non-interactive front ends.

use std::path::PathBuf;

use async_trait::async_trait;
use flowdesk_traits::{AlertLevel, DownloadSink, FilePicker, Notifier, PickedFile};
use tokio::fs;
use tracing::{error, info};

/// Saves downloads into a directory, creating it when needed.
#[derive(Debug, Clone)]
pub struct DirectoryDownloadSink {
    dir: PathBuf,
}

impl DirectoryDownloadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DownloadSink for DirectoryDownloadSink {
    async fn save(&self, file_name: &str, contents: &[u8]) -> std::io::Result<PathBuf> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(file_name);
        fs::write(&path, contents).await?;
        Ok(path)
    }
}

/// "Picks" a file chosen up front, e.g. from a command-line argument.
/// With no path it behaves like a cancelled dialog.
#[derive(Debug, Clone, Default)]
pub struct PathFilePicker {
    path: Option<PathBuf>,
}

impl PathFilePicker {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

#[async_trait]
impl FilePicker for PathFilePicker {
    async fn pick_json_file(&self) -> std::io::Result<Option<PickedFile>> {
        let Some(path) = &self.path else {
            return Ok(None);
        };
        let contents = fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Some(PickedFile { name, contents }))
    }
}

/// Routes alerts to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, level: AlertLevel, message: &str) {
        match level {
            AlertLevel::Success => info!(message, "alert"),
            AlertLevel::Error => error!(message, "alert"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_sink_creates_directory() {
        let temp = TempDir::new().unwrap();
        let sink = DirectoryDownloadSink::new(temp.path().join("exports"));

        let path = sink.save("wf_1.json", b"{}").await.unwrap();

        assert_eq!(path, temp.path().join("exports").join("wf_1.json"));
        assert_eq!(std::fs::read(&path).unwrap(), b"{}");
    }

    #[tokio::test]
    async fn test_picker_without_path_is_cancelled() {
        assert!(PathFilePicker::default().pick_json_file().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_picker_reads_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("wf.json");
        std::fs::write(&path, b"[1]").unwrap();

        let picked = PathFilePicker::new(Some(path)).pick_json_file().await.unwrap().unwrap();
        assert_eq!(picked.name, "wf.json");
        assert_eq!(picked.contents, b"[1]");
    }
}
