use flowdesk_models::{DIFY_APPS_DOCUMENT_TYPE, DifyApp, DifyAppType, DifyConfig};
use serde::Deserialize;
use tracing::{info, warn};

use super::infer::infer_app_type;
use super::scan::AppScanner;
use super::{DifyError, Result, validate_config};

/// Which channel filled the modal's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportSource {
    Url,
    File,
    Text,
}

/// Loosely typed app entry accepted from files and pasted text.
#[derive(Debug, Deserialize)]
struct AppEntry {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "type")]
    app_type: Option<DifyAppType>,
    #[serde(default)]
    endpoint: Option<String>,
}

impl AppEntry {
    fn into_app(self) -> DifyApp {
        let app_type = self.app_type.unwrap_or_else(|| infer_app_type(&self.id));
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.id.clone());
        DifyApp {
            id: self.id,
            name,
            description: self.description.unwrap_or_default(),
            app_type,
            endpoint: self.endpoint,
        }
    }
}

fn collect_apps(value: serde_json::Value) -> Result<Vec<DifyApp>> {
    let entries: Vec<AppEntry> =
        serde_json::from_value(value).map_err(|e| DifyError::InvalidAppList(e.to_string()))?;

    let mut apps: Vec<DifyApp> = Vec::with_capacity(entries.len());
    for entry in entries {
        if entry.id.trim().is_empty() {
            warn!("Skipping app entry without id");
            continue;
        }
        if apps.iter().any(|app| app.id == entry.id) {
            warn!(id = %entry.id, "Skipping duplicate app entry");
            continue;
        }
        apps.push(entry.into_app());
    }
    Ok(apps)
}

fn check_marker(object: &serde_json::Map<String, serde_json::Value>, required: bool) -> Result<()> {
    match object.get("type").and_then(|t| t.as_str()) {
        Some(DIFY_APPS_DOCUMENT_TYPE) => Ok(()),
        None if !required => Ok(()),
        Some(other) => Err(DifyError::InvalidAppList(format!(
            "expected type '{DIFY_APPS_DOCUMENT_TYPE}', found '{other}'"
        ))),
        None => Err(DifyError::InvalidAppList(format!(
            "missing type '{DIFY_APPS_DOCUMENT_TYPE}'"
        ))),
    }
}

/// Parse an uploaded app list file. The format marker is mandatory.
pub fn parse_apps_file(bytes: &[u8]) -> Result<Vec<DifyApp>> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| DifyError::InvalidAppList(e.to_string()))?;
    let serde_json::Value::Object(mut object) = value else {
        return Err(DifyError::InvalidAppList(
            "expected a JSON object".to_string(),
        ));
    };
    check_marker(&object, true)?;

    let apps = object
        .remove("apps")
        .ok_or_else(|| DifyError::InvalidAppList("missing 'apps' array".to_string()))?;
    collect_apps(apps)
}

/// Parse pasted text: either a bare array of apps or an object with an
/// `apps` array. A marker, when present, must match.
pub fn parse_apps_text(text: &str) -> Result<Vec<DifyApp>> {
    let value: serde_json::Value =
        serde_json::from_str(text.trim()).map_err(|e| DifyError::InvalidAppList(e.to_string()))?;

    match value {
        serde_json::Value::Array(_) => collect_apps(value),
        serde_json::Value::Object(mut object) => {
            check_marker(&object, false)?;
            let apps = object
                .remove("apps")
                .ok_or_else(|| DifyError::InvalidAppList("missing 'apps' array".to_string()))?;
            collect_apps(apps)
        }
        _ => Err(DifyError::InvalidAppList(
            "expected an array or an object with 'apps'".to_string(),
        )),
    }
}

/// The import dialog. Three channels fill one shared list; the commit
/// hands the selection to the caller and performs no network call.
#[derive(Debug, Clone, Default)]
pub struct ImportModal {
    scanned: Vec<DifyApp>,
    selected: Vec<String>,
    source: Option<ImportSource>,
}

impl ImportModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scanned(&self) -> &[DifyApp] {
        &self.scanned
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn source(&self) -> Option<ImportSource> {
        self.source
    }

    fn replace(&mut self, apps: Vec<DifyApp>, source: ImportSource) -> &[DifyApp] {
        info!(?source, count = apps.len(), "Import list loaded");
        self.scanned = apps;
        self.selected.clear();
        self.source = Some(source);
        &self.scanned
    }

    pub async fn scan_url(
        &mut self,
        scanner: &dyn AppScanner,
        config: &DifyConfig,
    ) -> Result<&[DifyApp]> {
        validate_config(config)?;
        let apps = scanner.scan(config).await;
        Ok(self.replace(apps, ImportSource::Url))
    }

    pub fn load_file(&mut self, bytes: &[u8]) -> Result<&[DifyApp]> {
        let apps = parse_apps_file(bytes)?;
        Ok(self.replace(apps, ImportSource::File))
    }

    pub fn load_text(&mut self, text: &str) -> Result<&[DifyApp]> {
        let apps = parse_apps_text(text)?;
        Ok(self.replace(apps, ImportSource::Text))
    }

    pub fn toggle(&mut self, app_id: &str) -> Result<bool> {
        if !self.scanned.iter().any(|app| app.id == app_id) {
            return Err(DifyError::UnknownApp(app_id.to_string()));
        }
        if let Some(pos) = self.selected.iter().position(|id| id == app_id) {
            self.selected.remove(pos);
            Ok(false)
        } else {
            self.selected.push(app_id.to_string());
            Ok(true)
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.scanned.iter().map(|app| app.id.clone()).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Hand the selected apps, in list order, to `on_success` and reset
    /// the dialog. Returns how many apps were handed over.
    pub fn commit<F>(&mut self, on_success: F) -> Result<usize>
    where
        F: FnOnce(Vec<DifyApp>),
    {
        let chosen: Vec<DifyApp> = self
            .scanned
            .iter()
            .filter(|app| self.selected.contains(&app.id))
            .cloned()
            .collect();
        if chosen.is_empty() {
            return Err(DifyError::EmptySelection);
        }

        let count = chosen.len();
        on_success(chosen);
        *self = Self::default();
        Ok(count)
    }
}
