use flowdesk_models::{DifyApp, DifyConfig, ImportedApp};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::register::{Registrar, RegistrationPlan, RegistrationReport};
use super::scan::AppScanner;
use super::{DifyError, Result, validate_config};

/// Lifecycle of the admin page within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PageState {
    #[default]
    Idle,
    Scanning,
    Scanned,
    Registering,
    Registered,
}

/// State behind the Dify integration page: connection form, scan
/// results, selection and the apps registered so far.
#[derive(Debug, Clone, Default)]
pub struct DifyPage {
    config: DifyConfig,
    state: PageState,
    scanned: Vec<DifyApp>,
    selected: Vec<String>,
    imported: Vec<ImportedApp>,
}

impl DifyPage {
    pub fn new(config: DifyConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &DifyConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DifyConfig) {
        self.config = config;
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn scanned(&self) -> &[DifyApp] {
        &self.scanned
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn imported(&self) -> &[ImportedApp] {
        &self.imported
    }

    /// Replace the scan results. The previous set is discarded, not merged.
    pub async fn scan(&mut self, scanner: &dyn AppScanner) -> Result<&[DifyApp]> {
        validate_config(&self.config)?;

        let previous = self.state;
        self.state = PageState::Scanning;
        let apps = scanner.scan(&self.config).await;

        info!(host = self.config.base_url(), count = apps.len(), "Dify scan finished");
        self.scanned = apps;
        self.selected
            .retain(|id| self.scanned.iter().any(|app| &app.id == id));
        self.state = if self.scanned.is_empty() {
            match previous {
                PageState::Registered => PageState::Registered,
                _ => PageState::Idle,
            }
        } else {
            PageState::Scanned
        };
        Ok(&self.scanned)
    }

    /// Add or remove an app from the selection. Returns whether it is now
    /// selected.
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

    /// Selected apps in selection order.
    pub fn selected_apps(&self) -> Vec<DifyApp> {
        self.selected
            .iter()
            .filter_map(|id| self.scanned.iter().find(|app| &app.id == id))
            .cloned()
            .collect()
    }

    /// Register every selected app. An empty selection is refused before
    /// any network call.
    ///
    /// On success the apps join the imported list and the selection is
    /// cleared. On failure the apps registered before the rejection still
    /// join the imported list, the selection is kept and the report comes
    /// back inside [`DifyError::BatchFailed`].
    pub async fn register(
        &mut self,
        registrar: &Registrar,
        now_ms: i64,
    ) -> Result<RegistrationReport> {
        validate_config(&self.config)?;
        let plan = RegistrationPlan::new(self.selected_apps())?;

        self.state = PageState::Registering;
        let report = registrar.run(&self.config, plan).await;

        self.imported
            .extend(report.succeeded().map(|app| ImportedApp {
                app: app.clone(),
                plugin_name: app.name.clone(),
                registered_at: now_ms,
            }));

        if report.is_success() {
            self.selected.clear();
            self.state = PageState::Registered;
            Ok(report)
        } else {
            self.state = PageState::Scanned;
            Err(DifyError::BatchFailed(report))
        }
    }
}
