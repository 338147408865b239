use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use comfy_table::{Cell, Color, Table};
use flowdesk_core::client::DifyClient;
use flowdesk_core::dify::{
    AppScanner, DifyError, DifyPage, ImportModal, MockScanner, ProbeScanner, Registrar,
    RegistrationPlan, RegistrationReport, ScanMode, TaskStatus, validate_config,
};
use flowdesk_core::models::{DifyApp, DifyConfig};
use tracing::info;

use crate::cli::{DifyCommands, DifyConnectionArgs, DifyImportArgs};
use crate::commands::shared::backend_client;
use crate::config::CliConfig;
use crate::output::table::print_table;
use crate::output::{OutputFormat, json::print_json};

pub async fn run(config: &CliConfig, command: DifyCommands, format: OutputFormat) -> Result<()> {
    match command {
        DifyCommands::Scan { connection } => scan(config, &connection, format).await,
        DifyCommands::Register {
            connection,
            apps,
            space_id,
            check,
        } => register(config, &connection, &apps, space_id, check, format).await,
        DifyCommands::Import(args) => import(config, args, format).await,
    }
}

fn scanner_for(config: &CliConfig, offline: bool) -> Box<dyn AppScanner> {
    let mode = if offline {
        ScanMode::Mock
    } else {
        config.dify.scan_mode
    };
    match mode {
        ScanMode::Probe => Box::new(ProbeScanner::new(Arc::new(DifyClient::new()))),
        ScanMode::Mock => Box::new(MockScanner::new()),
    }
}

fn connection_config(config: &CliConfig, connection: &DifyConnectionArgs) -> DifyConfig {
    config.dify_config(connection.host.as_deref(), connection.api_key.as_deref())
}

fn registrar(config: &CliConfig, space_id: Option<String>, check: bool) -> Result<Registrar> {
    let mut registrar = Registrar::new(backend_client(config)?);
    if let Some(space_id) = space_id.or_else(|| config.user.space_id.clone()) {
        registrar = registrar.with_space_id(space_id);
    }
    if check {
        registrar = registrar.with_reachability_check(Arc::new(DifyClient::new()));
    }
    Ok(registrar)
}

async fn scan(config: &CliConfig, connection: &DifyConnectionArgs, format: OutputFormat) -> Result<()> {
    let mut page = DifyPage::new(connection_config(config, connection));
    let apps = page
        .scan(scanner_for(config, connection.offline).as_ref())
        .await?;

    if format.is_json() {
        return print_json(&apps);
    }
    print_apps(apps)
}

async fn register(
    config: &CliConfig,
    connection: &DifyConnectionArgs,
    apps: &[String],
    space_id: Option<String>,
    check: bool,
    format: OutputFormat,
) -> Result<()> {
    let mut page = DifyPage::new(connection_config(config, connection));
    page.scan(scanner_for(config, connection.offline).as_ref())
        .await?;

    let chosen: Vec<String> = if apps.is_empty() {
        page.scanned().iter().map(|app| app.id.clone()).collect()
    } else {
        apps.to_vec()
    };
    for id in &chosen {
        page.toggle(id)?;
    }

    let registrar = registrar(config, space_id, check)?;
    match page.register(&registrar, Utc::now().timestamp_millis()).await {
        Ok(report) => print_report(&report, format),
        Err(DifyError::BatchFailed(report)) => {
            print_report(&report, format)?;
            Err(DifyError::BatchFailed(report).into())
        }
        Err(err) => Err(err.into()),
    }
}

async fn import(config: &CliConfig, args: DifyImportArgs, format: OutputFormat) -> Result<()> {
    let mut modal = ImportModal::new();
    if let Some(url) = &args.url {
        let dify = config.dify_config(Some(url), args.api_key.as_deref());
        modal
            .scan_url(scanner_for(config, args.offline).as_ref(), &dify)
            .await?;
    } else if let Some(path) = &args.file {
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        modal.load_file(&bytes)?;
    } else if let Some(text) = &args.text {
        modal.load_text(text)?;
    }

    if args.select.is_empty() {
        modal.select_all();
    } else {
        for id in &args.select {
            modal.toggle(id)?;
        }
    }

    let mut chosen: Vec<DifyApp> = Vec::new();
    let count = modal.commit(|apps| chosen = apps)?;
    info!(count, "Apps chosen from import dialog");

    if !args.register {
        if format.is_json() {
            return print_json(&chosen);
        }
        return print_apps(&chosen);
    }

    let dify = config.dify_config(args.url.as_deref(), args.api_key.as_deref());
    validate_config(&dify)?;
    let plan = RegistrationPlan::new(chosen)?;
    let report = registrar(config, args.space_id, false)?.run(&dify, plan).await;

    print_report(&report, format)?;
    if report.is_success() {
        Ok(())
    } else {
        Err(DifyError::BatchFailed(report).into())
    }
}

/// API keys double as app ids; only a prefix is shown in tables.
fn masked(id: &str) -> String {
    let prefix: String = id.chars().take(8).collect();
    if prefix.len() < id.len() {
        format!("{prefix}…")
    } else {
        prefix
    }
}

fn print_apps(apps: &[DifyApp]) -> Result<()> {
    if apps.is_empty() {
        println!("No apps found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Type", "Endpoint"]);
    for app in apps {
        table.add_row(vec![
            Cell::new(masked(&app.id)),
            Cell::new(&app.name),
            Cell::new(app.app_type.as_str()),
            Cell::new(app.endpoint.as_deref().unwrap_or("-")),
        ]);
    }
    print_table(table)
}

fn print_report(report: &RegistrationReport, format: OutputFormat) -> Result<()> {
    if format.is_json() {
        return print_json(report);
    }

    let mut table = Table::new();
    table.set_header(vec!["App", "Type", "Status"]);
    for task in &report.tasks {
        let status = match &task.status {
            TaskStatus::Pending => Cell::new("pending"),
            TaskStatus::Registered => Cell::new("registered").fg(Color::Green),
            TaskStatus::Failed(reason) => Cell::new(format!("failed: {reason}")).fg(Color::Red),
            TaskStatus::Skipped => Cell::new("skipped").fg(Color::DarkGrey),
        };
        table.add_row(vec![
            Cell::new(&task.app.name),
            Cell::new(task.app.app_type.as_str()),
            status,
        ]);
    }
    print_table(table)?;
    println!("{}", report.summary());
    Ok(())
}
