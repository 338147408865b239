use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use comfy_table::{Cell, Table};
use flowdesk_core::host::{DirectoryDownloadSink, PathFilePicker};
use flowdesk_core::menu::{ActionDispatcher, DispatchOutcome, NoCommonActions, TransferHost, build_menu};
use flowdesk_core::models::{ActionDescriptor, EditPayload, MenuAction, MenuContext, ResourceRecord};
use serde::Serialize;

use crate::cli::{MenuCommands, ViewerArgs};
use crate::commands::shared::{CliHandlers, ConsoleNotifier, backend_client, load_record};
use crate::config::CliConfig;
use crate::output::table::{flag_cell, print_table};
use crate::output::{OutputFormat, json::print_json};

pub async fn run(config: &CliConfig, command: MenuCommands, format: OutputFormat) -> Result<()> {
    match command {
        MenuCommands::Show { viewer } => show_menu(config, &viewer, format),
        MenuCommands::Run {
            action,
            viewer,
            file,
            out_dir,
        } => run_action(config, &action, &viewer, file, out_dir, format).await,
    }
}

fn menu_context(config: &CliConfig, viewer: &ViewerArgs) -> MenuContext {
    let user_id = viewer
        .user_id
        .clone()
        .or_else(|| config.user.id.clone())
        .unwrap_or_default();
    MenuContext::new(user_id, config.flags)
}

fn show_menu(config: &CliConfig, viewer: &ViewerArgs, format: OutputFormat) -> Result<()> {
    let record = load_record(&viewer.record)?;
    let menu = build_menu(&record, &menu_context(config, viewer), &NoCommonActions);

    if format.is_json() {
        return print_json(&menu);
    }

    println!(
        "{} ({})",
        record.name,
        record.res_id.as_deref().unwrap_or("no id")
    );

    let mut table = Table::new();
    table.set_header(vec!["Action", "Label", "Visible", "Enabled"]);
    for entry in &menu.actions {
        table.add_row(descriptor_row(entry));
    }
    for entry in [&menu.composite.copy, &menu.composite.delete] {
        table.add_row(descriptor_row(entry));
    }

    print_table(table)
}

fn descriptor_row(entry: &ActionDescriptor) -> Vec<Cell> {
    vec![
        Cell::new(entry.action.id()),
        Cell::new(&entry.label),
        flag_cell(entry.visible),
        flag_cell(entry.enabled),
    ]
}

#[derive(Debug, Serialize)]
struct ActionResult {
    action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    edit: Option<EditPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exported_to: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    workflow_id: Option<String>,
}

async fn run_action(
    config: &CliConfig,
    action: &str,
    viewer: &ViewerArgs,
    file: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let action = MenuAction::parse(action);
    if action == MenuAction::Import && file.is_none() {
        bail!("Import needs an export document; pass --file");
    }

    let record: ResourceRecord = load_record(&viewer.record)?;
    let handlers = Arc::new(CliHandlers::default());
    let host = TransferHost {
        picker: Arc::new(PathFilePicker::new(file)),
        sink: Arc::new(DirectoryDownloadSink::new(
            out_dir.unwrap_or_else(|| config.export_dir()),
        )),
        notifier: Arc::new(ConsoleNotifier),
    };
    let dispatcher = ActionDispatcher::new(
        menu_context(config, viewer),
        handlers.clone(),
        backend_client(config)?,
        host,
    );

    let outcome = dispatcher.dispatch(&action, &record).await?;

    let mut result = ActionResult {
        action: action.id().to_string(),
        edit: handlers.take_edit(),
        exported_to: None,
        workflow_id: None,
    };
    match outcome {
        DispatchOutcome::Handled => {}
        DispatchOutcome::Exported(Some(path)) => result.exported_to = Some(path),
        DispatchOutcome::Exported(None) => bail!("Export produced no file; see the log for details"),
        DispatchOutcome::Imported(Some(id)) => result.workflow_id = Some(id),
        DispatchOutcome::Imported(None) => bail!("Import did not complete"),
    }

    if format.is_json() {
        return print_json(&result);
    }

    if let Some(edit) = &result.edit {
        println!("Edit workflow {} in space {}", edit.workflow_id, edit.space_id);
        println!("Name:        {}", edit.name);
        println!("Description: {}", edit.desc);
        println!("Mode:        {}", edit.flow_mode.as_str());
    } else if let Some(path) = &result.exported_to {
        println!("Exported to {}", path.display());
    } else if let Some(id) = &result.workflow_id {
        println!("Created workflow {id}");
    } else {
        println!("{} done", result.action);
    }
    Ok(())
}
