use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::Local;
use flowdesk_core::host::{DirectoryDownloadSink, PathFilePicker};
use flowdesk_core::models::ResourceRecord;
use flowdesk_core::transfer::{export_workflow, import_workflow};
use serde_json::json;

use crate::cli::WorkflowCommands;
use crate::commands::shared::{ConsoleNotifier, backend_client, require_space_id};
use crate::config::CliConfig;
use crate::output::{OutputFormat, json::print_json};

pub async fn run(config: &CliConfig, command: WorkflowCommands, format: OutputFormat) -> Result<()> {
    match command {
        WorkflowCommands::Export {
            id,
            space_id,
            name,
            out_dir,
        } => export(config, id, space_id, name, out_dir, format).await,
        WorkflowCommands::Import { file, space_id } => {
            import(config, file, space_id, format).await
        }
    }
}

async fn export(
    config: &CliConfig,
    id: String,
    space_id: Option<String>,
    name: String,
    out_dir: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let space_id = require_space_id(config, space_id)?;
    let client = backend_client(config)?;
    let sink = DirectoryDownloadSink::new(out_dir.unwrap_or_else(|| config.export_dir()));
    let record = ResourceRecord {
        res_id: Some(id.clone()),
        space_id: Some(space_id),
        name,
        ..Default::default()
    };

    let Some(path) = export_workflow(client.as_ref(), &record, &sink, config.user.id.as_deref()).await
    else {
        bail!("Export of workflow {id} produced no file; see the log for details");
    };

    if format.is_json() {
        return print_json(&json!({ "workflow_id": id, "path": path }));
    }

    println!("Exported workflow {id} to {}", path.display());
    Ok(())
}

async fn import(
    config: &CliConfig,
    file: PathBuf,
    space_id: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let space_id = require_space_id(config, space_id)?;
    let client = backend_client(config)?;
    let picker = PathFilePicker::new(Some(file));

    let Some(created) =
        import_workflow(client.as_ref(), &picker, &ConsoleNotifier, &space_id, Local::now()).await
    else {
        bail!("Import did not complete");
    };

    if format.is_json() {
        return print_json(&json!({ "workflow_id": created, "space_id": space_id }));
    }

    println!("Created workflow {created} in space {space_id}");
    Ok(())
}
