use chrono::{DateTime, Local};
use flowdesk_models::{EXPORT_DOCUMENT_TYPE, WorkflowExportDocument};
use flowdesk_traits::{AlertLevel, CreateWorkflowRequest, FilePicker, Notifier, WorkflowApi};
use tracing::{error, info};

use super::{Result, TransferError};

/// Parse and validate an export document.
pub fn parse_export_document(bytes: &[u8]) -> Result<WorkflowExportDocument> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;

    let found = value.get("type").and_then(|t| t.as_str());
    if found != Some(EXPORT_DOCUMENT_TYPE) {
        return Err(TransferError::WrongFormat {
            expected: EXPORT_DOCUMENT_TYPE,
            found: found.map_or_else(|| "none".to_string(), |t| format!("'{t}'")),
        });
    }

    let document: WorkflowExportDocument = serde_json::from_value(value)?;
    if document.schema_string().is_none() {
        return Err(TransferError::MissingSchema);
    }
    Ok(document)
}

/// Name for an imported copy; the timestamp keeps repeated imports apart.
pub fn imported_name(name: &str, now: DateTime<Local>) -> String {
    let base = if name.trim().is_empty() {
        "workflow"
    } else {
        name.trim()
    };
    format!("{base}_imported_{}", now.format("%Y%m%d%H%M%S"))
}

/// Pick an export file and recreate it as a new workflow in `space_id`.
///
/// Outcomes are reported through the notifier. Returns the new workflow id
/// on success, `None` when cancelled or failed.
pub async fn import_workflow(
    api: &dyn WorkflowApi,
    picker: &dyn FilePicker,
    notifier: &dyn Notifier,
    space_id: &str,
    now: DateTime<Local>,
) -> Option<String> {
    let file = match picker.pick_json_file().await {
        Ok(Some(file)) => file,
        Ok(None) => {
            info!("Import cancelled");
            return None;
        }
        Err(err) => {
            error!(error = %err, "Failed to read import file");
            notifier.alert(AlertLevel::Error, &format!("Import failed: {err}"));
            return None;
        }
    };

    match try_import(api, &file.contents, space_id, now).await {
        Ok((workflow_id, name)) => {
            info!(%workflow_id, file = %file.name, "Workflow imported");
            notifier.alert(
                AlertLevel::Success,
                &format!("Workflow imported as \"{name}\""),
            );
            Some(workflow_id)
        }
        Err(err) => {
            error!(file = %file.name, error = %err, "Workflow import failed");
            notifier.alert(AlertLevel::Error, &format!("Import failed: {err}"));
            None
        }
    }
}

async fn try_import(
    api: &dyn WorkflowApi,
    bytes: &[u8],
    space_id: &str,
    now: DateTime<Local>,
) -> Result<(String, String)> {
    let document = parse_export_document(bytes)?;
    let schema = document.schema_string().ok_or(TransferError::MissingSchema)?;

    let request = CreateWorkflowRequest {
        space_id: space_id.to_string(),
        name: imported_name(&document.name, now),
        desc: document.description.clone(),
        icon_uri: document.icon_uri.clone(),
        flow_mode: document.flow_mode,
    };
    let workflow_id = api.create_workflow(&request).await?;
    api.save_workflow_schema(space_id, &workflow_id, &schema)
        .await?;

    Ok((workflow_id, request.name))
}
