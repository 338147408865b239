use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};
use flowdesk_models::{
    EXPORT_DOCUMENT_TYPE, EXPORT_DOCUMENT_VERSION, ExportMetadata, ResourceRecord, WorkflowDetail,
    WorkflowExportDocument,
};
use flowdesk_traits::{DownloadSink, WorkflowApi};
use tracing::{error, info, warn};

use super::Result;
use crate::CLIENT_NAME;

/// Export a workflow to the download sink.
///
/// Never fails loudly: missing ids, an empty canvas response or any error
/// along the way is logged and yields `None`.
pub async fn export_workflow(
    api: &dyn WorkflowApi,
    record: &ResourceRecord,
    sink: &dyn DownloadSink,
    exported_by: Option<&str>,
) -> Option<PathBuf> {
    let (Some(workflow_id), Some(space_id)) = (
        record.res_id.as_deref().filter(|id| !id.is_empty()),
        record.space_id.as_deref().filter(|id| !id.is_empty()),
    ) else {
        warn!(res_id = ?record.res_id, space_id = ?record.space_id, "Export skipped: missing ids");
        return None;
    };

    match try_export(api, space_id, workflow_id, sink, exported_by).await {
        Ok(Some(path)) => {
            info!(workflow_id, path = %path.display(), "Workflow exported");
            Some(path)
        }
        Ok(None) => {
            warn!(workflow_id, "Export skipped: backend returned no workflow");
            None
        }
        Err(err) => {
            error!(workflow_id, error = %err, "Workflow export failed");
            None
        }
    }
}

async fn try_export(
    api: &dyn WorkflowApi,
    space_id: &str,
    workflow_id: &str,
    sink: &dyn DownloadSink,
    exported_by: Option<&str>,
) -> Result<Option<PathBuf>> {
    let Some(detail) = api.get_workflow_detail(space_id, workflow_id).await? else {
        return Ok(None);
    };

    let document = build_export_document(&detail, Some(space_id), exported_by, Utc::now());
    let bytes = serde_json::to_vec_pretty(&document)?;
    let file_name = export_file_name(&detail.name, &detail.workflow_id);

    Ok(Some(sink.save(&file_name, &bytes).await?))
}

/// Assemble the export document from canvas detail.
pub fn build_export_document(
    detail: &WorkflowDetail,
    space_id: Option<&str>,
    exported_by: Option<&str>,
    exported_at: DateTime<Utc>,
) -> WorkflowExportDocument {
    let schema = match detail.schema_json.as_deref() {
        Some(raw) if !raw.trim().is_empty() => serde_json::from_str(raw).unwrap_or_else(|err| {
            warn!(workflow_id = %detail.workflow_id, error = %err, "Schema is not valid JSON");
            serde_json::Value::Null
        }),
        _ => serde_json::Value::Null,
    };

    WorkflowExportDocument {
        doc_type: EXPORT_DOCUMENT_TYPE.to_string(),
        version: EXPORT_DOCUMENT_VERSION.to_string(),
        workflow_id: detail.workflow_id.clone(),
        name: detail.name.clone(),
        description: detail.desc.clone(),
        icon_uri: detail.icon_uri.clone(),
        icon_url: detail.url.clone(),
        create_time: detail.create_time,
        update_time: detail.update_time,
        creator_id: detail.creator.id.clone(),
        creator_name: detail.creator.name.clone(),
        flow_mode: detail.flow_mode,
        schema_type: detail.schema_type.clone(),
        schema,
        schema_json: detail.schema_json.clone(),
        export_metadata: Some(ExportMetadata {
            exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            exported_by: exported_by.map(str::to_string),
            source_space_id: space_id.map(str::to_string),
            exporter: Some(CLIENT_NAME.to_string()),
        }),
    }
}

/// `{name}_{id}.json` with the name reduced to filesystem-safe characters.
pub fn export_file_name(name: &str, workflow_id: &str) -> String {
    let mut safe: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if safe.trim_matches('_').is_empty() {
        safe = "workflow".to_string();
    }
    format!("{safe}_{workflow_id}.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use flowdesk_models::{FlowMode, WorkflowCreator};
    use serde_json::json;

    fn detail(schema_json: Option<&str>) -> WorkflowDetail {
        WorkflowDetail {
            workflow_id: "7001".to_string(),
            name: "Order triage".to_string(),
            desc: "Routes orders".to_string(),
            icon_uri: Some("icon/wf.png".to_string()),
            url: Some("https://cdn/icon/wf.png".to_string()),
            create_time: Some(1_700_000_000),
            update_time: Some(1_700_000_100),
            creator: WorkflowCreator {
                id: Some("u1".to_string()),
                name: Some("Ada".to_string()),
            },
            flow_mode: FlowMode::Chatflow,
            schema_type: Some("1".to_string()),
            schema_json: schema_json.map(str::to_string),
        }
    }

    #[test]
    fn test_build_export_document() {
        let at = Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
        let doc = build_export_document(
            &detail(Some(r#"{"nodes":[{"id":"100001"}],"edges":[]}"#)),
            Some("space-1"),
            Some("u1"),
            at,
        );

        assert_eq!(doc.doc_type, EXPORT_DOCUMENT_TYPE);
        assert_eq!(doc.version, EXPORT_DOCUMENT_VERSION);
        assert_eq!(doc.schema, json!({"nodes":[{"id":"100001"}],"edges":[]}));
        assert_eq!(doc.creator_name.as_deref(), Some("Ada"));
        assert_eq!(doc.flow_mode, FlowMode::Chatflow);

        let meta = doc.export_metadata.unwrap();
        assert_eq!(meta.exported_at, "2025-03-04T05:06:07.000Z");
        assert_eq!(meta.source_space_id.as_deref(), Some("space-1"));
    }

    #[test]
    fn test_unparsable_schema_keeps_raw() {
        let doc = build_export_document(&detail(Some("{broken")), None, None, Utc::now());
        assert!(doc.schema.is_null());
        assert_eq!(doc.schema_json.as_deref(), Some("{broken"));
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("Order triage", "7001"), "Order_triage_7001.json");
        assert_eq!(export_file_name("a/b", "1"), "a_b_1.json");
        assert_eq!(export_file_name("  ", "1"), "workflow_1.json");
        assert_eq!(export_file_name("报表", "9"), "workflow_9.json");
    }
}
