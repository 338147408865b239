//! Workflow canvas detail and the portable export document.

use serde::{Deserialize, Serialize};

use crate::resource::FlowMode;

/// Format marker carried by every export document.
pub const EXPORT_DOCUMENT_TYPE: &str = "coze_workflow_export";
/// Current export document version.
pub const EXPORT_DOCUMENT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WorkflowCreator {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Workflow detail as returned by the canvas endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WorkflowDetail {
    pub workflow_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub icon_uri: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub create_time: Option<i64>,
    #[serde(default)]
    pub update_time: Option<i64>,
    #[serde(default)]
    pub creator: WorkflowCreator,
    #[serde(default)]
    pub flow_mode: FlowMode,
    #[serde(default)]
    pub schema_type: Option<String>,
    /// JSON-encoded canvas graph.
    #[serde(default)]
    pub schema_json: Option<String>,
}

/// Export-time provenance block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ExportMetadata {
    /// RFC 3339 timestamp.
    pub exported_at: String,
    #[serde(default)]
    pub exported_by: Option<String>,
    #[serde(default)]
    pub source_space_id: Option<String>,
    #[serde(default)]
    pub exporter: Option<String>,
}

/// Self-describing workflow export file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowExportDocument {
    #[serde(rename = "type")]
    pub doc_type: String,
    pub version: String,
    pub workflow_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon_uri: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub create_time: Option<i64>,
    #[serde(default)]
    pub update_time: Option<i64>,
    #[serde(default)]
    pub creator_id: Option<String>,
    #[serde(default)]
    pub creator_name: Option<String>,
    #[serde(default)]
    pub flow_mode: FlowMode,
    #[serde(default)]
    pub schema_type: Option<String>,
    /// Parsed canvas graph.
    #[serde(default)]
    pub schema: serde_json::Value,
    /// Raw canvas string as stored by the backend.
    #[serde(default)]
    pub schema_json: Option<String>,
    #[serde(default)]
    pub export_metadata: Option<ExportMetadata>,
}

impl WorkflowExportDocument {
    /// Schema string to persist on import, preferring the raw form.
    pub fn schema_string(&self) -> Option<String> {
        if let Some(raw) = self.schema_json.as_deref()
            && !raw.trim().is_empty()
        {
            return Some(raw.to_string());
        }
        if self.schema.is_null() {
            return None;
        }
        serde_json::to_string(&self.schema).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(schema: serde_json::Value, schema_json: Option<&str>) -> WorkflowExportDocument {
        WorkflowExportDocument {
            doc_type: EXPORT_DOCUMENT_TYPE.to_string(),
            version: EXPORT_DOCUMENT_VERSION.to_string(),
            workflow_id: "1".to_string(),
            name: "wf".to_string(),
            description: String::new(),
            icon_uri: None,
            icon_url: None,
            create_time: None,
            update_time: None,
            creator_id: None,
            creator_name: None,
            flow_mode: FlowMode::Workflow,
            schema_type: None,
            schema,
            schema_json: schema_json.map(str::to_string),
            export_metadata: None,
        }
    }

    #[test]
    fn test_schema_string_prefers_raw() {
        let doc = document(json!({"nodes": []}), Some(r#"{"nodes":[1]}"#));
        assert_eq!(doc.schema_string().as_deref(), Some(r#"{"nodes":[1]}"#));
    }

    #[test]
    fn test_schema_string_falls_back_to_parsed() {
        let doc = document(json!({"nodes": []}), Some("  "));
        assert_eq!(doc.schema_string().as_deref(), Some(r#"{"nodes":[]}"#));
    }

    #[test]
    fn test_schema_string_missing() {
        let doc = document(serde_json::Value::Null, None);
        assert!(doc.schema_string().is_none());
    }

    #[test]
    fn test_type_field_rename() {
        let doc = document(json!({}), None);
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["type"], EXPORT_DOCUMENT_TYPE);
        assert!(value.get("doc_type").is_none());
    }
}
