//! Workflow export and import.

mod export;
mod import;

pub use export::{build_export_document, export_file_name, export_workflow};
pub use import::{import_workflow, imported_name, parse_export_document};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Unsupported file format: expected type '{expected}', found {found}")]
    WrongFormat { expected: &'static str, found: String },

    #[error("Export file does not contain a workflow schema")]
    MissingSchema,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Api(#[from] flowdesk_traits::ApiError),
}

pub type Result<T> = std::result::Result<T, TransferError>;
