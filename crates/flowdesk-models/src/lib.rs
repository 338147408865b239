//! FlowDesk Models - plain data types shared across the workspace.
//!
//! - Workflow resource records and their server-side action flags
//! - Menu descriptors, feature flags and the caller context
//! - Workflow canvas detail and the export document format
//! - Dify applications, connection config and the app list document

pub mod dify;
pub mod menu;
pub mod resource;
pub mod workflow;

pub use dify::{
    DIFY_APPS_DOCUMENT_TYPE, DIFY_APPS_DOCUMENT_VERSION, DifyApp, DifyAppType, DifyAppsDocument,
    DifyConfig, ImportedApp,
};
pub use menu::{
    ActionDescriptor, CompositeActions, EditPayload, FeatureFlags, MenuAction, MenuContext,
    ResourceMenu,
};
pub use resource::{
    ActionKey, BizExtend, FlowMode, ProductDraftStatus, ResourceAction, ResourceRecord,
    ResourceType,
};
pub use workflow::{
    EXPORT_DOCUMENT_TYPE, EXPORT_DOCUMENT_VERSION, ExportMetadata, WorkflowCreator,
    WorkflowDetail, WorkflowExportDocument,
};
