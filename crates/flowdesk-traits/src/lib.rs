//! FlowDesk Traits - seams between the core logic and the outside world.
//!
//! - Backend contracts: `WorkflowApi`, `PluginApi`, `DifyProbe` and their wire types
//! - Row action handlers injected by the caller
//! - Host interaction: file picker, download sink, user notifier

pub mod api;
pub mod error;
pub mod handlers;
pub mod host;

pub use api::{
    CommonParam, CreateWorkflowRequest, DifyAppInfo, DifyProbe, PluginApi, PluginIcon,
    RegisterPluginMetaRequest, WorkflowApi,
};
pub use error::{ApiError, Result};
pub use handlers::ResourceActionHandlers;
pub use host::{AlertLevel, DownloadSink, FilePicker, Notifier, PickedFile};
