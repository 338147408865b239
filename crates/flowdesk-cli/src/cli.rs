use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "flowdesk")]
#[command(version, about = "FlowDesk - workflow resource menus, export/import and Dify registration")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to ~/.config/flowdesk/config.toml)
    #[arg(long, global = true, env = "FLOWDESK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, global = true, env = "FLOWDESK_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Backend bearer token
    #[arg(long, global = true, env = "FLOWDESK_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Resource row menu
    Menu {
        #[command(subcommand)]
        command: MenuCommands,
    },

    /// Workflow export and import
    Workflow {
        #[command(subcommand)]
        command: WorkflowCommands,
    },

    /// Dify app discovery and plugin registration
    Dify {
        #[command(subcommand)]
        command: DifyCommands,
    },

    /// Configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Identity and flags that shape a menu.
#[derive(Args, Clone)]
pub struct ViewerArgs {
    /// Resource record JSON file as returned by the resource list API
    #[arg(short, long)]
    pub record: PathBuf,

    /// Viewer user id (defaults to user.id from the config file)
    #[arg(long)]
    pub user_id: Option<String>,
}

#[derive(Subcommand)]
pub enum MenuCommands {
    /// Show the row actions for a resource
    Show {
        #[command(flatten)]
        viewer: ViewerArgs,
    },

    /// Run one row action for a resource
    Run {
        /// Action id (edit, export, import, publish, copy, delete, ...)
        action: String,

        #[command(flatten)]
        viewer: ViewerArgs,

        /// Export document to import (import only)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Directory for exported files (export only)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum WorkflowCommands {
    /// Download a workflow as an export document
    Export {
        /// Workflow id
        id: String,

        /// Space the workflow lives in
        #[arg(long)]
        space_id: Option<String>,

        /// Workflow name, used for the file name
        #[arg(long, default_value = "workflow")]
        name: String,

        /// Output directory
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Create a workflow from an export document
    Import {
        /// Export document path
        file: PathBuf,

        /// Target space
        #[arg(long)]
        space_id: Option<String>,
    },
}

/// Dify connection settings; flags and env override the config file.
#[derive(Args, Clone)]
pub struct DifyConnectionArgs {
    /// Dify host, e.g. https://dify.example.com
    #[arg(long, env = "DIFY_HOST")]
    pub host: Option<String>,

    /// Dify app API key
    #[arg(long, env = "DIFY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Synthesize candidates without contacting the host
    #[arg(long)]
    pub offline: bool,
}

#[derive(Subcommand)]
pub enum DifyCommands {
    /// List the candidate app for the configured host and key
    Scan {
        #[command(flatten)]
        connection: DifyConnectionArgs,
    },

    /// Scan, select and register apps as backend plugins
    Register {
        #[command(flatten)]
        connection: DifyConnectionArgs,

        /// App ids to register (defaults to every scanned app)
        #[arg(long = "app")]
        apps: Vec<String>,

        /// Target space for the created plugins
        #[arg(long)]
        space_id: Option<String>,

        /// Probe the host before each registration
        #[arg(long)]
        check: bool,
    },

    /// Load an app list from a host, a file or pasted JSON
    Import(DifyImportArgs),
}

#[derive(Args)]
#[command(group(
    clap::ArgGroup::new("source")
        .required(true)
        .args(["url", "file", "text"]),
))]
pub struct DifyImportArgs {
    /// Scan a Dify host (uses --api-key)
    #[arg(long)]
    pub url: Option<String>,

    /// `dify_apps` document path
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// JSON array of apps, or an object with an `apps` array
    #[arg(long)]
    pub text: Option<String>,

    /// Dify app API key for --url
    #[arg(long, env = "DIFY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Synthesize the --url candidate without contacting the host
    #[arg(long)]
    pub offline: bool,

    /// App ids to keep (defaults to every loaded app)
    #[arg(long = "select")]
    pub select: Vec<String>,

    /// Register the selected apps right away
    #[arg(long)]
    pub register: bool,

    /// Target space for the created plugins
    #[arg(long)]
    pub space_id: Option<String>,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
