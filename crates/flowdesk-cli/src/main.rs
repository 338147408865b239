mod cli;
mod commands;
mod completions;
mod config;
mod error;
mod output;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::CliConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose);

    if let Err(err) = run(cli).await {
        error::handle_error(err);
    }
}

/// Always log to a daily file; mirror to stderr with `--verbose`.
fn init_logging(verbose: bool) -> Option<WorkerGuard> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let log_dir = CliConfig::log_dir();
    std::fs::create_dir_all(&log_dir).ok();
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("flowdesk")
        .filename_suffix("log")
        .build(&log_dir)
        .ok();

    let (file_layer, guard) = match file_appender {
        Some(appender) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(false)
                .with_level(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let stderr_layer = verbose.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    guard
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().or_else(CliConfig::default_path);
    let mut config = CliConfig::load_from_path(config_path.clone());
    config.apply_backend_overrides(cli.backend_url, cli.token);
    let format = cli.format;

    match cli.command {
        Commands::Completions { shell } => {
            completions::generate_completions(shell);
            Ok(())
        }
        Commands::Menu { command } => commands::menu::run(&config, command, format).await,
        Commands::Workflow { command } => commands::workflow::run(&config, command, format).await,
        Commands::Dify { command } => commands::dify::run(&config, command, format).await,
        Commands::Config { command } => {
            commands::config::run(&config, config_path, command, format)
        }
    }
}
