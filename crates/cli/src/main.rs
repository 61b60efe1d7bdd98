mod commands;

use std::{
    fs::{self, OpenOptions},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use greenlight_core::config::{self, AppConfig, LoggingConfig};
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

/// Decode and normalise movie payloads.
#[derive(Debug, Parser)]
#[command(name = "movies", version)]
struct Cli {
    /// Config file to load instead of the one in the user config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the wire form of every input.
    Normalize {
        /// Files, directories of `*.json` files, or `-` for stdin.
        paths: Vec<PathBuf>,
        /// Indent the output regardless of configuration.
        #[arg(long)]
        pretty: bool,
    },
    /// Report inputs that fail to decode.
    Check {
        /// Files, directories of `*.json` files, or `-` for stdin.
        paths: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, written) = match &cli.config {
        Some(path) => {
            let config = AppConfig::load_from(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            (config, None)
        }
        None => {
            let written = config::ensure_default_config()?;
            (AppConfig::load()?, written)
        }
    };
    init_logging(&config.logging)?;
    if let Some(path) = written {
        info!("wrote default configuration to {}", path.display());
    }

    match cli.command {
        Command::Normalize { paths, pretty } => {
            let pretty = pretty || config.output.pretty;
            commands::normalize(&config, &paths, pretty, &mut std::io::stdout().lock())
        }
        Command::Check { paths } => commands::check(&config, &paths, &mut std::io::stdout().lock()),
    }
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    fs::create_dir_all(&logging.directory).with_context(|| {
        format!(
            "failed to create log directory {}",
            logging.directory.display()
        )
    })?;
    let log_path = logging.file_path();
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let env_filter = EnvFilter::from_default_env();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(log_file));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}
