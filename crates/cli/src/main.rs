//! research-monitor: live view of a research pipeline run.
//!
//! Without a subcommand the terminal UI starts. `run` submits one query
//! and streams the run to stdout; `init` writes a `.research-monitor/`
//! directory with the default configuration.

mod console;
mod headless;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use colored::Colorize;
use rmon_core::config::{load_config_dir, CONFIG_DIR_NAME};
use rmon_core::init::{generate_monitor_structure, InitOptions};
use rmon_protocol::LoggingConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Live monitor for research pipeline runs
#[derive(Parser)]
#[command(name = "research-monitor")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Watch a research pipeline run live from the terminal")]
struct Cli {
    /// Server base URL (overrides config.toml)
    #[arg(long, env = "RMON_SERVER")]
    server: Option<String>,

    /// Configuration directory (defaults to ./.research-monitor)
    #[arg(long)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit one query and print the run without the terminal UI
    Run {
        /// Research topic
        #[arg(short, long)]
        query: String,

        /// Print the final report as HTML instead of plain text
        #[arg(long)]
        html: bool,
    },

    /// Create a .research-monitor directory with default configuration
    Init {
        /// Directory in which to create .research-monitor
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Overwrite an existing .research-monitor directory
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if let Some(Commands::Init { dir, force }) = cli.command {
        init_logging(&LoggingConfig::default(), true)?;
        let created = generate_monitor_structure(InitOptions {
            target_dir: dir,
            force,
        })
        .await?;
        println!("{} {}", "Initialized".green().bold(), created.display());
        return Ok(());
    }

    let config_dir = match cli.config_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?.join(CONFIG_DIR_NAME),
    };
    let mut config = load_config_dir(&config_dir).await?;
    if let Some(server) = cli.server {
        config = config.with_server(server);
    }

    match cli.command {
        Some(Commands::Run { query, html }) => {
            init_logging(&config.monitor.logging, true)?;
            headless::run_headless(&config, &query, html).await
        }
        _ => {
            init_logging(&config.monitor.logging, false)?;
            tracing::info!(server = %config.monitor.server, "starting terminal UI");
            rmon_tui::run_app(&config).await.map_err(|e| eyre!(e))
        }
    }
}

/// Install the tracing subscriber.
///
/// Headless runs log to stderr. The terminal UI must not write to the
/// terminal, so it logs to the configured file or nowhere.
fn init_logging(logging: &LoggingConfig, headless: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(filter);

    if headless {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()?;
    } else if let Some(path) = &logging.file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        registry
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::sink))
            .try_init()?;
    }
    Ok(())
}
