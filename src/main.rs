//! SC Kill Monitor CLI
//!
//! Watches the Star Citizen `Game.log` and reports kills and deaths of a player

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sc_kill_monitor::cli::{
    handle_parse, handle_scan, handle_settings, handle_setup, ParseArgs, ScanArgs,
    SettingsAction, SetupArgs,
};
use sc_kill_monitor::SettingsStore;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "sckm")]
#[command(about = "SC Kill Monitor - track kills and deaths from the Star Citizen game log")]
#[command(version)]
struct Cli {
    /// Settings file (default: <config dir>/sc-kill-monitor/settings.json)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the game log periodically
    Scan(ScanArgs),
    /// Parse a log file once and print its kill events
    Parse(ParseArgs),
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Interactive configuration
    Setup(SetupArgs),
}

fn default_filter() -> EnvFilter {
    // e.g. RUST_LOG=debug sckm scan --console
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sc_kill_monitor=info,sckm=info"))
}

/// The dashboard owns the terminal, so its logs go to a file
fn init_file_logging() -> Result<PathBuf> {
    let dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sc-kill-monitor");
    fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join("sckm.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    fmt()
        .with_writer(Mutex::new(file))
        .with_env_filter(default_filter())
        .with_target(false)
        .with_ansi(false)
        .init();
    Ok(path)
}

fn init_stderr_logging() {
    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(default_filter())
        .with_target(false)
        .with_thread_ids(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Scan(args) if args.uses_dashboard() => {
            init_file_logging()?;
        }
        _ => init_stderr_logging(),
    }

    let store = match cli.settings {
        Some(path) => SettingsStore::new(path),
        None => SettingsStore::default(),
    };

    match cli.command {
        Commands::Scan(args) => handle_scan(args, store).await?,
        Commands::Parse(args) => handle_parse(args)?,
        Commands::Settings { action } => handle_settings(action, &store)?,
        Commands::Setup(args) => handle_setup(args, &store)?,
    }

    Ok(())
}
