//! modal-layout - modal keybinding dispatcher demo and state tool

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use modal_layout::clock::SystemClock;
use modal_layout::config::Config;
use modal_layout::dispatcher::default_keybindings;
use modal_layout::host::{Host, KeyValueStore};
use modal_layout::persist::{JsonFileStore, RestoredState};
use modal_layout::{Dispatcher, paths};
use std::path::PathBuf;
use std::sync::Arc;

mod tui;

/// Modal (vi-style) and chorded-prefix (tmux-style) keybinding dispatcher
#[derive(Parser)]
#[command(name = "modal-layout")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// State file holding the persisted mode, timeout and layout
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the persisted dispatcher state
    Show,
    /// Clear the persisted dispatcher state
    Reset {
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
    /// List dispatcher commands and their default keybindings
    Keys,
}

fn main() -> Result<()> {
    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Let --help and --version exit normally
            if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion
            {
                e.exit();
            }
            eprintln!("error: {}\n", e.kind());
            Cli::command().print_help()?;
            std::process::exit(1);
        }
    };

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let store = JsonFileStore::new(cli.state.clone().unwrap_or_else(paths::state_path));

    match cli.command {
        Some(Commands::Show) => cmd_show(&config, &store),
        Some(Commands::Reset { force }) => cmd_reset(&config, &store, force),
        Some(Commands::Keys) => {
            cmd_keys();
            Ok(())
        }
        None => cmd_run(config, store),
    }
}

/// Log to a file in the temp directory - tail with: tail -f $TMPDIR/modal-layout.log
/// Set DEBUG=0-3 to control verbosity (0=off, 1=warn, 2=info, 3=debug)
fn init_logging() {
    let debug_level = std::env::var("DEBUG")
        .ok()
        .and_then(|v| v.parse::<u8>().ok())
        .unwrap_or(0);
    if debug_level == 0 {
        return;
    }

    let level = match debug_level {
        1 => tracing::Level::WARN,
        2 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };

    let log_path = paths::log_path();
    // Start each run with an empty log
    if let Err(e) = std::fs::write(&log_path, "") {
        eprintln!("Warning: Failed to clear log file: {e}");
    }
    let dir = log_path
        .parent()
        .map_or_else(std::env::temp_dir, std::path::Path::to_path_buf);
    let file_appender = tracing_appender::rolling::never(dir, paths::LOG_FILE);
    tracing_subscriber::fmt()
        .with_writer(file_appender)
        .with_max_level(level)
        .with_ansi(false)
        .init();
}

fn cmd_run(config: Config, store: JsonFileStore) -> Result<()> {
    let workspace = Arc::new(tui::workspace::Workspace::new());
    let host = Host {
        contexts: workspace.clone(),
        commands: workspace.clone(),
        status: workspace.clone(),
        store: Arc::new(store),
        shell: workspace.clone(),
        notifier: workspace.clone(),
    };

    let mut dispatcher = Dispatcher::new(config, host, Arc::new(SystemClock))
        .context("Failed to create dispatcher")?;
    dispatcher.start().context("Failed to start dispatcher")?;

    let result = tui::run(&mut dispatcher, &workspace);
    dispatcher.stop();
    // The last snapshot write must land before the process exits
    dispatcher.flush();
    result
}

fn cmd_show(config: &Config, store: &JsonFileStore) -> Result<()> {
    let stored = store
        .get_data(&config.storage_key)
        .with_context(|| format!("Failed to read {}", store.path().display()))?;
    let Some(value) = stored else {
        println!("No saved state in {}.", store.path().display());
        return Ok(());
    };

    println!("{}", serde_json::to_string_pretty(&value)?);
    let restored = RestoredState::from_value(&value);
    if restored.mode.is_none() || restored.prefix_timeout_ms.is_none() {
        println!("\nInvalid or missing fields fall back to defaults on start.");
    }
    Ok(())
}

fn cmd_reset(config: &Config, store: &JsonFileStore, force: bool) -> Result<()> {
    use std::io::{self, Write};

    let present = store
        .get_data(&config.storage_key)
        .with_context(|| format!("Failed to read {}", store.path().display()))?
        .is_some();
    if !present {
        println!("No saved state to reset.");
        return Ok(());
    }

    if !force {
        print!("Clear saved mode, prefix timeout and layout profile? [y/N] ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    store
        .remove(&config.storage_key)
        .with_context(|| format!("Failed to update {}", store.path().display()))?;
    println!("Reset complete.");
    Ok(())
}

fn cmd_keys() {
    for binding in default_keybindings() {
        println!(
            "{:<36} {:<16} {} (when {})",
            binding.command.id(),
            binding.keybinding,
            binding.command.label(),
            binding.when
        );
    }
}
