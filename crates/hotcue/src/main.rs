//! Binary entrypoint for hotcue.
//!
//! Loads the shortcut configuration, starts the engine with executors that
//! log what they would play and show, and feeds it key events read from stdin.
use std::{
    path::{Path, PathBuf},
    process,
    sync::Arc,
};

use clap::{Parser, Subcommand};
use hotcue_engine::{Engine, TraceOverlaySurface, TraceSoundPlayer};
use logging as logshared;
use tokio::runtime::Builder;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*};

/// Stdin command loop.
mod driver;
/// Config to table loading.
mod load;
/// Command parsing.
mod script;

use config::resolve_config_path;

use crate::load::{load_table, report_missing_assets};

#[derive(Parser, Debug)]
#[command(
    name = "hotcue",
    about = "Hotkey-triggered sound and overlay cues",
    version
)]
/// Command-line interface for the `hotcue` binary.
struct Cli {
    /// Optional subcommand.
    #[command(subcommand)]
    command: Option<Command>,

    /// Logging controls
    #[command(flatten)]
    log: logshared::LogArgs,

    /// Optional path to the config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
/// Top-level CLI subcommands.
enum Command {
    /// Load and validate the configuration then exit.
    Check {
        /// Path to configuration file to check (defaults to ~/.hotcue/shortcuts.json)
        path: Option<PathBuf>,

        /// Dump the configuration, normalized, as JSON to stdout
        #[arg(long)]
        dump: bool,
    },
}

/// Validate a config file and report the result.
fn check(path: &Path, dump: bool) -> i32 {
    let table = match load_table(path, false) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{e}");
            return 1;
        }
    };
    let missing = report_missing_assets(&table);
    if dump {
        let normalized = config::load_config(path).map(config::ConfigFile::normalized);
        match normalized.map(|cfg| serde_json::to_string_pretty(&cfg)) {
            Ok(Ok(json)) => println!("{json}"),
            Ok(Err(e)) => {
                eprintln!("Failed to serialize config: {e}");
                return 1;
            }
            Err(e) => {
                eprintln!("{}", e.pretty());
                return 1;
            }
        }
    } else {
        println!(
            "OK: {} shortcuts ({} direct, {} suffix), {} missing assets",
            table.len(),
            table.direct_count(),
            table.suffix_count(),
            missing
        );
    }
    0
}

fn main() {
    let cli = Cli::parse();

    // Compute final filter spec via shared helpers
    let env_filter = logshared::env_filter_from_spec(&cli.log.spec());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().without_time())
        .try_init()
        .ok();

    if let Some(Command::Check { path, dump }) = &cli.command {
        let explicit = path.as_deref().or(cli.config.as_deref());
        process::exit(check(&resolve_config_path(explicit), *dump));
    }

    let config_path = resolve_config_path(cli.config.as_deref());
    let table = match load_table(&config_path, true) {
        Ok(t) => t,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };
    report_missing_assets(&table);

    let runtime = match Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!(error = %e, "runtime_start_failed");
            process::exit(1);
        }
    };

    let result = runtime.block_on(async move {
        info!(path = %config_path.display(), "config_path");
        let engine = Engine::new(
            table,
            Arc::new(TraceSoundPlayer),
            Arc::new(TraceOverlaySurface::default()),
        )
        .spawn();
        driver::run(engine, config_path).await
    });
    if let Err(e) = result {
        error!(error = %e, "engine_failed");
        process::exit(1);
    }
}
