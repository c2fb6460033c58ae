//! handmarker – hand-landmark swipe and pinch-cursor gestures.
//!
//! CLI entry point.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::Ordering;

use clap::Parser;
use log::{error, info};

use handmarker::config::HandmarkerError;
use handmarker::logging;
use handmarker::manager::GestureManager;

#[derive(Parser)]
#[command(name = "handmarker", about = "Swipe and pinch-cursor gestures from hand landmarks")]
struct Cli {
    /// Path to configuration file (every key is optional)
    #[arg(default_value = "/etc/handmarker/handmarker.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Log cursor deltas instead of moving the pointer
    #[arg(short = 'n', long)]
    dry_run: bool,
}

/// Extra guidance for a config path that does not exist. `--dry-run` still
/// reads the config, so the hint applies to it too.
fn missing_config_hint(path: &Path) -> String {
    format!(
        "hint: every setting has a default, so an empty file is enough:\n  \
         touch {path}\n\
         or pass another path, e.g. `handmarker ./handmarker.toml --dry-run`",
        path = path.display()
    )
}

fn run(cli: &Cli, manager: &mut GestureManager) -> Result<(), HandmarkerError> {
    logging::init(
        logging::resolve_level(manager.config_log_level(), cli.verbose),
        manager.config_log_file(),
    )?;

    let running = manager.running_flag();
    ctrlc::set_handler(move || running.store(false, Ordering::Relaxed))?;

    info!("Loaded configuration from: {}", cli.config.display());
    manager.start(cli.dry_run)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // The logger depends on the config, so config errors go straight to stderr.
    let mut manager = match GestureManager::new(&cli.config) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: {e}");
            if let HandmarkerError::ConfigReadError { source, .. } = &e {
                if source.kind() == ErrorKind::NotFound {
                    eprintln!("{}", missing_config_hint(&cli.config));
                }
            }
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, &mut manager) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ HandmarkerError::Logger(_)) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
