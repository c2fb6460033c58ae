//! Process logger: stderr plus an optional append-only file.
//!
//! Only records whose target belongs to this crate are written, so chatty
//! dependencies (`ureq`, `evdev`) stay quiet at debug level.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Mutex;
use std::time::SystemTime;

use log::{LevelFilter, Log, Metadata, Record};

use crate::config::HandmarkerError;

const CRATE_TARGET: &str = env!("CARGO_CRATE_NAME");

/// True for `handmarker` and `handmarker::*` targets, not for `handmarker_foo`.
pub fn is_crate_target(target: &str) -> bool {
    target.split("::").next() == Some(CRATE_TARGET)
}

/// `--verbose` wins; otherwise the configured level, falling back to info.
pub fn resolve_level(configured: &str, verbose: bool) -> LevelFilter {
    if verbose {
        return LevelFilter::Debug;
    }
    configured.parse().unwrap_or_else(|_| {
        eprintln!("Warning: unknown log level '{configured}', using info");
        LevelFilter::Info
    })
}

fn format_line(secs: u64, record: &Record) -> String {
    format!(
        "[{secs} {:<5} {}] {}\n",
        record.level(),
        record.target(),
        record.args()
    )
}

struct HandmarkerLogger {
    level: LevelFilter,
    file: Option<Mutex<File>>,
}

impl Log for HandmarkerLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && is_crate_target(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let secs = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let line = format_line(secs, record);

        // stderr ends up in journald under systemd
        eprint!("{line}");

        if let Some(file) = &self.file {
            if let Ok(mut f) = file.lock() {
                let _ = f.write_all(line.as_bytes());
            }
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut f) = file.lock() {
                let _ = f.flush();
            }
        }
    }
}

/// Install the global logger. A log file that cannot be opened is reported
/// and skipped; stderr logging still goes ahead.
pub fn init(level: LevelFilter, log_file: Option<&str>) -> Result<(), HandmarkerError> {
    let file = log_file.and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(Mutex::new(file)),
            Err(e) => {
                eprintln!("Warning: cannot open log file '{path}': {e}");
                None
            }
        }
    });

    log::set_boxed_logger(Box::new(HandmarkerLogger { level, file }))?;
    log::set_max_level(level);
    Ok(())
}
