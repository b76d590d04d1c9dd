#![cfg(feature = "std")]

use std::env;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use log::{self, LevelFilter, Metadata, Record};

/// Writes every record to stderr and, when configured, appends it to a file.
struct SalvoLogger {
    file: Option<Mutex<File>>,
}

impl log::Log for SalvoLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        eprintln!("{} - {}", record.level(), record.args());
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = writeln!(file, "{} - {}", record.level(), record.args());
            }
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

/// Parse a level name, defaulting to `info` for anything unrecognised.
pub fn level_from(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|lvl| lvl.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Initialize logging from the environment: the level comes from `SALVO_LOG`
/// (default `info`) and `SALVO_LOG_FILE` names an optional file that records
/// are appended to alongside stderr. An unopenable log file is reported and
/// skipped.
pub fn init_logging() {
    let level = level_from(env::var("SALVO_LOG").ok().as_deref());
    let file = env::var_os("SALVO_LOG_FILE");
    if let Err(e) = init_logging_to(level, file.as_deref().map(Path::new)) {
        eprintln!("WARN - log file could not be opened ({}); logging to stderr only", e);
        let _ = init_logging_to(level, None);
    }
}

/// Install the logger at `level`, appending to `file` when given. Does
/// nothing if a logger is already installed.
pub fn init_logging_to(level: LevelFilter, file: Option<&Path>) -> io::Result<()> {
    let file = match file {
        Some(path) => Some(Mutex::new(
            OpenOptions::new().create(true).append(true).open(path)?,
        )),
        None => None,
    };
    let logger = SalvoLogger { file };
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(level);
    }
    Ok(())
}
