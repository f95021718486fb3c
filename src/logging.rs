// src/logging.rs
//! env_logger setup
//!
//! The terminal display runs in raw mode, where a bare `\n` moves down a row
//! without returning to column zero. Log lines sent to stderr are therefore
//! terminated with `\r\n`. They still share the screen with the sign; pass a
//! log file to keep the display clean.

use crate::error::{Result, SpeedLimitError};
use env_logger::{Builder, Env, Target};
use log::Record;
use std::{
    fmt::Display,
    fs::{File, OpenOptions},
    io::{self, Write},
    path::Path,
};

/// Install the global logger. Level comes from `RUST_LOG`, falling back to
/// `debug` when verbose and `info` otherwise.
pub fn init(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_level));

    match log_file {
        Some(path) => {
            let file = open_log_file(path)?;
            builder.format_timestamp_millis().target(Target::Pipe(Box::new(file)));
        }
        None => {
            builder.format(|buf, record| {
                let timestamp = buf.timestamp_millis();
                write_raw_line(buf, timestamp, record)
            });
        }
    }

    builder
        .try_init()
        .map_err(|e| SpeedLimitError::Other(format!("Failed to initialise logging: {}", e)))
}

/// Open `path` for appending, creating it if needed
pub fn open_log_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| SpeedLimitError::Other(format!("Failed to open log file {}: {}", path.display(), e)))
}

fn write_raw_line<W: Write + ?Sized>(out: &mut W, timestamp: impl Display, record: &Record) -> io::Result<()> {
    write!(
        out,
        "[{} {:<5} {}] {}\r\n",
        timestamp,
        record.level(),
        record.target(),
        record.args()
    )
}
