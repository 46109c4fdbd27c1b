//! Log Setup
//!
//! Installs the global `tracing` subscriber. Output always goes to stdout; when
//! a log file is configured it is trimmed to its most recent lines and then
//! appended to as well.

use anyhow::Context;
use std::{
    fs::{self, OpenOptions},
    io::{self, ErrorKind},
    path::Path,
    sync::Arc,
};
use tracing::Level;
use tracing_subscriber::fmt::{
    time::ChronoLocal,
    writer::{BoxMakeWriter, MakeWriterExt},
};

/// Keeps only the last `max_lines` lines of `path`. A missing file is not an
/// error.
pub fn trim_log_file(path: &Path, max_lines: usize) -> io::Result<()> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    let lines: Vec<&str> = contents.lines().collect();
    if lines.len() <= max_lines {
        return Ok(());
    }

    let mut kept = lines[lines.len() - max_lines..].join("\n");
    kept.push('\n');
    fs::write(path, kept)
}

pub fn init(level: Level, log_file: Option<&Path>, max_lines: usize) -> anyhow::Result<()> {
    let writer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
            }
            trim_log_file(path, max_lines)
                .with_context(|| format!("Failed to trim log file {}", path.display()))?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            BoxMakeWriter::new(io::stdout.and(Arc::new(file)))
        }
        None => BoxMakeWriter::new(io::stdout),
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_timer(ChronoLocal::rfc_3339())
        .with_ansi(log_file.is_none())
        .with_writer(writer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))
}
