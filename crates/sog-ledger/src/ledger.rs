//! File-backed history log.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use sog_core::SogError;
use tracing::{debug, info, warn};

use crate::entry::HistoryEntry;
use crate::report::{recent_graphs, RecentGraph};

/// File-backed, append-only history of filter runs.
///
/// Creating a ledger does not touch the filesystem; the log file (and its
/// parent directories) are created by the first [`HistoryLedger::append`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryLedger {
    path: PathBuf,
}

impl HistoryLedger {
    /// Creates a ledger backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one entry as a single terminated line.
    ///
    /// The line is written with one `write_all` on an append-mode handle, so
    /// concurrent writers interleave whole lines as long as the platform
    /// append is atomic at that size. No locking is performed.
    pub fn append(&self, entry: &HistoryEntry) -> Result<(), SogError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| SogError::io("ledger-mkdir", &err, parent))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|err| SogError::io("ledger-open", &err, &self.path))?;
        let mut line = entry.to_line();
        line.push('\n');
        file.write_all(line.as_bytes())
            .map_err(|err| SogError::io("ledger-append", &err, &self.path))?;
        info!(
            path = %self.path.display(),
            input = entry.input_number(),
            output = entry.output_number(),
            "recorded run in history"
        );
        Ok(())
    }

    /// Reads every well-formed entry, in file order.
    ///
    /// The file is read once up front. Malformed lines, non UTF-8 lines and an
    /// absent file are not errors: they simply contribute no entries.
    pub fn read_all(&self) -> Vec<HistoryEntry> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "history unreadable");
                return Vec::new();
            }
        };
        let mut entries = Vec::new();
        for (index, raw) in bytes.split(|byte| *byte == b'\n').enumerate() {
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            if raw.is_empty() {
                continue;
            }
            match std::str::from_utf8(raw).ok().and_then(HistoryEntry::parse_line) {
                Some(entry) => entries.push(entry),
                None => debug!(line = index + 1, "skipping malformed history line"),
            }
        }
        entries
    }

    /// The `limit` most recently recorded passed graphs across all runs.
    pub fn recent_graphs(&self, limit: usize) -> Vec<RecentGraph> {
        recent_graphs(&self.read_all(), limit)
    }
}
