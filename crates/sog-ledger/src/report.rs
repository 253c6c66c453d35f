//! Read-side views over the ledger for dashboards and exports.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sog_core::{ErrorInfo, SogError};

use crate::entry::{HistoryEntry, TIMESTAMP_FORMAT};

/// One passed graph flattened out of a history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentGraph {
    /// Timestamp of the run that passed the graph.
    pub timestamp: DateTime<Utc>,
    /// Original encoding of the graph.
    pub encoding: String,
    /// Filter the run applied.
    pub filter_spec: String,
}

/// Totals across all recorded runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LedgerSummary {
    /// Number of recorded runs.
    pub runs: usize,
    /// Sum of graphs read.
    pub graphs_seen: u64,
    /// Sum of graphs passed.
    pub graphs_passed: u64,
}

/// Newest `limit` passed graphs, most recent run first.
///
/// The sort is stable: runs sharing a timestamp keep ledger order and graphs
/// within a run keep pass order.
pub fn recent_graphs(entries: &[HistoryEntry], limit: usize) -> Vec<RecentGraph> {
    let mut graphs: Vec<RecentGraph> = entries
        .iter()
        .flat_map(|entry| {
            entry.passed_graphs().iter().map(move |encoding| RecentGraph {
                timestamp: entry.timestamp(),
                encoding: encoding.clone(),
                filter_spec: entry.filter_spec().to_string(),
            })
        })
        .collect();
    graphs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    graphs.truncate(limit);
    graphs
}

/// Aggregates run counts over `entries`.
pub fn summarize(entries: &[HistoryEntry]) -> LedgerSummary {
    entries.iter().fold(LedgerSummary::default(), |acc, entry| LedgerSummary {
        runs: acc.runs + 1,
        graphs_seen: acc.graphs_seen + entry.input_number(),
        graphs_passed: acc.graphs_passed + entry.output_number(),
    })
}

/// Writes all entries as a pretty-printed JSON array.
pub fn export_json(entries: &[HistoryEntry], out_path: &Path) -> Result<(), SogError> {
    let json = serde_json::to_string_pretty(entries)
        .map_err(|err| SogError::Io(ErrorInfo::new("history-export", err.to_string())))?;
    fs::write(out_path, json).map_err(|err| SogError::io("history-export", &err, out_path))
}

/// Writes all entries as CSV with a header row; passed graphs are space separated.
pub fn export_csv(entries: &[HistoryEntry], out_path: &Path) -> Result<(), SogError> {
    let csv_error = |err: csv::Error| {
        SogError::Io(
            ErrorInfo::new("history-export", err.to_string())
                .with_context("path", out_path.display()),
        )
    };
    let mut wtr = csv::Writer::from_path(out_path).map_err(csv_error)?;
    wtr.write_record(["timestamp", "input_number", "output_number", "filter", "passed_graphs"])
        .map_err(csv_error)?;
    for entry in entries {
        wtr.write_record([
            entry.timestamp().format(TIMESTAMP_FORMAT).to_string(),
            entry.input_number().to_string(),
            entry.output_number().to_string(),
            entry.filter_spec().to_string(),
            entry.passed_graphs().join(" "),
        ])
        .map_err(csv_error)?;
    }
    wtr.flush()
        .map_err(|err| SogError::io("history-export", &err, out_path))
}
