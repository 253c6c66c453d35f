//! Append-only history of filter runs.
//!
//! Every completed run is recorded as one tab-separated line:
//! `timestamp  input_number  output_number  filter_spec  passed_graphs`.
//! The read path is tolerant: lines that do not parse are skipped.

#![deny(missing_docs)]

pub mod entry;
pub mod ledger;
pub mod report;

pub use entry::{HistoryEntry, FIELD_DELIMITER, GRAPH_DELIMITER, TIMESTAMP_FORMAT};
pub use ledger::HistoryLedger;
pub use report::{export_csv, export_json, recent_graphs, summarize, LedgerSummary, RecentGraph};
