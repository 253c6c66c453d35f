//! Ledger record type and its one-line text form.

use chrono::{DateTime, NaiveDateTime, SubsecRound, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp layout of the first field (always UTC).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Separator between the five fields of a record.
pub const FIELD_DELIMITER: &str = "\t";
/// Separator between passed graph encodings in the last field.
pub const GRAPH_DELIMITER: &str = ",";

/// One recorded filter run.
///
/// Neither `filter_spec` nor the graph encodings may contain the field
/// delimiter, the graph delimiter or a line break; callers are responsible for
/// that, the ledger writes the values as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    timestamp: DateTime<Utc>,
    input_number: u64,
    output_number: u64,
    filter_spec: String,
    passed_graphs: Vec<String>,
}

impl HistoryEntry {
    /// Creates an entry stamped with the current time, truncated to whole seconds.
    pub fn new(
        input_number: u64,
        output_number: u64,
        filter_spec: impl Into<String>,
        passed_graphs: Vec<String>,
    ) -> Self {
        Self::with_timestamp(
            Utc::now().trunc_subsecs(0),
            input_number,
            output_number,
            filter_spec,
            passed_graphs,
        )
    }

    /// Creates an entry with an explicit timestamp.
    pub fn with_timestamp(
        timestamp: DateTime<Utc>,
        input_number: u64,
        output_number: u64,
        filter_spec: impl Into<String>,
        passed_graphs: Vec<String>,
    ) -> Self {
        Self {
            timestamp,
            input_number,
            output_number,
            filter_spec: filter_spec.into(),
            passed_graphs,
        }
    }

    /// Instant the entry was created.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Number of graphs read by the run.
    pub fn input_number(&self) -> u64 {
        self.input_number
    }

    /// Number of graphs that passed the filter.
    pub fn output_number(&self) -> u64 {
        self.output_number
    }

    /// Filter specification exactly as the caller supplied it.
    pub fn filter_spec(&self) -> &str {
        &self.filter_spec
    }

    /// Encodings of the passed graphs, in pass order.
    pub fn passed_graphs(&self) -> &[String] {
        &self.passed_graphs
    }

    /// Serialises the entry as one ledger line, without the terminator.
    pub fn to_line(&self) -> String {
        let passed = self.passed_graphs.join(GRAPH_DELIMITER);
        [
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            self.input_number.to_string(),
            self.output_number.to_string(),
            self.filter_spec.clone(),
            passed,
        ]
        .join(FIELD_DELIMITER)
    }

    /// Parses one ledger line (terminator already removed).
    ///
    /// Returns `None` unless the line has exactly five fields, a timestamp in
    /// [`TIMESTAMP_FORMAT`] and two non-negative counts.
    pub fn parse_line(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        let [timestamp, input, output, filter_spec, passed] = fields.as_slice() else {
            return None;
        };
        let naive = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()?;
        let passed_graphs = if passed.is_empty() {
            Vec::new()
        } else {
            passed.split(GRAPH_DELIMITER).map(str::to_string).collect()
        };
        Some(Self {
            timestamp: Utc.from_utc_datetime(&naive),
            input_number: input.parse().ok()?,
            output_number: output.parse().ok()?,
            filter_spec: filter_spec.to_string(),
            passed_graphs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
    }

    #[test]
    fn line_has_five_tab_fields() {
        let entry = HistoryEntry::with_timestamp(
            stamp(),
            10,
            5,
            "degree-sum filter",
            vec!["graph1".into(), "graph3".into(), "graph5".into()],
        );
        let line = entry.to_line();
        let parts: Vec<_> = line.split('\t').collect();
        assert_eq!(parts.len(), 5);
        assert_eq!(parts[0], "2025-03-14 09:26:53");
        assert_eq!(parts[1], "10");
        assert_eq!(parts[2], "5");
        assert_eq!(parts[3], "degree-sum filter");
        assert_eq!(parts[4], "graph1,graph3,graph5");
    }

    #[test]
    fn empty_pass_list_round_trips() {
        let entry = HistoryEntry::with_timestamp(stamp(), 3, 0, "[]", Vec::new());
        let line = entry.to_line();
        assert!(line.ends_with("\t[]\t"));
        assert_eq!(HistoryEntry::parse_line(&line), Some(entry));
    }

    #[test]
    fn rejects_bad_fields() {
        assert!(HistoryEntry::parse_line("2025-03-14 09:26:53\t1\t1\tspec").is_none());
        assert!(HistoryEntry::parse_line("yesterday\t1\t1\tspec\tCl").is_none());
        assert!(HistoryEntry::parse_line("2025-03-14 09:26:53\t-1\t1\tspec\tCl").is_none());
        assert!(HistoryEntry::parse_line("2025-03-14 09:26:53\t1\tx\tspec\tCl").is_none());
        assert!(HistoryEntry::parse_line("2025-03-14 09:26:53\t1\t1\tspec\tCl\textra").is_none());
    }

    #[test]
    fn new_entries_have_whole_second_timestamps() {
        let entry = HistoryEntry::new(1, 1, "[]", vec!["Cl".into()]);
        let reparsed = HistoryEntry::parse_line(&entry.to_line()).expect("parses");
        assert_eq!(reparsed, entry);
    }
}
