//! Line-by-line filter pipeline.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use serde::Serialize;
use sog_core::{ErrorInfo, SogError};
use sog_ledger::{HistoryEntry, HistoryLedger};
use sog_rules::RuleSet;
use tracing::{debug, info, trace, warn};

use crate::cancel::CancelFlag;
use crate::config::{FilterConfig, ImageFormat};
use crate::export::{ImageExporter, SvgExporter};

/// How a run that produced a result ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// The input stream was exhausted.
    Completed,
    /// The cancel flag was raised between two lines.
    Cancelled,
}

/// Tallies of one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    /// Non-blank lines decoded and evaluated.
    pub graphs_seen: u64,
    /// Lines that passed the rule set.
    pub graphs_passed: u64,
    /// Passing lines exactly as they were emitted, in input order.
    pub passed_encodings: Vec<String>,
    /// Whether the run finished or was cancelled.
    pub status: RunStatus,
}

impl RunResult {
    fn new() -> Self {
        Self {
            graphs_seen: 0,
            graphs_passed: 0,
            passed_encodings: Vec::new(),
            status: RunStatus::Completed,
        }
    }

    /// Returns whether the whole input was processed.
    pub fn is_completed(&self) -> bool {
        self.status == RunStatus::Completed
    }

    /// Builds the ledger record for this run, stamped now.
    pub fn to_history_entry(&self, filter_spec: &str) -> HistoryEntry {
        HistoryEntry::new(
            self.graphs_seen,
            self.graphs_passed,
            filter_spec,
            self.passed_encodings.clone(),
        )
    }
}

struct ExportTarget {
    exporter: Box<dyn ImageExporter>,
    format: ImageFormat,
    directory: PathBuf,
}

/// Streaming filter: one rule set, optional image export, optional cancellation.
pub struct FilterPipeline {
    rules: RuleSet,
    export: Option<ExportTarget>,
    cancel: Option<CancelFlag>,
}

impl FilterPipeline {
    /// Creates a pipeline that only filters.
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            export: None,
            cancel: None,
        }
    }

    /// Creates a pipeline using the export settings of `config`.
    pub fn from_config(rules: RuleSet, config: &FilterConfig) -> Self {
        let pipeline = Self::new(rules);
        match &config.export {
            Some(export) => pipeline.with_export(
                Box::new(SvgExporter::new(export.canvas)),
                export.format,
                export.directory.clone(),
            ),
            None => pipeline,
        }
    }

    /// Renders every passing graph with `exporter` into `directory`.
    pub fn with_export(
        mut self,
        exporter: Box<dyn ImageExporter>,
        format: ImageFormat,
        directory: impl Into<PathBuf>,
    ) -> Self {
        self.export = Some(ExportTarget {
            exporter,
            format,
            directory: directory.into(),
        });
        self
    }

    /// Stops the run at the next line boundary once `flag` is raised.
    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Rule set applied to every graph.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Filters `input` into `output`.
    ///
    /// Blank lines are skipped and surrounding whitespace is trimmed. The
    /// first line that fails to decode aborts the run: lines already written
    /// stay written (the output is flushed) and the error is returned with
    /// the line number and the tallies reached so far. No [`RunResult`] is
    /// produced for an aborted run.
    pub fn run<R: BufRead, W: Write>(
        &self,
        input: R,
        mut output: W,
    ) -> Result<RunResult, SogError> {
        let mut result = RunResult::new();
        let streamed = self.stream(input, &mut output, &mut result);
        let flushed = output
            .flush()
            .map_err(|err| SogError::Io(ErrorInfo::new("output-flush", err.to_string())));
        streamed?;
        flushed?;
        match result.status {
            RunStatus::Completed => info!(
                seen = result.graphs_seen,
                passed = result.graphs_passed,
                "filter run completed"
            ),
            RunStatus::Cancelled => warn!(
                seen = result.graphs_seen,
                passed = result.graphs_passed,
                "filter run cancelled"
            ),
        }
        Ok(result)
    }

    fn stream<R: BufRead, W: Write>(
        &self,
        mut input: R,
        output: &mut W,
        result: &mut RunResult,
    ) -> Result<(), SogError> {
        let mut buffer = Vec::new();
        let mut line_number = 0usize;
        loop {
            if self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled) {
                result.status = RunStatus::Cancelled;
                return Ok(());
            }
            buffer.clear();
            let read = input
                .read_until(b'\n', &mut buffer)
                .map_err(|err| SogError::Io(ErrorInfo::new("input-read", err.to_string())))?;
            if read == 0 {
                return Ok(());
            }
            line_number += 1;
            let annotate = |err: SogError, result: &RunResult| {
                err.with_context("line", line_number)
                    .with_context("graphs_seen", result.graphs_seen)
                    .with_context("graphs_passed", result.graphs_passed)
            };
            let text = std::str::from_utf8(&buffer).map_err(|err| {
                annotate(
                    SogError::Decode(
                        ErrorInfo::new("invalid-char", "line is not valid UTF-8")
                            .with_context("offset", err.valid_up_to()),
                    ),
                    result,
                )
            })?;
            let encoded = text.trim();
            if encoded.is_empty() {
                continue;
            }
            let graph = sog_graph::decode(encoded).map_err(|err| annotate(err, result))?;
            result.graphs_seen += 1;
            if !self.rules.matches(&graph).map_err(|err| annotate(err, result))? {
                trace!(line = line_number, "graph rejected");
                continue;
            }
            writeln!(output, "{encoded}").map_err(|err| {
                annotate(SogError::Io(ErrorInfo::new("output-write", err.to_string())), result)
            })?;
            result.graphs_passed += 1;
            result.passed_encodings.push(encoded.to_string());
            if let Some(target) = &self.export {
                let outcome = target
                    .exporter
                    .export(encoded, target.format, &target.directory)
                    .map_err(|err| annotate(err, result))?;
                debug!(line = line_number, image = %outcome.path().display(), "exported graph");
            }
        }
    }
}

/// Records a completed run in `ledger`.
///
/// Cancelled runs are not recorded; the returned entry is `None` for them.
/// The filter is recorded as the caller wrote it unless that text contains
/// ledger delimiters, in which case its compact JSON form is stored.
pub fn record_run(
    ledger: &HistoryLedger,
    result: &RunResult,
    rules: &RuleSet,
) -> Result<Option<HistoryEntry>, SogError> {
    if !result.is_completed() {
        debug!("cancelled run not recorded");
        return Ok(None);
    }
    let source = rules.source();
    let entry = if source.contains(|c: char| matches!(c, '\t' | '\n' | '\r')) {
        result.to_history_entry(RuleSet::new(rules.rules().to_vec()).source())
    } else {
        result.to_history_entry(source)
    };
    ledger.append(&entry)?;
    Ok(Some(entry))
}
