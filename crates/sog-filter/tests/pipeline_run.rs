use std::cell::RefCell;
use std::io::{self, Cursor, Write};
use std::path::Path;
use std::rc::Rc;

use proptest::prelude::*;
use sog_core::SogError;
use sog_filter::{
    record_run, CancelFlag, ExportOutcome, FilterPipeline, ImageExporter, ImageFormat, RunResult,
    RunStatus,
};
use sog_graph::{encode, gen_gnp};
use sog_ledger::HistoryLedger;
use sog_rules::{Rule, RuleSet};
use tempfile::tempdir;

fn min_rule(degree_sum: usize, count: usize) -> RuleSet {
    RuleSet::new(vec![Rule::at_least(degree_sum, count)])
}

fn run_text(pipeline: &FilterPipeline, input: &str) -> (Result<RunResult, SogError>, String) {
    let mut output = Vec::new();
    let result = pipeline.run(Cursor::new(input.as_bytes()), &mut output);
    (result, String::from_utf8(output).expect("utf8 output"))
}

#[test]
fn passes_matching_lines_unchanged_in_order() {
    // C4 (all edge sums 4), K4 (all 6), P4 (sums 3, 4, 3), C4 again.
    let pipeline = FilterPipeline::new(min_rule(4, 1));
    let (result, output) = run_text(&pipeline, "Cl\nC~\n  Ch \n\n\nCl\n");
    let result = result.expect("run completes");
    assert_eq!(output, "Cl\nCh\nCl\n");
    assert_eq!(result.graphs_seen, 4);
    assert_eq!(result.graphs_passed, 3);
    assert_eq!(result.passed_encodings, vec!["Cl", "Ch", "Cl"]);
    assert_eq!(result.status, RunStatus::Completed);
}

#[test]
fn empty_rule_set_passes_everything() {
    let pipeline = FilterPipeline::new(RuleSet::parse("[]").unwrap());
    let (result, output) = run_text(&pipeline, "?\n@\nA_\nBw\n");
    assert_eq!(result.unwrap().graphs_passed, 4);
    assert_eq!(output, "?\n@\nA_\nBw\n");
}

#[test]
fn empty_input_completes_with_zero_counts() {
    let pipeline = FilterPipeline::new(min_rule(4, 1));
    let (result, output) = run_text(&pipeline, "\n \n");
    let result = result.unwrap();
    assert_eq!(result.graphs_seen, 0);
    assert!(result.passed_encodings.is_empty());
    assert!(output.is_empty());
}

#[test]
fn decode_failure_aborts_but_keeps_emitted_output() {
    let pipeline = FilterPipeline::new(min_rule(4, 1));
    let (result, output) = run_text(&pipeline, "Cl\nC\nCl\n");
    let err = result.unwrap_err();
    assert!(matches!(err, SogError::Decode(_)));
    assert_eq!(err.code(), "truncated");
    assert_eq!(err.info().context.get("line"), Some(&"2".to_string()));
    assert_eq!(err.info().context.get("graphs_seen"), Some(&"1".to_string()));
    assert_eq!(err.info().context.get("graphs_passed"), Some(&"1".to_string()));
    assert_eq!(output, "Cl\n");
}

#[test]
fn invalid_utf8_is_a_decode_error() {
    let pipeline = FilterPipeline::new(min_rule(4, 1));
    let mut output = Vec::new();
    let err = pipeline
        .run(Cursor::new(b"Cl\n\xff\xfe\n".to_vec()), &mut output)
        .unwrap_err();
    assert_eq!(err.code(), "invalid-char");
    assert_eq!(err.info().context.get("line"), Some(&"2".to_string()));
}

struct CancelOnWrite {
    flag: CancelFlag,
    inner: Vec<u8>,
}

impl Write for CancelOnWrite {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.flag.cancel();
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn cancellation_yields_partial_result() {
    let flag = CancelFlag::new();
    let pipeline = FilterPipeline::new(min_rule(4, 1)).with_cancel_flag(flag.clone());
    let mut sink = CancelOnWrite {
        flag: flag.clone(),
        inner: Vec::new(),
    };
    let result = pipeline
        .run(Cursor::new("C~\nCl\nCl\nCl\n"), &mut sink)
        .expect("cancelled runs still produce a result");
    assert_eq!(result.status, RunStatus::Cancelled);
    assert_eq!(result.graphs_seen, 2);
    assert_eq!(result.graphs_passed, 1);
    assert_eq!(sink.inner, b"Cl\n");
}

#[test]
fn raised_flag_stops_before_first_line() {
    let flag = CancelFlag::new();
    flag.cancel();
    let pipeline = FilterPipeline::new(min_rule(4, 1)).with_cancel_flag(flag);
    let (result, output) = run_text(&pipeline, "Cl\n");
    let result = result.unwrap();
    assert_eq!(result.status, RunStatus::Cancelled);
    assert_eq!(result.graphs_seen, 0);
    assert!(output.is_empty());
}

#[derive(Clone, Default)]
struct RecordingExporter {
    calls: Rc<RefCell<Vec<String>>>,
}

impl ImageExporter for RecordingExporter {
    fn export(
        &self,
        encoded: &str,
        format: ImageFormat,
        output_dir: &Path,
    ) -> Result<ExportOutcome, SogError> {
        self.calls.borrow_mut().push(encoded.to_string());
        Ok(ExportOutcome::Rendered(sog_filter::image_path(encoded, format, output_dir)))
    }
}

#[test]
fn export_is_requested_only_for_passing_graphs() {
    let exporter = RecordingExporter::default();
    let pipeline = FilterPipeline::new(min_rule(4, 1)).with_export(
        Box::new(exporter.clone()),
        ImageFormat::Svg,
        "unused",
    );
    let (result, _) = run_text(&pipeline, "Cl\nC~\n>>graph6<<Ch\n");
    result.unwrap();
    assert_eq!(*exporter.calls.borrow(), vec!["Cl", ">>graph6<<Ch"]);
}

#[test]
fn completed_runs_are_recorded() {
    let dir = tempdir().unwrap();
    let ledger = HistoryLedger::new(dir.path().join("history.txt"));
    let spec = r#"[{"degree_sum": 4, "type": "min", "count": 2}]"#;
    let rules = RuleSet::parse(spec).unwrap();
    let pipeline = FilterPipeline::new(rules);
    let (result, _) = run_text(&pipeline, "Cl\nC~\n");
    let result = result.unwrap();

    let entry = record_run(&ledger, &result, pipeline.rules())
        .unwrap()
        .expect("completed run recorded");
    let entries = ledger.read_all();
    assert_eq!(entries, vec![entry]);
    assert_eq!(entries[0].input_number(), 2);
    assert_eq!(entries[0].output_number(), 1);
    assert_eq!(entries[0].filter_spec(), spec);
    assert_eq!(entries[0].passed_graphs(), &["Cl".to_string()]);
}

#[test]
fn cancelled_runs_are_not_recorded() {
    let dir = tempdir().unwrap();
    let ledger = HistoryLedger::new(dir.path().join("history.txt"));
    let flag = CancelFlag::new();
    flag.cancel();
    let pipeline = FilterPipeline::new(min_rule(4, 1)).with_cancel_flag(flag);
    let (result, _) = run_text(&pipeline, "Cl\n");
    assert!(record_run(&ledger, &result.unwrap(), pipeline.rules())
        .unwrap()
        .is_none());
    assert!(ledger.read_all().is_empty());
    assert!(!ledger.path().exists());
}

proptest! {
    #[test]
    fn reruns_are_identical(
        seeds in proptest::collection::vec(any::<u64>(), 0..20),
        target in 2usize..8,
    ) {
        let input: String = seeds
            .iter()
            .map(|seed| format!("{}\n", encode(&gen_gnp(6, 0.5, *seed))))
            .collect();
        let pipeline = FilterPipeline::new(min_rule(target, 1));
        let (first, first_out) = run_text(&pipeline, &input);
        let (second, second_out) = run_text(&pipeline, &input);
        prop_assert_eq!(first.unwrap(), second.unwrap());
        prop_assert_eq!(first_out, second_out);
    }
}

#[test]
fn multi_line_filters_are_recorded_compactly() {
    let dir = tempdir().unwrap();
    let ledger = HistoryLedger::new(dir.path().join("history.txt"));
    let spec = "[\n  {\"degree_sum\": 4, \"type\": \"min\", \"count\": 2}\n]";
    let rules = RuleSet::parse(spec).unwrap();
    let pipeline = FilterPipeline::new(rules);
    let (result, _) = run_text(&pipeline, "Cl\n");
    record_run(&ledger, &result.unwrap(), pipeline.rules()).unwrap();
    let entries = ledger.read_all();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0].filter_spec(),
        r#"[{"degree_sum":4,"type":"min","count":2}]"#
    );
}
