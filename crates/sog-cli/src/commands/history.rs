use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use serde_json::json;
use sog_core::{ErrorInfo, SogError};
use sog_filter::FilterConfig;
use sog_ledger::{
    export_csv, export_json, recent_graphs, summarize, HistoryLedger, LedgerSummary, RecentGraph,
    TIMESTAMP_FORMAT,
};

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// History log to read; defaults to the configured path.
    #[arg(long, value_name = "PATH")]
    pub history: Option<PathBuf>,
    /// YAML configuration providing the history path.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Number of recently passed graphs to list.
    #[arg(long, default_value_t = 20)]
    pub recent: usize,
    /// Output format for the listing.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Write every entry to this JSON file.
    #[arg(long, value_name = "PATH")]
    pub export_json: Option<PathBuf>,
    /// Write every entry to this CSV file.
    #[arg(long, value_name = "PATH")]
    pub export_csv: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn run(args: &HistoryArgs) -> Result<(), SogError> {
    let path = match (&args.history, &args.config) {
        (Some(path), _) => path.clone(),
        (None, Some(config)) => FilterConfig::load(config)?.history_path,
        (None, None) => FilterConfig::default().history_path,
    };
    let entries = HistoryLedger::new(path).read_all();
    if let Some(out) = &args.export_json {
        export_json(&entries, out)?;
    }
    if let Some(out) = &args.export_csv {
        export_csv(&entries, out)?;
    }

    let summary = summarize(&entries);
    let recent = recent_graphs(&entries, args.recent);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = match args.format {
        OutputFormat::Json => {
            let document = json!({ "summary": summary, "recent": recent });
            let text = serde_json::to_string_pretty(&document)
                .map_err(|err| SogError::Io(ErrorInfo::new("history-render", err.to_string())))?;
            writeln!(out, "{text}").and_then(|()| out.flush())
        }
        OutputFormat::Text => write_text(&mut out, &summary, &recent),
    };
    written.map_err(|err| SogError::Io(ErrorInfo::new("output-write", err.to_string())))
}

fn write_text(
    out: &mut impl Write,
    summary: &LedgerSummary,
    recent: &[RecentGraph],
) -> io::Result<()> {
    writeln!(
        out,
        "runs: {}  graphs seen: {}  graphs passed: {}",
        summary.runs, summary.graphs_seen, summary.graphs_passed
    )?;
    for graph in recent {
        writeln!(
            out,
            "{}\t{}\t{}",
            graph.timestamp.format(TIMESTAMP_FORMAT),
            graph.encoding,
            graph.filter_spec
        )?;
    }
    out.flush()
}
