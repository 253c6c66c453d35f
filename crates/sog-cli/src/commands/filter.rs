use std::io::{self, BufWriter};
use std::path::PathBuf;

use clap::Args;
use sog_core::{ErrorInfo, SogError};
use sog_filter::{record_run, ExportConfig, FilterConfig, FilterPipeline, ImageFormat};
use sog_ledger::HistoryLedger;
use sog_rules::RuleSet;
use tracing::info;

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// JSON rule list, e.g. `[{"degree_sum": 4, "type": "min", "count": 2}]`.
    pub filter: String,
    /// Directory receiving one image per passing graph.
    #[arg(long, value_name = "DIR")]
    pub export: Option<PathBuf>,
    /// Image format used with `--export`.
    #[arg(long, value_name = "FORMAT")]
    pub image: Option<String>,
    /// History log to append the run to.
    #[arg(long, value_name = "PATH")]
    pub history: Option<PathBuf>,
    /// Do not record the run.
    #[arg(long, conflicts_with = "history")]
    pub no_history: bool,
    /// YAML configuration; flags override its values.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub fn run(args: &FilterArgs) -> Result<(), SogError> {
    let rules = RuleSet::parse(&args.filter)?;
    let config = resolve_config(args)?;
    let pipeline = FilterPipeline::from_config(rules, &config);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let result = pipeline.run(stdin.lock(), BufWriter::new(stdout.lock()))?;

    if config.record_history {
        let ledger = HistoryLedger::new(&config.history_path);
        record_run(&ledger, &result, pipeline.rules())?;
    }
    info!(
        rules = pipeline.rules().len(),
        seen = result.graphs_seen,
        passed = result.graphs_passed,
        "filter finished"
    );
    Ok(())
}

fn resolve_config(args: &FilterArgs) -> Result<FilterConfig, SogError> {
    let mut config = match &args.config {
        Some(path) => FilterConfig::load(path)?,
        None => FilterConfig::default(),
    };
    if let Some(path) = &args.history {
        config.history_path = path.clone();
    }
    if args.no_history {
        config.record_history = false;
    }
    let format = args
        .image
        .as_deref()
        .map(str::parse::<ImageFormat>)
        .transpose()?;
    match (&args.export, format) {
        (Some(directory), format) => {
            let configured = config.export.as_ref();
            let format = format
                .or_else(|| configured.map(|export| export.format))
                .ok_or_else(|| {
                    SogError::Config(
                        ErrorInfo::new("missing-image-format", "--export needs an image format")
                            .with_hint("pass --image svg"),
                    )
                })?;
            let canvas = configured.map(|export| export.canvas).unwrap_or_default();
            config.export = Some(ExportConfig {
                directory: directory.clone(),
                format,
                canvas,
            });
        }
        (None, Some(format)) => match config.export.as_mut() {
            Some(export) => export.format = format,
            None => {
                return Err(SogError::Config(
                    ErrorInfo::new(
                        "image-without-export",
                        "--image has no effect without an export directory",
                    )
                    .with_hint("pass --export DIR or configure export.directory"),
                ))
            }
        },
        (None, None) => {}
    }
    Ok(config)
}
