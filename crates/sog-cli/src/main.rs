use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sog_core::SogError;
use tracing_subscriber::EnvFilter;

use commands::{
    filter::{self, FilterArgs},
    history::{self, HistoryArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "sog", version, about = "Rule-based streaming filter for graph6 graphs")]
struct Cli {
    /// Log level for messages on stderr; `RUST_LOG` overrides it.
    #[arg(long, global = true, default_value = "warn", value_name = "LEVEL")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter graph6 lines from stdin, printing the graphs that pass.
    Filter(FilterArgs),
    /// Inspect or export the history of completed runs.
    History(HistoryArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);
    let outcome = match &cli.command {
        Command::Filter(args) => filter::run(args),
        Command::History(args) => history::run(args),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(exit_code(&err))
        }
    }
}

/// Usage problems exit with 1, runs that abort part way exit with 2.
fn exit_code(err: &SogError) -> u8 {
    match err {
        SogError::Specification(_) | SogError::Config(_) => 1,
        SogError::Decode(_) | SogError::Invariant(_) | SogError::Export(_) | SogError::Io(_) => 2,
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}
