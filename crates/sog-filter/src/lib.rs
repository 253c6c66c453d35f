#![deny(missing_docs)]
#![doc = "Streaming filter over graph6 lines: decode, evaluate a rule set, forward passing lines unchanged, optionally render them, and hand completed runs to the history ledger."]

pub mod cancel;
pub mod config;
pub mod export;
pub mod pipeline;

pub use cancel::CancelFlag;
pub use config::{CanvasConfig, ExportConfig, FilterConfig, ImageFormat};
pub use export::{
    image_path, safe_file_stem, ExportOutcome, ImageExporter, SvgExporter, MAX_STEM_BYTES,
};
pub use pipeline::{record_run, FilterPipeline, RunResult, RunStatus};
