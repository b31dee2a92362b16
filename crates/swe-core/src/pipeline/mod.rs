pub mod config;
mod orchestrator;
mod types;

pub use orchestrator::{resample_scan, run_analysis, run_analysis_reported, run_batch, ResampledScan};
pub use types::{AnalysisStage, ProgressReporter};
