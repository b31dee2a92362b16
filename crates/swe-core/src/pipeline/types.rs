/// Analysis stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnalysisStage {
    ReadingGeometry,
    Resampling,
    ExtractingRegion,
    Calibrating,
    Quantifying,
}

impl std::fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadingGeometry => write!(f, "Reading geometry"),
            Self::Resampling => write!(f, "Resampling frames"),
            Self::ExtractingRegion => write!(f, "Extracting ROI"),
            Self::Calibrating => write!(f, "Calibrating scale"),
            Self::Quantifying => write!(f, "Quantifying"),
        }
    }
}

/// Progress callbacks for a running analysis.
///
/// All methods default to no-ops.
pub trait ProgressReporter: Send + Sync {
    fn begin_stage(&self, _stage: AnalysisStage) {}

    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when `run_analysis` delegates.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
