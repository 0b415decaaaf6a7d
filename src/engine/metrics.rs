//! Classification metrics.
//!
//! [`Classifier::classify`](super::Classifier::classify) keeps nothing but the
//! answer. [`Classifier::classify_verbose`](super::Classifier::classify_verbose)
//! runs the same passes and records what each one did, which is what the CLI
//! debug report and regression hunting use.

use super::shape::ShapeFlags;
use std::fmt;
use std::time::Duration;

// --- Metrics -----------------------------------------------------------------

/// One of the three classification passes, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pass {
    /// Exact lookup of the compressed shape in the table of common formats.
    KnownShape,
    /// Left-to-right scan of purely numeric samples.
    Scanner,
    /// Assign known sub-shapes, then reason about what is left.
    Elimination,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Pass::KnownShape => "known-shape",
            Pass::Scanner => "scanner",
            Pass::Elimination => "elimination",
        })
    }
}

/// Timing and outcome for a single pass.
#[derive(Debug, Clone)]
pub struct PassMetrics {
    pub pass: Pass,
    /// Elapsed time for the pass, validation included.
    pub duration: Duration,
    /// Pattern the pass proposed, before validation.
    pub candidate: Option<String>,
    /// Whether the candidate validated against the sample.
    pub hit: bool,
}

/// Everything observed while classifying one sample.
#[derive(Debug, Clone, Default)]
pub struct ClassifyTrace {
    pub input: String,
    /// Rejected by the length / first-character check before any pass ran.
    pub rejected_early: bool,
    /// Rendered compressed shape, e.g. `\d{2}/\d{2}/\d{4}`.
    pub shape: String,
    pub flags: ShapeFlags,
    /// Passes that actually ran, in order.
    pub passes: Vec<PassMetrics>,
    pub pattern: Option<String>,
    pub winner: Option<Pass>,
    pub total: Duration,
}
