//! Sample classification and pattern consolidation.
//!
//! ## How the parts work together
//!
//! A single sample goes through compression and up to three passes; the first
//! candidate that actually parses the sample wins:
//!
//! ```text
//! sample ── Shape::compress ───────────────┐   (shape.rs)
//!                                           │
//!            known_shapes::lookup ──────────┤   pass one   (known_shapes.rs)
//!            scanner::scan ─────────────────┤   pass two   (scanner.rs)
//!            elimination::eliminate ────────┤   pass three (elimination.rs)
//!                                           v
//!              Catalog::resolved + ResolvedPattern::is_valid
//!                                           │
//!                                           v
//!                                   pattern string
//! ```
//!
//! Training collects those strings with their frequencies, and
//! [`consolidate`](merge::consolidate) folds them into one answer.
//!
//! ## Responsibilities by module
//!
//! - `shape.rs`: reduces a sample to digit runs, vocabulary markers and
//!   literals, plus coarse [`ShapeFlags`].
//! - `known_shapes.rs`: table of common formats indexed by shape.
//! - `scanner.rs`: left-to-right state machine for purely numeric samples.
//! - `elimination.rs`: assigns known sub-shapes and reasons about the rest;
//!   handles month names, CJK markers and space-separated fields.
//! - `classifier.rs`: runs the passes, validates candidates, day/month helpers.
//! - `merge.rs`: frequency-ranked merge and resolution-mode handling.
//! - `metrics.rs`: optional per-pass trace for debugging.
//!
//! ## Debugging
//!
//! Set `RUST_LOG=datesniff=trace` to see every pass outcome per sample.

#[path = "engine/classifier.rs"]
mod classifier;
#[path = "engine/elimination.rs"]
mod elimination;
#[path = "engine/known_shapes.rs"]
mod known_shapes;
#[path = "engine/merge.rs"]
mod merge;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/scanner.rs"]
mod scanner;
#[path = "engine/shape.rs"]
mod shape;

#[cfg(test)]
#[path = "engine/tests.rs"]
mod tests;

pub(crate) use classifier::Classifier;
pub(crate) use merge::consolidate;
pub use metrics::{ClassifyTrace, Pass, PassMetrics};
pub use shape::{Shape, ShapeElem, ShapeFlags, ShapeItem};
