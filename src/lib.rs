//! Heuristic inference of date/time format patterns from sample strings.
//!
//! Feed samples to a [`FormatInferrer`]; each one is classified into a pattern
//! string such as `dd/MM/yyyy HH:mm:ss`, and [`FormatInferrer::result`] folds
//! everything seen so far into one [`ResolvedPattern`] that can validate,
//! parse and describe further values.
//!
//! ```text
//!  samples ──> Classifier (engine) ──> pattern strings + counts (training)
//!                                             │
//!                                    consolidate (engine/merge)
//!                                             │
//!                                             v
//!                    ResolvedPattern (pattern): parse / is_valid / regexp / type
//! ```
//!
//! Locale vocabularies, token sequences and resolved patterns are cached in a
//! [`Catalog`] shared by the whole process.

#[macro_use]
mod macros;
mod api;
mod catalog;
mod engine;
mod error;
mod locale;
mod pattern;
mod training;
mod zones;

pub use api::{Config, DateResolutionMode, determine_format_string, determine_format_string_with};
pub use catalog::Catalog;
pub use engine::{ClassifyTrace, Pass, PassMetrics, Shape, ShapeElem, ShapeFlags, ShapeItem};
pub use error::{Error, MergeError, ParseError, ParseErrorKind, UnsupportedReason};
pub use locale::{FieldOrder, Locale, LocaleFacts, Word};
pub use pattern::{
    DateField, DateRole, FormatToken, ParsedValue, PatternItem, PatternType, ResolvedPattern, TimeZoneShape,
    TokenSequence, tokenize,
};
pub use training::{FormatInferrer, TrainingState};
pub use zones::{ZONE_ABBREVIATIONS, match_zone_name, zone_name_regex};
