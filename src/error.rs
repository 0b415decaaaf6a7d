//! Error taxonomy.
//!
//! Samples that do not look like a date are not errors: the classifier returns
//! `None` and the training state counts them. The types here cover the cases a
//! caller has to react to:
//!
//! - [`ParseError`]: a concrete value does not satisfy an already-resolved pattern.
//! - [`MergeError`]: two training states cannot be combined.
//! - [`Error`]: everything that is fatal to the operation that triggered it
//!   (hand-written pattern that does not tokenize, unsupported locale, a
//!   serialized state that cannot be read back).

use std::fmt;

/// What went wrong while consuming a value against a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// A numeric field expected a digit.
    ExpectedDigit,
    /// A literal character or a vocabulary word (month, weekday, AM/PM, zone) did not match.
    ExpectedText,
    /// A field was syntactically fine but its value is outside its range.
    ValueOutOfRange,
    /// The input ended before the pattern did.
    UnterminatedField,
    /// The pattern is exhausted but input remains.
    TrailingInput,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParseErrorKind::ExpectedDigit => "expected digit",
            ParseErrorKind::ExpectedText => "expected text",
            ParseErrorKind::ValueOutOfRange => "value out of range",
            ParseErrorKind::UnterminatedField => "unterminated field",
            ParseErrorKind::TrailingInput => "trailing input",
        };
        f.write_str(s)
    }
}

/// Positioned failure of [`ResolvedPattern::parse`](crate::ResolvedPattern::parse).
///
/// `offset` is a byte offset into the value being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{kind} at offset {offset}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, offset: usize) -> Self {
        ParseError { kind, offset }
    }
}

/// Reasons two [`FormatInferrer`](crate::FormatInferrer)s refuse to merge.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    #[error("cannot merge a training state with itself")]
    SelfMerge,
    #[error("configuration mismatch: {left} vs {right}")]
    ConfigMismatch { left: String, right: String },
}

/// Why a locale cannot be used for inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnsupportedReason {
    NonGregorianCalendar,
    NonArabicDigits,
}

impl fmt::Display for UnsupportedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnsupportedReason::NonGregorianCalendar => "non-Gregorian calendar",
            UnsupportedReason::NonArabicDigits => "non-Arabic digits",
        };
        f.write_str(s)
    }
}

/// Crate-level error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed pattern '{pattern}' at offset {offset}: {reason}")]
    MalformedPattern { pattern: String, offset: usize, reason: &'static str },
    #[error("unsupported locale '{tag}': {reason}")]
    UnsupportedLocale { tag: String, reason: UnsupportedReason },
    #[error("merge failed: {0}")]
    Merge(#[from] MergeError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn malformed(pattern: &str, offset: usize, reason: &'static str) -> Self {
        Error::MalformedPattern { pattern: pattern.to_string(), offset, reason }
    }
}
