//! Pass one: exact lookup of common shapes.
//!
//! The table is written as pattern strings. Each pattern is tokenized once and
//! expanded into every shape its tokens can produce (a `d` yields one- and
//! two-digit shapes, an offset yields `+` and `-` forms), and the result is
//! indexed by shape. Entries earlier in the table win when two patterns share
//! a shape.

use super::shape::ShapeElem;
use crate::pattern::{FormatToken, tokenize};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Patterns recognized by exact shape.
pub(crate) const KNOWN_PATTERNS: &[&str] = &[
    "yyyyMMdd",
    "yyyyMMddHHmmss",
    "yyyy-MM-dd",
    "yyyy/MM/dd",
    "yyyy.MM.dd",
    "yyyy-MM-dd HH:mm",
    "yyyy-MM-dd HH:mm:ss",
    "yyyy/MM/dd HH:mm:ss",
    "yyyy-MM-dd HH:mm:ss.S",
    "yyyy-MM-dd HH:mm:ss.SSS",
    "yyyy-MM-dd HH:mm:ss.SSSSSS",
    "yyyy-MM-dd HH:mm:ss xx",
    "yyyy-MM-dd HH:mm:ssxxx",
    "yyyy-MM-dd'T'HH:mm",
    "yyyy-MM-dd'T'HH:mm:ss",
    "yyyy-MM-dd'T'HH:mm:ss'Z'",
    "yyyy-MM-dd'T'HH:mm:ss.SSS",
    "yyyy-MM-dd'T'HH:mm:ss.SSS'Z'",
    "yyyy-MM-dd'T'HH:mm:ss.SSSSSS",
    "yyyy-MM-dd'T'HH:mm:ss.SSSSSS'Z'",
    "yyyy-MM-dd'T'HH:mm:ssxx",
    "yyyy-MM-dd'T'HH:mm:ssxxx",
    "yyyy-MM-dd'T'HH:mm:ss.SSSxxx",
    "dd MMM yyyy",
    "dd-MMM-yyyy",
    "dd-MMM-yy",
    "dd/MMM/yyyy",
    "dd MMMM yyyy",
    "d MMM yyyy",
    "d MMMM yyyy",
    "MMM dd, yyyy",
    "MMMM dd, yyyy",
    "MMM d, yyyy",
    "MMMM d, yyyy",
    "dd MMM yyyy HH:mm:ss",
    "dd-MMM-yyyy HH:mm:ss",
    "MMM ppd HH:mm:ss",
    "MMM ppd yyyy HH:mm:ss",
    "EEE, dd MMM yyyy HH:mm:ss z",
    "EEE, dd MMM yyyy HH:mm:ss xx",
    "EEE, d MMM yyyy HH:mm:ss z",
    "EEE MMM dd HH:mm:ss z yyyy",
    "EEE MMM dd HH:mm:ss yyyy",
    "dd/MMM/yyyy:HH:mm:ss xx",
];

static TABLE: Lazy<HashMap<Vec<ShapeElem>, &'static str>> = Lazy::new(|| {
    let mut table = HashMap::new();
    for pattern in KNOWN_PATTERNS {
        for shape in shapes_of(pattern) {
            table.entry(shape).or_insert(*pattern);
        }
    }
    table
});

/// Pattern whose shape is exactly `shape`, if any.
pub(crate) fn lookup(shape: &[ShapeElem]) -> Option<&'static str> {
    TABLE.get(shape).copied()
}

/// Alternative shape fragments a single token can produce.
fn alternatives(token: FormatToken) -> Vec<Vec<ShapeElem>> {
    let offset = |body: &[ShapeElem]| -> Vec<Vec<ShapeElem>> {
        ['+', '-'].into_iter().map(|sign| std::iter::once(ShapeElem::Literal(sign)).chain(body.iter().copied()).collect()).collect()
    };
    match token {
        FormatToken::QuoteMarker => vec![vec![]],
        FormatToken::ConstantChar(c) => vec![vec![ShapeElem::Literal(c)]],
        FormatToken::MonthName => vec![vec![ShapeElem::MonthName]],
        FormatToken::MonthAbbr => vec![vec![ShapeElem::MonthAbbr]],
        FormatToken::DayOfWeek => vec![vec![ShapeElem::DayOfWeek]],
        FormatToken::DayOfWeekAbbr => vec![vec![ShapeElem::DayOfWeekAbbr]],
        FormatToken::AmPm => vec![vec![ShapeElem::AmPm]],
        FormatToken::TimeZoneName => vec![vec![ShapeElem::ZoneName]],
        FormatToken::TimeZoneOffset { letters: 2 } => offset(&[ShapeElem::Digits(4)]),
        FormatToken::TimeZoneOffset { letters: 3 } => {
            offset(&[ShapeElem::Digits(2), ShapeElem::Literal(':'), ShapeElem::Digits(2)])
        }
        FormatToken::Day { width: 1, pad: 2 } => {
            vec![vec![ShapeElem::Literal(' '), ShapeElem::Digits(1)], vec![ShapeElem::Digits(2)]]
        }
        t if t.is_pure_digits() => match t.digit_range() {
            Some((min, max)) => (min..=max).map(|n| vec![ShapeElem::Digits(n)]).collect(),
            None => vec![],
        },
        _ => vec![],
    }
}

/// Every shape `pattern` can produce, with adjacent digit runs merged.
fn shapes_of(pattern: &str) -> Vec<Vec<ShapeElem>> {
    let Ok(sequence) = tokenize(pattern) else {
        return vec![];
    };
    let mut shapes: Vec<Vec<ShapeElem>> = vec![vec![]];
    for token in sequence.tokens() {
        let options = alternatives(token);
        shapes = shapes
            .iter()
            .flat_map(|prefix| {
                options.iter().map(move |option| prefix.iter().chain(option.iter()).copied().collect::<Vec<_>>())
            })
            .collect();
    }
    shapes.into_iter().map(|shape| coalesce(&shape)).collect()
}

fn coalesce(shape: &[ShapeElem]) -> Vec<ShapeElem> {
    let mut out: Vec<ShapeElem> = Vec::with_capacity(shape.len());
    for elem in shape {
        if let (Some(ShapeElem::Digits(a)), ShapeElem::Digits(b)) = (out.last_mut(), elem) {
            *a += b;
            continue;
        }
        out.push(*elem);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_pattern_tokenizes_and_has_shapes() {
        for pattern in KNOWN_PATTERNS {
            assert!(tokenize(pattern).is_ok(), "{pattern}");
            assert!(!shapes_of(pattern).is_empty(), "{pattern}");
        }
    }

    #[test]
    fn adjacent_digit_fields_coalesce() {
        assert_eq!(lookup(&[ShapeElem::Digits(8)]), Some("yyyyMMdd"));
        assert_eq!(lookup(&[ShapeElem::Digits(14)]), Some("yyyyMMddHHmmss"));
    }

    #[test]
    fn single_letter_day_matches_both_widths() {
        let shape = |n| vec![ShapeElem::Digits(n), ShapeElem::Literal(' '), ShapeElem::MonthName, ShapeElem::Literal(' '), ShapeElem::Digits(4)];
        assert_eq!(lookup(&shape(2)), Some("dd MMMM yyyy"));
        assert_eq!(lookup(&shape(1)), Some("d MMMM yyyy"));
    }

    #[test]
    fn offsets_match_either_sign() {
        let shape = |sign| {
            vec![
                ShapeElem::Digits(4),
                ShapeElem::Literal('-'),
                ShapeElem::Digits(2),
                ShapeElem::Literal('-'),
                ShapeElem::Digits(2),
                ShapeElem::Literal('T'),
                ShapeElem::Digits(2),
                ShapeElem::Literal(':'),
                ShapeElem::Digits(2),
                ShapeElem::Literal(':'),
                ShapeElem::Digits(2),
                ShapeElem::Literal(sign),
                ShapeElem::Digits(2),
                ShapeElem::Literal(':'),
                ShapeElem::Digits(2),
            ]
        };
        assert_eq!(lookup(&shape('+')), Some("yyyy-MM-dd'T'HH:mm:ssxxx"));
        assert_eq!(lookup(&shape('-')), Some("yyyy-MM-dd'T'HH:mm:ssxxx"));
    }
}
