//! Structured, queryable form of a pattern string.

use super::consume::{self, ParsedValue};
use super::regexp;
use super::token::{FormatToken, TokenSequence};
use super::tokenizer::tokenize;
use crate::error::{Error, ParseError};
use crate::locale::LocaleFacts;
use once_cell::sync::OnceCell;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Coarse classification of a resolved pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternType {
    LocalDate,
    LocalTime,
    LocalDateTime,
    ZonedDateTime,
    OffsetDateTime,
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PatternType::LocalDate => "LocalDate",
            PatternType::LocalTime => "LocalTime",
            PatternType::LocalDateTime => "LocalDateTime",
            PatternType::ZonedDateTime => "ZonedDateTime",
            PatternType::OffsetDateTime => "OffsetDateTime",
        };
        f.write_str(s)
    }
}

/// How (if at all) a pattern carries a time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeZoneShape {
    None,
    /// `x..xxxxx` (`zero == false`) or `X..XXXXX` (`zero == true`).
    Offset { letters: u8, zero: bool },
    /// A literal `Z` directly after the last time field.
    ZeroDesignator,
    /// `O` / `OOOO`
    Localized { letters: u8 },
    /// `z`
    Named,
}

/// Role of a field in the date group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateRole {
    Year,
    Month,
    Day,
    Unbound,
}

/// One field of the date group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateField {
    pub role: DateRole,
    /// Index into the token sequence.
    pub token_index: usize,
    /// Letter count; `MMM` is 3 and `MMMM` is 4.
    pub length: u8,
    pub pad: u8,
}

/// A pattern string resolved against a locale.
///
/// Cheap to share: the caches hand these out behind an `Arc`.
#[derive(Debug)]
pub struct ResolvedPattern {
    sequence: Arc<TokenSequence>,
    facts: Arc<LocaleFacts>,
    lenient: bool,
    date_fields: Vec<DateField>,
    time_element_count: usize,
    date_separator: Option<char>,
    date_time_separator: Option<char>,
    time_zone: TimeZoneShape,
    am_pm: bool,
    time_first: bool,
    regexp: OnceCell<String>,
    matcher: OnceCell<Regex>,
}

impl ResolvedPattern {
    /// Analyse an already tokenized pattern.
    pub fn new(sequence: Arc<TokenSequence>, facts: Arc<LocaleFacts>, lenient: bool) -> Self {
        let items = sequence.items();
        let mut date_fields = Vec::new();
        let mut time_indices = Vec::new();
        let mut time_zone = TimeZoneShape::None;
        let mut am_pm = false;

        for (idx, item) in items.iter().enumerate() {
            let token = item.token;
            let role = match token {
                FormatToken::Year4 | FormatToken::Year2 => Some(DateRole::Year),
                FormatToken::MonthNumeric { .. } | FormatToken::MonthName | FormatToken::MonthAbbr => {
                    Some(DateRole::Month)
                }
                FormatToken::Day { .. } => Some(DateRole::Day),
                FormatToken::Unbound { .. } => Some(DateRole::Unbound),
                _ => None,
            };
            if let Some(role) = role {
                let (length, pad) = match token {
                    FormatToken::Year4 | FormatToken::MonthName => (4, 0),
                    FormatToken::MonthAbbr => (3, 0),
                    FormatToken::Year2 => (2, 0),
                    FormatToken::Day { width, pad } => (width, pad),
                    FormatToken::MonthNumeric { width } | FormatToken::Unbound { width } => (width, 0),
                    _ => (0, 0),
                };
                date_fields.push(DateField { role, token_index: idx, length, pad });
                continue;
            }
            if token.is_time_field() {
                time_indices.push(idx);
                continue;
            }
            match token {
                FormatToken::TimeZoneName => time_zone = TimeZoneShape::Named,
                FormatToken::TimeZoneOffset { letters } => time_zone = TimeZoneShape::Offset { letters, zero: false },
                FormatToken::TimeZoneOffsetZero { letters } => {
                    time_zone = TimeZoneShape::Offset { letters, zero: true }
                }
                FormatToken::LocalizedTimeZoneOffset { letters } => time_zone = TimeZoneShape::Localized { letters },
                FormatToken::AmPm | FormatToken::AmPmNonLocalized => am_pm = true,
                FormatToken::ConstantChar('Z') if time_zone == TimeZoneShape::None => {
                    let follows_time = items[..idx]
                        .iter()
                        .rev()
                        .find(|it| it.token != FormatToken::QuoteMarker)
                        .is_some_and(|it| it.token.is_time_field());
                    if follows_time {
                        time_zone = TimeZoneShape::ZeroDesignator;
                    }
                }
                _ => {}
            }
        }

        let first_constant_between = |from: usize, to: usize| {
            items[from + 1..to].iter().find_map(|it| match it.token {
                FormatToken::ConstantChar(c) => Some(c),
                _ => None,
            })
        };

        let date_separator = match date_fields.as_slice() {
            [first, second, ..] => first_constant_between(first.token_index, second.token_index),
            _ => None,
        };

        let date_time_separator = match (date_fields.first(), date_fields.last(), time_indices.first()) {
            (Some(first_date), Some(last_date), Some(&first_time)) => {
                if last_date.token_index < first_time {
                    first_constant_between(last_date.token_index, first_time)
                } else if let Some(&last_time) = time_indices.last() {
                    first_constant_between(last_time, first_date.token_index)
                } else {
                    None
                }
            }
            _ => None,
        };

        let time_first = match (date_fields.first(), time_indices.first()) {
            (Some(d), Some(&t)) => t < d.token_index,
            _ => false,
        };

        ResolvedPattern {
            sequence,
            facts,
            lenient,
            date_fields,
            time_element_count: time_indices.len(),
            date_separator,
            date_time_separator,
            time_zone,
            am_pm,
            time_first,
            regexp: OnceCell::new(),
            matcher: OnceCell::new(),
        }
    }

    /// Tokenize and resolve `pattern` without going through a cache.
    pub fn from_pattern(pattern: &str, facts: Arc<LocaleFacts>, lenient: bool) -> Result<Self, Error> {
        Ok(ResolvedPattern::new(Arc::new(tokenize(pattern)?), facts, lenient))
    }

    /// The canonical pattern string (may contain `?` when date-unbound).
    pub fn format_string(&self) -> &str {
        self.sequence.pattern()
    }

    pub fn sequence(&self) -> &TokenSequence {
        &self.sequence
    }

    pub fn facts(&self) -> &LocaleFacts {
        &self.facts
    }

    pub fn is_lenient(&self) -> bool {
        self.lenient
    }

    pub fn date_fields(&self) -> &[DateField] {
        &self.date_fields
    }

    /// Number of date fields, `None` if the pattern has no date part.
    pub fn date_element_count(&self) -> Option<usize> {
        if self.date_fields.is_empty() { None } else { Some(self.date_fields.len()) }
    }

    /// Number of time fields (hour, minute, second, fraction), `None` if there is no time part.
    pub fn time_element_count(&self) -> Option<usize> {
        if self.time_element_count == 0 { None } else { Some(self.time_element_count) }
    }

    fn offset_of(&self, role: DateRole) -> Option<usize> {
        self.date_fields.iter().position(|f| f.role == role)
    }

    pub fn year_offset(&self) -> Option<usize> {
        self.offset_of(DateRole::Year)
    }

    pub fn month_offset(&self) -> Option<usize> {
        self.offset_of(DateRole::Month)
    }

    pub fn day_offset(&self) -> Option<usize> {
        self.offset_of(DateRole::Day)
    }

    pub fn date_separator(&self) -> Option<char> {
        self.date_separator
    }

    /// `' '`, `'T'` or whatever literal sits between the date and time groups.
    pub fn date_time_separator(&self) -> Option<char> {
        self.date_time_separator
    }

    pub fn time_zone(&self) -> TimeZoneShape {
        self.time_zone
    }

    pub fn has_am_pm(&self) -> bool {
        self.am_pm
    }

    pub fn time_first(&self) -> bool {
        self.time_first
    }

    /// Day, month and year positions are all known.
    pub fn is_date_bound(&self) -> bool {
        self.year_offset().is_some() && self.month_offset().is_some() && self.day_offset().is_some()
    }

    /// Has at least one `?` field whose role is not known yet.
    pub fn is_date_unbound(&self) -> bool {
        self.date_fields.iter().any(|f| f.role == DateRole::Unbound)
    }

    pub fn pattern_type(&self) -> PatternType {
        let has_date = !self.date_fields.is_empty();
        let has_time = self.time_element_count > 0;
        match (has_date, has_time) {
            (true, true) => match self.time_zone {
                TimeZoneShape::Named => PatternType::ZonedDateTime,
                TimeZoneShape::Offset { .. } | TimeZoneShape::ZeroDesignator | TimeZoneShape::Localized { .. } => {
                    PatternType::OffsetDateTime
                }
                TimeZoneShape::None => PatternType::LocalDateTime,
            },
            (false, true) => PatternType::LocalTime,
            _ => PatternType::LocalDate,
        }
    }

    /// Consume `input` against the pattern.
    pub fn parse(&self, input: &str) -> Result<(), ParseError> {
        self.extract(input).map(|_| ())
    }

    /// Like [`parse`](Self::parse) but returns the field values.
    pub fn extract(&self, input: &str) -> Result<ParsedValue, ParseError> {
        consume::consume(&self.sequence, &self.facts, input, self.lenient)
    }

    pub fn is_valid(&self, input: &str) -> bool {
        self.parse(input).is_ok()
    }

    /// Regular expression accepting (at least) every value [`parse`](Self::parse) accepts.
    pub fn regexp(&self) -> &str {
        self.regexp.get_or_init(|| regexp::build(&self.sequence, &self.facts))
    }

    /// Anchored, compiled form of [`regexp`](Self::regexp).
    pub fn matcher(&self) -> Result<&Regex, regex::Error> {
        self.matcher.get_or_try_init(|| Regex::new(&format!("^(?:{})$", self.regexp())))
    }
}

impl PartialEq for ResolvedPattern {
    fn eq(&self, other: &Self) -> bool {
        self.format_string() == other.format_string()
            && self.facts.locale() == other.facts.locale()
            && self.lenient == other.lenient
    }
}

impl Eq for ResolvedPattern {}

impl fmt::Display for ResolvedPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.format_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Locale;

    fn resolve(p: &str) -> ResolvedPattern {
        let facts = Arc::new(LocaleFacts::new(&Locale::parse("en-US"), false));
        ResolvedPattern::from_pattern(p, facts, true).unwrap()
    }

    #[test]
    fn records_offsets_and_separators() {
        let r = resolve("dd/MM/yyyy HH:mm:ss");
        assert_eq!(r.date_element_count(), Some(3));
        assert_eq!(r.time_element_count(), Some(3));
        assert_eq!((r.day_offset(), r.month_offset(), r.year_offset()), (Some(0), Some(1), Some(2)));
        assert_eq!(r.date_separator(), Some('/'));
        assert_eq!(r.date_time_separator(), Some(' '));
        assert!(r.is_date_bound());
        assert_eq!(r.pattern_type(), PatternType::LocalDateTime);
    }

    #[test]
    fn unbound_fields_leave_offsets_unknown() {
        let r = resolve("??/??/yyyy");
        assert_eq!(r.year_offset(), Some(2));
        assert_eq!(r.day_offset(), None);
        assert!(r.is_date_unbound());
        assert_eq!(r.date_fields()[0].length, 2);

        let partial = resolve("MMMM yyyy");
        assert!(!partial.is_date_bound());
        assert!(!partial.is_date_unbound());
    }

    #[test]
    fn classifies_time_zone_shapes() {
        assert_eq!(resolve("yyyy-MM-dd'T'HH:mm:ssxxx").pattern_type(), PatternType::OffsetDateTime);
        assert_eq!(resolve("yyyy-MM-dd HH:mm:ss z").pattern_type(), PatternType::ZonedDateTime);
        let zulu = resolve("yyyy-MM-dd'T'HH:mm:ss.SSS'Z'");
        assert_eq!(zulu.time_zone(), TimeZoneShape::ZeroDesignator);
        assert_eq!(zulu.pattern_type(), PatternType::OffsetDateTime);
        assert_eq!(zulu.date_time_separator(), Some('T'));
        assert_eq!(resolve("HH:mm").pattern_type(), PatternType::LocalTime);
        assert_eq!(resolve("MMMM d, yyyy").pattern_type(), PatternType::LocalDate);
    }

    #[test]
    fn detects_time_first_and_am_pm() {
        let r = resolve("h:mm a dd/MM/yyyy");
        assert!(r.time_first());
        assert!(r.has_am_pm());
        assert_eq!(r.date_time_separator(), Some(' '));
    }
}
