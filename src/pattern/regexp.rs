//! Regular expressions derived from a token sequence.
//!
//! The result accepts every input the consumer accepts (and possibly a little
//! more). Runs of adjacent pure-digit tokens are folded into a single
//! `\d{min,max}` so that `yyyyMMdd` becomes `\d{8}` and `d/M` keeps its
//! separator.

use super::token::{FormatToken, TokenSequence};
use crate::locale::LocaleFacts;
use crate::zones;
use std::fmt::Write;

fn push_digits(out: &mut String, min: u32, max: u32) {
    if min == max {
        let _ = write!(out, r"\d{{{min}}}");
    } else {
        let _ = write!(out, r"\d{{{min},{max}}}");
    }
}

fn padded(width: u8, pad: u8) -> String {
    let total = pad.max(width) as usize;
    let alternatives: Vec<String> =
        (0..=total - width as usize).map(|spaces| format!(r"{}\d{{{}}}", " ".repeat(spaces), total - spaces)).collect();
    format!("(?:{})", alternatives.join("|"))
}

fn offset(letters: u8, zero: bool) -> String {
    let body = match letters {
        1 => r"[-+]\d{2}(?:\d{2})?",
        2 => r"[-+]\d{4}",
        3 => r"[-+]\d{2}:\d{2}",
        4 => r"[-+]\d{4}(?:\d{2})?",
        _ => r"[-+]\d{2}:\d{2}(?::\d{2})?",
    };
    if zero { format!("(?:Z|{body})") } else { body.to_string() }
}

/// Regex body (unanchored) for `sequence`.
pub(crate) fn build(sequence: &TokenSequence, facts: &LocaleFacts) -> String {
    let mut out = String::new();
    let mut digits: Option<(u32, u32)> = None;

    for token in sequence.tokens() {
        if token == FormatToken::QuoteMarker {
            continue;
        }
        if token.is_pure_digits() {
            if let Some((min, max)) = token.digit_range() {
                let (lo, hi) = digits.unwrap_or((0, 0));
                digits = Some((lo + u32::from(min), hi + u32::from(max)));
                continue;
            }
        }
        if let Some((min, max)) = digits.take() {
            push_digits(&mut out, min, max);
        }
        match token {
            FormatToken::Day { width, pad } | FormatToken::Hour12 { width, pad } | FormatToken::Hour24 { width, pad } => {
                out.push_str(&padded(width, pad));
            }
            FormatToken::MonthName if facts.short_months_usable() => {
                let _ = write!(out, "(?:{}|{})", facts.month_regex(), facts.short_month_regex());
            }
            FormatToken::MonthName => out.push_str(facts.month_regex()),
            FormatToken::MonthAbbr => out.push_str(facts.short_month_regex()),
            FormatToken::DayOfWeek => out.push_str(facts.weekday_regex()),
            FormatToken::DayOfWeekAbbr => out.push_str(facts.short_weekday_regex()),
            FormatToken::AmPm => out.push_str(facts.am_pm_regex()),
            FormatToken::AmPmNonLocalized => out.push_str("(?i:AM|PM)"),
            FormatToken::Era => out.push_str("(?i:BCE|AD|BC|CE)"),
            FormatToken::TimeZoneOffset { letters } => out.push_str(&offset(letters, false)),
            FormatToken::TimeZoneOffsetZero { letters } => out.push_str(&offset(letters, true)),
            FormatToken::LocalizedTimeZoneOffset { letters: 1 } => out.push_str(r"GMT(?:[-+]\d{1,2}(?::\d{2})?)?"),
            FormatToken::LocalizedTimeZoneOffset { .. } => out.push_str(r"GMT(?:[-+]\d{2}:\d{2}(?::\d{2})?)?"),
            FormatToken::TimeZoneName => out.push_str(&zones::zone_name_regex()),
            FormatToken::ConstantChar(c) => out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
            _ => {}
        }
    }
    if let Some((min, max)) = digits {
        push_digits(&mut out, min, max);
    }
    out
}
