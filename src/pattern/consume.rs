//! Token-driven consumption of an input string.
//!
//! Walks the token sequence once, advancing a byte cursor through the input.
//! Every failure carries the offset where consumption stopped.
//!
//! Numeric fields of width one take one or two digits, except when the next
//! token is also numeric and adjacent, in which case they take exactly one.
//! Space-padded fields (`ppd`) take leading spaces followed by digits, the two
//! together filling the pad width.

use super::token::{FormatToken, TokenSequence};
use crate::error::{ParseError, ParseErrorKind};
use crate::locale::LocaleFacts;
use crate::zones;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// Field values pulled out of an input by [`ResolvedPattern::extract`](super::ResolvedPattern::extract).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedValue {
    /// Two-digit years are already pivoted (`00..49` -> 2000s, `50..99` -> 1900s).
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    /// Values of `?` fields, in input order.
    pub unbound: Vec<u32>,
    /// Hour as written; see [`hour_of_day`](Self::hour_of_day).
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub second: Option<u32>,
    pub nanosecond: Option<u32>,
    pub pm: Option<bool>,
    pub offset_seconds: Option<i32>,
    pub zone: Option<String>,
}

impl ParsedValue {
    /// Hour on the 0-23 clock, applying AM/PM and mapping `k` hour 24 to 0.
    pub fn hour_of_day(&self) -> Option<u32> {
        let hour = self.hour?;
        Some(match self.pm {
            Some(pm) => hour % 12 + if pm { 12 } else { 0 },
            None => hour % 24,
        })
    }

    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year?, self.month?, self.day?)
    }

    pub fn to_naive_time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_nano_opt(
            self.hour_of_day()?,
            self.minute.unwrap_or(0),
            self.second.unwrap_or(0),
            self.nanosecond.unwrap_or(0),
        )
    }

    pub fn to_naive_date_time(&self) -> Option<NaiveDateTime> {
        Some(self.to_naive_date()?.and_time(self.to_naive_time()?))
    }

    /// Only available when the input carried a numeric offset.
    pub fn to_fixed_offset(&self) -> Option<DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(self.offset_seconds?)?;
        offset.from_local_datetime(&self.to_naive_date_time()?).single()
    }
}

/// Two-digit year pivot.
pub(crate) fn year_from(val: u32) -> i32 {
    if val < 100 { if val >= 50 { 1900 + val as i32 } else { 2000 + val as i32 } } else { val as i32 }
}

/// Days in `month`, counting February as 29 so any year is plausible.
pub(crate) fn max_day_of_month(month: u32) -> u32 {
    match month {
        2 => 29,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

const ERAS: [&str; 4] = ["BCE", "AD", "BC", "CE"];

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn error_at(&self, at: usize, kind: ParseErrorKind) -> ParseError {
        if at >= self.input.len() { ParseError::new(ParseErrorKind::UnterminatedField, at) } else { ParseError::new(kind, at) }
    }

    fn fail(&self, kind: ParseErrorKind) -> ParseError {
        self.error_at(self.pos, kind)
    }

    /// Between `min` and `max` ASCII digits, greedily.
    fn digits(&mut self, min: usize, max: usize) -> Result<(u32, usize), ParseError> {
        let count = self.rest().bytes().take(max).take_while(u8::is_ascii_digit).count();
        if count < min {
            return Err(self.error_at(self.pos + count, ParseErrorKind::ExpectedDigit));
        }
        let value = self
            .rest()
            .bytes()
            .take(count)
            .try_fold(0u32, |acc, b| acc.checked_mul(10)?.checked_add(u32::from(b - b'0')))
            .ok_or_else(|| ParseError::new(ParseErrorKind::ValueOutOfRange, self.pos))?;
        self.pos += count;
        Ok((value, count))
    }

    fn field(&mut self, width: u8, pad: u8, next_numeric: bool) -> Result<u32, ParseError> {
        let width = width as usize;
        if pad > 0 {
            let total = (pad as usize).max(width);
            let spaces = self.rest().bytes().take(total - width).take_while(|b| *b == b' ').count();
            self.pos += spaces;
            return self.digits(total - spaces, total - spaces).map(|(v, _)| v);
        }
        let (min, max) = match (width, next_numeric) {
            (1, true) => (1, 1),
            (1, false) => (1, 2),
            (w, _) => (w, w),
        };
        self.digits(min, max).map(|(v, _)| v)
    }

    fn literal(&mut self, c: char) -> Result<(), ParseError> {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            Ok(())
        } else {
            Err(self.fail(ParseErrorKind::ExpectedText))
        }
    }

    fn word(&mut self, matched: Option<usize>) -> Result<(), ParseError> {
        let len = matched.ok_or_else(|| self.fail(ParseErrorKind::ExpectedText))?;
        self.pos += len;
        Ok(())
    }

    fn two_digits_follow(&self) -> bool {
        self.rest().as_bytes().get(..2).is_some_and(|b| b.iter().all(u8::is_ascii_digit))
    }

    fn sign(&mut self) -> Option<i32> {
        let sign = match self.peek()? {
            '+' => 1,
            '-' => -1,
            _ => return None,
        };
        self.pos += 1;
        Some(sign)
    }

    fn bounded(&mut self, min: usize, max: usize, limit: u32) -> Result<u32, ParseError> {
        let at = self.pos;
        let (v, _) = self.digits(min, max)?;
        if v > limit {
            return Err(ParseError::new(ParseErrorKind::ValueOutOfRange, at));
        }
        Ok(v)
    }

    /// `x`/`X` family; the letter count picks the layout.
    fn offset(&mut self, letters: u8, zero_designator: bool) -> Result<i32, ParseError> {
        if zero_designator && self.peek() == Some('Z') {
            self.pos += 1;
            return Ok(0);
        }
        let sign = self.sign().ok_or_else(|| self.fail(ParseErrorKind::ExpectedText))?;
        let hours = self.bounded(2, 2, 18)?;
        let colon = matches!(letters, 3 | 5);
        let mut minutes = 0;
        let mut seconds = 0;
        if letters == 1 {
            if self.two_digits_follow() {
                minutes = self.bounded(2, 2, 59)?;
            }
        } else {
            if colon {
                self.literal(':')?;
            }
            minutes = self.bounded(2, 2, 59)?;
        }
        if letters >= 4 {
            if colon {
                if self.peek() == Some(':') {
                    self.pos += 1;
                    seconds = self.bounded(2, 2, 59)?;
                }
            } else if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                seconds = self.bounded(2, 2, 59)?;
            }
        }
        Ok(sign * (hours * 3600 + minutes * 60 + seconds) as i32)
    }

    /// `GMT`, `GMT+8`, `GMT+8:30` (`O`) or `GMT+08:00` (`OOOO`).
    fn localized_offset(&mut self, letters: u8) -> Result<i32, ParseError> {
        if !self.rest().starts_with("GMT") {
            return Err(self.fail(ParseErrorKind::ExpectedText));
        }
        self.pos += 3;
        let Some(sign) = self.sign() else {
            return Ok(0);
        };
        let (hours, minutes, seconds) = if letters == 1 {
            let hours = self.bounded(1, 2, 18)?;
            let mut minutes = 0;
            if self.peek() == Some(':') {
                self.pos += 1;
                minutes = self.bounded(2, 2, 59)?;
            }
            (hours, minutes, 0)
        } else {
            let hours = self.bounded(2, 2, 18)?;
            self.literal(':')?;
            let minutes = self.bounded(2, 2, 59)?;
            let mut seconds = 0;
            if self.peek() == Some(':') {
                self.pos += 1;
                seconds = self.bounded(2, 2, 59)?;
            }
            (hours, minutes, seconds)
        };
        Ok(sign * (hours * 3600 + minutes * 60 + seconds) as i32)
    }
}

fn check(value: u32, min: u32, max: u32, at: usize) -> Result<u32, ParseError> {
    if value < min || value > max {
        return Err(ParseError::new(ParseErrorKind::ValueOutOfRange, at));
    }
    Ok(value)
}

/// Consume `input` against `sequence`, validating field ranges.
///
/// With `lenient`, an all-zero date (`0000-00-00`) is accepted.
pub(crate) fn consume(
    sequence: &TokenSequence,
    facts: &LocaleFacts,
    input: &str,
    lenient: bool,
) -> Result<ParsedValue, ParseError> {
    let items = sequence.items();
    let mut cur = Cursor { input, pos: 0 };
    let mut out = ParsedValue::default();
    let date_floor = if lenient { 0 } else { 1 };

    let mut raw_year = None;
    let mut month_at = None;
    let mut day_at = None;
    let mut zero_at = None;

    for (idx, item) in items.iter().enumerate() {
        let next_numeric = items.get(idx + 1).is_some_and(|n| n.token.is_pure_digits());
        let start = cur.pos;
        match item.token {
            FormatToken::Year4 => {
                let (v, _) = cur.digits(4, 4)?;
                raw_year = Some(v);
                out.year = Some(v as i32);
            }
            FormatToken::Year2 => {
                let (v, _) = cur.digits(2, 2)?;
                raw_year = Some(v);
                out.year = Some(year_from(v));
            }
            FormatToken::MonthNumeric { width } => {
                let v = check(cur.field(width, 0, next_numeric)?, date_floor, 12, start)?;
                if v == 0 {
                    zero_at.get_or_insert(start);
                }
                out.month = Some(v);
                month_at = Some(start);
            }
            FormatToken::MonthName => {
                let rest = cur.rest();
                let (m, len) = facts
                    .match_month(rest)
                    .or_else(|| facts.match_short_month(rest))
                    .ok_or_else(|| cur.fail(ParseErrorKind::ExpectedText))?;
                cur.pos += len;
                out.month = Some(u32::from(m));
                month_at = Some(start);
            }
            FormatToken::MonthAbbr => {
                let (m, len) = facts.match_short_month(cur.rest()).ok_or_else(|| cur.fail(ParseErrorKind::ExpectedText))?;
                cur.pos += len;
                out.month = Some(u32::from(m));
                month_at = Some(start);
            }
            FormatToken::Day { width, pad } => {
                let v = check(cur.field(width, pad, next_numeric)?, date_floor, 31, start)?;
                if v == 0 {
                    zero_at.get_or_insert(start);
                }
                out.day = Some(v);
                day_at = Some(start);
            }
            FormatToken::Unbound { width } => {
                let v = check(cur.field(width, 0, next_numeric)?, date_floor, 31, start)?;
                if v == 0 {
                    zero_at.get_or_insert(start);
                }
                out.unbound.push(v);
            }
            FormatToken::Hour12 { width, pad } => {
                out.hour = Some(check(cur.field(width, pad, next_numeric)?, 1, 12, start)?);
            }
            FormatToken::Hour24 { width, pad } => {
                out.hour = Some(check(cur.field(width, pad, next_numeric)?, 0, 23, start)?);
            }
            FormatToken::Clock24 { width } => {
                out.hour = Some(check(cur.field(width, 0, next_numeric)?, 1, 24, start)?);
            }
            FormatToken::Minute => out.minute = Some(cur.bounded(2, 2, 59)?),
            FormatToken::Second => out.second = Some(cur.bounded(2, 2, 59)?),
            FormatToken::Fraction { min, max } => {
                let (v, n) = cur.digits(min as usize, max as usize)?;
                out.nanosecond = Some(v * 10u32.pow(9 - n as u32));
            }
            FormatToken::TimeZoneOffset { letters } => out.offset_seconds = Some(cur.offset(letters, false)?),
            FormatToken::TimeZoneOffsetZero { letters } => out.offset_seconds = Some(cur.offset(letters, true)?),
            FormatToken::LocalizedTimeZoneOffset { letters } => {
                out.offset_seconds = Some(cur.localized_offset(letters)?);
            }
            FormatToken::TimeZoneName => {
                let len = zones::match_zone_name(cur.rest()).ok_or_else(|| cur.fail(ParseErrorKind::ExpectedText))?;
                out.zone = Some(cur.rest()[..len].to_string());
                cur.pos += len;
            }
            FormatToken::AmPm => {
                let (pm, len) = facts.match_meridiem(cur.rest()).ok_or_else(|| cur.fail(ParseErrorKind::ExpectedText))?;
                out.pm = Some(pm);
                cur.pos += len;
            }
            FormatToken::AmPmNonLocalized => {
                let marker = cur.rest().get(..2).map(str::to_ascii_uppercase);
                match marker.as_deref() {
                    Some("AM") => out.pm = Some(false),
                    Some("PM") => out.pm = Some(true),
                    _ => return Err(cur.fail(ParseErrorKind::ExpectedText)),
                }
                cur.pos += 2;
            }
            FormatToken::DayOfWeek => cur.word(facts.match_weekday(cur.rest()))?,
            FormatToken::DayOfWeekAbbr => cur.word(facts.match_short_weekday(cur.rest()))?,
            FormatToken::Era => {
                let rest = cur.rest();
                let len = ERAS
                    .iter()
                    .find(|era| rest.get(..era.len()).is_some_and(|p| p.eq_ignore_ascii_case(era)))
                    .map(|era| era.len());
                cur.word(len)?;
            }
            FormatToken::ConstantChar(c) => cur.literal(c)?,
            FormatToken::QuoteMarker => {}
        }
    }

    if !cur.at_end() {
        return Err(ParseError::new(ParseErrorKind::TrailingInput, cur.pos));
    }

    if let Some(at) = zero_at {
        let all_zero = raw_year.is_none_or(|y| y == 0)
            && out.month.is_none_or(|m| m == 0)
            && out.day.is_none_or(|d| d == 0)
            && out.unbound.iter().all(|v| *v == 0);
        if !all_zero {
            return Err(ParseError::new(ParseErrorKind::ValueOutOfRange, at));
        }
        return Ok(out);
    }

    if let (Some(month), Some(day)) = (out.month, out.day) {
        if day > max_day_of_month(month) {
            let at = day_at.or(month_at).unwrap_or(0);
            return Err(ParseError::new(ParseErrorKind::ValueOutOfRange, at));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Locale;
    use crate::pattern::{ResolvedPattern, tokenize};
    use std::sync::Arc;

    fn run(pattern: &str, input: &str) -> Result<ParsedValue, ParseError> {
        let facts = LocaleFacts::new(&Locale::parse("en-US"), false);
        consume(&tokenize(pattern).unwrap(), &facts, input, false)
    }

    fn kind(pattern: &str, input: &str) -> (ParseErrorKind, usize) {
        let err = run(pattern, input).unwrap_err();
        (err.kind, err.offset)
    }

    #[test]
    fn extracts_iso_date_time() {
        let v = run("yyyy-MM-dd'T'HH:mm:ss.SSSxxx", "2012-03-04T05:06:07.890+05:30").unwrap();
        assert_eq!((v.year, v.month, v.day), (Some(2012), Some(3), Some(4)));
        assert_eq!(v.nanosecond, Some(890_000_000));
        assert_eq!(v.offset_seconds, Some(5 * 3600 + 30 * 60));
        assert_eq!(v.to_fixed_offset().unwrap().to_rfc3339(), "2012-03-04T05:06:07.890+05:30");
    }

    #[test]
    fn single_letter_fields_take_one_or_two_digits() {
        assert!(run("d/M/yyyy", "1/2/2012").is_ok());
        assert!(run("d/M/yyyy", "12/11/2012").is_ok());
        let v = run("yyyyMd", "201234").unwrap();
        assert_eq!((v.month, v.day), (Some(3), Some(4)));
    }

    #[test]
    fn padded_day_accepts_leading_space() {
        assert_eq!(run("MMM ppd HH:mm:ss", "Jan  5 10:11:12").unwrap().day, Some(5));
        assert_eq!(run("MMM ppd HH:mm:ss", "Jan 15 10:11:12").unwrap().day, Some(15));
        assert!(run("MMM ppd HH:mm:ss", "Jan   5 10:11:12").is_err());
    }

    #[test]
    fn over_wide_fields_fail_without_panicking() {
        let mut cur = Cursor { input: "99999999999", pos: 0 };
        assert_eq!(cur.digits(1, 11), Err(ParseError::new(ParseErrorKind::ValueOutOfRange, 0)));
        let mut cur = Cursor { input: "4294967295", pos: 0 };
        assert_eq!(cur.digits(10, 10), Ok((4_294_967_295, 10)));

        assert!(run("ppd", "99999999999").is_err());
        assert!(run("yyyyMMdd", "99999999999").is_err());
        assert_eq!(kind("ppH:mm", "123:00"), (ParseErrorKind::ExpectedText, 2));
        assert!(ResolvedPattern::from_pattern("pppppppppppd", Arc::new(LocaleFacts::new(&Locale::default(), false)), true).is_err());
    }

    #[test]
    fn month_name_also_accepts_abbreviation() {
        assert_eq!(run("MMMM d, yyyy", "Sep 3, 2012").unwrap().month, Some(9));
        assert_eq!(run("MMMM d, yyyy", "September 3, 2012").unwrap().month, Some(9));
        assert!(run("MMM d, yyyy", "September 3, 2012").is_err());
    }

    #[test]
    fn errors_are_positioned() {
        assert_eq!(kind("dd/MM/yyyy", "12-01-2012"), (ParseErrorKind::ExpectedText, 2));
        assert_eq!(kind("dd/MM/yyyy", "12/13/2012"), (ParseErrorKind::ValueOutOfRange, 3));
        assert_eq!(kind("dd/MM/yyyy", "12/01/20"), (ParseErrorKind::UnterminatedField, 8));
        assert_eq!(kind("dd/MM/yyyy", "12/01/2012 "), (ParseErrorKind::TrailingInput, 10));
        assert_eq!(kind("dd/MM/yyyy", "1a/01/2012"), (ParseErrorKind::ExpectedDigit, 1));
        assert_eq!(kind("HH:mm", "24:00"), (ParseErrorKind::ValueOutOfRange, 0));
    }

    #[test]
    fn february_allows_the_twenty_ninth_in_any_year() {
        assert!(run("dd/MM/yyyy", "29/02/2013").is_ok());
        assert_eq!(kind("dd/MM/yyyy", "30/02/2012"), (ParseErrorKind::ValueOutOfRange, 0));
        assert_eq!(kind("MMM dd yyyy", "Apr 31 2012"), (ParseErrorKind::ValueOutOfRange, 4));
    }

    #[test]
    fn zero_date_needs_lenient_mode() {
        let facts = LocaleFacts::new(&Locale::parse("en-US"), false);
        let seq = tokenize("yyyy-MM-dd").unwrap();
        assert!(consume(&seq, &facts, "0000-00-00", true).is_ok());
        assert!(consume(&seq, &facts, "0000-00-00", false).is_err());
        assert!(consume(&seq, &facts, "2012-00-12", true).is_err());
    }

    #[test]
    fn am_pm_converts_to_day_clock() {
        let v = run("h:mm a", "12:30 AM").unwrap();
        assert_eq!(v.hour_of_day(), Some(0));
        let v = run("h:mm a", "1:05 pm").unwrap();
        assert_eq!(v.to_naive_time(), NaiveTime::from_hms_opt(13, 5, 0));
        assert_eq!(run("kk:mm", "24:00").unwrap().hour_of_day(), Some(0));
    }

    #[test]
    fn offset_layouts_follow_letter_count() {
        assert_eq!(run("HH:mmx", "10:00+05").unwrap().offset_seconds, Some(18_000));
        assert_eq!(run("HH:mmx", "10:00+0530").unwrap().offset_seconds, Some(19_800));
        assert_eq!(run("HH:mmxx", "10:00-0800").unwrap().offset_seconds, Some(-28_800));
        assert!(run("HH:mmxx", "10:00-08:00").is_err());
        assert_eq!(run("HH:mmXXX", "10:00Z").unwrap().offset_seconds, Some(0));
        assert!(run("HH:mmxxx", "10:00Z").is_err());
        assert_eq!(kind("HH:mmxx", "10:00+1900"), (ParseErrorKind::ValueOutOfRange, 6));
        assert_eq!(run("HH:mm O", "10:00 GMT+8").unwrap().offset_seconds, Some(28_800));
        assert_eq!(run("HH:mm OOOO", "10:00 GMT-03:30").unwrap().offset_seconds, Some(-12_600));
        assert_eq!(run("HH:mm OOOO", "10:00 GMT").unwrap().offset_seconds, Some(0));
    }

    #[test]
    fn named_zone_and_weekday() {
        let v = run("EEE MMM dd HH:mm:ss z yyyy", "Tue Jun 05 10:11:12 EDT 2012").unwrap();
        assert_eq!(v.zone.as_deref(), Some("EDT"));
        assert_eq!(v.year, Some(2012));
    }

    #[test]
    fn two_digit_years_pivot() {
        assert_eq!(run("dd-MMM-yy", "02-Aug-13").unwrap().year, Some(2013));
        assert_eq!(run("dd-MMM-yy", "02-Aug-73").unwrap().year, Some(1973));
    }
}
