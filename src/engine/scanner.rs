//! Pass two: component scanner.
//!
//! A single left-to-right walk over the characters of a purely numeric sample,
//! feeding digit runs into two trackers:
//!
//! ```text
//!  "19/7/2012 17:49:53.250 +0200"
//!   ^^ ^ ^^^^                      date tracker   (up to 3 fields)
//!             ^^ ^^ ^^ ^^^         time tracker   (hour, minute, second, fraction)
//!                          ^^^^^^  suffix         (offset / zone / AM-PM)
//! ```
//!
//! Each tracker moves `Empty -> Accumulating -> Closed`. Separators decide which
//! tracker the pending digits belong to: `:` feeds the time tracker, `/` `-` `.`
//! feed the date tracker until a time has started (after which `.` and `,`
//! introduce a fraction), a space or `T` closes the date. The first character
//! that fits neither tracker hands the rest of the input to the suffix parser.
//!
//! Any width or range violation abandons the pass; nothing is guessed here.

use super::classifier::{numeric_letters, order_after_year, order_day_month};
use crate::api::DateResolutionMode;
use crate::locale::LocaleFacts;
use crate::pattern::DateRole;
use crate::zones;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackerState {
    Empty,
    Accumulating,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Field {
    value: u32,
    width: u8,
}

#[derive(Debug)]
struct Tracker {
    state: TrackerState,
    fields: Vec<Field>,
    capacity: usize,
}

impl Tracker {
    fn new(capacity: usize) -> Self {
        Tracker { state: TrackerState::Empty, fields: Vec::with_capacity(capacity), capacity }
    }

    fn push(&mut self, field: Field) -> Option<()> {
        if self.state == TrackerState::Closed || self.fields.len() >= self.capacity {
            return None;
        }
        self.fields.push(field);
        self.state = TrackerState::Accumulating;
        Some(())
    }

    fn close(&mut self) {
        if self.state == TrackerState::Accumulating {
            self.state = TrackerState::Closed;
        }
    }
}

/// Whatever follows the time: offsets, zone names and AM/PM markers.
#[derive(Debug, Default)]
struct Suffix {
    pattern: String,
    am_pm: bool,
}

impl Suffix {
    fn parse(rest: &str, facts: &LocaleFacts) -> Option<Suffix> {
        let mut out = Suffix::default();
        let mut zone_seen = false;
        let mut pos = 0;

        while pos < rest.len() {
            let tail = &rest[pos..];
            if tail.starts_with(' ') {
                if out.pattern.ends_with(' ') {
                    return None;
                }
                out.pattern.push(' ');
                pos += 1;
                continue;
            }

            let meridiem = facts
                .match_meridiem(tail)
                .filter(|(_, len)| !tail[*len..].chars().next().is_some_and(char::is_alphabetic));
            if let Some((_, len)) = meridiem {
                if out.am_pm || zone_seen {
                    return None;
                }
                out.am_pm = true;
                out.pattern.push('a');
                pos += len;
                continue;
            }

            if zone_seen {
                return None;
            }
            zone_seen = true;

            let (letters, len) = if out.pattern.is_empty() && tail == "Z" {
                ("'Z'", 1)
            } else if let Some(gmt) = tail.strip_prefix("GMT").filter(|g| g.starts_with(['+', '-'])) {
                let (letters, len) = localized_offset(gmt)?;
                (letters, 3 + len)
            } else if tail.starts_with(['+', '-']) {
                offset(tail)?
            } else if let Some(len) = zones::match_zone_name(tail) {
                ("z", len)
            } else {
                return None;
            };
            out.pattern.push_str(letters);
            pos += len;
        }

        if out.pattern.ends_with(' ') {
            return None;
        }
        Some(out)
    }
}

fn leading_digits(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

fn two_digit(s: &str, at: usize) -> Option<u32> {
    s.get(at..at + 2)?.parse().ok()
}

/// `+HH`, `+HHMM`, `+HH:MM`, `+HHMMSS` or `+HH:MM:SS`, returning the pattern letters and consumed length.
fn offset(tail: &str) -> Option<(&'static str, usize)> {
    let (letters, len, hours, minutes, seconds) = match leading_digits(&tail[1..]) {
        2 if tail[3..].starts_with(':') => {
            if leading_digits(&tail[4..]) != 2 {
                return None;
            }
            if tail[6..].starts_with(':') {
                if leading_digits(&tail[7..]) != 2 {
                    return None;
                }
                ("xxxxx", 9, two_digit(tail, 1)?, two_digit(tail, 4)?, two_digit(tail, 7)?)
            } else {
                ("xxx", 6, two_digit(tail, 1)?, two_digit(tail, 4)?, 0)
            }
        }
        2 => ("x", 3, two_digit(tail, 1)?, 0, 0),
        4 => ("xx", 5, two_digit(tail, 1)?, two_digit(tail, 3)?, 0),
        6 => ("xxxx", 7, two_digit(tail, 1)?, two_digit(tail, 3)?, two_digit(tail, 5)?),
        _ => return None,
    };
    (hours <= 18 && minutes <= 59 && seconds <= 59).then_some((letters, len))
}

/// The part of `GMT+8`, `GMT+8:30` or `GMT+08:00` after `GMT`.
fn localized_offset(tail: &str) -> Option<(&'static str, usize)> {
    let hour_digits = leading_digits(&tail[1..]);
    let hours: u32 = tail.get(1..1 + hour_digits)?.parse().ok()?;
    if !(1..=2).contains(&hour_digits) || hours > 18 {
        return None;
    }
    let after = 1 + hour_digits;
    if !tail[after..].starts_with(':') {
        return Some(("O", after));
    }
    if leading_digits(&tail[after + 1..]) != 2 || two_digit(tail, after + 1)? > 59 {
        return None;
    }
    let letters = if hour_digits == 2 { "OOOO" } else { "O" };
    Some((letters, after + 3))
}

struct Scanner<'a> {
    facts: &'a LocaleFacts,
    date: Tracker,
    date_separator: Option<char>,
    time: Tracker,
    fraction_separator: Option<char>,
    date_time_separator: Option<char>,
    pending: Option<Field>,
    suffix: Option<Suffix>,
}

impl<'a> Scanner<'a> {
    fn new(facts: &'a LocaleFacts) -> Self {
        Scanner {
            facts,
            date: Tracker::new(3),
            date_separator: None,
            time: Tracker::new(4),
            fraction_separator: None,
            date_time_separator: None,
            pending: None,
            suffix: None,
        }
    }

    fn digit(&mut self, d: u32) -> Option<()> {
        if self.time.state == TrackerState::Closed {
            return None;
        }
        let field = self.pending.get_or_insert(Field { value: 0, width: 0 });
        if field.width >= 9 {
            return None;
        }
        field.value = field.value * 10 + d;
        field.width += 1;
        Some(())
    }

    fn time_separator(&mut self) -> Option<()> {
        let field = self.pending.take()?;
        if self.date.state == TrackerState::Accumulating || self.time.fields.len() >= 2 {
            return None;
        }
        self.time.push(field)
    }

    fn date_separator(&mut self, c: char) -> Option<()> {
        let field = self.pending.take()?;
        if self.date.fields.len() >= 2 || self.date_separator.is_some_and(|s| s != c) {
            return None;
        }
        self.date_separator = Some(c);
        self.date.push(field)
    }

    fn fraction_separator(&mut self, c: char) -> Option<()> {
        let field = self.pending.take()?;
        if self.time.fields.len() != 2 || self.fraction_separator.is_some() {
            return None;
        }
        self.fraction_separator = Some(c);
        self.time.push(field)
    }

    /// `' '` or `'T'` after the third date field.
    fn close_date(&mut self, separator: char) -> Option<()> {
        let field = self.pending.take()?;
        if self.date.state != TrackerState::Accumulating || self.date.fields.len() != 2 {
            return None;
        }
        self.date.push(field)?;
        self.date.close();
        self.date_time_separator = Some(separator);
        Some(())
    }

    fn close_time(&mut self) -> Option<()> {
        if self.time.state != TrackerState::Accumulating {
            return None;
        }
        let field = self.pending.take()?;
        self.time.push(field)?;
        self.time.close();
        Some(())
    }

    fn finish(mut self, mode: DateResolutionMode) -> Option<String> {
        if let Some(field) = self.pending.take() {
            match (self.date.state, self.time.state) {
                (_, TrackerState::Accumulating) => self.time.push(field)?,
                (TrackerState::Accumulating, TrackerState::Empty) => self.date.push(field)?,
                _ => return None,
            }
        }
        let has_date = !self.date.fields.is_empty();
        let has_time = !self.time.fields.is_empty();
        if (has_date && self.date.fields.len() != 3)
            || (has_time && self.time.fields.len() < 2)
            || (self.date_time_separator.is_some() && !has_time)
            || (!has_date && !has_time)
        {
            return None;
        }

        let am_pm = self.suffix.as_ref().is_some_and(|s| s.am_pm);
        let mut out = String::new();
        if has_date {
            out.push_str(&self.date_pattern(mode)?);
        }
        match self.date_time_separator {
            Some('T') => out.push_str("'T'"),
            Some(c) => out.push(c),
            None => {}
        }
        if has_time {
            out.push_str(&self.time_pattern(am_pm)?);
        }
        if let Some(suffix) = &self.suffix {
            out.push_str(&suffix.pattern);
        }
        Some(out)
    }

    fn date_pattern(&self, mode: DateResolutionMode) -> Option<String> {
        let [a, b, c] = [self.date.fields[0], self.date.fields[1], self.date.fields[2]];
        let roles = if a.width == 4 || a.value > 31 {
            let (second, third) = order_after_year(b.value, c.value)?;
            [(DateRole::Year, a), (second, b), (third, c)]
        } else {
            let (first, second) = order_day_month(a.value, b.value, self.facts, mode)?;
            [(first, a), (second, b), (DateRole::Year, c)]
        };
        // A value of ten or more says nothing about zero padding, so it takes the
        // width of its unpadded neighbour.
        let mut widths = roles.map(|(_, field)| field.width);
        let numeric: Vec<usize> = (0..3).filter(|i| roles[*i].0 != DateRole::Year).collect();
        if let [i, j] = numeric[..] {
            for (x, y) in [(i, j), (j, i)] {
                if roles[x].1.value >= 10 && roles[y].1.width == 1 {
                    widths[x] = 1;
                }
            }
        }

        let separator = self.date_separator?;
        let mut out = String::new();
        for (idx, ((role, _), width)) in roles.iter().zip(widths).enumerate() {
            if idx > 0 {
                out.push(separator);
            }
            out.push_str(numeric_letters(*role, width)?);
        }
        Some(out)
    }

    fn time_pattern(&self, am_pm: bool) -> Option<String> {
        let fields = &self.time.fields;
        let hour = fields[0];
        let letter = match (am_pm, hour.value) {
            (true, 1..=12) => 'h',
            (true, _) => return None,
            (false, 0..=23) => 'H',
            (false, 24) => 'k',
            (false, _) => return None,
        };
        if hour.width > 2 {
            return None;
        }
        let mut out: String = std::iter::repeat_n(letter, hour.width as usize).collect();
        for (idx, field) in fields.iter().enumerate().skip(1) {
            match idx {
                1 | 2 => {
                    if field.width != 2 || field.value > 59 {
                        return None;
                    }
                    out.push_str(if idx == 1 { ":mm" } else { ":ss" });
                }
                _ => {
                    out.push(self.fraction_separator?);
                    out.extend(std::iter::repeat_n('S', field.width as usize));
                }
            }
        }
        Some(out)
    }
}

/// Scan `input`; `None` when it does not fit the numeric date/time grammar.
pub(crate) fn scan(input: &str, facts: &LocaleFacts, mode: DateResolutionMode) -> Option<String> {
    let mut scanner = Scanner::new(facts);
    for (at, c) in input.char_indices() {
        if c.is_ascii_digit() {
            scanner.digit(c as u32 - '0' as u32)?;
            continue;
        }
        let time_state = scanner.time.state;
        match c {
            ':' => scanner.time_separator()?,
            '/' | '-' | '.' if time_state == TrackerState::Empty => scanner.date_separator(c)?,
            '.' | ',' if time_state == TrackerState::Accumulating => scanner.fraction_separator(c)?,
            'T' | ' ' if time_state == TrackerState::Empty && scanner.date_time_separator.is_none() => {
                scanner.close_date(c)?
            }
            _ => {
                scanner.close_time()?;
                scanner.suffix = Some(Suffix::parse(&input[at..], facts)?);
                break;
            }
        }
    }
    scanner.finish(mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Locale;

    fn run(input: &str, mode: DateResolutionMode) -> Option<String> {
        scan(input, &LocaleFacts::new(&Locale::parse("en-US"), false), mode)
    }

    #[test]
    fn resolves_day_when_value_exceeds_twelve() {
        assert_eq!(run("19/7/2012 17:49:53", DateResolutionMode::None).as_deref(), Some("d/M/yyyy HH:mm:ss"));
        assert_eq!(run("7/19/2012", DateResolutionMode::None).as_deref(), Some("M/d/yyyy"));
    }

    #[test]
    fn ambiguous_fields_follow_mode() {
        assert_eq!(run("2/7/2012 06:24:47", DateResolutionMode::None).as_deref(), Some("?/?/yyyy HH:mm:ss"));
        assert_eq!(run("02/07/2012", DateResolutionMode::DayFirst).as_deref(), Some("dd/MM/yyyy"));
        assert_eq!(run("02/07/2012", DateResolutionMode::MonthFirst).as_deref(), Some("MM/dd/yyyy"));
        assert_eq!(run("02/07/2012", DateResolutionMode::Auto).as_deref(), Some("MM/dd/yyyy"));
        let gb = LocaleFacts::new(&Locale::parse("en-GB"), false);
        assert_eq!(scan("02/07/2012", &gb, DateResolutionMode::Auto).as_deref(), Some("dd/MM/yyyy"));
    }

    #[test]
    fn year_first_dates_use_iso_order() {
        assert_eq!(run("2012.7.2", DateResolutionMode::None).as_deref(), Some("yyyy.M.d"));
        assert_eq!(run("2012-07-02T10:11", DateResolutionMode::None).as_deref(), Some("yyyy-MM-dd'T'HH:mm"));
        assert_eq!(run("2012-19-02", DateResolutionMode::None).as_deref(), Some("yyyy-dd-MM"));
    }

    #[test]
    fn dotted_fraction_inside_time() {
        assert_eq!(run("02.07.2012 10:11:12.5", DateResolutionMode::DayFirst).as_deref(), Some("dd.MM.yyyy HH:mm:ss.S"));
        assert_eq!(run("10:11:12,123456", DateResolutionMode::None).as_deref(), Some("HH:mm:ss,SSSSSS"));
    }

    #[test]
    fn hour_representation_depends_on_am_pm() {
        assert_eq!(run("1/13/2012 1:05 PM", DateResolutionMode::None).as_deref(), Some("M/d/yyyy h:mm a"));
        assert_eq!(run("1/13/2012 1:05PM", DateResolutionMode::None).as_deref(), Some("M/d/yyyy h:mma"));
        assert_eq!(run("1/13/2012 24:00", DateResolutionMode::None).as_deref(), Some("M/d/yyyy kk:mm"));
        assert_eq!(run("1/13/2012 13:05 PM", DateResolutionMode::None), None);
        assert_eq!(run("1/13/2012 25:00", DateResolutionMode::None), None);
    }

    #[test]
    fn time_zone_suffixes() {
        assert_eq!(run("2012-07-02 10:11:12 +0200", DateResolutionMode::None).as_deref(), Some("yyyy-MM-dd HH:mm:ss xx"));
        assert_eq!(run("2012-07-02T10:11:12-05:00", DateResolutionMode::None).as_deref(), Some("yyyy-MM-dd'T'HH:mm:ssxxx"));
        assert_eq!(run("2012-07-02T10:11:12.403Z", DateResolutionMode::None).as_deref(), Some("yyyy-MM-dd'T'HH:mm:ss.SSS'Z'"));
        assert_eq!(run("2012-07-02 10:11:12 EST", DateResolutionMode::None).as_deref(), Some("yyyy-MM-dd HH:mm:ss z"));
        assert_eq!(run("2012-07-02 10:11 GMT+8", DateResolutionMode::None).as_deref(), Some("yyyy-MM-dd HH:mm O"));
        assert_eq!(run("2012-07-02 10:11 GMT+08:00", DateResolutionMode::None).as_deref(), Some("yyyy-MM-dd HH:mm OOOO"));
        assert_eq!(run("2012-07-02 10:11:12 +1900", DateResolutionMode::None), None);
    }

    #[test]
    fn rejects_malformed_components() {
        for input in ["2012-07-02 1:5", "12/07-2012", "2012-07", "10:11:12:13", "32/13/2012", "12/07/2012 ", "20120702"] {
            assert_eq!(run(input, DateResolutionMode::None), None, "{input}");
        }
    }
}
