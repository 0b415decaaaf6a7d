//! Pass three: elimination.
//!
//! Works on the compressed shape rather than characters. Known sub-shapes are
//! assigned first and taken out of consideration:
//!
//! 1. vocabulary markers (`MMMM`, `MMM`, `EEEE`, `EEE`, `a`, `z`);
//! 2. digits in front of CJK markers (`2012年` is a year, `8月` a month, ...);
//! 3. the first `H:mm[:ss[.S]]` group and an offset right after it;
//! 4. a four-digit year.
//!
//! At most two numeric fields may be left over. With a month already known they
//! are the day (and a two-digit year); otherwise they are day and month, told
//! apart by magnitude and the resolution mode exactly like pass two.

use super::classifier::{numeric_letters, order_after_year, order_day_month};
use super::shape::{Shape, ShapeElem, ShapeFlags};
use crate::api::DateResolutionMode;
use crate::locale::LocaleFacts;
use crate::pattern::{DateRole, FormatToken, tokenize};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Text(String),
    Num { value: u32, width: u8, letters: Option<String> },
}

impl Slot {
    fn is_text(&self, s: &str) -> bool {
        matches!(self, Slot::Text(t) if t == s)
    }

    fn free_num(&self) -> Option<(u32, u8)> {
        match self {
            Slot::Num { value, width, letters: None } => Some((*value, *width)),
            _ => None,
        }
    }

    fn assign(&mut self, text: impl Into<String>) {
        if let Slot::Num { letters, .. } = self {
            *letters = Some(text.into());
        }
    }
}

#[derive(Debug, Default)]
struct Known {
    year: bool,
    month: bool,
    day: bool,
    time: bool,
}

fn slots_of(shape: &Shape, input: &str) -> Option<Vec<Slot>> {
    shape
        .items
        .iter()
        .map(|item| {
            let slot = match item.elem {
                ShapeElem::Digits(n) if n <= 9 => {
                    Slot::Num { value: input[item.start..item.end].parse().ok()?, width: n, letters: None }
                }
                ShapeElem::Digits(_) | ShapeElem::Alpha(_) => return None,
                ShapeElem::MonthName => Slot::Text("MMMM".into()),
                ShapeElem::MonthAbbr => Slot::Text("MMM".into()),
                ShapeElem::DayOfWeek => Slot::Text("EEEE".into()),
                ShapeElem::DayOfWeekAbbr => Slot::Text("EEE".into()),
                ShapeElem::AmPm => Slot::Text("a".into()),
                ShapeElem::ZoneName => Slot::Text("z".into()),
                ShapeElem::Literal('\'') => Slot::Text("''".into()),
                ShapeElem::Literal(c) if c.is_ascii_alphabetic() => Slot::Text(format!("'{c}'")),
                ShapeElem::Literal(c) => Slot::Text(c.to_string()),
            };
            Some(slot)
        })
        .collect()
}

fn hour_letters(value: u32, width: u8, am_pm: bool) -> Option<String> {
    let letter = match (am_pm, value) {
        (true, _) => 'h',
        (false, 24) => 'k',
        (false, _) => 'H',
    };
    (1..=2).contains(&width).then(|| std::iter::repeat_n(letter, width as usize).collect())
}

fn assign_cjk(slots: &mut [Slot], known: &mut Known, am_pm: bool) -> Option<()> {
    for i in 1..slots.len() {
        let Slot::Text(marker) = &slots[i] else { continue };
        let Some((value, width)) = slots[i - 1].free_num() else { continue };
        let letters = match marker.as_str() {
            "年" | "년" => {
                known.year = true;
                numeric_letters(DateRole::Year, width)?.to_string()
            }
            "月" | "월" => {
                known.month = true;
                numeric_letters(DateRole::Month, width)?.to_string()
            }
            "日" | "일" => {
                known.day = true;
                numeric_letters(DateRole::Day, width)?.to_string()
            }
            "时" | "時" | "시" => {
                known.time = true;
                hour_letters(value, width, am_pm)?
            }
            "分" | "분" | "秒" | "초" if width == 2 => {
                known.time = true;
                if matches!(marker.as_str(), "分" | "분") { "mm".into() } else { "ss".into() }
            }
            _ => continue,
        };
        slots[i - 1].assign(letters);
    }
    Some(())
}

/// Assigns the first `H:mm[:ss[.S]]` group and returns the index just past it.
fn assign_time(slots: &mut [Slot], am_pm: bool) -> Option<Option<usize>> {
    let Some(start) = (0..slots.len().saturating_sub(2)).find(|&i| {
        slots[i].free_num().is_some() && slots[i + 1].is_text(":") && slots[i + 2].free_num().is_some()
    }) else {
        return Some(None);
    };

    let (hour, hour_width) = slots[start].free_num()?;
    slots[start].assign(hour_letters(hour, hour_width, am_pm)?);
    let two_digits = |slot: &Slot| slot.free_num().is_some_and(|(_, w)| w == 2);

    if !two_digits(&slots[start + 2]) {
        return None;
    }
    slots[start + 2].assign("mm");
    let mut end = start + 3;

    if end + 1 < slots.len() && slots[end].is_text(":") && two_digits(&slots[end + 1]) {
        slots[end + 1].assign("ss");
        end += 2;
        if end + 1 < slots.len() && (slots[end].is_text(".") || slots[end].is_text(",")) {
            if let Some((_, width)) = slots[end + 1].free_num() {
                slots[end + 1].assign("S".repeat(width as usize));
                end += 2;
            }
        }
    }
    Some(Some(end))
}

/// `+HHMM` or `+HH:MM` directly after the time, optionally after one space.
fn assign_offset(slots: &mut [Slot], after_time: usize) -> Option<()> {
    let mut i = after_time;
    if i < slots.len() && slots[i].is_text(" ") {
        i += 1;
    }
    if i + 1 >= slots.len() || !(slots[i].is_text("+") || slots[i].is_text("-")) {
        return Some(());
    }
    match slots[i + 1].free_num() {
        Some((_, 4)) => {
            slots[i] = Slot::Text(String::new());
            slots[i + 1].assign("xx");
        }
        Some((_, 2)) if i + 3 < slots.len() && slots[i + 2].is_text(":") && slots[i + 3].free_num().is_some() => {
            slots[i] = Slot::Text(String::new());
            slots[i + 1].assign("xxx");
            slots[i + 2] = Slot::Text(String::new());
            slots[i + 3].assign("");
        }
        _ => return None,
    }
    Some(())
}

/// True when every letter outside quotes is a pattern letter.
pub(crate) fn whitelisted(pattern: &str) -> bool {
    let Ok(sequence) = tokenize(pattern) else {
        return false;
    };
    let mut quoted = false;
    sequence.tokens().all(|token| match token {
        FormatToken::QuoteMarker => {
            quoted = !quoted;
            true
        }
        FormatToken::ConstantChar(c) => quoted || !c.is_ascii_alphabetic(),
        _ => true,
    })
}

/// Run the elimination pass over an already compressed sample.
pub(crate) fn eliminate(input: &str, shape: &Shape, facts: &LocaleFacts, mode: DateResolutionMode) -> Option<String> {
    if shape.flags.contains(ShapeFlags::HAS_ALPHA) {
        return None;
    }
    let mut slots = slots_of(shape, input)?;
    let am_pm = shape.flags.contains(ShapeFlags::HAS_AMPM);
    let mut known = Known {
        month: shape.flags.contains(ShapeFlags::MONTHISH),
        ..Known::default()
    };

    assign_cjk(&mut slots, &mut known, am_pm)?;

    if !known.time {
        if let Some(end) = assign_time(&mut slots, am_pm)? {
            known.time = true;
            assign_offset(&mut slots, end)?;
        }
    }

    let years: Vec<usize> = (0..slots.len()).filter(|&i| slots[i].free_num().is_some_and(|(_, w)| w == 4)).collect();
    match years.as_slice() {
        [] => {}
        [i] if !known.year => {
            slots[*i].assign("yyyy");
            known.year = true;
        }
        _ => return None,
    }
    let year_at = (0..slots.len()).find(|&i| matches!(&slots[i], Slot::Num { letters: Some(l), .. } if l.starts_with('y')));

    let rest: Vec<usize> = (0..slots.len()).filter(|&i| slots[i].free_num().is_some()).collect();
    match rest.as_slice() {
        [] => {}
        [i] if known.month && !known.day => {
            let (_, width) = slots[*i].free_num()?;
            // Syslog style "Jan  5": two spaces before a single digit become a pad.
            if width == 1 && *i >= 2 && slots[*i - 1].is_text(" ") && slots[*i - 2].is_text(" ") {
                slots[*i - 1] = Slot::Text(String::new());
                slots[*i].assign("ppd");
            } else {
                slots[*i].assign(numeric_letters(DateRole::Day, width)?);
            }
        }
        [i] if known.month && known.day && !known.year => {
            let (_, width) = slots[*i].free_num()?;
            slots[*i].assign(numeric_letters(DateRole::Year, width)?);
        }
        [i, j] if known.month && !known.day && !known.year => {
            let (_, day_width) = slots[*i].free_num()?;
            let (_, year_width) = slots[*j].free_num()?;
            if year_width != 2 {
                return None;
            }
            slots[*i].assign(numeric_letters(DateRole::Day, day_width)?);
            slots[*j].assign("yy");
        }
        [i, j] if known.year && !known.month && !known.day => {
            let (a, a_width) = slots[*i].free_num()?;
            let (b, b_width) = slots[*j].free_num()?;
            let (first, second) = if year_at.is_some_and(|y| y < *i) {
                order_after_year(a, b)?
            } else {
                order_day_month(a, b, facts, mode)?
            };
            slots[*i].assign(numeric_letters(first, a_width)?);
            slots[*j].assign(numeric_letters(second, b_width)?);
        }
        _ => return None,
    }

    let mut pattern = String::new();
    for slot in &slots {
        match slot {
            Slot::Text(t) => pattern.push_str(t),
            Slot::Num { letters: Some(l), .. } => pattern.push_str(l),
            Slot::Num { letters: None, .. } => return None,
        }
    }
    whitelisted(&pattern).then_some(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Locale;

    fn run(input: &str) -> Option<String> {
        run_in(input, "en-US", DateResolutionMode::None)
    }

    fn run_in(input: &str, tag: &str, mode: DateResolutionMode) -> Option<String> {
        let facts = LocaleFacts::new(&Locale::parse(tag), false);
        eliminate(input, &Shape::compress(input, &facts), &facts, mode)
    }

    #[test]
    fn month_names_fix_the_month() {
        assert_eq!(run("Aug 5, 2012").as_deref(), Some("MMM d, yyyy"));
        assert_eq!(run("Tuesday, August 05, 2012").as_deref(), Some("EEEE, MMMM dd, yyyy"));
        assert_eq!(run("5 August 12").as_deref(), Some("d MMMM yy"));
        assert_eq!(run("August 2012").as_deref(), Some("MMMM yyyy"));
    }

    #[test]
    fn strips_time_groups() {
        assert_eq!(run("Aug 5, 2012 10:30 AM").as_deref(), Some("MMM d, yyyy hh:mm a"));
        assert_eq!(run("5 August 2012 10:30:45.123").as_deref(), Some("d MMMM yyyy HH:mm:ss.SSS"));
        assert_eq!(run("5 August 2012 10:30 +0200").as_deref(), Some("d MMMM yyyy HH:mm xx"));
    }

    #[test]
    fn syslog_day_is_padded() {
        assert_eq!(run("Jan  5 10:11:12").as_deref(), Some("MMM ppd HH:mm:ss"));
    }

    #[test]
    fn cjk_markers_map_to_fields() {
        assert_eq!(run("2012年8月5日").as_deref(), Some("yyyy年M月d日"));
        assert_eq!(run("2012年08月05日 10时30分").as_deref(), Some("yyyy年MM月dd日 HH时mm分"));
        assert_eq!(run("2012년 8월 5일").as_deref(), Some("yyyy년 M월 d일"));
    }

    #[test]
    fn space_separated_numbers_use_magnitude_and_mode() {
        assert_eq!(run("25 12 2012").as_deref(), Some("dd MM yyyy"));
        assert_eq!(run("05 12 2012").as_deref(), Some("?? ?? yyyy"));
        assert_eq!(run_in("05 12 2012", "en-GB", DateResolutionMode::Auto).as_deref(), Some("dd MM yyyy"));
    }

    #[test]
    fn leftovers_are_rejected() {
        assert_eq!(run("Foo 5, 2012"), None);
        assert_eq!(run("5 6 7 2012"), None);
        assert_eq!(run("2012 2013"), None);
    }

    #[test]
    fn whitelist_rejects_bare_letters() {
        assert!(whitelisted("yyyy-MM-dd'T'HH:mm"));
        assert!(!whitelisted("yyyy-MM-ddTHH:mm"));
        assert!(!whitelisted("yyyy-MM-dd'T"));
    }
}
