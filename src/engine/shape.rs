//! Shape compression (input pre-classification).
//!
//! Reduces a raw sample to a compact signature that the classifier passes can
//! reason about without re-reading characters:
//!
//! - runs of ASCII digits become [`ShapeElem::Digits`] tagged with their length;
//! - letter runs that spell a locale vocabulary word become the matching
//!   vocabulary marker (month, weekday, AM/PM), zone names become
//!   [`ShapeElem::ZoneName`], and anything else becomes [`ShapeElem::Alpha`];
//! - a lone `T` or `Z` and every other character stay as [`ShapeElem::Literal`].
//!
//! ```text
//! "02-Aug-2013 10:11"
//!  Digits(2) '-' MonthAbbr '-' Digits(4) ' ' Digits(2) ':' Digits(2)
//! ```
//!
//! Alongside the elements the scan records coarse [`ShapeFlags`] so the
//! classifier can skip passes that cannot possibly apply.
//!
//! ## Vocabulary scanning
//!
//! When every vocabulary entry of the locale is purely alphabetic the whole
//! letter run is looked up in one go. Otherwise (`a. m.`, `Aug.`) each
//! candidate is tried as a prefix at the start of the run, and a match only
//! counts if it ends on a non-letter.

use crate::locale::{LocaleFacts, Word};
use crate::zones;
use std::fmt::Write;

bitflags::bitflags! {
    /// Coarse features of a sample.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ShapeFlags: u32 {
        const HAS_DIGITS   = 1 << 0;
        const HAS_COLON    = 1 << 1;
        const HAS_AMPM     = 1 << 2;
        const WEEKDAYISH   = 1 << 3;
        const MONTHISH     = 1 << 4;
        const HAS_ZONE     = 1 << 5;
        const HAS_CJK      = 1 << 6;
        /// A letter run that is not vocabulary.
        const HAS_ALPHA    = 1 << 7;
    }
}

/// One element of a compressed shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeElem {
    Digits(u8),
    Alpha(u8),
    MonthName,
    MonthAbbr,
    DayOfWeek,
    DayOfWeekAbbr,
    AmPm,
    ZoneName,
    Literal(char),
}

/// An element plus the byte span of input it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeItem {
    pub elem: ShapeElem,
    pub start: usize,
    pub end: usize,
}

/// Compressed form of a sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub items: Vec<ShapeItem>,
    pub flags: ShapeFlags,
}

/// Date markers used by Chinese, Japanese and Korean formats.
pub(crate) const CJK_MARKERS: &[char] = &['年', '月', '日', '时', '時', '分', '秒', '년', '월', '일', '시', '분', '초'];

fn word_elem(word: Word, facts: &LocaleFacts, text: &str) -> ShapeElem {
    match word {
        // "May" is both the long and the short form; call it an abbreviation so
        // it merges with its neighbours either way.
        Word::Month(m) if facts.match_short_month(text) == Some((m, text.len())) => ShapeElem::MonthAbbr,
        Word::Month(_) => ShapeElem::MonthName,
        Word::ShortMonth(_) => ShapeElem::MonthAbbr,
        Word::Weekday => ShapeElem::DayOfWeek,
        Word::ShortWeekday => ShapeElem::DayOfWeekAbbr,
        Word::AmPm => ShapeElem::AmPm,
    }
}

fn is_letter(c: char) -> bool {
    c.is_alphabetic() && !CJK_MARKERS.contains(&c)
}

impl Shape {
    /// Compress `input` using the vocabulary of `facts`.
    pub fn compress(input: &str, facts: &LocaleFacts) -> Shape {
        let mut items = Vec::new();
        let mut flags = ShapeFlags::empty();
        let mut pos = 0;

        while let Some(c) = input[pos..].chars().next() {
            let rest = &input[pos..];

            if c.is_ascii_digit() {
                let len = rest.bytes().take_while(u8::is_ascii_digit).count();
                items.push(ShapeItem { elem: ShapeElem::Digits(len.min(u8::MAX as usize) as u8), start: pos, end: pos + len });
                flags |= ShapeFlags::HAS_DIGITS;
                pos += len;
                continue;
            }

            if is_letter(c) {
                let run: usize = rest.chars().take_while(|c| is_letter(*c)).map(char::len_utf8).sum();
                let word = &rest[..run];

                let vocabulary = if facts.all_alphabetic() {
                    facts.lookup_word(word).map(|w| (word_elem(w, facts, word), run))
                } else {
                    facts
                        .match_vocabulary(rest)
                        .filter(|(_, len)| !rest[*len..].chars().next().is_some_and(is_letter))
                        .map(|(w, len)| (word_elem(w, facts, &rest[..len]), len))
                };

                let (elem, len) = if let Some(hit) = vocabulary {
                    hit
                } else if let Some(len) = zones::match_zone_name(rest) {
                    (ShapeElem::ZoneName, len)
                } else if word == "T" || word == "Z" {
                    (ShapeElem::Literal(c), 1)
                } else {
                    (ShapeElem::Alpha(word.chars().count().min(u8::MAX as usize) as u8), run)
                };

                flags |= match elem {
                    ShapeElem::MonthName | ShapeElem::MonthAbbr => ShapeFlags::MONTHISH,
                    ShapeElem::DayOfWeek | ShapeElem::DayOfWeekAbbr => ShapeFlags::WEEKDAYISH,
                    ShapeElem::AmPm => ShapeFlags::HAS_AMPM,
                    ShapeElem::ZoneName => ShapeFlags::HAS_ZONE,
                    ShapeElem::Alpha(_) => ShapeFlags::HAS_ALPHA,
                    _ => ShapeFlags::empty(),
                };
                items.push(ShapeItem { elem, start: pos, end: pos + len });
                pos += len;
                continue;
            }

            if c == ':' {
                flags |= ShapeFlags::HAS_COLON;
            }
            if CJK_MARKERS.contains(&c) {
                flags |= ShapeFlags::HAS_CJK;
            }
            items.push(ShapeItem { elem: ShapeElem::Literal(c), start: pos, end: pos + c.len_utf8() });
            pos += c.len_utf8();
        }

        Shape { items, flags }
    }

    pub fn elems(&self) -> Vec<ShapeElem> {
        self.items.iter().map(|i| i.elem).collect()
    }

    /// Human-readable signature, e.g. `\d{2}-MMM-\d{4}`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for item in &self.items {
            match item.elem {
                ShapeElem::Digits(n) => {
                    let _ = write!(out, r"\d{{{n}}}");
                }
                ShapeElem::Alpha(n) => {
                    let _ = write!(out, r"\a{{{n}}}");
                }
                ShapeElem::MonthName => out.push_str("MMMM"),
                ShapeElem::MonthAbbr => out.push_str("MMM"),
                ShapeElem::DayOfWeek => out.push_str("EEEE"),
                ShapeElem::DayOfWeekAbbr => out.push_str("EEE"),
                ShapeElem::AmPm => out.push_str("a"),
                ShapeElem::ZoneName => out.push_str("z"),
                ShapeElem::Literal(c) => out.push(c),
            }
        }
        out
    }
}
