//! Typed tokens of the format-pattern DSL.

use std::fmt::Write;

/// One classified unit of a format-pattern string.
///
/// Widths are the number of pattern letters (`d` = 1, `dd` = 2); `pad` is the
/// number of leading `p` letters (`ppd` pads the day with spaces to width 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatToken {
    /// `yyyy`
    Year4,
    /// `yy`
    Year2,
    /// `M` / `MM`
    MonthNumeric { width: u8 },
    /// `MMMM`
    MonthName,
    /// `MMM`
    MonthAbbr,
    /// `d` / `dd`, optionally space padded.
    Day { width: u8, pad: u8 },
    /// `?` / `??`: a numeric date field whose role (day, month or year) is not known yet.
    Unbound { width: u8 },
    /// `h` / `hh` (1-12)
    Hour12 { width: u8, pad: u8 },
    /// `H` / `HH` (0-23)
    Hour24 { width: u8, pad: u8 },
    /// `k` / `kk` (1-24)
    Clock24 { width: u8 },
    /// `mm`
    Minute,
    /// `ss`
    Second,
    /// `SSS` (fixed width) or `S{min,max}`.
    Fraction { min: u8, max: u8 },
    /// `x` .. `xxxxx`: numeric offset, never `Z`.
    TimeZoneOffset { letters: u8 },
    /// `X` .. `XXXXX`: numeric offset, `Z` for zero.
    TimeZoneOffsetZero { letters: u8 },
    /// `z`
    TimeZoneName,
    /// `O` / `OOOO`: `GMT+8` / `GMT+08:00`.
    LocalizedTimeZoneOffset { letters: u8 },
    /// `a`
    AmPm,
    /// `P`: always `AM`/`PM` regardless of locale.
    AmPmNonLocalized,
    /// `EEEE`
    DayOfWeek,
    /// `EEE`
    DayOfWeekAbbr,
    /// `G`
    Era,
    /// A literal character, either bare or inside quotes.
    ConstantChar(char),
    /// An opening or closing `'`.
    QuoteMarker,
}

impl FormatToken {
    /// Tokens that only ever consume ASCII digits.
    pub fn is_pure_digits(&self) -> bool {
        match self {
            FormatToken::Year4
            | FormatToken::Year2
            | FormatToken::MonthNumeric { .. }
            | FormatToken::Unbound { .. }
            | FormatToken::Clock24 { .. }
            | FormatToken::Minute
            | FormatToken::Second
            | FormatToken::Fraction { .. } => true,
            FormatToken::Day { pad, .. } | FormatToken::Hour12 { pad, .. } | FormatToken::Hour24 { pad, .. } => {
                *pad == 0
            }
            _ => false,
        }
    }

    /// Minimum and maximum number of digits a numeric token consumes.
    pub fn digit_range(&self) -> Option<(u8, u8)> {
        let variable = |width: u8| if width == 1 { (1, 2) } else { (width, width) };
        match self {
            FormatToken::Year4 => Some((4, 4)),
            FormatToken::Year2 | FormatToken::Minute | FormatToken::Second => Some((2, 2)),
            FormatToken::MonthNumeric { width }
            | FormatToken::Unbound { width }
            | FormatToken::Clock24 { width }
            | FormatToken::Day { width, .. }
            | FormatToken::Hour12 { width, .. }
            | FormatToken::Hour24 { width, .. } => Some(variable(*width)),
            FormatToken::Fraction { min, max } => Some((*min, *max)),
            _ => None,
        }
    }

    /// True for tokens that belong to the date side of a pattern.
    pub fn is_date_field(&self) -> bool {
        matches!(
            self,
            FormatToken::Year4
                | FormatToken::Year2
                | FormatToken::MonthNumeric { .. }
                | FormatToken::MonthName
                | FormatToken::MonthAbbr
                | FormatToken::Day { .. }
                | FormatToken::Unbound { .. }
        )
    }

    /// True for hour, minute, second and fraction tokens.
    pub fn is_time_field(&self) -> bool {
        matches!(
            self,
            FormatToken::Hour12 { .. }
                | FormatToken::Hour24 { .. }
                | FormatToken::Clock24 { .. }
                | FormatToken::Minute
                | FormatToken::Second
                | FormatToken::Fraction { .. }
        )
    }

    pub fn is_time_zone(&self) -> bool {
        matches!(
            self,
            FormatToken::TimeZoneOffset { .. }
                | FormatToken::TimeZoneOffsetZero { .. }
                | FormatToken::TimeZoneName
                | FormatToken::LocalizedTimeZoneOffset { .. }
        )
    }

    /// Append the DSL rendering of this token to `out`.
    pub fn render_into(&self, out: &mut String) {
        let repeat = |out: &mut String, c: char, n: u8| out.extend(std::iter::repeat_n(c, n as usize));
        match *self {
            FormatToken::Year4 => out.push_str("yyyy"),
            FormatToken::Year2 => out.push_str("yy"),
            FormatToken::MonthNumeric { width } => repeat(out, 'M', width),
            FormatToken::MonthName => out.push_str("MMMM"),
            FormatToken::MonthAbbr => out.push_str("MMM"),
            FormatToken::Day { width, pad } => {
                repeat(out, 'p', pad);
                repeat(out, 'd', width);
            }
            FormatToken::Unbound { width } => repeat(out, '?', width),
            FormatToken::Hour12 { width, pad } => {
                repeat(out, 'p', pad);
                repeat(out, 'h', width);
            }
            FormatToken::Hour24 { width, pad } => {
                repeat(out, 'p', pad);
                repeat(out, 'H', width);
            }
            FormatToken::Clock24 { width } => repeat(out, 'k', width),
            FormatToken::Minute => out.push_str("mm"),
            FormatToken::Second => out.push_str("ss"),
            FormatToken::Fraction { min, max } if min == max => repeat(out, 'S', min),
            FormatToken::Fraction { min, max } => {
                let _ = write!(out, "S{{{min},{max}}}");
            }
            FormatToken::TimeZoneOffset { letters } => repeat(out, 'x', letters),
            FormatToken::TimeZoneOffsetZero { letters } => repeat(out, 'X', letters),
            FormatToken::TimeZoneName => out.push('z'),
            FormatToken::LocalizedTimeZoneOffset { letters } => repeat(out, 'O', letters),
            FormatToken::AmPm => out.push('a'),
            FormatToken::AmPmNonLocalized => out.push('P'),
            FormatToken::DayOfWeek => out.push_str("EEEE"),
            FormatToken::DayOfWeekAbbr => out.push_str("EEE"),
            FormatToken::Era => out.push('G'),
            FormatToken::ConstantChar('\'') => out.push_str("''"),
            FormatToken::ConstantChar(c) => out.push(c),
            FormatToken::QuoteMarker => out.push('\''),
        }
    }
}

/// A token together with its byte offset in the originating pattern string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatternItem {
    pub token: FormatToken,
    pub offset: usize,
}

/// Ordered tokens of a pattern string.
///
/// Invariant: `render()` reproduces the exact string the sequence was
/// tokenized from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenSequence {
    pattern: String,
    items: Vec<PatternItem>,
}

impl TokenSequence {
    pub(crate) fn from_parts(pattern: String, items: Vec<PatternItem>) -> Self {
        TokenSequence { pattern, items }
    }

    /// Build a sequence from bare tokens, computing offsets by rendering.
    pub fn from_tokens(tokens: impl IntoIterator<Item = FormatToken>) -> Self {
        let mut pattern = String::new();
        let mut items = Vec::new();
        for token in tokens {
            items.push(PatternItem { token, offset: pattern.len() });
            token.render_into(&mut pattern);
        }
        TokenSequence { pattern, items }
    }

    /// The pattern string this sequence was built from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn items(&self) -> &[PatternItem] {
        &self.items
    }

    pub fn tokens(&self) -> impl Iterator<Item = FormatToken> + '_ {
        self.items.iter().map(|i| i.token)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Re-render the tokens into a pattern string.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.pattern.len());
        for item in &self.items {
            item.token.render_into(&mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_tokens_tracks_offsets() {
        let seq = TokenSequence::from_tokens([
            FormatToken::Year4,
            FormatToken::ConstantChar('-'),
            FormatToken::MonthNumeric { width: 2 },
            FormatToken::QuoteMarker,
            FormatToken::ConstantChar('T'),
            FormatToken::QuoteMarker,
            FormatToken::Fraction { min: 1, max: 3 },
        ]);
        assert_eq!(seq.pattern(), "yyyy-MM'T'S{1,3}");
        let offsets: Vec<usize> = seq.items().iter().map(|i| i.offset).collect();
        assert_eq!(offsets, vec![0, 4, 5, 7, 8, 9, 10]);
    }

    #[test]
    fn padded_fields_are_not_pure_digits() {
        assert!(FormatToken::Day { width: 2, pad: 0 }.is_pure_digits());
        assert!(!FormatToken::Day { width: 1, pad: 2 }.is_pure_digits());
        assert_eq!(FormatToken::Day { width: 1, pad: 0 }.digit_range(), Some((1, 2)));
        assert_eq!(FormatToken::Fraction { min: 3, max: 6 }.digit_range(), Some((3, 6)));
    }
}
