//! Pattern string -> [`TokenSequence`].
//!
//! A single left-to-right scan. Runs of a pattern letter map to the token whose
//! arity matches the run length; letters the DSL does not define are kept as
//! literal characters. Quoted sections become a quote marker, one
//! [`FormatToken::ConstantChar`] per character, and a closing quote marker.
//! `''` (inside or outside quotes) is a literal single quote.
//!
//! ```text
//! "yyyy-MM-dd'T'HH:mm"
//!  ^^^^ Year4
//!      ^ ConstantChar('-')
//!            ^ QuoteMarker  ^ ConstantChar('T')  ^ QuoteMarker
//! ```

use super::token::{FormatToken, PatternItem, TokenSequence};
use crate::error::Error;

/// Tokenize a pattern string.
///
/// Fails with [`Error::MalformedPattern`] on an unterminated quote, an
/// unsupported run length (`yyy`, `EE`, ...), a dangling or over-long pad
/// marker or a malformed `S{min,max}` range.
pub fn tokenize(pattern: &str) -> Result<TokenSequence, Error> {
    let chars: Vec<(usize, char)> = pattern.char_indices().collect();
    let mut items: Vec<PatternItem> = Vec::new();
    let mut in_quote = false;
    let mut i = 0;

    let run_length = |start: usize, c: char| chars[start..].iter().take_while(|(_, ch)| *ch == c).count();

    while i < chars.len() {
        let (offset, c) = chars[i];
        let push = |items: &mut Vec<PatternItem>, token: FormatToken| items.push(PatternItem { token, offset });

        if c == '\'' {
            if chars.get(i + 1).is_some_and(|(_, n)| *n == '\'') {
                push(&mut items, FormatToken::ConstantChar('\''));
                i += 2;
            } else {
                push(&mut items, FormatToken::QuoteMarker);
                in_quote = !in_quote;
                i += 1;
            }
            continue;
        }

        if in_quote {
            push(&mut items, FormatToken::ConstantChar(c));
            i += 1;
            continue;
        }

        if c == 'p' {
            let pad = run_length(i, 'p');
            if pad > 2 {
                return Err(Error::malformed(pattern, offset, "pad marker must be p or pp"));
            }
            let Some(&(_, field)) = chars.get(i + pad) else {
                return Err(Error::malformed(pattern, offset, "pad marker at end of pattern"));
            };
            let width = run_length(i + pad, field);
            let token = match (field, width) {
                ('d', 1 | 2) => FormatToken::Day { width: width as u8, pad: pad as u8 },
                ('H', 1 | 2) => FormatToken::Hour24 { width: width as u8, pad: pad as u8 },
                ('h', 1 | 2) => FormatToken::Hour12 { width: width as u8, pad: pad as u8 },
                _ => return Err(Error::malformed(pattern, offset, "pad marker must precede d, H or h")),
            };
            push(&mut items, token);
            i += pad + width;
            continue;
        }

        if c == 'S' {
            let n = run_length(i, 'S');
            if n == 1 && chars.get(i + 1).is_some_and(|(_, ch)| *ch == '{') {
                let (min, max, consumed) = fraction_range(pattern, &chars[i + 1..], offset)?;
                push(&mut items, FormatToken::Fraction { min, max });
                i += 1 + consumed;
                continue;
            }
            if n > 9 {
                return Err(Error::malformed(pattern, offset, "fraction wider than nine digits"));
            }
            push(&mut items, FormatToken::Fraction { min: n as u8, max: n as u8 });
            i += n;
            continue;
        }

        let n = run_length(i, c);
        let token = match (c, n) {
            ('y', 4) => Some(FormatToken::Year4),
            ('y', 2) => Some(FormatToken::Year2),
            ('y', _) => return Err(Error::malformed(pattern, offset, "year must be yy or yyyy")),
            ('M', 1 | 2) => Some(FormatToken::MonthNumeric { width: n as u8 }),
            ('M', 3) => Some(FormatToken::MonthAbbr),
            ('M', 4) => Some(FormatToken::MonthName),
            ('M', _) => return Err(Error::malformed(pattern, offset, "month must be M, MM, MMM or MMMM")),
            ('d', 1 | 2) => Some(FormatToken::Day { width: n as u8, pad: 0 }),
            ('?', 1 | 2) => Some(FormatToken::Unbound { width: n as u8 }),
            ('H', 1 | 2) => Some(FormatToken::Hour24 { width: n as u8, pad: 0 }),
            ('h', 1 | 2) => Some(FormatToken::Hour12 { width: n as u8, pad: 0 }),
            ('k', 1 | 2) => Some(FormatToken::Clock24 { width: n as u8 }),
            ('d' | '?' | 'H' | 'h' | 'k', _) => {
                return Err(Error::malformed(pattern, offset, "numeric field must be one or two letters"));
            }
            ('m', 2) => Some(FormatToken::Minute),
            ('s', 2) => Some(FormatToken::Second),
            ('m' | 's', _) => return Err(Error::malformed(pattern, offset, "minute and second must be two letters")),
            ('E', 4) => Some(FormatToken::DayOfWeek),
            ('E', 3) => Some(FormatToken::DayOfWeekAbbr),
            ('E', _) => return Err(Error::malformed(pattern, offset, "day of week must be EEE or EEEE")),
            ('a', 1) => Some(FormatToken::AmPm),
            ('P', 1) => Some(FormatToken::AmPmNonLocalized),
            ('G', 1) => Some(FormatToken::Era),
            ('z', 1) => Some(FormatToken::TimeZoneName),
            ('a' | 'P' | 'G' | 'z', _) => return Err(Error::malformed(pattern, offset, "field must be one letter")),
            ('x', 1..=5) => Some(FormatToken::TimeZoneOffset { letters: n as u8 }),
            ('X', 1..=5) => Some(FormatToken::TimeZoneOffsetZero { letters: n as u8 }),
            ('x' | 'X', _) => return Err(Error::malformed(pattern, offset, "offset must be one to five letters")),
            ('O', 1 | 4) => Some(FormatToken::LocalizedTimeZoneOffset { letters: n as u8 }),
            ('O', _) => return Err(Error::malformed(pattern, offset, "localized offset must be O or OOOO")),
            _ => None,
        };

        match token {
            Some(token) => {
                push(&mut items, token);
                i += n;
            }
            None => {
                push(&mut items, FormatToken::ConstantChar(c));
                i += 1;
            }
        }
    }

    if in_quote {
        let offset = items.iter().rev().find(|it| it.token == FormatToken::QuoteMarker).map_or(0, |it| it.offset);
        return Err(Error::malformed(pattern, offset, "unterminated quoted literal"));
    }

    Ok(TokenSequence::from_parts(pattern.to_string(), items))
}

/// Parse `{min,max}` following a single `S`. Returns the bounds and the number
/// of chars consumed (including braces).
fn fraction_range(pattern: &str, rest: &[(usize, char)], offset: usize) -> Result<(u8, u8, usize), Error> {
    let close = rest
        .iter()
        .position(|(_, c)| *c == '}')
        .ok_or_else(|| Error::malformed(pattern, offset, "unterminated fraction range"))?;
    let body: String = rest[1..close].iter().map(|(_, c)| *c).collect();
    let (min, max) = body.split_once(',').ok_or_else(|| Error::malformed(pattern, offset, "fraction range needs min,max"))?;
    let min: u8 = min.trim().parse().map_err(|_| Error::malformed(pattern, offset, "bad fraction minimum"))?;
    let max: u8 = max.trim().parse().map_err(|_| Error::malformed(pattern, offset, "bad fraction maximum"))?;
    if min == 0 || min > max || max > 9 {
        return Err(Error::malformed(pattern, offset, "fraction range must satisfy 1 <= min <= max <= 9"));
    }
    Ok((min, max, close + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(p: &str) -> Vec<FormatToken> {
        tokenize(p).unwrap().tokens().collect()
    }

    #[test]
    fn tokenizes_iso_pattern() {
        assert_eq!(
            tokens("yyyy-MM-dd'T'HH:mm:ss.SSSxxx"),
            vec![
                FormatToken::Year4,
                FormatToken::ConstantChar('-'),
                FormatToken::MonthNumeric { width: 2 },
                FormatToken::ConstantChar('-'),
                FormatToken::Day { width: 2, pad: 0 },
                FormatToken::QuoteMarker,
                FormatToken::ConstantChar('T'),
                FormatToken::QuoteMarker,
                FormatToken::Hour24 { width: 2, pad: 0 },
                FormatToken::ConstantChar(':'),
                FormatToken::Minute,
                FormatToken::ConstantChar(':'),
                FormatToken::Second,
                FormatToken::ConstantChar('.'),
                FormatToken::Fraction { min: 3, max: 3 },
                FormatToken::TimeZoneOffset { letters: 3 },
            ]
        );
    }

    #[test]
    fn round_trips_representative_patterns() {
        for p in [
            "d/MMM/yy h:mm a",
            "??/??/yyyy",
            "EEE, dd MMM yyyy HH:mm:ss z",
            "MMM ppd HH:mm:ss",
            "yyyy-MM-dd HH:mm:ss.S{1,6}",
            "h 'o''clock' a",
            "yyyy年M月d日",
            "kk:mm OOOO",
            "dd.MM.yyyy G",
        ] {
            assert_eq!(tokenize(p).unwrap().render(), p);
        }
    }

    #[test]
    fn fraction_forms_share_canonical_rendering() {
        assert_eq!(tokenize("S{3,3}").unwrap().render(), "SSS");
        assert_eq!(tokens("S{3,3}"), tokens("SSS"));
    }

    #[test]
    fn doubled_quote_is_one_constant() {
        assert_eq!(tokens("''"), vec![FormatToken::ConstantChar('\'')]);
        assert_eq!(
            tokens("'a''b'"),
            vec![
                FormatToken::QuoteMarker,
                FormatToken::ConstantChar('a'),
                FormatToken::ConstantChar('\''),
                FormatToken::ConstantChar('b'),
                FormatToken::QuoteMarker,
            ]
        );
    }

    #[test]
    fn unknown_letters_are_literals() {
        assert_eq!(tokens("yyyyTQ"), vec![FormatToken::Year4, FormatToken::ConstantChar('T'), FormatToken::ConstantChar('Q')]);
    }

    #[test]
    fn pad_marker_attaches_to_following_field() {
        assert_eq!(tokens("ppd"), vec![FormatToken::Day { width: 1, pad: 2 }]);
        assert!(tokenize("ppM").is_err());
        assert!(tokenize("yyyy pp").is_err());
        assert_eq!(tokens("pH"), vec![FormatToken::Hour24 { width: 1, pad: 1 }]);
        for p in ["pppd", "pppppppppppd", "yyyy-MM-dd ppppHH"] {
            assert!(matches!(tokenize(p), Err(Error::MalformedPattern { .. })), "{p}");
        }
    }

    #[test]
    fn rejects_malformed_patterns() {
        for p in ["yyyy-MM-dd'T", "yyy", "EE", "S{3}", "S{4,2}", "MMMMM", "m"] {
            assert!(matches!(tokenize(p), Err(Error::MalformedPattern { .. })), "{p}");
        }
    }

    #[test]
    fn offsets_point_into_pattern() {
        let seq = tokenize("dd/MM/yyyy").unwrap();
        let offsets: Vec<usize> = seq.items().iter().map(|i| i.offset).collect();
        assert_eq!(offsets, vec![0, 2, 3, 5, 6]);
    }
}
