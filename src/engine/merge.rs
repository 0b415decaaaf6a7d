//! Consolidation of the per-sample patterns collected during training.
//!
//! Patterns are visited most frequent first (ties by pattern string, so the
//! outcome never depends on map order) and folded into a running answer one
//! token at a time:
//!
//! ```text
//!   ?/?/yyyy HH:mm:ss   (3)        answer
//! + d/M/yyyy HH:mm:ss   (1)        ?+d -> d, ?+M -> M
//! = d/M/yyyy HH:mm:ss
//! ```
//!
//! Two patterns only merge when they have the same number of tokens and every
//! position is compatible. A candidate that conflicts anywhere (a day where the
//! answer has a month, a different separator) is skipped and the fold goes on.
//! Once every pattern has been visited, unbound fields that remain are settled:
//! a lone unbound field next to a single missing role takes that role, and two
//! unbound fields are assigned according to the resolution mode.

use crate::api::DateResolutionMode;
use crate::catalog::Catalog;
use crate::locale::{FieldOrder, LocaleFacts};
use crate::pattern::{FormatToken, TokenSequence};
use std::collections::BTreeMap;

fn merge_token(a: FormatToken, b: FormatToken) -> Option<FormatToken> {
    use FormatToken::*;
    if a == b {
        return Some(a);
    }
    Some(match (a, b) {
        (Unbound { width: x }, Unbound { width: y }) => Unbound { width: x.min(y) },
        (Unbound { width: x }, Day { width: y, pad }) | (Day { width: y, pad }, Unbound { width: x }) => {
            Day { width: x.min(y), pad }
        }
        (Unbound { width: x }, MonthNumeric { width: y }) | (MonthNumeric { width: y }, Unbound { width: x }) => {
            MonthNumeric { width: x.min(y) }
        }
        (Day { width: x, pad: p }, Day { width: y, pad: q }) => Day { width: x.min(y), pad: p.max(q) },
        (MonthNumeric { width: x }, MonthNumeric { width: y }) => MonthNumeric { width: x.min(y) },
        (MonthAbbr, MonthName) | (MonthName, MonthAbbr) => MonthName,
        (Hour12 { width: x, pad: p }, Hour12 { width: y, pad: q }) => Hour12 { width: x.min(y), pad: p.max(q) },
        (Hour24 { width: x, pad: p }, Hour24 { width: y, pad: q }) => Hour24 { width: x.min(y), pad: p.max(q) },
        (Hour24 { width: x, .. }, Clock24 { width: y }) | (Clock24 { width: y }, Hour24 { width: x, .. }) => {
            Clock24 { width: x.min(y) }
        }
        (Clock24 { width: x }, Clock24 { width: y }) => Clock24 { width: x.min(y) },
        (Fraction { min: a, max: b }, Fraction { min: c, max: d }) => Fraction { min: a.min(c), max: b.max(d) },
        _ => return None,
    })
}

/// Position-wise merge of two token lists of equal length.
fn merge_sequences(answer: &[FormatToken], candidate: &[FormatToken]) -> Option<Vec<FormatToken>> {
    if answer.len() != candidate.len() {
        return None;
    }
    answer.iter().zip(candidate).map(|(a, b)| merge_token(*a, *b)).collect()
}

#[derive(Debug, Default)]
struct Roles {
    day: bool,
    month: bool,
    year: bool,
    unbound: Vec<usize>,
}

fn roles_of(tokens: &[FormatToken]) -> Roles {
    let mut roles = Roles::default();
    for (idx, token) in tokens.iter().enumerate() {
        match token {
            FormatToken::Day { .. } => roles.day = true,
            FormatToken::MonthNumeric { .. } | FormatToken::MonthName | FormatToken::MonthAbbr => roles.month = true,
            FormatToken::Year2 | FormatToken::Year4 => roles.year = true,
            FormatToken::Unbound { .. } => roles.unbound.push(idx),
            _ => {}
        }
    }
    roles
}

/// Settle unbound fields: forced fill first, then the resolution mode.
fn resolve_unbound(tokens: &mut [FormatToken], facts: &LocaleFacts, mode: DateResolutionMode) {
    let roles = roles_of(tokens);
    match roles.unbound.as_slice() {
        [idx] => {
            let FormatToken::Unbound { width } = tokens[*idx] else { return };
            let missing = [(!roles.day, FormatToken::Day { width, pad: 0 }), (!roles.month, FormatToken::MonthNumeric { width })];
            let mut open = missing.iter().filter(|(m, _)| *m).map(|(_, t)| *t);
            match (open.next(), open.next()) {
                (Some(token), None) => tokens[*idx] = token,
                (None, None) if !roles.year && width == 2 => tokens[*idx] = FormatToken::Year2,
                _ => {}
            }
        }
        [first, second] => {
            let order = match mode {
                DateResolutionMode::None => return,
                DateResolutionMode::DayFirst => FieldOrder::DayFirst,
                DateResolutionMode::MonthFirst => FieldOrder::MonthFirst,
                DateResolutionMode::Auto => facts.conventional_order(),
            };
            let width_at = |idx: usize| match tokens[idx] {
                FormatToken::Unbound { width } => width,
                _ => 1,
            };
            let (w1, w2) = (width_at(*first), width_at(*second));
            let day = |width| FormatToken::Day { width, pad: 0 };
            let month = |width| FormatToken::MonthNumeric { width };
            let (a, b) = match order {
                FieldOrder::DayFirst => (day(w1), month(w2)),
                FieldOrder::MonthFirst => (month(w1), day(w2)),
            };
            tokens[*first] = a;
            tokens[*second] = b;
        }
        _ => {}
    }
}

/// Fold every observed pattern into one. `None` when nothing usable was observed.
pub(crate) fn consolidate(
    results: &BTreeMap<String, u64>,
    facts: &LocaleFacts,
    mode: DateResolutionMode,
    catalog: &Catalog,
) -> Option<String> {
    let mut ranked: Vec<(&String, u64)> = results.iter().map(|(p, c)| (p, *c)).collect();
    ranked.sort_by(|(pa, ca), (pb, cb)| cb.cmp(ca).then_with(|| pa.cmp(pb)));

    let mut answer: Option<Vec<FormatToken>> = None;
    for (pattern, count) in ranked {
        let sequence = match catalog.token_sequence(pattern) {
            Ok(sequence) => sequence,
            Err(err) => {
                tracing::debug!(pattern = pattern.as_str(), %err, "skipping malformed pattern");
                continue;
            }
        };
        let tokens: Vec<FormatToken> = sequence.tokens().collect();
        answer = match answer {
            None => Some(tokens),
            Some(current) => match merge_sequences(&current, &tokens) {
                Some(merged) => Some(merged),
                None => {
                    tracing::debug!(pattern = pattern.as_str(), count, "candidate conflicts with running answer; skipped");
                    Some(current)
                }
            },
        };
    }

    let mut tokens = answer?;
    resolve_unbound(&mut tokens, facts, mode);
    Some(TokenSequence::from_tokens(tokens).pattern().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Locale;

    fn run(patterns: &[(&str, u64)], mode: DateResolutionMode) -> Option<String> {
        run_in(patterns, "en-US", mode)
    }

    fn run_in(patterns: &[(&str, u64)], tag: &str, mode: DateResolutionMode) -> Option<String> {
        let results = patterns.iter().map(|(p, c)| (p.to_string(), *c)).collect();
        let facts = LocaleFacts::new(&Locale::parse(tag), false);
        consolidate(&results, &facts, mode, &Catalog::new())
    }

    #[test]
    fn unbound_fields_take_roles_from_other_patterns() {
        let merged = run(&[("?/?/yyyy HH:mm:ss", 3), ("d/M/yyyy HH:mm:ss", 1)], DateResolutionMode::None);
        assert_eq!(merged.as_deref(), Some("d/M/yyyy HH:mm:ss"));
    }

    #[test]
    fn widths_shrink_to_the_narrower_form() {
        assert_eq!(run(&[("dd/MM/yyyy", 5), ("d/M/yyyy", 1)], DateResolutionMode::None).as_deref(), Some("d/M/yyyy"));
        assert_eq!(run(&[("??/??/yyyy", 2), ("?/?/yyyy", 2)], DateResolutionMode::None).as_deref(), Some("?/?/yyyy"));
        assert_eq!(run(&[("dd MMM yyyy", 2), ("dd MMMM yyyy", 1)], DateResolutionMode::None).as_deref(), Some("dd MMMM yyyy"));
    }

    #[test]
    fn time_side_reconciles_independently() {
        let merged = run(&[("yyyy-MM-dd HH:mm", 2), ("yyyy-MM-dd kk:mm", 1)], DateResolutionMode::None);
        assert_eq!(merged.as_deref(), Some("yyyy-MM-dd kk:mm"));
        let merged = run(&[("HH:mm:ss.SSS", 2), ("HH:mm:ss.S", 1)], DateResolutionMode::None);
        assert_eq!(merged.as_deref(), Some("HH:mm:ss.S{1,3}"));
        let merged = run(&[("MMM ppd HH:mm:ss", 2), ("MMM dd HH:mm:ss", 1)], DateResolutionMode::None);
        assert_eq!(merged.as_deref(), Some("MMM ppd HH:mm:ss"));
    }

    #[test]
    fn conflicting_candidates_are_skipped() {
        let merged = run(&[("dd/MM/yyyy", 3), ("MM/dd/yyyy", 2), ("d/MM/yyyy", 1)], DateResolutionMode::None);
        assert_eq!(merged.as_deref(), Some("d/MM/yyyy"));
        let merged = run(&[("yyyy-MM-dd", 2), ("yyyy/MM/dd", 1)], DateResolutionMode::None);
        assert_eq!(merged.as_deref(), Some("yyyy-MM-dd"));
    }

    #[test]
    fn policy_settles_two_unbound_fields() {
        let patterns = [("??/??/yyyy", 1)];
        assert_eq!(run(&patterns, DateResolutionMode::None).as_deref(), Some("??/??/yyyy"));
        assert_eq!(run(&patterns, DateResolutionMode::DayFirst).as_deref(), Some("dd/MM/yyyy"));
        assert_eq!(run(&patterns, DateResolutionMode::MonthFirst).as_deref(), Some("MM/dd/yyyy"));
        assert_eq!(run(&patterns, DateResolutionMode::Auto).as_deref(), Some("MM/dd/yyyy"));
        assert_eq!(run_in(&patterns, "fr-FR", DateResolutionMode::Auto).as_deref(), Some("dd/MM/yyyy"));
    }

    #[test]
    fn lone_unbound_field_is_forced() {
        let tokens = |s: &str| crate::pattern::tokenize(s).map(|t| t.tokens().collect::<Vec<_>>());
        let mut partial = tokens("dd/?/yyyy").unwrap();
        resolve_unbound(&mut partial, &LocaleFacts::new(&Locale::default(), false), DateResolutionMode::None);
        assert_eq!(TokenSequence::from_tokens(partial).pattern(), "dd/M/yyyy");
    }

    #[test]
    fn ranking_is_deterministic() {
        let a = run(&[("dd/MM/yyyy", 1), ("MM/dd/yyyy", 1)], DateResolutionMode::None);
        assert_eq!(a.as_deref(), Some("MM/dd/yyyy"));
        assert_eq!(run(&[], DateResolutionMode::None), None);
    }
}
