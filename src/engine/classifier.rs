//! Single-sample classification: three passes, first validated answer wins.
//!
//! ```text
//! input ── fast reject ── Shape::compress ──┬─ known_shapes::lookup   (pass one)
//!                                           ├─ scanner::scan          (pass two, numeric only)
//!                                           └─ elimination::eliminate (pass three)
//!                                                      │
//!                                  Catalog::resolved + is_valid(input)
//! ```
//!
//! A pass may propose a pattern that turns out not to parse the sample (a
//! 31st of February, a known shape with an out-of-range hour). Such candidates
//! are dropped and the next pass gets its turn.

use super::elimination;
use super::known_shapes;
use super::metrics::{ClassifyTrace, Pass, PassMetrics};
use super::scanner;
use super::shape::{Shape, ShapeFlags};
use crate::api::DateResolutionMode;
use crate::catalog::Catalog;
use crate::locale::{FieldOrder, LocaleFacts};
use crate::pattern::DateRole;
use std::sync::Arc;
use std::time::Instant;

const MIN_LENGTH: usize = 4;
const MAX_LENGTH: usize = 70;

/// Pattern letters for a numeric date field of `width` digits.
pub(crate) fn numeric_letters(role: DateRole, width: u8) -> Option<&'static str> {
    Some(match (role, width) {
        (DateRole::Day, 1) => "d",
        (DateRole::Day, 2) => "dd",
        (DateRole::Month, 1) => "M",
        (DateRole::Month, 2) => "MM",
        (DateRole::Unbound, 1) => "?",
        (DateRole::Unbound, 2) => "??",
        (DateRole::Year, 4) => "yyyy",
        (DateRole::Year, 2) => "yy",
        _ => return None,
    })
}

/// Roles of two numeric fields that precede the year.
///
/// A value above 12 can only be a day. When both could be either, `mode`
/// decides, and [`DateResolutionMode::None`] leaves both unbound.
pub(crate) fn order_day_month(a: u32, b: u32, facts: &LocaleFacts, mode: DateResolutionMode) -> Option<(DateRole, DateRole)> {
    if a == 0 || b == 0 || a > 31 || b > 31 || (a > 12 && b > 12) {
        return None;
    }
    if a > 12 {
        return Some((DateRole::Day, DateRole::Month));
    }
    if b > 12 {
        return Some((DateRole::Month, DateRole::Day));
    }
    let day_first = (DateRole::Day, DateRole::Month);
    let month_first = (DateRole::Month, DateRole::Day);
    Some(match mode {
        DateResolutionMode::None => (DateRole::Unbound, DateRole::Unbound),
        DateResolutionMode::DayFirst => day_first,
        DateResolutionMode::MonthFirst => month_first,
        DateResolutionMode::Auto => match facts.conventional_order() {
            FieldOrder::DayFirst => day_first,
            FieldOrder::MonthFirst => month_first,
        },
    })
}

/// Roles of the two fields after a leading year. Month-then-day unless the
/// month position holds something that cannot be a month.
pub(crate) fn order_after_year(b: u32, c: u32) -> Option<(DateRole, DateRole)> {
    if b == 0 || c == 0 || b > 31 || c > 31 || (b > 12 && c > 12) {
        return None;
    }
    if b > 12 {
        return Some((DateRole::Day, DateRole::Month));
    }
    Some((DateRole::Month, DateRole::Day))
}

/// Classifies individual samples against one locale.
pub(crate) struct Classifier<'a> {
    facts: &'a Arc<LocaleFacts>,
    catalog: &'a Catalog,
    mode: DateResolutionMode,
    lenient: bool,
}

impl<'a> Classifier<'a> {
    pub(crate) fn new(facts: &'a Arc<LocaleFacts>, catalog: &'a Catalog, mode: DateResolutionMode, lenient: bool) -> Self {
        Classifier { facts, catalog, mode, lenient }
    }

    /// Pattern for `input`, or `None` when no pass produced one that parses it.
    pub(crate) fn classify(&self, input: &str) -> Option<String> {
        self.run(input, None)
    }

    /// Like [`classify`](Self::classify), recording what every pass did.
    pub(crate) fn classify_verbose(&self, input: &str) -> ClassifyTrace {
        let mut trace = ClassifyTrace { input: input.to_string(), ..ClassifyTrace::default() };
        let start = Instant::now();
        let pattern = self.run(input, Some(&mut trace));
        trace.pattern = pattern;
        trace.total = start.elapsed();
        trace
    }

    fn run(&self, input: &str, mut trace: Option<&mut ClassifyTrace>) -> Option<String> {
        let length = input.chars().count();
        let leading_ok = input.chars().next().is_some_and(char::is_alphanumeric);
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) || !leading_ok {
            tracing::trace!(input, length, "rejected before compression");
            if let Some(t) = trace.as_deref_mut() {
                t.rejected_early = true;
            }
            return None;
        }

        let shape = Shape::compress(input, self.facts);
        if let Some(t) = trace.as_deref_mut() {
            t.shape = shape.render();
            t.flags = shape.flags;
        }

        let flags = shape.flags;
        let numeric_only =
            !flags.intersects(ShapeFlags::MONTHISH | ShapeFlags::WEEKDAYISH | ShapeFlags::HAS_ALPHA | ShapeFlags::HAS_CJK);
        let eliminable = flags.contains(ShapeFlags::HAS_DIGITS) && !flags.contains(ShapeFlags::HAS_ALPHA);

        let passes: [(Pass, bool); 3] = [(Pass::KnownShape, true), (Pass::Scanner, numeric_only), (Pass::Elimination, eliminable)];
        for (pass, enabled) in passes {
            if !enabled {
                continue;
            }
            let started = Instant::now();
            let candidate = match pass {
                Pass::KnownShape => known_shapes::lookup(&shape.elems()).map(str::to_string),
                Pass::Scanner => scanner::scan(input, self.facts, self.mode),
                Pass::Elimination => elimination::eliminate(input, &shape, self.facts, self.mode),
            };
            let hit = candidate.as_deref().is_some_and(|pattern| self.accepts(pattern, input));
            tracing::trace!(%pass, input, candidate = candidate.as_deref(), hit, "pass finished");

            if let Some(t) = trace.as_deref_mut() {
                t.passes.push(PassMetrics { pass, duration: started.elapsed(), candidate: candidate.clone(), hit });
                if hit {
                    t.winner = Some(pass);
                }
            }
            if hit {
                return candidate;
            }
        }

        tracing::debug!(input, shape = %shape.render(), "no pass produced a valid pattern");
        None
    }

    fn accepts(&self, pattern: &str, input: &str) -> bool {
        match self.catalog.resolved(pattern, self.facts, self.lenient) {
            Ok(resolved) => resolved.is_valid(input),
            Err(err) => {
                tracing::debug!(pattern, %err, "candidate pattern is malformed");
                false
            }
        }
    }
}
