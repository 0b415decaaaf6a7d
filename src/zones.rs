//! Time-zone names.
//!
//! The engine recognizes two shapes of named zone: a fixed list of common
//! abbreviations and IANA-style `Region/City` identifiers.

/// Abbreviations accepted as a named zone (`z`), longest first.
pub const ZONE_ABBREVIATIONS: &[&str] = &[
    "ACST", "AEDT", "AEST", "AKDT", "AKST", "AWST", "CEST", "EEST", "NZDT", "NZST", "WEST", "BST", "CAT", "CDT", "CET",
    "CST", "EAT", "EDT", "EET", "EST", "GMT", "HKT", "HST", "IST", "JST", "KST", "MDT", "MSK", "MST", "PDT", "PST",
    "SGT", "UTC", "WAT", "WET", "UT",
];

/// Byte length of a zone name at the start of `input`, if there is one.
///
/// Abbreviations must be followed by a non-letter so that `"UTCX"` is rejected.
pub fn match_zone_name(input: &str) -> Option<usize> {
    if let Some(len) = match_region_city(input) {
        return Some(len);
    }
    ZONE_ABBREVIATIONS.iter().find_map(|abbr| {
        let rest = input.strip_prefix(abbr)?;
        if rest.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) { None } else { Some(abbr.len()) }
    })
}

/// `Region/City[/Sub]` with ASCII letters and underscores, e.g. `America/New_York`.
fn match_region_city(input: &str) -> Option<usize> {
    regex!(r"^[A-Z][A-Za-z_]+(?:/[A-Za-z_]+)+").find(input).map(|m| m.end())
}

/// Regex fragment accepting everything [`match_zone_name`] accepts.
pub fn zone_name_regex() -> String {
    format!("(?:{}|[A-Z][A-Za-z_]+(?:/[A-Za-z_]+)+)", ZONE_ABBREVIATIONS.join("|"))
}
