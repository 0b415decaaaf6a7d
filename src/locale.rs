//! Locale facts: month/weekday/AM-PM vocabularies and the regex fragments derived
//! from them.
//!
//! A [`LocaleFacts`] is built once per `(locale, abbreviation-punctuation mode)`
//! pair and never mutated afterwards; [`Catalog`](crate::Catalog) keeps them
//! cached for the life of the process.
//!
//! Construction never fails. A locale that uses a non-Gregorian calendar or
//! non-Arabic digits yields facts marked unsupported, and callers are expected
//! to check [`LocaleFacts::is_supported`] before training. A supported language
//! without a vocabulary table gets numeric-only facts: every word list is
//! empty, so only numeric and CJK-marker layouts classify.
//!
//! ## Vocabulary matching
//!
//! Every vocabulary list is stored case-folded and ordered longest-first, so a
//! prefix scan prefers `"june"` over `"jun"` and `"sept."` over `"sep"`.
//! When every entry is purely alphabetic the compressor can take a whole letter
//! run and look it up directly ([`LocaleFacts::lookup_word`]); otherwise it has
//! to try the candidates one by one at each position ([`LocaleFacts::match_vocabulary`]).

use crate::error::UnsupportedReason;
use std::fmt;

/// A parsed BCP-47-ish locale tag (`en-US`, `fr_CA`, `th-TH-u-ca-buddhist`).
///
/// Only the pieces the engine cares about are kept: language, region and the
/// `ca` (calendar) / `nu` (numbering system) unicode extensions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    language: String,
    region: Option<String>,
    calendar: Option<String>,
    numbering: Option<String>,
}

impl Locale {
    /// Parse a locale tag. Unknown subtags are ignored.
    pub fn parse(tag: &str) -> Locale {
        let mut parts = tag.trim().split(['-', '_']).filter(|p| !p.is_empty());
        let language = parts.next().unwrap_or("und").to_ascii_lowercase();
        let mut region = None;
        let mut calendar = None;
        let mut numbering = None;

        let mut in_extension = false;
        let mut pending_key: Option<String> = None;
        for part in parts {
            if in_extension {
                let lower = part.to_ascii_lowercase();
                match pending_key.take() {
                    Some(key) if key == "ca" => calendar = Some(lower),
                    Some(key) if key == "nu" => numbering = Some(lower),
                    Some(_) => {}
                    None => pending_key = Some(lower),
                }
                continue;
            }
            if part.eq_ignore_ascii_case("u") {
                in_extension = true;
                continue;
            }
            let is_region = (part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()))
                || (part.len() == 3 && part.chars().all(|c| c.is_ascii_digit()));
            if is_region && region.is_none() {
                region = Some(part.to_ascii_uppercase());
            }
        }

        Locale { language, region, calendar, numbering }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Canonical tag, e.g. `en-US` or `th-TH-u-ca-buddhist`.
    pub fn tag(&self) -> String {
        self.to_string()
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::parse("en-US")
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)?;
        if let Some(region) = &self.region {
            write!(f, "-{region}")?;
        }
        if self.calendar.is_some() || self.numbering.is_some() {
            f.write_str("-u")?;
            if let Some(ca) = &self.calendar {
                write!(f, "-ca-{ca}")?;
            }
            if let Some(nu) = &self.numbering {
                write!(f, "-nu-{nu}")?;
            }
        }
        Ok(())
    }
}

/// Conventional order of day and month when both are numeric and ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldOrder {
    DayFirst,
    MonthFirst,
}

/// A recognized vocabulary word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Word {
    Month(u8),
    ShortMonth(u8),
    Weekday,
    ShortWeekday,
    AmPm,
}

struct Vocabulary {
    months: [&'static str; 12],
    short_months: [&'static str; 12],
    weekdays: [&'static str; 7],
    short_weekdays: [&'static str; 7],
    am_pm: [&'static str; 2],
}

const EN: Vocabulary = Vocabulary {
    months: [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ],
    short_months: ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"],
    weekdays: ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"],
    short_weekdays: ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
    am_pm: ["AM", "PM"],
};

// Canadian English abbreviates with a trailing period.
const EN_CA: Vocabulary = Vocabulary {
    short_months: ["Jan.", "Feb.", "Mar.", "Apr.", "May", "Jun.", "Jul.", "Aug.", "Sep.", "Oct.", "Nov.", "Dec."],
    am_pm: ["a.m.", "p.m."],
    ..EN
};

const EN_AU: Vocabulary = Vocabulary {
    short_months: ["Jan.", "Feb.", "Mar.", "Apr.", "May", "June", "July", "Aug.", "Sept.", "Oct.", "Nov.", "Dec."],
    am_pm: ["am", "pm"],
    ..EN
};

const FR: Vocabulary = Vocabulary {
    months: [
        "janvier",
        "février",
        "mars",
        "avril",
        "mai",
        "juin",
        "juillet",
        "août",
        "septembre",
        "octobre",
        "novembre",
        "décembre",
    ],
    short_months: ["janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.", "déc."],
    weekdays: ["lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche"],
    short_weekdays: ["lun.", "mar.", "mer.", "jeu.", "ven.", "sam.", "dim."],
    am_pm: ["AM", "PM"],
};

const DE: Vocabulary = Vocabulary {
    months: [
        "Januar",
        "Februar",
        "März",
        "April",
        "Mai",
        "Juni",
        "Juli",
        "August",
        "September",
        "Oktober",
        "November",
        "Dezember",
    ],
    short_months: ["Jan.", "Feb.", "März", "Apr.", "Mai", "Juni", "Juli", "Aug.", "Sept.", "Okt.", "Nov.", "Dez."],
    weekdays: ["Montag", "Dienstag", "Mittwoch", "Donnerstag", "Freitag", "Samstag", "Sonntag"],
    short_weekdays: ["Mo.", "Di.", "Mi.", "Do.", "Fr.", "Sa.", "So."],
    am_pm: ["AM", "PM"],
};

const ES: Vocabulary = Vocabulary {
    months: [
        "enero",
        "febrero",
        "marzo",
        "abril",
        "mayo",
        "junio",
        "julio",
        "agosto",
        "septiembre",
        "octubre",
        "noviembre",
        "diciembre",
    ],
    short_months: ["ene.", "feb.", "mar.", "abr.", "may.", "jun.", "jul.", "ago.", "sept.", "oct.", "nov.", "dic."],
    weekdays: ["lunes", "martes", "miércoles", "jueves", "viernes", "sábado", "domingo"],
    short_weekdays: ["lun.", "mar.", "mié.", "jue.", "vie.", "sáb.", "dom."],
    am_pm: ["a. m.", "p. m."],
};

const IT: Vocabulary = Vocabulary {
    months: [
        "gennaio",
        "febbraio",
        "marzo",
        "aprile",
        "maggio",
        "giugno",
        "luglio",
        "agosto",
        "settembre",
        "ottobre",
        "novembre",
        "dicembre",
    ],
    short_months: ["gen", "feb", "mar", "apr", "mag", "giu", "lug", "ago", "set", "ott", "nov", "dic"],
    weekdays: ["lunedì", "martedì", "mercoledì", "giovedì", "venerdì", "sabato", "domenica"],
    short_weekdays: ["lun", "mar", "mer", "gio", "ven", "sab", "dom"],
    am_pm: ["AM", "PM"],
};

const PT: Vocabulary = Vocabulary {
    months: [
        "janeiro",
        "fevereiro",
        "março",
        "abril",
        "maio",
        "junho",
        "julho",
        "agosto",
        "setembro",
        "outubro",
        "novembro",
        "dezembro",
    ],
    short_months: ["jan.", "fev.", "mar.", "abr.", "mai.", "jun.", "jul.", "ago.", "set.", "out.", "nov.", "dez."],
    weekdays: ["segunda-feira", "terça-feira", "quarta-feira", "quinta-feira", "sexta-feira", "sábado", "domingo"],
    short_weekdays: ["seg.", "ter.", "qua.", "qui.", "sex.", "sáb.", "dom."],
    am_pm: ["AM", "PM"],
};

const NL: Vocabulary = Vocabulary {
    months: [
        "januari",
        "februari",
        "maart",
        "april",
        "mei",
        "juni",
        "juli",
        "augustus",
        "september",
        "oktober",
        "november",
        "december",
    ],
    short_months: ["jan.", "feb.", "mrt.", "apr.", "mei", "jun.", "jul.", "aug.", "sep.", "okt.", "nov.", "dec."],
    weekdays: ["maandag", "dinsdag", "woensdag", "donderdag", "vrijdag", "zaterdag", "zondag"],
    short_weekdays: ["ma", "di", "wo", "do", "vr", "za", "zo"],
    am_pm: ["a.m.", "p.m."],
};

// Month "words" are the numeral plus the month marker; the compressor reads
// them as digits and a literal, so they only matter when parsing MMM/MMMM.
const ZH: Vocabulary = Vocabulary {
    months: ["1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月", "12月"],
    short_months: ["1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月", "12月"],
    weekdays: ["星期一", "星期二", "星期三", "星期四", "星期五", "星期六", "星期日"],
    short_weekdays: ["周一", "周二", "周三", "周四", "周五", "周六", "周日"],
    am_pm: ["上午", "下午"],
};

const JA: Vocabulary = Vocabulary {
    weekdays: ["月曜日", "火曜日", "水曜日", "木曜日", "金曜日", "土曜日", "日曜日"],
    short_weekdays: ["月", "火", "水", "木", "金", "土", "日"],
    am_pm: ["午前", "午後"],
    ..ZH
};

const KO: Vocabulary = Vocabulary {
    months: ["1월", "2월", "3월", "4월", "5월", "6월", "7월", "8월", "9월", "10월", "11월", "12월"],
    short_months: ["1월", "2월", "3월", "4월", "5월", "6월", "7월", "8월", "9월", "10월", "11월", "12월"],
    weekdays: ["월요일", "화요일", "수요일", "목요일", "금요일", "토요일", "일요일"],
    short_weekdays: ["월", "화", "수", "목", "금", "토", "일"],
    am_pm: ["오전", "오후"],
};

fn vocabulary_for(locale: &Locale) -> Option<&'static Vocabulary> {
    match (locale.language(), locale.region()) {
        ("en", Some("CA")) => Some(&EN_CA),
        ("en", Some("AU")) => Some(&EN_AU),
        ("en", _) => Some(&EN),
        ("fr", _) => Some(&FR),
        ("de", _) => Some(&DE),
        ("es", _) => Some(&ES),
        ("it", _) => Some(&IT),
        ("pt", _) => Some(&PT),
        ("nl", _) => Some(&NL),
        ("zh", _) => Some(&ZH),
        ("ja", _) => Some(&JA),
        ("ko", _) => Some(&KO),
        _ => None,
    }
}

fn unsupported_reason(locale: &Locale) -> Option<UnsupportedReason> {
    if let Some(ca) = locale.calendar.as_deref() {
        if ca != "gregory" && ca != "gregorian" && ca != "iso8601" {
            return Some(UnsupportedReason::NonGregorianCalendar);
        }
    } else if matches!(locale.language(), "th" | "fa") {
        return Some(UnsupportedReason::NonGregorianCalendar);
    }

    if let Some(nu) = locale.numbering.as_deref() {
        if nu != "latn" {
            return Some(UnsupportedReason::NonArabicDigits);
        }
    } else {
        let native_digits = match locale.language() {
            "ar" => !matches!(locale.region(), Some("MA" | "DZ" | "TN" | "LY" | "EH")),
            "bn" | "mr" | "ne" | "my" | "ps" => true,
            _ => false,
        };
        if native_digits {
            return Some(UnsupportedReason::NonArabicDigits);
        }
    }

    None
}

fn conventional_order(locale: &Locale) -> FieldOrder {
    match (locale.language(), locale.region()) {
        ("en", None | Some("US" | "PH" | "CA" | "AS" | "GU" | "MP" | "PR" | "UM" | "VI")) => FieldOrder::MonthFirst,
        _ => FieldOrder::DayFirst,
    }
}

/// Length-ordered, case-folded vocabulary plus its derived regex fragment.
#[derive(Debug, Clone)]
struct WordList {
    /// `(folded word, value)` sorted longest-first.
    entries: Vec<(String, u8)>,
    regex: String,
    usable: bool,
}

impl WordList {
    /// No words. The regex fragment never matches.
    fn empty() -> WordList {
        WordList { entries: Vec::new(), regex: r"\b\B".to_string(), usable: false }
    }

    fn build<'a>(words: impl IntoIterator<Item = (&'a str, u8)>, strip_period: bool) -> WordList {
        let mut entries: Vec<(String, u8)> = words
            .into_iter()
            .map(|(w, v)| {
                let w = if strip_period { w.strip_suffix('.').unwrap_or(w) } else { w };
                (w.to_lowercase(), v)
            })
            .collect();

        // Stripping periods is only safe if it leaves a fixed-width abbreviation set.
        let usable = !strip_period || {
            let first = entries.first().map(|(w, _)| w.chars().count());
            entries.iter().all(|(w, _)| Some(w.chars().count()) == first)
        };

        entries.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()).then_with(|| a.0.cmp(&b.0)));
        entries.dedup_by(|a, b| a.0 == b.0);

        let alternatives: Vec<String> = entries.iter().map(|(w, _)| regex::escape(w)).collect();
        let regex = format!("(?i:{})", alternatives.join("|"));

        WordList { entries, regex, usable }
    }

    fn lookup(&self, folded: &str) -> Option<u8> {
        if !self.usable {
            return None;
        }
        self.entries.iter().find(|(w, _)| w == folded).map(|(_, v)| *v)
    }

    fn match_prefix(&self, input: &str) -> Option<(u8, usize)> {
        if !self.usable {
            return None;
        }
        self.entries.iter().find_map(|(w, v)| folded_prefix_len(input, w).map(|len| (*v, len)))
    }

    fn is_alphabetic(&self) -> bool {
        self.entries.iter().all(|(w, _)| w.chars().all(char::is_alphabetic))
    }
}

/// Byte length of the prefix of `input` that case-folds to `folded`, if any.
pub(crate) fn folded_prefix_len(input: &str, folded: &str) -> Option<usize> {
    let mut want = folded.chars().peekable();
    for (idx, c) in input.char_indices() {
        if want.peek().is_none() {
            return Some(idx);
        }
        for lc in c.to_lowercase() {
            if want.next() != Some(lc) {
                return None;
            }
        }
    }
    if want.peek().is_none() { Some(input.len()) } else { None }
}

/// Immutable per-locale vocabulary tables.
#[derive(Debug, Clone)]
pub struct LocaleFacts {
    locale: Locale,
    no_abbreviation_punctuation: bool,
    unsupported: Option<UnsupportedReason>,
    order: FieldOrder,
    months: WordList,
    short_months: WordList,
    weekdays: WordList,
    short_weekdays: WordList,
    am_pm: WordList,
    all_alphabetic: bool,
}

impl LocaleFacts {
    /// Build facts for `locale`. Prefer [`Catalog::locale_facts`](crate::Catalog::locale_facts),
    /// which memoizes the result.
    pub fn new(locale: &Locale, no_abbreviation_punctuation: bool) -> LocaleFacts {
        let unsupported = unsupported_reason(locale);
        let order = conventional_order(locale);

        if let Some(reason) = unsupported {
            tracing::debug!(locale = %locale, %reason, "locale facts unsupported");
            return LocaleFacts::numeric_only(locale, no_abbreviation_punctuation, unsupported, order);
        }
        let Some(vocab) = vocabulary_for(locale) else {
            tracing::debug!(locale = %locale, "no vocabulary table, numeric fields only");
            return LocaleFacts::numeric_only(locale, no_abbreviation_punctuation, None, order);
        };

        let numbered = |words: &'static [&'static str]| words.iter().copied().zip(1u8..);
        let months = WordList::build(numbered(&vocab.months), false);
        let short_months = WordList::build(numbered(&vocab.short_months), no_abbreviation_punctuation);
        let weekdays = WordList::build(numbered(&vocab.weekdays), false);
        let short_weekdays = WordList::build(numbered(&vocab.short_weekdays), no_abbreviation_punctuation);
        let am_pm = WordList::build(numbered(&vocab.am_pm), false);

        let all_alphabetic = [&months, &short_months, &weekdays, &short_weekdays, &am_pm]
            .iter()
            .all(|list| !list.usable || list.is_alphabetic());

        if !short_months.usable {
            tracing::debug!(locale = %locale, "abbreviated month names disabled, preferring long forms");
        }

        LocaleFacts {
            locale: locale.clone(),
            no_abbreviation_punctuation,
            unsupported,
            order,
            months,
            short_months,
            weekdays,
            short_weekdays,
            am_pm,
            all_alphabetic,
        }
    }

    fn numeric_only(
        locale: &Locale,
        no_abbreviation_punctuation: bool,
        unsupported: Option<UnsupportedReason>,
        order: FieldOrder,
    ) -> LocaleFacts {
        LocaleFacts {
            locale: locale.clone(),
            no_abbreviation_punctuation,
            unsupported,
            order,
            months: WordList::empty(),
            short_months: WordList::empty(),
            weekdays: WordList::empty(),
            short_weekdays: WordList::empty(),
            am_pm: WordList::empty(),
            all_alphabetic: false,
        }
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn no_abbreviation_punctuation(&self) -> bool {
        self.no_abbreviation_punctuation
    }

    pub fn is_supported(&self) -> bool {
        self.unsupported.is_none()
    }

    pub fn unsupported_reason(&self) -> Option<UnsupportedReason> {
        self.unsupported
    }

    pub fn conventional_order(&self) -> FieldOrder {
        self.order
    }

    /// True when every vocabulary entry is purely alphabetic, which lets callers
    /// scan whole letter runs instead of trying each candidate.
    pub fn all_alphabetic(&self) -> bool {
        self.all_alphabetic
    }

    pub fn short_months_usable(&self) -> bool {
        self.short_months.usable
    }

    pub fn short_weekdays_usable(&self) -> bool {
        self.short_weekdays.usable
    }

    /// Exact lookup of a complete word. Long forms win over short forms.
    pub fn lookup_word(&self, word: &str) -> Option<Word> {
        let folded = word.to_lowercase();
        if let Some(m) = self.months.lookup(&folded) {
            return Some(Word::Month(m));
        }
        if let Some(m) = self.short_months.lookup(&folded) {
            return Some(Word::ShortMonth(m));
        }
        if self.weekdays.lookup(&folded).is_some() {
            return Some(Word::Weekday);
        }
        if self.short_weekdays.lookup(&folded).is_some() {
            return Some(Word::ShortWeekday);
        }
        if self.am_pm.lookup(&folded).is_some() {
            return Some(Word::AmPm);
        }
        None
    }

    /// Longest vocabulary word at the start of `input`, with its byte length.
    pub fn match_vocabulary(&self, input: &str) -> Option<(Word, usize)> {
        let candidates = [
            self.months.match_prefix(input).map(|(m, len)| (Word::Month(m), len)),
            self.short_months.match_prefix(input).map(|(m, len)| (Word::ShortMonth(m), len)),
            self.weekdays.match_prefix(input).map(|(_, len)| (Word::Weekday, len)),
            self.short_weekdays.match_prefix(input).map(|(_, len)| (Word::ShortWeekday, len)),
            self.am_pm.match_prefix(input).map(|(_, len)| (Word::AmPm, len)),
        ];
        // Earlier entries win ties, so a full month name beats an equal-length abbreviation.
        candidates.into_iter().flatten().fold(None, |best: Option<(Word, usize)>, cand| match best {
            Some(b) if b.1 >= cand.1 => Some(b),
            _ => Some(cand),
        })
    }

    pub fn match_month(&self, input: &str) -> Option<(u8, usize)> {
        self.months.match_prefix(input)
    }

    pub fn match_short_month(&self, input: &str) -> Option<(u8, usize)> {
        self.short_months.match_prefix(input)
    }

    pub fn match_weekday(&self, input: &str) -> Option<usize> {
        self.weekdays.match_prefix(input).map(|(_, len)| len)
    }

    pub fn match_short_weekday(&self, input: &str) -> Option<usize> {
        self.short_weekdays.match_prefix(input).map(|(_, len)| len)
    }

    pub fn match_am_pm(&self, input: &str) -> Option<usize> {
        self.am_pm.match_prefix(input).map(|(_, len)| len)
    }

    /// Like [`match_am_pm`](Self::match_am_pm), also reporting whether the marker is the afternoon one.
    pub fn match_meridiem(&self, input: &str) -> Option<(bool, usize)> {
        self.am_pm.match_prefix(input).map(|(v, len)| (v == 2, len))
    }

    pub fn month_regex(&self) -> &str {
        &self.months.regex
    }

    pub fn short_month_regex(&self) -> &str {
        &self.short_months.regex
    }

    pub fn weekday_regex(&self) -> &str {
        &self.weekdays.regex
    }

    pub fn short_weekday_regex(&self) -> &str {
        &self.short_weekdays.regex
    }

    pub fn am_pm_regex(&self) -> &str {
        &self.am_pm.regex
    }
}
