use crate::catalog::Catalog;
use crate::engine::Classifier;
use crate::locale::Locale;
use serde::{Deserialize, Serialize};

/// How to settle day and month when every sample leaves them ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DateResolutionMode {
    /// Leave ambiguous fields as `?` placeholders.
    #[default]
    None,
    DayFirst,
    MonthFirst,
    /// Use the locale's conventional order.
    Auto,
}

/// Training configuration.
///
/// Two training states can only be merged when their configs are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub resolution_mode: DateResolutionMode,
    /// Locale tag, e.g. `en-US`.
    pub locale: String,
    /// Stop accepting samples after the first invalid one, and re-validate
    /// every classified sample against the running result.
    pub strict: bool,
    /// Accept an all-zero date (`0000-00-00`) as a valid sample.
    pub lenient: bool,
    /// Match abbreviations without their trailing period (`AUG` for `Aug.`).
    pub no_abbreviation_punctuation: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resolution_mode: DateResolutionMode::None,
            locale: "en-US".to_string(),
            strict: false,
            lenient: true,
            no_abbreviation_punctuation: false,
        }
    }
}

impl Config {
    pub fn resolution_mode(mut self, mode: DateResolutionMode) -> Self {
        self.resolution_mode = mode;
        self
    }

    pub fn locale(mut self, tag: impl Into<String>) -> Self {
        self.locale = tag.into();
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    pub fn no_abbreviation_punctuation(mut self, enabled: bool) -> Self {
        self.no_abbreviation_punctuation = enabled;
        self
    }

    pub(crate) fn parsed_locale(&self) -> Locale {
        Locale::parse(&self.locale)
    }
}

/// Classify a single sample with the default `en-US` locale.
///
/// This is the stateless counterpart of [`FormatInferrer::train`](crate::FormatInferrer::train):
/// nothing is recorded, and `mode` settles ambiguous day/month fields directly.
///
/// # Examples
///
/// ```rust
/// use datesniff::{DateResolutionMode, determine_format_string};
///
/// assert_eq!(determine_format_string("2012-07-02", DateResolutionMode::None).as_deref(), Some("yyyy-MM-dd"));
/// assert_eq!(determine_format_string("02/07/2012", DateResolutionMode::DayFirst).as_deref(), Some("dd/MM/yyyy"));
/// assert_eq!(determine_format_string("hello", DateResolutionMode::None), None);
/// ```
pub fn determine_format_string(input: &str, mode: DateResolutionMode) -> Option<String> {
    determine_format_string_with(input, &Config::default().resolution_mode(mode))
}

/// Classify a single sample under an explicit config.
pub fn determine_format_string_with(input: &str, config: &Config) -> Option<String> {
    let catalog = Catalog::shared();
    let facts = catalog.locale_facts(&config.parsed_locale(), config.no_abbreviation_punctuation);
    if !facts.is_supported() {
        tracing::debug!(locale = config.locale.as_str(), "unsupported locale");
        return None;
    }
    Classifier::new(&facts, &catalog, config.resolution_mode, config.lenient).classify(input.trim())
}
