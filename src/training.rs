//! Training: accumulate per-sample patterns, then consolidate them.
//!
//! A [`FormatInferrer`] is driven by one caller at a time. To train in
//! parallel, give every worker its own inferrer (same [`Config`]) and fold them
//! together with [`FormatInferrer::merge`] afterwards; the counters and
//! pattern frequencies simply add up, so the order of merges does not matter.
//!
//! ```text
//! train("2/7/2012 06:24:47")   -> ?/?/yyyy HH:mm:ss   results: {?/?/yyyy HH:mm:ss: 1}
//! train("19/7/2012 17:49:53")  -> d/M/yyyy HH:mm:ss   results: {.., d/M/yyyy HH:mm:ss: 1}
//! result()                     -> d/M/yyyy HH:mm:ss
//! ```

use crate::api::{Config, DateResolutionMode};
use crate::catalog::Catalog;
use crate::engine::{Classifier, ClassifyTrace, consolidate};
use crate::error::{Error, MergeError};
use crate::locale::LocaleFacts;
use crate::pattern::ResolvedPattern;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Counters and pattern frequencies collected by [`FormatInferrer::train`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingState {
    pub sample_count: u64,
    pub null_count: u64,
    pub blank_count: u64,
    pub invalid_count: u64,
    /// Pattern string to number of samples it was inferred for.
    pub results: BTreeMap<String, u64>,
}

impl TrainingState {
    fn absorb(&mut self, other: &TrainingState) {
        self.sample_count += other.sample_count;
        self.null_count += other.null_count;
        self.blank_count += other.blank_count;
        self.invalid_count += other.invalid_count;
        for (pattern, count) in &other.results {
            *self.results.entry(pattern.clone()).or_insert(0) += count;
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Document {
    config: Config,
    state: TrainingState,
}

/// Infers one format pattern from a stream of samples.
///
/// # Examples
///
/// ```rust
/// use datesniff::{Config, FormatInferrer};
///
/// let mut inferrer = FormatInferrer::new(Config::default()).unwrap();
/// for sample in ["2/7/2012 06:24:47", "1/7/2012 23:16:14", "19/7/2012 17:49:53"] {
///     inferrer.train(Some(sample));
/// }
/// let result = inferrer.result().unwrap();
/// assert_eq!(result.format_string(), "d/M/yyyy HH:mm:ss");
/// assert!(result.is_valid("25/12/2012 08:00:00"));
/// ```
#[derive(Debug)]
pub struct FormatInferrer {
    config: Config,
    state: TrainingState,
    facts: Arc<LocaleFacts>,
    catalog: Arc<Catalog>,
}

impl FormatInferrer {
    /// New inferrer backed by the process-wide [`Catalog`].
    pub fn new(config: Config) -> Result<Self, Error> {
        Self::with_catalog(config, Catalog::shared())
    }

    /// New inferrer backed by a caller-provided catalog.
    pub fn with_catalog(config: Config, catalog: Arc<Catalog>) -> Result<Self, Error> {
        Self::from_parts(config, TrainingState::default(), catalog)
    }

    fn from_parts(config: Config, state: TrainingState, catalog: Arc<Catalog>) -> Result<Self, Error> {
        let facts = catalog.locale_facts(&config.parsed_locale(), config.no_abbreviation_punctuation);
        if let Some(reason) = facts.unsupported_reason() {
            tracing::debug!(locale = config.locale.as_str(), %reason, "unsupported locale");
            return Err(Error::UnsupportedLocale { tag: config.locale.clone(), reason });
        }
        Ok(FormatInferrer { config, state, facts, catalog })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &TrainingState {
        &self.state
    }

    fn classifier(&self, mode: DateResolutionMode) -> Classifier<'_> {
        Classifier::new(&self.facts, &self.catalog, mode, self.config.lenient)
    }

    /// Record one sample and return the pattern inferred for it.
    ///
    /// `None` input counts as null, whitespace-only input as blank. Surrounding
    /// whitespace is not part of the value. Samples are classified without a
    /// resolution mode so ambiguous fields stay `?` until [`result`](Self::result)
    /// has seen everything.
    pub fn train(&mut self, sample: Option<&str>) -> Option<String> {
        self.state.sample_count += 1;
        let Some(sample) = sample else {
            self.state.null_count += 1;
            return None;
        };
        let sample = sample.trim();
        if sample.is_empty() {
            self.state.blank_count += 1;
            return None;
        }
        if self.config.strict && self.state.invalid_count > 0 {
            return None;
        }

        let Some(pattern) = self.classifier(DateResolutionMode::None).classify(sample) else {
            self.state.invalid_count += 1;
            return None;
        };

        if self.config.strict && !self.matches_current(sample) {
            tracing::debug!(sample, pattern = pattern.as_str(), "strict mode: sample does not fit the running result");
            self.state.invalid_count += 1;
            return None;
        }

        *self.state.results.entry(pattern.clone()).or_insert(0) += 1;
        Some(pattern)
    }

    /// True when nothing has been recorded yet or the running consolidation accepts `sample`.
    fn matches_current(&self, sample: &str) -> bool {
        let Some(current) = consolidate(&self.state.results, &self.facts, DateResolutionMode::None, &self.catalog) else {
            return true;
        };
        self.catalog.resolved(&current, &self.facts, self.config.lenient).is_ok_and(|r| r.is_valid(sample))
    }

    /// The consolidated pattern, or `None` when no sample produced one.
    ///
    /// Strict mode yields `None` once any sample was invalid. With a resolution
    /// mode other than [`DateResolutionMode::None`], a result that still has `?`
    /// fields is not an answer either.
    pub fn result(&self) -> Option<Arc<ResolvedPattern>> {
        if self.state.results.is_empty() || (self.config.strict && self.state.invalid_count > 0) {
            return None;
        }
        let mode = self.config.resolution_mode;
        let pattern = consolidate(&self.state.results, &self.facts, mode, &self.catalog)?;
        let resolved = match self.catalog.resolved(&pattern, &self.facts, self.config.lenient) {
            Ok(resolved) => resolved,
            Err(err) => {
                tracing::debug!(pattern = pattern.as_str(), %err, "consolidated pattern does not tokenize");
                return None;
            }
        };
        if resolved.is_date_unbound() && mode != DateResolutionMode::None {
            return None;
        }
        Some(resolved)
    }

    /// Classify `input` with this inferrer's config, without recording anything.
    pub fn determine_format_string(&self, input: &str) -> Option<String> {
        self.classifier(self.config.resolution_mode).classify(input.trim())
    }

    /// Like [`determine_format_string`](Self::determine_format_string), with a per-pass trace.
    pub fn classify_verbose(&self, input: &str) -> ClassifyTrace {
        self.classifier(self.config.resolution_mode).classify_verbose(input.trim())
    }

    /// Add `other`'s counters and pattern frequencies to this inferrer.
    pub fn merge(&mut self, other: &FormatInferrer) -> Result<(), MergeError> {
        if std::ptr::eq(self, other) {
            return Err(MergeError::SelfMerge);
        }
        if self.config != other.config {
            return Err(MergeError::ConfigMismatch { left: config_summary(&self.config), right: config_summary(&other.config) });
        }
        self.state.absorb(&other.state);
        Ok(())
    }

    /// A new inferrer holding the sum of `a` and `b`.
    pub fn merged(a: &FormatInferrer, b: &FormatInferrer) -> Result<FormatInferrer, MergeError> {
        if std::ptr::eq(a, b) {
            return Err(MergeError::SelfMerge);
        }
        let mut out = FormatInferrer {
            config: a.config.clone(),
            state: a.state.clone(),
            facts: Arc::clone(&a.facts),
            catalog: Arc::clone(&a.catalog),
        };
        out.merge(b)?;
        Ok(out)
    }

    /// JSON document with the config and the training state.
    pub fn serialize(&self) -> Result<String, Error> {
        let doc = Document { config: self.config.clone(), state: self.state.clone() };
        Ok(serde_json::to_string(&doc)?)
    }

    /// Rebuild an inferrer from [`serialize`](Self::serialize) output.
    pub fn deserialize(json: &str) -> Result<Self, Error> {
        let doc: Document = serde_json::from_str(json)?;
        Self::from_parts(doc.config, doc.state, Catalog::shared())
    }
}

fn config_summary(config: &Config) -> String {
    format!(
        "{}/{:?}/strict={}/lenient={}/nap={}",
        config.locale, config.resolution_mode, config.strict, config.lenient, config.no_abbreviation_punctuation
    )
}
