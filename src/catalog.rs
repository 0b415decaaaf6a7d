//! Shared, concurrent caches of locale facts, token sequences and resolved patterns.
//!
//! Every entry is immutable once inserted and handed out behind an `Arc`, so
//! concurrent readers never block each other for long. Two threads racing to
//! build the same entry may both do the work; the first insert wins and both
//! get the same `Arc` back.
//!
//! Most callers use [`Catalog::shared`]. Tests and embedders that want
//! isolation build their own with [`Catalog::new`].

use crate::error::Error;
use crate::locale::{Locale, LocaleFacts};
use crate::pattern::{ResolvedPattern, TokenSequence, tokenize};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::sync::Arc;

static SHARED: Lazy<Arc<Catalog>> = Lazy::new(|| Arc::new(Catalog::new()));

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ResolvedKey {
    pattern: String,
    locale: Locale,
    no_abbreviation_punctuation: bool,
    lenient: bool,
}

/// Process-wide memo tables.
#[derive(Debug, Default)]
pub struct Catalog {
    locales: DashMap<(Locale, bool), Arc<LocaleFacts>>,
    sequences: DashMap<String, Arc<TokenSequence>>,
    resolved: DashMap<ResolvedKey, Arc<ResolvedPattern>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide instance.
    pub fn shared() -> Arc<Catalog> {
        Arc::clone(&SHARED)
    }

    /// Facts for `(locale, no_abbreviation_punctuation)`, built on first use.
    pub fn locale_facts(&self, locale: &Locale, no_abbreviation_punctuation: bool) -> Arc<LocaleFacts> {
        let key = (locale.clone(), no_abbreviation_punctuation);
        if let Some(hit) = self.locales.get(&key) {
            return Arc::clone(hit.value());
        }
        let facts = Arc::new(LocaleFacts::new(locale, no_abbreviation_punctuation));
        Arc::clone(self.locales.entry(key).or_insert(facts).value())
    }

    /// Tokenized form of `pattern`. Malformed patterns are not cached.
    pub fn token_sequence(&self, pattern: &str) -> Result<Arc<TokenSequence>, Error> {
        if let Some(hit) = self.sequences.get(pattern) {
            return Ok(Arc::clone(hit.value()));
        }
        let sequence = Arc::new(tokenize(pattern)?);
        Ok(Arc::clone(self.sequences.entry(pattern.to_string()).or_insert(sequence).value()))
    }

    /// `pattern` resolved against `facts`.
    pub fn resolved(&self, pattern: &str, facts: &Arc<LocaleFacts>, lenient: bool) -> Result<Arc<ResolvedPattern>, Error> {
        let key = ResolvedKey {
            pattern: pattern.to_string(),
            locale: facts.locale().clone(),
            no_abbreviation_punctuation: facts.no_abbreviation_punctuation(),
            lenient,
        };
        if let Some(hit) = self.resolved.get(&key) {
            return Ok(Arc::clone(hit.value()));
        }
        let sequence = self.token_sequence(pattern)?;
        let resolved = Arc::new(ResolvedPattern::new(sequence, Arc::clone(facts), lenient));
        Ok(Arc::clone(self.resolved.entry(key).or_insert(resolved).value()))
    }

    /// Number of cached `(locale facts, token sequences, resolved patterns)`.
    pub fn sizes(&self) -> (usize, usize, usize) {
        (self.locales.len(), self.sequences.len(), self.resolved.len())
    }

    pub fn clear(&self) {
        self.locales.clear();
        self.sequences.clear();
        self.resolved.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn returns_the_same_instance_for_the_same_key() {
        let catalog = Catalog::new();
        let a = catalog.locale_facts(&Locale::parse("en-US"), false);
        let b = catalog.locale_facts(&Locale::parse("en_US"), false);
        assert!(Arc::ptr_eq(&a, &b));
        let c = catalog.locale_facts(&Locale::parse("en-US"), true);
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn malformed_patterns_are_not_cached() {
        let catalog = Catalog::new();
        assert!(catalog.token_sequence("yyyy-MM-dd'T").is_err());
        assert_eq!(catalog.sizes(), (0, 0, 0));
    }

    #[test]
    fn resolved_patterns_are_shared_across_threads() {
        let catalog = Arc::new(Catalog::new());
        let facts = catalog.locale_facts(&Locale::default(), false);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let catalog = Arc::clone(&catalog);
                let facts = Arc::clone(&facts);
                thread::spawn(move || catalog.resolved("dd/MM/yyyy", &facts, true).unwrap())
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(catalog.sizes(), (1, 1, 1));
    }
}
