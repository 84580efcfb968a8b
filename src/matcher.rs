//! Lexical matcher: multi-strategy search over the lexicon store.
//!
//! Strategies run in fixed priority order:
//!
//! | strategy   | rule                                              | relevance        |
//! |------------|---------------------------------------------------|------------------|
//! | exact      | folded query equals folded canonical phrase       | 100              |
//! | normalized | normalized query equals normalized canonical      | 95               |
//! | fuzzy      | Jaro-Winkler similarity above the fuzzy threshold | `round(sim*85)`  |
//! | partial    | containment either way                            | 80 / 75          |
//! | reverse    | source-language translation contains the query    | 70               |
//!
//! Containment is checked on whole words. An exact hit short-circuits the
//! search. Otherwise candidates accumulate and are de-duplicated by source
//! phrase, keeping the most relevant hit.

use crate::language::LanguageCode;
use crate::lexicon::{Category, LexiconStore, PhraseEntry};
use crate::text::similarity;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Minimum length (in chars) of the contained side of a partial match.
const MIN_PARTIAL_CHARS: usize = 2;

/// How a candidate was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Exact,
    Normalized,
    Fuzzy,
    Partial,
    Reverse,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::Normalized => "normalized",
            MatchType::Fuzzy => "fuzzy",
            MatchType::Partial => "partial",
            MatchType::Reverse => "reverse",
        }
    }
}

/// A ranked lexicon hit for a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCandidate {
    pub source_phrase: String,
    pub translation: String,
    pub match_type: MatchType,
    pub raw_similarity: f64,
    pub category: Category,
    /// Strategy relevance, 0-100
    pub relevance: u8,
    /// Final ranking score, 0-1
    pub score: f64,
}

/// A phrase close to an unresolved query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub phrase: String,
    pub translation: Option<String>,
    pub similarity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcherSettings {
    pub fuzzy_threshold: f64,
    pub suggestion_threshold: f64,
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.7,
            suggestion_threshold: 0.6,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LexicalMatcher {
    store: Arc<LexiconStore>,
    settings: MatcherSettings,
}

/// Request-scoped view of the query in its comparison forms.
///
/// `normalized` follows the source language's apostrophe policy and is
/// compared against source-language translations. `canonical` follows the
/// definition language's policy and is compared against canonical phrases.
struct Query<'a> {
    folded: String,
    normalized: String,
    canonical: String,
    from: &'a LanguageCode,
    to: &'a LanguageCode,
}

impl LexicalMatcher {
    pub fn new(store: Arc<LexiconStore>, settings: MatcherSettings) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &Arc<LexiconStore> {
        &self.store
    }

    pub fn settings(&self) -> &MatcherSettings {
        &self.settings
    }

    /// Run all five strategies and return ranked candidates.
    ///
    /// Only entries with a translation into `to` are returned. An empty list
    /// is a normal outcome.
    pub fn find_matches(
        &self,
        query: &str,
        from: &LanguageCode,
        to: &LanguageCode,
        max_results: usize,
    ) -> Vec<MatchCandidate> {
        let Some(query) = self.prepare(query, from, to) else {
            return Vec::new();
        };

        if let Some(exact) = self.exact(&query) {
            return vec![exact];
        }

        let mut found = Collector::default();
        self.normalized(&query, &mut found);
        self.fuzzy(&query, &mut found);
        self.partial(&query, &mut found);
        self.reverse(&query, &mut found);

        found.finish(max_results)
    }

    /// Exact, normalized and fuzzy strategies only.
    pub fn find_direct(
        &self,
        query: &str,
        from: &LanguageCode,
        to: &LanguageCode,
        max_results: usize,
    ) -> Vec<MatchCandidate> {
        let Some(query) = self.prepare(query, from, to) else {
            return Vec::new();
        };

        if let Some(exact) = self.exact(&query) {
            return vec![exact];
        }

        let mut found = Collector::default();
        self.normalized(&query, &mut found);
        self.fuzzy(&query, &mut found);

        found.finish(max_results)
    }

    /// Phrases similar to the query, most similar first.
    pub fn suggest(
        &self,
        query: &str,
        from: &LanguageCode,
        to: &LanguageCode,
        max: usize,
    ) -> Vec<Suggestion> {
        let normalized = self
            .store
            .normalizer()
            .normalize(query, self.store.definition_language());
        if normalized.is_empty() {
            return Vec::new();
        }

        let mut suggestions: Vec<Suggestion> = self
            .store
            .all_normalized()
            .filter_map(|(entry, canonical)| {
                let score = similarity(&normalized, canonical);
                (score >= self.settings.suggestion_threshold).then(|| Suggestion {
                    phrase: entry.canonical_text().to_string(),
                    translation: entry.translation(to.as_str()).map(str::to_string),
                    similarity: score,
                })
            })
            .collect();

        suggestions.sort_by(|a, b| {
            b.similarity
                .total_cmp(&a.similarity)
                .then_with(|| a.phrase.cmp(&b.phrase))
        });
        suggestions.truncate(max);
        suggestions
    }

    fn prepare<'a>(
        &self,
        query: &str,
        from: &'a LanguageCode,
        to: &'a LanguageCode,
    ) -> Option<Query<'a>> {
        let normalizer = self.store.normalizer();
        let normalized = normalizer.normalize(query, from);
        if normalized.is_empty() {
            return None;
        }
        Some(Query {
            folded: normalizer.fold(query),
            canonical: normalizer.normalize(query, self.store.definition_language()),
            normalized,
            from,
            to,
        })
    }

    fn exact(&self, query: &Query<'_>) -> Option<MatchCandidate> {
        let entry = self.store.lookup(&query.folded)?;
        self.candidate(query, entry, MatchType::Exact, 1.0, 100)
    }

    fn normalized(&self, query: &Query<'_>, found: &mut Collector) {
        for entry in self.store.lookup_normalized(&query.canonical) {
            found.push(self.candidate(query, entry, MatchType::Normalized, 1.0, 95));
        }
    }

    fn fuzzy(&self, query: &Query<'_>, found: &mut Collector) {
        for (entry, canonical) in self.store.all_normalized() {
            let score = similarity(&query.canonical, canonical);
            if score >= self.settings.fuzzy_threshold {
                let relevance = (score * 85.0).round() as u8;
                found.push(self.candidate(query, entry, MatchType::Fuzzy, score, relevance));
            }
        }
    }

    fn partial(&self, query: &Query<'_>, found: &mut Collector) {
        let q = query.canonical.as_str();
        if q.is_empty() {
            return;
        }
        for (entry, canonical) in self.store.all_normalized() {
            if canonical == q {
                continue;
            }
            let relevance = if q.chars().count() >= MIN_PARTIAL_CHARS && contains_words(canonical, q) {
                80
            } else if canonical.chars().count() >= MIN_PARTIAL_CHARS && contains_words(q, canonical) {
                75
            } else {
                continue;
            };
            let score = similarity(q, canonical);
            found.push(self.candidate(query, entry, MatchType::Partial, score, relevance));
        }
    }

    fn reverse(&self, query: &Query<'_>, found: &mut Collector) {
        let normalizer = self.store.normalizer();
        for entry in self.store.all() {
            let Some(source) = entry.translation(query.from.as_str()) else {
                continue;
            };
            let source = normalizer.normalize(source, query.from);
            if contains_words(&source, &query.normalized) {
                let score = similarity(&query.normalized, &source);
                found.push(self.candidate(query, entry, MatchType::Reverse, score, 70));
            }
        }
    }

    fn candidate(
        &self,
        query: &Query<'_>,
        entry: &PhraseEntry,
        match_type: MatchType,
        raw_similarity: f64,
        relevance: u8,
    ) -> Option<MatchCandidate> {
        let translation = entry.translation(query.to.as_str())?;
        let score = self.score(query, entry, relevance);
        Some(MatchCandidate {
            source_phrase: entry.canonical_text().to_string(),
            translation: translation.to_string(),
            match_type,
            raw_similarity,
            category: entry.category(),
            relevance,
            score,
        })
    }

    fn score(&self, query: &Query<'_>, entry: &PhraseEntry, relevance: u8) -> f64 {
        let mut score = f64::from(relevance) / 100.0;

        if query.from == self.store.definition_language() {
            score += 0.05;
        }

        let query_len = query.canonical.chars().count();
        let phrase_len = self
            .store
            .normalizer()
            .normalize(entry.canonical_text(), self.store.definition_language())
            .chars()
            .count();
        let (short, long) = if query_len <= phrase_len {
            (query_len, phrase_len)
        } else {
            (phrase_len, query_len)
        };
        if long > 0 {
            score += 0.1 * short as f64 / long as f64;
        }

        if !entry.category().is_generic() {
            score += 0.05;
        }
        // target translation present (checked by the caller)
        score += 0.05;

        score.clamp(0.0, 1.0)
    }
}

/// `needle` occurs in `haystack` as a run of whole words. Both sides are
/// expected in normalized form (single spaces, no edge whitespace).
fn contains_words(haystack: &str, needle: &str) -> bool {
    !needle.is_empty() && format!(" {haystack} ").contains(&format!(" {needle} "))
}

/// Accumulates candidates, keeping the most relevant hit per phrase.
#[derive(Default)]
struct Collector {
    by_phrase: HashMap<String, usize>,
    candidates: Vec<MatchCandidate>,
}

impl Collector {
    fn push(&mut self, candidate: Option<MatchCandidate>) {
        let Some(candidate) = candidate else {
            return;
        };
        match self.by_phrase.get(&candidate.source_phrase) {
            Some(&index) => {
                if candidate.relevance > self.candidates[index].relevance {
                    self.candidates[index] = candidate;
                }
            }
            None => {
                self.by_phrase
                    .insert(candidate.source_phrase.clone(), self.candidates.len());
                self.candidates.push(candidate);
            }
        }
    }

    fn finish(mut self, max_results: usize) -> Vec<MatchCandidate> {
        self.candidates.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| b.relevance.cmp(&a.relevance))
                .then_with(|| a.source_phrase.cmp(&b.source_phrase))
        });
        self.candidates.truncate(max_results);
        self.candidates
    }
}
