//! In-memory, read-only phrase store.
//!
//! The store is built once and never mutated, so it can be shared across
//! concurrent requests behind an `Arc` without locking. Normalized forms of
//! every canonical phrase are computed at build time.

use crate::language::{LanguageCode, LanguageRegistry};
use crate::lexicon::{Category, LexiconError, PhraseEntry};
use crate::text::Normalizer;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub struct LexiconStore {
    definition_language: LanguageCode,
    normalizer: Normalizer,
    entries: Vec<PhraseEntry>,
    /// Normalized canonical text, parallel to `entries`
    normalized: Vec<String>,
    by_folded: HashMap<String, usize>,
    by_normalized: HashMap<String, Vec<usize>>,
    languages: BTreeSet<LanguageCode>,
}

/// Coverage of one language across the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageCoverage {
    pub covered_phrases: usize,
    pub total_phrases: usize,
    pub coverage_percentage: u8,
    pub language_name: String,
}

/// Summary statistics for a lexicon store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LexiconStats {
    pub total_phrases: usize,
    pub definition_language: LanguageCode,
    pub phrases_by_category: BTreeMap<Category, usize>,
    pub coverage_by_language: BTreeMap<LanguageCode, LanguageCoverage>,
}

/// A phrase listed by category, rendered in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryPhrase {
    pub phrase: String,
    pub translation: String,
    pub category: Category,
}

/// Translations of one phrase into several target languages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiTranslation {
    pub source: String,
    pub translations: BTreeMap<LanguageCode, String>,
    /// Percentage of requested targets that have a translation
    pub coverage: u8,
}

impl LexiconStore {
    /// Build a store, validating entry invariants.
    ///
    /// Entries missing a translation in the definition language receive their
    /// canonical text as that translation.
    pub fn new(
        definition_language: LanguageCode,
        entries: Vec<PhraseEntry>,
        normalizer: Normalizer,
    ) -> Result<Self, LexiconError> {
        let mut store = Self {
            definition_language,
            normalizer,
            entries: Vec::with_capacity(entries.len()),
            normalized: Vec::with_capacity(entries.len()),
            by_folded: HashMap::with_capacity(entries.len()),
            by_normalized: HashMap::new(),
            languages: BTreeSet::new(),
        };

        for mut entry in entries {
            let folded = store.normalizer.fold(entry.canonical_text());
            if folded.is_empty() {
                return Err(LexiconError::EmptyPhrase);
            }
            if store.by_folded.contains_key(&folded) {
                return Err(LexiconError::DuplicatePhrase(entry.canonical_text().to_string()));
            }
            if entry.translations().next().is_none() {
                return Err(LexiconError::EmptyTranslations(
                    entry.canonical_text().to_string(),
                ));
            }
            if !entry.has_translation(store.definition_language.as_str()) {
                let own = entry.canonical_text().to_string();
                entry
                    .translations_mut()
                    .insert(store.definition_language.clone(), own);
            }

            let index = store.entries.len();
            let normalized = store
                .normalizer
                .normalize(entry.canonical_text(), &store.definition_language);

            store.by_folded.insert(folded, index);
            store
                .by_normalized
                .entry(normalized.clone())
                .or_default()
                .push(index);
            store
                .languages
                .extend(entry.translations().map(|(code, _)| code.clone()));
            store.normalized.push(normalized);
            store.entries.push(entry);
        }

        Ok(store)
    }

    /// Look up an entry by canonical text (case and whitespace insensitive).
    pub fn lookup(&self, canonical_text: &str) -> Option<&PhraseEntry> {
        self.by_folded
            .get(&self.normalizer.fold(canonical_text))
            .map(|&index| &self.entries[index])
    }

    /// Entries whose normalized canonical text equals `normalized`.
    pub fn lookup_normalized<'a>(
        &'a self,
        normalized: &str,
    ) -> impl Iterator<Item = &'a PhraseEntry> + 'a {
        self.by_normalized
            .get(normalized)
            .into_iter()
            .flatten()
            .map(|&index| &self.entries[index])
    }

    /// All entries, in load order.
    pub fn all(&self) -> impl Iterator<Item = &PhraseEntry> {
        self.entries.iter()
    }

    /// All entries paired with their normalized canonical text.
    pub fn all_normalized(&self) -> impl Iterator<Item = (&PhraseEntry, &str)> {
        self.entries
            .iter()
            .zip(self.normalized.iter().map(String::as_str))
    }

    pub fn definition_language(&self) -> &LanguageCode {
        &self.definition_language
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any entry has a translation in `language`.
    pub fn covers(&self, language: &str) -> bool {
        self.languages.contains(language)
    }

    /// Per-category counts and per-language coverage.
    pub fn stats(&self, registry: &LanguageRegistry) -> LexiconStats {
        let total = self.entries.len();

        let mut phrases_by_category = BTreeMap::new();
        for entry in &self.entries {
            *phrases_by_category.entry(entry.category()).or_insert(0) += 1;
        }

        let coverage_by_language = self
            .languages
            .iter()
            .map(|code| {
                let covered = self
                    .entries
                    .iter()
                    .filter(|entry| entry.has_translation(code.as_str()))
                    .count();
                let coverage = LanguageCoverage {
                    covered_phrases: covered,
                    total_phrases: total,
                    coverage_percentage: percentage(covered, total),
                    language_name: registry.display_name(code),
                };
                (code.clone(), coverage)
            })
            .collect();

        LexiconStats {
            total_phrases: total,
            definition_language: self.definition_language.clone(),
            phrases_by_category,
            coverage_by_language,
        }
    }

    /// Phrases of a category rendered in `language` (canonical text when the
    /// entry lacks that language).
    pub fn phrases_in_category(&self, category: Category, language: &str) -> Vec<CategoryPhrase> {
        self.entries
            .iter()
            .filter(|entry| entry.category() == category)
            .map(|entry| CategoryPhrase {
                phrase: entry.canonical_text().to_string(),
                translation: entry
                    .translation(language)
                    .unwrap_or(entry.canonical_text())
                    .to_string(),
                category,
            })
            .collect()
    }

    /// Translations of a phrase into several targets at once.
    pub fn translations_for(
        &self,
        phrase: &str,
        targets: &[LanguageCode],
    ) -> Option<MultiTranslation> {
        let entry = self.lookup(phrase)?;
        let translations: BTreeMap<_, _> = targets
            .iter()
            .filter_map(|code| {
                entry
                    .translation(code.as_str())
                    .map(|text| (code.clone(), text.to_string()))
            })
            .collect();

        Some(MultiTranslation {
            source: entry.canonical_text().to_string(),
            coverage: percentage(translations.len(), targets.len()),
            translations,
        })
    }
}

impl std::fmt::Debug for LexiconStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LexiconStore")
            .field("definition_language", &self.definition_language)
            .field("entries", &self.entries.len())
            .field("languages", &self.languages)
            .finish()
    }
}

fn percentage(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(phrase: &str, translations: &[(&str, &str)], category: Category) -> PhraseEntry {
        let translations = translations
            .iter()
            .map(|(code, text)| (LanguageCode::from(*code), text.to_string()))
            .collect();
        PhraseEntry::new(phrase, translations, category)
    }

    fn store() -> LexiconStore {
        LexiconStore::new(
            "fr".into(),
            vec![
                entry(
                    "bonjour",
                    &[("fr", "Bonjour"), ("yua", "Ba'ax ka wa'alik"), ("en", "Hello")],
                    Category::Greetings,
                ),
                entry("rivière", &[("yua", "Sayab"), ("en", "River")], Category::Nature),
                entry("merci", &[("quc", "Tyox")], Category::Politeness),
            ],
            Normalizer::default(),
        )
        .expect("valid store")
    }

    // ==================== Build Tests ====================

    #[test]
    fn test_build_inserts_definition_language() {
        let store = store();
        let entry = store.lookup("rivière").unwrap();
        assert_eq!(entry.translation("fr"), Some("rivière"));
    }

    #[test]
    fn test_duplicate_phrase_rejected() {
        let result = LexiconStore::new(
            "fr".into(),
            vec![
                entry("merci", &[("en", "Thanks")], Category::Politeness),
                entry("  Merci ", &[("en", "Thank you")], Category::Politeness),
            ],
            Normalizer::default(),
        );
        assert!(matches!(result, Err(LexiconError::DuplicatePhrase(_))));
    }

    #[test]
    fn test_empty_translations_rejected() {
        let result = LexiconStore::new(
            "fr".into(),
            vec![entry("merci", &[], Category::Politeness)],
            Normalizer::default(),
        );
        assert!(matches!(result, Err(LexiconError::EmptyTranslations(_))));
    }

    #[test]
    fn test_empty_phrase_rejected() {
        let result = LexiconStore::new(
            "fr".into(),
            vec![entry("   ", &[("en", "Nothing")], Category::Other)],
            Normalizer::default(),
        );
        assert!(matches!(result, Err(LexiconError::EmptyPhrase)));
    }

    // ==================== Lookup Tests ====================

    #[test]
    fn test_lookup_is_case_insensitive() {
        let store = store();
        assert!(store.lookup("BONJOUR").is_some());
        assert!(store.lookup("au revoir").is_none());
    }

    #[test]
    fn test_lookup_normalized_ignores_accents() {
        let store = store();
        let found: Vec<_> = store.lookup_normalized("riviere").collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].canonical_text(), "rivière");
    }

    #[test]
    fn test_covers_languages() {
        let store = store();
        assert!(store.covers("yua"));
        assert!(store.covers("fr"));
        assert!(!store.covers("nah"));
    }

    // ==================== Stats Tests ====================

    #[test]
    fn test_stats_coverage() {
        let store = store();
        let stats = store.stats(LanguageRegistry::get());

        assert_eq!(stats.total_phrases, 3);
        assert_eq!(stats.phrases_by_category[&Category::Greetings], 1);

        let yua = &stats.coverage_by_language[&LanguageCode::from("yua")];
        assert_eq!(yua.covered_phrases, 2);
        assert_eq!(yua.coverage_percentage, 67);
        assert_eq!(yua.language_name, "Yucatec Maya");

        let fr = &stats.coverage_by_language[&LanguageCode::from("fr")];
        assert_eq!(fr.coverage_percentage, 100);
    }

    #[test]
    fn test_phrases_in_category_falls_back_to_canonical() {
        let store = store();
        let phrases = store.phrases_in_category(Category::Politeness, "yua");
        assert_eq!(phrases.len(), 1);
        assert_eq!(phrases[0].translation, "merci");
    }

    #[test]
    fn test_translations_for_multiple_targets() {
        let store = store();
        let targets: Vec<LanguageCode> = vec!["yua".into(), "en".into(), "quc".into(), "nah".into()];
        let result = store.translations_for("bonjour", &targets).unwrap();

        assert_eq!(result.translations.len(), 2);
        assert_eq!(result.coverage, 50);
        assert!(store.translations_for("inconnu", &targets).is_none());
    }
}
