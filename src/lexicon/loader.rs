//! Corpus loading for the lexicon store and the curated bilingual list.
//!
//! Corpus format:
//!
//! ```json
//! {
//!   "definition_language": "fr",
//!   "entries": [
//!     { "phrase": "bonjour", "category": "greetings",
//!       "translations": { "fr": "Bonjour", "yua": "Ba'ax ka wa'alik" } }
//!   ]
//! }
//! ```

use crate::language::LanguageCode;
use crate::lexicon::{Category, LexiconError, LexiconStore, PhraseEntry};
use crate::text::Normalizer;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::info;

const REFERENCE_CORPUS: &str = include_str!("../../data/reference_lexicon.json");
const REFERENCE_CURATED: &str = include_str!("../../data/curated_es_yua.json");

#[derive(Debug, Deserialize)]
struct CorpusFile {
    definition_language: LanguageCode,
    entries: Vec<CorpusEntry>,
}

#[derive(Debug, Deserialize)]
struct CorpusEntry {
    phrase: String,
    #[serde(default)]
    category: Category,
    translations: BTreeMap<LanguageCode, String>,
}

impl LexiconStore {
    /// Parse a JSON corpus and build a validated store.
    pub fn from_json(json: &str, normalizer: Normalizer) -> Result<Self, LexiconError> {
        let corpus: CorpusFile = serde_json::from_str(json)?;
        let entries = corpus
            .entries
            .into_iter()
            .map(|entry| PhraseEntry::new(entry.phrase, entry.translations, entry.category))
            .collect();

        Self::new(corpus.definition_language, entries, normalizer)
    }

    /// Read and parse a JSON corpus from disk.
    pub fn from_path(path: impl AsRef<Path>, normalizer: Normalizer) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_json(&json, normalizer)?;
        info!("Loaded {} lexicon entries from {}", store.len(), path.display());
        Ok(store)
    }

    /// The bundled reference corpus.
    pub fn reference(normalizer: Normalizer) -> Result<Self, LexiconError> {
        Self::from_json(REFERENCE_CORPUS, normalizer)
    }
}

/// A high-trust one-directional bilingual word list.
///
/// Keys are folded source phrases; a phrase may carry several renderings.
#[derive(Debug, Clone)]
pub struct CuratedList {
    from: LanguageCode,
    to: LanguageCode,
    entries: HashMap<String, Vec<String>>,
    normalizer: Normalizer,
}

#[derive(Debug, Deserialize)]
struct CuratedFile {
    from: LanguageCode,
    to: LanguageCode,
    entries: BTreeMap<String, Vec<String>>,
}

impl CuratedList {
    pub fn from_json(json: &str, normalizer: Normalizer) -> Result<Self, LexiconError> {
        let file: CuratedFile = serde_json::from_str(json)?;

        let mut entries = HashMap::with_capacity(file.entries.len());
        for (phrase, renderings) in file.entries {
            let key = normalizer.fold(&phrase);
            if key.is_empty() {
                return Err(LexiconError::EmptyPhrase);
            }
            if renderings.iter().all(|r| r.trim().is_empty()) {
                return Err(LexiconError::EmptyTranslations(phrase));
            }
            if entries.insert(key, renderings).is_some() {
                return Err(LexiconError::DuplicatePhrase(phrase));
            }
        }

        Ok(Self {
            from: file.from,
            to: file.to,
            entries,
            normalizer,
        })
    }

    pub fn from_path(path: impl AsRef<Path>, normalizer: Normalizer) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let list = Self::from_json(&json, normalizer)?;
        info!(
            "Loaded {} curated {}->{} entries from {}",
            list.len(),
            list.from,
            list.to,
            path.display()
        );
        Ok(list)
    }

    /// The bundled Spanish to Yucatec Maya list.
    pub fn reference(normalizer: Normalizer) -> Result<Self, LexiconError> {
        Self::from_json(REFERENCE_CURATED, normalizer)
    }

    pub fn from_language(&self) -> &LanguageCode {
        &self.from
    }

    pub fn to_language(&self) -> &LanguageCode {
        &self.to
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renderings for a phrase (case and whitespace insensitive).
    pub fn lookup(&self, phrase: &str) -> Option<&[String]> {
        self.entries
            .get(&self.normalizer.fold(phrase))
            .map(Vec::as_slice)
    }
}
