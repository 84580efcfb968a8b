use crate::language::LanguageCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Semantic category of a phrase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Greetings,
    Politeness,
    Questions,
    Introductions,
    Food,
    Family,
    Places,
    Emergency,
    Numbers,
    Time,
    Communication,
    Nature,
    People,
    #[default]
    Other,
}

impl Category {
    /// Whether this is the catch-all category.
    pub fn is_generic(&self) -> bool {
        matches!(self, Category::Other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Greetings => "greetings",
            Category::Politeness => "politeness",
            Category::Questions => "questions",
            Category::Introductions => "introductions",
            Category::Food => "food",
            Category::Family => "family",
            Category::Places => "places",
            Category::Emergency => "emergency",
            Category::Numbers => "numbers",
            Category::Time => "time",
            Category::Communication => "communication",
            Category::Nature => "nature",
            Category::People => "people",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A curated phrase with its translations.
///
/// Entries are immutable once built; the lexicon store owns them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhraseEntry {
    canonical_text: String,
    translations: BTreeMap<LanguageCode, String>,
    category: Category,
}

impl PhraseEntry {
    pub fn new(
        canonical_text: impl Into<String>,
        translations: BTreeMap<LanguageCode, String>,
        category: Category,
    ) -> Self {
        Self {
            canonical_text: canonical_text.into(),
            translations,
            category,
        }
    }

    /// The canonical (lookup key) form of the phrase.
    pub fn canonical_text(&self) -> &str {
        &self.canonical_text
    }

    /// Translation into `language`, if the entry has one.
    pub fn translation(&self, language: &str) -> Option<&str> {
        self.translations.get(language).map(String::as_str)
    }

    pub fn has_translation(&self, language: &str) -> bool {
        self.translations.contains_key(language)
    }

    pub fn translations(&self) -> impl Iterator<Item = (&LanguageCode, &str)> {
        self.translations
            .iter()
            .map(|(code, text)| (code, text.as_str()))
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub(crate) fn translations_mut(&mut self) -> &mut BTreeMap<LanguageCode, String> {
        &mut self.translations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> PhraseEntry {
        let translations = BTreeMap::from([
            ("fr".into(), "Merci".to_string()),
            ("yua".into(), "Dios bo'otik".to_string()),
        ]);
        PhraseEntry::new("merci", translations, Category::Politeness)
    }

    #[test]
    fn test_translation_lookup() {
        let entry = entry();
        assert_eq!(entry.translation("yua"), Some("Dios bo'otik"));
        assert_eq!(entry.translation("quc"), None);
        assert!(entry.has_translation("fr"));
    }

    #[test]
    fn test_category_generic() {
        assert!(Category::Other.is_generic());
        assert!(!Category::Greetings.is_generic());
        assert_eq!(Category::default(), Category::Other);
    }

    #[test]
    fn test_category_deserializes_snake_case() {
        let category: Category = serde_json::from_str("\"emergency\"").unwrap();
        assert_eq!(category, Category::Emergency);
        assert_eq!(category.to_string(), "emergency");
    }
}
