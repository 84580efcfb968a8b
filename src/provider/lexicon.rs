use crate::language::LanguageCode;
use crate::lexicon::{LexiconStore, PhraseEntry};
use crate::matcher::MatchType;
use crate::provider::{ProviderAdapter, ProviderError, ProviderId, ProviderQuery, ProviderResolution};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

const EXACT_CONFIDENCE: f64 = 0.95;
const NORMALIZED_CONFIDENCE: f64 = 0.9;

/// Exact and normalized lookups against the lexicon store.
///
/// Queries in the definition language match canonical phrases. Queries in any
/// other language match the entries' translations in that language.
pub struct LexiconAdapter {
    store: Arc<LexiconStore>,
}

impl LexiconAdapter {
    pub fn new(store: Arc<LexiconStore>) -> Self {
        Self { store }
    }

    fn exact(&self, text: &str, from: &LanguageCode) -> Option<&PhraseEntry> {
        if from == self.store.definition_language() {
            return self.store.lookup(text);
        }
        let normalizer = self.store.normalizer();
        let folded = normalizer.fold(text);
        self.store.all().find(|entry| {
            entry
                .translation(from.as_str())
                .is_some_and(|source| normalizer.fold(source) == folded)
        })
    }

    fn normalized(&self, text: &str, from: &LanguageCode) -> Option<&PhraseEntry> {
        let normalizer = self.store.normalizer();
        let normalized = normalizer.normalize(text, from);
        if normalized.is_empty() {
            return None;
        }
        if from == self.store.definition_language() {
            return self.store.lookup_normalized(&normalized).next();
        }
        self.store.all().find(|entry| {
            entry
                .translation(from.as_str())
                .is_some_and(|source| normalizer.normalize(source, from) == normalized)
        })
    }
}

#[async_trait]
impl ProviderAdapter for LexiconAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::LEXICON
    }

    fn supports(&self, from: &LanguageCode, to: &LanguageCode) -> bool {
        self.store.covers(from.as_str()) && self.store.covers(to.as_str())
    }

    async fn resolve(&self, query: &ProviderQuery<'_>) -> Result<ProviderResolution, ProviderError> {
        let (entry, match_type, confidence) = if let Some(entry) = self.exact(query.text, query.from) {
            (entry, MatchType::Exact, EXACT_CONFIDENCE)
        } else if let Some(entry) = self.normalized(query.text, query.from) {
            (entry, MatchType::Normalized, NORMALIZED_CONFIDENCE)
        } else {
            return Err(ProviderError::not_found(format!(
                "'{}' not in lexicon",
                query.text
            )));
        };

        let translation = entry.translation(query.to.as_str()).ok_or_else(|| {
            ProviderError::not_found(format!(
                "'{}' has no {} translation",
                entry.canonical_text(),
                query.to
            ))
        })?;

        Ok(ProviderResolution::new(translation, confidence)
            .with_match_type(match_type)
            .with_detail(json!({
                "sourcePhrase": entry.canonical_text(),
                "category": entry.category(),
            })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::test_support::query;
    use crate::provider::ProviderErrorKind;
    use crate::text::Normalizer;

    fn adapter() -> LexiconAdapter {
        LexiconAdapter::new(Arc::new(LexiconStore::reference(Normalizer::default()).unwrap()))
    }

    fn code(code: &str) -> LanguageCode {
        code.into()
    }

    #[tokio::test]
    async fn test_exact_canonical_lookup() {
        let (fr, yua) = (code("fr"), code("yua"));
        let result = adapter().resolve(&query("bonjour", &fr, &yua, None)).await.unwrap();
        assert_eq!(result.translated_text, "Ba'ax ka wa'alik");
        assert_eq!(result.confidence, 0.95);
        assert_eq!(result.match_type, Some(MatchType::Exact));
    }

    #[tokio::test]
    async fn test_normalized_lookup_has_lower_confidence() {
        let (fr, en) = (code("fr"), code("en"));
        let result = adapter()
            .resolve(&query("Comment allez vous?", &fr, &en, None))
            .await
            .unwrap();
        assert_eq!(result.translated_text, "How are you?");
        assert_eq!(result.confidence, 0.9);
        assert_eq!(result.match_type, Some(MatchType::Normalized));
    }

    #[tokio::test]
    async fn test_lookup_from_non_definition_language() {
        let (es, quc) = (code("es"), code("quc"));
        let result = adapter().resolve(&query("gracias", &es, &quc, None)).await.unwrap();
        assert_eq!(result.translated_text, "Tyox");
    }

    #[tokio::test]
    async fn test_missing_target_is_not_found() {
        let (fr, qu) = (code("fr"), code("qu"));
        let err = adapter()
            .resolve(&query("bonsoir", &fr, &qu, None))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::NotFound);
    }

    #[test]
    fn test_supports_requires_coverage() {
        let adapter = adapter();
        assert!(adapter.supports(&code("fr"), &code("yua")));
        assert!(!adapter.supports(&code("fr"), &code("nah")));
        assert!(!adapter.supports(&code("de"), &code("yua")));
    }
}
