use crate::language::LanguageCode;
use crate::lexicon::CuratedList;
use crate::matcher::MatchType;
use crate::provider::{ProviderAdapter, ProviderError, ProviderId, ProviderQuery, ProviderResolution};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

const CONFIDENCE: f64 = 0.95;

/// High-trust bilingual list for a single direction. Takes precedence over
/// every other source for its pair.
pub struct CuratedBilingualAdapter {
    list: Arc<CuratedList>,
}

impl CuratedBilingualAdapter {
    pub fn new(list: Arc<CuratedList>) -> Self {
        Self { list }
    }
}

#[async_trait]
impl ProviderAdapter for CuratedBilingualAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::CURATED_BILINGUAL
    }

    fn supports(&self, from: &LanguageCode, to: &LanguageCode) -> bool {
        from == self.list.from_language() && to == self.list.to_language()
    }

    async fn resolve(&self, query: &ProviderQuery<'_>) -> Result<ProviderResolution, ProviderError> {
        let renderings = self
            .list
            .lookup(query.text)
            .ok_or_else(|| ProviderError::not_found(format!("'{}' not in curated list", query.text)))?;

        Ok(ProviderResolution::new(renderings.join("; "), CONFIDENCE)
            .with_match_type(MatchType::Exact)
            .with_detail(json!({ "renderings": renderings })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::test_support::query;
    use crate::provider::ProviderErrorKind;
    use crate::text::Normalizer;

    fn adapter() -> CuratedBilingualAdapter {
        CuratedBilingualAdapter::new(Arc::new(CuratedList::reference(Normalizer::default()).unwrap()))
    }

    #[test]
    fn test_supports_only_its_direction() {
        let adapter = adapter();
        assert!(adapter.supports(&"es".into(), &"yua".into()));
        assert!(!adapter.supports(&"yua".into(), &"es".into()));
        assert!(!adapter.supports(&"fr".into(), &"yua".into()));
    }

    #[tokio::test]
    async fn test_resolves_single_rendering() {
        let (es, yua) = (LanguageCode::from("es"), LanguageCode::from("yua"));
        let result = adapter().resolve(&query("Hola", &es, &yua, None)).await.unwrap();
        assert_eq!(result.translated_text, "Ba'ax ka wa'alik");
        assert_eq!(result.confidence, 0.95);
    }

    #[tokio::test]
    async fn test_joins_multiple_renderings() {
        let (es, yua) = (LanguageCode::from("es"), LanguageCode::from("yua"));
        let result = adapter().resolve(&query("casa", &es, &yua, None)).await.unwrap();
        assert_eq!(result.translated_text, "Naj; Otoch");
    }

    #[tokio::test]
    async fn test_unknown_phrase_is_not_found() {
        let (es, yua) = (LanguageCode::from("es"), LanguageCode::from("yua"));
        let err = adapter()
            .resolve(&query("computadora", &es, &yua, None))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::NotFound);
    }
}
