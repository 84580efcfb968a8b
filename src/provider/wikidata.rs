use crate::language::LanguageCode;
use crate::provider::http::send_json;
use crate::provider::{ProviderAdapter, ProviderError, ProviderId, ProviderQuery, ProviderResolution};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;

const CONFIDENCE: f64 = 0.72;

/// Label languages the adapter queries. Codes are used as-is.
const LABEL_LANGUAGES: &[&str] = &[
    "fr", "es", "en", "de", "pt", "it", "ca", "eu", "cy", "ga", "mt", "nah", "qu", "gn", "ay",
    "chr", "nv", "iu", "mi", "haw", "sm", "to", "sw", "zu", "xh", "yo", "ig", "ha", "am", "so",
];

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    id: String,
}

#[derive(Debug, Deserialize)]
struct EntitiesResponse {
    #[serde(default)]
    entities: HashMap<String, Entity>,
}

#[derive(Debug, Deserialize)]
struct Entity {
    #[serde(default)]
    labels: HashMap<String, Label>,
}

#[derive(Debug, Deserialize)]
struct Label {
    value: String,
}

/// Structured data lookup (Wikidata): find the entity for the text, then read
/// its label in the target language.
pub struct WikidataAdapter {
    client: reqwest::Client,
    api_url: String,
}

impl WikidataAdapter {
    pub fn new(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    async fn search_entity(&self, query: &ProviderQuery<'_>) -> Result<String, ProviderError> {
        let request = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "wbsearchentities"),
                ("search", query.text),
                ("language", query.from.as_str()),
                ("format", "json"),
                ("limit", "1"),
            ])
            .timeout(query.timeout);

        let response: SearchResponse = send_json(request, "Wikidata").await?;
        response
            .search
            .into_iter()
            .next()
            .map(|hit| hit.id)
            .ok_or_else(|| ProviderError::not_found(format!("no entity for '{}'", query.text)))
    }

    async fn label(&self, entity_id: &str, query: &ProviderQuery<'_>) -> Result<String, ProviderError> {
        let request = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "wbgetentities"),
                ("ids", entity_id),
                ("props", "labels"),
                ("languages", query.to.as_str()),
                ("format", "json"),
            ])
            .timeout(query.timeout);

        let mut response: EntitiesResponse = send_json(request, "Wikidata").await?;
        response
            .entities
            .remove(entity_id)
            .and_then(|mut entity| entity.labels.remove(query.to.as_str()))
            .map(|label| label.value)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ProviderError::not_found(format!("{} has no {} label", entity_id, query.to)))
    }
}

#[async_trait]
impl ProviderAdapter for WikidataAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::STRUCTURED_DATA
    }

    fn supports(&self, from: &LanguageCode, to: &LanguageCode) -> bool {
        from != to
            && LABEL_LANGUAGES.contains(&from.as_str())
            && LABEL_LANGUAGES.contains(&to.as_str())
    }

    async fn resolve(&self, query: &ProviderQuery<'_>) -> Result<ProviderResolution, ProviderError> {
        let entity_id = self.search_entity(query).await?;
        let label = self.label(&entity_id, query).await?;

        Ok(ProviderResolution::new(label, CONFIDENCE).with_detail(json!({ "wikidataId": entity_id })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::test_support::query;
    use crate::provider::ProviderErrorKind;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn code(code: &str) -> LanguageCode {
        code.into()
    }

    async fn mock_search(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(query_param("action", "wbsearchentities"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_two_step_lookup() {
        let server = MockServer::start().await;
        mock_search(&server, json!({ "search": [{ "id": "Q283" }] })).await;
        Mock::given(method("GET"))
            .and(query_param("action", "wbgetentities"))
            .and(query_param("ids", "Q283"))
            .and(query_param("languages", "nah"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "entities": { "Q283": { "labels": { "nah": { "language": "nah", "value": "Atl" } } } }
            })))
            .mount(&server)
            .await;

        let adapter = WikidataAdapter::new(reqwest::Client::new(), server.uri());
        let (fr, nah) = (code("fr"), code("nah"));
        let result = adapter.resolve(&query("eau", &fr, &nah, None)).await.unwrap();

        assert_eq!(result.translated_text, "Atl");
        assert_eq!(result.confidence, 0.72);
        assert_eq!(result.detail.unwrap()["wikidataId"], "Q283");
    }

    #[tokio::test]
    async fn test_no_entity_is_not_found() {
        let server = MockServer::start().await;
        mock_search(&server, json!({ "search": [] })).await;

        let adapter = WikidataAdapter::new(reqwest::Client::new(), server.uri());
        let (fr, nah) = (code("fr"), code("nah"));
        let err = adapter.resolve(&query("zzzz", &fr, &nah, None)).await.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_missing_label_is_not_found() {
        let server = MockServer::start().await;
        mock_search(&server, json!({ "search": [{ "id": "Q283" }] })).await;
        Mock::given(method("GET"))
            .and(query_param("action", "wbgetentities"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "entities": { "Q283": { "labels": {} } }
            })))
            .mount(&server)
            .await;

        let adapter = WikidataAdapter::new(reqwest::Client::new(), server.uri());
        let (fr, qu) = (code("fr"), code("qu"));
        let err = adapter.resolve(&query("eau", &fr, &qu, None)).await.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::NotFound);
    }

    #[test]
    fn test_supports_label_languages() {
        let adapter = WikidataAdapter::new(reqwest::Client::new(), "http://unused");
        assert!(adapter.supports(&code("es"), &code("gn")));
        assert!(!adapter.supports(&code("es"), &code("yua")));
    }
}
