use crate::language::LanguageCode;
use crate::provider::http::{endpoint, send_json};
use crate::provider::{ProviderAdapter, ProviderError, ProviderId, ProviderQuery, ProviderResolution};
use async_trait::async_trait;
use serde::Deserialize;

const CONFIDENCE: f64 = 0.88;

/// Credential id looked up in the request's credential map.
pub const CREDENTIAL: &str = "systran";

const LANGUAGES: &[&str] = &[
    "fr", "es", "en", "de", "pt", "it", "ca", "nl", "ru", "zh", "ja", "ko", "ar", "qu", "gn", "ay",
];

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(default)]
    outputs: Vec<Output>,
}

#[derive(Debug, Deserialize)]
struct Output {
    output: Option<String>,
    error: Option<String>,
}

/// Commercial machine translation (SYSTRAN), gated on an API key.
pub struct SystranAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl SystranAdapter {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for SystranAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::COMMERCIAL_MT
    }

    fn supports(&self, from: &LanguageCode, to: &LanguageCode) -> bool {
        from != to && LANGUAGES.contains(&from.as_str()) && LANGUAGES.contains(&to.as_str())
    }

    fn credential(&self) -> Option<&'static str> {
        Some(CREDENTIAL)
    }

    async fn resolve(&self, query: &ProviderQuery<'_>) -> Result<ProviderResolution, ProviderError> {
        let key = query
            .credential
            .ok_or_else(|| ProviderError::missing_credential(CREDENTIAL))?;

        let request = self
            .client
            .post(endpoint(&self.base_url, "translation/text/translate"))
            .header("Authorization", format!("Key {}", key))
            .query(&[
                ("source", query.from.as_str()),
                ("target", query.to.as_str()),
                ("input", query.text),
            ])
            .timeout(query.timeout);

        let response: TranslateResponse = send_json(request, "SYSTRAN").await?;
        let output = response
            .outputs
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::malformed("SYSTRAN response contained no outputs"))?;

        if let Some(error) = output.error {
            return Err(ProviderError::not_found(error));
        }

        let text = output
            .output
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ProviderError::not_found(format!("empty output for '{}'", query.text)))?;

        Ok(ProviderResolution::new(text.trim(), CONFIDENCE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::test_support::query;
    use crate::provider::ProviderErrorKind;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn code(code: &str) -> LanguageCode {
        code.into()
    }

    #[tokio::test]
    async fn test_sends_key_and_reads_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translation/text/translate"))
            .and(header("Authorization", "Key secret"))
            .and(query_param("target", "qu"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "outputs": [{ "output": "Allin p'unchaw" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let adapter = SystranAdapter::new(reqwest::Client::new(), server.uri());
        let (es, qu) = (code("es"), code("qu"));
        let result = adapter
            .resolve(&query("buenos días", &es, &qu, Some("secret")))
            .await
            .unwrap();

        assert_eq!(result.translated_text, "Allin p'unchaw");
        assert_eq!(result.confidence, 0.88);
    }

    #[tokio::test]
    async fn test_without_key_is_missing_credential() {
        let adapter = SystranAdapter::new(reqwest::Client::new(), "http://unused");
        let (es, qu) = (code("es"), code("qu"));
        let err = adapter.resolve(&query("hola", &es, &qu, None)).await.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::MissingCredential);
    }

    #[tokio::test]
    async fn test_rejected_key_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&server)
            .await;

        let adapter = SystranAdapter::new(reqwest::Client::new(), server.uri());
        let (es, qu) = (code("es"), code("qu"));
        let err = adapter
            .resolve(&query("hola", &es, &qu, Some("bad")))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Http(401));
    }

    #[test]
    fn test_declares_credential() {
        let adapter = SystranAdapter::new(reqwest::Client::new(), "http://unused");
        assert_eq!(adapter.credential(), Some("systran"));
    }
}
