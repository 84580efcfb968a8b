use crate::language::{LanguageCode, LanguageFamily, LanguageRegistry};
use crate::provider::http::{endpoint, send_json};
use crate::provider::{ProviderAdapter, ProviderError, ProviderId, ProviderQuery, ProviderResolution};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Contact languages the ensemble service pairs with Maya languages.
const CONTACT_LANGUAGES: &[&str] = &["es", "en", "fr"];

#[derive(Debug, Serialize)]
struct EnsembleRequest<'a> {
    source_text: &'a str,
    source_language: &'a str,
    target_language: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    dialect: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct EnsembleResponse {
    translation: String,
    confidence: Option<f64>,
    #[serde(default)]
    models_used: Vec<String>,
    consensus_level: Option<String>,
    complexity_score: Option<f64>,
}

/// Ensemble-of-models translation microservice for Maya language pairs.
/// Only consulted when a request opts into ensemble mode.
pub struct EnsembleAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl EnsembleAdapter {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

fn is_mayan(code: &LanguageCode) -> bool {
    LanguageRegistry::get().family(code) == Some(LanguageFamily::Mayan)
}

/// The Maya side of the pair, sent as the dialect hint.
fn dialect<'a>(from: &'a LanguageCode, to: &'a LanguageCode) -> Option<&'a str> {
    [to, from].into_iter().find(|c| is_mayan(c)).map(LanguageCode::as_str)
}

#[async_trait]
impl ProviderAdapter for EnsembleAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::ENSEMBLE_MODEL
    }

    fn supports(&self, from: &LanguageCode, to: &LanguageCode) -> bool {
        (is_mayan(from) && CONTACT_LANGUAGES.contains(&to.as_str()))
            || (is_mayan(to) && CONTACT_LANGUAGES.contains(&from.as_str()))
    }

    async fn resolve(&self, query: &ProviderQuery<'_>) -> Result<ProviderResolution, ProviderError> {
        if !self.supports(query.from, query.to) {
            return Err(ProviderError::unsupported_pair(query.from.as_str(), query.to.as_str()));
        }

        let body = EnsembleRequest {
            source_text: query.text,
            source_language: query.from.as_str(),
            target_language: query.to.as_str(),
            dialect: dialect(query.from, query.to),
        };

        let request = self
            .client
            .post(endpoint(&self.base_url, "translate"))
            .json(&body)
            .timeout(query.timeout);

        let response: EnsembleResponse = send_json(request, "Ensemble").await?;
        if response.translation.trim().is_empty() {
            return Err(ProviderError::not_found(format!("no ensemble output for '{}'", query.text)));
        }

        Ok(ProviderResolution::new(
            response.translation.trim(),
            response.confidence.unwrap_or(DEFAULT_CONFIDENCE),
        )
        .with_detail(json!({
            "modelsUsed": response.models_used,
            "consensusLevel": response.consensus_level,
            "complexityScore": response.complexity_score,
        })))
    }
}
