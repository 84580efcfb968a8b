use crate::language::LanguageCode;
use crate::provider::http::{endpoint, send_json};
use crate::provider::{
    map_code, ProviderAdapter, ProviderError, ProviderId, ProviderQuery, ProviderResolution,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const CONFIDENCE: f64 = 0.92;

const SOURCE_LANGUAGES: &[&str] = &["fr", "es", "en"];

/// Maya language code to dictionary name.
const DICTIONARIES: &[(&str, &str)] = &[
    ("yua", "yucatec"),
    ("quc", "kiche"),
    ("cak", "kaqchikel"),
    ("mam", "mam"),
    ("qeq", "qeqchi"),
    ("itz", "itza"),
    ("lac", "lacandon"),
];

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    entries: Vec<LookupEntry>,
}

#[derive(Debug, Deserialize)]
struct LookupEntry {
    gloss: String,
    #[serde(default)]
    etymology: Option<String>,
}

/// Specialized academic Maya lexicon.
pub struct AcademicLexiconAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl AcademicLexiconAdapter {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for AcademicLexiconAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::ACADEMIC_LEXICON
    }

    fn supports(&self, from: &LanguageCode, to: &LanguageCode) -> bool {
        SOURCE_LANGUAGES.contains(&from.as_str()) && map_code(DICTIONARIES, to).is_some()
    }

    async fn resolve(&self, query: &ProviderQuery<'_>) -> Result<ProviderResolution, ProviderError> {
        let dictionary = map_code(DICTIONARIES, query.to)
            .ok_or_else(|| ProviderError::unsupported_pair(query.from.as_str(), query.to.as_str()))?;

        let request = self
            .client
            .get(endpoint(&self.base_url, "lookup"))
            .query(&[
                ("term", query.text),
                ("source", query.from.as_str()),
                ("dictionary", dictionary),
            ])
            .timeout(query.timeout);

        let response: LookupResponse = send_json(request, "Academic lexicon").await?;
        let entry = response
            .entries
            .into_iter()
            .find(|entry| !entry.gloss.trim().is_empty())
            .ok_or_else(|| ProviderError::not_found(format!("no {} entry for '{}'", dictionary, query.text)))?;

        Ok(ProviderResolution::new(entry.gloss.trim(), CONFIDENCE)
            .with_detail(json!({ "dictionary": dictionary, "etymology": entry.etymology })))
    }
}
