use crate::language::LanguageCode;
use crate::provider::http::{endpoint, send_json};
use crate::provider::{
    map_code, ProviderAdapter, ProviderError, ProviderId, ProviderQuery, ProviderResolution,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const CONFIDENCE: f64 = 0.78;

const CODES: &[(&str, &str)] = &[
    ("fr", "fra"),
    ("es", "spa"),
    ("en", "eng"),
    ("de", "deu"),
    ("pt", "por"),
    ("it", "ita"),
    ("yua", "yua"),
    ("quc", "quc"),
    ("cak", "cak"),
    ("nah", "nah"),
    ("qu", "que"),
    ("gn", "grn"),
    ("ay", "aym"),
    ("mi", "mri"),
    ("sw", "swa"),
];

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(default)]
    tuc: Vec<Tuc>,
}

#[derive(Debug, Deserialize)]
struct Tuc {
    phrase: Option<Phrase>,
    #[serde(default)]
    meanings: Vec<Phrase>,
}

#[derive(Debug, Deserialize)]
struct Phrase {
    text: String,
}

/// Collaborative dictionary (Glosbe).
pub struct GlosbeAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl GlosbeAdapter {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for GlosbeAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::COLLABORATIVE_DICTIONARY
    }

    fn supports(&self, from: &LanguageCode, to: &LanguageCode) -> bool {
        from != to && map_code(CODES, from).is_some() && map_code(CODES, to).is_some()
    }

    async fn resolve(&self, query: &ProviderQuery<'_>) -> Result<ProviderResolution, ProviderError> {
        let (Some(from), Some(dest)) = (map_code(CODES, query.from), map_code(CODES, query.to)) else {
            return Err(ProviderError::unsupported_pair(query.from.as_str(), query.to.as_str()));
        };

        let request = self
            .client
            .get(endpoint(&self.base_url, "translate"))
            .query(&[
                ("from", from),
                ("dest", dest),
                ("format", "json"),
                ("phrase", query.text),
            ])
            .timeout(query.timeout);

        let response: TranslateResponse = send_json(request, "Glosbe").await?;

        let mut phrases = response.tuc.into_iter().filter_map(|tuc| {
            let meaning = tuc.meanings.into_iter().next().map(|m| m.text);
            tuc.phrase.map(|p| (p.text, meaning))
        });

        let (text, meaning) = phrases
            .find(|(text, _)| !text.trim().is_empty())
            .ok_or_else(|| ProviderError::not_found(format!("no {} entry for '{}'", dest, query.text)))?;

        Ok(ProviderResolution::new(text.trim(), CONFIDENCE).with_detail(json!({ "meaning": meaning })))
    }
}
