use crate::language::LanguageCode;
use crate::provider::http::{endpoint, send_json};
use crate::provider::{
    map_code, ProviderAdapter, ProviderError, ProviderId, ProviderQuery, ProviderResolution,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const CONFIDENCE: f64 = 0.85;

/// Our codes to the corpus' ISO 639-3 codes.
const CODES: &[(&str, &str)] = &[
    ("fr", "fra"),
    ("es", "spa"),
    ("en", "eng"),
    ("de", "deu"),
    ("pt", "por"),
    ("yua", "yua"),
    ("quc", "quc"),
    ("cak", "cak"),
    ("nah", "nah"),
    ("qu", "que"),
    ("gn", "grn"),
    ("ay", "aym"),
];

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Sentence>,
}

#[derive(Debug, Deserialize)]
struct Sentence {
    text: String,
    /// Direct and indirect translations, grouped
    #[serde(default)]
    translations: Vec<Vec<Translation>>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    text: String,
    lang: Option<String>,
}

/// Community example-sentence corpus (Tatoeba).
pub struct TatoebaAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl TatoebaAdapter {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for TatoebaAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::EXAMPLE_CORPUS
    }

    fn supports(&self, from: &LanguageCode, to: &LanguageCode) -> bool {
        from != to && map_code(CODES, from).is_some() && map_code(CODES, to).is_some()
    }

    async fn resolve(&self, query: &ProviderQuery<'_>) -> Result<ProviderResolution, ProviderError> {
        let (Some(from), Some(to)) = (map_code(CODES, query.from), map_code(CODES, query.to)) else {
            return Err(ProviderError::unsupported_pair(query.from.as_str(), query.to.as_str()));
        };

        let request = self
            .client
            .get(endpoint(&self.base_url, "search"))
            .query(&[("from", from), ("to", to), ("query", query.text)])
            .timeout(query.timeout);

        let response: SearchResponse = send_json(request, "Tatoeba").await?;

        response
            .results
            .into_iter()
            .find_map(|sentence| {
                let source = sentence.text;
                sentence
                    .translations
                    .into_iter()
                    .flatten()
                    .find(|t| t.lang.as_deref() == Some(to) && !t.text.trim().is_empty())
                    .map(|t| {
                        ProviderResolution::new(t.text.trim(), CONFIDENCE)
                            .with_detail(json!({ "exampleSentence": source }))
                    })
            })
            .ok_or_else(|| ProviderError::not_found(format!("no {} example for '{}'", to, query.text)))
    }
}
