use crate::language::LanguageCode;
use crate::provider::http::{endpoint, send_json};
use crate::provider::{
    map_code, ProviderAdapter, ProviderError, ProviderId, ProviderQuery, ProviderResolution,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const CONFIDENCE: f64 = 0.75;

/// Confidence when some words came back untranslated.
const PARTIAL_CONFIDENCE: f64 = 0.6;

/// Marker Apertium puts in front of unknown words.
const UNKNOWN_MARKER: char = '*';

const CODES: &[(&str, &str)] = &[
    ("es", "spa"),
    ("en", "eng"),
    ("fr", "fra"),
    ("ca", "cat"),
    ("pt", "por"),
    ("it", "ita"),
    ("eu", "eus"),
    ("quc", "quc"),
    ("gn", "grn"),
    ("ay", "aym"),
    ("qu", "quz"),
    ("nah", "nah"),
];

/// Installed language pairs (their codes).
const PAIRS: &[(&str, &str)] = &[
    ("spa", "quc"),
    ("spa", "grn"),
    ("spa", "aym"),
    ("spa", "quz"),
    ("spa", "nah"),
    ("spa", "cat"),
    ("cat", "spa"),
    ("spa", "eng"),
    ("eng", "spa"),
    ("fra", "spa"),
    ("spa", "fra"),
    ("fra", "cat"),
    ("por", "spa"),
    ("spa", "por"),
    ("ita", "spa"),
    ("eus", "spa"),
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    response_data: Option<ResponseData>,
    response_details: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    translated_text: String,
}

/// Free rule-based machine translation (Apertium APy).
pub struct ApertiumAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl ApertiumAdapter {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn pair(from: &LanguageCode, to: &LanguageCode) -> Option<(&'static str, &'static str)> {
        let pair = (map_code(CODES, from)?, map_code(CODES, to)?);
        PAIRS.contains(&pair).then_some(pair)
    }
}

/// Strip unknown-word markers; returns the cleaned text and the
/// (unknown, total) word counts.
fn strip_unknown(text: &str) -> (String, usize, usize) {
    let mut unknown = 0;
    let mut total = 0;
    let words: Vec<&str> = text
        .split_whitespace()
        .map(|word| {
            total += 1;
            match word.strip_prefix(UNKNOWN_MARKER) {
                Some(stripped) => {
                    unknown += 1;
                    stripped
                }
                None => word,
            }
        })
        .collect();
    (words.join(" "), unknown, total)
}

#[async_trait]
impl ProviderAdapter for ApertiumAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::RULE_BASED_TRANSLATOR
    }

    fn supports(&self, from: &LanguageCode, to: &LanguageCode) -> bool {
        Self::pair(from, to).is_some()
    }

    async fn resolve(&self, query: &ProviderQuery<'_>) -> Result<ProviderResolution, ProviderError> {
        let (from, to) = Self::pair(query.from, query.to)
            .ok_or_else(|| ProviderError::unsupported_pair(query.from.as_str(), query.to.as_str()))?;
        let langpair = format!("{}|{}", from, to);

        let request = self
            .client
            .get(endpoint(&self.base_url, "translate"))
            .query(&[("langpair", langpair.as_str()), ("q", query.text)])
            .timeout(query.timeout);

        let response: TranslateResponse = send_json(request, "Apertium").await?;
        let data = response.response_data.ok_or_else(|| {
            ProviderError::malformed(
                response
                    .response_details
                    .unwrap_or_else(|| "missing responseData".to_string()),
            )
        })?;

        let (text, unknown, total) = strip_unknown(&data.translated_text);
        if total == 0 || unknown == total {
            return Err(ProviderError::not_found(format!(
                "{} has no rule coverage for '{}'",
                langpair, query.text
            )));
        }

        let confidence = if unknown > 0 { PARTIAL_CONFIDENCE } else { CONFIDENCE };
        Ok(ProviderResolution::new(text, confidence)
            .with_detail(json!({ "langpair": langpair, "unknownWords": unknown })))
    }
}
