use crate::language::LanguageCode;
use crate::provider::http::send_json;
use crate::provider::{ProviderAdapter, ProviderError, ProviderId, ProviderQuery, ProviderResolution};
use async_trait::async_trait;
use serde_json::Value;

/// Used when the response carries no per-segment confidence.
const DEFAULT_CONFIDENCE: f64 = 0.8;

/// Codes the service recognizes, including the handful of indigenous
/// languages it supports.
const LANGUAGES: &[&str] = &[
    "fr", "es", "en", "de", "pt", "it", "ca", "eu", "gl", "nl", "ru", "zh", "ja", "ko", "ar", "hi",
    "sw", "zu", "xh", "yo", "ig", "ha", "am", "so", "mi", "haw", "sm", "qu", "gn", "ay", "yua",
];

/// Keyless general-purpose translator (Google Translate web endpoint).
pub struct GoogleTranslateAdapter {
    client: reqwest::Client,
    api_url: String,
}

impl GoogleTranslateAdapter {
    pub fn new(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }
}

/// Concatenate the translated segments of a `dt=t` response.
///
/// The payload is positional: `data[0]` lists segments, each
/// `[translated, original, confidence?, ...]`. The first segment's
/// confidence stands for the whole response.
fn parse_segments(data: &Value) -> Option<(String, Option<f64>)> {
    let segments = data.get(0)?.as_array()?;
    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0)?.as_str())
        .collect();
    let confidence = segments
        .first()
        .and_then(|segment| segment.get(2))
        .and_then(Value::as_f64);
    Some((text, confidence))
}

#[async_trait]
impl ProviderAdapter for GoogleTranslateAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::GENERAL_TRANSLATOR
    }

    fn supports(&self, from: &LanguageCode, to: &LanguageCode) -> bool {
        from != to && LANGUAGES.contains(&from.as_str()) && LANGUAGES.contains(&to.as_str())
    }

    async fn resolve(&self, query: &ProviderQuery<'_>) -> Result<ProviderResolution, ProviderError> {
        let request = self
            .client
            .get(&self.api_url)
            .query(&[
                ("client", "gtx"),
                ("sl", query.from.as_str()),
                ("tl", query.to.as_str()),
                ("dt", "t"),
                ("q", query.text),
            ])
            .timeout(query.timeout);

        let data: Value = send_json(request, "Google Translate").await?;
        let (text, confidence) = parse_segments(&data)
            .ok_or_else(|| ProviderError::malformed("unexpected Google Translate payload"))?;

        if text.trim().is_empty() {
            return Err(ProviderError::not_found(format!("no translation for '{}'", query.text)));
        }

        Ok(ProviderResolution::new(
            text.trim(),
            confidence.unwrap_or(DEFAULT_CONFIDENCE),
        ))
    }
}
