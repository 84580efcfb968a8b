use crate::language::LanguageCode;
use crate::provider::http::send_json;
use crate::provider::{
    map_code, ProviderAdapter, ProviderError, ProviderId, ProviderQuery, ProviderResolution,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const CONFIDENCE: f64 = 0.70;

/// OmegaWiki language ids.
const LANGUAGE_IDS: &[(&str, &str)] = &[
    ("de", "104"),
    ("en", "85"),
    ("es", "87"),
    ("fr", "86"),
    ("it", "90"),
    ("pt", "89"),
    ("nah", "1254"),
    ("qu", "1162"),
    ("gn", "1126"),
    ("ay", "1076"),
    ("eu", "111"),
];

#[derive(Debug, Deserialize)]
struct ExpressResponse {
    ow_express: Option<Express>,
}

#[derive(Debug, Deserialize)]
struct Express {
    #[serde(default)]
    translations: Vec<Expression>,
    definition: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Expression {
    expression: String,
}

/// Multilingual definition wiki (OmegaWiki).
pub struct OmegaWikiAdapter {
    client: reqwest::Client,
    api_url: String,
}

impl OmegaWikiAdapter {
    pub fn new(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for OmegaWikiAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::DEFINITION_WIKI
    }

    fn supports(&self, from: &LanguageCode, to: &LanguageCode) -> bool {
        from != to && map_code(LANGUAGE_IDS, from).is_some() && map_code(LANGUAGE_IDS, to).is_some()
    }

    async fn resolve(&self, query: &ProviderQuery<'_>) -> Result<ProviderResolution, ProviderError> {
        let (Some(lang), Some(target)) =
            (map_code(LANGUAGE_IDS, query.from), map_code(LANGUAGE_IDS, query.to))
        else {
            return Err(ProviderError::unsupported_pair(query.from.as_str(), query.to.as_str()));
        };

        let request = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "ow_express"),
                ("search", query.text),
                ("lang", lang),
                ("target", target),
                ("format", "json"),
            ])
            .timeout(query.timeout);

        let response: ExpressResponse = send_json(request, "OmegaWiki").await?;
        let express = response
            .ow_express
            .ok_or_else(|| ProviderError::not_found(format!("no expression '{}'", query.text)))?;

        let expression = express
            .translations
            .into_iter()
            .map(|t| t.expression)
            .find(|text| !text.trim().is_empty())
            .ok_or_else(|| {
                ProviderError::not_found(format!("'{}' has no {} translation", query.text, query.to))
            })?;

        Ok(ProviderResolution::new(expression.trim(), CONFIDENCE)
            .with_detail(json!({ "definition": express.definition })))
    }
}
