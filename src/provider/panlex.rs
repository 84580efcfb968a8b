use crate::language::LanguageCode;
use crate::provider::http::{endpoint, send_json};
use crate::provider::{
    map_code, ProviderAdapter, ProviderError, ProviderId, ProviderQuery, ProviderResolution,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

const CONFIDENCE: f64 = 0.80;
const RESULT_LIMIT: u32 = 5;

/// Our codes to PanLex language variety codes (without the `-000` suffix).
const VARIETIES: &[(&str, &str)] = &[
    ("fr", "fra"),
    ("es", "spa"),
    ("en", "eng"),
    ("de", "deu"),
    ("pt", "por"),
    ("yua", "yua"),
    ("quc", "quc"),
    ("cak", "cak"),
    ("mam", "mam"),
    ("qu", "quz"),
    ("quz", "quz"),
    ("quy", "quy"),
    ("nah", "nhn"),
    ("gn", "grn"),
    ("ay", "ayr"),
    ("arn", "arn"),
    ("chr", "chr"),
    ("nv", "nav"),
    ("iu", "ike"),
    ("mi", "mri"),
    ("sw", "swh"),
    ("zu", "zul"),
    ("yo", "yor"),
    ("ha", "hau"),
    ("am", "amh"),
];

#[derive(Debug, Serialize)]
struct ExprRequest<'a> {
    trans_txt: &'a str,
    trans_uid: String,
    uid: String,
    include: Vec<&'static str>,
    sort: &'static str,
    limit: u32,
}

#[derive(Debug, Deserialize)]
struct ExprResponse {
    #[serde(default)]
    result: Vec<Expression>,
}

#[derive(Debug, Deserialize)]
struct Expression {
    txt: String,
    #[serde(default)]
    trans_quality: Option<u32>,
}

/// Broad multilingual lexical database (PanLex).
pub struct PanLexAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl PanLexAdapter {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for PanLexAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::MULTILINGUAL_DATABASE
    }

    fn supports(&self, from: &LanguageCode, to: &LanguageCode) -> bool {
        from != to && map_code(VARIETIES, from).is_some() && map_code(VARIETIES, to).is_some()
    }

    async fn resolve(&self, query: &ProviderQuery<'_>) -> Result<ProviderResolution, ProviderError> {
        let (Some(from), Some(to)) = (map_code(VARIETIES, query.from), map_code(VARIETIES, query.to))
        else {
            return Err(ProviderError::unsupported_pair(query.from.as_str(), query.to.as_str()));
        };

        let body = ExprRequest {
            trans_txt: query.text,
            trans_uid: format!("{}-000", from),
            uid: format!("{}-000", to),
            include: vec!["trans_quality"],
            sort: "trans_quality desc",
            limit: RESULT_LIMIT,
        };

        let request = self
            .client
            .post(endpoint(&self.base_url, "expr"))
            .json(&body)
            .timeout(query.timeout);

        let response: ExprResponse = send_json(request, "PanLex").await?;
        let best = response
            .result
            .into_iter()
            .find(|expr| !expr.txt.trim().is_empty())
            .ok_or_else(|| ProviderError::not_found(format!("no {} expression for '{}'", to, query.text)))?;

        Ok(ProviderResolution::new(best.txt.trim(), CONFIDENCE)
            .with_detail(json!({ "variety": format!("{}-000", to), "quality": best.trans_quality })))
    }
}
