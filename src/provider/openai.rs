use crate::language::{LanguageCode, LanguageRegistry};
use crate::provider::http::send_json;
use crate::provider::{ProviderAdapter, ProviderError, ProviderId, ProviderQuery, ProviderResolution};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

const CONFIDENCE: f64 = 0.90;
const MAX_COMPLETION_TOKENS: u32 = 500;
const REASONING_MAX_COMPLETION_TOKENS: u32 = 4000;

/// Credential id looked up in the request's credential map.
pub const CREDENTIAL: &str = "openai";

/// OpenAI Chat Completion request
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_completion_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning_effort: Option<String>,
}

/// Check if a model is a reasoning model that doesn't support temperature
fn is_reasoning_model(model: &str) -> bool {
    model.starts_with("gpt-5")
        || model.starts_with("o1")
        || model.starts_with("o3")
        || model.starts_with("o4")
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

/// Build the system prompt for a phrase translation
fn build_system_prompt(from: &str, to: &str) -> String {
    format!(
        r#"You are an expert translator specializing in indigenous and minority languages.
Translate the user's text from {} to {}.

### Rules:
- Reply with the translation only, no explanations or quotes
- Use the standard modern orthography of the target language
- Keep glottal stops and apostrophes that are part of the spelling
- If the text is a greeting or fixed expression, use the idiomatic equivalent
- If you cannot translate the text, reply with exactly: Translation unavailable"#,
        from, to
    )
}

/// General-purpose language model (OpenAI chat completions), gated on an API
/// key.
pub struct OpenAiAdapter {
    client: reqwest::Client,
    api_url: String,
    model: String,
}

impl OpenAiAdapter {
    pub fn new(client: reqwest::Client, api_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            model: model.into(),
        }
    }

    fn build_request(&self, query: &ProviderQuery<'_>) -> ChatRequest {
        let registry = LanguageRegistry::get();
        let from = registry.display_name(query.from);
        let to = registry.display_name(query.to);

        // Reasoning models need higher token limits and don't support temperature
        let is_reasoning = is_reasoning_model(&self.model);

        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: build_system_prompt(&from, &to),
                },
                Message {
                    role: "user".to_string(),
                    content: query.text.to_string(),
                },
            ],
            max_completion_tokens: if is_reasoning {
                REASONING_MAX_COMPLETION_TOKENS
            } else {
                MAX_COMPLETION_TOKENS
            },
            temperature: if is_reasoning { None } else { Some(0.3) },
            reasoning_effort: if is_reasoning {
                Some("low".to_string())
            } else {
                None
            },
        }
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::LANGUAGE_MODEL
    }

    fn supports(&self, from: &LanguageCode, to: &LanguageCode) -> bool {
        from != to
    }

    fn credential(&self) -> Option<&'static str> {
        Some(CREDENTIAL)
    }

    async fn resolve(&self, query: &ProviderQuery<'_>) -> Result<ProviderResolution, ProviderError> {
        let api_key = query
            .credential
            .ok_or_else(|| ProviderError::missing_credential(CREDENTIAL))?;

        let request = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&self.build_request(query))
            .timeout(query.timeout);

        let response: ChatResponse = send_json(request, "OpenAI").await?;
        let content = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ProviderError::malformed("OpenAI response contained no choices"))?;

        Ok(ProviderResolution::new(content.trim(), CONFIDENCE)
            .with_detail(json!({ "model": self.model })))
    }
}
