use crate::language::LanguageCode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A phrase to resolve from one language to another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionRequest {
    pub text: String,
    pub from_language: LanguageCode,
    pub to_language: LanguageCode,
    #[serde(default)]
    pub options: ResolutionOptions,
}

impl ResolutionRequest {
    pub fn new(
        text: impl Into<String>,
        from_language: impl Into<LanguageCode>,
        to_language: impl Into<LanguageCode>,
    ) -> Self {
        Self {
            text: text.into(),
            from_language: from_language.into(),
            to_language: to_language.into(),
            options: ResolutionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ResolutionOptions) -> Self {
        self.options = options;
        self
    }
}

/// Per-request switches and credentials.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolutionOptions {
    /// When false only local sources and the lexical matcher run
    pub enable_external_providers: bool,

    /// Credential id (e.g. `openai`) to secret
    #[serde(alias = "credentials")]
    pub provider_credentials: HashMap<String, String>,

    /// Try the ensemble service before the external cascade
    pub use_ensemble_mode: bool,
}

impl Default for ResolutionOptions {
    fn default() -> Self {
        Self {
            enable_external_providers: true,
            provider_credentials: HashMap::new(),
            use_ensemble_mode: false,
        }
    }
}

impl ResolutionOptions {
    /// Local sources only.
    pub fn offline() -> Self {
        Self {
            enable_external_providers: false,
            ..Self::default()
        }
    }

    pub fn with_credential(mut self, id: impl Into<String>, secret: impl Into<String>) -> Self {
        self.provider_credentials.insert(id.into(), secret.into());
        self
    }

    pub fn with_ensemble(mut self) -> Self {
        self.use_ensemble_mode = true;
        self
    }

    pub fn credential(&self, id: &str) -> Option<&str> {
        self.provider_credentials
            .get(id)
            .map(String::as_str)
            .filter(|secret| !secret.is_empty())
    }
}

// Secrets stay out of logs
impl fmt::Debug for ResolutionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut credential_ids: Vec<&str> =
            self.provider_credentials.keys().map(String::as_str).collect();
        credential_ids.sort_unstable();

        f.debug_struct("ResolutionOptions")
            .field("enable_external_providers", &self.enable_external_providers)
            .field("provider_credentials", &credential_ids)
            .field("use_ensemble_mode", &self.use_ensemble_mode)
            .finish()
    }
}
