use crate::matcher::MatcherSettings;
use anyhow::{bail, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Tuning knobs for the resolution engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// Minimum provider confidence for a result to be accepted
    pub acceptance_threshold: f64,

    /// Minimum base relevance (0-100) for the lexical matcher fallback
    pub min_lexicon_relevance: u8,

    pub fuzzy_threshold: f64,
    pub suggestion_threshold: f64,
    pub max_results: usize,
    pub max_suggestions: usize,

    /// Upper bound for a single provider call
    pub provider_timeout: Duration,

    /// Total budget for the external provider cascade
    pub request_deadline: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            acceptance_threshold: 0.5,
            min_lexicon_relevance: 50,
            fuzzy_threshold: 0.7,
            suggestion_threshold: 0.6,
            max_results: 5,
            max_suggestions: 5,
            provider_timeout: Duration::from_millis(8000),
            request_deadline: Duration::from_millis(20000),
        }
    }
}

impl EngineSettings {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("RESOLVER_ACCEPTANCE_THRESHOLD", self.acceptance_threshold),
            ("RESOLVER_FUZZY_THRESHOLD", self.fuzzy_threshold),
            ("RESOLVER_SUGGESTION_THRESHOLD", self.suggestion_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                bail!("{} must be between 0 and 1, got {}", name, value);
            }
        }
        if self.min_lexicon_relevance > 100 {
            bail!(
                "RESOLVER_MIN_LEXICON_RELEVANCE must be at most 100, got {}",
                self.min_lexicon_relevance
            );
        }
        if self.max_results == 0 {
            bail!("RESOLVER_MAX_RESULTS must be greater than 0");
        }
        if self.provider_timeout.is_zero() {
            bail!("RESOLVER_PROVIDER_TIMEOUT_MS must be greater than 0");
        }
        if self.request_deadline.is_zero() {
            bail!("RESOLVER_REQUEST_DEADLINE_MS must be greater than 0");
        }
        Ok(())
    }

    pub fn matcher_settings(&self) -> MatcherSettings {
        MatcherSettings {
            fuzzy_threshold: self.fuzzy_threshold,
            suggestion_threshold: self.suggestion_threshold,
        }
    }
}

/// Base URLs of the remote providers.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderEndpoints {
    pub openai_api_url: String,
    pub openai_model: String,
    pub google_translate_url: String,
    pub tatoeba_api_url: String,
    pub panlex_api_url: String,
    pub glosbe_api_url: String,
    pub apertium_api_url: String,
    pub wikidata_api_url: String,
    pub omegawiki_api_url: String,
    pub maya_lexicon_api_url: String,
    pub systran_api_url: String,
    pub ensemble_api_url: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            openai_api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
            google_translate_url: "https://translate.googleapis.com/translate_a/single".to_string(),
            tatoeba_api_url: "https://tatoeba.org/api_v0".to_string(),
            panlex_api_url: "https://api.panlex.org/v2".to_string(),
            glosbe_api_url: "https://glosbe.com/gapi".to_string(),
            apertium_api_url: "https://www.apertium.org/apy".to_string(),
            wikidata_api_url: "https://www.wikidata.org/w/api.php".to_string(),
            omegawiki_api_url: "http://www.omegawiki.org/api.php".to_string(),
            maya_lexicon_api_url: "https://maya.nmai.si.edu/api".to_string(),
            systran_api_url: "https://api-platform.systran.net".to_string(),
            ensemble_api_url: "http://localhost:8001".to_string(),
        }
    }
}

impl ProviderEndpoints {
    /// Point every endpoint at one base URL (mock servers in tests).
    pub fn all_at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            openai_api_url: format!("{}/v1/chat/completions", base),
            openai_model: "gpt-4o-mini".to_string(),
            google_translate_url: format!("{}/translate_a/single", base),
            tatoeba_api_url: format!("{}/tatoeba", base),
            panlex_api_url: format!("{}/panlex", base),
            glosbe_api_url: format!("{}/glosbe", base),
            apertium_api_url: format!("{}/apertium", base),
            wikidata_api_url: format!("{}/wikidata/api.php", base),
            omegawiki_api_url: format!("{}/omegawiki/api.php", base),
            maya_lexicon_api_url: format!("{}/maya", base),
            systran_api_url: format!("{}/systran", base),
            ensemble_api_url: format!("{}/ensemble", base),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    // Engine tuning
    pub settings: EngineSettings,

    // Corpus data (bundled reference data when unset)
    pub lexicon_path: Option<PathBuf>,
    pub curated_lexicon_path: Option<PathBuf>,

    // Remote providers
    pub endpoints: ProviderEndpoints,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = EngineSettings::default();
        let endpoints = ProviderEndpoints::default();

        let settings = EngineSettings {
            acceptance_threshold: env_parse("RESOLVER_ACCEPTANCE_THRESHOLD")
                .unwrap_or(defaults.acceptance_threshold),
            min_lexicon_relevance: env_parse("RESOLVER_MIN_LEXICON_RELEVANCE")
                .unwrap_or(defaults.min_lexicon_relevance),
            fuzzy_threshold: env_parse("RESOLVER_FUZZY_THRESHOLD")
                .unwrap_or(defaults.fuzzy_threshold),
            suggestion_threshold: env_parse("RESOLVER_SUGGESTION_THRESHOLD")
                .unwrap_or(defaults.suggestion_threshold),
            max_results: env_parse("RESOLVER_MAX_RESULTS").unwrap_or(defaults.max_results),
            max_suggestions: env_parse("RESOLVER_MAX_SUGGESTIONS")
                .unwrap_or(defaults.max_suggestions),
            provider_timeout: env_parse("RESOLVER_PROVIDER_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.provider_timeout),
            request_deadline: env_parse("RESOLVER_REQUEST_DEADLINE_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_deadline),
        };
        settings.validate()?;

        Ok(Self {
            settings,

            lexicon_path: std::env::var("LEXICON_PATH").ok().map(PathBuf::from),
            curated_lexicon_path: std::env::var("CURATED_LEXICON_PATH")
                .ok()
                .map(PathBuf::from),

            endpoints: ProviderEndpoints {
                openai_api_url: env_or("OPENAI_API_URL", endpoints.openai_api_url),
                openai_model: env_or("OPENAI_MODEL", endpoints.openai_model),
                google_translate_url: env_or("GOOGLE_TRANSLATE_URL", endpoints.google_translate_url),
                tatoeba_api_url: env_or("TATOEBA_API_URL", endpoints.tatoeba_api_url),
                panlex_api_url: env_or("PANLEX_API_URL", endpoints.panlex_api_url),
                glosbe_api_url: env_or("GLOSBE_API_URL", endpoints.glosbe_api_url),
                apertium_api_url: env_or("APERTIUM_API_URL", endpoints.apertium_api_url),
                wikidata_api_url: env_or("WIKIDATA_API_URL", endpoints.wikidata_api_url),
                omegawiki_api_url: env_or("OMEGAWIKI_API_URL", endpoints.omegawiki_api_url),
                maya_lexicon_api_url: env_or("MAYA_LEXICON_API_URL", endpoints.maya_lexicon_api_url),
                systran_api_url: env_or("SYSTRAN_API_URL", endpoints.systran_api_url),
                ensemble_api_url: env_or("ENSEMBLE_API_URL", endpoints.ensemble_api_url),
            },
        })
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

fn env_or(name: &str, default: String) -> String {
    std::env::var(name).unwrap_or(default)
}
