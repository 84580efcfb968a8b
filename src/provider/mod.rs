//! Provider adapters: uniform access to local and remote translation sources.
//!
//! # Architecture
//!
//! Every source implements [`ProviderAdapter`]. Adapters are registered in a
//! [`ProviderRegistry`] keyed by [`ProviderId`]; the orchestrator walks a plan
//! of ids and looks adapters up here.
//!
//! - Local: `curated`, `lexicon`, `core_vocabulary`
//! - Remote, keyless: `academic`, `tatoeba`, `panlex`, `glosbe`, `apertium`,
//!   `wikidata`, `omegawiki`, `google`, `ensemble`
//! - Remote, credential-gated: `systran`, `openai`
//!
//! Adapters never retry; a failed call is reported once and the orchestrator
//! moves on.

mod academic;
mod apertium;
mod core_vocabulary;
mod curated;
mod ensemble;
mod error;
mod glosbe;
mod google;
mod http;
mod lexicon;
mod omegawiki;
mod openai;
mod panlex;
mod systran;
mod tatoeba;
mod validator;
mod wikidata;

pub use academic::AcademicLexiconAdapter;
pub use apertium::ApertiumAdapter;
pub use core_vocabulary::CoreVocabularyAdapter;
pub use curated::CuratedBilingualAdapter;
pub use ensemble::EnsembleAdapter;
pub use error::{ProviderError, ProviderErrorKind};
pub use glosbe::GlosbeAdapter;
pub use google::GoogleTranslateAdapter;
pub use lexicon::LexiconAdapter;
pub use omegawiki::OmegaWikiAdapter;
pub use openai::OpenAiAdapter;
pub use panlex::PanLexAdapter;
pub use systran::SystranAdapter;
pub use tatoeba::TatoebaAdapter;
pub use validator::{ResponseValidator, ValidationReport};
pub use wikidata::WikidataAdapter;

use crate::language::LanguageCode;
use crate::matcher::MatchType;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Stable identifier of a provider adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProviderId(&'static str);

impl ProviderId {
    pub const CURATED_BILINGUAL: Self = Self("curated_bilingual");
    pub const LEXICON: Self = Self("lexicon");
    pub const CORE_VOCABULARY: Self = Self("core_vocabulary");
    pub const ACADEMIC_LEXICON: Self = Self("academic_lexicon");
    pub const EXAMPLE_CORPUS: Self = Self("example_corpus");
    pub const MULTILINGUAL_DATABASE: Self = Self("multilingual_database");
    pub const COLLABORATIVE_DICTIONARY: Self = Self("collaborative_dictionary");
    pub const RULE_BASED_TRANSLATOR: Self = Self("rule_based_translator");
    pub const STRUCTURED_DATA: Self = Self("structured_data");
    pub const DEFINITION_WIKI: Self = Self("definition_wiki");
    pub const COMMERCIAL_MT: Self = Self("commercial_mt");
    pub const LANGUAGE_MODEL: Self = Self("language_model");
    pub const GENERAL_TRANSLATOR: Self = Self("general_translator");
    pub const ENSEMBLE_MODEL: Self = Self("ensemble_model");

    /// Ad-hoc ids for adapters defined outside this crate.
    pub const fn custom(id: &'static str) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Everything an adapter needs for one call.
#[derive(Clone)]
pub struct ProviderQuery<'a> {
    pub text: &'a str,
    pub from: &'a LanguageCode,
    pub to: &'a LanguageCode,
    /// The adapter's credential, when it declares one and the request has it
    pub credential: Option<&'a str>,
    /// Budget for this call; remote adapters pass it to the HTTP client
    pub timeout: Duration,
}

impl fmt::Debug for ProviderQuery<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderQuery")
            .field("text", &self.text)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("credential", &self.credential.map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// A successful provider answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderResolution {
    pub translated_text: String,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_type: Option<MatchType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

impl ProviderResolution {
    pub fn new(translated_text: impl Into<String>, confidence: f64) -> Self {
        Self {
            translated_text: translated_text.into(),
            confidence: confidence.clamp(0.0, 1.0),
            match_type: None,
            detail: None,
        }
    }

    pub fn with_match_type(mut self, match_type: MatchType) -> Self {
        self.match_type = Some(match_type);
        self
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// A translation source.
///
/// `supports` must be cheap and side-effect free: the orchestrator calls it
/// before every attempt and skips unsupported pairs without a network call.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn id(&self) -> ProviderId;

    fn supports(&self, from: &LanguageCode, to: &LanguageCode) -> bool;

    /// Credential id this adapter needs, if any. Without it the adapter is
    /// skipped.
    fn credential(&self) -> Option<&'static str> {
        None
    }

    async fn resolve(&self, query: &ProviderQuery<'_>) -> Result<ProviderResolution, ProviderError>;
}

/// Adapters available to an engine, by id.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    adapters: HashMap<ProviderId, Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter, replacing any adapter with the same id.
    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) {
        self.adapters.insert(adapter.id(), adapter);
    }

    pub fn get(&self, id: ProviderId) -> Option<&Arc<dyn ProviderAdapter>> {
        self.adapters.get(&id)
    }

    pub fn contains(&self, id: ProviderId) -> bool {
        self.adapters.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<ProviderId> {
        let mut ids: Vec<_> = self.adapters.keys().copied().collect();
        ids.sort();
        ids
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("adapters", &self.ids())
            .finish()
    }
}

/// Look a language code up in a provider-specific code table.
pub(crate) fn map_code(table: &[(&str, &'static str)], code: &LanguageCode) -> Option<&'static str> {
    table
        .iter()
        .find(|(ours, _)| *ours == code.as_str())
        .map(|(_, theirs)| *theirs)
}
