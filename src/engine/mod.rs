//! Resolution engine: runs the provider plan for a request and falls back to
//! the lexical matcher.
//!
//! # Architecture
//!
//! 1. Inputs with no letters or digits get a clarification result
//! 2. The pair is classified and a plan of provider ids is composed
//!    (local tier, optional ensemble, class-specific external cascade)
//! 3. Providers run one at a time under the per-call timeout and the request
//!    deadline; the first valid answer above the acceptance threshold wins
//! 4. Otherwise the lexical matcher's best candidate is accepted when
//!    relevant enough
//! 5. Otherwise a structured miss with suggestions and recommendations
//!
//! Any fault or panic in steps 1-5 lands on the emergency path, which only
//! uses direct lexicon matching. `translate` never fails.
//!
//! # Example
//!
//! ```rust,no_run
//! use phrase_resolver::engine::{EngineBuilder, ResolutionOptions, ResolutionRequest};
//! use phrase_resolver::lexicon::LexiconStore;
//! use phrase_resolver::language::LanguageRegistry;
//! use phrase_resolver::text::Normalizer;
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let normalizer = Normalizer::from_registry(LanguageRegistry::get());
//! let store = Arc::new(LexiconStore::reference(normalizer)?);
//! let engine = EngineBuilder::new(store).build();
//!
//! let request = ResolutionRequest::new("bonjour", "fr", "yua")
//!     .with_options(ResolutionOptions::offline());
//! let result = engine.translate(request).await;
//! assert_eq!(result.translated_text, "Ba'ax ka wa'alik");
//! # Ok(())
//! # }
//! ```

mod plan;
mod request;
mod result;

pub use plan::{compose as compose_plan, external_plan, LOCAL_TIER};
pub use request::{ResolutionOptions, ResolutionRequest};
pub use result::{AttemptOutcome, AttemptRecord, Diagnostics, ResolutionResult};

use crate::config::{Config, EngineSettings, ProviderEndpoints};
use crate::language::{LanguageCode, LanguageRegistry};
use crate::lexicon::{CuratedList, LexiconStore};
use crate::matcher::{LexicalMatcher, MatchType};
use crate::metrics::ResolutionMetrics;
use crate::provider::{
    AcademicLexiconAdapter, ApertiumAdapter, CoreVocabularyAdapter, CuratedBilingualAdapter,
    EnsembleAdapter, GlosbeAdapter, GoogleTranslateAdapter, LexiconAdapter, OmegaWikiAdapter,
    OpenAiAdapter, PanLexAdapter, ProviderAdapter, ProviderError, ProviderId, ProviderQuery,
    ProviderRegistry, ProviderResolution, ResponseValidator, SystranAdapter, TatoebaAdapter,
    WikidataAdapter,
};
use crate::text::Normalizer;
use anyhow::{Context, Result};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Provider names for results that did not come from an adapter.
pub const LEXICON_SEARCH: &str = "lexicon_search";
pub const CLARIFICATION: &str = "clarification";
pub const EMERGENCY_FALLBACK: &str = "emergency_fallback";
pub const NO_PROVIDER: &str = "none";

const FALLBACK_CONFIDENCE_CAP: f64 = 0.75;
const EMERGENCY_CONFIDENCE_CAP: f64 = 0.3;

/// Offered when nothing similar to the input exists.
pub const EXAMPLE_PHRASES: &[&str] = &[
    "bonjour",
    "merci",
    "comment allez-vous",
    "aidez-moi",
    "où est",
];

/// Internal failure inside the cascade. Never escapes `translate`.
#[derive(Debug, Error)]
pub enum EngineFault {
    #[error("resolution panicked: {0}")]
    Panicked(String),

    #[error("lexicon candidate '{0}' has an empty translation")]
    EmptyCandidate(String),
}

/// Result fields decided by one of the resolution steps.
struct Resolution {
    text: String,
    confidence: f64,
    provider: String,
    resolved: bool,
    match_type: Option<MatchType>,
    suggestions: Vec<String>,
    recommendations: Vec<String>,
    error: Option<String>,
}

impl Resolution {
    fn unavailable(text: &str) -> String {
        format!("Translation unavailable for \"{}\"", text)
    }
}

pub struct Engine {
    store: Arc<LexiconStore>,
    matcher: LexicalMatcher,
    providers: ProviderRegistry,
    languages: &'static LanguageRegistry,
    settings: EngineSettings,
    metrics: ResolutionMetrics,
}

impl Engine {
    /// Build an engine from configuration: corpus files (or bundled data) and
    /// every provider at its configured endpoint.
    pub fn from_config(config: &Config) -> Result<Self> {
        let languages = LanguageRegistry::get();
        let normalizer = Normalizer::from_registry(languages);

        let store = match &config.lexicon_path {
            Some(path) => LexiconStore::from_path(path, normalizer.clone())
                .with_context(|| format!("Failed to load lexicon from {}", path.display()))?,
            None => LexiconStore::reference(normalizer.clone())
                .context("Failed to load bundled reference lexicon")?,
        };

        let curated = match &config.curated_lexicon_path {
            Some(path) => CuratedList::from_path(path, normalizer)
                .with_context(|| format!("Failed to load curated list from {}", path.display()))?,
            None => CuratedList::reference(normalizer)
                .context("Failed to load bundled curated list")?,
        };

        let client = reqwest::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(EngineBuilder::new(Arc::new(store))
            .with_settings(config.settings.clone())
            .with_curated(Arc::new(curated))
            .with_default_providers(client, &config.endpoints)
            .build())
    }

    pub fn store(&self) -> &Arc<LexiconStore> {
        &self.store
    }

    pub fn matcher(&self) -> &LexicalMatcher {
        &self.matcher
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn metrics(&self) -> &ResolutionMetrics {
        &self.metrics
    }

    /// Plan the engine would run for a pair.
    pub fn plan(
        &self,
        from: &LanguageCode,
        to: &LanguageCode,
        options: &ResolutionOptions,
    ) -> Vec<ProviderId> {
        compose_plan(self.languages.classify(from, to), options, &self.providers)
    }

    /// Resolve with default options.
    pub async fn translate_text(
        &self,
        text: &str,
        from: impl Into<LanguageCode>,
        to: impl Into<LanguageCode>,
    ) -> ResolutionResult {
        self.translate(ResolutionRequest::new(text, from, to)).await
    }

    /// Resolve a request. Always produces a result.
    pub async fn translate(&self, request: ResolutionRequest) -> ResolutionResult {
        let started = Instant::now();
        let deadline = started + self.settings.request_deadline;
        self.metrics.record_request();

        let class = self
            .languages
            .classify(&request.from_language, &request.to_language);
        let mut diagnostics = Diagnostics::new(class);

        info!(
            "Resolving {:?} ({} -> {}, {})",
            request.text, request.from_language, request.to_language, class
        );

        let outcome = AssertUnwindSafe(self.resolve(&request, deadline, &mut diagnostics))
            .catch_unwind()
            .await;

        let resolution = match outcome {
            Ok(Ok(resolution)) => resolution,
            Ok(Err(fault)) => self.emergency(&request, &fault, &mut diagnostics),
            Err(panic) => {
                let fault = EngineFault::Panicked(panic_message(panic.as_ref()));
                self.emergency(&request, &fault, &mut diagnostics)
            }
        };

        diagnostics.elapsed_ms = elapsed_ms(started);
        info!(
            "Resolved via {} (confidence {:.2}, resolved: {}) in {} ms",
            resolution.provider, resolution.confidence, resolution.resolved, diagnostics.elapsed_ms
        );

        ResolutionResult {
            translated_text: resolution.text,
            original_text: request.text,
            from_language: request.from_language,
            to_language: request.to_language,
            confidence: resolution.confidence,
            provider: resolution.provider,
            resolved: resolution.resolved,
            match_type: resolution.match_type,
            suggestions: resolution.suggestions,
            recommendations: resolution.recommendations,
            error: resolution.error,
            diagnostics,
        }
    }

    async fn resolve(
        &self,
        request: &ResolutionRequest,
        deadline: Instant,
        diagnostics: &mut Diagnostics,
    ) -> Result<Resolution, EngineFault> {
        let normalized = self
            .store
            .normalizer()
            .normalize(&request.text, &request.from_language);
        if normalized.is_empty() {
            info!("Input has nothing to translate, asking for clarification");
            diagnostics.note("input contains no letters or digits");
            self.metrics.record_miss();
            return Ok(self.clarification());
        }

        let plan = compose_plan(diagnostics.priority_class, &request.options, &self.providers);
        debug!("Plan: {:?}", plan);
        diagnostics.plan = plan.clone();

        if let Some(accepted) = self.run_plan(&plan, request, deadline, diagnostics).await {
            return Ok(accepted);
        }
        self.metrics.record_lexicon_miss();

        if let Some(found) = self.lexicon_search(request, diagnostics)? {
            self.metrics.record_fallback_hit();
            return Ok(found);
        }

        self.metrics.record_miss();
        Ok(self.miss(request))
    }

    /// Try each provider in order; the first acceptable answer wins.
    async fn run_plan(
        &self,
        plan: &[ProviderId],
        request: &ResolutionRequest,
        deadline: Instant,
        diagnostics: &mut Diagnostics,
    ) -> Option<Resolution> {
        let (from, to) = (&request.from_language, &request.to_language);

        for &id in plan {
            let Some(adapter) = self.providers.get(id) else {
                continue;
            };

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                warn!("Request deadline reached, not starting {}", id);
                diagnostics.deadline_exceeded = true;
                diagnostics.note(format!("deadline reached before {}", id));
                break;
            }

            if !adapter.supports(from, to) {
                self.skip(id, "unsupported pair".to_string(), diagnostics);
                continue;
            }

            let credential = match adapter.credential() {
                Some(credential_id) => match request.options.credential(credential_id) {
                    Some(secret) => Some(secret),
                    None => {
                        self.skip(id, format!("missing credential '{}'", credential_id), diagnostics);
                        continue;
                    }
                },
                None => None,
            };

            let query = ProviderQuery {
                text: &request.text,
                from,
                to,
                credential,
                timeout: self.settings.provider_timeout.min(remaining),
            };

            if let Some(accepted) = self.attempt(id, adapter.as_ref(), &query, diagnostics).await {
                if LOCAL_TIER.contains(&id) {
                    self.metrics.record_lexicon_hit();
                }
                return Some(accepted);
            }
        }

        None
    }

    /// One provider call, recorded in diagnostics.
    async fn attempt(
        &self,
        id: ProviderId,
        adapter: &dyn ProviderAdapter,
        query: &ProviderQuery<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Option<Resolution> {
        debug!("Trying {} (timeout {} ms)", id, query.timeout.as_millis());
        self.metrics.record_provider_call();
        let started = Instant::now();

        let outcome = match tokio::time::timeout(query.timeout, adapter.resolve(query)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ProviderError::timeout(format!(
                "no answer within {} ms",
                query.timeout.as_millis()
            ))),
        };
        let elapsed = elapsed_ms(started);

        let resolution = match outcome {
            Ok(resolution) => resolution,
            Err(error) => {
                if error.is_unavailable() {
                    warn!("{} failed: {}", id, error);
                } else {
                    debug!("{} had no answer: {}", id, error);
                }
                self.metrics.record_provider_failure();
                diagnostics.record(id, AttemptOutcome::Failed { error }, elapsed);
                return None;
            }
        };

        match self.review(id, query.text, &resolution, diagnostics) {
            Ok(()) => {
                info!("Accepted {} (confidence {:.2})", id, resolution.confidence);
                diagnostics.record(
                    id,
                    AttemptOutcome::Accepted {
                        confidence: resolution.confidence,
                    },
                    elapsed,
                );
                Some(Resolution {
                    text: resolution.translated_text,
                    confidence: resolution.confidence,
                    provider: id.to_string(),
                    resolved: true,
                    match_type: resolution.match_type,
                    suggestions: Vec::new(),
                    recommendations: Vec::new(),
                    error: None,
                })
            }
            Err(reason) => {
                debug!("Rejected {}: {}", id, reason);
                diagnostics.record(id, AttemptOutcome::Rejected { reason }, elapsed);
                None
            }
        }
    }

    /// Validate a provider answer and check it against the acceptance
    /// threshold.
    fn review(
        &self,
        id: ProviderId,
        original: &str,
        resolution: &ProviderResolution,
        diagnostics: &mut Diagnostics,
    ) -> std::result::Result<(), String> {
        let report = ResponseValidator::validate(original, &resolution.translated_text);
        if report.has_errors() {
            self.metrics.record_provider_failure();
            return Err(report.errors.join("; "));
        }
        for warning in report.warnings {
            warn!("{} response warning: {}", id, warning);
            diagnostics.note(format!("{}: {}", id, warning));
        }

        if resolution.confidence < self.settings.acceptance_threshold {
            return Err(format!(
                "confidence {:.2} below threshold {:.2}",
                resolution.confidence, self.settings.acceptance_threshold
            ));
        }
        Ok(())
    }

    fn skip(&self, id: ProviderId, reason: String, diagnostics: &mut Diagnostics) {
        debug!("Skipping {}: {}", id, reason);
        self.metrics.record_provider_skip();
        diagnostics.record(id, AttemptOutcome::Skipped { reason }, 0);
    }

    /// Best lexical matcher candidate, if relevant enough.
    fn lexicon_search(
        &self,
        request: &ResolutionRequest,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<Resolution>, EngineFault> {
        let candidates = self.matcher.find_matches(
            &request.text,
            &request.from_language,
            &request.to_language,
            self.settings.max_results,
        );

        let Some(top) = candidates.into_iter().next() else {
            debug!("Lexicon search found no candidates");
            return Ok(None);
        };

        if top.relevance < self.settings.min_lexicon_relevance {
            diagnostics.note(format!(
                "best lexicon candidate \"{}\" below relevance {} ({})",
                top.source_phrase, self.settings.min_lexicon_relevance, top.relevance
            ));
            return Ok(None);
        }

        if top.translation.trim().is_empty() {
            return Err(EngineFault::EmptyCandidate(top.source_phrase));
        }

        info!(
            "Lexicon search matched \"{}\" ({}, relevance {})",
            top.source_phrase,
            top.match_type.as_str(),
            top.relevance
        );
        diagnostics.note(format!("approximate match with \"{}\"", top.source_phrase));

        Ok(Some(Resolution {
            text: top.translation,
            confidence: (f64::from(top.relevance) / 100.0).min(FALLBACK_CONFIDENCE_CAP),
            provider: LEXICON_SEARCH.to_string(),
            resolved: true,
            match_type: Some(top.match_type),
            suggestions: self.similar_phrases(request),
            recommendations: Vec::new(),
            error: None,
        }))
    }

    fn miss(&self, request: &ResolutionRequest) -> Resolution {
        let (from, to) = (&request.from_language, &request.to_language);
        info!("No translation found for {:?}", request.text);

        let mut suggestions = self.similar_phrases(request);
        if suggestions.is_empty() {
            suggestions = example_phrases();
        }

        Resolution {
            text: Resolution::unavailable(&request.text),
            confidence: 0.0,
            provider: NO_PROVIDER.to_string(),
            resolved: false,
            match_type: None,
            suggestions,
            recommendations: self.languages.recommendations(from, to),
            error: Some(format!(
                "No translation found ({} -> {})",
                self.languages.display_name(from),
                self.languages.display_name(to)
            )),
        }
    }

    fn clarification(&self) -> Resolution {
        Resolution {
            text: String::new(),
            confidence: 0.0,
            provider: CLARIFICATION.to_string(),
            resolved: false,
            match_type: None,
            suggestions: example_phrases(),
            recommendations: Vec::new(),
            error: Some("Input contains no words to translate".to_string()),
        }
    }

    /// Direct lexicon matching only, capped confidence.
    fn emergency(
        &self,
        request: &ResolutionRequest,
        fault: &EngineFault,
        diagnostics: &mut Diagnostics,
    ) -> Resolution {
        error!("Engine fault while resolving {:?}: {}", request.text, fault);
        self.metrics.record_emergency_fallback();
        diagnostics.note(format!("emergency fallback after engine fault: {}", fault));

        let candidates = std::panic::catch_unwind(AssertUnwindSafe(|| {
            self.matcher.find_direct(
                &request.text,
                &request.from_language,
                &request.to_language,
                1,
            )
        }))
        .unwrap_or_default();

        let error = Some(format!("Engine fault: {}", fault));
        match candidates.into_iter().next() {
            Some(top) if !top.translation.trim().is_empty() => Resolution {
                text: top.translation,
                confidence: (f64::from(top.relevance) / 100.0).min(EMERGENCY_CONFIDENCE_CAP),
                provider: EMERGENCY_FALLBACK.to_string(),
                resolved: true,
                match_type: Some(top.match_type),
                suggestions: Vec::new(),
                recommendations: Vec::new(),
                error,
            },
            _ => {
                self.metrics.record_miss();
                Resolution {
                    text: Resolution::unavailable(&request.text),
                    confidence: 0.0,
                    provider: EMERGENCY_FALLBACK.to_string(),
                    resolved: false,
                    match_type: None,
                    suggestions: example_phrases(),
                    recommendations: Vec::new(),
                    error,
                }
            }
        }
    }

    fn similar_phrases(&self, request: &ResolutionRequest) -> Vec<String> {
        self.matcher
            .suggest(
                &request.text,
                &request.from_language,
                &request.to_language,
                self.settings.max_suggestions,
            )
            .into_iter()
            .map(|s| s.phrase)
            .collect()
    }
}

fn example_phrases() -> Vec<String> {
    EXAMPLE_PHRASES.iter().map(|p| p.to_string()).collect()
}

fn elapsed_ms(since: Instant) -> u64 {
    u64::try_from(since.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Assembles an [`Engine`] from a lexicon store and adapters.
///
/// The lexicon and core vocabulary adapters are registered from the store.
/// Remote adapters and the curated list are opt-in.
pub struct EngineBuilder {
    store: Arc<LexiconStore>,
    settings: EngineSettings,
    providers: ProviderRegistry,
}

impl EngineBuilder {
    pub fn new(store: Arc<LexiconStore>) -> Self {
        let mut providers = ProviderRegistry::new();
        providers.register(Arc::new(LexiconAdapter::new(store.clone())));
        providers.register(Arc::new(CoreVocabularyAdapter::new(store.clone())));

        Self {
            store,
            settings: EngineSettings::default(),
            providers,
        }
    }

    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_curated(mut self, list: Arc<CuratedList>) -> Self {
        self.providers
            .register(Arc::new(CuratedBilingualAdapter::new(list)));
        self
    }

    /// Register an adapter, replacing any adapter with the same id.
    pub fn with_provider(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.providers.register(adapter);
        self
    }

    /// Register every remote adapter at the given endpoints.
    pub fn with_default_providers(self, client: reqwest::Client, endpoints: &ProviderEndpoints) -> Self {
        let remote: Vec<Arc<dyn ProviderAdapter>> = vec![
            Arc::new(AcademicLexiconAdapter::new(
                client.clone(),
                &endpoints.maya_lexicon_api_url,
            )),
            Arc::new(TatoebaAdapter::new(client.clone(), &endpoints.tatoeba_api_url)),
            Arc::new(PanLexAdapter::new(client.clone(), &endpoints.panlex_api_url)),
            Arc::new(GlosbeAdapter::new(client.clone(), &endpoints.glosbe_api_url)),
            Arc::new(ApertiumAdapter::new(client.clone(), &endpoints.apertium_api_url)),
            Arc::new(WikidataAdapter::new(client.clone(), &endpoints.wikidata_api_url)),
            Arc::new(OmegaWikiAdapter::new(client.clone(), &endpoints.omegawiki_api_url)),
            Arc::new(SystranAdapter::new(client.clone(), &endpoints.systran_api_url)),
            Arc::new(OpenAiAdapter::new(
                client.clone(),
                &endpoints.openai_api_url,
                &endpoints.openai_model,
            )),
            Arc::new(GoogleTranslateAdapter::new(
                client.clone(),
                &endpoints.google_translate_url,
            )),
            Arc::new(EnsembleAdapter::new(client, &endpoints.ensemble_api_url)),
        ];

        remote
            .into_iter()
            .fold(self, |builder, adapter| builder.with_provider(adapter))
    }

    pub fn build(self) -> Engine {
        let matcher = LexicalMatcher::new(self.store.clone(), self.settings.matcher_settings());
        info!(
            "Engine ready: {} phrases, providers {:?}",
            self.store.len(),
            self.providers.ids()
        );

        Engine {
            store: self.store,
            matcher,
            providers: self.providers,
            languages: LanguageRegistry::get(),
            settings: self.settings,
            metrics: ResolutionMetrics::new(),
        }
    }
}
