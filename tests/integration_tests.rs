//! Integration tests for the phrase resolver
//!
//! These tests drive the public engine API end to end: bundled lexicon data,
//! provider plans, remote adapters against mock servers, and the fallback and
//! emergency paths.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use phrase_resolver::config::{Config, EngineSettings, ProviderEndpoints};
use phrase_resolver::engine::{
    AttemptOutcome, Engine, EngineBuilder, ResolutionOptions, ResolutionRequest,
    EMERGENCY_FALLBACK, LEXICON_SEARCH, NO_PROVIDER,
};
use phrase_resolver::language::{LanguageCode, LanguageRegistry};
use phrase_resolver::lexicon::{CuratedList, LexiconStore};
use phrase_resolver::matcher::MatchType;
use phrase_resolver::provider::{
    ProviderAdapter, ProviderError, ProviderErrorKind, ProviderId, ProviderQuery,
    ProviderResolution,
};
use phrase_resolver::text::{similarity, Normalizer};

// ==================== Test Helpers ====================

fn normalizer() -> Normalizer {
    Normalizer::from_registry(LanguageRegistry::get())
}

fn reference_store() -> Arc<LexiconStore> {
    Arc::new(LexiconStore::reference(normalizer()).expect("bundled lexicon loads"))
}

/// Local sources only: reference lexicon plus the curated es->yua list.
fn local_engine() -> Engine {
    let curated = CuratedList::reference(normalizer()).expect("bundled curated list loads");
    EngineBuilder::new(reference_store())
        .with_curated(Arc::new(curated))
        .build()
}

/// Every remote adapter pointed at one mock server.
fn remote_engine(server: &MockServer) -> Engine {
    EngineBuilder::new(reference_store())
        .with_default_providers(reqwest::Client::new(), &ProviderEndpoints::all_at(&server.uri()))
        .build()
}

fn offline(text: &str, from: &str, to: &str) -> ResolutionRequest {
    ResolutionRequest::new(text, from, to).with_options(ResolutionOptions::offline())
}

struct Panicking;

#[async_trait]
impl ProviderAdapter for Panicking {
    fn id(&self) -> ProviderId {
        ProviderId::LEXICON
    }

    fn supports(&self, _from: &LanguageCode, _to: &LanguageCode) -> bool {
        true
    }

    async fn resolve(&self, _query: &ProviderQuery<'_>) -> Result<ProviderResolution, ProviderError> {
        panic!("index corrupted");
    }
}

/// Sleeps before answering, counting calls.
struct Slow {
    id: ProviderId,
    delay: Duration,
    calls: AtomicUsize,
}

#[async_trait]
impl ProviderAdapter for Slow {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn supports(&self, _from: &LanguageCode, _to: &LanguageCode) -> bool {
        true
    }

    async fn resolve(&self, _query: &ProviderQuery<'_>) -> Result<ProviderResolution, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(ProviderResolution::new("too late", 0.9))
    }
}

// ==================== Scenario Tests ====================

#[tokio::test]
async fn test_known_greeting_resolves_locally() {
    let result = local_engine().translate(offline("bonjour", "fr", "yua")).await;

    assert!(result.resolved);
    assert_eq!(result.translated_text, "Ba'ax ka wa'alik");
    assert!(result.confidence >= 0.9);
    assert!(["curated_bilingual", "lexicon"].contains(&result.provider.as_str()));
}

#[tokio::test]
async fn test_misspelling_resolves_fuzzily_with_suggestion() {
    let result = local_engine().translate(offline("bjour", "fr", "yua")).await;

    assert!(result.resolved);
    assert_eq!(result.provider, LEXICON_SEARCH);
    assert_eq!(result.match_type, Some(MatchType::Fuzzy));
    assert!(result.confidence > 0.0 && result.confidence <= 0.75);
    assert!(result.suggestions.iter().any(|s| s == "bonjour"));
}

#[tokio::test]
async fn test_unknown_word_is_a_graceful_miss() {
    let result = local_engine().translate(offline("xyzxyz", "fr", "yua")).await;

    assert!(!result.resolved);
    assert_eq!(result.confidence, 0.0);
    assert_eq!(result.provider, NO_PROVIDER);
    assert!(result.translated_text.contains("xyzxyz"));
    assert!(!result.suggestions.is_empty());
    assert!(!result.recommendations.is_empty());
}

#[test]
fn test_similarity_extremes() {
    assert_eq!(similarity("bonjour", "bonjour"), 1.0);
    assert!(similarity("bonjour", "xyz") < 0.1);
}

#[tokio::test]
async fn test_failing_remote_does_not_block_next_remote() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/maya/lookup"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tatoeba/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{
                "text": "La forêt profonde",
                "translations": [[{ "text": "K'áax", "lang": "yua" }]]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let engine = remote_engine(&server);
    let result = engine.translate_text("forêt profonde", "fr", "yua").await;

    assert!(result.resolved);
    assert_eq!(result.provider, "example_corpus");
    assert_eq!(result.translated_text, "K'áax");

    let academic = result
        .diagnostics
        .attempts
        .iter()
        .find(|a| a.provider == ProviderId::ACADEMIC_LEXICON)
        .expect("academic lexicon was attempted");
    assert!(matches!(
        &academic.outcome,
        AttemptOutcome::Failed { error } if error.kind == ProviderErrorKind::Http(500)
    ));
    assert_eq!(engine.metrics().provider_failures(), 3);
}

// ==================== Cascade Tests ====================

#[tokio::test]
async fn test_lexicon_hit_makes_no_network_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = remote_engine(&server).translate_text("merci", "fr", "yua").await;

    assert_eq!(result.provider, "lexicon");
    assert!(result.confidence >= 0.9);
}

#[tokio::test]
async fn test_credential_gated_language_model() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate_a/single"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "el gato duerme" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let engine = remote_engine(&server);

    let without_key = engine.translate_text("le chat dort", "fr", "es").await;
    assert_ne!(without_key.provider, "language_model");

    let request = ResolutionRequest::new("le chat dort", "fr", "es")
        .with_options(ResolutionOptions::default().with_credential("openai", "sk-test"));
    let with_key = engine.translate(request).await;

    assert_eq!(with_key.provider, "language_model");
    assert_eq!(with_key.translated_text, "el gato duerme");
    assert_eq!(with_key.confidence, 0.9);
}

#[tokio::test]
async fn test_ensemble_mode_is_tried_first() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ensemble/translate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "translation": "In peek' ku jaanal",
            "confidence": 0.93,
            "models_used": ["m1", "m2"],
            "consensus_level": "high"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = ResolutionRequest::new("mi perro come", "es", "yua")
        .with_options(ResolutionOptions::default().with_ensemble());
    let result = remote_engine(&server).translate(request).await;

    assert_eq!(result.provider, "ensemble_model");
    assert_eq!(result.translated_text, "In peek' ku jaanal");
    assert_eq!(result.diagnostics.plan[1], ProviderId::ENSEMBLE_MODEL);
}

#[tokio::test]
async fn test_deadline_stops_the_cascade() {
    let slow = Arc::new(Slow {
        id: ProviderId::ACADEMIC_LEXICON,
        delay: Duration::from_millis(500),
        calls: AtomicUsize::new(0),
    });
    let later = Arc::new(Slow {
        id: ProviderId::EXAMPLE_CORPUS,
        delay: Duration::ZERO,
        calls: AtomicUsize::new(0),
    });
    let settings = EngineSettings {
        provider_timeout: Duration::from_secs(2),
        request_deadline: Duration::from_millis(100),
        ..EngineSettings::default()
    };
    let engine = EngineBuilder::new(reference_store())
        .with_settings(settings)
        .with_provider(slow.clone())
        .with_provider(later.clone())
        .build();

    let result = engine.translate_text("forêt profonde", "fr", "yua").await;

    assert!(result.diagnostics.deadline_exceeded);
    assert_eq!(slow.calls.load(Ordering::SeqCst), 1);
    assert_eq!(later.calls.load(Ordering::SeqCst), 0);
    assert_ne!(result.provider, "academic_lexicon");
    assert!(result.diagnostics.attempts.iter().any(|a| matches!(
        &a.outcome,
        AttemptOutcome::Failed { error } if error.kind == ProviderErrorKind::Timeout
    )));
}

// ==================== Emergency Path Tests ====================

#[tokio::test]
async fn test_panicking_provider_lands_on_emergency_path() {
    let engine = EngineBuilder::new(reference_store())
        .with_provider(Arc::new(Panicking))
        .build();

    let result = engine.translate(offline("bonjour", "fr", "yua")).await;

    assert_eq!(result.provider, EMERGENCY_FALLBACK);
    assert!(result.resolved);
    assert_eq!(result.translated_text, "Ba'ax ka wa'alik");
    assert!(result.confidence <= 0.3);
    assert!(result.error.as_deref().unwrap_or_default().contains("index corrupted"));
    assert_eq!(engine.metrics().emergency_fallbacks(), 1);
}

#[tokio::test]
async fn test_emergency_path_without_match_still_answers() {
    let engine = EngineBuilder::new(reference_store())
        .with_provider(Arc::new(Panicking))
        .build();

    let result = engine.translate(offline("xyzxyz", "fr", "yua")).await;

    assert_eq!(result.provider, EMERGENCY_FALLBACK);
    assert!(!result.resolved);
    assert_eq!(result.confidence, 0.0);
    assert!(!result.suggestions.is_empty());
}

// ==================== Engine Construction Tests ====================

#[tokio::test]
async fn test_engine_from_config_with_custom_lexicon() {
    let temp_dir = TempDir::new().unwrap();
    let lexicon_path = temp_dir.path().join("lexicon.json");
    std::fs::write(
        &lexicon_path,
        r#"{
            "definition_language": "es",
            "entries": [
                { "phrase": "miel", "category": "food", "translations": { "yua": "Kaab" } },
                { "phrase": "tortilla", "category": "food", "translations": { "yua": "Waaj" } }
            ]
        }"#,
    )
    .unwrap();

    let config = Config {
        lexicon_path: Some(lexicon_path),
        ..Config::default()
    };
    let engine = Engine::from_config(&config).unwrap();

    assert_eq!(engine.store().len(), 2);
    let result = engine.translate(offline("miel", "es", "yua")).await;
    assert_eq!(result.translated_text, "Kaab");
    assert_eq!(result.provider, "lexicon");

    // The bundled curated list still takes precedence for phrases it knows
    let result = engine.translate(offline("tortilla", "es", "yua")).await;
    assert_eq!(result.provider, "curated_bilingual");
}

#[test]
fn test_engine_from_config_rejects_bad_lexicon() {
    let temp_dir = TempDir::new().unwrap();
    let lexicon_path = temp_dir.path().join("broken.json");
    std::fs::write(&lexicon_path, "{ not json").unwrap();

    let config = Config {
        lexicon_path: Some(lexicon_path),
        ..Config::default()
    };
    assert!(Engine::from_config(&config).is_err());
}

// ==================== Output Shape Tests ====================

#[tokio::test]
async fn test_result_serializes_camel_case() {
    let result = local_engine().translate(offline("merci", "fr", "yua")).await;
    let json = serde_json::to_value(&result).unwrap();

    for key in [
        "translatedText",
        "originalText",
        "fromLanguage",
        "toLanguage",
        "confidence",
        "provider",
        "resolved",
        "matchType",
        "suggestions",
        "recommendations",
        "diagnostics",
    ] {
        assert!(json.get(key).is_some(), "missing {}", key);
    }
    assert!(json.get("error").is_none());
    assert_eq!(json["diagnostics"]["priorityClass"], "indigenous");
}

#[tokio::test]
async fn test_resolution_is_deterministic_under_concurrency() {
    let engine = Arc::new(local_engine());
    let requests = ["bonjour", "bjour", "merci beaucoup", "xyzxyz"];

    let first: Vec<_> = futures::future::join_all(
        requests
            .iter()
            .map(|text| engine.translate(offline(text, "fr", "yua"))),
    )
    .await;
    let second: Vec<_> = futures::future::join_all(
        requests
            .iter()
            .map(|text| engine.translate(offline(text, "fr", "yua"))),
    )
    .await;

    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.translated_text, b.translated_text);
        assert_eq!(a.confidence, b.confidence);
        assert_eq!(a.provider, b.provider);
    }
    assert_eq!(engine.metrics().requests(), 8);
}

#[tokio::test]
async fn test_metrics_report_after_mixed_requests() {
    let engine = local_engine();
    engine.translate(offline("bonjour", "fr", "yua")).await;
    engine.translate(offline("bjour", "fr", "yua")).await;
    engine.translate(offline("xyzxyz", "fr", "yua")).await;

    let report = engine.metrics().report();
    assert_eq!(report.requests, 3);
    assert_eq!(report.lexicon_hits, 1);
    assert_eq!(report.fallback_hits, 1);
    assert_eq!(report.misses, 1);
}
