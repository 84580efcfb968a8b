//! Resolution metrics.
//!
//! Counters are owned by an engine instance and shared with its callers through
//! an `Arc`, so separate engines (and tests) never see each other's numbers.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Atomic counters for resolution outcomes.
#[derive(Debug, Default)]
pub struct ResolutionMetrics {
    /// Requests received by `translate`
    requests: AtomicUsize,

    /// Requests resolved by a local lexicon tier (curated list, lexicon)
    lexicon_hits: AtomicUsize,

    /// Requests where no local lexicon tier produced an answer
    lexicon_misses: AtomicUsize,

    /// Provider adapter calls actually started
    provider_calls: AtomicUsize,

    /// Provider calls that errored, timed out or returned malformed data
    provider_failures: AtomicUsize,

    /// Providers skipped (unsupported pair, missing credential)
    provider_skips: AtomicUsize,

    /// Requests resolved by the lexical matcher fallback
    fallback_hits: AtomicUsize,

    /// Requests that ended unresolved
    misses: AtomicUsize,

    /// Requests answered by the emergency path after an engine fault
    emergency_fallbacks: AtomicUsize,
}

impl ResolutionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_lexicon_hit(&self) {
        self.lexicon_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_lexicon_miss(&self) {
        self.lexicon_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_provider_call(&self) {
        self.provider_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_provider_failure(&self) {
        self.provider_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_provider_skip(&self) {
        self.provider_skips.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback_hit(&self) {
        self.fallback_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_emergency_fallback(&self) {
        self.emergency_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn lexicon_hits(&self) -> usize {
        self.lexicon_hits.load(Ordering::Relaxed)
    }

    pub fn lexicon_misses(&self) -> usize {
        self.lexicon_misses.load(Ordering::Relaxed)
    }

    pub fn provider_calls(&self) -> usize {
        self.provider_calls.load(Ordering::Relaxed)
    }

    pub fn provider_failures(&self) -> usize {
        self.provider_failures.load(Ordering::Relaxed)
    }

    pub fn provider_skips(&self) -> usize {
        self.provider_skips.load(Ordering::Relaxed)
    }

    pub fn fallback_hits(&self) -> usize {
        self.fallback_hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn emergency_fallbacks(&self) -> usize {
        self.emergency_fallbacks.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.lexicon_hits();
        let lexicon_misses = self.lexicon_misses();
        let lexicon_hit_rate = rate(hits, hits + lexicon_misses);

        let calls = self.provider_calls();
        let failures = self.provider_failures();
        let provider_success_rate = rate(calls.saturating_sub(failures), calls);

        let requests = self.requests();
        let misses = self.misses();
        let resolution_rate = rate(requests.saturating_sub(misses), requests);

        MetricsReport {
            requests,
            lexicon_hits: hits,
            lexicon_misses,
            lexicon_hit_rate,
            provider_calls: calls,
            provider_failures: failures,
            provider_skips: self.provider_skips(),
            provider_success_rate,
            fallback_hits: self.fallback_hits(),
            misses,
            emergency_fallbacks: self.emergency_fallbacks(),
            resolution_rate,
        }
    }
}

/// Percentage of `part` in `total`; 0 when nothing was counted.
fn rate(part: usize, total: usize) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

/// Snapshot of resolution statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub requests: usize,
    pub lexicon_hits: usize,
    pub lexicon_misses: usize,

    /// Lexicon hit rate as a percentage (0-100)
    pub lexicon_hit_rate: f64,

    pub provider_calls: usize,
    pub provider_failures: usize,
    pub provider_skips: usize,

    /// Provider success rate as a percentage (0-100)
    pub provider_success_rate: f64,

    pub fallback_hits: usize,
    pub misses: usize,
    pub emergency_fallbacks: usize,

    /// Share of requests that resolved, as a percentage (0-100)
    pub resolution_rate: f64,
}
