use crate::language::{LanguageCode, PriorityClass};
use crate::matcher::MatchType;
use crate::provider::{ProviderError, ProviderId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of a resolution. Every request produces one, resolved or not.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResult {
    pub translated_text: String,
    pub original_text: String,
    pub from_language: LanguageCode,
    pub to_language: LanguageCode,

    /// 0 for unresolved results
    pub confidence: f64,

    /// Source that produced the text
    pub provider: String,

    pub resolved: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_type: Option<MatchType>,

    pub suggestions: Vec<String>,
    pub recommendations: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub diagnostics: Diagnostics,
}

/// What happened to one provider in the plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Accepted { confidence: f64 },
    /// Answered, but below the acceptance threshold or invalid
    Rejected { reason: String },
    Failed { error: ProviderError },
    /// Not called (unsupported pair, missing credential)
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub provider: ProviderId,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
    pub elapsed_ms: u64,
}

/// Trace of one resolution: the plan, each attempt and any notes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub priority_class: PriorityClass,
    pub plan: Vec<ProviderId>,
    pub attempts: Vec<AttemptRecord>,
    pub deadline_exceeded: bool,
    pub notes: Vec<String>,
    pub elapsed_ms: u64,
    pub started_at: DateTime<Utc>,
}

impl Diagnostics {
    pub fn new(priority_class: PriorityClass) -> Self {
        Self {
            priority_class,
            plan: Vec::new(),
            attempts: Vec::new(),
            deadline_exceeded: false,
            notes: Vec::new(),
            elapsed_ms: 0,
            started_at: Utc::now(),
        }
    }

    pub fn record(&mut self, provider: ProviderId, outcome: AttemptOutcome, elapsed_ms: u64) {
        self.attempts.push(AttemptRecord {
            provider,
            outcome,
            elapsed_ms,
        });
    }

    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Attempts that actually reached a provider.
    pub fn calls(&self) -> impl Iterator<Item = &AttemptRecord> {
        self.attempts
            .iter()
            .filter(|a| !matches!(a.outcome, AttemptOutcome::Skipped { .. }))
    }
}
