//! Provider response validation.
//!
//! Runs on every provider answer before the orchestrator accepts it. Errors
//! reject the answer as malformed; warnings are logged and kept in diagnostics.

use regex::Regex;
use std::sync::OnceLock;

/// Responses longer than this multiple of the input (plus slack) are treated
/// as runaway generations.
const MAX_LENGTH_RATIO: usize = 20;
const LENGTH_SLACK: usize = 200;

/// Validation report for a provider response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    /// Problems that make the response unusable
    pub errors: Vec<String>,

    /// Suspicious but usable traits of the response
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

pub struct ResponseValidator;

static ERROR_MARKER_REGEX: OnceLock<Regex> = OnceLock::new();
static MARKUP_REGEX: OnceLock<Regex> = OnceLock::new();
static PREAMBLE_REGEX: OnceLock<Regex> = OnceLock::new();

impl ResponseValidator {
    /// Validate a translated text against the original input.
    ///
    /// # Arguments
    /// * `original` - The text sent to the provider
    /// * `translated` - The text the provider returned
    pub fn validate(original: &str, translated: &str) -> ValidationReport {
        let mut report = ValidationReport::new();
        let trimmed = translated.trim();

        if trimmed.is_empty() {
            report.errors.push("Empty translation".to_string());
            return report;
        }

        if Self::has_error_marker(trimmed) {
            report
                .errors
                .push(format!("Response looks like an error message: {:?}", trimmed));
        }

        let limit = original.chars().count() * MAX_LENGTH_RATIO + LENGTH_SLACK;
        if trimmed.chars().count() > limit {
            report.errors.push(format!(
                "Response length {} exceeds limit {}",
                trimmed.chars().count(),
                limit
            ));
        }

        if Self::has_markup(trimmed) {
            report.warnings.push("Response contains markup".to_string());
        }

        if Self::has_preamble(trimmed) {
            report
                .warnings
                .push("Response contains a conversational preamble".to_string());
        }

        if trimmed.to_lowercase() == original.trim().to_lowercase() {
            report
                .warnings
                .push("Response echoes the input unchanged".to_string());
        }

        report
    }

    fn has_error_marker(text: &str) -> bool {
        let regex = ERROR_MARKER_REGEX.get_or_init(|| {
            Regex::new(r"(?i)^(error|erreur|exception|traceback|translation unavailable)\b|❌|\bnot found\b")
                .unwrap()
        });
        regex.is_match(text)
    }

    fn has_markup(text: &str) -> bool {
        let regex = MARKUP_REGEX.get_or_init(|| Regex::new(r"</?[a-zA-Z][^>]*>").unwrap());
        regex.is_match(text)
    }

    fn has_preamble(text: &str) -> bool {
        let regex = PREAMBLE_REGEX.get_or_init(|| {
            Regex::new(r"(?i)^(translation|traduction|here is|voici)\b\s*:?").unwrap()
        });
        regex.is_match(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Error Tests ====================

    #[test]
    fn test_clean_translation() {
        let report = ResponseValidator::validate("bonjour", "Ba'ax ka wa'alik");
        assert!(report.is_clean());
    }

    #[test]
    fn test_empty_translation_is_error() {
        let report = ResponseValidator::validate("bonjour", "   ");
        assert!(report.has_errors());
    }

    #[test]
    fn test_error_marker_is_error() {
        assert!(ResponseValidator::validate("bonjour", "Error: quota exceeded").has_errors());
        assert!(ResponseValidator::validate("bonjour", "❌ \"bonjour\" non trouvé").has_errors());
        assert!(ResponseValidator::validate("bonjour", "Translation unavailable").has_errors());
    }

    #[test]
    fn test_runaway_length_is_error() {
        let long = "a".repeat(500);
        assert!(ResponseValidator::validate("hi", &long).has_errors());
    }

    #[test]
    fn test_words_containing_error_are_fine() {
        let report = ResponseValidator::validate("erreurs", "Errores comunes");
        assert!(!report.has_errors());
    }

    // ==================== Warning Tests ====================

    #[test]
    fn test_markup_is_warning() {
        let report = ResponseValidator::validate("merci", "<b>Dios bo'otik</b>");
        assert!(!report.has_errors());
        assert!(report.has_warnings());
    }

    #[test]
    fn test_echo_is_warning() {
        let report = ResponseValidator::validate("Hospital", "hospital");
        assert!(!report.has_errors());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_preamble_is_warning() {
        let report = ResponseValidator::validate("eau", "Translation: Ha'");
        assert!(report.has_warnings());
    }
}
