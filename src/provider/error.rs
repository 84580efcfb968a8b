use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Normalized failure categories for provider calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    Timeout,
    Transport,
    Http(u16),
    Malformed,
    NotFound,
    UnsupportedPair,
    MissingCredential,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderErrorKind::Timeout => f.write_str("timeout"),
            ProviderErrorKind::Transport => f.write_str("transport"),
            ProviderErrorKind::Http(status) => write!(f, "http {}", status),
            ProviderErrorKind::Malformed => f.write_str("malformed response"),
            ProviderErrorKind::NotFound => f.write_str("not found"),
            ProviderErrorKind::UnsupportedPair => f.write_str("unsupported pair"),
            ProviderErrorKind::MissingCredential => f.write_str("missing credential"),
        }
    }
}

/// A provider failure. Transport-level errors never escape an adapter in any
/// other shape.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{kind}: {message}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Transport, message)
    }

    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Http(status), body)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Malformed, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::NotFound, message)
    }

    pub fn unsupported_pair(from: &str, to: &str) -> Self {
        Self::new(
            ProviderErrorKind::UnsupportedPair,
            format!("{} -> {} is not supported", from, to),
        )
    }

    pub fn missing_credential(credential: &str) -> Self {
        Self::new(
            ProviderErrorKind::MissingCredential,
            format!("credential '{}' not provided", credential),
        )
    }

    /// The provider could not be reached or answered unusably.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self.kind,
            ProviderErrorKind::Timeout
                | ProviderErrorKind::Transport
                | ProviderErrorKind::Http(_)
                | ProviderErrorKind::Malformed
        )
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(err.to_string())
        } else if err.is_decode() {
            Self::malformed(err.to_string())
        } else if let Some(status) = err.status() {
            Self::http(status.as_u16(), err.to_string())
        } else {
            Self::transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        Self::malformed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_message() {
        let err = ProviderError::http(503, "Service Unavailable");
        assert_eq!(err.to_string(), "http 503: Service Unavailable");
    }

    #[test]
    fn test_unavailable_classification() {
        assert!(ProviderError::timeout("slow").is_unavailable());
        assert!(ProviderError::malformed("bad json").is_unavailable());
        assert!(!ProviderError::unsupported_pair("fr", "xx").is_unavailable());
        assert!(!ProviderError::not_found("nothing").is_unavailable());
    }

    #[test]
    fn test_json_error_is_malformed() {
        let err: ProviderError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.kind, ProviderErrorKind::Malformed);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_value(ProviderErrorKind::UnsupportedPair).unwrap();
        assert_eq!(json, "unsupported_pair");
        let json = serde_json::to_value(ProviderErrorKind::Http(404)).unwrap();
        assert_eq!(json["http"], 404);
    }
}
