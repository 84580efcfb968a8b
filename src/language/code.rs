//! Language code: opaque, validated-by-lookup language identifier.
//!
//! Codes are ISO 639 family identifiers or project-local extensions. They are
//! compared and looked up, never interpreted, so any non-empty string is
//! accepted here.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// A short language identifier such as `"fr"`, `"yua"` or `"quz"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Create a language code. Surrounding whitespace is trimmed.
    pub fn new(code: impl Into<String>) -> Self {
        let code = code.into();
        let trimmed = code.trim();
        if trimmed.len() == code.len() {
            Self(code)
        } else {
            Self(trimmed.to_string())
        }
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LanguageCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for LanguageCode {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl Borrow<str> for LanguageCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for LanguageCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LanguageCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_new_trims_whitespace() {
        assert_eq!(LanguageCode::new(" yua ").as_str(), "yua");
        assert_eq!(LanguageCode::new("fr").as_str(), "fr");
    }

    #[test]
    fn test_codes_are_not_interpreted() {
        // Project-local extensions are accepted as-is
        let code = LanguageCode::from("x-talkkin");
        assert_eq!(code.to_string(), "x-talkkin");
    }

    #[test]
    fn test_borrow_allows_str_lookup() {
        let mut map = BTreeMap::new();
        map.insert(LanguageCode::from("yua"), "Ba'ax ka wa'alik");
        assert_eq!(map.get("yua"), Some(&"Ba'ax ka wa'alik"));
        assert_eq!(map.get("quc"), None);
    }

    #[test]
    fn test_serde_transparent() {
        let code: LanguageCode = serde_json::from_str("\"quz\"").unwrap();
        assert_eq!(code, "quz");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"quz\"");
    }
}
