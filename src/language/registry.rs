//! Language registry: static metadata for every language the resolver knows about.
//!
//! The registry drives pair classification, provider recommendations and the
//! normalizer's apostrophe policy. Codes missing from the registry are still
//! accepted everywhere; they simply classify as unknown.

use crate::language::LanguageCode;
use serde::Serialize;
use std::sync::OnceLock;

/// How well a language is served by high-volume translation services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceTier {
    /// Endangered or indigenous language; specialized and community sources first
    Indigenous,
    /// Broadly supported by commercial services
    WellResourced,
    /// Partially supported regional language
    Regional,
}

/// Coarse language family, used for provider recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageFamily {
    Mayan,
    Quechuan,
    Americas,
    Europe,
    Africa,
    Oceania,
}

/// Configuration for a known language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// Language code (e.g., "fr", "yua", "quz")
    pub code: &'static str,

    /// English name of the language (e.g., "French", "Yucatec Maya")
    pub name: &'static str,

    /// Native name of the language (e.g., "Français", "Maaya t'aan")
    pub native_name: &'static str,

    /// Resource tier used by pair classification
    pub tier: ResourceTier,

    /// Language family
    pub family: LanguageFamily,

    /// Whether apostrophes / glottal-stop markers are phonemic in the orthography
    pub phonemic_apostrophe: bool,
}

/// Registry of known languages.
///
/// Immutable once built. `LanguageRegistry::get()` returns the shared built-in
/// table; custom tables can be built with `LanguageRegistry::new`.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Build a registry from an explicit language table.
    pub fn new(languages: Vec<LanguageConfig>) -> Self {
        Self { languages }
    }

    /// Build a fresh copy of the built-in language table.
    pub fn builtin() -> Self {
        Self::new(default_languages())
    }

    /// Get the shared built-in registry.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(LanguageRegistry::builtin)
    }

    /// Get a language configuration by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get all languages.
    pub fn list_all(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().collect()
    }

    /// Check whether a code is known to the registry.
    pub fn is_known(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }

    /// Resource tier for a code, `None` for unknown codes.
    pub fn tier(&self, code: &LanguageCode) -> Option<ResourceTier> {
        self.get_by_code(code.as_str()).map(|lang| lang.tier)
    }

    /// Language family for a code, `None` for unknown codes.
    pub fn family(&self, code: &LanguageCode) -> Option<LanguageFamily> {
        self.get_by_code(code.as_str()).map(|lang| lang.family)
    }

    /// English display name, falling back to the raw code.
    pub fn display_name(&self, code: &LanguageCode) -> String {
        self.get_by_code(code.as_str())
            .map(|lang| lang.name.to_string())
            .unwrap_or_else(|| code.to_string())
    }

    /// Codes whose orthography treats apostrophes as letters.
    pub fn phonemic_apostrophe_codes(&self) -> Vec<&'static str> {
        self.languages
            .iter()
            .filter(|lang| lang.phonemic_apostrophe)
            .map(|lang| lang.code)
            .collect()
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

macro_rules! lang {
    ($code:expr, $name:expr, $native:expr, $tier:ident, $family:ident, $apostrophe:expr) => {
        LanguageConfig {
            code: $code,
            name: $name,
            native_name: $native,
            tier: ResourceTier::$tier,
            family: LanguageFamily::$family,
            phonemic_apostrophe: $apostrophe,
        }
    };
}

/// Built-in language table.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        // Well-resourced
        lang!("fr", "French", "Français", WellResourced, Europe, false),
        lang!("es", "Spanish", "Español", WellResourced, Europe, false),
        lang!("en", "English", "English", WellResourced, Europe, false),
        lang!("pt", "Portuguese", "Português", WellResourced, Europe, false),
        lang!("de", "German", "Deutsch", WellResourced, Europe, false),
        lang!("it", "Italian", "Italiano", WellResourced, Europe, false),
        lang!("ca", "Catalan", "Català", WellResourced, Europe, false),
        // Mayan
        lang!("yua", "Yucatec Maya", "Maaya t'aan", Indigenous, Mayan, true),
        lang!("quc", "K'iche'", "K'iche'", Indigenous, Mayan, true),
        lang!("cak", "Kaqchikel", "Kaqchikel", Indigenous, Mayan, true),
        lang!("mam", "Mam", "Qyol Mam", Indigenous, Mayan, true),
        lang!("qeq", "Q'eqchi'", "Q'eqchi'", Indigenous, Mayan, true),
        lang!("itz", "Itza'", "Itzaj", Indigenous, Mayan, true),
        lang!("lac", "Lacandon", "Jach t'aan", Indigenous, Mayan, true),
        lang!("tzh", "Tzeltal", "Bats'il k'op", Indigenous, Mayan, true),
        lang!("tzo", "Tzotzil", "Bats'i k'op", Indigenous, Mayan, true),
        lang!("tzj", "Tz'utujil", "Tz'utujiil", Indigenous, Mayan, true),
        // Quechuan
        lang!("qu", "Quechua", "Runa simi", Indigenous, Quechuan, true),
        lang!("quz", "Cusco Quechua", "Qhichwa simi", Indigenous, Quechuan, true),
        lang!("quy", "Ayacucho Quechua", "Runasimi", Indigenous, Quechuan, true),
        lang!("qub", "Huallaga Quechua", "Runa shimi", Indigenous, Quechuan, true),
        lang!("qul", "North Bolivian Quechua", "Qhichwa", Indigenous, Quechuan, true),
        // Other languages of the Americas
        lang!("nah", "Nahuatl", "Nāhuatl", Indigenous, Americas, true),
        lang!("gn", "Guarani", "Avañe'ẽ", Indigenous, Americas, true),
        lang!("ay", "Aymara", "Aymar aru", Indigenous, Americas, true),
        lang!("arn", "Mapudungun", "Mapudungun", Indigenous, Americas, false),
        lang!("chr", "Cherokee", "Tsalagi", Indigenous, Americas, false),
        lang!("nv", "Navajo", "Diné bizaad", Indigenous, Americas, true),
        lang!("iu", "Inuktitut", "Inuktitut", Indigenous, Americas, false),
        lang!("cr", "Cree", "Nēhiyawēwin", Indigenous, Americas, false),
        lang!("oj", "Ojibwe", "Anishinaabemowin", Indigenous, Americas, true),
        lang!("lkt", "Lakota", "Lakȟótiyapi", Indigenous, Americas, true),
        // Africa
        lang!("am", "Amharic", "Amarəñña", Regional, Africa, false),
        lang!("ti", "Tigrinya", "Təgrəñña", Regional, Africa, false),
        lang!("om", "Oromo", "Afaan Oromoo", Regional, Africa, true),
        lang!("so", "Somali", "Af-Soomaali", Regional, Africa, false),
        lang!("zu", "Zulu", "isiZulu", Regional, Africa, false),
        lang!("xh", "Xhosa", "isiXhosa", Regional, Africa, false),
        lang!("yo", "Yoruba", "Yorùbá", Regional, Africa, false),
        lang!("ig", "Igbo", "Asụsụ Igbo", Regional, Africa, false),
        lang!("ha", "Hausa", "Harshen Hausa", Regional, Africa, true),
        lang!("sw", "Swahili", "Kiswahili", Regional, Africa, false),
        // Oceania
        lang!("mi", "Māori", "Te reo Māori", Regional, Oceania, false),
        lang!("sm", "Samoan", "Gagana Sāmoa", Regional, Oceania, true),
        lang!("haw", "Hawaiian", "ʻŌlelo Hawaiʻi", Regional, Oceania, true),
        lang!("to", "Tongan", "Lea faka-Tonga", Regional, Oceania, true),
        // Regional Europe
        lang!("eu", "Basque", "Euskara", Regional, Europe, false),
        lang!("cy", "Welsh", "Cymraeg", Regional, Europe, false),
        lang!("ga", "Irish", "Gaeilge", Regional, Europe, false),
        lang!("mt", "Maltese", "Malti", Regional, Europe, false),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_get_returns_singleton() {
        let registry1 = LanguageRegistry::get();
        let registry2 = LanguageRegistry::get();

        assert!(std::ptr::eq(registry1, registry2));
    }

    #[test]
    fn test_get_by_code_yucatec() {
        let registry = LanguageRegistry::get();
        let config = registry.get_by_code("yua").expect("yua should be known");

        assert_eq!(config.name, "Yucatec Maya");
        assert_eq!(config.tier, ResourceTier::Indigenous);
        assert_eq!(config.family, LanguageFamily::Mayan);
        assert!(config.phonemic_apostrophe);
    }

    #[test]
    fn test_get_by_code_french() {
        let registry = LanguageRegistry::get();
        let config = registry.get_by_code("fr").expect("fr should be known");

        assert_eq!(config.native_name, "Français");
        assert_eq!(config.tier, ResourceTier::WellResourced);
        assert!(!config.phonemic_apostrophe);
    }

    #[test]
    fn test_get_by_code_nonexistent() {
        let registry = LanguageRegistry::get();
        assert!(registry.get_by_code("tlh").is_none());
        assert!(!registry.is_known("tlh"));
    }

    #[test]
    fn test_codes_are_unique() {
        let registry = LanguageRegistry::get();
        let all = registry.list_all();
        let mut codes: Vec<_> = all.iter().map(|lang| lang.code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn test_display_name_falls_back_to_code() {
        let registry = LanguageRegistry::get();
        assert_eq!(registry.display_name(&"quc".into()), "K'iche'");
        assert_eq!(registry.display_name(&"tlh".into()), "tlh");
    }

    #[test]
    fn test_phonemic_apostrophe_codes() {
        let codes = LanguageRegistry::get().phonemic_apostrophe_codes();
        assert!(codes.contains(&"yua"));
        assert!(codes.contains(&"haw"));
        assert!(!codes.contains(&"fr"));
    }

    #[test]
    fn test_custom_registry() {
        let registry = LanguageRegistry::new(vec![lang!(
            "x-test",
            "Test",
            "Test",
            Regional,
            Europe,
            false
        )]);
        assert!(registry.is_known("x-test"));
        assert!(!registry.is_known("fr"));
    }
}
