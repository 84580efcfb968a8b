//! Language-pair classification and provider recommendations.

use crate::language::{LanguageCode, LanguageFamily, LanguageRegistry, ResourceTier};
use serde::Serialize;
use std::fmt;

/// Priority class of a language pair. Selects the provider plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityClass {
    /// At least one side is endangered/indigenous
    Indigenous,
    /// Both sides are broadly supported by commercial services
    WellResourced,
    /// A regional language paired with a known language
    Mixed,
    /// Neither side is known to the registry
    Unclassified,
}

impl PriorityClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityClass::Indigenous => "indigenous",
            PriorityClass::WellResourced => "well_resourced",
            PriorityClass::Mixed => "mixed",
            PriorityClass::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for PriorityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LanguageRegistry {
    /// Classify an ordered (source, target) pair.
    pub fn classify(&self, from: &LanguageCode, to: &LanguageCode) -> PriorityClass {
        let tiers = [self.tier(from), self.tier(to)];

        if tiers.contains(&Some(ResourceTier::Indigenous)) {
            return PriorityClass::Indigenous;
        }
        match tiers {
            [Some(ResourceTier::WellResourced), Some(ResourceTier::WellResourced)] => {
                PriorityClass::WellResourced
            }
            [None, None] => PriorityClass::Unclassified,
            _ => PriorityClass::Mixed,
        }
    }

    /// Ranked list of provider classes likely to help with this pair.
    pub fn recommendations(&self, from: &LanguageCode, to: &LanguageCode) -> Vec<String> {
        let families = [self.family(from), self.family(to)];
        let involves = |family: LanguageFamily| families.contains(&Some(family));
        let mut recommendations = Vec::new();

        if involves(LanguageFamily::Mayan) {
            recommendations.push("Academic lexicon: specialized Maya dictionary".to_string());
            recommendations
                .push("Language model: context-aware translation (requires credentials)".to_string());
            recommendations.push("Example corpus: authentic example sentences".to_string());
        }

        if involves(LanguageFamily::Quechuan) {
            recommendations.push("Multilingual database: widest Quechua coverage".to_string());
            recommendations
                .push("Commercial MT: specialized machine translation (requires credentials)".to_string());
        }

        if involves(LanguageFamily::Americas) {
            recommendations
                .push("Rule-based translator: open platform for minority languages".to_string());
            recommendations
                .push("Multilingual database: global indigenous language coverage".to_string());
        }

        if recommendations.is_empty() {
            recommendations.push("General translator: for widely spoken languages".to_string());
            recommendations
                .push("Language model: context-aware translation (requires credentials)".to_string());
        }

        recommendations.dedup();
        recommendations
    }
}
