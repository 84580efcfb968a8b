//! Provider plans per language-pair class.

use crate::engine::ResolutionOptions;
use crate::language::PriorityClass;
use crate::provider::{ProviderId, ProviderRegistry};

/// Local sources, always tried first.
pub const LOCAL_TIER: &[ProviderId] = &[ProviderId::CURATED_BILINGUAL, ProviderId::LEXICON];

const INDIGENOUS: &[ProviderId] = &[
    ProviderId::CORE_VOCABULARY,
    ProviderId::ACADEMIC_LEXICON,
    ProviderId::EXAMPLE_CORPUS,
    ProviderId::MULTILINGUAL_DATABASE,
    ProviderId::COLLABORATIVE_DICTIONARY,
    ProviderId::RULE_BASED_TRANSLATOR,
    ProviderId::STRUCTURED_DATA,
    ProviderId::DEFINITION_WIKI,
    ProviderId::COMMERCIAL_MT,
    ProviderId::LANGUAGE_MODEL,
    ProviderId::GENERAL_TRANSLATOR,
];

const WELL_RESOURCED: &[ProviderId] = &[ProviderId::GENERAL_TRANSLATOR, ProviderId::LANGUAGE_MODEL];

const MIXED: &[ProviderId] = &[
    ProviderId::MULTILINGUAL_DATABASE,
    ProviderId::GENERAL_TRANSLATOR,
    ProviderId::LANGUAGE_MODEL,
];

const UNCLASSIFIED: &[ProviderId] = &[ProviderId::LANGUAGE_MODEL, ProviderId::GENERAL_TRANSLATOR];

/// External cascade for a pair class.
pub fn external_plan(class: PriorityClass) -> &'static [ProviderId] {
    match class {
        PriorityClass::Indigenous => INDIGENOUS,
        PriorityClass::WellResourced => WELL_RESOURCED,
        PriorityClass::Mixed => MIXED,
        PriorityClass::Unclassified => UNCLASSIFIED,
    }
}

/// Ordered provider ids for one request, restricted to registered adapters.
pub fn compose(
    class: PriorityClass,
    options: &ResolutionOptions,
    providers: &ProviderRegistry,
) -> Vec<ProviderId> {
    let mut plan: Vec<ProviderId> = LOCAL_TIER.to_vec();

    if options.enable_external_providers {
        if options.use_ensemble_mode {
            plan.push(ProviderId::ENSEMBLE_MODEL);
        }
        plan.extend_from_slice(external_plan(class));
    }

    plan.retain(|id| providers.contains(*id));
    plan
}
