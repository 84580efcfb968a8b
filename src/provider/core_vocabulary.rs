use crate::language::LanguageCode;
use crate::lexicon::LexiconStore;
use crate::provider::{ProviderAdapter, ProviderError, ProviderId, ProviderQuery, ProviderResolution};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

const CONFIDENCE: f64 = 0.85;

const GLOSS_LANGUAGE: &str = "en";

/// French core vocabulary (Swadesh list) with English glosses.
const CORE_VOCABULARY_FR: &[(&str, &str)] = &[
    ("je", "I"),
    ("tu", "you"),
    ("il", "he"),
    ("nous", "we"),
    ("vous", "you (plural)"),
    ("ils", "they"),
    ("ceci", "this"),
    ("cela", "that"),
    ("ici", "here"),
    ("là", "there"),
    ("qui", "who"),
    ("quoi", "what"),
    ("où", "where"),
    ("quand", "when"),
    ("comment", "how"),
    ("pas", "not"),
    ("tout", "all"),
    ("beaucoup", "many"),
    ("quelques", "some"),
    ("peu", "few"),
    ("autre", "other"),
    ("un", "one"),
    ("deux", "two"),
    ("trois", "three"),
    ("quatre", "four"),
    ("cinq", "five"),
    ("grand", "big"),
    ("long", "long"),
    ("large", "wide"),
    ("épais", "thick"),
    ("lourd", "heavy"),
    ("petit", "small"),
    ("court", "short"),
    ("étroit", "narrow"),
    ("mince", "thin"),
    ("femme", "woman"),
    ("homme", "man"),
    ("personne", "person"),
    ("enfant", "child"),
    ("épouse", "wife"),
    ("mari", "husband"),
    ("mère", "mother"),
    ("père", "father"),
    ("animal", "animal"),
    ("poisson", "fish"),
    ("eau", "water"),
    ("pluie", "rain"),
    ("soleil", "sun"),
    ("lune", "moon"),
    ("étoile", "star"),
];

/// Closed core-vocabulary check.
///
/// Words on the list resolve to their English gloss, or through the lexicon
/// into other targets (directly, or pivoting on the gloss).
pub struct CoreVocabularyAdapter {
    store: Arc<LexiconStore>,
    source: LanguageCode,
}

impl CoreVocabularyAdapter {
    pub fn new(store: Arc<LexiconStore>) -> Self {
        Self {
            store,
            source: LanguageCode::from("fr"),
        }
    }

    fn gloss(&self, word: &str) -> Option<(&'static str, &'static str)> {
        let folded = self.store.normalizer().fold(word);
        CORE_VOCABULARY_FR
            .iter()
            .find(|(entry, _)| *entry == folded)
            .copied()
    }

    fn through_lexicon(&self, word: &str, gloss: &str, to: &LanguageCode) -> Option<String> {
        if let Some(translation) = self
            .store
            .lookup(word)
            .and_then(|entry| entry.translation(to.as_str()))
        {
            return Some(translation.to_string());
        }

        let normalizer = self.store.normalizer();
        let gloss_language = LanguageCode::from(GLOSS_LANGUAGE);
        let gloss = normalizer.normalize(gloss, &gloss_language);
        self.store
            .all()
            .filter(|entry| {
                entry
                    .translation(GLOSS_LANGUAGE)
                    .is_some_and(|en| normalizer.normalize(en, &gloss_language) == gloss)
            })
            .find_map(|entry| entry.translation(to.as_str()))
            .map(str::to_string)
    }
}

#[async_trait]
impl ProviderAdapter for CoreVocabularyAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::CORE_VOCABULARY
    }

    fn supports(&self, from: &LanguageCode, to: &LanguageCode) -> bool {
        *from == self.source && (to == GLOSS_LANGUAGE || self.store.covers(to.as_str()))
    }

    async fn resolve(&self, query: &ProviderQuery<'_>) -> Result<ProviderResolution, ProviderError> {
        let (word, gloss) = self.gloss(query.text).ok_or_else(|| {
            ProviderError::not_found(format!("'{}' is not core vocabulary", query.text))
        })?;

        let translation = if query.to == GLOSS_LANGUAGE {
            gloss.to_string()
        } else {
            self.through_lexicon(word, gloss, query.to).ok_or_else(|| {
                ProviderError::not_found(format!("no {} rendering for core word '{}'", query.to, word))
            })?
        };

        Ok(ProviderResolution::new(translation, CONFIDENCE)
            .with_detail(json!({ "coreWord": word, "gloss": gloss })))
    }
}
