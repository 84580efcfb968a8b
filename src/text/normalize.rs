//! Text normalization for lexical matching.
//!
//! Two canonical forms are produced:
//! - `fold`: case and whitespace folding only (exact comparison)
//! - `normalize`: additionally strips diacritics and punctuation
//!
//! Apostrophes and glottal-stop markers are letters in many indigenous
//! orthographies (`Ba'ax`, `K'iche'`), so they survive normalization for
//! languages flagged as such in the language registry. All marker variants are
//! unified to ASCII `'`.

use crate::language::{LanguageCode, LanguageRegistry};
use std::collections::HashSet;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Characters treated as apostrophe / glottal-stop markers.
const GLOTTAL_MARKERS: &[char] = &[
    '\'',       // apostrophe
    '\u{2019}', // right single quotation mark
    '\u{02BC}', // modifier letter apostrophe
    '\u{02BB}', // modifier letter turned comma (ʻokina)
    '\u{A78C}', // latin small letter saltillo
];

/// Punctuation that joins words; replaced by a space rather than removed.
const WORD_JOINERS: &[char] = &['-', '\u{2010}', '\u{2013}', '\u{2014}', '/', '_'];

/// Deterministic text normalizer.
#[derive(Debug, Clone)]
pub struct Normalizer {
    phonemic_apostrophe: HashSet<String>,
}

impl Normalizer {
    /// Create a normalizer that preserves apostrophes for the given languages.
    pub fn new<I, S>(phonemic_apostrophe_languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phonemic_apostrophe: phonemic_apostrophe_languages
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }

    /// Create a normalizer from the apostrophe policy of a language registry.
    pub fn from_registry(registry: &LanguageRegistry) -> Self {
        Self::new(registry.phonemic_apostrophe_codes())
    }

    /// Whether apostrophes are preserved for a language.
    pub fn preserves_apostrophes(&self, language: &LanguageCode) -> bool {
        self.phonemic_apostrophe.contains(language.as_str())
    }

    /// Full normalization: lowercase, strip diacritics, drop punctuation
    /// (except phonemic apostrophes), collapse whitespace.
    pub fn normalize(&self, text: &str, language: &LanguageCode) -> String {
        let keep_apostrophes = self.preserves_apostrophes(language);

        let stripped: String = text
            .to_lowercase()
            .nfd()
            .filter(|c| !is_combining_mark(*c))
            .filter_map(|c| {
                // U+02BC, U+02BB and U+A78C are letters, so markers go first.
                if GLOTTAL_MARKERS.contains(&c) {
                    keep_apostrophes.then_some('\'')
                } else if c.is_alphanumeric() || c.is_whitespace() {
                    Some(c)
                } else if WORD_JOINERS.contains(&c) {
                    Some(' ')
                } else {
                    None
                }
            })
            .collect();

        collapse_whitespace(&stripped)
    }

    /// Light folding: NFC, lowercase and whitespace collapse. Diacritics and
    /// punctuation are kept.
    pub fn fold(&self, text: &str) -> String {
        let lowered: String = text.nfc().flat_map(char::to_lowercase).collect();
        collapse_whitespace(&lowered)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::from_registry(LanguageRegistry::get())
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
