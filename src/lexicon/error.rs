use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a lexicon store from corpus data.
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to read lexicon corpus {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse lexicon corpus: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("lexicon entry has an empty phrase")]
    EmptyPhrase,

    #[error("duplicate lexicon phrase '{0}'")]
    DuplicatePhrase(String),

    #[error("lexicon phrase '{0}' has no translations")]
    EmptyTranslations(String),
}
