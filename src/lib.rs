//! Phrase resolution across languages, with a focus on indigenous and
//! under-resourced languages.
//!
//! A request runs through a curated lexicon, a plan of local and remote
//! providers chosen by the language pair, and a lexical matcher fallback.
//! Every request gets a result with diagnostics, even on failure.

pub mod config;
pub mod engine;
pub mod language;
pub mod lexicon;
pub mod matcher;
pub mod metrics;
pub mod provider;
pub mod text;
