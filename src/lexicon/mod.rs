//! Curated phrase lexicon.
//!
//! # Architecture
//!
//! - `entry`: `PhraseEntry` and `Category`
//! - `store`: read-only `LexiconStore` with exact and normalized indexes
//! - `loader`: JSON corpus loading, bundled reference data, `CuratedList`
//! - `error`: `LexiconError`
//!
//! # Example
//!
//! ```rust
//! use phrase_resolver::lexicon::LexiconStore;
//! use phrase_resolver::text::Normalizer;
//!
//! let store = LexiconStore::reference(Normalizer::default()).unwrap();
//! let entry = store.lookup("bonjour").unwrap();
//! assert_eq!(entry.translation("yua"), Some("Ba'ax ka wa'alik"));
//! ```

mod entry;
mod error;
mod loader;
mod store;

pub use entry::{Category, PhraseEntry};
pub use error::LexiconError;
pub use loader::CuratedList;
pub use store::{CategoryPhrase, LanguageCoverage, LexiconStats, LexiconStore, MultiTranslation};
