//! Language metadata: codes, the language registry and pair classification.
//!
//! # Architecture
//!
//! - `code`: opaque `LanguageCode` newtype used throughout the crate
//! - `registry`: static table of known languages (tier, family, orthography)
//! - `classify`: language-pair priority classes and provider recommendations
//!
//! # Example
//!
//! ```rust
//! use phrase_resolver::language::{LanguageRegistry, PriorityClass};
//!
//! let registry = LanguageRegistry::get();
//! let class = registry.classify(&"fr".into(), &"yua".into());
//! assert_eq!(class, PriorityClass::Indigenous);
//! ```

mod classify;
mod code;
mod registry;

pub use classify::PriorityClass;
pub use code::LanguageCode;
pub use registry::{LanguageConfig, LanguageFamily, LanguageRegistry, ResourceTier};
