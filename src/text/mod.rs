//! Pure text utilities: normalization and string similarity.

mod normalize;
mod similarity;

pub use normalize::Normalizer;
pub use similarity::similarity;
