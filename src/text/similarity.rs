//! Jaro-Winkler string similarity over `strsim`'s Jaro score.
//!
//! Scores are in `[0, 1]`, symmetric, and `1.0` for identical inputs. The
//! comparison runs over Unicode scalar values, so callers should pass
//! normalized text.

/// Winkler prefix scaling factor.
const PREFIX_SCALE: f64 = 0.1;

/// Maximum shared prefix length rewarded by the Winkler boost.
const MAX_PREFIX: usize = 4;

/// Jaro-Winkler similarity between two strings.
///
/// Two empty strings are considered identical (`1.0`); an empty string
/// against a non-empty one scores `0.0`.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    // Greedy matching depends on argument order; fixing the order keeps the
    // score symmetric.
    let (a, b) = if (a.chars().count(), a) <= (b.chars().count(), b) {
        (a, b)
    } else {
        (b, a)
    };

    // The boost applies at every score, not only above 0.7 as in
    // `strsim::jaro_winkler`.
    let jaro = strsim::jaro(a, b);
    let prefix = a
        .chars()
        .zip(b.chars())
        .take(MAX_PREFIX)
        .take_while(|(x, y)| x == y)
        .count();

    (jaro + PREFIX_SCALE * prefix as f64 * (1.0 - jaro)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-3,
            "expected {expected}, got {actual}"
        );
    }

    // ==================== Reference Value Tests ====================

    #[test]
    fn test_identical_strings() {
        assert_eq!(similarity("bonjour", "bonjour"), 1.0);
    }

    #[test]
    fn test_unrelated_strings_score_near_zero() {
        assert!(similarity("bonjour", "xyz") < 0.1);
    }

    #[test]
    fn test_classic_martha_example() {
        assert_close(similarity("martha", "marhta"), 0.961);
    }

    #[test]
    fn test_classic_dixon_example() {
        assert_close(similarity("dixon", "dicksonx"), 0.813);
    }

    #[test]
    fn test_typo_of_bonjour() {
        // 5 matches, 1 transposition, shared prefix "b"
        assert_close(similarity("bjour", "bonjour"), 0.854);
    }

    #[test]
    fn test_multibyte_characters() {
        assert_eq!(similarity("ba'ax", "ba'ax"), 1.0);
        assert!(similarity("nāhuatl", "nahuatl") > 0.8);
    }

    // ==================== Degenerate Input Tests ====================

    #[test]
    fn test_both_empty() {
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn test_one_empty() {
        assert_eq!(similarity("", "bonjour"), 0.0);
        assert_eq!(similarity("bonjour", ""), 0.0);
    }

    #[test]
    fn test_single_characters() {
        assert_eq!(similarity("a", "a"), 1.0);
        assert_eq!(similarity("a", "b"), 0.0);
    }

    // ==================== Property Tests ====================

    proptest! {
        #[test]
        fn prop_bounded(a in "\\PC{0,20}", b in "\\PC{0,20}") {
            let score = similarity(&a, &b);
            prop_assert!((0.0..=1.0).contains(&score));
        }

        #[test]
        fn prop_symmetric(a in "[a-e]{0,12}", b in "[a-e]{0,12}") {
            prop_assert_eq!(similarity(&a, &b), similarity(&b, &a));
        }

        #[test]
        fn prop_identity(a in "\\PC{0,20}") {
            prop_assert_eq!(similarity(&a, &a), 1.0);
        }
    }
}
