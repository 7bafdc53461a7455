//! Feature-subset enumeration.

use crate::error::{Result, TabscoutError};

/// Largest predictor list accepted for exhaustive search (2^20 - 1 subsets).
pub const MAX_PREDICTORS: usize = 20;

/// Number of non-empty subsets of `n_predictors` columns.
#[must_use]
pub fn combination_count(n_predictors: usize) -> usize {
    (1usize << n_predictors) - 1
}

/// Every non-empty subset of `columns`.
///
/// Subsets are ordered by length, and within one length lexicographically by
/// column position, so `[a, b, c]` yields `[a] [b] [c] [a b] [a c] [b c]
/// [a b c]`. Columns keep their input order inside each subset.
///
/// # Errors
///
/// Returns [`TabscoutError::EmptyPredictors`] for an empty list and
/// [`TabscoutError::TooManyPredictors`] above [`MAX_PREDICTORS`].
///
/// # Example
///
/// ```
/// use tabscout::selection::feature_combinations;
///
/// let subsets = feature_combinations(&["Year", "Genre"]).expect("non-empty");
/// assert_eq!(subsets, vec![
///     vec!["Year".to_string()],
///     vec!["Genre".to_string()],
///     vec!["Year".to_string(), "Genre".to_string()],
/// ]);
/// ```
pub fn feature_combinations<S: AsRef<str>>(columns: &[S]) -> Result<Vec<Vec<String>>> {
    let n = columns.len();
    if n == 0 {
        return Err(TabscoutError::EmptyPredictors);
    }
    if n > MAX_PREDICTORS {
        return Err(TabscoutError::TooManyPredictors {
            count: n,
            max: MAX_PREDICTORS,
        });
    }

    let mut subsets = Vec::with_capacity(combination_count(n));
    for length in 1..=n {
        // Positions of the current subset, advanced like an odometer.
        let mut positions: Vec<usize> = (0..length).collect();
        loop {
            subsets.push(
                positions
                    .iter()
                    .map(|&p| columns[p].as_ref().to_string())
                    .collect(),
            );

            let Some(slot) = (0..length).rev().find(|&i| positions[i] != i + n - length) else {
                break;
            };
            positions[slot] += 1;
            for i in slot + 1..length {
                positions[i] = positions[i - 1] + 1;
            }
        }
    }

    Ok(subsets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_columns_order() {
        let subsets = feature_combinations(&["a", "b", "c"]).expect("non-empty");
        let joined: Vec<String> = subsets.iter().map(|s| s.join("")).collect();
        assert_eq!(joined, vec!["a", "b", "c", "ab", "ac", "bc", "abc"]);
    }

    #[test]
    fn test_count_matches_formula() {
        for n in 1..=8 {
            let columns: Vec<String> = (0..n).map(|i| format!("c{i}")).collect();
            let subsets = feature_combinations(&columns).expect("non-empty");
            assert_eq!(subsets.len(), combination_count(n));
        }
    }

    #[test]
    fn test_empty_predictors_rejected() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            feature_combinations(&empty),
            Err(TabscoutError::EmptyPredictors)
        ));
    }

    #[test]
    fn test_ceiling_enforced() {
        let columns: Vec<String> = (0..=MAX_PREDICTORS).map(|i| format!("c{i}")).collect();
        assert!(matches!(
            feature_combinations(&columns),
            Err(TabscoutError::TooManyPredictors { count: 21, max: 20 })
        ));
    }
}
