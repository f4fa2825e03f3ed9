//! Positional split of the processed dataset.

/// Not enough rows for the requested split.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("dataset has {available} rows, split needs {required} ({training} training + {validation} validation)")]
pub struct SplitError {
    pub available: usize,
    pub training: usize,
    pub validation: usize,
    pub required: usize,
}

/// Splits rows into a training slice (first `training` rows) and a
/// validation slice (the next `validation` rows), preserving row order.
///
/// Randomization already happened at sampling time, so the split is
/// purely positional. Rows past `training + validation` are ignored.
/// Fewer rows than the split needs is a fatal error; a silently
/// truncated validation set would make every downstream metric
/// misleading.
pub fn split<T>(
    rows: &[T],
    training: usize,
    validation: usize,
) -> Result<(&[T], &[T]), SplitError> {
    let required = training + validation;
    if rows.len() < required {
        return Err(SplitError {
            available: rows.len(),
            training,
            validation,
            required,
        });
    }
    Ok((&rows[..training], &rows[training..required]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_is_disjoint_and_order_preserving() {
        let rows: Vec<usize> = (0..2650).collect();
        let (train, valid) = split(&rows, 2500, 150).unwrap();
        assert_eq!(train.len(), 2500);
        assert_eq!(valid.len(), 150);
        // concatenation reproduces the original sequence
        let joined: Vec<usize> = train.iter().chain(valid).copied().collect();
        assert_eq!(joined, rows);
    }

    #[test]
    fn test_insufficient_rows_fail() {
        let rows: Vec<usize> = (0..2600).collect();
        let err = split(&rows, 2500, 150).unwrap_err();
        assert_eq!(err.available, 2600);
        assert_eq!(err.required, 2650);
    }

    #[test]
    fn test_extra_rows_are_ignored() {
        let rows: Vec<usize> = (0..10).collect();
        let (train, valid) = split(&rows, 4, 2).unwrap();
        assert_eq!(train, &[0, 1, 2, 3]);
        assert_eq!(valid, &[4, 5]);
    }
}
