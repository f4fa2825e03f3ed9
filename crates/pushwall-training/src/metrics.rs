//! Regression metrics over a labeled evaluation set.

/// MSE, Pearson correlation, and coefficient of determination for one
/// output dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionMetrics {
    pub mse: f64,
    pub r: f64,
    pub r2: f64,
}

impl RegressionMetrics {
    /// Computes metrics for one output dimension.
    ///
    /// Returns `None` for an empty set. A constant actual series has no
    /// defined correlation; `r` and `r2` come out as NaN in that case,
    /// matching the usual convention.
    #[must_use]
    pub fn new(predicted: &[f64], actual: &[f64]) -> Option<Self> {
        if predicted.is_empty() || predicted.len() != actual.len() {
            return None;
        }
        #[expect(clippy::cast_precision_loss)]
        let n = predicted.len() as f64;

        let mse = predicted
            .iter()
            .zip(actual)
            .map(|(p, a)| (p - a) * (p - a))
            .sum::<f64>()
            / n;

        let mean_p = predicted.iter().sum::<f64>() / n;
        let mean_a = actual.iter().sum::<f64>() / n;
        let mut cov = 0.0;
        let mut var_p = 0.0;
        let mut var_a = 0.0;
        for (p, a) in predicted.iter().zip(actual) {
            cov += (p - mean_p) * (a - mean_a);
            var_p += (p - mean_p) * (p - mean_p);
            var_a += (a - mean_a) * (a - mean_a);
        }
        let r = cov / (var_p.sqrt() * var_a.sqrt());

        let ss_res = mse * n;
        let r2 = 1.0 - ss_res / var_a;

        Some(Self { mse, r, r2 })
    }
}

/// Per-output metrics for a multi-output regressor.
///
/// `predictions` and `targets` are row-major: one row per sample, one
/// column per output. Returns `None` when the set is empty or rows are
/// ragged.
#[must_use]
pub fn per_output(
    predictions: &[Vec<f64>],
    targets: &[Vec<f64>],
) -> Option<Vec<RegressionMetrics>> {
    let first = predictions.first()?;
    let outputs = first.len();
    if predictions.len() != targets.len() {
        return None;
    }

    let mut metrics = Vec::with_capacity(outputs);
    for column in 0..outputs {
        let predicted: Vec<f64> = predictions
            .iter()
            .map(|row| row.get(column).copied())
            .collect::<Option<_>>()?;
        let actual: Vec<f64> = targets
            .iter()
            .map(|row| row.get(column).copied())
            .collect::<Option<_>>()?;
        metrics.push(RegressionMetrics::new(&predicted, &actual)?);
    }
    Some(metrics)
}

/// Arithmetic mean of per-output metrics.
#[must_use]
pub fn average(metrics: &[RegressionMetrics]) -> Option<RegressionMetrics> {
    if metrics.is_empty() {
        return None;
    }
    #[expect(clippy::cast_precision_loss)]
    let n = metrics.len() as f64;
    Some(RegressionMetrics {
        mse: metrics.iter().map(|m| m.mse).sum::<f64>() / n,
        r: metrics.iter().map(|m| m.r).sum::<f64>() / n,
        r2: metrics.iter().map(|m| m.r2).sum::<f64>() / n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_prediction() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let m = RegressionMetrics::new(&values, &values).unwrap();
        assert_eq!(m.mse, 0.0);
        assert!((m.r - 1.0).abs() < 1e-12);
        assert!((m.r2 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_hand_computed_case() {
        // predicted offset by a constant 1.0 from actual
        let predicted = [2.0, 3.0, 4.0];
        let actual = [1.0, 2.0, 3.0];
        let m = RegressionMetrics::new(&predicted, &actual).unwrap();
        assert!((m.mse - 1.0).abs() < 1e-12);
        // correlation is unaffected by the offset
        assert!((m.r - 1.0).abs() < 1e-12);
        // ss_res = 3, ss_tot = 2 -> r2 = -0.5
        assert!((m.r2 + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_mean_prediction_has_zero_r2() {
        let actual = [1.0, 2.0, 3.0];
        let predicted = [2.0, 2.0, 2.0];
        let m = RegressionMetrics::new(&predicted, &actual).unwrap();
        assert!(m.r2.abs() < 1e-12);
    }

    #[test]
    fn test_per_output_and_average() {
        let predictions = vec![vec![1.0, 10.0], vec![2.0, 20.0], vec![3.0, 32.0]];
        let targets = vec![vec![1.0, 10.0], vec![2.0, 20.0], vec![3.0, 30.0]];
        let per = per_output(&predictions, &targets).unwrap();
        assert_eq!(per.len(), 2);
        assert_eq!(per[0].mse, 0.0);
        assert!((per[1].mse - 4.0 / 3.0).abs() < 1e-12);

        let avg = average(&per).unwrap();
        assert!((avg.mse - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_set_has_no_metrics() {
        assert!(RegressionMetrics::new(&[], &[]).is_none());
        assert!(per_output(&[], &[]).is_none());
    }
}
