//! Raw pushover curve returned by the analysis engine.

use serde::{Deserialize, Serialize};

/// Default acceptance threshold for the peak displacement, in mm.
///
/// Curves that stall before this displacement do not carry enough
/// information across the discretization stations and are dropped from
/// the dataset.
pub const DEFAULT_MIN_PEAK_DISPLACEMENT: f64 = 10.0;

/// One load-displacement curve from an incremental pushover analysis.
///
/// Both series share the analysis step index: `displacement` is in mm
/// and `base_shear` in kN. Displacement is non-decreasing in step index
/// but not guaranteed monotonic in value, since unstable equilibrium
/// iterations can briefly move backwards. A curve shorter than the
/// requested step count means the solver stopped converging early; that
/// is a partial result, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushoverCurve {
    displacement: Vec<f64>,
    base_shear: Vec<f64>,
}

/// The two curve series have different lengths.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display(
    "curve series lengths differ: {displacement} displacement vs {base_shear} base shear points"
)]
pub struct CurveLengthError {
    pub displacement: usize,
    pub base_shear: usize,
}

impl PushoverCurve {
    pub fn new(displacement: Vec<f64>, base_shear: Vec<f64>) -> Result<Self, CurveLengthError> {
        if displacement.len() != base_shear.len() {
            return Err(CurveLengthError {
                displacement: displacement.len(),
                base_shear: base_shear.len(),
            });
        }
        Ok(Self {
            displacement,
            base_shear,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.displacement.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.displacement.is_empty()
    }

    #[must_use]
    pub fn displacement(&self) -> &[f64] {
        &self.displacement
    }

    #[must_use]
    pub fn base_shear(&self) -> &[f64] {
        &self.base_shear
    }

    /// Largest displacement reached at any step, or `None` for an empty
    /// curve.
    #[must_use]
    pub fn peak_displacement(&self) -> Option<f64> {
        self.displacement.iter().copied().reduce(f64::max)
    }

    /// Whether the curve reached `displacement` mm at some step.
    ///
    /// The acceptance gate uses this with
    /// [`DEFAULT_MIN_PEAK_DISPLACEMENT`]: a peak exactly at the
    /// threshold is accepted.
    #[must_use]
    pub fn reaches(&self, displacement: f64) -> bool {
        self.peak_displacement()
            .is_some_and(|peak| peak >= displacement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatched_series_rejected() {
        let err = PushoverCurve::new(vec![0.0, 1.0], vec![0.0]).unwrap_err();
        assert_eq!(err.displacement, 2);
        assert_eq!(err.base_shear, 1);
    }

    #[test]
    fn test_peak_ignores_non_monotonic_tail() {
        let curve =
            PushoverCurve::new(vec![0.0, 5.0, 12.0, 11.5], vec![0.0, 100.0, 200.0, 190.0])
                .unwrap();
        assert_eq!(curve.peak_displacement(), Some(12.0));
    }

    #[test]
    fn test_empty_curve_has_no_peak() {
        let curve = PushoverCurve::new(vec![], vec![]).unwrap();
        assert_eq!(curve.peak_displacement(), None);
        assert!(!curve.reaches(DEFAULT_MIN_PEAK_DISPLACEMENT));
    }

    mod acceptance_boundary {
        use super::*;

        fn curve_with_peak(peak: f64) -> PushoverCurve {
            PushoverCurve::new(vec![0.0, peak], vec![0.0, 100.0]).unwrap()
        }

        #[test]
        fn test_peak_exactly_at_threshold_is_accepted() {
            assert!(curve_with_peak(10.0).reaches(DEFAULT_MIN_PEAK_DISPLACEMENT));
        }

        #[test]
        fn test_peak_below_threshold_is_rejected() {
            assert!(!curve_with_peak(9.999).reaches(DEFAULT_MIN_PEAK_DISPLACEMENT));
        }
    }
}
