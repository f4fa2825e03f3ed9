//! Wall parameter vector and sampling bounds.
//!
//! A shear wall is described by 11 real-valued quantities
//! ([`WallParams`]). Each quantity has a closed `[min, max]` interval
//! ([`ParamBounds`]) within which the sampler draws values. Two of the
//! intervals are conditional: the wall length is bounded below by
//! [`LENGTH_TO_THICKNESS_RATIO`] times the sampled thickness, and each
//! web reinforcement ratio is bounded above by [`WEB_TO_BOUNDARY_CAP`]
//! times the corresponding sampled boundary-element ratio.
//!
//! Bounds are validated once, up front, so that sampling itself cannot
//! fail (see [`ParamSampler`](crate::sampler::ParamSampler)).

use serde::{Deserialize, Serialize};

/// Number of parameters describing one wall.
pub const PARAM_COUNT: usize = 11;

/// Minimum wall length as a multiple of the sampled thickness.
pub const LENGTH_TO_THICKNESS_RATIO: f64 = 6.0;

/// Maximum web reinforcement ratio as a fraction of the corresponding
/// sampled boundary-element ratio.
pub const WEB_TO_BOUNDARY_CAP: f64 = 0.6;

/// The 11 geometric and material parameters of one RC shear wall.
///
/// Lengths are in meters, strengths in Pa, the remaining quantities are
/// dimensionless ratios.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallParams {
    /// Wall thickness (m).
    pub thickness: f64,
    /// Total wall length (m).
    pub length: f64,
    /// Boundary-element length as a fraction of the wall length.
    pub boundary_length_ratio: f64,
    /// Boundary-element longitudinal reinforcement ratio.
    pub boundary_long_ratio: f64,
    /// Boundary-element transverse reinforcement ratio.
    pub boundary_trans_ratio: f64,
    /// Web longitudinal reinforcement ratio.
    pub web_long_ratio: f64,
    /// Web transverse reinforcement ratio.
    pub web_trans_ratio: f64,
    /// Axial load as a fraction of the axial capacity.
    pub axial_load_ratio: f64,
    /// Wall height (m).
    pub height: f64,
    /// Concrete compressive strength (Pa).
    pub concrete_strength: f64,
    /// Steel yield strength (Pa).
    pub steel_yield: f64,
}

impl WallParams {
    /// Short labels for the 11 parameters, in vector order.
    pub const LABELS: [&'static str; PARAM_COUNT] = [
        "thickness",
        "length",
        "boundary_length_ratio",
        "boundary_long_ratio",
        "boundary_trans_ratio",
        "web_long_ratio",
        "web_trans_ratio",
        "axial_load_ratio",
        "height",
        "concrete_strength",
        "steel_yield",
    ];

    /// Returns the parameters as a fixed-order array.
    #[must_use]
    pub fn to_array(&self) -> [f64; PARAM_COUNT] {
        [
            self.thickness,
            self.length,
            self.boundary_length_ratio,
            self.boundary_long_ratio,
            self.boundary_trans_ratio,
            self.web_long_ratio,
            self.web_trans_ratio,
            self.axial_load_ratio,
            self.height,
            self.concrete_strength,
            self.steel_yield,
        ]
    }

    /// Reconstructs parameters from a fixed-order array.
    #[must_use]
    pub fn from_array(values: [f64; PARAM_COUNT]) -> Self {
        Self {
            thickness: values[0],
            length: values[1],
            boundary_length_ratio: values[2],
            boundary_long_ratio: values[3],
            boundary_trans_ratio: values[4],
            web_long_ratio: values[5],
            web_trans_ratio: values[6],
            axial_load_ratio: values[7],
            height: values[8],
            concrete_strength: values[9],
            steel_yield: values[10],
        }
    }
}

/// Closed sampling intervals for each of the 11 parameters.
///
/// `mins` and `maxs` are stored as [`WallParams`] so that each bound is
/// addressed by field name rather than by index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamBounds {
    pub mins: WallParams,
    pub maxs: WallParams,
}

/// Malformed sampling bounds, detected before any analysis runs.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum BoundsError {
    /// A per-parameter interval has `min > max`.
    #[display("bounds for {name} are inverted: min {min} exceeds max {max}")]
    Inverted {
        name: &'static str,
        min: f64,
        max: f64,
    },
    /// No thickness in range admits a wall length within the length
    /// bounds once the 6x constraint applies.
    #[display(
        "conditioned length range is empty: 6 x max thickness {thickness_max} exceeds max length {length_max}"
    )]
    EmptyLengthRange { thickness_max: f64, length_max: f64 },
    /// A web ratio minimum exceeds the 0.6x cap at the smallest possible
    /// boundary-element ratio.
    #[display(
        "conditioned range for {name} is empty: min {web_min} exceeds 0.6 x boundary min {boundary_min}"
    )]
    EmptyWebRange {
        name: &'static str,
        web_min: f64,
        boundary_min: f64,
    },
}

impl ParamBounds {
    /// The reference bounds of the shear-wall study.
    #[must_use]
    pub const fn reference() -> Self {
        Self {
            mins: WallParams {
                thickness: 0.125,
                length: 0.75,
                boundary_length_ratio: 0.15,
                boundary_long_ratio: 0.01,
                boundary_trans_ratio: 0.0075,
                web_long_ratio: 0.0025,
                web_trans_ratio: 0.0025,
                axial_load_ratio: 0.01,
                height: 3.0,
                concrete_strength: 25e6,
                steel_yield: 380e6,
            },
            maxs: WallParams {
                thickness: 0.40,
                length: 3.00,
                boundary_length_ratio: 0.30,
                boundary_long_ratio: 0.04,
                boundary_trans_ratio: 0.015,
                web_long_ratio: 0.025,
                web_trans_ratio: 0.0080,
                axial_load_ratio: 0.10,
                height: 3.5,
                concrete_strength: 60e6,
                steel_yield: 600e6,
            },
        }
    }

    /// Checks every interval, including the two conditioned ones.
    ///
    /// The conditioned checks use the worst case over the conditioning
    /// parameter: the largest thickness for the length range and the
    /// smallest boundary-element ratio for the web ranges. A bounds set
    /// that passes this check can never produce an empty sampling range.
    pub fn validate(&self) -> Result<(), BoundsError> {
        let mins = self.mins.to_array();
        let maxs = self.maxs.to_array();
        for (i, name) in WallParams::LABELS.iter().enumerate() {
            if mins[i] > maxs[i] {
                return Err(BoundsError::Inverted {
                    name,
                    min: mins[i],
                    max: maxs[i],
                });
            }
        }

        if LENGTH_TO_THICKNESS_RATIO * self.maxs.thickness > self.maxs.length {
            return Err(BoundsError::EmptyLengthRange {
                thickness_max: self.maxs.thickness,
                length_max: self.maxs.length,
            });
        }

        let web_checks = [
            (
                "web_long_ratio",
                self.mins.web_long_ratio,
                self.mins.boundary_long_ratio,
            ),
            (
                "web_trans_ratio",
                self.mins.web_trans_ratio,
                self.mins.boundary_trans_ratio,
            ),
        ];
        for (name, web_min, boundary_min) in web_checks {
            if web_min > WEB_TO_BOUNDARY_CAP * boundary_min {
                return Err(BoundsError::EmptyWebRange {
                    name,
                    web_min,
                    boundary_min,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_bounds_are_valid() {
        ParamBounds::reference().validate().unwrap();
    }

    #[test]
    fn test_inverted_interval_is_rejected() {
        let mut bounds = ParamBounds::reference();
        bounds.mins.height = 4.0;
        let err = bounds.validate().unwrap_err();
        assert!(matches!(err, BoundsError::Inverted { name: "height", .. }));
    }

    #[test]
    fn test_empty_length_range_is_rejected() {
        let mut bounds = ParamBounds::reference();
        // 6 x 0.6 = 3.6 > 3.0, so a thick wall could not fit any length
        bounds.maxs.thickness = 0.6;
        let err = bounds.validate().unwrap_err();
        assert!(matches!(err, BoundsError::EmptyLengthRange { .. }));
    }

    #[test]
    fn test_empty_web_range_is_rejected() {
        let mut bounds = ParamBounds::reference();
        // cap at the smallest boundary ratio is 0.6 x 0.01 = 0.006
        bounds.mins.web_long_ratio = 0.007;
        let err = bounds.validate().unwrap_err();
        assert!(matches!(
            err,
            BoundsError::EmptyWebRange {
                name: "web_long_ratio",
                ..
            }
        ));
    }

    #[test]
    fn test_array_roundtrip() {
        let bounds = ParamBounds::reference();
        let array = bounds.mins.to_array();
        assert_eq!(WallParams::from_array(array), bounds.mins);
    }
}
