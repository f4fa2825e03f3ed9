//! Min-max normalization of the 11 input parameters.
//!
//! The surrogate network's domain is the normalized input space, not the
//! physical parameter space, so the exact same bounds must be applied at
//! training time and at every prediction. The bounds travel inside the
//! model artifact together with a fingerprint over their bit patterns;
//! diverging bounds are thereby a detected load failure instead of a
//! silent corruption of every prediction.

use pushwall_model::{PARAM_COUNT, ParamBounds, WallParams};
use serde::{Deserialize, Serialize};

/// Per-dimension min/max pairs over the 11 input parameters.
///
/// Construction rejects degenerate ranges (`max <= min`), which would
/// otherwise divide by zero on the first normalize call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNormBounds", into = "RawNormBounds")]
pub struct NormBounds {
    mins: [f64; PARAM_COUNT],
    maxs: [f64; PARAM_COUNT],
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawNormBounds {
    mins: [f64; PARAM_COUNT],
    maxs: [f64; PARAM_COUNT],
}

/// A normalization range is empty or inverted.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("degenerate normalization range for {name}: min {min}, max {max}")]
pub struct NormBoundsError {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
}

impl NormBounds {
    pub fn new(mins: [f64; PARAM_COUNT], maxs: [f64; PARAM_COUNT]) -> Result<Self, NormBoundsError> {
        for i in 0..PARAM_COUNT {
            if maxs[i] <= mins[i] {
                return Err(NormBoundsError {
                    name: WallParams::LABELS[i],
                    min: mins[i],
                    max: maxs[i],
                });
            }
        }
        Ok(Self { mins, maxs })
    }

    /// Builds bounds from the sampling bounds.
    pub fn from_params(bounds: &ParamBounds) -> Result<Self, NormBoundsError> {
        Self::new(bounds.mins.to_array(), bounds.maxs.to_array())
    }

    #[must_use]
    pub fn mins(&self) -> &[f64; PARAM_COUNT] {
        &self.mins
    }

    #[must_use]
    pub fn maxs(&self) -> &[f64; PARAM_COUNT] {
        &self.maxs
    }

    /// Maps each dimension into [0, 1] (values outside the bounds map
    /// outside the unit interval; the transform is affine, not a clamp).
    #[must_use]
    pub fn normalize(&self, values: &[f64; PARAM_COUNT]) -> [f64; PARAM_COUNT] {
        let mut out = [0.0; PARAM_COUNT];
        for i in 0..PARAM_COUNT {
            out[i] = (values[i] - self.mins[i]) / (self.maxs[i] - self.mins[i]);
        }
        out
    }

    /// Inverse of [`normalize`](Self::normalize).
    #[must_use]
    pub fn denormalize(&self, values: &[f64; PARAM_COUNT]) -> [f64; PARAM_COUNT] {
        let mut out = [0.0; PARAM_COUNT];
        for i in 0..PARAM_COUNT {
            out[i] = values[i] * (self.maxs[i] - self.mins[i]) + self.mins[i];
        }
        out
    }

    /// Normalizes a parameter vector in field order.
    #[must_use]
    pub fn normalize_params(&self, params: &WallParams) -> [f64; PARAM_COUNT] {
        self.normalize(&params.to_array())
    }

    /// FNV-1a hash over the bit patterns of `mins` then `maxs`.
    ///
    /// Bitwise, so two bounds sets fingerprint equal exactly when every
    /// stored float is identical.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

        let mut hash = FNV_OFFSET;
        for value in self.mins.iter().chain(&self.maxs) {
            for byte in value.to_bits().to_le_bytes() {
                hash ^= u64::from(byte);
                hash = hash.wrapping_mul(FNV_PRIME);
            }
        }
        hash
    }
}

impl TryFrom<RawNormBounds> for NormBounds {
    type Error = NormBoundsError;

    fn try_from(raw: RawNormBounds) -> Result<Self, Self::Error> {
        Self::new(raw.mins, raw.maxs)
    }
}

impl From<NormBounds> for RawNormBounds {
    fn from(bounds: NormBounds) -> Self {
        Self {
            mins: bounds.mins,
            maxs: bounds.maxs,
        }
    }
}
