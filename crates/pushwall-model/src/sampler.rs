//! Random sampling of wall parameters within conditioned bounds.

use rand::Rng;

use crate::params::{
    BoundsError, LENGTH_TO_THICKNESS_RATIO, ParamBounds, WEB_TO_BOUNDARY_CAP, WallParams,
};

/// Draws uniformly random [`WallParams`] from validated bounds.
///
/// Most parameters are independent uniform draws. Two are conditioned on
/// earlier draws:
///
/// - wall length ~ U[[`LENGTH_TO_THICKNESS_RATIO`] x thickness, max length]
/// - each web reinforcement ratio ~ U[min, [`WEB_TO_BOUNDARY_CAP`] x the
///   corresponding sampled boundary-element ratio]
///
/// Bounds are validated at construction, so drawing itself is
/// infallible; the only side effect is RNG state advancement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSampler {
    bounds: ParamBounds,
}

impl ParamSampler {
    /// Validates `bounds` (including the conditioned ranges) and builds
    /// a sampler. Malformed bounds fail here, before any analysis runs.
    pub fn new(bounds: ParamBounds) -> Result<Self, BoundsError> {
        bounds.validate()?;
        Ok(Self { bounds })
    }

    #[must_use]
    pub fn bounds(&self) -> &ParamBounds {
        &self.bounds
    }

    /// Draws one parameter vector.
    pub fn draw<R>(&self, rng: &mut R) -> WallParams
    where
        R: Rng + ?Sized,
    {
        let mins = &self.bounds.mins;
        let maxs = &self.bounds.maxs;

        let thickness = rng.random_range(mins.thickness..=maxs.thickness);
        let length = rng.random_range(LENGTH_TO_THICKNESS_RATIO * thickness..=maxs.length);
        let boundary_length_ratio =
            rng.random_range(mins.boundary_length_ratio..=maxs.boundary_length_ratio);
        let boundary_long_ratio =
            rng.random_range(mins.boundary_long_ratio..=maxs.boundary_long_ratio);
        let boundary_trans_ratio =
            rng.random_range(mins.boundary_trans_ratio..=maxs.boundary_trans_ratio);
        let web_long_ratio =
            rng.random_range(mins.web_long_ratio..=WEB_TO_BOUNDARY_CAP * boundary_long_ratio);
        let web_trans_ratio =
            rng.random_range(mins.web_trans_ratio..=WEB_TO_BOUNDARY_CAP * boundary_trans_ratio);

        WallParams {
            thickness,
            length,
            boundary_length_ratio,
            boundary_long_ratio,
            boundary_trans_ratio,
            web_long_ratio,
            web_trans_ratio,
            axial_load_ratio: rng.random_range(mins.axial_load_ratio..=maxs.axial_load_ratio),
            height: rng.random_range(mins.height..=maxs.height),
            concrete_strength: rng
                .random_range(mins.concrete_strength..=maxs.concrete_strength),
            steel_yield: rng.random_range(mins.steel_yield..=maxs.steel_yield),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_malformed_bounds_fail_at_construction() {
        let mut bounds = ParamBounds::reference();
        bounds.mins.steel_yield = 700e6;
        assert!(ParamSampler::new(bounds).is_err());
    }

    #[test]
    fn test_draws_honor_conditional_constraints() {
        let bounds = ParamBounds::reference();
        let sampler = ParamSampler::new(bounds).unwrap();
        let mut rng = Pcg32::seed_from_u64(7);

        for _ in 0..10_000 {
            let params = sampler.draw(&mut rng);
            assert!(params.length >= LENGTH_TO_THICKNESS_RATIO * params.thickness);
            assert!(params.web_long_ratio <= WEB_TO_BOUNDARY_CAP * params.boundary_long_ratio);
            assert!(params.web_trans_ratio <= WEB_TO_BOUNDARY_CAP * params.boundary_trans_ratio);
        }
    }

    #[test]
    fn test_draws_stay_within_unconditioned_bounds() {
        let bounds = ParamBounds::reference();
        let sampler = ParamSampler::new(bounds).unwrap();
        let mut rng = Pcg32::seed_from_u64(11);

        let mins = bounds.mins.to_array();
        let maxs = bounds.maxs.to_array();
        // web ratios (indices 5 and 6) are capped by the sampled
        // boundary-element ratio, not by the global maximum
        let web_indices = [5, 6];
        for _ in 0..1_000 {
            let values = sampler.draw(&mut rng).to_array();
            for i in 0..values.len() {
                assert!(values[i] >= mins[i], "{} below min", WallParams::LABELS[i]);
                if !web_indices.contains(&i) {
                    assert!(values[i] <= maxs[i], "{} above max", WallParams::LABELS[i]);
                }
            }
        }
    }

    #[test]
    fn test_seeded_draws_are_reproducible() {
        let sampler = ParamSampler::new(ParamBounds::reference()).unwrap();
        let a = sampler.draw(&mut Pcg32::seed_from_u64(42));
        let b = sampler.draw(&mut Pcg32::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
