pub use self::{curve::*, params::*, runner::*, sampler::*};

pub mod curve;
pub mod params;
pub mod runner;
pub mod sampler;
