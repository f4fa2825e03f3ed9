pub use self::{metrics::*, trainer::*};

pub mod metrics;
pub mod trainer;
