pub use self::{artifact::*, network::*, normalize::*};

pub mod artifact;
pub mod network;
pub mod normalize;
