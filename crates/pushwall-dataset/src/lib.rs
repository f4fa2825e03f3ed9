pub use self::{discretize::*, processed::*, raw_store::*, split::*, stations::*};

pub mod discretize;
pub mod processed;
pub mod raw_store;
pub mod split;
pub mod stations;
