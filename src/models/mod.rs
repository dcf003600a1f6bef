pub mod label;
pub mod topic;
pub mod unit;

pub use label::*;
pub use topic::*;
pub use unit::*;
