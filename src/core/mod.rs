//! Foundation types and math primitives.

pub mod quaternion;
pub mod types;

pub use quaternion::Quaternion;
pub use types::{CovarianceDiagonal, EstimateRecord, Vec3};
