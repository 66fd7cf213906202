pub mod error;
pub mod geometry;
pub mod mask;
pub mod math;
pub mod operations;
pub mod raster;

pub use error::{CurveMaskError, Result};
pub use mask::{CurveMask, DistortTransform, Identity, MaskParams};
