mod sample_shape;
mod self_intersect;
mod smooth_handles;

pub use sample_shape::{OutlineSource, SampleShape, SampledShape, SamplingParams};
pub use self_intersect::{FindSelfIntersections, IntersectionParams, SkipRange};
pub use smooth_handles::SmoothHandles;
