use thiserror::Error;

/// Top-level error type for curve mask computation.
#[derive(Debug, Error)]
pub enum CurveMaskError {
    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Raster(#[from] RasterError),
}

/// Errors related to the shape definition itself.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("shape has {count} vertices, at least {min} are required")]
    TooFewVertices { count: usize, min: usize },
}

/// Errors raised while producing a mask from a valid shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RasterError {
    #[error("distortion transform rejected the {stage} points")]
    TransformRejected { stage: &'static str },

    #[error("invalid target resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },
}

/// Convenience type alias for results using [`CurveMaskError`].
pub type Result<T> = std::result::Result<T, CurveMaskError>;
