//! Full mask pipeline: sampling, distortion, loop removal and rasterization.

use tracing::{debug, warn};

use crate::error::{RasterError, Result};
use crate::geometry::Shape;
use crate::math::Point2;
use crate::operations::{FindSelfIntersections, IntersectionParams, OutlineSource, SampleShape, SamplingParams};
use crate::raster::{BorderPolyline, BoundaryMarks, FalloffBand, MaskRect, OpacityMask};

/// A geometric distortion applied by the host pipeline to sampled pixel
/// coordinates, in place. Returns `false` when the points cannot be mapped.
pub trait DistortTransform {
    fn distort(&self, points: &mut [Point2]) -> bool;
}

impl<F> DistortTransform for F
where
    F: Fn(&mut [Point2]) -> bool,
{
    fn distort(&self, points: &mut [Point2]) -> bool {
        self(points)
    }
}

/// The transform that leaves every point where it is.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl DistortTransform for Identity {
    fn distort(&self, _points: &mut [Point2]) -> bool {
        true
    }
}

/// Parameters of the whole mask pipeline.
#[derive(Debug, Clone, Copy)]
pub struct MaskParams {
    pub sampling: SamplingParams,
    pub intersections: IntersectionParams,
    /// Pixels added around the outline on every side of the mask rectangle.
    pub margin: i64,
}

impl Default for MaskParams {
    fn default() -> Self {
        Self {
            sampling: SamplingParams::default(),
            intersections: IntersectionParams::default(),
            margin: 2,
        }
    }
}

/// Rasterizes a shape and its feathered border into an opacity mask for a
/// `width × height` image.
///
/// Handles are used as they are; run
/// [`SmoothHandles`](crate::operations::SmoothHandles) first on shapes with
/// auto-smoothed vertices.
#[derive(Debug)]
pub struct CurveMask<'a> {
    shape: &'a Shape,
    width: u32,
    height: u32,
    source: OutlineSource,
    params: MaskParams,
}

/// Distorted outline ready for rasterization.
struct Outline {
    curve: Vec<Point2>,
    border: BorderPolyline,
}

impl<'a> CurveMask<'a> {
    #[must_use]
    pub fn new(shape: &'a Shape, width: u32, height: u32) -> Self {
        Self {
            shape,
            width,
            height,
            source: OutlineSource::Destination,
            params: MaskParams::default(),
        }
    }

    /// Selects the destination or clone-source outline.
    #[must_use]
    pub fn with_source(mut self, source: OutlineSource) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn with_params(mut self, params: MaskParams) -> Self {
        self.params = params;
        self
    }

    /// Computes the opacity mask: 1 inside the shape, a linear ramp down to
    /// 0 across the border band, 0 elsewhere.
    ///
    /// # Errors
    ///
    /// - `ShapeError::TooFewVertices` if the shape is not a closed ring.
    /// - `RasterError::InvalidResolution` for a zero-sized image.
    /// - `RasterError::TransformRejected` if `transform` fails; no mask is
    ///   produced.
    #[tracing::instrument(skip_all, fields(width = self.width, height = self.height, source = ?self.source))]
    pub fn get_mask<T>(&self, transform: &T) -> Result<OpacityMask>
    where
        T: DistortTransform + ?Sized,
    {
        let outline = self.outline(self.source, transform)?;
        let Some(rect) = self.bounds(&outline) else {
            return Ok(OpacityMask::default());
        };

        let mut mask = BoundaryMarks::new(&outline.curve, rect).fill();
        FalloffBand::new(&outline.curve, &outline.border).draw(&mut mask);
        debug!(
            x = rect.x,
            y = rect.y,
            w = rect.width,
            h = rect.height,
            "computed opacity mask"
        );
        Ok(mask)
    }

    /// The rectangle [`CurveMask::get_mask`] would cover, without
    /// rasterizing.
    ///
    /// # Errors
    ///
    /// Same as [`CurveMask::get_mask`].
    #[tracing::instrument(skip_all, fields(width = self.width, height = self.height, source = ?self.source))]
    pub fn area<T>(&self, transform: &T) -> Result<MaskRect>
    where
        T: DistortTransform + ?Sized,
    {
        let outline = self.outline(self.source, transform)?;
        Ok(self.bounds(&outline).unwrap_or_default())
    }

    /// The rectangle covered by the clone-source outline.
    ///
    /// # Errors
    ///
    /// Same as [`CurveMask::get_mask`].
    #[tracing::instrument(skip_all, fields(width = self.width, height = self.height))]
    pub fn source_area<T>(&self, transform: &T) -> Result<MaskRect>
    where
        T: DistortTransform + ?Sized,
    {
        let outline = self.outline(OutlineSource::Source, transform)?;
        Ok(self.bounds(&outline).unwrap_or_default())
    }

    fn outline<T>(&self, source: OutlineSource, transform: &T) -> Result<Outline>
    where
        T: DistortTransform + ?Sized,
    {
        self.shape.validate()?;
        let sampled = SampleShape::new(self.shape, self.width, self.height)
            .with_source(source)
            .with_params(self.params.sampling)
            .execute()?;
        let mut curve = sampled.curve;
        let mut border = sampled.border;

        if !transform.distort(&mut curve) {
            warn!(points = curve.len(), "distortion rejected the curve samples");
            return Err(RasterError::TransformRejected { stage: "curve" }.into());
        }
        if !border.is_empty() && !transform.distort(&mut border) {
            warn!(points = border.len(), "distortion rejected the border samples");
            return Err(RasterError::TransformRejected { stage: "border" }.into());
        }

        let ranges = FindSelfIntersections::new(&border)
            .with_params(self.params.intersections)
            .execute();
        Ok(Outline {
            curve,
            border: BorderPolyline::new(border, &ranges),
        })
    }

    fn bounds(&self, outline: &Outline) -> Option<MaskRect> {
        let visible = outline.border.visible_points();
        MaskRect::bounding(
            outline.curve.iter().chain(&visible).copied(),
            self.params.margin,
        )
    }
}
