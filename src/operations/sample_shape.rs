use tracing::{debug, trace};

use crate::error::{RasterError, Result};
use crate::geometry::{Shape, Vertex};
use crate::math::arc_2d::bridge_arc;
use crate::math::bezier_2d::{smoothstep_radius, CubicBez};
use crate::math::raster_2d::PixelPoint;
use crate::math::{Point2, Vector2};

/// Parameters controlling adaptive sampling.
#[derive(Debug, Clone, Copy)]
pub struct SamplingParams {
    /// Consecutive samples must differ by less than this many pixels on
    /// both axes (compared on the pixel grid).
    pub max_pixel_step: i64,
    /// Parameter intervals narrower than this are never split again.
    pub min_interval: f64,
    /// Offset curves meeting at a vertex further apart than this (on
    /// either axis, in pixels) are bridged with an arc.
    pub corner_gap_threshold: f64,
    /// Bridging arcs shorter than this (in pixels) are not inserted.
    pub min_arc_length: f64,
    /// Parameter shift used to recover a tangent at a cusp.
    pub cusp_nudge: f64,
    /// How many border samples back the arc direction hint is taken from.
    pub arc_hint_lookback: usize,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            max_pixel_step: 2,
            min_interval: 1e-4,
            corner_gap_threshold: 1.0,
            min_arc_length: 2.0,
            cusp_nudge: 1e-4,
            arc_hint_lookback: 10,
        }
    }
}

/// Which of the two outlines of a shape is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutlineSource {
    /// The shape where it is drawn.
    #[default]
    Destination,
    /// The clone source, displaced by the shape's source offset.
    Source,
}

/// Pixel-space polylines of a shape and of its offset border.
///
/// When a border is present, `border[i]` is the offset partner of
/// `curve[i]`; both vectors have the same length.
#[derive(Debug, Clone, Default)]
pub struct SampledShape {
    /// Samples of the shape curve.
    pub curve: Vec<Point2>,
    /// Samples of the offset curve, empty when no border was requested.
    pub border: Vec<Point2>,
    /// Index of the first sample of each segment.
    pub segment_starts: Vec<usize>,
}

impl SampledShape {
    /// Returns `true` when the offset polyline was sampled.
    #[must_use]
    pub fn has_border(&self) -> bool {
        !self.border.is_empty()
    }

    fn push(&mut self, curve: Point2, border: Option<Point2>) {
        self.curve.push(curve);
        if let Some(b) = border {
            self.border.push(b);
        }
    }
}

/// One cubic segment in pixel space with its signed end radii.
struct Segment {
    bez: CubicBez,
    r0: f64,
    r1: f64,
}

impl Segment {
    fn radius(&self, t: f64) -> f64 {
        smoothstep_radius(self.r0, self.r1, t)
    }
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    curve: Point2,
    border: Option<Point2>,
}

/// Samples a shape and its offset border into near-uniformly spaced
/// polylines in pixel space, before any distortion.
#[derive(Debug)]
pub struct SampleShape<'a> {
    shape: &'a Shape,
    width: u32,
    height: u32,
    source: OutlineSource,
    with_border: bool,
    params: SamplingParams,
}

impl<'a> SampleShape<'a> {
    /// Creates a sampling operation for a `width × height` target raster.
    #[must_use]
    pub fn new(shape: &'a Shape, width: u32, height: u32) -> Self {
        Self {
            shape,
            width,
            height,
            source: OutlineSource::Destination,
            with_border: true,
            params: SamplingParams::default(),
        }
    }

    /// Selects the destination or clone-source outline.
    #[must_use]
    pub fn with_source(mut self, source: OutlineSource) -> Self {
        self.source = source;
        self
    }

    /// Enables or disables sampling of the offset border.
    #[must_use]
    pub fn with_border(mut self, with_border: bool) -> Self {
        self.with_border = with_border;
        self
    }

    /// Overrides the sampling parameters.
    #[must_use]
    pub fn with_params(mut self, params: SamplingParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the sampling.
    ///
    /// The border is only sampled for rings of at least 3 vertices.
    ///
    /// # Errors
    ///
    /// Returns `RasterError::InvalidResolution` for a zero-sized raster.
    pub fn execute(&self) -> Result<SampledShape> {
        if self.width == 0 || self.height == 0 {
            return Err(RasterError::InvalidResolution {
                width: self.width,
                height: self.height,
            }
            .into());
        }

        let n = self.shape.len();
        let mut out = SampledShape::default();
        if n == 0 {
            return Ok(out);
        }

        let border = self.with_border && n >= 3;
        let sign = self.shape.orientation().offset_sign();
        let scale = f64::from(self.width.min(self.height));
        let vertices = self.shape.vertices();
        let mut corner_arcs = 0;

        for k in 0..n {
            let a = &vertices[k];
            let b = &vertices[(k + 1) % n];
            let seg = self.segment(a, b, sign * a.offset_out * scale, sign * b.offset_in * scale);

            out.segment_starts.push(out.curve.len());
            let start = self.sample(&seg, 0.0);
            let end = self.sample(&seg, 1.0);
            self.subdivide(&seg, 0.0, 1.0, start, end, border, &mut out);

            if border {
                let c = &vertices[(k + 2) % n];
                let next = self.segment(b, c, sign * b.offset_out * scale, sign * c.offset_in * scale);
                if self.bridge_corner(&next, &mut out) {
                    corner_arcs += 1;
                }
            }
        }

        debug!(
            vertices = n,
            samples = out.curve.len(),
            border = border,
            corner_arcs,
            "sampled shape"
        );
        Ok(out)
    }

    /// Pixel-space position of a normalized point on the selected outline.
    fn to_pixels(&self, p: Point2) -> Point2 {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        let shift = match (self.source, self.shape.source_offset()) {
            (OutlineSource::Source, Some(off)) => Vector2::new(off.x * w, off.y * h),
            _ => Vector2::zeros(),
        };
        Point2::new(p.x * w + shift.x, p.y * h + shift.y)
    }

    fn segment(&self, a: &Vertex, b: &Vertex, r0: f64, r1: f64) -> Segment {
        Segment {
            bez: CubicBez::new(
                self.to_pixels(a.corner),
                self.to_pixels(a.handle_out_or_corner()),
                self.to_pixels(b.handle_in_or_corner()),
                self.to_pixels(b.corner),
            ),
            r0,
            r1,
        }
    }

    fn sample(&self, seg: &Segment, t: f64) -> Sample {
        let (curve, border) = seg.bez.eval_with_offset(seg.r0, seg.r1, t);
        Sample { curve, border }
    }

    /// Offset point at `t`, recovering the tangent from a nearby parameter
    /// at a cusp. Falls back to the curve point itself.
    fn border_at(&self, seg: &Segment, t: f64, sample: Sample) -> Point2 {
        if let Some(b) = sample.border {
            return b;
        }
        let nudged = if t > 0.5 {
            t - self.params.cusp_nudge
        } else {
            t + self.params.cusp_nudge
        };
        match seg.bez.unit_normal(nudged) {
            Some(normal) => {
                trace!(t, "cusp: offset normal taken from nudged parameter");
                sample.curve + normal * seg.radius(t)
            }
            None => {
                trace!(t, "cusp: degenerate segment, zero-width border sample");
                sample.curve
            }
        }
    }

    fn close_enough(&self, a: &Sample, b: &Sample, border: bool) -> bool {
        let step = self.params.max_pixel_step;
        let near = |p: Point2, q: Point2| PixelPoint::containing(p).chebyshev(PixelPoint::containing(q)) < step;
        if !near(a.curve, b.curve) {
            return false;
        }
        if !border {
            return true;
        }
        match (a.border, b.border) {
            (Some(p), Some(q)) => near(p, q),
            _ => true,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn subdivide(
        &self,
        seg: &Segment,
        t_min: f64,
        t_max: f64,
        min: Sample,
        max: Sample,
        border: bool,
        out: &mut SampledShape,
    ) {
        if t_max - t_min < self.params.min_interval || self.close_enough(&min, &max, border) {
            let b = border.then(|| self.border_at(seg, t_max, max));
            out.push(max.curve, b);
            return;
        }
        let t_mid = 0.5 * (t_min + t_max);
        let mid = self.sample(seg, t_mid);
        self.subdivide(seg, t_min, t_mid, min, mid, border, out);
        self.subdivide(seg, t_mid, t_max, mid, max, border, out);
    }

    /// Inserts an arc between the border exiting the last sampled segment
    /// and the border entering `next`, when they are visibly apart.
    fn bridge_corner(&self, next: &Segment, out: &mut SampledShape) -> bool {
        let (Some(&exit), Some(&corner)) = (out.border.last(), out.curve.last()) else {
            return false;
        };
        let entry = self.border_at(next, 0.0, self.sample(next, 0.0));
        let gap = entry - exit;
        let threshold = self.params.corner_gap_threshold;
        if gap.x.abs() <= threshold && gap.y.abs() <= threshold {
            return false;
        }

        let hint_index = out.border.len().saturating_sub(1 + self.params.arc_hint_lookback);
        let hint = out.border[hint_index];
        let arc = bridge_arc(corner, exit, entry, hint, self.params.min_arc_length);
        if arc.is_empty() {
            return false;
        }
        trace!(points = arc.len(), x = corner.x, y = corner.y, "bridged border gap at corner");
        for p in arc {
            out.push(corner, Some(p));
        }
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::CurveMaskError;
    use crate::geometry::Vertex;
    use approx::assert_relative_eq;

    fn pinned_square(offset: f64) -> Shape {
        let corners = [(0.1, 0.1), (0.9, 0.1), (0.9, 0.9), (0.1, 0.9)];
        Shape::new(
            corners
                .iter()
                .map(|&(x, y)| {
                    let p = Point2::new(x, y);
                    Vertex::pinned(p, p, p).with_offsets(offset, offset)
                })
                .collect(),
        )
    }

    fn outside_distance(p: Point2) -> f64 {
        let dx = (10.0 - p.x).max(p.x - 90.0).max(0.0);
        let dy = (10.0 - p.y).max(p.y - 90.0).max(0.0);
        (dx * dx + dy * dy).sqrt()
    }

    #[test]
    fn straight_edges_are_densely_and_cheaply_sampled() {
        let shape = pinned_square(0.0);
        let sampled = SampleShape::new(&shape, 100, 100).execute().unwrap();
        let n = sampled.curve.len();
        // Perimeter is 320 px.
        assert!((160..=1280).contains(&n), "unexpected sample count {n}");
        for i in 0..n {
            let a = PixelPoint::containing(sampled.curve[i]);
            let b = PixelPoint::containing(sampled.curve[(i + 1) % n]);
            assert!(a.chebyshev(b) <= 1, "gap between samples {i} and {}", i + 1);
        }
        assert_eq!(sampled.segment_starts.len(), 4);
        assert_eq!(sampled.segment_starts[0], 0);
    }

    #[test]
    fn sample_count_does_not_depend_on_depth_cap() {
        let shape = pinned_square(0.0);
        let coarse = SampleShape::new(&shape, 100, 100).execute().unwrap();
        let params = SamplingParams {
            min_interval: 1e-9,
            ..SamplingParams::default()
        };
        let fine = SampleShape::new(&shape, 100, 100)
            .with_params(params)
            .execute()
            .unwrap();
        assert_eq!(coarse.curve.len(), fine.curve.len());
    }

    #[test]
    fn zero_offset_border_matches_curve() {
        let shape = pinned_square(0.0);
        let sampled = SampleShape::new(&shape, 100, 100).execute().unwrap();
        assert_eq!(sampled.border.len(), sampled.curve.len());
        for (c, b) in sampled.curve.iter().zip(&sampled.border) {
            assert_eq!(c, b);
        }
    }

    #[test]
    fn uniform_offset_stays_at_constant_distance() {
        let shape = pinned_square(0.05);
        let sampled = SampleShape::new(&shape, 100, 100).execute().unwrap();
        assert_eq!(sampled.border.len(), sampled.curve.len());
        for b in &sampled.border {
            assert!((outside_distance(*b) - 5.0).abs() < 1e-6, "border point {b} off the band");
        }
    }

    #[test]
    fn segments_blend_from_outgoing_to_incoming_radius() {
        let radii = [(0.05, 0.02), (0.08, 0.03), (0.03, 0.05), (0.05, 0.05)];
        let corners = [(0.1, 0.1), (0.9, 0.1), (0.9, 0.9), (0.1, 0.9)];
        let shape = Shape::new(
            corners
                .iter()
                .zip(radii)
                .map(|(&(x, y), (r_in, r_out))| {
                    let p = Point2::new(x, y);
                    Vertex::pinned(p, p, p).with_offsets(r_in, r_out)
                })
                .collect(),
        );
        let sampled = SampleShape::new(&shape, 100, 100).execute().unwrap();

        // Top edge starts at the first vertex's outgoing radius (2 px)...
        let first = sampled.border[0];
        assert!(first.y < 10.0);
        let near_start = 10.0 - first.y;
        assert!((2.0..2.5).contains(&near_start), "radius {near_start} near t=0");

        // ...and ends at the second vertex's incoming radius (8 px).
        let corner = Point2::new(90.0, 10.0);
        let end = sampled.curve.iter().position(|p| *p == corner).unwrap();
        assert!(end < sampled.segment_starts[1]);
        assert_relative_eq!(sampled.border[end].y, 2.0, epsilon = 1e-9);
        assert_relative_eq!(sampled.border[end].x, 90.0, epsilon = 1e-9);

        // The right edge runs at the second vertex's outgoing radius (3 px).
        let right = sampled.border[sampled.segment_starts[1]];
        assert_relative_eq!(right.x, 93.0, epsilon = 1e-9);
    }

    #[test]
    fn sharp_corners_are_bridged_with_arcs() {
        let shape = pinned_square(0.05);
        let sampled = SampleShape::new(&shape, 100, 100).execute().unwrap();
        for corner in [(10.0, 10.0), (90.0, 10.0), (90.0, 90.0), (10.0, 90.0)] {
            let c = Point2::new(corner.0, corner.1);
            let on_arc = sampled
                .curve
                .iter()
                .zip(&sampled.border)
                .filter(|(p, b)| {
                    **p == c && (b.x - 50.0).abs() > 40.0 && (b.y - 50.0).abs() > 40.0
                })
                .count();
            assert!(on_arc >= 5, "corner {c} bridged with {on_arc} points");
        }
    }

    #[test]
    fn counter_clockwise_offset_still_grows_outward() {
        let mut shape = pinned_square(0.05);
        shape.vertices_mut().reverse();
        let sampled = SampleShape::new(&shape, 100, 100).execute().unwrap();
        for b in &sampled.border {
            assert!(outside_distance(*b) > 4.0);
        }
    }

    #[test]
    fn source_outline_is_translated() {
        let shape = pinned_square(0.0).with_source_offset(Vector2::new(0.05, -0.02));
        let dest = SampleShape::new(&shape, 200, 100).execute().unwrap();
        let src = SampleShape::new(&shape, 200, 100)
            .with_source(OutlineSource::Source)
            .execute()
            .unwrap();
        assert_eq!(dest.curve.len(), src.curve.len());
        let d = src.curve[0] - dest.curve[0];
        assert!((d.x - 10.0).abs() < 1e-9 && (d.y + 2.0).abs() < 1e-9);
    }

    #[test]
    fn small_rings_skip_the_border() {
        let shape = Shape::new(vec![
            Vertex::new(Point2::new(0.2, 0.2)),
            Vertex::new(Point2::new(0.8, 0.6)),
        ]);
        let sampled = SampleShape::new(&shape, 50, 50).execute().unwrap();
        assert!(!sampled.curve.is_empty());
        assert!(!sampled.has_border());
    }

    #[test]
    fn zero_resolution_is_rejected() {
        let shape = pinned_square(0.0);
        let err = SampleShape::new(&shape, 0, 100).execute().unwrap_err();
        assert!(matches!(
            err,
            CurveMaskError::Raster(RasterError::InvalidResolution { width: 0, height: 100 })
        ));
    }
}
