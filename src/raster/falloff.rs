use tracing::trace;

use crate::math::raster_2d::PixelPoint;
use crate::math::Point2;

use super::{BorderPolyline, OpacityMask};

/// The linear falloff band between a shape polyline and its offset border.
///
/// Sample `i` of the curve is joined to sample `i` of the border, or to the
/// first drawable border sample after a skipped loop.
#[derive(Debug)]
pub struct FalloffBand<'a> {
    curve: &'a [Point2],
    border: &'a BorderPolyline,
}

impl<'a> FalloffBand<'a> {
    #[must_use]
    pub fn new(curve: &'a [Point2], border: &'a BorderPolyline) -> Self {
        Self { curve, border }
    }

    /// Draws the band into `mask`, keeping the larger of the existing and
    /// the new opacity at every pixel. Returns the number of segments drawn.
    pub fn draw(&self, mask: &mut OpacityMask) -> usize {
        let n = self.curve.len().min(self.border.len());
        let border = self.border.points();
        let mut redirect: Option<usize> = None;
        let mut previous: Option<(Point2, Point2)> = None;
        let mut drawn = 0;

        for i in 0..n {
            if redirect == Some(i) {
                redirect = None;
            }
            let target = match redirect {
                Some(t) => t,
                None => {
                    let t = self.border.resolve(i);
                    if t != i {
                        redirect = Some(t);
                    }
                    t
                }
            };

            let segment = (self.curve[i], border[target]);
            if previous == Some(segment) {
                continue;
            }
            previous = Some(segment);
            draw_gradient(mask, segment.0, segment.1);
            drawn += 1;
        }

        trace!(segments = drawn, samples = n, "drew falloff band");
        drawn
    }
}

/// Writes a ramp from opacity 1 at `from` down toward 0 at `to`.
///
/// Steps longer than one pixel also cover the four edge neighbors so
/// adjacent diagonal ramps leave no holes and the band has the same width
/// on every side of the shape.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn draw_gradient(mask: &mut OpacityMask, from: Point2, to: Point2) {
    let d = to - from;
    let len = d.norm().floor() as usize + 1;
    let start = PixelPoint::containing(from);
    let spill = len > 1;
    for k in 0..len {
        let t = k as f64 / len as f64;
        let x = start.x + (d.x * t).trunc() as i64;
        let y = start.y + (d.y * t).trunc() as i64;
        let opacity = (1.0 - t) as f32;
        mask.raise(x, y, opacity);
        if spill {
            for (dx, dy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
                mask.raise(x + dx, y + dy, opacity);
            }
        }
    }
}
