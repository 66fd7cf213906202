use tracing::trace;

use crate::geometry::Shape;
use crate::math::polygon_2d::catmull_rom_to_bezier;

/// Recomputes the Bezier handles of every non-pinned vertex from a uniform
/// Catmull-Rom spline through the corners.
///
/// Pinned vertices keep the handles they already have; an unset handle on a
/// pinned vertex receives the fitted value. Must run after any corner moves
/// and before sampling.
#[derive(Debug, Default)]
pub struct SmoothHandles;

impl SmoothHandles {
    /// Creates a new handle smoothing operation.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the smoothing in place, returning how many vertices were
    /// smoothed.
    #[allow(clippy::cast_possible_wrap)]
    pub fn execute(&self, shape: &mut Shape) -> usize {
        let n = shape.len();
        if n < 2 {
            return 0;
        }

        let corners = shape.corners();
        let mut smoothed = 0;

        for k in 0..n {
            if shape.vertices()[k].pinned {
                continue;
            }
            let ki = k as isize;
            let k1 = shape.wrap(ki - 2);
            let k2 = shape.wrap(ki - 1);
            let k4 = shape.wrap(ki + 1);
            let k5 = shape.wrap(ki + 2);

            // Segment k-1 → k.
            let (prev_out, cur_in) =
                catmull_rom_to_bezier(corners[k1], corners[k2], corners[k], corners[k4]);
            // Segment k → k+1.
            let (cur_out, next_in) =
                catmull_rom_to_bezier(corners[k2], corners[k], corners[k4], corners[k5]);

            let vertices = shape.vertices_mut();
            if vertices[k2].handle_out.is_none() {
                vertices[k2].handle_out = Some(prev_out);
            }
            if vertices[k4].handle_in.is_none() {
                vertices[k4].handle_in = Some(next_in);
            }
            vertices[k].handle_in = Some(cur_in);
            vertices[k].handle_out = Some(cur_out);
            smoothed += 1;
        }

        trace!(smoothed, pinned = n - smoothed, "smoothed shape handles");
        smoothed
    }
}
