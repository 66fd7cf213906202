//! Cubic Bezier evaluation in the plane.
//!
//! Offsets use the right-hand normal `(dy, -dx)` of the derivative. In image
//! space (y pointing down) that normal points outward for a clockwise curve,
//! so callers pass signed radii: positive for clockwise shapes, negated for
//! counter-clockwise ones.

use super::{Point2, Vector2, TOLERANCE};

/// A single cubic Bezier segment `p0 → p3` with control points `p1`, `p2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBez {
    pub p0: Point2,
    pub p1: Point2,
    pub p2: Point2,
    pub p3: Point2,
}

impl CubicBez {
    /// Creates a segment from its four control points.
    #[must_use]
    pub fn new(p0: Point2, p1: Point2, p2: Point2, p3: Point2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Evaluates the curve point at `t` in `[0, 1]`.
    ///
    /// Uses de Casteljau's construction, which keeps coordinates shared by
    /// all control points exact (axis-aligned edges stay on their pixel row).
    #[must_use]
    pub fn eval(&self, t: f64) -> Point2 {
        let a = lerp(self.p0, self.p1, t);
        let b = lerp(self.p1, self.p2, t);
        let c = lerp(self.p2, self.p3, t);
        let ab = lerp(a, b, t);
        let bc = lerp(b, c, t);
        lerp(ab, bc, t)
    }

    /// First derivative with respect to `t`.
    #[must_use]
    pub fn deriv(&self, t: f64) -> Vector2 {
        let mt = 1.0 - t;
        let d0 = self.p1 - self.p0;
        let d1 = self.p2 - self.p1;
        let d2 = self.p3 - self.p2;
        (d0 * (mt * mt) + d1 * (2.0 * t * mt) + d2 * (t * t)) * 3.0
    }

    /// Unit right-hand normal at `t`, or `None` at a cusp where the
    /// derivative vanishes.
    #[must_use]
    pub fn unit_normal(&self, t: f64) -> Option<Vector2> {
        let d = self.deriv(t);
        let len = d.norm();
        if len < TOLERANCE {
            return None;
        }
        Some(Vector2::new(d.y / len, -d.x / len))
    }

    /// Evaluates the curve point at `t` and the matching offset point.
    ///
    /// The radius is blended between `radius0` and `radius1` with
    /// [`smoothstep_radius`]. The offset point is `None` when the tangent
    /// is undefined at `t`.
    #[must_use]
    pub fn eval_with_offset(&self, radius0: f64, radius1: f64, t: f64) -> (Point2, Option<Point2>) {
        let point = self.eval(t);
        let radius = smoothstep_radius(radius0, radius1, t);
        let offset = self.unit_normal(t).map(|n| point + n * radius);
        (point, offset)
    }
}

/// Free-function form of [`CubicBez::eval`].
#[must_use]
pub fn evaluate(p0: Point2, p1: Point2, p2: Point2, p3: Point2, t: f64) -> Point2 {
    CubicBez::new(p0, p1, p2, p3).eval(t)
}

/// Free-function form of [`CubicBez::eval_with_offset`].
#[must_use]
pub fn evaluate_with_offset(
    p0: Point2,
    p1: Point2,
    p2: Point2,
    p3: Point2,
    radius0: f64,
    radius1: f64,
    t: f64,
) -> (Point2, Option<Point2>) {
    CubicBez::new(p0, p1, p2, p3).eval_with_offset(radius0, radius1, t)
}

/// C¹ radius blend `r0 + (r1 - r0) · t² · (3 - 2t)`.
#[must_use]
pub fn smoothstep_radius(r0: f64, r1: f64, t: f64) -> f64 {
    r0 + (r1 - r0) * t * t * (3.0 - 2.0 * t)
}

fn lerp(a: Point2, b: Point2, t: f64) -> Point2 {
    a + (b - a) * t
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn arch() -> CubicBez {
        CubicBez::new(
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 3.0),
            Point2::new(3.0, 3.0),
            Point2::new(3.0, 0.0),
        )
    }

    #[test]
    fn endpoints_are_interpolated() {
        let c = arch();
        assert_eq!(c.eval(0.0), c.p0);
        assert_eq!(c.eval(1.0), c.p3);
    }

    #[test]
    fn matches_bernstein_blend() {
        let c = arch();
        let t: f64 = 0.3;
        let mt = 1.0 - t;
        let expected = c.p0.coords * mt.powi(3)
            + c.p1.coords * (3.0 * t * mt * mt)
            + c.p2.coords * (3.0 * t * t * mt)
            + c.p3.coords * t.powi(3);
        let got = c.eval(t);
        assert_abs_diff_eq!(got.x, expected.x, epsilon = 1e-12);
        assert_abs_diff_eq!(got.y, expected.y, epsilon = 1e-12);
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let c = arch();
        let h = 1e-6;
        let t = 0.42;
        let fd = (c.eval(t + h) - c.eval(t - h)) / (2.0 * h);
        let d = c.deriv(t);
        assert_abs_diff_eq!(d.x, fd.x, epsilon = 1e-5);
        assert_abs_diff_eq!(d.y, fd.y, epsilon = 1e-5);
    }

    #[test]
    fn constant_coordinate_is_exact() {
        let c = CubicBez::new(
            Point2::new(0.1 * 100.0, 10.0),
            Point2::new(10.0, 10.0),
            Point2::new(90.0, 10.0),
            Point2::new(90.0, 10.0),
        );
        for i in 0..=64 {
            let t = f64::from(i) / 64.0;
            assert!((c.eval(t).y - 10.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn offset_of_straight_segment_is_parallel() {
        // Left to right in image space; right-hand normal points up (−y).
        let (p, o) = evaluate_with_offset(
            Point2::new(0.0, 10.0),
            Point2::new(3.0, 10.0),
            Point2::new(6.0, 10.0),
            Point2::new(9.0, 10.0),
            2.0,
            2.0,
            0.5,
        );
        let o = o.unwrap();
        assert_abs_diff_eq!(o.x, p.x, epsilon = 1e-12);
        assert_abs_diff_eq!(o.y, 8.0, epsilon = 1e-12);
    }

    #[test]
    fn cusp_reports_undefined_offset() {
        let p = Point2::new(5.0, 5.0);
        let q = Point2::new(20.0, 5.0);
        let c = CubicBez::new(p, p, q, q);
        let (point, offset) = c.eval_with_offset(3.0, 3.0, 0.0);
        assert_eq!(point, p);
        assert!(offset.is_none());
        assert!(c.eval_with_offset(3.0, 3.0, 0.5).1.is_some());
    }

    #[test]
    fn smoothstep_hits_both_radii_with_flat_ends() {
        assert_abs_diff_eq!(smoothstep_radius(1.0, 3.0, 0.0), 1.0);
        assert_abs_diff_eq!(smoothstep_radius(1.0, 3.0, 1.0), 3.0);
        assert_abs_diff_eq!(smoothstep_radius(1.0, 3.0, 0.5), 2.0);
        let h = 1e-6;
        let slope0 = (smoothstep_radius(1.0, 3.0, h) - 1.0) / h;
        assert!(slope0.abs() < 1e-4);
    }
}
