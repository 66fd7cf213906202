use super::Point2;

/// Traversal direction of a closed polygon, as seen on screen (y down).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Clockwise,
    CounterClockwise,
}

impl Orientation {
    /// Sign applied to offset radii so that positive radii grow outward.
    #[must_use]
    pub fn offset_sign(self) -> f64 {
        match self {
            Self::Clockwise => 1.0,
            Self::CounterClockwise => -1.0,
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }
}

/// Computes the signed area of a closed polygon (shoelace formula).
///
/// Positive when the polygon turns clockwise on screen, i.e. in image
/// coordinates where y grows downward.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Orientation of a closed polygon from the sign of its shoelace area.
///
/// Degenerate polygons (fewer than 3 points or zero area) report
/// [`Orientation::Clockwise`].
#[must_use]
pub fn orientation(points: &[Point2]) -> Orientation {
    if signed_area_2d(points) < 0.0 {
        Orientation::CounterClockwise
    } else {
        Orientation::Clockwise
    }
}

/// Bezier control points reproducing the uniform Catmull-Rom segment
/// `p1 → p2`, with `p0` and `p3` as the outer neighbors.
///
/// Returns `(outgoing handle of p1, incoming handle of p2)`.
#[must_use]
pub fn catmull_rom_to_bezier(p0: Point2, p1: Point2, p2: Point2, p3: Point2) -> (Point2, Point2) {
    let b1 = (-p0.coords + p1.coords * 6.0 + p2.coords) / 6.0;
    let b2 = (p1.coords + p2.coords * 6.0 - p3.coords) / 6.0;
    (Point2::from(b1), Point2::from(b2))
}
