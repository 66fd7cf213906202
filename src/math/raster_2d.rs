use super::Point2;

/// Integer pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelPoint {
    pub x: i64,
    pub y: i64,
}

impl PixelPoint {
    /// Creates a new pixel coordinate.
    #[must_use]
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Pixel containing `p` (coordinates are floored).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn containing(p: Point2) -> Self {
        Self {
            x: p.x.floor() as i64,
            y: p.y.floor() as i64,
        }
    }

    /// Largest per-axis distance to `other` (Chebyshev distance).
    #[must_use]
    pub fn chebyshev(self, other: Self) -> i64 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

/// Pixels on the digital line from `from` (excluded) to `to` (included).
///
/// Consecutive pixels are 8-connected. When both ends coincide the result
/// is `[to]`.
#[must_use]
pub fn bridge_pixels(from: PixelPoint, to: PixelPoint) -> Vec<PixelPoint> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let steps = dx.abs().max(dy.abs());
    if steps == 0 {
        return vec![to];
    }
    (1..=steps)
        .map(|i| {
            PixelPoint::new(
                from.x + scaled_round(dx, i, steps),
                from.y + scaled_round(dy, i, steps),
            )
        })
        .collect()
}

/// `round(delta · i / steps)` with integer inputs.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn scaled_round(delta: i64, i: i64, steps: i64) -> i64 {
    (delta as f64 * i as f64 / steps as f64).round() as i64
}
