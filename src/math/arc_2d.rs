//! Circular arc helpers for bridging gaps in offset curves.
//!
//! Angles are measured with `atan2(dy, dx)` in image coordinates, so they lie
//! in `(-π, π]` and increase clockwise on screen.

use std::f64::consts::{PI, TAU};

use super::Point2;

/// Wraps an angle difference into `(-π, π]`.
#[must_use]
pub fn wrap_angle(angle: f64) -> f64 {
    let mut a = angle % TAU;
    if a > PI {
        a -= TAU;
    } else if a <= -PI {
        a += TAU;
    }
    a
}

/// Angle of `p` as seen from `center`.
#[must_use]
pub fn angle_from(center: Point2, p: Point2) -> f64 {
    (p.y - center.y).atan2(p.x - center.x)
}

/// Points on an arc around `center` going from `from` to `to`, both
/// endpoints excluded.
///
/// The radius is interpolated linearly between the two endpoint distances.
/// When the endpoint angles straddle the `atan2` branch cut, `hint` (an
/// earlier point on the same offset curve) decides the rotation direction:
/// the arc keeps turning the way the curve was already travelling around
/// `center`.
///
/// Returns no points when the arc is shorter than `min_length`.
#[must_use]
pub fn bridge_arc(center: Point2, from: Point2, to: Point2, hint: Point2, min_length: f64) -> Vec<Point2> {
    let mut a1 = angle_from(center, from);
    let mut a2 = angle_from(center, to);
    if (a1 - a2).abs() < f64::EPSILON {
        return Vec::new();
    }

    if a1 * a2 < 0.0 {
        let travel = wrap_angle(a1 - angle_from(center, hint));
        if (a2 - a1) * travel < 0.0 {
            if a1 < 0.0 {
                a1 += TAU;
            } else {
                a2 += TAU;
            }
        }
    }

    let r1 = (from - center).norm();
    let r2 = (to - center).norm();
    let sweep = a2 - a1;
    let length = (sweep.abs() * r1.max(r2)).floor();
    if length < min_length {
        return Vec::new();
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = length as usize;
    #[allow(clippy::cast_precision_loss)]
    let steps = count as f64;
    (1..count)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let f = i as f64 / steps;
            let a = a1 + sweep * f;
            let r = r1 + (r2 - r1) * f;
            Point2::new(center.x + r * a.cos(), center.y + r * a.sin())
        })
        .collect()
}
