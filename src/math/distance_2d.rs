use std::f64::consts::TAU;

use super::{Point2, TOLERANCE};

/// Returns the point on segment `a`→`b` closest to `p`.
#[must_use]
pub fn closest_on_segment(p: &Point2, a: &Point2, b: &Point2) -> Point2 {
    let d = b - a;
    let len_sq = d.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return *a;
    }
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    a + d * t
}

/// Returns the minimum distance from `p` to the segment `a`→`b`.
///
/// Degenerate segments fall back to point-to-point distance.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    (p - closest_on_segment(p, a, b)).norm()
}

/// Returns the minimum distance from `p` to a circular arc.
///
/// The arc is given by `center`, `radius`, `start_angle` and signed `sweep`.
/// Inside the angular range the distance is radial; outside it is the distance
/// to the nearer endpoint.
#[must_use]
pub fn point_to_arc_dist(
    p: &Point2,
    center: &Point2,
    radius: f64,
    start_angle: f64,
    sweep: f64,
) -> f64 {
    let offset = p - center;
    let angle = offset.y.atan2(offset.x);
    if angle_in_arc_range(angle, start_angle, sweep) {
        return (offset.norm() - radius).abs();
    }

    let end_angle = start_angle + sweep;
    let ep0 = Point2::new(
        center.x + radius * start_angle.cos(),
        center.y + radius * start_angle.sin(),
    );
    let ep1 = Point2::new(
        center.x + radius * end_angle.cos(),
        center.y + radius * end_angle.sin(),
    );
    (p - ep0).norm().min((p - ep1).norm())
}

/// Checks if an angle falls within an arc's angular range.
///
/// `sweep` is signed; negative sweeps run clockwise from `start_angle`.
#[must_use]
pub fn angle_in_arc_range(angle: f64, start_angle: f64, sweep: f64) -> bool {
    if sweep >= 0.0 {
        let delta = (angle - start_angle).rem_euclid(TAU);
        delta <= sweep + TOLERANCE || delta >= TAU - TOLERANCE
    } else {
        let delta = (start_angle - angle).rem_euclid(TAU);
        delta <= -sweep + TOLERANCE || delta >= TAU - TOLERANCE
    }
}
