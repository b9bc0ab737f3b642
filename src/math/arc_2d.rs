//! 2D arc/bulge math utilities.
//!
//! Bulge convention: `bulge = tan(sweep_angle / 4)`.
//! - `bulge = 0`: straight line
//! - `bulge > 0`: counter-clockwise arc
//! - `bulge < 0`: clockwise arc
//! - `|bulge| = 1`: semicircle
use std::f64::consts::TAU;

use super::{left_normal, Point2, Vector2};

/// Bulges smaller than this are treated as straight segments.
pub const BULGE_EPSILON: f64 = 1e-12;

/// Center-radius-angle form of a bulge segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcParams {
    pub center: Point2,
    pub radius: f64,
    /// Angle of the segment's start point as seen from the center.
    pub start_angle: f64,
    /// Signed sweep: positive counter-clockwise, negative clockwise.
    pub sweep: f64,
}

impl ArcParams {
    /// Evaluates the point at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        let angle = self.start_angle + self.sweep * t;
        Point2::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    /// Unit tangent at parameter `t`, pointing in the direction of increasing `t`.
    #[must_use]
    pub fn tangent_at(&self, t: f64) -> Vector2 {
        let angle = self.start_angle + self.sweep * t;
        let sign = if self.sweep >= 0.0 { 1.0 } else { -1.0 };
        Vector2::new(-sign * angle.sin(), sign * angle.cos())
    }
}

/// Converts a bulge segment from `p0` to `p1` into center-radius-angle form.
///
/// Zero-length chords yield a zero-radius arc centered on `p0`.
#[must_use]
pub fn arc_from_bulge(p0: &Point2, p1: &Point2, bulge: f64) -> ArcParams {
    let chord = p1 - p0;
    let chord_len = chord.norm();

    if chord_len < BULGE_EPSILON {
        return ArcParams {
            center: *p0,
            radius: 0.0,
            start_angle: 0.0,
            sweep: 0.0,
        };
    }

    // For positive bulge the center lies left of the chord.
    let sagitta_ratio = (1.0 - bulge * bulge) / (2.0 * bulge);
    let mid = Point2::from((p0.coords + p1.coords) * 0.5);
    let normal = left_normal(&chord) / chord_len;
    let center = mid + normal * (sagitta_ratio * chord_len * 0.5);

    let radius = (chord_len * 0.5) * (1.0 + bulge * bulge) / (2.0 * bulge.abs());
    let start_angle = (p0.y - center.y).atan2(p0.x - center.x);

    let mut sweep = 4.0 * bulge.atan();
    if sweep > TAU {
        sweep -= TAU;
    } else if sweep < -TAU {
        sweep += TAU;
    }

    ArcParams {
        center,
        radius,
        start_angle,
        sweep,
    }
}

/// Bulge value for a signed sweep angle.
#[must_use]
pub fn bulge_from_sweep(sweep: f64) -> f64 {
    (sweep / 4.0).tan()
}

/// Offsets an arc segment by `distance` to its left.
///
/// For a counter-clockwise arc the left side faces the center (radius
/// shrinks); for a clockwise arc it faces away. Returns the new endpoints, or
/// `None` if the radius collapses. The bulge is unchanged since the sweep is
/// preserved.
#[must_use]
pub fn offset_arc_segment(
    p0: &Point2,
    p1: &Point2,
    bulge: f64,
    distance: f64,
) -> Option<(Point2, Point2)> {
    let arc = arc_from_bulge(p0, p1, bulge);
    if arc.radius < BULGE_EPSILON {
        return None;
    }

    let sign = if bulge > 0.0 { 1.0 } else { -1.0 };
    let radius = arc.radius - sign * distance;
    if radius <= BULGE_EPSILON {
        return None;
    }

    let shifted = ArcParams { radius, ..arc };
    Some((shifted.point_at(0.0), shifted.point_at(1.0)))
}

/// Signed area between a bulge arc and its chord.
///
/// Positive for counter-clockwise sweeps. Added to the shoelace sum of the
/// vertices it gives the exact area enclosed by a polyline with arcs.
#[must_use]
pub fn circular_segment_area(radius: f64, sweep: f64) -> f64 {
    0.5 * radius * radius * (sweep - sweep.sin())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    const TOL: f64 = 1e-10;

    #[test]
    fn semicircle_ccw_goes_through_bottom() {
        let arc = arc_from_bulge(&Point2::new(0.0, 0.0), &Point2::new(2.0, 0.0), 1.0);
        assert_abs_diff_eq!(arc.center.x, 1.0, epsilon = TOL);
        assert_abs_diff_eq!(arc.center.y, 0.0, epsilon = TOL);
        assert_abs_diff_eq!(arc.radius, 1.0, epsilon = TOL);
        assert_abs_diff_eq!(arc.sweep, PI, epsilon = TOL);

        let mid = arc.point_at(0.5);
        assert_abs_diff_eq!(mid.x, 1.0, epsilon = TOL);
        assert_abs_diff_eq!(mid.y, -1.0, epsilon = TOL);
    }

    #[test]
    fn semicircle_cw_goes_through_top() {
        let arc = arc_from_bulge(&Point2::new(0.0, 0.0), &Point2::new(2.0, 0.0), -1.0);
        assert_abs_diff_eq!(arc.sweep, -PI, epsilon = TOL);
        let mid = arc.point_at(0.5);
        assert_abs_diff_eq!(mid.y, 1.0, epsilon = TOL);
    }

    #[test]
    fn quarter_circle_endpoints() {
        let bulge = bulge_from_sweep(PI / 2.0);
        let arc = arc_from_bulge(&Point2::new(1.0, 0.0), &Point2::new(0.0, 1.0), bulge);
        assert_abs_diff_eq!(arc.radius, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(arc.center.x, 0.0, epsilon = 1e-9);
        let end = arc.point_at(1.0);
        assert_abs_diff_eq!(end.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(end.y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn tangent_is_unit() {
        let arc = arc_from_bulge(&Point2::new(0.0, 0.0), &Point2::new(2.0, 0.0), 1.0);
        let t = arc.tangent_at(0.0);
        assert_abs_diff_eq!(t.norm(), 1.0, epsilon = TOL);
        // Leaving (0,0) counter-clockwise around (1,0) heads downward.
        assert_abs_diff_eq!(t.y, -1.0, epsilon = TOL);
    }

    #[test]
    fn offset_arc_right_of_ccw_grows_radius() {
        let (a, b) = offset_arc_segment(
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 0.0),
            1.0,
            -0.5,
        )
        .unwrap();
        assert_abs_diff_eq!(a.x, -0.5, epsilon = TOL);
        assert_abs_diff_eq!(b.x, 2.5, epsilon = TOL);
    }

    #[test]
    fn offset_arc_collapse() {
        let result = offset_arc_segment(
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 0.0),
            1.0,
            1.5,
        );
        assert!(result.is_none());
    }

    #[test]
    fn half_disc_segment_area() {
        assert_abs_diff_eq!(circular_segment_area(1.0, PI), PI / 2.0, epsilon = TOL);
        assert_abs_diff_eq!(circular_segment_area(1.0, -PI), -PI / 2.0, epsilon = TOL);
    }
}
