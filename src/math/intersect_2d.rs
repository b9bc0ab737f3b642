use std::f64::consts::TAU;

use super::arc_2d::ArcParams;
use super::{Point2, Vector2, TOLERANCE};

/// A crossing between two bounded curves.
///
/// `t_a` and `t_b` are the parameters in `[0, 1]` on the first and second
/// curve respectively.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub point: Point2,
    pub t_a: f64,
    pub t_b: f64,
}

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let cross = d1.perp(d2);
    if cross.abs() < TOLERANCE {
        return None;
    }
    let delta = p2 - p1;
    Some((delta.perp(d2) / cross, delta.perp(d1) / cross))
}

/// Bounded segment-segment intersection.
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> Option<Crossing> {
    let da = a1 - a0;
    let db = b1 - b0;
    let (t, u) = line_line_intersect_2d(a0, &da, b0, &db)?;

    let eps = TOLERANCE;
    if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        let t = t.clamp(0.0, 1.0);
        Some(Crossing {
            point: a0 + da * t,
            t_a: t,
            t_b: u.clamp(0.0, 1.0),
        })
    } else {
        None
    }
}

/// Intersections of the segment `a0`→`a1` with a circular arc.
///
/// `t_a` is the segment parameter and `t_b` the arc parameter.
#[must_use]
pub fn line_arc_intersect_2d(a0: &Point2, a1: &Point2, arc: &ArcParams) -> Vec<Crossing> {
    let mut results = Vec::new();
    if arc.radius < TOLERANCE || arc.sweep.abs() < TOLERANCE {
        return results;
    }

    let d = a1 - a0;
    let a = d.norm_squared();
    if a < TOLERANCE * TOLERANCE {
        return results;
    }

    // (a0 + t*d - c)² = r²
    let f = a0 - arc.center;
    let b = 2.0 * f.dot(&d);
    let c = f.norm_squared() - arc.radius * arc.radius;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < -TOLERANCE {
        return results;
    }
    let disc_sqrt = discriminant.max(0.0).sqrt();

    let roots = if disc_sqrt < TOLERANCE * 100.0 {
        vec![-b / (2.0 * a)]
    } else {
        vec![(-b - disc_sqrt) / (2.0 * a), (-b + disc_sqrt) / (2.0 * a)]
    };

    for t_seg in roots {
        if t_seg < -TOLERANCE || t_seg > 1.0 + TOLERANCE {
            continue;
        }
        let t_seg = t_seg.clamp(0.0, 1.0);
        let point = a0 + d * t_seg;
        let angle = (point.y - arc.center.y).atan2(point.x - arc.center.x);
        if let Some(t_arc) = angle_to_arc_param(angle, arc.start_angle, arc.sweep) {
            results.push(Crossing {
                point,
                t_a: t_seg,
                t_b: t_arc,
            });
        }
    }
    results
}

/// Intersections of two circular arcs.
///
/// Concentric arcs report no crossings, even when they overlap.
#[must_use]
pub fn arc_arc_intersect_2d(a: &ArcParams, b: &ArcParams) -> Vec<Crossing> {
    let mut results = Vec::new();
    if a.radius < TOLERANCE || b.radius < TOLERANCE {
        return results;
    }

    let delta = b.center - a.center;
    let dist_sq = delta.norm_squared();
    let dist = dist_sq.sqrt();
    if dist < TOLERANCE {
        return results;
    }

    let (r1, r2) = (a.radius, b.radius);
    if dist > r1 + r2 + TOLERANCE || dist < (r1 - r2).abs() - TOLERANCE {
        return results;
    }

    // Distance from a's center to the radical line.
    let along = (r1 * r1 - r2 * r2 + dist_sq) / (2.0 * dist);
    let h_sq = r1 * r1 - along * along;
    if h_sq < -TOLERANCE {
        return results;
    }
    let h = h_sq.max(0.0).sqrt();

    let unit = delta / dist;
    let mid = a.center + unit * along;
    let perp = Vector2::new(-unit.y, unit.x);

    let candidates = if h < TOLERANCE {
        vec![mid]
    } else {
        vec![mid + perp * h, mid - perp * h]
    };

    for point in candidates {
        let angle_a = (point.y - a.center.y).atan2(point.x - a.center.x);
        let angle_b = (point.y - b.center.y).atan2(point.x - b.center.x);
        let t_a = angle_to_arc_param(angle_a, a.start_angle, a.sweep);
        let t_b = angle_to_arc_param(angle_b, b.start_angle, b.sweep);
        if let (Some(t_a), Some(t_b)) = (t_a, t_b) {
            results.push(Crossing { point, t_a, t_b });
        }
    }
    results
}

/// Converts an absolute angle to an arc parameter `t` in `[0, 1]`.
///
/// Returns `None` if the angle is not within the arc's angular range.
#[must_use]
pub fn angle_to_arc_param(angle: f64, start_angle: f64, sweep: f64) -> Option<f64> {
    if sweep.abs() < TOLERANCE {
        return None;
    }
    let eps = TOLERANCE * 100.0;

    let mut delta = if sweep > 0.0 {
        (angle - start_angle).rem_euclid(TAU)
    } else {
        -(start_angle - angle).rem_euclid(TAU)
    };
    // Angles just before the start wrap to almost a full turn.
    if (delta.abs() - TAU).abs() < eps {
        delta = 0.0;
    }

    let t = delta / sweep;
    if t >= -eps && t <= 1.0 + eps {
        Some(t.clamp(0.0, 1.0))
    } else {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn arc(cx: f64, cy: f64, radius: f64, start_angle: f64, sweep: f64) -> ArcParams {
        ArcParams {
            center: Point2::new(cx, cy),
            radius,
            start_angle,
            sweep,
        }
    }

    #[test]
    fn line_line_perpendicular() {
        let (t, u) = line_line_intersect_2d(
            &Point2::new(0.0, 0.0),
            &Vector2::new(1.0, 0.0),
            &Point2::new(0.5, -1.0),
            &Vector2::new(0.0, 1.0),
        )
        .unwrap();
        assert!((t - 0.5).abs() < TOLERANCE);
        assert!((u - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn line_line_parallel_returns_none() {
        let hit = line_line_intersect_2d(
            &Point2::new(0.0, 0.0),
            &Vector2::new(1.0, 0.0),
            &Point2::new(0.0, 1.0),
            &Vector2::new(1.0, 0.0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn segment_segment_crossing() {
        let hit = segment_segment_intersect_2d(
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 2.0),
            &Point2::new(0.0, 2.0),
            &Point2::new(2.0, 0.0),
        )
        .unwrap();
        assert!((hit.point.x - 1.0).abs() < TOLERANCE);
        assert!((hit.point.y - 1.0).abs() < TOLERANCE);
        assert!((hit.t_a - 0.5).abs() < TOLERANCE);
        assert!((hit.t_b - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn segment_segment_no_crossing() {
        let hit = segment_segment_intersect_2d(
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 0.0),
            &Point2::new(0.0, 1.0),
            &Point2::new(1.0, 1.0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn line_arc_two_crossings() {
        let hits = line_arc_intersect_2d(
            &Point2::new(-2.0, 0.0),
            &Point2::new(2.0, 0.0),
            &arc(0.0, 0.0, 1.0, 0.0, PI),
        );
        assert_eq!(hits.len(), 2, "hits={hits:?}");
    }

    #[test]
    fn line_arc_tangent() {
        let hits = line_arc_intersect_2d(
            &Point2::new(-1.0, 1.0),
            &Point2::new(1.0, 1.0),
            &arc(0.0, 0.0, 1.0, 0.0, PI),
        );
        assert_eq!(hits.len(), 1, "hits={hits:?}");
        assert!(hits[0].point.x.abs() < 1e-6, "x={}", hits[0].point.x);
        assert!((hits[0].t_b - 0.5).abs() < 1e-6);
    }

    #[test]
    fn line_arc_miss_outside_arc_range() {
        let hits = line_arc_intersect_2d(
            &Point2::new(-2.0, 0.0),
            &Point2::new(2.0, 0.0),
            &arc(0.0, 0.0, 1.0, PI / 4.0, PI / 4.0),
        );
        assert!(hits.is_empty(), "hits={hits:?}");
    }

    #[test]
    fn arc_arc_two_crossings() {
        let hits = arc_arc_intersect_2d(
            &arc(0.0, 0.0, 1.0, -PI, 2.0 * PI),
            &arc(1.0, 0.0, 1.0, 0.0, 2.0 * PI),
        );
        assert_eq!(hits.len(), 2, "hits={hits:?}");
        let sqrt3_2 = 3.0_f64.sqrt() / 2.0;
        let mut ys: Vec<f64> = hits.iter().map(|h| h.point.y).collect();
        ys.sort_by(f64::total_cmp);
        assert!((ys[0] + sqrt3_2).abs() < 1e-6, "y0={}", ys[0]);
        assert!((ys[1] - sqrt3_2).abs() < 1e-6, "y1={}", ys[1]);
    }

    #[test]
    fn arc_arc_clockwise_sweep() {
        // Clockwise arc from π/2 down to -π/2 through angle 0.
        let hits = arc_arc_intersect_2d(
            &arc(0.0, 0.0, 1.0, PI / 2.0, -PI),
            &arc(1.0, 0.0, 1.0, 0.0, 2.0 * PI),
        );
        assert_eq!(hits.len(), 2, "hits={hits:?}");
    }

    #[test]
    fn arc_arc_miss_outside_range() {
        let hits = arc_arc_intersect_2d(
            &arc(0.0, 0.0, 1.0, 0.0, PI / 4.0),
            &arc(1.0, 0.0, 1.0, PI, PI / 4.0),
        );
        assert!(hits.is_empty(), "hits={hits:?}");
    }

    #[test]
    fn arc_param_at_endpoints() {
        assert!((angle_to_arc_param(0.0, 0.0, PI).unwrap()).abs() < 1e-9);
        assert!((angle_to_arc_param(PI, 0.0, PI).unwrap() - 1.0).abs() < 1e-9);
        assert!((angle_to_arc_param(-PI / 2.0, 0.0, -PI).unwrap() - 0.5).abs() < 1e-9);
        assert!(angle_to_arc_param(-PI / 2.0, 0.0, PI).is_none());
    }
}
