use crate::geometry::pline::{Pline, PlineVertex};
use crate::math::arc_2d::arc_from_bulge;
use crate::math::distance_2d::{point_to_arc_dist, point_to_segment_dist};
use crate::math::{Point2, EPSILON};

use super::slice::{point_on_segment, PlineSlice};

/// Keeps the slices that stay a full `|distance|` away from the source.
///
/// A slice is probed at its interior vertices, or at its midpoint when it is
/// a single segment. Loops created by overlapping offsets come closer to the
/// source than the offset distance and are dropped.
#[must_use]
pub fn apply<'a>(slices: &'a [PlineSlice], original: &Pline, distance: f64) -> Vec<&'a PlineSlice> {
    let threshold = distance.abs() - EPSILON;
    slices
        .iter()
        .filter(|s| probes(s).iter().all(|p| min_dist_to_pline(p, original) >= threshold))
        .collect()
}

fn probes(slice: &PlineSlice) -> Vec<Point2> {
    let v = &slice.vertices;
    if v.len() > 2 {
        v[1..v.len() - 1].iter().map(PlineVertex::point).collect()
    } else {
        vec![point_on_segment(v, 0, 0.5)]
    }
}

/// Minimum distance from `p` to any segment of a polyline, arcs included.
#[must_use]
pub fn min_dist_to_pline(p: &Point2, pline: &Pline) -> f64 {
    let n = pline.vertices.len();
    (0..pline.segment_count())
        .map(|i| {
            let v0 = &pline.vertices[i];
            let v1 = &pline.vertices[(i + 1) % n];
            if v0.is_arc() {
                let arc = arc_from_bulge(&v0.point(), &v1.point(), v0.bulge);
                point_to_arc_dist(p, &arc.center, arc.radius, arc.start_angle, arc.sweep)
            } else {
                point_to_segment_dist(p, &v0.point(), &v1.point())
            }
        })
        .fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn square() -> Pline {
        Pline::from_points(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
                Point2::new(0.0, 10.0),
            ],
            true,
        )
    }

    #[test]
    fn distance_to_square_edges() {
        let sq = square();
        assert!((min_dist_to_pline(&Point2::new(5.0, 2.0), &sq) - 2.0).abs() < 1e-12);
        assert!((min_dist_to_pline(&Point2::new(-3.0, -4.0), &sq) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn near_slices_dropped() {
        let far = PlineSlice {
            vertices: vec![
                PlineVertex::line(-1.0, 5.0),
                PlineVertex::line(-1.0, -1.0),
                PlineVertex::line(5.0, -1.0),
            ],
        };
        let near = PlineSlice {
            vertices: vec![
                PlineVertex::line(-1.0, 5.0),
                PlineVertex::line(0.5, 5.0),
                PlineVertex::line(5.0, -1.0),
            ],
        };
        let slices = [far, near];
        let kept = apply(&slices, &square(), -1.0);
        assert_eq!(kept.len(), 1);
        assert!((kept[0].vertices[1].x + 1.0).abs() < 1e-12);
    }
}
