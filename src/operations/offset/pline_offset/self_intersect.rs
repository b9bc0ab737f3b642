use crate::geometry::pline::Pline;
use crate::math::arc_2d::arc_from_bulge;
use crate::math::intersect_2d::{
    arc_arc_intersect_2d, line_arc_intersect_2d, segment_segment_intersect_2d, Crossing,
};
use crate::math::{Point2, TOLERANCE};

/// A self-intersection between two segments of a polyline.
#[derive(Debug, Clone)]
pub struct Intersection {
    /// Index of the first segment.
    pub seg_i: usize,
    /// Index of the second segment (always > `seg_i`).
    pub seg_j: usize,
    /// Parameter on segment i (0..1).
    pub t_i: f64,
    /// Parameter on segment j (0..1).
    pub t_j: f64,
    pub point: Point2,
}

/// Finds all crossings between non-adjacent segments of a closed polyline.
///
/// Touches at a segment end (either parameter near 0 or 1) are skipped.
/// Results are sorted by first segment, then by parameter on it.
#[must_use]
pub fn find_all(pline: &Pline) -> Vec<Intersection> {
    let n = pline.vertices.len();
    let seg_count = pline.segment_count();
    if seg_count < 3 {
        return Vec::new();
    }

    let eps = TOLERANCE * 100.0;
    let mut results = Vec::new();

    for i in 0..seg_count {
        for j in (i + 2)..seg_count {
            if pline.closed && i == 0 && j == seg_count - 1 {
                continue;
            }

            let vi0 = &pline.vertices[i];
            let vi1 = &pline.vertices[(i + 1) % n];
            let vj0 = &pline.vertices[j];
            let vj1 = &pline.vertices[(j + 1) % n];
            let (a0, a1) = (vi0.point(), vi1.point());
            let (b0, b1) = (vj0.point(), vj1.point());

            let hits: Vec<Crossing> = match (vi0.is_arc(), vj0.is_arc()) {
                (false, false) => segment_segment_intersect_2d(&a0, &a1, &b0, &b1)
                    .into_iter()
                    .collect(),
                (false, true) => {
                    line_arc_intersect_2d(&a0, &a1, &arc_from_bulge(&b0, &b1, vj0.bulge))
                }
                (true, false) => {
                    // Parameters come back as (line, arc); segment i is the arc.
                    line_arc_intersect_2d(&b0, &b1, &arc_from_bulge(&a0, &a1, vi0.bulge))
                        .into_iter()
                        .map(|c| Crossing {
                            point: c.point,
                            t_a: c.t_b,
                            t_b: c.t_a,
                        })
                        .collect()
                }
                (true, true) => arc_arc_intersect_2d(
                    &arc_from_bulge(&a0, &a1, vi0.bulge),
                    &arc_from_bulge(&b0, &b1, vj0.bulge),
                ),
            };

            for hit in hits {
                let t_at_end = hit.t_a < eps || hit.t_a > 1.0 - eps;
                let u_at_end = hit.t_b < eps || hit.t_b > 1.0 - eps;
                if t_at_end || u_at_end {
                    continue;
                }
                results.push(Intersection {
                    seg_i: i,
                    seg_j: j,
                    t_i: hit.t_a,
                    t_j: hit.t_b,
                    point: hit.point,
                });
            }
        }
    }

    results.sort_by(|a, b| a.seg_i.cmp(&b.seg_i).then(a.t_i.total_cmp(&b.t_i)));
    results
}
