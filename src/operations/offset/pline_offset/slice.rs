use crate::geometry::pline::PlineVertex;
use crate::math::arc_2d::{arc_from_bulge, bulge_from_sweep};
use crate::math::Point2;

use super::self_intersect::Intersection;

/// A piece of the raw offset between two consecutive crossing points.
#[derive(Debug, Clone)]
pub struct PlineSlice {
    pub vertices: Vec<PlineVertex>,
}

impl PlineSlice {
    #[must_use]
    pub fn start(&self) -> Option<Point2> {
        self.vertices.first().map(PlineVertex::point)
    }

    #[must_use]
    pub fn end(&self) -> Option<Point2> {
        self.vertices.last().map(PlineVertex::point)
    }
}

/// Cuts a closed polyline at every crossing, walking forward around it.
///
/// Partial arc segments get the bulge of their sub-sweep.
#[must_use]
pub fn build(vertices: &[PlineVertex], intersections: &[Intersection]) -> Vec<PlineSlice> {
    if intersections.is_empty() || vertices.is_empty() {
        return Vec::new();
    }

    // (segment, t) split points around the loop.
    let mut splits: Vec<(usize, f64)> = intersections
        .iter()
        .flat_map(|ix| [(ix.seg_i, ix.t_i), (ix.seg_j, ix.t_j)])
        .collect();
    splits.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));

    let total = splits.len();
    (0..total)
        .map(|k| slice_between(vertices, splits[k], splits[(k + 1) % total]))
        .filter(|verts| verts.len() >= 2)
        .map(|vertices| PlineSlice { vertices })
        .collect()
}

fn slice_between(
    vertices: &[PlineVertex],
    (seg_start, t_start): (usize, f64),
    (seg_end, t_end): (usize, f64),
) -> Vec<PlineVertex> {
    let n = vertices.len();
    let mut verts = Vec::new();

    if seg_start == seg_end && t_start <= t_end {
        let start = point_on_segment(vertices, seg_start, t_start);
        let end = point_on_segment(vertices, seg_end, t_end);
        let bulge = sub_bulge(vertices[seg_start].bulge, t_start, t_end);
        verts.push(PlineVertex::new(start.x, start.y, bulge));
        verts.push(PlineVertex::line(end.x, end.y));
        return verts;
    }

    let start = point_on_segment(vertices, seg_start, t_start);
    verts.push(PlineVertex::new(
        start.x,
        start.y,
        sub_bulge(vertices[seg_start].bulge, t_start, 1.0),
    ));

    // Whole segments in between keep their bulge.
    let mut seg = (seg_start + 1) % n;
    while seg != seg_end {
        verts.push(vertices[seg]);
        seg = (seg + 1) % n;
    }

    let last = &vertices[seg_end];
    verts.push(PlineVertex::new(
        last.x,
        last.y,
        sub_bulge(last.bulge, 0.0, t_end),
    ));

    let end = point_on_segment(vertices, seg_end, t_end);
    verts.push(PlineVertex::line(end.x, end.y));
    verts
}

/// Point at parameter `t` on segment `seg` of a closed polyline.
#[must_use]
pub fn point_on_segment(vertices: &[PlineVertex], seg: usize, t: f64) -> Point2 {
    let v0 = &vertices[seg];
    let v1 = &vertices[(seg + 1) % vertices.len()];
    let (p0, p1) = (v0.point(), v1.point());
    if v0.is_arc() {
        arc_from_bulge(&p0, &p1, v0.bulge).point_at(t)
    } else {
        p0 + (p1 - p0) * t
    }
}

fn sub_bulge(bulge: f64, t_start: f64, t_end: f64) -> f64 {
    if bulge == 0.0 {
        return 0.0;
    }
    bulge_from_sweep(4.0 * bulge.atan() * (t_end - t_start))
}
