use tracing::debug;

use crate::config::JoinStyle;
use crate::error::Result;
use crate::geometry::pline::{Pline, PlineVertex};
use crate::math::arc_2d::{arc_from_bulge, offset_arc_segment};
use crate::math::intersect_2d::line_line_intersect_2d;
use crate::math::polygon_2d::segment_direction;
use crate::math::{left_normal, Point2, Vector2, EPSILON};

/// Maximum miter distance as a multiple of `|distance|`.
const MITER_LIMIT: f64 = 4.0;

/// Threshold for flat cap: `cos(angle) < this` → near-180° reversal.
const FLAT_CAP_COS: f64 = -0.98;

/// An offset segment with endpoints, bulge, and tangent directions.
struct OffsetSeg {
    start: Point2,
    end: Point2,
    bulge: f64,
    /// Unit tangent direction at the start of the segment.
    start_dir: Vector2,
    /// Unit tangent direction at the end of the segment.
    end_dir: Vector2,
    /// Source vertex this segment starts from.
    origin: Point2,
}

impl OffsetSeg {
    fn is_arc(&self) -> bool {
        self.bulge != 0.0
    }
}

/// Builds the raw (untrimmed) offset of a closed polyline by offsetting each
/// segment to its left and joining consecutive segments at the corners.
///
/// Arcs whose radius collapses are dropped and their neighbours joined
/// directly. The result is empty when nothing survives.
///
/// # Errors
///
/// Returns `OperationError::InvalidInput` for zero-length line segments.
pub fn build(pline: &Pline, distance: f64, join: JoinStyle) -> Result<Pline> {
    let n = pline.vertices.len();
    let mut segs: Vec<OffsetSeg> = Vec::with_capacity(n);

    for i in 0..pline.segment_count() {
        let v0 = &pline.vertices[i];
        let v1 = &pline.vertices[(i + 1) % n];
        let (p0, p1) = (v0.point(), v1.point());

        if v0.is_arc() {
            // Arc segment: change radius, preserve sweep.
            let Some((start, end)) = offset_arc_segment(&p0, &p1, v0.bulge, distance) else {
                debug!(segment = i, "arc collapsed in offset");
                continue;
            };
            let arc = arc_from_bulge(&start, &end, v0.bulge);
            segs.push(OffsetSeg {
                start,
                end,
                bulge: v0.bulge,
                start_dir: arc.tangent_at(0.0),
                end_dir: arc.tangent_at(1.0),
                origin: p0,
            });
        } else {
            let dir = segment_direction(&p0, &p1)?;
            let shift = left_normal(&dir) * distance;
            segs.push(OffsetSeg {
                start: p0 + shift,
                end: p1 + shift,
                bulge: 0.0,
                start_dir: dir,
                end_dir: dir,
                origin: p0,
            });
        }
    }

    let count = segs.len();
    let mut vertices = Vec::with_capacity(count * 2);
    if count >= 2 || segs.iter().any(OffsetSeg::is_arc) {
        for i in 0..count {
            let prev = &segs[(i + count - 1) % count];
            push_corner(&mut vertices, prev, &segs[i], distance, join);
        }
    }

    Ok(Pline {
        vertices,
        closed: true,
    })
}

/// Pushes the corner vertex or vertices joining `prev` to `next`; the last
/// pushed vertex carries `next`'s bulge.
///
/// 1. Offsets already meeting: one shared vertex.
/// 2. Near-antiparallel, arc involved, bevel style, or miter past the limit:
///    two vertices joined by a straight segment.
/// 3. Otherwise: the single miter intersection point.
fn push_corner(
    vertices: &mut Vec<PlineVertex>,
    prev: &OffsetSeg,
    next: &OffsetSeg,
    distance: f64,
    join: JoinStyle,
) {
    let bevel = |vertices: &mut Vec<PlineVertex>| {
        vertices.push(PlineVertex::line(prev.end.x, prev.end.y));
        vertices.push(PlineVertex::new(next.start.x, next.start.y, next.bulge));
    };

    if (prev.end - next.start).norm() < EPSILON {
        vertices.push(PlineVertex::new(next.start.x, next.start.y, next.bulge));
        return;
    }

    let cos_angle = prev.end_dir.dot(&next.start_dir);
    if cos_angle < FLAT_CAP_COS || prev.is_arc() || next.is_arc() || join == JoinStyle::Bevel {
        bevel(vertices);
        return;
    }

    match line_line_intersect_2d(&prev.end, &prev.end_dir, &next.start, &next.start_dir) {
        Some((t, _)) => {
            let corner = prev.end + prev.end_dir * t;
            if (corner - next.origin).norm() > MITER_LIMIT * distance.abs() {
                bevel(vertices);
            } else {
                vertices.push(PlineVertex::new(corner.x, corner.y, next.bulge));
            }
        }
        None => bevel(vertices),
    }
}
