use std::collections::HashMap;

use tracing::debug;

use crate::document::{EntityId, LayerId};
use crate::error::{OperationError, Result};
use crate::geometry::End;
use crate::math::EPSILON;

use super::segment::{endpoint_index, EndpointRef, Segment};

/// Output of [`SnapEndpoints`]: the updated segments and which ones moved.
#[derive(Debug)]
pub struct Snapped {
    pub segments: Vec<Segment>,
    /// Indices into `segments` whose shape changed, in first-change order.
    pub modified: Vec<usize>,
}

impl Snapped {
    /// Ids of the segments whose shape changed.
    #[must_use]
    pub fn modified_ids(&self) -> Vec<EntityId> {
        self.modified.iter().map(|&i| self.segments[i].id).collect()
    }
}

/// Merges near-coincident endpoints of segments on the same layer.
///
/// Each junction is visited once from the first endpoint reached in input
/// order: its partner end is moved onto it. Lines take the coordinate
/// verbatim; arcs are rebuilt with the same included angle and direction.
/// Both ends of a junction are then settled, and no later query may move
/// them again.
#[derive(Debug)]
pub struct SnapEndpoints<'a> {
    segments: &'a [Segment],
    excluded_layer: Option<LayerId>,
}

impl<'a> SnapEndpoints<'a> {
    #[must_use]
    pub fn new(segments: &'a [Segment]) -> Self {
        Self {
            segments,
            excluded_layer: None,
        }
    }

    /// Leaves segments on `layer` untouched and invisible to others.
    #[must_use]
    pub fn excluding_layer(mut self, layer: Option<LayerId>) -> Self {
        self.excluded_layer = layer;
        self
    }

    /// # Errors
    ///
    /// Returns `OperationError::AmbiguousConnection` if an endpoint has more
    /// than one partner within tolerance on its layer, or if its only partner
    /// already belongs to another junction.
    pub fn execute(&self) -> Result<Snapped> {
        let included = |s: &Segment| Some(s.layer) != self.excluded_layer;
        let index = endpoint_index(self.segments, included);

        let mut segments = self.segments.to_vec();
        let mut modified = Vec::new();
        let mut touched = vec![false; segments.len()];
        // Settled end -> the segment on the other side of its junction.
        let mut resolved: HashMap<EndpointRef, usize> = HashMap::new();

        for i in 0..segments.len() {
            if !included(&segments[i]) {
                continue;
            }
            for end in [End::Start, End::End] {
                let query = EndpointRef { segment: i, end };
                if resolved.contains_key(&query) {
                    continue;
                }
                let point = segments[i].shape.point(end);
                let layer = segments[i].layer;

                let found: Vec<EndpointRef> = index
                    .within(&point, EPSILON)
                    .into_iter()
                    .map(|hit| *hit.item)
                    .filter(|r| r.segment != i && segments[r.segment].layer == layer)
                    .collect();

                match found.as_slice() {
                    [] => {}
                    [partner] => {
                        if let Some(&claimed_by) = resolved.get(partner) {
                            let ids = vec![
                                segments[i].id,
                                segments[partner.segment].id,
                                segments[claimed_by].id,
                            ];
                            return Err(OperationError::AmbiguousConnection { point, ids }.into());
                        }
                        let target = &mut segments[partner.segment];
                        target.shape = target.shape.with_endpoint(partner.end, point);
                        resolved.insert(*partner, i);
                        resolved.insert(query, partner.segment);
                        if !touched[partner.segment] {
                            touched[partner.segment] = true;
                            modified.push(partner.segment);
                        }
                        debug!(x = point.x, y = point.y, moved = ?target.id, "snapped endpoint");
                    }
                    _ => {
                        let mut ids = vec![segments[i].id];
                        ids.extend(found.iter().map(|r| segments[r.segment].id));
                        return Err(OperationError::AmbiguousConnection { point, ids }.into());
                    }
                }
            }
        }

        Ok(Snapped { segments, modified })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::document::{Drawing, EntityKind};
    use crate::error::LineworkError;
    use crate::geometry::{Arc, Line, Shape};
    use crate::math::{points_coincide, Point2};
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    fn drawing_with(kinds: Vec<EntityKind>) -> (Drawing, Vec<EntityId>) {
        let mut drawing = Drawing::new();
        let layer = drawing.add_layer("0");
        let ids = kinds
            .into_iter()
            .map(|k| drawing.add_entity(layer, k).unwrap())
            .collect();
        (drawing, ids)
    }

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> EntityKind {
        EntityKind::Line(Line::new(Point2::new(x0, y0), Point2::new(x1, y1)))
    }

    #[test]
    fn near_coincident_lines_snap_exactly() {
        let (drawing, ids) = drawing_with(vec![
            line(0.0, 0.0, 1.0, 0.0),
            line(1.000_003, 0.000_002, 1.0, 1.0),
        ]);
        let segments = Segment::collect(&drawing);
        let snapped = SnapEndpoints::new(&segments).execute().unwrap();

        assert_eq!(snapped.modified_ids(), vec![ids[1]]);
        assert_eq!(
            snapped.segments[1].shape.start_point(),
            snapped.segments[0].shape.end_point()
        );
        assert_eq!(snapped.segments[0], segments[0]);
    }

    #[test]
    fn every_triangle_corner_is_joined() {
        let (drawing, _) = drawing_with(vec![
            line(0.0, 0.0, 1.0, 0.0),
            line(1.000_004, 0.0, 0.5, 1.0),
            line(0.5, 1.000_002, 0.000_003, 0.0),
        ]);
        let segments = Segment::collect(&drawing);
        let snapped = SnapEndpoints::new(&segments).execute().unwrap();
        let s = &snapped.segments;
        for k in 0..3 {
            let next = (k + 1) % 3;
            assert_eq!(s[k].shape.end_point(), s[next].shape.start_point(), "corner {k}");
        }
    }

    #[test]
    fn arc_partner_keeps_span() {
        let arc = Arc::new(Point2::origin(), 1.0, 0.0, FRAC_PI_2, false);
        let (drawing, _) = drawing_with(vec![
            line(0.0, 1.000_004, -2.0, 1.0),
            EntityKind::Arc(arc),
        ]);
        let segments = Segment::collect(&drawing);
        let snapped = SnapEndpoints::new(&segments).execute().unwrap();
        let Shape::Arc(moved) = snapped.segments[1].shape else {
            panic!("expected arc");
        };
        assert_abs_diff_eq!(moved.angle_length(), FRAC_PI_2, epsilon = 1e-9);
        assert!(!moved.reversed);
        assert_abs_diff_eq!(
            (moved.end_point() - Point2::new(0.0, 1.000_004)).norm(),
            0.0,
            epsilon = 1e-9
        );
        assert!(points_coincide(&moved.start_point(), &Point2::new(1.0, 0.0)));
    }

    #[test]
    fn arc_to_arc_junction_meets_within_rounding() {
        let first = Arc::new(Point2::origin(), 1.0, 0.0, FRAC_PI_2, false);
        let second = Arc::new(Point2::new(0.0, 2.000_003), 1.0, 1.5 * PI, TAU, false);
        let (drawing, _) = drawing_with(vec![EntityKind::Arc(first), EntityKind::Arc(second)]);
        let segments = Segment::collect(&drawing);
        let snapped = SnapEndpoints::new(&segments).execute().unwrap();
        // Arcs store a center and angles, so the shared end is recomputed,
        // not copied: it agrees to rounding error only.
        let gap = (snapped.segments[0].shape.end_point() - snapped.segments[1].shape.start_point()).norm();
        assert!(gap < 1e-12, "gap={gap}");
        let Shape::Arc(moved) = snapped.segments[1].shape else {
            panic!("expected arc");
        };
        assert_abs_diff_eq!(moved.angle_length(), FRAC_PI_2, epsilon = 1e-9);
    }

    #[test]
    fn t_junction_is_ambiguous() {
        let (drawing, ids) = drawing_with(vec![
            line(0.0, 0.0, 1.0, 0.0),
            line(1.0, 0.0, 2.0, 0.0),
            line(1.0, 0.0, 1.0, 1.0),
        ]);
        let segments = Segment::collect(&drawing);
        let err = SnapEndpoints::new(&segments).execute().unwrap_err();
        let LineworkError::Operation(OperationError::AmbiguousConnection { point, ids: found }) =
            err
        else {
            panic!("expected ambiguous connection, got {err:?}");
        };
        assert_eq!(point, Point2::new(1.0, 0.0));
        assert_eq!(found, ids);
    }

    #[test]
    fn settled_end_is_not_moved_twice() {
        // Three ends 0.9ε apart: only neighbouring pairs are within tolerance.
        let (drawing, ids) = drawing_with(vec![
            line(-1.0, 0.0, 0.0, 0.0),
            line(0.9e-5, 0.0, 1.0, 1.0),
            line(1.0, -1.0, 1.8e-5, 0.0),
        ]);
        let segments = Segment::collect(&drawing);
        let err = SnapEndpoints::new(&segments).execute().unwrap_err();
        let LineworkError::Operation(OperationError::AmbiguousConnection { point, ids: found }) =
            err
        else {
            panic!("expected ambiguous connection, got {err:?}");
        };
        assert_eq!(point, Point2::new(1.8e-5, 0.0));
        assert_eq!(found, vec![ids[2], ids[1], ids[0]]);
    }

    #[test]
    fn other_layers_do_not_interact() {
        let mut drawing = Drawing::new();
        let cut = drawing.add_layer("Cut");
        let engrave = drawing.add_layer("Engrave");
        drawing.add_entity(cut, line(0.0, 0.0, 1.0, 0.0)).unwrap();
        drawing.add_entity(cut, line(1.0, 0.0, 2.0, 0.0)).unwrap();
        drawing.add_entity(engrave, line(1.0, 0.0, 1.0, 1.0)).unwrap();
        drawing.add_entity(engrave, line(1.0, 0.0, 1.0, -1.0)).unwrap();

        let segments = Segment::collect(&drawing);
        // Two engraving lines meet at the cut junction, but only the cut layer snaps.
        let snapped = SnapEndpoints::new(&segments)
            .excluding_layer(Some(engrave))
            .execute()
            .unwrap();
        assert_eq!(snapped.segments[2], segments[2]);
        assert_eq!(snapped.segments[3], segments[3]);
    }
}
