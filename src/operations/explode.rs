use std::f64::consts::PI;

use crate::document::{Batch, Drawing, EntityKind, LayerId};
use crate::geometry::{Arc, Shape};
use crate::math::TOLERANCE;

/// Counts and changes produced by [`Explode`].
#[derive(Debug, Default)]
pub struct Exploded {
    pub batch: Batch,
    pub circles: usize,
    pub polylines: usize,
}

/// Breaks circles and polylines into plain line and arc entities.
///
/// Circles become the two half arcs `(0, π)` and `(π, 2π)`. Polylines become
/// their member shapes on the same layer; zero-length lines are dropped.
#[derive(Debug)]
pub struct Explode<'a> {
    drawing: &'a Drawing,
    ignored_layer: Option<LayerId>,
}

impl<'a> Explode<'a> {
    #[must_use]
    pub fn new(drawing: &'a Drawing) -> Self {
        Self {
            drawing,
            ignored_layer: None,
        }
    }

    /// Leaves entities on `layer` as they are.
    #[must_use]
    pub fn ignoring_layer(mut self, layer: Option<LayerId>) -> Self {
        self.ignored_layer = layer;
        self
    }

    /// Builds the batch replacing every circle and polyline.
    #[must_use]
    pub fn execute(&self) -> Exploded {
        let mut out = Exploded::default();
        for (id, entity) in self.drawing.entities() {
            if Some(entity.layer) == self.ignored_layer {
                continue;
            }
            match &entity.kind {
                EntityKind::Circle { center, radius } => {
                    out.batch
                        .create(
                            entity.layer,
                            EntityKind::Arc(Arc::new(*center, *radius, 0.0, PI, false)),
                        )
                        .create(
                            entity.layer,
                            EntityKind::Arc(Arc::new(*center, *radius, PI, 2.0 * PI, false)),
                        )
                        .delete(id);
                    out.circles += 1;
                }
                EntityKind::Polyline(chain) => {
                    for shape in &chain.shapes {
                        if matches!(shape, Shape::Line(l) if l.length() < TOLERANCE) {
                            continue;
                        }
                        out.batch.create(entity.layer, EntityKind::from(*shape));
                    }
                    out.batch.delete(id);
                    out.polylines += 1;
                }
                EntityKind::Line(_) | EntityKind::Arc(_) => {}
            }
        }
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{Chain, Line};
    use crate::math::{points_coincide, Point2};

    #[test]
    fn circle_becomes_two_half_arcs() {
        let mut drawing = Drawing::new();
        let layer = drawing.add_layer("0");
        drawing
            .add_entity(
                layer,
                EntityKind::Circle {
                    center: Point2::new(1.0, 2.0),
                    radius: 3.0,
                },
            )
            .unwrap();

        let exploded = Explode::new(&drawing).execute();
        assert_eq!(exploded.circles, 1);
        drawing.stage(exploded.batch);
        let created = drawing.commit().unwrap();
        assert_eq!(created.len(), 2);
        assert_eq!(drawing.len(), 2);

        let arcs: Vec<Arc> = created
            .iter()
            .map(|id| match drawing.entity(*id).unwrap().kind {
                EntityKind::Arc(a) => a,
                _ => panic!("expected arc"),
            })
            .collect();
        assert!((arcs[0].angle_length() - PI).abs() < 1e-12);
        assert!((arcs[1].angle_length() - PI).abs() < 1e-12);
        assert!(points_coincide(&arcs[0].end_point(), &arcs[1].start_point()));
        assert!(points_coincide(&arcs[1].end_point(), &arcs[0].start_point()));
    }

    #[test]
    fn polyline_members_keep_layer_and_drop_zero_length() {
        let mut drawing = Drawing::new();
        let layer = drawing.add_layer("Cut");
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let chain = Chain::new(vec![
            Shape::Line(Line::new(a, b)),
            Shape::Line(Line::new(b, b)),
            Shape::Line(Line::new(b, Point2::new(1.0, 1.0))),
        ]);
        drawing.add_entity(layer, EntityKind::Polyline(chain)).unwrap();

        let exploded = Explode::new(&drawing).execute();
        assert_eq!(exploded.polylines, 1);
        drawing.stage(exploded.batch);
        drawing.commit().unwrap();
        assert_eq!(drawing.len(), 2);
        assert!(drawing.entities().all(|(_, e)| e.layer == layer));
    }

    #[test]
    fn ignored_layer_keeps_polylines() {
        let mut drawing = Drawing::new();
        let offset = drawing.add_layer("Offset");
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let chain = Chain::new(vec![Shape::Line(Line::new(a, b))]);
        drawing.add_entity(offset, EntityKind::Polyline(chain)).unwrap();
        let exploded = Explode::new(&drawing).ignoring_layer(Some(offset)).execute();
        assert!(exploded.batch.is_empty());
        assert_eq!(exploded.polylines, 0);
    }

    #[test]
    fn plain_segments_untouched() {
        let mut drawing = Drawing::new();
        let layer = drawing.add_layer("0");
        drawing
            .add_entity(
                layer,
                EntityKind::Line(Line::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0))),
            )
            .unwrap();
        let exploded = Explode::new(&drawing).execute();
        assert!(exploded.batch.is_empty());
    }
}
