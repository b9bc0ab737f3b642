use std::collections::VecDeque;

use tracing::debug;

use crate::document::{EntityId, LayerId};
use crate::error::{OperationError, Result};
use crate::geometry::{Chain, End, Shape};
use crate::math::{Point2, EPSILON};

use super::segment::{endpoint_index, EndpointRef, Segment};
use super::spatial_index::SpatialIndex;

/// A chain built from drawing segments, with the ids it consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledChain {
    pub layer: LayerId,
    pub chain: Chain,
    /// Consumed segment ids in connectivity order.
    pub sources: Vec<EntityId>,
}

/// Joins end-to-end segments of the same layer into maximal chains.
///
/// Every segment ends up in exactly one chain; an isolated segment forms a
/// chain of its own. Chains grow forward from their seed first, then
/// backward.
#[derive(Debug)]
pub struct AssembleChains<'a> {
    segments: &'a [Segment],
    excluded_layer: Option<LayerId>,
}

impl<'a> AssembleChains<'a> {
    #[must_use]
    pub fn new(segments: &'a [Segment]) -> Self {
        Self {
            segments,
            excluded_layer: None,
        }
    }

    /// Leaves segments on `layer` out of chaining entirely.
    #[must_use]
    pub fn excluding_layer(mut self, layer: Option<LayerId>) -> Self {
        self.excluded_layer = layer;
        self
    }

    /// # Errors
    ///
    /// Returns `OperationError::AmbiguousConnection` if a chain end meets more
    /// than one unvisited segment.
    pub fn execute(&self) -> Result<Vec<AssembledChain>> {
        let included = |s: &Segment| Some(s.layer) != self.excluded_layer;
        let index = endpoint_index(self.segments, included);
        let mut visited = vec![false; self.segments.len()];
        let mut chains = Vec::new();

        for (seed, segment) in self.segments.iter().enumerate() {
            if visited[seed] || !included(segment) {
                continue;
            }
            visited[seed] = true;

            let mut shapes = VecDeque::from([segment.shape]);
            let mut sources = VecDeque::from([segment.id]);

            // Forward.
            while let Some(tail) = shapes.back() {
                let point = tail.end_point();
                let Some(next) = self.next_segment(&index, &visited, point, segment.layer, sources.back())? else {
                    break;
                };
                visited[next.segment] = true;
                let shape = self.segments[next.segment].shape;
                shapes.push_back(if next.end == End::End { shape.reversed() } else { shape });
                sources.push_back(self.segments[next.segment].id);
            }

            // Backward.
            while let Some(head) = shapes.front() {
                let point = head.start_point();
                let Some(prev) = self.next_segment(&index, &visited, point, segment.layer, sources.front())? else {
                    break;
                };
                visited[prev.segment] = true;
                let shape = self.segments[prev.segment].shape;
                shapes.push_front(if prev.end == End::Start { shape.reversed() } else { shape });
                sources.push_front(self.segments[prev.segment].id);
            }

            let chain = Chain::new(shapes.into_iter().collect::<Vec<Shape>>());
            debug!(
                seed = ?segment.id,
                shapes = chain.len(),
                closed = chain.closed,
                "assembled chain"
            );
            chains.push(AssembledChain {
                layer: segment.layer,
                chain,
                sources: sources.into_iter().collect(),
            });
        }

        Ok(chains)
    }

    /// The single unvisited endpoint on `layer` within tolerance of `point`.
    fn next_segment(
        &self,
        index: &SpatialIndex<EndpointRef>,
        visited: &[bool],
        point: Point2,
        layer: LayerId,
        from: Option<&EntityId>,
    ) -> Result<Option<EndpointRef>> {
        let mut found: Vec<EndpointRef> = Vec::new();
        for hit in index.within(&point, EPSILON) {
            let r = *hit.item;
            if visited[r.segment] || self.segments[r.segment].layer != layer {
                continue;
            }
            if found.iter().all(|f| f.segment != r.segment) {
                found.push(r);
            }
        }

        match found.as_slice() {
            [] => Ok(None),
            [single] => Ok(Some(*single)),
            _ => {
                let mut ids: Vec<EntityId> = from.copied().into_iter().collect();
                ids.extend(found.iter().map(|r| self.segments[r.segment].id));
                Err(OperationError::AmbiguousConnection { point, ids }.into())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::document::{Drawing, EntityKind};
    use crate::error::LineworkError;
    use crate::geometry::{Arc, Line, Orientation};
    use crate::math::points_coincide;
    use std::f64::consts::PI;

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> EntityKind {
        EntityKind::Line(Line::new(Point2::new(x0, y0), Point2::new(x1, y1)))
    }

    fn segments_of(kinds: Vec<EntityKind>) -> (Vec<Segment>, Vec<EntityId>) {
        let mut drawing = Drawing::new();
        let layer = drawing.add_layer("0");
        let ids = kinds
            .into_iter()
            .map(|k| drawing.add_entity(layer, k).unwrap())
            .collect();
        (Segment::collect(&drawing), ids)
    }

    fn assert_connected(chain: &Chain) {
        for pair in chain.shapes.windows(2) {
            assert!(points_coincide(&pair[0].end_point(), &pair[1].start_point()));
        }
    }

    #[test]
    fn square_with_mixed_directions_closes() {
        let (segments, ids) = segments_of(vec![
            line(0.0, 0.0, 1.0, 0.0),
            line(1.0, 1.0, 1.0, 0.0),
            line(0.0, 1.0, 1.0, 1.0),
            line(0.0, 1.0, 0.0, 0.0),
        ]);
        let chains = AssembleChains::new(&segments).execute().unwrap();
        assert_eq!(chains.len(), 1);
        let c = &chains[0];
        assert!(c.chain.closed);
        assert_eq!(c.chain.len(), 4);
        assert_connected(&c.chain);
        assert_eq!(c.sources, vec![ids[0], ids[1], ids[2], ids[3]]);
        assert_eq!(c.chain.orientation(), Orientation::CounterClockwise);
    }

    #[test]
    fn seed_in_the_middle_extends_both_ways() {
        let (segments, ids) = segments_of(vec![
            line(1.0, 0.0, 2.0, 0.0),
            line(3.0, 0.0, 2.0, 0.0),
            line(1.0, 0.0, 0.0, 0.0),
        ]);
        let chains = AssembleChains::new(&segments).execute().unwrap();
        assert_eq!(chains.len(), 1);
        let c = &chains[0];
        assert!(!c.chain.closed);
        assert_connected(&c.chain);
        assert_eq!(c.sources, vec![ids[2], ids[0], ids[1]]);
        assert_eq!(c.chain.start_point().unwrap(), Point2::new(0.0, 0.0));
        assert_eq!(c.chain.end_point().unwrap(), Point2::new(3.0, 0.0));
    }

    #[test]
    fn isolated_segments_become_single_chains() {
        let (segments, _) = segments_of(vec![line(0.0, 0.0, 1.0, 0.0), line(5.0, 5.0, 6.0, 5.0)]);
        let chains = AssembleChains::new(&segments).execute().unwrap();
        assert_eq!(chains.len(), 2);
        assert!(chains.iter().all(|c| c.chain.len() == 1 && !c.chain.closed));
    }

    #[test]
    fn circle_halves_close() {
        let (segments, _) = segments_of(vec![
            EntityKind::Arc(Arc::new(Point2::origin(), 1.0, 0.0, PI, false)),
            EntityKind::Arc(Arc::new(Point2::origin(), 1.0, PI, 2.0 * PI, false)),
        ]);
        let chains = AssembleChains::new(&segments).execute().unwrap();
        assert_eq!(chains.len(), 1);
        assert!(chains[0].chain.closed);
        assert!((chains[0].chain.signed_area() - PI).abs() < 1e-9);
    }

    #[test]
    fn branching_is_ambiguous() {
        let (segments, ids) = segments_of(vec![
            line(0.0, 0.0, 1.0, 0.0),
            line(1.0, 0.0, 2.0, 0.0),
            line(1.0, 0.0, 1.0, 1.0),
        ]);
        let err = AssembleChains::new(&segments).execute().unwrap_err();
        let LineworkError::Operation(OperationError::AmbiguousConnection { point, ids: found }) =
            err
        else {
            panic!("expected ambiguous connection, got {err:?}");
        };
        assert_eq!(point, Point2::new(1.0, 0.0));
        assert_eq!(found, ids);
    }

    #[test]
    fn excluded_layer_is_skipped() {
        let mut drawing = Drawing::new();
        let cut = drawing.add_layer("Cut");
        let engrave = drawing.add_layer("Engrave");
        drawing.add_entity(cut, line(0.0, 0.0, 1.0, 0.0)).unwrap();
        drawing.add_entity(engrave, line(1.0, 0.0, 2.0, 0.0)).unwrap();
        let segments = Segment::collect(&drawing);
        let chains = AssembleChains::new(&segments)
            .excluding_layer(Some(engrave))
            .execute()
            .unwrap();
        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].layer, cut);
    }
}
