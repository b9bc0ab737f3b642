use crate::document::{Drawing, EntityId, LayerId};
use crate::geometry::{End, Shape};

use super::spatial_index::SpatialIndex;

/// A line or arc entity lifted out of the drawing for processing.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub id: EntityId,
    pub layer: LayerId,
    pub shape: Shape,
}

impl Segment {
    /// Every line and arc entity in the drawing, in creation order.
    #[must_use]
    pub fn collect(drawing: &Drawing) -> Vec<Self> {
        drawing
            .entities()
            .filter_map(|(id, entity)| {
                entity.kind.shape().map(|shape| Self {
                    id,
                    layer: entity.layer,
                    shape,
                })
            })
            .collect()
    }
}

/// Payload of an endpoint index: which segment and which of its ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EndpointRef {
    pub segment: usize,
    pub end: End,
}

/// Indexes both ends of every segment accepted by `include`.
pub(crate) fn endpoint_index<F>(segments: &[Segment], include: F) -> SpatialIndex<EndpointRef>
where
    F: Fn(&Segment) -> bool,
{
    SpatialIndex::build(
        segments
            .iter()
            .enumerate()
            .filter(|(_, s)| include(s))
            .flat_map(|(i, s)| {
                [End::Start, End::End].map(|end| {
                    (
                        s.shape.point(end),
                        EndpointRef { segment: i, end },
                    )
                })
            }),
    )
}
