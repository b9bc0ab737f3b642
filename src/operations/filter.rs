use tracing::debug;

use crate::document::EntityId;
use crate::geometry::Shape;
use crate::math::{EPSILON, TOLERANCE};

use super::segment::Segment;

/// Segments split into those that survive a stage and the ids it removes.
#[derive(Debug, Default)]
pub struct Pruned {
    pub kept: Vec<Segment>,
    pub removed: Vec<EntityId>,
}

/// Drops segments too short to matter and arcs too small to reconstruct.
///
/// A segment is removed when its length is below `min_length`, when it has
/// no length at all, or, for arcs, when the radius is below [`EPSILON`].
/// Degenerate geometry is filtered here rather than raised as an error.
#[derive(Debug)]
pub struct MinLengthFilter<'a> {
    segments: &'a [Segment],
    min_length: f64,
}

impl<'a> MinLengthFilter<'a> {
    #[must_use]
    pub fn new(segments: &'a [Segment], min_length: f64) -> Self {
        Self {
            segments,
            min_length,
        }
    }

    #[must_use]
    pub fn execute(&self) -> Pruned {
        let mut out = Pruned::default();
        for segment in self.segments {
            let tiny_arc = matches!(&segment.shape, Shape::Arc(a) if a.radius < EPSILON);
            let length = segment.shape.length();
            let degenerate = tiny_arc || !length.is_finite() || length <= TOLERANCE;
            if degenerate || length < self.min_length {
                debug!(id = ?segment.id, length, "dropping short segment");
                out.removed.push(segment.id);
            } else {
                out.kept.push(segment.clone());
            }
        }
        out
    }
}
