use tracing::debug;

use crate::geometry::End;
use crate::math::EPSILON;

use super::filter::Pruned;
use super::segment::{endpoint_index, Segment};

/// Removes segments that coincide with an earlier one.
///
/// Two segments are duplicates when their endpoints pair up within
/// [`EPSILON`] (in either direction) and they are the same kind of shape;
/// arcs must additionally share circle, included angle and midpoint. The
/// later-found member of a pair is removed. Layers are not considered.
/// Running it again on its own output removes nothing.
#[derive(Debug)]
pub struct EliminateDuplicates<'a> {
    segments: &'a [Segment],
}

impl<'a> EliminateDuplicates<'a> {
    #[must_use]
    pub fn new(segments: &'a [Segment]) -> Self {
        Self { segments }
    }

    #[must_use]
    pub fn execute(&self) -> Pruned {
        let index = endpoint_index(self.segments, |_| true);
        let mut marked = vec![false; self.segments.len()];

        for (i, segment) in self.segments.iter().enumerate() {
            if marked[i] {
                continue;
            }
            for end in [End::Start, End::End] {
                let point = segment.shape.point(end);
                for hit in index.within(&point, EPSILON) {
                    let j = hit.item.segment;
                    if j == i || marked[j] {
                        continue;
                    }
                    if segment.shape.equals_fuzzy(&self.segments[j].shape) {
                        debug!(kept = ?segment.id, removed = ?self.segments[j].id, "duplicate segment");
                        marked[j] = true;
                    }
                }
            }
        }

        let mut out = Pruned::default();
        for (segment, dup) in self.segments.iter().zip(marked) {
            if dup {
                out.removed.push(segment.id);
            } else {
                out.kept.push(segment.clone());
            }
        }
        out
    }
}
