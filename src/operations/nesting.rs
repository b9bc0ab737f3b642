use std::collections::HashSet;

use tracing::debug;

use crate::document::{Drawing, EntityId, LayerId};
use crate::error::{OperationError, Result};
use crate::geometry::Chain;
use crate::math::EPSILON;

use super::spatial_index::BoxIndex;

/// A closed outline and the drawables lying inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainmentGroup {
    pub parent: EntityId,
    pub children: Vec<EntityId>,
}

struct Drawable {
    id: EntityId,
    chain: Chain,
    container: bool,
}

/// Groups drawables by the closed polylines that contain them.
///
/// Containers are closed polylines off the engraving layer; anything else,
/// including other closed polylines, can be contained. Nesting is at most one
/// level deep: an outline that is both inside another and around a third is a
/// [`OperationError::NestingViolation`].
#[derive(Debug)]
pub struct GroupNesting<'a> {
    drawing: &'a Drawing,
    engraving_layer: Option<LayerId>,
    ignored_layer: Option<LayerId>,
}

impl<'a> GroupNesting<'a> {
    #[must_use]
    pub fn new(drawing: &'a Drawing) -> Self {
        Self {
            drawing,
            engraving_layer: None,
            ignored_layer: None,
        }
    }

    /// Entities on `layer` may be contained but never contain.
    #[must_use]
    pub fn engraving_layer(mut self, layer: Option<LayerId>) -> Self {
        self.engraving_layer = layer;
        self
    }

    /// Entities on `layer` take no part in grouping.
    #[must_use]
    pub fn ignoring_layer(mut self, layer: Option<LayerId>) -> Self {
        self.ignored_layer = layer;
        self
    }

    /// Groups in container creation order.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::NestingViolation` if a container is itself
    /// contained in another container.
    pub fn execute(&self) -> Result<Vec<ContainmentGroup>> {
        let drawables: Vec<Drawable> = self
            .drawing
            .entities()
            .filter(|(_, e)| Some(e.layer) != self.ignored_layer)
            .filter_map(|(id, e)| {
                let chain = e.kind.to_chain()?;
                Some(Drawable {
                    id,
                    container: e.kind.is_closed_polyline() && Some(e.layer) != self.engraving_layer,
                    chain,
                })
            })
            .collect();

        let index = BoxIndex::build(
            drawables
                .iter()
                .enumerate()
                .filter_map(|(i, d)| d.chain.bbox().map(|b| (b, i))),
        );

        let mut parents: Vec<ContainmentGroup> = Vec::new();
        let mut contained: HashSet<EntityId> = HashSet::new();
        for container in drawables.iter().filter(|d| d.container) {
            let Some(bbox) = container.chain.bbox() else {
                continue;
            };
            let children: Vec<EntityId> = index
                .contained_in(&bbox.grown(EPSILON))
                .into_iter()
                .map(|&i| &drawables[i])
                .filter(|item| item.id != container.id && container.chain.contains_chain(&item.chain))
                .map(|item| item.id)
                .collect();
            contained.extend(children.iter().copied());
            parents.push(ContainmentGroup {
                parent: container.id,
                children,
            });
        }

        if let Some(group) = parents
            .iter()
            .find(|g| !g.children.is_empty() && contained.contains(&g.parent))
        {
            return Err(OperationError::NestingViolation { id: group.parent }.into());
        }

        let groups: Vec<ContainmentGroup> = parents
            .into_iter()
            .filter(|g| !g.children.is_empty() || !contained.contains(&g.parent))
            .collect();
        debug!(groups = groups.len(), contained = contained.len(), "grouped nesting");
        Ok(groups)
    }
}
