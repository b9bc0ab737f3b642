pub mod pline_offset;

use tracing::{debug, warn};

use crate::config::PipelineConfig;
use crate::document::{Drawing, EntityId, LayerId};
use crate::error::{OperationError, Result};
use crate::geometry::pline::Pline;
use crate::geometry::{Chain, Orientation};

use super::nesting::ContainmentGroup;

pub use pline_offset::PlineOffset;

/// Where a boundary sits within its containment group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryRole {
    Outer,
    Hole,
}

impl BoundaryRole {
    /// Winding the boundary must have before offsetting.
    #[must_use]
    pub fn required_orientation(self) -> Orientation {
        match self {
            Self::Outer => Orientation::CounterClockwise,
            Self::Hole => Orientation::Clockwise,
        }
    }
}

/// One offset loop and the boundary it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetCurve {
    pub source: EntityId,
    pub chain: Chain,
    pub orientation: Orientation,
}

type Boundary = (EntityId, Chain, BoundaryRole);

/// Where boundary roles come from.
#[derive(Debug, Clone, Copy)]
enum Roles<'a> {
    /// Parents are outer, closed children are holes.
    Nested(&'a [ContainmentGroup]),
    /// No nesting result: a boundary inside another one of the set is a hole.
    Siblings(&'a [EntityId]),
}

/// Offsets every closed boundary of every containment group.
///
/// Outer boundaries grow and holes shrink by the configured distance. When a
/// start point yields nothing the boundary is restarted one shape later,
/// once per shape, before giving up.
#[derive(Debug)]
pub struct OffsetGroups<'a> {
    drawing: &'a Drawing,
    roles: Roles<'a>,
    config: &'a PipelineConfig,
    engraving_layer: Option<LayerId>,
}

impl<'a> OffsetGroups<'a> {
    #[must_use]
    pub fn new(drawing: &'a Drawing, groups: &'a [ContainmentGroup], config: &'a PipelineConfig) -> Self {
        Self {
            drawing,
            roles: Roles::Nested(groups),
            config,
            engraving_layer: None,
        }
    }

    /// Offsets loose boundaries that have no nesting result.
    ///
    /// Roles come from pairwise containment: a boundary lying inside any
    /// other boundary of `boundaries` is a hole, the rest are outer.
    #[must_use]
    pub fn siblings(drawing: &'a Drawing, boundaries: &'a [EntityId], config: &'a PipelineConfig) -> Self {
        Self {
            drawing,
            roles: Roles::Siblings(boundaries),
            config,
            engraving_layer: None,
        }
    }

    /// Children on `layer` are marks, not holes, and are never offset.
    #[must_use]
    pub fn engraving_layer(mut self, layer: Option<LayerId>) -> Self {
        self.engraving_layer = layer;
        self
    }

    /// # Errors
    ///
    /// Returns `OperationError::OffsetFailure` if a boundary collapses for
    /// every start rotation and `abort_on_offset_failure` is set, or a
    /// document error if a group refers to a missing entity.
    pub fn execute(&self) -> Result<Vec<OffsetCurve>> {
        let boundaries = match self.roles {
            Roles::Nested(groups) => {
                let mut out = Vec::new();
                for group in groups {
                    out.extend(self.group_boundaries(group)?);
                }
                out
            }
            Roles::Siblings(ids) => self.sibling_boundaries(ids)?,
        };

        let mut curves = Vec::new();
        for (id, chain, role) in boundaries {
            if role == BoundaryRole::Hole && self.config.skip_inner_offset {
                continue;
            }
            curves.extend(self.offset_boundary(id, &chain, role)?);
        }
        Ok(curves)
    }

    /// The closed chain of `id`, unless it is open or an engraving mark.
    fn closed_chain(&self, id: EntityId) -> Result<Option<Chain>> {
        let entity = self.drawing.entity(id)?;
        if Some(entity.layer) == self.engraving_layer {
            return Ok(None);
        }
        Ok(entity.kind.to_chain().filter(|c| c.closed))
    }

    fn group_boundaries(&self, group: &ContainmentGroup) -> Result<Vec<Boundary>> {
        let mut out = Vec::new();
        if let Some(chain) = self.closed_chain(group.parent)? {
            out.push((group.parent, chain, BoundaryRole::Outer));
        }
        for &child in &group.children {
            if !self.drawing.entity(child)?.kind.is_closed_polyline() {
                continue;
            }
            if let Some(chain) = self.closed_chain(child)? {
                out.push((child, chain, BoundaryRole::Hole));
            }
        }
        Ok(out)
    }

    fn sibling_boundaries(&self, ids: &[EntityId]) -> Result<Vec<Boundary>> {
        let mut chains = Vec::new();
        for &id in ids {
            if let Some(chain) = self.closed_chain(id)? {
                chains.push((id, chain));
            }
        }
        Ok(chains
            .iter()
            .enumerate()
            .map(|(i, (id, chain))| {
                let inside_another = chains
                    .iter()
                    .enumerate()
                    .any(|(j, (_, other))| j != i && other.contains_chain(chain));
                let role = if inside_another {
                    BoundaryRole::Hole
                } else {
                    BoundaryRole::Outer
                };
                (*id, chain.clone(), role)
            })
            .collect())
    }

    fn offset_boundary(&self, id: EntityId, chain: &Chain, role: BoundaryRole) -> Result<Vec<OffsetCurve>> {
        let is_hole = role == BoundaryRole::Hole;
        let oriented = if is_hole ^ chain.orientation().is_clockwise() {
            chain.reversed()
        } else {
            chain.clone()
        };

        let distance = self.config.offset_distance;
        if distance == 0.0 {
            return Ok(vec![OffsetCurve {
                source: id,
                orientation: oriented.orientation(),
                chain: oriented,
            }]);
        }

        let attempts = oriented.len();
        for rotation in 0..attempts {
            let pline = Pline::from_chain(&oriented.rotated(rotation));
            // Right-hand side: outward for counter-clockwise, inward for clockwise.
            let loops = PlineOffset::new(pline, -distance)
                .join_style(self.config.join_style)
                .execute()?;
            if loops.is_empty() {
                debug!(?id, rotation, "offset empty, rotating start");
                continue;
            }
            return Ok(loops
                .iter()
                .map(|p| {
                    let chain = p.to_chain();
                    OffsetCurve {
                        source: id,
                        orientation: chain.orientation(),
                        chain,
                    }
                })
                .collect());
        }

        if self.config.abort_on_offset_failure {
            return Err(OperationError::OffsetFailure { id, attempts }.into());
        }
        warn!(?id, attempts, "skipping boundary that cannot be offset");
        Ok(Vec::new())
    }
}
