pub mod batch;

pub use batch::{Batch, NewEntity};

use std::collections::HashSet;

use slotmap::SlotMap;

use crate::error::DocumentError;
use crate::geometry::{Aabb, Arc, Chain, Line, Shape};
use crate::math::Point2;

slotmap::new_key_type! {
    /// Unique identifier for an entity in a drawing.
    pub struct EntityId;
}

slotmap::new_key_type! {
    /// Unique identifier for a layer in a drawing.
    pub struct LayerId;
}

/// A named drawing layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub name: String,
}

/// Geometry carried by a drawing entity.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    Line(Line),
    Arc(Arc),
    Circle { center: Point2, radius: f64 },
    Polyline(Chain),
}

impl EntityKind {
    /// The single shape of a line or arc entity.
    #[must_use]
    pub fn shape(&self) -> Option<Shape> {
        match self {
            Self::Line(l) => Some(Shape::Line(*l)),
            Self::Arc(a) => Some(Shape::Arc(*a)),
            Self::Circle { .. } | Self::Polyline(_) => None,
        }
    }

    /// The entity as a chain; lines and arcs become one-shape open chains.
    ///
    /// Circles have no chain form until exploded.
    #[must_use]
    pub fn to_chain(&self) -> Option<Chain> {
        match self {
            Self::Polyline(chain) => Some(chain.clone()),
            Self::Circle { .. } => None,
            Self::Line(_) | Self::Arc(_) => self.shape().map(|s| Chain::new(vec![s])),
        }
    }

    #[must_use]
    pub fn bbox(&self) -> Option<Aabb> {
        match self {
            Self::Line(l) => Some(Shape::Line(*l).bbox()),
            Self::Arc(a) => Some(a.bbox()),
            Self::Circle { center, radius } => Some(Aabb::from_corners(
                Point2::new(center.x - radius, center.y - radius),
                Point2::new(center.x + radius, center.y + radius),
            )),
            Self::Polyline(chain) => chain.bbox(),
        }
    }

    /// A closed polyline, the only kind that can contain other entities.
    #[must_use]
    pub fn is_closed_polyline(&self) -> bool {
        matches!(self, Self::Polyline(chain) if chain.closed)
    }
}

impl From<Shape> for EntityKind {
    fn from(shape: Shape) -> Self {
        match shape {
            Shape::Line(l) => Self::Line(l),
            Shape::Arc(a) => Self::Arc(a),
        }
    }
}

/// A drawable item on a layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub layer: LayerId,
    pub kind: EntityKind,
}

/// In-memory drawing: an arena of layers and entities.
///
/// Entities are changed only through [`stage`](Self::stage) and
/// [`commit`](Self::commit). Iteration follows creation order.
#[derive(Debug, Default)]
pub struct Drawing {
    layers: SlotMap<LayerId, Layer>,
    entities: SlotMap<EntityId, Entity>,
    order: Vec<EntityId>,
    pending: Option<Batch>,
}

impl Drawing {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Layers ---

    /// Adds a layer and returns its ID.
    pub fn add_layer(&mut self, name: impl Into<String>) -> LayerId {
        self.layers.insert(Layer { name: name.into() })
    }

    /// Returns the layer named `name`, creating it if absent.
    pub fn ensure_layer(&mut self, name: &str) -> LayerId {
        match self.layer_by_name(name) {
            Some(id) => id,
            None => self.add_layer(name),
        }
    }

    #[must_use]
    pub fn layer_by_name(&self, name: &str) -> Option<LayerId> {
        self.layers
            .iter()
            .find(|(_, layer)| layer.name == name)
            .map(|(id, _)| id)
    }

    /// Returns the layer, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::LayerNotFound` for an unknown id.
    pub fn layer(&self, id: LayerId) -> Result<&Layer, DocumentError> {
        self.layers.get(id).ok_or(DocumentError::LayerNotFound(id))
    }

    // --- Entities ---

    /// Returns the entity, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::EntityNotFound` for an unknown or deleted id.
    pub fn entity(&self, id: EntityId) -> Result<&Entity, DocumentError> {
        self.entities
            .get(id)
            .ok_or(DocumentError::EntityNotFound(id))
    }

    /// Iterates live entities in creation order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.order
            .iter()
            .filter_map(|&id| self.entities.get(id).map(|e| (id, e)))
    }

    /// Iterates live entities on `layer` in creation order.
    pub fn entities_on(&self, layer: LayerId) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.entities().filter(move |(_, e)| e.layer == layer)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Creates a single entity through a one-item batch.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::LayerNotFound` if `layer` is unknown.
    pub fn add_entity(&mut self, layer: LayerId, kind: EntityKind) -> Result<EntityId, DocumentError> {
        let mut batch = Batch::new();
        batch.create(layer, kind);
        self.stage(batch);
        let created = self.commit()?;
        // Earlier staged creations come first; ours is last.
        created
            .last()
            .copied()
            .ok_or(DocumentError::LayerNotFound(layer))
    }

    // --- Batches ---

    /// Stages a batch for the next commit, merging with anything already staged.
    pub fn stage(&mut self, batch: Batch) {
        match &mut self.pending {
            Some(pending) => pending.merge(batch),
            None => self.pending = Some(batch),
        }
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Applies the staged batch: modifications, then deletions, then creations.
    ///
    /// Every referenced id is validated before anything is applied; on error
    /// the drawing is unchanged and the staged batch is dropped. Returns the
    /// ids of created entities in staging order.
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::EntityNotFound` if a modified or deleted entity
    /// does not exist (or is deleted twice), and `DocumentError::LayerNotFound`
    /// if a created entity names an unknown layer.
    pub fn commit(&mut self) -> Result<Vec<EntityId>, DocumentError> {
        let Some(batch) = self.pending.take() else {
            return Ok(Vec::new());
        };
        self.validate(&batch)?;

        for (id, kind) in batch.modifies {
            if let Some(entity) = self.entities.get_mut(id) {
                entity.kind = kind;
            }
        }

        if !batch.deletes.is_empty() {
            for &id in &batch.deletes {
                self.entities.remove(id);
            }
            let deleted: HashSet<EntityId> = batch.deletes.into_iter().collect();
            self.order.retain(|id| !deleted.contains(id));
        }

        let mut created = Vec::with_capacity(batch.creates.len());
        for NewEntity { layer, kind } in batch.creates {
            let id = self.entities.insert(Entity { layer, kind });
            self.order.push(id);
            created.push(id);
        }
        Ok(created)
    }

    fn validate(&self, batch: &Batch) -> Result<(), DocumentError> {
        for (id, _) in &batch.modifies {
            self.entity(*id)?;
        }
        let mut seen = HashSet::new();
        for &id in &batch.deletes {
            self.entity(id)?;
            if !seen.insert(id) {
                return Err(DocumentError::EntityNotFound(id));
            }
        }
        for new in &batch.creates {
            self.layer(new.layer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> EntityKind {
        EntityKind::Line(Line::new(Point2::new(x0, y0), Point2::new(x1, y1)))
    }

    #[test]
    fn layers_by_name() {
        let mut drawing = Drawing::new();
        let a = drawing.add_layer("Cut");
        assert_eq!(drawing.layer_by_name("Cut"), Some(a));
        assert_eq!(drawing.ensure_layer("Cut"), a);
        let b = drawing.ensure_layer("Offset");
        assert_ne!(a, b);
        assert_eq!(drawing.layer(b).unwrap().name, "Offset");
    }

    #[test]
    fn commit_applies_all_changes() {
        let mut drawing = Drawing::new();
        let layer = drawing.add_layer("0");
        let a = drawing.add_entity(layer, line(0.0, 0.0, 1.0, 0.0)).unwrap();
        let b = drawing.add_entity(layer, line(1.0, 0.0, 1.0, 1.0)).unwrap();

        let mut batch = Batch::new();
        batch
            .modify(a, line(0.0, 0.0, 2.0, 0.0))
            .delete(b)
            .create(layer, line(5.0, 5.0, 6.0, 6.0));
        drawing.stage(batch);
        let created = drawing.commit().unwrap();

        assert_eq!(created.len(), 1);
        assert_eq!(drawing.len(), 2);
        assert!(drawing.entity(b).is_err());
        assert_eq!(drawing.entity(a).unwrap().kind, line(0.0, 0.0, 2.0, 0.0));
        let ids: Vec<EntityId> = drawing.entities().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, created[0]]);
    }

    #[test]
    fn commit_is_atomic() {
        let mut drawing = Drawing::new();
        let layer = drawing.add_layer("0");
        let a = drawing.add_entity(layer, line(0.0, 0.0, 1.0, 0.0)).unwrap();
        let b = drawing.add_entity(layer, line(1.0, 0.0, 1.0, 1.0)).unwrap();

        let mut gone = Batch::new();
        gone.delete(b);
        drawing.stage(gone);
        drawing.commit().unwrap();

        let mut batch = Batch::new();
        batch
            .modify(a, line(9.0, 9.0, 8.0, 8.0))
            .create(layer, line(5.0, 5.0, 6.0, 6.0))
            .delete(b);
        drawing.stage(batch);
        let err = drawing.commit().unwrap_err();

        assert!(matches!(err, DocumentError::EntityNotFound(id) if id == b));
        assert!(!drawing.has_pending());
        assert_eq!(drawing.len(), 1);
        assert_eq!(drawing.entity(a).unwrap().kind, line(0.0, 0.0, 1.0, 0.0));
    }

    #[test]
    fn staging_twice_merges() {
        let mut drawing = Drawing::new();
        let layer = drawing.add_layer("0");
        let mut first = Batch::new();
        first.create(layer, line(0.0, 0.0, 1.0, 0.0));
        let mut second = Batch::new();
        second.create(layer, line(1.0, 0.0, 2.0, 0.0));
        drawing.stage(first);
        drawing.stage(second);
        assert_eq!(drawing.commit().unwrap().len(), 2);
        assert!(drawing.commit().unwrap().is_empty());
    }

    #[test]
    fn unknown_layer_rejected() {
        let mut drawing = Drawing::new();
        let layer = drawing.add_layer("0");
        let mut batch = Batch::new();
        batch.create(layer, line(0.0, 0.0, 1.0, 0.0));
        batch.create(LayerId::default(), line(0.0, 0.0, 1.0, 0.0));
        drawing.stage(batch);
        assert!(matches!(
            drawing.commit(),
            Err(DocumentError::LayerNotFound(_))
        ));
        assert!(drawing.is_empty());
    }

    #[test]
    fn entity_kind_views() {
        let circle = EntityKind::Circle {
            center: Point2::new(1.0, 1.0),
            radius: 2.0,
        };
        assert!(circle.to_chain().is_none());
        let b = circle.bbox().unwrap();
        assert_eq!(b.min, Point2::new(-1.0, -1.0));

        let l = line(0.0, 0.0, 1.0, 0.0);
        let chain = l.to_chain().unwrap();
        assert!(!chain.closed);
        assert_eq!(chain.len(), 1);
        assert!(!l.is_closed_polyline());
    }
}
