use super::{EntityId, EntityKind, LayerId};

/// An entity to be created by a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntity {
    pub layer: LayerId,
    pub kind: EntityKind,
}

/// A staged set of document changes, applied all at once by
/// [`Drawing::commit`](super::Drawing::commit).
///
/// Modifications replace an entity's geometry but keep its layer and id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    pub creates: Vec<NewEntity>,
    pub modifies: Vec<(EntityId, EntityKind)>,
    pub deletes: Vec<EntityId>,
}

impl Batch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, layer: LayerId, kind: EntityKind) -> &mut Self {
        self.creates.push(NewEntity { layer, kind });
        self
    }

    pub fn modify(&mut self, id: EntityId, kind: EntityKind) -> &mut Self {
        self.modifies.push((id, kind));
        self
    }

    pub fn delete(&mut self, id: EntityId) -> &mut Self {
        self.deletes.push(id);
        self
    }

    /// Appends every change of `other` after this batch's own.
    pub fn merge(&mut self, other: Batch) {
        self.creates.extend(other.creates);
        self.modifies.extend(other.modifies);
        self.deletes.extend(other.deletes);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.creates.is_empty() && self.modifies.is_empty() && self.deletes.is_empty()
    }

    /// Total number of staged changes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.creates.len() + self.modifies.len() + self.deletes.len()
    }
}
