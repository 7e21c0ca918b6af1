use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entities::EntityKind;

/// Unique identifier for an entity in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Rebuild an id from its raw value (serialization, test doubles).
    pub fn from_u32(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Entity registry for the scene.
///
/// Every entity carries exactly one [`EntityKind`] for its whole lifetime.
/// The kind is what collision routing narrows on, so it is fixed at spawn
/// time and never reassigned.
#[derive(Debug)]
pub struct World {
    next_id: u32,
    kinds: HashMap<EntityId, EntityKind>,
}

impl World {
    /// Create a new, empty world.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            kinds: HashMap::new(),
        }
    }

    /// Spawn a new entity of the given kind and return its `EntityId`.
    pub fn spawn(&mut self, kind: EntityKind) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);
        self.kinds.insert(id, kind);
        id
    }

    /// Forget an entity whose setup failed. Returns whether it was registered.
    pub fn despawn(&mut self, entity: EntityId) -> bool {
        self.kinds.remove(&entity).is_some()
    }

    /// Kind of a live entity.
    pub fn kind(&self, entity: EntityId) -> Option<EntityKind> {
        self.kinds.get(&entity).copied()
    }

    /// All live entities of one kind, in spawn order.
    pub fn entities_of(&self, kind: EntityKind) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .kinds
            .iter()
            .filter(|(_, k)| **k == kind)
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    /// Number of alive entities.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns true if there are no entities in the world.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
