use thiserror::Error;

use crate::entities::{EntityKind, HazardId, Pairing, PickupId};
use crate::world::EntityId;

/// Failures at the boundary between the game logic and the engine.
///
/// Each of these means the scene wiring is broken: collisions are
/// registered per entity kind, so none of them can happen in a correctly
/// built scene. Callers are expected to stop the frame and surface it.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("{pairing} delivered {entity} of kind {found}, expected {}", .pairing.expected_kind())]
    UnexpectedEntity {
        pairing: Pairing,
        entity: EntityId,
        found: EntityKind,
    },

    #[error("{pairing} delivered {entity}, which is not registered in the world")]
    UnregisteredEntity { pairing: Pairing, entity: EntityId },

    #[error("{0} is not part of the collectible set")]
    UnknownPickup(PickupId),

    #[error("{0} is not part of the hazard set")]
    UnknownHazard(HazardId),

    #[error("entity {0} has no physics body")]
    MissingBody(EntityId),

    #[error("failed to build the physics body of {entity}")]
    PhysicsSetup {
        entity: EntityId,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

pub type Result<T> = std::result::Result<T, SceneError>;
