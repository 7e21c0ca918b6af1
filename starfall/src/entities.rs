//! Entity kinds and the typed ids the game logic works with.
//!
//! Collision handlers take a [`PickupId`] or a [`HazardId`], never a bare
//! [`EntityId`]. Narrowing from the engine's untyped ids happens once, in
//! the scene's collision routing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::world::EntityId;

/// What an entity is. Fixed at spawn time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Platform,
    WorldBound,
    Pickup,
    Hazard,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Player => "player",
            EntityKind::Platform => "platform",
            EntityKind::WorldBound => "world bound",
            EntityKind::Pickup => "pickup",
            EntityKind::Hazard => "hazard",
        };
        f.write_str(name)
    }
}

/// Id of an entity known to be a pickup (star).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PickupId(EntityId);

impl PickupId {
    pub fn new(entity: EntityId) -> Self {
        Self(entity)
    }

    pub fn entity(self) -> EntityId {
        self.0
    }
}

impl fmt::Display for PickupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pickup{}", self.0)
    }
}

/// Id of an entity known to be a hazard (bomb).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HazardId(EntityId);

impl HazardId {
    pub fn new(entity: EntityId) -> Self {
        Self(entity)
    }

    pub fn entity(self) -> EntityId {
        self.0
    }
}

impl fmt::Display for HazardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hazard{}", self.0)
    }
}

/// Collision pairings that carry a game-logic callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pairing {
    /// Player overlapping a star. Non-solid.
    PlayerPickup,
    /// Player colliding with a bomb. Solid.
    PlayerHazard,
}

impl Pairing {
    /// The entity kind the non-player side of this pairing must have.
    pub fn expected_kind(self) -> EntityKind {
        match self {
            Pairing::PlayerPickup => EntityKind::Pickup,
            Pairing::PlayerHazard => EntityKind::Hazard,
        }
    }
}

impl fmt::Display for Pairing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pairing::PlayerPickup => f.write_str("player/pickup overlap"),
            Pairing::PlayerHazard => f.write_str("player/hazard collider"),
        }
    }
}

/// RGBA tint multiplier applied to a sprite.
pub type Tint = [f32; 4];

/// Untinted sprite.
pub const NO_TINT: Tint = [1.0, 1.0, 1.0, 1.0];

/// Convert a `0xRRGGBB` color into an opaque tint.
pub fn tint_from_rgb(rgb: u32) -> Tint {
    let channel = |shift: u32| ((rgb >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), 1.0]
}
