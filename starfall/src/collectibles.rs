use serde::{Deserialize, Serialize};

use crate::entities::PickupId;
use crate::error::{Result, SceneError};
use crate::math::{Span, Vec2};

/// Where stars are laid out when the scene starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PickupLayout {
    pub count: usize,
    pub start: Vec2,
    pub step_x: f32,
    pub size: Vec2,
    /// Vertical bounce, sampled once per star.
    pub bounce: Span<f32>,
}

impl PickupLayout {
    /// Spawn positions, left to right.
    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        (0..self.count).map(move |i| Vec2::new(self.start.x + self.step_x * i as f32, self.start.y))
    }
}

impl Default for PickupLayout {
    fn default() -> Self {
        Self {
            count: 12,
            start: Vec2::new(12.0, 0.0),
            step_x: 70.0,
            size: Vec2::new(24.0, 22.0),
            bounce: Span::new(0.4, 0.8),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Pickup {
    id: PickupId,
    origin_x: f32,
    active: bool,
}

/// Fixed set of stars with their active flags.
///
/// Membership is fixed after the scene is built; collecting a star only
/// flips its flag.
#[derive(Clone, Debug, Default)]
pub struct CollectibleSet {
    pickups: Vec<Pickup>,
}

impl CollectibleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an active star spawned at `origin_x`.
    pub fn insert(&mut self, id: PickupId, origin_x: f32) {
        self.pickups.push(Pickup {
            id,
            origin_x,
            active: true,
        });
    }

    pub fn len(&self) -> usize {
        self.pickups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pickups.is_empty()
    }

    pub fn contains(&self, id: PickupId) -> bool {
        self.pickups.iter().any(|p| p.id == id)
    }

    pub fn is_active(&self, id: PickupId) -> Result<bool> {
        self.find(id).map(|p| p.active)
    }

    pub fn count_active(&self) -> usize {
        self.pickups.iter().filter(|p| p.active).count()
    }

    pub fn ids(&self) -> impl Iterator<Item = PickupId> + '_ {
        self.pickups.iter().map(|p| p.id)
    }

    /// Mark a star collected. Returns `false` if it was already inactive.
    pub fn deactivate(&mut self, id: PickupId) -> Result<bool> {
        let pickup = self
            .pickups
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(SceneError::UnknownPickup(id))?;
        let was_active = pickup.active;
        pickup.active = false;
        Ok(was_active)
    }

    /// Reactivate every star and return where each one should reappear:
    /// its original column, at height `respawn_y`.
    pub fn reactivate_all(&mut self, respawn_y: f32) -> Vec<(PickupId, Vec2)> {
        self.pickups
            .iter_mut()
            .map(|p| {
                p.active = true;
                (p.id, Vec2::new(p.origin_x, respawn_y))
            })
            .collect()
    }

    fn find(&self, id: PickupId) -> Result<&Pickup> {
        self.pickups
            .iter()
            .find(|p| p.id == id)
            .ok_or(SceneError::UnknownPickup(id))
    }
}
