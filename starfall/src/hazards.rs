use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::entities::HazardId;
use crate::math::{Span, Vec2};
use crate::random::RandomSource;

/// Spawn rules for bombs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HazardConfig {
    pub size: Vec2,
    pub spawn_y: f32,
    /// Player x below this picks from `far_span`, otherwise from `near_span`.
    pub midpoint: f32,
    /// Columns used while the player is on the left half.
    pub far_span: Span<i32>,
    /// Columns used while the player is on the right half.
    pub near_span: Span<i32>,
    pub velocity_x: Span<i32>,
    pub velocity_y: f32,
    pub bounce: f32,
    /// Upper bound on live bombs. `None` lets them accumulate forever.
    pub max_hazards: Option<usize>,
}

impl Default for HazardConfig {
    fn default() -> Self {
        Self {
            size: Vec2::new(14.0, 14.0),
            spawn_y: 16.0,
            midpoint: 400.0,
            far_span: Span::new(400, 800),
            near_span: Span::new(0, 400),
            velocity_x: Span::new(-200, 200),
            velocity_y: 20.0,
            bounce: 1.0,
            max_hazards: None,
        }
    }
}

impl HazardConfig {
    /// Column range for the next bomb given where the player stands.
    ///
    /// This biases the bomb toward the half the player is not on. The
    /// player may have moved by the time the bomb lands.
    pub fn spawn_span(&self, player_x: f32) -> Span<i32> {
        if player_x < self.midpoint {
            self.far_span
        } else {
            self.near_span
        }
    }

    /// Sample a concrete spawn.
    pub fn roll<R: RandomSource + ?Sized>(&self, player_x: f32, rng: &mut R) -> HazardSpawn {
        let span = self.spawn_span(player_x);
        let x = rng.between(span.min, span.max) as f32;
        let vx = rng.between(self.velocity_x.min, self.velocity_x.max) as f32;

        HazardSpawn {
            position: Vec2::new(x, self.spawn_y),
            velocity: Vec2::new(vx, self.velocity_y),
            bounce: self.bounce,
            collide_world_bounds: true,
        }
    }
}

/// Everything the engine needs to create (or reposition) one bomb.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HazardSpawn {
    pub position: Vec2,
    pub velocity: Vec2,
    pub bounce: f32,
    pub collide_world_bounds: bool,
}

/// Live bombs, oldest first.
#[derive(Clone, Debug, Default)]
pub struct HazardSet {
    hazards: VecDeque<HazardId>,
}

impl HazardSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: HazardId) {
        self.hazards.push_back(id);
    }

    /// Move the oldest bomb to the back of the queue and return it, so
    /// it can be reused as the newest.
    pub fn recycle_oldest(&mut self) -> Option<HazardId> {
        let id = self.hazards.pop_front()?;
        self.hazards.push_back(id);
        Some(id)
    }

    pub fn contains(&self, id: HazardId) -> bool {
        self.hazards.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.hazards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hazards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = HazardId> + '_ {
        self.hazards.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::FastRandSource;
    use crate::world::EntityId;

    #[test]
    fn player_on_left_half_spawns_on_right_half() {
        let config = HazardConfig::default();
        assert_eq!(config.spawn_span(100.0), Span::new(400, 800));
        assert_eq!(config.spawn_span(700.0), Span::new(0, 400));
        // The midpoint itself counts as the right half.
        assert_eq!(config.spawn_span(400.0), Span::new(0, 400));
    }

    #[test]
    fn rolled_spawns_respect_every_range() {
        let config = HazardConfig::default();
        let mut rng = FastRandSource::with_seed(3);
        for _ in 0..500 {
            let left = config.roll(100.0, &mut rng);
            assert!((400.0..=800.0).contains(&left.position.x));
            assert_eq!(left.position.y, 16.0);
            assert!((-200.0..=200.0).contains(&left.velocity.x));
            assert_eq!(left.velocity.y, 20.0);
            assert_eq!(left.bounce, 1.0);
            assert!(left.collide_world_bounds);

            let right = config.roll(700.0, &mut rng);
            assert!((0.0..=400.0).contains(&right.position.x));
        }
    }

    #[test]
    fn recycle_rotates_oldest_to_back() {
        let a = HazardId::new(EntityId::from_u32(1));
        let b = HazardId::new(EntityId::from_u32(2));
        let mut set = HazardSet::new();
        set.push(a);
        set.push(b);

        assert_eq!(set.recycle_oldest(), Some(a));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![b, a]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn recycle_on_empty_set_is_none() {
        assert_eq!(HazardSet::new().recycle_oldest(), None);
    }
}
