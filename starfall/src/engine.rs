use std::time::Duration;

use crate::animation::AnimationKey;
use crate::entities::{HazardId, PickupId, Tint};
use crate::error::Result;
use crate::hazards::HazardSpawn;
use crate::math::Vec2;

/// Commands and queries the game logic issues to whatever owns the
/// entities, physics bodies and sprites.
///
/// The game logic never touches bodies directly; everything goes through
/// this trait so the rules can run against a real physics world or a
/// recording double.
pub trait SceneEngine {
    /// Remove a star from the simulation and hide it.
    fn disable_pickup(&mut self, pickup: PickupId) -> Result<()>;

    /// Put a star back into the simulation at `position` and show it.
    fn enable_pickup(&mut self, pickup: PickupId, position: Vec2) -> Result<()>;

    /// Create a new bomb.
    fn spawn_hazard(&mut self, spawn: &HazardSpawn) -> Result<HazardId>;

    /// Move an existing bomb as if it had just been spawned.
    fn respawn_hazard(&mut self, hazard: HazardId, spawn: &HazardSpawn) -> Result<()>;

    fn set_score_text(&mut self, text: &str);

    /// Freeze the physics simulation.
    fn pause_world(&mut self);

    fn tint_player(&mut self, tint: Tint);

    fn play_player_animation(&mut self, key: AnimationKey, ignore_if_playing: bool);

    fn player_position(&self) -> Vec2;

    fn set_player_velocity_x(&mut self, vx: f32);

    fn set_player_velocity_y(&mut self, vy: f32);

    /// Whether the player is standing on something below it.
    fn player_touching_down(&self) -> bool;
}

/// Frame timing with a fixed-timestep accumulator for physics.
#[derive(Clone, Debug)]
pub struct FrameClock {
    delta_time: Duration,
    elapsed_time: Duration,
    fixed_delta_time: Duration,
    fixed_time_accumulator: Duration,
}

impl FrameClock {
    pub fn new(fixed_delta_time: Duration) -> Self {
        Self {
            delta_time: Duration::ZERO,
            elapsed_time: Duration::ZERO,
            fixed_delta_time,
            fixed_time_accumulator: Duration::ZERO,
        }
    }

    /// Record the duration of the frame that just elapsed.
    pub fn update_time(&mut self, delta: Duration) {
        self.delta_time = delta;
        self.elapsed_time += delta;
        self.fixed_time_accumulator += delta;
    }

    /// Duration between the current and previous frames.
    pub fn delta_time(&self) -> Duration {
        self.delta_time
    }

    /// Total time elapsed since the clock started.
    pub fn elapsed_time(&self) -> Duration {
        self.elapsed_time
    }

    pub fn fixed_delta_time(&self) -> Duration {
        self.fixed_delta_time
    }

    /// Check if a fixed timestep update should run and consume accumulated time.
    ///
    /// Call this in a loop until it returns `false` to handle multiple fixed updates per frame.
    pub fn should_run_fixed_update(&mut self) -> bool {
        if self.fixed_time_accumulator >= self.fixed_delta_time {
            self.fixed_time_accumulator -= self.fixed_delta_time;
            true
        } else {
            false
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(Duration::from_secs_f64(1.0 / 60.0)) // 60 FPS fixed timestep
    }
}
