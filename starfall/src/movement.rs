use serde::{Deserialize, Serialize};

use crate::animation::AnimationKey;
use crate::engine::SceneEngine;
use crate::input::CursorKeys;

/// Player speeds in pixels per second.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovementConfig {
    pub run_speed: f32,
    /// Upward speed given by a jump. Applied as `-jump_speed` on y.
    pub jump_speed: f32,
    /// Ignore input once the game is over.
    pub lock_controls_on_game_over: bool,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            run_speed: 160.0,
            jump_speed: 330.0,
            lock_controls_on_game_over: false,
        }
    }
}

/// What the movement loop did this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub animation: AnimationKey,
    pub jumped: bool,
}

/// Per-frame arrow-key movement.
#[derive(Clone, Debug, Default)]
pub struct PlayerController {
    config: MovementConfig,
}

impl PlayerController {
    pub fn new(config: MovementConfig) -> Self {
        Self { config }
    }

    /// Apply one frame of input.
    ///
    /// Left wins over right when both are held. A jump needs both the up
    /// key and ground contact. Returns `None` when controls are locked.
    pub fn update<E: SceneEngine + ?Sized>(
        &self,
        keys: CursorKeys,
        game_over: bool,
        engine: &mut E,
    ) -> Option<MoveOutcome> {
        if game_over && self.config.lock_controls_on_game_over {
            return None;
        }

        let animation = if keys.left {
            engine.set_player_velocity_x(-self.config.run_speed);
            engine.play_player_animation(AnimationKey::Left, true);
            AnimationKey::Left
        } else if keys.right {
            engine.set_player_velocity_x(self.config.run_speed);
            engine.play_player_animation(AnimationKey::Right, true);
            AnimationKey::Right
        } else {
            engine.set_player_velocity_x(0.0);
            engine.play_player_animation(AnimationKey::Turn, false);
            AnimationKey::Turn
        };

        let jumped = keys.up && engine.player_touching_down();
        if jumped {
            engine.set_player_velocity_y(-self.config.jump_speed);
        }

        Some(MoveOutcome { animation, jumped })
    }
}
