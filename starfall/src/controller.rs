//! Game-state transitions driven by collision notifications.
//!
//! [`GameStateController`] owns the score, the game-over flag and the
//! active/inactive bookkeeping for stars and bombs. It reacts to exactly
//! two events, each handled synchronously inside one call:
//!
//! - a star overlapping the player ([`GameStateController::on_pickup_collected`])
//! - a bomb hitting the player ([`GameStateController::on_hazard_collision`])
//!
//! Side effects on entities go out through [`SceneEngine`] commands.

use serde::{Deserialize, Serialize};

use crate::animation::AnimationKey;
use crate::collectibles::CollectibleSet;
use crate::engine::SceneEngine;
use crate::entities::{tint_from_rgb, HazardId, PickupId};
use crate::error::{Result, SceneError};
use crate::hazards::{HazardConfig, HazardSet};
use crate::hud::score_label;
use crate::random::{FastRandSource, RandomSource};
use crate::state::{GameState, Score};

/// Scoring and wave-reset rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Points per star.
    pub pickup_value: u32,
    /// Height stars reappear at on a wave reset (top of the play area).
    pub respawn_y: f32,
    /// `0xRRGGBB` tint applied to the player on game over.
    pub game_over_tint: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            pickup_value: 10,
            respawn_y: 0.0,
            game_over_tint: 0xff0000,
        }
    }
}

/// Result of a star notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickupOutcome {
    /// The star was already collected; nothing changed.
    Ignored,
    Collected { score: Score },
    /// The last active star was collected: every star is back and a new
    /// bomb is live.
    WaveReset { score: Score, hazard: HazardId },
}

/// Result of a bomb notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HazardOutcome {
    GameOver,
    /// The game was already over; the notification was a no-op.
    AlreadyOver,
}

pub struct GameStateController<R = FastRandSource> {
    state: GameState,
    pickups: CollectibleSet,
    hazards: HazardSet,
    scoring: ScoringConfig,
    hazard_rules: HazardConfig,
    waves: u32,
    rng: R,
}

impl<R: RandomSource> GameStateController<R> {
    pub fn new(
        pickups: CollectibleSet,
        scoring: ScoringConfig,
        hazard_rules: HazardConfig,
        rng: R,
    ) -> Self {
        Self {
            state: GameState::new(),
            pickups,
            hazards: HazardSet::new(),
            scoring,
            hazard_rules,
            waves: 0,
            rng,
        }
    }

    pub fn score(&self) -> Score {
        self.state.score()
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn pickups(&self) -> &CollectibleSet {
        &self.pickups
    }

    pub fn hazards(&self) -> &HazardSet {
        &self.hazards
    }

    /// Number of wave resets so far.
    pub fn waves(&self) -> u32 {
        self.waves
    }

    /// A star overlapped the player.
    ///
    /// Collects the star, awards points and refreshes the score text. When
    /// that was the last active star, runs a wave reset before returning.
    pub fn on_pickup_collected<E: SceneEngine + ?Sized>(
        &mut self,
        pickup: PickupId,
        engine: &mut E,
    ) -> Result<PickupOutcome> {
        if !self.pickups.is_active(pickup)? {
            log::warn!("Ignoring overlap with already collected {pickup}");
            return Ok(PickupOutcome::Ignored);
        }
        // The star only counts as collected once its body is gone.
        engine.disable_pickup(pickup)?;
        self.pickups.deactivate(pickup)?;

        let score = self.state.award(self.scoring.pickup_value);
        engine.set_score_text(&score_label(score));
        log::debug!("Collected {pickup}, score is now {score}");

        if self.pickups.count_active() > 0 {
            return Ok(PickupOutcome::Collected { score });
        }

        let hazard = self.reset_wave(engine)?;
        Ok(PickupOutcome::WaveReset { score, hazard })
    }

    /// A bomb hit the player. The first hit ends the game; later hits are
    /// no-ops.
    pub fn on_hazard_collision<E: SceneEngine + ?Sized>(
        &mut self,
        hazard: HazardId,
        engine: &mut E,
    ) -> Result<HazardOutcome> {
        if !self.hazards.contains(hazard) {
            return Err(SceneError::UnknownHazard(hazard));
        }
        if !self.state.end() {
            return Ok(HazardOutcome::AlreadyOver);
        }

        engine.pause_world();
        engine.tint_player(tint_from_rgb(self.scoring.game_over_tint));
        engine.play_player_animation(AnimationKey::Turn, false);
        log::info!(
            "Game over: {hazard} hit the player at score {}",
            self.state.score()
        );
        Ok(HazardOutcome::GameOver)
    }

    /// Bring every star back, then add one bomb away from the player.
    fn reset_wave<E: SceneEngine + ?Sized>(&mut self, engine: &mut E) -> Result<HazardId> {
        for (pickup, position) in self.pickups.reactivate_all(self.scoring.respawn_y) {
            engine.enable_pickup(pickup, position)?;
        }

        let player_x = engine.player_position().x;
        let spawn = self.hazard_rules.roll(player_x, &mut self.rng);

        let at_cap = self
            .hazard_rules
            .max_hazards
            .is_some_and(|max| max > 0 && self.hazards.len() >= max);
        let recycled = if at_cap {
            self.hazards.recycle_oldest()
        } else {
            None
        };
        let hazard = match recycled {
            Some(oldest) => {
                engine.respawn_hazard(oldest, &spawn)?;
                oldest
            }
            None => {
                let id = engine.spawn_hazard(&spawn)?;
                self.hazards.push(id);
                id
            }
        };

        self.waves += 1;
        log::info!(
            "Wave {} cleared, {hazard} dropped at x={} ({} bombs live)",
            self.waves,
            spawn.position.x,
            self.hazards.len()
        );
        Ok(hazard)
    }
}
