//! Test doubles shared by the unit tests.

use std::collections::VecDeque;

use crate::animation::AnimationKey;
use crate::engine::SceneEngine;
use crate::entities::{HazardId, PickupId, Tint};
use crate::error::{Result, SceneError};
use crate::hazards::HazardSpawn;
use crate::math::Vec2;
use crate::random::RandomSource;
use crate::world::EntityId;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    DisablePickup(PickupId),
    EnablePickup(PickupId, Vec2),
    SpawnHazard(HazardSpawn),
    RespawnHazard(HazardId, HazardSpawn),
    SetScoreText(String),
    PauseWorld,
    TintPlayer(Tint),
    PlayAnimation(AnimationKey, bool),
    SetVelocityX(f32),
    SetVelocityY(f32),
}

/// [`SceneEngine`] that records every command and keeps just enough state
/// to answer queries.
#[derive(Debug)]
pub struct RecordingEngine {
    pub commands: Vec<Command>,
    pub player_position: Vec2,
    pub velocity: Vec2,
    pub touching_down: bool,
    /// Make `disable_pickup` fail as if the star had no body.
    pub fail_disable: bool,
    next_hazard: u32,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            player_position: Vec2::new(100.0, 450.0),
            velocity: Vec2::ZERO,
            touching_down: true,
            fail_disable: false,
            next_hazard: 1_000,
        }
    }

    pub fn count(&self, pred: impl Fn(&Command) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }

    pub fn pauses(&self) -> usize {
        self.count(|c| matches!(c, Command::PauseWorld))
    }

    pub fn spawns(&self) -> Vec<HazardSpawn> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::SpawnHazard(spawn) => Some(*spawn),
                _ => None,
            })
            .collect()
    }

    pub fn last_score_text(&self) -> Option<&str> {
        self.commands.iter().rev().find_map(|c| match c {
            Command::SetScoreText(text) => Some(text.as_str()),
            _ => None,
        })
    }
}

impl SceneEngine for RecordingEngine {
    fn disable_pickup(&mut self, pickup: PickupId) -> Result<()> {
        if self.fail_disable {
            return Err(SceneError::MissingBody(pickup.entity()));
        }
        self.commands.push(Command::DisablePickup(pickup));
        Ok(())
    }

    fn enable_pickup(&mut self, pickup: PickupId, position: Vec2) -> Result<()> {
        self.commands.push(Command::EnablePickup(pickup, position));
        Ok(())
    }

    fn spawn_hazard(&mut self, spawn: &HazardSpawn) -> Result<HazardId> {
        self.commands.push(Command::SpawnHazard(*spawn));
        self.next_hazard += 1;
        Ok(HazardId::new(EntityId::from_u32(self.next_hazard)))
    }

    fn respawn_hazard(&mut self, hazard: HazardId, spawn: &HazardSpawn) -> Result<()> {
        self.commands.push(Command::RespawnHazard(hazard, *spawn));
        Ok(())
    }

    fn set_score_text(&mut self, text: &str) {
        self.commands.push(Command::SetScoreText(text.to_owned()));
    }

    fn pause_world(&mut self) {
        self.commands.push(Command::PauseWorld);
    }

    fn tint_player(&mut self, tint: Tint) {
        self.commands.push(Command::TintPlayer(tint));
    }

    fn play_player_animation(&mut self, key: AnimationKey, ignore_if_playing: bool) {
        self.commands.push(Command::PlayAnimation(key, ignore_if_playing));
    }

    fn player_position(&self) -> Vec2 {
        self.player_position
    }

    fn set_player_velocity_x(&mut self, vx: f32) {
        self.velocity.x = vx;
        self.commands.push(Command::SetVelocityX(vx));
    }

    fn set_player_velocity_y(&mut self, vy: f32) {
        self.velocity.y = vy;
        self.commands.push(Command::SetVelocityY(vy));
    }

    fn player_touching_down(&self) -> bool {
        self.touching_down
    }
}

/// [`RandomSource`] that replays queued values and records the ranges it
/// was asked for. With nothing queued it returns the low end of the range.
#[derive(Debug, Default)]
pub struct ScriptedRandom {
    ints: VecDeque<i32>,
    pub int_ranges: Vec<(i32, i32)>,
}

impl ScriptedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ints(values: impl IntoIterator<Item = i32>) -> Self {
        Self {
            ints: values.into_iter().collect(),
            int_ranges: Vec::new(),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn between(&mut self, min: i32, max: i32) -> i32 {
        self.int_ranges.push((min, max));
        self.ints.pop_front().unwrap_or(min).clamp(min, max)
    }

    fn float_between(&mut self, min: f32, _max: f32) -> f32 {
        min
    }
}
