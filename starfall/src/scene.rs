//! The star-catcher scene on top of [`PhysicsWorld`].
//!
//! [`StarfallScene`] builds the level from a [`SceneConfig`], runs the
//! movement loop and the fixed-step simulation every frame, and turns
//! physics events into the typed notifications [`GameStateController`]
//! handles. [`SceneWorld`] is the engine side: it implements
//! [`SceneEngine`] over bodies, the score text and the player sprite state.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::animation::{AnimationKey, Animator};
use crate::collectibles::CollectibleSet;
use crate::config::SceneConfig;
use crate::controller::{GameStateController, HazardOutcome, PickupOutcome};
use crate::engine::{FrameClock, SceneEngine};
use crate::entities::{EntityKind, HazardId, Pairing, PickupId, Tint, NO_TINT};
use crate::error::SceneError;
use crate::hazards::HazardSpawn;
use crate::hud::HudText;
use crate::input::{CursorKeys, InputState};
use crate::math::{Rect, Vec2};
use crate::movement::{MoveOutcome, PlayerController};
use crate::physics::{
    ColliderMaterial, ColliderShape, CollisionLayers, PhysicsEvent, PhysicsWorld, RigidBodyType,
};
use crate::random::{FastRandSource, RandomSource};
use crate::state::Score;
use crate::world::{EntityId, World};

/// Collision layer bits.
pub mod layers {
    pub const PLAYER: u32 = 1 << 0;
    pub const PLATFORM: u32 = 1 << 1;
    pub const BOUND: u32 = 1 << 2;
    pub const PICKUP: u32 = 1 << 3;
    pub const PICKUP_SENSOR: u32 = 1 << 4;
    pub const HAZARD: u32 = 1 << 5;
}

fn box_shape(size: Vec2) -> ColliderShape {
    let half = size * 0.5;
    ColliderShape::Box {
        hx: half.x,
        hy: half.y,
    }
}

/// Engine-side state of the scene: bodies, entity kinds and visuals.
pub struct SceneWorld {
    physics: PhysicsWorld,
    entities: World,
    player: EntityId,
    platforms: Vec<(EntityId, Rect)>,
    pickup_bounce: HashMap<PickupId, f32>,
    pickup_size: Vec2,
    hazard_size: Vec2,
    score_text: HudText,
    player_tint: Tint,
    animator: Animator,
    paused: bool,
}

impl SceneWorld {
    fn build(config: &SceneConfig) -> Result<Self> {
        let mut physics = PhysicsWorld::with_gravity(config.world.gravity);
        let mut entities = World::new();

        for wall in bound_walls(config.world.bounds(), config.world.bound_thickness) {
            let entity = entities.spawn(EntityKind::WorldBound);
            physics.create_body(entity, RigidBodyType::Fixed, wall.center, Vec2::ZERO)?;
            physics.add_collider(
                entity,
                box_shape(wall.size),
                ColliderMaterial::default(),
                CollisionLayers::new(layers::BOUND, layers::PLAYER | layers::HAZARD),
            )?;
        }

        let mut platforms = Vec::with_capacity(config.platforms.len());
        for platform in &config.platforms {
            let rect = platform.rect();
            let entity = entities.spawn(EntityKind::Platform);
            physics.create_body(entity, RigidBodyType::Fixed, rect.center, Vec2::ZERO)?;
            physics.add_collider(
                entity,
                box_shape(rect.size),
                ColliderMaterial::default(),
                CollisionLayers::new(layers::PLATFORM, u32::MAX),
            )?;
            platforms.push((entity, rect));
        }

        let player = entities.spawn(EntityKind::Player);
        physics.create_body(player, RigidBodyType::Dynamic, config.player.start, Vec2::ZERO)?;
        physics.add_collider(
            player,
            box_shape(config.player.size),
            ColliderMaterial {
                restitution: config.player.bounce,
                report_contacts: true,
                ..ColliderMaterial::default()
            },
            CollisionLayers::new(
                layers::PLAYER,
                layers::PLATFORM | layers::BOUND | layers::HAZARD | layers::PICKUP_SENSOR,
            ),
        )?;

        Ok(Self {
            physics,
            entities,
            player,
            platforms,
            pickup_bounce: HashMap::new(),
            pickup_size: config.pickups.size,
            hazard_size: config.hazards.size,
            score_text: HudText::score(&config.hud),
            player_tint: NO_TINT,
            animator: Animator::default(),
            paused: false,
        })
    }

    fn add_pickup(&mut self, position: Vec2, bounce: f32) -> Result<PickupId> {
        let pickup = PickupId::new(self.entities.spawn(EntityKind::Pickup));
        self.pickup_bounce.insert(pickup, bounce);
        self.create_pickup_body(pickup, position, bounce)?;
        Ok(pickup)
    }

    /// A star is a solid box that only lands on platforms, plus a sensor
    /// of the same size that only the player sees.
    fn create_pickup_body(&mut self, pickup: PickupId, position: Vec2, bounce: f32) -> Result<()> {
        let entity = pickup.entity();
        self.physics
            .create_body(entity, RigidBodyType::Dynamic, position, Vec2::ZERO)?;
        self.physics.add_collider(
            entity,
            box_shape(self.pickup_size),
            ColliderMaterial {
                restitution: bounce,
                ..ColliderMaterial::default()
            },
            CollisionLayers::new(layers::PICKUP, layers::PLATFORM),
        )?;
        self.physics.add_sensor(
            entity,
            box_shape(self.pickup_size),
            CollisionLayers::new(layers::PICKUP_SENSOR, layers::PLAYER),
        )?;
        Ok(())
    }

    fn create_hazard_body(&mut self, entity: EntityId, spawn: &HazardSpawn) -> Result<()> {
        let mut filter = layers::PLATFORM | layers::PLAYER;
        if spawn.collide_world_bounds {
            filter |= layers::BOUND;
        }
        self.physics
            .create_body(entity, RigidBodyType::Dynamic, spawn.position, spawn.velocity)?;
        self.physics.add_collider(
            entity,
            box_shape(self.hazard_size),
            ColliderMaterial {
                restitution: spawn.bounce,
                report_contacts: true,
                ..ColliderMaterial::default()
            },
            CollisionLayers::new(layers::HAZARD, filter),
        )?;
        Ok(())
    }

    /// Drop whatever part of a body was built before `source` failed.
    fn discard_body(&mut self, entity: EntityId, source: anyhow::Error) -> SceneError {
        self.physics.remove_body(entity);
        log::warn!("Discarding body of {entity}: {source:#}");
        SceneError::PhysicsSetup {
            entity,
            source: source.into(),
        }
    }

    /// A bomb that never got a body is forgotten entirely.
    fn discard_hazard(&mut self, entity: EntityId, source: anyhow::Error) -> SceneError {
        self.entities.despawn(entity);
        self.discard_body(entity, source)
    }

    /// The non-player entity of a pair, if the player is part of it.
    fn other_than_player(&self, a: EntityId, b: EntityId) -> Option<EntityId> {
        if a == self.player {
            Some(b)
        } else if b == self.player {
            Some(a)
        } else {
            None
        }
    }
}

impl SceneEngine for SceneWorld {
    fn disable_pickup(&mut self, pickup: PickupId) -> crate::error::Result<()> {
        if self.physics.remove_body(pickup.entity()) {
            Ok(())
        } else {
            Err(SceneError::MissingBody(pickup.entity()))
        }
    }

    fn enable_pickup(&mut self, pickup: PickupId, position: Vec2) -> crate::error::Result<()> {
        let bounce = *self
            .pickup_bounce
            .get(&pickup)
            .ok_or(SceneError::UnknownPickup(pickup))?;
        self.create_pickup_body(pickup, position, bounce)
            .map_err(|source| self.discard_body(pickup.entity(), source))
    }

    fn spawn_hazard(&mut self, spawn: &HazardSpawn) -> crate::error::Result<HazardId> {
        let entity = self.entities.spawn(EntityKind::Hazard);
        if let Err(source) = self.create_hazard_body(entity, spawn) {
            return Err(self.discard_hazard(entity, source));
        }
        log::debug!("Spawned hazard {entity} at {:?}", spawn.position);
        Ok(HazardId::new(entity))
    }

    fn respawn_hazard(&mut self, hazard: HazardId, spawn: &HazardSpawn) -> crate::error::Result<()> {
        let entity = hazard.entity();
        if !self.physics.has_body(entity) {
            return Err(SceneError::MissingBody(entity));
        }
        self.physics.set_body_position(entity, spawn.position);
        self.physics.set_linear_velocity(entity, spawn.velocity);
        Ok(())
    }

    fn set_score_text(&mut self, text: &str) {
        self.score_text.set_text(text);
    }

    fn pause_world(&mut self) {
        self.paused = true;
    }

    fn tint_player(&mut self, tint: Tint) {
        self.player_tint = tint;
    }

    fn play_player_animation(&mut self, key: AnimationKey, ignore_if_playing: bool) {
        self.animator.play(key, ignore_if_playing);
    }

    fn player_position(&self) -> Vec2 {
        self.physics.body_position(self.player).unwrap_or_default()
    }

    fn set_player_velocity_x(&mut self, vx: f32) {
        let v = self.physics.linear_velocity(self.player).unwrap_or_default();
        self.physics.set_linear_velocity(self.player, Vec2::new(vx, v.y));
    }

    fn set_player_velocity_y(&mut self, vy: f32) {
        let v = self.physics.linear_velocity(self.player).unwrap_or_default();
        self.physics.set_linear_velocity(self.player, Vec2::new(v.x, vy));
    }

    fn player_touching_down(&self) -> bool {
        let Some(pos) = self.physics.body_position(self.player) else {
            return false;
        };
        self.platforms
            .iter()
            .any(|(platform, rect)| pos.y < rect.top() && self.physics.in_contact(self.player, *platform))
    }
}

/// Four walls just outside `bounds`.
fn bound_walls(bounds: Rect, thickness: f32) -> [Rect; 4] {
    let (w, h, t) = (bounds.size.x, bounds.size.y, thickness);
    [
        Rect::new(Vec2::new(bounds.left() - t * 0.5, bounds.center.y), Vec2::new(t, h + 2.0 * t)),
        Rect::new(Vec2::new(bounds.right() + t * 0.5, bounds.center.y), Vec2::new(t, h + 2.0 * t)),
        Rect::new(Vec2::new(bounds.center.x, bounds.top() - t * 0.5), Vec2::new(w + 2.0 * t, t)),
        Rect::new(Vec2::new(bounds.center.x, bounds.bottom() + t * 0.5), Vec2::new(w + 2.0 * t, t)),
    ]
}

/// One playable instance of the level.
pub struct StarfallScene<R = FastRandSource> {
    world: SceneWorld,
    controller: GameStateController<R>,
    movement: PlayerController,
    clock: FrameClock,
}

impl StarfallScene<FastRandSource> {
    /// Build the scene with a randomly seeded generator.
    pub fn new(config: SceneConfig) -> Result<Self> {
        Self::with_rng(config, FastRandSource::new())
    }

    /// Build the scene with a deterministic generator.
    pub fn with_seed(config: SceneConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, FastRandSource::with_seed(seed))
    }
}

impl<R: RandomSource> StarfallScene<R> {
    pub fn with_rng(config: SceneConfig, mut rng: R) -> Result<Self> {
        config.validate()?;
        let mut world = SceneWorld::build(&config).context("Failed to build scene world")?;

        let mut pickups = CollectibleSet::new();
        for position in config.pickups.positions() {
            let bounce = rng.float_between(config.pickups.bounce.min, config.pickups.bounce.max);
            let pickup = world.add_pickup(position, bounce)?;
            pickups.insert(pickup, position.x);
        }

        log::info!(
            "Scene ready: {} platforms, {} pickups",
            config.platforms.len(),
            pickups.len()
        );

        Ok(Self {
            world,
            controller: GameStateController::new(
                pickups,
                config.scoring.clone(),
                config.hazards.clone(),
                rng,
            ),
            movement: PlayerController::new(config.movement.clone()),
            clock: FrameClock::default(),
        })
    }

    /// Advance one frame: read input, step physics, dispatch collisions.
    ///
    /// Fails only when collision routing hits an entity the pairing does
    /// not allow, which means the scene wiring is broken.
    pub fn update(&mut self, input: &InputState, delta: Duration) -> Result<()> {
        let keys = CursorKeys::read(input);
        let moved = self
            .movement
            .update(keys, self.controller.is_game_over(), &mut self.world);
        if let Some(MoveOutcome { jumped: true, .. }) = moved {
            log::debug!("Player jumped from {:?}", self.world.player_position());
        }

        self.clock.update_time(delta);
        while self.clock.should_run_fixed_update() {
            if self.world.paused {
                continue;
            }
            let dt = self.clock.fixed_delta_time().as_secs_f32();
            self.world.physics.step(dt);
            for event in self.world.physics.drain_events() {
                self.route(event)?;
            }
        }

        self.world
            .animator
            .update(self.clock.delta_time().as_secs_f32());
        Ok(())
    }

    /// Narrow an untyped physics event to a typed notification.
    pub(crate) fn route(&mut self, event: PhysicsEvent) -> crate::error::Result<()> {
        let (pairing, a, b) = match event {
            PhysicsEvent::TriggerEnter { a, b } => (Pairing::PlayerPickup, a, b),
            PhysicsEvent::CollisionEnter { a, b } => (Pairing::PlayerHazard, a, b),
            PhysicsEvent::TriggerExit { .. } | PhysicsEvent::CollisionExit { .. } => return Ok(()),
        };
        let Some(other) = self.world.other_than_player(a, b) else {
            return Ok(());
        };
        let found = self
            .world
            .entities
            .kind(other)
            .ok_or(SceneError::UnregisteredEntity {
                pairing,
                entity: other,
            })?;

        match (pairing, found) {
            (Pairing::PlayerPickup, EntityKind::Pickup) => {
                let outcome = self
                    .controller
                    .on_pickup_collected(PickupId::new(other), &mut self.world)?;
                if let PickupOutcome::WaveReset { hazard, .. } = outcome {
                    log::debug!("Wave reset dropped {hazard}");
                }
            }
            (Pairing::PlayerHazard, EntityKind::Hazard) => {
                let outcome = self
                    .controller
                    .on_hazard_collision(HazardId::new(other), &mut self.world)?;
                if outcome == HazardOutcome::AlreadyOver {
                    log::debug!("Ignoring hit from {other} after game over");
                }
            }
            // The player lands on level geometry all the time; no callback.
            (Pairing::PlayerHazard, EntityKind::Platform | EntityKind::WorldBound) => {}
            (pairing, found) => {
                return Err(SceneError::UnexpectedEntity {
                    pairing,
                    entity: other,
                    found,
                })
            }
        }
        Ok(())
    }

    /// Move the player and stop it, bypassing input.
    pub fn place_player(&mut self, position: Vec2) {
        let player = self.world.player;
        self.world.physics.set_body_position(player, position);
        self.world.physics.set_linear_velocity(player, Vec2::ZERO);
    }

    pub fn score(&self) -> Score {
        self.controller.score()
    }

    pub fn is_game_over(&self) -> bool {
        self.controller.is_game_over()
    }

    pub fn is_paused(&self) -> bool {
        self.world.paused
    }

    pub fn waves(&self) -> u32 {
        self.controller.waves()
    }

    pub fn score_text(&self) -> &HudText {
        &self.world.score_text
    }

    pub fn pickup_count(&self) -> usize {
        self.controller.pickups().len()
    }

    pub fn active_pickups(&self) -> usize {
        self.controller.pickups().count_active()
    }

    /// Active stars and where they are now.
    pub fn pickup_positions(&self) -> Vec<(PickupId, Vec2)> {
        self.controller
            .pickups()
            .ids()
            .filter_map(|id| {
                let pos = self.world.physics.body_position(id.entity())?;
                Some((id, pos))
            })
            .collect()
    }

    pub fn hazard_count(&self) -> usize {
        self.controller.hazards().len()
    }

    pub fn hazard_positions(&self) -> Vec<(HazardId, Vec2)> {
        self.controller
            .hazards()
            .iter()
            .filter_map(|id| Some((id, self.world.physics.body_position(id.entity())?)))
            .collect()
    }

    pub fn hazard_velocity(&self, hazard: HazardId) -> Option<Vec2> {
        self.world.physics.linear_velocity(hazard.entity())
    }

    pub fn player_position(&self) -> Vec2 {
        self.world.player_position()
    }

    pub fn player_velocity(&self) -> Vec2 {
        self.world
            .physics
            .linear_velocity(self.world.player)
            .unwrap_or_default()
    }

    pub fn player_on_ground(&self) -> bool {
        self.world.player_touching_down()
    }

    pub fn player_tint(&self) -> Tint {
        self.world.player_tint
    }

    pub fn player_animation(&self) -> Option<AnimationKey> {
        self.world.animator.current_key()
    }

    /// Spritesheet frame the player sprite shows.
    pub fn player_frame(&self) -> Option<u32> {
        self.world.animator.current_frame()
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed_time()
    }
}
