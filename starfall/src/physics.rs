// starfall/src/physics.rs
use std::collections::HashMap;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::math::Vec2;
use crate::world::EntityId;

// Rapier is private implementation detail: do NOT re-export it.
use rapier2d::prelude::*;

/// Engine-facing rigid body type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RigidBodyType {
    Dynamic,
    Fixed,
}

/// Engine-facing collider shape.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum ColliderShape {
    Box { hx: f32, hy: f32 },
}

/// Bit layers deciding which colliders interact. Two colliders interact
/// when each one's `memberships` intersects the other's `filter`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionLayers {
    pub memberships: u32,
    pub filter: u32,
}

impl CollisionLayers {
    pub const fn new(memberships: u32, filter: u32) -> Self {
        Self { memberships, filter }
    }

    fn to_rapier(self) -> InteractionGroups {
        InteractionGroups::new(self.memberships, self.filter)
    }
}

/// Surface properties for a solid collider.
///
/// Restitution combines with `Max`, so a body's bounce is its own
/// property: a bounce of 1 stays 1 against a platform with bounce 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColliderMaterial {
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    /// Emit collision events for contacts involving this collider.
    pub report_contacts: bool,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            density: 1.0,
            friction: 0.0,
            restitution: 0.0,
            report_contacts: false,
        }
    }
}

/// Engine-facing collision event. Uses EntityId only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhysicsEvent {
    CollisionEnter { a: EntityId, b: EntityId },
    CollisionExit { a: EntityId, b: EntityId },
    TriggerEnter { a: EntityId, b: EntityId },
    TriggerExit { a: EntityId, b: EntityId },
}

pub struct PhysicsWorld {
    // --- rapier internals ---
    pipeline: PhysicsPipeline,
    integration_parameters: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: BroadPhase,
    narrow_phase: NarrowPhase,
    rigid_bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,

    // Event channels
    event_recv_collision: crossbeam_channel::Receiver<CollisionEvent>,
    event_recv_contact_force: crossbeam_channel::Receiver<ContactForceEvent>,
    event_handler: ChannelEventCollector,

    // --- mappings (engine <-> rapier) ---
    entity_to_body: HashMap<EntityId, RigidBodyHandle>,
    body_to_entity: HashMap<RigidBodyHandle, EntityId>,
    entity_colliders: HashMap<EntityId, Vec<ColliderHandle>>,

    gravity: Vec2,

    // Collected engine-facing events for the frame
    pending_events: Vec<PhysicsEvent>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        let (send_col, recv_col) = crossbeam_channel::unbounded();
        let (send_force, recv_force) = crossbeam_channel::unbounded();
        let event_handler = ChannelEventCollector::new(send_col, send_force);

        Self {
            pipeline: PhysicsPipeline::new(),
            integration_parameters: IntegrationParameters::default(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),

            event_recv_collision: recv_col,
            event_recv_contact_force: recv_force,
            event_handler,

            entity_to_body: HashMap::new(),
            body_to_entity: HashMap::new(),
            entity_colliders: HashMap::new(),

            gravity: Vec2::ZERO,
            pending_events: Vec::new(),
        }
    }

    pub fn with_gravity(gravity: Vec2) -> Self {
        let mut w = Self::new();
        w.gravity = gravity;
        w
    }

    /// Create/replace a body for an entity, starting at `velocity`.
    ///
    /// Dynamic bodies never rotate: everything in the scene is an upright
    /// sprite.
    pub fn create_body(
        &mut self,
        entity: EntityId,
        body_type: RigidBodyType,
        position: Vec2,
        velocity: Vec2,
    ) -> Result<()> {
        // Remove existing body if any (keeps invariant 1 body per entity).
        self.remove_body(entity);

        let body = match body_type {
            RigidBodyType::Dynamic => RigidBodyBuilder::new(rapier2d::prelude::RigidBodyType::Dynamic)
                .translation(vector![position.x, position.y])
                .linvel(vector![velocity.x, velocity.y])
                .lock_rotations()
                // Prevent tunneling through thin platforms
                .ccd_enabled(true)
                .build(),
            RigidBodyType::Fixed => RigidBodyBuilder::new(rapier2d::prelude::RigidBodyType::Fixed)
                .translation(vector![position.x, position.y])
                .build(),
        };

        let handle = self.rigid_bodies.insert(body);
        self.entity_to_body.insert(entity, handle);
        self.body_to_entity.insert(handle, entity);
        Ok(())
    }

    /// Remove a body (and its colliders) for an entity. Returns whether one existed.
    pub fn remove_body(&mut self, entity: EntityId) -> bool {
        self.entity_colliders.remove(&entity);
        if let Some(handle) = self.entity_to_body.remove(&entity) {
            self.rigid_bodies.remove(
                handle,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            );
            self.body_to_entity.remove(&handle);
            true
        } else {
            false
        }
    }

    /// Add a solid collider.
    pub fn add_collider(
        &mut self,
        entity: EntityId,
        shape: ColliderShape,
        material: ColliderMaterial,
        layers: CollisionLayers,
    ) -> Result<()> {
        let body = self.body_handle(entity)?;

        let events = if material.report_contacts {
            ActiveEvents::COLLISION_EVENTS
        } else {
            ActiveEvents::empty()
        };
        let collider = ColliderBuilder::new(to_rapier_shape(shape))
            .density(material.density)
            .friction(material.friction)
            .restitution(material.restitution)
            .restitution_combine_rule(CoefficientCombineRule::Max)
            .collision_groups(layers.to_rapier())
            .active_events(events)
            .sensor(false)
            .build();

        let handle = self
            .colliders
            .insert_with_parent(collider, body, &mut self.rigid_bodies);
        self.entity_colliders.entry(entity).or_default().push(handle);

        Ok(())
    }

    /// Add a sensor (trigger volume). Overlaps report `TriggerEnter`/`TriggerExit`.
    pub fn add_sensor(
        &mut self,
        entity: EntityId,
        shape: ColliderShape,
        layers: CollisionLayers,
    ) -> Result<()> {
        let body = self.body_handle(entity)?;

        let collider = ColliderBuilder::new(to_rapier_shape(shape))
            .density(0.0)
            .sensor(true)
            .collision_groups(layers.to_rapier())
            // ensure we get collision events for sensors:
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();

        let handle = self
            .colliders
            .insert_with_parent(collider, body, &mut self.rigid_bodies);
        self.entity_colliders.entry(entity).or_default().push(handle);

        Ok(())
    }

    /// Step simulation by fixed dt (seconds).
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;

        let gravity = vector![self.gravity.x, self.gravity.y];
        let hooks = &();

        self.pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            hooks,
            &self.event_handler,
        );

        self.query_pipeline
            .update(&self.island_manager, &self.rigid_bodies, &self.colliders);

        self.collect_events();
    }

    /// Drain physics events collected since last step.
    pub fn drain_events(&mut self) -> Vec<PhysicsEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ------------------------------
    // Per-entity body queries/actions
    // ------------------------------

    pub fn body_position(&self, entity: EntityId) -> Option<Vec2> {
        let h = *self.entity_to_body.get(&entity)?;
        let b = self.rigid_bodies.get(h)?;
        let t = b.translation();
        Some(Vec2::new(t.x, t.y))
    }

    pub fn set_body_position(&mut self, entity: EntityId, pos: Vec2) {
        if let Some(h) = self.entity_to_body.get(&entity).copied() {
            if let Some(b) = self.rigid_bodies.get_mut(h) {
                b.set_translation(vector![pos.x, pos.y], true);
            }
        }
    }

    pub fn set_linear_velocity(&mut self, entity: EntityId, vel: Vec2) {
        if let Some(h) = self.entity_to_body.get(&entity).copied() {
            if let Some(b) = self.rigid_bodies.get_mut(h) {
                b.set_linvel(vector![vel.x, vel.y], true);
            }
        }
    }

    /// Get linear velocity for an entity's body.
    pub fn linear_velocity(&self, entity: EntityId) -> Option<Vec2> {
        let h = *self.entity_to_body.get(&entity)?;
        let b = self.rigid_bodies.get(h)?;
        let v = b.linvel();
        Some(Vec2::new(v.x, v.y))
    }

    /// Return true if an entity currently has a physics body.
    pub fn has_body(&self, entity: EntityId) -> bool {
        self.entity_to_body.contains_key(&entity)
    }

    /// Whether any collider of `a` is in active solid contact with any
    /// collider of `b`.
    pub fn in_contact(&self, a: EntityId, b: EntityId) -> bool {
        let (Some(ca), Some(cb)) = (self.entity_colliders.get(&a), self.entity_colliders.get(&b))
        else {
            return false;
        };

        ca.iter().any(|&h1| {
            cb.iter().any(|&h2| {
                self.narrow_phase
                    .contact_pair(h1, h2)
                    .or_else(|| self.narrow_phase.contact_pair(h2, h1))
                    .map(|pair| pair.has_any_active_contact)
                    .unwrap_or(false)
            })
        })
    }

    // ------------------------------
    // Private helpers
    // ------------------------------

    fn body_handle(&self, entity: EntityId) -> Result<RigidBodyHandle> {
        self.entity_to_body
            .get(&entity)
            .copied()
            .ok_or_else(|| anyhow!("Entity {:?} has no physics body", entity))
    }

    fn collect_events(&mut self) {
        while let Ok(ev) = self.event_recv_collision.try_recv() {
            match ev {
                CollisionEvent::Started(c1, c2, _) => {
                    if let Some((a, b, is_trigger)) = self.map_pair(c1, c2) {
                        let e = if is_trigger {
                            PhysicsEvent::TriggerEnter { a, b }
                        } else {
                            PhysicsEvent::CollisionEnter { a, b }
                        };
                        self.pending_events.push(e);
                    }
                }
                CollisionEvent::Stopped(c1, c2, _) => {
                    if let Some((a, b, is_trigger)) = self.map_pair(c1, c2) {
                        let e = if is_trigger {
                            PhysicsEvent::TriggerExit { a, b }
                        } else {
                            PhysicsEvent::CollisionExit { a, b }
                        };
                        self.pending_events.push(e);
                    }
                }
            }
        }

        // Contact forces are not used by the scene; keep the channel empty.
        while self.event_recv_contact_force.try_recv().is_ok() {}
    }

    fn map_pair(
        &self,
        c1: ColliderHandle,
        c2: ColliderHandle,
    ) -> Option<(EntityId, EntityId, bool)> {
        let col1 = self.colliders.get(c1)?;
        let col2 = self.colliders.get(c2)?;
        let b1 = col1.parent()?;
        let b2 = col2.parent()?;
        let e1 = *self.body_to_entity.get(&b1)?;
        let e2 = *self.body_to_entity.get(&b2)?;

        // sensor if either collider is a sensor
        let is_trigger = col1.is_sensor() || col2.is_sensor();
        Some((e1, e2, is_trigger))
    }
}

fn to_rapier_shape(s: ColliderShape) -> SharedShape {
    match s {
        ColliderShape::Box { hx, hy } => SharedShape::cuboid(hx, hy),
    }
}
