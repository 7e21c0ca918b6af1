//! Starfall - a small star-catcher platformer core.
//!
//! The player runs and jumps across static platforms collecting falling
//! stars. Clearing every star brings them all back and drops a bouncing
//! bomb; touching a bomb ends the game. Rules live in
//! [`GameStateController`] and talk to the world only through
//! [`SceneEngine`], which [`StarfallScene`] implements on a rapier2d
//! physics world.

pub mod animation;
pub mod collectibles;
pub mod config;
pub mod controller;
pub mod engine;
pub mod entities;
pub mod error;
pub mod hazards;
pub mod hud;
pub mod input;
pub mod math;
pub mod movement;
pub mod physics;
pub mod random;
pub mod scene;
pub mod state;
pub mod world;

#[cfg(test)]
mod testing;

pub use crate::animation::{AnimationKey, Animator};
pub use crate::config::SceneConfig;
pub use crate::controller::{GameStateController, HazardOutcome, PickupOutcome, ScoringConfig};
pub use crate::engine::{FrameClock, SceneEngine};
pub use crate::entities::{EntityKind, HazardId, Pairing, PickupId, Tint};
pub use crate::error::SceneError;
pub use crate::input::{CursorKeys, InputState};
pub use crate::math::{Rect, Vec2};
pub use crate::random::{FastRandSource, RandomSource};
pub use crate::scene::StarfallScene;
pub use crate::state::{GameState, Score};
pub use winit::keyboard::KeyCode;
