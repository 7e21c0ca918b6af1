//! Scene layout and tuning, serializable to JSON.
//!
//! Every field has a default reproducing the classic star-catcher level,
//! so a config file only needs to list what it changes.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::collectibles::PickupLayout;
use crate::controller::ScoringConfig;
use crate::hazards::HazardConfig;
use crate::hud::HudConfig;
use crate::math::{Rect, Vec2};
use crate::movement::MovementConfig;

/// Play area and gravity. `+y` points down.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    pub size: Vec2,
    pub gravity: Vec2,
    /// Thickness of the invisible walls around the play area.
    pub bound_thickness: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size: Vec2::new(800.0, 600.0),
            gravity: Vec2::new(0.0, 300.0),
            bound_thickness: 32.0,
        }
    }
}

impl WorldConfig {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.size * 0.5, self.size)
    }
}

/// One static platform: a sprite of `size` at `position`, scaled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub position: Vec2,
    pub size: Vec2,
    #[serde(default = "unit_scale")]
    pub scale: f32,
}

fn unit_scale() -> f32 {
    1.0
}

impl PlatformConfig {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            size: Vec2::new(400.0, 32.0),
            scale: 1.0,
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Body extents after scaling.
    pub fn rect(&self) -> Rect {
        Rect::new(self.position, self.size * self.scale)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub start: Vec2,
    /// One spritesheet frame: 32x48.
    pub size: Vec2,
    pub bounce: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start: Vec2::new(100.0, 450.0),
            size: Vec2::new(32.0, 48.0),
            bounce: 0.2,
        }
    }
}

/// Complete scene description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub world: WorldConfig,
    pub platforms: Vec<PlatformConfig>,
    pub player: PlayerConfig,
    pub pickups: PickupLayout,
    pub hud: HudConfig,
    pub scoring: ScoringConfig,
    pub movement: MovementConfig,
    pub hazards: HazardConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            platforms: vec![
                PlatformConfig::new(400.0, 568.0).with_scale(2.0),
                PlatformConfig::new(600.0, 400.0),
                PlatformConfig::new(50.0, 250.0),
                PlatformConfig::new(750.0, 220.0),
            ],
            player: PlayerConfig::default(),
            pickups: PickupLayout::default(),
            hud: HudConfig::default(),
            scoring: ScoringConfig::default(),
            movement: MovementConfig::default(),
            hazards: HazardConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Serialize this config to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize and validate a config from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save this config to a file.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a config from a file.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read scene config {}: {}", path.display(), e))?;
        Self::from_json(&json)
    }

    /// Reject configs the scene cannot be built from.
    pub fn validate(&self) -> Result<()> {
        if self.world.size.x <= 0.0 || self.world.size.y <= 0.0 {
            return Err(anyhow!("World size must be positive, got {:?}", self.world.size));
        }
        if self.pickups.count == 0 {
            return Err(anyhow!("Scene needs at least one pickup"));
        }
        if self.pickups.bounce.min > self.pickups.bounce.max {
            return Err(anyhow!("Pickup bounce range is inverted: {:?}", self.pickups.bounce));
        }
        let hazards = &self.hazards;
        for (name, span) in [
            ("far_span", hazards.far_span),
            ("near_span", hazards.near_span),
            ("velocity_x", hazards.velocity_x),
        ] {
            if span.min > span.max {
                return Err(anyhow!("Hazard {name} range is inverted: {span:?}"));
            }
        }
        if hazards.max_hazards == Some(0) {
            return Err(anyhow!("max_hazards must be at least 1 when set"));
        }
        Ok(())
    }
}
