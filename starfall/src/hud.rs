use serde::{Deserialize, Serialize};

use crate::{math::Vec2, state::Score};

/// Format the score label shown in the top-left corner.
pub fn score_label(score: Score) -> String {
    format!("Score: {score}")
}

/// Placement and style of the score text, in screen-space pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HudConfig {
    pub position: Vec2, // (0,0) = top-left
    pub font_size: f32,
    pub color: [f32; 4],
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            position: Vec2::new(16.0, 16.0),
            font_size: 32.0,
            color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Text element drawn in screen-space HUD coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct HudText {
    pub text: String,
    pub size: f32,
    pub position: Vec2,
    pub color: [f32; 4],
}

impl HudText {
    /// Score text showing a zero score.
    pub fn score(config: &HudConfig) -> Self {
        Self {
            text: score_label(Score::ZERO),
            size: config.font_size,
            position: config.position,
            color: config.color,
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}
