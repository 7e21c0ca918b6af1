use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use starfall::{InputState, KeyCode, SceneConfig, StarfallScene, Vec2};

const FRAME: Duration = Duration::from_micros(16_667);
const MAX_FRAMES: u32 = 60 * 90;

/// Chases the closest star and hops when it sits on a higher ledge.
struct AutoPilot {
    input: InputState,
}

impl AutoPilot {
    fn new() -> Self {
        Self {
            input: InputState::new(),
        }
    }

    fn steer(&mut self, scene: &StarfallScene) -> &InputState {
        for key in [KeyCode::ArrowLeft, KeyCode::ArrowRight, KeyCode::ArrowUp] {
            self.input.release(key);
        }

        let player = scene.player_position();
        let target = scene
            .pickup_positions()
            .into_iter()
            .map(|(_, pos)| pos)
            .min_by(|a, b| a.distance(player).total_cmp(&b.distance(player)));

        if let Some(target) = target {
            let dx = target.x - player.x;
            if dx < -4.0 {
                self.input.press(KeyCode::ArrowLeft);
            } else if dx > 4.0 {
                self.input.press(KeyCode::ArrowRight);
            }
            if target.y < player.y - 40.0 {
                self.input.press(KeyCode::ArrowUp);
            }
        }
        &self.input
    }
}

fn load_config() -> Result<SceneConfig> {
    match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => SceneConfig::load_from_file(&path),
        None => Ok(SceneConfig::default()),
    }
}

fn main() -> Result<()> {
    let config = load_config()?;
    let mut scene = StarfallScene::with_seed(config, 7).context("Failed to build scene")?;
    let mut pilot = AutoPilot::new();

    println!("{}", scene.score_text().text);
    let mut last_score = scene.score();
    let mut last_waves = 0;

    for _ in 0..MAX_FRAMES {
        let input = pilot.steer(&scene).clone();
        scene.update(&input, FRAME)?;

        if scene.score() != last_score {
            last_score = scene.score();
            println!(
                "[{:>6.2}s] {} ({} stars left)",
                scene.elapsed().as_secs_f32(),
                scene.score_text().text,
                scene.active_pickups()
            );
        }
        if scene.waves() != last_waves {
            last_waves = scene.waves();
            println!("Wave {} cleared, {} bomb(s) live", last_waves, scene.hazard_count());
        }
        if scene.is_game_over() {
            let Vec2 { x, y } = scene.player_position();
            println!("Hit by a bomb at ({x:.0}, {y:.0})");
            break;
        }
    }

    println!(
        "Final: score {}, waves {}, game over: {}",
        scene.score(),
        scene.waves(),
        scene.is_game_over()
    );
    Ok(())
}
