use std::collections::VecDeque;
use std::time::Duration;

use starfall::{
    AnimationKey, InputState, KeyCode, RandomSource, SceneConfig, StarfallScene, Vec2,
};

const FRAME: Duration = Duration::from_micros(16_667);

/// Always answers the low end of a range.
struct LowEnd;

impl RandomSource for LowEnd {
    fn between(&mut self, min: i32, _max: i32) -> i32 {
        min
    }

    fn float_between(&mut self, min: f32, _max: f32) -> f32 {
        min
    }
}

/// Replays queued integers, then falls back to the low end.
struct Queued(VecDeque<i32>);

impl RandomSource for Queued {
    fn between(&mut self, min: i32, max: i32) -> i32 {
        self.0.pop_front().unwrap_or(min).clamp(min, max)
    }

    fn float_between(&mut self, min: f32, _max: f32) -> f32 {
        min
    }
}

fn scene() -> StarfallScene<LowEnd> {
    StarfallScene::with_rng(SceneConfig::default(), LowEnd).unwrap()
}

fn run<R: RandomSource>(scene: &mut StarfallScene<R>, input: &InputState, frames: u32) {
    for _ in 0..frames {
        scene.update(input, FRAME).unwrap();
    }
}

/// Drop the player just above each star in turn until a wave resets.
fn clear_wave<R: RandomSource>(scene: &mut StarfallScene<R>, descending_x: bool) {
    let idle = InputState::new();
    for _ in 0..200 {
        let mut stars = scene.pickup_positions();
        stars.sort_by(|a, b| a.1.x.total_cmp(&b.1.x));
        if descending_x {
            stars.reverse();
        }
        assert!(!scene.is_game_over(), "bomb hit the player mid-wave");
        let Some(&(_, star)) = stars.first() else {
            break;
        };
        scene.place_player(Vec2::new(star.x, star.y - 20.0));
        let waves = scene.waves();
        for _ in 0..5 {
            scene.update(&idle, FRAME).unwrap();
            if scene.waves() != waves {
                return;
            }
        }
    }
    panic!("wave never reset, score {}", scene.score());
}

#[test]
fn fresh_scene_shows_zero_score_and_twelve_stars() {
    let scene = scene();
    assert_eq!(scene.score_text().text, "Score: 0");
    assert_eq!(scene.pickup_count(), 12);
    assert_eq!(scene.active_pickups(), 12);
    assert_eq!(scene.hazard_count(), 0);
    assert!(!scene.is_game_over());
    assert!(!scene.is_paused());

    let xs: Vec<f32> = scene.pickup_positions().iter().map(|(_, p)| p.x).collect();
    assert_eq!(xs, (0..12).map(|i| 12.0 + 70.0 * i as f32).collect::<Vec<_>>());
}

#[test]
fn stars_and_player_come_to_rest_in_the_level() {
    let mut scene = scene();
    run(&mut scene, &InputState::new(), 180);

    assert_eq!(scene.active_pickups(), 12);
    for (id, pos) in scene.pickup_positions() {
        assert!(pos.y > 0.0 && pos.y < 600.0, "{id} fell out at {pos:?}");
    }
    let player = scene.player_position();
    assert!((player.y - 512.0).abs() < 4.0, "player at {player:?}");
    assert!(scene.player_on_ground());
    assert_eq!(scene.score().value(), 0);
}

#[test]
fn arrow_keys_run_and_turn() {
    let mut scene = scene();
    run(&mut scene, &InputState::new(), 120);
    let start = scene.player_position();

    let mut input = InputState::new();
    input.press(KeyCode::ArrowRight);
    run(&mut scene, &input, 30);
    assert!(scene.player_position().x > start.x + 40.0);
    assert_eq!(scene.player_animation(), Some(AnimationKey::Right));
    assert!((scene.player_velocity().x - 160.0).abs() < 1.0);

    input.release(KeyCode::ArrowRight);
    run(&mut scene, &input, 1);
    assert_eq!(scene.player_animation(), Some(AnimationKey::Turn));
    assert_eq!(scene.player_frame(), Some(4));
    assert_eq!(scene.player_velocity().x, 0.0);
}

#[test]
fn jump_only_leaves_the_ground() {
    let mut scene = scene();
    run(&mut scene, &InputState::new(), 120);
    assert!(scene.player_on_ground());

    let mut input = InputState::new();
    input.press(KeyCode::ArrowUp);
    run(&mut scene, &input, 1);
    assert!(scene.player_velocity().y < -300.0);

    run(&mut scene, &input, 10);
    assert!(!scene.player_on_ground());
    // Still rising or just past the apex; holding up in the air adds nothing.
    assert!(scene.player_velocity().y > -330.0);
}

#[test]
fn overlapping_a_star_collects_it() {
    let mut scene = scene();
    run(&mut scene, &InputState::new(), 120);

    let (_, star) = scene.pickup_positions()[3];
    scene.place_player(Vec2::new(star.x, star.y - 20.0));
    run(&mut scene, &InputState::new(), 5);

    assert_eq!(scene.score().value(), 10);
    assert_eq!(scene.active_pickups(), 11);
    assert_eq!(scene.score_text().text, "Score: 10");
}

#[test]
fn clearing_every_star_starts_a_new_wave_with_one_bomb() {
    let mut scene = scene();
    run(&mut scene, &InputState::new(), 120);
    clear_wave(&mut scene, true);

    assert_eq!(scene.waves(), 1);
    assert_eq!(scene.score().value(), 120);
    assert_eq!(scene.score_text().text, "Score: 120");
    assert_eq!(scene.active_pickups(), 12);
    assert_eq!(scene.hazard_count(), 1);
    for (_, pos) in scene.pickup_positions() {
        assert!(pos.y < 60.0, "star not respawned at the top: {pos:?}");
    }
}

#[test]
fn bomb_drops_on_the_far_half_from_a_left_side_player() {
    let mut scene = scene();
    run(&mut scene, &InputState::new(), 120);
    // Last star collected is the leftmost one.
    clear_wave(&mut scene, true);

    let (_, bomb) = scene.hazard_positions()[0];
    assert!(bomb.x > 350.0, "bomb at {bomb:?}");
    assert!(bomb.y < 60.0);
}

#[test]
fn bomb_drops_on_the_near_half_from_a_right_side_player() {
    let mut scene = scene();
    run(&mut scene, &InputState::new(), 120);
    clear_wave(&mut scene, false);

    let (_, bomb) = scene.hazard_positions()[0];
    assert!(bomb.x < 50.0, "bomb at {bomb:?}");
}

#[test]
fn capped_bombs_are_recycled_to_the_new_spawn() {
    let mut config = SceneConfig::default();
    config.hazards.max_hazards = Some(1);
    // Wave 1: x=467, between two star columns, with no sideways drift.
    // Wave 2: x=40 heading right.
    let rng = Queued(VecDeque::from([467, 0, 40, 150]));
    let mut scene = StarfallScene::with_rng(config, rng).unwrap();
    run(&mut scene, &InputState::new(), 120);

    clear_wave(&mut scene, true);
    let bombs = scene.hazard_positions();
    let [(bomb, first)] = bombs[..] else {
        panic!("expected one bomb after the first wave");
    };
    assert!((first.x - 467.0).abs() < 1.0, "first bomb at {first:?}");
    assert!(scene.hazard_velocity(bomb).unwrap().x.abs() < 1e-3);

    run(&mut scene, &InputState::new(), 120);
    clear_wave(&mut scene, false);

    assert_eq!(scene.waves(), 2);
    assert_eq!(scene.hazard_count(), 1);
    let bombs = scene.hazard_positions();
    let [(recycled, moved)] = bombs[..] else {
        panic!("expected the cap to hold at one bomb");
    };
    assert_eq!(recycled, bomb);
    assert!(moved.x > 35.0 && moved.x < 60.0, "recycled bomb at {moved:?}");
    assert!(moved.y < 60.0, "recycled bomb at {moved:?}");
    let velocity = scene.hazard_velocity(bomb).unwrap();
    assert!((velocity.x - 150.0).abs() < 1.0, "recycled bomb moving {velocity:?}");
}

#[test]
fn touching_the_bomb_ends_and_freezes_the_game() {
    let mut scene = scene();
    run(&mut scene, &InputState::new(), 120);
    clear_wave(&mut scene, true);

    let (_, bomb) = scene.hazard_positions()[0];
    scene.place_player(bomb);
    for _ in 0..10 {
        scene.update(&InputState::new(), FRAME).unwrap();
        if scene.is_game_over() {
            break;
        }
    }

    assert!(scene.is_game_over());
    assert!(scene.is_paused());
    assert_eq!(scene.player_tint(), [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(scene.player_animation(), Some(AnimationKey::Turn));

    let bombs = scene.hazard_positions();
    let player = scene.player_position();
    let score = scene.score();
    let mut input = InputState::new();
    input.press(KeyCode::ArrowRight);
    run(&mut scene, &input, 30);

    assert_eq!(scene.hazard_positions(), bombs);
    assert_eq!(scene.player_position(), player);
    assert_eq!(scene.score(), score);
    // Controls stay live by default; only the sprite reacts while paused.
    assert_eq!(scene.player_animation(), Some(AnimationKey::Right));
}

#[test]
fn scene_builds_from_a_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("level.json");
    let mut config = SceneConfig::default();
    config.pickups.count = 5;
    config.save_to_file(&path).unwrap();

    let loaded = SceneConfig::load_from_file(&path).unwrap();
    let scene = StarfallScene::with_seed(loaded, 42).unwrap();
    assert_eq!(scene.pickup_count(), 5);
}

#[test]
fn same_seed_gives_same_level() {
    let mut a = StarfallScene::with_seed(SceneConfig::default(), 9).unwrap();
    let mut b = StarfallScene::with_seed(SceneConfig::default(), 9).unwrap();
    run(&mut a, &InputState::new(), 60);
    run(&mut b, &InputState::new(), 60);
    assert_eq!(a.pickup_positions(), b.pickup_positions());
}
