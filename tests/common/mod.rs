//! Shared fixtures for the integration tests.
//!
//! Worlds are built with the default config: a 2000×600 level whose ground
//! top sits at y = 570, a 32×48 player and 32×32 enemies.

#![allow(dead_code)]

use std::time::Duration;

use glitchborn::camera::Camera;
use glitchborn::config::GameConfig;
use glitchborn::entities::{Difficulty, Enemy, EnemyId, GameState, GameStatus, Platform, Player};
use glitchborn::level::Level;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub const GROUND_TOP: f32 = 570.0;
/// Player `y` when standing on the ground.
pub const STANDING_Y: f32 = GROUND_TOP - 48.0;

pub fn config() -> GameConfig {
    GameConfig::default()
}

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

pub fn ground() -> Vec<Platform> {
    vec![Platform::new(0.0, GROUND_TOP, 2000.0, 30.0)]
}

pub fn player_at(x: f32, y: f32) -> Player {
    Player::new(x, y, &config())
}

/// A player resting on the ground at `x`.
pub fn standing_player(x: f32) -> Player {
    player_at(x, STANDING_Y)
}

/// A stationary enemy standing on the ground at `x`.
pub fn enemy_at(id: u32, x: f32) -> Enemy {
    Enemy::spawn(EnemyId(id), x, GROUND_TOP, 0.0, 1.0, &config().enemy)
}

/// A 2000×600 level with nothing but the ground.
pub fn flat_level() -> Level {
    let mut level = Level::new(1, 2000.0, 600.0, (100.0, STANDING_Y));
    level.add_platform(0.0, GROUND_TOP, 2000.0, 30.0);
    level
}

/// A game state on `level` with the player at its spawn and an 800×600 screen.
pub fn state_on(level: Level) -> GameState {
    let (sx, sy) = level.spawn;
    let player = Player::new(sx, sy, &config());
    let mut camera = Camera::new(level.width, level.height, 800.0, 600.0);
    camera.follow(&player.body);
    GameState {
        player,
        level,
        camera,
        difficulty: Difficulty::Medium,
        status: GameStatus::Playing,
        frame: 0,
        last_tick: None,
        kills: 0,
        messages: Vec::new(),
    }
}
