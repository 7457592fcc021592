//! Nova Strike - a fixed-tick arcade shoot-'em-up simulation engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entity pools, boss encounters, collisions)
//! - `clock`: Pause-compensated time base and the `Deadline` value type
//! - `config`: Data-driven difficulty profiles and entity stat tables
//! - `events`: Per-tick signals consumed by rendering/UI collaborators
//! - `highscores`: Per-difficulty best-score registry
//!
//! The engine owns no clock and captures no input: callers pass `now` in
//! milliseconds and a `TickInput` snapshot into every call, which keeps the
//! whole simulation replayable from a seed.

pub mod clock;
pub mod config;
pub mod events;
pub mod highscores;
pub mod sim;

pub use clock::{Deadline, GameClock};
pub use config::{BossKind, Difficulty, DifficultyProfile, EnemyKind};
pub use events::GameEvent;
pub use highscores::HighScores;
pub use sim::{Simulation, TickInput};

/// Game configuration constants
pub mod consts {
    /// Play field dimensions (pixels)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Nominal tick interval for callers driving the sim at 60 Hz
    pub const TICK_MS: u64 = 16;

    /// Player defaults
    pub const PLAYER_MAX_HEALTH: i32 = 120;
    pub const PLAYER_SIZE: f32 = 20.0;
    pub const PLAYER_SPEED: f32 = 6.0;
    pub const PLAYER_SHOT_COOLDOWN_MS: u64 = 150;
    pub const PLAYER_BULLET_SPEED: f32 = 10.0;
    pub const PLAYER_BULLET_SPEED_POWERED: f32 = 12.0;
    pub const PLAYER_BULLET_DAMAGE: i32 = 2;

    /// Boss encounter timing
    pub const BOSS_GATE_MS: u64 = 100_000;
    pub const BOSS_WARNING_MS: u64 = 1_000;
    pub const BOSS_WARNING_CLEAR_MS: u64 = 2_000;
    pub const BOSS_SPECIAL_COOLDOWN_MS: u64 = 3_000;
    /// Fire-rate floor after kill-history scaling
    pub const BOSS_MIN_FIRE_RATE_MS: u64 = 50;
    pub const BOSS_SCORE: f64 = 25_000.0;
    pub const BOSS_SIZE: f32 = 120.0;
    pub const BOSS_HOLD_ALTITUDE: f32 = 50.0;

    /// Power-up effects
    pub const POWERUP_SIZE: f32 = 30.0;
    pub const POWERUP_FALL_SPEED: f32 = 2.0;
    pub const POWER_DURATION_MS: u64 = 10_000;
    pub const SHIELD_DURATION_MS: u64 = 5_000;
    pub const HEALTH_RESTORE: i32 = 30;
    pub const RANDOM_POWERUP_GATE_MS: u64 = 5_000;

    /// Bomb inventory
    pub const STARTING_BOMBS: u32 = 3;
    pub const MAX_BOMBS: u32 = 9;
    pub const BOMB_COOLDOWN_MS: u64 = 5_000;
    /// Flat boss damage, deliberately not difficulty-scaled
    pub const BOMB_BOSS_DAMAGE: i32 = 60;

    /// Gravity wells and falling hazards (Fun mode)
    pub const WELL_INNER_RADIUS: f32 = 35.0;
    pub const WELL_OUTER_RADIUS: f32 = 100.0;
    pub const WELL_LIFE_MS: u64 = 15_000;
    pub const WELL_SPAWN_GATE_MS: u64 = 1_000;
    pub const HAZARD_SIZE: f32 = 80.0;
    pub const HAZARD_SPAWN_GATE_MS: u64 = 2_000;

    /// Deceleration never drags a projectile below this speed (px/tick)
    pub const BULLET_MIN_SPEED: f32 = 0.5;

    /// Ramming damage from a regular enemy
    pub const ENEMY_RAM_DAMAGE: i32 = 60;

    /// One crown per this much score
    pub const CROWN_SCORE_STEP: f64 = 200_000.0;

    /// Bounded retries for randomized spawn placement
    pub const MAX_SPAWN_ATTEMPTS: u32 = 5;
}
