//! Data-driven game balance
//!
//! Difficulty profiles and per-kind entity stat tables. Behavior differences
//! between enemy kinds are expressed as data here and interpreted by the sim;
//! adding a kind is a table addition, not a code change.

use serde::{Deserialize, Serialize};

/// Closed set of difficulty profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Nightmare,
    Fun,
    Dual,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Nightmare => "nightmare",
            Difficulty::Fun => "fun",
            Difficulty::Dual => "dual",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "nightmare" => Some(Difficulty::Nightmare),
            "fun" => Some(Difficulty::Fun),
            "dual" => Some(Difficulty::Dual),
            _ => None,
        }
    }

    /// Two player craft instead of one
    pub fn is_dual(&self) -> bool {
        matches!(self, Difficulty::Dual)
    }

    /// Gravity wells and falling hazards active
    pub fn is_fun(&self) -> bool {
        matches!(self, Difficulty::Fun)
    }

    /// The boss gains a horizontal sinusoidal drift at these tiers
    pub fn boss_drifts(&self) -> bool {
        matches!(self, Difficulty::Nightmare | Difficulty::Fun | Difficulty::Dual)
    }

    pub fn profile(&self) -> &'static DifficultyProfile {
        &PROFILES[*self as usize]
    }
}

/// Immutable per-difficulty configuration bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub enemy_speed_min: f32,
    pub enemy_speed_max: f32,
    pub enemy_bullet_speed: f32,
    /// Per-tick Bernoulli probability of an enemy firing
    pub enemy_fire_rate: f32,
    /// Per-tick Bernoulli probability of a spawn attempt succeeding
    pub enemy_spawn_rate: f32,
    pub score_multiplier: f64,
    pub boss_health: i32,
    pub boss_speed: f32,
    /// Base milliseconds between boss shots, before kill-history scaling
    pub boss_fire_rate_ms: u64,
    pub boss_bullet_damage: i32,
    pub boss_ram_damage: i32,
    pub max_enemies: usize,
    /// Per-tick chance of the timed random power-up drip firing
    pub random_powerup_chance: f32,
    pub max_ball_enemies: usize,
    /// Fun mode only; zero elsewhere
    pub well_spawn_rate: f32,
    pub hazard_spawn_rate: f32,
}

static PROFILES: [DifficultyProfile; 6] = [
    // Easy
    DifficultyProfile {
        enemy_speed_min: 2.0,
        enemy_speed_max: 4.0,
        enemy_bullet_speed: 5.0,
        enemy_fire_rate: 0.010,
        enemy_spawn_rate: 0.025,
        score_multiplier: 1.0,
        boss_health: 150,
        boss_speed: 1.2,
        boss_fire_rate_ms: 600,
        boss_bullet_damage: 25,
        boss_ram_damage: 60,
        max_enemies: 10,
        random_powerup_chance: 0.0005,
        max_ball_enemies: 0,
        well_spawn_rate: 0.0,
        hazard_spawn_rate: 0.0,
    },
    // Normal
    DifficultyProfile {
        enemy_speed_min: 2.5,
        enemy_speed_max: 5.0,
        enemy_bullet_speed: 6.0,
        enemy_fire_rate: 0.020,
        enemy_spawn_rate: 0.030,
        score_multiplier: 1.5,
        boss_health: 200,
        boss_speed: 1.5,
        boss_fire_rate_ms: 400,
        boss_bullet_damage: 25,
        boss_ram_damage: 70,
        max_enemies: 12,
        random_powerup_chance: 0.0003,
        max_ball_enemies: 1,
        well_spawn_rate: 0.0,
        hazard_spawn_rate: 0.0,
    },
    // Hard
    DifficultyProfile {
        enemy_speed_min: 3.0,
        enemy_speed_max: 6.0,
        enemy_bullet_speed: 7.0,
        enemy_fire_rate: 0.025,
        enemy_spawn_rate: 0.040,
        score_multiplier: 2.0,
        boss_health: 300,
        boss_speed: 2.0,
        boss_fire_rate_ms: 300,
        boss_bullet_damage: 30,
        boss_ram_damage: 80,
        max_enemies: 20,
        random_powerup_chance: 0.0001,
        max_ball_enemies: 2,
        well_spawn_rate: 0.0,
        hazard_spawn_rate: 0.0,
    },
    // Nightmare
    DifficultyProfile {
        enemy_speed_min: 4.0,
        enemy_speed_max: 8.0,
        enemy_bullet_speed: 9.0,
        enemy_fire_rate: 0.030,
        enemy_spawn_rate: 0.045,
        score_multiplier: 2.5,
        boss_health: 450,
        boss_speed: 2.5,
        boss_fire_rate_ms: 200,
        boss_bullet_damage: 35,
        boss_ram_damage: 100,
        max_enemies: 30,
        random_powerup_chance: 0.00005,
        max_ball_enemies: 3,
        well_spawn_rate: 0.0,
        hazard_spawn_rate: 0.0,
    },
    // Fun
    DifficultyProfile {
        enemy_speed_min: 3.0,
        enemy_speed_max: 6.0,
        enemy_bullet_speed: 7.0,
        enemy_fire_rate: 0.025,
        enemy_spawn_rate: 0.040,
        score_multiplier: 2.0,
        boss_health: 300,
        boss_speed: 2.0,
        boss_fire_rate_ms: 300,
        boss_bullet_damage: 30,
        boss_ram_damage: 80,
        max_enemies: 20,
        random_powerup_chance: 0.0001,
        max_ball_enemies: 1,
        well_spawn_rate: 0.2,
        hazard_spawn_rate: 0.2,
    },
    // Dual
    DifficultyProfile {
        enemy_speed_min: 3.0,
        enemy_speed_max: 6.0,
        enemy_bullet_speed: 7.0,
        enemy_fire_rate: 0.025,
        enemy_spawn_rate: 0.040,
        score_multiplier: 2.0,
        boss_health: 600,
        boss_speed: 2.0,
        boss_fire_rate_ms: 300,
        boss_bullet_damage: 30,
        boss_ram_damage: 80,
        max_enemies: 50,
        random_powerup_chance: 0.0001,
        max_ball_enemies: 4,
        well_spawn_rate: 0.0,
        hazard_spawn_rate: 0.0,
    },
];

/// How the boss shot-pattern rotation grows with difficulty
pub fn base_pattern_count(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Hard | Difficulty::Fun | Difficulty::Dual => 4,
        Difficulty::Nightmare => 6,
        _ => 3,
    }
}

/// Closed set of enemy kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Fast,
    Heavy,
    Sniper,
    Patrol,
    Ball,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 6] = [
        EnemyKind::Basic,
        EnemyKind::Fast,
        EnemyKind::Heavy,
        EnemyKind::Sniper,
        EnemyKind::Patrol,
        EnemyKind::Ball,
    ];

    pub fn spec(&self) -> &'static EnemySpec {
        &ENEMY_SPECS[*self as usize]
    }
}

/// Per-frame movement policy for an enemy kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementPolicy {
    /// Linear descent
    Straight,
    /// Descend to altitude, hold, then resume at half speed
    Hover,
    /// Descend to altitude, then oscillate horizontally
    Patrol,
    /// Descend to altitude, then bounded sinusoidal drift
    Float,
}

/// Bullet emission shape for an enemy kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FiringShape {
    /// One straight bullet
    Single,
    /// Aimed shot while still high on the field
    Aimed,
    /// Eight-bullet ring
    RadialBurst,
}

/// Static behavior descriptor for one enemy kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySpec {
    pub width: f32,
    pub height: f32,
    pub health: i32,
    pub score: f64,
    pub speed_multiplier: f32,
    pub fire_rate_multiplier: f32,
    pub bullet_speed_multiplier: f32,
    pub movement: MovementPolicy,
    pub firing: FiringShape,
    pub power_drop_chance: f32,
    pub shield_drop_chance: f32,
    pub health_drop_chance: f32,
    pub bomb_drop_chance: f32,
}

static ENEMY_SPECS: [EnemySpec; 6] = [
    // Basic
    EnemySpec {
        width: 40.0,
        height: 40.0,
        health: 1,
        score: 400.0,
        speed_multiplier: 1.0,
        fire_rate_multiplier: 1.0,
        bullet_speed_multiplier: 1.0,
        movement: MovementPolicy::Straight,
        firing: FiringShape::Single,
        power_drop_chance: 0.08,
        shield_drop_chance: 0.05,
        health_drop_chance: 0.10,
        bomb_drop_chance: 0.03,
    },
    // Fast
    EnemySpec {
        width: 30.0,
        height: 30.0,
        health: 1,
        score: 400.0,
        speed_multiplier: 2.0,
        fire_rate_multiplier: 1.0,
        bullet_speed_multiplier: 1.0,
        movement: MovementPolicy::Straight,
        firing: FiringShape::Single,
        power_drop_chance: 0.12,
        shield_drop_chance: 0.08,
        health_drop_chance: 0.12,
        bomb_drop_chance: 0.05,
    },
    // Heavy
    EnemySpec {
        width: 50.0,
        height: 50.0,
        health: 10,
        score: 1000.0,
        speed_multiplier: 0.5,
        fire_rate_multiplier: 1.0,
        bullet_speed_multiplier: 1.0,
        movement: MovementPolicy::Straight,
        firing: FiringShape::Single,
        power_drop_chance: 0.20,
        shield_drop_chance: 0.15,
        health_drop_chance: 0.25,
        bomb_drop_chance: 0.12,
    },
    // Sniper
    EnemySpec {
        width: 35.0,
        height: 45.0,
        health: 3,
        score: 1000.0,
        speed_multiplier: 1.0,
        fire_rate_multiplier: 0.5,
        bullet_speed_multiplier: 3.0,
        movement: MovementPolicy::Hover,
        firing: FiringShape::Aimed,
        power_drop_chance: 0.15,
        shield_drop_chance: 0.12,
        health_drop_chance: 0.18,
        bomb_drop_chance: 0.08,
    },
    // Patrol
    EnemySpec {
        width: 45.0,
        height: 40.0,
        health: 4,
        score: 1000.0,
        speed_multiplier: 1.0,
        fire_rate_multiplier: 2.0,
        bullet_speed_multiplier: 1.0,
        movement: MovementPolicy::Patrol,
        firing: FiringShape::Single,
        power_drop_chance: 0.25,
        shield_drop_chance: 0.18,
        health_drop_chance: 0.20,
        bomb_drop_chance: 0.10,
    },
    // Ball
    EnemySpec {
        width: 35.0,
        height: 35.0,
        health: 6,
        score: 1500.0,
        speed_multiplier: 0.8,
        fire_rate_multiplier: 1.0,
        bullet_speed_multiplier: 1.0,
        movement: MovementPolicy::Float,
        firing: FiringShape::RadialBurst,
        power_drop_chance: 0.30,
        shield_drop_chance: 0.20,
        health_drop_chance: 0.25,
        bomb_drop_chance: 0.15,
    },
];

/// Closed set of boss flavors; only the special-attack shape differs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossKind {
    Destroyer,
    Watcher,
    Spider,
    Crystal,
    Flame,
}

impl BossKind {
    pub const ALL: [BossKind; 5] = [
        BossKind::Destroyer,
        BossKind::Watcher,
        BossKind::Spider,
        BossKind::Crystal,
        BossKind::Flame,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BossKind::Destroyer => "destroyer",
            BossKind::Watcher => "watcher",
            BossKind::Spider => "spider",
            BossKind::Crystal => "crystal",
            BossKind::Flame => "flame",
        }
    }
}
