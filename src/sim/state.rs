//! Simulation state and core entity types
//!
//! Everything mutable lives in `SimulationContext`, which is owned by the
//! `Simulation` orchestrator and passed explicitly into every manager call.
//! There is no module-level shared state anywhere in the sim.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::clock::{Deadline, GameClock};
use crate::config::{BossKind, Difficulty, DifficultyProfile, EnemyKind};
use crate::consts::*;
use crate::events::GameEvent;

/// Axis-aligned bounding-box overlap, the sole geometric test in the sim
#[inline]
pub fn aabb_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    a_pos.x < b_pos.x + b_size.x
        && a_pos.x + a_size.x > b_pos.x
        && a_pos.y < b_pos.y + b_size.y
        && a_pos.y + a_size.y > b_pos.y
}

/// Orchestrator state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GamePhase {
    #[default]
    Idle,
    Running,
    Paused,
    /// Run finished; state is frozen for final score reporting
    Ended,
}

/// Directional intent for one player, one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct DirInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

/// Input snapshot consumed at the start of a tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub p1: DirInput,
    /// Ignored outside dual mode
    pub p2: DirInput,
    /// Edge-triggered bomb release
    pub fire_bomb: bool,
    /// Edge-triggered pause toggle
    pub toggle_pause: bool,
}

/// One player craft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub health: i32,
    pub next_shot: Deadline,
    pub power_until: Deadline,
    pub shield_until: Deadline,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::splat(PLAYER_SIZE),
            speed: PLAYER_SPEED,
            health: PLAYER_MAX_HEALTH,
            next_shot: Deadline::IDLE,
            power_until: Deadline::IDLE,
            shield_until: Deadline::IDLE,
        }
    }

    pub fn is_powered(&self, now: u64) -> bool {
        self.power_until.pending(now)
    }

    pub fn is_shielded(&self, now: u64) -> bool {
        self.shield_until.pending(now)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// An enemy craft; behavior comes from its kind's `EnemySpec`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub health: i32,
    pub max_health: i32,
    /// +1 / -1 horizontal direction for patrol movement
    pub patrol_dir: f32,
    pub hover_ticks: u32,
    pub float_ticks: u32,
}

impl Enemy {
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// Velocity of a projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BulletVel {
    /// Scalar speed along the owner's axis (up for player, down for enemy)
    Axis(f32),
    /// Explicit components
    Vector(Vec2),
}

impl BulletVel {
    pub fn speed(&self) -> f32 {
        match self {
            BulletVel::Axis(s) => s.abs(),
            BulletVel::Vector(v) => v.length(),
        }
    }
}

/// Damage-classification flags; visual-only flags ride along
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulletFlags {
    pub targeted: bool,
    pub sniper: bool,
    pub boss: bool,
    pub ball: bool,
    pub special: bool,
    pub radial: bool,
    pub flame: bool,
}

/// A projectile from either side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: BulletVel,
    pub damage: i32,
    pub flags: BulletFlags,
    /// Remaining wall bounces (crystal special shots)
    pub bounces: u8,
}

impl Bullet {
    /// Plain straight enemy bullet
    pub fn enemy_straight(pos: Vec2, speed: f32) -> Self {
        Self {
            pos,
            size: Vec2::new(4.0, 8.0),
            vel: BulletVel::Axis(speed),
            damage: 0,
            flags: BulletFlags::default(),
            bounces: 0,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Health,
    Power,
    Bomb,
    Shield,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Health,
        PowerUpKind::Power,
        PowerUpKind::Bomb,
        PowerUpKind::Shield,
    ];
}

/// A falling pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub size: Vec2,
}

impl PowerUp {
    /// Spawn centered on `center_x`, matching drop placement from kills
    pub fn at(center_x: f32, y: f32, kind: PowerUpKind) -> Self {
        Self {
            kind,
            pos: Vec2::new(center_x - POWERUP_SIZE / 2.0, y),
            size: Vec2::splat(POWERUP_SIZE),
        }
    }
}

/// Short-lived explosion visual (gameplay-inert)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub radius: f32,
    pub life: u32,
    pub opacity: f32,
}

impl Explosion {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            radius: 5.0,
            life: 20,
            opacity: 1.0,
        }
    }
}

/// A gravity well: destroys projectiles inside the inner radius, decelerates
/// them inside the outer ring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GravityWell {
    pub center: Vec2,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub expires: Deadline,
}

/// A falling hazard; lethal to players, destroys enemies on contact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
}

/// Boss combat stage; the transition is one-directional
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPhase {
    One,
    Two,
}

/// The singleton boss while active
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub kind: BossKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub health: i32,
    pub max_health: i32,
    /// Milliseconds between shots, kill-history scaled, enrage-scaled
    pub fire_rate_ms: u64,
    pub bullet_damage: i32,
    pub ram_damage: i32,
    /// Monotonic cursor; active pattern is `cursor % pattern_count`
    pub shot_pattern: u32,
    pub phase: BossPhase,
    pub next_shot: Deadline,
    pub next_special: Deadline,
    /// The warning banner outlives materialization; UIs poll this to
    /// know when to take it down
    pub banner_clear_at: Deadline,
}

impl Boss {
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Bullets emit from the bottom-center of the hull
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y + self.size.y)
    }

    pub fn health_ratio(&self) -> f32 {
        self.health as f32 / self.max_health as f32
    }
}

/// Boss lifecycle slot
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub enum BossSlot {
    #[default]
    Absent,
    /// Warning banner shown; the boss materializes at `materialize_at` and
    /// the banner blocks re-arming until `clear_at`
    Warning {
        kind: BossKind,
        materialize_at: Deadline,
        clear_at: Deadline,
    },
    Active(Boss),
}

impl BossSlot {
    pub fn active(&self) -> Option<&Boss> {
        match self {
            BossSlot::Active(boss) => Some(boss),
            _ => None,
        }
    }

    pub fn active_mut(&mut self) -> Option<&mut Boss> {
        match self {
            BossSlot::Active(boss) => Some(boss),
            _ => None,
        }
    }

    /// Milliseconds the warning banner has left on screen; zero once it
    /// clears (or when no encounter is pending)
    pub fn banner_remaining_ms(&self, now: u64) -> u64 {
        match self {
            BossSlot::Warning { clear_at, .. } => clear_at.remaining_ms(now),
            BossSlot::Active(boss) => boss.banner_clear_at.remaining_ms(now),
            BossSlot::Absent => 0,
        }
    }
}

/// A boss special-attack wave scheduled for a future tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingEmission {
    pub fire_at: Deadline,
    pub bullets: Vec<Bullet>,
}

/// All mutable simulation state for one run
#[derive(Debug)]
pub struct SimulationContext {
    pub difficulty: Difficulty,
    pub seed: u64,
    pub rng: Pcg32,
    pub clock: GameClock,
    pub phase: GamePhase,

    pub players: Vec<Player>,
    pub enemies: Vec<Enemy>,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub powerups: Vec<PowerUp>,
    pub explosions: Vec<Explosion>,
    pub wells: Vec<GravityWell>,
    pub hazards: Vec<Hazard>,

    pub boss: BossSlot,
    /// Next boss spawn eligibility (armed at start and at every defeat)
    pub boss_gate: Deadline,
    pub boss_kills: u32,
    pub pending_emissions: Vec<PendingEmission>,

    pub bombs: u32,
    pub bomb_cooldown: Deadline,
    pub powerup_gate: Deadline,
    pub well_gate: Deadline,
    pub hazard_gate: Deadline,

    pub score: f64,
    pub crowns: u32,
    pub kills: u32,

    pub events: Vec<GameEvent>,
    /// Latched on the first terminal condition so GameOver reports once
    pub defeated: bool,
    /// Marks that the explosion pool already advanced this tick
    pub explosions_advanced_tick: u64,
    pub tick_count: u64,
}

impl SimulationContext {
    pub fn new(difficulty: Difficulty, seed: u64, now: u64) -> Self {
        let mut players = Vec::with_capacity(2);
        let base = Vec2::new(
            FIELD_WIDTH / 2.0 - PLAYER_SIZE / 2.0,
            FIELD_HEIGHT - PLAYER_SIZE - 50.0,
        );
        if difficulty.is_dual() {
            players.push(Player::new(base + Vec2::new(25.0, 0.0)));
            players.push(Player::new(base - Vec2::new(50.0, 0.0)));
        } else {
            players.push(Player::new(base));
        }

        let mut clock = GameClock::new();
        clock.start(now);

        let mut ctx = Self {
            difficulty,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            clock,
            phase: GamePhase::Running,
            players,
            enemies: Vec::new(),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            powerups: Vec::new(),
            explosions: Vec::new(),
            wells: Vec::new(),
            hazards: Vec::new(),
            boss: BossSlot::Absent,
            boss_gate: Deadline::IDLE,
            boss_kills: 0,
            pending_emissions: Vec::new(),
            bombs: STARTING_BOMBS,
            bomb_cooldown: Deadline::IDLE,
            powerup_gate: Deadline::IDLE,
            well_gate: Deadline::IDLE,
            hazard_gate: Deadline::IDLE,
            score: 0.0,
            crowns: 0,
            kills: 0,
            events: Vec::new(),
            defeated: false,
            explosions_advanced_tick: u64::MAX,
            tick_count: 0,
        };
        ctx.boss_gate.arm(now, BOSS_GATE_MS);
        ctx.powerup_gate.arm(now, RANDOM_POWERUP_GATE_MS);
        ctx.well_gate.arm(now, WELL_SPAWN_GATE_MS);
        ctx.hazard_gate.arm(now, HAZARD_SPAWN_GATE_MS);
        ctx
    }

    pub fn profile(&self) -> &'static DifficultyProfile {
        self.difficulty.profile()
    }

    /// Score accrual plus crown promotion
    pub fn add_score(&mut self, points: f64) {
        self.score += points;
        let new_crowns = (self.score / CROWN_SCORE_STEP) as u32;
        if new_crowns > self.crowns {
            self.crowns = new_crowns;
        }
    }

    pub fn push_explosion(&mut self, pos: Vec2) {
        self.explosions.push(Explosion::new(pos));
        self.events.push(GameEvent::Explosion { pos });
    }

    /// Shift every absolute deadline in the sim by a paused span.
    /// Called once from `Simulation::resume`; every timestamp owner is
    /// enumerated here so the pause-shift invariant cannot be skipped.
    pub fn shift_deadlines(&mut self, span: u64) {
        for player in &mut self.players {
            player.next_shot.shift(span);
            player.power_until.shift(span);
            player.shield_until.shift(span);
        }
        self.boss_gate.shift(span);
        match &mut self.boss {
            BossSlot::Warning {
                materialize_at,
                clear_at,
                ..
            } => {
                materialize_at.shift(span);
                clear_at.shift(span);
            }
            BossSlot::Active(boss) => {
                boss.next_shot.shift(span);
                boss.next_special.shift(span);
                boss.banner_clear_at.shift(span);
            }
            BossSlot::Absent => {}
        }
        for emission in &mut self.pending_emissions {
            emission.fire_at.shift(span);
        }
        for well in &mut self.wells {
            well.expires.shift(span);
        }
        self.bomb_cooldown.shift(span);
        self.powerup_gate.shift(span);
        self.well_gate.shift(span);
        self.hazard_gate.shift(span);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_overlap() {
        let a = (Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let b = (Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0));
        let c = (Vec2::new(10.0, 0.0), Vec2::new(5.0, 5.0));
        assert!(aabb_overlap(a.0, a.1, b.0, b.1));
        // Touching edges do not overlap
        assert!(!aabb_overlap(a.0, a.1, c.0, c.1));
    }

    #[test]
    fn test_dual_mode_gets_two_players() {
        let ctx = SimulationContext::new(Difficulty::Dual, 7, 0);
        assert_eq!(ctx.players.len(), 2);
        let ctx = SimulationContext::new(Difficulty::Normal, 7, 0);
        assert_eq!(ctx.players.len(), 1);
    }

    #[test]
    fn test_crowns_track_score() {
        let mut ctx = SimulationContext::new(Difficulty::Normal, 7, 0);
        ctx.add_score(199_999.0);
        assert_eq!(ctx.crowns, 0);
        ctx.add_score(1.0);
        assert_eq!(ctx.crowns, 1);
        ctx.add_score(400_000.0);
        assert_eq!(ctx.crowns, 3);
    }

    #[test]
    fn test_shift_deadlines_covers_player_effects() {
        let mut ctx = SimulationContext::new(Difficulty::Normal, 7, 1_000);
        ctx.players[0].shield_until.arm(1_000, SHIELD_DURATION_MS);
        assert!(ctx.players[0].is_shielded(5_900));
        ctx.shift_deadlines(2_000);
        assert!(ctx.players[0].is_shielded(7_900));
        assert!(!ctx.players[0].is_shielded(8_100));
    }
}
