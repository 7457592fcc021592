//! The simulation orchestrator
//!
//! `Simulation` owns the context and runs the fixed per-tick order: player
//! movement, weapons, entity pools, boss, field effects, collisions, score.
//! Callers drive it with explicit `now` timestamps; nothing in the sim reads
//! a wall clock.

use glam::Vec2;

use super::state::{
    BossSlot, Bullet, DirInput, Enemy, Explosion, GamePhase, GravityWell, Hazard, Player, PowerUp,
    SimulationContext, TickInput,
};
use super::{boss, collision, enemy, field, powerup, weapons};
use crate::config::Difficulty;
use crate::consts::*;
use crate::events::GameEvent;

/// One game run, from `start` to `GameOver`
#[derive(Debug, Default)]
pub struct Simulation {
    ctx: Option<SimulationContext>,
}

impl Simulation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a fresh run, replacing any previous one
    pub fn start(&mut self, difficulty: Difficulty, seed: u64, now: u64) {
        log::info!(
            "starting run: difficulty {} seed {seed}",
            difficulty.as_str()
        );
        self.ctx = Some(SimulationContext::new(difficulty, seed, now));
    }

    pub fn phase(&self) -> GamePhase {
        self.ctx.as_ref().map_or(GamePhase::Idle, |c| c.phase)
    }

    pub fn pause(&mut self, now: u64) {
        let Some(ctx) = &mut self.ctx else { return };
        if ctx.phase != GamePhase::Running {
            return;
        }
        ctx.clock.pause(now);
        ctx.phase = GamePhase::Paused;
        log::debug!("paused at {now}");
    }

    /// Resume from pause: fold the paused span into the clock and shift every
    /// armed deadline by it, so no timed effect loses time to the pause
    pub fn resume(&mut self, now: u64) {
        let Some(ctx) = &mut self.ctx else { return };
        if ctx.phase != GamePhase::Paused {
            return;
        }
        let span = ctx.clock.resume(now);
        ctx.shift_deadlines(span);
        ctx.phase = GamePhase::Running;
        log::debug!("resumed at {now}, span {span} ms");
    }

    /// Freeze the run for final reporting
    pub fn end(&mut self, now: u64) {
        let Some(ctx) = &mut self.ctx else { return };
        if ctx.phase == GamePhase::Ended {
            return;
        }
        ctx.clock.stop(now);
        ctx.phase = GamePhase::Ended;
        ctx.events.push(GameEvent::GameOver);
        log::info!(
            "run ended: score {} kills {} crowns {}",
            ctx.score as u64,
            ctx.kills,
            ctx.crowns
        );
    }

    /// Advance one fixed tick. A no-op unless Running (after the pause toggle
    /// is honored).
    pub fn tick(&mut self, now: u64, input: &TickInput) {
        if input.toggle_pause {
            match self.phase() {
                GamePhase::Running => self.pause(now),
                GamePhase::Paused => self.resume(now),
                _ => {}
            }
        }
        let Some(ctx) = &mut self.ctx else { return };
        if ctx.phase != GamePhase::Running {
            return;
        }
        ctx.tick_count += 1;

        move_players(ctx, input);
        weapons::auto_fire(ctx, now);
        if input.fire_bomb {
            weapons::fire_bomb(ctx, now);
        }
        weapons::update_bullets(ctx, now);
        weapons::update_explosions(ctx);

        enemy::update_tick(ctx);
        enemy::spawn_tick(ctx);

        boss::update(ctx, now);

        powerup::update(ctx);
        powerup::random_drip(ctx, now);

        if ctx.difficulty.is_fun() {
            field::update_wells(ctx, now);
            field::update_hazards(ctx, now);
        }

        collision::resolve(ctx, now);
        boss::resolve_defeat(ctx, now);

        // Survival pays a trickle that grows with run length
        let bonus = ctx.clock.elapsed_seconds(now) as f64 * 0.1 * ctx.profile().score_multiplier;
        ctx.add_score(bonus);

        if ctx.defeated {
            self.end(now);
        }
    }

    // --- read-only views for the UI collaborator ---

    pub fn score(&self) -> u64 {
        self.ctx.as_ref().map_or(0, |c| c.score as u64)
    }

    pub fn crowns(&self) -> u32 {
        self.ctx.as_ref().map_or(0, |c| c.crowns)
    }

    pub fn kills(&self) -> u32 {
        self.ctx.as_ref().map_or(0, |c| c.kills)
    }

    pub fn boss_kills(&self) -> u32 {
        self.ctx.as_ref().map_or(0, |c| c.boss_kills)
    }

    pub fn bombs(&self) -> u32 {
        self.ctx.as_ref().map_or(0, |c| c.bombs)
    }

    pub fn bomb_cooldown_remaining(&self, now: u64) -> u64 {
        self.ctx
            .as_ref()
            .map_or(0, |c| c.bomb_cooldown.remaining_ms(now))
    }

    pub fn elapsed_ms(&self, now: u64) -> u64 {
        self.ctx.as_ref().map_or(0, |c| c.clock.elapsed_ms(now))
    }

    pub fn player_health(&self, idx: usize) -> i32 {
        self.ctx
            .as_ref()
            .and_then(|c| c.players.get(idx))
            .map_or(0, |p| p.health)
    }

    pub fn shield_remaining(&self, idx: usize, now: u64) -> u64 {
        self.ctx
            .as_ref()
            .and_then(|c| c.players.get(idx))
            .map_or(0, |p| p.shield_until.remaining_ms(now))
    }

    pub fn power_remaining(&self, idx: usize, now: u64) -> u64 {
        self.ctx
            .as_ref()
            .and_then(|c| c.players.get(idx))
            .map_or(0, |p| p.power_until.remaining_ms(now))
    }

    pub fn players(&self) -> &[Player] {
        self.ctx.as_ref().map_or(&[], |c| &c.players)
    }

    pub fn enemies(&self) -> &[Enemy] {
        self.ctx.as_ref().map_or(&[], |c| &c.enemies)
    }

    pub fn player_bullets(&self) -> &[Bullet] {
        self.ctx.as_ref().map_or(&[], |c| &c.player_bullets)
    }

    pub fn enemy_bullets(&self) -> &[Bullet] {
        self.ctx.as_ref().map_or(&[], |c| &c.enemy_bullets)
    }

    pub fn powerups(&self) -> &[PowerUp] {
        self.ctx.as_ref().map_or(&[], |c| &c.powerups)
    }

    pub fn explosions(&self) -> &[Explosion] {
        self.ctx.as_ref().map_or(&[], |c| &c.explosions)
    }

    pub fn wells(&self) -> &[GravityWell] {
        self.ctx.as_ref().map_or(&[], |c| &c.wells)
    }

    pub fn hazards(&self) -> &[Hazard] {
        self.ctx.as_ref().map_or(&[], |c| &c.hazards)
    }

    pub fn boss(&self) -> &BossSlot {
        static ABSENT: BossSlot = BossSlot::Absent;
        self.ctx.as_ref().map_or(&ABSENT, |c| &c.boss)
    }

    /// Milliseconds the boss warning banner has left on screen; the banner
    /// outlives materialization by a second
    pub fn boss_banner_remaining_ms(&self, now: u64) -> u64 {
        self.boss().banner_remaining_ms(now)
    }

    /// Drain queued gameplay events for the UI layer
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.ctx
            .as_mut()
            .map_or_else(Vec::new, |c| std::mem::take(&mut c.events))
    }
}

/// Apply directional input and clamp to the play field
fn move_players(ctx: &mut SimulationContext, input: &TickInput) {
    let inputs: [&DirInput; 2] = [&input.p1, &input.p2];
    for (player, dir) in ctx.players.iter_mut().zip(inputs) {
        if player.health <= 0 {
            continue;
        }
        let mut delta = Vec2::ZERO;
        if dir.left {
            delta.x -= player.speed;
        }
        if dir.right {
            delta.x += player.speed;
        }
        if dir.up {
            delta.y -= player.speed;
        }
        if dir.down {
            delta.y += player.speed;
        }
        player.pos += delta;
        player.pos.x = player.pos.x.clamp(0.0, FIELD_WIDTH - player.size.x);
        player.pos.y = player.pos.y.clamp(0.0, FIELD_HEIGHT - player.size.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::BossPhase;

    fn running(difficulty: Difficulty) -> Simulation {
        let mut sim = Simulation::new();
        sim.start(difficulty, 42, 0);
        sim
    }

    /// Drive `sim` for `ticks` fixed steps starting at `from`, returning the
    /// timestamp after the last step
    fn run_ticks(sim: &mut Simulation, from: u64, ticks: u64) -> u64 {
        let input = TickInput::default();
        let mut now = from;
        for _ in 0..ticks {
            now += TICK_MS;
            sim.tick(now, &input);
        }
        now
    }

    #[test]
    fn test_idle_until_started() {
        let mut sim = Simulation::new();
        assert_eq!(sim.phase(), GamePhase::Idle);
        sim.tick(16, &TickInput::default());
        assert_eq!(sim.score(), 0);
    }

    #[test]
    fn test_movement_clamps_to_field() {
        let mut sim = running(Difficulty::Normal);
        let input = TickInput {
            p1: DirInput {
                left: true,
                ..DirInput::default()
            },
            ..TickInput::default()
        };
        for i in 1..200 {
            sim.tick(i * TICK_MS, &input);
        }
        assert_eq!(sim.players()[0].pos.x, 0.0);
    }

    #[test]
    fn test_auto_fire_runs_every_tick_loop() {
        let mut sim = running(Difficulty::Normal);
        run_ticks(&mut sim, 0, 3);
        // 48 ms at a 150 ms cooldown: exactly one shot out
        assert_eq!(sim.player_bullets().len(), 1);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut sim = running(Difficulty::Normal);
        let now = run_ticks(&mut sim, 0, 10);
        let score = sim.score();
        let bullets = sim.player_bullets().len();

        sim.pause(now);
        assert_eq!(sim.phase(), GamePhase::Paused);
        // Ticks while paused change nothing
        run_ticks(&mut sim, now, 100);
        assert_eq!(sim.score(), score);
        assert_eq!(sim.player_bullets().len(), bullets);
        // Elapsed time is frozen at the pause point
        assert_eq!(sim.elapsed_ms(now + 50_000), now);
    }

    #[test]
    fn test_resume_shifts_timed_effects() {
        let mut sim = running(Difficulty::Normal);
        // Shield granted at t=1000, good until t=6000
        let ctx = sim.ctx.as_mut().unwrap();
        ctx.players[0].shield_until.arm(1_000, SHIELD_DURATION_MS);

        sim.pause(2_000);
        sim.resume(12_000);
        // 10 s paused: shield now lasts until t=16000
        assert!(sim.shield_remaining(0, 12_000) > 0);
        let ctx = sim.ctx.as_ref().unwrap();
        assert!(ctx.players[0].is_shielded(15_900));
        assert!(!ctx.players[0].is_shielded(16_100));
    }

    #[test]
    fn test_toggle_pause_via_input() {
        let mut sim = running(Difficulty::Normal);
        let toggle = TickInput {
            toggle_pause: true,
            ..TickInput::default()
        };
        sim.tick(16, &toggle);
        assert_eq!(sim.phase(), GamePhase::Paused);
        sim.tick(32, &toggle);
        assert_eq!(sim.phase(), GamePhase::Running);
    }

    /// Tick with player health pinned high, so a long scenario cannot end early
    fn tick_immortal(sim: &mut Simulation, now: u64) {
        if let Some(ctx) = sim.ctx.as_mut() {
            for p in &mut ctx.players {
                p.health = 1_000_000;
            }
        }
        sim.tick(now, &TickInput::default());
    }

    #[test]
    fn test_boss_gate_opens_after_100s_of_run_time() {
        let mut sim = running(Difficulty::Normal);
        let ticks_to_gate = BOSS_GATE_MS / TICK_MS;
        for i in 1..ticks_to_gate {
            tick_immortal(&mut sim, i * TICK_MS);
        }
        assert!(matches!(sim.boss(), BossSlot::Absent));

        tick_immortal(&mut sim, ticks_to_gate * TICK_MS);
        assert!(matches!(sim.boss(), BossSlot::Warning { .. }));

        // One second later the boss is on the field
        for i in 1..=BOSS_WARNING_MS / TICK_MS + 1 {
            tick_immortal(&mut sim, ticks_to_gate * TICK_MS + i * TICK_MS);
        }
        assert!(sim.boss().active().is_some());
    }

    #[test]
    fn test_boss_falls_to_sustained_fire() {
        let mut sim = running(Difficulty::Normal);
        {
            let ctx = sim.ctx.as_mut().unwrap();
            ctx.boss = boss::test_boss_slot(ctx);
            // Park the players out of harm's way
            for p in &mut ctx.players {
                p.pos.y = FIELD_HEIGHT - p.size.y;
            }
        }
        // Normal boss: 200 health, 2 per hit. Feed hits directly through the
        // collision pass to keep the scenario exact.
        for i in 0..100u64 {
            let ctx = sim.ctx.as_mut().unwrap();
            let boss_center = ctx.boss.active().unwrap().center();
            ctx.player_bullets.push(Bullet {
                pos: boss_center,
                size: Vec2::new(4.0, 8.0),
                vel: crate::sim::state::BulletVel::Axis(0.0),
                damage: PLAYER_BULLET_DAMAGE,
                flags: Default::default(),
                bounces: 0,
            });
            collision::resolve(sim.ctx.as_mut().unwrap(), i * TICK_MS);
            boss::resolve_defeat(sim.ctx.as_mut().unwrap(), i * TICK_MS);
        }
        assert!(matches!(sim.boss(), BossSlot::Absent));
        assert_eq!(sim.boss_kills(), 1);
        // Defeat pays 25000 * 1.5 plus earlier drop pickups never collected
        assert!(sim.score() >= 37_500);
        assert_eq!(sim.powerups().len(), 5);
    }

    #[test]
    fn test_enraged_boss_phase_two() {
        let mut sim = running(Difficulty::Normal);
        {
            let ctx = sim.ctx.as_mut().unwrap();
            ctx.boss = boss::test_boss_slot(ctx);
            ctx.boss.active_mut().unwrap().health = 99;
        }
        run_ticks(&mut sim, 0, 2);
        let boss = sim.boss().active().unwrap();
        assert_eq!(boss.phase, BossPhase::Two);
    }

    #[test]
    fn test_game_over_reported_once() {
        let mut sim = running(Difficulty::Normal);
        sim.ctx.as_mut().unwrap().players[0].health = 1;
        // Park a ramming enemy on the player
        {
            let ctx = sim.ctx.as_mut().unwrap();
            let spec = crate::config::EnemyKind::Basic.spec();
            ctx.enemies.push(Enemy {
                kind: crate::config::EnemyKind::Basic,
                pos: ctx.players[0].pos,
                size: Vec2::new(spec.width, spec.height),
                speed: 0.0,
                health: spec.health,
                max_health: spec.health,
                patrol_dir: 1.0,
                hover_ticks: 0,
                float_ticks: 0,
            });
        }
        run_ticks(&mut sim, 0, 1);
        assert_eq!(sim.phase(), GamePhase::Ended);
        let events = sim.take_events();
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::GameOver))
                .count(),
            1
        );

        // Further ticks stay frozen and never re-report
        run_ticks(&mut sim, 1_000, 10);
        assert!(sim.take_events().is_empty());
    }

    #[test]
    fn test_time_bonus_accrues_with_multiplier() {
        let mut sim = running(Difficulty::Easy);
        // The trickle is keyed to whole seconds of run time, so nothing
        // accrues inside the first second
        run_ticks(&mut sim, 0, 10);
        assert_eq!(sim.ctx.as_ref().unwrap().score, 0.0);
        for i in 11..=80 {
            tick_immortal(&mut sim, i * TICK_MS);
        }
        // Past the one-second mark the trickle pays every tick
        assert!(sim.ctx.as_ref().unwrap().score > 0.0);
    }

    #[test]
    fn test_same_seed_same_run() {
        let script = |sim: &mut Simulation| {
            let input = TickInput {
                p1: DirInput {
                    right: true,
                    ..DirInput::default()
                },
                ..TickInput::default()
            };
            for i in 1..=2_000u64 {
                sim.tick(i * TICK_MS, &input);
            }
            (
                sim.score(),
                sim.kills(),
                sim.enemies().len(),
                sim.enemy_bullets().len(),
            )
        };
        let mut a = running(Difficulty::Nightmare);
        let mut b = running(Difficulty::Nightmare);
        assert_eq!(script(&mut a), script(&mut b));
    }

    #[test]
    fn test_different_seed_diverges() {
        let input = TickInput::default();
        let mut a = Simulation::new();
        a.start(Difficulty::Nightmare, 1, 0);
        let mut b = Simulation::new();
        b.start(Difficulty::Nightmare, 2, 0);
        for i in 1..=2_000u64 {
            a.tick(i * TICK_MS, &input);
            b.tick(i * TICK_MS, &input);
        }
        // Astronomically unlikely to match with different streams
        assert_ne!(
            (a.enemies().len(), a.score()),
            (b.enemies().len(), b.score())
        );
    }
}
