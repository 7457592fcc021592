//! Boss encounters: spawn gate, warning, phases, attack patterns, defeat
//!
//! Lifecycle: Absent -> Warning -> Active(phase 1) -> Active(phase 2, enraged)
//! -> defeated -> Absent. The enrage transition is one-shot and irreversible
//! for the encounter. Special attacks never schedule callbacks; they push
//! `(fire_at, bullets)` entries onto the context's emission queue, which the
//! tick loop drains.

use glam::Vec2;
use rand::Rng;

use super::enemy::pick_target;
use super::state::{
    Boss, BossPhase, BossSlot, Bullet, BulletFlags, BulletVel, PendingEmission, PowerUp,
    PowerUpKind, SimulationContext,
};
use crate::clock::Deadline;
use crate::config::{BossKind, base_pattern_count};
use crate::consts::*;
use crate::events::GameEvent;

/// Per-tick boss bookkeeping: emission queue, spawn gate, warning, movement,
/// attack cadence. Defeat is resolved separately after the collision pass.
pub fn update(ctx: &mut SimulationContext, now: u64) {
    drain_emissions(ctx, now);
    check_gate(ctx, now);
    materialize(ctx, now);

    if ctx.boss.active().is_some() {
        step_movement(ctx, now);
        step_attack(ctx, now);
    }
}

/// Release scheduled special-attack waves whose time has come
fn drain_emissions(ctx: &mut SimulationContext, now: u64) {
    let mut i = 0;
    while i < ctx.pending_emissions.len() {
        if ctx.pending_emissions[i].fire_at.is_due(now) {
            let emission = ctx.pending_emissions.swap_remove(i);
            ctx.enemy_bullets.extend(emission.bullets);
        } else {
            i += 1;
        }
    }
}

/// Absent -> Warning once the spawn gate opens
fn check_gate(ctx: &mut SimulationContext, now: u64) {
    if !matches!(ctx.boss, BossSlot::Absent) || !ctx.boss_gate.is_due(now) {
        return;
    }
    let kind = BossKind::ALL[ctx.rng.random_range(0..BossKind::ALL.len())];
    let mut materialize_at = Deadline::IDLE;
    materialize_at.arm(now, BOSS_WARNING_MS);
    let mut clear_at = Deadline::IDLE;
    clear_at.arm(now, BOSS_WARNING_CLEAR_MS);
    ctx.boss = BossSlot::Warning {
        kind,
        materialize_at,
        clear_at,
    };
    ctx.boss_gate.clear();
    ctx.events.push(GameEvent::BossWarning { kind });
    log::info!("boss warning: {}", kind.as_str());
}

/// Warning -> Active once the warning period elapses
fn materialize(ctx: &mut SimulationContext, now: u64) {
    let BossSlot::Warning {
        kind,
        materialize_at,
        clear_at,
    } = &ctx.boss
    else {
        return;
    };
    if !materialize_at.is_due(now) {
        return;
    }
    let kind = *kind;
    let banner_clear_at = *clear_at;
    let profile = ctx.profile();

    // Bosses get more aggressive with every prior defeat in the run
    let scale = 1.0 + 0.1 * ctx.boss_kills as f64;
    let fire_rate_ms = ((profile.boss_fire_rate_ms as f64 / scale) as u64).max(BOSS_MIN_FIRE_RATE_MS);

    let mut boss = Boss {
        kind,
        pos: Vec2::new(FIELD_WIDTH / 2.0 - BOSS_SIZE / 2.0, -BOSS_SIZE),
        size: Vec2::splat(BOSS_SIZE),
        speed: profile.boss_speed,
        health: profile.boss_health,
        max_health: profile.boss_health,
        fire_rate_ms,
        bullet_damage: profile.boss_bullet_damage,
        ram_damage: profile.boss_ram_damage,
        shot_pattern: 0,
        phase: BossPhase::One,
        next_shot: Deadline::IDLE,
        next_special: Deadline::IDLE,
        banner_clear_at,
    };
    boss.next_shot.arm(now, fire_rate_ms);
    ctx.boss = BossSlot::Active(boss);

    // The arena belongs to the boss: clear regular enemies and their bullets
    ctx.enemies.clear();
    ctx.enemy_bullets.clear();

    ctx.events.push(GameEvent::BossSpawned { kind });
    log::info!(
        "boss materialized: {} (fire rate {} ms)",
        kind.as_str(),
        fire_rate_ms
    );
}

fn step_movement(ctx: &mut SimulationContext, now: u64) {
    let drift = ctx.difficulty.boss_drifts();
    let elapsed = ctx.clock.elapsed_ms(now) as f32;
    let Some(boss) = ctx.boss.active_mut() else {
        return;
    };
    boss.pos.y += boss.speed;
    if boss.pos.y > BOSS_HOLD_ALTITUDE {
        boss.pos.y = BOSS_HOLD_ALTITUDE;
        if drift {
            boss.pos.x += (elapsed * 0.002).sin() * 2.0;
            boss.pos.x = boss.pos.x.clamp(0.0, FIELD_WIDTH - boss.size.x);
        }
    }
}

fn step_attack(ctx: &mut SimulationContext, now: u64) {
    // One-shot enrage at half health: phase flips, cadence and damage scale,
    // and both stay scaled for the remainder of the encounter
    if let Some(boss) = ctx.boss.active_mut() {
        if boss.health_ratio() < 0.5 && boss.phase == BossPhase::One {
            boss.phase = BossPhase::Two;
            boss.fire_rate_ms = ((boss.fire_rate_ms as f64 * 0.6) as u64).max(1);
            boss.bullet_damage = (boss.bullet_damage as f32 * 1.5) as i32;
            boss.ram_damage = (boss.ram_damage as f32 * 1.5) as i32;
            boss.next_special.arm(now, 0);
            log::info!("boss enraged: fire rate {} ms", boss.fire_rate_ms);
        }
    }

    let Some(boss) = ctx.boss.active() else {
        return;
    };
    if boss.next_shot.is_due(now) {
        shoot_pattern(ctx, now);
        if let Some(boss) = ctx.boss.active_mut() {
            boss.shot_pattern += 1;
            let rate = boss.fire_rate_ms;
            boss.next_shot.arm(now, rate);
        }
    }

    if let Some(boss) = ctx.boss.active() {
        if boss.phase == BossPhase::Two && boss.next_special.is_due(now) {
            special_attack(ctx, now);
            if let Some(boss) = ctx.boss.active_mut() {
                boss.next_special.arm(now, BOSS_SPECIAL_COOLDOWN_MS);
            }
        }
    }
}

/// Dispatch the current pattern from the rotating cursor
fn shoot_pattern(ctx: &mut SimulationContext, now: u64) {
    let Some(boss) = ctx.boss.active() else {
        return;
    };
    let mut patterns = base_pattern_count(ctx.difficulty);
    if boss.phase == BossPhase::Two {
        patterns += 2;
    }
    let muzzle = boss.muzzle();
    let damage = boss.bullet_damage;
    let phase = boss.phase;
    let cursor = boss.shot_pattern % patterns;
    let speed = ctx.profile().enemy_bullet_speed;
    let elapsed = ctx.clock.elapsed_ms(now) as f32;

    match cursor {
        0 => triple_bullets(ctx, muzzle, speed, damage),
        1 => fan_bullets(ctx, muzzle, speed, damage, phase),
        2 => targeted_bullet(ctx, muzzle, speed, damage),
        3 => circle_bullets(ctx, muzzle, speed, damage, phase),
        4 => spiral_bullets(ctx, muzzle, speed, damage, phase, elapsed),
        5 => line_bullets(ctx, muzzle, speed, damage),
        6 => multi_targeted_bullets(ctx, muzzle, speed, damage, phase),
        _ => rotating_bullets(ctx, muzzle, speed, damage, elapsed),
    }
}

fn boss_bullet(pos: Vec2, size: Vec2, vel: BulletVel, damage: i32) -> Bullet {
    Bullet {
        pos,
        size,
        vel,
        damage,
        flags: BulletFlags {
            boss: true,
            ..BulletFlags::default()
        },
        bounces: 0,
    }
}

/// Three parallel straight shots
fn triple_bullets(ctx: &mut SimulationContext, muzzle: Vec2, speed: f32, damage: i32) {
    for i in -1..=1 {
        ctx.enemy_bullets.push(boss_bullet(
            Vec2::new(muzzle.x + i as f32 * 25.0 - 2.0, muzzle.y),
            Vec2::new(4.0, 8.0),
            BulletVel::Axis(speed),
            damage,
        ));
    }
}

/// Downward spread; widens when enraged
fn fan_bullets(ctx: &mut SimulationContext, muzzle: Vec2, speed: f32, damage: i32, phase: BossPhase) {
    let count: i32 = if phase == BossPhase::Two {
        9
    } else if ctx.difficulty == crate::config::Difficulty::Nightmare {
        7
    } else {
        5
    };
    let half = (count - 1) / 2;
    for i in -half..=half {
        let angle = i as f32 * 0.4;
        ctx.enemy_bullets.push(boss_bullet(
            Vec2::new(muzzle.x - 2.0, muzzle.y),
            Vec2::new(4.0, 8.0),
            BulletVel::Vector(Vec2::new(angle.sin() * 3.0, angle.cos() * (speed - 1.0))),
            damage,
        ));
    }
}

/// Single shot aimed at a player
fn targeted_bullet(ctx: &mut SimulationContext, muzzle: Vec2, speed: f32, damage: i32) {
    let target = pick_target(ctx);
    let dir = (target - muzzle).normalize_or_zero();
    let mut bullet = boss_bullet(
        Vec2::new(muzzle.x - 2.0, muzzle.y),
        Vec2::new(6.0, 10.0),
        BulletVel::Vector(dir * (speed + 1.0)),
        damage,
    );
    bullet.flags.targeted = true;
    ctx.enemy_bullets.push(bullet);
}

/// Full ring; denser when enraged
fn circle_bullets(ctx: &mut SimulationContext, muzzle: Vec2, speed: f32, damage: i32, phase: BossPhase) {
    let count = if phase == BossPhase::Two { 12 } else { 8 };
    let s = speed - 2.0;
    for i in 0..count {
        let angle = (i as f32 / count as f32) * std::f32::consts::TAU;
        ctx.enemy_bullets.push(boss_bullet(
            Vec2::new(muzzle.x - 2.0, muzzle.y),
            Vec2::new(4.0, 8.0),
            BulletVel::Vector(Vec2::new(angle.cos(), angle.sin()) * s),
            damage,
        ));
    }
}

/// Arms rotate with run time, producing a spiral across shots
fn spiral_bullets(
    ctx: &mut SimulationContext,
    muzzle: Vec2,
    speed: f32,
    damage: i32,
    phase: BossPhase,
    elapsed_ms: f32,
) {
    let count = if phase == BossPhase::Two { 5 } else { 3 };
    for i in 0..count {
        let angle = (elapsed_ms * 0.01 + i as f32 * std::f32::consts::TAU / count as f32)
            .rem_euclid(std::f32::consts::TAU);
        ctx.enemy_bullets.push(boss_bullet(
            Vec2::new(muzzle.x - 2.0, muzzle.y),
            Vec2::new(4.0, 8.0),
            BulletVel::Vector(Vec2::new(angle.cos(), angle.sin()) * speed),
            damage,
        ));
    }
}

/// Horizontal wall of fast straight shots across the whole field
fn line_bullets(ctx: &mut SimulationContext, muzzle: Vec2, speed: f32, damage: i32) {
    let mut x = 0.0;
    while x < FIELD_WIDTH {
        ctx.enemy_bullets.push(boss_bullet(
            Vec2::new(x, muzzle.y),
            Vec2::new(4.0, 8.0),
            BulletVel::Axis(speed + 3.0),
            damage,
        ));
        x += 150.0;
    }
}

/// Several aimed shots spread around the target bearing
fn multi_targeted_bullets(
    ctx: &mut SimulationContext,
    muzzle: Vec2,
    speed: f32,
    damage: i32,
    phase: BossPhase,
) {
    let count = if phase == BossPhase::Two { 5 } else { 3 };
    for j in 0..count {
        let target = pick_target(ctx);
        let delta = target - muzzle;
        let offset = (j as i32 - count as i32 / 2) as f32 * 0.3;
        let angle = delta.y.atan2(delta.x) + offset;
        let s = speed + 1.0;
        let mut bullet = boss_bullet(
            Vec2::new(muzzle.x - 2.0, muzzle.y),
            Vec2::new(5.0, 8.0),
            BulletVel::Vector(Vec2::new(angle.cos(), angle.sin()) * s),
            damage,
        );
        bullet.flags.targeted = true;
        ctx.enemy_bullets.push(bullet);
    }
}

/// Four-point cross that rotates with run time
fn rotating_bullets(
    ctx: &mut SimulationContext,
    muzzle: Vec2,
    speed: f32,
    damage: i32,
    elapsed_ms: f32,
) {
    for i in 0..4 {
        let angle = i as f32 * std::f32::consts::FRAC_PI_2 + elapsed_ms * 0.005;
        ctx.enemy_bullets.push(boss_bullet(
            Vec2::new(muzzle.x - 2.0, muzzle.y),
            Vec2::new(4.0, 8.0),
            BulletVel::Vector(Vec2::new(angle.cos(), angle.sin()) * speed),
            damage,
        ));
    }
}

/// Phase-2 only: per-kind multi-wave sequence, staggered through the
/// emission queue rather than timers
fn special_attack(ctx: &mut SimulationContext, now: u64) {
    let Some(boss) = ctx.boss.active() else {
        return;
    };
    let kind = boss.kind;
    let center = boss.muzzle();
    let damage = boss.bullet_damage;
    let speed = ctx.profile().enemy_bullet_speed;

    match kind {
        BossKind::Destroyer => destroyer_special(ctx, now, center, speed, damage),
        BossKind::Watcher => watcher_special(ctx, now, center, speed, damage),
        BossKind::Spider => spider_special(ctx, now, center, speed, damage),
        BossKind::Crystal => crystal_special(ctx, now, center, speed, damage),
        BossKind::Flame => flame_special(ctx, now, center, speed, damage),
    }
}

fn special_bullet(pos: Vec2, size: Vec2, vel: BulletVel, damage: i32) -> Bullet {
    let mut b = boss_bullet(pos, size, vel, damage);
    b.flags.special = true;
    b
}

fn schedule(ctx: &mut SimulationContext, now: u64, delay: u64, bullets: Vec<Bullet>) {
    let mut fire_at = Deadline::IDLE;
    fire_at.arm(now, delay);
    ctx.pending_emissions.push(PendingEmission { fire_at, bullets });
}

/// Five staggered volleys of heavy parallel shots
fn destroyer_special(ctx: &mut SimulationContext, now: u64, center: Vec2, speed: f32, damage: i32) {
    let heavy = (damage as f32 * 1.5) as i32;
    for wave in 0..5u64 {
        let bullets = (-2..=2)
            .map(|j| {
                special_bullet(
                    Vec2::new(center.x + j as f32 * 30.0 - 3.0, center.y),
                    Vec2::new(6.0, 12.0),
                    BulletVel::Axis(speed + 2.0),
                    heavy,
                )
            })
            .collect();
        schedule(ctx, now, wave * 200, bullets);
    }
}

/// Sweeping all-around laser: eight waves, each a full 12-point ring whose
/// bearing creeps forward per wave
fn watcher_special(ctx: &mut SimulationContext, now: u64, center: Vec2, speed: f32, damage: i32) {
    const SWEEP: usize = 12;
    for wave in 0..8u64 {
        let bullets = (0..SWEEP)
            .map(|i| {
                let angle = (i as f32 / SWEEP as f32) * std::f32::consts::TAU + wave as f32 * 0.1;
                special_bullet(
                    Vec2::new(center.x - 2.0, center.y),
                    Vec2::new(4.0, 8.0),
                    BulletVel::Vector(Vec2::new(angle.cos(), angle.sin()) * (speed + 1.0)),
                    damage,
                )
            })
            .collect();
        schedule(ctx, now, wave * 250, bullets);
    }
}

/// Web traps: eight points around the hull fire inward converging volleys
fn spider_special(ctx: &mut SimulationContext, now: u64, center: Vec2, speed: f32, damage: i32) {
    const TRAPS: usize = 8;
    const TRAP_DISTANCE: f32 = 150.0;
    for wave in 0..6u64 {
        let mut bullets = Vec::with_capacity(TRAPS);
        for i in 0..TRAPS {
            let angle = (i as f32 / TRAPS as f32) * std::f32::consts::TAU;
            let trap = center + Vec2::new(angle.cos(), angle.sin()) * TRAP_DISTANCE;
            let dir = (center - trap).normalize_or_zero();
            bullets.push(special_bullet(
                trap - Vec2::splat(2.0),
                Vec2::new(4.0, 8.0),
                BulletVel::Vector(dir * speed),
                damage,
            ));
        }
        schedule(ctx, now, wave * 100, bullets);
    }
}

/// One immediate 16-point ring of bouncing shards
fn crystal_special(ctx: &mut SimulationContext, _now: u64, center: Vec2, speed: f32, damage: i32) {
    const SHARDS: usize = 16;
    for i in 0..SHARDS {
        let angle = (i as f32 / SHARDS as f32) * std::f32::consts::TAU;
        let mut b = special_bullet(
            Vec2::new(center.x - 2.0, center.y),
            Vec2::new(5.0, 10.0),
            BulletVel::Vector(Vec2::new(angle.cos(), angle.sin()) * (speed - 1.0)),
            damage,
        );
        b.bounces = 2;
        ctx.enemy_bullets.push(b);
    }
}

/// Three expanding rings that collapse back through the center
fn flame_special(ctx: &mut SimulationContext, now: u64, center: Vec2, speed: f32, damage: i32) {
    for ring in 0..3u64 {
        let radius = 80.0 + ring as f32 * 40.0;
        let count = 8 + ring as usize * 4;
        let s = speed + ring as f32;
        let bullets = (0..count)
            .map(|i| {
                let angle = (i as f32 / count as f32) * std::f32::consts::TAU;
                let start = center + Vec2::new(angle.cos(), angle.sin()) * radius;
                let mut b = special_bullet(
                    start - Vec2::splat(3.0),
                    Vec2::new(6.0, 6.0),
                    BulletVel::Vector(
                        Vec2::new(
                            (angle + std::f32::consts::PI).cos(),
                            (angle + std::f32::consts::PI).sin(),
                        ) * s,
                    ),
                    damage,
                );
                b.flags.flame = true;
                b
            })
            .collect();
        schedule(ctx, now, ring * 300, bullets);
    }
}

/// Active -> Absent once health is gone. Runs after the collision pass and
/// therefore always before the next tick's gate evaluation.
pub fn resolve_defeat(ctx: &mut SimulationContext, now: u64) {
    let Some(boss) = ctx.boss.active() else {
        return;
    };
    if boss.health > 0 {
        return;
    }
    let kind = boss.kind;
    let center = boss.center();

    ctx.push_explosion(center);
    let multiplier = ctx.profile().score_multiplier;
    ctx.add_score(BOSS_SCORE * multiplier);
    ctx.kills += 20;
    ctx.boss_kills += 1;

    // Fixed reward cluster around the wreck
    ctx.powerups.push(PowerUp::at(center.x, center.y, PowerUpKind::Health));
    ctx.powerups.push(PowerUp::at(center.x - 30.0, center.y, PowerUpKind::Power));
    ctx.powerups.push(PowerUp::at(center.x + 30.0, center.y, PowerUpKind::Bomb));
    ctx.powerups.push(PowerUp::at(center.x, center.y + 30.0, PowerUpKind::Shield));
    ctx.powerups.push(PowerUp::at(center.x - 15.0, center.y + 45.0, PowerUpKind::Bomb));

    ctx.boss = BossSlot::Absent;
    ctx.boss_gate.arm(now, BOSS_GATE_MS);
    ctx.events.push(GameEvent::BossDefeated { kind });
    log::info!("boss defeated: {} (total {})", kind.as_str(), ctx.boss_kills);
}

/// Test fixture: a minimal active boss for other modules' tests
#[cfg(test)]
pub fn test_boss_slot(ctx: &SimulationContext) -> BossSlot {
    let profile = ctx.profile();
    BossSlot::Active(Boss {
        kind: BossKind::Destroyer,
        pos: Vec2::new(FIELD_WIDTH / 2.0 - BOSS_SIZE / 2.0, BOSS_HOLD_ALTITUDE),
        size: Vec2::splat(BOSS_SIZE),
        speed: profile.boss_speed,
        health: profile.boss_health,
        max_health: profile.boss_health,
        fire_rate_ms: profile.boss_fire_rate_ms,
        bullet_damage: profile.boss_bullet_damage,
        ram_damage: profile.boss_ram_damage,
        shot_pattern: 0,
        phase: BossPhase::One,
        next_shot: Deadline::IDLE,
        next_special: Deadline::IDLE,
        banner_clear_at: Deadline::IDLE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Difficulty;

    fn ctx(difficulty: Difficulty) -> SimulationContext {
        SimulationContext::new(difficulty, 42, 0)
    }

    #[test]
    fn test_gate_opens_warning_at_100s() {
        let mut c = ctx(Difficulty::Normal);
        update(&mut c, 99_999);
        assert!(matches!(c.boss, BossSlot::Absent));

        update(&mut c, 100_000);
        assert!(matches!(c.boss, BossSlot::Warning { .. }));
        assert!(c
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::BossWarning { .. })));
    }

    #[test]
    fn test_warning_materializes_and_clears_arena() {
        let mut c = ctx(Difficulty::Normal);
        let spec = crate::config::EnemyKind::Basic.spec();
        c.enemies.push(crate::sim::state::Enemy {
            kind: crate::config::EnemyKind::Basic,
            pos: Vec2::new(10.0, 10.0),
            size: Vec2::new(spec.width, spec.height),
            speed: 3.0,
            health: spec.health,
            max_health: spec.health,
            patrol_dir: 1.0,
            hover_ticks: 0,
            float_ticks: 0,
        });
        c.enemy_bullets
            .push(Bullet::enemy_straight(Vec2::new(5.0, 5.0), 6.0));

        update(&mut c, 100_000);
        assert!(matches!(c.boss, BossSlot::Warning { .. }));
        // Warning alone does not clear the arena
        assert_eq!(c.enemies.len(), 1);

        update(&mut c, 100_000 + BOSS_WARNING_MS);
        assert!(c.boss.active().is_some());
        assert!(c.enemies.is_empty());
        assert!(c.enemy_bullets.is_empty());
    }

    #[test]
    fn test_warning_banner_outlives_materialization() {
        let mut c = ctx(Difficulty::Normal);
        update(&mut c, 100_000);
        assert_eq!(c.boss.banner_remaining_ms(100_000), BOSS_WARNING_CLEAR_MS);

        update(&mut c, 100_000 + BOSS_WARNING_MS);
        assert!(c.boss.active().is_some());
        assert_eq!(
            c.boss.banner_remaining_ms(100_000 + BOSS_WARNING_MS),
            BOSS_WARNING_CLEAR_MS - BOSS_WARNING_MS
        );
        assert_eq!(c.boss.banner_remaining_ms(100_000 + BOSS_WARNING_CLEAR_MS), 0);
    }

    #[test]
    fn test_fire_rate_scales_with_kill_history() {
        let mut c = ctx(Difficulty::Normal);
        c.boss_kills = 5;
        update(&mut c, 100_000);
        update(&mut c, 100_000 + BOSS_WARNING_MS);
        let boss = c.boss.active().unwrap();
        // 400 / 1.5 = 266
        assert_eq!(boss.fire_rate_ms, 266);
    }

    #[test]
    fn test_enrage_is_one_shot_with_exact_scaling() {
        let mut c = ctx(Difficulty::Normal);
        c.boss = test_boss_slot(&c);
        let base_rate = c.boss.active().unwrap().fire_rate_ms;

        // Drop below half health and let the attack step observe it
        c.boss.active_mut().unwrap().health = 99;
        step_attack(&mut c, 1_000);
        let boss = c.boss.active().unwrap();
        assert_eq!(boss.phase, BossPhase::Two);
        assert_eq!(boss.fire_rate_ms, (base_rate as f64 * 0.6) as u64);
        assert_eq!(boss.bullet_damage, (25.0_f32 * 1.5) as i32);
        assert_eq!(boss.ram_damage, (70.0_f32 * 1.5) as i32);

        // Re-running the step never reverts or re-applies the scaling
        let rate_after = boss.fire_rate_ms;
        step_attack(&mut c, 2_000);
        let boss = c.boss.active().unwrap();
        assert_eq!(boss.phase, BossPhase::Two);
        assert_eq!(boss.fire_rate_ms, rate_after);
    }

    #[test]
    fn test_pattern_count_grows_when_enraged() {
        let mut c = ctx(Difficulty::Normal);
        c.boss = test_boss_slot(&c);

        // Phase 1 on Normal: cursor 3 wraps to pattern 0 (triple = 3 bullets)
        c.boss.active_mut().unwrap().shot_pattern = 3;
        shoot_pattern(&mut c, 0);
        assert_eq!(c.enemy_bullets.len(), 3);

        // Phase 2: five patterns in, cursor 3 now selects the circle ring
        c.enemy_bullets.clear();
        c.boss.active_mut().unwrap().phase = BossPhase::Two;
        shoot_pattern(&mut c, 0);
        assert_eq!(c.enemy_bullets.len(), 12);
    }

    #[test]
    fn test_special_attacks_only_in_phase_two() {
        let mut c = ctx(Difficulty::Normal);
        c.boss = test_boss_slot(&c);
        c.boss.active_mut().unwrap().next_special.arm(0, 0);
        step_attack(&mut c, 10);
        assert!(c.pending_emissions.is_empty());
    }

    #[test]
    fn test_destroyer_special_schedules_five_waves() {
        let mut c = ctx(Difficulty::Normal);
        c.boss = test_boss_slot(&c);
        special_attack(&mut c, 1_000);
        assert_eq!(c.pending_emissions.len(), 5);
        assert!(c.pending_emissions.iter().all(|e| e.bullets.len() == 5));

        // Only the first volley is due immediately
        drain_emissions(&mut c, 1_000);
        assert_eq!(c.enemy_bullets.len(), 5);
        drain_emissions(&mut c, 1_000 + 4 * 200);
        assert_eq!(c.enemy_bullets.len(), 25);
        assert!(c.pending_emissions.is_empty());
        assert!(c.enemy_bullets.iter().all(|b| b.flags.boss && b.flags.special));
    }

    #[test]
    fn test_crystal_special_is_immediate_bouncing_ring() {
        let mut c = ctx(Difficulty::Normal);
        c.boss = test_boss_slot(&c);
        c.boss.active_mut().unwrap().kind = BossKind::Crystal;
        special_attack(&mut c, 0);
        assert_eq!(c.enemy_bullets.len(), 16);
        assert!(c.enemy_bullets.iter().all(|b| b.bounces == 2));
    }

    #[test]
    fn test_defeat_drops_reward_cluster_and_rearms_gate() {
        let mut c = ctx(Difficulty::Normal);
        c.boss = test_boss_slot(&c);
        c.boss.active_mut().unwrap().health = 0;

        resolve_defeat(&mut c, 200_000);
        assert!(matches!(c.boss, BossSlot::Absent));
        assert_eq!(c.boss_kills, 1);
        assert_eq!(c.kills, 20);
        assert_eq!(c.powerups.len(), 5);
        let bombs = c
            .powerups
            .iter()
            .filter(|p| p.kind == PowerUpKind::Bomb)
            .count();
        assert_eq!(bombs, 2);
        // 25000 * 1.5 on Normal
        assert_eq!(c.score as u64, 37_500);
        // Gate re-armed from the defeat stamp
        assert!(!c.boss_gate.is_due(200_000 + BOSS_GATE_MS - 1));
        assert!(c.boss_gate.is_due(200_000 + BOSS_GATE_MS));
    }

    #[test]
    fn test_defeat_not_resolved_while_alive() {
        let mut c = ctx(Difficulty::Normal);
        c.boss = test_boss_slot(&c);
        resolve_defeat(&mut c, 0);
        assert!(c.boss.active().is_some());
        assert_eq!(c.boss_kills, 0);
    }
}
