//! Enemy pool: spawning, movement policies, and firing shapes
//!
//! All per-kind behavior is looked up from the `EnemySpec` table; this module
//! only interprets the descriptors.

use glam::Vec2;
use rand::Rng;

use super::state::{Bullet, BulletFlags, BulletVel, Enemy, SimulationContext, aabb_overlap};
use crate::config::{EnemyKind, FiringShape, MovementPolicy};
use crate::consts::*;

/// Per-tick spawn attempt
pub fn spawn_tick(ctx: &mut SimulationContext) {
    // The boss owns the arena alone
    if ctx.boss.active().is_some() {
        return;
    }
    let profile = ctx.profile();
    if ctx.enemies.len() >= profile.max_enemies {
        return;
    }
    if ctx.rng.random::<f32>() >= profile.enemy_spawn_rate {
        return;
    }

    let ball_count = ctx
        .enemies
        .iter()
        .filter(|e| e.kind == EnemyKind::Ball)
        .count();
    let ball_allowed = ball_count < profile.max_ball_enemies;
    let kinds: Vec<EnemyKind> = EnemyKind::ALL
        .iter()
        .copied()
        .filter(|k| *k != EnemyKind::Ball || ball_allowed)
        .collect();
    let kind = kinds[ctx.rng.random_range(0..kinds.len())];
    let spec = kind.spec();
    let size = Vec2::new(spec.width, spec.height);

    // Bounded retries on the randomized position; abandon this tick on failure
    let mut pos = None;
    for _ in 0..MAX_SPAWN_ATTEMPTS {
        let candidate = Vec2::new(
            ctx.rng.random_range(0.0..FIELD_WIDTH - spec.width),
            -spec.height,
        );
        let overlaps = ctx
            .enemies
            .iter()
            .any(|e| aabb_overlap(candidate, size, e.pos, e.size));
        if !overlaps {
            pos = Some(candidate);
            break;
        }
    }
    let Some(pos) = pos else {
        log::debug!("enemy spawn abandoned: no clear position");
        return;
    };

    let speed = ctx
        .rng
        .random_range(profile.enemy_speed_min..profile.enemy_speed_max)
        * spec.speed_multiplier;
    ctx.enemies.push(Enemy {
        kind,
        pos,
        size,
        speed,
        health: spec.health,
        max_health: spec.health,
        patrol_dir: 1.0,
        hover_ticks: 0,
        float_ticks: 0,
    });
}

/// Movement and firing for every live enemy, then off-field pruning
pub fn update_tick(ctx: &mut SimulationContext) {
    let profile = ctx.profile();
    let fire_rate_base = profile.enemy_fire_rate;
    let bullet_speed_base = profile.enemy_bullet_speed;

    for i in 0..ctx.enemies.len() {
        step_movement(&mut ctx.enemies[i]);

        let spec = ctx.enemies[i].kind.spec();
        if ctx.rng.random::<f32>() < fire_rate_base * spec.fire_rate_multiplier {
            let bullet_speed = bullet_speed_base * spec.bullet_speed_multiplier;
            fire(ctx, i, bullet_speed);
        }
    }

    ctx.enemies
        .retain(|e| e.pos.y < FIELD_HEIGHT + e.size.y);
}

fn step_movement(enemy: &mut Enemy) {
    match enemy.kind.spec().movement {
        MovementPolicy::Straight => {
            enemy.pos.y += enemy.speed;
        }
        MovementPolicy::Hover => {
            if enemy.pos.y < 100.0 {
                enemy.pos.y += enemy.speed;
            } else {
                enemy.hover_ticks += 1;
                // Hold position for a beat, then creep down at half speed
                if enemy.hover_ticks > 300 {
                    enemy.pos.y += enemy.speed * 0.5;
                }
            }
        }
        MovementPolicy::Patrol => {
            if enemy.pos.y < 80.0 {
                enemy.pos.y += enemy.speed;
            } else {
                enemy.pos.x += enemy.patrol_dir * 2.0;
                if enemy.pos.x <= 0.0 || enemy.pos.x >= FIELD_WIDTH - enemy.size.x {
                    enemy.patrol_dir = -enemy.patrol_dir;
                }
            }
        }
        MovementPolicy::Float => {
            if enemy.pos.y < 120.0 {
                enemy.pos.y += enemy.speed;
            } else {
                enemy.float_ticks += 1;
                let t = enemy.float_ticks as f32;
                enemy.pos.x += (t * 0.02).sin() * 1.5;
                enemy.pos.y += (t * 0.01).sin() * 0.5;
                enemy.pos.x = enemy.pos.x.clamp(0.0, FIELD_WIDTH - enemy.size.x);
                enemy.pos.y = enemy.pos.y.clamp(50.0, FIELD_HEIGHT / 2.0);
            }
        }
    }
}

fn fire(ctx: &mut SimulationContext, enemy_idx: usize, bullet_speed: f32) {
    let enemy = &ctx.enemies[enemy_idx];
    let spec = enemy.kind.spec();
    let pos = enemy.pos;
    let size = enemy.size;
    let muzzle = Vec2::new(pos.x + size.x / 2.0 - 2.0, pos.y + size.y);

    match spec.firing {
        // Aimed shots only while the sniper sits high on the field
        FiringShape::Aimed if pos.y < 150.0 => {
            let target = pick_target(ctx);
            let from = Vec2::new(pos.x + size.x / 2.0, pos.y + size.y);
            let dir = (target - from).normalize_or_zero();
            ctx.enemy_bullets.push(Bullet {
                pos: muzzle,
                size: Vec2::new(4.0, 8.0),
                vel: BulletVel::Vector(dir * bullet_speed),
                damage: 0,
                flags: BulletFlags {
                    targeted: true,
                    sniper: true,
                    ..BulletFlags::default()
                },
                bounces: 0,
            });
        }
        FiringShape::RadialBurst => {
            let center = pos + size / 2.0 - Vec2::splat(3.0);
            let speed = bullet_speed * 0.8;
            for i in 0..8 {
                let angle = (i as f32 / 8.0) * std::f32::consts::TAU;
                ctx.enemy_bullets.push(Bullet {
                    pos: center,
                    size: Vec2::new(6.0, 6.0),
                    vel: BulletVel::Vector(Vec2::new(angle.cos(), angle.sin()) * speed),
                    damage: 0,
                    flags: BulletFlags {
                        ball: true,
                        radial: true,
                        ..BulletFlags::default()
                    },
                    bounces: 0,
                });
            }
        }
        _ => {
            ctx.enemy_bullets
                .push(Bullet::enemy_straight(muzzle, bullet_speed));
        }
    }
}

/// Aim point: player 1, or either player at random in dual mode
pub fn pick_target(ctx: &mut SimulationContext) -> Vec2 {
    let idx = if ctx.players.len() > 1 && ctx.rng.random::<f32>() < 0.5 {
        1
    } else {
        0
    };
    ctx.players[idx].center()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Difficulty;
    use crate::sim::state::SimulationContext;

    fn ctx(difficulty: Difficulty) -> SimulationContext {
        SimulationContext::new(difficulty, 42, 0)
    }

    fn make_enemy(kind: EnemyKind, pos: Vec2) -> Enemy {
        let spec = kind.spec();
        Enemy {
            kind,
            pos,
            size: Vec2::new(spec.width, spec.height),
            speed: 3.0,
            health: spec.health,
            max_health: spec.health,
            patrol_dir: 1.0,
            hover_ticks: 0,
            float_ticks: 0,
        }
    }

    #[test]
    fn test_no_spawns_while_boss_active() {
        let mut c = ctx(Difficulty::Nightmare);
        c.boss = crate::sim::boss::test_boss_slot(&c);
        for _ in 0..2_000 {
            spawn_tick(&mut c);
        }
        assert!(c.enemies.is_empty());
    }

    #[test]
    fn test_spawn_respects_population_cap() {
        let mut c = ctx(Difficulty::Easy);
        for _ in 0..20_000 {
            spawn_tick(&mut c);
        }
        assert!(!c.enemies.is_empty());
        assert!(c.enemies.len() <= c.profile().max_enemies);
    }

    #[test]
    fn test_easy_never_spawns_ball() {
        let mut c = ctx(Difficulty::Easy);
        for _ in 0..20_000 {
            spawn_tick(&mut c);
            c.enemies.retain(|e| e.kind == EnemyKind::Ball);
        }
        assert!(c.enemies.is_empty());
    }

    #[test]
    fn test_straight_enemy_descends_and_prunes() {
        let mut c = ctx(Difficulty::Normal);
        c.enemies
            .push(make_enemy(EnemyKind::Basic, Vec2::new(100.0, 0.0)));
        let y0 = c.enemies[0].pos.y;
        update_tick(&mut c);
        assert!(c.enemies[0].pos.y > y0);

        c.enemies[0].pos.y = FIELD_HEIGHT + 100.0;
        update_tick(&mut c);
        assert!(c.enemies.is_empty());
    }

    #[test]
    fn test_patrol_reverses_at_edges() {
        let mut c = ctx(Difficulty::Normal);
        let mut e = make_enemy(EnemyKind::Patrol, Vec2::new(0.0, 200.0));
        e.patrol_dir = -1.0;
        c.enemies.push(e);
        update_tick(&mut c);
        assert_eq!(c.enemies[0].patrol_dir, 1.0);
    }

    #[test]
    fn test_float_stays_in_bounds() {
        let mut c = ctx(Difficulty::Fun);
        c.enemies
            .push(make_enemy(EnemyKind::Ball, Vec2::new(400.0, 200.0)));
        for _ in 0..5_000 {
            update_tick(&mut c);
            if c.enemies.is_empty() {
                break;
            }
            let e = &c.enemies[0];
            assert!(e.pos.x >= 0.0 && e.pos.x <= FIELD_WIDTH - e.size.x);
            assert!(e.pos.y >= 50.0 && e.pos.y <= FIELD_HEIGHT / 2.0);
        }
    }

    #[test]
    fn test_ball_fires_radial_burst() {
        let mut c = ctx(Difficulty::Fun);
        c.enemies
            .push(make_enemy(EnemyKind::Ball, Vec2::new(400.0, 200.0)));
        fire(&mut c, 0, 7.0);
        assert_eq!(c.enemy_bullets.len(), 8);
        assert!(c.enemy_bullets.iter().all(|b| b.flags.ball && b.flags.radial));
    }

    #[test]
    fn test_sniper_aims_only_while_high() {
        let mut c = ctx(Difficulty::Normal);
        c.enemies
            .push(make_enemy(EnemyKind::Sniper, Vec2::new(400.0, 100.0)));
        fire(&mut c, 0, 21.0);
        assert!(c.enemy_bullets[0].flags.sniper);

        c.enemy_bullets.clear();
        c.enemies[0].pos.y = 200.0;
        fire(&mut c, 0, 21.0);
        assert!(!c.enemy_bullets[0].flags.sniper);
        assert!(matches!(c.enemy_bullets[0].vel, BulletVel::Axis(_)));
    }
}
