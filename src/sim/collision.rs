//! Collision resolution
//!
//! One pass per tick, in a fixed order: player fire against enemies, player
//! fire against the boss, enemy fire against players, enemy rams, boss ram,
//! hazards, then pickups. Every test is the shared AABB overlap.

use rand::Rng;

use super::powerup;
use super::state::{aabb_overlap, Bullet, PowerUp, PowerUpKind, SimulationContext};
use crate::consts::*;
use crate::events::GameEvent;

pub fn resolve(ctx: &mut SimulationContext, now: u64) {
    player_bullets_vs_enemies(ctx);
    player_bullets_vs_boss(ctx);
    enemy_bullets_vs_players(ctx, now);
    enemy_rams(ctx, now);
    boss_ram(ctx, now);
    hazards_vs_players(ctx);
    pickups(ctx, now);

    for player in &mut ctx.players {
        if player.health < 0 {
            player.health = 0;
        }
    }
    if ctx.players.iter().all(|p| p.health <= 0) {
        ctx.defeated = true;
    }
}

/// Damage class of an enemy projectile against a player
fn classify_damage(bullet: &Bullet) -> i32 {
    if bullet.flags.boss {
        bullet.damage
    } else if bullet.flags.targeted || bullet.flags.sniper {
        25
    } else if bullet.flags.ball {
        15
    } else {
        20
    }
}

fn player_bullets_vs_enemies(ctx: &mut SimulationContext) {
    let mut b = 0;
    'bullets: while b < ctx.player_bullets.len() {
        for e in 0..ctx.enemies.len() {
            if !aabb_overlap(
                ctx.player_bullets[b].pos,
                ctx.player_bullets[b].size,
                ctx.enemies[e].pos,
                ctx.enemies[e].size,
            ) {
                continue;
            }
            let damage = ctx.player_bullets[b].damage;
            let spark = ctx.player_bullets[b].center();
            ctx.player_bullets.swap_remove(b);
            ctx.enemies[e].health -= damage;
            if ctx.enemies[e].health <= 0 {
                destroy_enemy(ctx, e);
            } else {
                ctx.events.push(GameEvent::ImpactSpark { pos: spark });
            }
            continue 'bullets;
        }
        b += 1;
    }
}

/// Kill credit: score, explosion, and independent per-kind drop rolls
fn destroy_enemy(ctx: &mut SimulationContext, idx: usize) {
    let enemy = ctx.enemies.swap_remove(idx);
    let spec = enemy.kind.spec();
    let center = enemy.center();

    ctx.push_explosion(center);
    let multiplier = ctx.profile().score_multiplier;
    ctx.add_score(spec.score * multiplier);
    ctx.kills += 1;

    let rolls: [(f32, PowerUpKind); 4] = [
        (spec.power_drop_chance, PowerUpKind::Power),
        (spec.shield_drop_chance, PowerUpKind::Shield),
        (spec.health_drop_chance, PowerUpKind::Health),
        (spec.bomb_drop_chance, PowerUpKind::Bomb),
    ];
    for (chance, kind) in rolls {
        if ctx.rng.random::<f32>() < chance {
            ctx.powerups.push(PowerUp::at(center.x, center.y, kind));
        }
    }
}

fn player_bullets_vs_boss(ctx: &mut SimulationContext) {
    let Some(boss) = ctx.boss.active() else {
        return;
    };
    let boss_pos = boss.pos;
    let boss_size = boss.size;

    let mut b = 0;
    while b < ctx.player_bullets.len() {
        if aabb_overlap(
            ctx.player_bullets[b].pos,
            ctx.player_bullets[b].size,
            boss_pos,
            boss_size,
        ) {
            let damage = ctx.player_bullets[b].damage;
            let spark = ctx.player_bullets[b].center();
            ctx.player_bullets.swap_remove(b);
            if let Some(boss) = ctx.boss.active_mut() {
                boss.health -= damage;
            }
            ctx.events.push(GameEvent::ImpactSpark { pos: spark });
        } else {
            b += 1;
        }
    }
}

fn enemy_bullets_vs_players(ctx: &mut SimulationContext, now: u64) {
    let mut b = 0;
    'bullets: while b < ctx.enemy_bullets.len() {
        for p in 0..ctx.players.len() {
            // Shielded players ignore enemy fire entirely; the bullet flies on
            if ctx.players[p].health <= 0 || ctx.players[p].is_shielded(now) {
                continue;
            }
            if !aabb_overlap(
                ctx.enemy_bullets[b].pos,
                ctx.enemy_bullets[b].size,
                ctx.players[p].pos,
                ctx.players[p].size,
            ) {
                continue;
            }
            let damage = classify_damage(&ctx.enemy_bullets[b]);
            ctx.enemy_bullets.swap_remove(b);
            ctx.players[p].health -= damage;
            continue 'bullets;
        }
        b += 1;
    }
}

/// Ramming always destroys the enemy craft; the shield only spares the hull
fn enemy_rams(ctx: &mut SimulationContext, now: u64) {
    let mut e = 0;
    'enemies: while e < ctx.enemies.len() {
        for p in 0..ctx.players.len() {
            if ctx.players[p].health <= 0 {
                continue;
            }
            if !aabb_overlap(
                ctx.enemies[e].pos,
                ctx.enemies[e].size,
                ctx.players[p].pos,
                ctx.players[p].size,
            ) {
                continue;
            }
            let center = ctx.enemies[e].center();
            ctx.enemies.swap_remove(e);
            ctx.push_explosion(center);
            if !ctx.players[p].is_shielded(now) {
                ctx.players[p].health -= ENEMY_RAM_DAMAGE;
            }
            continue 'enemies;
        }
        e += 1;
    }
}

fn boss_ram(ctx: &mut SimulationContext, now: u64) {
    let Some(boss) = ctx.boss.active() else {
        return;
    };
    let (pos, size, ram) = (boss.pos, boss.size, boss.ram_damage);
    for p in 0..ctx.players.len() {
        if ctx.players[p].health <= 0 || ctx.players[p].is_shielded(now) {
            continue;
        }
        if aabb_overlap(pos, size, ctx.players[p].pos, ctx.players[p].size) {
            ctx.players[p].health -= ram;
        }
    }
}

/// Hazards defeat a player outright, shield or not
fn hazards_vs_players(ctx: &mut SimulationContext) {
    for p in 0..ctx.players.len() {
        if ctx.players[p].health <= 0 {
            continue;
        }
        let hit = ctx.hazards.iter().any(|h| {
            aabb_overlap(h.pos, h.size, ctx.players[p].pos, ctx.players[p].size)
        });
        if hit {
            let center = ctx.players[p].center();
            ctx.players[p].health = 0;
            ctx.push_explosion(center);
        }
    }
}

fn pickups(ctx: &mut SimulationContext, now: u64) {
    let mut i = 0;
    'pickups: while i < ctx.powerups.len() {
        for p in 0..ctx.players.len() {
            if ctx.players[p].health <= 0 {
                continue;
            }
            if !aabb_overlap(
                ctx.powerups[i].pos,
                ctx.powerups[i].size,
                ctx.players[p].pos,
                ctx.players[p].size,
            ) {
                continue;
            }
            let kind = ctx.powerups[i].kind;
            ctx.powerups.swap_remove(i);
            powerup::apply_effect(ctx, p, kind, now);
            ctx.events.push(GameEvent::PowerUpCollected { kind });
            continue 'pickups;
        }
        i += 1;
    }
}
