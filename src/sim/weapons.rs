//! Player fire, projectile motion, bombs, and the explosion pool

use glam::Vec2;

use super::field::apply_wells;
use super::state::{Bullet, BulletFlags, BulletVel, SimulationContext};
use crate::consts::*;
use crate::events::GameEvent;

/// Continuous auto-fire: each living player shoots whenever its per-player
/// shot deadline comes due
pub fn auto_fire(ctx: &mut SimulationContext, now: u64) {
    for i in 0..ctx.players.len() {
        if ctx.players[i].health <= 0 || ctx.players[i].next_shot.pending(now) {
            continue;
        }
        let powered = ctx.players[i].is_powered(now);
        let center_x = ctx.players[i].center().x;
        let top_y = ctx.players[i].pos.y;

        if powered {
            // Triple spread at boosted speed
            for offset in [-10.0, -2.0, 6.0] {
                ctx.player_bullets.push(player_bullet(
                    Vec2::new(center_x + offset, top_y),
                    PLAYER_BULLET_SPEED_POWERED,
                ));
            }
        } else {
            ctx.player_bullets.push(player_bullet(
                Vec2::new(center_x - 2.0, top_y),
                PLAYER_BULLET_SPEED,
            ));
        }
        ctx.players[i].next_shot.arm(now, PLAYER_SHOT_COOLDOWN_MS);
    }
}

fn player_bullet(pos: Vec2, speed: f32) -> Bullet {
    Bullet {
        pos,
        size: Vec2::new(4.0, 8.0),
        vel: BulletVel::Axis(speed),
        damage: PLAYER_BULLET_DAMAGE,
        flags: BulletFlags::default(),
        bounces: 0,
    }
}

/// Advance both projectile pools: wells first, then motion, then pruning
pub fn update_bullets(ctx: &mut SimulationContext, now: u64) {
    let fun = ctx.difficulty.is_fun();

    let mut i = 0;
    while i < ctx.player_bullets.len() {
        if fun && apply_wells(&ctx.wells, &mut ctx.player_bullets[i], now) {
            ctx.player_bullets.swap_remove(i);
            continue;
        }
        let b = &mut ctx.player_bullets[i];
        match b.vel {
            BulletVel::Axis(speed) => b.pos.y -= speed,
            BulletVel::Vector(v) => b.pos += v,
        }
        if b.pos.y + b.size.y < 0.0 {
            ctx.player_bullets.swap_remove(i);
        } else {
            i += 1;
        }
    }

    let mut i = 0;
    while i < ctx.enemy_bullets.len() {
        if fun && apply_wells(&ctx.wells, &mut ctx.enemy_bullets[i], now) {
            ctx.enemy_bullets.swap_remove(i);
            continue;
        }
        let b = &mut ctx.enemy_bullets[i];
        match b.vel {
            BulletVel::Axis(speed) => b.pos.y += speed,
            BulletVel::Vector(v) => b.pos += v,
        }
        bounce_walls(b);
        if off_field(b) {
            ctx.enemy_bullets.swap_remove(i);
        } else {
            i += 1;
        }
    }
}

/// Crystal shards ricochet off the side walls until their bounce budget runs out
fn bounce_walls(b: &mut Bullet) {
    if b.bounces == 0 {
        return;
    }
    if let BulletVel::Vector(v) = &mut b.vel {
        if (b.pos.x <= 0.0 && v.x < 0.0) || (b.pos.x + b.size.x >= FIELD_WIDTH && v.x > 0.0) {
            v.x = -v.x;
            b.bounces -= 1;
        }
    }
}

fn off_field(b: &Bullet) -> bool {
    b.pos.y > FIELD_HEIGHT + b.size.y
        || b.pos.y + b.size.y < -200.0
        || b.pos.x + b.size.x < -200.0
        || b.pos.x > FIELD_WIDTH + 200.0
}

/// Screen-clearing bomb: wipes regular enemies for half score, clears enemy
/// fire, and chunks the boss for a flat amount
pub fn fire_bomb(ctx: &mut SimulationContext, now: u64) {
    if ctx.bombs == 0 || ctx.bomb_cooldown.pending(now) {
        return;
    }
    ctx.bombs -= 1;
    ctx.bomb_cooldown.arm(now, BOMB_COOLDOWN_MS);

    let multiplier = ctx.profile().score_multiplier;
    let enemies = std::mem::take(&mut ctx.enemies);
    for enemy in &enemies {
        ctx.push_explosion(enemy.center());
        ctx.add_score(enemy.kind.spec().score * multiplier / 2.0);
        ctx.kills += 1;
    }
    ctx.enemy_bullets.clear();

    if let Some(boss) = ctx.boss.active_mut() {
        boss.health -= BOMB_BOSS_DAMAGE;
    }

    ctx.events.push(GameEvent::BombDetonated);
    log::debug!("bomb detonated, {} left", ctx.bombs);
}

/// Advance the explosion pool. Guarded by tick number so repeated calls in
/// one tick cannot double-age the visuals.
pub fn update_explosions(ctx: &mut SimulationContext) {
    if ctx.explosions_advanced_tick == ctx.tick_count {
        return;
    }
    ctx.explosions_advanced_tick = ctx.tick_count;
    ctx.explosions.retain_mut(|e| {
        e.life = e.life.saturating_sub(1);
        e.radius += 2.0;
        e.opacity = (e.opacity - 0.05).max(0.0);
        e.life > 0
    });
}
