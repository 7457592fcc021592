//! Fun-mode field effects: gravity wells and falling hazards
//!
//! Wells act on projectiles only. A bullet inside the inner radius is
//! destroyed; inside the outer ring it is decelerated, harder toward the
//! center, and the slowdown is a one-way ratchet: leaving the ring never
//! restores speed.

use glam::Vec2;
use rand::Rng;

use super::state::{aabb_overlap, Bullet, BulletVel, GravityWell, Hazard, SimulationContext};
use crate::clock::Deadline;
use crate::consts::*;

/// Expire old wells and roll a spawn once the gate opens
pub fn update_wells(ctx: &mut SimulationContext, now: u64) {
    ctx.wells.retain(|w| !w.expires.is_due(now));

    if !ctx.well_gate.is_due(now) {
        return;
    }
    ctx.well_gate.arm(now, WELL_SPAWN_GATE_MS);
    if ctx.rng.random::<f32>() >= ctx.profile().well_spawn_rate {
        return;
    }

    // Upper half only, away from the side edges, not on top of another well
    for _ in 0..MAX_SPAWN_ATTEMPTS {
        let center = Vec2::new(
            ctx.rng.random_range(100.0..FIELD_WIDTH - 100.0),
            ctx.rng.random_range(50.0..FIELD_HEIGHT / 2.0 + 50.0),
        );
        let clear = ctx
            .wells
            .iter()
            .all(|w| w.center.distance(center) > WELL_OUTER_RADIUS * 2.0);
        if clear {
            let mut expires = Deadline::IDLE;
            expires.arm(now, WELL_LIFE_MS);
            ctx.wells.push(GravityWell {
                center,
                inner_radius: WELL_INNER_RADIUS,
                outer_radius: WELL_OUTER_RADIUS,
                expires,
            });
            log::debug!("gravity well spawned at {center}");
            return;
        }
    }
    log::debug!("gravity well placement abandoned, field crowded");
}

/// Apply every live well to one bullet. Returns true when the bullet was
/// swallowed by an inner radius.
pub fn apply_wells(wells: &[GravityWell], bullet: &mut Bullet, now: u64) -> bool {
    for well in wells {
        if well.expires.is_due(now) {
            continue;
        }
        let distance = bullet.center().distance(well.center);
        if distance < well.inner_radius {
            return true;
        }
        if distance < well.outer_radius {
            // Deceleration grows toward the center, floored at minimum speed
            let ratio = ((distance - well.inner_radius)
                / (well.outer_radius - well.inner_radius))
                .clamp(0.0, 1.0);
            let factor = 0.92 + ratio * 0.06;
            match &mut bullet.vel {
                BulletVel::Axis(speed) => {
                    let slowed = *speed * factor;
                    if slowed.abs() >= BULLET_MIN_SPEED {
                        *speed = slowed;
                    }
                }
                BulletVel::Vector(v) => {
                    let slowed = *v * factor;
                    if slowed.length() >= BULLET_MIN_SPEED {
                        *v = slowed;
                    }
                }
            }
        }
    }
    false
}

/// Advance hazards, destroy enemies they touch, roll spawns
pub fn update_hazards(ctx: &mut SimulationContext, now: u64) {
    for h in &mut ctx.hazards {
        h.pos.y += h.speed;
        h.rotation += h.rotation_speed;
    }

    // Hazards grind through enemy craft with no score or drops
    let mut i = 0;
    while i < ctx.enemies.len() {
        let hit = ctx.hazards.iter().any(|h| {
            aabb_overlap(h.pos, h.size, ctx.enemies[i].pos, ctx.enemies[i].size)
        });
        if hit {
            let center = ctx.enemies[i].center();
            ctx.enemies.swap_remove(i);
            ctx.push_explosion(center);
        } else {
            i += 1;
        }
    }

    ctx.hazards.retain(|h| h.pos.y < FIELD_HEIGHT + h.size.y);

    if !ctx.hazard_gate.is_due(now) {
        return;
    }
    ctx.hazard_gate.arm(now, HAZARD_SPAWN_GATE_MS);
    if ctx.rng.random::<f32>() >= ctx.profile().hazard_spawn_rate {
        return;
    }
    let x = ctx.rng.random_range(0.0..FIELD_WIDTH - HAZARD_SIZE);
    let speed = 3.0 + ctx.rng.random::<f32>() * 2.0;
    let rotation_speed = (ctx.rng.random::<f32>() - 0.5) * 0.1;
    ctx.hazards.push(Hazard {
        pos: Vec2::new(x, -HAZARD_SIZE),
        size: Vec2::splat(HAZARD_SIZE),
        speed,
        rotation: 0.0,
        rotation_speed,
    });
    log::debug!("hazard spawned at x {x:.0}");
}
