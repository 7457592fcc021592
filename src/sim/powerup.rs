//! Falling power-ups: drop movement, the timed random drip, and effects

use rand::Rng;

use super::state::{PowerUp, PowerUpKind, SimulationContext};
use crate::consts::*;

/// Constant-speed fall; pickups that reach the bottom are lost
pub fn update(ctx: &mut SimulationContext) {
    for p in &mut ctx.powerups {
        p.pos.y += POWERUP_FALL_SPEED;
    }
    ctx.powerups.retain(|p| p.pos.y < FIELD_HEIGHT);
}

/// Timed random drip: once the gate opens, each tick rolls the profile's
/// drip chance; a hit drops a random pickup and re-arms the gate
pub fn random_drip(ctx: &mut SimulationContext, now: u64) {
    if !ctx.powerup_gate.is_due(now) {
        return;
    }
    if ctx.rng.random::<f32>() >= ctx.profile().random_powerup_chance {
        return;
    }
    let kind = PowerUpKind::ALL[ctx.rng.random_range(0..PowerUpKind::ALL.len())];
    let x = ctx.rng.random_range(POWERUP_SIZE..FIELD_WIDTH - POWERUP_SIZE);
    ctx.powerups.push(PowerUp::at(x, -POWERUP_SIZE, kind));
    ctx.powerup_gate.arm(now, RANDOM_POWERUP_GATE_MS);
    log::debug!("random powerup dropped");
}

/// Apply a collected pickup. Timed effects refresh from `now` rather than
/// stacking; health restores go to every living player in dual mode.
pub fn apply_effect(ctx: &mut SimulationContext, collector: usize, kind: PowerUpKind, now: u64) {
    match kind {
        PowerUpKind::Health => {
            for player in &mut ctx.players {
                if player.health > 0 {
                    player.health = (player.health + HEALTH_RESTORE).min(PLAYER_MAX_HEALTH);
                }
            }
        }
        PowerUpKind::Power => {
            ctx.players[collector].power_until.arm(now, POWER_DURATION_MS);
        }
        PowerUpKind::Bomb => {
            ctx.bombs = (ctx.bombs + 1).min(MAX_BOMBS);
        }
        PowerUpKind::Shield => {
            ctx.players[collector].shield_until.arm(now, SHIELD_DURATION_MS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Difficulty;

    fn ctx(difficulty: Difficulty) -> SimulationContext {
        SimulationContext::new(difficulty, 42, 0)
    }

    #[test]
    fn test_pickups_fall_and_vanish_at_bottom() {
        let mut c = ctx(Difficulty::Normal);
        c.powerups
            .push(PowerUp::at(100.0, FIELD_HEIGHT - 3.0, PowerUpKind::Health));
        update(&mut c);
        assert_eq!(c.powerups.len(), 1);
        assert_eq!(c.powerups[0].pos.y, FIELD_HEIGHT - 1.0);
        update(&mut c);
        assert!(c.powerups.is_empty());
    }

    #[test]
    fn test_drip_gated_for_five_seconds() {
        let mut c = ctx(Difficulty::Normal);
        for _ in 0..10_000 {
            random_drip(&mut c, RANDOM_POWERUP_GATE_MS - 1);
        }
        assert!(c.powerups.is_empty());
    }

    #[test]
    fn test_drip_rearms_after_drop() {
        let mut c = ctx(Difficulty::Normal);
        // Roll until the drip fires once
        let mut now = RANDOM_POWERUP_GATE_MS;
        while c.powerups.is_empty() {
            random_drip(&mut c, now);
            now += TICK_MS;
        }
        assert_eq!(c.powerups.len(), 1);
        // Gate is closed again for the full window
        assert!(!c.powerup_gate.is_due(now + RANDOM_POWERUP_GATE_MS - TICK_MS - 1));
    }

    #[test]
    fn test_health_caps_and_heals_all_players() {
        let mut c = ctx(Difficulty::Dual);
        c.players[0].health = 100;
        c.players[1].health = 40;
        apply_effect(&mut c, 0, PowerUpKind::Health, 0);
        assert_eq!(c.players[0].health, PLAYER_MAX_HEALTH);
        assert_eq!(c.players[1].health, 70);
    }

    #[test]
    fn test_health_skips_downed_player() {
        let mut c = ctx(Difficulty::Dual);
        c.players[1].health = 0;
        apply_effect(&mut c, 0, PowerUpKind::Health, 0);
        assert_eq!(c.players[1].health, 0);
    }

    #[test]
    fn test_timed_effects_refresh_not_stack() {
        let mut c = ctx(Difficulty::Normal);
        apply_effect(&mut c, 0, PowerUpKind::Shield, 1_000);
        assert!(c.players[0].is_shielded(1_000 + SHIELD_DURATION_MS - 1));
        // Second pickup 2 s later restarts the window from there
        apply_effect(&mut c, 0, PowerUpKind::Shield, 3_000);
        assert!(c.players[0].is_shielded(3_000 + SHIELD_DURATION_MS - 1));
        assert!(!c.players[0].is_shielded(3_000 + SHIELD_DURATION_MS));
    }

    #[test]
    fn test_effects_are_per_player_in_dual() {
        let mut c = ctx(Difficulty::Dual);
        apply_effect(&mut c, 1, PowerUpKind::Power, 0);
        assert!(!c.players[0].is_powered(1));
        assert!(c.players[1].is_powered(1));
    }

    #[test]
    fn test_bomb_inventory_caps() {
        let mut c = ctx(Difficulty::Normal);
        for _ in 0..20 {
            apply_effect(&mut c, 0, PowerUpKind::Bomb, 0);
        }
        assert_eq!(c.bombs, MAX_BOMBS);
    }

    #[test]
    fn test_powerup_at_centers_on_x() {
        let p = PowerUp::at(100.0, 0.0, PowerUpKind::Power);
        assert_eq!(p.pos.x + p.size.x / 2.0, 100.0);
    }
}
