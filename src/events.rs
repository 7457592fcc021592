//! Per-tick signals for the rendering/UI collaborators
//!
//! The sim never touches a display; anything worth showing is queued as a
//! `GameEvent` during the tick and drained by the caller afterwards. Events
//! carry no gameplay state and feeding them back into the sim is impossible.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::BossKind;
use crate::sim::state::PowerUpKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Full explosion at an entity's center
    Explosion { pos: Vec2 },
    /// Minor impact flash where a bullet struck without a kill
    ImpactSpark { pos: Vec2 },
    /// Boss incoming banner
    BossWarning { kind: BossKind },
    BossSpawned { kind: BossKind },
    BossDefeated { kind: BossKind },
    PowerUpCollected { kind: PowerUpKind },
    BombDetonated,
    /// Emitted exactly once per run
    GameOver,
}
