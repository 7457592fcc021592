//! The deterministic fixed-tick combat simulation
//!
//! Submodules are leaf-first: `state` holds the entity types and the shared
//! `SimulationContext`; `enemy`, `boss`, `weapons`, `powerup`, and `field`
//! each mutate one slice of it; `collision` resolves interactions; `tick`
//! owns the per-tick order and the public `Simulation` surface.

pub mod boss;
pub mod collision;
pub mod enemy;
pub mod field;
pub mod powerup;
pub mod state;
pub mod tick;
pub mod weapons;

pub use state::{
    Boss, BossPhase, BossSlot, Bullet, BulletFlags, BulletVel, DirInput, Enemy, Explosion,
    GamePhase, GravityWell, Hazard, Player, PowerUp, PowerUpKind, SimulationContext, TickInput,
};
pub use tick::Simulation;
