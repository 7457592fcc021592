//! Nova Strike headless demo
//!
//! Runs a scripted pilot through a full simulation and prints a JSON summary,
//! mainly useful for eyeballing balance and log output:
//!
//! ```text
//! nova-strike [difficulty] [seed] [ticks]
//! ```

use serde::Serialize;

use nova_strike::consts::*;
use nova_strike::sim::{DirInput, GamePhase, TickInput};
use nova_strike::{Difficulty, GameEvent, HighScores, Simulation};

#[derive(Serialize)]
struct RunSummary {
    difficulty: &'static str,
    seed: u64,
    ticks: u64,
    elapsed_ms: u64,
    phase: &'static str,
    score: u64,
    crowns: u32,
    kills: u32,
    boss_kills: u32,
    bombs_left: u32,
    player_health: Vec<i32>,
    new_best: bool,
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let difficulty = args
        .next()
        .and_then(|s| Difficulty::from_str(&s))
        .unwrap_or(Difficulty::Normal);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let ticks: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(30_000);

    log::info!(
        "demo run: {} seed {seed} for {ticks} ticks",
        difficulty.as_str()
    );

    let mut sim = Simulation::new();
    sim.start(difficulty, seed, 0);

    let mut now = 0u64;
    for tick in 1..=ticks {
        now = tick * TICK_MS;

        // Scripted pilot: weave left and right, bomb on a long period
        let weave_right = (tick / 120) % 2 == 0;
        let input = TickInput {
            p1: DirInput {
                left: !weave_right,
                right: weave_right,
                ..DirInput::default()
            },
            p2: DirInput {
                left: weave_right,
                right: !weave_right,
                ..DirInput::default()
            },
            fire_bomb: tick % 2_000 == 0,
            toggle_pause: false,
        };
        sim.tick(now, &input);

        for event in sim.take_events() {
            match event {
                GameEvent::BossWarning { kind } => log::info!("warning: {} inbound", kind.as_str()),
                GameEvent::BossSpawned { kind } => log::info!("boss on field: {}", kind.as_str()),
                GameEvent::BossDefeated { kind } => log::info!("boss down: {}", kind.as_str()),
                GameEvent::BombDetonated => log::info!("bomb away"),
                GameEvent::PowerUpCollected { kind } => log::debug!("picked up {kind:?}"),
                GameEvent::GameOver => log::info!("game over at tick {tick}"),
                GameEvent::Explosion { .. } | GameEvent::ImpactSpark { .. } => {}
            }
        }

        if sim.phase() == GamePhase::Ended {
            break;
        }
    }

    let mut highscores = HighScores::new();
    let new_best = highscores.record(difficulty, sim.score());

    let summary = RunSummary {
        difficulty: difficulty.as_str(),
        seed,
        ticks: now / TICK_MS,
        elapsed_ms: sim.elapsed_ms(now),
        phase: match sim.phase() {
            GamePhase::Idle => "idle",
            GamePhase::Running => "running",
            GamePhase::Paused => "paused",
            GamePhase::Ended => "ended",
        },
        score: sim.score(),
        crowns: sim.crowns(),
        kills: sim.kills(),
        boss_kills: sim.boss_kills(),
        bombs_left: sim.bombs(),
        player_health: (0..sim.players().len()).map(|i| sim.player_health(i)).collect(),
        new_best,
    };

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("summary serialization failed: {err}"),
    }
}
