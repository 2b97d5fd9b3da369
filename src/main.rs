//! Colored Arrows native entry point
//!
//! Runs the simulation headless in idle/demo mode and prints the final state
//! as JSON. Rendering and touch input live in the platform front ends.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use serde::Serialize;

use colored_arrows::sim::{EngineSnapshot, Game, GameEvent, Stage, TickInput, tick};
use colored_arrows::ui::{self, Hud, Overlay};
use colored_arrows::{Tuning, levels};

#[derive(Debug, Parser)]
#[command(name = "colored-arrows", about = "Headless Colored Arrows runner")]
struct Cli {
    /// Seed for the idle player
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// JSON level table (defaults to the built-in levels)
    #[arg(long)]
    levels: Option<PathBuf>,
    /// JSON tuning file
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Number of simulation ticks to run
    #[arg(long, default_value_t = 120 * 60)]
    ticks: u64,
    /// Milliseconds per tick
    #[arg(long, default_value_t = 1000.0 / 120.0)]
    dt_ms: f32,
}

#[derive(Serialize)]
struct Report {
    ticks: u64,
    stage: Stage,
    levels_cleared: usize,
    losses: usize,
    hud: Hud,
    overlay: Option<Overlay>,
    engine: EngineSnapshot,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("Colored Arrows (native) starting...");

    let tuning = match &cli.tuning {
        Some(path) => Tuning::load_from_path(path).unwrap_or_else(|e| {
            log::warn!("{}; using default tuning", e);
            Tuning::default()
        }),
        None => Tuning::default(),
    };

    let table = match &cli.levels {
        Some(path) => levels::load_table_from_path(path).unwrap_or_else(|e| {
            log::warn!("{}; using built-in levels", e);
            levels::builtin_table()
        }),
        None => levels::builtin_table(),
    };

    let mut game = Game::from_raw(&table, tuning, cli.seed);
    log::info!("Game initialized with seed: {}", cli.seed);

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut levels_cleared = 0;
    let mut losses = 0;
    for _ in 0..cli.ticks {
        tick(&mut game, &input, cli.dt_ms);
        for event in game.drain_events() {
            match event {
                GameEvent::LevelCleared { .. } => levels_cleared += 1,
                GameEvent::PinCollided { .. } => losses += 1,
                _ => {}
            }
        }
    }

    let report = Report {
        ticks: game.time_ticks,
        stage: game.stage(),
        levels_cleared,
        losses,
        hud: ui::hud(game.progression()),
        overlay: ui::overlay(game.progression()),
        engine: game.engine().snapshot(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
