//! Level progression across the level table
//!
//! Stages:
//! - `Playing(n)`: level n (1-based) is active, possibly already lost
//! - `LevelCleared(n)`: level n was won, waiting for "advance"
//! - `AllComplete`: the last level was cleared, waiting for "restart"
//!
//! Every entry into `Playing(n)` builds a fresh `EngineState` and restarts the
//! rotation clock from phase zero.

use serde::{Deserialize, Serialize};

use super::clock::RotationClock;
use super::level::{Level, RawLevel, normalize_table};
use super::state::{EngineState, Outcome};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Playing(usize),
    LevelCleared(usize),
    AllComplete,
}

/// Across-level controller. Holds the only reference to the active level's
/// engine state.
#[derive(Debug, Clone)]
pub struct Progression {
    levels: Vec<Level>,
    stage: Stage,
    /// 1-based, always within [1, levels.len()]
    current: usize,
    engine: EngineState,
}

impl Progression {
    /// Start at level 1. An empty table is replaced by one default level.
    pub fn new(levels: Vec<Level>, tuning: &Tuning, clock: &mut dyn RotationClock) -> Self {
        let levels = if levels.is_empty() {
            normalize_table(&[], tuning.min_rotation_period_ms)
        } else {
            levels
                .into_iter()
                .map(|l| l.sanitized(tuning.min_rotation_period_ms))
                .collect()
        };
        let engine = EngineState::initialize(&levels[0], tuning, clock);
        log::info!("Starting level 1/{}", levels.len());
        Self {
            levels,
            stage: Stage::Playing(1),
            current: 1,
            engine,
        }
    }

    /// Normalize a raw table and start at level 1
    pub fn from_raw(raw: &[RawLevel], tuning: &Tuning, clock: &mut dyn RotationClock) -> Self {
        Self::new(
            normalize_table(raw, tuning.min_rotation_period_ms),
            tuning,
            clock,
        )
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn current_level(&self) -> usize {
        self.current
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn is_last_level(&self) -> bool {
        self.current == self.levels.len()
    }

    pub fn engine(&self) -> &EngineState {
        &self.engine
    }

    /// Mutable access for shot commands. Call `on_outcome` after a shot lands.
    pub fn engine_mut(&mut self) -> &mut EngineState {
        &mut self.engine
    }

    fn enter(&mut self, level: usize, tuning: &Tuning, clock: &mut dyn RotationClock) {
        self.current = level.clamp(1, self.levels.len());
        self.engine = EngineState::initialize(&self.levels[self.current - 1], tuning, clock);
        self.stage = Stage::Playing(self.current);
        log::info!("Starting level {}/{}", self.current, self.levels.len());
    }

    /// React to the engine's outcome. Moves `Playing` to `LevelCleared` on a win.
    pub fn on_outcome(&mut self) -> Stage {
        if let Stage::Playing(n) = self.stage {
            if self.engine.outcome() == Outcome::Won {
                log::info!("Level {} cleared", n);
                self.stage = Stage::LevelCleared(n);
            }
        }
        self.stage
    }

    /// `LevelCleared(n)` to the next level, or to `AllComplete` after the last one
    pub fn advance(&mut self, tuning: &Tuning, clock: &mut dyn RotationClock) -> bool {
        let Stage::LevelCleared(n) = self.stage else {
            return false;
        };
        if n < self.levels.len() {
            self.enter(n + 1, tuning, clock);
        } else {
            log::info!("All {} levels complete", self.levels.len());
            self.stage = Stage::AllComplete;
        }
        true
    }

    /// `AllComplete` back to level 1
    pub fn restart(&mut self, tuning: &Tuning, clock: &mut dyn RotationClock) -> bool {
        if self.stage != Stage::AllComplete {
            return false;
        }
        log::info!("Restarting from level 1");
        self.enter(1, tuning, clock);
        true
    }

    /// Start over from level 1. Not available from `AllComplete`.
    pub fn reset(&mut self, tuning: &Tuning, clock: &mut dyn RotationClock) -> bool {
        if self.stage == Stage::AllComplete {
            return false;
        }
        log::info!("Resetting to level 1");
        self.enter(1, tuning, clock);
        true
    }

    /// Replay the current level from scratch
    pub fn retry(&mut self, tuning: &Tuning, clock: &mut dyn RotationClock) -> bool {
        let Stage::Playing(n) = self.stage else {
            return false;
        };
        log::info!("Retrying level {}", n);
        self.enter(n, tuning, clock);
        true
    }

    /// The end-of-level primary button: advance when cleared, restart when all complete
    pub fn advance_or_restart(&mut self, tuning: &Tuning, clock: &mut dyn RotationClock) -> bool {
        match self.stage {
            Stage::LevelCleared(_) => self.advance(tuning, clock),
            Stage::AllComplete => self.restart(tuning, clock),
            Stage::Playing(_) => false,
        }
    }
}
