//! Fixed timestep simulation tick
//!
//! Drives the rotation clock, pin flight and progression from discrete input
//! events. Events are handled one at a time, in order, each to completion.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::{PhaseClock, RotationClock};
use super::collision::{collides_with, impact_angle};
use super::level::{Level, RawLevel, normalize_table};
use super::progression::{Progression, Stage};
use super::state::{EngineState, Landing, Outcome};
use crate::tuning::Tuning;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Fire the next pin (tap)
    pub fire: bool,
    /// Replay the current level (after a loss)
    pub retry: bool,
    /// Next level, or back to level 1 when all are complete
    pub advance_or_restart: bool,
    /// Back to level 1
    pub reset: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Things the presentation layer may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { level: usize },
    PinLaunched { id: i32 },
    PinAttached { id: i32, angle: f32 },
    PinCollided { id: i32, angle: f32 },
    LevelCleared { level: usize },
    AllLevelsComplete,
}

/// Extra clearance the idle player keeps from attached pins (degrees)
const IDLE_SAFETY_MARGIN: f32 = 6.0;
/// Chance per tick that the idle player takes a clear shot
const IDLE_FIRE_CHANCE: f64 = 0.2;

/// Everything needed to run the game: progression, wheel clock and balance
#[derive(Debug, Clone)]
pub struct Game {
    pub tuning: Tuning,
    pub clock: PhaseClock,
    progression: Progression,
    rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Pending events, oldest first. Drain with `drain_events`.
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(levels: Vec<Level>, tuning: Tuning, seed: u64) -> Self {
        let mut clock = PhaseClock::default();
        let progression = Progression::new(levels, &tuning, &mut clock);
        Self {
            tuning,
            clock,
            progression,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            events: vec![GameEvent::LevelStarted { level: 1 }],
        }
    }

    pub fn from_raw(raw: &[RawLevel], tuning: Tuning, seed: u64) -> Self {
        let levels = normalize_table(raw, tuning.min_rotation_period_ms);
        Self::new(levels, tuning, seed)
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn engine(&self) -> &EngineState {
        self.progression.engine()
    }

    pub fn stage(&self) -> Stage {
        self.progression.stage()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Fire the next pin. Returns false if the shot was not accepted.
    pub fn fire(&mut self) -> bool {
        if !matches!(self.stage(), Stage::Playing(_)) {
            return false;
        }
        let engine = self.progression.engine_mut();
        if !engine.launch() {
            return false;
        }
        if let Some(pin) = engine.in_flight() {
            self.events.push(GameEvent::PinLaunched { id: pin.id });
        }
        true
    }

    /// Land the in-flight pin using the clock's current angle
    fn resolve_flight(&mut self) {
        let sample = self.clock.current_angle_degrees();
        let landing = self.progression.engine_mut().land(sample, &self.tuning);
        match landing {
            Some(Landing::Attached(pin)) => self.events.push(GameEvent::PinAttached {
                id: pin.id,
                angle: pin.angle,
            }),
            Some(Landing::Collided { id, angle }) => {
                log::info!("Level {} lost", self.progression.current_level());
                self.events.push(GameEvent::PinCollided { id, angle })
            }
            None => return,
        }
        if let Stage::LevelCleared(level) = self.progression.on_outcome() {
            self.events.push(GameEvent::LevelCleared { level });
        }
    }

    pub fn retry(&mut self) -> bool {
        let ok = self.progression.retry(&self.tuning, &mut self.clock);
        if ok {
            self.push_level_started();
        }
        ok
    }

    pub fn reset(&mut self) -> bool {
        let ok = self.progression.reset(&self.tuning, &mut self.clock);
        if ok {
            self.push_level_started();
        }
        ok
    }

    pub fn advance_or_restart(&mut self) -> bool {
        let ok = self
            .progression
            .advance_or_restart(&self.tuning, &mut self.clock);
        if ok {
            match self.stage() {
                Stage::AllComplete => self.events.push(GameEvent::AllLevelsComplete),
                _ => self.push_level_started(),
            }
        }
        ok
    }

    fn push_level_started(&mut self) {
        self.events.push(GameEvent::LevelStarted {
            level: self.progression.current_level(),
        });
    }

    /// Idle player: take a shot only when the predicted landing spot is clear
    fn idle_wants_to_fire(&mut self) -> bool {
        let engine = self.progression.engine();
        if !engine.can_fire() {
            return false;
        }
        let landing_sample = self.clock.angle_after(self.tuning.shot_duration_ms);
        let angle = impact_angle(landing_sample, self.tuning.launch_direction_deg);
        let clear = !collides_with(
            angle,
            engine.attached_pins(),
            self.tuning.collision_threshold_deg + IDLE_SAFETY_MARGIN,
        );
        clear && self.rng.random_bool(IDLE_FIRE_CHANCE)
    }
}

/// Advance the game by one fixed timestep of `dt_ms` milliseconds
pub fn tick(game: &mut Game, input: &TickInput, dt_ms: f32) {
    // Progression commands first; they rebuild the engine and reset the clock
    if input.reset {
        game.reset();
    } else if input.retry {
        game.retry();
    } else if input.advance_or_restart {
        game.advance_or_restart();
    }

    game.time_ticks += 1;
    game.clock.advance(dt_ms);

    // The pin in flight lands at the rotation reached this tick
    let duration = game.tuning.shot_duration_ms;
    if game
        .progression
        .engine_mut()
        .advance_flight(dt_ms, duration)
    {
        game.resolve_flight();
    }

    let mut input = input.clone();
    if input.idle_mode {
        match (game.stage(), game.engine().outcome()) {
            (Stage::Playing(_), Outcome::Lost) => {
                game.retry();
            }
            (Stage::LevelCleared(_) | Stage::AllComplete, _) => {
                game.advance_or_restart();
            }
            _ => input.fire = game.idle_wants_to_fire(),
        }
    }

    if input.fire && game.fire() && duration <= 0.0 {
        game.resolve_flight();
    }
}
