//! Deterministic simulation module
//!
//! All gameplay rules live here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (idle mode)
//! - The wheel angle is only ever sampled from a `RotationClock`
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod level;
pub mod progression;
pub mod state;
pub mod tick;

pub use clock::{FixedClock, PhaseClock, RotationClock};
pub use collision::{collides_with, first_collision, impact_angle};
pub use level::{Color, FixedPin, Level, RawLevel, normalize_level, normalize_table};
pub use progression::{Progression, Stage};
pub use state::{
    AttachedPin, EngineSnapshot, EngineState, InFlightPin, Landing, Outcome, QueuedPin,
};
pub use tick::{Game, GameEvent, TickInput, tick};
