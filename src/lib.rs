//! Colored Arrows - fire numbered pins into a rotating wheel
//!
//! Core modules:
//! - `sim`: Deterministic simulation (level normalization, pin placement, progression)
//! - `tuning`: Data-driven game balance
//! - `levels`: Built-in level table and JSON level loading
//! - `layout`: Wheel and pin geometry for the presentation layer
//! - `ui`: HUD, queue preview and end-of-level overlay model

pub mod layout;
pub mod levels;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use tuning::{ConfigError, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Minimum circular distance (degrees) between two pins before they collide
    pub const COLLISION_THRESHOLD_DEG: f32 = 15.0;
    /// Time a fired pin spends in flight before it lands (ms)
    pub const SHOOT_DURATION_MS: f32 = 250.0;
    /// Direction shots come from, measured like wheel angles (0 = top)
    pub const LAUNCH_DIRECTION_DEG: f32 = 180.0;

    /// Background shown when no pin is queued
    pub const NEUTRAL_BACKGROUND: &str = "#f5f5f5";

    /// Level defaults substituted for malformed config
    pub const DEFAULT_PIN_COUNT: u32 = 5;
    pub const MAX_PIN_COUNT: u32 = 100;
    pub const DEFAULT_ROTATION_PERIOD_MS: u32 = 3000;
    pub const MIN_ROTATION_PERIOD_MS: u32 = 100;
    pub const DEFAULT_PALETTE: [&str; 3] = ["#FF6347", "#6A5ACD", "#3CB371"];

    /// Wheel geometry (pixels)
    pub const MAIN_CIRCLE_RADIUS: f32 = 90.0;
    pub const PIN_RADIUS: f32 = 12.0;
    pub const PIN_LENGTH: f32 = 70.0;

    /// Number of queued pins shown under the wheel
    pub const QUEUE_PREVIEW_LEN: usize = 5;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if a >= 360.0 { 0.0 } else { a }
}

/// Minimal circular distance between two angles in degrees, in [0, 180]
#[inline]
pub fn angular_distance(a: f32, b: f32) -> f32 {
    let d = (normalize_angle(a) - normalize_angle(b)).abs();
    if d > 180.0 { 360.0 - d } else { d }
}

/// Convert a wheel angle (degrees, 0 at top, clockwise, screen y down) and radius to cartesian
#[inline]
pub fn polar_to_cartesian(r: f32, angle_deg: f32) -> Vec2 {
    let theta = (angle_deg - 90.0).to_radians();
    Vec2::new(r * theta.cos(), r * theta.sin())
}
