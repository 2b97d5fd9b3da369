//! Pin collision on the rotating wheel
//!
//! Shots always travel along the same screen line toward the wheel centre, so
//! where a pin lands on the wheel depends only on the wheel's rotation at
//! impact. Two pins collide when they land closer than a fixed angular
//! threshold.

use super::state::AttachedPin;
use crate::{angular_distance, normalize_angle};

/// Angle in the wheel's own frame where a shot lands.
///
/// `launch_direction` is where shots arrive from, in screen angles (180 when
/// they come up from the bottom of a screen with 0 at the top).
#[inline]
pub fn impact_angle(rotation_sample: f32, launch_direction: f32) -> f32 {
    normalize_angle(launch_direction - rotation_sample)
}

/// True if a pin landing at `impact` would hit any attached pin
pub fn collides_with(impact: f32, pins: &[AttachedPin], threshold: f32) -> bool {
    pins.iter().any(|p| angular_distance(impact, p.angle) < threshold)
}

/// First attached pin hit by a pin landing at `impact`, if any
pub fn first_collision(
    impact: f32,
    pins: &[AttachedPin],
    threshold: f32,
) -> Option<&AttachedPin> {
    pins.iter().find(|p| angular_distance(impact, p.angle) < threshold)
}
