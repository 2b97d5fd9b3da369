//! Wheel rotation clock
//!
//! The simulation never animates the wheel itself; it samples an angle from a
//! clock. `PhaseClock` is the native implementation: a phase accumulator
//! advanced by the fixed-step scheduler.

use serde::{Deserialize, Serialize};

use crate::normalize_angle;

/// Source of the wheel's current rotation
pub trait RotationClock {
    /// Current wheel angle in degrees, [0, 360)
    fn current_angle_degrees(&self) -> f32;

    /// Restart from phase zero
    fn reset_phase(&mut self);

    /// Change the time for one full revolution. Does not touch the phase.
    fn set_period_ms(&mut self, period_ms: u32);
}

/// Linear, continuously advancing rotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseClock {
    /// Fraction of a revolution completed, [0, 1)
    phase: f64,
    period_ms: u32,
}

impl PhaseClock {
    pub fn new(period_ms: u32) -> Self {
        Self {
            phase: 0.0,
            period_ms: period_ms.max(1),
        }
    }

    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Advance the rotation by `dt_ms` milliseconds
    pub fn advance(&mut self, dt_ms: f32) {
        if dt_ms > 0.0 && dt_ms.is_finite() {
            self.phase = (self.phase + dt_ms as f64 / self.period_ms as f64).fract();
        }
    }

    /// Angle the wheel will be at after another `dt_ms` milliseconds
    pub fn angle_after(&self, dt_ms: f32) -> f32 {
        let phase = self.phase + dt_ms.max(0.0) as f64 / self.period_ms as f64;
        normalize_angle((phase.fract() * 360.0) as f32)
    }
}

impl Default for PhaseClock {
    fn default() -> Self {
        Self::new(crate::consts::DEFAULT_ROTATION_PERIOD_MS)
    }
}

impl RotationClock for PhaseClock {
    fn current_angle_degrees(&self) -> f32 {
        normalize_angle((self.phase * 360.0) as f32)
    }

    fn reset_phase(&mut self) {
        self.phase = 0.0;
    }

    fn set_period_ms(&mut self, period_ms: u32) {
        self.period_ms = period_ms.max(1);
    }
}

/// A clock stuck at a single angle, for headless callers that supply their own samples
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedClock(pub f32);

impl RotationClock for FixedClock {
    fn current_angle_degrees(&self) -> f32 {
        normalize_angle(self.0)
    }

    fn reset_phase(&mut self) {
        self.0 = 0.0;
    }

    fn set_period_ms(&mut self, _period_ms: u32) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_clock_advances_linearly() {
        let mut clock = PhaseClock::new(4000);
        assert_eq!(clock.current_angle_degrees(), 0.0);
        clock.advance(1000.0);
        assert!((clock.current_angle_degrees() - 90.0).abs() < 1e-3);
        // Wraps past a full turn
        clock.advance(3500.0);
        assert!((clock.current_angle_degrees() - 45.0).abs() < 1e-3);
    }

    #[test]
    fn test_reset_phase() {
        let mut clock = PhaseClock::new(1000);
        clock.advance(300.0);
        clock.reset_phase();
        assert_eq!(clock.current_angle_degrees(), 0.0);
    }

    #[test]
    fn test_angle_after_predicts_without_advancing() {
        let mut clock = PhaseClock::new(2000);
        clock.advance(500.0);
        let predicted = clock.angle_after(250.0);
        assert!((predicted - 135.0).abs() < 1e-3);
        assert!((clock.current_angle_degrees() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_ignores_bad_dt() {
        let mut clock = PhaseClock::new(1000);
        clock.advance(-50.0);
        clock.advance(f32::NAN);
        assert_eq!(clock.current_angle_degrees(), 0.0);
    }
}
