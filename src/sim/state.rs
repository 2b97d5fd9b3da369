//! Per-level pin placement state
//!
//! One `EngineState` exists per active level. It is created on level entry,
//! replaced on retry or the next level, and owned by the progression
//! controller.

use serde::{Deserialize, Serialize};

use super::clock::RotationClock;
use super::collision::{collides_with, impact_angle};
use super::level::{Color, Level};
use crate::tuning::Tuning;

const FLIGHT_EPSILON: f32 = 1e-4;

/// Result of the level so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Playing,
    /// A shot hit an attached pin
    Lost,
    /// Every pin was placed
    Won,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        self != Outcome::Playing
    }
}

/// A pin stuck to the wheel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachedPin {
    pub id: i32,
    /// Degrees in the wheel's frame, [0, 360)
    pub angle: f32,
    pub color: Color,
}

/// The pin currently travelling toward the wheel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InFlightPin {
    pub id: i32,
    pub color: Color,
    /// Flight progress, 0 at launch, 1 at impact
    #[serde(default)]
    pub progress: f32,
}

/// A pin waiting in the queue, with the color it will be fired in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedPin {
    pub id: i32,
    pub color: Color,
}

/// How a landed shot resolved
#[derive(Debug, Clone, PartialEq)]
pub enum Landing {
    Attached(AttachedPin),
    Collided { id: i32, angle: f32 },
}

/// Read-only view handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub pending: usize,
    pub attached_pins: Vec<AttachedPin>,
    pub in_flight: Option<InFlightPin>,
    pub outcome: Outcome,
    pub background_color: Color,
}

/// Complete per-level state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineState {
    level: Level,
    /// Pin ids still to fire, head first: pin_count, pin_count - 1, ..., 1
    pending: Vec<i32>,
    attached: Vec<AttachedPin>,
    in_flight: Option<InFlightPin>,
    outcome: Outcome,
    background_color: Color,
    /// Neutral background restored when the queue runs out
    neutral_background: Color,
}

impl EngineState {
    /// Start a level. Also resets the rotation clock to phase zero at the
    /// level's rotation period.
    pub fn initialize(level: &Level, tuning: &Tuning, clock: &mut dyn RotationClock) -> Self {
        let level = level.clone().sanitized(tuning.min_rotation_period_ms);
        clock.set_period_ms(level.rotation_period_ms);
        clock.reset_phase();
        Self::new(level, tuning)
    }

    fn new(level: Level, tuning: &Tuning) -> Self {
        // pin_count is at most MAX_PIN_COUNT after sanitizing
        let n = level.pin_count as i32;
        let attached = level
            .fixed_pins
            .iter()
            .map(|p| AttachedPin {
                id: p.id,
                angle: p.angle,
                color: p.color.clone(),
            })
            .collect();
        let neutral_background = tuning.neutral_background_color();
        Self {
            level,
            pending: (1..=n).rev().collect(),
            attached,
            in_flight: None,
            outcome: Outcome::Playing,
            background_color: neutral_background.clone(),
            neutral_background,
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn pending(&self) -> &[i32] {
        &self.pending
    }

    pub fn attached_pins(&self) -> &[AttachedPin] {
        &self.attached
    }

    pub fn in_flight(&self) -> Option<&InFlightPin> {
        self.in_flight.as_ref()
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn background_color(&self) -> &Color {
        &self.background_color
    }

    /// Shots taken so far this level, including one in flight
    pub fn shots_taken(&self) -> usize {
        self.level.pin_count as usize - self.pending.len()
    }

    /// Color of the pin fired at `index`, counting shots from 0
    pub fn color_for_sequence_index(&self, index: usize) -> Color {
        self.level.color_for_sequence_index(index)
    }

    /// True if a fire command would be accepted right now
    pub fn can_fire(&self) -> bool {
        !self.outcome.is_terminal() && !self.pending.is_empty() && self.in_flight.is_none()
    }

    /// Begin a shot: pop the head of the queue and put it in flight.
    ///
    /// Returns false (and changes nothing) if the level is over, the queue is
    /// empty, or a pin is already in flight.
    pub fn launch(&mut self) -> bool {
        if !self.can_fire() {
            return false;
        }
        let index = self.shots_taken();
        let id = self.pending.remove(0);
        let color = self.color_for_sequence_index(index);
        log::debug!("Launching pin {} (shot {})", id, index);
        self.in_flight = Some(InFlightPin {
            id,
            color,
            progress: 0.0,
        });
        true
    }

    /// Move the in-flight pin along; returns true once it has arrived
    pub fn advance_flight(&mut self, dt_ms: f32, duration_ms: f32) -> bool {
        match self.in_flight.as_mut() {
            Some(pin) => {
                let step = if duration_ms > 0.0 { dt_ms / duration_ms } else { 1.0 };
                pin.progress += step.max(0.0);
                // Absorb rounding from summing many small steps
                if pin.progress >= 1.0 - FLIGHT_EPSILON {
                    pin.progress = 1.0;
                }
                pin.progress >= 1.0
            }
            None => false,
        }
    }

    /// Resolve the in-flight pin against the wheel rotation sampled at impact.
    ///
    /// Returns `None` when no pin is in flight.
    pub fn land(&mut self, rotation_sample: f32, tuning: &Tuning) -> Option<Landing> {
        let pin = self.in_flight.take()?;
        let angle = impact_angle(rotation_sample, tuning.launch_direction_deg);

        if collides_with(angle, &self.attached, tuning.collision_threshold_deg) {
            log::debug!("Pin {} collided at {:.1}", pin.id, angle);
            self.outcome = Outcome::Lost;
            return Some(Landing::Collided { id: pin.id, angle });
        }

        let attached = AttachedPin {
            id: pin.id,
            angle,
            color: pin.color,
        };
        log::debug!("Pin {} attached at {:.1}", attached.id, angle);
        self.attached.push(attached.clone());

        if self.pending.is_empty() {
            self.outcome = Outcome::Won;
            self.background_color = self.neutral_background.clone();
        } else {
            self.background_color = self.color_for_sequence_index(self.shots_taken());
        }
        Some(Landing::Attached(attached))
    }

    /// Fire and resolve in one step with the given rotation sample.
    ///
    /// Ignored commands leave the state untouched and report the current outcome.
    pub fn fire(&mut self, rotation_sample: f32, tuning: &Tuning) -> Outcome {
        if self.launch() {
            self.land(rotation_sample, tuning);
        }
        self.outcome
    }

    /// Up to `n` queued pins with their colors, head first. The pin in
    /// flight has already left the queue.
    pub fn upcoming(&self, n: usize) -> Vec<QueuedPin> {
        let base = self.shots_taken();
        self.pending
            .iter()
            .take(n)
            .enumerate()
            .map(|(i, &id)| QueuedPin {
                id,
                color: self.color_for_sequence_index(base + i),
            })
            .collect()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            pending: self.pending.len(),
            attached_pins: self.attached.clone(),
            in_flight: self.in_flight.clone(),
            outcome: self.outcome,
            background_color: self.background_color.clone(),
        }
    }
}
