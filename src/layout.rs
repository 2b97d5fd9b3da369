//! Wheel and pin geometry for the presentation layer
//!
//! Angles are degrees, 0 at the top, increasing clockwise; cartesian
//! coordinates are relative to the wheel centre with y pointing down the
//! screen. Wheel-frame angles are turned into screen angles by adding the
//! current rotation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{EngineState, Level};
use crate::sim::level::Color;
use crate::{normalize_angle, polar_to_cartesian};

/// Distance from the wheel centre to the centre of a pin head
pub const PIN_REACH: f32 = MAIN_CIRCLE_RADIUS + PIN_LENGTH + PIN_RADIUS;
/// How far below the pin heads a shot starts
pub const LAUNCH_GAP: f32 = 2.0 * PIN_RADIUS + 40.0;

/// One palette wedge of the wheel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelSegment {
    pub inner_radius: f32,
    pub outer_radius: f32,
    /// Start angle, [0, 360)
    pub start_deg: f32,
    /// End angle, [0, 360); may be below `start_deg` when the wedge wraps past 0
    pub end_deg: f32,
    pub color: Color,
}

impl WheelSegment {
    pub fn new(
        inner_radius: f32,
        outer_radius: f32,
        start_deg: f32,
        end_deg: f32,
        color: Color,
    ) -> Self {
        Self {
            inner_radius,
            outer_radius,
            start_deg: normalize_angle(start_deg),
            end_deg: normalize_angle(end_deg),
            color,
        }
    }

    /// Angular span (handles wraparound; a full circle reports 360)
    pub fn angular_span(&self) -> f32 {
        let span = self.end_deg - self.start_deg;
        if span > 0.0 { span } else { span + 360.0 }
    }

    /// Check if an angle is within the wedge (start inclusive, end exclusive)
    pub fn contains_angle(&self, angle: f32) -> bool {
        let offset = normalize_angle(angle - self.start_deg);
        offset < self.angular_span()
    }

    /// Points along the outer edge, rotated by `rotation` degrees
    pub fn sample_outer_edge(&self, num_points: usize, rotation: f32) -> Vec<Vec2> {
        self.sample_edge(self.outer_radius, num_points, rotation)
    }

    fn sample_edge(&self, r: f32, num_points: usize, rotation: f32) -> Vec<Vec2> {
        let span = self.angular_span();
        (0..num_points)
            .map(|i| {
                let t = i as f32 / (num_points.saturating_sub(1)).max(1) as f32;
                polar_to_cartesian(r, rotation + self.start_deg + t * span)
            })
            .collect()
    }
}

/// Split the wheel into equal wedges, one per palette color
pub fn wheel_segments(level: &Level) -> Vec<WheelSegment> {
    let n = level.palette.len().max(1);
    let per = 360.0 / n as f32;
    level
        .palette
        .iter()
        .enumerate()
        .map(|(i, color)| {
            WheelSegment::new(
                0.0,
                MAIN_CIRCLE_RADIUS,
                i as f32 * per,
                (i + 1) as f32 * per,
                color.clone(),
            )
        })
        .collect()
}

/// Screen geometry of an attached pin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinGeometry {
    pub leg_start: Vec2,
    pub leg_end: Vec2,
    pub head_center: Vec2,
}

impl PinGeometry {
    /// Pin at wheel-frame `angle` on a wheel turned by `rotation`
    pub fn at(angle: f32, rotation: f32) -> Self {
        let screen = normalize_angle(angle + rotation);
        Self {
            leg_start: polar_to_cartesian(MAIN_CIRCLE_RADIUS, screen),
            leg_end: polar_to_cartesian(MAIN_CIRCLE_RADIUS + PIN_LENGTH, screen),
            head_center: polar_to_cartesian(PIN_REACH, screen),
        }
    }
}

/// Geometry of every attached pin of a level in progress
pub fn attached_pin_geometry(engine: &EngineState, rotation: f32) -> Vec<PinGeometry> {
    engine
        .attached_pins()
        .iter()
        .map(|p| PinGeometry::at(p.angle, rotation))
        .collect()
}

/// Ease-out quadratic
#[inline]
fn ease_out_quad(t: f32) -> f32 {
    t * (2.0 - t)
}

/// Position of the head of a flying pin. `progress` runs 0..=1 from launch to
/// impact; shots travel toward the wheel centre from `launch_direction`.
pub fn flight_position(progress: f32, launch_direction: f32) -> Vec2 {
    let t = ease_out_quad(progress.clamp(0.0, 1.0));
    let r = PIN_REACH + LAUNCH_GAP * (1.0 - t);
    polar_to_cartesian(r, launch_direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(colors: &[&str]) -> Level {
        Level {
            palette: colors.iter().map(|&c| Color::from(c)).collect(),
            ..Level::default()
        }
    }

    #[test]
    fn test_wheel_segments_split_evenly() {
        let segs = wheel_segments(&level(&["#A", "#B", "#C"]));
        assert_eq!(segs.len(), 3);
        assert!((segs[1].start_deg - 120.0).abs() < 1e-3);
        assert!((segs[1].angular_span() - 120.0).abs() < 1e-3);
        // The last wedge ends back at 0
        assert_eq!(segs[2].end_deg, 0.0);
        assert!(segs[2].contains_angle(300.0));
        assert!(!segs[2].contains_angle(10.0));
    }

    #[test]
    fn test_single_color_is_full_circle() {
        let segs = wheel_segments(&level(&["#A"]));
        assert_eq!(segs[0].angular_span(), 360.0);
        assert!(segs[0].contains_angle(0.0));
        assert!(segs[0].contains_angle(359.9));
    }

    #[test]
    fn test_contains_angle_wraparound() {
        let seg = WheelSegment::new(0.0, 90.0, 350.0, 10.0, Color::from("#A"));
        assert!((seg.angular_span() - 20.0).abs() < 1e-3);
        assert!(seg.contains_angle(355.0));
        assert!(seg.contains_angle(5.0));
        assert!(!seg.contains_angle(180.0));
    }

    #[test]
    fn test_sample_outer_edge() {
        let seg = WheelSegment::new(0.0, 90.0, 0.0, 90.0, Color::from("#A"));
        let pts = seg.sample_outer_edge(3, 0.0);
        assert_eq!(pts.len(), 3);
        assert!((pts[0] - Vec2::new(0.0, -90.0)).length() < 1e-3);
        assert!((pts[2] - Vec2::new(90.0, 0.0)).length() < 1e-3);
        assert!((pts[1].length() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_pin_geometry() {
        // A pin at wheel angle 180 on an unrotated wheel hangs straight down
        let g = PinGeometry::at(180.0, 0.0);
        assert!((g.head_center - Vec2::new(0.0, PIN_REACH)).length() < 1e-3);
        assert!((g.leg_start.length() - MAIN_CIRCLE_RADIUS).abs() < 1e-3);
        // Rotating the wheel carries the pin with it
        let g = PinGeometry::at(180.0, 90.0);
        assert!((g.head_center - Vec2::new(-PIN_REACH, 0.0)).length() < 1e-3);
    }

    #[test]
    fn test_attached_pin_geometry_follows_engine() {
        use crate::sim::{EngineState, FixedClock, FixedPin};
        use crate::tuning::Tuning;

        let level = Level {
            fixed_pins: vec![FixedPin { id: 0, angle: 0.0, color: Color::from("#A") }],
            ..Level::default()
        };
        let mut engine = EngineState::initialize(&level, &Tuning::default(), &mut FixedClock::default());
        engine.fire(90.0, &Tuning::default());
        let pins = attached_pin_geometry(&engine, 0.0);
        assert_eq!(pins.len(), 2);
        assert!((pins[0].head_center - Vec2::new(0.0, -PIN_REACH)).length() < 1e-3);
        // Landed at 90: to the right of the hub
        assert!((pins[1].head_center - Vec2::new(PIN_REACH, 0.0)).length() < 1e-3);
    }

    #[test]
    fn test_flight_ends_where_pin_attaches() {
        let start = flight_position(0.0, 180.0);
        let end = flight_position(1.0, 180.0);
        assert!((start.y - (PIN_REACH + LAUNCH_GAP)).abs() < 1e-3);
        assert!((end - PinGeometry::at(180.0, 0.0).head_center).length() < 1e-3);
        // Ease-out: more than half the distance covered at half time
        let mid = flight_position(0.5, 180.0);
        assert!(mid.y < start.y - LAUNCH_GAP / 2.0);
    }
}
