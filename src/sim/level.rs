//! Level configuration and normalization
//!
//! Level tables come from outside the simulation and may be malformed. Every
//! field of a `RawLevel` is kept as loose JSON and folded into a fully
//! defaulted `Level` once, at load time, so nothing downstream has to branch
//! on missing data.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::*;
use crate::normalize_angle;

/// A display color (CSS-style hex string, e.g. `#FF6347`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub String);

impl Color {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Color {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Level definition as supplied by a level table. Field names match the
/// table format; any of them may be absent or of the wrong type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawLevel {
    #[serde(default)]
    pub pins: Value,
    #[serde(default)]
    pub speed: Value,
    #[serde(default)]
    pub colors: Value,
    #[serde(default, rename = "pinColors")]
    pub pin_colors: Value,
    #[serde(default, rename = "fixedPins")]
    pub fixed_pins: Value,
}

impl RawLevel {
    /// Build a raw level from any JSON value; non-objects yield an all-default level
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

/// A pin attached to the wheel before the level starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedPin {
    pub id: i32,
    /// Degrees in [0, 360)
    pub angle: f32,
    pub color: Color,
}

/// A fully normalized level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Pins to place to clear the level (>= 1)
    pub pin_count: u32,
    /// Time for one full wheel revolution (ms)
    pub rotation_period_ms: u32,
    /// Wheel segment colors (non-empty)
    pub palette: Vec<Color>,
    /// Explicit color per shot index; empty means cycle through `palette`
    pub pin_color_sequence: Vec<Color>,
    pub fixed_pins: Vec<FixedPin>,
}

impl Default for Level {
    fn default() -> Self {
        normalize_level(&RawLevel::default(), MIN_ROTATION_PERIOD_MS)
    }
}

impl Level {
    /// Re-apply the normalization bounds to a level built in code rather
    /// than loaded from a table
    pub fn sanitized(mut self, min_rotation_period_ms: u32) -> Self {
        if self.pin_count == 0 {
            log::warn!("Level has no pins, using {}", DEFAULT_PIN_COUNT);
            self.pin_count = DEFAULT_PIN_COUNT;
        }
        self.pin_count = self.pin_count.min(MAX_PIN_COUNT);
        if self.rotation_period_ms == 0 {
            self.rotation_period_ms = DEFAULT_ROTATION_PERIOD_MS;
        }
        self.rotation_period_ms = self.rotation_period_ms.max(min_rotation_period_ms);
        if self.palette.is_empty() {
            log::warn!("Level has an empty palette, using default colors");
            self.palette = DEFAULT_PALETTE.iter().map(|&c| Color::new(c)).collect();
        }
        for pin in &mut self.fixed_pins {
            pin.angle = if pin.angle.is_finite() { normalize_angle(pin.angle) } else { 0.0 };
        }
        self
    }

    /// Color of the pin fired at `index` (0-based count of shots taken so far)
    pub fn color_for_sequence_index(&self, index: usize) -> Color {
        let colors = if self.pin_color_sequence.is_empty() {
            &self.palette
        } else {
            &self.pin_color_sequence
        };
        // palette is non-empty by construction
        colors
            .get(index % colors.len().max(1))
            .cloned()
            .unwrap_or_else(|| Color::new(DEFAULT_PALETTE[0]))
    }
}

/// Read a number the way a loosely typed table would: numbers and numeric strings
fn as_number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

fn string_colors(v: &Value) -> Option<Vec<Color>> {
    v.as_array().map(|items| {
        items
            .iter()
            .filter_map(|c| c.as_str().map(Color::new))
            .collect()
    })
}

/// Normalize a raw level, substituting defaults for malformed fields
pub fn normalize_level(raw: &RawLevel, min_rotation_period_ms: u32) -> Level {
    let pin_count = match as_number(&raw.pins).map(f64::floor) {
        Some(n) if n >= 1.0 => (n.min(MAX_PIN_COUNT as f64)) as u32,
        _ => {
            if !raw.pins.is_null() {
                log::warn!("Invalid pin count {}, using {}", raw.pins, DEFAULT_PIN_COUNT);
            }
            DEFAULT_PIN_COUNT
        }
    };

    let rotation_period_ms = match as_number(&raw.speed) {
        Some(ms) if ms > 0.0 => {
            (ms.round().min(u32::MAX as f64) as u32).max(min_rotation_period_ms)
        }
        _ => {
            if !raw.speed.is_null() {
                log::warn!(
                    "Invalid rotation period {}, using {}ms",
                    raw.speed,
                    DEFAULT_ROTATION_PERIOD_MS
                );
            }
            DEFAULT_ROTATION_PERIOD_MS.max(min_rotation_period_ms)
        }
    };

    let palette = match string_colors(&raw.colors) {
        Some(colors) if !colors.is_empty() => colors,
        _ => {
            if !raw.colors.is_null() {
                log::warn!("Invalid palette, using default colors");
            }
            DEFAULT_PALETTE.iter().map(|&c| Color::new(c)).collect()
        }
    };

    let pin_color_sequence = string_colors(&raw.pin_colors).unwrap_or_default();

    let fixed_pins = raw
        .fixed_pins
        .as_array()
        .map(|pins| {
            pins.iter()
                .enumerate()
                .map(|(i, p)| FixedPin {
                    id: p
                        .get("id")
                        .and_then(Value::as_i64)
                        .and_then(|id| i32::try_from(id).ok())
                        .unwrap_or(-(i as i32 + 1)),
                    angle: normalize_angle(
                        p.get("angle").and_then(as_number).unwrap_or(0.0) as f32,
                    ),
                    color: p
                        .get("color")
                        .and_then(Value::as_str)
                        .filter(|c| !c.is_empty())
                        .map(Color::new)
                        .unwrap_or_else(|| palette[i % palette.len()].clone()),
                })
                .collect()
        })
        .unwrap_or_default();

    Level {
        pin_count,
        rotation_period_ms,
        palette,
        pin_color_sequence,
        fixed_pins,
    }
}

/// Normalize a whole level table. An empty table yields a single default level.
pub fn normalize_table(raw: &[RawLevel], min_rotation_period_ms: u32) -> Vec<Level> {
    if raw.is_empty() {
        log::warn!("Level table is empty, using a single default level");
        return vec![normalize_level(&RawLevel::default(), min_rotation_period_ms)];
    }
    raw.iter()
        .map(|r| normalize_level(r, min_rotation_period_ms))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(v: Value) -> RawLevel {
        RawLevel::from_value(v)
    }

    #[test]
    fn test_well_formed_level() {
        let level = normalize_level(
            &raw(json!({
                "pins": 6,
                "speed": 4000,
                "colors": ["#A", "#B"],
                "pinColors": ["#C"],
                "fixedPins": [{ "angle": 90, "id": 0, "color": "#D" }],
            })),
            MIN_ROTATION_PERIOD_MS,
        );
        assert_eq!(level.pin_count, 6);
        assert_eq!(level.rotation_period_ms, 4000);
        assert_eq!(level.palette, vec![Color::from("#A"), Color::from("#B")]);
        assert_eq!(level.pin_color_sequence, vec![Color::from("#C")]);
        assert_eq!(
            level.fixed_pins,
            vec![FixedPin { id: 0, angle: 90.0, color: Color::from("#D") }]
        );
    }

    #[test]
    fn test_malformed_fields_get_defaults() {
        let level = normalize_level(
            &raw(json!({
                "pins": "lots",
                "speed": [1, 2],
                "colors": [],
                "pinColors": "red",
                "fixedPins": { "angle": 0 },
            })),
            MIN_ROTATION_PERIOD_MS,
        );
        assert_eq!(level.pin_count, DEFAULT_PIN_COUNT);
        assert_eq!(level.rotation_period_ms, DEFAULT_ROTATION_PERIOD_MS);
        assert_eq!(level.palette.len(), 3);
        assert_eq!(level.palette[0], Color::from("#FF6347"));
        assert!(level.pin_color_sequence.is_empty());
        assert!(level.fixed_pins.is_empty());
    }

    #[test]
    fn test_non_object_level() {
        let level = normalize_level(&raw(json!(42)), MIN_ROTATION_PERIOD_MS);
        assert_eq!(level, Level::default());
        assert_eq!(level.pin_count, 5);
    }

    #[test]
    fn test_numeric_strings_and_bounds() {
        let level = normalize_level(
            &raw(json!({ "pins": "7.9", "speed": "20" })),
            MIN_ROTATION_PERIOD_MS,
        );
        assert_eq!(level.pin_count, 7);
        // Clamped to the minimum period
        assert_eq!(level.rotation_period_ms, MIN_ROTATION_PERIOD_MS);

        let level = normalize_level(&raw(json!({ "pins": 0, "speed": -5 })), 100);
        assert_eq!(level.pin_count, DEFAULT_PIN_COUNT);
        assert_eq!(level.rotation_period_ms, DEFAULT_ROTATION_PERIOD_MS);

        let level = normalize_level(&raw(json!({ "pins": 1e12 })), 100);
        assert_eq!(level.pin_count, MAX_PIN_COUNT);
    }

    #[test]
    fn test_fixed_pin_defaults() {
        let level = normalize_level(
            &raw(json!({
                "colors": ["#A", "#B"],
                "fixedPins": [{ "angle": "x" }, { "angle": -30 }, null],
            })),
            MIN_ROTATION_PERIOD_MS,
        );
        let pins = &level.fixed_pins;
        assert_eq!(pins.len(), 3);
        assert_eq!((pins[0].id, pins[0].angle), (-1, 0.0));
        assert_eq!(pins[0].color, Color::from("#A"));
        assert_eq!((pins[1].id, pins[1].angle), (-2, 330.0));
        assert_eq!(pins[1].color, Color::from("#B"));
        assert_eq!((pins[2].id, pins[2].angle), (-3, 0.0));
        assert_eq!(pins[2].color, Color::from("#A"));
    }

    #[test]
    fn test_sanitized_restores_bounds() {
        let level = Level {
            pin_count: 0,
            rotation_period_ms: 0,
            palette: Vec::new(),
            pin_color_sequence: Vec::new(),
            fixed_pins: vec![FixedPin { id: 0, angle: -90.0, color: Color::from("#A") }],
        }
        .sanitized(MIN_ROTATION_PERIOD_MS);
        assert_eq!(level.pin_count, DEFAULT_PIN_COUNT);
        assert_eq!(level.rotation_period_ms, DEFAULT_ROTATION_PERIOD_MS);
        assert_eq!(level.palette.len(), DEFAULT_PALETTE.len());
        assert_eq!(level.fixed_pins[0].angle, 270.0);

        let level = Level { pin_count: u32::MAX, rotation_period_ms: 5, ..Level::default() }
            .sanitized(MIN_ROTATION_PERIOD_MS);
        assert_eq!(level.pin_count, MAX_PIN_COUNT);
        assert_eq!(level.rotation_period_ms, MIN_ROTATION_PERIOD_MS);

        // Already normalized levels pass through untouched
        assert_eq!(Level::default().sanitized(MIN_ROTATION_PERIOD_MS), Level::default());
    }

    #[test]
    fn test_empty_table_gets_default_level() {
        let table = normalize_table(&[], MIN_ROTATION_PERIOD_MS);
        assert_eq!(table, vec![Level::default()]);
    }

    #[test]
    fn test_color_sequence_falls_back_to_palette() {
        let level = normalize_level(
            &raw(json!({ "colors": ["#A", "#B", "#C"] })),
            MIN_ROTATION_PERIOD_MS,
        );
        assert_eq!(level.color_for_sequence_index(0), Color::from("#A"));
        assert_eq!(level.color_for_sequence_index(4), Color::from("#B"));

        let level = normalize_level(
            &raw(json!({ "colors": ["#A"], "pinColors": ["#X", "#Y"] })),
            MIN_ROTATION_PERIOD_MS,
        );
        assert_eq!(level.color_for_sequence_index(3), Color::from("#Y"));
    }
}
