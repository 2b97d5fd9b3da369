//! Level tables
//!
//! The built-in table ships with the game. External tables use the same JSON
//! shape: an array of level objects with `pins`, `speed`, `colors`,
//! `pinColors` and `fixedPins`. Anything that parses as JSON is accepted; a
//! value that is not an array is treated as an empty table.

use std::path::Path;

use serde_json::{Value, json};

use crate::sim::level::RawLevel;
use crate::tuning::ConfigError;

/// The ten levels the game ships with
pub fn builtin_table() -> Vec<RawLevel> {
    let levels = json!([
        {
            "pins": 6,
            "speed": 4000,
            "colors": ["#FF6347", "#FF8A65", "#FF7043", "#FF5722", "#E64A19", "#BF360C"],
            "pinColors": ["#FF6347", "#FF8A65", "#FF7043", "#FF5722", "#E64A19", "#BF360C"],
            "fixedPins": [{ "angle": 0, "id": 0 }],
        },
        {
            "pins": 8,
            "speed": 3800,
            "colors": repeat("#6A5ACD", 8),
            "pinColors": ["#6A5ACD", "#7B68EE", "#8470FF", "#6A5ACD", "#7B68EE", "#8470FF", "#6A5ACD", "#7B68EE"],
            "fixedPins": [{ "angle": 0, "id": 0 }, { "angle": 180, "id": 0 }],
        },
        {
            "pins": 10,
            "speed": 3600,
            "colors": repeat("#3CB371", 10),
            "pinColors": ["#3CB371", "#2E8B57", "#66CDAA", "#20B2AA", "#008B8B", "#3CB371", "#2E8B57", "#66CDAA", "#20B2AA", "#008B8B"],
            "fixedPins": [{ "angle": 0, "id": 0 }, { "angle": 180, "id": 0 }],
        },
        { "pins": 12, "speed": 3400, "colors": repeat("#FFD700", 12) },
        { "pins": 14, "speed": 3200, "colors": repeat("#DA70D6", 14) },
        { "pins": 16, "speed": 3000, "colors": repeat("#1E90FF", 16) },
        { "pins": 18, "speed": 2800, "colors": cycle(&["#FF6347", "#6A5ACD"], 18) },
        { "pins": 20, "speed": 2600, "colors": cycle(&["#3CB371", "#FFD700"], 20) },
        { "pins": 22, "speed": 2400, "colors": cycle(&["#DA70D6", "#1E90FF"], 22) },
        {
            "pins": 24,
            "speed": 2200,
            "colors": cycle(&["#FF6347", "#6A5ACD", "#3CB371", "#FFD700", "#DA70D6", "#1E90FF"], 24),
        },
    ]);
    table_from_value(levels)
}

fn repeat(color: &str, n: usize) -> Vec<&str> {
    vec![color; n]
}

fn cycle<'a>(colors: &[&'a str], n: usize) -> Vec<&'a str> {
    colors.iter().copied().cycle().take(n).collect()
}

fn table_from_value(value: Value) -> Vec<RawLevel> {
    match value {
        Value::Array(items) => items.into_iter().map(RawLevel::from_value).collect(),
        other => {
            log::warn!("Level table is not an array ({}), ignoring it", type_name(&other));
            Vec::new()
        }
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parse a level table from JSON text
pub fn load_table_from_str(json: &str) -> Result<Vec<RawLevel>, ConfigError> {
    let value: Value = serde_json::from_str(json)?;
    Ok(table_from_value(value))
}

/// Read a level table from a JSON file
pub fn load_table_from_path(path: impl AsRef<Path>) -> Result<Vec<RawLevel>, ConfigError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let table = load_table_from_str(&json)?;
    log::info!("Loaded {} levels from {}", table.len(), path.display());
    Ok(table)
}
