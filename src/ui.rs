//! HUD and overlay model
//!
//! Pure functions from simulation state to what the screen should say. The
//! presentation layer decides how to draw it.

use serde::{Deserialize, Serialize};

use crate::consts::QUEUE_PREVIEW_LEN;
use crate::sim::{Outcome, Progression, QueuedPin, Stage};

/// Actions the end-of-level buttons trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonAction {
    Retry,
    NextLevel,
    StartOver,
}

impl ButtonAction {
    pub fn label(&self) -> &'static str {
        match self {
            ButtonAction::Retry => "Retry",
            ButtonAction::NextLevel => "Next Level",
            ButtonAction::StartOver => "Start Over",
        }
    }
}

/// End-of-level card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub title: String,
    pub subtitle: String,
    /// Top to bottom
    pub buttons: Vec<ButtonAction>,
}

/// Always-visible header and wheel hub text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    /// e.g. "Lv 3/10"
    pub level_label: String,
    /// Pins left to fire, shown on the wheel hub
    pub remaining: usize,
    /// Next pins under the wheel, head first
    pub queue: Vec<QueuedPin>,
}

pub fn hud(p: &Progression) -> Hud {
    let engine = p.engine();
    Hud {
        level_label: format!("Lv {}/{}", p.current_level(), p.level_count().max(1)),
        remaining: engine.pending().len(),
        queue: engine.upcoming(QUEUE_PREVIEW_LEN),
    }
}

/// Overlay to show, if the level has ended
pub fn overlay(p: &Progression) -> Option<Overlay> {
    let level = p.current_level();
    match p.stage() {
        Stage::AllComplete => Some(Overlay {
            title: "All Levels Complete!".to_string(),
            subtitle: format!("You cleared all {} levels!", p.level_count()),
            buttons: vec![ButtonAction::StartOver],
        }),
        Stage::LevelCleared(n) => Some(Overlay {
            title: "Level Complete!".to_string(),
            subtitle: format!("Level {} cleared!", n),
            buttons: vec![if p.is_last_level() {
                ButtonAction::StartOver
            } else {
                ButtonAction::NextLevel
            }],
        }),
        Stage::Playing(_) if p.engine().outcome() == Outcome::Lost => {
            let engine = p.engine();
            Some(Overlay {
                title: "Game Over!".to_string(),
                subtitle: format!(
                    "Level {}: placed {}/{} pins",
                    level,
                    engine.attached_pins().len(),
                    engine.level().pin_count
                ),
                buttons: vec![ButtonAction::Retry, ButtonAction::StartOver],
            })
        }
        Stage::Playing(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{FixedClock, RawLevel};
    use crate::tuning::Tuning;
    use serde_json::json;

    fn progression(levels: serde_json::Value) -> Progression {
        let raw: Vec<RawLevel> = levels
            .as_array()
            .into_iter()
            .flatten()
            .cloned()
            .map(RawLevel::from_value)
            .collect();
        Progression::from_raw(&raw, &Tuning::default(), &mut FixedClock::default())
    }

    #[test]
    fn test_hud() {
        let mut p = progression(json!([{ "pins": 7, "colors": ["A", "B"] }, {}]));
        let h = hud(&p);
        assert_eq!(h.level_label, "Lv 1/2");
        assert_eq!(h.remaining, 7);
        assert_eq!(h.queue.len(), 5);
        assert_eq!(h.queue[0].id, 7);
        assert_eq!(h.queue[1].color.as_str(), "B");

        p.engine_mut().fire(0.0, &Tuning::default());
        let h = hud(&p);
        assert_eq!(h.remaining, 6);
        assert_eq!(h.queue[0].id, 6);
        assert_eq!(h.queue[0].color.as_str(), "B");
        assert!(overlay(&p).is_none());
    }

    #[test]
    fn test_loss_overlay() {
        let mut p = progression(json!([{ "pins": 4, "fixedPins": [{ "angle": 180 }] }]));
        p.engine_mut().fire(90.0, &Tuning::default());
        p.engine_mut().fire(0.0, &Tuning::default());
        p.on_outcome();
        let o = overlay(&p).unwrap();
        assert_eq!(o.title, "Game Over!");
        // The fixed pin counts toward the placed total
        assert_eq!(o.subtitle, "Level 1: placed 2/4 pins");
        assert_eq!(o.buttons, vec![ButtonAction::Retry, ButtonAction::StartOver]);
    }

    #[test]
    fn test_cleared_overlays() {
        let tuning = Tuning::default();
        let mut clock = FixedClock::default();
        let mut p = progression(json!([{ "pins": 1 }, { "pins": 1 }]));
        p.engine_mut().fire(0.0, &tuning);
        p.on_outcome();
        let o = overlay(&p).unwrap();
        assert_eq!(o.title, "Level Complete!");
        assert_eq!(o.buttons, vec![ButtonAction::NextLevel]);

        p.advance(&tuning, &mut clock);
        p.engine_mut().fire(0.0, &tuning);
        p.on_outcome();
        assert_eq!(overlay(&p).unwrap().buttons, vec![ButtonAction::StartOver]);

        p.advance(&tuning, &mut clock);
        let o = overlay(&p).unwrap();
        assert_eq!(o.title, "All Levels Complete!");
        assert_eq!(o.buttons[0].label(), "Start Over");
    }
}
