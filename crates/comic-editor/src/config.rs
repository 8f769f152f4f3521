//! Editor configuration.

use comic_core::layout::Viewport;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for an editing session.
///
/// Every field has a default, so a config file only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Page size in pixels. Default: **800 × 600**.
    pub canvas: Viewport,

    /// Undo entries kept before the oldest is dropped. Default: **200**.
    pub history_depth: usize,

    /// Seconds between autosave checks. Default: **120**.
    pub autosave_interval_secs: u64,

    /// Gap between a layout cell edge and its panel frame. Default: **10**.
    pub frame_inset: f64,

    /// When `false`, tweens jump straight to their end state.
    pub animations: bool,

    /// Milliseconds between animation frames. Default: **16**.
    pub frame_interval_ms: u64,

    /// Speech-bubble height in pixels. Default: **100**.
    pub bubble_height: f64,

    /// Speech-bubble width as a fraction of its panel. Default: **0.85**.
    pub bubble_width_ratio: f64,

    /// Padding between bubble outline and text. Default: **15**.
    pub text_padding: f64,

    pub font_size: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas: Viewport::default(),
            history_depth: 200,
            autosave_interval_secs: 120,
            frame_inset: 10.0,
            animations: true,
            frame_interval_ms: 16,
            bubble_height: 100.0,
            bubble_width_ratio: 0.85,
            text_padding: 15.0,
            font_size: 16.0,
        }
    }
}

impl EditorConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EditorConfig::from_json(r#"{ "history_depth": 5, "animations": false }"#)
            .unwrap();
        assert_eq!(config.history_depth, 5);
        assert!(!config.animations);
        assert_eq!(config.autosave_interval(), Duration::from_secs(120));
        assert_eq!(config.canvas, Viewport::default());
    }

    #[test]
    fn zero_frame_interval_is_clamped() {
        let config = EditorConfig {
            frame_interval_ms: 0,
            ..EditorConfig::default()
        };
        assert_eq!(config.frame_interval(), Duration::from_millis(1));
    }

    #[test]
    fn unknown_json_is_an_error() {
        assert!(EditorConfig::from_json("[1, 2]").is_err());
    }
}
