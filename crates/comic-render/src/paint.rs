//! Paint presets and color conversion.
//!
//! Default styles for each kind of drawable the materializer creates, plus
//! the `Color` → SVG paint mapping shared by the exporter.

use comic_core::model::{Color, DrawableKind, Style};

/// Font stack used for bubble text.
pub const COMIC_FONT: &str = "Comic Sans MS, cursive, sans-serif";

/// Line height multiplier for wrapped bubble text.
pub const LINE_HEIGHT: f64 = 1.4;

/// Panel border: white fill, black 2 px stroke, soft drop shadow.
pub fn panel_style() -> Style {
    Style {
        fill: Some(Color::WHITE),
        stroke: Some(Color::BLACK),
        stroke_width: 2.0,
        corner_radius: 0.0,
        shadow: Some((5.0, 5.0)),
    }
}

/// Comic red used on hand-added and imported panels.
pub const ACCENT: Color = Color::rgba(237.0 / 255.0, 29.0 / 255.0, 36.0 / 255.0, 1.0);

/// Hand-added or video-frame panel: thick red border, rounded corners.
pub fn accent_panel_style() -> Style {
    Style {
        fill: Some(Color::WHITE),
        stroke: Some(ACCENT),
        stroke_width: 5.0,
        corner_radius: 12.0,
        shadow: Some((8.0, 8.0)),
    }
}

pub fn bubble_style() -> Style {
    Style {
        fill: Some(Color::WHITE),
        stroke: Some(Color::BLACK),
        stroke_width: 2.0,
        ..Style::default()
    }
}

pub fn text_style() -> Style {
    Style {
        fill: Some(Color::BLACK),
        ..Style::default()
    }
}

/// Imported frames and backgrounds carry no paint of their own.
pub fn image_style() -> Style {
    Style::default()
}

/// Default style for `kind`.
pub fn style_for(kind: &DrawableKind) -> Style {
    match kind {
        DrawableKind::PanelFrame => panel_style(),
        DrawableKind::SpeechBubble { .. } => bubble_style(),
        DrawableKind::TextBox { .. } => text_style(),
        DrawableKind::Image { .. } => image_style(),
    }
}

/// SVG paint for an optional color; `none` when absent.
pub fn svg_paint(color: Option<&Color>) -> String {
    match color {
        Some(c) if c.a >= 1.0 => c.to_hex(),
        Some(c) => {
            let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
            format!("rgba({}, {}, {}, {})", byte(c.r), byte(c.g), byte(c.b), c.a)
        }
        None => "none".to_string(),
    }
}
