//! Core data model for comic pages.
//!
//! Two halves live here: the ephemeral narrative types produced by the
//! segmenter (`Scene`, `PanelContent`) and the persistent page document
//! (`Document` of `Drawable`s) that a `Surface` holds and serializes into
//! `Snapshot`s.

use crate::id::DrawableId;
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use std::fmt;

// ─── Narrative ───────────────────────────────────────────────────────────

/// Visual direction for a scene, usually supplied by a suggestion service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visualization {
    pub composition: String,
    pub mood: String,
    pub visual_elements: SmallVec<[String; 4]>,
}

impl Default for Visualization {
    /// Neutral placeholder used when no suggestion is available.
    fn default() -> Self {
        Self {
            composition: "default".into(),
            mood: "neutral".into(),
            visual_elements: smallvec!["basic panel layout".to_string()],
        }
    }
}

impl Visualization {
    /// Overlay the fields present in `hint`.
    pub fn merge(&mut self, hint: &VisualizationHint) {
        if let Some(composition) = &hint.composition {
            self.composition = composition.clone();
        }
        if let Some(mood) = &hint.mood {
            self.mood = mood.clone();
        }
        if let Some(elements) = &hint.visual_elements {
            self.visual_elements = elements.iter().cloned().collect();
        }
    }
}

/// One per-fragment suggestion. Absent fields leave the scene untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualizationHint {
    #[serde(default)]
    pub composition: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub visual_elements: Option<Vec<String>>,
}

/// A contiguous narrative unit. `text` is never empty after trimming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub text: String,
    pub visualization: Visualization,
}

impl Scene {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visualization: Visualization::default(),
        }
    }

    /// Whitespace-delimited token count.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Normalized bubble anchor inside a panel's bounding box, both in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BubblePosition {
    pub x: f64,
    pub y: f64,
}

impl BubblePosition {
    pub const TOP_LEFT: Self = Self { x: 0.2, y: 0.2 };
    pub const TOP_RIGHT: Self = Self { x: 0.8, y: 0.2 };
    pub const BOTTOM_LEFT: Self = Self { x: 0.2, y: 0.8 };
    pub const BOTTOM_RIGHT: Self = Self { x: 0.8, y: 0.8 };
    pub const CENTER: Self = Self { x: 0.5, y: 0.5 };
    pub const TOP_CENTER: Self = Self { x: 0.5, y: 0.2 };
}

/// Display text of one panel plus where its bubble sits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelContent {
    pub text: String,
    pub position: BubblePosition,
}

// ─── Colors & Style ──────────────────────────────────────────────────────

/// RGBA color, 4 × f32 in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);
        match hex.len() {
            3 => {
                let mut digits = hex.chars().map(|c| c.to_digit(16));
                let mut next = || digits.next().flatten().map(|v| (v * 17) as f32 / 255.0);
                Some(Self::rgba(next()?, next()?, next()?, 1.0))
            }
            6 => Some(Self::rgba(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                1.0,
            )),
            8 => Some(Self::rgba(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    /// `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b, a) = (byte(self.r), byte(self.g), byte(self.b), byte(self.a));
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

/// Static paint attributes of a drawable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub corner_radius: f64,
    /// Drop shadow offset in px; `None` disables the shadow.
    pub shadow: Option<(f64, f64)>,
}

// ─── Drawables ───────────────────────────────────────────────────────────

/// Animatable properties. Everything a tween can touch lives here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualProps {
    pub opacity: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl VisualProps {
    pub const VISIBLE: Self = Self {
        opacity: 1.0,
        scale_x: 1.0,
        scale_y: 1.0,
    };

    /// Entrance start state: transparent and slightly shrunk.
    pub const HIDDEN: Self = Self {
        opacity: 0.0,
        scale_x: 0.9,
        scale_y: 0.9,
    };

    /// Linear interpolation; `t >= 1.0` yields `to` exactly.
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        if t >= 1.0 {
            return *to;
        }
        let t = t.max(0.0);
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self {
            opacity: mix(self.opacity, to.opacity),
            scale_x: mix(self.scale_x, to.scale_x),
            scale_y: mix(self.scale_y, to.scale_y),
        }
    }

    /// Fade-out target relative to the current state.
    pub fn faded(&self) -> Self {
        Self {
            opacity: 0.0,
            scale_x: self.scale_x * 0.9,
            scale_y: self.scale_y * 0.9,
        }
    }
}

impl Default for VisualProps {
    fn default() -> Self {
        Self::VISIBLE
    }
}

/// What a drawable is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawableKind {
    /// Rectangular panel border.
    PanelFrame,
    /// Speech bubble outline; `path` is SVG path data.
    SpeechBubble { path: String },
    /// Wrapped text block.
    TextBox { content: String, font_size: f64 },
    /// Raster image, e.g. an imported video frame. `source` is a URL or data URI.
    Image { source: String },
}

impl DrawableKind {
    pub fn label(&self) -> &'static str {
        match self {
            DrawableKind::PanelFrame => "panel",
            DrawableKind::SpeechBubble { .. } => "bubble",
            DrawableKind::TextBox { .. } => "text",
            DrawableKind::Image { .. } => "image",
        }
    }
}

/// A single object on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    pub id: DrawableId,
    pub kind: DrawableKind,
    pub bounds: Rect,
    pub props: VisualProps,
    pub style: Style,
}

impl Drawable {
    /// Create a drawable with a fresh ID derived from its kind.
    pub fn new(kind: DrawableKind, bounds: Rect) -> Self {
        Self {
            id: DrawableId::with_prefix(kind.label()),
            kind,
            bounds,
            props: VisualProps::VISIBLE,
            style: Style::default(),
        }
    }

    pub fn with_props(mut self, props: VisualProps) -> Self {
        self.props = props;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn is_panel_frame(&self) -> bool {
        matches!(self.kind, DrawableKind::PanelFrame)
    }
}

/// Page background image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Background {
    pub source: String,
}

/// The full serializable state of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub width: f64,
    pub height: f64,
    pub background: Option<Background>,
    /// Paint order: first is bottom-most.
    pub drawables: Vec<Drawable>,
}

impl Document {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            background: None,
            drawables: Vec::new(),
        }
    }

    pub fn get(&self, id: DrawableId) -> Option<&Drawable> {
        self.drawables.iter().find(|d| d.id == id)
    }

    pub fn get_mut(&mut self, id: DrawableId) -> Option<&mut Drawable> {
        self.drawables.iter_mut().find(|d| d.id == id)
    }
}

// ─── Snapshots ───────────────────────────────────────────────────────────

/// Immutable textual capture of a whole document at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(String);

impl Snapshot {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
