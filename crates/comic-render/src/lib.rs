//! Rendering side of Comic Draft: the in-memory `SceneCanvas` surface,
//! speech-bubble geometry, paint presets, hit testing, and SVG export.

pub mod bubble;
pub mod canvas;
pub mod hit;
pub mod paint;
pub mod svg;

pub use bubble::{speech_bubble_data, speech_bubble_path};
pub use canvas::{CanvasConfig, SceneCanvas};
pub use svg::render_svg;
