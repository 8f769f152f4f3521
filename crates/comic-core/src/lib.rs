pub mod error;
pub mod id;
pub mod layout;
pub mod model;
pub mod segment;
pub mod suggest;
pub mod surface;

pub use error::{EnrichmentError, InputError, StructuralError, SurfaceError};
pub use id::DrawableId;
pub use layout::{Layout, LayoutTable, UnitRect, Viewport};
pub use model::*;
pub use segment::{Analysis, AnalysisReport, analyze_text};
pub use suggest::{NoSuggestions, SceneSuggester, StaticSuggestions};
pub use surface::Surface;

// Re-export kurbo geometry so downstream crates share one version.
pub use kurbo::Rect;
