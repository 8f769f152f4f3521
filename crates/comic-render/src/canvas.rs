//! In-memory rendering surface.
//!
//! `SceneCanvas` holds a `Document` and implements `Surface` over it.
//! Snapshots are the document's JSON form; `render` counts presented
//! frames and is where a real backend would repaint.

use crate::hit;
use crate::svg::render_svg;
use comic_core::error::SurfaceError;
use comic_core::layout::Viewport;
use comic_core::model::{Background, Document, Drawable, Snapshot, VisualProps};
use comic_core::{DrawableId, Surface};
use kurbo::Point;

/// Canvas configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        let viewport = Viewport::default();
        Self {
            width: viewport.width,
            height: viewport.height,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SceneCanvas {
    document: Document,
    frames_rendered: u64,
}

impl SceneCanvas {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            document: Document::new(config.width, config.height),
            frames_rendered: 0,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Number of `render` calls so far.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn to_svg(&self) -> String {
        render_svg(&self.document)
    }

    pub fn to_json_pretty(&self) -> Result<String, SurfaceError> {
        serde_json::to_string_pretty(&self.document)
            .map_err(|e| SurfaceError::Serialize(e.to_string()))
    }

    /// Topmost drawable under `point`.
    pub fn drawable_at(&self, point: Point) -> Option<DrawableId> {
        hit::hit_test(&self.document, point)
    }
}

impl Default for SceneCanvas {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl Surface for SceneCanvas {
    fn size(&self) -> Viewport {
        Viewport {
            width: self.document.width,
            height: self.document.height,
        }
    }

    fn clear(&mut self) {
        self.document.drawables.clear();
        self.document.background = None;
    }

    fn add(&mut self, drawable: Drawable) -> DrawableId {
        let id = drawable.id;
        self.document.drawables.push(drawable);
        id
    }

    fn remove(&mut self, id: DrawableId) -> Option<Drawable> {
        let index = self.document.drawables.iter().position(|d| d.id == id)?;
        Some(self.document.drawables.remove(index))
    }

    fn drawable(&self, id: DrawableId) -> Option<&Drawable> {
        self.document.get(id)
    }

    fn drawable_ids(&self) -> Vec<DrawableId> {
        self.document.drawables.iter().map(|d| d.id).collect()
    }

    fn set_props(&mut self, id: DrawableId, props: VisualProps) -> bool {
        match self.document.get_mut(id) {
            Some(drawable) => {
                drawable.props = props;
                true
            }
            None => false,
        }
    }

    fn update(&mut self, id: DrawableId, edit: &mut dyn FnMut(&mut Drawable)) -> bool {
        match self.document.get_mut(id) {
            Some(drawable) => {
                edit(drawable);
                true
            }
            None => false,
        }
    }

    fn set_background(&mut self, background: Option<Background>) {
        self.document.background = background;
    }

    fn serialize(&self) -> Result<Snapshot, SurfaceError> {
        serde_json::to_string(&self.document)
            .map(Snapshot::new)
            .map_err(|e| SurfaceError::Serialize(e.to_string()))
    }

    fn deserialize(&mut self, snapshot: &Snapshot) -> Result<(), SurfaceError> {
        let document: Document = serde_json::from_str(snapshot.as_str())
            .map_err(|e| SurfaceError::Deserialize(e.to_string()))?;
        self.document = document;
        Ok(())
    }

    fn render(&mut self) {
        self.frames_rendered += 1;
        log::trace!(
            "frame {}: {} drawables",
            self.frames_rendered,
            self.document.drawables.len()
        );
    }

    fn len(&self) -> usize {
        self.document.drawables.len()
    }
}
