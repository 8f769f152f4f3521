//! The rendering-surface contract.
//!
//! Everything the editor needs from a 2D canvas: an ordered list of
//! drawables it can add to and remove from, per-drawable property updates
//! (driven by the animator), and whole-state serialization for snapshots.

use crate::error::SurfaceError;
use crate::id::DrawableId;
use crate::layout::Viewport;
use crate::model::{Background, Drawable, Snapshot, VisualProps};

pub trait Surface {
    /// Pixel dimensions of the page.
    fn size(&self) -> Viewport;

    /// Remove every drawable and the background.
    fn clear(&mut self);

    /// Append on top of the paint order.
    fn add(&mut self, drawable: Drawable) -> DrawableId;

    fn remove(&mut self, id: DrawableId) -> Option<Drawable>;

    fn drawable(&self, id: DrawableId) -> Option<&Drawable>;

    /// IDs in paint order, bottom-most first.
    fn drawable_ids(&self) -> Vec<DrawableId>;

    /// Overwrite the animatable properties of one drawable.
    /// Returns `false` if it no longer exists.
    fn set_props(&mut self, id: DrawableId, props: VisualProps) -> bool;

    /// Apply an arbitrary edit to one drawable.
    /// Returns `false` if it no longer exists.
    fn update(&mut self, id: DrawableId, edit: &mut dyn FnMut(&mut Drawable)) -> bool;

    fn set_background(&mut self, background: Option<Background>);

    fn serialize(&self) -> Result<Snapshot, SurfaceError>;

    /// Replace the full state with `snapshot`.
    fn deserialize(&mut self, snapshot: &Snapshot) -> Result<(), SurfaceError>;

    /// Present the current state.
    fn render(&mut self);

    fn len(&self) -> usize {
        self.drawable_ids().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
