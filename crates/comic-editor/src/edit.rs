//! Manual edits of individual drawables.
//!
//! These are the canvas-side mutations a user makes by hand: dragging,
//! resizing, retyping a bubble, deleting. Each one is a plain value so the
//! session can capture history before applying it.

use comic_core::model::DrawableKind;
use comic_core::{DrawableId, Surface};
use comic_render::bubble::speech_bubble_data;
use kurbo::{Rect, Vec2};

/// A single hand edit.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    /// Translate by `(dx, dy)`.
    Move { id: DrawableId, dx: f64, dy: f64 },
    /// Set the size, keeping the top-left corner.
    Resize {
        id: DrawableId,
        width: f64,
        height: f64,
    },
    /// Replace the text of a text box.
    SetText { id: DrawableId, content: String },
    Remove { id: DrawableId },
}

impl Edit {
    pub fn target(&self) -> DrawableId {
        match self {
            Edit::Move { id, .. }
            | Edit::Resize { id, .. }
            | Edit::SetText { id, .. }
            | Edit::Remove { id } => *id,
        }
    }

    /// Whether this edit can apply to what is on `surface` right now.
    pub fn applies_to<S: Surface>(&self, surface: &S) -> bool {
        match (self, surface.drawable(self.target())) {
            (_, None) => false,
            (Edit::SetText { .. }, Some(d)) => matches!(d.kind, DrawableKind::TextBox { .. }),
            (Edit::Resize { width, height, .. }, Some(_)) => *width > 0.0 && *height > 0.0,
            _ => true,
        }
    }
}

/// Apply `edit` to `surface`. Returns `false` and changes nothing when the
/// edit does not apply.
pub fn apply_edit<S: Surface>(surface: &mut S, edit: &Edit) -> bool {
    if !edit.applies_to(surface) {
        return false;
    }

    match edit {
        Edit::Move { id, dx, dy } => surface.update(*id, &mut |d| {
            d.bounds = d.bounds + Vec2::new(*dx, *dy);
        }),
        Edit::Resize { id, width, height } => surface.update(*id, &mut |d| {
            d.bounds = Rect::from_origin_size(d.bounds.origin(), (*width, *height));
            if let DrawableKind::SpeechBubble { path } = &mut d.kind {
                *path = speech_bubble_data(d.bounds.size());
            }
        }),
        Edit::SetText { id, content } => surface.update(*id, &mut |d| {
            if let DrawableKind::TextBox { content: current, .. } = &mut d.kind {
                current.clone_from(content);
            }
        }),
        Edit::Remove { id } => surface.remove(*id).is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comic_core::model::Drawable;
    use comic_render::SceneCanvas;
    use kurbo::Size;

    fn canvas() -> (SceneCanvas, DrawableId, DrawableId) {
        let mut canvas = SceneCanvas::default();
        let bounds = Rect::from_origin_size((100.0, 100.0), (200.0, 80.0));
        let bubble = canvas.add(Drawable::new(
            DrawableKind::SpeechBubble {
                path: speech_bubble_data(bounds.size()),
            },
            bounds,
        ));
        let text = canvas.add(Drawable::new(
            DrawableKind::TextBox {
                content: "Hello".into(),
                font_size: 16.0,
            },
            bounds.inset(-15.0),
        ));
        (canvas, bubble, text)
    }

    #[test]
    fn move_translates_bounds() {
        let (mut canvas, bubble, _) = canvas();
        assert!(apply_edit(
            &mut canvas,
            &Edit::Move {
                id: bubble,
                dx: 10.0,
                dy: -5.0
            }
        ));
        assert_eq!(
            canvas.drawable(bubble).unwrap().bounds,
            Rect::new(110.0, 95.0, 310.0, 175.0)
        );
    }

    #[test]
    fn resize_rebuilds_bubble_path() {
        let (mut canvas, bubble, _) = canvas();
        apply_edit(
            &mut canvas,
            &Edit::Resize {
                id: bubble,
                width: 300.0,
                height: 120.0,
            },
        );
        let d = canvas.drawable(bubble).unwrap();
        assert_eq!(d.bounds, Rect::new(100.0, 100.0, 400.0, 220.0));
        assert_eq!(
            d.kind,
            DrawableKind::SpeechBubble {
                path: speech_bubble_data(Size::new(300.0, 120.0))
            }
        );
    }

    #[test]
    fn set_text_only_touches_text_boxes() {
        let (mut canvas, bubble, text) = canvas();
        let retext = |id| Edit::SetText {
            id,
            content: "Bye".into(),
        };
        assert!(!apply_edit(&mut canvas, &retext(bubble)));
        assert!(apply_edit(&mut canvas, &retext(text)));
        assert!(matches!(
            &canvas.drawable(text).unwrap().kind,
            DrawableKind::TextBox { content, .. } if content == "Bye"
        ));
    }

    #[test]
    fn degenerate_resize_and_missing_targets_are_rejected() {
        let (mut canvas, bubble, text) = canvas();
        assert!(!apply_edit(
            &mut canvas,
            &Edit::Resize {
                id: bubble,
                width: 0.0,
                height: 10.0
            }
        ));
        assert!(apply_edit(&mut canvas, &Edit::Remove { id: text }));
        assert!(!apply_edit(&mut canvas, &Edit::Remove { id: text }));
        assert_eq!(canvas.len(), 1);
    }
}
