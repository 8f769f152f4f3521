//! Hit testing: point → drawable lookup.
//!
//! Reverse-walks the paint order (front-to-back) to find which drawable
//! is at a given canvas position.

use comic_core::DrawableId;
use comic_core::model::Document;
use kurbo::{Point, Rect};

/// Find the topmost drawable at `point`.
/// Returns `None` if only the background is hit.
pub fn hit_test(document: &Document, point: Point) -> Option<DrawableId> {
    // Last painted = topmost
    document
        .drawables
        .iter()
        .rev()
        .find(|d| d.bounds.contains(point))
        .map(|d| d.id)
}

/// All drawables whose bounds intersect `area`, in paint order.
/// Used for marquee selection.
pub fn hit_test_rect(document: &Document, area: Rect) -> Vec<DrawableId> {
    document
        .drawables
        .iter()
        .filter(|d| {
            let overlap = d.bounds.intersect(area);
            overlap.width() > 0.0 && overlap.height() > 0.0
        })
        .map(|d| d.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use comic_core::model::{Drawable, DrawableKind};

    fn page() -> (Document, DrawableId, DrawableId) {
        let mut doc = Document::new(800.0, 600.0);
        let panel = Drawable::new(
            DrawableKind::PanelFrame,
            Rect::from_origin_size((10.0, 10.0), (380.0, 280.0)),
        );
        let text = Drawable::new(
            DrawableKind::TextBox {
                content: "Hi".into(),
                font_size: 16.0,
            },
            Rect::from_origin_size((50.0, 50.0), (100.0, 40.0)),
        );
        let (panel_id, text_id) = (panel.id, text.id);
        doc.drawables.push(panel);
        doc.drawables.push(text);
        (doc, panel_id, text_id)
    }

    #[test]
    fn topmost_wins() {
        let (doc, panel, text) = page();
        assert_eq!(hit_test(&doc, Point::new(60.0, 60.0)), Some(text));
        assert_eq!(hit_test(&doc, Point::new(300.0, 200.0)), Some(panel));
    }

    #[test]
    fn background_misses() {
        let (doc, _, _) = page();
        assert_eq!(hit_test(&doc, Point::new(799.0, 599.0)), None);
    }

    #[test]
    fn marquee_collects_in_paint_order() {
        let (doc, panel, text) = page();
        let hits = hit_test_rect(&doc, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(hits, vec![panel, text]);
        assert!(hit_test_rect(&doc, Rect::new(500.0, 400.0, 600.0, 500.0)).is_empty());
    }
}
