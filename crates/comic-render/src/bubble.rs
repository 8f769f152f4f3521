//! Speech-bubble outline geometry.
//!
//! A bubble is a rounded rectangle with a triangular tail hanging from the
//! middle of its bottom edge. The path is built in local coordinates
//! (origin at the bubble's top-left corner) so moving a bubble never
//! touches its path data; only a resize needs a rebuild.

use kurbo::{BezPath, Size};

/// Radius of the rounded corners.
pub const CORNER_RADIUS: f64 = 20.0;
/// Half-width of the tail base, and how far the tail hangs below the body.
pub const TAIL_SIZE: f64 = 20.0;

/// Outline of a bubble body of `size`, tail included.
///
/// Corner radius and tail shrink to fit very small bubbles.
pub fn speech_bubble_path(size: Size) -> BezPath {
    let (w, h) = (size.width.max(0.0), size.height.max(0.0));
    let r = CORNER_RADIUS.min(w / 2.0).min(h / 2.0);
    let tail_x = w / 2.0;
    let tail = TAIL_SIZE.min((w / 2.0 - r).max(0.0));

    let mut path = BezPath::new();
    path.move_to((0.0, r));
    path.quad_to((0.0, 0.0), (r, 0.0));
    path.line_to((w - r, 0.0));
    path.quad_to((w, 0.0), (w, r));
    path.line_to((w, h - r));
    path.quad_to((w, h), (w - r, h));
    path.line_to((tail_x + tail, h));
    path.line_to((tail_x, h + TAIL_SIZE));
    path.line_to((tail_x - tail, h));
    path.line_to((r, h));
    path.quad_to((0.0, h), (0.0, h - r));
    path.close_path();
    path
}

/// SVG path data (`d` attribute) for a bubble of `size`.
pub fn speech_bubble_data(size: Size) -> String {
    speech_bubble_path(size).to_svg()
}
