//! Panel grid layouts.
//!
//! A `Layout` is a named list of fractional rectangles in the unit square.
//! `LayoutTable` holds the available variants and picks one for a panel
//! count; the geometry helpers scale cells to pixels.

use crate::error::StructuralError;
use crate::model::BubblePosition;
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the 4-cell grid.
pub const GRID_2X2: &str = "2x2";
/// Name of the 5-cell grid (three on top, two below).
pub const GRID_3X2: &str = "3x2";

/// Panel counts up to this use the 4-cell grid.
pub const SMALL_GRID_MAX_PANELS: usize = 4;

/// The canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// A rectangle in unit-square coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl UnitRect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Scale to `viewport` pixels and shrink by `inset` on every side.
    pub fn to_frame(&self, viewport: Viewport, inset: f64) -> Rect {
        let x0 = self.x * viewport.width + inset;
        let y0 = self.y * viewport.height + inset;
        let width = self.w * viewport.width - 2.0 * inset;
        let height = self.h * viewport.height - 2.0 * inset;
        Rect::from_origin_size((x0, y0), (width.max(0.0), height.max(0.0)))
    }
}

/// A named panel grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub name: String,
    pub cells: Vec<UnitRect>,
}

impl Layout {
    pub fn new(name: impl Into<String>, cells: Vec<UnitRect>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Pixel frames for every cell, in cell order.
    pub fn frames(&self, viewport: Viewport, inset: f64) -> Vec<Rect> {
        self.cells
            .iter()
            .map(|cell| cell.to_frame(viewport, inset))
            .collect()
    }
}

/// The set of layouts the materializer may choose from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutTable {
    layouts: BTreeMap<String, Layout>,
}

impl Default for LayoutTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.insert(Layout::new(
            GRID_2X2,
            vec![
                UnitRect::new(0.0, 0.0, 0.5, 0.5),
                UnitRect::new(0.5, 0.0, 0.5, 0.5),
                UnitRect::new(0.0, 0.5, 0.5, 0.5),
                UnitRect::new(0.5, 0.5, 0.5, 0.5),
            ],
        ));
        table.insert(Layout::new(
            GRID_3X2,
            vec![
                UnitRect::new(0.0, 0.0, 0.33, 0.5),
                UnitRect::new(0.33, 0.0, 0.33, 0.5),
                UnitRect::new(0.66, 0.0, 0.33, 0.5),
                UnitRect::new(0.0, 0.5, 0.5, 0.5),
                UnitRect::new(0.5, 0.5, 0.5, 0.5),
            ],
        ));
        table
    }
}

impl LayoutTable {
    pub fn empty() -> Self {
        Self {
            layouts: BTreeMap::new(),
        }
    }

    /// Add or replace a layout under its own name.
    pub fn insert(&mut self, layout: Layout) {
        self.layouts.insert(layout.name.clone(), layout);
    }

    pub fn get(&self, name: &str) -> Result<&Layout, StructuralError> {
        self.layouts
            .get(name)
            .ok_or_else(|| StructuralError::UnknownLayout(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layouts.keys().map(String::as_str)
    }

    /// `≤ 4` panels → the 4-cell grid, otherwise the 5-cell grid, even
    /// when six panels were requested.
    pub fn name_for_panel_count(panel_count: usize) -> &'static str {
        if panel_count <= SMALL_GRID_MAX_PANELS {
            GRID_2X2
        } else {
            GRID_3X2
        }
    }

    pub fn for_panel_count(&self, panel_count: usize) -> Result<&Layout, StructuralError> {
        self.get(Self::name_for_panel_count(panel_count))
    }
}

/// Speech-bubble rectangle inside `frame`: `width_ratio` of the frame width,
/// fixed `height`, centered on the normalized `position`.
pub fn bubble_rect(frame: Rect, position: BubblePosition, width_ratio: f64, height: f64) -> Rect {
    let width = frame.width() * width_ratio;
    let cx = frame.x0 + frame.width() * position.x;
    let cy = frame.y0 + frame.height() * position.y;
    Rect::from_center_size((cx, cy), (width, height))
}
