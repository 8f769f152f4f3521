//! Panel materializer: turns an analysis or a list of video frames into
//! drawables on the surface.
//!
//! Every multi-step placement is an ordered chain of awaits: a panel's
//! frame pops, then its bubble, then its text, and only then does the next
//! panel start.

use crate::animate::{Animator, Tween};
use crate::config::EditorConfig;
use comic_core::layout::{LayoutTable, bubble_rect};
use comic_core::model::{Drawable, DrawableKind, VisualProps};
use comic_core::{Analysis, DrawableId, InputError, Rect, StructuralError, Surface};
use comic_render::bubble::speech_bubble_data;
use comic_render::paint::{accent_panel_style, bubble_style, image_style, panel_style, text_style};
use log::{debug, info, warn};
use std::cell::RefCell;
use std::time::Duration;

pub const FRAME_ENTRANCE: Duration = Duration::from_millis(500);
/// Extra entrance delay per layout cell index.
pub const FRAME_STAGGER: Duration = Duration::from_millis(200);
pub const FRAME_POP: Duration = Duration::from_millis(600);
pub const BUBBLE_ENTRANCE: Duration = Duration::from_millis(500);
pub const BUBBLE_DELAY: Duration = Duration::from_millis(200);
pub const FADE_OUT: Duration = Duration::from_millis(400);

/// Size of a panel holding an imported video frame.
pub const VIDEO_PANEL_SIZE: (f64, f64) = (400.0, 300.0);
/// Size of a hand-added panel.
pub const NEW_PANEL_SIZE: (f64, f64) = (200.0, 200.0);
/// Offset of the first cascaded panel from the page corner.
pub const CASCADE_ORIGIN: f64 = 10.0;
/// Offset between consecutive cascaded panels.
pub const CASCADE_STEP: f64 = 20.0;

/// What `create_panels_from_analysis` placed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    /// Panels that received a bubble and text.
    pub created: usize,
    /// Panel indices that had no frame to land in.
    pub skipped: Vec<usize>,
}

/// Places panels, bubbles and text on a surface.
#[derive(Debug, Clone)]
pub struct Materializer {
    layouts: LayoutTable,
    animator: Animator,
    inset: f64,
    bubble_height: f64,
    bubble_width_ratio: f64,
    text_padding: f64,
    font_size: f64,
}

impl Default for Materializer {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl Materializer {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            layouts: LayoutTable::default(),
            animator: Animator::from_config(config),
            inset: config.frame_inset,
            bubble_height: config.bubble_height,
            bubble_width_ratio: config.bubble_width_ratio,
            text_padding: config.text_padding,
            font_size: config.font_size,
        }
    }

    /// Replace the layout table.
    pub fn with_layouts(mut self, layouts: LayoutTable) -> Self {
        self.layouts = layouts;
        self
    }

    pub fn layouts(&self) -> &LayoutTable {
        &self.layouts
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    /// Clear the surface and pop in one frame per cell of layout `name`,
    /// each entrance finishing before the next starts.
    ///
    /// Returns the frame IDs in cell order.
    pub async fn apply_layout<S: Surface>(
        &self,
        name: &str,
        surface: &RefCell<S>,
    ) -> Result<Vec<DrawableId>, StructuralError> {
        let layout = self.layouts.get(name)?;
        debug!("Applying layout {name} ({} cells)", layout.len());

        let frames = {
            let mut s = surface.borrow_mut();
            s.clear();
            layout.frames(s.size(), self.inset)
        };

        let mut ids = Vec::with_capacity(frames.len());
        for (index, frame) in frames.into_iter().enumerate() {
            let id = surface.borrow_mut().add(
                Drawable::new(DrawableKind::PanelFrame, frame)
                    .with_props(VisualProps::HIDDEN)
                    .with_style(panel_style()),
            );
            let entrance = Tween::new(id, VisualProps::VISIBLE, FRAME_ENTRANCE)
                .delayed(FRAME_STAGGER * index as u32);
            self.animator.play(surface, &[entrance]).await;
            ids.push(id);
        }

        surface.borrow_mut().render();
        Ok(ids)
    }

    /// Lay out frames for `analysis` and fill each with a bubble and text.
    ///
    /// A panel whose frame is missing is logged and skipped; the rest of
    /// the batch still runs.
    pub async fn create_panels_from_analysis<S: Surface>(
        &self,
        analysis: &Analysis,
        surface: &RefCell<S>,
    ) -> Result<MaterializeReport, StructuralError> {
        if analysis.panels.is_empty() {
            return Err(StructuralError::NoPanels);
        }

        let layout_name = LayoutTable::name_for_panel_count(analysis.total_panels);
        let frames = self.apply_layout(layout_name, surface).await?;

        let mut report = MaterializeReport::default();
        for (index, panel) in analysis.panels.iter().enumerate() {
            let frame_bounds = frames
                .get(index)
                .and_then(|id| surface.borrow().drawable(*id).map(|d| (*id, d.bounds)));
            let Some((frame_id, bounds)) = frame_bounds else {
                warn!(
                    "{}",
                    StructuralError::MissingFrame {
                        index,
                        available: frames.len()
                    }
                );
                report.skipped.push(index);
                continue;
            };

            surface.borrow_mut().set_props(frame_id, VisualProps::HIDDEN);
            self.animator
                .play(surface, &[Tween::new(frame_id, VisualProps::VISIBLE, FRAME_POP)])
                .await;

            let bubble_bounds = bubble_rect(
                bounds,
                panel.position,
                self.bubble_width_ratio,
                self.bubble_height,
            );
            let (bubble, text) = {
                let mut s = surface.borrow_mut();
                let bubble = s.add(
                    Drawable::new(
                        DrawableKind::SpeechBubble {
                            path: speech_bubble_data(bubble_bounds.size()),
                        },
                        bubble_bounds,
                    )
                    .with_props(VisualProps::HIDDEN)
                    .with_style(bubble_style()),
                );
                let text = s.add(
                    Drawable::new(
                        DrawableKind::TextBox {
                            content: panel.text.clone(),
                            font_size: self.font_size,
                        },
                        bubble_bounds.inset(-self.text_padding),
                    )
                    .with_props(VisualProps::HIDDEN)
                    .with_style(text_style()),
                );
                (bubble, text)
            };

            for id in [bubble, text] {
                let entrance =
                    Tween::new(id, VisualProps::VISIBLE, BUBBLE_ENTRANCE).delayed(BUBBLE_DELAY);
                self.animator.play(surface, &[entrance]).await;
            }
            report.created += 1;
        }

        surface.borrow_mut().render();
        info!(
            "Panel creation complete: {} created, {} skipped",
            report.created,
            report.skipped.len()
        );
        Ok(report)
    }

    /// Fade every drawable out together, then clear the surface.
    pub async fn fade_out_current_panels<S: Surface>(&self, surface: &RefCell<S>) {
        let tweens: Vec<Tween> = {
            let s = surface.borrow();
            s.drawable_ids()
                .into_iter()
                .filter_map(|id| s.drawable(id))
                .map(|d| Tween::new(d.id, d.props.faded(), FADE_OUT))
                .collect()
        };
        if tweens.is_empty() {
            return;
        }

        self.animator.play(surface, &tweens).await;
        let mut s = surface.borrow_mut();
        s.clear();
        s.render();
    }

    /// Replace the page with one cascaded panel per base64 JPEG frame.
    pub async fn create_panels_from_frames<S: Surface>(
        &self,
        frames: &[String],
        surface: &RefCell<S>,
    ) -> Result<Vec<DrawableId>, InputError> {
        crate::import::validate_frames(frames)?;
        self.fade_out_current_panels(surface).await;

        let (w, h) = VIDEO_PANEL_SIZE;
        let mut s = surface.borrow_mut();
        let mut panels = Vec::with_capacity(frames.len());
        for (index, frame) in frames.iter().enumerate() {
            let bounds = Rect::from_origin_size(cascade_origin(index), (w, h));
            debug!("Creating panel {} at ({}, {})", index + 1, bounds.x0, bounds.y0);
            let panel = s.add(
                Drawable::new(DrawableKind::PanelFrame, bounds).with_style(accent_panel_style()),
            );
            s.add(
                Drawable::new(
                    DrawableKind::Image {
                        source: format!("data:image/jpeg;base64,{frame}"),
                    },
                    bounds,
                )
                .with_style(image_style()),
            );
            panels.push(panel);
        }
        s.render();
        info!("Created {} panels from video frames", panels.len());
        Ok(panels)
    }

    /// Add an empty panel, cascaded by the number of frames already present.
    pub fn add_panel<S: Surface>(&self, surface: &mut S) -> DrawableId {
        let existing = surface
            .drawable_ids()
            .into_iter()
            .filter(|id| surface.drawable(*id).is_some_and(Drawable::is_panel_frame))
            .count();
        let bounds = Rect::from_origin_size(cascade_origin(existing), NEW_PANEL_SIZE);
        let id = surface.add(
            Drawable::new(DrawableKind::PanelFrame, bounds).with_style(accent_panel_style()),
        );
        surface.render();
        debug!("New panel {id} added");
        id
    }
}

fn cascade_origin(index: usize) -> (f64, f64) {
    let offset = CASCADE_ORIGIN + index as f64 * CASCADE_STEP;
    (offset, offset)
}
