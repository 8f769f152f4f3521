//! Tween playback against a shared surface.
//!
//! `Animator::play` drives a set of sibling tweens in one frame loop and
//! resolves once every tween has settled at its end state. Ordering between
//! steps is expressed by awaiting one `play` before starting the next.
//!
//! The surface is only borrowed inside a frame, never across the sleep
//! between frames.

use crate::config::EditorConfig;
use comic_core::model::VisualProps;
use comic_core::{DrawableId, Surface};
use std::cell::RefCell;
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Linear move of one drawable's props towards `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub target: DrawableId,
    pub to: VisualProps,
    pub duration: Duration,
    /// Time after `play` starts before the tween begins moving.
    pub delay: Duration,
}

impl Tween {
    pub fn new(target: DrawableId, to: VisualProps, duration: Duration) -> Self {
        Self {
            target,
            to,
            duration,
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn end(&self) -> Duration {
        self.delay + self.duration
    }

    /// Progress in `[0, 1]` at `elapsed`, or `None` before the delay ends.
    fn progress(&self, elapsed: Duration) -> Option<f64> {
        let running = elapsed.checked_sub(self.delay)?;
        if self.duration.is_zero() {
            return Some(1.0);
        }
        Some((running.as_secs_f64() / self.duration.as_secs_f64()).min(1.0))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Animator {
    frame_interval: Duration,
    enabled: bool,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(Duration::from_millis(16))
    }
}

impl Animator {
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            frame_interval: frame_interval.max(Duration::from_millis(1)),
            enabled: true,
        }
    }

    /// Animator that applies end states immediately.
    pub fn instant() -> Self {
        Self {
            frame_interval: Duration::ZERO,
            enabled: false,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        if config.animations {
            Self::new(config.frame_interval())
        } else {
            Self::instant()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Run `tweens` together; returns after all have reached their end state.
    ///
    /// Tweens whose target disappears mid-flight are dropped silently.
    pub async fn play<S: Surface>(&self, surface: &RefCell<S>, tweens: &[Tween]) {
        if tweens.is_empty() {
            return;
        }

        if !self.enabled {
            let mut surface = surface.borrow_mut();
            for tween in tweens {
                surface.set_props(tween.target, tween.to);
            }
            surface.render();
            return;
        }

        let starts: Vec<Option<VisualProps>> = {
            let surface = surface.borrow();
            tweens
                .iter()
                .map(|t| surface.drawable(t.target).map(|d| d.props))
                .collect()
        };
        let total = tweens.iter().map(Tween::end).max().unwrap_or_default();
        let started = Instant::now();

        loop {
            let elapsed = started.elapsed();
            {
                let mut surface = surface.borrow_mut();
                for (tween, start) in tweens.iter().zip(&starts) {
                    let (Some(start), Some(t)) = (start, tween.progress(elapsed)) else {
                        continue;
                    };
                    if !surface.set_props(tween.target, start.lerp(&tween.to, t)) {
                        log::trace!("tween target {:?} is gone", tween.target);
                    }
                }
                surface.render();
            }
            if elapsed >= total {
                break;
            }
            sleep(self.frame_interval.min(total - elapsed)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comic_core::Rect;
    use comic_core::model::{Drawable, DrawableKind};
    use comic_render::SceneCanvas;

    fn canvas_with_hidden() -> (RefCell<SceneCanvas>, DrawableId) {
        let mut canvas = SceneCanvas::default();
        let id = canvas.add(
            Drawable::new(
                DrawableKind::PanelFrame,
                Rect::from_origin_size((0.0, 0.0), (10.0, 10.0)),
            )
            .with_props(VisualProps::HIDDEN),
        );
        (RefCell::new(canvas), id)
    }

    #[tokio::test(start_paused = true)]
    async fn tween_settles_at_end_state() {
        let (canvas, id) = canvas_with_hidden();
        let animator = Animator::default();
        let started = Instant::now();
        animator
            .play(
                &canvas,
                &[Tween::new(id, VisualProps::VISIBLE, Duration::from_millis(500))],
            )
            .await;
        assert_eq!(
            canvas.borrow().drawable(id).unwrap().props,
            VisualProps::VISIBLE
        );
        assert!(started.elapsed() >= Duration::from_millis(500));
        assert!(canvas.borrow().frames_rendered() > 1);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_holds_start_state() {
        let (canvas, id) = canvas_with_hidden();
        let animator = Animator::default();
        let tween = Tween::new(id, VisualProps::VISIBLE, Duration::from_millis(100))
            .delayed(Duration::from_millis(400));

        let check = async {
            sleep(Duration::from_millis(200)).await;
            canvas.borrow().drawable(id).unwrap().props
        };
        let tweens = [tween];
        let ((), midway) = tokio::join!(animator.play(&canvas, &tweens), check);
        assert_eq!(midway, VisualProps::HIDDEN);
        assert_eq!(
            canvas.borrow().drawable(id).unwrap().props,
            VisualProps::VISIBLE
        );
    }

    #[tokio::test(start_paused = true)]
    async fn siblings_run_in_parallel() {
        let (canvas, a) = canvas_with_hidden();
        let b = canvas.borrow_mut().add(
            Drawable::new(
                DrawableKind::PanelFrame,
                Rect::from_origin_size((20.0, 0.0), (10.0, 10.0)),
            )
            .with_props(VisualProps::HIDDEN),
        );
        let started = Instant::now();
        Animator::default()
            .play(
                &canvas,
                &[
                    Tween::new(a, VisualProps::VISIBLE, Duration::from_millis(400)),
                    Tween::new(b, VisualProps::VISIBLE, Duration::from_millis(400)),
                ],
            )
            .await;
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(400));
        assert!(elapsed < Duration::from_millis(800));
    }

    #[tokio::test]
    async fn instant_animator_jumps() {
        let (canvas, id) = canvas_with_hidden();
        Animator::instant()
            .play(
                &canvas,
                &[Tween::new(id, VisualProps::VISIBLE, Duration::from_secs(10))],
            )
            .await;
        assert_eq!(
            canvas.borrow().drawable(id).unwrap().props,
            VisualProps::VISIBLE
        );
        assert_eq!(canvas.borrow().frames_rendered(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn removed_target_is_ignored() {
        let (canvas, id) = canvas_with_hidden();
        canvas.borrow_mut().remove(id);
        Animator::default()
            .play(
                &canvas,
                &[Tween::new(id, VisualProps::VISIBLE, Duration::from_millis(50))],
            )
            .await;
        assert!(canvas.borrow().is_empty());
    }
}
