//! The editing session: one document, its history, and every entry point
//! that mutates it.
//!
//! All methods take `&self` and run on a single cooperative task. The
//! surface sits in a `RefCell` and is never borrowed across an await; the
//! `busy` flag keeps a second long-running operation from starting while
//! one is suspended. Anything that arrives while busy is answered with
//! `Applied::Ignored`.

use crate::config::EditorConfig;
use crate::edit::{Edit, apply_edit};
use crate::error::EditorError;
use crate::history::SnapshotHistory;
use crate::import::{StorySource, parse_story_url, read_text_upload, sanitize_story};
use crate::materialize::{MaterializeReport, Materializer};
use crate::persist::{SaveBackend, SaveOutcome, SavePayload};
use crate::shortcuts::{EditorAction, ShortcutMap};
use comic_core::model::{Background, Snapshot};
use comic_core::{
    DrawableId, InputError, NoSuggestions, SceneSuggester, Surface, SurfaceError, analyze_text,
};
use log::{debug, info, warn};
use std::cell::{Cell, RefCell};
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

// ─── Outcomes & feedback ────────────────────────────────────────────────

/// Result of a mutating entry point that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied<T = ()> {
    /// The operation ran.
    Done(T),
    /// Nothing to do (empty history, missing target, …).
    NoOp,
    /// Another operation was in flight; the request was dropped.
    Ignored,
}

impl<T> Applied<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, Applied::Done(_))
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, Applied::Ignored)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Info,
    Success,
    Error,
}

/// UI hooks: the loading indicator and transient feedback messages.
pub trait SessionObserver {
    fn loading(&self, _on: bool) {}
    fn feedback(&self, _kind: FeedbackKind, _message: &str) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl SessionObserver for NullObserver {}

/// Holds the busy flag for the lifetime of one operation and clears it,
/// along with the loading indicator, on every exit path.
struct BusyGuard<'a> {
    busy: &'a Cell<bool>,
    observer: &'a dyn SessionObserver,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.busy.set(false);
        self.observer.loading(false);
    }
}

/// An open gesture. Edits applied while it lives form one undo step,
/// recorded when it is finished or dropped.
pub struct Gesture<'a, S: Surface> {
    surface: &'a RefCell<S>,
    history: &'a RefCell<SnapshotHistory>,
    open: bool,
}

impl<S: Surface> Gesture<'_, S> {
    /// Close the gesture. Returns `true` if it recorded an undo step.
    pub fn finish(mut self) -> Result<bool, SurfaceError> {
        let snapshot = self.surface.borrow().serialize()?;
        self.open = false;
        Ok(self.history.borrow_mut().end_gesture(&snapshot))
    }
}

impl<S: Surface> Drop for Gesture<'_, S> {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        let closed = match self.surface.borrow().serialize() {
            Ok(snapshot) => self.history.borrow_mut().end_gesture(&snapshot),
            Err(err) => {
                warn!("Closing gesture without a snapshot: {err}");
                self.history.borrow_mut().force_end_gesture()
            }
        };
        debug!("Gesture dropped (step recorded: {closed})");
    }
}

// ─── Session ────────────────────────────────────────────────────────────

pub struct EditorSession<S, B, G = NoSuggestions> {
    surface: RefCell<S>,
    history: RefCell<SnapshotHistory>,
    materializer: Materializer,
    backend: B,
    suggester: G,
    observer: Box<dyn SessionObserver>,
    busy: Cell<bool>,
    title: RefCell<String>,
    last_saved: RefCell<Option<Snapshot>>,
    autosave_interval: Duration,
}

impl<S: Surface, B: SaveBackend> EditorSession<S, B> {
    pub fn new(surface: S, backend: B, config: &EditorConfig) -> Self {
        EditorSession::with_suggester(surface, backend, NoSuggestions, config)
    }
}

impl<S: Surface, B: SaveBackend, G: SceneSuggester> EditorSession<S, B, G> {
    pub fn with_suggester(surface: S, backend: B, suggester: G, config: &EditorConfig) -> Self {
        Self {
            surface: RefCell::new(surface),
            history: RefCell::new(SnapshotHistory::new(config.history_depth)),
            materializer: Materializer::new(config),
            backend,
            suggester,
            observer: Box::new(NullObserver),
            busy: Cell::new(false),
            title: RefCell::new(String::new()),
            last_saved: RefCell::new(None),
            autosave_interval: config.autosave_interval(),
        }
    }

    pub fn with_observer(mut self, observer: impl SessionObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn with_materializer(mut self, materializer: Materializer) -> Self {
        self.materializer = materializer;
        self
    }

    // ── Accessors ──

    pub fn surface(&self) -> std::cell::Ref<'_, S> {
        self.surface.borrow()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn history(&self) -> std::cell::Ref<'_, SnapshotHistory> {
        self.history.borrow()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    pub fn title(&self) -> String {
        self.title.borrow().clone()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        *self.title.borrow_mut() = title.into();
    }

    pub fn snapshot(&self) -> Result<Snapshot, SurfaceError> {
        self.surface.borrow().serialize()
    }

    fn try_begin(&self) -> Option<BusyGuard<'_>> {
        if self.busy.get() {
            return None;
        }
        self.busy.set(true);
        self.observer.loading(true);
        Some(BusyGuard {
            busy: &self.busy,
            observer: self.observer.as_ref(),
        })
    }

    fn report<T>(&self, result: Result<T, EditorError>) -> Result<T, EditorError> {
        if let Err(err) = &result {
            self.observer.feedback(FeedbackKind::Error, &err.to_string());
        }
        result
    }

    // ── History ──

    /// Push the current document onto the undo stack and clear redo.
    pub fn capture(&self) -> Result<(), SurfaceError> {
        let snapshot = self.surface.borrow().serialize()?;
        self.history.borrow_mut().push(snapshot);
        Ok(())
    }

    pub fn undo(&self) -> Result<Applied, EditorError> {
        self.step(true)
    }

    pub fn redo(&self) -> Result<Applied, EditorError> {
        self.step(false)
    }

    fn step(&self, backwards: bool) -> Result<Applied, EditorError> {
        let Some(_guard) = self.try_begin() else {
            return Ok(Applied::Ignored);
        };

        let current = self.surface.borrow().serialize()?;
        let target = {
            let mut history = self.history.borrow_mut();
            if backwards {
                history.undo(current)
            } else {
                history.redo(current)
            }
        };
        let Some(target) = target else {
            return Ok(Applied::NoOp);
        };

        let mut surface = self.surface.borrow_mut();
        if let Err(err) = surface.deserialize(&target) {
            let mut history = self.history.borrow_mut();
            if backwards {
                history.revert_undo(target);
            } else {
                history.revert_redo(target);
            }
            return Err(err.into());
        }
        surface.render();
        debug!("{} applied", if backwards { "Undo" } else { "Redo" });
        Ok(Applied::Done(()))
    }

    /// Start a run of manual edits that undo as one step. The gesture
    /// ends when the returned guard is finished or dropped.
    pub fn gesture(&self) -> Result<Gesture<'_, S>, SurfaceError> {
        let snapshot = self.surface.borrow().serialize()?;
        self.history.borrow_mut().begin_gesture(snapshot);
        Ok(Gesture {
            surface: &self.surface,
            history: &self.history,
            open: true,
        })
    }

    // ── Structural mutations ──

    /// Replace the page with the empty frames of layout `name`.
    pub async fn apply_layout(&self, name: &str) -> Result<Applied<Vec<DrawableId>>, EditorError> {
        let Some(_guard) = self.try_begin() else {
            return Ok(Applied::Ignored);
        };
        let result = async {
            self.materializer.layouts().get(name)?;
            self.capture()?;
            let frames = self.materializer.apply_layout(name, &self.surface).await?;
            info!("Layout {name} applied");
            Ok::<_, EditorError>(frames)
        }
        .await
        .map(Applied::Done);
        self.report(result)
    }

    /// Re-segment `text` and rebuild the page from it.
    pub async fn update_panel_text(&self, text: &str) -> Result<Applied<MaterializeReport>, EditorError> {
        let Some(_guard) = self.try_begin() else {
            debug!("Panel update in progress, skipping");
            return Ok(Applied::Ignored);
        };
        let result = self.rebuild_from_text(text).await.map(Applied::Done);
        self.report(result)
    }

    /// Load a `.txt` upload and rebuild the page from its contents.
    pub async fn import_text_file(
        &self,
        name: &str,
        bytes: &[u8],
    ) -> Result<Applied<MaterializeReport>, EditorError> {
        let Some(_guard) = self.try_begin() else {
            return Ok(Applied::Ignored);
        };
        let result = async {
            let text = read_text_upload(name, bytes)?;
            let report = self.rebuild_from_text(&text).await?;
            self.observer
                .feedback(FeedbackKind::Success, "Text file processed successfully!");
            Ok::<_, EditorError>(report)
        }
        .await
        .map(Applied::Done);
        self.report(result)
    }

    /// Fetch a story from `url` and rebuild the page from it.
    pub async fn import_story<R: StorySource>(
        &self,
        source: &R,
        url: &str,
    ) -> Result<Applied<MaterializeReport>, EditorError> {
        let Some(_guard) = self.try_begin() else {
            return Ok(Applied::Ignored);
        };
        let result = async {
            let url = parse_story_url(url)?;
            info!("Importing story from {url}");
            let content = sanitize_story(&source.fetch_story(&url).await?);
            let report = self.rebuild_from_text(&content).await?;
            self.observer
                .feedback(FeedbackKind::Success, "Content imported successfully!");
            Ok::<_, EditorError>(report)
        }
        .await
        .map(Applied::Done);
        self.report(result)
    }

    /// Replace the page with panels holding base64 JPEG video frames.
    pub async fn import_frames(&self, frames: &[String]) -> Result<Applied<Vec<DrawableId>>, EditorError> {
        let Some(_guard) = self.try_begin() else {
            return Ok(Applied::Ignored);
        };
        let result = async {
            crate::import::validate_frames(frames)?;
            self.capture()?;
            let panels = self
                .materializer
                .create_panels_from_frames(frames, &self.surface)
                .await?;
            self.observer
                .feedback(FeedbackKind::Success, "Video processed successfully!");
            Ok::<_, EditorError>(panels)
        }
        .await
        .map(Applied::Done);
        self.report(result)
    }

    /// Analyze first so a rejected text leaves history untouched, then
    /// capture, fade the old page out and materialize the new one.
    async fn rebuild_from_text(&self, text: &str) -> Result<MaterializeReport, EditorError> {
        let hints = match self.suggester.suggest_scenes(text).await {
            Ok(hints) => Some(hints),
            Err(err) => {
                debug!("Scene suggestions unavailable: {err}");
                None
            }
        };
        let analysis = analyze_text(text, hints.as_deref())?;

        self.capture()?;
        self.materializer
            .fade_out_current_panels(&self.surface)
            .await;
        let report = self
            .materializer
            .create_panels_from_analysis(&analysis, &self.surface)
            .await?;
        info!("Panel update completed");
        Ok(report)
    }

    pub fn add_panel(&self) -> Result<Applied<DrawableId>, EditorError> {
        let Some(_guard) = self.try_begin() else {
            return Ok(Applied::Ignored);
        };
        self.capture()?;
        let id = self.materializer.add_panel(&mut *self.surface.borrow_mut());
        Ok(Applied::Done(id))
    }

    pub fn set_background(&self, source: &str) -> Result<Applied, EditorError> {
        let Some(_guard) = self.try_begin() else {
            return Ok(Applied::Ignored);
        };
        self.capture()?;
        let mut surface = self.surface.borrow_mut();
        surface.set_background(Some(Background {
            source: source.to_string(),
        }));
        surface.render();
        Ok(Applied::Done(()))
    }

    /// Apply one hand edit. Outside a gesture the document is captured
    /// first; inside one the gesture records the step when it ends.
    pub fn apply_edit(&self, edit: &Edit) -> Result<Applied, EditorError> {
        let Some(_guard) = self.try_begin() else {
            return Ok(Applied::Ignored);
        };
        if !edit.applies_to(&*self.surface.borrow()) {
            return Ok(Applied::NoOp);
        }
        if !self.history.borrow().in_gesture() {
            self.capture()?;
        }
        let mut surface = self.surface.borrow_mut();
        apply_edit(&mut *surface, edit);
        surface.render();
        Ok(Applied::Done(()))
    }

    // ── Persistence ──

    /// `true` when the document differs from the last successful save,
    /// or nothing has been saved yet.
    pub fn has_unsaved_changes(&self) -> Result<bool, SurfaceError> {
        let current = self.surface.borrow().serialize()?;
        Ok(self.last_saved.borrow().as_ref() != Some(&current))
    }

    /// Save the document under the session title.
    ///
    /// Explicit saves need a title, skip the backend when nothing changed,
    /// and return backend failures. Autosaves fall back to the default
    /// title and only log failures.
    pub async fn save(&self, is_autosave: bool) -> Result<SaveOutcome, EditorError> {
        let title = self.title();
        if title.trim().is_empty() && !is_autosave {
            return self.report(Err(InputError::MissingTitle.into()));
        }

        let current = self.surface.borrow().serialize()?;
        if !is_autosave && self.last_saved.borrow().as_ref() == Some(&current) {
            self.observer.feedback(FeedbackKind::Info, "No changes to save");
            return Ok(SaveOutcome::Unchanged);
        }

        let payload = SavePayload::new(&title, current.as_str());
        match self.backend.save(&payload).await {
            Ok(()) => {
                *self.last_saved.borrow_mut() = Some(current);
                if !is_autosave {
                    self.observer
                        .feedback(FeedbackKind::Success, "Comic saved successfully!");
                }
                info!("Saved \"{}\" ({} bytes)", payload.title, payload.content.len());
                Ok(SaveOutcome::Saved)
            }
            Err(err) if is_autosave => {
                warn!("Autosave failed: {err}");
                Ok(SaveOutcome::Suppressed)
            }
            Err(err) => self.report(Err(err.into())),
        }
    }

    /// One autosave check: saves silently when idle and changed.
    /// Returns `None` when the tick was skipped.
    pub async fn autosave_tick(&self) -> Result<Option<SaveOutcome>, EditorError> {
        if self.busy.get() {
            debug!("Autosave skipped: operation in progress");
            return Ok(None);
        }
        if !self.has_unsaved_changes()? {
            return Ok(None);
        }
        self.save(true).await.map(Some)
    }

    pub fn autosave_timer(&self) -> AutosaveTimer {
        AutosaveTimer::new(self.autosave_interval)
    }

    // ── Shortcuts ──

    /// Resolve a key event and run the bound action, if any.
    pub async fn handle_key(
        &self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> Option<Result<Applied, EditorError>> {
        let action = ShortcutMap::resolve(key, ctrl, shift, alt, meta)?;
        Some(self.dispatch(action).await)
    }

    pub async fn dispatch(&self, action: EditorAction) -> Result<Applied, EditorError> {
        match action {
            EditorAction::Undo => self.undo(),
            EditorAction::Redo => self.redo(),
            EditorAction::Save => self.save(false).await.map(|outcome| match outcome {
                SaveOutcome::Unchanged => Applied::NoOp,
                _ => Applied::Done(()),
            }),
            EditorAction::AddPanel => self.add_panel().map(|applied| match applied {
                Applied::Done(_) => Applied::Done(()),
                Applied::NoOp => Applied::NoOp,
                Applied::Ignored => Applied::Ignored,
            }),
        }
    }
}

// ─── Autosave ───────────────────────────────────────────────────────────

/// Periodic autosave trigger. The first tick fires one full period after
/// creation; ticks missed while the session was busy are skipped, not
/// replayed.
#[derive(Debug)]
pub struct AutosaveTimer {
    interval: Interval,
}

impl AutosaveTimer {
    pub fn new(period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }

    pub fn period(&self) -> Duration {
        self.interval.period()
    }

    /// Wait for the next tick. Cancel safe.
    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }
}
