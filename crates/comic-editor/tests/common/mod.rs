//! Shared test doubles for the editor integration tests.

#![allow(dead_code)]

use comic_editor::{
    EditorConfig, FeedbackKind, SaveBackend, SavePayload, SessionObserver, StorySource, StoryUrl,
    TransportError,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Backend that keeps payloads in memory and can be told to fail.
#[derive(Default)]
pub struct MemoryBackend {
    pub saved: RefCell<Vec<SavePayload>>,
    pub calls: Cell<usize>,
    pub fail: Cell<bool>,
}

impl SaveBackend for MemoryBackend {
    async fn save(&self, payload: &SavePayload) -> Result<(), TransportError> {
        self.calls.set(self.calls.get() + 1);
        if self.fail.get() {
            return Err(TransportError::Status { status: 500 });
        }
        self.saved.borrow_mut().push(payload.clone());
        Ok(())
    }
}

/// Observer recording loading transitions and feedback messages.
#[derive(Default)]
pub struct Recorder {
    pub loading: RefCell<Vec<bool>>,
    pub feedback: RefCell<Vec<(FeedbackKind, String)>>,
}

impl Recorder {
    pub fn is_loading(&self) -> bool {
        self.loading.borrow().last().copied().unwrap_or(false)
    }

    pub fn errors(&self) -> Vec<String> {
        self.feedback
            .borrow()
            .iter()
            .filter(|(kind, _)| *kind == FeedbackKind::Error)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

/// Lets a test keep a handle on the recorder it gave the session.
pub struct Shared(pub Rc<Recorder>);

impl SessionObserver for Shared {
    fn loading(&self, on: bool) {
        self.0.loading.borrow_mut().push(on);
    }

    fn feedback(&self, kind: FeedbackKind, message: &str) {
        self.0.feedback.borrow_mut().push((kind, message.to_string()));
    }
}

/// Story source answering every URL with fixed text, or failing.
pub struct FixedStory(pub Result<String, TransportError>);

impl StorySource for FixedStory {
    async fn fetch_story(&self, _url: &StoryUrl) -> Result<String, TransportError> {
        self.0.clone()
    }
}

pub fn config() -> EditorConfig {
    EditorConfig::default()
}

pub const STORY: &str = "The old lighthouse keeper climbed the stairs every night without fail. \
    Suddenly the lamp flickered and went dark while the storm raged outside the tower. \
    Meanwhile a small fishing boat struggled against the waves far below the rocky cliffs.";
