//! Editing engine for Comic Draft.
//!
//! Turns analyzed text into panels on a surface (`materialize`), keeps a
//! snapshot undo/redo history (`history`), and ties both together with
//! persistence and imports in an `EditorSession`.

pub mod animate;
pub mod config;
pub mod edit;
pub mod error;
pub mod history;
pub mod import;
pub mod materialize;
pub mod persist;
pub mod session;
pub mod shortcuts;

pub use animate::{Animator, Tween};
pub use config::EditorConfig;
pub use edit::Edit;
pub use error::{EditorError, TransportError};
pub use history::SnapshotHistory;
pub use import::{StorySource, StoryUrl};
pub use materialize::{MaterializeReport, Materializer};
pub use persist::{DEFAULT_TITLE, SaveBackend, SaveOutcome, SavePayload};
pub use session::{
    Applied, AutosaveTimer, EditorSession, FeedbackKind, Gesture, NullObserver, SessionObserver,
};
pub use shortcuts::{EditorAction, ShortcutMap};
