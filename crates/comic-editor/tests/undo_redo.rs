//! Integration tests: snapshot undo/redo through an `EditorSession`.
//!
//! Drives real mutations against a `SceneCanvas` and checks that history
//! restores documents bit-for-bit.

mod common;

use comic_core::Surface;
use comic_core::model::Snapshot;
use comic_editor::{Applied, Edit, EditorConfig, EditorSession};
use comic_render::SceneCanvas;
use common::{MemoryBackend, config};
use pretty_assertions::assert_eq;

type Session = EditorSession<SceneCanvas, MemoryBackend>;

fn session() -> Session {
    EditorSession::new(SceneCanvas::default(), MemoryBackend::default(), &config())
}

// ─── Basic undo/redo ────────────────────────────────────────────────────

#[test]
fn undo_restores_previous_state() {
    let session = session();
    let before = session.snapshot().unwrap();
    assert!(session.add_panel().unwrap().is_done());
    assert_eq!(session.surface().len(), 1);

    assert_eq!(session.undo().unwrap(), Applied::Done(()));
    assert_eq!(session.snapshot().unwrap(), before);
    assert!(session.surface().is_empty());
}

#[test]
fn redo_reapplies_undone_action() {
    let session = session();
    session.add_panel().unwrap();
    let after = session.snapshot().unwrap();

    session.undo().unwrap();
    assert_eq!(session.redo().unwrap(), Applied::Done(()));
    assert_eq!(session.snapshot().unwrap(), after);
}

#[test]
fn n_captures_undo_and_redo_exactly() {
    let session = session();
    let mut states: Vec<Snapshot> = vec![session.snapshot().unwrap()];
    for i in 0..5 {
        if i % 2 == 0 {
            session.add_panel().unwrap();
        } else {
            session.set_background(&format!("bg_{i}.png")).unwrap();
        }
        states.push(session.snapshot().unwrap());
    }

    for expected in states.iter().rev().skip(1) {
        session.undo().unwrap();
        assert_eq!(&session.snapshot().unwrap(), expected);
    }
    assert_eq!(session.undo().unwrap(), Applied::NoOp);

    for expected in states.iter().skip(1) {
        session.redo().unwrap();
        assert_eq!(&session.snapshot().unwrap(), expected);
    }
    assert_eq!(session.redo().unwrap(), Applied::NoOp);
}

#[test]
fn new_capture_clears_redo() {
    let session = session();
    session.add_panel().unwrap();
    session.undo().unwrap();
    assert!(session.history().can_redo());

    session.set_background("night.png").unwrap();
    assert!(!session.history().can_redo());
    assert_eq!(session.redo().unwrap(), Applied::NoOp);
}

#[test]
fn undo_on_empty_history_is_noop() {
    let session = session();
    let before = session.snapshot().unwrap();
    assert_eq!(session.undo().unwrap(), Applied::NoOp);
    assert_eq!(session.snapshot().unwrap(), before);
    assert_eq!(session.history().redo_len(), 0);
}

// ─── Manual edits & gestures ────────────────────────────────────────────

#[test]
fn each_edit_outside_gesture_is_one_step() {
    let session = session();
    let Applied::Done(id) = session.add_panel().unwrap() else {
        panic!("add_panel ignored");
    };
    let baseline = session.history().undo_len();
    for _ in 0..3 {
        session
            .apply_edit(&Edit::Move {
                id,
                dx: 5.0,
                dy: 0.0,
            })
            .unwrap();
    }
    assert_eq!(session.history().undo_len(), baseline + 3);
}

#[test]
fn gesture_batches_into_single_undo_step() {
    let session = session();
    let Applied::Done(id) = session.add_panel().unwrap() else {
        panic!("add_panel ignored");
    };
    let before_drag = session.snapshot().unwrap();
    let baseline = session.history().undo_len();

    let gesture = session.gesture().unwrap();
    for _ in 0..10 {
        session
            .apply_edit(&Edit::Move {
                id,
                dx: 2.0,
                dy: 1.0,
            })
            .unwrap();
    }
    assert!(gesture.finish().unwrap());
    assert_eq!(session.history().undo_len(), baseline + 1);

    let bounds = session.surface().drawable(id).unwrap().bounds;
    assert_eq!((bounds.x0, bounds.y0), (30.0, 20.0));

    session.undo().unwrap();
    assert_eq!(session.snapshot().unwrap(), before_drag);
}

#[test]
fn empty_gesture_records_nothing() {
    let session = session();
    let gesture = session.gesture().unwrap();
    assert!(!gesture.finish().unwrap());
    assert!(!session.history().can_undo());
}

#[test]
fn dropped_gesture_still_closes() {
    let session = session();
    let Applied::Done(id) = session.add_panel().unwrap() else {
        panic!("add_panel ignored");
    };
    let baseline = session.history().undo_len();
    let drag = || -> Result<(), comic_editor::EditorError> {
        let _gesture = session.gesture()?;
        session.apply_edit(&Edit::Move {
            id,
            dx: 4.0,
            dy: 0.0,
        })?;
        // Bail out halfway through, before finishing.
        Err(comic_core::InputError::EmptyText.into())
    };
    assert!(drag().is_err());
    assert!(!session.history().in_gesture());
    assert_eq!(session.history().undo_len(), baseline + 1);

    // Later edits are captured one by one again.
    session
        .apply_edit(&Edit::Move {
            id,
            dx: 1.0,
            dy: 0.0,
        })
        .unwrap();
    assert_eq!(session.history().undo_len(), baseline + 2);
}

#[test]
fn edit_on_missing_drawable_is_noop_without_capture() {
    let session = session();
    let Applied::Done(id) = session.add_panel().unwrap() else {
        panic!("add_panel ignored");
    };
    session.apply_edit(&Edit::Remove { id }).unwrap();
    let depth = session.history().undo_len();
    assert_eq!(session.apply_edit(&Edit::Remove { id }).unwrap(), Applied::NoOp);
    assert_eq!(session.history().undo_len(), depth);
}

// ─── Depth ──────────────────────────────────────────────────────────────

#[test]
fn history_depth_comes_from_config() {
    let config = EditorConfig {
        history_depth: 3,
        ..EditorConfig::default()
    };
    let session = EditorSession::new(SceneCanvas::default(), MemoryBackend::default(), &config);
    for _ in 0..6 {
        session.add_panel().unwrap();
    }
    assert_eq!(session.history().undo_len(), 3);
    for _ in 0..3 {
        session.undo().unwrap();
    }
    // The three oldest panels can no longer be undone.
    assert_eq!(session.surface().len(), 3);
    assert_eq!(session.undo().unwrap(), Applied::NoOp);
}
