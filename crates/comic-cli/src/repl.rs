//! Line commands for `comic session`.
//!
//! Every command maps onto one `EditorSession` entry point. Point-based
//! edits pick their target with a hit test on the canvas.

use anyhow::{Context as _, Result, bail};
use comic_core::DrawableId;
use comic_editor::{Applied, Edit, EditorSession, FeedbackKind, SaveBackend, SessionObserver};
use comic_render::SceneCanvas;
use kurbo::Point;
use log::debug;
use std::io::Write;
use std::path::PathBuf;

pub const HELP: &str = "\
commands:
  text <story>            rebuild the page from text
  load <file.txt>         rebuild the page from a text file
  frames <b64> [b64 ...]  replace the page with video frame panels
  layout <name>           replace the page with empty layout frames (2x2, 3x2)
  add                     add an empty panel
  bg <source>             set the page background
  move <x> <y> <dx> <dy>  move the drawable under (x, y)
  drag <x> <y> <dx> <dy> <steps>
                          move in steps, undone as one
  resize <x> <y> <w> <h>  resize the drawable under (x, y)
  say <x> <y> <text>      replace the text under (x, y)
  del <x> <y>             delete the drawable under (x, y)
  undo | redo
  title <title>           set the comic title
  save                    save now
  svg <file.svg>          export the page
  status                  show page and history state
  help | quit";

/// Upper bound on the edits one `drag` may apply.
pub const MAX_DRAG_STEPS: u32 = 1000;

#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Text(String),
    Load(PathBuf),
    Frames(Vec<String>),
    Layout(String),
    Add,
    Background(String),
    Move { at: Point, dx: f64, dy: f64 },
    Drag { at: Point, dx: f64, dy: f64, steps: u32 },
    Resize { at: Point, width: f64, height: f64 },
    Say { at: Point, text: String },
    Delete { at: Point },
    Undo,
    Redo,
    Title(String),
    Save,
    Svg(PathBuf),
    Status,
    Help,
    Quit,
}

impl ReplCommand {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match word {
            "" => return Ok(None),
            "text" => ReplCommand::Text(required(rest, "text")?.to_string()),
            "load" => ReplCommand::Load(PathBuf::from(required(rest, "file")?)),
            "frames" => ReplCommand::Frames(rest.split_whitespace().map(str::to_string).collect()),
            "layout" => ReplCommand::Layout(required(rest, "layout name")?.to_string()),
            "add" => ReplCommand::Add,
            "bg" => ReplCommand::Background(required(rest, "source")?.to_string()),
            "move" => {
                let [x, y, dx, dy] = numbers(rest)?;
                ReplCommand::Move {
                    at: Point::new(x, y),
                    dx,
                    dy,
                }
            }
            "drag" => {
                let [x, y, dx, dy, steps] = numbers(rest)?;
                if steps.fract() != 0.0 || !(1.0..=f64::from(MAX_DRAG_STEPS)).contains(&steps) {
                    bail!("drag steps must be a whole number from 1 to {MAX_DRAG_STEPS}");
                }
                ReplCommand::Drag {
                    at: Point::new(x, y),
                    dx,
                    dy,
                    steps: steps as u32,
                }
            }
            "resize" => {
                let [x, y, width, height] = numbers(rest)?;
                ReplCommand::Resize {
                    at: Point::new(x, y),
                    width,
                    height,
                }
            }
            "say" => {
                let mut parts = rest.splitn(3, char::is_whitespace);
                let (Some(x), Some(y), Some(text)) = (parts.next(), parts.next(), parts.next())
                else {
                    bail!("usage: say <x> <y> <text>");
                };
                ReplCommand::Say {
                    at: Point::new(number(x)?, number(y)?),
                    text: text.trim().to_string(),
                }
            }
            "del" => {
                let [x, y] = numbers(rest)?;
                ReplCommand::Delete {
                    at: Point::new(x, y),
                }
            }
            "undo" => ReplCommand::Undo,
            "redo" => ReplCommand::Redo,
            "title" => ReplCommand::Title(rest.to_string()),
            "save" => ReplCommand::Save,
            "svg" => ReplCommand::Svg(PathBuf::from(required(rest, "file")?)),
            "status" => ReplCommand::Status,
            "help" | "?" => ReplCommand::Help,
            "quit" | "exit" => ReplCommand::Quit,
            other => bail!("unknown command '{other}' (try 'help')"),
        };
        Ok(Some(command))
    }
}

fn required<'a>(rest: &'a str, what: &str) -> Result<&'a str> {
    if rest.is_empty() {
        bail!("missing {what}");
    }
    Ok(rest)
}

fn number(word: &str) -> Result<f64> {
    word.parse()
        .with_context(|| format!("'{word}' is not a number"))
}

fn numbers<const N: usize>(rest: &str) -> Result<[f64; N]> {
    let values = rest
        .split_whitespace()
        .map(number)
        .collect::<Result<Vec<_>>>()?;
    let count = values.len();
    values
        .try_into()
        .map_err(|_| anyhow::anyhow!("expected {N} numbers, got {count}"))
}

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Prints session feedback to stderr.
pub struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn loading(&self, on: bool) {
        debug!("loading: {on}");
    }

    fn feedback(&self, kind: FeedbackKind, message: &str) {
        let tag = match kind {
            FeedbackKind::Info => "info",
            FeedbackKind::Success => "ok",
            FeedbackKind::Error => "error",
        };
        eprintln!("[{tag}] {message}");
    }
}

type Session<B> = EditorSession<SceneCanvas, B>;

fn target_at<B: SaveBackend>(session: &Session<B>, at: Point) -> Result<DrawableId> {
    session
        .surface()
        .drawable_at(at)
        .with_context(|| format!("nothing at ({}, {})", at.x, at.y))
}

fn describe<T>(applied: &Applied<T>) -> &'static str {
    match applied {
        Applied::Done(_) => "done",
        Applied::NoOp => "nothing to do",
        Applied::Ignored => "busy, ignored",
    }
}

/// Run one command against `session`, writing results to `out`.
pub async fn execute<B: SaveBackend>(
    session: &Session<B>,
    command: ReplCommand,
    out: &mut impl Write,
) -> Result<Flow> {
    match command {
        ReplCommand::Text(text) => {
            let applied = session.update_panel_text(&text).await?;
            if let Applied::Done(report) = &applied {
                writeln!(out, "created {} panels", report.created)?;
                if !report.skipped.is_empty() {
                    writeln!(out, "no frame for panels {:?}", report.skipped)?;
                }
            } else {
                writeln!(out, "{}", describe(&applied))?;
            }
        }
        ReplCommand::Load(path) => {
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("read '{}'", path.display()))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let applied = session.import_text_file(&name, &bytes).await?;
            writeln!(out, "{}", describe(&applied))?;
        }
        ReplCommand::Frames(frames) => {
            let applied = session.import_frames(&frames).await?;
            if let Applied::Done(panels) = &applied {
                writeln!(out, "created {} panels", panels.len())?;
            } else {
                writeln!(out, "{}", describe(&applied))?;
            }
        }
        ReplCommand::Layout(name) => {
            let applied = session.apply_layout(&name).await?;
            if let Applied::Done(frames) = &applied {
                writeln!(out, "laid out {} frames", frames.len())?;
            } else {
                writeln!(out, "{}", describe(&applied))?;
            }
        }
        ReplCommand::Add => {
            let applied = session.add_panel()?;
            if let Applied::Done(id) = applied {
                writeln!(out, "added {id}")?;
            } else {
                writeln!(out, "{}", describe(&applied))?;
            }
        }
        ReplCommand::Background(source) => {
            writeln!(out, "{}", describe(&session.set_background(&source)?))?;
        }
        ReplCommand::Move { at, dx, dy } => {
            let id = target_at(session, at)?;
            writeln!(out, "{}", describe(&session.apply_edit(&Edit::Move { id, dx, dy })?))?;
        }
        ReplCommand::Drag { at, dx, dy, steps } => {
            let id = target_at(session, at)?;
            let step = Edit::Move {
                id,
                dx: dx / f64::from(steps),
                dy: dy / f64::from(steps),
            };
            let gesture = session.gesture()?;
            for _ in 0..steps {
                session.apply_edit(&step)?;
            }
            let recorded = gesture.finish()?;
            writeln!(out, "{}", if recorded { "done" } else { "nothing to do" })?;
        }
        ReplCommand::Resize { at, width, height } => {
            let id = target_at(session, at)?;
            let edit = Edit::Resize { id, width, height };
            writeln!(out, "{}", describe(&session.apply_edit(&edit)?))?;
        }
        ReplCommand::Say { at, text } => {
            let id = target_at(session, at)?;
            let edit = Edit::SetText { id, content: text };
            writeln!(out, "{}", describe(&session.apply_edit(&edit)?))?;
        }
        ReplCommand::Delete { at } => {
            let id = target_at(session, at)?;
            writeln!(out, "{}", describe(&session.apply_edit(&Edit::Remove { id })?))?;
        }
        ReplCommand::Undo => writeln!(out, "{}", describe(&session.undo()?))?,
        ReplCommand::Redo => writeln!(out, "{}", describe(&session.redo()?))?,
        ReplCommand::Title(title) => {
            session.set_title(title);
            writeln!(out, "title: {:?}", session.title())?;
        }
        ReplCommand::Save => {
            let outcome = session.save(false).await?;
            writeln!(out, "{outcome:?}")?;
        }
        ReplCommand::Svg(path) => {
            let svg = session.surface().to_svg();
            tokio::fs::write(&path, svg)
                .await
                .with_context(|| format!("write svg '{}'", path.display()))?;
            writeln!(out, "wrote {}", path.display())?;
        }
        ReplCommand::Status => {
            let history = session.history();
            writeln!(
                out,
                "{} drawables, undo {}, redo {}, unsaved: {}",
                session.surface().document().drawables.len(),
                history.undo_len(),
                history.redo_len(),
                session.has_unsaved_changes()?
            )?;
        }
        ReplCommand::Help => writeln!(out, "{HELP}")?,
        ReplCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use comic_core::Surface;
    use comic_editor::{EditorConfig, SavePayload, TransportError};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Kept(RefCell<Vec<SavePayload>>);

    impl SaveBackend for Kept {
        async fn save(&self, payload: &SavePayload) -> Result<(), TransportError> {
            self.0.borrow_mut().push(payload.clone());
            Ok(())
        }
    }

    fn session() -> Session<Kept> {
        EditorSession::new(SceneCanvas::default(), Kept::default(), &EditorConfig::default())
    }

    async fn run(session: &Session<Kept>, line: &str) -> String {
        let command = ReplCommand::parse(line).unwrap().unwrap();
        let mut out = Vec::new();
        execute(session, command, &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parse_commands() {
        assert_eq!(ReplCommand::parse("   ").unwrap(), None);
        assert_eq!(ReplCommand::parse("add").unwrap(), Some(ReplCommand::Add));
        assert_eq!(
            ReplCommand::parse("text Once upon a time").unwrap(),
            Some(ReplCommand::Text("Once upon a time".into()))
        );
        assert_eq!(
            ReplCommand::parse("move 10 20 -5 2.5").unwrap(),
            Some(ReplCommand::Move {
                at: Point::new(10.0, 20.0),
                dx: -5.0,
                dy: 2.5
            })
        );
        assert_eq!(
            ReplCommand::parse("say 5 6 Hello there").unwrap(),
            Some(ReplCommand::Say {
                at: Point::new(5.0, 6.0),
                text: "Hello there".into()
            })
        );
        assert_eq!(ReplCommand::parse("exit").unwrap(), Some(ReplCommand::Quit));
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(ReplCommand::parse("text").is_err());
        assert!(ReplCommand::parse("move 1 2 3").is_err());
        assert!(ReplCommand::parse("move a b c d").is_err());
        assert!(ReplCommand::parse("drag 1 2 3 4 0").is_err());
        assert!(ReplCommand::parse("drag 0 0 1 1 1e12").is_err());
        assert!(ReplCommand::parse("drag 0 0 1 1 2.5").is_err());
        assert!(ReplCommand::parse("drag 0 0 1 1 NaN").is_err());
        assert!(ReplCommand::parse("layout").is_err());
        assert!(ReplCommand::parse("fly away").is_err());
    }

    #[tokio::test]
    async fn add_move_undo() {
        let session = session();
        assert!(run(&session, "add").await.starts_with("added panel_"));
        assert_eq!(run(&session, "move 50 50 100 0").await, "done\n");
        let bounds = session.surface().document().drawables[0].bounds;
        assert_eq!((bounds.x0, bounds.y0), (110.0, 10.0));

        assert_eq!(run(&session, "undo").await, "done\n");
        let bounds = session.surface().document().drawables[0].bounds;
        assert_eq!((bounds.x0, bounds.y0), (10.0, 10.0));
    }

    #[tokio::test]
    async fn drag_is_one_undo_step() {
        let session = session();
        run(&session, "add").await;
        let depth = session.history().undo_len();
        run(&session, "drag 50 50 40 20 4").await;
        assert_eq!(session.history().undo_len(), depth + 1);
        let bounds = session.surface().document().drawables[0].bounds;
        assert_eq!((bounds.x0, bounds.y0), (50.0, 30.0));
    }

    #[test]
    fn drag_steps_are_bounded() {
        assert_eq!(
            ReplCommand::parse("drag 0 0 10 10 1000").unwrap(),
            Some(ReplCommand::Drag {
                at: Point::ORIGIN,
                dx: 10.0,
                dy: 10.0,
                steps: MAX_DRAG_STEPS
            })
        );
        assert!(ReplCommand::parse("drag 0 0 10 10 1001").is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn layout_switch_undoes() {
        let session = session();
        run(&session, "add").await;
        assert_eq!(run(&session, "layout 3x2").await, "laid out 5 frames\n");
        assert_eq!(session.surface().len(), 5);
        assert_eq!(run(&session, "undo").await, "done\n");
        assert_eq!(session.surface().len(), 1);
    }

    #[tokio::test]
    async fn edits_need_a_target() {
        let session = session();
        let command = ReplCommand::parse("del 700 500").unwrap().unwrap();
        let err = execute(&session, command, &mut Vec::new()).await.unwrap_err();
        assert!(err.to_string().contains("nothing at"));
    }

    #[tokio::test]
    async fn title_then_save() {
        let session = session();
        run(&session, "add").await;
        run(&session, "title Harbor Lights").await;
        assert_eq!(run(&session, "save").await, "Saved\n");
        assert_eq!(run(&session, "save").await, "Unchanged\n");
        assert_eq!(session.backend().0.borrow()[0].title, "Harbor Lights");
        assert!(run(&session, "status").await.contains("unsaved: false"));
    }

    #[tokio::test(start_paused = true)]
    async fn text_builds_page() {
        let session = session();
        let out = run(
            &session,
            "text The keeper climbed the tower stairs every night without fail, \
             humming to himself. Suddenly the lamp went dark.",
        )
        .await;
        assert_eq!(out, "created 1 panels\n");
        assert_eq!(session.surface().len(), 6);
    }
}
