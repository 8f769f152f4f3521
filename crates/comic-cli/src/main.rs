//! `comic`: Comic Draft on the command line.
//!
//! - `comic analyze` segments a story and prints the panel report as JSON.
//! - `comic render` lays the story out on a page and writes SVG and
//!   document JSON.
//! - `comic session` is an interactive editing session with undo/redo and
//!   periodic autosave into a directory of JSON files.

mod repl;
mod store;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use comic_core::{AnalysisReport, analyze_text};
use comic_editor::{EditorConfig, EditorSession, Materializer};
use comic_render::{CanvasConfig, SceneCanvas};
use log::{info, warn};
use repl::{ConsoleObserver, Flow, HELP, ReplCommand};
use std::cell::RefCell;
use std::io::{Read as _, Write as _};
use std::path::{Path, PathBuf};
use store::FileStore;
use tokio::io::{AsyncBufReadExt as _, BufReader};

#[derive(Parser, Debug)]
#[command(name = "comic", version, about = "Turn prose into comic panels")]
struct Cli {
    /// Editor configuration JSON. Missing keys keep their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log pipeline steps (same as RUST_LOG=debug).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Segment a story and print the panel report as JSON.
    Analyze(InputArgs),
    /// Lay a story out on a page and write SVG plus document JSON.
    Render(RenderArgs),
    /// Interactive editing session on stdin.
    Session(SessionArgs),
}

#[derive(Parser, Debug)]
struct InputArgs {
    /// Story text file. Reads stdin when omitted.
    input: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output SVG path.
    #[arg(long, default_value = "comic.svg")]
    svg: PathBuf,

    /// Output document JSON path.
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SessionArgs {
    /// Directory saved comics are written to.
    #[arg(long, default_value = "comics")]
    store: PathBuf,

    /// Initial comic title.
    #[arg(long)]
    title: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_deref())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("start runtime")?;

    match cli.cmd {
        Command::Analyze(args) => cmd_analyze(args),
        Command::Render(args) => runtime.block_on(cmd_render(args, config)),
        Command::Session(args) => runtime.block_on(cmd_session(args, config)),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    let Some(path) = path else {
        return Ok(EditorConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    EditorConfig::from_json(&text).with_context(|| format!("parse config '{}'", path.display()))
}

fn read_input(args: &InputArgs) -> Result<String> {
    match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("read story '{}'", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("read story from stdin")?;
            Ok(text)
        }
    }
}

fn cmd_analyze(args: InputArgs) -> Result<()> {
    let text = read_input(&args)?;
    let report = AnalysisReport::from(analyze_text(&text, None));
    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.success {
        std::process::exit(1);
    }
    Ok(())
}

async fn cmd_render(args: RenderArgs, mut config: EditorConfig) -> Result<()> {
    let text = read_input(&args.input)?;
    let analysis = analyze_text(&text, None)?;

    // Offline renders skip animation.
    config.animations = false;
    let surface = RefCell::new(SceneCanvas::new(CanvasConfig {
        width: config.canvas.width,
        height: config.canvas.height,
    }));
    let report = Materializer::new(&config)
        .create_panels_from_analysis(&analysis, &surface)
        .await?;
    if !report.skipped.is_empty() {
        warn!("No frame for panels {:?}", report.skipped);
    }

    let canvas = surface.into_inner();
    write_file(&args.svg, canvas.to_svg())?;
    if let Some(json) = &args.json {
        write_file(json, canvas.to_json_pretty()?)?;
    }
    eprintln!("wrote {} ({} panels)", args.svg.display(), report.created);
    Ok(())
}

fn write_file(path: &Path, contents: String) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("write '{}'", path.display()))
}

async fn cmd_session(args: SessionArgs, config: EditorConfig) -> Result<()> {
    let canvas = SceneCanvas::new(CanvasConfig {
        width: config.canvas.width,
        height: config.canvas.height,
    });
    let store = FileStore::new(&args.store);
    info!("Saving to {}", store.dir().display());
    let session = EditorSession::new(canvas, store, &config).with_observer(ConsoleObserver);
    if let Some(title) = args.title {
        session.set_title(title);
    }

    let mut autosave = session.autosave_timer();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();
    eprintln!("{HELP}");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("read stdin")? else {
                    break;
                };
                let command = match ReplCommand::parse(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(err) => {
                        eprintln!("{err}");
                        continue;
                    }
                };
                match repl::execute(&session, command, &mut stdout).await {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(err) => eprintln!("{err:#}"),
                }
                stdout.flush()?;
            }
            () = autosave.tick() => {
                if let Err(err) = session.autosave_tick().await {
                    warn!("Autosave check failed: {err}");
                }
            }
        }
    }

    if session.has_unsaved_changes()? && !session.surface().document().drawables.is_empty() {
        eprintln!("unsaved changes were not saved");
    }
    Ok(())
}
