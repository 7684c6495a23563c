//! bbb: browse blame briskly.
//!
//! Shows `git blame` for one file and lets the user warp from a line to the
//! commit that last changed it, then further back, with undo and redo.
//!
//! # Startup sequence
//!
//! 1. Parse arguments, install file logging, load config. Nothing here touches
//!    the terminal, so errors print normally.
//! 2. Discover the repository, resolve the revision and ignore-revs file, and
//!    load the first blame. Failing here exits before the TUI starts.
//! 3. `install_panic_hook()`, `register_sigterm()`, `init_tui()`.
//! 4. Spawn the event task and the highlight thread.
//!
//! `restore_tui()` runs after the event loop exits; the loop only leaves via
//! `break`, so draw errors are carried out of it rather than returned early.

mod app;
mod config;
mod event;
mod git;
mod highlight;
mod logging;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;
use std::sync::atomic::Ordering;

use anyhow::Context;
use bbb_core::{Navigator, UNCOMMITTED_REVISION};
use clap::Parser;
use tracing::info;

use crate::app::AppState;
use crate::event::AppEvent;
use crate::git::{GitBlameSource, GitShow, Workspace};
use crate::ui::keybindings::{self, KeyAction};

/// Browse blame briskly: walk a file's line history one warp at a time.
#[derive(Debug, Parser)]
#[command(name = "bbb", version, about)]
struct Cli {
    /// File to blame.
    file: PathBuf,
    /// Revision to start from; defaults to the working tree.
    rev: Option<String>,
    /// Line to place the cursor on (1-based).
    #[arg(short, long, default_value_t = 1)]
    line: usize,
    /// File listing revisions for `git blame` to ignore.
    #[arg(long, value_name = "PATH")]
    ignore_revs_file: Option<PathBuf>,
    /// Color theme (`catppuccin-mocha` or `dark`).
    #[arg(long)]
    theme: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Step 1: logging and config, before anything can fail noisily.
    if let Err(err) = logging::init() {
        eprintln!("bbb: logging disabled: {err:#}");
    }
    let config = config::Config::load();
    let theme = theme::Theme::from_name(cli.theme.as_deref().unwrap_or(&config.theme));

    // Step 2: repository lookups and the first blame.
    let cwd = std::env::current_dir().context("reading the current directory")?;
    let workspace = Workspace::discover(&cwd.join(&cli.file))?;
    let file_path = workspace.relative_path(&cli.file, &cwd)?;
    let revision = match &cli.rev {
        Some(rev) => workspace.resolve_revision(rev)?,
        None => UNCOMMITTED_REVISION.to_owned(),
    };
    let explicit_ignore_revs = cli.ignore_revs_file.map(|p| cwd.join(p)).or(config.ignore_revs_file);
    let ignore_revs = workspace.ignore_revs_file(explicit_ignore_revs.as_deref());
    let workdir = workspace.workdir().to_path_buf();
    drop(workspace);

    info!(%file_path, %revision, line = cli.line, "starting");
    let source = GitBlameSource::new(workdir.clone(), ignore_revs);
    let navigator = Navigator::open(source, &revision, &file_path, cli.line)
        .with_context(|| format!("cannot blame {file_path}"))?;
    let mut viewer = GitShow::new(workdir, config.pager);

    // Step 3: terminal.
    tui::install_panic_hook();
    let term_flag = tui::register_sigterm()?;
    let mut terminal = tui::init_tui()?;

    // Step 4: event task and highlight thread.
    let handler = event::EventHandler::new();
    let mut event_task = event::spawn_event_task(handler.tx.clone());
    let mut rx = handler.rx;

    let (highlight_tx, highlight_rx) = crossbeam_channel::unbounded();
    let highlight_event_tx = handler.tx.clone();
    std::thread::spawn(move || highlight::highlight_worker_loop(highlight_rx, highlight_event_tx));

    let mut state = AppState::new(navigator, config.tab_width, Some(highlight_tx));

    let mut loop_result: anyhow::Result<()> = Ok(());
    'event_loop: loop {
        tokio::select! {
            // Heartbeat so SIGTERM is noticed even when no events arrive.
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                let action = match maybe_event {
                    Some(AppEvent::Render) => {
                        // The only draw() call.
                        if let Err(err) = terminal.draw(|frame| ui::render(frame, &mut state, &theme)) {
                            loop_result = Err(err.into());
                            break 'event_loop;
                        }
                        KeyAction::Continue
                    }
                    Some(AppEvent::Key(key)) => keybindings::handle_key(key, &mut state),
                    Some(AppEvent::Mouse(mouse)) => keybindings::handle_mouse(mouse, &mut state),
                    Some(AppEvent::Highlighted(payload)) => {
                        state.apply_highlight(*payload);
                        KeyAction::Continue
                    }
                    // ratatui picks up the new size from frame.area() on the next Render.
                    Some(AppEvent::Resize(_, _)) => KeyAction::Continue,
                    Some(AppEvent::Quit) | None => KeyAction::Quit,
                };

                match action {
                    KeyAction::Continue => {}
                    KeyAction::Quit => break 'event_loop,
                    KeyAction::ShowDetail => {
                        // Stop reading stdin while the pager owns the terminal.
                        event_task.abort();
                        let shown = tui::suspend(&mut terminal, || {
                            state.navigator.show_detail_for_selected_line(&mut viewer)
                        });
                        event_task = event::spawn_event_task(handler.tx.clone());
                        if let Err(err) = shown {
                            loop_result = Err(err.into());
                            break 'event_loop;
                        }
                    }
                }

                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }

    event_task.abort();
    tui::restore_tui()?;
    loop_result
}
