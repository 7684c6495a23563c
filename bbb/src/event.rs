//! Event bus for bbb.
//!
//! Terminal input, render ticks and highlight results are normalised into a
//! single `AppEvent` enum and sent over a tokio unbounded MPSC channel. The main
//! loop receives from this channel and dispatches accordingly.

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::interval;

use crate::highlight::HighlightPayload;

/// All events the application can receive from any source.
#[derive(Debug)]
pub enum AppEvent {
    /// A key press from the terminal (`KeyEventKind::Press` only).
    Key(KeyEvent),
    /// A mouse event from the terminal (click, scroll).
    Mouse(MouseEvent),
    /// Terminal was resized to (columns, rows).
    Resize(u16, u16),
    /// Render tick, triggers a `terminal.draw()` call (about 30 FPS).
    Render,
    /// Result from the highlight thread.
    Highlighted(Box<HighlightPayload>),
    /// Quit signal (SIGTERM).
    Quit,
}

/// Sender and receiver ends of the unified event channel.
pub struct EventHandler {
    /// Send half; clone it for each producer.
    pub tx: mpsc::UnboundedSender<AppEvent>,
    /// Receive half, owned by the main loop.
    pub rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns the task that forwards terminal input and render ticks.
///
/// The returned handle is aborted while an external program owns the terminal
/// (see `tui::suspend`), which drops the `EventStream` so that it stops
/// competing for stdin. A fresh task is spawned afterwards.
///
/// `reader.next().fuse()` keeps `select!` from polling a finished stream, and
/// only `KeyEventKind::Press` is forwarded so that keys never fire twice.
pub fn spawn_event_task(tx: mpsc::UnboundedSender<AppEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut render_interval = interval(Duration::from_millis(33));
        let mut reader = EventStream::new();

        loop {
            let render_tick = render_interval.tick();
            let crossterm_event = reader.next().fuse();

            tokio::select! {
                _ = render_tick => {
                    if tx.send(AppEvent::Render).is_err() {
                        break;
                    }
                }
                maybe_event = crossterm_event => {
                    let sent = match maybe_event {
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            tx.send(AppEvent::Key(key))
                        }
                        Some(Ok(Event::Resize(w, h))) => tx.send(AppEvent::Resize(w, h)),
                        Some(Ok(Event::Mouse(mouse))) => tx.send(AppEvent::Mouse(mouse)),
                        Some(Ok(_)) => Ok(()),
                        // Input is gone; nothing further can arrive.
                        Some(Err(_)) | None => {
                            let _ = tx.send(AppEvent::Quit);
                            break;
                        }
                    };
                    if sent.is_err() {
                        break;
                    }
                }
            }
        }
    })
}
