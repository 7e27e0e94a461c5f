//! Event plumbing for the wrapper session.
//!
//! Two channels feed the main loop: user input events read from the terminal
//! on a dedicated thread, and session events published by the child's monitor
//! threads (exit, read failure). Keeping them separate means keystrokes stay
//! responsive no matter how much output the child produces, and the loop
//! observes child termination as an ordinary ready source rather than through
//! signal handling.

use std::fmt;
use std::thread;

use tokio::sync::mpsc::{self, Receiver, UnboundedReceiver, UnboundedSender};

/// User input event from the terminal.
pub type UserEvent = crossterm::event::Event;

/// Spawn the terminal reader thread and return the receiving end.
///
/// `crossterm::event::read` blocks, so it gets a thread of its own. The
/// thread exits once the receiver is dropped.
pub fn init_user_events() -> Receiver<std::io::Result<UserEvent>> {
    let (tx, rx) = mpsc::channel(64);
    thread::spawn(move || {
        loop {
            if tx.blocking_send(crossterm::event::read()).is_err() {
                break;
            }
        }
    });
    rx
}

/// Which child output stream a chunk or a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamRole {
    Stdout,
    Stderr,
}

impl fmt::Display for StreamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamRole::Stdout => f.write_str("stdout"),
            StreamRole::Stderr => f.write_str("stderr"),
        }
    }
}

/// Session-level events published by the child's monitor threads.
#[derive(Debug)]
pub enum AppEvent {
    /// The child was reaped; carries its exit status.
    ChildExited(std::process::ExitStatus),
    /// A pipe read failed with something other than `Interrupted`.
    ReadFailed {
        role: StreamRole,
        error: std::io::Error,
    },
    /// Reaping the child failed.
    WaitFailed(std::io::Error),
}

/// Create the session event channel.
///
/// Unbounded is appropriate here: only low-frequency lifecycle events travel
/// on it, never output data.
pub fn init_app_events() -> (UnboundedSender<AppEvent>, UnboundedReceiver<AppEvent>) {
    mpsc::unbounded_channel()
}
