//! The wrapper session and its event loop.
//!
//! `App` is the single session context: it owns the child handle, the line
//! editor, and the receiving end of every channel. `run` multiplexes the
//! three byte streams — child stdout, child stderr, user keystrokes — plus
//! the session event channel, and owns the only quit paths.

use anyhow::{Context, Result, bail};
use tokio::sync::mpsc::{Receiver, UnboundedReceiver};
use tracing::{debug, info};

use crate::child::ChildProcess;
use crate::editor::{LineEditor, Submission};
use crate::event::{self, AppEvent, StreamRole, UserEvent};
use crate::forward::forward_chunk;

/// Prompt shown for every input line.
const PROMPT: &str = "> ";

pub struct App {
    child: ChildProcess,
    editor: LineEditor,
    stdout_chunks: Receiver<Vec<u8>>,
    stderr_chunks: Receiver<Vec<u8>>,
    app_events: UnboundedReceiver<AppEvent>,
    user_events: Receiver<std::io::Result<UserEvent>>,
    stdout_open: bool,
    stderr_open: bool,
    exit: bool,
}

impl App {
    /// Spawn the child and arm the prompt.
    pub fn new(command: &str, args: &[String]) -> Result<Self> {
        let (event_sink, app_events) = event::init_app_events();
        let (child, stdout_chunks, stderr_chunks) =
            ChildProcess::spawn(command, args, event_sink)?;
        let editor = LineEditor::install(PROMPT)?;
        Ok(Self {
            child,
            editor,
            stdout_chunks,
            stderr_chunks,
            app_events,
            user_events: event::init_user_events(),
            stdout_open: true,
            stderr_open: true,
            exit: false,
        })
    }

    /// Run until end-of-input or child exit.
    ///
    /// The select is biased so child output is always flushed before new
    /// keystrokes are processed, stdout before stderr.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            if self.exit {
                break;
            }
            tokio::select! {
                biased;
                chunk = self.stdout_chunks.recv(), if self.stdout_open => {
                    self.handle_chunk(StreamRole::Stdout, chunk)?;
                }
                chunk = self.stderr_chunks.recv(), if self.stderr_open => {
                    self.handle_chunk(StreamRole::Stderr, chunk)?;
                }
                evt = self.app_events.recv() => {
                    let evt = evt.context("session event channel closed")?;
                    self.handle_app_event(evt)?;
                }
                evt = self.user_events.recv() => {
                    let evt = evt.context("terminal input stream ended")?;
                    self.handle_user_event(evt.context("failed to read terminal input")?)?;
                }
            }
            self.maybe_finish();
        }
        self.editor.teardown();
        Ok(())
    }

    fn handle_chunk(&mut self, role: StreamRole, chunk: Option<Vec<u8>>) -> Result<()> {
        match chunk {
            Some(bytes) => forward_chunk(&mut self.editor, role, &bytes),
            None => {
                // EOF; termination authority stays with the exit monitor.
                debug!(%role, "output stream closed");
                match role {
                    StreamRole::Stdout => self.stdout_open = false,
                    StreamRole::Stderr => self.stderr_open = false,
                }
                Ok(())
            }
        }
    }

    fn handle_app_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::ChildExited(status) => {
                info!(%status, "child exited, ending session");
                self.child.mark_exited();
                Ok(())
            }
            AppEvent::ReadFailed { role, error } => {
                bail!("reading child {role} failed: {error}")
            }
            AppEvent::WaitFailed(error) => {
                bail!("waiting for child failed: {error}")
            }
        }
    }

    fn handle_user_event(&mut self, event: UserEvent) -> Result<()> {
        let Some(submission) = self.editor.handle_event(event)? else {
            return Ok(());
        };
        match submission {
            Submission::Line(line) => {
                // Empty lines are not forwarded; the prompt stays armed.
                if line.is_empty() {
                    return Ok(());
                }
                debug!(len = line.len(), "line submitted");
                self.child.send_line(&line)?;
            }
            Submission::Eof => {
                info!("input closed, ending session");
                self.exit = true;
            }
        }
        Ok(())
    }

    /// The session ends once the child has been reaped and both output
    /// streams have drained to EOF, so no final output is dropped.
    fn maybe_finish(&mut self) {
        if !self.child.is_running() && !self.stdout_open && !self.stderr_open {
            self.exit = true;
        }
    }
}
