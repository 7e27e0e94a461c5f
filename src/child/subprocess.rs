//! Child subprocess lifecycle and stream plumbing.
//!
//! The wrapped command runs with all three standard streams redirected to
//! pipes. Two reader threads pump stdout/stderr into bounded channels in
//! fixed-size chunks, and a wait thread reaps the child and publishes its
//! exit status on the session event channel. The event loop never touches a
//! file descriptor directly.

use std::io::{self, ErrorKind, Read, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread;

use anyhow::{Context, Result};
use tokio::sync::mpsc::{self, Receiver, UnboundedSender};
use tracing::{debug, error, info};

use crate::event::{AppEvent, StreamRole};

/// Bytes per bounded pipe read.
pub const PIPE_READ_BUFFER: usize = 1024;

/// Chunks buffered per output stream before the reader thread backs off.
const PIPE_CHUNK_QUEUE: usize = 1024;

/// Handle to the wrapped command.
///
/// Dropping the handle closes the child's stdin, which is how the child sees
/// end-of-input when the session ends first.
pub struct ChildProcess {
    stdin: ChildStdin,
    running: bool,
}

impl ChildProcess {
    /// Spawn `command` with `args`, wiring stdin/stdout/stderr to pipes.
    ///
    /// Returns the handle plus one chunk receiver per output stream.
    /// Exit and read-failure notifications arrive on `events`. Spawn
    /// failure (unknown command, pipe allocation) is fatal to the caller.
    pub fn spawn(
        command: &str,
        args: &[String],
        events: UnboundedSender<AppEvent>,
    ) -> Result<(Self, Receiver<Vec<u8>>, Receiver<Vec<u8>>)> {
        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to start {command:?}"))?;

        info!(command, pid = child.id(), "child started");

        let stdin = child.stdin.take().context("child stdin was not piped")?;
        let stdout = child.stdout.take().context("child stdout was not piped")?;
        let stderr = child.stderr.take().context("child stderr was not piped")?;

        let stdout_rx = spawn_reader(StreamRole::Stdout, stdout, events.clone());
        let stderr_rx = spawn_reader(StreamRole::Stderr, stderr, events.clone());
        spawn_waiter(child, events);

        Ok((
            Self {
                stdin,
                running: true,
            },
            stdout_rx,
            stderr_rx,
        ))
    }

    /// Forward one submitted line to the child: the text verbatim, then a
    /// single newline, then a flush.
    ///
    /// A broken pipe is not an error here: the child is gone and its exit
    /// notification is already in flight, so the line is dropped.
    pub fn send_line(&mut self, line: &str) -> Result<()> {
        match self.write_line(line) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                debug!("child stdin closed, dropping line");
                Ok(())
            }
            Err(e) => Err(e).context("failed to forward line to child stdin"),
        }
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.stdin.write_all(line.as_bytes())?;
        self.stdin.write_all(b"\n")?;
        self.stdin.flush()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Record the exit reported by the wait thread.
    pub fn mark_exited(&mut self) {
        self.running = false;
    }
}

/// Pump one output pipe into a bounded chunk channel.
///
/// EOF closes the channel and ends the thread; closure is an orderly event
/// because termination is observed through the wait thread, not here.
/// Interrupted reads are retried. Any other error is published as fatal.
fn spawn_reader(
    role: StreamRole,
    mut pipe: impl Read + Send + 'static,
    events: UnboundedSender<AppEvent>,
) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel::<Vec<u8>>(PIPE_CHUNK_QUEUE);
    thread::spawn(move || {
        let mut buf = [0u8; PIPE_READ_BUFFER];
        loop {
            match pipe.read(&mut buf) {
                Ok(0) => {
                    debug!(%role, "pipe closed");
                    break;
                }
                Ok(n) => {
                    // Receiver dropped means the session is already over.
                    if tx.blocking_send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    error!(%role, error = %e, "pipe read failed");
                    if events.send(AppEvent::ReadFailed { role, error: e }).is_err() {
                        debug!(%role, "read failure not delivered, session gone");
                    }
                    break;
                }
            }
        }
    });
    rx
}

/// Reap the child on a dedicated thread and publish its exit status.
///
/// Blocking in `wait` here means the event loop sees termination as an
/// ordinary message on a channel it already polls. The thread reaps exactly
/// once, so duplicate notifications cannot happen.
fn spawn_waiter(mut child: Child, events: UnboundedSender<AppEvent>) {
    thread::spawn(move || {
        let event = match child.wait() {
            Ok(status) => {
                info!(%status, "child exited");
                AppEvent::ChildExited(status)
            }
            Err(e) => {
                error!(error = %e, "wait for child failed");
                AppEvent::WaitFailed(e)
            }
        };
        if events.send(event).is_err() {
            debug!("exit notification not delivered, session gone");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::init_app_events;

    #[tokio::test]
    async fn cat_echoes_submitted_line() {
        let (events, mut events_rx) = init_app_events();
        let (mut child, mut stdout_rx, _stderr_rx) =
            ChildProcess::spawn("cat", &[], events).unwrap();

        child.send_line("hello").unwrap();
        let chunk = stdout_rx.recv().await.unwrap();
        assert_eq!(chunk, b"hello\n");

        // Closing stdin ends cat; the waiter reports a clean exit.
        drop(child);
        match events_rx.recv().await.unwrap() {
            AppEvent::ChildExited(status) => assert!(status.success()),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn partial_output_arrives_without_trailing_newline() {
        let (events, mut events_rx) = init_app_events();
        let args = vec!["-c".to_string(), "printf partial".to_string()];
        let (_child, mut stdout_rx, _stderr_rx) =
            ChildProcess::spawn("sh", &args, events).unwrap();

        let chunk = stdout_rx.recv().await.unwrap();
        assert_eq!(chunk, b"partial");

        // EOF closes the chunk channel; exit arrives on the event channel.
        assert!(stdout_rx.recv().await.is_none());
        match events_rx.recv().await.unwrap() {
            AppEvent::ChildExited(status) => assert!(status.success()),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn stderr_is_delivered_on_its_own_channel() {
        let (events, _events_rx) = init_app_events();
        let args = vec!["-c".to_string(), "echo oops >&2".to_string()];
        let (_child, mut stdout_rx, mut stderr_rx) =
            ChildProcess::spawn("sh", &args, events).unwrap();

        let chunk = stderr_rx.recv().await.unwrap();
        assert_eq!(chunk, b"oops\n");
        assert!(stdout_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn exit_status_is_reported_for_silent_child() {
        let (events, mut events_rx) = init_app_events();
        let args = vec!["-c".to_string(), "exit 3".to_string()];
        let (_child, _stdout_rx, _stderr_rx) =
            ChildProcess::spawn("sh", &args, events).unwrap();

        match events_rx.recv().await.unwrap() {
            AppEvent::ChildExited(status) => assert_eq!(status.code(), Some(3)),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_command_fails_to_spawn() {
        let (events, _events_rx) = init_app_events();
        let result = ChildProcess::spawn("replwrap-no-such-command", &[], events);
        assert!(result.is_err());
    }

    #[test]
    fn liveness_flag_transitions_on_exit() {
        let (events, _events_rx) = init_app_events();
        let (mut child, _stdout_rx, _stderr_rx) =
            ChildProcess::spawn("cat", &[], events).unwrap();
        assert!(child.is_running());
        child.mark_exited();
        assert!(!child.is_running());
    }
}
