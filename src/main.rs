//! Main entry point for replwrap.
//!
//! Checks the invocation contract, initializes logging, spawns the wrapper
//! session, and guarantees terminal restoration on every exit path.

use std::io::IsTerminal;

use anyhow::{Result, bail};

use replwrap::app::App;
use replwrap::editor;
use replwrap::utils;
use replwrap::utils::context::Context;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging before anything else
    utils::logger::init_logging();

    if !std::io::stdin().is_terminal() {
        bail!("not running in a tty");
    }

    // No command to wrap is a caller bug, not a user error.
    let args: Vec<String> = std::env::args().skip(1).collect();
    assert!(!args.is_empty(), "usage: replwrap <command> [args...]");

    // Guard restores the terminal on normal exit and panic alike.
    let _ctx = Context::with(editor::restore_terminal);

    let mut app = App::new(&args[0], &args[1..])?;
    app.run().await
}
