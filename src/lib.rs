//! replwrap - an editable input prompt wrapped around any command.
//!
//! The wrapper spawns a child process with its standard streams piped,
//! forwards one line per submission to the child's stdin, and interleaves
//! the child's stdout/stderr back onto the terminal without corrupting the
//! in-progress edit line.
//!
//! # Example
//!
//! ```no_run
//! use replwrap::App;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut app = App::new("cat", &[])?;
//!     app.run().await
//! }
//! ```

pub mod app;
pub mod child;
pub mod editor;
pub mod event;
pub mod forward;
pub mod utils;

// Re-export commonly used types
pub use app::App;
pub use child::ChildProcess;
pub use editor::{LineEditor, Submission};
pub use event::{AppEvent, StreamRole, UserEvent, init_app_events, init_user_events};
