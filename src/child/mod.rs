//! Child process management: spawning, output pumping, exit monitoring.

mod subprocess;
pub use subprocess::{ChildProcess, PIPE_READ_BUFFER};
