//! Forwarding child output onto the terminal.
//!
//! Every chunk is bracketed by an editor suspend/resume so the in-progress
//! edit line never interleaves with child output. A trailing newline is
//! synthesized when the chunk lacks one, which keeps the repainted prompt on
//! its own row.

use std::io::{self, Write};

use anyhow::{Context, Result};

use crate::editor::LineEditor;
use crate::event::StreamRole;

/// Write `chunk` to the terminal stream matching `role`, hiding and then
/// restoring the edit line around it.
pub fn forward_chunk(editor: &mut LineEditor, role: StreamRole, chunk: &[u8]) -> Result<()> {
    editor.suspend()?;
    match role {
        StreamRole::Stdout => write_chunk(&mut io::stdout(), chunk),
        StreamRole::Stderr => write_chunk(&mut io::stderr(), chunk),
    }
    .with_context(|| format!("failed to forward child {role}"))?;
    editor.resume()
}

/// Write the bytes verbatim, appending a newline iff the chunk does not end
/// with one, then flush.
fn write_chunk(out: &mut impl Write, chunk: &[u8]) -> io::Result<()> {
    out.write_all(chunk)?;
    if chunk.last() != Some(&b'\n') {
        out.write_all(b"\n")?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_without_newline_gets_one() {
        let mut sink = Vec::new();
        write_chunk(&mut sink, b"partial").unwrap();
        assert_eq!(sink, b"partial\n");
    }

    #[test]
    fn chunk_with_newline_passes_through_verbatim() {
        let mut sink = Vec::new();
        write_chunk(&mut sink, b"done\n").unwrap();
        assert_eq!(sink, b"done\n");
    }

    #[test]
    fn embedded_newlines_are_not_framing() {
        let mut sink = Vec::new();
        write_chunk(&mut sink, b"a\nb").unwrap();
        assert_eq!(sink, b"a\nb\n");
    }

    #[test]
    fn raw_bytes_survive_unmodified() {
        let mut sink = Vec::new();
        write_chunk(&mut sink, &[0xff, 0x00, b'\n']).unwrap();
        assert_eq!(sink, &[0xff, 0x00, b'\n']);
    }
}
