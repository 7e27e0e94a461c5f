//! The interactive line editor.
//!
//! A single-line prompt rendered over crossterm raw mode. The event loop
//! feeds key events in; the editor yields a submission when a full line (or
//! end-of-input) is available. While child output is being forwarded the
//! display is suspended: the prompt row is cleared and the terminal drops
//! back to cooked mode so the forwarded bytes get normal output processing,
//! and `resume` repaints prompt and buffer afterwards.

mod buffer;
mod history;

use std::io::{self, Write};

use anyhow::{Context as _, Result};
use crossterm::QueueableCommand;
use crossterm::cursor::MoveToColumn;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::event::UserEvent;

pub use history::History;

/// Outcome of feeding one key event to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Enter was pressed; the completed line (possibly empty).
    Line(String),
    /// Ctrl-D on an empty buffer: input is closed.
    Eof,
}

pub struct LineEditor {
    prompt: String,
    buffer: String,
    /// Cursor position in char indices.
    cursor: usize,
    history: History,
    raw: bool,
}

impl LineEditor {
    /// Arm the editor: enter raw mode and draw the prompt.
    pub fn install(prompt: &str) -> Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        let mut editor = Self {
            prompt: prompt.to_string(),
            buffer: String::new(),
            cursor: 0,
            history: History::new(),
            raw: true,
        };
        editor.redraw()?;
        Ok(editor)
    }

    #[cfg(test)]
    fn unarmed(prompt: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            buffer: String::new(),
            cursor: 0,
            history: History::new(),
            raw: false,
        }
    }

    /// Process one unit of terminal input.
    /// Yields at most one submission per call.
    pub fn handle_event(&mut self, event: UserEvent) -> Result<Option<Submission>> {
        let Event::Key(key) = event else {
            return Ok(None);
        };
        if key.kind != KeyEventKind::Press && key.kind != KeyEventKind::Repeat {
            return Ok(None);
        }
        self.handle_key(key)
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<Option<Submission>> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => {
                let line = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                self.history.push(&line);
                self.break_line()?;
                // The prompt re-arms on a fresh row for the next line.
                self.redraw()?;
                return Ok(Some(Submission::Line(line)));
            }
            KeyCode::Char('d') if ctrl => {
                if self.buffer.is_empty() {
                    self.break_line()?;
                    return Ok(Some(Submission::Eof));
                }
                buffer::delete_at_cursor(&mut self.buffer, self.cursor);
                self.history.stop_browsing();
            }
            KeyCode::Char('c') if ctrl => {
                self.buffer.clear();
                self.cursor = 0;
                self.history.stop_browsing();
            }
            KeyCode::Char('a') if ctrl => self.cursor = 0,
            KeyCode::Char('e') if ctrl => self.cursor = buffer::char_count(&self.buffer),
            KeyCode::Char('b') if ctrl => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Char('f') if ctrl => self.cursor_right(),
            KeyCode::Char('k') if ctrl => {
                let end = buffer::char_count(&self.buffer);
                buffer::delete_range(&mut self.buffer, self.cursor, end);
                self.history.stop_browsing();
            }
            KeyCode::Char('u') if ctrl => {
                buffer::delete_range(&mut self.buffer, 0, self.cursor);
                self.cursor = 0;
                self.history.stop_browsing();
            }
            KeyCode::Char('w') if ctrl => {
                let start = buffer::previous_word_start(&self.buffer, self.cursor);
                buffer::delete_range(&mut self.buffer, start, self.cursor);
                self.cursor = start;
                self.history.stop_browsing();
            }
            KeyCode::Char('p') if ctrl => self.history_up(),
            KeyCode::Char('n') if ctrl => self.history_down(),
            KeyCode::Backspace => {
                buffer::delete_before_cursor(&mut self.buffer, &mut self.cursor);
                self.history.stop_browsing();
            }
            KeyCode::Delete => {
                buffer::delete_at_cursor(&mut self.buffer, self.cursor);
                self.history.stop_browsing();
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor_right(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = buffer::char_count(&self.buffer),
            KeyCode::Up => self.history_up(),
            KeyCode::Down => self.history_down(),
            KeyCode::Char(ch) => {
                // Unbound control/alt chords are ignored.
                if ctrl || key.modifiers.contains(KeyModifiers::ALT) {
                    return Ok(None);
                }
                buffer::insert_char(&mut self.buffer, &mut self.cursor, ch);
                self.history.stop_browsing();
            }
            _ => return Ok(None),
        }
        self.redraw()?;
        Ok(None)
    }

    fn cursor_right(&mut self) {
        if self.cursor < buffer::char_count(&self.buffer) {
            self.cursor += 1;
        }
    }

    fn history_up(&mut self) {
        if let Some(text) = self.history.up(&self.buffer) {
            self.buffer = text;
            self.cursor = buffer::char_count(&self.buffer);
        }
    }

    fn history_down(&mut self) {
        if let Some(text) = self.history.down() {
            self.buffer = text;
            self.cursor = buffer::char_count(&self.buffer);
        }
    }

    /// Hide the edit line while foreign output is printed.
    ///
    /// Clears the prompt row and leaves raw mode. The buffer and cursor are
    /// untouched, so nothing the user typed is lost.
    pub fn suspend(&mut self) -> Result<()> {
        let mut out = io::stdout();
        out.queue(MoveToColumn(0))?;
        out.queue(Clear(ClearType::CurrentLine))?;
        out.flush().context("failed to clear the prompt row")?;
        if self.raw {
            terminal::disable_raw_mode().context("failed to leave raw mode")?;
            self.raw = false;
        }
        Ok(())
    }

    /// Repaint prompt and buffer after forwarded output.
    pub fn resume(&mut self) -> Result<()> {
        if !self.raw {
            terminal::enable_raw_mode().context("failed to re-enter raw mode")?;
            self.raw = true;
        }
        self.redraw()
    }

    /// Release the terminal. Called on every exit path; idempotent.
    pub fn teardown(&mut self) {
        if let Err(e) = self.suspend() {
            tracing::error!(error = %e, "terminal restore failed");
        }
    }

    /// Repaint the prompt row: prompt, buffer, cursor column.
    fn redraw(&mut self) -> Result<()> {
        let mut out = io::stdout();
        out.queue(MoveToColumn(0))?;
        out.queue(Clear(ClearType::CurrentLine))?;
        out.queue(Print(&self.prompt))?;
        out.queue(Print(&self.buffer))?;
        let col = self.prompt.width() + prefix_width(&self.buffer, self.cursor);
        out.queue(MoveToColumn(col.try_into().unwrap_or(u16::MAX)))?;
        out.flush().context("failed to repaint the prompt")?;
        Ok(())
    }

    /// Move past the current row, leaving its contents on screen.
    fn break_line(&mut self) -> Result<()> {
        let mut out = io::stdout();
        out.queue(Print("\r\n"))?;
        out.flush().context("failed to finish the line")?;
        Ok(())
    }
}

/// Display width of the first `cursor` characters of `buffer`.
fn prefix_width(buffer: &str, cursor: usize) -> usize {
    buffer
        .chars()
        .take(cursor)
        .map(|c| c.width().unwrap_or(0))
        .sum()
}

/// Global terminal restore for exit paths that cannot reach the editor,
/// panics included. Disabling raw mode twice is harmless.
pub fn restore_terminal() {
    if let Err(e) = terminal::disable_raw_mode() {
        eprintln!("failed to restore terminal: {e}");
    }
}
