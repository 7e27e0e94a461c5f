//! Char-indexed buffer primitives for the line editor.
//!
//! All positions are character indices, not byte offsets, so editing stays
//! UTF-8 safe regardless of what the user types.

pub fn char_count(s: &str) -> usize {
    s.chars().count()
}

fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn insert_char(buffer: &mut String, cursor: &mut usize, ch: char) {
    let at = byte_index(buffer, *cursor);
    buffer.insert(at, ch);
    *cursor += 1;
}

pub fn delete_before_cursor(buffer: &mut String, cursor: &mut usize) {
    if *cursor == 0 {
        return;
    }
    let at = byte_index(buffer, *cursor - 1);
    buffer.remove(at);
    *cursor -= 1;
}

pub fn delete_at_cursor(buffer: &mut String, cursor: usize) {
    if cursor >= char_count(buffer) {
        return;
    }
    let at = byte_index(buffer, cursor);
    buffer.remove(at);
}

/// Remove the characters in `[start, end)`, both char indices.
pub fn delete_range(buffer: &mut String, start: usize, end: usize) {
    if start >= end {
        return;
    }
    let from = byte_index(buffer, start);
    let to = byte_index(buffer, end);
    buffer.replace_range(from..to, "");
}

/// Start of the word preceding `cursor`, backward-kill-word style: skip
/// trailing whitespace first, then the word itself.
pub fn previous_word_start(buffer: &str, cursor: usize) -> usize {
    let chars: Vec<char> = buffer.chars().collect();
    let mut i = cursor.min(chars.len());
    while i > 0 && chars[i - 1].is_whitespace() {
        i -= 1;
    }
    while i > 0 && !chars[i - 1].is_whitespace() {
        i -= 1;
    }
    i
}
