//! In-memory submission history with Up/Down navigation.
//!
//! Navigation stashes the unsubmitted line in a draft slot so walking back
//! down past the newest entry restores what the user was typing.

/// Maximum number of lines kept in history.
const MAX_HISTORY_SIZE: usize = 1000;

#[derive(Debug, Default)]
pub struct History {
    entries: Vec<String>,
    /// Position while browsing; `None` means the live line is showing.
    index: Option<usize>,
    /// The unsubmitted line stashed when browsing starts.
    draft: String,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submitted line.
    /// Skips empty lines and repeats of the most recent entry.
    pub fn push(&mut self, line: &str) {
        self.index = None;
        if line.is_empty() {
            return;
        }
        if self.entries.last().map(String::as_str) == Some(line) {
            return;
        }
        self.entries.push(line.to_string());
        if self.entries.len() > MAX_HISTORY_SIZE {
            self.entries.remove(0);
        }
    }

    /// Step to an older entry, stashing the in-progress line on first use.
    /// Returns the text the buffer should now show, or `None` when already
    /// at the oldest entry (or history is empty).
    pub fn up(&mut self, current: &str) -> Option<String> {
        let next = match self.index {
            None if self.entries.is_empty() => return None,
            None => {
                self.draft = current.to_string();
                self.entries.len() - 1
            }
            Some(0) => return None,
            Some(i) => i - 1,
        };
        self.index = Some(next);
        Some(self.entries[next].clone())
    }

    /// Step back toward the live line. Returns the replacement text — the
    /// stashed draft when walking off the newest entry — or `None` when not
    /// browsing.
    pub fn down(&mut self) -> Option<String> {
        match self.index {
            None => None,
            Some(i) if i + 1 < self.entries.len() => {
                self.index = Some(i + 1);
                Some(self.entries[i + 1].clone())
            }
            Some(_) => {
                self.index = None;
                Some(std::mem::take(&mut self.draft))
            }
        }
    }

    /// Leave browsing mode; the recalled entry becomes the live line.
    pub fn stop_browsing(&mut self) {
        self.index = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_skips_empty_and_consecutive_duplicates() {
        let mut history = History::new();
        history.push("ls");
        history.push("");
        history.push("ls");
        history.push("pwd");
        history.push("ls");
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn history_is_capped() {
        let mut history = History::new();
        for i in 0..(MAX_HISTORY_SIZE + 20) {
            history.push(&format!("cmd {i}"));
        }
        assert_eq!(history.len(), MAX_HISTORY_SIZE);
        // Oldest entries were evicted.
        assert_eq!(history.up(""), Some(format!("cmd {}", MAX_HISTORY_SIZE + 19)));
    }

    #[test]
    fn up_and_down_restore_the_draft() {
        let mut history = History::new();
        history.push("first");
        history.push("second");

        assert_eq!(history.up("typing"), Some("second".to_string()));
        assert_eq!(history.up("typing"), Some("first".to_string()));
        // Past the oldest entry there is nothing more.
        assert_eq!(history.up("typing"), None);

        assert_eq!(history.down(), Some("second".to_string()));
        assert_eq!(history.down(), Some("typing".to_string()));
        assert_eq!(history.down(), None);
    }

    #[test]
    fn up_on_empty_history_is_a_noop() {
        let mut history = History::new();
        assert_eq!(history.up("typing"), None);
        assert_eq!(history.down(), None);
    }

    #[test]
    fn submitting_resets_navigation() {
        let mut history = History::new();
        history.push("one");
        history.push("two");
        assert_eq!(history.up(""), Some("two".to_string()));
        history.push("three");
        // After a submission, Up starts from the newest entry again.
        assert_eq!(history.up(""), Some("three".to_string()));
    }
}
