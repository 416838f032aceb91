//! Prompt history
//!
//! Bounded, oldest-first list of sent prompts with a browsing cursor for
//! Up/Down recall in the input box.

use std::collections::VecDeque;

/// Maximum number of prompts kept
pub const HISTORY_MAX: usize = 50;

#[derive(Debug, Clone)]
pub struct HistoryRing {
    entries: VecDeque<String>,
    /// Browsing position; `entries.len()` means "past the newest entry"
    cursor: usize,
}

impl Default for HistoryRing {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryRing {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_MAX),
            cursor: 0,
        }
    }

    /// Rebuild from persisted entries, keeping the newest `HISTORY_MAX`
    pub fn from_entries(entries: Vec<String>) -> Self {
        let skip = entries.len().saturating_sub(HISTORY_MAX);
        let entries: VecDeque<String> = entries.into_iter().skip(skip).collect();
        let cursor = entries.len();
        Self { entries, cursor }
    }

    /// Append a prompt. Blank prompts and repeats of the newest entry are
    /// ignored. Returns true if the ring changed.
    pub fn push(&mut self, text: &str) -> bool {
        let text = text.trim();
        let changed = if text.is_empty() || self.entries.back().is_some_and(|last| last == text) {
            false
        } else {
            if self.entries.len() == HISTORY_MAX {
                self.entries.pop_front();
            }
            self.entries.push_back(text.to_string());
            true
        };
        self.reset_cursor();
        changed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries, oldest first
    pub fn entries(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = self.entries.len();
    }

    /// Step back to an older entry. `None` when already at the oldest.
    pub fn prev(&mut self) -> Option<&str> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor).map(String::as_str)
    }

    /// Step forward to a newer entry. Stepping past the newest returns
    /// `Some("")` so the input gets cleared; `None` means nothing to do.
    pub fn next(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
            self.entries.get(self.cursor).map(String::as_str)
        } else {
            self.cursor = self.entries.len();
            Some("")
        }
    }
}
