// This file is part of ivish, an interactive shell for embedded hosts.
// Copyright (C) 2026 The ivish authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Command-line history.
//!
//! The history is a bounded list of previously entered lines plus a
//! browsing cursor. While the user browses, the line that was being
//! edited is parked in a cache so that stepping past the newest entry
//! brings it back.
//!
//! `index == len` means "not browsing"; the cache is present exactly
//! while browsing.

use std::io::Write as _;
use std::path::Path;

/// Default maximum number of retained entries
pub const DEFAULT_MAX_ITEMS: usize = 100;

/// Ordered, bounded list of previously entered lines.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct History {
    items: Vec<String>,
    index: usize,
    cache: Option<String>,
    max_items: usize,
}

impl History {
    #[must_use]
    pub fn new() -> History {
        Self::with_max_items(DEFAULT_MAX_ITEMS)
    }

    #[must_use]
    pub fn with_max_items(max_items: usize) -> History {
        History {
            items: Vec::new(),
            index: 0,
            cache: None,
            max_items,
        }
    }

    /// All retained entries, oldest first.
    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the user is currently browsing the history.
    #[must_use]
    pub fn is_browsing(&self) -> bool {
        self.index < self.items.len()
    }

    /// Appends an entry, dropping the oldest entries over the maximum.
    ///
    /// Adding ends any browsing in progress.
    pub fn add<S: Into<String>>(&mut self, line: S) {
        self.items.push(line.into());
        let excess = self.items.len().saturating_sub(self.max_items);
        self.items.drain(..excess);
        self.index = self.items.len();
        self.cache = None;
    }

    /// Removes all entries and ends any browsing in progress.
    pub fn clear(&mut self) {
        self.items.clear();
        self.index = 0;
        self.cache = None;
    }

    /// Steps to the previous (older) entry.
    ///
    /// When browsing starts, `current` (the line being edited) is parked
    /// in the cache. The returned string is what the edit buffer should
    /// now show; at the oldest entry the same entry is returned again.
    /// Returns `None` when the history is empty.
    pub fn prev(&mut self, current: &str) -> Option<String> {
        if self.items.is_empty() {
            return None;
        }
        if self.is_browsing() {
            self.index = self.index.saturating_sub(1);
        } else {
            self.cache = Some(current.to_owned());
            self.index = self.items.len() - 1;
        }
        Some(self.items[self.index].clone())
    }

    /// Steps to the next (newer) entry.
    ///
    /// Stepping past the newest entry restores the cached line and ends
    /// browsing. Returns `None` when not browsing.
    pub fn next(&mut self) -> Option<String> {
        if !self.is_browsing() {
            return None;
        }
        self.index += 1;
        if self.index == self.items.len() {
            Some(self.cache.take().unwrap_or_default())
        } else {
            Some(self.items[self.index].clone())
        }
    }

    /// Ends browsing, returning the cached line if any.
    pub fn reset_to_cache(&mut self) -> Option<String> {
        self.index = self.items.len();
        self.cache.take()
    }

    /// Replaces the entries with the contents of a plain-text file.
    ///
    /// One entry per line, UTF-8. Entries beyond the maximum are dropped
    /// from the front.
    pub fn load(&mut self, path: &Path) -> std::io::Result<()> {
        let text = std::fs::read_to_string(path)?;
        self.items = text.lines().map(str::to_owned).collect();
        let excess = self.items.len().saturating_sub(self.max_items);
        self.items.drain(..excess);
        self.index = self.items.len();
        self.cache = None;
        Ok(())
    }

    /// Writes the entries to a plain-text file.
    ///
    /// The file is written to a temporary sibling first and renamed into
    /// place so a crash cannot leave a truncated history.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut file = tempfile::NamedTempFile::new_in(dir.unwrap_or(Path::new(".")))?;
        for item in &self.items {
            writeln!(file, "{item}")?;
        }
        file.persist(path)?;
        Ok(())
    }
}

impl Default for History {
    fn default() -> History {
        History::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of<const N: usize>(items: [&str; N]) -> History {
        let mut history = History::new();
        for item in items {
            history.add(item);
        }
        history
    }

    #[test]
    fn add_caps_length_and_resets_index() {
        let mut history = History::with_max_items(2);
        history.add("a");
        history.add("b");
        history.add("c");
        assert_eq!(history.items(), ["b", "c"]);
        assert_eq!(history.len(), 2);
        assert!(!history.is_browsing());
    }

    #[test]
    fn browsing_back_and_forth() {
        let mut history = history_of(["a", "b", "c"]);

        assert_eq!(history.prev("x").as_deref(), Some("c"));
        assert_eq!(history.prev("ignored").as_deref(), Some("b"));
        assert_eq!(history.prev("ignored").as_deref(), Some("a"));
        // No movement past the oldest entry
        assert_eq!(history.prev("ignored").as_deref(), Some("a"));

        assert_eq!(history.next().as_deref(), Some("b"));
        assert_eq!(history.next().as_deref(), Some("c"));
        // Stepping past the newest entry restores the edited line
        assert_eq!(history.next().as_deref(), Some("x"));
        assert!(!history.is_browsing());
        assert_eq!(history.next(), None);
    }

    #[test]
    fn prev_on_empty_history() {
        let mut history = History::new();
        assert_eq!(history.prev("x"), None);
        assert!(!history.is_browsing());
    }

    #[test]
    fn add_while_browsing_clears_cache() {
        let mut history = history_of(["a"]);
        history.prev("pending");
        history.add("b");
        assert!(!history.is_browsing());
        assert_eq!(history.next(), None);
    }

    #[test]
    fn reset_to_cache_restores_pending_line() {
        let mut history = history_of(["a", "b"]);
        history.prev("pending");
        history.prev("ignored");
        assert_eq!(history.reset_to_cache().as_deref(), Some("pending"));
        assert!(!history.is_browsing());
        assert_eq!(history.reset_to_cache(), None);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");

        let history = history_of(["echo one", "ls | grep x", "exit"]);
        history.save(&path).unwrap();

        let mut loaded = History::new();
        loaded.load(&path).unwrap();
        assert_eq!(loaded.items(), history.items());
        assert!(!loaded.is_browsing());
    }

    #[test]
    fn load_trims_to_max_items() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");
        history_of(["a", "b", "c"]).save(&path).unwrap();

        let mut loaded = History::with_max_items(2);
        loaded.load(&path).unwrap();
        assert_eq!(loaded.items(), ["b", "c"]);
    }

    #[test]
    fn save_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");
        history_of(["old"]).save(&path).unwrap();
        history_of(["new"]).save(&path).unwrap();

        let mut loaded = History::new();
        loaded.load(&path).unwrap();
        assert_eq!(loaded.items(), ["new"]);
    }
}
