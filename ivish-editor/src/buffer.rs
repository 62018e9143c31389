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

//! The logical text under edit.
//!
//! [`EditBuffer`] is pure data: a sequence of characters and a cursor.
//! The cursor is an index in character units and is always a valid
//! insertion point (`0..=len`). Movement operations return whether the
//! cursor actually moved so the editor can beep on a no-op.
//!
//! Terminal-cell arithmetic stays out of this type except for the two
//! width queries, which sum an injected cell-width function over the
//! relevant slice.

/// Edit buffer: the logical line and a cursor position.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EditBuffer {
    chars: Vec<char>,
    cursor: usize,
}

impl EditBuffer {
    #[must_use]
    pub fn new() -> EditBuffer {
        EditBuffer::default()
    }

    /// The buffer contents as a string.
    #[must_use]
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// The characters of the buffer.
    #[must_use]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// The cursor position in character units.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The cursor position as a byte offset into [`text`](Self::text).
    #[must_use]
    pub fn cursor_byte_offset(&self) -> usize {
        self.chars[..self.cursor].iter().map(|c| c.len_utf8()).sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The character under the cursor, or `None` at the end of the line.
    #[must_use]
    pub fn char_at_cursor(&self) -> Option<char> {
        self.chars.get(self.cursor).copied()
    }

    /// Inserts a character at the cursor, advancing the cursor over it.
    pub fn insert(&mut self, c: char) {
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }

    /// Removes the character before the cursor.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.chars.remove(self.cursor);
        true
    }

    /// Removes the character under the cursor.
    pub fn delete_char(&mut self) -> bool {
        if self.cursor == self.chars.len() {
            return false;
        }
        self.chars.remove(self.cursor);
        true
    }

    pub fn move_home(&mut self) -> bool {
        let moved = self.cursor != 0;
        self.cursor = 0;
        moved
    }

    pub fn move_end(&mut self) -> bool {
        let moved = self.cursor != self.chars.len();
        self.cursor = self.chars.len();
        moved
    }

    pub fn move_left(&mut self) -> bool {
        self.move_left_by(1)
    }

    pub fn move_right(&mut self) -> bool {
        if self.cursor == self.chars.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Moves the cursor left by up to `n` characters.
    pub fn move_left_by(&mut self, n: usize) -> bool {
        if self.cursor == 0 || n == 0 {
            return false;
        }
        self.cursor = self.cursor.saturating_sub(n);
        true
    }

    /// Moves left over a run of whitespace, then over a run of
    /// non-whitespace.
    pub fn move_word_left(&mut self) -> bool {
        let target = self.word_left_target();
        let moved = target != self.cursor;
        self.cursor = target;
        moved
    }

    /// Moves right over a run of whitespace, then over a run of
    /// non-whitespace.
    pub fn move_word_right(&mut self) -> bool {
        let mut position = self.cursor;
        while self.chars.get(position).is_some_and(|c| c.is_whitespace()) {
            position += 1;
        }
        while self.chars.get(position).is_some_and(|c| !c.is_whitespace()) {
            position += 1;
        }
        let moved = position != self.cursor;
        self.cursor = position;
        moved
    }

    /// Deletes from the word boundary on the left up to the cursor.
    pub fn delete_word_left(&mut self) -> bool {
        let target = self.word_left_target();
        if target == self.cursor {
            return false;
        }
        self.chars.drain(target..self.cursor);
        self.cursor = target;
        true
    }

    /// Deletes from the beginning of the line up to the cursor.
    pub fn delete_to_home(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.chars.drain(..self.cursor);
        self.cursor = 0;
        true
    }

    /// Deletes from the cursor to the end of the line.
    pub fn delete_to_end(&mut self) -> bool {
        if self.cursor == self.chars.len() {
            return false;
        }
        self.chars.truncate(self.cursor);
        true
    }

    /// Replaces the whole buffer, leaving the cursor at the end.
    pub fn replace_all(&mut self, text: &str) {
        self.chars = text.chars().collect();
        self.cursor = self.chars.len();
    }

    /// Replaces the given character range, leaving the cursor after the
    /// replacement.
    pub fn replace_range(&mut self, start: usize, end: usize, text: &str) {
        self.chars.splice(start..end, text.chars());
        self.cursor = start + text.chars().count();
    }

    /// Empties the buffer.
    pub fn reset(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }

    /// Total cell width of the text before the cursor.
    #[must_use]
    pub fn width_before_cursor(&self, cell_width: &dyn Fn(char) -> usize) -> usize {
        self.chars[..self.cursor].iter().map(|&c| cell_width(c)).sum()
    }

    /// Total cell width of the text at and after the cursor.
    #[must_use]
    pub fn width_after_cursor(&self, cell_width: &dyn Fn(char) -> usize) -> usize {
        self.chars[self.cursor..].iter().map(|&c| cell_width(c)).sum()
    }

    fn word_left_target(&self) -> usize {
        let mut position = self.cursor;
        while position > 0 && self.chars[position - 1].is_whitespace() {
            position -= 1;
        }
        while position > 0 && !self.chars[position - 1].is_whitespace() {
            position -= 1;
        }
        position
    }
}
