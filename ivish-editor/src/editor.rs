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

//! The line editor.
//!
//! [`LineEditor::read_line`] switches the terminal to raw mode, reads
//! and decodes input, and repaints the line in place after every burst
//! of keys until something noteworthy happens: a completed line, end of
//! input, an interrupt, or an ambiguous completion. The repaint routine
//! renders three decorations on top of the plain text:
//!
//! - syntax-error highlighting for invalid delimiters and unfinished
//!   quotes, straight from the tokenizer;
//! - an inline hint at the cursor (a suggestion that is not part of the
//!   buffer);
//! - a subline below the prompt (for example an alias preview), cleared
//!   and rewritten on every repaint.
//!
//! The redraw never repaints the prompt: it moves relative to the
//! prompt's right edge, tracked in terminal cells.

use crate::ansi;
use crate::buffer::EditBuffer;
use crate::completion::{self, Completion};
use crate::key::{Key, KeyDecoder, Utf8Decoder};
use ivish_env::history::History;
use ivish_env::host::{CellWidthFn, CompletionProvider};
use ivish_env::io::Fd;
use ivish_env::system::{Errno, SharedSystem};
use ivish_syntax::lex::{self, TokenizeResult};
use std::collections::VecDeque;
use std::rc::Rc;

/// Callback producing the inline hint for the current buffer text.
pub type HintFn = Box<dyn Fn(&str) -> Option<String>>;

/// Callback producing the subline for the current buffer text.
pub type SublineFn = Box<dyn Fn(&str) -> Option<String>>;

/// 256-color indexes used for syntax-error highlighting.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HintColors {
    pub unfinished_quote: u8,
    pub invalid_pipe: u8,
    pub invalid_separator: u8,
}

/// All highlight colors default to 178.
pub const DEFAULT_HINT_COLOR: u8 = 178;

impl Default for HintColors {
    fn default() -> HintColors {
        HintColors {
            unfinished_quote: DEFAULT_HINT_COLOR,
            invalid_pipe: DEFAULT_HINT_COLOR,
            invalid_separator: DEFAULT_HINT_COLOR,
        }
    }
}

/// 256-color index of the inline hint text
const INLINE_HINT_COLOR: u8 = 244;

/// What a [`LineEditor::read_line`] call produced.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReadEvent {
    /// A completed input line
    Line(String),
    /// `^D` on an empty buffer: the shell should terminate
    Eof,
    /// `^C`: the shell should drop the line and prompt again
    Interrupt,
    /// An ambiguous completion: the shell should list the candidates
    /// and call `read_line` again, which resumes from the kept line
    Completion(Completion),
}

/// Interactive line editor on a shared terminal.
pub struct LineEditor {
    system: SharedSystem,
    input: Fd,
    output: Fd,
    buffer: EditBuffer,
    decoder: KeyDecoder,
    utf8: Utf8Decoder,
    cell_width: CellWidthFn,
    prompt: String,
    colors: HintColors,
    hint: Option<HintFn>,
    subline: Option<SublineFn>,
    completion: Option<Rc<dyn CompletionProvider>>,
    /// Cells between the prompt and the terminal cursor after the last
    /// redraw
    old_cursor_loc: usize,
    /// Rows the currently displayed subline occupies
    shown_subline_rows: usize,
    /// Buffer preserved across a completion event
    kept: Option<EditBuffer>,
    /// Type-ahead decoded but not yet handled when the previous
    /// `read_line` returned
    pending: VecDeque<Key>,
}

impl LineEditor {
    pub fn new(system: SharedSystem, cell_width: CellWidthFn) -> LineEditor {
        LineEditor {
            system,
            input: Fd::STDIN,
            output: Fd::STDOUT,
            buffer: EditBuffer::new(),
            decoder: KeyDecoder::new(),
            utf8: Utf8Decoder::new(),
            cell_width,
            prompt: "$ ".to_owned(),
            colors: HintColors::default(),
            hint: None,
            subline: None,
            completion: None,
            old_cursor_loc: 0,
            shown_subline_rows: 0,
            kept: None,
            pending: VecDeque::new(),
        }
    }

    pub fn set_prompt<S: Into<String>>(&mut self, prompt: S) {
        self.prompt = prompt.into();
    }

    pub fn set_hint_colors(&mut self, colors: HintColors) {
        self.colors = colors;
    }

    pub fn set_hint(&mut self, hint: HintFn) {
        self.hint = Some(hint);
    }

    pub fn set_subline(&mut self, subline: SublineFn) {
        self.subline = Some(subline);
    }

    pub fn set_completion(&mut self, provider: Rc<dyn CompletionProvider>) {
        self.completion = Some(provider);
    }

    /// Whether a completion event left a line to be resumed.
    #[must_use]
    pub fn has_kept_line(&self) -> bool {
        self.kept.is_some()
    }

    /// Reads one line, in raw mode, painting as the user types.
    ///
    /// A terminal I/O failure aborts this call but leaves the editor
    /// usable for the next one.
    pub async fn read_line(&mut self, history: &mut History) -> Result<ReadEvent, Errno> {
        self.system.set_raw_mode(self.input, true)?;
        let result = self.run(history).await;
        let restored = self.system.set_raw_mode(self.input, false);
        let event = result?;
        restored?;
        Ok(event)
    }

    async fn run(&mut self, history: &mut History) -> Result<ReadEvent, Errno> {
        self.old_cursor_loc = 0;
        self.shown_subline_rows = 0;
        match self.kept.take() {
            Some(kept) => self.buffer = kept,
            None => self.buffer.reset(),
        }

        let prompt = self.prompt.clone();
        self.system.write_all(self.output, prompt.as_bytes()).await?;
        if !self.buffer.is_empty() {
            self.redraw().await?;
        }

        let mut bytes = [0; 64];
        loop {
            let keys: Vec<Key> = if self.pending.is_empty() {
                let count = self.system.read(self.input, &mut bytes).await?;
                if count == 0 {
                    // The input stream ended without a newline.
                    return if self.buffer.is_empty() {
                        self.leave_line().await?;
                        Ok(ReadEvent::Eof)
                    } else {
                        self.finish_line(history).await
                    };
                }
                let mut keys = Vec::new();
                for c in self.utf8.feed(&bytes[..count]) {
                    keys.extend(self.decoder.feed(c));
                }
                keys.extend(self.decoder.flush());
                keys
            } else {
                self.pending.drain(..).collect()
            };

            for (index, &key) in keys.iter().enumerate() {
                if let Some(event) = self.handle_key(key, history).await? {
                    // Keep the unhandled type-ahead for the next call.
                    self.pending.extend(&keys[index + 1..]);
                    return Ok(event);
                }
            }
            self.redraw().await?;
        }
    }

    async fn handle_key(
        &mut self,
        key: Key,
        history: &mut History,
    ) -> Result<Option<ReadEvent>, Errno> {
        match key {
            Key::Insert(c) => self.buffer.insert(c),
            Key::Home
            | Key::End
            | Key::Left
            | Key::Right
            | Key::WordLeft
            | Key::WordRight
            | Key::Backspace
            | Key::Delete
            | Key::DeleteToHome
            | Key::DeleteToEnd
            | Key::DeleteWordLeft => {
                let moved = match key {
                    Key::Home => self.buffer.move_home(),
                    Key::End => self.buffer.move_end(),
                    Key::Left => self.buffer.move_left(),
                    Key::Right => self.buffer.move_right(),
                    Key::WordLeft => self.buffer.move_word_left(),
                    Key::WordRight => self.buffer.move_word_right(),
                    Key::Backspace => self.buffer.backspace(),
                    Key::Delete => self.buffer.delete_char(),
                    Key::DeleteToHome => self.buffer.delete_to_home(),
                    Key::DeleteToEnd => self.buffer.delete_to_end(),
                    _ => self.buffer.delete_word_left(),
                };
                self.feedback(moved).await?;
            }

            Key::HistoryPrev => {
                let current = self.buffer.text();
                match history.prev(&current) {
                    Some(line) => self.buffer.replace_all(&line),
                    None => self.beep().await?,
                }
            }
            Key::HistoryNext => match history.next() {
                Some(line) => self.buffer.replace_all(&line),
                None => self.beep().await?,
            },
            Key::CancelBrowse => {
                if let Some(cached) = history.reset_to_cache() {
                    self.buffer.replace_all(&cached);
                }
            }

            Key::DeleteOrEof => {
                if self.buffer.is_empty() {
                    self.leave_line().await?;
                    return Ok(Some(ReadEvent::Eof));
                }
                let deleted = self.buffer.delete_char();
                self.feedback(deleted).await?;
            }
            Key::Interrupt => {
                _ = history.reset_to_cache();
                self.leave_line().await?;
                return Ok(Some(ReadEvent::Interrupt));
            }
            Key::Accept => return self.finish_line(history).await.map(Some),
            Key::Complete => return self.complete().await,

            Key::ClearScreen => {
                let mut out = String::from(ansi::CLEAR_SCREEN);
                out += ansi::HOME_CURSOR;
                out += &self.prompt;
                self.old_cursor_loc = 0;
                self.shown_subline_rows = 0;
                self.system.write_all(self.output, out.as_bytes()).await?;
            }
            Key::Ignored => {}
        }
        Ok(None)
    }

    async fn finish_line(&mut self, history: &mut History) -> Result<ReadEvent, Errno> {
        _ = history.reset_to_cache();
        self.leave_line().await?;
        Ok(ReadEvent::Line(self.buffer.text()))
    }

    /// Clears any subline and moves to a fresh row before handing the
    /// terminal back to the caller.
    async fn leave_line(&mut self) -> Result<(), Errno> {
        let mut out = self.clear_subline();
        out += "\r\n";
        self.system.write_all(self.output, out.as_bytes()).await?;
        Ok(())
    }

    async fn feedback(&mut self, moved: bool) -> Result<(), Errno> {
        if !moved {
            self.beep().await?;
        }
        Ok(())
    }

    async fn beep(&mut self) -> Result<(), Errno> {
        self.system.write_all(self.output, b"\x07").await?;
        Ok(())
    }

    async fn complete(&mut self) -> Result<Option<ReadEvent>, Errno> {
        let Some(provider) = self.completion.clone() else {
            self.beep().await?;
            return Ok(None);
        };

        let text = self.buffer.text();
        let cursor_byte = self.buffer.cursor_byte_offset();
        let site = completion::classify(&text[..cursor_byte]);
        let candidates = provider.candidates(site.kind, &site.pattern);
        let start_char = text[..site.start].chars().count();

        match candidates.len() {
            0 => {
                self.beep().await?;
                Ok(None)
            }
            1 => {
                let completed = &candidates[0];
                let at_end_of_line = self.buffer.cursor() == self.buffer.len();
                let trailing_space = at_end_of_line && !completed.ends_with('/');
                let replacement = if trailing_space {
                    format!("{completed} ")
                } else {
                    completed.clone()
                };
                self.buffer
                    .replace_range(start_char, self.buffer.cursor(), &replacement);
                Ok(None)
            }
            _ => {
                let prefix = completion::common_prefix(&candidates);
                if prefix.chars().count() > site.pattern.chars().count() {
                    self.buffer
                        .replace_range(start_char, self.buffer.cursor(), &prefix);
                }
                // Show the extended line, keep it, and let the caller
                // list the candidates below.
                self.redraw().await?;
                self.leave_line().await?;
                self.kept = Some(self.buffer.clone());
                Ok(Some(ReadEvent::Completion(Completion { site, candidates })))
            }
        }
    }

    /// Repaints the edited line in place with a single escape string.
    async fn redraw(&mut self) -> Result<(), Errno> {
        let text = self.buffer.text();
        let cursor_byte = self.buffer.cursor_byte_offset();
        let result = lex::tokenize(&text);
        let items = self.hint_items(&result);
        let width_before = self.buffer.width_before_cursor(&*self.cell_width);
        let width_after = self.buffer.width_after_cursor(&*self.cell_width);

        let mut out = String::new();
        // Back to the right edge of the prompt
        out += &ansi::cursor_backward(self.old_cursor_loc);
        // The buffer before the cursor, highlighted
        out += &self.paint(&text[..cursor_byte], 0, &items);
        out += ansi::ERASE_RIGHT;
        // Home and back, landing exactly on the cursor cell
        out += &ansi::cursor_backward(width_before);
        out += &ansi::cursor_forward(width_before);
        // Inline hint, only over whitespace or past the end of the line
        if let Some(hint) = self.inline_hint(&text) {
            out += &ansi::fg_color_256(INLINE_HINT_COLOR);
            out += &hint;
            out += ansi::RESET_COLOR;
            out += &ansi::cursor_backward(self.width_of(&hint));
        }
        // The buffer after the cursor, highlighted, then restore the
        // cursor over the tail
        out += &self.paint(&text[cursor_byte..], cursor_byte, &items);
        out += &ansi::cursor_backward(width_after);
        // Subline below the prompt
        out += &self.repaint_subline(&text, width_before);

        self.old_cursor_loc = width_before;
        self.system.write_all(self.output, out.as_bytes()).await?;
        Ok(())
    }

    /// Positions and colors of the characters to highlight.
    fn hint_items(&self, result: &TokenizeResult) -> Vec<(usize, u8)> {
        let mut items = Vec::new();
        for index in result.invalid_delimiters() {
            let delimiter = &result.delimiters[index];
            let color = if delimiter.kind.is_pipe() {
                self.colors.invalid_pipe
            } else {
                self.colors.invalid_separator
            };
            items.push((delimiter.position, color));
        }
        if let Some(escape) = result.unfinished_escape {
            items.push((escape.start, self.colors.unfinished_quote));
        }
        items
    }

    /// Renders a slice of the line, wrapping highlighted characters in
    /// 256-color escapes. `base` is the byte position of the slice in
    /// the whole line.
    fn paint(&self, slice: &str, base: usize, items: &[(usize, u8)]) -> String {
        let mut out = String::new();
        for (index, c) in slice.char_indices() {
            let hit = items.iter().find(|(position, _)| *position == base + index);
            match hit {
                Some((_, color)) => {
                    out += &ansi::fg_color_256(*color);
                    out.push(c);
                    out += ansi::RESET_COLOR;
                }
                None => out.push(c),
            }
        }
        out
    }

    fn inline_hint(&self, text: &str) -> Option<String> {
        let at_blank = self
            .buffer
            .char_at_cursor()
            .is_none_or(|c| c.is_whitespace());
        if !at_blank {
            return None;
        }
        (self.hint.as_ref()?)(text)
    }

    /// Clears the old subline rows and writes the new subline, leaving
    /// the cursor where it was.
    ///
    /// Rows are made with `\n`, which scrolls at the bottom of the
    /// screen, so the cursor row is recovered relatively and the column
    /// from the known cell position.
    fn repaint_subline(&mut self, text: &str, width_before: usize) -> String {
        let subline = self.subline.as_ref().and_then(|f| f(text));
        let rows: Vec<&str> = match &subline {
            Some(subline) => subline.lines().collect(),
            None => Vec::new(),
        };
        let touched = rows.len().max(self.shown_subline_rows);
        if touched == 0 {
            return String::new();
        }

        let mut out = String::new();
        for index in 0..touched {
            out += "\n";
            out += ansi::ERASE_ROW;
            if let Some(row) = rows.get(index) {
                out += row;
                out += "\r";
            }
        }
        out += &ansi::cursor_up(touched);
        out += &ansi::cursor_to_column(self.prompt_width() + width_before + 1);
        self.shown_subline_rows = rows.len();
        out
    }

    /// Escape string that erases any displayed subline rows.
    fn clear_subline(&mut self) -> String {
        let rows = std::mem::take(&mut self.shown_subline_rows);
        if rows == 0 {
            return String::new();
        }
        let mut out = String::new();
        for _ in 0..rows {
            out += "\n";
            out += ansi::ERASE_ROW;
        }
        out += &ansi::cursor_up(rows);
        out += &ansi::cursor_to_column(self.prompt_width() + self.old_cursor_loc + 1);
        out
    }

    fn prompt_width(&self) -> usize {
        self.width_of(&self.prompt)
    }

    fn width_of(&self, s: &str) -> usize {
        s.chars().map(|c| (*self.cell_width)(c)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use futures_util::FutureExt as _;
    use ivish_env::VirtualSystem;
    use ivish_env::host::CompletionKind;
    use ivish_env::system::r#virtual::SystemState;
    use std::cell::RefCell;

    fn make_editor(input: &str) -> (LineEditor, Rc<RefCell<SystemState>>) {
        let system = VirtualSystem::new();
        let state = Rc::clone(&system.state);
        state.borrow_mut().feed_stdin(input);
        let shared = SharedSystem::new(Box::new(system));
        let editor = LineEditor::new(shared, Rc::new(|_| 1));
        (editor, state)
    }

    fn read(editor: &mut LineEditor, history: &mut History) -> ReadEvent {
        editor
            .read_line(history)
            .now_or_never()
            .unwrap()
            .unwrap()
    }

    fn stdout(state: &Rc<RefCell<SystemState>>) -> String {
        String::from_utf8(state.borrow().stdout.clone()).unwrap()
    }

    #[test]
    fn plain_line() {
        let (mut editor, state) = make_editor("echo hi\r");
        let mut history = History::new();
        assert_eq!(
            read(&mut editor, &mut history),
            ReadEvent::Line("echo hi".to_owned())
        );
        assert!(stdout(&state).starts_with("$ "));
        assert!(!state.borrow().raw_mode);
    }

    #[test]
    fn eof_on_empty_buffer() {
        let (mut editor, _state) = make_editor("\x04");
        let mut history = History::new();
        assert_eq!(read(&mut editor, &mut history), ReadEvent::Eof);
    }

    #[test]
    fn end_of_stream_with_text_yields_the_line() {
        let (mut editor, _state) = make_editor("abc");
        let mut history = History::new();
        assert_eq!(
            read(&mut editor, &mut history),
            ReadEvent::Line("abc".to_owned())
        );
    }

    #[test]
    fn interrupt_drops_the_line() {
        let (mut editor, _state) = make_editor("abc\x03");
        let mut history = History::new();
        assert_eq!(read(&mut editor, &mut history), ReadEvent::Interrupt);
    }

    #[test]
    fn control_d_deletes_in_a_non_empty_buffer() {
        let (mut editor, _state) = make_editor("ab\x02\x04\r");
        let mut history = History::new();
        assert_eq!(
            read(&mut editor, &mut history),
            ReadEvent::Line("a".to_owned())
        );
    }

    #[test]
    fn arrow_keys_move_the_cursor() {
        let (mut editor, _state) = make_editor("ab\x1b[Dc\r");
        let mut history = History::new();
        assert_eq!(
            read(&mut editor, &mut history),
            ReadEvent::Line("acb".to_owned())
        );
    }

    #[test]
    fn home_key_and_delete_to_end() {
        let (mut editor, _state) = make_editor("hello\x1b[H\x0bhi\r");
        let mut history = History::new();
        assert_eq!(
            read(&mut editor, &mut history),
            ReadEvent::Line("hi".to_owned())
        );
    }

    #[test]
    fn history_browsing_replaces_the_buffer() {
        let (mut editor, _state) = make_editor("\x1b[A\r");
        let mut history = History::new();
        history.add("ls");
        history.add("pwd");
        assert_eq!(
            read(&mut editor, &mut history),
            ReadEvent::Line("pwd".to_owned())
        );
        assert!(!history.is_browsing());
    }

    #[test]
    fn cancel_browse_restores_the_edited_line() {
        let (mut editor, _state) = make_editor("x\x1b[A\x07\r");
        let mut history = History::new();
        history.add("ls");
        assert_eq!(
            read(&mut editor, &mut history),
            ReadEvent::Line("x".to_owned())
        );
    }

    #[test]
    fn beep_on_impossible_movement() {
        let (mut editor, state) = make_editor("\x02");
        let mut history = History::new();
        assert_eq!(read(&mut editor, &mut history), ReadEvent::Eof);
        assert!(stdout(&state).contains('\x07'));
    }

    #[test]
    fn invalid_delimiter_is_highlighted() {
        let (mut editor, state) = make_editor("| l");
        let mut history = History::new();
        assert_eq!(
            read(&mut editor, &mut history),
            ReadEvent::Line("| l".to_owned())
        );
        assert!(stdout(&state).contains(&ansi::fg_color_256(DEFAULT_HINT_COLOR)));
    }

    #[test]
    fn unfinished_quote_is_highlighted_with_its_color() {
        let (mut editor, state) = make_editor("\"x");
        let mut history = History::new();
        editor.set_hint_colors(HintColors {
            unfinished_quote: 99,
            ..HintColors::default()
        });
        _ = read(&mut editor, &mut history);
        assert!(stdout(&state).contains(&ansi::fg_color_256(99)));
    }

    #[test]
    fn inline_hint_appears_at_end_of_line() {
        let (mut editor, state) = make_editor("pr");
        let mut history = History::new();
        editor.set_hint(Box::new(|text| {
            (text == "pr").then(|| "int".to_owned())
        }));
        _ = read(&mut editor, &mut history);
        assert!(stdout(&state).contains("int"));
        assert!(stdout(&state).contains(&ansi::fg_color_256(INLINE_HINT_COLOR)));
    }

    #[test]
    fn subline_is_written_and_cleared() {
        let (mut editor, state) = make_editor("ls");
        let mut history = History::new();
        editor.set_subline(Box::new(|text| {
            (!text.is_empty()).then(|| format!("alias preview: {text}"))
        }));
        _ = read(&mut editor, &mut history);
        let output = stdout(&state);
        assert!(output.contains("alias preview: ls"));
        assert!(output.contains(ansi::ERASE_ROW));
    }

    #[derive(Debug)]
    struct FixedCandidates(Vec<&'static str>);

    impl CompletionProvider for FixedCandidates {
        fn candidates(&self, _kind: CompletionKind, pattern: &str) -> Vec<String> {
            self.0
                .iter()
                .filter(|c| c.starts_with(pattern))
                .map(|c| (*c).to_owned())
                .collect()
        }
    }

    #[test]
    fn single_candidate_completes_with_trailing_space() {
        let (mut editor, _state) = make_editor("gre\t\r");
        let mut history = History::new();
        editor.set_completion(Rc::new(FixedCandidates(vec!["grep", "make"])));
        assert_eq!(
            read(&mut editor, &mut history),
            ReadEvent::Line("grep ".to_owned())
        );
    }

    #[test]
    fn directory_candidate_gets_no_trailing_space() {
        let (mut editor, _state) = make_editor("cat sr\t\r");
        let mut history = History::new();
        editor.set_completion(Rc::new(FixedCandidates(vec!["src/"])));
        assert_eq!(
            read(&mut editor, &mut history),
            ReadEvent::Line("cat src/".to_owned())
        );
    }

    #[test]
    fn ambiguous_completion_keeps_the_line() {
        let (mut editor, state) = make_editor("g\t");
        let mut history = History::new();
        editor.set_completion(Rc::new(FixedCandidates(vec!["grep", "grow"])));

        let event = read(&mut editor, &mut history);
        assert_matches!(event, ReadEvent::Completion(completion) => {
            assert_eq!(completion.candidates, ["grep", "grow"]);
            assert_eq!(completion.site.kind, CompletionKind::Command);
        });
        assert!(editor.has_kept_line());

        // The next read resumes from the kept line with the common
        // prefix inserted.
        state.borrow_mut().feed_stdin("\r");
        assert_eq!(
            read(&mut editor, &mut history),
            ReadEvent::Line("gr".to_owned())
        );
        assert!(!editor.has_kept_line());
    }

    #[test]
    fn completion_without_matches_beeps() {
        let (mut editor, state) = make_editor("zz\t\r");
        let mut history = History::new();
        editor.set_completion(Rc::new(FixedCandidates(vec!["grep"])));
        assert_eq!(
            read(&mut editor, &mut history),
            ReadEvent::Line("zz".to_owned())
        );
        assert!(stdout(&state).contains('\x07'));
    }
}
