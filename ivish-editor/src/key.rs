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

//! Input decoding.
//!
//! Terminal input arrives as bytes. [`Utf8Decoder`] reassembles them
//! into characters, and [`KeyDecoder`] turns characters into editor
//! [`Key`]s: printable characters, named control codes, and cursor-key
//! escape sequences.
//!
//! Escape sequences are decoded by a bounded state machine (initial,
//! after `ESC`, after `ESC [`, after `ESC [ N`, after `ESC O`); three
//! characters after the `ESC` suffice for every recognized sequence. A
//! sequence with no matching prefix is swallowed. A lone `ESC` cannot be
//! told apart from the start of a sequence until the input pauses, so
//! the editor calls [`KeyDecoder::flush`] after each burst of input;
//! only then does a pending `ESC` resolve to [`Key::CancelBrowse`].

/// A decoded editor key.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Key {
    /// A printable character to insert
    Insert(char),
    Home,
    End,
    Left,
    Right,
    WordLeft,
    WordRight,
    HistoryPrev,
    HistoryNext,
    Backspace,
    /// Delete the character under the cursor
    Delete,
    /// `^D`: delete, or end of input on an empty buffer
    DeleteOrEof,
    DeleteToHome,
    DeleteToEnd,
    DeleteWordLeft,
    /// `^C`
    Interrupt,
    /// Enter
    Accept,
    /// Tab
    Complete,
    /// `^L`
    ClearScreen,
    /// Lone `ESC` or `^G`: abandon history browsing
    CancelBrowse,
    /// Recognized but meaningless input, swallowed without effect
    Ignored,
}

/// State machine that decodes characters into [`Key`]s.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct KeyDecoder {
    state: State,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
enum State {
    #[default]
    Initial,
    /// After `ESC`
    Escape,
    /// After `ESC [`
    Csi,
    /// After `ESC [ N` for a recognized digit N
    CsiNum(char),
    /// After `ESC O`
    Ss3,
}

impl KeyDecoder {
    #[must_use]
    pub fn new() -> KeyDecoder {
        KeyDecoder::default()
    }

    /// Feeds one character into the decoder.
    ///
    /// Returns `None` while in the middle of an escape sequence.
    pub fn feed(&mut self, c: char) -> Option<Key> {
        match self.state {
            State::Initial => self.initial(c),
            State::Escape => match c {
                '[' => self.advance(State::Csi),
                'O' => self.advance(State::Ss3),
                _ => self.emit(Key::Ignored),
            },
            State::Csi => match c {
                'A' => self.emit(Key::HistoryPrev),
                'B' => self.emit(Key::HistoryNext),
                'C' => self.emit(Key::Right),
                'D' => self.emit(Key::Left),
                'H' => self.emit(Key::Home),
                'F' => self.emit(Key::End),
                '1' | '3' | '4' | '7' => self.advance(State::CsiNum(c)),
                _ => self.emit(Key::Ignored),
            },
            State::CsiNum(digit) => match (digit, c) {
                ('1' | '7', '~') => self.emit(Key::Home),
                ('3', '~') => self.emit(Key::Delete),
                ('4', '~') => self.emit(Key::End),
                _ => self.emit(Key::Ignored),
            },
            State::Ss3 => match c {
                'H' => self.emit(Key::Home),
                'F' => self.emit(Key::End),
                _ => self.emit(Key::Ignored),
            },
        }
    }

    /// Tells the decoder the current burst of input has ended.
    ///
    /// A pending `ESC` with no follow-up resolves to
    /// [`Key::CancelBrowse`]; any other partial sequence is discarded.
    pub fn flush(&mut self) -> Option<Key> {
        let state = std::mem::take(&mut self.state);
        match state {
            State::Initial => None,
            State::Escape => Some(Key::CancelBrowse),
            _ => Some(Key::Ignored),
        }
    }

    fn initial(&mut self, c: char) -> Option<Key> {
        let key = match c {
            '\u{1b}' => return self.advance(State::Escape),
            '\u{1}' => Key::Home,          // ^A
            '\u{2}' => Key::Left,          // ^B
            '\u{3}' => Key::Interrupt,     // ^C
            '\u{4}' => Key::DeleteOrEof,   // ^D
            '\u{5}' => Key::End,           // ^E
            '\u{6}' => Key::Right,         // ^F
            '\u{7}' => Key::CancelBrowse,  // ^G
            '\u{8}' => Key::Backspace,     // ^H
            '\t' => Key::Complete,
            '\n' | '\r' => Key::Accept,
            '\u{b}' => Key::DeleteToEnd,   // ^K
            '\u{c}' => Key::ClearScreen,   // ^L
            '\u{e}' => Key::HistoryNext,   // ^N
            '\u{10}' => Key::HistoryPrev,  // ^P
            '\u{14}' => Key::WordLeft,     // ^T
            '\u{15}' => Key::DeleteToHome, // ^U
            '\u{17}' => Key::DeleteWordLeft, // ^W
            '\u{19}' => Key::WordRight,    // ^Y
            '\u{7f}' => Key::Backspace,
            c if (c as u32) < 0x20 => Key::Ignored,
            c => Key::Insert(c),
        };
        Some(key)
    }

    fn advance(&mut self, state: State) -> Option<Key> {
        self.state = state;
        None
    }

    fn emit(&mut self, key: Key) -> Option<Key> {
        self.state = State::Initial;
        Some(key)
    }
}

/// Incremental UTF-8 decoder.
///
/// Multi-byte characters may arrive split across reads; incomplete
/// trailing bytes are kept for the next feed. Invalid bytes are dropped.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    #[must_use]
    pub fn new() -> Utf8Decoder {
        Utf8Decoder::default()
    }

    /// Feeds bytes, returning every complete character.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<char> {
        self.pending.extend_from_slice(bytes);
        let mut chars = Vec::new();
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    chars.extend(text.chars());
                    self.pending.clear();
                    return chars;
                }
                Err(error) => {
                    let valid = error.valid_up_to();
                    let text = std::str::from_utf8(&self.pending[..valid]).unwrap();
                    chars.extend(text.chars());
                    match error.error_len() {
                        // An incomplete character waits for more bytes.
                        None => {
                            self.pending.drain(..valid);
                            return chars;
                        }
                        Some(invalid) => {
                            self.pending.drain(..valid + invalid);
                        }
                    }
                }
            }
        }
    }
}
