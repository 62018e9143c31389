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

//! The interactive line editor of the ivish shell.
//!
//! The editor reads raw bytes from the terminal, decodes control
//! characters and escape sequences, maintains a logical edit buffer, and
//! repaints the line in place using ANSI escapes. On top of plain
//! editing it renders inline hints, an informational subline below the
//! prompt, and syntax-error highlighting fed by the tokenizer, and it
//! drives history navigation and completion.
//!
//! The central type is [`editor::LineEditor`]; one
//! [`read_line`](editor::LineEditor::read_line) call produces one
//! [`event`](editor::ReadEvent).

pub mod ansi;
pub mod buffer;
pub mod completion;
pub mod editor;
pub mod key;
