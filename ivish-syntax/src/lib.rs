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

//! This crate defines the lexical surface of the ivish shell: the
//! quote-aware command-line tokenizer, the alias definition types shared
//! between the expansion engine and the `alias`/`unalias` built-ins, and
//! the requoting function used to print alias definitions in reusable
//! form.
//!
//! The tokenizer ([`lex`]) never fails. Malformed input is conveyed in
//! the result itself: an unfinished quote or backslash is reported as an
//! [`EscapeInfo`](lex::EscapeInfo) and misplaced `|`, `|&` and `;`
//! delimiters are found by
//! [`invalid_delimiters`](lex::TokenizeResult::invalid_delimiters). This
//! lets the line editor highlight problems in place while the user is
//! still typing.

pub mod alias;
pub mod lex;
pub mod quote;
