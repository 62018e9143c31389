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

//! Pre-dispatch validation of a tokenized line.
//!
//! The tokenizer itself never fails; this module turns its misgivings
//! (an unfinished escape, invalid delimiters) into the [`ShellError`]s
//! the user sees. The line editor highlights the same positions while
//! typing, so by the time a line is submitted these messages are rarely
//! a surprise.

use crate::ShellError;
use itertools::Itertools as _;
use ivish_syntax::lex::TokenizeResult;

/// Checks a tokenized line for problems that prevent dispatch.
pub fn validate(result: &TokenizeResult) -> Result<(), ShellError> {
    if let Some(escape) = result.unfinished_escape {
        let message = format!("unfinished {}", escape.kind.opening_char());
        return Err(ShellError(message));
    }

    let invalid = result.invalid_delimiters();
    if !invalid.is_empty() {
        let list = invalid
            .iter()
            .map(|&index| result.delimiters[index].kind.literal())
            .join(" ");
        return Err(ShellError(format!("invalid delimiters {list}")));
    }

    Ok(())
}
