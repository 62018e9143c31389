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

//! Quoting a string so the tokenizer reads it back verbatim.
//!
//! The [`quote`] function produces the single-quoted form used when
//! printing alias definitions in reusable `alias name='value'` syntax:
//!
//! - If the string is exactly one single quote, it is backslash-escaped.
//! - Otherwise the whole string is wrapped in single quotes and every
//!   inner single quote is replaced with `'\''`.
//!
//! # Examples
//!
//! ```
//! # use ivish_syntax::quote::quote;
//! assert_eq!(quote("ls --color"), "'ls --color'");
//! assert_eq!(quote(""), "''");
//! assert_eq!(quote("'"), "\\'");
//! assert_eq!(quote("it's"), "'it'\\''s'");
//! ```

/// Quotes the argument for reuse on a command line.
///
/// See the [module doc](self) for the quoting rules.
#[must_use]
pub fn quote(s: &str) -> String {
    if s == "'" {
        return "\\'".to_owned();
    }

    let mut result = String::with_capacity(s.len() + 2);
    result.push('\'');
    for c in s.chars() {
        if c == '\'' {
            result.push_str("'\\''");
        } else {
            result.push(c);
        }
    }
    result.push('\'');
    result
}
