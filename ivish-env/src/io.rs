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

//! Type definitions for I/O.

use crate::Env;
use std::ffi::c_int;

/// File descriptor.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Fd(pub c_int);

impl Fd {
    /// File descriptor of the standard input
    pub const STDIN: Fd = Fd(0);
    /// File descriptor of the standard output
    pub const STDOUT: Fd = Fd(1);
    /// File descriptor of the standard error
    pub const STDERR: Fd = Fd(2);
}

impl std::fmt::Display for Fd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// SGR sequence that starts bold red text
const BOLD_RED: &str = "\u{1b}[1;31m";
/// SGR sequence that resets colors and attributes
const RESET: &str = "\u{1b}[0m";

/// Prints a user-visible error message.
///
/// The message normally goes to the standard error in bold red (plain
/// when the target is not a terminal). While completion candidates are
/// on screen the message is routed to the standard output instead, so
/// it lands below the candidate listing rather than over the kept line
/// (see [`Env::error_to_stdout`]).
pub async fn print_error(env: &mut Env, message: &str) {
    let fd = if env.error_to_stdout {
        Fd::STDOUT
    } else {
        Fd::STDERR
    };
    let text = if env.system.isatty(fd) {
        format!("{BOLD_RED}{message}{RESET}\n")
    } else {
        format!("{message}\n")
    };
    _ = env.system.write_all(fd, text.as_bytes()).await;
}
