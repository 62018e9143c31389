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

//! Shell semantics on top of the syntax layer: alias expansion, command
//! line validation, pipeline and sequence dispatch, and the interactive
//! read-eval loop.
//!
//! A cooked input line travels [`expansion`] → tokenizer → [`validate`]
//! → [`dispatch`]; [`runtime::read_eval_loop`] is the glue that drives
//! this from the line editor and threads exit codes back to the prompt.

pub mod dispatch;
pub mod expansion;
pub mod runtime;
pub mod validate;

use thiserror::Error;

/// User-visible shell failure.
///
/// Rendered in bold red on the standard error. Unfinished quotes,
/// invalid delimiters, unknown commands and redirection failures all
/// end up here; none of them end the shell.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("{0}")]
pub struct ShellError(pub String);
