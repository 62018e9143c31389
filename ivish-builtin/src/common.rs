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

//! Common items for implementing built-ins
//!
//! This module contains utility functions for printing results and
//! reporting errors in a unified format.

use ivish_env::Env;
use ivish_env::builtin::Result;
use ivish_env::io;
use ivish_env::io::Fd;
use ivish_env::semantics::ExitStatus;

/// Prints a text to the standard output.
///
/// Returns the default result. In case of an error, an error message is
/// printed to the standard error and the returned result has exit
/// status [`ExitStatus::FAILURE`].
pub async fn output(env: &mut Env, content: &str) -> Result {
    match env.system.write_all(Fd::STDOUT, content.as_bytes()).await {
        Ok(_) => Result::default(),
        Err(errno) => {
            let message = format!("error printing results to stdout: {errno}");
            report_failure(env, &message).await
        }
    }
}

/// Prints a failure message and returns [`ExitStatus::FAILURE`].
pub async fn report_failure(env: &mut Env, message: &str) -> Result {
    io::print_error(env, message).await;
    Result::new(ExitStatus::FAILURE)
}

/// Prints an error message and returns [`ExitStatus::ERROR`].
///
/// Use this for command argument syntax errors; use [`report_failure`]
/// for runtime failures.
pub async fn report_error(env: &mut Env, message: &str) -> Result {
    io::print_error(env, message).await;
    Result::new(ExitStatus::ERROR)
}
