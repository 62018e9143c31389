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

//! Exit built-in
//!
//! The **`exit`** built-in ends the shell loop.
//!
//! # Synopsis
//!
//! ```sh
//! exit [exit_status]
//! ```
//!
//! # Semantics
//!
//! The shell loop terminates. Without an operand the shell exits with
//! the last observed exit status; a non-negative decimal operand names
//! the exit status explicitly.
//!
//! # Errors
//!
//! A malformed operand or more than one operand is a syntax error: an
//! error message is printed and the shell does not exit.
//!
//! # Implementation notes
//!
//! The built-in does not itself exit the process. It returns a result
//! carrying [`Divert::Exit`]; the shell loop sees the divert value and
//! terminates.

use crate::common::report_error;
use ivish_env::Env;
use ivish_env::builtin::Result;
use ivish_env::semantics::{Divert, ExitStatus};
use std::ops::ControlFlow::Break;

/// Entry point for executing the `exit` built-in
pub async fn main(env: &mut Env, args: Vec<String>) -> Result {
    if args.len() > 1 {
        return report_error(env, "exit: too many operands").await;
    }

    let exit_status = match args.first() {
        None => None,
        Some(operand) => match operand.parse() {
            Ok(status) if status >= 0 => Some(ExitStatus(status)),
            _ => {
                let message = format!("exit: {operand}: non-negative integer required");
                return report_error(env, &message).await;
            }
        },
    };
    Result::with_exit_status_and_divert(env.exit_status, Break(Divert::Exit(exit_status)))
}

/// Wrapper of [`main`] for the built-in table
pub fn builtin_main(
    env: &mut Env,
    args: Vec<String>,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result> + '_>> {
    Box::pin(main(env, args))
}
