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

//! History built-in
//!
//! The **`history`** built-in prints the numbered command history.
//!
//! # Synopsis
//!
//! ```sh
//! history [-c]
//! ```
//!
//! # Options
//!
//! The **`-c`** option clears the history instead of printing it.

use crate::common::{output, report_error};
use ivish_env::Env;
use std::fmt::Write as _;

/// Entry point for executing the `history` built-in
pub async fn main(env: &mut Env, args: Vec<String>) -> ivish_env::builtin::Result {
    match args.first().map(String::as_str) {
        None => {
            let mut listing = String::new();
            for (index, item) in env.history.items().iter().enumerate() {
                _ = writeln!(listing, "{:5}  {item}", index + 1);
            }
            output(env, &listing).await
        }
        Some("-c") => {
            env.history.clear();
            ivish_env::builtin::Result::default()
        }
        Some(operand) => {
            let message = format!("history: {operand}: unknown operand");
            report_error(env, &message).await
        }
    }
}

/// Wrapper of [`main`] for the built-in table
pub fn builtin_main(
    env: &mut Env,
    args: Vec<String>,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = ivish_env::builtin::Result> + '_>> {
    Box::pin(main(env, args))
}
