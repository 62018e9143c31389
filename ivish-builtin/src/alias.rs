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

//! Alias built-in
//!
//! The **`alias`** built-in defines and prints aliases.
//!
//! # Synopsis
//!
//! ```sh
//! alias [--] [name[=value]…]
//! ```
//!
//! # Description
//!
//! Without operands, all alias definitions are printed. An operand of
//! the form *name*`=`*value* defines an alias; an operand without `=`
//! prints the definition of the named alias.
//!
//! Definitions are printed in reusable form, `alias name='value'`, with
//! the value single-quoted so the line can be fed back to the shell.
//! A name starting with `-` is printed after a `--` separator.
//!
//! # Errors
//!
//! It is an error to define an alias whose name contains a shell break,
//! quote, expansion or path character, or to print a non-existent
//! alias.
//!
//! # Exit status
//!
//! Zero unless an error occurs.

use crate::common::{output, report_failure};
use itertools::Itertools as _;
use ivish_env::Env;
use ivish_syntax::alias::{HashEntry, split_definition, validate_name};
use ivish_syntax::quote::quote;
use std::rc::Rc;

/// Formats an alias definition so it can be fed back to the shell.
#[must_use]
fn reusable(name: &str, replacement: &str) -> String {
    let separator = if name.starts_with('-') { "-- " } else { "" };
    format!("alias {separator}{name}={}\n", quote(replacement))
}

/// Entry point for executing the `alias` built-in
pub async fn main(env: &mut Env, args: Vec<String>) -> ivish_env::builtin::Result {
    let mut operands = args.as_slice();
    if operands.first().is_some_and(|arg| arg == "--") {
        operands = &operands[1..];
    }

    if operands.is_empty() {
        let listing = env
            .aliases
            .iter()
            .sorted_by(|a, b| a.0.name.cmp(&b.0.name))
            .map(|entry| reusable(&entry.0.name, &entry.0.replacement))
            .collect::<String>();
        return output(env, &listing).await;
    }

    let mut result = ivish_env::builtin::Result::default();
    for operand in operands {
        match split_definition(operand) {
            (name, Some(value)) => match validate_name(name) {
                Ok(()) => {
                    let entry = HashEntry::new(name, value);
                    Rc::make_mut(&mut env.aliases).replace(entry);
                }
                Err(error) => {
                    result = report_failure(env, &format!("alias: {error}")).await;
                }
            },
            (name, None) => match env.aliases.get(name).map(|entry| Rc::clone(&entry.0)) {
                Some(alias) => {
                    let line = reusable(&alias.name, &alias.replacement);
                    let printed = output(env, &line).await;
                    if !printed.exit_status().is_successful() {
                        result = printed;
                    }
                }
                None => {
                    result = report_failure(env, &format!("alias: {name}: not found")).await;
                }
            },
        }
    }
    result
}

/// Wrapper of [`main`] for the built-in table
pub fn builtin_main(
    env: &mut Env,
    args: Vec<String>,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = ivish_env::builtin::Result> + '_>> {
    Box::pin(main(env, args))
}
