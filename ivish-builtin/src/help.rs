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

//! Help built-in
//!
//! The **`help`** built-in lists the built-in utilities with their
//! one-line descriptions. Host applications commonly hook this to also
//! open their own help surface.

use crate::common::output;
use itertools::Itertools as _;
use ivish_env::Env;

/// Entry point for executing the `help` built-in
pub async fn main(env: &mut Env, _args: Vec<String>) -> ivish_env::builtin::Result {
    let listing = env
        .builtins
        .iter()
        .sorted_by_key(|(name, _)| *name)
        .map(|(name, builtin)| format!("{name:<10} {}\n", builtin.description))
        .collect::<String>();
    output(env, &listing).await
}

/// Wrapper of [`main`] for the built-in table
pub fn builtin_main(
    env: &mut Env,
    args: Vec<String>,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = ivish_env::builtin::Result> + '_>> {
    Box::pin(main(env, args))
}
