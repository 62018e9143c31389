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

//! Unalias built-in
//!
//! The **`unalias`** built-in removes alias definitions.
//!
//! # Synopsis
//!
//! ```sh
//! unalias name…
//! ```
//!
//! ```sh
//! unalias -a
//! ```
//!
//! # Description
//!
//! Each operand names an alias to remove. With the **`-a`** option all
//! alias definitions are removed.
//!
//! # Errors
//!
//! It is an error if an operand names a non-existent alias.
//!
//! # Exit status
//!
//! Zero unless an error occurs.

use crate::common::{report_error, report_failure};
use ivish_env::Env;
use std::rc::Rc;

/// Entry point for executing the `unalias` built-in
pub async fn main(env: &mut Env, args: Vec<String>) -> ivish_env::builtin::Result {
    if args.is_empty() {
        return report_error(env, "unalias: missing operand").await;
    }

    if args.iter().any(|arg| arg == "-a") {
        Rc::make_mut(&mut env.aliases).clear();
        return ivish_env::builtin::Result::default();
    }

    let mut result = ivish_env::builtin::Result::default();
    for name in &args {
        if Rc::make_mut(&mut env.aliases).remove(name.as_str()) {
            continue;
        }
        result = report_failure(env, &format!("unalias: {name}: not found")).await;
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

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt as _;
    use ivish_env::VirtualSystem;
    use ivish_env::semantics::ExitStatus;
    use ivish_env::system::r#virtual::assert_stderr;
    use ivish_syntax::alias::HashEntry;

    fn env_with_aliases(names: &[&str]) -> Env {
        let mut env = Env::new_virtual();
        let aliases = Rc::make_mut(&mut env.aliases);
        for name in names {
            aliases.insert(HashEntry::new(*name, "whatever"));
        }
        env
    }

    #[test]
    fn removes_named_aliases() {
        let mut env = env_with_aliases(&["ls", "grep", "cat"]);
        let args = vec!["ls".to_owned(), "cat".to_owned()];

        let result = main(&mut env, args).now_or_never().unwrap();
        assert_eq!(result.exit_status(), ExitStatus::SUCCESS);
        assert_eq!(env.aliases.len(), 1);
        assert!(env.aliases.get("grep").is_some());
    }

    #[test]
    fn removes_all_aliases() {
        let mut env = env_with_aliases(&["ls", "grep"]);
        let result = main(&mut env, vec!["-a".to_owned()]).now_or_never().unwrap();
        assert_eq!(result.exit_status(), ExitStatus::SUCCESS);
        assert!(env.aliases.is_empty());
    }

    #[test]
    fn missing_alias_is_reported() {
        let system = Box::new(VirtualSystem::new());
        let state = Rc::clone(&system.state);
        let mut env = Env::with_system(system);

        let result = main(&mut env, vec!["nope".to_owned()])
            .now_or_never()
            .unwrap();
        assert_eq!(result.exit_status(), ExitStatus::FAILURE);
        assert_stderr(&state, |stderr| {
            assert!(
                stderr.contains("unalias: nope: not found"),
                "stderr = {stderr:?}"
            );
        });
    }

    #[test]
    fn other_operands_are_still_removed_after_an_error() {
        let mut env = env_with_aliases(&["ls"]);
        let args = vec!["nope".to_owned(), "ls".to_owned()];

        let result = main(&mut env, args).now_or_never().unwrap();
        assert_eq!(result.exit_status(), ExitStatus::FAILURE);
        assert!(env.aliases.is_empty());
    }

    #[test]
    fn no_operands_is_an_error() {
        let mut env = Env::new_virtual();
        let result = main(&mut env, vec![]).now_or_never().unwrap();
        assert_eq!(result.exit_status(), ExitStatus::ERROR);
    }
}
