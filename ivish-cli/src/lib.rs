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

//! Command-line frontend for the ivish shell.
//!
//! The entry point is [`main`], used by the `ivish` binary. With no
//! arguments it runs the interactive read-eval loop; with arguments,
//! the arguments joined by single spaces form a one-shot command line
//! whose exit status becomes the process exit status (this is the form
//! the dispatcher itself uses for subshell pipeline stages).
//!
//! An embedding host does not go through this crate's `main`: it builds
//! an [`Env`] around its own
//! [`CommandRunner`](ivish_env::host::CommandRunner) and drives
//! [`read_eval_loop`](ivish_semantics::runtime::read_eval_loop)
//! directly. The standalone binary has no host registry, so only the
//! built-in utilities resolve.

pub mod startup;

use self::startup::Startup;
use ivish_editor::editor::LineEditor;
use ivish_env::Env;
use ivish_env::host::{CellWidthFn, CompletionKind, CompletionProvider};
use ivish_env::semantics::{Divert, ExitStatus};
use ivish_env::system::SharedSystem;
use ivish_semantics::runtime;
use std::ops::ControlFlow::Break;
use std::rc::Rc;
use unicode_width::UnicodeWidthChar as _;

/// The default cell-width function, backed by Unicode width tables.
///
/// Hosts with their own text metrics inject a different one.
#[must_use]
pub fn default_cell_width() -> CellWidthFn {
    Rc::new(|c| c.width().unwrap_or(0))
}

/// Completes command names from the built-in table.
///
/// The standalone shell has no host completion; built-in names are all
/// it can offer.
#[derive(Clone, Copy, Debug, Default)]
struct BuiltinCompleter;

impl CompletionProvider for BuiltinCompleter {
    fn candidates(&self, kind: CompletionKind, pattern: &str) -> Vec<String> {
        match kind {
            CompletionKind::Command => ivish_builtin::BUILTINS
                .iter()
                .map(|(name, _)| *name)
                .filter(|name| name.starts_with(pattern))
                .map(str::to_owned)
                .collect(),
            CompletionKind::CommandOption | CompletionKind::Path => Vec::new(),
        }
    }
}

/// Evaluates a one-shot command line and returns the final exit status.
pub async fn run_one_shot(env: &mut Env, line: &str) -> ExitStatus {
    if let Break(Divert::Exit(Some(status))) = runtime::eval_line(env, line).await {
        env.exit_status = status;
    }
    env.exit_status
}

/// Entry point of the `ivish` binary.
pub fn main() -> ExitStatus {
    let startup = Startup::from_env();
    let _log_guard = startup::init_logging(&startup);

    // SAFETY: this is the only RealSystem created in the process.
    let system = unsafe { ivish_env::RealSystem::new() };
    let shared = SharedSystem::new(Box::new(system));

    let mut env = Env::new(shared.clone(), Box::new(ivish_env::host::NullRunner));
    env.builtins.extend(ivish_builtin::BUILTINS);
    startup.configure(&mut env);
    tracing::debug!(?startup, "configured");

    let arguments: Vec<String> = std::env::args().skip(1).collect();
    let mut pool = futures_executor::LocalPool::new();

    let exit_status = if arguments.is_empty() {
        let mut editor = LineEditor::new(shared, default_cell_width());
        editor.set_hint_colors(startup.hint_colors);
        editor.set_completion(Rc::new(BuiltinCompleter));
        pool.run_until(runtime::read_eval_loop(&mut env, &mut editor))
    } else {
        let line = arguments.join(" ");
        pool.run_until(run_one_shot(&mut env, &line))
    };

    startup.save_history(&env);
    exit_status
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt as _;

    fn env_with_builtins() -> Env {
        let mut env = Env::new_virtual();
        env.builtins.extend(ivish_builtin::BUILTINS);
        env
    }

    #[test]
    fn one_shot_exit_status() {
        let mut env = env_with_builtins();
        let status = run_one_shot(&mut env, "exit 9").now_or_never().unwrap();
        assert_eq!(status, ExitStatus(9));
    }

    #[test]
    fn one_shot_unknown_command() {
        let mut env = env_with_builtins();
        let status = run_one_shot(&mut env, "nosuch").now_or_never().unwrap();
        assert_eq!(status, ExitStatus::NOT_FOUND);
    }

    #[test]
    fn one_shot_sequence_keeps_last_status() {
        let mut env = env_with_builtins();
        let status = run_one_shot(&mut env, "history ; history")
            .now_or_never()
            .unwrap();
        assert_eq!(status, ExitStatus::SUCCESS);
    }

    #[test]
    fn builtin_completer_offers_builtin_names() {
        let candidates = BuiltinCompleter.candidates(CompletionKind::Command, "h");
        assert_eq!(candidates, ["help", "history"]);
        assert_eq!(
            BuiltinCompleter.candidates(CompletionKind::Path, "h"),
            Vec::<String>::new()
        );
    }

    #[test]
    fn default_cell_width_values() {
        let width = default_cell_width();
        assert_eq!((*width)('a'), 1);
        assert_eq!((*width)('語'), 2);
        assert_eq!((*width)('\u{0}'), 0);
    }
}
