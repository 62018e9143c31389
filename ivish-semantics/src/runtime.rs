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

//! The interactive read-eval loop.
//!
//! Each round: prompt and read a line, expand aliases, tokenize,
//! validate, dispatch, remember the line. `^C` drops the line and
//! prompts again; `^D` at an empty prompt ends the loop with the last
//! exit status; the `exit` built-in ends it through a divert value.
//!
//! The loop also wires the editor's decorations: the subline previews
//! what alias expansion will do to the current line, and the inline
//! hint suggests the most recent matching history entry.

use crate::dispatch;
use crate::expansion;
use crate::validate::validate;
use ivish_editor::editor::{LineEditor, ReadEvent};
use ivish_env::Env;
use ivish_env::io::{self, Fd};
use ivish_env::semantics::{Divert, ExitStatus};
use ivish_syntax::lex::tokenize;
use std::ops::ControlFlow::{Break, Continue};
use std::rc::Rc;
use tracing::{debug, error};

/// Consecutive terminal failures tolerated before the loop gives up
const MAX_TERMINAL_FAILURES: u32 = 3;

/// Runs the interactive loop until `exit`, `^D`, or a persistent
/// terminal failure. Returns the final exit status.
pub async fn read_eval_loop(env: &mut Env, editor: &mut LineEditor) -> ExitStatus {
    let mut failures = 0;
    loop {
        refresh_decorations(env, editor);
        env.error_to_stdout = editor.has_kept_line();

        let event = match editor.read_line(&mut env.history).await {
            Ok(event) => event,
            Err(errno) => {
                failures += 1;
                error!(%errno, "terminal I/O failed");
                env.system
                    .print_error(&format!("ivish: terminal failure: {errno}\n"))
                    .await;
                if failures >= MAX_TERMINAL_FAILURES {
                    break;
                }
                continue;
            }
        };
        failures = 0;

        match event {
            ReadEvent::Eof => break,
            ReadEvent::Interrupt => {}
            ReadEvent::Completion(completion) => {
                let mut listing = completion.candidates.join("  ");
                listing += "\r\n";
                _ = env.system.write_all(Fd::STDOUT, listing.as_bytes()).await;
            }
            ReadEvent::Line(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                env.history.add(line.clone());
                if let Break(Divert::Exit(status)) = eval_line(env, &line).await {
                    if let Some(status) = status {
                        env.exit_status = status;
                    }
                    break;
                }
            }
        }
    }
    env.error_to_stdout = false;
    env.exit_status
}

/// Evaluates one cooked input line: alias expansion, tokenization,
/// validation, dispatch.
pub async fn eval_line(env: &mut Env, line: &str) -> ivish_env::semantics::Result {
    let expanded = expansion::translate(&env.aliases, line);
    if let Some(expanded) = &expanded {
        debug!(from = %line, to = %expanded, "alias expansion");
    }
    let line = expanded.as_deref().unwrap_or(line);

    let result = tokenize(line);
    if let Err(error) = validate(&result) {
        io::print_error(env, &error.to_string()).await;
        env.exit_status = ExitStatus::FAILURE;
        return Continue(());
    }
    dispatch::dispatch(env, &result).await
}

/// Reinstalls the editor callbacks that depend on current shell state.
///
/// The alias set and the history are snapshotted each round; both are
/// small and the callbacks must not borrow the environment across the
/// read.
fn refresh_decorations(env: &Env, editor: &mut LineEditor) {
    let aliases = Rc::clone(&env.aliases);
    editor.set_subline(Box::new(move |text| {
        expansion::translate(&aliases, text).map(|translated| format!("-> {translated}"))
    }));

    let items: Vec<String> = env.history.items().to_vec();
    editor.set_hint(Box::new(move |text| {
        if text.is_empty() {
            return None;
        }
        items
            .iter()
            .rev()
            .find_map(|item| item.strip_prefix(text))
            .filter(|suffix| !suffix.is_empty())
            .map(str::to_owned)
    }));
}
