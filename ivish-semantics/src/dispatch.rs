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

//! Pipeline and sequence dispatch.
//!
//! A validated line is split on `;` into commands and on `|`/`|&` into
//! pipeline stages. Built-ins run inside the shell when they stand
//! alone; inside a pipeline every stage must be a single entity the
//! host can run on a worker thread, so stages whose head is a built-in,
//! an unknown command, or the shell itself are wrapped in an `ivish …`
//! subshell invocation. A parenthesised group with a single trailing
//! `>`/`<` redirection has its stream reassigned for that invocation
//! only.
//!
//! Exit codes thread through [`Env::exit_status`]: 127 for unknown
//! commands, otherwise whatever the command returns.

use crate::ShellError;
use ivish_env::Env;
use ivish_env::host::Invocation;
use ivish_env::io::{self, Fd};
use ivish_env::job::CommandInfo;
use ivish_env::semantics::ExitStatus;
use ivish_syntax::lex::{TokenizeResult, tokenize};
use std::ops::ControlFlow::Continue;
use std::rc::Rc;
use tracing::debug;

/// Name under which the shell dispatches itself for subshells
pub const SHELL_NAME: &str = "ivish";

/// One pipeline stage: its text and its head token, if any.
type Stage = (String, Option<String>);

/// Executes a validated tokenized line.
///
/// The returned flow breaks when a built-in diverted (the `exit`
/// built-in); commands after the diverting one do not run.
pub async fn dispatch(env: &mut Env, result: &TokenizeResult) -> ivish_env::semantics::Result {
    let line = &result.line;
    let mut start = 0;
    let mut covered = 0;
    let mut stages: Vec<Stage> = Vec::new();
    let mut ops: Vec<&'static str> = Vec::new();

    for index in 0..=result.delimiters.len() {
        let delimiter = result.delimiters.get(index);
        let end_position = delimiter.map_or(line.len(), |d| d.position);
        let token_upper = delimiter.map_or(result.tokens.len(), |d| d.token_range.end);

        let text = line[start..end_position].trim().to_owned();
        let head = result.tokens[covered..token_upper]
            .first()
            .map(|token| token.content.clone());
        covered = token_upper;
        if let Some(delimiter) = delimiter {
            start = delimiter.end();
        }

        stages.push((text, head));
        match delimiter.map(|d| d.kind) {
            Some(kind) if kind.is_pipe() => ops.push(kind.literal()),
            _ => {
                let command = std::mem::take(&mut stages);
                let command_ops = std::mem::take(&mut ops);
                run_command(env, command, command_ops).await?;
            }
        }
    }
    Continue(())
}

async fn run_command(
    env: &mut Env,
    stages: Vec<Stage>,
    ops: Vec<&'static str>,
) -> ivish_env::semantics::Result {
    if let [(text, head)] = stages.as_slice() {
        if text.is_empty() {
            return Continue(());
        }
        let Some(head) = head else {
            return Continue(());
        };

        if let Some(group) = parse_group(text) {
            return run_group(env, &group).await;
        }

        if let Some(&builtin) = env.builtins.get(head.as_str()) {
            let args = tokenize(text)
                .tokens
                .into_iter()
                .skip(1)
                .map(|token| token.content)
                .collect();
            let result = (builtin.execute)(env, args).await;
            env.exit_status = result.exit_status();
            return result.divert();
        }

        if !env.is_known_command(head) {
            let message = format!("{head}: command not found");
            io::print_error(env, &message).await;
            env.exit_status = ExitStatus::NOT_FOUND;
            return Continue(());
        }

        let status =
            run_external(env, text.clone(), head.clone(), Fd::STDIN, Fd::STDOUT).await;
        env.exit_status = status;
        return Continue(());
    }

    // A pipeline: every stage must be host-dispatchable on its own.
    let mut assembled = String::new();
    for (index, (text, head)) in stages.iter().enumerate() {
        if index > 0 {
            assembled.push(' ');
            assembled += ops[index - 1];
            assembled.push(' ');
        }
        let needs_subshell = match head {
            Some(head) => {
                env.builtins.contains_key(head.as_str())
                    || head.as_str() == SHELL_NAME
                    || !env.runner.contains(head)
            }
            None => true,
        };
        if needs_subshell {
            assembled += SHELL_NAME;
            assembled.push(' ');
        }
        assembled += text;
    }

    let head = tokenize(&assembled)
        .tokens
        .first()
        .map(|token| token.content.clone())
        .unwrap_or_default();
    let status = run_external(env, assembled, head, Fd::STDIN, Fd::STDOUT).await;
    env.exit_status = status;
    Continue(())
}

/// A parenthesised command group with an optional trailing redirection.
#[derive(Clone, Debug, Eq, PartialEq)]
struct Group<'a> {
    inner: &'a str,
    /// `('>', path)` or `('<', path)`
    redirect: Option<(char, &'a str)>,
}

/// Recognizes `( commands ) [> path | < path]`.
///
/// Only a single trailing redirection is understood; anything else
/// after the closing parenthesis makes the text an ordinary command.
fn parse_group(text: &str) -> Option<Group<'_>> {
    let rest = text.strip_prefix('(')?;
    let close = rest.rfind(')')?;
    let inner = rest[..close].trim();
    let tail = rest[close + 1..].trim();

    let redirect = if tail.is_empty() {
        None
    } else {
        let direction = tail.chars().next()?;
        if direction != '>' && direction != '<' {
            return None;
        }
        let path = tail[1..].trim();
        if path.is_empty() {
            return None;
        }
        Some((direction, path))
    };
    Some(Group { inner, redirect })
}

async fn run_group(env: &mut Env, group: &Group<'_>) -> ivish_env::semantics::Result {
    let mut stdin = Fd::STDIN;
    let mut stdout = Fd::STDOUT;
    let mut opened = None;

    if let Some((direction, path)) = group.redirect {
        let open_result = if direction == '>' {
            env.system.open_write(path)
        } else {
            env.system.open_read(path)
        };
        match open_result {
            Ok(fd) => {
                if direction == '>' {
                    stdout = fd;
                } else {
                    stdin = fd;
                }
                opened = Some(fd);
            }
            Err(errno) => {
                let error = ShellError(format!("{path}: {errno}"));
                io::print_error(env, &error.to_string()).await;
                env.exit_status = ExitStatus::FAILURE;
                return Continue(());
            }
        }
    }

    let command_line = format!("{SHELL_NAME} {}", group.inner);
    let status = run_external(env, command_line, SHELL_NAME.to_owned(), stdin, stdout).await;
    if let Some(fd) = opened {
        _ = env.system.close(fd);
    }
    env.exit_status = status;
    Continue(())
}

/// Hands one host-dispatchable command line to the runner and waits.
///
/// Sets up the terminal mode, the streams and the window geometry,
/// records the foreground command for interrupt routing, and tears the
/// record down when the command returns.
async fn run_external(
    env: &mut Env,
    command_line: String,
    head: String,
    stdin: Fd,
    stdout: Fd,
) -> ExitStatus {
    let session = env.next_session_id();
    let term_mode = env.command_db.term_mode(&head);
    env.tty.set(term_mode);

    let invocation = Invocation {
        command_line: command_line.clone(),
        session,
        stdin,
        stdout,
        stderr: Fd::STDERR,
        term_mode,
        tty: env.tty.clone(),
        window_size: window_size(),
    };
    debug!(command = %command_line, %session, ?term_mode, "launching command");

    let handle = env.runner.spawn(invocation);
    env.foreground = Some(CommandInfo::new(command_line, session, Rc::clone(&handle)));
    let status = handle.wait().await;
    env.foreground = None;
    env.tty.reset();
    debug!(%status, "command finished");
    status
}

/// Terminal geometry from `COLUMNS` and `LINES`, re-read on every
/// command launch.
#[must_use]
pub fn window_size() -> (u16, u16) {
    fn read(name: &str, fallback: u16) -> u16 {
        std::env::var(name)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(fallback)
    }
    (read("COLUMNS", 80), read("LINES", 24))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt as _;
    use ivish_env::VirtualSystem;
    use ivish_env::host::{CommandRunner, Finished, RunningCommand};
    use ivish_env::semantics::Divert;
    use ivish_env::system::r#virtual::{SystemState, assert_stderr};
    use ivish_env::terminal::TermMode;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::ops::ControlFlow::Break;

    #[derive(Debug, Default)]
    struct MockRunner {
        known: Vec<&'static str>,
        invocations: Rc<RefCell<Vec<Invocation>>>,
        statuses: RefCell<VecDeque<ExitStatus>>,
    }

    impl CommandRunner for MockRunner {
        fn contains(&self, name: &str) -> bool {
            self.known.contains(&name)
        }

        fn spawn(&mut self, invocation: Invocation) -> Rc<dyn RunningCommand> {
            self.invocations.borrow_mut().push(invocation);
            let status = self
                .statuses
                .borrow_mut()
                .pop_front()
                .unwrap_or(ExitStatus::SUCCESS);
            Rc::new(Finished(status))
        }
    }

    struct Fixture {
        env: Env,
        state: Rc<RefCell<SystemState>>,
        invocations: Rc<RefCell<Vec<Invocation>>>,
    }

    fn fixture(known: Vec<&'static str>, statuses: Vec<ExitStatus>) -> Fixture {
        let system = Box::new(VirtualSystem::new());
        let state = Rc::clone(&system.state);
        let mut env = Env::with_system(system);
        let invocations = Rc::new(RefCell::new(Vec::new()));
        env.runner = Box::new(MockRunner {
            known,
            invocations: Rc::clone(&invocations),
            statuses: RefCell::new(statuses.into()),
        });
        env.builtins.extend(ivish_builtin::BUILTINS);
        Fixture {
            env,
            state,
            invocations,
        }
    }

    fn dispatch_line(env: &mut Env, line: &str) -> ivish_env::semantics::Result {
        dispatch(env, &tokenize(line)).now_or_never().unwrap()
    }

    #[test]
    fn known_command_is_handed_to_the_runner() {
        let mut f = fixture(vec!["echo"], vec![]);
        let flow = dispatch_line(&mut f.env, "echo done");
        assert_eq!(flow, Continue(()));
        assert_eq!(f.env.exit_status, ExitStatus::SUCCESS);

        let invocations = f.invocations.borrow();
        assert_eq!(invocations.len(), 1);
        assert_eq!(invocations[0].command_line, "echo done");
        assert_eq!(invocations[0].stdin, Fd::STDIN);
        assert_eq!(invocations[0].stdout, Fd::STDOUT);
    }

    #[test]
    fn unknown_command_reports_not_found() {
        let mut f = fixture(vec![], vec![]);
        dispatch_line(&mut f.env, "nosuch arg");
        assert_eq!(f.env.exit_status, ExitStatus::NOT_FOUND);
        assert!(f.invocations.borrow().is_empty());
        assert_stderr(&f.state, |stderr| {
            assert!(
                stderr.contains("nosuch: command not found"),
                "stderr = {stderr:?}"
            );
        });
    }

    #[test]
    fn sequence_keeps_the_last_exit_code() {
        let mut f = fixture(vec!["a", "b"], vec![ExitStatus(1), ExitStatus(2)]);
        dispatch_line(&mut f.env, "a ; b");
        assert_eq!(f.env.exit_status, ExitStatus(2));
        assert_eq!(f.invocations.borrow().len(), 2);
    }

    #[test]
    fn trailing_separator_is_accepted() {
        let mut f = fixture(vec!["a"], vec![]);
        dispatch_line(&mut f.env, "a ;");
        assert_eq!(f.invocations.borrow().len(), 1);
    }

    #[test]
    fn builtin_runs_inside_the_shell() {
        let mut f = fixture(vec![], vec![]);
        dispatch_line(&mut f.env, "alias greet=echo hi");
        assert!(f.env.aliases.get("greet").is_some());
        assert!(f.invocations.borrow().is_empty());
    }

    #[test]
    fn exit_builtin_diverts_and_skips_the_rest() {
        let mut f = fixture(vec!["never"], vec![]);
        let flow = dispatch_line(&mut f.env, "exit 3 ; never");
        assert_eq!(flow, Break(Divert::Exit(Some(ExitStatus(3)))));
        assert!(f.invocations.borrow().is_empty());
    }

    #[test]
    fn pipeline_of_host_commands_passes_through() {
        let mut f = fixture(vec!["make", "tee"], vec![]);
        dispatch_line(&mut f.env, "make |& tee log");
        let invocations = f.invocations.borrow();
        assert_eq!(invocations.len(), 1);
        assert_eq!(invocations[0].command_line, "make |& tee log");
    }

    #[test]
    fn builtin_stage_in_a_pipeline_is_wrapped() {
        let mut f = fixture(vec!["grep"], vec![]);
        dispatch_line(&mut f.env, "history | grep ls");
        let invocations = f.invocations.borrow();
        assert_eq!(invocations[0].command_line, "ivish history | grep ls");
    }

    #[test]
    fn unknown_stage_in_a_pipeline_is_wrapped() {
        let mut f = fixture(vec!["sort"], vec![]);
        dispatch_line(&mut f.env, "mystery | sort");
        let invocations = f.invocations.borrow();
        assert_eq!(invocations[0].command_line, "ivish mystery | sort");
    }

    #[test]
    fn shell_stage_in_a_pipeline_is_wrapped() {
        let mut f = fixture(vec!["ivish", "wc"], vec![]);
        dispatch_line(&mut f.env, "ivish history | wc");
        let invocations = f.invocations.borrow();
        assert_eq!(invocations[0].command_line, "ivish ivish history | wc");
    }

    #[test]
    fn group_with_output_redirection() {
        let mut f = fixture(vec!["echo"], vec![]);
        dispatch_line(&mut f.env, "( echo hi ) > out.txt");

        let invocations = f.invocations.borrow();
        assert_eq!(invocations.len(), 1);
        assert_eq!(invocations[0].command_line, "ivish echo hi");
        assert_ne!(invocations[0].stdout, Fd::STDOUT);
        assert!(f.state.borrow().files.contains_key("out.txt"));
    }

    #[test]
    fn group_with_input_redirection() {
        let mut f = fixture(vec!["wc"], vec![]);
        f.state
            .borrow_mut()
            .files
            .insert("in.txt".to_owned(), b"data".to_vec());
        dispatch_line(&mut f.env, "(wc -l) < in.txt");

        let invocations = f.invocations.borrow();
        assert_eq!(invocations[0].command_line, "ivish wc -l");
        assert_ne!(invocations[0].stdin, Fd::STDIN);
        assert_eq!(invocations[0].stdout, Fd::STDOUT);
    }

    #[test]
    fn missing_redirection_source_fails_without_dispatch() {
        let mut f = fixture(vec!["wc"], vec![]);
        dispatch_line(&mut f.env, "(wc) < absent.txt");
        assert_eq!(f.env.exit_status, ExitStatus::FAILURE);
        assert!(f.invocations.borrow().is_empty());
        assert_stderr(&f.state, |stderr| {
            assert!(stderr.contains("absent.txt"), "stderr = {stderr:?}");
        });
    }

    #[test]
    fn term_mode_follows_the_database() {
        let mut f = fixture(vec!["less"], vec![]);
        f.env.command_db.define("less", "termmode", "raw");
        dispatch_line(&mut f.env, "less README");

        let invocations = f.invocations.borrow();
        assert_eq!(invocations[0].term_mode, TermMode::Raw);
        // The selector is back to line mode after the command returned.
        assert_eq!(f.env.tty.mode(), TermMode::Line);
    }

    #[test]
    fn foreground_record_is_removed_after_the_command() {
        let mut f = fixture(vec!["ls"], vec![]);
        dispatch_line(&mut f.env, "ls");
        assert!(f.env.foreground.is_none());
    }

    #[test]
    fn group_parser() {
        assert_eq!(
            parse_group("(a; b)"),
            Some(Group {
                inner: "a; b",
                redirect: None
            })
        );
        assert_eq!(
            parse_group("( ls ) > out"),
            Some(Group {
                inner: "ls",
                redirect: Some(('>', "out"))
            })
        );
        assert_eq!(
            parse_group("(cat)< in"),
            Some(Group {
                inner: "cat",
                redirect: Some(('<', "in"))
            })
        );
        assert_eq!(parse_group("ls"), None);
        assert_eq!(parse_group("(ls) what"), None);
        assert_eq!(parse_group("(ls) >"), None);
    }
}
