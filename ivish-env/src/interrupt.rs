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

//! Interrupt dispatch.
//!
//! `^C` while a command runs does not simply kill it: each command
//! configures its interrupt semantics through the `intaction` database
//! property. [`deliver`] looks the action up and applies it to the
//! foreground command.

use crate::Env;
use crate::command_db::IntAction;
use std::rc::Rc;
use tracing::debug;

/// Interrupt handler installed by the host.
///
/// On a POSIX host this corresponds to the process's SIGINT handler; on
/// other hosts it is whatever cancellation hook the host provides.
#[derive(Clone)]
pub struct InterruptHandler(Rc<dyn Fn()>);

impl InterruptHandler {
    pub fn new<F: Fn() + 'static>(handler: F) -> InterruptHandler {
        InterruptHandler(Rc::new(handler))
    }

    pub fn run(&self) {
        (self.0)()
    }
}

impl std::fmt::Debug for InterruptHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("InterruptHandler")
    }
}

/// Applies the configured interrupt semantics to the foreground command.
///
/// Looks up the `intaction` property of the running command:
///
/// - `thread_kill` sends SIGINT to the worker thread.
/// - `thread_cancel` cancels the worker thread.
/// - `end_of_file` closes the command's input.
/// - `handler_func` runs the shell's installed interrupt handler;
///   `handler_func_nl` additionally writes a newline to the command's
///   input afterwards.
///
/// When the action is absent or unrecognized, the installed handler
/// runs if there is one, and the worker thread is cancelled otherwise.
///
/// Does nothing when no command is in the foreground; `^C` at the
/// prompt is the line editor's business.
pub fn deliver(env: &Env) {
    let Some(info) = &env.foreground else { return };
    let name = info.name();
    let action = env.command_db.int_action(&name);
    debug!(command = %name, ?action, "delivering interrupt");

    match action {
        Some(IntAction::ThreadKill) => info.handle.kill(),
        Some(IntAction::ThreadCancel) => info.handle.cancel(),
        Some(IntAction::EndOfFile) => info.handle.end_input(),
        Some(IntAction::HandlerFunc) => run_handler(env),
        Some(IntAction::HandlerFuncNl) => {
            run_handler(env);
            info.handle.write_input(b"\n");
        }
        None => match &env.interrupt_handler {
            Some(handler) => handler.run(),
            None => info.handle.cancel(),
        },
    }
}

fn run_handler(env: &Env) {
    if let Some(handler) = &env.interrupt_handler {
        handler.run();
    }
}
