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

//! Interfaces to the embedding host.
//!
//! The host application owns the command registry and the worker threads
//! that execute commands; the shell only drives them. These traits are
//! the seam: [`CommandRunner`] launches a command line and hands back a
//! [`RunningCommand`] handle, and [`CompletionProvider`] answers the
//! completion queries the line editor cannot answer itself (available
//! command names, file names).

use crate::io::Fd;
use crate::semantics::ExitStatus;
use crate::terminal::TermMode;
use crate::terminal::TtyController;
use async_trait::async_trait;
use std::fmt::Debug;
use std::rc::Rc;

/// Identifier of the host session a command runs in.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

/// Everything a command needs to start.
///
/// The dispatcher assembles one of these per pipeline segment: the
/// command text, the standard streams (already redirected if the
/// command group had a trailing redirection), the terminal-mode handle,
/// and the window geometry from `COLUMNS`/`LINES`.
#[derive(Clone, Debug)]
pub struct Invocation {
    pub command_line: String,
    pub session: SessionId,
    pub stdin: Fd,
    pub stdout: Fd,
    pub stderr: Fd,
    pub term_mode: TermMode,
    /// Handle the command may use to temporarily change the terminal mode
    pub tty: TtyController,
    /// Terminal geometry as (columns, lines)
    pub window_size: (u16, u16),
}

/// Handle to a command executing on a host worker thread.
///
/// All methods take `&self`: implementations are expected to signal the
/// worker through channels or atomics rather than mutate the handle.
#[async_trait(?Send)]
pub trait RunningCommand: Debug {
    /// Waits for the command to return and yields its exit status.
    async fn wait(&self) -> ExitStatus;

    /// Sends SIGINT to the worker thread.
    fn kill(&self);

    /// Cancels the worker thread.
    fn cancel(&self);

    /// Writes bytes to the command's input.
    fn write_input(&self, bytes: &[u8]);

    /// Closes the command's input, signalling end of file.
    fn end_input(&self);
}

/// Executes command lines on behalf of the shell.
pub trait CommandRunner: Debug {
    /// Whether the host registry knows this command name.
    fn contains(&self, name: &str) -> bool;

    /// Starts executing a command line on a worker thread.
    fn spawn(&mut self, invocation: Invocation) -> Rc<dyn RunningCommand>;
}

/// Where on the line a completion was requested.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CompletionKind {
    /// The first word of a command segment
    Command,
    /// A word starting with `-`
    CommandOption,
    /// Any other word
    Path,
}

/// Supplies completion candidates from the host.
pub trait CompletionProvider: Debug {
    /// Returns the candidates matching a pattern, best matches first.
    fn candidates(&self, kind: CompletionKind, pattern: &str) -> Vec<String>;
}

/// Function that tells how many terminal cells a character occupies.
pub type CellWidthFn = Rc<dyn Fn(char) -> usize>;

/// Runner for an environment without a host.
///
/// Knows no commands; spawning reports "not found". This is the runner
/// of [`Env::new_virtual`](crate::Env::new_virtual).
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRunner;

impl CommandRunner for NullRunner {
    fn contains(&self, _name: &str) -> bool {
        false
    }

    fn spawn(&mut self, _invocation: Invocation) -> Rc<dyn RunningCommand> {
        Rc::new(Finished(ExitStatus::NOT_FOUND))
    }
}

/// Handle for a command that has already finished.
#[derive(Clone, Copy, Debug)]
pub struct Finished(pub ExitStatus);

#[async_trait(?Send)]
impl RunningCommand for Finished {
    async fn wait(&self) -> ExitStatus {
        self.0
    }

    fn kill(&self) {}
    fn cancel(&self) {}
    fn write_input(&self, _bytes: &[u8]) {}
    fn end_input(&self) {}
}
