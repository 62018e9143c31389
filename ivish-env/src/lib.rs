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

//! The shell execution environment.
//!
//! [`Env`] aggregates everything the shell shares between its parts:
//! the alias set, the history, the command property database, the
//! built-in table, the foreground command record, and the system the
//! host handed over. The dispatcher, the built-ins and the line editor
//! all receive an `Env` (or a [`SharedSystem`] cloned from it) instead
//! of talking to globals.

pub mod builtin;
pub mod command_db;
pub mod history;
pub mod host;
pub mod interrupt;
pub mod io;
pub mod job;
pub mod semantics;
pub mod system;
pub mod terminal;

use self::builtin::Builtin;
use self::command_db::CommandDb;
use self::history::History;
use self::host::CommandRunner;
use self::host::NullRunner;
use self::host::SessionId;
use self::interrupt::InterruptHandler;
use self::job::CommandInfo;
use self::semantics::ExitStatus;
use self::terminal::TtyController;
use ivish_syntax::alias::AliasSet;
use std::collections::HashMap;
use std::rc::Rc;

#[cfg(unix)]
#[doc(no_inline)]
pub use self::system::real::RealSystem;
#[doc(no_inline)]
pub use self::system::r#virtual::VirtualSystem;
pub use self::system::{SharedSystem, System};

/// Whole shell execution environment.
#[derive(Debug)]
pub struct Env {
    /// Aliases defined in the environment
    ///
    /// The `AliasSet` is reference-counted so the expansion engine can
    /// hold it while a built-in redefines aliases.
    pub aliases: Rc<AliasSet>,

    /// Built-in utilities available in the environment
    pub builtins: HashMap<&'static str, Builtin>,

    /// Command-line history
    pub history: History,

    /// Command property database
    pub command_db: CommandDb,

    /// Exit status of the last executed command
    pub exit_status: ExitStatus,

    /// Interface to the terminal
    pub system: SharedSystem,

    /// Host bridge that executes commands
    pub runner: Box<dyn CommandRunner>,

    /// Interrupt handler installed by the host, if any
    pub interrupt_handler: Option<InterruptHandler>,

    /// Record of the currently running foreground command
    pub foreground: Option<CommandInfo>,

    /// Terminal-mode selector shared with running commands
    pub tty: TtyController,

    /// Routes error banners to the standard output while completion
    /// candidates are on screen
    pub error_to_stdout: bool,

    next_session: u64,
}

impl Env {
    /// Creates a new environment on the given system and runner.
    pub fn new(system: SharedSystem, runner: Box<dyn CommandRunner>) -> Env {
        Env {
            aliases: Rc::new(AliasSet::new()),
            builtins: HashMap::new(),
            history: History::new(),
            command_db: CommandDb::default(),
            exit_status: ExitStatus::SUCCESS,
            system,
            runner,
            interrupt_handler: None,
            foreground: None,
            tty: TtyController::new(),
            error_to_stdout: false,
            next_session: 0,
        }
    }

    /// Creates a new environment on the given system, without a host.
    pub fn with_system(system: Box<dyn System>) -> Env {
        Env::new(SharedSystem::new(system), Box::new(NullRunner))
    }

    /// Creates a new environment with a virtual system, for testing.
    #[must_use]
    pub fn new_virtual() -> Env {
        Env::with_system(Box::new(VirtualSystem::new()))
    }

    /// Allocates an identifier for the next command session.
    pub fn next_session_id(&mut self) -> SessionId {
        self.next_session += 1;
        SessionId(self.next_session)
    }

    /// Whether a command name resolves to something runnable: a
    /// built-in, a host-registered command, or an alias.
    #[must_use]
    pub fn is_known_command(&self, name: &str) -> bool {
        self.builtins.contains_key(name)
            || self.aliases.get(name).is_some()
            || self.runner.contains(name)
    }
}
