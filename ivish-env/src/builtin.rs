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

//! Type definitions for built-in utilities
//!
//! This module provides the data types for defining built-ins. The
//! implementations of the individual built-ins live in the
//! `ivish-builtin` crate.

use crate::Env;
use crate::semantics::Divert;
use crate::semantics::ExitStatus;
use std::future::Future;
use std::ops::ControlFlow::Continue;
use std::pin::Pin;

/// Result of built-in utility execution
///
/// The result contains an exit status and an optional divert value that
/// may affect the shell loop after the built-in returns.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[must_use]
pub struct Result {
    exit_status: ExitStatus,
    divert: crate::semantics::Result,
}

impl Result {
    /// Creates a new result with the given exit status.
    pub const fn new(exit_status: ExitStatus) -> Self {
        Self {
            exit_status,
            divert: Continue(()),
        }
    }

    /// Creates a new result with the given exit status and divert value.
    pub const fn with_exit_status_and_divert(
        exit_status: ExitStatus,
        divert: crate::semantics::Result,
    ) -> Self {
        Self {
            exit_status,
            divert,
        }
    }

    /// Returns the exit status.
    #[must_use]
    pub const fn exit_status(&self) -> ExitStatus {
        self.exit_status
    }

    /// Returns the divert value.
    #[must_use]
    pub const fn divert(&self) -> crate::semantics::Result {
        self.divert
    }

    /// Returns the exit status the shell should eventually exit with.
    ///
    /// This is the exit status carried in a `Divert::Exit`, or the
    /// built-in's own exit status.
    #[must_use]
    pub fn effective_exit_status(&self) -> ExitStatus {
        match self.divert {
            std::ops::ControlFlow::Break(Divert::Exit(Some(exit_status))) => exit_status,
            _ => self.exit_status,
        }
    }
}

/// The default result has a successful exit status and no divert value.
impl Default for Result {
    fn default() -> Self {
        Self::new(ExitStatus::SUCCESS)
    }
}

/// Type of functions that implement built-ins
///
/// The function returns a boxed future because built-ins are async and
/// the table of built-ins needs a uniform function type.
pub type Main =
    for<'a> fn(&'a mut Env, Vec<String>) -> Pin<Box<dyn Future<Output = Result> + 'a>>;

/// Entry of the built-in table
#[derive(Clone, Copy, Debug)]
pub struct Builtin {
    /// Function that implements the built-in
    pub execute: Main,
    /// One-line summary printed by the `help` built-in
    pub description: &'static str,
}
