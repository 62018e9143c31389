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

//! Terminal-mode selection.
//!
//! While a command runs, the shell either buffers keystrokes into lines
//! and forwards only completed lines ([`TermMode::Line`]) or forwards
//! every byte immediately ([`TermMode::Raw`]). The mode for a command
//! comes from its `termmode` database property; a running command can
//! temporarily request the other mode through the [`TtyController`]
//! handle it receives in its invocation and restore it by dropping the
//! returned [`TtyGuard`].

use std::cell::Cell;
use std::rc::Rc;
use strum::{Display, EnumString};

/// How the shell treats keystrokes for a running command.
#[derive(Clone, Copy, Debug, Default, Display, EnumString, Eq, Hash, PartialEq)]
#[strum(serialize_all = "lowercase")]
pub enum TermMode {
    /// The shell cooks input into whole lines
    #[default]
    Line,
    /// Every byte is passed through untouched
    Raw,
}

/// Shared holder of the current terminal mode.
///
/// Clones share one mode cell; the dispatcher keeps one clone and each
/// invocation carries another.
#[derive(Clone, Debug, Default)]
pub struct TtyController {
    mode: Rc<Cell<TermMode>>,
}

impl TtyController {
    #[must_use]
    pub fn new() -> TtyController {
        TtyController::default()
    }

    /// The mode currently in effect.
    #[must_use]
    pub fn mode(&self) -> TermMode {
        self.mode.get()
    }

    /// Selects the mode for a command about to be launched.
    pub fn set(&self, mode: TermMode) {
        self.mode.set(mode);
    }

    /// Restores the default mode after a command has returned.
    pub fn reset(&self) {
        self.mode.set(TermMode::default());
    }

    /// Temporarily switches to the given mode.
    ///
    /// The previous mode comes back when the returned guard is dropped.
    /// Used by commands that invoke a sub-tool with different input
    /// requirements.
    pub fn request(&self, mode: TermMode) -> TtyGuard {
        let previous = self.mode.replace(mode);
        TtyGuard {
            mode: Rc::clone(&self.mode),
            previous,
        }
    }
}

/// Restores the previous terminal mode on drop.
#[derive(Debug)]
#[must_use = "dropping the guard immediately restores the previous mode"]
pub struct TtyGuard {
    mode: Rc<Cell<TermMode>>,
    previous: TermMode,
}

impl Drop for TtyGuard {
    fn drop(&mut self) {
        self.mode.set(self.previous);
    }
}
