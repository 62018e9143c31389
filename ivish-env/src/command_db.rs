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

//! Command property database.
//!
//! The database is a read-only table of per-command properties loaded at
//! startup from the TOML file named by the `IVISH_CMD_DB` environment
//! variable:
//!
//! ```toml
//! [less]
//! intaction = "end_of_file"
//! termmode = "raw"
//! ```
//!
//! Only `intaction` and `termmode` are interpreted by the shell, but the
//! property set is extensible: unknown keys are retained and can be
//! queried with [`CommandDb::property`].

use crate::terminal::TermMode;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr as _;
use strum::{Display, EnumString};
use thiserror::Error;

/// Property naming the interrupt action of a command
pub const INT_ACTION: &str = "intaction";
/// Property naming the terminal mode of a command
pub const TERM_MODE: &str = "termmode";

/// What `^C` does to a running command.
#[derive(Clone, Copy, Debug, Display, EnumString, Eq, Hash, PartialEq)]
#[strum(serialize_all = "snake_case")]
pub enum IntAction {
    /// Send SIGINT to the worker thread
    ThreadKill,
    /// Cancel the worker thread
    ThreadCancel,
    /// Close the command's input
    EndOfFile,
    /// Run the shell's installed interrupt handler
    HandlerFunc,
    /// Run the handler, then write a newline to the command's input
    HandlerFuncNl,
}

/// Error from [`CommandDb::load`].
///
/// A load error is non-fatal: the shell runs with an empty database.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Read(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] toml::de::Error),
}

/// Read-only property table keyed by command name.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CommandDb {
    entries: HashMap<String, HashMap<String, String>>,
}

impl CommandDb {
    /// Loads the database from a TOML file.
    pub fn load(path: &Path) -> Result<CommandDb, LoadError> {
        let text = std::fs::read_to_string(path)?;
        let entries = toml::from_str(&text)?;
        Ok(CommandDb { entries })
    }

    /// Adds a property. Used by tests and embedding hosts that define
    /// properties programmatically.
    pub fn define<C, P, V>(&mut self, command: C, property: P, value: V)
    where
        C: Into<String>,
        P: Into<String>,
        V: Into<String>,
    {
        self.entries
            .entry(command.into())
            .or_default()
            .insert(property.into(), value.into());
    }

    /// Looks up a property of a command.
    #[must_use]
    pub fn property(&self, command: &str, property: &str) -> Option<&str> {
        self.entries.get(command)?.get(property).map(String::as_str)
    }

    /// The interrupt action of a command.
    ///
    /// Absent and unrecognized values are both `None`; the interrupt
    /// dispatcher falls back accordingly.
    #[must_use]
    pub fn int_action(&self, command: &str) -> Option<IntAction> {
        IntAction::from_str(self.property(command, INT_ACTION)?).ok()
    }

    /// The terminal mode of a command, defaulting to line mode.
    #[must_use]
    pub fn term_mode(&self, command: &str) -> TermMode {
        self.property(command, TERM_MODE)
            .and_then(|value| TermMode::from_str(value).ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write as _;

    #[test]
    fn empty_database() {
        let db = CommandDb::default();
        assert_eq!(db.property("less", INT_ACTION), None);
        assert_eq!(db.int_action("less"), None);
        assert_eq!(db.term_mode("less"), TermMode::Line);
    }

    #[test]
    fn defined_properties() {
        let mut db = CommandDb::default();
        db.define("less", INT_ACTION, "end_of_file");
        db.define("less", TERM_MODE, "raw");
        db.define("vim", INT_ACTION, "handler_func_nl");

        assert_eq!(db.int_action("less"), Some(IntAction::EndOfFile));
        assert_eq!(db.term_mode("less"), TermMode::Raw);
        assert_eq!(db.int_action("vim"), Some(IntAction::HandlerFuncNl));
        assert_eq!(db.term_mode("vim"), TermMode::Line);
    }

    #[test]
    fn unknown_values_fall_back() {
        let mut db = CommandDb::default();
        db.define("x", INT_ACTION, "explode");
        db.define("x", TERM_MODE, "cooked");
        assert_eq!(db.int_action("x"), None);
        assert_eq!(db.term_mode("x"), TermMode::Line);
    }

    #[test]
    fn extra_properties_are_retained() {
        let mut db = CommandDb::default();
        db.define("git", "subcommands", "commit log push");
        assert_eq!(db.property("git", "subcommands"), Some("commit log push"));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[less]\nintaction = \"end_of_file\"\ntermmode = \"raw\"\n\n\
             [top]\nintaction = \"thread_kill\"\n"
        )
        .unwrap();

        let db = CommandDb::load(file.path()).unwrap();
        assert_eq!(db.int_action("less"), Some(IntAction::EndOfFile));
        assert_eq!(db.term_mode("less"), TermMode::Raw);
        assert_eq!(db.int_action("top"), Some(IntAction::ThreadKill));
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = CommandDb::load(&dir.path().join("absent.toml"));
        assert_matches!(result, Err(LoadError::Read(_)));
    }

    #[test]
    fn load_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "less = 3\n").unwrap();
        let result = CommandDb::load(file.path());
        assert_matches!(result, Err(LoadError::Parse(_)));
    }
}
