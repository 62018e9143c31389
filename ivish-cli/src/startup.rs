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

//! Startup configuration.
//!
//! Everything the shell is configured with comes from environment
//! variables, read once into a [`Startup`] value:
//!
//! - `IVISH_CMD_DB` — path to the command property database (TOML)
//! - `IVISH_HISTORY_FILE` — path to the plain-text history file
//! - `UNFINISHED_QUOTE_HINT_COLOR`, `INVALID_PIPE_DELIMITER_HINT_COLOR`,
//!   `INVALID_COMMAND_SEPARATOR_HINT_COLOR` — 256-color indexes for the
//!   syntax-error highlights (default 178)
//! - `IVISH_LOG_FILE`, `IVISH_LOG` — log destination and filter; with
//!   no log file the shell does not log at all (the terminal belongs to
//!   the line editor)

use ivish_editor::editor::HintColors;
use ivish_env::Env;
use ivish_env::command_db::CommandDb;
use std::ffi::OsStr;
use std::path::Path;
use std::path::PathBuf;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const CMD_DB_VAR: &str = "IVISH_CMD_DB";
pub const HISTORY_FILE_VAR: &str = "IVISH_HISTORY_FILE";
pub const LOG_FILE_VAR: &str = "IVISH_LOG_FILE";
pub const LOG_FILTER_VAR: &str = "IVISH_LOG";

/// Configuration gathered from the environment at startup.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Startup {
    pub command_db_path: Option<PathBuf>,
    pub history_file: Option<PathBuf>,
    pub hint_colors: HintColors,
    pub log_file: Option<PathBuf>,
}

impl Startup {
    /// Reads the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Startup {
        fn color(name: &str) -> Option<u8> {
            std::env::var(name).ok()?.parse().ok()
        }

        let mut hint_colors = HintColors::default();
        if let Some(color) = color("UNFINISHED_QUOTE_HINT_COLOR") {
            hint_colors.unfinished_quote = color;
        }
        if let Some(color) = color("INVALID_PIPE_DELIMITER_HINT_COLOR") {
            hint_colors.invalid_pipe = color;
        }
        if let Some(color) = color("INVALID_COMMAND_SEPARATOR_HINT_COLOR") {
            hint_colors.invalid_separator = color;
        }

        Startup {
            command_db_path: std::env::var_os(CMD_DB_VAR).map(PathBuf::from),
            history_file: std::env::var_os(HISTORY_FILE_VAR).map(PathBuf::from),
            hint_colors,
            log_file: std::env::var_os(LOG_FILE_VAR).map(PathBuf::from),
        }
    }

    /// Loads the file-backed parts of the configuration into the
    /// environment. Failures are logged and otherwise ignored: the
    /// shell runs fine without a command database or an old history.
    pub fn configure(&self, env: &mut Env) {
        if let Some(path) = &self.command_db_path {
            match CommandDb::load(path) {
                Ok(db) => env.command_db = db,
                Err(error) => {
                    warn!(%error, path = %path.display(), "command database not loaded");
                }
            }
        }
        if let Some(path) = &self.history_file {
            if let Err(error) = env.history.load(path) {
                warn!(%error, path = %path.display(), "history not loaded");
            }
        }
    }

    /// Saves the history back to its file, if one is configured.
    pub fn save_history(&self, env: &Env) {
        if let Some(path) = &self.history_file {
            if let Err(error) = env.history.save(path) {
                warn!(%error, path = %path.display(), "history not saved");
            }
        }
    }
}

/// Starts logging to the configured file.
///
/// Returns the guard that flushes the non-blocking writer; dropping it
/// ends logging. `None` when no log file is configured.
#[must_use]
pub fn init_logging(startup: &Startup) -> Option<WorkerGuard> {
    let path = startup.log_file.as_ref()?;
    let directory = path.parent().filter(|p| !p.as_os_str().is_empty());
    let file_name = path.file_name().unwrap_or(OsStr::new("ivish.log"));

    let appender = tracing_appender::rolling::never(
        directory.unwrap_or(Path::new(".")),
        file_name,
    );
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ivish_env::command_db::IntAction;
    use std::io::Write as _;

    #[test]
    fn default_startup_has_default_colors() {
        let startup = Startup::default();
        assert_eq!(startup.hint_colors, HintColors::default());
        assert_eq!(startup.command_db_path, None);
        assert_eq!(startup.log_file, None);
    }

    #[test]
    fn configure_loads_database_and_history() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("cmd.toml");
        let history_path = dir.path().join("history");
        std::fs::write(&db_path, "[less]\nintaction = \"end_of_file\"\n").unwrap();
        std::fs::write(&history_path, "ls\npwd\n").unwrap();

        let startup = Startup {
            command_db_path: Some(db_path),
            history_file: Some(history_path),
            ..Startup::default()
        };
        let mut env = Env::new_virtual();
        startup.configure(&mut env);

        assert_eq!(env.command_db.int_action("less"), Some(IntAction::EndOfFile));
        assert_eq!(env.history.items(), ["ls", "pwd"]);
    }

    #[test]
    fn missing_files_are_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let startup = Startup {
            command_db_path: Some(dir.path().join("absent.toml")),
            history_file: Some(dir.path().join("absent")),
            ..Startup::default()
        };
        let mut env = Env::new_virtual();
        startup.configure(&mut env);
        assert_eq!(env.command_db, CommandDb::default());
        assert!(env.history.is_empty());
    }

    #[test]
    fn malformed_database_is_not_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not toml at all [").unwrap();
        let startup = Startup {
            command_db_path: Some(file.path().to_owned()),
            ..Startup::default()
        };
        let mut env = Env::new_virtual();
        startup.configure(&mut env);
        assert_eq!(env.command_db, CommandDb::default());
    }

    #[test]
    fn history_round_trips_through_save_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");
        let startup = Startup {
            history_file: Some(path),
            ..Startup::default()
        };

        let mut env = Env::new_virtual();
        env.history.add("echo saved");
        startup.save_history(&env);

        let mut env = Env::new_virtual();
        startup.configure(&mut env);
        assert_eq!(env.history.items(), ["echo saved"]);
    }
}
