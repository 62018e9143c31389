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

//! System simulated in memory.
//!
//! [`VirtualSystem`] implements [`System`] without touching the real
//! terminal. Tests script the standard input with
//! [`SystemState::feed_stdin`], run the code under test, and then examine
//! the captured standard output and error, typically through
//! [`assert_stdout`] and [`assert_stderr`].

use super::{Errno, Result, System};
use crate::io::Fd;
use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::VecDeque;
use std::rc::Rc;

/// State of a [`VirtualSystem`], shared with the test that owns it.
#[derive(Clone, Debug, Default)]
pub struct SystemState {
    /// Bytes the simulated user has typed but the shell has not read yet
    pub stdin: VecDeque<u8>,
    /// Everything written to the standard output
    pub stdout: Vec<u8>,
    /// Everything written to the standard error
    pub stderr: Vec<u8>,
    /// Whether the standard descriptors pretend to be a terminal
    pub is_tty: bool,
    /// Current raw-mode setting
    pub raw_mode: bool,
    /// Files created or read through `open_write`/`open_read`
    pub files: HashMap<String, Vec<u8>>,
    open: HashMap<Fd, OpenFile>,
    next_fd: i32,
}

#[derive(Clone, Debug)]
struct OpenFile {
    path: String,
    /// Read position; `None` for descriptors opened for writing
    read_at: Option<usize>,
}

impl SystemState {
    /// Appends bytes to the scripted standard input.
    pub fn feed_stdin<B: AsRef<[u8]>>(&mut self, bytes: B) {
        self.stdin.extend(bytes.as_ref());
    }
}

/// Simulated system.
///
/// `state` is shared: clone the `Rc` before moving the system into a
/// [`SharedSystem`](super::SharedSystem) to keep access to the captured
/// output.
#[derive(Clone, Debug, Default)]
pub struct VirtualSystem {
    pub state: Rc<RefCell<SystemState>>,
}

impl VirtualSystem {
    #[must_use]
    pub fn new() -> VirtualSystem {
        let state = SystemState {
            is_tty: true,
            next_fd: 3,
            ..SystemState::default()
        };
        VirtualSystem {
            state: Rc::new(RefCell::new(state)),
        }
    }
}

impl System for VirtualSystem {
    fn read(&mut self, fd: Fd, buffer: &mut [u8]) -> Result<usize> {
        let mut state = self.state.borrow_mut();
        if fd == Fd::STDIN {
            let count = state.stdin.len().min(buffer.len());
            for slot in &mut buffer[..count] {
                *slot = state.stdin.pop_front().unwrap();
            }
            return Ok(count);
        }

        let file = state.open.get(&fd).cloned().ok_or(Errno(BADF))?;
        let Some(position) = file.read_at else {
            return Err(Errno(BADF));
        };
        let count = {
            let content = state.files.get(&file.path).ok_or(Errno(BADF))?;
            let available = &content[position.min(content.len())..];
            let count = available.len().min(buffer.len());
            buffer[..count].copy_from_slice(&available[..count]);
            count
        };
        state.open.get_mut(&fd).unwrap().read_at = Some(position + count);
        Ok(count)
    }

    fn write(&mut self, fd: Fd, bytes: &[u8]) -> Result<usize> {
        let mut state = self.state.borrow_mut();
        match fd {
            Fd::STDOUT => state.stdout.extend_from_slice(bytes),
            Fd::STDERR => state.stderr.extend_from_slice(bytes),
            _ => {
                let file = state.open.get(&fd).cloned().ok_or(Errno(BADF))?;
                if file.read_at.is_some() {
                    return Err(Errno(BADF));
                }
                state
                    .files
                    .get_mut(&file.path)
                    .ok_or(Errno(BADF))?
                    .extend_from_slice(bytes);
            }
        }
        Ok(bytes.len())
    }

    fn isatty(&self, fd: Fd) -> bool {
        matches!(fd, Fd::STDIN | Fd::STDOUT | Fd::STDERR) && self.state.borrow().is_tty
    }

    fn set_raw_mode(&mut self, _fd: Fd, enabled: bool) -> Result<()> {
        self.state.borrow_mut().raw_mode = enabled;
        Ok(())
    }

    fn open_read(&mut self, path: &str) -> Result<Fd> {
        let mut state = self.state.borrow_mut();
        if !state.files.contains_key(path) {
            return Err(Errno(NOENT));
        }
        let fd = Fd(state.next_fd);
        state.next_fd += 1;
        state.open.insert(
            fd,
            OpenFile {
                path: path.to_owned(),
                read_at: Some(0),
            },
        );
        Ok(fd)
    }

    fn open_write(&mut self, path: &str) -> Result<Fd> {
        let mut state = self.state.borrow_mut();
        state.files.insert(path.to_owned(), Vec::new());
        let fd = Fd(state.next_fd);
        state.next_fd += 1;
        state.open.insert(
            fd,
            OpenFile {
                path: path.to_owned(),
                read_at: None,
            },
        );
        Ok(fd)
    }

    fn close(&mut self, fd: Fd) -> Result<()> {
        match self.state.borrow_mut().open.remove(&fd) {
            Some(_) => Ok(()),
            None => Err(Errno(BADF)),
        }
    }
}

#[cfg(unix)]
const BADF: super::RawErrno = nix::libc::EBADF;
#[cfg(not(unix))]
const BADF: super::RawErrno = 9;

#[cfg(unix)]
const NOENT: super::RawErrno = nix::libc::ENOENT;
#[cfg(not(unix))]
const NOENT: super::RawErrno = 2;

/// Runs the given closure on the captured standard output.
pub fn assert_stdout<F, R>(state: &Rc<RefCell<SystemState>>, f: F) -> R
where
    F: FnOnce(&str) -> R,
{
    f(std::str::from_utf8(&state.borrow().stdout).expect("stdout is not UTF-8"))
}

/// Runs the given closure on the captured standard error.
pub fn assert_stderr<F, R>(state: &Rc<RefCell<SystemState>>, f: F) -> R
where
    F: FnOnce(&str) -> R,
{
    f(std::str::from_utf8(&state.borrow().stderr).expect("stderr is not UTF-8"))
}
