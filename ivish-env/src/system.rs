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

//! System-managed parts of the environment.
//!
//! The [`System`] trait is the boundary between the shell and the
//! terminal the host gives it: byte-level reads and writes, raw-mode
//! control, and file access for the dispatcher's redirections. There are
//! two implementors: [`RealSystem`](real::RealSystem) performs actual
//! system calls, and [`VirtualSystem`](virtual::VirtualSystem) simulates
//! a terminal in memory for testing.
//!
//! [`SharedSystem`] wraps a `System` in a shared handle so that the line
//! editor, the built-ins and the dispatcher can all talk to the same
//! terminal without borrowing the whole environment.

use crate::io::Fd;
use std::cell::RefCell;
use std::ffi::c_int;
use std::fmt;
use std::fmt::Debug;
use std::rc::Rc;

#[cfg(unix)]
pub mod real;
pub mod r#virtual;

/// Raw errno value.
pub type RawErrno = c_int;

/// Error number of a failed system operation.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Errno(pub RawErrno);

impl Errno {
    /// Sentinel for operations that do not set an error number
    pub const NO_ERROR: Errno = Errno(0);

    /// Returns the current `errno` value of the calling thread.
    #[cfg(unix)]
    #[must_use]
    pub fn last() -> Errno {
        Errno(nix::errno::Errno::last_raw())
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[cfg(unix)]
        return f.write_str(nix::errno::Errno::from_raw(self.0).desc());
        #[cfg(not(unix))]
        write!(f, "error {}", self.0)
    }
}

impl std::error::Error for Errno {}

/// Result of a system operation.
pub type Result<T = ()> = std::result::Result<T, Errno>;

/// Interface to the terminal and file descriptors the host hands to the
/// shell.
///
/// All I/O is blocking; the shell's cooperative model (one reader, one
/// command at a time) never needs more.
pub trait System: Debug {
    /// Reads at most `buffer.len()` bytes from `fd`.
    ///
    /// Returns the number of bytes read; zero means end of input.
    fn read(&mut self, fd: Fd, buffer: &mut [u8]) -> Result<usize>;

    /// Writes some bytes to `fd`, returning the number written.
    fn write(&mut self, fd: Fd, bytes: &[u8]) -> Result<usize>;

    /// Tests if `fd` is associated with a terminal device.
    fn isatty(&self, fd: Fd) -> bool;

    /// Switches the terminal behind `fd` in or out of raw mode.
    ///
    /// The first switch into raw mode remembers the original settings so
    /// the switch back can restore them.
    fn set_raw_mode(&mut self, fd: Fd, enabled: bool) -> Result<()>;

    /// Opens a file for reading (the `< path` redirection).
    fn open_read(&mut self, path: &str) -> Result<Fd>;

    /// Opens a file for writing, truncating it (the `> path` redirection).
    fn open_write(&mut self, path: &str) -> Result<Fd>;

    /// Closes a file descriptor opened by this system.
    fn close(&mut self, fd: Fd) -> Result<()>;
}

/// Shared clonable handle to a [`System`].
///
/// Cloning a `SharedSystem` gives another handle to the same underlying
/// system, which is how the line editor and the rest of the shell share
/// one terminal.
#[derive(Clone, Debug)]
pub struct SharedSystem(Rc<RefCell<Box<dyn System>>>);

impl SharedSystem {
    pub fn new(system: Box<dyn System>) -> SharedSystem {
        SharedSystem(Rc::new(RefCell::new(system)))
    }

    /// Reads available bytes from `fd`. Zero means end of input.
    pub async fn read(&self, fd: Fd, buffer: &mut [u8]) -> Result<usize> {
        self.0.borrow_mut().read(fd, buffer)
    }

    /// Writes the whole of `bytes` to `fd`, retrying partial writes.
    pub async fn write_all(&self, fd: Fd, bytes: &[u8]) -> Result<usize> {
        let mut written = 0;
        while written < bytes.len() {
            written += self.0.borrow_mut().write(fd, &bytes[written..])?;
        }
        Ok(written)
    }

    /// Writes a message to the standard error, ignoring failures.
    pub async fn print_error(&self, message: &str) {
        _ = self.write_all(Fd::STDERR, message.as_bytes()).await;
    }

    #[must_use]
    pub fn isatty(&self, fd: Fd) -> bool {
        self.0.borrow().isatty(fd)
    }

    pub fn set_raw_mode(&self, fd: Fd, enabled: bool) -> Result<()> {
        self.0.borrow_mut().set_raw_mode(fd, enabled)
    }

    pub fn open_read(&self, path: &str) -> Result<Fd> {
        self.0.borrow_mut().open_read(path)
    }

    pub fn open_write(&self, path: &str) -> Result<Fd> {
        self.0.borrow_mut().open_write(path)
    }

    pub fn close(&self, fd: Fd) -> Result<()> {
        self.0.borrow_mut().close(fd)
    }
}

#[cfg(test)]
mod tests {
    use super::r#virtual::VirtualSystem;
    use super::*;
    use futures_util::FutureExt as _;

    #[test]
    fn write_all_reaches_the_captured_output() {
        let system = VirtualSystem::new();
        let state = Rc::clone(&system.state);
        let shared = SharedSystem::new(Box::new(system));

        let count = shared
            .write_all(Fd::STDOUT, b"hello")
            .now_or_never()
            .unwrap()
            .unwrap();
        assert_eq!(count, 5);
        assert_eq!(state.borrow().stdout, b"hello");
    }

    #[test]
    fn clones_share_one_system() {
        let system = VirtualSystem::new();
        let state = Rc::clone(&system.state);
        let shared = SharedSystem::new(Box::new(system));
        let clone = shared.clone();

        _ = clone.write_all(Fd::STDERR, b"x").now_or_never().unwrap();
        _ = shared.write_all(Fd::STDERR, b"y").now_or_never().unwrap();
        assert_eq!(state.borrow().stderr, b"xy");
    }
}
