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

//! Implementation of `System` that actually interacts with the system.

use super::{Errno, Result, System};
use crate::io::Fd;
use std::collections::HashMap;
use std::ffi::CString;
use std::mem::MaybeUninit;

/// Converts a `-1` returned from a system call into an `Errno` error.
trait ErrnoIfM1: Sized {
    fn errno_if_m1(self) -> Result<Self>;
}

impl ErrnoIfM1 for i32 {
    fn errno_if_m1(self) -> Result<Self> {
        if self == -1 { Err(Errno::last()) } else { Ok(self) }
    }
}

impl ErrnoIfM1 for isize {
    fn errno_if_m1(self) -> Result<Self> {
        if self == -1 { Err(Errno::last()) } else { Ok(self) }
    }
}

/// System that performs real system calls.
#[derive(Default)]
pub struct RealSystem {
    /// Terminal settings saved when a descriptor first entered raw mode
    saved_attrs: HashMap<Fd, nix::libc::termios>,
}

impl std::fmt::Debug for RealSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealSystem").finish_non_exhaustive()
    }
}

impl RealSystem {
    /// Creates a new `RealSystem`.
    ///
    /// # Safety
    ///
    /// The caller must make sure the standard descriptors the shell was
    /// given stay open for the lifetime of the returned instance. There
    /// should be at most one `RealSystem` per set of descriptors, or raw
    /// mode save/restore will conflict.
    #[must_use]
    pub unsafe fn new() -> RealSystem {
        RealSystem::default()
    }
}

impl System for RealSystem {
    fn read(&mut self, fd: Fd, buffer: &mut [u8]) -> Result<usize> {
        loop {
            let count = unsafe {
                nix::libc::read(fd.0, buffer.as_mut_ptr().cast(), buffer.len())
            };
            match count.errno_if_m1() {
                Ok(count) => return Ok(count as usize),
                Err(Errno(nix::libc::EINTR)) => continue,
                Err(errno) => return Err(errno),
            }
        }
    }

    fn write(&mut self, fd: Fd, bytes: &[u8]) -> Result<usize> {
        loop {
            let count =
                unsafe { nix::libc::write(fd.0, bytes.as_ptr().cast(), bytes.len()) };
            match count.errno_if_m1() {
                Ok(count) => return Ok(count as usize),
                Err(Errno(nix::libc::EINTR)) => continue,
                Err(errno) => return Err(errno),
            }
        }
    }

    fn isatty(&self, fd: Fd) -> bool {
        unsafe { nix::libc::isatty(fd.0) == 1 }
    }

    fn set_raw_mode(&mut self, fd: Fd, enabled: bool) -> Result<()> {
        if enabled {
            let mut attrs = MaybeUninit::<nix::libc::termios>::uninit();
            unsafe { nix::libc::tcgetattr(fd.0, attrs.as_mut_ptr()) }.errno_if_m1()?;
            let saved = unsafe { attrs.assume_init() };
            self.saved_attrs.entry(fd).or_insert(saved);

            let mut raw = saved;
            unsafe { nix::libc::cfmakeraw(&mut raw) };
            // Keep output post-processing so `\n` still advances lines.
            raw.c_oflag |= nix::libc::OPOST;
            unsafe { nix::libc::tcsetattr(fd.0, nix::libc::TCSADRAIN, &raw) }
                .errno_if_m1()?;
        } else if let Some(saved) = self.saved_attrs.remove(&fd) {
            unsafe { nix::libc::tcsetattr(fd.0, nix::libc::TCSADRAIN, &saved) }
                .errno_if_m1()?;
        }
        Ok(())
    }

    fn open_read(&mut self, path: &str) -> Result<Fd> {
        open(path, nix::libc::O_RDONLY, 0)
    }

    fn open_write(&mut self, path: &str) -> Result<Fd> {
        let flags = nix::libc::O_WRONLY | nix::libc::O_CREAT | nix::libc::O_TRUNC;
        open(path, flags, 0o666)
    }

    fn close(&mut self, fd: Fd) -> Result<()> {
        unsafe { nix::libc::close(fd.0) }.errno_if_m1()?;
        Ok(())
    }
}

fn open(path: &str, flags: i32, mode: nix::libc::mode_t) -> Result<Fd> {
    let path = CString::new(path).map_err(|_| Errno(nix::libc::EINVAL))?;
    let fd = unsafe { nix::libc::open(path.as_ptr(), flags, nix::libc::c_uint::from(mode)) }
        .errno_if_m1()?;
    Ok(Fd(fd))
}
