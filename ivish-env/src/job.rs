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

//! The foreground command record.
//!
//! There is no job control: the shell runs at most one command at a
//! time. While it runs, [`Env::foreground`](crate::Env::foreground)
//! holds a [`CommandInfo`] so keyboard input can be routed to it and
//! `^C` can be translated through the interrupt dispatcher.

use crate::Env;
use crate::host::RunningCommand;
use crate::host::SessionId;
use crate::interrupt;
use crate::terminal::TermMode;
use std::rc::Rc;

/// Record of a running foreground command.
#[derive(Clone, Debug)]
pub struct CommandInfo {
    /// The command line handed to the runner
    pub command_line: String,
    pub session: SessionId,
    pub handle: Rc<dyn RunningCommand>,
    /// Keystrokes buffered in line mode, not yet forwarded
    pub pending_input: String,
}

impl CommandInfo {
    pub fn new(
        command_line: String,
        session: SessionId,
        handle: Rc<dyn RunningCommand>,
    ) -> CommandInfo {
        CommandInfo {
            command_line,
            session,
            handle,
            pending_input: String::new(),
        }
    }

    /// The command name, i.e. the first token of the command line.
    #[must_use]
    pub fn name(&self) -> String {
        ivish_syntax::lex::tokenize_at_most(&self.command_line, 1)
            .tokens
            .pop()
            .map(|token| token.content)
            .unwrap_or_default()
    }
}

/// Routes terminal input to the foreground command.
///
/// In raw mode every byte is forwarded immediately; in line mode input
/// is buffered and forwarded one completed line at a time. In both
/// modes `^C` goes through the interrupt dispatcher, and in line mode
/// `^D` on an empty buffer closes the command's input.
pub fn forward_input(env: &mut Env, bytes: &[u8]) {
    if env.foreground.is_none() {
        return;
    }

    match env.tty.mode() {
        TermMode::Raw => forward_raw(env, bytes),
        TermMode::Line => forward_cooked(env, bytes),
    }
}

fn forward_raw(env: &mut Env, bytes: &[u8]) {
    for chunk in bytes.split_inclusive(|&b| b == 0x03) {
        let (body, interrupted) = match chunk.split_last() {
            Some((&0x03, body)) => (body, true),
            _ => (chunk, false),
        };
        if !body.is_empty() {
            if let Some(info) = &env.foreground {
                info.handle.write_input(body);
            }
        }
        if interrupted {
            interrupt::deliver(env);
        }
    }
}

fn forward_cooked(env: &mut Env, bytes: &[u8]) {
    for c in String::from_utf8_lossy(bytes).chars() {
        match c {
            '\u{3}' => interrupt::deliver(env),
            '\u{4}' => {
                let Some(info) = env.foreground.as_mut() else {
                    return;
                };
                if info.pending_input.is_empty() {
                    info.handle.end_input();
                } else {
                    let pending = std::mem::take(&mut info.pending_input);
                    info.handle.write_input(pending.as_bytes());
                }
            }
            '\r' | '\n' => {
                let Some(info) = env.foreground.as_mut() else {
                    return;
                };
                info.pending_input.push('\n');
                let pending = std::mem::take(&mut info.pending_input);
                info.handle.write_input(pending.as_bytes());
            }
            '\u{8}' | '\u{7f}' => {
                if let Some(info) = env.foreground.as_mut() {
                    info.pending_input.pop();
                }
            }
            _ => {
                if let Some(info) = env.foreground.as_mut() {
                    info.pending_input.push(c);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Finished;
    use crate::semantics::ExitStatus;
    use std::cell::RefCell;

    /// Running-command mock that records what happens to it.
    #[derive(Debug, Default)]
    pub(crate) struct Recorder {
        pub input: RefCell<Vec<u8>>,
        pub events: RefCell<Vec<&'static str>>,
    }

    #[async_trait::async_trait(?Send)]
    impl RunningCommand for Recorder {
        async fn wait(&self) -> ExitStatus {
            ExitStatus::SUCCESS
        }
        fn kill(&self) {
            self.events.borrow_mut().push("kill");
        }
        fn cancel(&self) {
            self.events.borrow_mut().push("cancel");
        }
        fn write_input(&self, bytes: &[u8]) {
            self.input.borrow_mut().extend_from_slice(bytes);
        }
        fn end_input(&self) {
            self.events.borrow_mut().push("end_input");
        }
    }

    fn env_with_foreground(handle: Rc<dyn RunningCommand>) -> Env {
        let mut env = Env::new_virtual();
        env.foreground = Some(CommandInfo::new(
            "cat file".to_owned(),
            SessionId(1),
            handle,
        ));
        env
    }

    #[test]
    fn command_name_is_first_token() {
        let info = CommandInfo::new(
            "grep -n 'x y'".to_owned(),
            SessionId(1),
            Rc::new(Finished(ExitStatus::SUCCESS)),
        );
        assert_eq!(info.name(), "grep");
    }

    #[test]
    fn line_mode_buffers_until_newline() {
        let recorder = Rc::new(Recorder::default());
        let mut env = env_with_foreground(Rc::clone(&recorder) as _);

        forward_input(&mut env, b"hel");
        assert_eq!(*recorder.input.borrow(), b"");
        forward_input(&mut env, b"lo\r");
        assert_eq!(*recorder.input.borrow(), b"hello\n");
    }

    #[test]
    fn line_mode_backspace_edits_the_pending_line() {
        let recorder = Rc::new(Recorder::default());
        let mut env = env_with_foreground(Rc::clone(&recorder) as _);

        forward_input(&mut env, b"cay\x08t\n");
        assert_eq!(*recorder.input.borrow(), b"cat\n");
    }

    #[test]
    fn line_mode_eof_on_empty_buffer_ends_input() {
        let recorder = Rc::new(Recorder::default());
        let mut env = env_with_foreground(Rc::clone(&recorder) as _);

        forward_input(&mut env, b"\x04");
        assert_eq!(*recorder.events.borrow(), ["end_input"]);
    }

    #[test]
    fn line_mode_eof_flushes_partial_line() {
        let recorder = Rc::new(Recorder::default());
        let mut env = env_with_foreground(Rc::clone(&recorder) as _);

        forward_input(&mut env, b"par\x04");
        assert_eq!(*recorder.input.borrow(), b"par");
        assert!(recorder.events.borrow().is_empty());
    }

    #[test]
    fn raw_mode_forwards_immediately() {
        let recorder = Rc::new(Recorder::default());
        let mut env = env_with_foreground(Rc::clone(&recorder) as _);
        env.tty.set(TermMode::Raw);

        forward_input(&mut env, b"a\x1b[Ab");
        assert_eq!(*recorder.input.borrow(), b"a\x1b[Ab");
    }

    #[test]
    fn interrupt_reaches_the_dispatcher_in_raw_mode() {
        let recorder = Rc::new(Recorder::default());
        let mut env = env_with_foreground(Rc::clone(&recorder) as _);
        env.tty.set(TermMode::Raw);

        // No intaction and no handler: the fallback cancels the thread.
        forward_input(&mut env, b"ab\x03cd");
        assert_eq!(*recorder.input.borrow(), b"abcd");
        assert_eq!(*recorder.events.borrow(), ["cancel"]);
    }

    #[test]
    fn input_without_foreground_is_dropped() {
        let mut env = Env::new_virtual();
        forward_input(&mut env, b"anything\n");
        assert!(env.foreground.is_none());
    }
}
