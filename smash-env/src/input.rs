// This file is part of smash, a small job-control shell.
// Copyright (C) 2026 smash contributors
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

//! Reading command lines
//!
//! The shell reads the standard input one byte at a time so that it never
//! consumes input beyond the end of the current line. Child processes
//! inheriting the standard input can then read the rest.

use crate::Env;
use crate::io::Fd;
use crate::system::Errno;

impl Env {
    /// Reads a line from the standard input.
    ///
    /// Returns the line without the trailing newline, or `None` at the end of
    /// input. A partial last line not terminated by a newline is returned as
    /// a line. Invalid UTF-8 sequences are replaced.
    ///
    /// If the read is interrupted by a signal, the caught signals are handled
    /// and reading resumes. When the shell has a
    /// [signal mask](Env::signal_mask), signals are caught only while waiting
    /// for the input to become readable.
    pub fn read_line(&mut self) -> nix::Result<Option<String>> {
        let mut line = Vec::new();
        let mut byte = [0; 1];
        loop {
            if let Some(mask) = self.signal_mask {
                match self.system.select(Some(Fd::STDIN), Some(&mask)) {
                    Ok(()) => (),
                    Err(Errno::EINTR) => {
                        self.reconcile_signals();
                        continue;
                    }
                    Err(errno) => return Err(errno),
                }
            }
            match self.system.read(Fd::STDIN, &mut byte) {
                Ok(0) if line.is_empty() => return Ok(None),
                Ok(0) => break,
                Ok(_) if byte[0] == b'\n' => break,
                Ok(_) => line.push(byte[0]),
                Err(Errno::EINTR) => self.reconcile_signals(),
                Err(errno) => return Err(errno),
            }
        }
        Ok(Some(String::from_utf8_lossy(&line).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use crate::Env;
    use crate::VirtualSystem;
    use crate::system::Signal;

    fn env_with_input(input: &str) -> (Env, VirtualSystem) {
        let system = VirtualSystem::new();
        system
            .state
            .borrow_mut()
            .create_file("/dev/stdin", input.as_bytes());
        let env = Env::with_system(Box::new(system.clone()));
        (env, system)
    }

    #[test]
    fn reads_lines_until_end_of_input() {
        let (mut env, _system) = env_with_input("sleep 5 &\njobs\nquit");
        assert_eq!(env.read_line(), Ok(Some("sleep 5 &".to_string())));
        assert_eq!(env.read_line(), Ok(Some("jobs".to_string())));
        assert_eq!(env.read_line(), Ok(Some("quit".to_string())));
        assert_eq!(env.read_line(), Ok(None));
    }

    #[test]
    fn empty_line_is_not_end_of_input() {
        let (mut env, _system) = env_with_input("\n");
        assert_eq!(env.read_line(), Ok(Some(String::new())));
        assert_eq!(env.read_line(), Ok(None));
    }

    #[test]
    fn interrupted_read_handles_signal_and_resumes() {
        let (mut env, system) = env_with_input("pwd\n");
        system.state.borrow_mut().caught_signals.push(Signal::SIGTSTP);

        assert_eq!(env.read_line(), Ok(Some("pwd".to_string())));

        let stdout = system.state.borrow().file_content("/dev/stdout").unwrap();
        assert_eq!(stdout, "smash: got ctrl-Z\n");
    }
}
