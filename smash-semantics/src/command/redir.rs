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

//! Implementation of redirection semantics

use super::Command;
use crate::redir::RedirGuard;
use smash_env::Env;
use smash_env::semantics::{ExitStatus, Result};
use smash_env::system::OpenMode;
use smash_syntax::syntax::{self, RedirOp};
use std::ops::ControlFlow::Continue;

/// Executes the command with its standard output redirected.
///
/// If the redirection fails, an error message is printed and the command is
/// not executed. The standard output is restored in any case.
impl Command for syntax::Redir {
    fn execute(&self, env: &mut Env) -> Result {
        let mode = match self.op {
            RedirOp::FileOut => OpenMode::Truncate,
            RedirOp::FileAppend => OpenMode::Append,
        };

        let mut env = RedirGuard::new(env);
        if let Err(error) = env.redirect_stdout(&self.target, mode) {
            env.print_error(&error);
            env.exit_status = ExitStatus::FAILURE;
            return Continue(());
        }
        self.command.execute(&mut env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::env_with_builtins;
    use smash_env::io::{Fd, MIN_INTERNAL_FD};
    use smash_env::semantics::Divert;
    use smash_env_test_helper::{assert_stderr, assert_stdout};
    use smash_syntax::parser::parse;
    use std::ops::ControlFlow::Break;

    #[test]
    fn builtin_output_goes_to_file() {
        let (mut env, state) = env_with_builtins();
        let command = parse("echo to file > /out.txt").unwrap().unwrap();

        let result = command.execute(&mut env);

        assert_eq!(result, Continue(()));
        assert_eq!(env.exit_status, ExitStatus::SUCCESS);
        let content = state.borrow().file_content("/out.txt");
        assert_eq!(content.as_deref(), Some("to file\n"));
        assert_stdout(&state, |stdout| assert_eq!(stdout, ""));
    }

    #[test]
    fn appending_keeps_previous_content() {
        let (mut env, state) = env_with_builtins();
        _ = parse("echo 1 > /log").unwrap().unwrap().execute(&mut env);
        _ = parse("echo 2 >> /log").unwrap().unwrap().execute(&mut env);
        _ = parse("echo 3 >> /log").unwrap().unwrap().execute(&mut env);

        let content = state.borrow().file_content("/log");
        assert_eq!(content.as_deref(), Some("1\n2\n3\n"));
    }

    #[test]
    fn external_utility_runs_with_redirection() {
        let (mut env, state) = env_with_builtins();
        let command = parse("ls -l > /listing").unwrap().unwrap();

        let result = command.execute(&mut env);

        assert_eq!(result, Continue(()));
        let state = state.borrow();
        assert!(state.files.contains_key(std::path::Path::new("/listing")));
        assert!(state.processes.is_empty());
        assert!(!state.fds.contains_key(&MIN_INTERNAL_FD));
    }

    #[test]
    fn failed_redirection_skips_command() {
        let (mut env, state) = env_with_builtins();
        let command = parse("echo lost > /missing/out").unwrap().unwrap();

        let result = command.execute(&mut env);

        assert_eq!(result, Continue(()));
        assert_eq!(env.exit_status, ExitStatus::FAILURE);
        assert_stderr(&state, |stderr| {
            assert_eq!(stderr, "smash error: open failed: No such file or directory\n")
        });
        assert_stdout(&state, |stdout| assert_eq!(stdout, ""));
        env.print("ok\n");
        assert_stdout(&state, |stdout| assert_eq!(stdout, "ok\n"));
    }

    #[test]
    fn divert_passes_through_and_stdout_is_restored() {
        let (mut env, state) = env_with_builtins();
        let command = parse("exit 4 > /dev/null").unwrap().unwrap();

        let result = command.execute(&mut env);

        assert_eq!(result, Break(Divert::Exit(ExitStatus(4))));
        let fds: Vec<Fd> = state.borrow().fds.keys().copied().collect();
        assert_eq!(fds, [Fd::STDIN, Fd::STDOUT, Fd::STDERR]);
    }
}
