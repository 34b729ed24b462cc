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

//! Implementation of pipeline semantics

use super::Command;
use smash_env::Env;
use smash_env::io::Fd;
use smash_env::semantics::{ExitStatus, Result};
use smash_env::system::Pid;
use smash_syntax::syntax::{self, PipeStream};
use std::ops::ControlFlow::{Break, Continue};

/// Executes the pipeline.
///
/// Both commands run in child processes of their own process groups,
/// connected by a pipe. The left command's standard output (or standard error
/// for `|&`) is the pipe's writing end and the right command's standard input
/// is its reading end. Each child executes its command as the shell would and
/// exits with the resulting exit status.
///
/// The shell closes its copies of the pipe and waits for both children,
/// regardless of a background marker. The exit status of the pipeline is that
/// of the right command.
impl Command for syntax::Pipeline {
    fn execute(&self, env: &mut Env) -> Result {
        let (reader, writer) = match env.system.pipe() {
            Ok(fds) => fds,
            Err(errno) => {
                env.print_system_error("pipe", errno);
                env.exit_status = ExitStatus::FAILURE;
                return Continue(());
            }
        };
        let pipe = [reader, writer];
        let source = match self.stream {
            PipeStream::Stdout => Fd::STDOUT,
            PipeStream::Stderr => Fd::STDERR,
        };

        let left = start_pipe_child(env, &self.left, writer, source, pipe);
        let right = start_pipe_child(env, &self.right, reader, Fd::STDIN, pipe);

        for fd in pipe {
            _ = env.system.close(fd);
        }

        let mut exit_status = ExitStatus::FAILURE;
        for pid in [left, right] {
            let Some(pid) = pid else { continue };
            exit_status = match env.wait_for_child(pid) {
                Ok(exit_status) => exit_status,
                Err(errno) => {
                    env.print_system_error("waitpid", errno);
                    ExitStatus::FAILURE
                }
            };
        }
        if right.is_none() {
            exit_status = ExitStatus::FAILURE;
        }
        env.exit_status = exit_status;
        Continue(())
    }
}

/// Starts a child process that executes `command` with `pipe_end` as `target`.
///
/// Returns the child's process ID, or `None` after printing an error message
/// if the child could not be started.
fn start_pipe_child(
    env: &mut Env,
    command: &syntax::Command,
    pipe_end: Fd,
    target: Fd,
    pipe: [Fd; 2],
) -> Option<Pid> {
    let result = env.start_child(|env| {
        let zero = Pid::from_raw(0);
        _ = env.system.setpgid(zero, zero);

        if let Err(errno) = env.system.dup2(pipe_end, target) {
            env.print_system_error("dup2", errno);
            env.exit_status = ExitStatus::FAILURE;
            return;
        }
        for fd in pipe {
            _ = env.system.close(fd);
        }

        if let Break(divert) = command.execute(env) {
            env.exit_status = divert.exit_status();
        }
    });

    match result {
        Ok(pid) => {
            _ = env.system.setpgid(pid, pid);
            Some(pid)
        }
        Err(errno) => {
            env.print_system_error("fork", errno);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::env_with_builtins;
    use smash_syntax::parser::parse;

    #[test]
    fn both_children_are_started_and_waited_for() {
        let (mut env, state) = env_with_builtins();
        env.exit_status = ExitStatus::FAILURE;
        let command = parse("ls | wc -l").unwrap().unwrap();

        let result = command.execute(&mut env);

        assert_eq!(result, Continue(()));
        assert_eq!(env.exit_status, ExitStatus::SUCCESS);
        let state = state.borrow();
        assert!(state.processes.is_empty());
        let (left, right) = (Pid::from_raw(10), Pid::from_raw(11));
        assert_eq!(state.setpgid_calls, [(left, left), (right, right)]);
    }

    #[test]
    fn parent_closes_both_pipe_ends() {
        let (mut env, state) = env_with_builtins();
        let command = parse("ls |& wc -l").unwrap().unwrap();

        _ = command.execute(&mut env);

        let state = state.borrow();
        let fds: Vec<Fd> = state.fds.keys().copied().collect();
        assert_eq!(fds, [Fd::STDIN, Fd::STDOUT, Fd::STDERR]);
    }

    #[test]
    fn background_marker_does_not_create_job() {
        let (mut env, state) = env_with_builtins();
        let command = parse("ls | wc &").unwrap().unwrap();

        _ = command.execute(&mut env);

        assert!(env.jobs.is_empty());
        assert!(state.borrow().processes.is_empty());
    }

    #[test]
    fn pipeline_does_not_touch_foreground_slot() {
        let (mut env, _state) = env_with_builtins();
        let command = parse("yes | head").unwrap().unwrap();

        _ = command.execute(&mut env);

        assert!(env.foreground.is_empty());
    }
}
