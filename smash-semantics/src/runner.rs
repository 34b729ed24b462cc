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

//! Implementation of the read-eval loop

use crate::command::Command;
use smash_env::Env;
use smash_env::semantics::ExitStatus;
use smash_syntax::parser::parse;
use std::ops::ControlFlow::Break;

/// Runs the read-eval loop.
///
/// Each cycle of the loop:
///
/// 1. handles signals caught since the last cycle,
/// 2. collects background jobs that have finished,
/// 3. prints the prompt `<env.prompt>> `,
/// 4. reads a line from the standard input, and
/// 5. parses and executes the line.
///
/// Signals caught while reading the line are handled as soon as the read is
/// interrupted, and the read resumes afterwards.
///
/// The loop ends at the end of input, returning the exit status of the last
/// command, or when a command requests an exit, returning the requested exit
/// status. A syntax error is reported and sets the exit status to
/// [`ExitStatus::ERROR`]; the loop continues with the next line.
///
/// ```
/// # use smash_env::Env;
/// # use smash_env::semantics::ExitStatus;
/// # use smash_semantics::read_eval_loop;
/// let mut env = Env::new_virtual();
/// env.exit_status = ExitStatus::FAILURE;
/// // The virtual standard input is empty.
/// assert_eq!(read_eval_loop(&mut env), ExitStatus::FAILURE);
/// ```
pub fn read_eval_loop(env: &mut Env) -> ExitStatus {
    loop {
        env.reconcile_signals();
        for (id, job) in env.jobs.reap_finished(&mut *env.system) {
            log::debug!("[{id}] {} finished", job.name);
        }

        let prompt = format!("{}> ", env.prompt);
        env.print(&prompt);

        let line = match env.read_line() {
            Ok(Some(line)) => line,
            Ok(None) => return env.exit_status,
            Err(errno) => {
                env.print_system_error("read", errno);
                return ExitStatus::FAILURE;
            }
        };

        match parse(&line) {
            Ok(Some(command)) => {
                log::trace!("executing `{command}`");
                if let Break(divert) = command.execute(env) {
                    return divert.exit_status();
                }
            }
            Ok(None) => (),
            Err(error) => {
                env.print_error(&error);
                env.exit_status = ExitStatus::ERROR;
            }
        }
    }
}
