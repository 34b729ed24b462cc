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

//! Quit built-in
//!
//! The **`quit`** built-in terminates the shell.
//!
//! # Synopsis
//!
//! ```sh
//! quit [kill]
//! ```
//!
//! # Description
//!
//! The built-in makes the shell exit with exit status zero.
//!
//! With the `kill` operand, the built-in first removes finished jobs and then
//! sends `SIGKILL` to every remaining job. Without it, the jobs are left
//! running.
//!
//! # Standard output
//!
//! With `kill`, the built-in prints
//! `smash: sending SIGKILL signal to <n> jobs:` followed by a
//! `<pid>: <command>` line for each job.
//!
//! # Exit status
//!
//! Zero.

use crate::Result;
use smash_env::Env;
use smash_env::semantics::{Divert, ExitStatus};
use smash_env::system::Signal;

/// Sends `SIGKILL` to all jobs, reporting each of them.
fn kill_all_jobs(env: &mut Env) {
    env.jobs.reap_finished(&mut *env.system);

    let targets: Vec<_> = env
        .jobs
        .iter()
        .map(|(_, job)| (job.pid, job.name.clone()))
        .collect();
    env.print(&format!(
        "smash: sending SIGKILL signal to {} jobs:\n",
        targets.len()
    ));
    for (pid, name) in targets {
        env.print(&format!("{pid}: {name}\n"));
        if let Err(errno) = env.system.kill(pid, Signal::SIGKILL) {
            env.print_system_error("kill", errno);
        }
    }
}

/// Entry point of the `quit` built-in
pub fn main(env: &mut Env, args: Vec<String>) -> Result {
    if args.first().is_some_and(|arg| arg == "kill") {
        kill_all_jobs(env);
    }
    let exit_status = ExitStatus::SUCCESS;
    (exit_status, Some(Divert::Exit(exit_status)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::add_job;
    use smash_env::job::JobState;
    use smash_env_test_helper::{assert_stdout, virtual_env};

    #[test]
    fn quit_requests_exit() {
        let (mut env, state) = virtual_env();
        add_job(&mut env, &state, "sleep 9", JobState::Running);

        let result = main(&mut env, vec![]);

        assert_eq!(result, (ExitStatus::SUCCESS, Some(Divert::Exit(ExitStatus::SUCCESS))));
        assert!(state.borrow().sent_signals.is_empty());
        assert_stdout(&state, |stdout| assert_eq!(stdout, ""));
    }

    #[test]
    fn quit_kill_kills_all_jobs() {
        let (mut env, state) = virtual_env();
        let pid1 = add_job(&mut env, &state, "sleep 9", JobState::Running);
        let pid2 = add_job(&mut env, &state, "vim", JobState::Stopped);

        let result = main(&mut env, vec!["kill".to_string()]);

        assert_eq!(result, (ExitStatus::SUCCESS, Some(Divert::Exit(ExitStatus::SUCCESS))));
        assert_eq!(
            state.borrow().sent_signals,
            [(pid1, Signal::SIGKILL), (pid2, Signal::SIGKILL)]
        );
        assert_stdout(&state, |stdout| {
            assert_eq!(
                stdout,
                format!(
                    "smash: sending SIGKILL signal to 2 jobs:\n{pid1}: sleep 9\n{pid2}: vim\n"
                )
            )
        });
    }
}
