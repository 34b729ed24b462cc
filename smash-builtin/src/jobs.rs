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

//! Jobs built-in
//!
//! The **`jobs`** built-in reports the background and stopped jobs.
//!
//! # Synopsis
//!
//! ```sh
//! jobs
//! ```
//!
//! # Description
//!
//! The built-in first removes jobs whose processes have finished, then prints
//! one line for each remaining job in ascending order of job IDs. See
//! [`smash_env::job::fmt`] for the line format.
//!
//! Operands are ignored.
//!
//! # Exit status
//!
//! Zero.

use crate::Result;
use crate::common::output;
use itertools::Itertools as _;
use smash_env::Env;
use smash_env::job::fmt::Report;

/// Entry point of the `jobs` built-in
pub fn main(env: &mut Env, _args: Vec<String>) -> Result {
    env.jobs.reap_finished(&mut *env.system);

    let now = env.system.now();
    let text = env
        .jobs
        .iter()
        .map(|(id, job)| format!("{}\n", Report { id, job, now }))
        .join("");
    output(env, &text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use smash_env::job::JobState;
    use smash_env::system::ProcessState;
    use smash_env::semantics::ExitStatus;
    use smash_env_test_helper::{assert_stdout, virtual_env};
    use std::time::Duration;

    #[test]
    fn lists_jobs_in_id_order() {
        let (mut env, state) = virtual_env();
        let (pid1, pid2) = {
            let mut state = state.borrow_mut();
            (state.spawn_child(), state.spawn_child())
        };
        let start = env.system.now();
        env.jobs
            .add("sleep 100".to_string(), pid1, JobState::Running, start);
        env.jobs
            .add("vim".to_string(), pid2, JobState::Stopped, start);
        state.borrow_mut().now += Duration::from_secs(7);

        let result = main(&mut env, vec![]);

        assert_eq!(result, (ExitStatus::SUCCESS, None));
        assert_stdout(&state, |stdout| {
            assert_eq!(
                stdout,
                "[1] sleep 100 : 10 7 secs\n[2] vim : 11 7 secs (stopped)\n"
            )
        });
    }

    #[test]
    fn finished_jobs_are_removed_before_listing() {
        let (mut env, state) = virtual_env();
        let (pid1, pid2) = {
            let mut state = state.borrow_mut();
            (state.spawn_child(), state.spawn_child())
        };
        let now = env.system.now();
        env.jobs.add("true".to_string(), pid1, JobState::Running, now);
        env.jobs.add("cat".to_string(), pid2, JobState::Running, now);
        state
            .borrow_mut()
            .processes
            .get_mut(&pid1)
            .unwrap()
            .set_state(ProcessState::Exited(ExitStatus::SUCCESS));

        main(&mut env, vec![]);

        assert_eq!(env.jobs.len(), 1);
        assert_stdout(&state, |stdout| assert_eq!(stdout, "[2] cat : 11 0 secs\n"));
    }

    #[test]
    fn empty_job_list_prints_nothing() {
        let (mut env, state) = virtual_env();
        main(&mut env, vec![]);
        assert_stdout(&state, |stdout| assert_eq!(stdout, ""));
    }
}
