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

//! Simple command semantics for external utilities

use itertools::Itertools as _;
use smash_env::Env;
use smash_env::job::JobState;
use smash_env::semantics::{ExitStatus, Result};
use smash_env::system::{Errno, Pid};
use smash_env::timeout::deadline_after;
use smash_syntax::syntax::{SimpleCommand, Timeout};
use std::ffi::CString;
use std::ops::ControlFlow::Continue;
use std::time::Duration;

/// Program that runs complex commands
const COMPLEX_COMMAND_INTERPRETER: &str = "bash";

/// Starts an external utility in a child process.
///
/// The child process is put in a new process group so that signals the
/// terminal sends to the shell's process group do not reach it. The child
/// then replaces itself with the utility found in `$PATH`. A complex command
/// (one containing wildcards) is passed to `bash -c` as a whole.
///
/// If `timeout` is given, the process is scheduled to be killed after the
/// time limit as soon as it is started.
///
/// A background command is added to the job list as a running job and this
/// function returns without waiting. Otherwise, the shell [waits for the
/// process in the foreground](Env::wait_for_foreground) and sets
/// `env.exit_status` to the result.
pub fn execute_external_utility(
    env: &mut Env,
    command: &SimpleCommand,
    timeout: Option<&Timeout>,
) -> Result {
    let args = match to_c_strings(command) {
        Ok(args) => args,
        Err(_) => {
            env.print_error("command contains a null character");
            env.exit_status = ExitStatus::ERROR;
            return Continue(());
        }
    };

    // The deadline is checked before forking so that a rejected time limit
    // leaves no process behind.
    let now = env.system.now();
    if let Some(timeout) = timeout {
        let duration = Duration::from_secs(timeout.seconds.into());
        if let Err(error) = deadline_after(now, duration) {
            env.print_error(&error);
            env.exit_status = ExitStatus::ERROR;
            return Continue(());
        }
    }

    let job_name = match timeout {
        Some(timeout) => timeout.name().to_owned(),
        None => command.text.clone(),
    };
    log::debug!("starting `{}`", command.words.iter().format(" "));

    let pid = match env.start_child(move |env| replace_current_process(env, args)) {
        Ok(pid) => pid,
        Err(errno) => {
            env.print_system_error("fork", errno);
            env.exit_status = ExitStatus::NOEXEC;
            return Continue(());
        }
    };

    // Also done by the child; whichever runs first wins the race.
    _ = env.system.setpgid(pid, pid);

    if let Some(timeout) = timeout {
        let scheduled = env.timeouts.schedule(
            &mut *env.system,
            timeout.text.clone(),
            pid,
            Duration::from_secs(timeout.seconds.into()),
            now,
            command.background,
        );
        if let Err(error) = scheduled {
            log::warn!("cannot schedule timeout of pid {pid}: {error}");
        }
    }

    if command.background {
        let now = env.system.now();
        let id = env.jobs.add(job_name, pid, JobState::Running, now);
        log::info!("[{id}] {pid}");
        env.exit_status = ExitStatus::SUCCESS;
        return Continue(());
    }

    env.exit_status = match env.wait_for_foreground(pid, job_name) {
        Ok(exit_status) => exit_status,
        Err(errno) => {
            env.print_system_error("waitpid", errno);
            ExitStatus::FAILURE
        }
    };
    Continue(())
}

/// Converts the command to the argument vector passed to `execvp`.
fn to_c_strings(command: &SimpleCommand) -> std::result::Result<Vec<CString>, std::ffi::NulError> {
    if command.is_complex() {
        [COMPLEX_COMMAND_INTERPRETER, "-c", command.text.as_str()]
            .into_iter()
            .map(CString::new)
            .collect()
    } else {
        command.words.iter().map(|word| CString::new(word.as_str())).collect()
    }
}

/// Runs in the child process to execute the utility.
///
/// This function returns only if `execvp` fails, in which case it prints an
/// error message and sets the exit status of the child.
fn replace_current_process(env: &mut Env, args: Vec<CString>) {
    let zero = Pid::from_raw(0);
    _ = env.system.setpgid(zero, zero);

    let Some(file) = args.first() else {
        env.exit_status = ExitStatus::SUCCESS;
        return;
    };
    let Err(errno) = env.system.execvp(file, &args);
    env.print_system_error("execvp", errno);
    env.exit_status = match errno {
        Errno::ENOENT => ExitStatus::NOT_FOUND,
        _ => ExitStatus::NOEXEC,
    };
}
