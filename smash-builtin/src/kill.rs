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

//! Kill built-in
//!
//! The **`kill`** built-in sends a signal to a job.
//!
//! # Synopsis
//!
//! ```sh
//! kill -signal_number job_id
//! ```
//!
//! # Description
//!
//! The built-in sends the signal to the process of the job. Sending a stop
//! signal (`SIGSTOP`, `SIGTSTP`, `SIGTTIN` or `SIGTTOU`) marks the job stopped,
//! and sending `SIGCONT` marks it running.
//!
//! # Standard output
//!
//! `signal number <signal_number> was sent to pid <pid>`
//!
//! # Errors
//!
//! - `kill: invalid arguments` if the operands are not a signal number and
//!   a job ID.
//! - `kill failed: Invalid argument` if the signal number is not a valid
//!   signal.
//! - `kill: job-id <id> does not exist` if the job is not found.
//!
//! # Exit status
//!
//! Zero if the signal was sent, non-zero otherwise.

use crate::Result;
use crate::common::{JobOperandError, output, report_failure, report_system_error};
use smash_env::Env;
use smash_env::job::JobId;
use smash_env::system::{Errno, Signal};
use std::ffi::c_int;

/// Parses the operands into a signal number and a job ID.
fn parse(args: &[String]) -> Option<(c_int, JobId)> {
    let [signal, id] = args else { return None };
    let number = signal.strip_prefix('-')?.parse().ok()?;
    let id = id.parse().ok()?;
    Some((number, id))
}

/// Entry point of the `kill` built-in
pub fn main(env: &mut Env, args: Vec<String>) -> Result {
    let Some((number, id)) = parse(&args) else {
        return report_failure(env, "kill", JobOperandError::InvalidArguments);
    };
    let Ok(signal) = Signal::try_from(number) else {
        return report_system_error(env, "kill", Errno::EINVAL);
    };
    let Some(pid) = env.jobs.get(id).map(|job| job.pid) else {
        return report_failure(env, "kill", JobOperandError::NoSuchJob(id));
    };

    let sent = match signal {
        Signal::SIGSTOP => env.suspend_job(id),
        Signal::SIGCONT => env.resume_job(id),
        _ => env.signal_job(id, signal),
    };
    if let Err(errno) = sent {
        return report_system_error(env, "kill", errno);
    }
    output(env, &format!("signal number {number} was sent to pid {pid}\n"))
}
