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

//! Fg built-in
//!
//! The **`fg`** built-in resumes a job in the foreground.
//!
//! # Synopsis
//!
//! ```sh
//! fg [job_id]
//! ```
//!
//! # Description
//!
//! The built-in sends `SIGCONT` to the job's process, removes the job from
//! the job list, and waits for the process in the foreground as if it had
//! been started there. If the process stops again, it goes back to the job
//! list as a stopped job.
//!
//! # Operands
//!
//! Operand *job_id* is the positive job ID of the job to resume. If omitted,
//! the job with the largest job ID is resumed.
//!
//! # Standard output
//!
//! `<command> : <pid>` of the resumed job, printed before resuming it.
//!
//! # Errors
//!
//! - `fg: jobs list is empty` if there is no job to resume.
//! - `fg: job-id <id> does not exist` if the specified job is not found.
//! - `fg: invalid arguments` if the operand is not a job ID or there is more
//!   than one operand.
//!
//! # Exit status
//!
//! The exit status of the resumed job. On error, non-zero.

use crate::Result;
use crate::common::{JobOperandError, job_id_operand, report_failure, report_system_error};
use smash_env::Env;
use smash_env::semantics::ExitStatus;
use thiserror::Error;

/// Error in selecting the job to resume
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("jobs list is empty")]
    EmptyJobList,
    #[error(transparent)]
    Operand(#[from] JobOperandError),
}

/// Entry point of the `fg` built-in
pub fn main(env: &mut Env, args: Vec<String>) -> Result {
    let id = match job_id_operand(env, &args) {
        Ok(Some(id)) => Ok(id),
        Ok(None) => env.jobs.largest().ok_or(Error::EmptyJobList),
        Err(error) => Err(error.into()),
    };
    let id = match id {
        Ok(id) => id,
        Err(error) => return report_failure(env, "fg", error),
    };
    let Some(job) = env.jobs.get(id) else {
        return report_failure(env, "fg", JobOperandError::NoSuchJob(id));
    };
    let (pid, name) = (job.pid, job.name.clone());

    env.print(&format!("{name} : {pid}\n"));
    if let Err(errno) = env.resume_job(id) {
        return report_system_error(env, "kill", errno);
    }
    env.jobs.remove(id);

    match env.wait_for_foreground(pid, name) {
        Ok(exit_status) => (exit_status, None),
        Err(errno) => {
            report_system_error(env, "waitpid", errno);
            (ExitStatus::FAILURE, None)
        }
    }
}
