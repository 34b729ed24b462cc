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

//! Bg built-in
//!
//! The **`bg`** built-in resumes a stopped job in the background.
//!
//! # Synopsis
//!
//! ```sh
//! bg [job_id]
//! ```
//!
//! # Description
//!
//! The built-in sends `SIGCONT` to the job's process and marks the job
//! running. The job stays in the job list.
//!
//! # Operands
//!
//! Operand *job_id* is the positive job ID of the job to resume. If omitted,
//! the stopped job with the smallest job ID is resumed.
//!
//! # Standard output
//!
//! `<command> : <pid>` of the resumed job.
//!
//! # Errors
//!
//! - `bg: job-id <id> does not exist` if the specified job is not found.
//! - `bg: job-id <id> is already running in the background` if the specified
//!   job is not stopped.
//! - `bg: there is no stopped jobs to resume` if no operand is given and no
//!   job is stopped.
//! - `bg: invalid arguments` if the operand is not a job ID or there is more
//!   than one operand.
//!
//! # Exit status
//!
//! Zero if the job was resumed, non-zero otherwise.

use crate::Result;
use crate::common::{JobOperandError, job_id_operand, report_failure, report_system_error};
use smash_env::Env;
use smash_env::job::{JobId, JobState};
use smash_env::semantics::ExitStatus;
use thiserror::Error;

/// Error in selecting the job to resume
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("there is no stopped jobs to resume")]
    NoStoppedJob,
    #[error("job-id {0} is already running in the background")]
    AlreadyRunning(JobId),
    #[error(transparent)]
    Operand(#[from] JobOperandError),
}

fn select(env: &Env, args: &[String]) -> std::result::Result<JobId, Error> {
    match job_id_operand(env, args)? {
        None => env.jobs.most_recently_stopped().ok_or(Error::NoStoppedJob),
        Some(id) => match env.jobs.get(id) {
            Some(job) if job.state == JobState::Running => Err(Error::AlreadyRunning(id)),
            Some(_) => Ok(id),
            None => Err(JobOperandError::NoSuchJob(id).into()),
        },
    }
}

/// Entry point of the `bg` built-in
pub fn main(env: &mut Env, args: Vec<String>) -> Result {
    let id = match select(env, &args) {
        Ok(id) => id,
        Err(error) => return report_failure(env, "bg", error),
    };
    let Some(job) = env.jobs.get(id) else {
        return report_failure(env, "bg", JobOperandError::NoSuchJob(id));
    };
    let line = format!("{} : {}\n", job.name, job.pid);

    env.print(&line);
    match env.resume_job(id) {
        Ok(()) => (ExitStatus::SUCCESS, None),
        Err(errno) => report_system_error(env, "kill", errno),
    }
}
