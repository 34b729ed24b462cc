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

//! Common items for implementing built-ins.

use crate::Result;
use smash_env::Env;
use smash_env::job::JobId;
use smash_env::semantics::ExitStatus;
use smash_env::system::Errno;
use std::fmt::Display;
use thiserror::Error;

/// Prints the text to the standard output and returns a successful result.
pub fn output(env: &mut Env, text: &str) -> Result {
    env.print(text);
    (ExitStatus::SUCCESS, None)
}

/// Prints an error message for the built-in and returns a failure.
///
/// The message has the form `smash error: <name>: <error>`.
pub fn report_failure(env: &mut Env, name: &str, error: impl Display) -> Result {
    env.print_error(format_args!("{name}: {error}"));
    (ExitStatus::FAILURE, None)
}

/// Prints an error message for a failed system call and returns a failure.
///
/// The message has the form `smash error: <operation> failed: <reason>`.
pub fn report_system_error(env: &mut Env, operation: &str, errno: Errno) -> Result {
    env.print_system_error(operation, errno);
    (ExitStatus::FAILURE, None)
}

/// Error in a job-id operand
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum JobOperandError {
    /// The operands are malformed or too many.
    #[error("invalid arguments")]
    InvalidArguments,
    /// The job table has no job with the ID.
    #[error("job-id {0} does not exist")]
    NoSuchJob(JobId),
}

/// Parses an optional job-id operand.
///
/// Returns `Ok(None)` if `args` is empty. A single operand must be a positive
/// decimal integer naming a job in `env.jobs`.
pub fn job_id_operand(env: &Env, args: &[String]) -> std::result::Result<Option<JobId>, JobOperandError> {
    match args {
        [] => Ok(None),
        [operand] => {
            let id = operand
                .parse::<JobId>()
                .map_err(|_| JobOperandError::InvalidArguments)?;
            match env.jobs.get(id) {
                Some(_) => Ok(Some(id)),
                None => Err(JobOperandError::NoSuchJob(id)),
            }
        }
        _ => Err(JobOperandError::InvalidArguments),
    }
}
