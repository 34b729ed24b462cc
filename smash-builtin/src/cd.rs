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

//! Cd built-in
//!
//! The **`cd`** built-in changes the working directory.
//!
//! # Synopsis
//!
//! ```sh
//! cd directory
//! ```
//!
//! ```sh
//! cd -
//! ```
//!
//! # Description
//!
//! The built-in changes the working directory to *directory*. The operand `-`
//! stands for the previous working directory, that is, the working directory
//! before the last successful `cd`.
//!
//! # Errors
//!
//! - `cd: too many arguments` if more than one operand is given.
//! - `cd: missing operand` if no operand is given.
//! - `cd: OLDPWD not set` for `-` if `cd` has never succeeded.
//! - `chdir failed: <reason>` if the directory cannot be changed to.
//!
//! # Exit status
//!
//! Zero if the working directory was changed, non-zero otherwise.

use crate::Result;
use crate::common::{report_failure, report_system_error};
use smash_env::Env;
use smash_env::semantics::ExitStatus;
use smash_env::system::Errno;
use std::ffi::CString;
use std::os::unix::ffi::OsStrExt as _;
use std::path::PathBuf;
use thiserror::Error;

/// Error in the operands of the `cd` built-in
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("too many arguments")]
    TooManyArguments,
    #[error("missing operand")]
    MissingOperand,
    #[error("OLDPWD not set")]
    OldPwdNotSet,
}

/// Determines the target directory from the operands.
fn target(env: &Env, args: &[String]) -> std::result::Result<PathBuf, Error> {
    match args {
        [] => Err(Error::MissingOperand),
        [operand] if operand == "-" => env.old_pwd.clone().ok_or(Error::OldPwdNotSet),
        [operand] => Ok(PathBuf::from(operand)),
        _ => Err(Error::TooManyArguments),
    }
}

/// Entry point of the `cd` built-in
pub fn main(env: &mut Env, args: Vec<String>) -> Result {
    let target = match target(env, &args) {
        Ok(target) => target,
        Err(error) => return report_failure(env, "cd", error),
    };
    let Ok(path) = CString::new(target.as_os_str().as_bytes()) else {
        return report_system_error(env, "chdir", Errno::EINVAL);
    };

    let previous = env.system.getcwd();
    if let Err(errno) = env.system.chdir(&path) {
        return report_system_error(env, "chdir", errno);
    }
    match previous {
        Ok(previous) => env.old_pwd = Some(previous),
        Err(errno) => log::warn!("cannot remember the previous directory: {errno}"),
    }
    (ExitStatus::SUCCESS, None)
}
