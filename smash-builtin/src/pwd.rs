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

//! Pwd built-in
//!
//! The **`pwd`** built-in prints the working directory path.
//!
//! # Synopsis
//!
//! ```sh
//! pwd
//! ```
//!
//! # Errors
//!
//! If the working directory cannot be determined, the built-in prints
//! `getcwd failed: <reason>`.
//!
//! # Exit status
//!
//! Zero unless an error occurred.
//!
//! # Implementation notes
//!
//! The path is obtained with [`System::getcwd`](smash_env::System::getcwd),
//! so it has no symbolic links.

use crate::Result;
use crate::common::{output, report_system_error};
use smash_env::Env;

/// Entry point of the `pwd` built-in
pub fn main(env: &mut Env, _args: Vec<String>) -> Result {
    match env.system.getcwd() {
        Ok(path) => output(env, &format!("{}\n", path.display())),
        Err(errno) => report_system_error(env, "getcwd", errno),
    }
}
