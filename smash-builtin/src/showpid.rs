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

//! Showpid built-in
//!
//! The **`showpid`** built-in prints the process ID of the shell.
//!
//! # Synopsis
//!
//! ```sh
//! showpid
//! ```
//!
//! # Standard output
//!
//! `smash pid is <pid>` followed by a newline. The process ID is that of the
//! main shell process even when the built-in runs in a pipeline.
//!
//! # Exit status
//!
//! Zero.

use crate::Result;
use crate::common::output;
use smash_env::Env;

/// Entry point of the `showpid` built-in
pub fn main(env: &mut Env, _args: Vec<String>) -> Result {
    let line = format!("smash pid is {}\n", env.main_pid);
    output(env, &line)
}
