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

//! Chprompt built-in
//!
//! The **`chprompt`** built-in changes the prompt.
//!
//! # Synopsis
//!
//! ```sh
//! chprompt [name]
//! ```
//!
//! # Description
//!
//! The shell prints `name> ` before reading each command line. Without an
//! operand, the prompt is reset to the default `smash> `.
//!
//! Operands after the first are ignored.
//!
//! # Exit status
//!
//! Zero.

use crate::Result;
use smash_env::Env;
use smash_env::semantics::ExitStatus;

/// Entry point of the `chprompt` built-in
pub fn main(env: &mut Env, args: Vec<String>) -> Result {
    env.prompt = match args.into_iter().next() {
        Some(name) => name,
        None => Env::DEFAULT_PROMPT.to_owned(),
    };
    (ExitStatus::SUCCESS, None)
}
