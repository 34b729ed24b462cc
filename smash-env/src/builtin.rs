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

//! Type definitions for built-in utilities.
//!
//! This module provides data types for defining built-in utilities.
//!
//! Note that concrete implementations of built-ins are not included in the
//! `smash_env` crate. For implementations of specific built-ins like `fg` and
//! `jobs`, see the `smash_builtin` crate.

use crate::Env;
use crate::semantics::Divert;
use crate::semantics::ExitStatus;
use std::fmt::Debug;

/// Result of built-in utility execution.
///
/// The exit status becomes the exit status of the command. The divert, if
/// any, tells the read-eval loop to stop.
pub type Result = (ExitStatus, Option<Divert>);

/// Type of functions that implement the behavior of a built-in.
///
/// The argument vector does not include the name of the built-in.
pub type Main = fn(&mut Env, Vec<String>) -> Result;

/// Built-in utility definition.
#[derive(Clone, Copy)]
pub struct Builtin {
    /// Function that implements the behavior of the built-in.
    pub execute: Main,
}

impl Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builtin").finish_non_exhaustive()
    }
}
