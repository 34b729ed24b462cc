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

//! Implementation of the shell built-in utilities.
//!
//! Each built-in utility is implemented in the submodule named after the
//! utility. The submodule contains the `main` function that implements the
//! built-in utility. The module documentation for each submodule describes
//! the behavior of the built-in utility.
//!
//! The [`common`] module provides common functions that are used for
//! implementing built-in utilities.
//!
//! Built-ins receive their arguments without the command name. A trailing `&`
//! never reaches a built-in; it has been removed by the parser.

pub mod bg;
pub mod cd;
pub mod chprompt;
pub mod common;
pub mod fg;
pub mod jobs;
pub mod kill;
pub mod pwd;
pub mod quit;
pub mod showpid;

#[doc(no_inline)]
pub use smash_env::builtin::*;

/// Array of all the implemented built-in utilities.
///
/// The array items are ordered alphabetically.
pub const BUILTINS: &[(&str, Builtin)] = &[
    ("bg", Builtin { execute: bg::main }),
    ("cd", Builtin { execute: cd::main }),
    ("chprompt", Builtin { execute: chprompt::main }),
    ("fg", Builtin { execute: fg::main }),
    ("jobs", Builtin { execute: jobs::main }),
    ("kill", Builtin { execute: kill::main }),
    ("pwd", Builtin { execute: pwd::main }),
    ("quit", Builtin { execute: quit::main }),
    ("showpid", Builtin { execute: showpid::main }),
];
