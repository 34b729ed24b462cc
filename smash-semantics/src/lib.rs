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

//! Semantics of smash command lines
//!
//! A parsed [`Command`](smash_syntax::syntax::Command) is run by calling
//! [`Command::execute`](command::Command::execute), which updates
//! `env.exit_status` and may return `Break(Divert::Exit(_))` when the shell
//! should terminate.
//!
//! [`read_eval_loop`] reads command lines from the standard input and executes
//! them until the end of input or an exit request.

pub mod command;
pub mod redir;

#[doc(no_inline)]
pub use smash_env::semantics::*;

mod runner;
pub use runner::read_eval_loop;

#[cfg(test)]
pub(crate) mod tests;
