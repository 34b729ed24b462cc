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

//! Implementation of timed command semantics

use super::Command;
use super::simple_command::execute_simple_command;
use smash_env::Env;
use smash_env::semantics::Result;
use smash_syntax::syntax;

/// Executes the command with a time limit.
///
/// The time limit is enforced for an external utility only: its process is
/// scheduled in [`Env::timeouts`] as soon as it starts. A built-in runs as if
/// there were no `timeout` prefix.
impl Command for syntax::Timeout {
    fn execute(&self, env: &mut Env) -> Result {
        execute_simple_command(env, &self.command, Some(self))
    }
}
