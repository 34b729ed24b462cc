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

//! Simple command semantics
//!
//! The first word of a simple command names a built-in or an external
//! utility. Built-ins are looked up in [`Env::builtins`] and run in the shell
//! process itself; a trailing `&` has no effect on them. Any other name is
//! [run as an external utility](external::execute_external_utility).

pub mod external;

use super::Command;
use smash_env::Env;
use smash_env::builtin::Builtin;
use smash_env::semantics::Result;
use smash_syntax::syntax;
use std::ops::ControlFlow::{Break, Continue};

impl Command for syntax::SimpleCommand {
    fn execute(&self, env: &mut Env) -> Result {
        execute_simple_command(env, self, None)
    }
}

/// Executes a simple command, possibly with a time limit.
///
/// `timeout` is the enclosing timed command, if any. The time limit applies to
/// external utilities only.
pub fn execute_simple_command(
    env: &mut Env,
    command: &syntax::SimpleCommand,
    timeout: Option<&syntax::Timeout>,
) -> Result {
    match env.builtins.get(command.name()).copied() {
        Some(builtin) => execute_builtin(env, builtin, command),
        None => external::execute_external_utility(env, command, timeout),
    }
}

fn execute_builtin(env: &mut Env, builtin: Builtin, command: &syntax::SimpleCommand) -> Result {
    log::trace!("running built-in `{}`", command.name());
    let (exit_status, divert) = (builtin.execute)(env, command.args().to_vec());
    env.exit_status = exit_status;
    match divert {
        Some(divert) => Break(divert),
        None => Continue(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::env_with_builtins;
    use smash_env::semantics::{Divert, ExitStatus};
    use smash_env_test_helper::assert_stdout;
    use smash_syntax::parser::parse;

    fn simple(line: &str) -> syntax::SimpleCommand {
        match parse(line) {
            Ok(Some(syntax::Command::Simple(command))) => command,
            other => panic!("not a simple command: {other:?}"),
        }
    }

    #[test]
    fn builtin_receives_arguments_without_name() {
        let (mut env, state) = env_with_builtins();
        let result = simple("echo  one two").execute(&mut env);
        assert_eq!(result, Continue(()));
        assert_stdout(&state, |stdout| assert_eq!(stdout, "one two\n"));
    }

    #[test]
    fn background_marker_is_ignored_for_builtin() {
        let (mut env, state) = env_with_builtins();
        let result = simple("echo bg &").execute(&mut env);
        assert_eq!(result, Continue(()));
        assert!(env.jobs.is_empty());
        assert_stdout(&state, |stdout| assert_eq!(stdout, "bg\n"));
    }

    #[test]
    fn builtin_divert_is_propagated() {
        let (mut env, _state) = env_with_builtins();
        let result = simple("exit 5").execute(&mut env);
        assert_eq!(result, Break(Divert::Exit(ExitStatus(5))));
        assert_eq!(env.exit_status, ExitStatus(5));
    }

    #[test]
    fn unknown_name_starts_external_utility() {
        let (mut env, state) = env_with_builtins();
        let result = simple("true").execute(&mut env);
        assert_eq!(result, Continue(()));
        assert_eq!(state.borrow().next_pid, 11);
    }
}
