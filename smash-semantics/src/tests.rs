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

//! Helpers for unit tests

use smash_env::Env;
use smash_env::builtin::{self, Builtin};
use smash_env::semantics::{Divert, ExitStatus};

fn echo_main(env: &mut Env, args: Vec<String>) -> builtin::Result {
    env.print(&format!("{}\n", args.join(" ")));
    (ExitStatus::SUCCESS, None)
}

/// Returns a minimal implementation of the `echo` built-in.
pub fn echo_builtin() -> Builtin {
    Builtin { execute: echo_main }
}

fn exit_main(_env: &mut Env, args: Vec<String>) -> builtin::Result {
    let exit_status = args
        .first()
        .and_then(|arg| arg.parse().ok())
        .map_or(ExitStatus::SUCCESS, ExitStatus);
    (exit_status, Some(Divert::Exit(exit_status)))
}

/// Returns a built-in that requests the shell to exit with the status given
/// as the first argument.
pub fn exit_builtin() -> Builtin {
    Builtin { execute: exit_main }
}

/// Creates a virtual environment with the `echo` and `exit` built-ins.
pub fn env_with_builtins() -> (
    Env,
    std::rc::Rc<std::cell::RefCell<smash_env::system::r#virtual::SystemState>>,
) {
    let (mut env, state) = smash_env_test_helper::virtual_env();
    env.builtins.insert("echo", echo_builtin());
    env.builtins.insert("exit", exit_builtin());
    (env, state)
}
