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

//! This crate contains utility functions for use in tests that interact with
//! the shell environment ([`smash_env::Env`]).

use smash_env::Env;
use smash_env::VirtualSystem;
use smash_env::system::r#virtual::SystemState;
use std::cell::RefCell;
use std::rc::Rc;
use std::str::from_utf8;

/// Creates an environment with a new [`VirtualSystem`].
///
/// Returns the environment and a shared reference to the system state, which
/// the test can use to set up processes and files and to inspect the results.
pub fn virtual_env() -> (Env, Rc<RefCell<SystemState>>) {
    let system = VirtualSystem::new();
    let state = Rc::clone(&system.state);
    (Env::with_system(Box::new(system)), state)
}

fn assert_file<F, T>(state: &RefCell<SystemState>, path: &str, f: F) -> T
where
    F: FnOnce(&str) -> T,
{
    let state = state.borrow();
    let body = state.files[std::path::Path::new(path)].borrow();
    f(from_utf8(&body).unwrap())
}

/// Helper function for asserting on the content of /dev/stdout
///
/// This function asserts on the content of /dev/stdout. The argument function
/// `f` is called with the content of /dev/stdout as a string slice.
///
/// This function panics if /dev/stdout does not exist or does not contain a
/// valid UTF-8 string.
///
/// # Example
///
/// ```
/// # use smash_env::io::Fd;
/// # use smash_env::System;
/// # use smash_env_test_helper::{assert_stdout, virtual_env};
/// let (mut env, state) = virtual_env();
/// env.system.write(Fd::STDOUT, b"Hello, world!\n").unwrap();
/// assert_stdout(&state, |stdout| assert_eq!(stdout, "Hello, world!\n"));
/// ```
pub fn assert_stdout<F, T>(state: &RefCell<SystemState>, f: F) -> T
where
    F: FnOnce(&str) -> T,
{
    assert_file(state, "/dev/stdout", f)
}

/// Helper function for asserting on the content of /dev/stderr
///
/// This function is analogous to [`assert_stdout`]. See its documentation for
/// an example.
pub fn assert_stderr<F, T>(state: &RefCell<SystemState>, f: F) -> T
where
    F: FnOnce(&str) -> T,
{
    assert_file(state, "/dev/stderr", f)
}
