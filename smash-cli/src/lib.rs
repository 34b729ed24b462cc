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

//! This is an internal library crate for the smash shell. **This crate is not
//! intended to be used as a library by other crates.**
//!
//! The entry point for the shell is the [`main`] function, which is to be used
//! as the `main` function in the binary crate. The function sets up the shell
//! environment and runs the main read-eval loop.

pub mod logger;
pub mod startup;

use self::startup::args::{self, Parse};
use smash_env::Env;
use smash_env::RealSystem;
use smash_env::io::Fd;
use smash_env::semantics::ExitStatus;
use smash_semantics::read_eval_loop;

const USAGE: &str = "\
Usage: smash [OPTION]...

Options:
  -p, --prompt NAME  print NAME> as the prompt (default: smash)
  -v, --verbose      print diagnostic messages; repeat for more
  -h, --help         print this help and exit
  -V, --version      print version information and exit
";

fn print_version(env: &mut Env) -> ExitStatus {
    let version = env!("CARGO_PKG_VERSION");
    env.print(&format!("smash {version}\n"));
    ExitStatus::SUCCESS
}

/// Runs the shell in the environment with the command line arguments.
///
/// Returns the exit status the shell process should exit with.
pub fn run_as_shell_process<I, S>(env: &mut Env, args: I) -> ExitStatus
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let run = match args::parse(args) {
        Ok(Parse::Run(run)) => run,
        Ok(Parse::Help) => {
            env.print(USAGE);
            return ExitStatus::SUCCESS;
        }
        Ok(Parse::Version) => return print_version(env),
        Err(e) => {
            let message = format!("smash: {e}\n");
            _ = env.system.write_all(Fd::STDERR, message.as_bytes());
            return ExitStatus::ERROR;
        }
    };

    if let Err(e) = logger::init(run.verbosity) {
        env.print_error(format_args!("cannot set up logging: {e}"));
    }
    startup::configure_environment(env, run);

    read_eval_loop(env)
}

pub fn main() -> ! {
    // SAFETY: This is the only instance of RealSystem we create in the whole
    // process.
    let system = unsafe { RealSystem::new() };
    let mut env = Env::with_system(Box::new(system));
    let exit_status = run_as_shell_process(&mut env, std::env::args());
    env.system.exit(exit_status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use smash_env_test_helper::{assert_stderr, assert_stdout, virtual_env};

    #[test]
    fn version_is_printed() {
        let (mut env, state) = virtual_env();
        let exit_status = run_as_shell_process(&mut env, ["smash", "--version"]);
        assert_eq!(exit_status, ExitStatus::SUCCESS);
        assert_stdout(&state, |stdout| {
            assert_eq!(stdout, format!("smash {}\n", env!("CARGO_PKG_VERSION")))
        });
    }

    #[test]
    fn help_is_printed() {
        let (mut env, state) = virtual_env();
        let exit_status = run_as_shell_process(&mut env, ["smash", "-h"]);
        assert_eq!(exit_status, ExitStatus::SUCCESS);
        assert_stdout(&state, |stdout| assert_eq!(stdout, USAGE));
    }

    #[test]
    fn unknown_option_is_an_error() {
        let (mut env, state) = virtual_env();
        let exit_status = run_as_shell_process(&mut env, ["smash", "-x"]);
        assert_eq!(exit_status, ExitStatus::ERROR);
        assert_stderr(&state, |stderr| {
            assert_eq!(stderr, "smash: unknown option `x`\n")
        });
    }
}
