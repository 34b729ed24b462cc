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

//! Shell startup

use self::args::Run;
use smash_env::Env;
use smash_env::system::{Signal, SignalHandling};

pub mod args;

/// Prepares the environment for the main read-eval loop.
///
/// This function sets the prompt, registers the built-ins, restores the
/// default disposition of `SIGPIPE` for child processes, and starts catching
/// the signals the shell handles. Failures to change signal dispositions are
/// reported but not fatal.
pub fn configure_environment(env: &mut Env, run: Run) {
    env.prompt = run.prompt;
    env.builtins
        .extend(smash_builtin::BUILTINS.iter().copied());

    // Rust sets SIGPIPE to SIG_IGN, which child processes would inherit.
    if let Err(errno) = env
        .system
        .sigaction(Signal::SIGPIPE, SignalHandling::Default)
    {
        env.print_system_error("sigaction", errno);
    }
    if let Err(errno) = env.install_signal_handlers() {
        env.print_system_error("sigaction", errno);
    }
    log::debug!("shell {} started", env.main_pid);
}

#[cfg(test)]
mod tests {
    use super::*;
    use smash_env::signal::HANDLED_SIGNALS;
    use smash_env_test_helper::virtual_env;

    #[test]
    fn environment_is_configured_from_run() {
        let (mut env, state) = virtual_env();
        let run = Run {
            prompt: "lab".to_string(),
            verbosity: 0,
        };

        configure_environment(&mut env, run);

        assert_eq!(env.prompt, "lab");
        for name in ["bg", "cd", "chprompt", "fg", "jobs", "kill", "pwd", "quit", "showpid"] {
            assert!(env.builtins.contains_key(name), "missing {name}");
        }
        let state = state.borrow();
        for signal in HANDLED_SIGNALS.into_iter().chain([Signal::SIGCHLD]) {
            assert_eq!(state.signal_handlings[&signal], SignalHandling::Catch);
            assert!(state.blocked_signals.contains(signal), "{signal}");
        }
        assert_eq!(
            state.signal_handlings[&Signal::SIGPIPE],
            SignalHandling::Default
        );
        assert!(env.signal_mask.is_some());
    }
}
