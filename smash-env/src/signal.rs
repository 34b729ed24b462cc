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

//! Signal reconciliation
//!
//! The shell catches three signals:
//!
//! - `SIGTSTP`, a stop request from the terminal (ctrl-Z),
//! - `SIGINT`, an interrupt request from the terminal (ctrl-C), and
//! - `SIGALRM`, the expiry of the alarm timer armed by the
//!   [timeout queue](crate::timeout).
//!
//! The signal handler installed by [`Env::install_signal_handlers`] only
//! records the signal. The shell state is brought up to date by
//! [`Env::reconcile_signals`], which the shell calls at the top of every
//! read-eval cycle and whenever a blocking read or wait is interrupted by a
//! signal.
//!
//! The caught signals are kept blocked except while the shell waits in
//! [`System::select`](crate::System::select), so a signal arriving after the
//! shell has handled the caught signals but before it starts waiting still
//! interrupts the wait. `SIGCHLD` is caught for the same purpose: it wakes the
//! shell up when a child it waits for changes state, and needs no handling of
//! its own. Each recorded signal is then handled by the corresponding function
//! of this module, in the order the signals arrived. Because the handlers run
//! in the main control flow, they see the shell state between two statements,
//! never in the middle of an update.
//!
//! Children of the shell run in their own process groups, so the terminal
//! sends `SIGTSTP` and `SIGINT` to the shell only. The handlers forward them
//! to the foreground process as `SIGSTOP` and `SIGKILL`.

use crate::Env;
use crate::job::JobState;
use crate::system::SigSet;
use crate::system::SigmaskHow;
use crate::system::Signal;
use crate::system::SignalHandling;
use crate::timeout::Expiry;

/// Signals the shell catches
pub const HANDLED_SIGNALS: [Signal; 3] = [Signal::SIGTSTP, Signal::SIGINT, Signal::SIGALRM];

impl Env {
    /// Installs the signal handler for the [`HANDLED_SIGNALS`] and `SIGCHLD`
    /// and blocks those signals.
    ///
    /// The mask in effect before blocking is saved in
    /// [`Env::signal_mask`].
    pub fn install_signal_handlers(&mut self) -> nix::Result<()> {
        let mut caught = SigSet::empty();
        for signal in HANDLED_SIGNALS.into_iter().chain([Signal::SIGCHLD]) {
            self.system.sigaction(signal, SignalHandling::Catch)?;
            caught.add(signal);
        }

        let mut old_mask = SigSet::empty();
        self.system
            .sigmask(SigmaskHow::SIG_BLOCK, Some(&caught), Some(&mut old_mask))?;
        self.signal_mask = Some(old_mask);
        Ok(())
    }

    /// Handles the signals caught since the last call.
    pub fn reconcile_signals(&mut self) {
        for signal in self.system.caught_signals() {
            log::debug!("handling caught {signal}");
            match signal {
                Signal::SIGTSTP => handle_stop_request(self),
                Signal::SIGINT => handle_interrupt_request(self),
                Signal::SIGALRM => handle_timer_expiry(self),
                Signal::SIGCHLD => (),
                _ => log::debug!("no handler for {signal}"),
            }
        }
    }
}

/// Stops the foreground process and turns it into a stopped job.
///
/// Finished jobs are reaped first. Only the processes of jobs are collected,
/// so a child the shell is waiting for keeps its exit status. If there is no
/// foreground process, nothing else happens. Otherwise, the process is sent `SIGSTOP`; only if that
/// succeeds, the process is added to the job list as stopped (or its existing
/// job is marked stopped) and the foreground slot is cleared.
pub fn handle_stop_request(env: &mut Env) {
    env.jobs.reap_finished_jobs(&mut *env.system);
    env.print("smash: got ctrl-Z\n");

    let Some(process) = env.foreground.get().cloned() else {
        return;
    };
    if let Err(errno) = env.system.kill(process.pid, Signal::SIGSTOP) {
        env.print_system_error("kill", errno);
        return;
    }

    let now = env.system.now();
    env.jobs
        .add(process.name, process.pid, JobState::Stopped, now);
    env.foreground.clear();
    env.print(&format!("smash: process {} was stopped\n", process.pid));
}

/// Kills the foreground process.
///
/// The foreground slot and the job list are left as they are. The slot is
/// cleared when the shell's wait for the process observes its termination.
pub fn handle_interrupt_request(env: &mut Env) {
    env.print("smash: got ctrl-C\n");

    let Some(pid) = env.foreground.get().map(|process| process.pid) else {
        return;
    };
    match env.system.kill(pid, Signal::SIGKILL) {
        Ok(()) => env.print(&format!("smash: process {pid} was killed\n")),
        Err(errno) => env.print_system_error("kill", errno),
    }
}

/// Terminates the processes whose timeouts have expired.
pub fn handle_timer_expiry(env: &mut Env) {
    env.print("smash: got an alarm\n");

    let now = env.system.now();
    let expiries = env
        .timeouts
        .on_timer_fired(&mut *env.system, &mut env.jobs, now);
    for expiry in expiries {
        match expiry {
            Expiry::Killed(entry) => env.print(&format!("smash: {} timed out!\n", entry.command)),
            Expiry::KillFailed(_, errno) => env.print_system_error("kill", errno),
        }
    }
}
