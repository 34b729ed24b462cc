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

//! This crate defines the shell execution environment.
//!
//! A shell execution environment, [`Env`], is a collection of data that may
//! affect or be affected by the execution of commands. The environment
//! consists of application-managed parts and system-managed parts.
//! Application-managed parts are implemented in pure Rust in this crate:
//! the [job list](job::JobList), the [foreground slot](foreground), and the
//! [timeout queue](timeout). System-managed parts, such as processes, file
//! descriptors, signals, and the alarm timer, are reached through the
//! [`System`] trait.
//!
//! There is exactly one `Env` for the shell process, passed explicitly to
//! everything that reads or changes the shell state. Signal handlers never
//! touch the `Env`; they only record the signal, and the [`signal`] module
//! applies the effects when the main control flow reaches a point where it
//! drains the record.

pub mod builtin;
pub mod foreground;
pub mod input;
pub mod io;
pub mod job;
pub mod semantics;
pub mod signal;
pub mod system;
pub mod timeout;

use self::builtin::Builtin;
use self::foreground::ForegroundSlot;
use self::io::Fd;
use self::job::JobId;
use self::job::JobList;
use self::job::JobState;
use self::semantics::ExitStatus;
use self::system::Errno;
use self::system::ForkResult;
use self::system::Pid;
use self::system::ProcessState;
use self::system::SigSet;
use self::system::SigmaskHow;
use self::system::Signal;
pub use self::system::System;
use self::system::WaitPidFlag;
pub use self::system::real::RealSystem;
pub use self::system::r#virtual::VirtualSystem;
use self::timeout::TimeoutQueue;
use std::collections::HashMap;
use std::fmt::Display;
use std::path::PathBuf;

/// Whole shell execution environment.
#[derive(Debug)]
pub struct Env {
    /// Built-in utilities available in the environment
    pub builtins: HashMap<&'static str, Builtin>,

    /// Exit status of the last executed command
    pub exit_status: ExitStatus,

    /// Process the shell is currently waiting for in the foreground
    pub foreground: ForegroundSlot,

    /// Background and stopped jobs
    pub jobs: JobList,

    /// Process ID of the main shell process
    ///
    /// This process ID does not change in child processes.
    pub main_pid: Pid,

    /// Working directory before the last successful `cd`
    pub old_pwd: Option<PathBuf>,

    /// Prompt name, printed as `<prompt>> ` before reading a command
    pub prompt: String,

    /// Signal blocking mask in effect before the shell blocked the signals it
    /// catches
    ///
    /// This is `Some` once [`install_signal_handlers`](Self::install_signal_handlers)
    /// has blocked the signals. The shell then waits for input and child
    /// processes only in [`System::select`] with this mask, so a signal is
    /// never caught between handling caught signals and starting to wait.
    pub signal_mask: Option<SigSet>,

    /// Pending forced terminations of timed commands
    pub timeouts: TimeoutQueue,

    /// Interface to the system-managed parts of the environment
    pub system: Box<dyn System>,
}

impl Env {
    /// Prompt name used when none is set
    pub const DEFAULT_PROMPT: &'static str = "smash";

    /// Creates a new environment with the given system.
    ///
    /// Members of the new environments are default-constructed except that
    /// `main_pid` is initialized as `system.getpid()`.
    pub fn with_system(system: Box<dyn System>) -> Env {
        Env {
            builtins: Default::default(),
            exit_status: Default::default(),
            foreground: Default::default(),
            jobs: Default::default(),
            main_pid: system.getpid(),
            old_pwd: None,
            prompt: Self::DEFAULT_PROMPT.to_string(),
            signal_mask: None,
            timeouts: Default::default(),
            system,
        }
    }

    /// Creates a new environment with a default-constructed [`VirtualSystem`].
    pub fn new_virtual() -> Env {
        Env::with_system(Box::new(VirtualSystem::new()))
    }

    /// Prints a text to the standard output.
    ///
    /// If writing fails, the failure is reported on the standard error.
    pub fn print(&mut self, text: &str) {
        if let Err(errno) = self.system.write_all(Fd::STDOUT, text.as_bytes()) {
            self.print_system_error("write", errno);
        }
    }

    /// Prints an error message to the standard error.
    ///
    /// The message is prefixed with `smash error: ` and followed by a
    /// newline. Any errors that may happen writing to the standard error are
    /// ignored.
    pub fn print_error(&mut self, message: impl Display) {
        let line = format!("smash error: {message}\n");
        let _ = self.system.write_all(Fd::STDERR, line.as_bytes());
    }

    /// Prints an error message describing a failed system call.
    ///
    /// The message has the form `smash error: <operation> failed: <reason>`.
    pub fn print_system_error(&mut self, operation: &str, errno: Errno) {
        self.print_error(format_args!("{operation} failed: {}", errno.desc()));
    }

    /// Starts a child process that runs the task.
    ///
    /// In the parent, this function returns the process ID of the child. In
    /// the child, the [signal mask](Self::signal_mask) is restored, the task is
    /// run with the environment of the child, and the process exits with the
    /// resulting [`exit_status`](Self::exit_status); this function never
    /// returns there.
    pub fn start_child<F>(&mut self, task: F) -> nix::Result<Pid>
    where
        F: FnOnce(&mut Env),
    {
        match self.system.new_child_process()? {
            ForkResult::Parent { child } => {
                log::debug!("started child process {child}");
                Ok(child)
            }
            ForkResult::Child => {
                if let Some(mask) = self.signal_mask.take() {
                    let restored = self.system.sigmask(SigmaskHow::SIG_SETMASK, Some(&mask), None);
                    if let Err(errno) = restored {
                        self.print_system_error("sigprocmask", errno);
                    }
                }
                task(self);
                let exit_status = self.exit_status;
                self.system.exit(exit_status)
            }
        }
    }

    /// Waits for a child process to terminate.
    ///
    /// The process is not recorded in the foreground slot, so stop and
    /// interrupt requests do not affect it. Caught signals are handled while
    /// waiting.
    pub fn wait_for_child(&mut self, pid: Pid) -> nix::Result<ExitStatus> {
        loop {
            match self.wait_for_state_change(pid, WaitPidFlag::empty()) {
                Ok(Some((_, ProcessState::Exited(exit_status)))) => return Ok(exit_status),
                Ok(Some((_, ProcessState::Signaled(signal)))) => {
                    return Ok(ExitStatus::from(signal));
                }
                Ok(_) => (),
                Err(Errno::EINTR) => self.reconcile_signals(),
                Err(errno) => return Err(errno),
            }
        }
    }

    /// Waits for a state change of the child process.
    ///
    /// Without a [signal mask](Self::signal_mask), this is a blocking
    /// [`System::wait`]. Otherwise, the child is checked without blocking and,
    /// if there is nothing to report, the shell waits in [`System::select`]
    /// with the signals unblocked and `Ok(None)` is returned. Either way, a
    /// caught signal makes this function fail with `EINTR`.
    pub(crate) fn wait_for_state_change(
        &mut self,
        pid: Pid,
        options: WaitPidFlag,
    ) -> nix::Result<Option<(Pid, ProcessState)>> {
        let Some(mask) = self.signal_mask else {
            return self.system.wait(Some(pid), options);
        };
        match self.system.wait(Some(pid), options | WaitPidFlag::WNOHANG)? {
            Some(result) => Ok(Some(result)),
            None => {
                self.system.select(None, Some(&mask))?;
                Ok(None)
            }
        }
    }

    /// Sends `SIGCONT` to the job and marks it running.
    ///
    /// The job state is changed only if the signal was sent successfully.
    /// Fails with `ESRCH` if there is no such job.
    pub fn resume_job(&mut self, id: JobId) -> nix::Result<()> {
        self.signal_job(id, Signal::SIGCONT)
    }

    /// Sends `SIGSTOP` to the job and marks it stopped.
    ///
    /// The job state is changed only if the signal was sent successfully.
    /// Fails with `ESRCH` if there is no such job.
    pub fn suspend_job(&mut self, id: JobId) -> nix::Result<()> {
        self.signal_job(id, Signal::SIGSTOP)
    }

    /// Sends the signal to the process of the job.
    ///
    /// If the signal stops or continues the process, the job is marked
    /// accordingly (see [`JobState::after_signal`]). The job state is changed
    /// only if the signal was sent successfully. Fails with `ESRCH` if there
    /// is no such job.
    pub fn signal_job(&mut self, id: JobId, signal: Signal) -> nix::Result<()> {
        let pid = self.jobs.get(id).ok_or(Errno::ESRCH)?.pid;
        self.system.kill(pid, signal)?;
        if let Some(state) = JobState::after_signal(signal) {
            let now = self.system.now();
            if let Some(job) = self.jobs.get_mut(id) {
                job.set_state(state, now);
            }
        }
        Ok(())
    }
}
