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

//! Foreground process tracking
//!
//! The [`ForegroundSlot`] records the one process the shell is blocked on, if
//! any. [`Env::wait_for_foreground`] sets the slot, waits for the process,
//! and clears the slot again. While the shell waits, a stop request (see
//! [`signal`](crate::signal)) may stop the process and move it to the job
//! list; the wait then ends early.

use crate::Env;
use crate::job::JobState;
use crate::semantics::ExitStatus;
use crate::system::Errno;
use crate::system::Pid;
use crate::system::ProcessState;
use crate::system::WaitPidFlag;

/// Process the shell is waiting for in the foreground
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ForegroundProcess {
    /// Process ID
    pub pid: Pid,
    /// Command line that started the process
    pub name: String,
}

/// Single-entry record of the foreground process
///
/// The process ID and the command line are stored and read together, so a
/// reader never observes one without the other.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ForegroundSlot(Option<ForegroundProcess>);

impl ForegroundSlot {
    /// Records the process, replacing any previous one.
    pub fn set(&mut self, pid: Pid, name: String) {
        self.0 = Some(ForegroundProcess { pid, name });
    }

    /// Empties the slot, returning the process that was in it.
    pub fn clear(&mut self) -> Option<ForegroundProcess> {
        self.0.take()
    }

    /// Returns the process in the slot.
    #[must_use]
    pub fn get(&self) -> Option<&ForegroundProcess> {
        self.0.as_ref()
    }

    /// Whether the slot holds the process with the ID
    #[must_use]
    pub fn holds(&self, pid: Pid) -> bool {
        self.0.as_ref().is_some_and(|process| process.pid == pid)
    }

    /// Whether the slot is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

impl Env {
    /// Waits for a process in the foreground.
    ///
    /// The process is recorded in the [foreground slot](Env::foreground)
    /// while the shell is blocked, so that stop and interrupt requests can
    /// reach it. The wait ends when:
    ///
    /// - the process terminates, in which case the slot is cleared and the
    ///   exit status of the process is returned;
    /// - a stop request moves the process to the job list, in which case the
    ///   slot has already been cleared by the request;
    /// - the process is stopped by some other means, in which case it is added
    ///   to the job list as a stopped job, like a stop request would do;
    /// - the process has disappeared (`ECHILD`), which happens if a timeout
    ///   check collected its exit status first; the exit status is unknown
    ///   and reported as success.
    ///
    /// Caught signals are handled whenever the wait is interrupted.
    pub fn wait_for_foreground(&mut self, pid: Pid, name: String) -> nix::Result<ExitStatus> {
        self.foreground.set(pid, name);
        loop {
            match self.wait_for_state_change(pid, WaitPidFlag::WUNTRACED) {
                Ok(Some((_, ProcessState::Exited(exit_status)))) => {
                    self.foreground.clear();
                    return Ok(exit_status);
                }
                Ok(Some((_, ProcessState::Signaled(signal)))) => {
                    self.foreground.clear();
                    return Ok(ExitStatus::from(signal));
                }
                Ok(Some((_, ProcessState::Stopped(signal)))) => {
                    if let Some(process) = self.foreground.clear() {
                        let now = self.system.now();
                        self.jobs
                            .add(process.name, process.pid, JobState::Stopped, now);
                        self.print(&format!("smash: process {pid} was stopped\n"));
                    }
                    return Ok(ExitStatus::from(signal));
                }
                Ok(_) => (),
                Err(Errno::EINTR) => {
                    self.reconcile_signals();
                    if !self.foreground.holds(pid) {
                        log::debug!("stopped waiting for process {pid}");
                        return Ok(ExitStatus::from(crate::system::Signal::SIGSTOP));
                    }
                }
                Err(Errno::ECHILD) => {
                    self.foreground.clear();
                    return Ok(ExitStatus::SUCCESS);
                }
                Err(errno) => {
                    self.foreground.clear();
                    return Err(errno);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::System;
    use crate::VirtualSystem;
    use crate::system::Signal;

    fn env_with_system() -> (Env, VirtualSystem) {
        let system = VirtualSystem::new();
        let env = Env::with_system(Box::new(system.clone()));
        (env, system)
    }

    #[test]
    fn slot_set_get_clear() {
        let mut slot = ForegroundSlot::default();
        assert!(slot.is_empty());
        slot.set(Pid::from_raw(5), "sleep 1".to_string());
        assert!(slot.holds(Pid::from_raw(5)));
        assert!(!slot.holds(Pid::from_raw(6)));
        assert_eq!(slot.get().unwrap().name, "sleep 1");
        let process = slot.clear().unwrap();
        assert_eq!(process.pid, Pid::from_raw(5));
        assert!(slot.is_empty());
        assert_eq!(slot.clear(), None);
    }

    #[test]
    fn slot_is_cleared_after_process_exits() {
        let (mut env, system) = env_with_system();
        let pid = system.state.borrow_mut().spawn_child();

        let result = env.wait_for_foreground(pid, "true".to_string());

        assert_eq!(result, Ok(ExitStatus::SUCCESS));
        assert!(env.foreground.is_empty());
        assert!(env.jobs.is_empty());
    }

    #[test]
    fn stop_request_while_waiting_moves_process_to_jobs() {
        let (mut env, system) = env_with_system();
        let pid = system.state.borrow_mut().spawn_child();
        system.state.borrow_mut().caught_signals.push(Signal::SIGTSTP);

        let result = env.wait_for_foreground(pid, "sleep 100".to_string());

        assert_eq!(result, Ok(ExitStatus::from(Signal::SIGSTOP)));
        assert!(env.foreground.is_empty());
        let id = env.jobs.find_by_pid(pid).unwrap();
        let job = env.jobs.get(id).unwrap();
        assert_eq!(job.name, "sleep 100");
        assert_eq!(job.state, JobState::Stopped);
        let stdout = system.state.borrow().file_content("/dev/stdout").unwrap();
        assert_eq!(
            stdout,
            format!("smash: got ctrl-Z\nsmash: process {pid} was stopped\n")
        );
    }

    #[test]
    fn interrupt_request_while_waiting_kills_process() {
        let (mut env, system) = env_with_system();
        let pid = system.state.borrow_mut().spawn_child();
        system.state.borrow_mut().caught_signals.push(Signal::SIGINT);

        let result = env.wait_for_foreground(pid, "sleep 100".to_string());

        assert_eq!(result, Ok(ExitStatus::from(Signal::SIGKILL)));
        assert!(env.foreground.is_empty());
        assert!(env.jobs.is_empty());
        let stdout = system.state.borrow().file_content("/dev/stdout").unwrap();
        assert_eq!(
            stdout,
            format!("smash: got ctrl-C\nsmash: process {pid} was killed\n")
        );
    }

    #[test]
    fn process_stopped_externally_becomes_stopped_job() {
        let (mut env, system) = env_with_system();
        let pid = system.state.borrow_mut().spawn_child();
        system.clone().kill(pid, Signal::SIGTSTP).unwrap();

        let result = env.wait_for_foreground(pid, "vi".to_string());

        assert_eq!(result, Ok(ExitStatus::from(Signal::SIGTSTP)));
        assert!(env.foreground.is_empty());
        let id = env.jobs.find_by_pid(pid).unwrap();
        assert_eq!(env.jobs.get(id).unwrap().state, JobState::Stopped);
    }

    #[test]
    fn vanished_process_clears_slot() {
        let (mut env, _system) = env_with_system();
        let result = env.wait_for_foreground(Pid::from_raw(77), "gone".to_string());
        assert_eq!(result, Ok(ExitStatus::SUCCESS));
        assert!(env.foreground.is_empty());
    }
}
