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

//! Timeout queue
//!
//! A command run with `timeout N` gets a [`TimeoutEntry`] with the deadline
//! `N` seconds after the command started. The process has only one alarm
//! timer, so the [`TimeoutQueue`] keeps the entries sorted by deadline and
//! always arms the timer for the earliest one:
//!
//! - Scheduling a deadline earlier than the one the timer is armed for (or
//!   scheduling into an empty queue) rearms the timer. Scheduling a later
//!   deadline leaves the timer alone.
//! - When the timer fires, every entry whose deadline has been reached is
//!   handled and the timer is rearmed for the new earliest entry, or left
//!   disarmed if none remains.
//!
//! The alarm timer has a resolution of whole seconds. The number of seconds
//! armed is rounded up so that the timer never fires before the deadline.

use crate::job::JobList;
use crate::system::Errno;
use crate::system::Pid;
use crate::system::Signal;
use crate::system::System;
use crate::system::WaitPidFlag;
use std::time::Duration;
use std::time::Instant;
use thiserror::Error;

/// Signal sent to a process whose deadline has been reached
pub const TIMEOUT_SIGNAL: Signal = Signal::SIGKILL;

/// Scheduled forced termination of a process
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TimeoutEntry {
    /// Process to terminate
    pub pid: Pid,
    /// Command line as the user typed it, including the `timeout` prefix
    pub command: String,
    /// Time at which the process is terminated
    pub deadline: Instant,
    /// Whether the timed command was started in the background
    pub is_background: bool,
}

/// Outcome of an entry whose deadline has been reached
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Expiry {
    /// The process was alive and has been sent [`TIMEOUT_SIGNAL`].
    Killed(TimeoutEntry),
    /// The process was alive but sending the signal failed.
    KillFailed(TimeoutEntry, Errno),
}

/// Error returned when a deadline cannot be represented
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("timeout: invalid arguments")]
pub struct DeadlineOutOfRange;

/// Computes the deadline `duration` after `now`.
pub fn deadline_after(now: Instant, duration: Duration) -> Result<Instant, DeadlineOutOfRange> {
    now.checked_add(duration).ok_or(DeadlineOutOfRange)
}

/// Collection of timeout entries sorted by deadline
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TimeoutQueue {
    entries: Vec<TimeoutEntry>,
    armed: Option<Instant>,
}

/// Computes the number of seconds to arm the alarm timer for.
///
/// The result is rounded up and at least 1, because arming the timer for zero
/// seconds would disarm it instead.
fn alarm_seconds(deadline: Instant, now: Instant) -> u32 {
    let remaining = deadline.saturating_duration_since(now);
    let mut seconds = remaining.as_secs();
    if remaining.subsec_nanos() > 0 {
        seconds += 1;
    }
    seconds.clamp(1, u32::MAX.into()) as u32
}

impl TimeoutQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entries in deadline order.
    #[must_use]
    pub fn entries(&self) -> &[TimeoutEntry] {
        &self.entries
    }

    /// Returns the deadline the timer is currently armed for.
    #[must_use]
    pub fn armed(&self) -> Option<Instant> {
        self.armed
    }

    /// Whether no entries are pending
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds an entry with the deadline `now + duration`.
    ///
    /// The entry is inserted after existing entries with the same deadline.
    /// The alarm timer is rearmed if the new entry is the earliest one.
    ///
    /// If the deadline overflows, the queue and the timer are left unchanged.
    pub fn schedule(
        &mut self,
        system: &mut dyn System,
        command: String,
        pid: Pid,
        duration: Duration,
        now: Instant,
        is_background: bool,
    ) -> Result<(), DeadlineOutOfRange> {
        let deadline = deadline_after(now, duration)?;
        let index = self
            .entries
            .partition_point(|entry| entry.deadline <= deadline);
        log::debug!("scheduling timeout of `{command}` (pid {pid}) in {duration:?}");
        self.entries.insert(
            index,
            TimeoutEntry {
                pid,
                command,
                deadline,
                is_background,
            },
        );

        if self.armed.is_none_or(|armed| deadline < armed) {
            self.arm(system, deadline, now);
        }
        Ok(())
    }

    fn arm(&mut self, system: &mut dyn System, deadline: Instant, now: Instant) {
        let seconds = alarm_seconds(deadline, now);
        log::trace!("arming alarm for {seconds} seconds");
        system.set_alarm(seconds);
        self.armed = Some(deadline);
    }

    /// Handles the firing of the alarm timer.
    ///
    /// Every entry whose deadline is not after `now` is removed from the
    /// queue. If the entry's process has already terminated, the entry is
    /// discarded silently. Otherwise, the process is sent [`TIMEOUT_SIGNAL`]
    /// and its job, if any, is removed from `jobs`. Whether a process is
    /// still alive is checked by waiting for it without blocking, so a
    /// process that has exited is never signaled.
    ///
    /// The timer is then rearmed for the earliest remaining entry. The
    /// entries of the processes that were alive are returned so that the
    /// caller can report them.
    pub fn on_timer_fired(
        &mut self,
        system: &mut dyn System,
        jobs: &mut JobList,
        now: Instant,
    ) -> Vec<Expiry> {
        let due = self.entries.partition_point(|entry| entry.deadline <= now);
        let mut expiries = Vec::new();

        for entry in self.entries.drain(..due) {
            match system.wait(Some(entry.pid), WaitPidFlag::WNOHANG) {
                Ok(Some((_, state))) if state.is_finished() => {
                    log::debug!("timed process {} already finished", entry.pid);
                    jobs.remove_by_pid(entry.pid);
                    continue;
                }
                Err(Errno::ECHILD) => {
                    log::debug!("timed process {} already collected", entry.pid);
                    jobs.remove_by_pid(entry.pid);
                    continue;
                }
                Err(errno) => log::warn!("cannot check timed process {}: {errno}", entry.pid),
                Ok(_) => (),
            }

            match system.kill(entry.pid, TIMEOUT_SIGNAL) {
                Ok(()) => {
                    jobs.remove_by_pid(entry.pid);
                    expiries.push(Expiry::Killed(entry));
                }
                Err(errno) => expiries.push(Expiry::KillFailed(entry, errno)),
            }
        }

        match self.entries.first().map(|entry| entry.deadline) {
            Some(deadline) => self.arm(system, deadline, now),
            None => {
                system.cancel_alarm();
                self.armed = None;
            }
        }

        expiries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VirtualSystem;
    use crate::job::JobState;
    use crate::semantics::ExitStatus;
    use crate::system::ProcessState;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn alarm_seconds_rounds_up() {
        let now = Instant::now();
        assert_eq!(alarm_seconds(now + secs(2), now), 2);
        assert_eq!(alarm_seconds(now + Duration::from_millis(1500), now), 2);
        assert_eq!(alarm_seconds(now, now), 1);
        assert_eq!(alarm_seconds(now, now + secs(3)), 1);
    }

    #[test]
    fn overflowing_deadline_is_rejected() {
        let mut system = VirtualSystem::new();
        let mut queue = TimeoutQueue::new();
        let now = system.now();

        let result = queue.schedule(
            &mut system,
            "timeout 18446744073709551615 sleep 1".into(),
            Pid::from_raw(10),
            Duration::from_secs(u64::MAX),
            now,
            false,
        );

        assert_eq!(result, Err(DeadlineOutOfRange));
        assert!(queue.is_empty());
        assert_eq!(queue.armed(), None);
        let state = system.state.borrow();
        assert_eq!(state.alarm, None);
        assert!(state.alarm_history.is_empty());
    }

    #[test]
    fn largest_alarm_deadline_is_accepted() {
        let now = Instant::now();
        let duration = Duration::from_secs(u32::MAX.into());
        assert_eq!(deadline_after(now, duration), Ok(now + duration));
        assert_eq!(deadline_after(now, Duration::MAX), Err(DeadlineOutOfRange));
    }

    #[test]
    fn earlier_deadline_rearms_and_later_does_not() {
        let mut system = VirtualSystem::new();
        let mut queue = TimeoutQueue::new();
        let now = system.now();
        let (p1, p2, p3) = (Pid::from_raw(10), Pid::from_raw(11), Pid::from_raw(12));

        queue.schedule(&mut system, "timeout 2 sleep 10".into(), p1, secs(2), now, false).unwrap();
        assert_eq!(system.state.borrow().alarm_history, [2]);
        assert_eq!(queue.armed(), Some(now + secs(2)));

        queue.schedule(&mut system, "timeout 10 sleep 1".into(), p2, secs(10), now, true).unwrap();
        assert_eq!(system.state.borrow().alarm_history, [2]);

        queue.schedule(&mut system, "timeout 1 sleep 1".into(), p3, secs(1), now, false).unwrap();
        assert_eq!(system.state.borrow().alarm_history, [2, 1]);
        assert_eq!(queue.armed(), Some(now + secs(1)));

        let pids: Vec<_> = queue.entries().iter().map(|entry| entry.pid).collect();
        assert_eq!(pids, [p3, p1, p2]);
    }

    #[test]
    fn equal_deadlines_keep_insertion_order() {
        let mut system = VirtualSystem::new();
        let mut queue = TimeoutQueue::new();
        let now = system.now();
        for n in 0..3 {
            queue.schedule(&mut system, format!("c{n}"), Pid::from_raw(10 + n), secs(5), now, false).unwrap();
        }
        let names: Vec<_> = queue.entries().iter().map(|e| e.command.as_str()).collect();
        assert_eq!(names, ["c0", "c1", "c2"]);
        assert_eq!(system.state.borrow().alarm_history, [5]);
    }

    #[test]
    fn firing_kills_live_process_and_rearms_for_next() {
        let mut system = VirtualSystem::new();
        let (p1, p2) = {
            let mut state = system.state.borrow_mut();
            (state.spawn_child(), state.spawn_child())
        };
        let mut queue = TimeoutQueue::new();
        let mut jobs = JobList::new();
        let now = system.now();
        jobs.add("timeout 2 sleep 10".into(), p1, JobState::Running, now);
        queue.schedule(&mut system, "timeout 2 sleep 10 &".into(), p1, secs(2), now, true).unwrap();
        queue.schedule(&mut system, "timeout 7 sleep 10".into(), p2, secs(7), now, false).unwrap();

        let expiries = queue.on_timer_fired(&mut system, &mut jobs, now + secs(2));

        assert_eq!(expiries.len(), 1);
        match &expiries[0] {
            Expiry::Killed(entry) => assert_eq!(entry.command, "timeout 2 sleep 10 &"),
            other => panic!("unexpected expiry: {other:?}"),
        }
        assert!(jobs.is_empty());
        let state = system.state.borrow();
        assert_eq!(state.sent_signals, [(p1, Signal::SIGKILL)]);
        assert_eq!(state.alarm_history, [2, 5]);
        assert_eq!(queue.armed(), Some(now + secs(7)));
        assert_eq!(queue.entries().len(), 1);
    }

    #[test]
    fn firing_discards_exited_process_without_signal() {
        let mut system = VirtualSystem::new();
        let p1 = system.state.borrow_mut().spawn_child();
        let mut queue = TimeoutQueue::new();
        let mut jobs = JobList::new();
        let now = system.now();
        queue.schedule(&mut system, "timeout 1 true".into(), p1, secs(1), now, false).unwrap();
        // The process exits before the deadline.
        system.state.borrow_mut().processes.get_mut(&p1).unwrap().set_state(
            ProcessState::Exited(ExitStatus::SUCCESS),
        );

        let expiries = queue.on_timer_fired(&mut system, &mut jobs, now + secs(1));

        assert!(expiries.is_empty());
        assert!(queue.is_empty());
        assert_eq!(queue.armed(), None);
        let state = system.state.borrow();
        assert_eq!(state.alarm, None);
        assert!(state.sent_signals.is_empty());
        assert_eq!(state.alarm_history, [1]);
    }

    #[test]
    fn firing_discards_already_reaped_process_and_rearms() {
        let mut system = VirtualSystem::new();
        let p2 = system.state.borrow_mut().spawn_child();
        let mut queue = TimeoutQueue::new();
        let mut jobs = JobList::new();
        let now = system.now();
        // Pid 500 is not a child any more.
        queue.schedule(&mut system, "timeout 1 a".into(), Pid::from_raw(500), secs(1), now, true).unwrap();
        queue.schedule(&mut system, "timeout 4 b".into(), p2, secs(4), now, false).unwrap();

        let expiries = queue.on_timer_fired(&mut system, &mut jobs, now + secs(1));

        assert!(expiries.is_empty());
        assert!(system.state.borrow().sent_signals.is_empty());
        assert_eq!(system.state.borrow().alarm_history, [1, 3]);
        assert_eq!(queue.entries()[0].pid, p2);
    }

    #[test]
    fn firing_handles_all_due_entries() {
        let mut system = VirtualSystem::new();
        let (p1, p2) = {
            let mut state = system.state.borrow_mut();
            (state.spawn_child(), state.spawn_child())
        };
        let mut queue = TimeoutQueue::new();
        let mut jobs = JobList::new();
        let now = system.now();
        queue.schedule(&mut system, "timeout 1 a".into(), p1, secs(1), now, false).unwrap();
        queue.schedule(&mut system, "timeout 2 b".into(), p2, secs(2), now, false).unwrap();

        // The alarm was delivered late.
        let expiries = queue.on_timer_fired(&mut system, &mut jobs, now + secs(3));

        assert_eq!(expiries.len(), 2);
        assert!(queue.is_empty());
        assert_eq!(queue.armed(), None);
    }

    #[test]
    fn early_firing_rearms_for_head() {
        let mut system = VirtualSystem::new();
        let p1 = system.state.borrow_mut().spawn_child();
        let mut queue = TimeoutQueue::new();
        let mut jobs = JobList::new();
        let now = system.now();
        queue.schedule(&mut system, "timeout 5 a".into(), p1, secs(5), now, false).unwrap();

        let expiries = queue.on_timer_fired(&mut system, &mut jobs, now + secs(3));

        assert!(expiries.is_empty());
        assert_eq!(system.state.borrow().alarm_history, [5, 2]);
        assert_eq!(queue.entries().len(), 1);
    }
}
