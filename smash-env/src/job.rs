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

//! Type definitions for job management.
//!
//! A [`Job`] is a child process the shell is not currently waiting for
//! synchronously: one started in the background, or one that was stopped
//! while running in the foreground. Jobs are kept in a [`JobList`] and
//! identified by a [`JobId`].
//!
//! Job IDs are assigned as one more than the largest ID in the list, so IDs
//! start over from 1 whenever the list becomes empty. Since a new ID is always
//! the largest, iterating a job list in ID order is the same as iterating it
//! in the order the jobs were added.
//!
//! Lookups return a `JobId` rather than a reference into the list, so that a
//! caller can look up a job, modify the list, and look up the job again
//! without holding a borrow across the modification.

pub mod fmt;

use crate::system::Errno;
use crate::system::Pid;
use crate::system::Signal;
use crate::system::System;
use crate::system::WaitPidFlag;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::time::Instant;
use thiserror::Error;

/// Positive integer identifying a job in a [`JobList`]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct JobId(NonZeroUsize);

impl JobId {
    /// The ID of the first job in an empty list
    pub const FIRST: JobId = JobId(NonZeroUsize::MIN);

    /// Creates a job ID from a positive integer.
    ///
    /// Returns `None` if the number is zero.
    #[must_use]
    pub const fn new(id: usize) -> Option<JobId> {
        match NonZeroUsize::new(id) {
            Some(id) => Some(JobId(id)),
            None => None,
        }
    }

    /// Returns the number.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }

    /// Returns the ID that follows this one.
    #[must_use]
    pub fn next(self) -> JobId {
        JobId(self.0.saturating_add(1))
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Error in parsing a job ID
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid job-id `{0}`")]
pub struct ParseJobIdError(pub String);

/// Parses a positive decimal integer as a job ID.
impl FromStr for JobId {
    type Err = ParseJobIdError;
    fn from_str(s: &str) -> Result<JobId, ParseJobIdError> {
        s.parse::<usize>()
            .ok()
            .and_then(JobId::new)
            .ok_or_else(|| ParseJobIdError(s.to_owned()))
    }
}

/// Whether a job is running or stopped
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum JobState {
    Running,
    Stopped,
}

impl JobState {
    /// Returns the state a job is in after its process receives the signal,
    /// or `None` if the signal does not stop or continue the process.
    #[must_use]
    pub fn after_signal(signal: Signal) -> Option<JobState> {
        match signal {
            Signal::SIGSTOP | Signal::SIGTSTP | Signal::SIGTTIN | Signal::SIGTTOU => {
                Some(JobState::Stopped)
            }
            Signal::SIGCONT => Some(JobState::Running),
            _ => None,
        }
    }
}

/// Process tracked as a job
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Job {
    /// Process ID of the job's process
    pub pid: Pid,
    /// Command line that started the job, without the background marker
    pub name: String,
    /// Current state
    pub state: JobState,
    /// Time of the last transition into the current state
    pub state_since: Instant,
}

impl Job {
    /// Creates a job.
    #[must_use]
    pub fn new(pid: Pid, name: String, state: JobState, now: Instant) -> Self {
        Job {
            pid,
            name,
            state,
            state_since: now,
        }
    }

    /// Changes the state and restarts the elapsed time.
    pub fn set_state(&mut self, state: JobState, now: Instant) {
        self.state = state;
        self.state_since = now;
    }
}

/// Collection of jobs
///
/// At most one job exists for each process ID.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JobList {
    jobs: BTreeMap<JobId, Job>,
    next_id: JobId,
}

impl Default for JobList {
    fn default() -> Self {
        JobList {
            jobs: BTreeMap::new(),
            next_id: JobId::FIRST,
        }
    }
}

impl JobList {
    /// Creates an empty job list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of jobs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether the list has no jobs
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Returns the ID the next added job will get.
    #[must_use]
    pub fn next_id(&self) -> JobId {
        self.next_id
    }

    /// Adds a job and returns its ID.
    ///
    /// If a job with the same process ID already exists, that job is updated
    /// with the new name and state instead, and its ID is returned.
    pub fn add(&mut self, name: String, pid: Pid, state: JobState, now: Instant) -> JobId {
        if let Some(id) = self.find_by_pid(pid) {
            if let Some(job) = self.jobs.get_mut(&id) {
                job.name = name;
                job.set_state(state, now);
            }
            return id;
        }

        let id = self.next_id;
        log::debug!("adding job [{id}] {name} (pid {pid}, {state:?})");
        self.jobs.insert(id, Job::new(pid, name, state, now));
        self.next_id = id.next();
        id
    }

    /// Returns the job with the ID.
    #[must_use]
    pub fn get(&self, id: JobId) -> Option<&Job> {
        self.jobs.get(&id)
    }

    /// Returns the job with the ID.
    #[must_use]
    pub fn get_mut(&mut self, id: JobId) -> Option<&mut Job> {
        self.jobs.get_mut(&id)
    }

    /// Finds the job of the process.
    #[must_use]
    pub fn find_by_pid(&self, pid: Pid) -> Option<JobId> {
        self.jobs
            .iter()
            .find(|(_, job)| job.pid == pid)
            .map(|(&id, _)| id)
    }

    /// Removes the job with the ID.
    ///
    /// The next ID is recomputed after the removal. Does nothing if there is
    /// no such job.
    pub fn remove(&mut self, id: JobId) -> Option<Job> {
        let job = self.jobs.remove(&id)?;
        log::debug!("removed job [{id}] {}", job.name);
        self.recompute_next_id();
        Some(job)
    }

    /// Removes the job of the process.
    ///
    /// Does nothing if there is no such job.
    pub fn remove_by_pid(&mut self, pid: Pid) -> Option<(JobId, Job)> {
        let id = self.find_by_pid(pid)?;
        self.remove(id).map(|job| (id, job))
    }

    /// Returns the ID of the job with the largest ID.
    ///
    /// Returns `None` if the list is empty.
    #[must_use]
    pub fn largest(&self) -> Option<JobId> {
        self.jobs.keys().next_back().copied()
    }

    /// Returns the ID of the stopped job that comes first in the list.
    ///
    /// Despite the name, the job that was stopped most recently is not
    /// preferred: the first stopped job in ID order wins.
    #[must_use]
    pub fn most_recently_stopped(&self) -> Option<JobId> {
        self.jobs
            .iter()
            .find(|(_, job)| job.state == JobState::Stopped)
            .map(|(&id, _)| id)
    }

    /// Sets the next ID to one more than the largest existing ID, or 1 if the
    /// list is empty.
    pub fn recompute_next_id(&mut self) {
        self.next_id = self.largest().map_or(JobId::FIRST, JobId::next);
    }

    /// Returns an iterator over the jobs in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (JobId, &Job)> {
        self.jobs.iter().map(|(&id, job)| (id, job))
    }

    /// Removes jobs whose processes have terminated.
    ///
    /// This function repeatedly waits for any child without blocking, removing
    /// the job for each process reported as exited or killed, until there is
    /// nothing more to report. Returns the removed jobs.
    ///
    /// Errors from the system are not fatal: reaping stops and the error is
    /// logged.
    pub fn reap_finished(&mut self, system: &mut dyn System) -> Vec<(JobId, Job)> {
        let mut reaped = Vec::new();
        loop {
            match system.wait(None, WaitPidFlag::WNOHANG) {
                Ok(Some((pid, state))) => {
                    if state.is_finished() {
                        if let Some(entry) = self.remove_by_pid(pid) {
                            reaped.push(entry);
                        }
                    }
                }
                Ok(None) | Err(Errno::ECHILD) => break,
                Err(Errno::EINTR) => continue,
                Err(errno) => {
                    log::warn!("cannot reap finished jobs: {errno}");
                    break;
                }
            }
        }
        reaped
    }

    /// Removes jobs whose processes have terminated, waiting only for the
    /// processes of jobs in the list.
    ///
    /// Unlike [`reap_finished`](Self::reap_finished), this function never
    /// collects a child that is not a job, so it is safe to use while the
    /// shell is waiting for other children. A job whose process is no longer
    /// a child is removed as well. Returns the removed jobs.
    pub fn reap_finished_jobs(&mut self, system: &mut dyn System) -> Vec<(JobId, Job)> {
        let pids: Vec<Pid> = self.jobs.values().map(|job| job.pid).collect();
        let mut reaped = Vec::new();
        for pid in pids {
            let finished = loop {
                match system.wait(Some(pid), WaitPidFlag::WNOHANG) {
                    Ok(Some((_, state))) => break state.is_finished(),
                    Ok(None) => break false,
                    Err(Errno::ECHILD) => break true,
                    Err(Errno::EINTR) => continue,
                    Err(errno) => {
                        log::warn!("cannot check job process {pid}: {errno}");
                        break false;
                    }
                }
            };
            if finished {
                reaped.extend(self.remove_by_pid(pid));
            }
        }
        reaped
    }
}
