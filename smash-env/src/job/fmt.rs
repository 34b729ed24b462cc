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

//! Job report formatting
//!
//! This module defines the format of a job line printed by the `jobs`
//! built-in. The line includes the job ID, the job name, the process ID, and
//! the number of seconds spent in the current state, in this order. A stopped
//! job is marked with `(stopped)`:
//!
//! ```text
//! [2] sleep 100 : 24437 12 secs (stopped)
//! ```
//!
//! To format a job, you create an instance of [`Report`] and use the `Display`
//! trait's method (typically by using the `format!` macro).
//!
//! ```
//! use smash_env::job::{Job, JobId, JobState};
//! use smash_env::job::fmt::Report;
//! use smash_env::system::Pid;
//! use std::time::{Duration, Instant};
//! let since = Instant::now();
//! let job = Job::new(Pid::from_raw(123), "sleep 10".to_string(), JobState::Stopped, since);
//! let report = Report {
//!     id: JobId::FIRST,
//!     job: &job,
//!     now: since + Duration::from_secs(5),
//! };
//! assert_eq!(report.to_string(), "[1] sleep 10 : 123 5 secs (stopped)");
//! ```

use super::Job;
use super::JobId;
use super::JobState;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;
use std::time::Instant;

/// Wrapper for formatting a job
#[derive(Clone, Copy, Debug)]
pub struct Report<'a> {
    /// ID of the job
    pub id: JobId,
    /// Job to report
    pub job: &'a Job,
    /// Current time, from which the elapsed time is computed
    pub now: Instant,
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let elapsed = self.now.saturating_duration_since(self.job.state_since);
        write!(
            f,
            "[{}] {} : {} {} secs",
            self.id,
            self.job.name,
            self.job.pid,
            elapsed.as_secs()
        )?;
        if self.job.state == JobState::Stopped {
            f.write_str(" (stopped)")?;
        }
        Ok(())
    }
}
