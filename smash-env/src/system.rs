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

//! [System] and its implementors.
//!
//! The shell never calls the operating system directly. Every system call
//! goes through the [`System`] trait so that the job-control core can run on
//! the [`RealSystem`] in production and on the [`VirtualSystem`] in tests.

pub mod real;
pub mod r#virtual;

pub use self::real::RealSystem;
pub use self::r#virtual::VirtualSystem;
use crate::io::Fd;
use crate::semantics::ExitStatus;
pub use nix::errno::Errno;
pub use nix::sys::signal::SigSet;
pub use nix::sys::signal::SigmaskHow;
pub use nix::sys::signal::Signal;
pub use nix::sys::wait::WaitPidFlag;
pub use nix::unistd::Pid;
use std::convert::Infallible;
use std::ffi::CStr;
use std::ffi::CString;
use std::fmt::Debug;
use std::path::PathBuf;
use std::time::Instant;

/// How a file is opened for output redirection
///
/// In both modes, the file is opened for writing and created if missing.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum OpenMode {
    /// The file is truncated to zero length (`>`).
    Truncate,
    /// Every write goes to the end of the file (`>>`).
    Append,
}

/// Disposition of a signal
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SignalHandling {
    /// Performs the default action for the signal.
    #[default]
    Default,
    /// Ignores the signal.
    Ignore,
    /// Records the signal so that [`System::caught_signals`] returns it.
    Catch,
}

/// State of a child process as reported by [`System::wait`]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ProcessState {
    /// The process is running (possibly resumed by `SIGCONT`).
    Running,
    /// The process has been stopped by the signal.
    Stopped(Signal),
    /// The process has exited with the exit status.
    Exited(ExitStatus),
    /// The process has been killed by the signal.
    Signaled(Signal),
}

impl ProcessState {
    /// Whether the process has terminated, either by exiting or by a signal
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self, ProcessState::Exited(_) | ProcessState::Signaled(_))
    }

    /// Whether the process is stopped
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        matches!(self, ProcessState::Stopped(_))
    }

    /// Converts the state to the exit status a command would report.
    ///
    /// Returns `None` for a running process.
    #[must_use]
    pub fn to_exit_status(&self) -> Option<ExitStatus> {
        match *self {
            ProcessState::Running => None,
            ProcessState::Exited(exit_status) => Some(exit_status),
            ProcessState::Stopped(signal) | ProcessState::Signaled(signal) => {
                Some(ExitStatus::from(signal))
            }
        }
    }
}

/// Result of [`System::new_child_process`]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ForkResult {
    /// We are the parent. The child process ID is returned.
    Parent { child: Pid },
    /// We are the new child process.
    Child,
}

/// API to the system-managed parts of the environment.
///
/// The `System` trait defines a collection of methods to access the underlying
/// operating system from the shell as an application program. There are two
/// substantial implementors for this trait: [`RealSystem`] and
/// [`VirtualSystem`].
pub trait System: Debug {
    /// Returns the current time.
    #[must_use]
    fn now(&self) -> Instant;

    /// Returns the process ID of the current process.
    #[must_use]
    fn getpid(&self) -> Pid;

    /// Returns the current working directory path.
    fn getcwd(&self) -> nix::Result<PathBuf>;

    /// Changes the working directory.
    fn chdir(&mut self, path: &CStr) -> nix::Result<()>;

    /// Creates an unnamed pipe.
    ///
    /// This is a thin wrapper around the `pipe` system call.
    /// If successful, returns the reading and writing ends of the pipe.
    fn pipe(&mut self) -> nix::Result<(Fd, Fd)>;

    /// Duplicates a file descriptor.
    ///
    /// This is a thin wrapper around the `fcntl` system call that opens a new
    /// FD that shares the open file description with `from`. The new FD will
    /// be the minimum unused FD not less than `to_min`. The new FD has the
    /// close-on-exec flag set so that child processes do not inherit it.
    fn dup(&mut self, from: Fd, to_min: Fd) -> nix::Result<Fd>;

    /// Duplicates a file descriptor.
    ///
    /// This is a thin wrapper around the `dup2` system call. If successful,
    /// returns `Ok(to)`. On error, returns `Err(_)`.
    fn dup2(&mut self, from: Fd, to: Fd) -> nix::Result<Fd>;

    /// Opens a file for output redirection.
    ///
    /// The file is created with mode `0666` (before applying the umask) if it
    /// does not exist.
    fn open(&mut self, path: &CStr, mode: OpenMode) -> nix::Result<Fd>;

    /// Closes a file descriptor.
    ///
    /// This is a thin wrapper around the `close` system call.
    ///
    /// This function returns `Ok(())` when the FD is already closed.
    fn close(&mut self, fd: Fd) -> nix::Result<()>;

    /// Reads from the file descriptor.
    ///
    /// This is a thin wrapper around the `read` system call.
    /// If successful, returns the number of bytes read.
    ///
    /// Unlike [`write`](Self::write), this function does not retry on
    /// `EINTR`, so that the caller can handle caught signals while blocked
    /// waiting for input.
    fn read(&mut self, fd: Fd, buffer: &mut [u8]) -> nix::Result<usize>;

    /// Writes to the file descriptor.
    ///
    /// This is a thin wrapper around the `write` system call.
    /// If successful, returns the number of bytes written.
    fn write(&mut self, fd: Fd, buffer: &[u8]) -> nix::Result<usize>;

    /// Writes the whole buffer to the file descriptor.
    ///
    /// This function repeats [`write`](Self::write) until the whole buffer is
    /// written or an error occurs.
    fn write_all(&mut self, fd: Fd, mut buffer: &[u8]) -> nix::Result<()> {
        while !buffer.is_empty() {
            match self.write(fd, buffer)? {
                0 => return Err(Errno::EIO),
                count => buffer = &buffer[count..],
            }
        }
        Ok(())
    }

    /// Gets and sets the handling of a signal.
    ///
    /// This is a thin wrapper around the `sigaction` system call. This function
    /// returns the previous handling for the signal. Signals are caught without
    /// `SA_RESTART`, so blocking system calls fail with `EINTR` when a signal
    /// is caught.
    fn sigaction(
        &mut self,
        signal: Signal,
        handling: SignalHandling,
    ) -> nix::Result<SignalHandling>;

    /// Returns signals this process has caught, if any.
    ///
    /// Implementors of this method should clear the internal state that
    /// records the caught signals, so that the same signal is not returned
    /// again.
    fn caught_signals(&mut self) -> Vec<Signal>;

    /// Gets and/or sets the signal blocking mask.
    ///
    /// This is a thin wrapper around the `sigprocmask` system call. If `set` is
    /// `Some`, this function updates the signal blocking mask according to
    /// `how`. If `oldset` is `Some`, this function sets the previous mask to
    /// it.
    fn sigmask(
        &mut self,
        how: SigmaskHow,
        set: Option<&SigSet>,
        oldset: Option<&mut SigSet>,
    ) -> nix::Result<()>;

    /// Waits for the file descriptor to become readable or for a signal to be
    /// caught.
    ///
    /// This is a wrapper around the `pselect` system call. If `reader` is
    /// `None`, this function only waits for a signal.
    ///
    /// If `signal_mask` is `Some` signal set, the signal blocking mask is set
    /// to it while waiting and restored when the function returns. A signal
    /// that is blocked elsewhere is therefore delivered only while this
    /// function waits, and this function then fails with `EINTR`.
    fn select(&mut self, reader: Option<Fd>, signal_mask: Option<&SigSet>) -> nix::Result<()>;

    /// Sends a signal.
    ///
    /// This is a thin wrapper around the `kill` system call.
    fn kill(&mut self, target: Pid, signal: Signal) -> nix::Result<()>;

    /// Modifies the process group ID of a process.
    ///
    /// This is a thin wrapper around the `setpgid` system call.
    fn setpgid(&mut self, pid: Pid, pgid: Pid) -> nix::Result<()>;

    /// Creates a new child process.
    ///
    /// The real implementation calls `fork` and returns in both the parent and
    /// the child. The virtual implementation records a new running process
    /// and only ever returns in the parent.
    fn new_child_process(&mut self) -> nix::Result<ForkResult>;

    /// Reports updated status of a child process.
    ///
    /// This is a wrapper around the `waitpid` system call. `None` as `target`
    /// waits for any child. Without `WNOHANG`, this function blocks until
    /// there is something to report or a signal is caught (`EINTR`). With
    /// `WNOHANG`, returns `Ok(None)` if there is nothing to report.
    fn wait(
        &mut self,
        target: Option<Pid>,
        options: WaitPidFlag,
    ) -> nix::Result<Option<(Pid, ProcessState)>>;

    /// Replaces the current process with a program found in `$PATH`.
    ///
    /// This is a thin wrapper around the `execvp` system call. It only
    /// returns on error.
    fn execvp(&mut self, file: &CStr, args: &[CString]) -> nix::Result<Infallible>;

    /// Terminates the current process.
    fn exit(&mut self, exit_status: ExitStatus) -> !;

    /// Arms the process-wide alarm timer to deliver `SIGALRM` after the given
    /// number of seconds, replacing any previous setting.
    fn set_alarm(&mut self, seconds: u32);

    /// Disarms the process-wide alarm timer.
    fn cancel_alarm(&mut self);
}
