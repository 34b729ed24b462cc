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

//! Implementation of `System` that actually interacts with the system.

use super::Errno;
use super::ForkResult;
use super::OpenMode;
use super::Pid;
use super::ProcessState;
use super::SigmaskHow;
use super::Signal;
use super::SignalHandling;
use super::System;
use super::WaitPidFlag;
use crate::io::Fd;
use crate::semantics::ExitStatus;
use nix::sys::signal::SaFlags;
use nix::sys::signal::SigAction;
use nix::sys::signal::SigHandler;
use nix::sys::select::FdSet;
use nix::sys::signal::SigSet;
use nix::sys::wait::WaitStatus;
use std::convert::Infallible;
use std::ffi::CStr;
use std::ffi::CString;
use std::ffi::c_int;
use std::os::fd::BorrowedFd;
use std::path::PathBuf;
use std::sync::atomic::AtomicIsize;
use std::sync::atomic::Ordering;
use std::sync::atomic::compiler_fence;
use std::time::Instant;

static CAUGHT_SIGNALS: [AtomicIsize; 8] = {
    // In the array creation, the repeat operand must be const.
    #[allow(clippy::declare_interior_mutable_const)]
    const SIGNAL_SLOT: AtomicIsize = AtomicIsize::new(0);
    [SIGNAL_SLOT; 8]
};

/// Signal catching function.
///
/// The function only records the signal number in `CAUGHT_SIGNALS`. The
/// shell state is updated later when the main loop calls
/// [`RealSystem::caught_signals`].
extern "C" fn catch_signal(signal: c_int) {
    // This function can only perform async-signal-safe operations.
    // Performing unsafe operations is undefined behavior!

    // Find an unused slot (having a value of 0) in CAUGHT_SIGNALS and write the
    // signal number into it.
    // If there is a slot having a value of the signal already, do nothing.
    // If there is no available slot, the signal will be lost!
    let signal = signal as isize;
    for slot in &CAUGHT_SIGNALS {
        match slot.compare_exchange(0, signal, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => break,
            Err(slot_value) if slot_value == signal => break,
            _ => continue,
        }
    }
}

/// Converts the result of `waitpid` to what [`System::wait`] returns.
fn to_process_state(status: WaitStatus) -> Option<(Pid, ProcessState)> {
    match status {
        WaitStatus::Exited(pid, exit_status) => {
            Some((pid, ProcessState::Exited(ExitStatus(exit_status))))
        }
        WaitStatus::Signaled(pid, signal, _) => Some((pid, ProcessState::Signaled(signal))),
        WaitStatus::Stopped(pid, signal) => Some((pid, ProcessState::Stopped(signal))),
        WaitStatus::Continued(pid) => Some((pid, ProcessState::Running)),
        _ => None,
    }
}

/// Implementation of `System` that actually interacts with the system.
///
/// `RealSystem` is an empty `struct` because the underlying operating system
/// manages the system's internal state.
#[derive(Debug)]
pub struct RealSystem(());

impl RealSystem {
    /// Returns an instance of `RealSystem`.
    ///
    /// # Safety
    ///
    /// This function is marked `unsafe` because improper use of `RealSystem`
    /// may lead to undefined behavior. Remember that most operations performed
    /// on the system by [`Env`](crate::Env) are not thread-safe. You should
    /// never use `RealSystem` in a multi-threaded program, and it is your
    /// responsibility to make sure you are using only one instance of
    /// `RealSystem` in the process.
    pub unsafe fn new() -> Self {
        RealSystem(())
    }
}

impl System for RealSystem {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn getpid(&self) -> Pid {
        nix::unistd::getpid()
    }

    fn getcwd(&self) -> nix::Result<PathBuf> {
        nix::unistd::getcwd()
    }

    fn chdir(&mut self, path: &CStr) -> nix::Result<()> {
        nix::unistd::chdir(path)
    }

    fn pipe(&mut self) -> nix::Result<(Fd, Fd)> {
        let mut fds: [c_int; 2] = [-1; 2];
        let result = unsafe { libc::pipe(fds.as_mut_ptr()) };
        Errno::result(result)?;
        Ok((Fd(fds[0]), Fd(fds[1])))
    }

    fn dup(&mut self, from: Fd, to_min: Fd) -> nix::Result<Fd> {
        let result = unsafe { libc::fcntl(from.0, libc::F_DUPFD_CLOEXEC, to_min.0) };
        Errno::result(result).map(Fd)
    }

    fn dup2(&mut self, from: Fd, to: Fd) -> nix::Result<Fd> {
        loop {
            let result = unsafe { libc::dup2(from.0, to.0) };
            match Errno::result(result) {
                Ok(fd) => return Ok(Fd(fd)),
                Err(Errno::EINTR) => (),
                Err(e) => return Err(e),
            }
        }
    }

    fn open(&mut self, path: &CStr, mode: OpenMode) -> nix::Result<Fd> {
        let flags = libc::O_WRONLY
            | libc::O_CREAT
            | match mode {
                OpenMode::Truncate => libc::O_TRUNC,
                OpenMode::Append => libc::O_APPEND,
            };
        let file_mode: libc::c_uint = 0o666;
        loop {
            let result = unsafe { libc::open(path.as_ptr(), flags, file_mode) };
            match Errno::result(result) {
                Ok(fd) => return Ok(Fd(fd)),
                Err(Errno::EINTR) => (),
                Err(e) => return Err(e),
            }
        }
    }

    fn close(&mut self, fd: Fd) -> nix::Result<()> {
        loop {
            let result = unsafe { libc::close(fd.0) };
            match Errno::result(result) {
                Ok(_) | Err(Errno::EBADF) => return Ok(()),
                Err(Errno::EINTR) => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn read(&mut self, fd: Fd, buffer: &mut [u8]) -> nix::Result<usize> {
        let result = unsafe { libc::read(fd.0, buffer.as_mut_ptr().cast(), buffer.len()) };
        Errno::result(result).map(|count| count as usize)
    }

    fn write(&mut self, fd: Fd, buffer: &[u8]) -> nix::Result<usize> {
        loop {
            let result = unsafe { libc::write(fd.0, buffer.as_ptr().cast(), buffer.len()) };
            match Errno::result(result) {
                Ok(count) => return Ok(count as usize),
                Err(Errno::EINTR) => (),
                Err(e) => return Err(e),
            }
        }
    }

    fn sigaction(
        &mut self,
        signal: Signal,
        handling: SignalHandling,
    ) -> nix::Result<SignalHandling> {
        let handler = match handling {
            SignalHandling::Default => SigHandler::SigDfl,
            SignalHandling::Ignore => SigHandler::SigIgn,
            SignalHandling::Catch => SigHandler::Handler(catch_signal),
        };
        let new_action = SigAction::new(handler, SaFlags::empty(), SigSet::empty());
        // SAFETY: The `catch_signal` function only accesses atomic variables.
        let old_action = unsafe { nix::sys::signal::sigaction(signal, &new_action) }?;
        let old_handling = match old_action.handler() {
            SigHandler::SigDfl => SignalHandling::Default,
            SigHandler::SigIgn => SignalHandling::Ignore,
            SigHandler::Handler(_) | SigHandler::SigAction(_) => SignalHandling::Catch,
        };
        Ok(old_handling)
    }

    fn caught_signals(&mut self) -> Vec<Signal> {
        let mut signals = Vec::new();
        for slot in &CAUGHT_SIGNALS {
            // Need a fence to ensure we examine the slots in order.
            compiler_fence(Ordering::Acquire);

            let signal = slot.swap(0, Ordering::Relaxed);
            if signal == 0 {
                // The `catch_signal` function always fills the first unused
                // slot, so there is no more slot filled with a signal.
                break;
            }

            if let Ok(signal) = Signal::try_from(signal as c_int) {
                signals.push(signal)
            } else {
                // ignore unknown signal
            }
        }
        signals
    }

    fn sigmask(
        &mut self,
        how: SigmaskHow,
        set: Option<&SigSet>,
        oldset: Option<&mut SigSet>,
    ) -> nix::Result<()> {
        nix::sys::signal::sigprocmask(how, set, oldset)
    }

    fn select(&mut self, reader: Option<Fd>, signal_mask: Option<&SigSet>) -> nix::Result<()> {
        let mut readers = FdSet::new();
        if let Some(fd) = reader {
            // SAFETY: The FD is only used for the duration of this call.
            readers.insert(unsafe { BorrowedFd::borrow_raw(fd.0) });
        }
        nix::sys::select::pselect(None, &mut readers, None, None, None, signal_mask)?;
        Ok(())
    }

    fn kill(&mut self, target: Pid, signal: Signal) -> nix::Result<()> {
        nix::sys::signal::kill(target, signal)
    }

    fn setpgid(&mut self, pid: Pid, pgid: Pid) -> nix::Result<()> {
        nix::unistd::setpgid(pid, pgid)
    }

    /// Creates a new child process.
    ///
    /// This implementation calls the `fork` system call and returns both in the
    /// parent and child process.
    fn new_child_process(&mut self) -> nix::Result<ForkResult> {
        // SAFETY: As stated on RealSystem::new, the caller is responsible for
        // making only one instance of RealSystem in the process.
        match unsafe { nix::unistd::fork()? } {
            nix::unistd::ForkResult::Parent { child } => Ok(ForkResult::Parent { child }),
            nix::unistd::ForkResult::Child => Ok(ForkResult::Child),
        }
    }

    fn wait(
        &mut self,
        target: Option<Pid>,
        options: WaitPidFlag,
    ) -> nix::Result<Option<(Pid, ProcessState)>> {
        nix::sys::wait::waitpid(target, Some(options)).map(to_process_state)
    }

    fn execvp(&mut self, file: &CStr, args: &[CString]) -> nix::Result<Infallible> {
        loop {
            let result = nix::unistd::execvp(file, args);
            if result != Err(Errno::EINTR) {
                return result;
            }
        }
    }

    fn exit(&mut self, exit_status: ExitStatus) -> ! {
        std::process::exit(exit_status.0)
    }

    fn set_alarm(&mut self, seconds: u32) {
        _ = nix::unistd::alarm::set(seconds);
    }

    fn cancel_alarm(&mut self) {
        _ = nix::unistd::alarm::cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exited_status_is_converted() {
        let pid = Pid::from_raw(42);
        assert_eq!(
            to_process_state(WaitStatus::Exited(pid, 3)),
            Some((pid, ProcessState::Exited(ExitStatus(3))))
        );
    }

    #[test]
    fn signaled_and_stopped_statuses_are_converted() {
        let pid = Pid::from_raw(42);
        assert_eq!(
            to_process_state(WaitStatus::Signaled(pid, Signal::SIGKILL, false)),
            Some((pid, ProcessState::Signaled(Signal::SIGKILL)))
        );
        assert_eq!(
            to_process_state(WaitStatus::Stopped(pid, Signal::SIGSTOP)),
            Some((pid, ProcessState::Stopped(Signal::SIGSTOP)))
        );
    }

    #[test]
    fn still_alive_is_nothing_to_report() {
        assert_eq!(to_process_state(WaitStatus::StillAlive), None);
    }
}
