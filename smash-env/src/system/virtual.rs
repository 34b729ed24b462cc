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

//! System simulated in Rust.
//!
//! [`VirtualSystem`] is a pure Rust implementation of [`System`] that simulates
//! the behavior of the underlying system without any interaction with the
//! actual system. `VirtualSystem` is used for testing the behavior of the shell
//! in unit tests.
//!
//! # Processes
//!
//! The virtual system runs a single shell process. Child processes created by
//! [`new_child_process`](System::new_child_process) exist only as entries in
//! [`SystemState::processes`]; they never run any code. Sending signals to
//! them changes their state, and a blocking [`wait`](System::wait) for a
//! running child behaves as if the child exited successfully.
//!
//! # Signals
//!
//! Tests simulate signal delivery by pushing to
//! [`SystemState::caught_signals`]. While a caught signal is pending, blocking
//! `wait`, `read`, and `select` fail with `EINTR`, which is what the real
//! system does when a signal handler interrupts them.
//!
//! A signal the shell sends to itself with [`kill`](System::kill) is caught
//! if its handling is [`Catch`](SignalHandling::Catch). If the signal is in
//! [`SystemState::blocked_signals`], it stays in
//! [`SystemState::pending_signals`] until [`sigmask`](System::sigmask) or
//! [`select`](System::select) unblocks it. Signals with other handlings have no
//! effect on the shell.
//!
//! A `select` without a reader waits for a child to change state: the first
//! running child exits successfully and `SIGCHLD` is caught if the shell
//! catches it.
//!
//! # I/O
//!
//! Regular files and unnamed pipes are simulated with shared byte buffers.
//! The standard input, output, and error are open on the files
//! `/dev/stdin`, `/dev/stdout`, and `/dev/stderr`.

use super::Errno;
use super::ForkResult;
use super::OpenMode;
use super::Pid;
use super::ProcessState;
use super::SigSet;
use super::SigmaskHow;
use super::Signal;
use super::SignalHandling;
use super::System;
use super::WaitPidFlag;
use crate::io::Fd;
use crate::semantics::ExitStatus;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::convert::Infallible;
use std::ffi::CStr;
use std::ffi::CString;
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt as _;
use std::path::Path;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

/// Process ID of the shell in a new virtual system
const SHELL_PID: Pid = Pid::from_raw(2);

/// Process ID of the first child process
const FIRST_CHILD_PID: i32 = 10;

/// Child process in a virtual system
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Process {
    /// Process group ID
    pub pgid: Pid,
    /// Current state
    pub state: ProcessState,
    /// Whether the current state has not yet been reported by `wait`
    pub state_changed: bool,
}

impl Process {
    /// Creates a running process in the given process group.
    #[must_use]
    pub fn running(pgid: Pid) -> Self {
        Process {
            pgid,
            state: ProcessState::Running,
            state_changed: false,
        }
    }

    /// Updates the state and marks it as not yet reported.
    pub fn set_state(&mut self, state: ProcessState) {
        if self.state != state {
            self.state = state;
            self.state_changed = true;
        }
    }

    /// Applies the default action of a signal to the process.
    fn raise_signal(&mut self, signal: Signal) {
        if self.state.is_finished() {
            return;
        }
        match signal {
            Signal::SIGCONT => {
                if self.state.is_stopped() {
                    self.set_state(ProcessState::Running)
                }
            }
            Signal::SIGSTOP | Signal::SIGTSTP | Signal::SIGTTIN | Signal::SIGTTOU => {
                if self.state == ProcessState::Running {
                    self.set_state(ProcessState::Stopped(signal))
                }
            }
            Signal::SIGCHLD | Signal::SIGURG | Signal::SIGWINCH => (),
            _ => self.set_state(ProcessState::Signaled(signal)),
        }
    }

    /// Whether `wait` with the options reports the current state
    fn is_reportable(&self, options: WaitPidFlag) -> bool {
        self.state_changed
            && match self.state {
                ProcessState::Exited(_) | ProcessState::Signaled(_) => true,
                ProcessState::Stopped(_) => options.contains(WaitPidFlag::WUNTRACED),
                ProcessState::Running => options.contains(WaitPidFlag::WCONTINUED),
            }
    }
}

/// Open file description in a virtual system
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OpenFile {
    /// Contents of the file or pipe, shared with other open file descriptions
    pub body: Rc<RefCell<Vec<u8>>>,
    /// Position of the next read or write
    pub offset: usize,
    /// Whether the file is open for reading
    pub is_readable: bool,
    /// Whether the file is open for writing
    pub is_writable: bool,
    /// Whether every write goes to the end of the file
    pub is_appending: bool,
}

impl OpenFile {
    fn reader(body: Rc<RefCell<Vec<u8>>>) -> Self {
        OpenFile {
            body,
            is_readable: true,
            ..OpenFile::default()
        }
    }

    fn writer(body: Rc<RefCell<Vec<u8>>>, is_appending: bool) -> Self {
        OpenFile {
            body,
            is_writable: true,
            is_appending,
            ..OpenFile::default()
        }
    }
}

/// State of the virtual system
#[derive(Clone, Debug)]
pub struct SystemState {
    /// Current time
    pub now: Instant,

    /// Process ID of the shell process
    pub pid: Pid,

    /// Child processes of the shell
    pub processes: BTreeMap<Pid, Process>,

    /// Process ID assigned to the next child process
    pub next_pid: i32,

    /// Regular files, keyed by absolute path
    pub files: HashMap<PathBuf, Rc<RefCell<Vec<u8>>>>,

    /// Existing directories, as absolute paths
    pub directories: BTreeSet<PathBuf>,

    /// Working directory of the shell process
    pub cwd: PathBuf,

    /// Open file descriptors of the shell process
    pub fds: BTreeMap<Fd, Rc<RefCell<OpenFile>>>,

    /// Signal dispositions set by `sigaction`
    pub signal_handlings: HashMap<Signal, SignalHandling>,

    /// Signals caught but not yet returned by `caught_signals`
    pub caught_signals: Vec<Signal>,

    /// Signal blocking mask of the shell process
    pub blocked_signals: SigSet,

    /// Signals sent to the shell while blocked, not yet caught
    pub pending_signals: Vec<Signal>,

    /// History of successful `kill` calls
    pub sent_signals: Vec<(Pid, Signal)>,

    /// Seconds the alarm timer is currently armed for, if armed
    pub alarm: Option<u32>,

    /// History of `set_alarm` calls
    pub alarm_history: Vec<u32>,

    /// History of `setpgid` calls
    pub setpgid_calls: Vec<(Pid, Pid)>,
}

impl Default for SystemState {
    fn default() -> Self {
        let mut files = HashMap::new();
        let mut fds = BTreeMap::new();
        for (fd, path) in [
            (Fd::STDIN, "/dev/stdin"),
            (Fd::STDOUT, "/dev/stdout"),
            (Fd::STDERR, "/dev/stderr"),
        ] {
            let body = Rc::<RefCell<Vec<u8>>>::default();
            files.insert(PathBuf::from(path), Rc::clone(&body));
            let file = if fd == Fd::STDIN {
                OpenFile::reader(body)
            } else {
                OpenFile::writer(body, true)
            };
            fds.insert(fd, Rc::new(RefCell::new(file)));
        }

        SystemState {
            now: Instant::now(),
            pid: SHELL_PID,
            processes: BTreeMap::new(),
            next_pid: FIRST_CHILD_PID,
            files,
            directories: BTreeSet::from([PathBuf::from("/"), PathBuf::from("/dev")]),
            cwd: PathBuf::from("/"),
            fds,
            signal_handlings: HashMap::new(),
            caught_signals: Vec::new(),
            blocked_signals: SigSet::empty(),
            pending_signals: Vec::new(),
            sent_signals: Vec::new(),
            alarm: None,
            alarm_history: Vec::new(),
            setpgid_calls: Vec::new(),
        }
    }
}

impl SystemState {
    /// Returns the contents of the file as a string.
    ///
    /// Returns `None` if the file does not exist. Invalid UTF-8 sequences are
    /// replaced.
    #[must_use]
    pub fn file_content(&self, path: &str) -> Option<String> {
        let body = self.files.get(Path::new(path))?;
        Some(String::from_utf8_lossy(&body.borrow()).into_owned())
    }

    /// Creates a regular file with the given content.
    ///
    /// If the file exists, its content is replaced in place, so descriptors
    /// already open on the file see the new content. Use this on
    /// `/dev/stdin` to feed input to the shell.
    pub fn create_file(&mut self, path: &str, content: &[u8]) {
        let body = self.files.entry(PathBuf::from(path)).or_default();
        *body.borrow_mut() = content.to_vec();
    }

    /// Adds a running child process and returns its process ID.
    pub fn spawn_child(&mut self) -> Pid {
        while self.processes.contains_key(&Pid::from_raw(self.next_pid)) {
            self.next_pid += 1;
        }
        let pid = Pid::from_raw(self.next_pid);
        self.next_pid += 1;
        self.processes.insert(pid, Process::running(self.pid));
        pid
    }

    /// Delivers a signal to the shell process.
    fn raise_in_shell(&mut self, signal: Signal) {
        if self.signal_handlings.get(&signal) != Some(&SignalHandling::Catch) {
            return;
        }
        let queue = if self.blocked_signals.contains(signal) {
            &mut self.pending_signals
        } else {
            &mut self.caught_signals
        };
        if !queue.contains(&signal) {
            queue.push(signal);
        }
    }

    /// Catches the pending signals that are not in the mask.
    fn deliver_pending(&mut self, mask: &SigSet) {
        for signal in std::mem::take(&mut self.pending_signals) {
            if mask.contains(signal) {
                self.pending_signals.push(signal);
            } else if !self.caught_signals.contains(&signal) {
                self.caught_signals.push(signal);
            }
        }
    }

    fn resolve(&self, path: &CStr) -> PathBuf {
        self.cwd.join(OsStr::from_bytes(path.to_bytes()))
    }

    fn open_file(&self, fd: Fd) -> nix::Result<Rc<RefCell<OpenFile>>> {
        self.fds.get(&fd).cloned().ok_or(Errno::EBADF)
    }

    fn lowest_free_fd(&self, min: Fd) -> Fd {
        let mut fd = min;
        while self.fds.contains_key(&fd) {
            fd.0 += 1;
        }
        fd
    }
}

/// Simulated system
///
/// The state of the system is shared among clones of the `VirtualSystem`, so
/// a test can keep a clone to inspect the state after handing another clone
/// to an [`Env`](crate::Env).
#[derive(Clone, Debug, Default)]
pub struct VirtualSystem {
    /// State of the system
    pub state: Rc<RefCell<SystemState>>,
}

impl VirtualSystem {
    /// Creates a new virtual system with a shell process and no children.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for VirtualSystem {
    fn now(&self) -> Instant {
        self.state.borrow().now
    }

    fn getpid(&self) -> Pid {
        self.state.borrow().pid
    }

    fn getcwd(&self) -> nix::Result<PathBuf> {
        Ok(self.state.borrow().cwd.clone())
    }

    fn chdir(&mut self, path: &CStr) -> nix::Result<()> {
        let mut state = self.state.borrow_mut();
        let path = state.resolve(path);
        if state.directories.contains(&path) {
            state.cwd = path;
            Ok(())
        } else if state.files.contains_key(&path) {
            Err(Errno::ENOTDIR)
        } else {
            Err(Errno::ENOENT)
        }
    }

    fn pipe(&mut self) -> nix::Result<(Fd, Fd)> {
        let mut state = self.state.borrow_mut();
        let body = Rc::<RefCell<Vec<u8>>>::default();
        let reader = state.lowest_free_fd(Fd(0));
        state.fds.insert(
            reader,
            Rc::new(RefCell::new(OpenFile::reader(Rc::clone(&body)))),
        );
        let writer = state.lowest_free_fd(Fd(0));
        state
            .fds
            .insert(writer, Rc::new(RefCell::new(OpenFile::writer(body, true))));
        Ok((reader, writer))
    }

    fn dup(&mut self, from: Fd, to_min: Fd) -> nix::Result<Fd> {
        let mut state = self.state.borrow_mut();
        let file = state.open_file(from)?;
        let to = state.lowest_free_fd(to_min);
        state.fds.insert(to, file);
        Ok(to)
    }

    fn dup2(&mut self, from: Fd, to: Fd) -> nix::Result<Fd> {
        let mut state = self.state.borrow_mut();
        let file = state.open_file(from)?;
        state.fds.insert(to, file);
        Ok(to)
    }

    fn open(&mut self, path: &CStr, mode: OpenMode) -> nix::Result<Fd> {
        let mut state = self.state.borrow_mut();
        let path = state.resolve(path);
        if state.directories.contains(&path) {
            return Err(Errno::EISDIR);
        }
        match path.parent() {
            Some(parent) if !state.directories.contains(parent) => return Err(Errno::ENOENT),
            _ => (),
        }
        let body = Rc::clone(state.files.entry(path).or_default());
        if mode == OpenMode::Truncate {
            body.borrow_mut().clear();
        }
        let fd = state.lowest_free_fd(Fd(0));
        let file = OpenFile::writer(body, mode == OpenMode::Append);
        state.fds.insert(fd, Rc::new(RefCell::new(file)));
        Ok(fd)
    }

    fn close(&mut self, fd: Fd) -> nix::Result<()> {
        self.state.borrow_mut().fds.remove(&fd);
        Ok(())
    }

    fn read(&mut self, fd: Fd, buffer: &mut [u8]) -> nix::Result<usize> {
        let state = self.state.borrow();
        if !state.caught_signals.is_empty() {
            return Err(Errno::EINTR);
        }
        let file = state.open_file(fd)?;
        let mut file = file.borrow_mut();
        if !file.is_readable {
            return Err(Errno::EBADF);
        }
        let offset = file.offset;
        let count = {
            let body = file.body.borrow();
            let available = body.get(offset..).unwrap_or_default();
            let count = available.len().min(buffer.len());
            buffer[..count].copy_from_slice(&available[..count]);
            count
        };
        file.offset += count;
        Ok(count)
    }

    fn write(&mut self, fd: Fd, buffer: &[u8]) -> nix::Result<usize> {
        let file = self.state.borrow().open_file(fd)?;
        let mut file = file.borrow_mut();
        if !file.is_writable {
            return Err(Errno::EBADF);
        }
        let end = {
            let mut body = file.body.borrow_mut();
            let start = if file.is_appending {
                body.len()
            } else {
                file.offset
            };
            let end = start + buffer.len();
            if body.len() < end {
                body.resize(end, 0);
            }
            body[start..end].copy_from_slice(buffer);
            end
        };
        file.offset = end;
        Ok(buffer.len())
    }

    fn sigaction(
        &mut self,
        signal: Signal,
        handling: SignalHandling,
    ) -> nix::Result<SignalHandling> {
        let mut state = self.state.borrow_mut();
        let old = state.signal_handlings.insert(signal, handling);
        Ok(old.unwrap_or_default())
    }

    fn caught_signals(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.state.borrow_mut().caught_signals)
    }

    fn sigmask(
        &mut self,
        how: SigmaskHow,
        set: Option<&SigSet>,
        oldset: Option<&mut SigSet>,
    ) -> nix::Result<()> {
        let mut state = self.state.borrow_mut();
        if let Some(oldset) = oldset {
            *oldset = state.blocked_signals;
        }
        if let Some(set) = set {
            match how {
                SigmaskHow::SIG_BLOCK => {
                    for signal in set {
                        state.blocked_signals.add(signal);
                    }
                }
                SigmaskHow::SIG_UNBLOCK => {
                    for signal in set {
                        state.blocked_signals.remove(signal);
                    }
                }
                SigmaskHow::SIG_SETMASK => state.blocked_signals = *set,
                _ => return Err(Errno::EINVAL),
            }
        }
        let blocked = state.blocked_signals;
        state.deliver_pending(&blocked);
        Ok(())
    }

    fn select(&mut self, reader: Option<Fd>, signal_mask: Option<&SigSet>) -> nix::Result<()> {
        let mut state = self.state.borrow_mut();
        let mask = signal_mask.copied().unwrap_or(state.blocked_signals);
        state.deliver_pending(&mask);
        if !state.caught_signals.is_empty() {
            return Err(Errno::EINTR);
        }
        if let Some(fd) = reader {
            // Virtual files never block.
            state.open_file(fd)?;
            return Ok(());
        }

        let running = state
            .processes
            .iter()
            .find(|(_, process)| process.state == ProcessState::Running)
            .map(|(&pid, _)| pid);
        let Some(pid) = running else {
            // Nothing can wake the shell up; the real system would block forever.
            return Err(Errno::EDEADLK);
        };
        if let Some(process) = state.processes.get_mut(&pid) {
            process.set_state(ProcessState::Exited(ExitStatus::SUCCESS));
        }
        if state.signal_handlings.get(&Signal::SIGCHLD) == Some(&SignalHandling::Catch) {
            state.caught_signals.push(Signal::SIGCHLD);
            return Err(Errno::EINTR);
        }
        Ok(())
    }

    fn kill(&mut self, target: Pid, signal: Signal) -> nix::Result<()> {
        let mut state = self.state.borrow_mut();
        if target == state.pid {
            state.raise_in_shell(signal);
        } else {
            let process = state.processes.get_mut(&target).ok_or(Errno::ESRCH)?;
            process.raise_signal(signal);
        }
        state.sent_signals.push((target, signal));
        Ok(())
    }

    fn setpgid(&mut self, pid: Pid, pgid: Pid) -> nix::Result<()> {
        let mut state = self.state.borrow_mut();
        let pid = if pid == Pid::from_raw(0) { state.pid } else { pid };
        let pgid = if pgid == Pid::from_raw(0) { pid } else { pgid };
        if pid != state.pid {
            let process = state.processes.get_mut(&pid).ok_or(Errno::ESRCH)?;
            process.pgid = pgid;
        }
        state.setpgid_calls.push((pid, pgid));
        Ok(())
    }

    fn new_child_process(&mut self) -> nix::Result<ForkResult> {
        let child = self.state.borrow_mut().spawn_child();
        Ok(ForkResult::Parent { child })
    }

    fn wait(
        &mut self,
        target: Option<Pid>,
        options: WaitPidFlag,
    ) -> nix::Result<Option<(Pid, ProcessState)>> {
        let mut state = self.state.borrow_mut();
        let candidates: Vec<Pid> = match target {
            None => state.processes.keys().copied().collect(),
            Some(pid) if state.processes.contains_key(&pid) => vec![pid],
            Some(_) => Vec::new(),
        };
        if candidates.is_empty() {
            return Err(Errno::ECHILD);
        }

        for &pid in &candidates {
            let process = &state.processes[&pid];
            if process.is_reportable(options) {
                let process_state = process.state;
                if process_state.is_finished() {
                    state.processes.remove(&pid);
                } else if let Some(process) = state.processes.get_mut(&pid) {
                    process.state_changed = false;
                }
                return Ok(Some((pid, process_state)));
            }
        }

        if options.contains(WaitPidFlag::WNOHANG) {
            return Ok(None);
        }
        if !state.caught_signals.is_empty() {
            return Err(Errno::EINTR);
        }

        // A virtual child has nothing to run, so it finishes as soon as
        // somebody blocks waiting for it.
        let running = candidates
            .into_iter()
            .find(|pid| state.processes[pid].state == ProcessState::Running);
        match running {
            Some(pid) => {
                state.processes.remove(&pid);
                Ok(Some((pid, ProcessState::Exited(ExitStatus::SUCCESS))))
            }
            // Every candidate is stopped; the real system would block forever.
            None => Err(Errno::EDEADLK),
        }
    }

    fn execvp(&mut self, _file: &CStr, _args: &[CString]) -> nix::Result<Infallible> {
        Err(Errno::ENOSYS)
    }

    fn exit(&mut self, exit_status: ExitStatus) -> ! {
        panic!("virtual shell process exited with {exit_status}")
    }

    fn set_alarm(&mut self, seconds: u32) {
        let mut state = self.state.borrow_mut();
        state.alarm = Some(seconds);
        state.alarm_history.push(seconds);
    }

    fn cancel_alarm(&mut self) {
        self.state.borrow_mut().alarm = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn write_to_stdout_appends_to_file() {
        let mut system = VirtualSystem::new();
        system.write(Fd::STDOUT, b"foo").unwrap();
        system.write(Fd::STDOUT, b"bar\n").unwrap();
        let state = system.state.borrow();
        assert_eq!(state.file_content("/dev/stdout").unwrap(), "foobar\n");
    }

    #[test]
    fn open_truncates_or_appends() {
        let mut system = VirtualSystem::new();
        system.state.borrow_mut().create_file("/out", b"old\n");
        let path = c"/out";

        let fd = system.open(path, OpenMode::Append).unwrap();
        system.write(fd, b"more\n").unwrap();
        system.close(fd).unwrap();
        assert_eq!(
            system.state.borrow().file_content("/out").unwrap(),
            "old\nmore\n"
        );

        let fd = system.open(path, OpenMode::Truncate).unwrap();
        system.write(fd, b"new\n").unwrap();
        assert_eq!(system.state.borrow().file_content("/out").unwrap(), "new\n");
    }

    #[test]
    fn open_in_missing_directory_fails() {
        let mut system = VirtualSystem::new();
        let result = system.open(c"/no/such/file", OpenMode::Truncate);
        assert_eq!(result, Err(Errno::ENOENT));
    }

    #[test]
    fn dup_chooses_lowest_free_fd_from_minimum() {
        let mut system = VirtualSystem::new();
        assert_eq!(system.dup(Fd::STDOUT, Fd(10)), Ok(Fd(10)));
        assert_eq!(system.dup(Fd::STDOUT, Fd(10)), Ok(Fd(11)));
        assert_eq!(system.dup(Fd(5), Fd(10)), Err(Errno::EBADF));
    }

    #[test]
    fn pipe_delivers_written_bytes() {
        let mut system = VirtualSystem::new();
        let (reader, writer) = system.pipe().unwrap();
        system.write(writer, b"hello").unwrap();
        let mut buffer = [0; 10];
        let count = system.read(reader, &mut buffer).unwrap();
        assert_eq!(&buffer[..count], b"hello");
        assert_eq!(system.read(reader, &mut buffer), Ok(0));
    }

    #[test]
    fn read_is_interrupted_by_caught_signal() {
        let mut system = VirtualSystem::new();
        system.state.borrow_mut().caught_signals.push(Signal::SIGTSTP);
        let mut buffer = [0; 1];
        assert_eq!(system.read(Fd::STDIN, &mut buffer), Err(Errno::EINTR));
    }

    #[test]
    fn blocked_signal_stays_pending_until_unblocked() {
        let mut system = VirtualSystem::new();
        let shell = system.getpid();
        system.sigaction(Signal::SIGINT, SignalHandling::Catch).unwrap();
        let mut set = SigSet::empty();
        set.add(Signal::SIGINT);
        let mut old = SigSet::all();
        system
            .sigmask(SigmaskHow::SIG_BLOCK, Some(&set), Some(&mut old))
            .unwrap();
        assert_eq!(old, SigSet::empty());

        system.kill(shell, Signal::SIGINT).unwrap();
        assert_eq!(system.state.borrow().pending_signals, [Signal::SIGINT]);
        assert!(system.caught_signals().is_empty());

        system
            .sigmask(SigmaskHow::SIG_UNBLOCK, Some(&set), None)
            .unwrap();
        assert!(system.state.borrow().pending_signals.is_empty());
        assert_eq!(system.caught_signals(), [Signal::SIGINT]);
    }

    #[test]
    fn signal_to_shell_without_catch_has_no_effect() {
        let mut system = VirtualSystem::new();
        let shell = system.getpid();
        system.kill(shell, Signal::SIGTSTP).unwrap();
        let state = system.state.borrow();
        assert!(state.caught_signals.is_empty());
        assert!(state.pending_signals.is_empty());
        assert_eq!(state.sent_signals, [(shell, Signal::SIGTSTP)]);
    }

    #[test]
    fn select_delivers_pending_signal_not_in_mask() {
        let mut system = VirtualSystem::new();
        let shell = system.getpid();
        system.sigaction(Signal::SIGALRM, SignalHandling::Catch).unwrap();
        let mut set = SigSet::empty();
        set.add(Signal::SIGALRM);
        system
            .sigmask(SigmaskHow::SIG_SETMASK, Some(&set), None)
            .unwrap();
        system.kill(shell, Signal::SIGALRM).unwrap();

        // Still blocked while waiting
        assert_eq!(system.select(Some(Fd::STDIN), Some(&set)), Ok(()));
        assert!(system.state.borrow().caught_signals.is_empty());

        let unblocked = SigSet::empty();
        assert_eq!(
            system.select(Some(Fd::STDIN), Some(&unblocked)),
            Err(Errno::EINTR)
        );
        assert_eq!(system.caught_signals(), [Signal::SIGALRM]);
    }

    #[test]
    fn select_without_reader_waits_for_child() {
        let mut system = VirtualSystem::new();
        system.sigaction(Signal::SIGCHLD, SignalHandling::Catch).unwrap();
        assert_eq!(system.select(None, None), Err(Errno::EDEADLK));

        let pid = system.state.borrow_mut().spawn_child();
        assert_eq!(system.select(None, None), Err(Errno::EINTR));
        assert_eq!(system.caught_signals(), [Signal::SIGCHLD]);
        let result = system.wait(Some(pid), WaitPidFlag::WNOHANG);
        assert_eq!(
            result,
            Ok(Some((pid, ProcessState::Exited(ExitStatus::SUCCESS))))
        );
    }

    #[test]
    fn kill_changes_process_state() {
        let mut system = VirtualSystem::new();
        let pid = system.state.borrow_mut().spawn_child();

        system.kill(pid, Signal::SIGSTOP).unwrap();
        assert_eq!(
            system.state.borrow().processes[&pid].state,
            ProcessState::Stopped(Signal::SIGSTOP)
        );
        system.kill(pid, Signal::SIGCONT).unwrap();
        assert_eq!(
            system.state.borrow().processes[&pid].state,
            ProcessState::Running
        );
        system.kill(pid, Signal::SIGKILL).unwrap();
        assert_eq!(
            system.state.borrow().processes[&pid].state,
            ProcessState::Signaled(Signal::SIGKILL)
        );
        assert_eq!(
            system.kill(Pid::from_raw(9999), Signal::SIGKILL),
            Err(Errno::ESRCH)
        );
    }

    #[test]
    fn wait_reports_stop_only_with_wuntraced() {
        let mut system = VirtualSystem::new();
        let pid = system.state.borrow_mut().spawn_child();
        system.kill(pid, Signal::SIGSTOP).unwrap();

        assert_eq!(system.wait(None, WaitPidFlag::WNOHANG), Ok(None));
        let result = system.wait(Some(pid), WaitPidFlag::WUNTRACED | WaitPidFlag::WNOHANG);
        assert_eq!(result, Ok(Some((pid, ProcessState::Stopped(Signal::SIGSTOP)))));
        // Already reported
        let result = system.wait(Some(pid), WaitPidFlag::WUNTRACED | WaitPidFlag::WNOHANG);
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn blocking_wait_finishes_running_child() {
        let mut system = VirtualSystem::new();
        let pid = system.state.borrow_mut().spawn_child();
        let result = system.wait(Some(pid), WaitPidFlag::empty());
        assert_eq!(
            result,
            Ok(Some((pid, ProcessState::Exited(ExitStatus::SUCCESS))))
        );
        assert_eq!(system.wait(Some(pid), WaitPidFlag::empty()), Err(Errno::ECHILD));
    }

    #[test]
    fn blocking_wait_is_interrupted_by_caught_signal() {
        let mut system = VirtualSystem::new();
        let pid = system.state.borrow_mut().spawn_child();
        system.state.borrow_mut().caught_signals.push(Signal::SIGINT);
        let result = system.wait(Some(pid), WaitPidFlag::WUNTRACED);
        assert_eq!(result, Err(Errno::EINTR));
        assert_matches!(system.state.borrow().processes.get(&pid), Some(_));
    }

    #[test]
    fn terminated_child_is_reaped_once() {
        let mut system = VirtualSystem::new();
        let pid = system.state.borrow_mut().spawn_child();
        system.kill(pid, Signal::SIGKILL).unwrap();
        let result = system.wait(None, WaitPidFlag::WNOHANG);
        assert_eq!(
            result,
            Ok(Some((pid, ProcessState::Signaled(Signal::SIGKILL))))
        );
        assert_eq!(system.wait(None, WaitPidFlag::WNOHANG), Err(Errno::ECHILD));
    }

    #[test]
    fn alarm_is_recorded() {
        let mut system = VirtualSystem::new();
        system.set_alarm(3);
        system.set_alarm(1);
        system.cancel_alarm();
        let state = system.state.borrow();
        assert_eq!(state.alarm, None);
        assert_eq!(state.alarm_history, [3, 1]);
    }

    #[test]
    fn chdir_to_existing_directory() {
        let mut system = VirtualSystem::new();
        system
            .state
            .borrow_mut()
            .directories
            .insert(PathBuf::from("/tmp"));
        system.chdir(c"tmp").unwrap();
        assert_eq!(system.getcwd(), Ok(PathBuf::from("/tmp")));
        assert_eq!(system.chdir(c"/nowhere"), Err(Errno::ENOENT));
    }
}
