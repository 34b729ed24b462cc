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

//! Output redirection
//!
//! A redirection replaces the shell's own standard output with a file for the
//! duration of a command. No child process is involved: the original standard
//! output is first duplicated to a descriptor not less than
//! [`MIN_INTERNAL_FD`], then the file is opened and duplicated onto the
//! standard output.
//!
//! To perform a redirection, wrap an [`Env`] in a [`RedirGuard`] and call
//! [`RedirGuard::redirect_stdout`]. Dropping the guard restores the original
//! standard output, whether the redirection succeeded or not.

use smash_env::Env;
use smash_env::io::{Fd, MIN_INTERNAL_FD};
use smash_env::system::{Errno, OpenMode};
use std::ffi::CString;
use std::ops::{Deref, DerefMut};
use thiserror::Error;

/// Error in performing a redirection
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// The target file name contains a null character.
    #[error("redirection: invalid file name")]
    InvalidPath,
    /// The original standard output could not be saved.
    #[error("dup failed: {}", .0.desc())]
    Save(Errno),
    /// The target file could not be opened.
    #[error("open failed: {}", .0.desc())]
    Open(Errno),
    /// The opened file could not be moved to the standard output.
    #[error("dup2 failed: {}", .0.desc())]
    Replace(Errno),
}

/// `Env` wrapper for performing a redirection
///
/// The guard gives access to the wrapped environment through `Deref` and
/// `DerefMut`. When dropped, it undoes the redirection.
#[derive(Debug)]
#[must_use = "the redirection is undone when the guard is dropped"]
pub struct RedirGuard<'e> {
    env: &'e mut Env,
    saved: Option<Fd>,
}

impl Deref for RedirGuard<'_> {
    type Target = Env;
    fn deref(&self) -> &Env {
        self.env
    }
}

impl DerefMut for RedirGuard<'_> {
    fn deref_mut(&mut self) -> &mut Env {
        self.env
    }
}

impl Drop for RedirGuard<'_> {
    fn drop(&mut self) {
        self.undo_redir()
    }
}

impl<'e> RedirGuard<'e> {
    /// Creates a new `RedirGuard`.
    pub fn new(env: &'e mut Env) -> Self {
        RedirGuard { env, saved: None }
    }

    /// Redirects the standard output to the file at `path`.
    ///
    /// On error, the standard output may have been saved already; it is
    /// restored when the guard is dropped as usual.
    pub fn redirect_stdout(&mut self, path: &str, mode: OpenMode) -> Result<(), Error> {
        let path = CString::new(path).map_err(|_| Error::InvalidPath)?;

        let save = self
            .env
            .system
            .dup(Fd::STDOUT, MIN_INTERNAL_FD)
            .map_err(Error::Save)?;
        self.saved = Some(save);

        let file = self.env.system.open(&path, mode).map_err(Error::Open)?;
        let result = self.env.system.dup2(file, Fd::STDOUT);
        _ = self.env.system.close(file);
        result.map_err(Error::Replace)?;

        log::trace!("standard output redirected to {path:?} (saved as {save})");
        Ok(())
    }

    /// Restores the standard output saved by the redirection, if any.
    ///
    /// This function is called when the guard is dropped. Calling it more
    /// than once has no further effect.
    pub fn undo_redir(&mut self) {
        if let Some(save) = self.saved.take() {
            _ = self.env.system.dup2(save, Fd::STDOUT);
            _ = self.env.system.close(save);
        }
    }
}
