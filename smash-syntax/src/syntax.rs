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

//! Command line syntax types
//!
//! This module contains types that represent the structure of a command line.
//! All of them implement `Display`, which reproduces the command in a
//! canonical form.

use itertools::Itertools as _;
use std::fmt;

/// Command made of plain words
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct SimpleCommand {
    /// Command text without the background marker
    pub text: String,
    /// Words of the command; never empty
    pub words: Vec<String>,
    /// Whether the command ended with `&`
    pub background: bool,
}

impl SimpleCommand {
    /// Returns the first word.
    #[must_use]
    pub fn name(&self) -> &str {
        self.words.first().map_or("", String::as_str)
    }

    /// Returns the words after the first.
    #[must_use]
    pub fn args(&self) -> &[String] {
        self.words.get(1..).unwrap_or_default()
    }

    /// Whether the command contains a wildcard character (`*` or `?`)
    ///
    /// The shell does not expand wildcards itself. A complex command is
    /// handed to `bash -c` instead.
    #[must_use]
    pub fn is_complex(&self) -> bool {
        self.text.contains(['*', '?'])
    }
}

impl fmt::Display for SimpleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.words.iter().format(" "))?;
        if self.background {
            f.write_str(" &")?;
        }
        Ok(())
    }
}

/// Stream connected to the pipe in a pipeline
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PipeStream {
    /// Standard output (`|`)
    Stdout,
    /// Standard error (`|&`)
    Stderr,
}

impl PipeStream {
    /// Returns the operator token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PipeStream::Stdout => "|",
            PipeStream::Stderr => "|&",
        }
    }
}

impl fmt::Display for PipeStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two commands connected by a pipe
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Pipeline {
    /// Command writing to the pipe
    pub left: Box<Command>,
    /// Command reading from the pipe
    pub right: Box<Command>,
    /// Which stream of `left` is connected to the pipe
    pub stream: PipeStream,
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.stream, self.right)
    }
}

/// Redirection operators
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RedirOp {
    /// `>` (truncate)
    FileOut,
    /// `>>` (append)
    FileAppend,
}

impl RedirOp {
    /// Returns the operator token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RedirOp::FileOut => ">",
            RedirOp::FileAppend => ">>",
        }
    }
}

impl fmt::Display for RedirOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Command with its standard output redirected to a file
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Redir {
    /// Command run with the redirection
    pub command: Box<Command>,
    /// Operator
    pub op: RedirOp,
    /// Pathname of the file
    pub target: String,
}

impl fmt::Display for Redir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.command, self.op, self.target)
    }
}

/// Simple command with a time limit
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Timeout {
    /// Time limit in seconds
    ///
    /// The limit is bounded by what the alarm timer can be armed for.
    pub seconds: u32,
    /// The whole command line as typed, including `timeout` and the
    /// background marker
    pub text: String,
    /// Command run with the time limit
    pub command: SimpleCommand,
}

impl Timeout {
    /// Returns the command line without the background marker.
    #[must_use]
    pub fn name(&self) -> &str {
        let text = self.text.trim_end();
        text.strip_suffix('&').unwrap_or(text).trim_end()
    }
}

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timeout {} {}", self.seconds, self.command)
    }
}

/// Command line
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Command {
    Simple(SimpleCommand),
    Pipeline(Pipeline),
    Redir(Redir),
    Timeout(Timeout),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Simple(command) => command.fmt(f),
            Command::Pipeline(pipeline) => pipeline.fmt(f),
            Command::Redir(redir) => redir.fmt(f),
            Command::Timeout(timeout) => timeout.fmt(f),
        }
    }
}
