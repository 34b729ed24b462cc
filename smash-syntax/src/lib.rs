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

//! Syntax of smash command lines
//!
//! A command line is one of the following, checked in this order:
//!
//! 1. An output redirection `command > file` or `command >> file`. The first
//!    `>` in the line is the operator.
//! 2. A pipeline `left | right` or `left |& right`. The first `|` in the line
//!    is the operator; `|&` pipes the standard error of `left` instead of its
//!    standard output.
//! 3. A timed command `timeout seconds command...`.
//! 4. A simple command: words separated by whitespace.
//!
//! A trailing `&` requests that a simple command (or a timed command) run in
//! the background. There is no quoting; every whitespace separates words.
//!
//! The [`parser::parse`] function converts a line to a [`syntax::Command`].

pub mod parser;
pub mod syntax;
