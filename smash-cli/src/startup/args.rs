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

//! Command line argument parser for the shell

use smash_env::Env;
use std::iter::Peekable;
use thiserror::Error;

/// Configuration for starting the main read-eval loop
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Run {
    /// Prompt name (the `-p` option)
    pub prompt: String,
    /// Number of `-v` options
    pub verbosity: u8,
}

impl Default for Run {
    fn default() -> Self {
        Run {
            prompt: Env::DEFAULT_PROMPT.to_owned(),
            verbosity: 0,
        }
    }
}

/// Parse result
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Parse {
    /// Runs the shell
    Run(Run),
    /// Prints help message and exit
    Help,
    /// Prints version information and exit
    Version,
}

impl From<Run> for Parse {
    fn from(run: Run) -> Self {
        Parse::Run(run)
    }
}

/// Error in command line parsing
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// Short option that is not defined
    #[error("unknown option `{0}`")]
    UnknownShortOption(char),

    /// Long option that is not defined
    #[error("unknown option `{0}`")]
    UnknownLongOption(String),

    /// Option missing an argument
    #[error("option `{0}` missing an argument")]
    MissingOptionArgument(String),

    /// Argument specified to an option that does not take an argument
    #[error("option `{0}` does not take an argument")]
    UnexpectedOptionArgument(String),

    /// Operand given to the shell, which takes none
    #[error("unexpected operand `{0}`")]
    UnexpectedOperand(String),
}

/// Result of parsing an option
#[derive(Clone, Debug, PartialEq, Eq)]
enum Flag {
    Prompt(String),
    Verbose,
    Help,
    Version,
}

/// Parses command line arguments.
///
/// The first item is the command name and is ignored.
pub fn parse<I, S>(args: I) -> Result<Parse, Error>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = args.into_iter().map(Into::into).peekable();
    let mut result = Run::default();

    // Skip the command name
    args.next();

    let mut options = Vec::new();
    loop {
        if args.next_if(|arg| arg == "--").is_some() {
            break;
        }
        if try_parse_long(&mut args, &mut options)? || try_parse_short(&mut args, &mut options)? {
            continue;
        }
        break;
    }

    if let Some(operand) = args.next() {
        return Err(Error::UnexpectedOperand(operand));
    }

    for option in options {
        match option {
            Flag::Prompt(prompt) => result.prompt = prompt,
            Flag::Verbose => result.verbosity = result.verbosity.saturating_add(1),
            Flag::Help => return Ok(Parse::Help),
            Flag::Version => return Ok(Parse::Version),
        }
    }
    Ok(Parse::Run(result))
}

/// Parses the next argument as short options.
///
/// If the next argument is not a short option, returns `Ok(false)`.
/// Otherwise, consumes it (and the option argument of `-p` if it is separate)
/// and returns `Ok(true)`.
fn try_parse_short<I: Iterator<Item = String>>(
    args: &mut Peekable<I>,
    options: &mut Vec<Flag>,
) -> Result<bool, Error> {
    let Some(arg) = args.next_if(|arg| is_short_option(arg)) else {
        return Ok(false);
    };

    let mut chars = arg[1..].chars();
    while let Some(c) = chars.next() {
        match c {
            'h' => options.push(Flag::Help),
            'v' => options.push(Flag::Verbose),
            'V' => options.push(Flag::Version),
            'p' => {
                let value = chars.as_str();
                let value = if value.is_empty() {
                    args.next().ok_or(Error::MissingOptionArgument("-p".to_owned()))?
                } else {
                    value.to_owned()
                };
                options.push(Flag::Prompt(value));
                break;
            }
            _ => return Err(Error::UnknownShortOption(c)),
        }
    }
    Ok(true)
}

/// Tests if the given string is a short option.
fn is_short_option(arg: &str) -> bool {
    arg.len() > 1 && arg.starts_with('-') && !arg.starts_with("--")
}

/// Tries to parse and consume the next argument in `args` as a long option.
fn try_parse_long<I: Iterator<Item = String>>(
    args: &mut Peekable<I>,
    options: &mut Vec<Flag>,
) -> Result<bool, Error> {
    let Some(arg) = args.next_if(|arg| arg.starts_with("--") && arg.len() > 2) else {
        return Ok(false);
    };

    let (name, value) = match arg[2..].split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (&arg[2..], None),
    };
    let option = match name {
        "prompt" => {
            let value = match value {
                Some(value) => value.to_owned(),
                None => args
                    .next()
                    .ok_or_else(|| Error::MissingOptionArgument(arg.clone()))?,
            };
            Flag::Prompt(value)
        }
        "verbose" | "help" | "version" if value.is_some() => {
            return Err(Error::UnexpectedOptionArgument(arg));
        }
        "verbose" => Flag::Verbose,
        "help" => Flag::Help,
        "version" => Flag::Version,
        _ => return Err(Error::UnknownLongOption(arg)),
    };
    options.push(option);
    Ok(true)
}
