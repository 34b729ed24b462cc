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

//! Command line parser

use crate::syntax::{Command, PipeStream, Pipeline, Redir, RedirOp, SimpleCommand, Timeout};
use thiserror::Error;

/// Error in a command line
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// A pipeline or redirection operator lacks a command on either side.
    #[error("syntax error: missing command around `{0}`")]
    MissingCommand(&'static str),
    /// A redirection operator is not followed by a file name.
    #[error("syntax error: missing file name after `{0}`")]
    MissingRedirTarget(&'static str),
    /// The `timeout` command is not followed by seconds and a command.
    #[error("timeout: invalid arguments")]
    InvalidTimeout,
}

/// Splits a line into words separated by whitespace.
#[must_use]
pub fn words(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_owned).collect()
}

/// Tests whether the line ends with the background marker `&`.
#[must_use]
pub fn is_background(line: &str) -> bool {
    line.trim_end().ends_with('&')
}

/// Removes the trailing background marker and surrounding whitespace.
#[must_use]
pub fn strip_background(line: &str) -> &str {
    let line = line.trim();
    line.strip_suffix('&').unwrap_or(line).trim_end()
}

/// Returns the rest of `text` after the first `count` words.
fn skip_words(mut text: &str, count: usize) -> &str {
    for _ in 0..count {
        text = text.trim_start();
        text = &text[text.find(char::is_whitespace).unwrap_or(text.len())..];
    }
    text.trim_start()
}

fn is_seconds(word: &str) -> bool {
    !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit())
}

/// Parses a command line.
///
/// Returns `Ok(None)` if the line contains no command.
///
/// ```
/// # use smash_syntax::parser::parse;
/// # use smash_syntax::syntax::Command;
/// let command = parse("echo hello > greeting").unwrap().unwrap();
/// assert!(matches!(command, Command::Redir(_)));
/// assert_eq!(command.to_string(), "echo hello > greeting");
/// ```
pub fn parse(line: &str) -> Result<Option<Command>, Error> {
    let line = line.trim();

    if let Some(index) = line.find('>') {
        let rest = &line[index + 1..];
        let (op, rest) = match rest.strip_prefix('>') {
            Some(rest) => (RedirOp::FileAppend, rest),
            None => (RedirOp::FileOut, rest),
        };
        let command = parse(&line[..index])?.ok_or(Error::MissingCommand(op.as_str()))?;
        let target = strip_background(rest)
            .split_whitespace()
            .next()
            .ok_or(Error::MissingRedirTarget(op.as_str()))?
            .to_owned();
        let command = Box::new(command);
        return Ok(Some(Command::Redir(Redir {
            command,
            op,
            target,
        })));
    }

    // Pipelines always run in the foreground.
    let unmarked = strip_background(line);
    if let Some(index) = unmarked.find('|') {
        let rest = &unmarked[index + 1..];
        let (stream, rest) = match rest.strip_prefix('&') {
            Some(rest) => (PipeStream::Stderr, rest),
            None => (PipeStream::Stdout, rest),
        };
        let missing = Error::MissingCommand(stream.as_str());
        let left = parse(&unmarked[..index])?.ok_or_else(|| missing.clone())?;
        let right = parse(rest)?.ok_or(missing)?;
        return Ok(Some(Command::Pipeline(Pipeline {
            left: Box::new(left),
            right: Box::new(right),
            stream,
        })));
    }

    let words = words(unmarked);
    let background = is_background(line);
    match words.first().map(String::as_str) {
        None => Ok(None),

        Some("timeout") => {
            let (seconds, words) = match words.get(1..) {
                Some([seconds, command @ ..]) if is_seconds(seconds) && !command.is_empty() => {
                    (seconds, command)
                }
                _ => return Err(Error::InvalidTimeout),
            };
            let seconds = seconds.parse::<u32>().map_err(|_| Error::InvalidTimeout)?;
            let command = SimpleCommand {
                text: skip_words(unmarked, 2).to_owned(),
                words: words.to_vec(),
                background,
            };
            let text = line.to_owned();
            Ok(Some(Command::Timeout(Timeout {
                seconds,
                text,
                command,
            })))
        }

        Some(_) => {
            let text = unmarked.to_owned();
            Ok(Some(Command::Simple(SimpleCommand {
                text,
                words,
                background,
            })))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn words_split_on_any_whitespace() {
        assert_eq!(words("  ls\t-l   /tmp "), ["ls", "-l", "/tmp"]);
        assert!(words("   ").is_empty());
    }

    #[test]
    fn background_marker() {
        assert!(is_background("sleep 5 &"));
        assert!(is_background("sleep 5&  "));
        assert!(!is_background("sleep 5"));
        assert_eq!(strip_background(" sleep 5 & "), "sleep 5");
        assert_eq!(strip_background("sleep 5"), "sleep 5");
    }

    #[test]
    fn empty_line() {
        assert_eq!(parse(""), Ok(None));
        assert_eq!(parse("  \t "), Ok(None));
        assert_eq!(parse("&"), Ok(None));
    }

    #[test]
    fn simple_command() {
        let command = parse("  ls   -l ").unwrap().unwrap();
        assert_matches!(command, Command::Simple(simple) => {
            assert_eq!(simple.text, "ls   -l");
            assert_eq!(simple.words, ["ls", "-l"]);
            assert!(!simple.background);
        });
    }

    #[test]
    fn background_simple_command() {
        let command = parse("sleep 10 &").unwrap().unwrap();
        assert_matches!(command, Command::Simple(simple) => {
            assert_eq!(simple.text, "sleep 10");
            assert_eq!(simple.words, ["sleep", "10"]);
            assert!(simple.background);
        });
    }

    #[test]
    fn truncating_redirection() {
        let command = parse("echo hi > out.txt").unwrap().unwrap();
        assert_matches!(command, Command::Redir(redir) => {
            assert_eq!(redir.op, RedirOp::FileOut);
            assert_eq!(redir.target, "out.txt");
            assert_eq!(redir.command.to_string(), "echo hi");
        });
    }

    #[test]
    fn appending_redirection_ignores_extra_words() {
        let command = parse("echo hi>>log extra &").unwrap().unwrap();
        assert_matches!(command, Command::Redir(redir) => {
            assert_eq!(redir.op, RedirOp::FileAppend);
            assert_eq!(redir.target, "log");
        });
    }

    #[test]
    fn redirection_of_pipeline() {
        let command = parse("ls | sort > sorted").unwrap().unwrap();
        assert_matches!(command, Command::Redir(redir) => {
            assert_matches!(*redir.command, Command::Pipeline(_));
            assert_eq!(redir.target, "sorted");
        });
    }

    #[test]
    fn redirection_errors() {
        assert_eq!(parse("> out"), Err(Error::MissingCommand(">")));
        assert_eq!(parse("echo >>"), Err(Error::MissingRedirTarget(">>")));
        assert_eq!(parse("echo > &"), Err(Error::MissingRedirTarget(">")));
    }

    #[test]
    fn stdout_pipeline() {
        let command = parse("echo hello | tr a-z A-Z").unwrap().unwrap();
        assert_matches!(command, Command::Pipeline(pipeline) => {
            assert_eq!(pipeline.stream, PipeStream::Stdout);
            assert_eq!(pipeline.left.to_string(), "echo hello");
            assert_eq!(pipeline.right.to_string(), "tr a-z A-Z");
        });
    }

    #[test]
    fn stderr_pipeline() {
        let command = parse("ls /nonexistent |& wc -l").unwrap().unwrap();
        assert_matches!(command, Command::Pipeline(pipeline) => {
            assert_eq!(pipeline.stream, PipeStream::Stderr);
            assert_eq!(pipeline.right.to_string(), "wc -l");
        });
    }

    #[test]
    fn pipeline_ignores_background_marker() {
        let command = parse("cat file | wc &").unwrap().unwrap();
        assert_matches!(command, Command::Pipeline(pipeline) => {
            assert_matches!(*pipeline.right, Command::Simple(ref simple) => {
                assert_eq!(simple.words, ["wc"]);
                assert!(!simple.background);
            });
        });
    }

    #[test]
    fn pipeline_of_three_commands_nests_to_the_right() {
        let command = parse("a | b | c").unwrap().unwrap();
        assert_matches!(command, Command::Pipeline(pipeline) => {
            assert_eq!(pipeline.left.to_string(), "a");
            assert_matches!(*pipeline.right, Command::Pipeline(_));
        });
    }

    #[test]
    fn pipeline_errors() {
        assert_eq!(parse("| wc"), Err(Error::MissingCommand("|")));
        assert_eq!(parse("|& wc"), Err(Error::MissingCommand("|&")));
        assert_eq!(parse("ls |"), Err(Error::MissingCommand("|")));
    }

    #[test]
    fn timeout_command() {
        let command = parse("timeout 5  sleep 10").unwrap().unwrap();
        assert_matches!(command, Command::Timeout(timeout) => {
            assert_eq!(timeout.seconds, 5);
            assert_eq!(timeout.text, "timeout 5  sleep 10");
            assert_eq!(timeout.command.text, "sleep 10");
            assert_eq!(timeout.command.words, ["sleep", "10"]);
            assert!(!timeout.command.background);
        });
    }

    #[test]
    fn background_timeout_command() {
        let command = parse("timeout 0 sleep 3 &").unwrap().unwrap();
        assert_matches!(command, Command::Timeout(timeout) => {
            assert_eq!(timeout.seconds, 0);
            assert_eq!(timeout.text, "timeout 0 sleep 3 &");
            assert_eq!(timeout.name(), "timeout 0 sleep 3");
            assert!(timeout.command.background);
        });
    }

    #[test]
    fn invalid_timeouts() {
        assert_eq!(parse("timeout"), Err(Error::InvalidTimeout));
        assert_eq!(parse("timeout 5"), Err(Error::InvalidTimeout));
        assert_eq!(parse("timeout -1 sleep 1"), Err(Error::InvalidTimeout));
        assert_eq!(parse("timeout +1 sleep 1"), Err(Error::InvalidTimeout));
        assert_eq!(parse("timeout x sleep 1"), Err(Error::InvalidTimeout));
    }

    #[test]
    fn timeout_seconds_out_of_range() {
        assert_eq!(
            parse("timeout 18446744073709551615 sleep 1"),
            Err(Error::InvalidTimeout)
        );
        assert_eq!(parse("timeout 4294967296 sleep 1"), Err(Error::InvalidTimeout));
        assert_matches!(
            parse("timeout 4294967295 sleep 1"),
            Ok(Some(Command::Timeout(timeout))) => assert_eq!(timeout.seconds, u32::MAX)
        );
    }
}
