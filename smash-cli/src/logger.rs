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

//! Diagnostic logging
//!
//! The shell reports its internal activity through the [`log`] facade. This
//! module provides the logger that writes the records to the standard error,
//! one line per record, each prefixed with `smash: `.

use log::{LevelFilter, Log};
use std::io::Write;

/// Prefix of every log line
pub const PREFIX: &str = "smash: ";

/// Logger that writes records to a shared writer
pub struct SimpleLogger<W: Send + Sync>
where
    for<'a> &'a W: Write,
{
    target: W,
    prefix: &'static str,
}

impl<W: Send + Sync> Log for SimpleLogger<W>
where
    for<'a> &'a W: Write,
{
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level() && metadata.level() <= log::STATIC_MAX_LEVEL
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            _ = writeln!(&self.target, "{}{}", self.prefix, record.args());
        }
    }

    fn flush(&self) {
        _ = (&self.target).flush();
    }
}

impl SimpleLogger<std::io::Stderr> {
    /// Creates a logger that writes to the standard error.
    pub fn to_stderr(prefix: &'static str) -> SimpleLogger<std::io::Stderr> {
        SimpleLogger {
            target: std::io::stderr(),
            prefix,
        }
    }
}

/// Returns the maximum log level for the number of `-v` options.
#[must_use]
pub fn level_filter(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs the standard error logger as the global logger.
///
/// This function fails if a global logger has already been installed.
pub fn init(verbosity: u8) -> Result<(), log::SetLoggerError> {
    log::set_boxed_logger(Box::new(SimpleLogger::to_stderr(PREFIX)))?;
    log::set_max_level(level_filter(verbosity));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, RwLock};

    #[derive(Clone, Default)]
    struct SharedString {
        inner: Arc<RwLock<String>>,
    }

    impl SharedString {
        fn read(&self) -> String {
            self.inner.read().unwrap().clone()
        }
    }

    impl io::Write for &'_ SharedString {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.inner
                .write()
                .unwrap()
                .push_str(std::str::from_utf8(buf).unwrap());
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(level_filter(0), LevelFilter::Warn);
        assert_eq!(level_filter(1), LevelFilter::Info);
        assert_eq!(level_filter(2), LevelFilter::Debug);
        assert_eq!(level_filter(3), LevelFilter::Trace);
        assert_eq!(level_filter(200), LevelFilter::Trace);
    }

    #[test]
    fn record_is_written_with_prefix() {
        let target = SharedString::default();
        let logger = SimpleLogger {
            target: target.clone(),
            prefix: PREFIX,
        };
        log::set_max_level(LevelFilter::Trace);
        let record = log::Record::builder()
            .args(format_args!("job 1 finished"))
            .level(log::Level::Warn)
            .build();

        logger.log(&record);

        assert_eq!(target.read(), "smash: job 1 finished\n");
    }
}
