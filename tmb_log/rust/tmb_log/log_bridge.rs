// Copyright 2025 The Pigweed Authors
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License. You may obtain a copy of
// the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the
// License for the specific language governing permissions and limitations under
// the License.

//! Forwards records logged through the [`log`](::log) crate to the engine's
//! default logger.

use ::log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use tmb_engine_api::{CallSite, Engine, LogLevel};

use crate::global;
use crate::logger::{DefaultLogger, LogTarget};

fn level_from_log(level: Level) -> LogLevel {
    match level {
        Level::Error => LogLevel::Error,
        Level::Warn => LogLevel::Warning,
        Level::Info => LogLevel::Info,
        Level::Debug => LogLevel::Debug,
        Level::Trace => LogLevel::Trace,
    }
}

fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::None => LevelFilter::Off,
        LogLevel::Fatal | LogLevel::Error => LevelFilter::Error,
        LogLevel::Warning => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace | LogLevel::All => LevelFilter::Trace,
    }
}

/// A [`log::Log`](::log::Log) implementation writing to the default logger.
///
/// The record's module path stands in for the enclosing function, which the
/// `log` crate does not capture.
pub struct LogBridge<'e> {
    engine: Option<&'e dyn Engine>,
    max_level: LogLevel,
}

impl LogBridge<'static> {
    /// A bridge to whichever engine is installed when a record arrives.
    pub fn new(max_level: LogLevel) -> Self {
        Self {
            engine: None,
            max_level,
        }
    }
}

impl<'e> LogBridge<'e> {
    /// A bridge to `engine`.
    pub fn with_engine(engine: &'e dyn Engine, max_level: LogLevel) -> Self {
        Self {
            engine: Some(engine),
            max_level,
        }
    }

    fn engine(&self) -> &dyn Engine {
        match self.engine {
            Some(engine) => engine,
            None => global::engine(),
        }
    }
}

impl Log for LogBridge<'_> {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        level_from_log(metadata.level()) <= self.max_level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let site = CallSite::new(
            record.file().unwrap_or_default(),
            record.line().unwrap_or_default(),
            record.module_path().unwrap_or(record.target()),
        );
        DefaultLogger::new(self.engine()).log(level_from_log(record.level()), &site, *record.args());
    }

    fn flush(&self) {}
}

/// Installs a [`LogBridge`] as the `log` crate's logger and sets its maximum
/// level.
pub fn init_log_bridge(max_level: LogLevel) -> Result<(), SetLoggerError> {
    ::log::set_boxed_logger(Box::new(LogBridge::new(max_level)))?;
    ::log::set_max_level(level_filter(max_level));
    Ok(())
}
