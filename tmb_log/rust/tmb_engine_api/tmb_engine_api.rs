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

//! Engine API for `tmb_log`.
//!
//! `tmb_log` does not sink, buffer, or filter anything itself.  Every log call
//! is turned into a [`LogContext`] plus a rendered message and handed to an
//! [`Engine`].  The production engine forwards to `libtmb` (see
//! `tmb_engine_native`), tests use an in-memory recording engine.
//!
//! ```
//! use tmb_engine_api::{base_name, CallSite, LogContext, LogLevel};
//!
//! let site = CallSite::new("src/net/conn.rs", 42, "net::conn::open");
//! let context = LogContext::capture(LogLevel::Info, &site);
//! assert_eq!(context.file_base, "conn.rs");
//! assert_eq!(base_name("C:\\build\\main.rs"), "main.rs");
//! ```
#![deny(missing_docs)]

use core::ffi::c_void;
use core::fmt;
use core::panic::Location;
use core::ptr::NonNull;
use core::str::FromStr;

use thiserror::Error;

/// tmb's log levels.
///
/// The ordering is significant: the engine emits a record when its level is
/// less than or equal to the logger's configured threshold.  The facade never
/// filters on its own.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Emits nothing when used as a threshold.
    None = 0,
    /// Unrecoverable condition.  Logging at this level does not abort.
    Fatal = 1,
    /// An operation failed.
    Error = 2,
    /// Something unexpected that the program recovered from.
    Warning = 3,
    /// Normal operational messages.
    Info = 4,
    /// Diagnostic detail.
    Debug = 5,
    /// Very fine grained diagnostic detail.
    Trace = 6,
    /// Emits everything when used as a threshold.
    All = 7,
}

impl LogLevel {
    /// All levels, from [`LogLevel::None`] to [`LogLevel::All`].
    pub const ALL_LEVELS: [LogLevel; 8] = [
        LogLevel::None,
        LogLevel::Fatal,
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
        LogLevel::All,
    ];

    /// Lower case name of the level.
    pub const fn as_str(self) -> &'static str {
        match self {
            LogLevel::None => "none",
            LogLevel::Fatal => "fatal",
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
            LogLevel::All => "all",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Returned by [`LogLevel::from_str`] for unknown level names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log level `{0}`")]
pub struct ParseLevelError(pub String);

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        // `warn` is accepted the same way the facade exposes `warn()` as an
        // alias of `warning()`.
        if name.eq_ignore_ascii_case("warn") {
            return Ok(LogLevel::Warning);
        }
        LogLevel::ALL_LEVELS
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| ParseLevelError(s.to_string()))
    }
}

/// Configuration handed to the engine when creating a named logger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Most verbose level the logger emits.
    pub level: LogLevel,
    /// Whether the engine decorates output with terminal colors.
    pub enable_colors: bool,
}

impl LoggerConfig {
    /// Creates a configuration.
    pub const fn new(level: LogLevel, enable_colors: bool) -> Self {
        Self {
            level,
            enable_colors,
        }
    }

    /// Returns `self` with the threshold replaced.
    pub const fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Returns `self` with color decoration switched on or off.
    pub const fn with_colors(mut self, enable_colors: bool) -> Self {
        self.enable_colors = enable_colors;
        self
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::new(LogLevel::Debug, true)
    }
}

/// The location a log call was made from.
///
/// Normally filled in by `tmb_log::call_site!()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallSite<'a> {
    /// Source path as reported by the compiler.
    pub file: &'a str,
    /// 1-based line number.
    pub line: u32,
    /// Path of the enclosing function.
    pub function: &'a str,
}

impl<'a> CallSite<'a> {
    /// Creates a call site from its parts.
    pub const fn new(file: &'a str, line: u32, function: &'a str) -> Self {
        Self {
            file,
            line,
            function,
        }
    }
}

impl CallSite<'static> {
    /// Call site of the caller of the function this is invoked from.
    ///
    /// `#[track_caller]` knows nothing about the enclosing function so
    /// `function` is left empty.  Prefer `tmb_log::call_site!()` where a macro
    /// can be used.
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self::new(location.file(), location.line(), "")
    }
}

/// Returns the part of `path` after the last `/` or `\`.
///
/// A path without a separator is its own base name.
pub fn base_name(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(separator) => &path[separator + 1..],
        None => path,
    }
}

/// Per call metadata handed to an [`Engine`].
///
/// Built fresh for every log call and discarded when the call returns.
/// Timestamps are filled in by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogContext<'a> {
    /// Effective level of the record.
    pub level: LogLevel,
    /// 1-based line number.
    pub line: u32,
    /// Full source path.
    pub file: &'a str,
    /// `file` with its directory stripped.
    pub file_base: &'a str,
    /// Path of the enclosing function.
    pub function: &'a str,
}

impl<'a> LogContext<'a> {
    /// Captures the context of a call made at `site` with `level`.
    pub fn capture(level: LogLevel, site: &CallSite<'a>) -> Self {
        Self {
            level,
            line: site.line,
            file: site.file,
            file_base: base_name(site.file),
            function: site.function,
        }
    }
}

/// Owned reference to a logger allocated by an [`Engine`].
///
/// Not `Clone`: exactly one value owns a given engine logger and it is handed
/// back through [`Engine::destroy_logger`] exactly once.
pub struct RawLogger(NonNull<c_void>);

// SAFETY: Engines are required to accept calls from any thread.
unsafe impl Send for RawLogger {}
// SAFETY: See above.
unsafe impl Sync for RawLogger {}

impl RawLogger {
    /// Wraps an engine logger pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must identify a live logger of the engine the returned value is
    /// passed back to, and no other `RawLogger` may own it.
    pub const unsafe fn from_ptr(ptr: NonNull<c_void>) -> Self {
        Self(ptr)
    }

    /// The wrapped pointer.
    pub const fn as_ptr(&self) -> *mut c_void {
        self.0.as_ptr()
    }
}

impl fmt::Debug for RawLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawLogger").field(&self.0).finish()
    }
}

/// Which engine logger a call applies to.
#[derive(Clone, Copy, Debug)]
pub enum Target<'a> {
    /// The engine's process wide default logger.
    Default,
    /// A logger created through [`Engine::create_logger`].
    Logger(&'a RawLogger),
}

/// The logging engine `tmb_log` forwards to.
///
/// Implementations must be callable concurrently from any thread.  Level
/// filtering, sinks, and output formatting are the engine's business.
pub trait Engine: Send + Sync {
    /// Engine version string.
    fn version(&self) -> &str;

    /// Prints the engine version.
    fn print_version(&self) {
        println!("tmb {}", self.version());
    }

    /// Allocates a named logger.  Returns `None` if the engine refuses.
    fn create_logger(&self, name: &str, config: LoggerConfig) -> Option<RawLogger>;

    /// Releases a logger allocated by [`Engine::create_logger`].
    fn destroy_logger(&self, logger: RawLogger);

    /// Writes one already rendered `message` to `target`.
    ///
    /// `message` is data, never a format string.
    fn write(&self, target: Target<'_>, context: &LogContext<'_>, message: &str);

    /// Changes the output format `target` renders records with.  Returns
    /// whether the engine accepted `format`.
    fn set_default_format(&self, target: Target<'_>, format: &str) -> bool;
}

/// An [`Engine`] that discards everything.
///
/// Used until a real engine is installed.
#[derive(Clone, Copy, Debug, Default)]
pub struct NopEngine;

impl Engine for NopEngine {
    fn version(&self) -> &str {
        "nop"
    }

    fn print_version(&self) {}

    fn create_logger(&self, _name: &str, _config: LoggerConfig) -> Option<RawLogger> {
        // SAFETY: `NopEngine` never dereferences logger pointers.
        Some(unsafe { RawLogger::from_ptr(NonNull::dangling()) })
    }

    fn destroy_logger(&self, _logger: RawLogger) {}

    fn write(&self, _target: Target<'_>, _context: &LogContext<'_>, _message: &str) {}

    fn set_default_format(&self, _target: Target<'_>, _format: &str) -> bool {
        false
    }
}
