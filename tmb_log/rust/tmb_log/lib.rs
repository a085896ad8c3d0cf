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

//! `tmb_log` is a thin facade over the `tmb` logging engine.
//!
//! Clients log through the level macros.  Each call captures its file, line,
//! and enclosing function, renders the message, and hands both to the
//! installed [`Engine`].  Sinks, filtering, and output formatting all live in
//! the engine; the facade only renders and forwards.
//!
//! ```
//! use tmb_log::{info, warn, LogLevel, Logger, LoggerConfig};
//!
//! // Through the engine's default logger.
//! info!("Listening on port {}", 8080);
//!
//! // Through a named logger owned by this handle.
//! let svc = Logger::with_config("svc", LoggerConfig::default().with_level(LogLevel::Trace))?;
//! warn!(logger: svc, "{} retries left", 2);
//! # Ok::<(), tmb_log::Error>(())
//! ```
//!
//! Format strings given to the macros are checked at compile time by
//! [`format_args!`].  A format string only known at runtime goes through
//! [`log_dyn`] / [`LogTarget::log_dyn`] instead.  Either way, a message that
//! fails to render is never reported to the caller: it is replaced by a
//! `[format error]` diagnostic and logged at [`LogLevel::Error`].
//!
//! Until [`set_engine`] is called records go to [`NopEngine`].  The
//! `tmb_engine_native` crate installs the `libtmb` engine.
#![deny(missing_docs)]

mod error;
mod global;
mod logger;
mod render;

#[cfg(feature = "log")]
mod log_bridge;

pub use error::{Error, Result};
pub use global::{
    debug, engine, error, fatal, info, log, log_dyn, print_version, set_boxed_engine,
    set_default_format, set_engine, trace, version, warn, warning,
};
#[cfg(feature = "log")]
pub use log_bridge::{init_log_bridge, LogBridge};
pub use logger::{DefaultLogger, LogTarget, Logger};
pub use render::{render, render_dyn, Rendered, FORMAT_ERROR_MARKER};
pub use tmb_engine_api::{
    base_name, CallSite, Engine, LogContext, LogLevel, LoggerConfig, NopEngine, ParseLevelError,
    RawLogger, Target,
};

// Re-export dependences of `tmb_log` macros to be accessed via `$crate::__private`.
#[doc(hidden)]
pub mod __private {
    pub use crate::LogTarget;

    /// Turns the type name of a marker fn declared inside a function into the
    /// path of that function.
    pub fn function_path(marker: &'static str) -> &'static str {
        let mut path = marker.strip_suffix("::__tmb_here").unwrap_or(marker);
        while let Some(outer) = path.strip_suffix("::{{closure}}") {
            path = outer;
        }
        path
    }
}

/// Path of the enclosing function, e.g. `my_crate::server::accept`.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn __tmb_here() {}
        $crate::__private::function_path(::core::any::type_name_of_val(&__tmb_here))
    }};
}

/// Captures the [`CallSite`] of the macro invocation.
///
/// ```
/// let site = tmb_log::call_site!();
/// assert_eq!(site.line, line!());
/// assert!(site.function.ends_with("main"));
/// ```
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite::new(
            ::core::file!(),
            ::core::line!(),
            $crate::__function_name!(),
        )
    };
}

/// Emits a log message at a given [`LogLevel`].
///
/// Without a `logger:` the message goes to the engine's default logger.
///
/// ```
/// use tmb_log::{log, LogLevel, Logger};
///
/// log!(LogLevel::Info, "Log Fact: logs float because wood is less dense than {}.", "water");
///
/// let logger = Logger::new("facts")?;
/// log!(logger: logger, LogLevel::Debug, "{} facts left", 0);
/// # Ok::<(), tmb_log::Error>(())
/// ```
#[macro_export]
macro_rules! log {
    (logger: $logger:expr, $level:expr, $($arg:tt)+) => {{
        use $crate::__private::LogTarget as _;
        ($logger).log(
            $level,
            &$crate::call_site!(),
            ::core::format_args!($($arg)+),
        )
    }};

    ($level:expr, $($arg:tt)+) => {
        $crate::log($level, &$crate::call_site!(), ::core::format_args!($($arg)+))
    };
}

/// Emits a fatal level log message.
///
/// *Note*: `fatal!` only emits a log message and does not cause a `panic!()`.
#[macro_export]
macro_rules! fatal {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::LogLevel::Fatal, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Fatal, $($arg)+)
    };
}

/// Emits an error level log message.
#[macro_export]
macro_rules! error {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::LogLevel::Error, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Error, $($arg)+)
    };
}

/// Emits a warning level log message.
#[macro_export]
macro_rules! warning {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::LogLevel::Warning, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Warning, $($arg)+)
    };
}

/// Alias of [`warning!`].
#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        $crate::warning!($($arg)+)
    };
}

/// Emits an info level log message.
///
/// ```
/// use tmb_log::info;
///
/// info!("Log Fact: The American president Abraham Lincoln (born {:x}) once lived in a log cabin.",
///     0x1809);
/// ```
#[macro_export]
macro_rules! info {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::LogLevel::Info, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Info, $($arg)+)
    };
}

/// Emits a debug level log message.
#[macro_export]
macro_rules! debug {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::LogLevel::Debug, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Debug, $($arg)+)
    };
}

/// Emits a trace level log message.
#[macro_export]
macro_rules! trace {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::log!(logger: $logger, $crate::LogLevel::Trace, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Trace, $($arg)+)
    };
}
