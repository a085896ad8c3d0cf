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

use core::fmt::{self, Display};
use core::mem::ManuallyDrop;

use tmb_engine_api::{CallSite, Engine, LogContext, LogLevel, LoggerConfig, RawLogger, Target};

use crate::error::{Error, Result};
use crate::global;
use crate::render::{render, render_dyn, Rendered};

fn emit<T: LogTarget + ?Sized>(target: &T, site: &CallSite<'_>, rendered: &Rendered) {
    let context = LogContext::capture(rendered.level, site);
    target
        .engine()
        .write(target.target(), &context, &rendered.message);
}

/// Something log calls can be directed at.
///
/// All per level calls funnel into [`LogTarget::log`], which renders the
/// message and forwards it to [`LogTarget::engine`].  The macros call these
/// with a [`CallSite`] captured by [`call_site!`](crate::call_site).
pub trait LogTarget {
    /// Engine records are written to.
    fn engine(&self) -> &dyn Engine;

    /// Engine logger records are written to.
    fn target(&self) -> Target<'_>;

    /// Renders `args` and writes it at `level`.
    fn log(&self, level: LogLevel, site: &CallSite<'_>, args: fmt::Arguments<'_>) {
        emit(self, site, &render(level, args));
    }

    /// Renders a runtime `format` string against `args` and writes it at
    /// `level`.
    fn log_dyn(&self, level: LogLevel, site: &CallSite<'_>, format: &str, args: &[&dyn Display]) {
        emit(self, site, &render_dyn(level, format, args));
    }

    /// Logs at [`LogLevel::Fatal`].
    fn fatal(&self, site: &CallSite<'_>, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Fatal, site, args);
    }

    /// Logs at [`LogLevel::Error`].
    fn error(&self, site: &CallSite<'_>, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Error, site, args);
    }

    /// Logs at [`LogLevel::Warning`].
    fn warning(&self, site: &CallSite<'_>, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Warning, site, args);
    }

    /// Alias of [`LogTarget::warning`].
    fn warn(&self, site: &CallSite<'_>, args: fmt::Arguments<'_>) {
        self.warning(site, args);
    }

    /// Logs at [`LogLevel::Info`].
    fn info(&self, site: &CallSite<'_>, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Info, site, args);
    }

    /// Logs at [`LogLevel::Debug`].
    fn debug(&self, site: &CallSite<'_>, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Debug, site, args);
    }

    /// Logs at [`LogLevel::Trace`].
    fn trace(&self, site: &CallSite<'_>, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Trace, site, args);
    }

    /// Changes the engine format records of this target are rendered with.
    /// Returns whether the engine accepted it.
    fn set_default_format(&self, format: &str) -> bool {
        self.engine().set_default_format(self.target(), format)
    }
}

/// A named engine logger owned by this handle.
///
/// The engine logger is released when the handle is dropped.  Handles can be
/// moved but not cloned, so every engine logger is released exactly once.
///
/// ```
/// use tmb_log::{info, Logger};
///
/// let svc = Logger::new("svc")?;
/// info!(logger: svc, "count={}", 5);
///
/// // Moving hands the engine logger over; only `moved` releases it.
/// let moved = svc;
/// moved.destroy();
/// # Ok::<(), tmb_log::Error>(())
/// ```
pub struct Logger<'e> {
    engine: &'e dyn Engine,
    raw: ManuallyDrop<RawLogger>,
    name: String,
    config: LoggerConfig,
}

impl Logger<'static> {
    /// Creates a logger with the default configuration on the installed
    /// engine.
    pub fn new(name: &str) -> Result<Self> {
        Self::with_config(name, LoggerConfig::default())
    }

    /// Creates a logger on the installed engine.
    pub fn with_config(name: &str, config: LoggerConfig) -> Result<Self> {
        Self::with_engine(global::engine(), name, config)
    }
}

impl<'e> Logger<'e> {
    /// Creates a logger on `engine`.
    pub fn with_engine(engine: &'e dyn Engine, name: &str, config: LoggerConfig) -> Result<Self> {
        let raw = engine
            .create_logger(name, config)
            .ok_or_else(|| Error::CreateLogger {
                name: name.to_string(),
            })?;
        Ok(Self {
            engine,
            raw: ManuallyDrop::new(raw),
            name: name.to_string(),
            config,
        })
    }

    /// Name the logger was created with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configuration the logger was created with.
    pub fn config(&self) -> LoggerConfig {
        self.config
    }

    /// Releases the engine logger now.
    pub fn destroy(self) {
        drop(self);
    }
}

impl Drop for Logger<'_> {
    fn drop(&mut self) {
        // SAFETY: `raw` is only taken here and `self` is never used again.
        let raw = unsafe { ManuallyDrop::take(&mut self.raw) };
        self.engine.destroy_logger(raw);
    }
}

impl LogTarget for Logger<'_> {
    fn engine(&self) -> &dyn Engine {
        self.engine
    }

    fn target(&self) -> Target<'_> {
        Target::Logger(&self.raw)
    }
}

impl fmt::Debug for Logger<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("raw", &*self.raw)
            .finish()
    }
}

/// The engine's process wide default logger.
///
/// Holds no engine resource; the engine owns the default logger's lifecycle.
/// The free functions of this crate log through
/// [`DefaultLogger::installed()`].
#[derive(Clone, Copy)]
pub struct DefaultLogger<'e> {
    engine: &'e dyn Engine,
}

impl DefaultLogger<'static> {
    /// The default logger of the installed engine.
    pub fn installed() -> Self {
        Self::new(global::engine())
    }
}

impl<'e> DefaultLogger<'e> {
    /// The default logger of `engine`.
    pub fn new(engine: &'e dyn Engine) -> Self {
        Self { engine }
    }
}

impl LogTarget for DefaultLogger<'_> {
    fn engine(&self) -> &dyn Engine {
        self.engine
    }

    fn target(&self) -> Target<'_> {
        Target::Default
    }
}

impl fmt::Debug for DefaultLogger<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultLogger")
            .field("engine", &self.engine.version())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call_site;
    use tmb_engine_recording::{Event, RecordingEngine};

    #[test]
    fn construction_asks_engine_for_named_logger() {
        let engine = RecordingEngine::new();
        let config = LoggerConfig::new(LogLevel::Warning, false);
        let logger = Logger::with_engine(&engine, "db", config).unwrap();
        assert_eq!(logger.name(), "db");
        assert_eq!(logger.config(), config);
        assert_eq!(
            engine.events(),
            vec![Event::Created {
                name: "db".to_string(),
                config
            }]
        );
    }

    #[test]
    fn refused_allocation_is_an_error() {
        let engine = RecordingEngine::failing();
        let result = Logger::with_engine(&engine, "db", LoggerConfig::default());
        assert_eq!(
            result.unwrap_err(),
            Error::CreateLogger {
                name: "db".to_string()
            }
        );
        assert_eq!(engine.destroyed_count(), 0);
    }

    #[test]
    fn drop_releases_exactly_once() {
        let engine = RecordingEngine::new();
        {
            let _logger = Logger::with_engine(&engine, "db", LoggerConfig::default()).unwrap();
            assert_eq!(engine.live_loggers(), vec!["db".to_string()]);
        }
        assert!(engine.live_loggers().is_empty());
        assert_eq!(engine.destroyed_count(), 1);
    }

    #[test]
    fn per_level_methods_forward_their_level() {
        let engine = RecordingEngine::new();
        let logger = Logger::with_engine(&engine, "db", LoggerConfig::default()).unwrap();
        let site = call_site!();

        logger.fatal(&site, format_args!("f"));
        logger.error(&site, format_args!("e"));
        logger.warning(&site, format_args!("w"));
        logger.warn(&site, format_args!("w"));
        logger.info(&site, format_args!("i"));
        logger.debug(&site, format_args!("d"));
        logger.trace(&site, format_args!("t"));

        let levels: Vec<LogLevel> = engine.writes().iter().map(|w| w.level).collect();
        assert_eq!(
            levels,
            vec![
                LogLevel::Fatal,
                LogLevel::Error,
                LogLevel::Warning,
                LogLevel::Warning,
                LogLevel::Info,
                LogLevel::Debug,
                LogLevel::Trace,
            ]
        );
        assert!(engine
            .writes()
            .iter()
            .all(|w| w.target.as_deref() == Some("db")));
    }

    #[test]
    fn default_logger_targets_engine_default() {
        let engine = RecordingEngine::new();
        let logger = DefaultLogger::new(&engine);
        logger.info(&call_site!(), format_args!("hello"));
        assert!(logger.set_default_format("%m"));

        let events = engine.events();
        assert!(matches!(&events[0], Event::Write(w) if w.target.is_none() && w.message == "hello"));
        assert!(matches!(&events[1], Event::SetFormat { target: None, .. }));
        assert_eq!(engine.created_count(), 0);
    }
}
