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

//! The installed engine and the default logger convenience functions.

use core::fmt::{self, Display};
use std::sync::OnceLock;

use tmb_engine_api::{CallSite, Engine, LogLevel, NopEngine};

use crate::error::{Error, Result};
use crate::logger::{DefaultLogger, LogTarget};

static ENGINE: OnceLock<&'static dyn Engine> = OnceLock::new();
static NOP_ENGINE: NopEngine = NopEngine;

/// Installs the process wide engine.
///
/// Can only succeed once.  [`Logger`](crate::Logger)s created before an
/// engine is installed keep using [`NopEngine`].
pub fn set_engine(engine: &'static dyn Engine) -> Result<()> {
    ENGINE.set(engine).map_err(|_| Error::EngineAlreadySet)
}

/// Installs an owned engine.  See [`set_engine`].
pub fn set_boxed_engine(engine: Box<dyn Engine>) -> Result<()> {
    let mut result = Err(Error::EngineAlreadySet);
    ENGINE.get_or_init(|| {
        result = Ok(());
        &*Box::leak(engine)
    });
    result
}

/// The installed engine, or [`NopEngine`] if none is installed.
pub fn engine() -> &'static dyn Engine {
    match ENGINE.get() {
        Some(engine) => *engine,
        None => &NOP_ENGINE,
    }
}

/// Version string of the installed engine.
pub fn version() -> &'static str {
    engine().version()
}

/// Prints the version of the installed engine.
pub fn print_version() {
    engine().print_version();
}

/// Logs to the default logger at `level`.
pub fn log(level: LogLevel, site: &CallSite<'_>, args: fmt::Arguments<'_>) {
    DefaultLogger::installed().log(level, site, args);
}

/// Logs a runtime `format` string to the default logger at `level`.
///
/// ```
/// use tmb_log::{call_site, log_dyn, LogLevel};
///
/// let template = String::from("{} of {} workers ready");
/// log_dyn(LogLevel::Info, &call_site!(), &template, &[&3, &4]);
/// ```
pub fn log_dyn(level: LogLevel, site: &CallSite<'_>, format: &str, args: &[&dyn Display]) {
    DefaultLogger::installed().log_dyn(level, site, format, args);
}

/// Logs to the default logger at [`LogLevel::Fatal`].
pub fn fatal(site: &CallSite<'_>, args: fmt::Arguments<'_>) {
    log(LogLevel::Fatal, site, args);
}

/// Logs to the default logger at [`LogLevel::Error`].
pub fn error(site: &CallSite<'_>, args: fmt::Arguments<'_>) {
    log(LogLevel::Error, site, args);
}

/// Logs to the default logger at [`LogLevel::Warning`].
pub fn warning(site: &CallSite<'_>, args: fmt::Arguments<'_>) {
    log(LogLevel::Warning, site, args);
}

/// Alias of [`warning`].
pub fn warn(site: &CallSite<'_>, args: fmt::Arguments<'_>) {
    warning(site, args);
}

/// Logs to the default logger at [`LogLevel::Info`].
pub fn info(site: &CallSite<'_>, args: fmt::Arguments<'_>) {
    log(LogLevel::Info, site, args);
}

/// Logs to the default logger at [`LogLevel::Debug`].
pub fn debug(site: &CallSite<'_>, args: fmt::Arguments<'_>) {
    log(LogLevel::Debug, site, args);
}

/// Logs to the default logger at [`LogLevel::Trace`].
pub fn trace(site: &CallSite<'_>, args: fmt::Arguments<'_>) {
    log(LogLevel::Trace, site, args);
}

/// Changes the format the default logger renders records with.  Returns
/// whether the engine accepted it.
pub fn set_default_format(format: &str) -> bool {
    DefaultLogger::installed().set_default_format(format)
}
