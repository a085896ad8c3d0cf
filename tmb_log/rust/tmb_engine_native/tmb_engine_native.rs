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

//! `tmb_log` engine backed by `libtmb`.
//!
//! ```no_run
//! use tmb_log::info;
//!
//! tmb_engine_native::install()?;
//! info!("running {}", tmb_log::version());
//! # Ok::<(), tmb_log::Error>(())
//! ```
//!
//! *Note*: Every call crosses FFI.  Call site strings are handed to `libtmb`
//! as NUL terminated copies with their lengths.  The rendered message is
//! always passed as the argument of a `%.*s` format, so text containing `%` is
//! printed verbatim.
#![deny(missing_docs)]

use core::ffi::{c_void, CStr};
use core::ptr::{self, NonNull};
use std::borrow::Cow;
use std::ffi::CString;

use libc::{c_char, c_int};
use tmb_engine_api::{Engine, LogContext, LogLevel, LoggerConfig, RawLogger, Target};
use tmb_sys as sys;

const MESSAGE_FORMAT: &CStr = c"%.*s";

static NATIVE: NativeEngine = NativeEngine;

/// The `libtmb` engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeEngine;

/// Installs [`NativeEngine`] as the `tmb_log` engine.
pub fn install() -> tmb_log::Result<()> {
    tmb_log::set_engine(&NATIVE)
}

const fn native_level(level: LogLevel) -> sys::tmb_log_level {
    match level {
        LogLevel::None => sys::TMB_LOG_LEVEL_NONE,
        LogLevel::Fatal => sys::TMB_LOG_LEVEL_FATAL,
        LogLevel::Error => sys::TMB_LOG_LEVEL_ERROR,
        LogLevel::Warning => sys::TMB_LOG_LEVEL_WARNING,
        LogLevel::Info => sys::TMB_LOG_LEVEL_INFO,
        LogLevel::Debug => sys::TMB_LOG_LEVEL_DEBUG,
        LogLevel::Trace => sys::TMB_LOG_LEVEL_TRACE,
        LogLevel::All => sys::TMB_LOG_LEVEL_ALL,
    }
}

// Lengths beyond `c_int::MAX` are truncated by the engine.
fn c_len(len: usize) -> c_int {
    c_int::try_from(len).unwrap_or(c_int::MAX)
}

/// NUL terminated copies of a [`LogContext`]'s strings.
struct CallSiteStrings<'a> {
    file: Cow<'a, CStr>,
    file_base: Cow<'a, CStr>,
    function: Cow<'a, CStr>,
}

impl<'a> CallSiteStrings<'a> {
    fn new(context: &LogContext<'a>) -> Self {
        Self {
            file: sys::nul_terminated(context.file),
            file_base: sys::nul_terminated(context.file_base),
            function: sys::nul_terminated(context.function),
        }
    }
}

/// The returned context borrows from `strings`.
fn native_context(context: &LogContext<'_>, strings: &CallSiteStrings<'_>) -> sys::tmb_log_ctx_t {
    sys::tmb_log_ctx_t {
        log_level: native_level(context.level),
        line_no: c_int::try_from(context.line).unwrap_or(c_int::MAX),
        filename: strings.file.as_ptr(),
        filename_len: c_len(strings.file.count_bytes()),
        filename_base: strings.file_base.as_ptr(),
        filename_base_len: c_len(strings.file_base.count_bytes()),
        funcname: strings.function.as_ptr(),
        funcname_len: c_len(strings.function.count_bytes()),
        message: ptr::null(),
        message_len: 0,
        ts_sec: 0,
        ts_nsec: 0,
        stopwatch_sec: 0,
        stopwatch_nsec: 0,
    }
}

fn native_logger(logger: &RawLogger) -> *mut sys::tmb_logger_t {
    logger.as_ptr().cast::<sys::tmb_logger_t>()
}

impl Engine for NativeEngine {
    fn version(&self) -> &str {
        // SAFETY: `tmb_get_version` returns a pointer to a static string or
        // NULL.
        let version = unsafe { sys::tmb_get_version() };
        if version.is_null() {
            return "unknown";
        }
        // SAFETY: Non NULL versions are NUL terminated and never freed.
        unsafe { CStr::from_ptr(version) }
            .to_str()
            .unwrap_or("unknown")
    }

    fn print_version(&self) {
        // SAFETY: No preconditions.
        unsafe { sys::tmb_print_version() }
    }

    fn create_logger(&self, name: &str, config: LoggerConfig) -> Option<RawLogger> {
        // Names with interior NULs can not be expressed to the engine.
        let name = CString::new(name).ok()?;
        let config = sys::tmb_logger_cfg_t {
            log_level: native_level(config.level),
            enable_colors: config.enable_colors,
        };
        // SAFETY: `name` is NUL terminated and outlives the call; the engine
        // copies it.
        let logger = unsafe { sys::tmb_logger_create(name.as_ptr(), config) };
        let logger = NonNull::new(logger.cast::<c_void>())?;
        // SAFETY: A fresh engine logger, owned by the returned handle only.
        Some(unsafe { RawLogger::from_ptr(logger) })
    }

    fn destroy_logger(&self, logger: RawLogger) {
        // SAFETY: `logger` came from `tmb_logger_create` and, being moved in,
        // is destroyed at most once.
        unsafe { sys::tmb_logger_destroy(native_logger(&logger)) }
    }

    fn write(&self, target: Target<'_>, context: &LogContext<'_>, message: &str) {
        let strings = CallSiteStrings::new(context);
        let ctx = native_context(context, &strings);
        let len = c_len(message.len());
        let message = message.as_ptr().cast::<c_char>();
        match target {
            // SAFETY: The strings in `ctx` are NUL terminated and, like
            // `message`, live until the call returns.  `%.*s` consumes
            // exactly the `c_int` and pointer passed after it.
            Target::Default => unsafe {
                sys::tmb_log_default(ctx, MESSAGE_FORMAT.as_ptr(), len, message)
            },
            // SAFETY: As above; `logger` is live while it is borrowed.
            Target::Logger(logger) => unsafe {
                sys::tmb_log(
                    ctx,
                    native_logger(logger),
                    MESSAGE_FORMAT.as_ptr(),
                    len,
                    message,
                )
            },
        }
    }

    fn set_default_format(&self, target: Target<'_>, format: &str) -> bool {
        let Ok(format) = CString::new(format) else {
            return false;
        };
        let logger = match target {
            // SAFETY: No preconditions.
            Target::Default => unsafe { sys::tmb_get_default_logger() },
            Target::Logger(logger) => native_logger(logger),
        };
        if logger.is_null() {
            return false;
        }
        // SAFETY: `logger` is live and `format` is NUL terminated; the engine
        // compiles the format before returning.
        unsafe { sys::tmb_logger_set_default_format(logger, format.as_ptr()) }
    }
}
