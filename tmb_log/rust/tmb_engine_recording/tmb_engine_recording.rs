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

//! `tmb_log` engine that records every call in memory.
//!
//! Used to test the facade without linking `libtmb`.  Allocation failure and
//! format rejection can be switched on to exercise error paths.
//!
//! ```
//! use tmb_engine_api::{CallSite, Engine, LogContext, LogLevel, Target};
//! use tmb_engine_recording::{Event, RecordingEngine};
//!
//! let engine = RecordingEngine::new();
//! let site = CallSite::new("src/main.rs", 3, "demo::main");
//! engine.write(Target::Default, &LogContext::capture(LogLevel::Info, &site), "hi");
//!
//! let writes = engine.writes();
//! assert_eq!(writes[0].message, "hi");
//! assert_eq!(writes[0].target, None);
//! ```
#![deny(missing_docs)]

use std::collections::HashMap;
use std::ffi::c_void;
use std::ptr::{self, NonNull};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tmb_engine_api::{Engine, LogContext, LogLevel, LoggerConfig, RawLogger, Target};

/// A `write` call as seen by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteRecord {
    /// Name of the target logger, `None` for the default logger.
    pub target: Option<String>,
    /// Effective level.
    pub level: LogLevel,
    /// Line number.
    pub line: u32,
    /// Full source path.
    pub file: String,
    /// Source base name.
    pub file_base: String,
    /// Enclosing function.
    pub function: String,
    /// Rendered message.
    pub message: String,
}

/// A recorded engine call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// `print_version()`
    PrintVersion,
    /// A successful `create_logger()`.
    Created {
        /// Logger name.
        name: String,
        /// Requested configuration.
        config: LoggerConfig,
    },
    /// A `create_logger()` refused because allocation failure is simulated.
    CreateFailed {
        /// Logger name.
        name: String,
    },
    /// `destroy_logger()` of a live logger.
    Destroyed {
        /// Logger name.
        name: String,
    },
    /// `destroy_logger()` of a logger that is not live.
    InvalidDestroy,
    /// `write()`
    Write(WriteRecord),
    /// `set_default_format()`
    SetFormat {
        /// Name of the target logger, `None` for the default logger.
        target: Option<String>,
        /// Requested format.
        format: String,
        /// Value returned to the caller.
        accepted: bool,
    },
}

/// In-memory [`Engine`].
#[derive(Debug, Default)]
pub struct RecordingEngine {
    events: Mutex<Vec<Event>>,
    loggers: Mutex<HashMap<usize, String>>,
    next_id: AtomicUsize,
    fail_allocation: AtomicBool,
    reject_formats: AtomicBool,
}

impl RecordingEngine {
    /// Creates an engine that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine whose `create_logger()` always fails.
    pub fn failing() -> Self {
        let engine = Self::new();
        engine.set_fail_allocation(true);
        engine
    }

    /// Makes subsequent `create_logger()` calls fail or succeed.
    pub fn set_fail_allocation(&self, fail: bool) {
        self.fail_allocation.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent `set_default_format()` calls return `false` or `true`.
    pub fn set_reject_formats(&self, reject: bool) {
        self.reject_formats.store(reject, Ordering::SeqCst);
    }

    /// All events recorded so far.
    pub fn events(&self) -> Vec<Event> {
        self.lock_events().clone()
    }

    /// Removes and returns all events recorded so far.
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.lock_events())
    }

    /// All recorded writes.
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.lock_events()
            .iter()
            .filter_map(|event| match event {
                Event::Write(record) => Some(record.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of successful `create_logger()` calls.
    pub fn created_count(&self) -> usize {
        self.count(|event| matches!(event, Event::Created { .. }))
    }

    /// Number of `destroy_logger()` calls, valid or not.
    pub fn destroyed_count(&self) -> usize {
        self.count(|event| matches!(event, Event::Destroyed { .. } | Event::InvalidDestroy))
    }

    /// Names of loggers created and not yet destroyed.
    pub fn live_loggers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock_loggers().values().cloned().collect();
        names.sort();
        names
    }

    fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.lock_events().iter().filter(|event| predicate(event)).count()
    }

    fn record(&self, event: Event) {
        self.lock_events().push(event);
    }

    fn lock_events(&self) -> MutexGuard<'_, Vec<Event>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_loggers(&self) -> MutexGuard<'_, HashMap<usize, String>> {
        self.loggers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn target_name(&self, target: Target<'_>) -> Option<String> {
        match target {
            Target::Default => None,
            Target::Logger(logger) => Some(
                self.lock_loggers()
                    .get(&logger.as_ptr().addr())
                    .cloned()
                    .unwrap_or_else(|| "<destroyed>".to_string()),
            ),
        }
    }
}

impl Engine for RecordingEngine {
    fn version(&self) -> &str {
        "recording"
    }

    fn print_version(&self) {
        self.record(Event::PrintVersion);
    }

    fn create_logger(&self, name: &str, config: LoggerConfig) -> Option<RawLogger> {
        if self.fail_allocation.load(Ordering::SeqCst) {
            self.record(Event::CreateFailed {
                name: name.to_string(),
            });
            return None;
        }

        // Loggers are identified by address only and never dereferenced.
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let ptr = NonNull::new(ptr::without_provenance_mut::<c_void>(id))?;
        self.lock_loggers().insert(id, name.to_string());
        self.record(Event::Created {
            name: name.to_string(),
            config,
        });
        // SAFETY: `id` was just allocated and is owned by nothing else.
        Some(unsafe { RawLogger::from_ptr(ptr) })
    }

    fn destroy_logger(&self, logger: RawLogger) {
        let removed = self.lock_loggers().remove(&logger.as_ptr().addr());
        match removed {
            Some(name) => self.record(Event::Destroyed { name }),
            None => self.record(Event::InvalidDestroy),
        }
    }

    fn write(&self, target: Target<'_>, context: &LogContext<'_>, message: &str) {
        let target = self.target_name(target);
        self.record(Event::Write(WriteRecord {
            target,
            level: context.level,
            line: context.line,
            file: context.file.to_string(),
            file_base: context.file_base.to_string(),
            function: context.function.to_string(),
            message: message.to_string(),
        }));
    }

    fn set_default_format(&self, target: Target<'_>, format: &str) -> bool {
        let accepted = !self.reject_formats.load(Ordering::SeqCst);
        let target = self.target_name(target);
        self.record(Event::SetFormat {
            target,
            format: format.to_string(),
            accepted,
        });
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_loggers_are_tracked_until_destroyed() {
        let engine = RecordingEngine::new();
        let a = engine.create_logger("a", LoggerConfig::default()).unwrap();
        let b = engine.create_logger("b", LoggerConfig::default()).unwrap();
        assert_ne!(a.as_ptr(), b.as_ptr());
        assert_eq!(engine.live_loggers(), vec!["a".to_string(), "b".to_string()]);

        engine.destroy_logger(a);
        assert_eq!(engine.live_loggers(), vec!["b".to_string()]);
        assert_eq!(engine.created_count(), 2);
        assert_eq!(engine.destroyed_count(), 1);
    }

    #[test]
    fn failing_engine_refuses_allocation() {
        let engine = RecordingEngine::failing();
        assert!(engine.create_logger("svc", LoggerConfig::default()).is_none());
        assert_eq!(
            engine.events(),
            vec![Event::CreateFailed {
                name: "svc".to_string()
            }]
        );
    }

    #[test]
    fn rejected_formats_are_reported() {
        let engine = RecordingEngine::new();
        engine.set_reject_formats(true);
        assert!(!engine.set_default_format(Target::Default, "%m"));
        engine.set_reject_formats(false);
        assert!(engine.set_default_format(Target::Default, "%m"));
        assert_eq!(engine.take().len(), 2);
        assert!(engine.events().is_empty());
    }
}
