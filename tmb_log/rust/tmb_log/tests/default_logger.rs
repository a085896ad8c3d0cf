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

use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

use tmb_engine_recording::{Event, RecordingEngine};
use tmb_log::{call_site, debug, error, info, warn, Error, LogLevel, NopEngine};

static ENGINE: LazyLock<RecordingEngine> = LazyLock::new(RecordingEngine::new);
static SERIAL: Mutex<()> = Mutex::new(());

// The engine can only be installed once per process, so every test shares
// it and runs one at a time.
fn installed() -> (MutexGuard<'static, ()>, &'static RecordingEngine) {
    let guard = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
    let _ = tmb_log::set_engine(&*ENGINE);
    ENGINE.take();
    (guard, &*ENGINE)
}

#[test]
fn macros_without_logger_write_to_default_logger() {
    let (_guard, engine) = installed();

    let line = line!() + 1;
    info!("count={}", 5);
    warn!("{} retries left", 2);
    debug!("plain");

    let writes = engine.writes();
    assert_eq!(writes.len(), 3);
    assert!(writes.iter().all(|w| w.target.is_none()));
    assert_eq!(writes[0].level, LogLevel::Info);
    assert_eq!(writes[0].message, "count=5");
    assert_eq!(writes[0].line, line);
    assert_eq!(writes[0].file_base, "default_logger.rs");
    assert_eq!(
        writes[0].function,
        "default_logger::macros_without_logger_write_to_default_logger"
    );
    assert_eq!(writes[1].level, LogLevel::Warning);
    assert_eq!(writes[2].message, "plain");
}

#[test]
fn free_functions_write_to_default_logger() {
    let (_guard, engine) = installed();
    let site = call_site!();

    tmb_log::fatal(&site, format_args!("down"));
    tmb_log::trace(&site, format_args!("step {}", 1));
    tmb_log::log(LogLevel::All, &site, format_args!("everything"));

    let written: Vec<(LogLevel, String)> = engine
        .writes()
        .into_iter()
        .map(|w| (w.level, w.message))
        .collect();
    assert_eq!(
        written,
        vec![
            (LogLevel::Fatal, "down".to_string()),
            (LogLevel::Trace, "step 1".to_string()),
            (LogLevel::All, "everything".to_string()),
        ]
    );
}

#[test]
fn mismatched_runtime_format_is_downgraded_to_error() {
    let (_guard, engine) = installed();

    tmb_log::log_dyn(LogLevel::Info, &call_site!(), "count={} of {}", &[&5]);
    error!("after the failure");

    let writes = engine.writes();
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[0].level, LogLevel::Error);
    assert!(writes[0].message.starts_with("[format error]"));
    assert_eq!(writes[0].target, None);
    assert_eq!(writes[1].message, "after the failure");
}

#[test]
fn default_format_is_forwarded() {
    let (_guard, engine) = installed();

    assert!(tmb_log::set_default_format("%L %m"));
    engine.set_reject_formats(true);
    let rejected = tmb_log::set_default_format("%bogus");
    engine.set_reject_formats(false);
    assert!(!rejected);

    assert_eq!(
        engine.take(),
        vec![
            Event::SetFormat {
                target: None,
                format: "%L %m".to_string(),
                accepted: true,
            },
            Event::SetFormat {
                target: None,
                format: "%bogus".to_string(),
                accepted: false,
            },
        ]
    );
}

#[test]
fn version_comes_from_installed_engine() {
    let (_guard, engine) = installed();

    assert_eq!(tmb_log::version(), "recording");
    tmb_log::print_version();
    assert_eq!(engine.take(), vec![Event::PrintVersion]);
}

#[test]
fn engine_can_only_be_installed_once() {
    let (_guard, engine) = installed();

    static OTHER: LazyLock<RecordingEngine> = LazyLock::new(RecordingEngine::new);
    assert_eq!(tmb_log::set_engine(&*OTHER), Err(Error::EngineAlreadySet));
    assert_eq!(
        tmb_log::set_boxed_engine(Box::new(NopEngine)),
        Err(Error::EngineAlreadySet)
    );

    info!("still recorded");
    assert_eq!(engine.writes().len(), 1);
}
