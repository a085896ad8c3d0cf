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

//! Message rendering.
//!
//! Rendering never fails from the caller's point of view.  If a message can't
//! be rendered the record is kept, its text replaced by a diagnostic starting
//! with [`FORMAT_ERROR_MARKER`] and its level forced to [`LogLevel::Error`],
//! so the log shows the broken call instead of silently dropping it.
//!
//! A `Display` implementation that panics is caught with `catch_unwind`.  The
//! panic hook still runs first, so the panic message is printed to stderr as
//! usual.  Builds with `panic = "abort"` abort the process instead; only
//! `fmt::Error`s and malformed runtime formats are downgraded there.

use std::any::Any;
use std::borrow::Cow;
use std::fmt::{self, Display};
use std::panic::{self, AssertUnwindSafe};

use tmb_engine_api::LogLevel;

/// Prefix of the message substituted for one that failed to render.
pub const FORMAT_ERROR_MARKER: &str = "[format error]";

/// A rendered message and the level it is logged at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rendered {
    /// Effective level.  [`LogLevel::Error`] if rendering failed.
    pub level: LogLevel,
    /// Message text.
    pub message: Cow<'static, str>,
}

impl Rendered {
    fn format_error(reason: &str) -> Self {
        Self {
            level: LogLevel::Error,
            message: Cow::Owned(format!("{FORMAT_ERROR_MARKER} {reason}")),
        }
    }

    /// Whether this is a substituted diagnostic.
    pub fn is_format_error(&self) -> bool {
        self.message.starts_with(FORMAT_ERROR_MARKER)
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> &str {
    if let Some(reason) = payload.downcast_ref::<&'static str>() {
        reason
    } else if let Some(reason) = payload.downcast_ref::<String>() {
        reason
    } else {
        "formatting panicked"
    }
}

/// Renders compile time checked arguments.
///
/// ```
/// use tmb_log::{render, LogLevel};
///
/// let rendered = render(LogLevel::Info, format_args!("count={}", 5));
/// assert_eq!(rendered.level, LogLevel::Info);
/// assert_eq!(rendered.message, "count=5");
/// ```
pub fn render(level: LogLevel, args: fmt::Arguments<'_>) -> Rendered {
    if let Some(message) = args.as_str() {
        return Rendered {
            level,
            message: Cow::Borrowed(message),
        };
    }

    let mut message = String::new();
    match panic::catch_unwind(AssertUnwindSafe(|| fmt::write(&mut message, args))) {
        Ok(Ok(())) => Rendered {
            level,
            message: Cow::Owned(message),
        },
        Ok(Err(fmt::Error)) => {
            Rendered::format_error("a formatting trait implementation returned an error")
        }
        Err(payload) => Rendered::format_error(panic_reason(payload.as_ref())),
    }
}

/// Renders a format string only known at runtime.
///
/// ```
/// use tmb_log::{render_dyn, LogLevel};
///
/// let rendered = render_dyn(LogLevel::Info, "count={} of {}", &[&5]);
/// assert_eq!(rendered.level, LogLevel::Error);
/// assert!(rendered.is_format_error());
/// ```
pub fn render_dyn(level: LogLevel, format: &str, args: &[&dyn Display]) -> Rendered {
    match panic::catch_unwind(AssertUnwindSafe(|| tmb_format::format(format, args))) {
        Ok(Ok(message)) => Rendered {
            level,
            message: Cow::Owned(message),
        },
        Ok(Err(e)) => Rendered::format_error(&e.to_string()),
        Err(payload) => Rendered::format_error(panic_reason(payload.as_ref())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingDisplay;

    impl Display for FailingDisplay {
        fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    struct PanickingDisplay;

    impl Display for PanickingDisplay {
        fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
            panic!("display exploded")
        }
    }

    #[test]
    fn well_formed_messages_keep_their_level() {
        for level in LogLevel::ALL_LEVELS {
            let rendered = render(level, format_args!("{} + {} = {}", 1, 2, 1 + 2));
            assert_eq!(rendered.level, level);
            assert_eq!(rendered.message, "1 + 2 = 3");
            assert!(!rendered.is_format_error());
        }
    }

    #[test]
    fn literal_messages_are_borrowed() {
        let rendered = render(LogLevel::Debug, format_args!("static text"));
        assert!(matches!(rendered.message, Cow::Borrowed("static text")));
    }

    #[test]
    fn failing_display_downgrades_to_error() {
        for level in [LogLevel::Trace, LogLevel::Info, LogLevel::Fatal] {
            let rendered = render(level, format_args!("value={}", FailingDisplay));
            assert_eq!(rendered.level, LogLevel::Error);
            assert!(rendered.is_format_error());
        }
    }

    #[test]
    fn panicking_display_downgrades_to_error() {
        let rendered = render(LogLevel::Info, format_args!("value={}", PanickingDisplay));
        assert_eq!(rendered.level, LogLevel::Error);
        assert_eq!(rendered.message, "[format error] display exploded");

        let rendered = render_dyn(LogLevel::Info, "value={}", &[&PanickingDisplay]);
        assert_eq!(rendered.level, LogLevel::Error);
        assert_eq!(rendered.message, "[format error] display exploded");
    }

    #[test]
    fn runtime_formats_render_like_compile_time_ones() {
        let rendered = render_dyn(LogLevel::Warning, "count={}", &[&5]);
        assert_eq!(
            rendered,
            Rendered {
                level: LogLevel::Warning,
                message: Cow::Borrowed("count=5"),
            }
        );
    }

    #[test]
    fn malformed_runtime_formats_downgrade_to_error() {
        let cases: [(&str, &[&dyn Display]); 5] = [
            ("count={} of {}", &[&5]),
            ("count={", &[&5]),
            ("count=}", &[&5]),
            ("count={:x}", &[&5]),
            ("count={name}", &[&5]),
        ];
        for (format, args) in cases {
            let rendered = render_dyn(LogLevel::Debug, format, args);
            assert_eq!(rendered.level, LogLevel::Error, "{format}");
            assert!(rendered.message.starts_with("[format error] "), "{format}");
            assert_ne!(rendered.message, "count=5");
        }
    }
}
