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

//! Raw declarations for the `libtmb` C API (`<tmb/tmb.h>`).
//!
//! Nothing here is safe to call directly; `tmb_engine_native` wraps these in
//! the `tmb_engine_api::Engine` interface.
//!
//! Linking is controlled by the build script: set `TMB_LIB_DIR` to the
//! directory containing `libtmb`, and `TMB_STATIC` to link it statically.
#![allow(non_camel_case_types)]

use core::ffi::CStr;
use core::marker::{PhantomData, PhantomPinned};
use std::borrow::Cow;
use std::ffi::CString;

use libc::{c_char, c_int};

/// `enum tmb_log_level`.
pub type tmb_log_level = c_int;

pub const TMB_LOG_LEVEL_NONE: tmb_log_level = 0;
pub const TMB_LOG_LEVEL_FATAL: tmb_log_level = 1;
pub const TMB_LOG_LEVEL_ERROR: tmb_log_level = 2;
pub const TMB_LOG_LEVEL_WARNING: tmb_log_level = 3;
pub const TMB_LOG_LEVEL_INFO: tmb_log_level = 4;
pub const TMB_LOG_LEVEL_DEBUG: tmb_log_level = 5;
pub const TMB_LOG_LEVEL_TRACE: tmb_log_level = 6;
pub const TMB_LOG_LEVEL_ALL: tmb_log_level = 7;

/// Opaque `tmb_logger_t`.
#[repr(C)]
pub struct tmb_logger_t {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

/// `tmb_logger_cfg_t`.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct tmb_logger_cfg_t {
    pub log_level: tmb_log_level,
    pub enable_colors: bool,
}

/// `tmb_log_ctx_t`.
///
/// String fields are NUL terminated and their lengths exclude the terminator;
/// use [`nul_terminated`] to build them.  `message` and the time fields are
/// filled in by the engine.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct tmb_log_ctx_t {
    pub log_level: tmb_log_level,
    pub line_no: c_int,
    pub filename: *const c_char,
    pub filename_len: c_int,
    pub filename_base: *const c_char,
    pub filename_base_len: c_int,
    pub funcname: *const c_char,
    pub funcname_len: c_int,
    pub message: *const c_char,
    pub message_len: c_int,
    pub ts_sec: i64,
    pub ts_nsec: i64,
    pub stopwatch_sec: i64,
    pub stopwatch_nsec: i64,
}

unsafe extern "C" {
    pub fn tmb_print_version();
    pub fn tmb_get_version() -> *const c_char;

    pub fn tmb_logger_create(name: *const c_char, cfg: tmb_logger_cfg_t) -> *mut tmb_logger_t;
    pub fn tmb_logger_destroy(logger: *mut tmb_logger_t);
    pub fn tmb_get_default_logger() -> *mut tmb_logger_t;

    pub fn tmb_log(ctx: tmb_log_ctx_t, logger: *mut tmb_logger_t, fmt: *const c_char, ...);
    pub fn tmb_log_default(ctx: tmb_log_ctx_t, fmt: *const c_char, ...);

    pub fn tmb_logger_set_default_format(logger: *mut tmb_logger_t, fmt: *const c_char) -> bool;
}

/// `s` as a C string, cut at its first interior NUL.
///
/// Borrows when `s` already ends in its only NUL.
pub fn nul_terminated(s: &str) -> Cow<'_, CStr> {
    if let Ok(c_str) = CStr::from_bytes_with_nul(s.as_bytes()) {
        return Cow::Borrowed(c_str);
    }
    let end = s.find('\0').unwrap_or(s.len());
    Cow::Owned(CString::new(&s[..end]).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_strings_gain_a_terminator() {
        let c_str = nul_terminated("src/main.rs");
        assert_eq!(c_str.to_bytes_with_nul(), b"src/main.rs\0");
        assert_eq!(c_str.count_bytes(), "src/main.rs".len());
    }

    #[test]
    fn terminated_strings_are_borrowed() {
        assert!(matches!(nul_terminated("main.rs\0"), Cow::Borrowed(c) if c == c"main.rs"));
    }

    #[test]
    fn interior_nul_cuts_the_string() {
        assert_eq!(&*nul_terminated("app\0::run"), c"app");
        assert_eq!(&*nul_terminated(""), c"");
    }
}
