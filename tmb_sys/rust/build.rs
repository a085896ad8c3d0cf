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

use std::env;
use std::path::PathBuf;

// `libtmb` is only linked when `TMB_LIB_DIR` points at it.  Without it the
// declarations still compile, which is all that crates testing against a stub
// engine need.
fn main() {
    println!("cargo::rerun-if-env-changed=TMB_LIB_DIR");
    println!("cargo::rerun-if-env-changed=TMB_STATIC");

    let Some(lib_dir) = env::var_os("TMB_LIB_DIR") else {
        return;
    };
    let lib_dir = PathBuf::from(lib_dir);
    println!("cargo::rustc-link-search=native={}", lib_dir.display());

    let kind = if env::var_os("TMB_STATIC").is_some() {
        "static"
    } else {
        "dylib"
    };
    println!("cargo::rustc-link-lib={kind}=tmb");
    println!("cargo::metadata=lib_dir={}", lib_dir.display());
}
