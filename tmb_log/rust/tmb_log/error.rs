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

use thiserror::Error;

/// Errors returned by `tmb_log`.
///
/// Rendering problems are never reported here; see [`crate::render`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The engine refused to allocate a named logger.
    #[error("failed to create logger `{name}`")]
    CreateLogger {
        /// Name passed to the engine.
        name: String,
    },

    /// [`crate::set_engine`] was called after an engine was installed.
    #[error("a logging engine is already installed")]
    EngineAlreadySet,
}

/// `tmb_log` result type.
pub type Result<T> = core::result::Result<T, Error>;
