// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Environment lookups.
//!
//! Values are read the way the templating engine reads its own settings: a
//! variable `NAME` may be left unset and replaced by `NAME_FILE`, holding the
//! path of a file that contains the value. This is commonly used to mount
//! configuration as files in containers.

/// Returns the value of `name`, or `None` if it is unset or empty.
///
/// If `name` is unset but `{name}_FILE` is set, the contents of that file are
/// returned, with surrounding whitespace removed. A file that cannot be read
/// is treated as an unset variable.
pub fn getenv(name: &str) -> Option<String> {
    if let Some(v) = std::env::var(name).ok().filter(|v| !v.is_empty()) {
        return Some(v);
    }
    let file_var = format!("{name}_FILE");
    let path = std::env::var(&file_var).ok().filter(|v| !v.is_empty())?;
    match std::fs::read_to_string(&path) {
        Ok(contents) => Some(contents.trim().to_string()).filter(|v| !v.is_empty()),
        Err(e) => {
            tracing::warn!("cannot read {file_var} from {path}: {e}");
            None
        }
    }
}
