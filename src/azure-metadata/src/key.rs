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

//! Classification of metadata keys.
//!
//! Each key selects an endpoint and the interpretation of its response:
//!
//! | Key                          | Request                          | Result                         |
//! | ---------------------------- | -------------------------------- | ------------------------------ |
//! | `loadbalancer/a/0/b`         | load balancer endpoint           | JSON value at `loadbalancer.a.0.b` |
//! | `compute/tags/<name>`        | `<endpoint>/compute/tags`        | value of tag `<name>`          |
//! | anything else                | `<endpoint>/<key>`               | the response body              |

use crate::constants::INSTANCE_QUERY;
use reqwest::Url;

const LOADBALANCER_PREFIX: &str = "loadbalancer/";
const TAGS_KEY: &str = "compute/tags";
const TAGS_PREFIX: &str = "compute/tags/";

/// A metadata key, classified by the endpoint it targets and the way its
/// response is interpreted.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum MetadataKey {
    /// A path into the load balancer metadata document.
    ///
    /// The full key is the path, with `/` separating the segments.
    LoadBalancer { path: String },
    /// A single tag from the instance tag list.
    Tag { name: String },
    /// Any other instance metadata key, returned verbatim.
    Plain { key: String },
}

impl MetadataKey {
    /// Classifies `key`.
    ///
    /// Load balancer keys are checked first, then tag keys. A tag key must
    /// have a name starting with an ASCII letter, otherwise the key is used
    /// as a plain key.
    ///
    /// # Example
    /// ```
    /// # use azure_metadata::key::MetadataKey;
    /// let key = MetadataKey::parse("compute/tags/env");
    /// assert_eq!(key, MetadataKey::Tag { name: "env".to_string() });
    /// ```
    pub fn parse(key: &str) -> Self {
        if key.starts_with(LOADBALANCER_PREFIX) {
            return Self::LoadBalancer {
                path: key.to_string(),
            };
        }
        if let Some(name) = tag_name(key) {
            return Self::Tag {
                name: name.to_string(),
            };
        }
        Self::Plain {
            key: key.to_string(),
        }
    }

    /// The path requested from the instance endpoint, if any.
    pub fn request_key(&self) -> Option<&str> {
        match self {
            Self::LoadBalancer { .. } => None,
            Self::Tag { .. } => Some(TAGS_KEY),
            Self::Plain { key } => Some(key),
        }
    }

    /// Computes the request URL.
    ///
    /// Instance keys are joined to `endpoint` with a single `/`, and the
    /// fixed `api-version` and `format` query parameters are appended. Load
    /// balancer keys always use `loadbalancer_endpoint`, which carries its own
    /// query parameters.
    pub fn url(
        &self,
        endpoint: &str,
        loadbalancer_endpoint: &str,
    ) -> Result<Url, url::ParseError> {
        match self.request_key() {
            None => Url::parse(loadbalancer_endpoint),
            Some(key) => Url::parse(&format!(
                "{}/{}?{INSTANCE_QUERY}",
                endpoint.trim_end_matches('/'),
                key.trim_start_matches('/'),
            )),
        }
    }
}

// Returns the first segment after `compute/tags/`, if it starts with a letter.
fn tag_name(key: &str) -> Option<&str> {
    let rest = key.strip_prefix(TAGS_PREFIX)?;
    if !rest.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }
    rest.split('/').next()
}
