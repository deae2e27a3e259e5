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

//! Errors and fallback reasons for metadata lookups.
//!
//! Lookups distinguish three kinds of failure:
//! * [ConfigError] - the process configuration is invalid. Applications
//!   should treat these as fatal at startup.
//! * [Unavailable] - the metadata service could not be used. The lookup
//!   recovers by returning the caller's default, the reason is reported in
//!   [Lookup::Default][crate::Lookup::Default].
//! * [Error::Body] - the service returned a successful status, but the body
//!   could not be read. This is the only per-request failure returned to the
//!   caller.

use reqwest::StatusCode;
use std::num::ParseIntError;

/// The error type for metadata lookups.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The response status was successful, but reading its body failed.
    #[error("failed to read response body from {url}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The process-wide configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Returns `true` if the error was caused by reading a response body.
    pub fn is_body(&self) -> bool {
        matches!(self, Error::Body { .. })
    }

    /// Returns `true` if the error was caused by invalid configuration.
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

/// Invalid configuration found in the environment.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid {var} value '{value}' - must be an integer")]
    InvalidTimeout {
        var: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// The reason a lookup returned the caller's default value.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Unavailable {
    /// The key did not produce a valid request URL.
    #[error("cannot build metadata request URL")]
    InvalidUrl(#[source] url::ParseError),

    /// The HTTP transport could not be initialized.
    #[error("cannot initialize the HTTP transport")]
    TransportInit(#[source] reqwest::Error),

    /// The request failed to complete, after exhausting any retries.
    #[error("the metadata request failed")]
    Transport(#[source] reqwest::Error),

    /// The service returned an error status.
    #[error("the metadata service returned {0}")]
    Status(StatusCode),

    /// The client was cancelled before the request completed.
    #[error("the metadata request was cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_fmt() {
        let source = "abc".parse::<u64>().unwrap_err();
        let e = ConfigError::InvalidTimeout {
            var: "TEST_VAR",
            value: "abc".to_string(),
            source,
        };
        let got = format!("{e}");
        assert_eq!(got, "invalid TEST_VAR value 'abc' - must be an integer");
        assert!(std::error::Error::source(&e).is_some(), "{e:?}");

        let e = Error::from(e);
        assert!(e.is_config(), "{e:?}");
        assert!(!e.is_body(), "{e:?}");
        assert_eq!(format!("{e}"), got);
    }

    #[test]
    fn unavailable_fmt() {
        let got = format!("{}", Unavailable::Status(StatusCode::NOT_FOUND));
        assert!(got.contains("404"), "{got}");
        let got = format!("{}", Unavailable::Cancelled);
        assert!(got.contains("cancelled"), "{got}");
    }
}
