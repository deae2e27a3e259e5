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

//! Retry policies for metadata requests.
//!
//! Metadata requests are `GET` requests and always safe to retry. The policy
//! decides which failures are transient and how many attempts to make.

use crate::constants::DEFAULT_MAX_RETRIES;
use reqwest::StatusCode;
use std::time::{Duration, Instant};

/// A failed request attempt.
#[derive(Debug)]
pub enum Failure {
    /// The request could not be sent or the response headers never arrived.
    Transport(reqwest::Error),
    /// The service returned an error status.
    Status {
        status: StatusCode,
        /// The delay requested by the service in a `Retry-After` header.
        retry_after: Option<Duration>,
    },
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Failure::Transport(e) => write!(f, "{e}"),
            Failure::Status { status, .. } => write!(f, "unexpected status {status}"),
        }
    }
}

/// The result of a retry policy decision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RetryFlow {
    /// The failure is transient and the policy allows another attempt.
    Continue,
    /// The failure is not transient, stop the loop.
    Permanent,
    /// The failure is transient, but the policy is stopping the loop.
    Exhausted,
}

/// Controls the retry loop.
pub trait RetryPolicy: Send + Sync + std::fmt::Debug {
    /// Query the retry policy after a failed attempt.
    ///
    /// # Parameters
    /// * `loop_start` - when the retry loop started.
    /// * `attempt_count` - the number of attempts, including the one that
    ///   just failed.
    /// * `failure` - the failure from the last attempt.
    fn on_error(&self, loop_start: Instant, attempt_count: u32, failure: &Failure) -> RetryFlow;
}

/// Retries transient failures, up to a maximum number of retries.
///
/// # Example
/// ```
/// # use azure_metadata::retry::LimitedAttempts;
/// // One initial attempt and up to 5 retries.
/// let policy = LimitedAttempts::new(5);
/// assert_eq!(policy.maximum_retries(), 5);
/// ```
#[derive(Clone, Debug)]
pub struct LimitedAttempts {
    maximum_retries: u32,
}

impl LimitedAttempts {
    /// Creates a policy that retries at most `maximum_retries` times.
    pub fn new(maximum_retries: u32) -> Self {
        Self { maximum_retries }
    }

    /// The maximum number of retries, the initial attempt is not included.
    pub fn maximum_retries(&self) -> u32 {
        self.maximum_retries
    }
}

impl Default for LimitedAttempts {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES)
    }
}

impl RetryPolicy for LimitedAttempts {
    fn on_error(
        &self,
        _loop_start: Instant,
        attempt_count: u32,
        failure: &Failure,
    ) -> RetryFlow {
        if !is_transient(failure) {
            return RetryFlow::Permanent;
        }
        if attempt_count > self.maximum_retries {
            return RetryFlow::Exhausted;
        }
        RetryFlow::Continue
    }
}

/// Returns `true` if another attempt may succeed.
pub fn is_transient(failure: &Failure) -> bool {
    match failure {
        // Builder and redirect errors repeat on every attempt.
        Failure::Transport(e) => !(e.is_builder() || e.is_redirect()),
        Failure::Status { status, .. } => is_retryable(*status),
    }
}

/// Returns `true` for status codes that indicate a transient problem.
pub(crate) fn is_retryable(c: StatusCode) -> bool {
    c == StatusCode::TOO_MANY_REQUESTS
        || (c.is_server_error() && c != StatusCode::NOT_IMPLEMENTED)
}
