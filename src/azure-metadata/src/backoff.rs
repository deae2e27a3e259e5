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

//! Backoff policies for the metadata retry loop.
//!
//! A metadata service that is restarting or overloaded needs time to recover,
//! so retries wait for an increasing, randomized delay.

use std::time::Duration;

const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);
const DEFAULT_MAXIMUM_DELAY: Duration = Duration::from_secs(30);
const MINIMUM_DELAY: Duration = Duration::from_millis(1);

/// Computes how long to wait before the next attempt.
pub trait BackoffPolicy: Send + Sync + std::fmt::Debug {
    /// Returns the delay after `attempt_count` failed attempts. This method
    /// is always called after the first attempt.
    fn on_failure(&self, attempt_count: u32) -> Duration;
}

/// Doubles the delay bound after each failed attempt, up to a maximum, and
/// waits for a random duration below that bound.
///
/// # Example
/// ```
/// # use azure_metadata::backoff::ExponentialBackoff;
/// use std::time::Duration;
///
/// let policy = ExponentialBackoff::new(Duration::from_millis(100), Duration::from_secs(5));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ExponentialBackoff {
    initial_delay: Duration,
    maximum_delay: Duration,
}

impl ExponentialBackoff {
    /// Creates a policy whose first delay is at most `initial_delay` and no
    /// delay exceeds `maximum_delay`.
    ///
    /// The initial delay is raised to 1ms if smaller, and the maximum delay to
    /// the initial delay.
    pub fn new(initial_delay: Duration, maximum_delay: Duration) -> Self {
        let initial_delay = initial_delay.max(MINIMUM_DELAY);
        Self {
            initial_delay,
            maximum_delay: maximum_delay.max(initial_delay),
        }
    }

    fn bound(&self, attempt_count: u32) -> Duration {
        let doublings = attempt_count.saturating_sub(1).min(31);
        self.initial_delay
            .checked_mul(1_u32 << doublings)
            .map_or(self.maximum_delay, |d| d.min(self.maximum_delay))
    }

    fn jittered(&self, attempt_count: u32, rng: &mut impl rand::Rng) -> Duration {
        rng.random_range(Duration::ZERO..=self.bound(attempt_count))
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_DELAY, DEFAULT_MAXIMUM_DELAY)
    }
}

impl BackoffPolicy for ExponentialBackoff {
    fn on_failure(&self, attempt_count: u32) -> Duration {
        self.jittered(attempt_count, &mut rand::rng())
    }
}
