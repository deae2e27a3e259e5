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

use crate::backoff::BackoffPolicy;
use crate::config::ClientConfig;
use crate::constants::{MAX_RETRY_AFTER, METADATA_HEADER, METADATA_HEADER_VALUE};
use crate::errors::Unavailable;
use crate::retry::{Failure, RetryFlow, RetryPolicy};
use reqwest::header::RETRY_AFTER;
use reqwest::{Response, StatusCode, Url};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// The HTTP transport for metadata requests.
///
/// Wraps a `reqwest::Client` configured with the per-attempt timeout, and
/// runs each request in a retry loop.
#[derive(Debug)]
pub(crate) struct Transport {
    inner: reqwest::Client,
    retry_policy: Arc<dyn RetryPolicy>,
    backoff_policy: Arc<dyn BackoffPolicy>,
    debug: bool,
}

impl Transport {
    pub(crate) fn new(
        config: &ClientConfig,
        retry_policy: Arc<dyn RetryPolicy>,
        backoff_policy: Arc<dyn BackoffPolicy>,
    ) -> reqwest::Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.effective_timeout())
            .build()?;
        Ok(Self {
            inner,
            retry_policy,
            backoff_policy,
            debug: config.debug(),
        })
    }

    /// Sends a `GET` request with the metadata header, retrying transient
    /// failures.
    ///
    /// Returns the response for any status below 400. The body is not read.
    pub(crate) async fn get(&self, url: &Url) -> Result<Response, Unavailable> {
        let loop_start = Instant::now();
        let mut attempt_count = 0;
        loop {
            attempt_count += 1;
            let failure = match self.attempt(url).await {
                Ok(response) => return Ok(response),
                Err(failure) => failure,
            };
            match self
                .retry_policy
                .on_error(loop_start, attempt_count, &failure)
            {
                RetryFlow::Continue => {}
                RetryFlow::Permanent | RetryFlow::Exhausted => return Err(failure.into()),
            }
            let delay = match &failure {
                Failure::Status {
                    retry_after: Some(d),
                    ..
                } => (*d).min(MAX_RETRY_AFTER),
                _ => self.backoff_policy.on_failure(attempt_count),
            };
            if self.debug {
                tracing::debug!(
                    %url,
                    attempt_count,
                    ?delay,
                    "retrying metadata request: {failure}"
                );
            }
            tokio::time::sleep(delay).await;
        }
    }

    async fn attempt(&self, url: &Url) -> Result<Response, Failure> {
        let response = self
            .inner
            .get(url.clone())
            .header(METADATA_HEADER, METADATA_HEADER_VALUE)
            .send()
            .await
            .map_err(Failure::Transport)?;
        let status = response.status();
        if status.as_u16() < 400 {
            return Ok(response);
        }
        Err(Failure::Status {
            status,
            retry_after: retry_after(&response),
        })
    }
}

// Only honored for the statuses where services send it to pace clients.
fn retry_after(response: &Response) -> Option<Duration> {
    match response.status() {
        StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE => response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs),
        _ => None,
    }
}

impl From<Failure> for Unavailable {
    fn from(value: Failure) -> Self {
        match value {
            Failure::Transport(e) => Unavailable::Transport(e),
            Failure::Status { status, .. } => Unavailable::Status(status),
        }
    }
}
