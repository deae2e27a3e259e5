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

//! The metadata client.

use crate::Result;
use crate::backoff::{BackoffPolicy, ExponentialBackoff};
use crate::config::ClientConfig;
use crate::constants::{DEFAULT_ENDPOINT, ENDPOINT_VAR, LOADBALANCER_ENDPOINT};
use crate::env;
use crate::errors::{Error, Unavailable};
use crate::extract::{json_value, tag_value};
use crate::key::MetadataKey;
use crate::retry::{LimitedAttempts, RetryPolicy};
use crate::transport::Transport;
use reqwest::Url;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;

/// The outcome of a metadata lookup.
#[derive(Debug)]
pub enum Lookup {
    /// The value retrieved from the metadata service.
    ///
    /// This is an empty string when the service responded, but the requested
    /// tag or load balancer path does not exist.
    Value(String),
    /// The service was not available, `value` is the caller's default.
    Default { value: String, reason: Unavailable },
}

impl Lookup {
    fn fallback(defaults: &[&str], reason: Unavailable) -> Self {
        Lookup::Default {
            value: defaults.first().map(|v| v.to_string()).unwrap_or_default(),
            reason,
        }
    }

    /// The value, retrieved or default.
    pub fn value(&self) -> &str {
        match self {
            Lookup::Value(v) => v,
            Lookup::Default { value, .. } => value,
        }
    }

    /// Consumes the outcome, returning the value.
    pub fn into_value(self) -> String {
        match self {
            Lookup::Value(v) => v,
            Lookup::Default { value, .. } => value,
        }
    }

    /// Returns `true` if the value is the caller's default.
    pub fn is_default(&self) -> bool {
        matches!(self, Lookup::Default { .. })
    }
}

/// A client for the Azure Instance Metadata Service and the load balancer
/// metadata endpoint.
///
/// Creating a client performs no I/O. The HTTP transport is created on the
/// first lookup and reused by all later lookups, including lookups through
/// clones of this client.
///
/// Every lookup sends a request, values are never cached.
///
/// # Example
/// ```no_run
/// # async fn sample() -> azure_metadata::Result<()> {
/// use azure_metadata::{ClientConfig, MetadataClient};
/// let client = MetadataClient::builder(ClientConfig::default()).build();
/// let location = client.lookup("compute/location", &["unknown"]).await?;
/// # Ok(()) }
/// ```
#[derive(Clone, Debug)]
pub struct MetadataClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    endpoint: String,
    loadbalancer_endpoint: String,
    config: ClientConfig,
    retry_policy: Arc<dyn RetryPolicy>,
    backoff_policy: Arc<dyn BackoffPolicy>,
    cancel: CancellationToken,
    transport: OnceCell<Transport>,
    #[cfg(test)]
    transport_builds: std::sync::atomic::AtomicUsize,
}

impl MetadataClient {
    /// Returns a builder for a client using `config`.
    pub fn builder(config: ClientConfig) -> Builder {
        Builder::new(config)
    }

    /// The base endpoint for instance metadata requests.
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Looks up `key`, returning the first of `defaults` (or an empty string)
    /// if the metadata service is unavailable.
    ///
    /// The only error returned is [Error::Body], for a successful response
    /// whose body cannot be read.
    pub async fn lookup(&self, key: &str, defaults: &[&str]) -> Result<String> {
        self.resolve(key, defaults).await.map(Lookup::into_value)
    }

    /// Looks up `key`, reporting whether the value came from the service or
    /// from `defaults`.
    pub async fn resolve(&self, key: &str, defaults: &[&str]) -> Result<Lookup> {
        let key = MetadataKey::parse(key);
        let url = match key.url(&self.inner.endpoint, &self.inner.loadbalancer_endpoint) {
            Ok(url) => url,
            Err(e) => return Ok(self.fallback(defaults, Unavailable::InvalidUrl(e))),
        };
        tokio::select! {
            biased;
            _ = self.inner.cancel.cancelled() => Ok(self.fallback(defaults, Unavailable::Cancelled)),
            r = self.fetch(&key, &url, defaults) => r,
        }
    }

    async fn fetch(&self, key: &MetadataKey, url: &Url, defaults: &[&str]) -> Result<Lookup> {
        let transport = match self.transport().await {
            Ok(t) => t,
            Err(e) => return Ok(self.fallback(defaults, Unavailable::TransportInit(e))),
        };
        let response = match transport.get(url).await {
            Ok(r) => r,
            Err(reason) => return Ok(self.fallback(defaults, reason)),
        };
        let body = response.text().await.map_err(|source| Error::Body {
            url: url.to_string(),
            source,
        })?;
        let value = match key {
            MetadataKey::LoadBalancer { path } => json_value(&body, path),
            MetadataKey::Tag { name } => tag_value(name, &body),
            MetadataKey::Plain { .. } => body,
        };
        Ok(Lookup::Value(value))
    }

    async fn transport(&self) -> reqwest::Result<&Transport> {
        self.inner
            .transport
            .get_or_try_init(|| async {
                #[cfg(test)]
                self.inner
                    .transport_builds
                    .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                Transport::new(
                    &self.inner.config,
                    self.inner.retry_policy.clone(),
                    self.inner.backoff_policy.clone(),
                )
            })
            .await
    }

    fn fallback(&self, defaults: &[&str], reason: Unavailable) -> Lookup {
        if self.inner.config.debug() {
            tracing::debug!("using default metadata value: {reason}");
        }
        Lookup::fallback(defaults, reason)
    }
}

/// Configures and creates a [MetadataClient].
#[derive(Debug)]
pub struct Builder {
    config: ClientConfig,
    endpoint: Option<String>,
    loadbalancer_endpoint: Option<String>,
    retry_policy: Option<Arc<dyn RetryPolicy>>,
    backoff_policy: Option<Arc<dyn BackoffPolicy>>,
    cancel: Option<CancellationToken>,
}

impl Builder {
    fn new(config: ClientConfig) -> Self {
        Self {
            config,
            endpoint: None,
            loadbalancer_endpoint: None,
            retry_policy: None,
            backoff_policy: None,
            cancel: None,
        }
    }

    /// Overrides the instance metadata endpoint.
    ///
    /// The `GCP_META_ENDPOINT` environment variable, if set, takes precedence
    /// over this value.
    pub fn with_endpoint<V: Into<String>>(mut self, v: V) -> Self {
        self.endpoint = Some(v.into());
        self
    }

    /// Overrides the load balancer metadata endpoint, including its query
    /// parameters.
    pub fn with_loadbalancer_endpoint<V: Into<String>>(mut self, v: V) -> Self {
        self.loadbalancer_endpoint = Some(v.into());
        self
    }

    /// Replaces the default retry policy (3 retries of transient failures).
    pub fn with_retry_policy<V: RetryPolicy + 'static>(mut self, v: V) -> Self {
        self.retry_policy = Some(Arc::new(v));
        self
    }

    /// Replaces the default backoff policy.
    pub fn with_backoff_policy<V: BackoffPolicy + 'static>(mut self, v: V) -> Self {
        self.backoff_policy = Some(Arc::new(v));
        self
    }

    /// Lookups in progress when `v` is cancelled return their default value,
    /// as do all later lookups.
    pub fn with_cancellation(mut self, v: CancellationToken) -> Self {
        self.cancel = Some(v);
        self
    }

    /// Creates the client.
    pub fn build(self) -> MetadataClient {
        let endpoint = env::getenv(ENDPOINT_VAR)
            .or(self.endpoint)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let inner = ClientInner {
            endpoint,
            loadbalancer_endpoint: self
                .loadbalancer_endpoint
                .unwrap_or_else(|| LOADBALANCER_ENDPOINT.to_string()),
            config: self.config,
            retry_policy: self
                .retry_policy
                .unwrap_or_else(|| Arc::new(LimitedAttempts::default())),
            backoff_policy: self
                .backoff_policy
                .unwrap_or_else(|| Arc::new(ExponentialBackoff::default())),
            cancel: self.cancel.unwrap_or_else(CancellationToken::new),
            transport: OnceCell::new(),
            #[cfg(test)]
            transport_builds: std::sync::atomic::AtomicUsize::new(0),
        };
        MetadataClient {
            inner: Arc::new(inner),
        }
    }
}
