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

//! Template namespace glue.
//!
//! The templating engine registers an [AzureFuncs] value under the
//! [NAMESPACE] name, so templates can call `azure.Meta "compute/name"`.

use crate::Result;
use crate::client::MetadataClient;
use crate::config::ClientConfig;
use crate::errors::ConfigError;
use std::sync::OnceLock;
use tokio_util::sync::CancellationToken;

/// The name of the template namespace.
pub const NAMESPACE: &str = "azure";

/// The functions exposed in the `azure` template namespace.
///
/// The namespace creates its [MetadataClient] on the first call, and uses
/// the same client for every call after that.
#[derive(Debug)]
pub struct AzureFuncs {
    config: ClientConfig,
    cancel: CancellationToken,
    meta: OnceLock<MetadataClient>,
}

impl AzureFuncs {
    /// Creates the namespace with an explicit configuration.
    ///
    /// Cancelling `cancel` makes all pending and future lookups return their
    /// default values.
    pub fn new(config: ClientConfig, cancel: CancellationToken) -> Self {
        Self {
            config,
            cancel,
            meta: OnceLock::new(),
        }
    }

    /// Creates the namespace with the process-wide configuration.
    ///
    /// Returns an error if the environment contains an invalid configuration.
    /// Applications should treat this error as fatal.
    pub fn from_env(cancel: CancellationToken) -> std::result::Result<Self, ConfigError> {
        let config = ClientConfig::shared()?;
        Ok(Self::new(config.clone(), cancel))
    }

    /// Retrieves a value from the instance or load balancer metadata,
    /// returning the first of `defaults` if the service is unavailable.
    pub async fn meta(&self, key: &str, defaults: &[&str]) -> Result<String> {
        self.client().lookup(key, defaults).await
    }

    fn client(&self) -> &MetadataClient {
        self.meta.get_or_init(|| {
            MetadataClient::builder(self.config.clone())
                .with_cancellation(self.cancel.clone())
                .build()
        })
    }
}
