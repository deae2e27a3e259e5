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

//! Process-wide client configuration.

use crate::constants::{DEBUG_VAR, DEFAULT_TIMEOUT, TIMEOUT_VAR};
use crate::env;
use crate::errors::ConfigError;
use std::sync::OnceLock;
use std::time::Duration;

/// Configuration shared by all the [MetadataClient][crate::MetadataClient]
/// instances in a process.
///
/// Applications typically load this once, with [ClientConfig::shared], and
/// pass it to each client. Tests and applications with their own
/// configuration sources can build it directly.
///
/// # Example
/// ```
/// # use azure_metadata::ClientConfig;
/// use std::time::Duration;
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(2))
///     .with_debug(true);
/// assert_eq!(config.timeout(), Duration::from_secs(2));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    timeout: Duration,
    debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            debug: false,
        }
    }
}

impl ClientConfig {
    /// Changes the timeout for each request attempt.
    ///
    /// A zero timeout is replaced by the default (500ms) when the client
    /// creates its transport.
    pub fn with_timeout(mut self, v: Duration) -> Self {
        self.timeout = v;
        self
    }

    /// Enables diagnostics for retries and fallbacks.
    pub fn with_debug(mut self, v: bool) -> Self {
        self.debug = v;
        self
    }

    /// The timeout for each request attempt.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether retry and fallback diagnostics are enabled.
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Loads the configuration from the environment.
    ///
    /// * `GCP_TIMEOUT` - the per-attempt timeout, in milliseconds. Defaults to
    ///   500 when unset or empty.
    /// * `GOMPLATE_DEBUG` - any non-empty value enables diagnostics.
    ///
    /// Both variables may be supplied through a `_FILE` variant, see
    /// [getenv][crate::env::getenv].
    pub fn from_env() -> Result<Self, ConfigError> {
        let timeout = match env::getenv(TIMEOUT_VAR) {
            None => DEFAULT_TIMEOUT,
            Some(value) => {
                let millis = value
                    .parse::<u64>()
                    .map_err(|source| ConfigError::InvalidTimeout {
                        var: TIMEOUT_VAR,
                        value: value.clone(),
                        source,
                    })?;
                Duration::from_millis(millis)
            }
        };
        Ok(Self {
            timeout,
            debug: env::getenv(DEBUG_VAR).is_some(),
        })
    }

    /// Loads the configuration from the environment, once per process.
    ///
    /// The first call reads the environment, later calls return the same
    /// result, including any error.
    pub fn shared() -> Result<&'static Self, ConfigError> {
        static SHARED: OnceLock<Result<ClientConfig, ConfigError>> = OnceLock::new();
        SHARED
            .get_or_init(ClientConfig::from_env)
            .as_ref()
            .map_err(Clone::clone)
    }

    /// The timeout used by the transport.
    pub(crate) fn effective_timeout(&self) -> Duration {
        if self.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            self.timeout
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoped_env::ScopedEnv;
    use serial_test::{parallel, serial};

    #[test]
    #[parallel]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(500));
        assert!(!config.debug());
    }

    #[test]
    #[parallel]
    fn zero_timeout() {
        let config = ClientConfig::default().with_timeout(Duration::ZERO);
        assert_eq!(config.timeout(), Duration::ZERO);
        assert_eq!(config.effective_timeout(), DEFAULT_TIMEOUT);

        let config = ClientConfig::default().with_timeout(Duration::from_millis(250));
        assert_eq!(config.effective_timeout(), Duration::from_millis(250));
    }

    #[test]
    #[serial]
    fn from_env_unset() -> anyhow::Result<()> {
        let _t = ScopedEnv::remove(TIMEOUT_VAR);
        let _d = ScopedEnv::remove(DEBUG_VAR);
        let config = ClientConfig::from_env()?;
        assert_eq!(config, ClientConfig::default());
        Ok(())
    }

    #[test]
    #[serial]
    fn from_env_values() -> anyhow::Result<()> {
        let _t = ScopedEnv::set(TIMEOUT_VAR, "1500");
        let _d = ScopedEnv::set(DEBUG_VAR, "1");
        let config = ClientConfig::from_env()?;
        assert_eq!(config.timeout(), Duration::from_millis(1500));
        assert!(config.debug());
        Ok(())
    }

    #[test]
    #[serial]
    fn from_env_empty_timeout() -> anyhow::Result<()> {
        let _t = ScopedEnv::set(TIMEOUT_VAR, "");
        let _d = ScopedEnv::set(DEBUG_VAR, "");
        let config = ClientConfig::from_env()?;
        assert_eq!(config, ClientConfig::default());
        Ok(())
    }

    #[test_case::test_case("abc")]
    #[test_case::test_case("1.5")]
    #[test_case::test_case("-100")]
    #[test_case::test_case("500ms")]
    #[serial]
    fn from_env_invalid_timeout(value: &str) {
        let _t = ScopedEnv::set(TIMEOUT_VAR, value);
        let err = ClientConfig::from_env().unwrap_err();
        let ConfigError::InvalidTimeout { var, value: got, .. } = &err;
        assert_eq!(*var, TIMEOUT_VAR);
        assert_eq!(got, value);
        assert!(err.to_string().contains(TIMEOUT_VAR), "{err}");
    }

    #[test]
    #[serial]
    fn shared_is_stable() {
        let _t = ScopedEnv::set(TIMEOUT_VAR, "750");
        let first = ClientConfig::shared().map(Clone::clone);
        // Later changes to the environment are ignored.
        let _t = ScopedEnv::set(TIMEOUT_VAR, "not-a-number");
        let second = ClientConfig::shared().map(Clone::clone);
        assert_eq!(first, second);
    }
}
