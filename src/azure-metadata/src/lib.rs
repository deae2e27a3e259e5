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

//! Azure Instance Metadata Service lookups for template rendering.
//!
//! This crate retrieves values from the link-local metadata service of an
//! Azure virtual machine, and from the metadata endpoint of the load balancer
//! attached to it. It is consumed by a templating engine that exposes the
//! values as functions in an `azure` namespace.
//!
//! Lookups are best-effort. The metadata service is only reachable from
//! inside a cloud instance, so most failures (the endpoint is missing, the
//! request times out, the service returns an error status) produce the
//! caller-supplied default instead of an error. The only error a lookup
//! returns is a failure to read the body of a successful response.
//!
//! # Example
//! ```no_run
//! # async fn sample() -> azure_metadata::Result<()> {
//! use azure_metadata::{ClientConfig, MetadataClient};
//!
//! let config = ClientConfig::from_env()?;
//! let client = MetadataClient::builder(config).build();
//! let name = client.lookup("compute/name", &["localhost"]).await?;
//! let env = client.lookup("compute/tags/environment", &[]).await?;
//! let ip = client
//!     .lookup("loadbalancer/publicIpAddresses/0/frontendIpAddress", &[])
//!     .await?;
//! println!("{name} {env} {ip}");
//! # Ok(()) }
//! ```

pub mod backoff;
pub mod client;
pub mod config;
pub(crate) mod constants;
pub mod env;
pub mod errors;
pub(crate) mod extract;
pub mod key;
pub mod namespace;
pub mod retry;
pub(crate) mod transport;

pub use client::{Lookup, MetadataClient};
pub use config::ClientConfig;
pub use errors::{ConfigError, Error, Unavailable};
pub use namespace::AzureFuncs;

/// A `Result` alias where the `Err` case is [Error].
pub type Result<T> = std::result::Result<T, Error>;
