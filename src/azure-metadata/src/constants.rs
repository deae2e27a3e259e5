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

use std::time::Duration;

/// The default base endpoint for the instance metadata service.
pub(crate) const DEFAULT_ENDPOINT: &str = "http://169.254.169.254/metadata/instance/";
/// The load balancer metadata endpoint. It includes its own API version.
pub(crate) const LOADBALANCER_ENDPOINT: &str =
    "http://169.254.169.254:80/metadata/loadbalancer?api-version=2021-02-01";
/// Query parameters appended to every instance metadata request.
pub(crate) const INSTANCE_QUERY: &str = "api-version=2017-08-01&format=text";

pub(crate) const METADATA_HEADER: &str = "Metadata";
pub(crate) const METADATA_HEADER_VALUE: &str = "true";

pub(crate) const ENDPOINT_VAR: &str = "GCP_META_ENDPOINT";
pub(crate) const TIMEOUT_VAR: &str = "GCP_TIMEOUT";
pub(crate) const DEBUG_VAR: &str = "GOMPLATE_DEBUG";

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);
pub(crate) const DEFAULT_MAX_RETRIES: u32 = 3;
/// Upper bound for server-provided `Retry-After` delays.
pub(crate) const MAX_RETRY_AFTER: Duration = Duration::from_secs(30);
