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

//! Errors returned while consuming a subscription.
//!
//! None of these errors are retried. The Pub/Sub client libraries already
//! retry transient failures, anything that reaches this layer ends the run.

/// The result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error that ends a run.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The configuration is incomplete for the requested operation.
    ///
    /// These errors are detected before contacting the service.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The command line could not be parsed.
    ///
    /// Includes missing required options, such as the project id.
    #[error("invalid command line: {0}")]
    Usage(#[source] clap::Error),

    /// The Pub/Sub clients could not be created.
    #[error("cannot create the Pub/Sub clients: {0}")]
    Client(#[source] google_cloud_gax::client_builder::Error),

    /// Checking for, or creating, the subscription failed.
    #[error("cannot provision the subscription: {0}")]
    Provision(#[source] google_cloud_pubsub::Error),

    /// The streaming pull session reported a permanent error.
    #[error("the subscription stream failed: {0}")]
    Delivery(#[source] google_cloud_pubsub::Error),
}

impl Error {
    pub(crate) fn config<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }

    /// Returns true if the error was detected before contacting the service.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Usage(_))
    }
}
