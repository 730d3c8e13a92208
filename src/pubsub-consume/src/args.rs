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

use crate::error::{Error, Result};
use clap::Parser;

const DESCRIPTION: &str = concat!(
    "Receives messages from a Cloud Pub/Sub subscription and prints their",
    " payloads to stdout, one message per line. Each message is acknowledged",
    " after it is printed. Optionally creates the subscription if it does not",
    " exist."
);

/// Configuration options for the consumer.
///
/// Every option can also be set with the environment variable listed in
/// `--help`. Command-line flags take precedence.
#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = DESCRIPTION)]
pub struct Args {
    /// The Google Cloud project that owns the topic and subscription.
    #[arg(short = 'p', long, env = "PROJECT_ID")]
    pub project_id: String,

    /// The topic bound to the subscription.
    ///
    /// Only used, and then required, when creating the subscription.
    #[arg(short = 't', long, env = "TOPIC", default_value = "")]
    pub topic: String,

    /// The subscription to receive messages from.
    #[arg(short = 's', long, env = "SUBSCRIPTION", default_value = "")]
    pub subscription: String,

    /// Create the subscription if it does not exist.
    #[arg(short = 'c', long, default_value_t = false)]
    pub create_subscription: bool,

    /// Connect to a Pub/Sub emulator at this `host:port`.
    ///
    /// The emulator does not require credentials, the consumer uses anonymous
    /// credentials when this is set.
    #[arg(long, env = "PUBSUB_EMULATOR_HOST")]
    pub emulator_host: Option<String>,
}

/// Parses the command line and the environment.
///
/// `--help` and `--version` print their output and exit the process, like
/// [Parser::parse]. Any other problem is returned as [Error::Usage], so the
/// caller can report it like every other error.
pub fn parse_from<I, T>(iter: I) -> Result<Args>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Args::try_parse_from(iter) {
        Ok(args) => Ok(args),
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => Err(Error::Usage(e)),
    }
}

impl Args {
    /// Validates the arguments after parsing.
    ///
    /// Only the checks that apply to every run are made here. The topic is
    /// required only if the subscription turns out to be missing, and that
    /// is checked during provisioning.
    pub fn validate(&self) -> Result<()> {
        if self.project_id.is_empty() {
            return Err(Error::config("project id must not be empty"));
        }
        if self.subscription.is_empty() {
            return Err(Error::config("subscription is required to consume"));
        }
        Ok(())
    }
}
