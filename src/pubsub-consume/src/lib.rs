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

//! Print the messages delivered to a [Pub/Sub] subscription.
//!
//! The consumer optionally creates the subscription, then prints the payload
//! of each message to stdout and acknowledges it. Flow control, lease
//! management and retries are handled by the Pub/Sub client libraries.
//!
//! [pub/sub]: https://cloud.google.com/pubsub

pub mod args;
pub mod broker;
pub mod error;
pub mod logging;
pub mod names;
pub mod provision;
pub mod receive;
pub mod signals;

pub use args::Args;
pub use error::{Error, Result};

use broker::{Broker, CloudBroker};
use std::io::Write;
use tokio_util::sync::CancellationToken;

/// Runs the consumer until `shutdown` is cancelled or an error occurs.
///
/// Validates `args` before creating any client. The clients are created once
/// and released before this function returns.
pub async fn run<W>(args: Args, shutdown: CancellationToken, out: &mut W) -> Result<()>
where
    W: Write + ?Sized,
{
    args.validate()?;
    let broker = CloudBroker::connect(&args).await?;
    let result = consume(broker, &args, shutdown, out).await;
    tracing::info!("closed the Pub/Sub clients");
    result
}

/// Provisions the subscription and prints its messages to `out`.
///
/// Takes ownership of `broker`, it is dropped when this function returns,
/// regardless of the outcome.
pub async fn consume<B, W>(
    broker: B,
    args: &Args,
    shutdown: CancellationToken,
    out: &mut W,
) -> Result<()>
where
    B: Broker,
    W: Write + ?Sized,
{
    let subscription = provision::provision(&broker, args).await?;
    let mut session = broker.streaming_pull(&subscription);
    tracing::info!(%subscription, "listening for messages");
    receive::receive(session.as_mut(), shutdown, |m| {
        receive::print_and_ack(&mut *out, m)
    })
    .await
}
