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

use crate::args::Args;
use crate::broker::Broker;
use crate::error::{Error, Result};
use crate::names::{subscription_name, topic_name};

/// Resolves, and optionally creates, the subscription named in `args`.
///
/// Returns the full resource name of the subscription.
///
/// When `args.create_subscription` is set, the subscription is created if
/// (and only if) it does not exist. Running this function repeatedly with the
/// same arguments creates the subscription at most once.
pub async fn provision<B>(broker: &B, args: &Args) -> Result<String>
where
    B: Broker + ?Sized,
{
    if args.subscription.is_empty() {
        return Err(Error::config("subscription is required to consume"));
    }
    let subscription = subscription_name(&args.project_id, &args.subscription);
    if !args.create_subscription {
        return Ok(subscription);
    }

    let exists = broker
        .subscription_exists(&subscription)
        .await
        .map_err(Error::Provision)?;
    if exists {
        tracing::debug!(%subscription, "subscription already exists");
        return Ok(subscription);
    }
    if args.topic.is_empty() {
        return Err(Error::config("topic is required to create subscription"));
    }
    let topic = topic_name(&args.project_id, &args.topic);
    broker
        .create_subscription(&subscription, &topic)
        .await
        .map_err(Error::Provision)?;
    tracing::info!(%subscription, %topic, "created subscription");
    Ok(subscription)
}
