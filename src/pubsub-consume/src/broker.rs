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

//! The Pub/Sub operations used by the consumer.
//!
//! The consumer only needs three operations from the service: check if a
//! subscription exists, create a subscription, and open a streaming pull
//! session. We stub out the interface, in order to test provisioning and the
//! receive loop without a service.

use crate::args::Args;
use crate::error::{Error, Result};
use bytes::Bytes;
use google_cloud_gax::error::rpc::Code;
use google_cloud_pubsub::client::{Subscriber, SubscriptionAdmin};

/// A message received from a subscription.
///
/// The payload is opaque to the consumer. Consuming the message with
/// [ack()][Message::ack] tells the service the message was processed.
pub struct Message {
    /// The message payload.
    pub data: Bytes,
    ack: Box<dyn FnOnce() + Send>,
}

impl Message {
    /// Creates a message with a custom acknowledgment action.
    pub fn new<D, F>(data: D, ack: F) -> Self
    where
        D: Into<Bytes>,
        F: FnOnce() + Send + 'static,
    {
        Self {
            data: data.into(),
            ack: Box::new(ack),
        }
    }

    /// Acknowledges the message.
    ///
    /// The acknowledgment is best effort. The service may redeliver the
    /// message, to this consumer or to another one.
    pub fn ack(self) {
        (self.ack)()
    }
}

impl std::fmt::Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Message")
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

/// An open stream of messages from one subscription.
#[async_trait::async_trait]
pub trait Session: Send {
    /// Returns the next message.
    ///
    /// `None` represents the end of the stream. `Some(Err(_))` is a
    /// permanent error, the client library already retried any transient
    /// failures.
    async fn next(&mut self) -> Option<google_cloud_pubsub::Result<Message>>;
}

/// The control plane and data plane operations used by the consumer.
///
/// All names are fully qualified resource names, see [crate::names].
#[async_trait::async_trait]
pub trait Broker: Send + Sync {
    /// Returns true if the subscription exists.
    async fn subscription_exists(&self, subscription: &str) -> google_cloud_pubsub::Result<bool>;

    /// Creates a subscription attached to `topic`, with the default
    /// subscription configuration.
    async fn create_subscription(
        &self,
        subscription: &str,
        topic: &str,
    ) -> google_cloud_pubsub::Result<()>;

    /// Starts a streaming pull session on the subscription.
    fn streaming_pull(&self, subscription: &str) -> Box<dyn Session>;
}

/// A [Broker] backed by the Cloud Pub/Sub client libraries.
///
/// Holds one client for the control plane and one for the data plane. Both
/// keep a connection pool, create one `CloudBroker` and reuse it for the
/// whole run. Dropping it releases the connections.
#[derive(Clone, Debug)]
pub struct CloudBroker {
    admin: SubscriptionAdmin,
    subscriber: Subscriber,
}

impl CloudBroker {
    /// Creates the clients.
    ///
    /// Uses [Application Default Credentials] unless `args` point to an
    /// emulator, which uses anonymous credentials.
    ///
    /// [application default credentials]: https://cloud.google.com/docs/authentication#adc
    pub async fn connect(args: &Args) -> Result<Self> {
        let mut admin = SubscriptionAdmin::builder().with_tracing();
        let mut subscriber = Subscriber::builder();
        if let Some(host) = args.emulator_host.as_deref() {
            let endpoint = emulator_endpoint(host);
            tracing::info!(%endpoint, "using the Pub/Sub emulator");
            let credentials = google_cloud_auth::credentials::anonymous::Builder::new().build();
            admin = admin
                .with_endpoint(endpoint.clone())
                .with_credentials(credentials.clone());
            subscriber = subscriber
                .with_endpoint(endpoint)
                .with_credentials(credentials);
        }
        let admin = admin.build().await.map_err(Error::Client)?;
        let subscriber = subscriber.build().await.map_err(Error::Client)?;
        Ok(Self { admin, subscriber })
    }
}

#[async_trait::async_trait]
impl Broker for CloudBroker {
    async fn subscription_exists(&self, subscription: &str) -> google_cloud_pubsub::Result<bool> {
        let response = self
            .admin
            .get_subscription()
            .set_subscription(subscription)
            .send()
            .await;
        match response {
            Ok(_) => Ok(true),
            Err(e) if is_not_found(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn create_subscription(
        &self,
        subscription: &str,
        topic: &str,
    ) -> google_cloud_pubsub::Result<()> {
        let created = self
            .admin
            .create_subscription()
            .set_name(subscription)
            .set_topic(topic)
            .send()
            .await?;
        tracing::debug!("create_subscription response: {created:?}");
        Ok(())
    }

    fn streaming_pull(&self, subscription: &str) -> Box<dyn Session> {
        let stream = self.subscriber.subscribe(subscription).build();
        Box::new(Stream(stream))
    }
}

struct Stream(google_cloud_pubsub::subscriber::MessageStream);

#[async_trait::async_trait]
impl Session for Stream {
    async fn next(&mut self) -> Option<google_cloud_pubsub::Result<Message>> {
        let item = self.0.next().await?;
        Some(item.map(|(message, handler)| Message::new(message.data, move || handler.ack())))
    }
}

fn is_not_found(error: &google_cloud_pubsub::Error) -> bool {
    error.status().is_some_and(|s| s.code == Code::NotFound)
}

fn emulator_endpoint(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        return host.to_string();
    }
    format!("http://{host}")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use google_cloud_gax::error::rpc::Status;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use test_case::test_case;

    mockall::mock! {
        #[derive(Debug)]
        pub(crate) Broker {}
        #[async_trait::async_trait]
        impl Broker for Broker {
            async fn subscription_exists(&self, subscription: &str) -> google_cloud_pubsub::Result<bool>;
            async fn create_subscription(&self, subscription: &str, topic: &str) -> google_cloud_pubsub::Result<()>;
            fn streaming_pull(&self, subscription: &str) -> Box<dyn Session>;
        }
    }

    mockall::mock! {
        #[derive(Debug)]
        pub(crate) Session {}
        #[async_trait::async_trait]
        impl Session for Session {
            async fn next(&mut self) -> Option<google_cloud_pubsub::Result<Message>>;
        }
    }

    /// Counts the acknowledgments of the messages it creates.
    #[derive(Clone, Debug, Default)]
    pub(crate) struct AckCounter(Arc<AtomicUsize>);

    impl AckCounter {
        pub(crate) fn message<D: Into<Bytes>>(&self, data: D) -> Message {
            let count = self.0.clone();
            Message::new(data, move || {
                count.fetch_add(1, Ordering::SeqCst);
            })
        }

        pub(crate) fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn message_ack() {
        let counter = AckCounter::default();
        let message = counter.message("hello");
        assert_eq!(message.data, Bytes::from_static(b"hello"));
        assert_eq!(counter.count(), 0);
        message.ack();
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn message_debug() {
        let message = Message::new("hello", || {});
        let got = format!("{message:?}");
        assert!(got.contains("hello"), "{got}");
    }

    #[test_case(Code::NotFound, true)]
    #[test_case(Code::PermissionDenied, false)]
    #[test_case(Code::Unavailable, false)]
    fn not_found(code: Code, want: bool) {
        let error = google_cloud_pubsub::Error::service(Status::default().set_code(code));
        assert_eq!(is_not_found(&error), want, "{error:?}");
    }

    #[test_case("localhost:8085", "http://localhost:8085")]
    #[test_case("http://localhost:8085", "http://localhost:8085")]
    #[test_case("https://emulator.example.com", "https://emulator.example.com")]
    fn emulator(host: &str, want: &str) {
        assert_eq!(emulator_endpoint(host), want);
    }
}
