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

use crate::broker::{Message, Session};
use crate::error::{Error, Result};
use std::io::Write;
use tokio_util::sync::CancellationToken;

/// Delivers the messages in `session` to `handler`.
///
/// Blocks until one of:
/// - `shutdown` is cancelled, returns `Ok(())`,
/// - the session reports an error, returns [Error::Delivery],
/// - the session ends, returns `Ok(())`.
///
/// The handler is called once per message, in the order the session yields
/// them. The service delivers messages at least once, the handler may see
/// duplicates.
pub async fn receive<S, F>(session: &mut S, shutdown: CancellationToken, mut handler: F) -> Result<()>
where
    S: Session + ?Sized,
    F: FnMut(Message),
{
    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => {
                tracing::info!("shutdown requested, stopping the receive loop");
                return Ok(());
            },
            item = session.next() => {
                match item {
                    None => {
                        tracing::info!("the subscription stream ended");
                        return Ok(());
                    }
                    Some(Err(e)) => return Err(Error::Delivery(e)),
                    Some(Ok(message)) => handler(message),
                }
            },
        }
    }
}

/// Writes the message payload and a newline to `out`, then acknowledges it.
///
/// The message is acknowledged even if the write fails. Write errors are
/// logged and otherwise ignored.
pub fn print_and_ack<W>(out: &mut W, message: Message)
where
    W: Write + ?Sized,
{
    let written = out
        .write_all(&message.data)
        .and_then(|_| out.write_all(b"\n"))
        .and_then(|_| out.flush());
    message.ack();
    if let Err(e) = written {
        tracing::warn!(error = %e, "cannot print message, acknowledged anyway");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::tests::{AckCounter, MockSession};
    use google_cloud_gax::error::rpc::{Code, Status};
    use std::time::Duration;

    fn session_with(messages: Vec<Message>, then: Option<google_cloud_pubsub::Error>) -> MockSession {
        let mut items = messages
            .into_iter()
            .map(Ok)
            .chain(then.map(Err))
            .collect::<std::collections::VecDeque<_>>();
        let mut session = MockSession::new();
        session.expect_next().returning(move || items.pop_front());
        session
    }

    /// A writer that fails every write.
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "closed",
            ))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn print_and_ack_basic() {
        let counter = AckCounter::default();
        let mut out: Vec<u8> = Vec::new();
        print_and_ack(&mut out, counter.message("hello"));
        assert_eq!(out, b"hello\n");
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn print_and_ack_empty_payload() {
        let counter = AckCounter::default();
        let mut out: Vec<u8> = Vec::new();
        print_and_ack(&mut out, counter.message(""));
        assert_eq!(out, b"\n");
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn print_and_ack_verbatim() {
        let counter = AckCounter::default();
        let mut out: Vec<u8> = Vec::new();
        let payload: &[u8] = &[0xff, b'a', b'\t', 0x00];
        print_and_ack(&mut out, counter.message(bytes::Bytes::from_static(payload)));
        assert_eq!(out, [payload, &b"\n"[..]].concat());
    }

    #[test]
    fn print_failure_still_acks() {
        let counter = AckCounter::default();
        print_and_ack(&mut ClosedPipe, counter.message("hello"));
        assert_eq!(counter.count(), 1);
    }

    #[tokio::test]
    async fn prints_every_message() -> anyhow::Result<()> {
        const N: usize = 100;
        let counter = AckCounter::default();
        let messages = (0..N)
            .map(|i| match i % 3 {
                0 => counter.message(""),
                _ => counter.message(format!("message-{i}")),
            })
            .collect();
        let mut session = session_with(messages, None);

        let mut out: Vec<u8> = Vec::new();
        receive(&mut session, CancellationToken::new(), |m| {
            print_and_ack(&mut out, m)
        })
        .await?;

        let out = String::from_utf8(out)?;
        assert_eq!(out.lines().count(), N, "{out}");
        assert_eq!(out.matches('\n').count(), N, "{out}");
        assert_eq!(counter.count(), N);
        Ok(())
    }

    #[tokio::test]
    async fn preserves_session_order() -> anyhow::Result<()> {
        let counter = AckCounter::default();
        let messages = vec![counter.message("hello"), counter.message("world")];
        let mut session = session_with(messages, None);

        let mut out: Vec<u8> = Vec::new();
        receive(&mut session, CancellationToken::new(), |m| {
            print_and_ack(&mut out, m)
        })
        .await?;
        assert_eq!(out, b"hello\nworld\n");
        assert_eq!(counter.count(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn delivery_error() {
        let counter = AckCounter::default();
        let error = google_cloud_pubsub::Error::service(
            Status::default().set_code(Code::PermissionDenied),
        );
        let mut session = session_with(vec![counter.message("before")], Some(error));

        let mut out: Vec<u8> = Vec::new();
        let got = receive(&mut session, CancellationToken::new(), |m| {
            print_and_ack(&mut out, m)
        })
        .await;
        assert!(matches!(got, Err(Error::Delivery(_))), "{got:?}");
        assert_eq!(out, b"before\n");
        assert_eq!(counter.count(), 1);
    }

    /// A session that never yields a message, like an idle subscription.
    struct Idle;

    #[async_trait::async_trait]
    impl Session for Idle {
        async fn next(&mut self) -> Option<google_cloud_pubsub::Result<Message>> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn cancelled_before_start() -> anyhow::Result<()> {
        let shutdown = CancellationToken::new();
        shutdown.cancel();
        receive(&mut Idle, shutdown, |_| panic!("unexpected message")).await?;
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_while_blocked() -> anyhow::Result<()> {
        const DELAY: Duration = Duration::from_secs(30);
        let shutdown = CancellationToken::new();
        let cancel = shutdown.clone();
        let handle = tokio::spawn(async move {
            let mut session = Idle;
            receive(&mut session, shutdown, |_| panic!("unexpected message")).await
        });

        let start = tokio::time::Instant::now();
        tokio::time::sleep(DELAY).await;
        assert!(!handle.is_finished());
        cancel.cancel();
        handle.await??;
        assert_eq!(start.elapsed(), DELAY);
        Ok(())
    }
}
