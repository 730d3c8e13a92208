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

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Spawns a task to cancel `shutdown` when the process is interrupted.
///
/// The task cancels the token on SIGINT (Ctrl-C) and, on Unix, on SIGTERM.
/// The task exits without further action if the token is cancelled by
/// somebody else.
pub fn spawn(shutdown: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = shutdown.cancelled() => {},
            signal = wait_for_signal() => match signal {
                Ok(name) => {
                    tracing::info!(signal = name, "received signal, shutting down");
                    shutdown.cancel();
                }
                Err(e) => {
                    tracing::warn!(error = %e, "cannot install the signal handlers");
                }
            },
        }
    })
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};
    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        r = tokio::signal::ctrl_c() => r.map(|_| "SIGINT"),
        _ = terminate.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await.map(|_| "Ctrl-C")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn exits_on_cancel() -> anyhow::Result<()> {
        let shutdown = CancellationToken::new();
        let handle = spawn(shutdown.clone());
        shutdown.cancel();
        handle.await?;
        Ok(())
    }
}
