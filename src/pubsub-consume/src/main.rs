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

//! Print and acknowledge the messages delivered to a Cloud Pub/Sub
//! subscription.

use pubsub_consume::{args, logging, signals};
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> ExitCode {
    logging::enable_tracing();
    let args = match args::parse_from(std::env::args_os()) {
        Ok(args) => args,
        Err(e) => return failed(e),
    };
    tracing::info!("Configuration: {args:?}");

    let shutdown = CancellationToken::new();
    let _signals = signals::spawn(shutdown.clone());

    let mut stdout = std::io::stdout();
    match pubsub_consume::run(args, shutdown, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => failed(e),
    }
}

fn failed(e: pubsub_consume::Error) -> ExitCode {
    tracing::error!(error = %e, "failed");
    ExitCode::FAILURE
}
