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

/// Enables tracing for the application.
///
/// Logs go to stderr, stdout is reserved for the message payloads.
pub fn enable_tracing() {
    if let Err(e) = tracing::subscriber::set_global_default(subscriber()) {
        eprintln!("cannot enable tracing: {e}");
    }
}

fn subscriber() -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_level(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::INFO)
        .finish()
}
