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

const PREFIX: &str = "projects/";

/// Returns the full resource name for a subscription.
///
/// Names that are already qualified with a project are returned unchanged.
pub fn subscription_name(project_id: &str, subscription: &str) -> String {
    qualify(project_id, "subscriptions", subscription)
}

/// Returns the full resource name for a topic.
///
/// Names that are already qualified with a project are returned unchanged.
pub fn topic_name(project_id: &str, topic: &str) -> String {
    qualify(project_id, "topics", topic)
}

fn qualify(project_id: &str, collection: &str, id: &str) -> String {
    if id.starts_with(PREFIX) {
        return id.to_string();
    }
    format!("{PREFIX}{project_id}/{collection}/{id}")
}
