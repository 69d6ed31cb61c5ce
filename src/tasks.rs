//! ClickUp task tracker client
//!
//! Creates one task per handled interaction in a configured list. All calls
//! are fire-and-forget from the webhook's perspective: failures are logged
//! by the caller and never retried.

use reqwest::Client;

use crate::{Error, Result};

/// Default ClickUp API base URL
const DEFAULT_BASE_URL: &str = "https://api.clickup.com/api/v2";

/// Task tracker client bound to a single list
pub struct TaskTracker {
    token: String,
    list_id: String,
    base_url: String,
    client: Client,
}

impl TaskTracker {
    /// Create a tracker for the given list
    #[must_use]
    pub fn new(token: String, list_id: String) -> Self {
        Self {
            token,
            list_id,
            base_url: DEFAULT_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Override the API base URL (tests)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Create a task in the configured list
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-success response.
    pub async fn create_task(&self, name: &str, description: &str, tag: &str) -> Result<()> {
        let url = format!("{}/list/{}/task", self.base_url, self.list_id);

        let body = serde_json::json!({
            "name": name,
            "description": description,
            "tags": [tag],
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", &self.token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::TaskTracker(format!(
                "task creation failed: {status} - {body}"
            )));
        }

        tracing::debug!(name, tag, "task created");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn posts_task_to_list_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/list/lst-1/task")
            .match_header("authorization", "tok")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "name": "Atendimento WhatsApp - 55",
                "tags": ["sales-lead"],
            })))
            .with_status(200)
            .create_async()
            .await;

        let tracker = TaskTracker::new("tok".into(), "lst-1".into())
            .with_base_url(server.url());
        tracker
            .create_task("Atendimento WhatsApp - 55", "desc", "sales-lead")
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/list/lst-1/task")
            .with_status(401)
            .create_async()
            .await;

        let tracker = TaskTracker::new("bad".into(), "lst-1".into())
            .with_base_url(server.url());
        let result = tracker.create_task("n", "d", "general-inquiry").await;
        assert!(result.is_err());
    }
}
