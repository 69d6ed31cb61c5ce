//! Z-API `WhatsApp` channel adapter
//!
//! Sends text messages through a Z-API instance. Receiving happens via the
//! webhook endpoint, not here.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::{DispatchErrorKind, DispatchResult, MessageSender};

/// Default Z-API base URL
const DEFAULT_BASE_URL: &str = "https://api.z-api.io";

/// Z-API channel adapter
pub struct ZapiChannel {
    instance_id: String,
    token: String,
    client_token: String,
    base_url: String,
    client: Client,
}

impl ZapiChannel {
    /// Create a new adapter for the given instance credentials
    #[must_use]
    pub fn new(instance_id: String, token: String, client_token: String) -> Self {
        Self {
            instance_id,
            token,
            client_token,
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

    fn send_url(&self) -> String {
        format!(
            "{}/instances/{}/token/{}/send-text",
            self.base_url, self.instance_id, self.token
        )
    }

    fn classify_status(status: StatusCode) -> DispatchErrorKind {
        match status.as_u16() {
            401 | 403 => DispatchErrorKind::Auth,
            429 => DispatchErrorKind::RateLimited,
            _ => DispatchErrorKind::Other,
        }
    }
}

#[async_trait]
impl MessageSender for ZapiChannel {
    fn name(&self) -> &'static str {
        "zapi"
    }

    async fn send_text(&self, phone: &str, text: &str) -> DispatchResult {
        if text.is_empty() {
            return DispatchResult::success();
        }

        let body = serde_json::json!({
            "phone": phone,
            "message": text,
        });

        let response = self
            .client
            .post(self.send_url())
            .header("Client-Token", &self.client_token)
            .json(&body)
            .send()
            .await;

        match response {
            Ok(resp) => {
                let status = resp.status();
                // Z-API answers 200 or 201 on success
                if status == StatusCode::OK || status == StatusCode::CREATED {
                    tracing::debug!(phone, "whatsapp message sent");
                    DispatchResult::success()
                } else {
                    let body = resp.text().await.unwrap_or_default();
                    tracing::warn!(phone, %status, body, "z-api send failed");
                    DispatchResult::failure(Self::classify_status(status))
                }
            }
            Err(e) => {
                tracing::warn!(phone, error = %e, "z-api send transport failure");
                DispatchResult::failure(DispatchErrorKind::Transport)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel(base_url: &str) -> ZapiChannel {
        ZapiChannel::new("inst".into(), "tok".into(), "client-tok".into())
            .with_base_url(base_url)
    }

    #[tokio::test]
    async fn empty_text_is_a_successful_noop() {
        // Unroutable base URL: any network call would fail, proving none happens
        let channel = channel("http://127.0.0.1:1");
        let result = channel.send_text("5511999999999", "").await;
        assert!(result.ok);
        assert!(result.error_kind.is_none());
    }

    #[tokio::test]
    async fn forbidden_classifies_as_auth() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/instances/inst/token/tok/send-text")
            .match_header("client-token", "client-tok")
            .with_status(403)
            .create_async()
            .await;

        let result = channel(&server.url()).send_text("5511999999999", "x").await;
        assert!(!result.ok);
        assert_eq!(result.error_kind, Some(DispatchErrorKind::Auth));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rate_limit_classifies_as_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/instances/inst/token/tok/send-text")
            .with_status(429)
            .create_async()
            .await;

        let result = channel(&server.url()).send_text("55", "x").await;
        assert_eq!(result.error_kind, Some(DispatchErrorKind::RateLimited));
    }

    #[tokio::test]
    async fn server_error_classifies_as_other() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/instances/inst/token/tok/send-text")
            .with_status(500)
            .create_async()
            .await;

        let result = channel(&server.url()).send_text("55", "x").await;
        assert_eq!(result.error_kind, Some(DispatchErrorKind::Other));
    }

    #[tokio::test]
    async fn created_counts_as_success() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/instances/inst/token/tok/send-text")
            .with_status(201)
            .create_async()
            .await;

        let result = channel(&server.url()).send_text("55", "oi").await;
        assert!(result.ok);
    }

    #[tokio::test]
    async fn connection_refused_classifies_as_transport() {
        let channel = channel("http://127.0.0.1:1");
        let result = channel.send_text("55", "oi").await;
        assert!(!result.ok);
        assert_eq!(result.error_kind, Some(DispatchErrorKind::Transport));
    }
}
