//! Shared test utilities

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use frontdesk_gateway::{
    ChatModel, DbPool, DispatchResult, MessageSender, Result, Turn, db,
};

/// Set up an in-memory test database
#[must_use]
pub fn setup_test_db() -> DbPool {
    db::init_memory().expect("failed to init test db")
}

/// Mock channel that records every send
pub struct MockSender {
    pub sent: Mutex<Vec<(String, String)>>,
}

impl MockSender {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
        })
    }

    pub async fn sent_messages(&self) -> Vec<(String, String)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl MessageSender for MockSender {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn send_text(&self, phone: &str, text: &str) -> DispatchResult {
        if text.is_empty() {
            return DispatchResult::success();
        }
        self.sent
            .lock()
            .await
            .push((phone.to_string(), text.to_string()));
        DispatchResult::success()
    }
}

/// Model that always answers with the same scripted response
pub struct ScriptedModel(pub String);

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, _system_prompt: &str, _turns: &[Turn]) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Poll until `check` returns true or the timeout elapses
pub async fn wait_until<F, Fut>(check: F) -> bool
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..100 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}
