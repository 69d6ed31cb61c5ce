//! Language model client abstraction
//!
//! The gateway treats the model as an opaque text-in/text-out collaborator
//! behind [`ChatModel`]. The production implementation talks to an
//! OpenAI-compatible chat completions endpoint; tests substitute mocks.

mod openai;

pub use openai::OpenAiChat;

use async_trait::async_trait;

use crate::Result;

/// Role of a transcript turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire form used in chat completion requests and the interaction log
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One message in a conversation transcript
#[derive(Debug, Clone)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    /// Create a user turn
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// Create an assistant turn
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// A chat completion collaborator
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Complete a conversation: system prompt plus transcript in, text out
    ///
    /// # Errors
    ///
    /// Returns error on transport failures or unusable provider responses.
    /// Callers must recover locally; a model failure never becomes a
    /// processing failure.
    async fn complete(&self, system_prompt: &str, turns: &[Turn]) -> Result<String>;
}
