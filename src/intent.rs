//! Intent classification
//!
//! Two interchangeable strategies behind [`IntentClassifier`]: a
//! deterministic keyword match and a model-assisted strategy that asks the
//! chat model for a structured decision. The router treats them as
//! equivalent; swapping one for the other requires no router changes.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::llm::{ChatModel, Turn};

/// Classified intent of an inbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// General front desk inquiry
    GeneralInquiry,
    /// Customer is asking about pricing or a quote
    SalesInterest,
}

impl Intent {
    /// Tag used on task-creation effects
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::GeneralInquiry => "general-inquiry",
            Self::SalesInterest => "sales-lead",
        }
    }

    /// Portuguese label used in task descriptions and the interaction log
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::GeneralInquiry => "atendimento",
            Self::SalesInterest => "orcamento",
        }
    }
}

/// A strategy that maps message text to an [`Intent`]
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Classify a message. Must not fail: strategies that can error fall
    /// back to [`Intent::GeneralInquiry`] internally.
    async fn classify(&self, text: &str) -> Intent;
}

/// Fixed vocabulary that signals sales interest (budget/pricing talk)
const SALES_VOCABULARY: &[&str] = &[
    "orçamento",
    "orcamento",
    "preço",
    "preco",
    "valor",
    "quanto custa",
    "proposta",
];

/// Deterministic keyword classifier: no I/O, case-insensitive substring
/// match against [`SALES_VOCABULARY`]
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    /// Synchronous form of [`IntentClassifier::classify`]
    #[must_use]
    pub fn classify_text(text: &str) -> Intent {
        let lowered = text.to_lowercase();
        if SALES_VOCABULARY.iter().any(|word| lowered.contains(word)) {
            Intent::SalesInterest
        } else {
            Intent::GeneralInquiry
        }
    }
}

#[async_trait]
impl IntentClassifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> Intent {
        Self::classify_text(text)
    }
}

/// Structured decision returned by the model-assisted strategy
#[derive(Debug, Clone, Deserialize)]
pub struct ModelDecision {
    /// Intent label as emitted by the model
    pub intent: String,
    /// Drafted reply text, when the model produced one
    #[serde(default)]
    pub reply: Option<String>,
}

impl ModelDecision {
    /// Map the model's free-form label onto an [`Intent`]
    #[must_use]
    pub fn resolved_intent(&self) -> Intent {
        match self.intent.trim().to_lowercase().as_str() {
            "sales_interest" | "sales-interest" | "sales" | "orcamento" | "orçamento" => {
                Intent::SalesInterest
            }
            _ => Intent::GeneralInquiry,
        }
    }
}

/// Instructions appended to the persona prompt so the model answers in the
/// fixed decision schema
pub const DECISION_SCHEMA_INSTRUCTIONS: &str = "Responda APENAS com um objeto JSON \
    neste formato, sem texto adicional: {\"intent\": \"sales_interest\" ou \
    \"general_inquiry\", \"reply\": \"sua resposta ao cliente em português\"}. \
    Use \"sales_interest\" quando o cliente pedir orçamento, preço, valor ou \
    proposta; caso contrário use \"general_inquiry\".";

/// Parse a model response into a [`ModelDecision`]
///
/// Tolerates markdown code fences and surrounding prose by extracting the
/// first top-level JSON object.
#[must_use]
pub fn parse_decision(response: &str) -> Option<ModelDecision> {
    let trimmed = response.trim();
    if let Ok(decision) = serde_json::from_str(trimmed) {
        return Some(decision);
    }

    // Code fence or chatter around the object: take the outermost braces
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&trimmed[start..=end]).ok()
}

/// Model-assisted classifier: delegates to the chat model and parses its
/// structured decision, failing into [`Intent::GeneralInquiry`]
pub struct ModelClassifier {
    model: Arc<dyn ChatModel>,
    system_prompt: String,
}

impl ModelClassifier {
    /// Create a classifier backed by the given model
    #[must_use]
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            system_prompt: DECISION_SCHEMA_INSTRUCTIONS.to_string(),
        }
    }
}

#[async_trait]
impl IntentClassifier for ModelClassifier {
    async fn classify(&self, text: &str) -> Intent {
        let turns = [Turn::user(text)];
        match self.model.complete(&self.system_prompt, &turns).await {
            Ok(response) => parse_decision(&response)
                .map_or(Intent::GeneralInquiry, |d| d.resolved_intent()),
            Err(e) => {
                tracing::warn!(error = %e, "model classification failed, defaulting to general inquiry");
                Intent::GeneralInquiry
            }
        }
    }
}
