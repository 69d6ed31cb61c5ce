//! Conversation router
//!
//! Owns the per-sender transcript store, composes model prompts for the
//! active persona, and turns each inbound event into a reply plus a list of
//! deferred effects. A model failure never escapes this module: the
//! customer always gets a reply, worst case the fixed fallback greeting.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::effects::Effect;
use crate::intent::{
    DECISION_SCHEMA_INSTRUCTIONS, Intent, IntentClassifier, KeywordClassifier, parse_decision,
};
use crate::llm::{ChatModel, Turn};
use crate::normalize::InboundEvent;
use crate::persona::{Persona, PersonaId, fallback_greeting, sales_handoff};
use crate::recorder::InteractionRecord;

/// Maximum transcript turns kept per sender
const MAX_TURNS: usize = 10;

/// Per-sender conversation state
#[derive(Debug)]
pub struct Conversation {
    /// Active persona; front desk until a sales interest fires, then sales
    /// for the rest of the conversation's lifetime (sticky, no way back)
    pub persona: PersonaId,
    /// Bounded transcript of user/assistant turns
    pub turns: Vec<Turn>,
}

impl Conversation {
    fn new() -> Self {
        Self {
            persona: PersonaId::FrontDesk,
            turns: Vec::new(),
        }
    }

    /// Drop all but the most recent [`MAX_TURNS`] turns
    fn trim(&mut self) {
        if self.turns.len() > MAX_TURNS {
            let excess = self.turns.len() - MAX_TURNS;
            self.turns.drain(..excess);
        }
    }
}

/// Keyed store of per-sender conversations
///
/// Keys grow without bound (one per distinct sender, no eviction); only the
/// per-key transcript is trimmed. This mirrors the product's accepted
/// memory-growth risk. Same-sender events serialize on the inner mutex;
/// distinct senders never contend.
#[derive(Default)]
pub struct ConversationStore {
    inner: Mutex<HashMap<String, Arc<Mutex<Conversation>>>>,
}

impl ConversationStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the conversation handle for a sender
    pub async fn get_or_create(&self, sender_id: &str) -> Arc<Mutex<Conversation>> {
        let mut map = self.inner.lock().await;
        map.entry(sender_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Conversation::new())))
            .clone()
    }

    /// Number of tracked senders
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Whether no sender is tracked yet
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

/// Result of routing one inbound event
#[derive(Debug)]
pub struct Routed {
    /// Primary reply text for the sender
    pub reply: String,
    /// Resolved intent
    pub intent: Intent,
    /// Deferred side effects, in execution order
    pub effects: Vec<Effect>,
}

impl Routed {
    fn filtered() -> Self {
        Self {
            reply: String::new(),
            intent: Intent::GeneralInquiry,
            effects: Vec::new(),
        }
    }
}

/// The conversation router
pub struct ConversationRouter {
    store: ConversationStore,
    model: Option<Arc<dyn ChatModel>>,
    classifier: Arc<dyn IntentClassifier>,
}

impl ConversationRouter {
    /// Create a router; `None` model means canned replies with the default
    /// keyword classifier deciding intent
    #[must_use]
    pub fn new(model: Option<Arc<dyn ChatModel>>) -> Self {
        Self {
            store: ConversationStore::new(),
            model,
            classifier: Arc::new(KeywordClassifier),
        }
    }

    /// Swap the classification strategy used whenever the model produces no
    /// usable decision
    #[must_use]
    pub fn with_classifier(mut self, classifier: Arc<dyn IntentClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Active persona for a sender, if a conversation exists
    pub async fn persona_for(&self, sender_id: &str) -> Option<PersonaId> {
        let map = self.store.inner.lock().await;
        let convo = map.get(sender_id)?.clone();
        drop(map);
        let persona = convo.lock().await.persona;
        Some(persona)
    }

    /// Transcript length for a sender (0 when unknown)
    pub async fn turn_count(&self, sender_id: &str) -> usize {
        let map = self.store.inner.lock().await;
        let Some(convo) = map.get(sender_id).cloned() else {
            return 0;
        };
        drop(map);
        convo.lock().await.turns.len()
    }

    /// Route one inbound event into a reply and its effects
    ///
    /// Filtered events (self-sent, group, no text) produce an empty reply
    /// and zero effects.
    pub async fn route(&self, event: &InboundEvent) -> Routed {
        if !event.is_actionable() {
            return Routed::filtered();
        }
        let Some(text) = event.raw_text.as_deref() else {
            return Routed::filtered();
        };

        let handle = self.store.get_or_create(&event.sender_id).await;
        let mut convo = handle.lock().await;

        convo.turns.push(Turn::user(text));

        let persona = Persona::get(convo.persona);
        let (intent, reply) = self.decide(&persona, &convo.turns, text).await;

        convo.turns.push(Turn::assistant(reply.clone()));

        let mut effects = Vec::new();

        // Persona switch fires exactly once; sales is terminal
        if intent == Intent::SalesInterest && convo.persona == PersonaId::FrontDesk {
            convo.persona = PersonaId::Sales;
            let handoff = sales_handoff();
            convo.turns.push(Turn::assistant(handoff.clone()));
            effects.push(Effect::SendFollowUp { text: handoff });
        }

        effects.push(Effect::CreateTask {
            name: format!("Atendimento WhatsApp - {}", event.sender_id),
            description: format!(
                "Telefone: {}\nMensagem: {}\nIntenção detectada: {}",
                event.sender_id,
                text,
                intent.label()
            ),
            tag: intent.tag(),
        });

        effects.push(Effect::LogInteraction(InteractionRecord::new(
            event.sender_id.clone(),
            text,
            reply.clone(),
            intent,
        )));

        convo.trim();
        drop(convo);

        Routed {
            reply,
            intent,
            effects,
        }
    }

    /// Resolve intent and reply: model decision first, the configured
    /// classifier + canned greeting as the fallback
    async fn decide(&self, persona: &Persona, turns: &[Turn], text: &str) -> (Intent, String) {
        if let Some(model) = &self.model {
            let system_prompt =
                format!("{}\n\n{}", persona.system_prompt, DECISION_SCHEMA_INSTRUCTIONS);

            match model.complete(&system_prompt, turns).await {
                Ok(response) => {
                    if let Some(decision) = parse_decision(&response) {
                        let intent = decision.resolved_intent();
                        let reply = decision
                            .reply
                            .filter(|r| !r.trim().is_empty())
                            .unwrap_or_else(fallback_greeting);
                        return (intent, reply);
                    }
                    tracing::warn!("model returned unparseable decision, using fallback");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "model call failed, using fallback");
                }
            }
        }

        (self.classifier.classify(text).await, fallback_greeting())
    }
}
