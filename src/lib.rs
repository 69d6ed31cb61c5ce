//! Front Desk Gateway - `WhatsApp` conversational front desk for energy sales
//!
//! This library provides the core functionality for the gateway:
//! - Inbound payload normalization across provider shapes
//! - Intent classification (keyword or model-assisted)
//! - Conversation routing with front-desk and sales personas
//! - Reply dispatch via Z-API and interaction recording
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              Z-API webhook (axum)                    │
//! └────────────────────┬────────────────────────────────┘
//!                      │ normalize → filter
//! ┌────────────────────▼────────────────────────────────┐
//! │              Conversation Router                     │
//! │   personas  │  transcript store  │  intent          │
//! └────────────────────┬────────────────────────────────┘
//!                      │ reply + effects
//! ┌────────────────────▼────────────────────────────────┐
//! │              Effect Executor                         │
//! │   Z-API send  │  ClickUp task  │  SQLite log        │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod channels;
pub mod config;
pub mod daemon;
pub mod db;
pub mod effects;
pub mod error;
pub mod intent;
pub mod llm;
pub mod normalize;
pub mod persona;
pub mod recorder;
pub mod router;
pub mod tasks;

pub use channels::{DispatchErrorKind, DispatchResult, MessageSender, ZapiChannel};
pub use config::Config;
pub use daemon::Daemon;
pub use db::{DbConn, DbPool};
pub use effects::{Effect, EffectExecutor};
pub use error::{Error, Result};
pub use intent::{Intent, IntentClassifier, KeywordClassifier, ModelClassifier};
pub use llm::{ChatModel, OpenAiChat, Role, Turn};
pub use normalize::{EventKind, InboundEvent, normalize};
pub use persona::{Persona, PersonaId};
pub use recorder::{InteractionRecord, InteractionRecorder};
pub use router::{ConversationRouter, ConversationStore, Routed};
pub use tasks::TaskTracker;
