//! `WhatsApp` (Z-API) webhook handler
//!
//! Returns 200 immediately and processes the message in a background task:
//! the provider retries slow or failing webhooks, and a retried delivery
//! would mean a duplicated reply. For the same reason nothing here ever
//! answers with a 5xx.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::api::ApiState;
use crate::normalize::{self, EventKind, InboundEvent};

/// Webhook acknowledgement body
#[derive(Serialize)]
pub struct WebhookResponse {
    pub ok: bool,
}

/// Handle an inbound Z-API event
pub async fn handle_event(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<WebhookResponse>) {
    let event = normalize::normalize(&payload);

    if !event.is_actionable() {
        match event.kind {
            EventKind::Status => {
                tracing::debug!(sender = %event.sender_id, "ignoring status callback");
            }
            EventKind::Text => {
                tracing::debug!(
                    sender = %event.sender_id,
                    self_sent = event.is_self_sent,
                    group = event.is_group,
                    "ignoring filtered text event"
                );
            }
            EventKind::Other => {
                tracing::debug!("ignoring unrecognized payload shape");
            }
        }
        return (StatusCode::OK, Json(WebhookResponse { ok: true }));
    }

    tracing::info!(sender = %event.sender_id, "whatsapp message received");

    tokio::spawn(async move {
        process_event(state, event).await;
    });

    (StatusCode::OK, Json(WebhookResponse { ok: true }))
}

/// Route the event and carry out its effects
///
/// Runs detached from the inbound HTTP response; all failures are local
/// (logged, replaced with fallbacks) and never reach the provider.
async fn process_event(state: Arc<ApiState>, event: InboundEvent) {
    let routed = state.router.route(&event).await;

    tracing::info!(
        sender = %event.sender_id,
        intent = routed.intent.label(),
        "event routed"
    );

    state
        .executor
        .dispatch_reply(&event.sender_id, &routed.reply)
        .await;
    state
        .executor
        .execute_all(&event.sender_id, routed.effects)
        .await;
}
