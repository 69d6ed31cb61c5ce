//! Inbound webhook handlers

pub mod whatsapp;

use std::sync::Arc;

use axum::{Router, routing::post};

use super::ApiState;

/// Build the webhooks router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/webhook/whatsapp", post(whatsapp::handle_event))
        .with_state(state)
}
