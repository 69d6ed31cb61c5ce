//! HTTP API for the front desk gateway

pub mod health;
pub mod webhooks;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::db::DbPool;
use crate::effects::EffectExecutor;
use crate::router::ConversationRouter;

/// Shared state for API handlers
pub struct ApiState {
    /// Conversation router (owns per-sender state)
    pub router: ConversationRouter,
    /// Effect executor for replies, tasks, and the interaction log
    pub executor: EffectExecutor,
    /// Database pool, when logging is configured
    pub db: Option<DbPool>,
}

/// Build the full API router
pub fn build_router(state: Arc<ApiState>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);

    Router::new()
        .merge(health::router())
        .merge(health::ready_router(state.clone()))
        .merge(webhooks::router(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
