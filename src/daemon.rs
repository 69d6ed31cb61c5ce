//! Daemon - the main gateway service
//!
//! Wires configuration, database, channel, model, router, and executor
//! together and serves the webhook API until interrupted.

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::api::{self, ApiState};
use crate::channels::{MessageSender, ZapiChannel};
use crate::config::Config;
use crate::db::{self, DbPool, InteractionRepo};
use crate::effects::EffectExecutor;
use crate::llm::{ChatModel, OpenAiChat};
use crate::recorder::InteractionRecorder;
use crate::router::ConversationRouter;
use crate::tasks::TaskTracker;
use crate::Result;

/// The front desk daemon
pub struct Daemon {
    config: Config,
    port: u16,
    db: Option<DbPool>,
}

impl Daemon {
    /// Create a new daemon instance
    ///
    /// Database initialization is best-effort: a failure disables the
    /// interaction log and the daemon keeps running.
    #[must_use]
    pub fn new(config: Config, port: u16) -> Self {
        let db = init_db(&config);
        Self { config, port, db }
    }

    /// Run the daemon until interrupted
    ///
    /// # Errors
    ///
    /// Returns error only if the listener cannot bind; everything
    /// downstream degrades instead of failing.
    pub async fn run(self) -> Result<()> {
        let channel: Option<Arc<dyn MessageSender>> = self.config.zapi.as_ref().map(|z| {
            tracing::info!(instance = %z.instance_id, "z-api channel configured");
            Arc::new(ZapiChannel::new(
                z.instance_id.clone(),
                z.token.clone(),
                z.client_token.clone(),
            )) as Arc<dyn MessageSender>
        });

        let tracker = self.config.clickup.as_ref().map(|c| {
            tracing::info!(list = %c.list_id, "clickup task tracker configured");
            TaskTracker::new(c.token.clone(), c.list_id.clone())
        });

        let model: Option<Arc<dyn ChatModel>> = self.config.model.as_ref().map(|m| {
            tracing::info!(model = %m.model, "chat model configured");
            Arc::new(OpenAiChat::new(m.api_key.clone(), m.model.clone()))
                as Arc<dyn ChatModel>
        });

        let recorder = InteractionRecorder::new(self.db.clone().map(InteractionRepo::new));

        let state = Arc::new(ApiState {
            router: ConversationRouter::new(model),
            executor: EffectExecutor::new(channel, tracker, recorder),
            db: self.db,
        });

        let app = api::build_router(state);

        let listener = TcpListener::bind(("0.0.0.0", self.port)).await?;
        tracing::info!(port = self.port, "front desk gateway listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("front desk gateway stopped");
        Ok(())
    }
}

/// Initialize the database, degrading to `None` on any failure
fn init_db(config: &Config) -> Option<DbPool> {
    if let Err(e) = std::fs::create_dir_all(&config.data_dir) {
        tracing::warn!(error = %e, dir = %config.data_dir.display(), "could not create data directory, interaction log disabled");
        return None;
    }

    let db_path = config.data_dir.join("frontdesk.db");
    match db::init(&db_path) {
        Ok(pool) => {
            tracing::info!(path = %db_path.display(), "interaction log ready");
            Some(pool)
        }
        Err(e) => {
            tracing::warn!(error = %e, "database initialization failed, interaction log disabled");
            None
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
