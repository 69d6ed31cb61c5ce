//! Interaction recorder
//!
//! Persists a summary of each handled exchange to the interaction log.
//! Strictly best-effort: a missing or failing store degrades to a logged
//! warning, never to a processing failure.

use chrono::{DateTime, Utc};

use crate::db::InteractionRepo;
use crate::intent::Intent;
use crate::llm::Role;

/// Write-once summary of one inbound/outbound exchange
#[derive(Debug, Clone)]
pub struct InteractionRecord {
    pub sender_id: String,
    pub inbound_text: String,
    pub outbound_text: String,
    pub intent: Intent,
    pub timestamp: DateTime<Utc>,
}

impl InteractionRecord {
    /// Create a record stamped with the current time
    #[must_use]
    pub fn new(
        sender_id: impl Into<String>,
        inbound_text: impl Into<String>,
        outbound_text: impl Into<String>,
        intent: Intent,
    ) -> Self {
        Self {
            sender_id: sender_id.into(),
            inbound_text: inbound_text.into(),
            outbound_text: outbound_text.into(),
            intent,
            timestamp: Utc::now(),
        }
    }
}

/// Best-effort interaction recorder
#[derive(Clone)]
pub struct InteractionRecorder {
    repo: Option<InteractionRepo>,
}

impl InteractionRecorder {
    /// Create a recorder; `None` disables persistence entirely
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(repo: Option<InteractionRepo>) -> Self {
        Self { repo }
    }

    /// Whether a log store is configured
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.repo.is_some()
    }

    /// Record an exchange: one user row, one assistant row
    ///
    /// Never fails past this boundary. Absent store is a no-op.
    pub fn record(&self, record: &InteractionRecord) {
        let Some(repo) = &self.repo else {
            tracing::debug!(sender = %record.sender_id, "no log store configured, skipping record");
            return;
        };

        let intent = Some(record.intent.label());
        if let Err(e) = repo.append(&record.sender_id, Role::User, &record.inbound_text, intent) {
            tracing::warn!(error = %e, "failed to record inbound message");
        }
        if let Err(e) = repo.append(
            &record.sender_id,
            Role::Assistant,
            &record.outbound_text,
            intent,
        ) {
            tracing::warn!(error = %e, "failed to record outbound message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn records_both_directions() {
        let pool = db::init_memory().unwrap();
        let repo = InteractionRepo::new(pool);
        let recorder = InteractionRecorder::new(Some(repo.clone()));

        let record = InteractionRecord::new("5511", "Oi", "Bom dia!", Intent::GeneralInquiry);
        recorder.record(&record);

        let rows = repo.list_for_sender("5511").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].role, "user");
        assert_eq!(rows[1].role, "assistant");
    }

    #[test]
    fn absent_store_is_a_noop() {
        let recorder = InteractionRecorder::new(None);
        assert!(!recorder.is_enabled());
        // Must not panic or error
        recorder.record(&InteractionRecord::new("55", "a", "b", Intent::SalesInterest));
    }
}
