//! Interaction log repository

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::DbPool;
use crate::llm::Role;
use crate::{Error, Result};

/// One logged transcript message
#[derive(Debug, Clone)]
pub struct LoggedMessage {
    pub id: String,
    pub sender: String,
    pub role: String,
    pub message: String,
    pub intent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Repository for the append-only interaction log
#[derive(Clone)]
pub struct InteractionRepo {
    pool: DbPool,
}

impl InteractionRepo {
    /// Create a new interaction repository
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Append one message to the log
    ///
    /// # Errors
    ///
    /// Returns error if the database operation fails
    pub fn append(
        &self,
        sender: &str,
        role: Role,
        message: &str,
        intent: Option<&str>,
    ) -> Result<()> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO interactions (id, sender, role, message, intent, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![id, sender, role.as_str(), message, intent, now],
        )
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }

    /// List all logged messages for a sender, oldest first
    ///
    /// # Errors
    ///
    /// Returns error if the database operation fails
    pub fn list_for_sender(&self, sender: &str) -> Result<Vec<LoggedMessage>> {
        let conn = self
            .pool
            .get()
            .map_err(|e| Error::Database(e.to_string()))?;

        let mut stmt = conn
            .prepare(
                "SELECT id, sender, role, message, intent, created_at
                 FROM interactions WHERE sender = ?1 ORDER BY created_at ASC",
            )
            .map_err(|e| Error::Database(e.to_string()))?;

        let messages = stmt
            .query_map([sender], |row| {
                Ok(LoggedMessage {
                    id: row.get(0)?,
                    sender: row.get(1)?,
                    role: row.get(2)?,
                    message: row.get(3)?,
                    intent: row.get(4)?,
                    created_at: parse_datetime(&row.get::<_, String>(5)?),
                })
            })
            .map_err(|e| Error::Database(e.to_string()))?
            .filter_map(std::result::Result::ok)
            .collect();

        Ok(messages)
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
