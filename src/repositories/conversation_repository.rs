use rusqlite::{params, OptionalExtension};
use tokio_rusqlite::Connection;

use crate::entities::conversation::Conversation;
use crate::errors::{BotError, Result};


fn storage_error(err: impl std::fmt::Display) -> BotError {
    BotError::Storage(err.to_string())
}

pub struct ConversationRepository {
    pub conn: Connection,
}

impl ConversationRepository {
    pub async fn create_table(&self) -> Result<()> {
        self.conn.call(|conn| {
            conn.execute("CREATE TABLE IF NOT EXISTS Conversation (
                id          TEXT PRIMARY KEY,
                state       TEXT NOT NULL,
                expiration  INTEGER NOT NULL
            )",
            ())?;
            Ok::<_, rusqlite::Error>(())
        }).await.map_err(storage_error)
    }

    /// Stored conversation regardless of expiration.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Conversation>> {
        let id_clone = id.to_string();
        self.conn.call(move |conn| {
            let mut stmt = conn.prepare("SELECT id, state, expiration FROM Conversation WHERE id = ?1")?;
            let conversation = stmt.query_row(params![id_clone], |row| {
                Ok(Conversation {
                    id: row.get(0)?,
                    state: row.get(1)?,
                    expiration: row.get(2)?,
                })
            }).optional()?;

            Ok::<_, rusqlite::Error>(conversation)
        }).await.map_err(storage_error)
    }

    pub async fn upsert(&self, conversation: Conversation) -> Result<()> {
        self.conn.call(move |conn| {
            conn.execute(
                "INSERT INTO Conversation (id, state, expiration) VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET state = excluded.state, expiration = excluded.expiration",
                params![conversation.id, conversation.state, conversation.expiration],
            )?;
            Ok::<_, rusqlite::Error>(())
        }).await.map_err(storage_error)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let id_clone = id.to_string();
        self.conn.call(move |conn| {
            conn.execute("DELETE FROM Conversation WHERE id = ?1", params![id_clone])?;
            Ok::<_, rusqlite::Error>(())
        }).await.map_err(storage_error)
    }

    pub async fn delete_expired(&self, now: i64) -> Result<usize> {
        self.conn.call(move |conn| {
            let removed = conn.execute("DELETE FROM Conversation WHERE expiration <= ?1", params![now])?;
            Ok::<_, rusqlite::Error>(removed)
        }).await.map_err(storage_error)
    }
}
