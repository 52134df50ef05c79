//! Chat and contact message storage.

use crate::error::{Error, Result};
use crate::models::{ChatMessage, DeliveryStatus};

use super::{now_string, parse_timestamp, Database};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChatMessageRow {
    pub id: i64,
    pub room: String,
    pub sender_id: String,
    pub body: String,
    pub is_admin: bool,
    pub status: String,
    pub created_at: String,
}

impl ChatMessageRow {
    fn into_message(self) -> Result<ChatMessage> {
        Ok(ChatMessage {
            status: self
                .status
                .parse::<DeliveryStatus>()
                .map_err(|e| Error::Corrupt(e.to_string()))?,
            created_at: parse_timestamp(&self.created_at)?,
            id: self.id,
            room: self.room,
            sender_id: self.sender_id,
            body: self.body,
            is_admin: self.is_admin,
        })
    }
}

impl Database {
    /// Append a chat message to a room.
    pub async fn insert_chat_message(
        &self,
        room: &str,
        sender_id: &str,
        body: &str,
        is_admin: bool,
    ) -> Result<ChatMessage> {
        let row: ChatMessageRow = sqlx::query_as(
            r#"
            INSERT INTO chat_messages (room, sender_id, body, is_admin, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(room)
        .bind(sender_id)
        .bind(body)
        .bind(is_admin)
        .bind(DeliveryStatus::Sent.as_str())
        .bind(now_string())
        .fetch_one(&self.pool)
        .await?;

        row.into_message()
    }

    /// Full history for a room, oldest first.
    pub async fn chat_history(&self, room: &str) -> Result<Vec<ChatMessage>> {
        let rows: Vec<ChatMessageRow> =
            sqlx::query_as("SELECT * FROM chat_messages WHERE room = ? ORDER BY created_at")
                .bind(room)
                .fetch_all(&self.pool)
                .await?;
        rows.into_iter().map(ChatMessageRow::into_message).collect()
    }

    /// Persist a contact-form submission before any notification attempt.
    pub async fn insert_contact_message(
        &self,
        name: &str,
        email: &str,
        body: &str,
    ) -> Result<i64> {
        let row: (i64,) = sqlx::query_as(
            "INSERT INTO contact_messages (name, email, body, created_at) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(name)
        .bind(email)
        .bind(body)
        .bind(now_string())
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn history_is_oldest_first_per_room() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        db.insert_chat_message("room-1", "user-1", "hello", false)
            .await
            .unwrap();
        db.insert_chat_message("room-1", "admin-1", "hi, how can we help?", true)
            .await
            .unwrap();
        db.insert_chat_message("room-2", "user-2", "unrelated", false)
            .await
            .unwrap();

        let history = db.chat_history("room-1").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].body, "hello");
        assert!(history[1].is_admin);
    }
}
