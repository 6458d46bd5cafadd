//! Campaign persistence: composed messages and per-recipient sends

use crate::campaigns::{MessageRecord, MessageStatus, SendRecord, SendStatus};
use crate::contacts::Recipient;
use crate::delivery::DeliveryReceipt;
use crate::error::BulkError;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

pub struct CampaignManager {
    db: SqlitePool,
}

impl CampaignManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Initialize the messages and message_sends tables
    pub async fn init_db(&self) -> Result<(), BulkError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                content TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL,
                sent_at TEXT
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS message_sends (
                id TEXT PRIMARY KEY,
                message_id TEXT NOT NULL REFERENCES messages(id),
                position INTEGER NOT NULL,
                phone TEXT NOT NULL,
                status TEXT NOT NULL,
                provider_message_id TEXT,
                error TEXT,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_messages_owner ON messages(owner_id)")
            .execute(&self.db)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_sends_message ON message_sends(message_id, position)")
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Record a new message in the `sending` state
    pub async fn create_message(&self, owner_id: &str, content: &str) -> Result<MessageRecord, BulkError> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO messages (id, owner_id, content, status, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(owner_id)
        .bind(content)
        .bind(MessageStatus::Sending.to_db_string())
        .bind(now.to_rfc3339())
        .execute(&self.db)
        .await?;

        Ok(MessageRecord {
            id,
            owner_id: owner_id.to_string(),
            content: content.to_string(),
            status: MessageStatus::Sending,
            created_at: now,
            sent_at: None,
        })
    }

    /// Create one pending send per recipient
    ///
    /// Returns the send ids in recipient order.
    pub async fn create_sends(
        &self,
        message_id: &str,
        recipients: &[Recipient],
    ) -> Result<Vec<String>, BulkError> {
        let now = Utc::now().to_rfc3339();
        let mut ids = Vec::with_capacity(recipients.len());
        let mut tx = self.db.begin().await?;

        for (position, recipient) in recipients.iter().enumerate() {
            let id = Uuid::new_v4().to_string();

            sqlx::query(
                r#"
                INSERT INTO message_sends (id, message_id, position, phone, status, updated_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&id)
            .bind(message_id)
            .bind(position as i64)
            .bind(&recipient.phone)
            .bind(SendStatus::Pending.to_db_string())
            .bind(&now)
            .execute(&mut *tx)
            .await?;

            ids.push(id);
        }

        tx.commit().await?;
        Ok(ids)
    }

    pub async fn mark_send_delivered(&self, send_id: &str, receipt: &DeliveryReceipt) -> Result<(), BulkError> {
        sqlx::query(
            r#"
            UPDATE message_sends
            SET status = ?, provider_message_id = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(SendStatus::Sent.to_db_string())
        .bind(&receipt.provider_message_id)
        .bind(receipt.delivered_at.to_rfc3339())
        .bind(send_id)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    pub async fn mark_send_failed(&self, send_id: &str, error: &str) -> Result<(), BulkError> {
        sqlx::query(
            r#"
            UPDATE message_sends
            SET status = ?, error = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(SendStatus::Failed.to_db_string())
        .bind(error)
        .bind(Utc::now().to_rfc3339())
        .bind(send_id)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Set the final status of a message; `sent` also stamps `sent_at`
    pub async fn finish_message(&self, message_id: &str, status: MessageStatus) -> Result<(), BulkError> {
        let sent_at = (status == MessageStatus::Sent).then(|| Utc::now().to_rfc3339());

        sqlx::query("UPDATE messages SET status = ?, sent_at = ? WHERE id = ?")
            .bind(status.to_db_string())
            .bind(sent_at)
            .bind(message_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    pub async fn get_message(&self, message_id: &str) -> Result<Option<MessageRecord>, BulkError> {
        let row = sqlx::query(
            r#"
            SELECT id, owner_id, content, status, created_at, sent_at
            FROM messages
            WHERE id = ?
            "#,
        )
        .bind(message_id)
        .fetch_optional(&self.db)
        .await?;

        row.map(|row| self.row_to_message(row)).transpose()
    }

    /// List the owner's messages, newest first
    pub async fn list_messages(&self, owner_id: &str) -> Result<Vec<MessageRecord>, BulkError> {
        let rows = sqlx::query(
            r#"
            SELECT id, owner_id, content, status, created_at, sent_at
            FROM messages
            WHERE owner_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(|row| self.row_to_message(row)).collect()
    }

    /// List the sends of a message in recipient order
    pub async fn list_sends(&self, message_id: &str) -> Result<Vec<SendRecord>, BulkError> {
        let rows = sqlx::query(
            r#"
            SELECT id, message_id, position, phone, status, provider_message_id, error, updated_at
            FROM message_sends
            WHERE message_id = ?
            ORDER BY position ASC
            "#,
        )
        .bind(message_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(|row| self.row_to_send(row)).collect()
    }

    fn row_to_message(&self, row: sqlx::sqlite::SqliteRow) -> Result<MessageRecord, BulkError> {
        let status_str: String = row.try_get("status")?;
        let status = MessageStatus::from_db_string(&status_str)
            .ok_or_else(|| BulkError::Parse(format!("Invalid message status: {}", status_str)))?;

        let created_at: String = row.try_get("created_at")?;
        let sent_at: Option<String> = row.try_get("sent_at")?;

        Ok(MessageRecord {
            id: row.try_get("id")?,
            owner_id: row.try_get("owner_id")?,
            content: row.try_get("content")?,
            status,
            created_at: parse_timestamp(&created_at)?,
            sent_at: sent_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }

    fn row_to_send(&self, row: sqlx::sqlite::SqliteRow) -> Result<SendRecord, BulkError> {
        let status_str: String = row.try_get("status")?;
        let status = SendStatus::from_db_string(&status_str)
            .ok_or_else(|| BulkError::Parse(format!("Invalid send status: {}", status_str)))?;

        let position: i64 = row.try_get("position")?;
        let updated_at: String = row.try_get("updated_at")?;

        Ok(SendRecord {
            id: row.try_get("id")?,
            message_id: row.try_get("message_id")?,
            position: position as usize,
            phone: row.try_get("phone")?,
            status,
            provider_message_id: row.try_get("provider_message_id")?,
            error: row.try_get("error")?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, BulkError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| BulkError::Parse(format!("Invalid timestamp '{}': {}", value, e)))
}
