//! Contact list persistence

use crate::contacts::Recipient;
use crate::error::BulkError;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

/// Stores each owner's current contact list
///
/// An owner has exactly one list at a time; uploading a new file replaces it.
pub struct ContactManager {
    db: SqlitePool,
}

impl ContactManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Initialize the contacts table
    pub async fn init_db(&self) -> Result<(), BulkError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS contacts (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                position INTEGER NOT NULL,
                name TEXT NOT NULL,
                phone TEXT NOT NULL,
                email TEXT,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_contacts_owner ON contacts(owner_id, position)")
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Replace the owner's contact list with `recipients`
    pub async fn replace_contacts(
        &self,
        owner_id: &str,
        recipients: &[Recipient],
    ) -> Result<usize, BulkError> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM contacts WHERE owner_id = ?")
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        for (position, recipient) in recipients.iter().enumerate() {
            let email = (!recipient.email.is_empty()).then_some(recipient.email.as_str());

            sqlx::query(
                r#"
                INSERT INTO contacts (id, owner_id, position, name, phone, email, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(owner_id)
            .bind(position as i64)
            .bind(&recipient.name)
            .bind(&recipient.phone)
            .bind(email)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!("Stored {} contacts for {}", recipients.len(), owner_id);
        Ok(recipients.len())
    }

    /// List the owner's contacts in upload order
    pub async fn list_contacts(&self, owner_id: &str) -> Result<Vec<Recipient>, BulkError> {
        let rows = sqlx::query(
            r#"
            SELECT name, phone, email
            FROM contacts
            WHERE owner_id = ?
            ORDER BY position ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter()
            .map(|row| -> Result<Recipient, BulkError> {
                let email: Option<String> = row.try_get("email")?;
                Ok(Recipient {
                    name: row.try_get("name")?,
                    phone: row.try_get("phone")?,
                    email: email.unwrap_or_default(),
                })
            })
            .collect()
    }

    pub async fn count_contacts(&self, owner_id: &str) -> Result<usize, BulkError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contacts WHERE owner_id = ?")
            .bind(owner_id)
            .fetch_one(&self.db)
            .await?;

        Ok(count as usize)
    }
}
