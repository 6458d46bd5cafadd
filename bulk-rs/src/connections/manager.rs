//! Connection persistence

use crate::connections::{Connection, ConnectionCredential, ConnectionStatus};
use crate::error::BulkError;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

pub struct ConnectionManager {
    db: SqlitePool,
}

impl ConnectionManager {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Initialize the connections table
    pub async fn init_db(&self) -> Result<(), BulkError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS connections (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                phone_number TEXT NOT NULL,
                business_account_id TEXT NOT NULL,
                access_token TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_connections_owner ON connections(owner_id)")
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Store new credentials as a connected account
    pub async fn connect(
        &self,
        owner_id: &str,
        credential: ConnectionCredential,
    ) -> Result<Connection, BulkError> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO connections (
                id, owner_id, phone_number, business_account_id,
                access_token, status, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(owner_id)
        .bind(&credential.phone_number)
        .bind(&credential.business_account_id)
        .bind(&credential.access_token)
        .bind(ConnectionStatus::Connected.to_db_string())
        .bind(now.to_rfc3339())
        .execute(&self.db)
        .await?;

        info!("Connected account {} for {}", credential.phone_number, owner_id);

        Ok(Connection {
            id,
            phone_number: credential.phone_number,
            business_account_id: credential.business_account_id,
            status: ConnectionStatus::Connected,
            created_at: now,
        })
    }

    /// Mark one of the owner's connections as disconnected
    pub async fn disconnect(&self, owner_id: &str, id: &str) -> Result<(), BulkError> {
        let result = sqlx::query("UPDATE connections SET status = ? WHERE id = ? AND owner_id = ?")
            .bind(ConnectionStatus::Disconnected.to_db_string())
            .bind(id)
            .bind(owner_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(BulkError::NotFound(format!("Connection not found: {}", id)));
        }

        info!("Disconnected {} for {}", id, owner_id);
        Ok(())
    }

    /// List the owner's connections, newest first
    pub async fn list_connections(&self, owner_id: &str) -> Result<Vec<Connection>, BulkError> {
        let rows = sqlx::query_as::<_, (String, String, String, String, String)>(
            r#"
            SELECT id, phone_number, business_account_id, status, created_at
            FROM connections
            WHERE owner_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter()
            .map(|(id, phone_number, business_account_id, status, created_at)| -> Result<Connection, BulkError> {
                let status = ConnectionStatus::from_db_string(&status)
                    .ok_or_else(|| BulkError::Parse(format!("Invalid connection status: {}", status)))?;
                let created_at = DateTime::parse_from_rfc3339(&created_at)
                    .map_err(|e| BulkError::Parse(format!("Invalid created_at date: {}", e)))?
                    .with_timezone(&Utc);

                Ok(Connection {
                    id,
                    phone_number,
                    business_account_id,
                    status,
                    created_at,
                })
            })
            .collect()
    }

    /// True if any of the owner's connections is active
    pub async fn has_active_connection(&self, owner_id: &str) -> Result<bool, BulkError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM connections WHERE owner_id = ? AND status = ?",
        )
        .bind(owner_id)
        .bind(ConnectionStatus::Connected.to_db_string())
        .fetch_one(&self.db)
        .await?;

        Ok(count > 0)
    }
}
