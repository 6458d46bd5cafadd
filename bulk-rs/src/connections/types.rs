//! Connection types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Credentials entered for a messaging account
#[derive(Clone, Deserialize)]
pub struct ConnectionCredential {
    pub phone_number: String,
    pub business_account_id: String,
    pub access_token: String,
}

impl std::fmt::Debug for ConnectionCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionCredential")
            .field("phone_number", &self.phone_number)
            .field("business_account_id", &self.business_account_id)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

impl ConnectionStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Disconnected => "disconnected",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "connected" => Some(ConnectionStatus::Connected),
            "disconnected" => Some(ConnectionStatus::Disconnected),
            _ => None,
        }
    }
}

/// A stored connection; the access token is never exposed
#[derive(Debug, Clone, Serialize)]
pub struct Connection {
    pub id: String,
    pub phone_number: String,
    pub business_account_id: String,
    pub status: ConnectionStatus,
    pub created_at: DateTime<Utc>,
}
