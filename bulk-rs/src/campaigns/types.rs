//! Campaign types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Overall state of a composed message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Sending,
    Sent,
    Failed,
}

impl MessageStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            MessageStatus::Sending => "sending",
            MessageStatus::Sent => "sent",
            MessageStatus::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "sending" => Some(MessageStatus::Sending),
            "sent" => Some(MessageStatus::Sent),
            "failed" => Some(MessageStatus::Failed),
            _ => None,
        }
    }
}

/// State of the message for a single recipient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendStatus {
    Pending,
    Sent,
    Failed,
}

impl SendStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            SendStatus::Pending => "pending",
            SendStatus::Sent => "sent",
            SendStatus::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(SendStatus::Pending),
            "sent" => Some(SendStatus::Sent),
            "failed" => Some(SendStatus::Failed),
            _ => None,
        }
    }
}

/// A composed message as it was submitted, before personalisation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: String,
    pub owner_id: String,
    /// Template text with placeholders intact
    pub content: String,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
}

/// Outcome of a message for one recipient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendRecord {
    pub id: String,
    pub message_id: String,
    /// Position of the recipient in the contact list
    pub position: usize,
    pub phone: String,
    pub status: SendStatus,
    pub provider_message_id: Option<String>,
    pub error: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Summary of a completed bulk send
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendReport {
    pub message_id: String,
    pub delivered: usize,
}
