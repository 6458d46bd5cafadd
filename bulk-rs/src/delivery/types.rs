//! Delivery results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Acknowledgement that a message was handed to the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    /// Phone number the message was addressed to
    pub recipient_phone: String,
    /// Identifier assigned by the provider
    pub provider_message_id: String,
    pub delivered_at: DateTime<Utc>,
}

impl DeliveryReceipt {
    pub fn new(recipient_phone: impl Into<String>, provider_message_id: impl Into<String>) -> Self {
        Self {
            recipient_phone: recipient_phone.into(),
            provider_message_id: provider_message_id.into(),
            delivered_at: Utc::now(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The provider refused this message
    #[error("Message rejected: {0}")]
    Rejected(String),

    /// The provider could not be reached
    #[error("Transport failure: {0}")]
    Transport(String),
}
