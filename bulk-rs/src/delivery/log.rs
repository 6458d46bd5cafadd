//! Logging transport
//!
//! Stands in for a real messaging provider: every message is written to the
//! log and acknowledged with a locally generated id.

use super::{DeliveryError, DeliveryReceipt, DeliveryTransport};
use crate::contacts::Recipient;
use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

pub struct LogTransport {
    name: String,
}

impl LogTransport {
    pub fn new() -> Self {
        Self {
            name: "log".to_string(),
        }
    }
}

impl Default for LogTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeliveryTransport for LogTransport {
    async fn send(&self, recipient: &Recipient, message: &str) -> Result<DeliveryReceipt, DeliveryError> {
        info!("Sending to {} ({}): {}", recipient.name, recipient.phone, message);
        Ok(DeliveryReceipt::new(&recipient.phone, Uuid::new_v4().to_string()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
