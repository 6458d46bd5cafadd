//! Message delivery abstraction
//!
//! A bulk send hands every rendered message to a [`DeliveryTransport`]. The
//! transport owns whatever talks to the messaging provider; the rest of the
//! crate only sees receipts and errors.

use crate::contacts::Recipient;
use async_trait::async_trait;

pub mod log;
pub mod recording;
pub mod types;

pub use self::log::LogTransport;
pub use recording::RecordingTransport;
pub use types::{DeliveryError, DeliveryReceipt};

/// Delivers one rendered message to one recipient
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeliveryTransport: Send + Sync {
    /// Send `message` to `recipient`
    async fn send(&self, recipient: &Recipient, message: &str) -> Result<DeliveryReceipt, DeliveryError>;

    /// Transport name, for logs
    fn name(&self) -> &str;
}
