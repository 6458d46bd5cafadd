//! Bulk send orchestration
//!
//! Sends one composed message to every recipient of a session, one at a
//! time, pausing before each recipient.
//!
//! # Flow
//! ```text
//! check_ready → message (sending) → sends (pending) → for each recipient:
//!     pause → render → transport.send → send (sent)
//!                                     ↘ send (failed) → message (failed) → abort
//! → message (sent)
//! ```
//!
//! There is no retry and no rollback: the first failure stops the loop and
//! recipients already reached stay recorded as sent.

use crate::campaigns::{CampaignManager, MessageStatus, SendReport};
use crate::delivery::DeliveryTransport;
use crate::error::{BulkError, Result};
use crate::session::Session;
use crate::templates::{SubstitutionMode, TemplateRenderer};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

pub struct BulkSender {
    campaigns: Arc<CampaignManager>,
    transport: Arc<dyn DeliveryTransport>,
    delay: Duration,
    mode: SubstitutionMode,
}

impl BulkSender {
    pub fn new(
        campaigns: Arc<CampaignManager>,
        transport: Arc<dyn DeliveryTransport>,
        delay: Duration,
        mode: SubstitutionMode,
    ) -> Self {
        Self {
            campaigns,
            transport,
            delay,
            mode,
        }
    }

    /// Send the session's message to all of its recipients
    ///
    /// # Errors
    /// - [`BulkError::Blocked`] if the session is not ready; nothing is recorded
    /// - [`BulkError::Aborted`] if the transport rejects a message
    /// - [`BulkError::Database`] if bookkeeping fails
    pub async fn send_all(&self, owner_id: &str, session: &Session) -> Result<SendReport> {
        session.check_ready()?;

        let recipients = session.recipients();
        let message = self
            .campaigns
            .create_message(owner_id, session.template().as_str())
            .await?;

        info!(
            "Starting bulk send {} to {} recipients via {}",
            message.id,
            recipients.len(),
            self.transport.name()
        );

        match self.deliver_all(&message.id, session).await {
            Ok(delivered) => {
                self.campaigns.finish_message(&message.id, MessageStatus::Sent).await?;
                info!("Bulk send {} completed: {} delivered", message.id, delivered);

                Ok(SendReport {
                    message_id: message.id,
                    delivered,
                })
            }
            Err(e) => {
                error!("Bulk send {} aborted: {}", message.id, e);
                if let Err(mark_err) = self.campaigns.finish_message(&message.id, MessageStatus::Failed).await {
                    warn!("Failed to mark message {} as failed: {}", message.id, mark_err);
                }
                Err(e)
            }
        }
    }

    async fn deliver_all(&self, message_id: &str, session: &Session) -> Result<usize> {
        let recipients = session.recipients();
        let send_ids = self.campaigns.create_sends(message_id, recipients).await?;

        for (index, (recipient, send_id)) in recipients.iter().zip(&send_ids).enumerate() {
            sleep(self.delay).await;

            let rendered = TemplateRenderer::render(session.template(), recipient, self.mode);

            match self.transport.send(recipient, &rendered).await {
                Ok(receipt) => {
                    debug!("Delivered {} to {}", receipt.provider_message_id, recipient.phone);
                    self.campaigns.mark_send_delivered(send_id, &receipt).await?;
                }
                Err(e) => {
                    self.campaigns.mark_send_failed(send_id, &e.to_string()).await?;
                    return Err(BulkError::Aborted {
                        delivered: index,
                        failed_phone: recipient.phone.clone(),
                        source: e,
                    });
                }
            }
        }

        Ok(recipients.len())
    }
}
