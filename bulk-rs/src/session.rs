//! Per-user working state for composing a bulk send
//!
//! A [`Session`] gathers what a send needs: the current contact list, the
//! message being composed and whether a messaging account is connected.
//! Updates consume the session and return the new one.

use crate::contacts::Recipient;
use crate::templates::{MessageTemplate, MAX_TEMPLATE_LEN};
use serde::Serialize;
use thiserror::Error;

/// Reason a send cannot start
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendBlocked {
    #[error("Please enter a message to send")]
    EmptyMessage,

    #[error("Please upload contacts first")]
    NoRecipients,

    #[error("Please connect your messaging account first")]
    NotConnected,
}

/// Counters shown alongside the composer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub contacts: usize,
    pub message_length: usize,
    pub max_message_length: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    recipients: Vec<Recipient>,
    template: MessageTemplate,
    connected: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contact list
    pub fn with_recipients(self, recipients: Vec<Recipient>) -> Self {
        Self { recipients, ..self }
    }

    pub fn with_template(self, template: MessageTemplate) -> Self {
        Self { template, ..self }
    }

    pub fn with_connection(self, connected: bool) -> Self {
        Self { connected, ..self }
    }

    pub fn recipients(&self) -> &[Recipient] {
        &self.recipients
    }

    pub fn template(&self) -> &MessageTemplate {
        &self.template
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Check that a send can start
    ///
    /// Checks run in order: message, contacts, connection. The first failing
    /// check is reported.
    pub fn check_ready(&self) -> Result<(), SendBlocked> {
        if self.template.is_blank() {
            return Err(SendBlocked::EmptyMessage);
        }
        if self.recipients.is_empty() {
            return Err(SendBlocked::NoRecipients);
        }
        if !self.connected {
            return Err(SendBlocked::NotConnected);
        }
        Ok(())
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            contacts: self.recipients.len(),
            message_length: self.template.len(),
            max_message_length: MAX_TEMPLATE_LEN,
        }
    }
}
