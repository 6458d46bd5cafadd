//! In-memory transport that keeps every delivered message
//!
//! Used by tests. It can be told to fail on a given call to
//! exercise aborted sends.

use super::{DeliveryError, DeliveryReceipt, DeliveryTransport};
use crate::contacts::Recipient;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A message accepted by [`RecordingTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub recipient: Recipient,
    pub message: String,
}

pub struct RecordingTransport {
    sent: Mutex<Vec<SentMessage>>,
    /// Zero-based call index that fails, if any
    fail_at: Option<usize>,
    calls: AtomicUsize,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_at: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Transport whose `call`-th send (zero-based) is rejected
    pub fn failing_at(call: usize) -> Self {
        Self {
            fail_at: Some(call),
            ..Self::new()
        }
    }

    /// Messages accepted so far, in send order
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeliveryTransport for RecordingTransport {
    async fn send(&self, recipient: &Recipient, message: &str) -> Result<DeliveryReceipt, DeliveryError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_at == Some(call) {
            return Err(DeliveryError::Rejected(format!(
                "simulated failure for {}",
                recipient.phone
            )));
        }

        let mut sent = self
            .sent
            .lock()
            .map_err(|_| DeliveryError::Transport("recording poisoned".to_string()))?;
        sent.push(SentMessage {
            recipient: recipient.clone(),
            message: message.to_string(),
        });

        Ok(DeliveryReceipt::new(&recipient.phone, format!("rec-{}", call)))
    }

    fn name(&self) -> &str {
        "recording"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_in_order() {
        let transport = RecordingTransport::new();
        transport.send(&Recipient::new("A", "1", ""), "one").await.unwrap();
        transport.send(&Recipient::new("B", "2", ""), "two").await.unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].message, "two");
    }

    #[tokio::test]
    async fn test_fails_at_configured_call() {
        let transport = RecordingTransport::failing_at(1);
        assert!(transport.send(&Recipient::new("A", "1", ""), "one").await.is_ok());
        assert!(matches!(
            transport.send(&Recipient::new("B", "2", ""), "two").await,
            Err(DeliveryError::Rejected(_))
        ));
        assert!(transport.send(&Recipient::new("C", "3", ""), "three").await.is_ok());
        assert_eq!(transport.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_sends_fail_exactly_once() {
        let transport = RecordingTransport::failing_at(2);
        let recipients: Vec<Recipient> = (0..5)
            .map(|i| Recipient::new(format!("R{}", i), i.to_string(), ""))
            .collect();

        let results = send_all_at_once(&transport, &recipients).await;

        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
        assert_eq!(transport.sent().len(), 4);
    }

    async fn send_all_at_once(
        transport: &RecordingTransport,
        recipients: &[Recipient],
    ) -> Vec<Result<DeliveryReceipt, DeliveryError>> {
        let (a, b, c, d, e) = tokio::join!(
            transport.send(&recipients[0], "m"),
            transport.send(&recipients[1], "m"),
            transport.send(&recipients[2], "m"),
            transport.send(&recipients[3], "m"),
            transport.send(&recipients[4], "m"),
        );
        vec![a, b, c, d, e]
    }
}
