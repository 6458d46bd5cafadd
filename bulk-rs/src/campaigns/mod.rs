//! Bulk message campaigns
//!
//! A campaign is one composed message sent to every contact of an owner.
//! The message text and the per-recipient outcome are recorded so a send can
//! be inspected afterwards.

pub mod manager;
pub mod sender;
pub mod types;

pub use manager::CampaignManager;
pub use sender::BulkSender;
pub use types::{MessageRecord, MessageStatus, SendRecord, SendReport, SendStatus};
