//! Contact lists
//!
//! CSV ingestion of recipient lists and their per-owner persistence.

pub mod csv;
pub mod manager;
pub mod types;

pub use csv::{demo_csv, parse_contacts, validate_upload, CsvError, MAX_RECIPIENTS, MAX_UPLOAD_BYTES};
pub use manager::ContactManager;
pub use types::Recipient;
