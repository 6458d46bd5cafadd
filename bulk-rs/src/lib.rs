//! bulk-rs: Bulk personalised messaging
//!
//! Upload a contact list as CSV, compose one message with `{name}` and
//! `{email}` placeholders, and send a personalised copy to every contact.
//!
//! # Features
//!
//! - **Contacts**: Lenient CSV ingestion, capped at 1000 recipients
//! - **Templates**: Placeholder substitution per recipient
//! - **Campaigns**: Sequential bulk send with per-recipient bookkeeping
//! - **Delivery**: Pluggable transport behind [`delivery::DeliveryTransport`]
//! - **API**: REST endpoints over SQLite storage
//!
//! # Example
//!
//! ```
//! use bulk_rs::contacts::parse_contacts;
//! use bulk_rs::templates::{MessageTemplate, SubstitutionMode, TemplateRenderer};
//!
//! let recipients = parse_contacts("Name,Phone,Email\nAnn,+1555,a@b.com").unwrap();
//! let template = MessageTemplate::new("Hi {name}, mail {email}").unwrap();
//!
//! let text = TemplateRenderer::render(&template, &recipients[0], SubstitutionMode::FirstOccurrence);
//! assert_eq!(text, "Hi Ann, mail a@b.com");
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling
//! - [`contacts`]: CSV ingestion and contact storage
//! - [`templates`]: Message templates and rendering
//! - [`session`]: Pre-send state and checks
//! - [`campaigns`]: Bulk send orchestration and records
//! - [`delivery`]: Message transports
//! - [`connections`]: Messaging account credentials
//! - [`api`]: HTTP API

pub mod api;
pub mod campaigns;
pub mod config;
pub mod connections;
pub mod contacts;
pub mod db;
pub mod delivery;
pub mod error;
pub mod logging;
pub mod session;
pub mod templates;

// Re-export commonly used types
pub use config::Config;
pub use error::{BulkError, Result};
