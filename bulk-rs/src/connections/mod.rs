//! Messaging account connections
//!
//! Credentials for the messaging provider are stored as entered; nothing
//! here validates them against the provider.

pub mod manager;
pub mod types;

pub use manager::ConnectionManager;
pub use types::{Connection, ConnectionCredential, ConnectionStatus};
