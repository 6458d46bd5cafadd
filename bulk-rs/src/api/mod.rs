//! REST API
//!
//! HTTP endpoints for contact upload, message composition, account
//! connections and bulk sends.

pub mod connections;
pub mod contacts;
pub mod handlers;
pub mod messages;
pub mod server;

pub use handlers::{AppState, OWNER_HEADER};
pub use server::ApiServer;
