use thiserror::Error;

use crate::contacts::CsvError;
use crate::delivery::DeliveryError;
use crate::session::SendBlocked;

#[derive(Error, Debug)]
pub enum BulkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    #[error("No valid contacts found in the CSV file")]
    NoValidContacts,

    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Cannot send: {0}")]
    Blocked(#[from] SendBlocked),

    #[error("Delivery aborted after {delivered} messages (failed for {failed_phone}): {source}")]
    Aborted {
        delivered: usize,
        failed_phone: String,
        #[source]
        source: DeliveryError,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BulkError>;
