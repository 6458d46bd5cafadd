//! Contact types

use serde::{Deserialize, Serialize};

/// A single message recipient parsed from an uploaded contact list
///
/// Recipients have no identity of their own: they are addressed by their
/// position in the list they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// Display name, never empty
    pub name: String,
    /// Phone number as written in the file, never empty
    pub phone: String,
    /// Email address, empty when the file has no email column or value
    #[serde(default)]
    pub email: String,
}

impl Recipient {
    pub fn new(name: impl Into<String>, phone: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
        }
    }

    /// Recipient used to preview a message before sending
    pub fn sample() -> Self {
        Self::new("John Doe", "+1234567890", "john@example.com")
    }
}
