//! Template types

use crate::error::BulkError;
use serde::{Deserialize, Serialize};

/// Longest message a user may compose, in characters
pub const MAX_TEMPLATE_LEN: usize = 1000;

/// How many occurrences of each placeholder are substituted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstitutionMode {
    /// Only the first `{name}` and the first `{email}` are replaced
    #[default]
    FirstOccurrence,
    /// Every occurrence is replaced
    All,
}

/// User-authored message text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageTemplate(String);

impl MessageTemplate {
    /// Create a template, rejecting text over [`MAX_TEMPLATE_LEN`] characters
    pub fn new(text: impl Into<String>) -> Result<Self, BulkError> {
        let text = text.into();
        let len = text.chars().count();

        if len > MAX_TEMPLATE_LEN {
            return Err(BulkError::InvalidMessage(format!(
                "Message is {} characters, the limit is {}",
                len, MAX_TEMPLATE_LEN
            )));
        }

        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the text is empty or only whitespace
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl TryFrom<String> for MessageTemplate {
    type Error = BulkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MessageTemplate> for String {
    fn from(template: MessageTemplate) -> Self {
        template.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_limit() {
        assert!(MessageTemplate::new("a".repeat(MAX_TEMPLATE_LEN)).is_ok());
        assert!(MessageTemplate::new("a".repeat(MAX_TEMPLATE_LEN + 1)).is_err());
    }

    #[test]
    fn test_length_counts_characters() {
        let template = MessageTemplate::new("é".repeat(MAX_TEMPLATE_LEN)).unwrap();
        assert_eq!(template.len(), MAX_TEMPLATE_LEN);
    }

    #[test]
    fn test_blank() {
        assert!(MessageTemplate::new("  \n").unwrap().is_blank());
        assert!(!MessageTemplate::new("Hi {name}").unwrap().is_blank());
    }

    #[test]
    fn test_deserialize_enforces_limit() {
        let long = format!("\"{}\"", "x".repeat(MAX_TEMPLATE_LEN + 1));
        assert!(serde_json::from_str::<MessageTemplate>(&long).is_err());

        let ok: MessageTemplate = serde_json::from_str("\"Hi {name}\"").unwrap();
        assert_eq!(ok.as_str(), "Hi {name}");
    }
}
