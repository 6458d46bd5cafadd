//! Template rendering with placeholder substitution

use crate::contacts::Recipient;
use crate::templates::{MessageTemplate, SubstitutionMode};

const NAME_PLACEHOLDER: &str = "{name}";
const EMAIL_PLACEHOLDER: &str = "{email}";

/// Renders message templates for individual recipients
pub struct TemplateRenderer;

impl TemplateRenderer {
    /// Render a template for one recipient
    ///
    /// # Placeholders
    /// - `{name}` - Recipient's name
    /// - `{email}` - Recipient's email address, empty if unknown
    ///
    /// `{name}` is substituted first, then `{email}`. With
    /// [`SubstitutionMode::FirstOccurrence`] later repeats of a placeholder
    /// are left in the output untouched. No escaping is applied.
    pub fn render(template: &MessageTemplate, recipient: &Recipient, mode: SubstitutionMode) -> String {
        Self::render_str(template.as_str(), recipient, mode)
    }

    /// Render raw text, without the template length check
    pub fn render_str(text: &str, recipient: &Recipient, mode: SubstitutionMode) -> String {
        let substitute = |input: &str, placeholder: &str, value: &str| match mode {
            SubstitutionMode::FirstOccurrence => input.replacen(placeholder, value, 1),
            SubstitutionMode::All => input.replace(placeholder, value),
        };

        let with_name = substitute(text, NAME_PLACEHOLDER, &recipient.name);
        substitute(&with_name, EMAIL_PLACEHOLDER, &recipient.email)
    }

    /// Render against the sample recipient shown in message previews
    pub fn preview(template: &MessageTemplate, mode: SubstitutionMode) -> String {
        Self::render(template, &Recipient::sample(), mode)
    }

    /// Extract every `{word}` token in the text
    ///
    /// Returns token names without braces, sorted and deduplicated. Tokens
    /// other than `name` and `email` are not substituted by [`Self::render`].
    pub fn extract_placeholders(text: &str) -> Vec<String> {
        let mut placeholders = Vec::new();
        let mut rest = text;

        while let Some(start) = rest.find('{') {
            let after = &rest[start + 1..];
            match after.find(|c: char| c == '}' || c == '{') {
                Some(end) if after[end..].starts_with('}') => {
                    let token = &after[..end];
                    if !token.is_empty()
                        && token.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                    {
                        placeholders.push(token.to_string());
                    }
                    rest = &after[end + 1..];
                }
                Some(end) => rest = &after[end..],
                None => break,
            }
        }

        placeholders.sort();
        placeholders.dedup();
        placeholders
    }

    /// Placeholders present in the text that rendering will not substitute
    pub fn unknown_placeholders(text: &str) -> Vec<String> {
        Self::extract_placeholders(text)
            .into_iter()
            .filter(|p| p != "name" && p != "email")
            .collect()
    }
}
