//! Message templates
//!
//! A message is written once and personalised per recipient by substituting
//! the `{name}` and `{email}` placeholders.

pub mod renderer;
pub mod types;

pub use renderer::TemplateRenderer;
pub use types::{MessageTemplate, SubstitutionMode, MAX_TEMPLATE_LEN};
