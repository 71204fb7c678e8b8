//! Prompt templates with `{{name}}` placeholders and role-tagged chat
//! prompts that render into model messages.

mod chat;
mod template;

pub use chat::ChatPromptTemplate;
pub use template::{PromptTemplate, PromptVars};

/// Builds prompt variables from `(name, value)` pairs.
pub fn vars<I, K, V>(pairs: I) -> PromptVars
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<orda_core::Value>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}
