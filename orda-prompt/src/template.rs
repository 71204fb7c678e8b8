use std::collections::HashMap;
use std::sync::OnceLock;

use orda_core::{OrdaError, Value};
use regex::Regex;

pub type PromptVars = HashMap<String, Value>;

fn placeholder_pattern() -> Result<&'static Regex, OrdaError> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}"))
        .as_ref()
        .map_err(|e| OrdaError::InvalidConfig(e.to_string()))
}

/// Text template with `{{name}}` placeholders.
///
/// Single braces are left alone, so JSON examples can be embedded in a
/// prompt verbatim. Unknown placeholders render as an empty string.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn render(&self, vars: &PromptVars) -> Result<String, OrdaError> {
        let pattern = placeholder_pattern()?;
        let rendered = pattern.replace_all(&self.template, |caps: &regex::Captures| {
            let key = &caps[1];
            match vars.get(key) {
                Some(value) => value
                    .as_str()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| value.to_string()),
                None => "".to_string(),
            }
        });
        Ok(rendered.to_string())
    }

    pub fn input_variables(&self) -> Vec<String> {
        let Ok(pattern) = placeholder_pattern() else {
            return Vec::new();
        };
        let mut names: Vec<String> = Vec::new();
        for caps in pattern.captures_iter(&self.template) {
            let name = caps[1].to_string();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}
