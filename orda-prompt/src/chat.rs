use async_trait::async_trait;
use orda_core::{Message, OrdaError, Role, Runnable};

use crate::{PromptTemplate, PromptVars};

/// An ordered list of role-tagged templates rendered into chat messages.
#[derive(Debug, Clone, Default)]
pub struct ChatPromptTemplate {
    turns: Vec<(Role, PromptTemplate)>,
}

impl ChatPromptTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// The usual analysis prompt: instructions, then the material.
    pub fn system_human(system: &str, human: &str) -> Self {
        Self::new().system(system).human(human)
    }

    pub fn system(self, template: &str) -> Self {
        self.turn(Role::System, template)
    }

    pub fn human(self, template: &str) -> Self {
        self.turn(Role::User, template)
    }

    /// A fixed model answer, for few-shot examples.
    pub fn assistant(self, template: &str) -> Self {
        self.turn(Role::Assistant, template)
    }

    fn turn(mut self, role: Role, template: &str) -> Self {
        self.turns.push((role, PromptTemplate::new(template)));
        self
    }

    pub fn format_messages(&self, vars: &PromptVars) -> Result<Vec<Message>, OrdaError> {
        let mut messages = Vec::with_capacity(self.turns.len());
        for (role, template) in &self.turns {
            messages.push(Message {
                role: role.clone(),
                content: template.render(vars)?,
            });
        }
        Ok(messages)
    }
}

#[async_trait]
impl Runnable<PromptVars, Vec<Message>> for ChatPromptTemplate {
    async fn invoke(&self, input: PromptVars) -> Result<Vec<Message>, OrdaError> {
        self.format_messages(&input)
    }
}
