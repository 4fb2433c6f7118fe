//! Outbound prompts.
//!
//! A prompt is what the engine asks the transport to present: a text plus
//! the enumerated options valid for the new state. The transport renders the
//! options however it likes (inline buttons, numbered list, ...) and echoes
//! the chosen token back.

use serde::{Deserialize, Serialize};

use crate::token::Token;

/// One choice offered to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptOption {
    pub label: String,
    pub token: Token,
}

impl PromptOption {
    pub fn new(label: impl Into<String>, token: Token) -> Self {
        Self {
            label: label.into(),
            token,
        }
    }
}

/// The engine's answer to one inbound event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub text: String,
    pub options: Vec<PromptOption>,
}

impl Prompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: Vec::new(),
        }
    }

    pub fn option(mut self, label: impl Into<String>, token: Token) -> Self {
        self.options.push(PromptOption::new(label, token));
        self
    }

    /// Prepend a hint line (used when re-prompting after invalid input).
    pub fn hinted(mut self, hint: &str) -> Self {
        self.text = format!("{hint}\n{}", self.text);
        self
    }

    /// Find an option by its label (test/transport convenience).
    pub fn find_option(&self, label: &str) -> Option<&PromptOption> {
        self.options.iter().find(|o| o.label == label)
    }
}
