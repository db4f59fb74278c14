//! Parser trait and factory
//!
//! A unified interface over the parser implementations: the pure
//! rule-based pipeline and the enrichment-backed parser that layers a
//! hosted language model on top of it.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Local;

use crate::config::Config;
use crate::draft::TaskDraft;
use crate::parser::rules;

/// Parser interface: one message in, one complete draft out.
#[async_trait]
pub trait TaskParser: Send + Sync {
    /// Parse a message into a task draft. Implementations must degrade
    /// to a defensible default rather than fail on malformed input.
    async fn parse_message(&self, input: &str) -> Result<TaskDraft>;
}

/// The deterministic rule-based parser; always available, no network.
pub struct RuleBasedParser {
    default_reminder_minutes: u32,
}

impl RuleBasedParser {
    pub fn new(config: &Config) -> Self {
        Self { default_reminder_minutes: config.parser.default_reminder_minutes }
    }
}

#[async_trait]
impl TaskParser for RuleBasedParser {
    async fn parse_message(&self, input: &str) -> Result<TaskDraft> {
        // "now" is sampled once so the whole parse is consistent
        Ok(rules::parse_task_from_text(input, Local::now(), self.default_reminder_minutes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rule_based_parser_never_fails() {
        let parser = RuleBasedParser::new(&Config::default());
        for input in ["", "remind me to call mom at 3 PM", "%$#@!", "tomorrow"] {
            let draft = parser.parse_message(input).await.unwrap();
            assert!(draft.reminder_minutes == 0 || draft.reminder_minutes >= 1);
        }
    }
}
