//! Hugging Face enrichment parser
//!
//! Layers a hosted text-generation pass over the rule-based pipeline.
//! Pure enhancement: one bounded request, no retries, and every failure
//! class falls back to the rule-based result with a warning log.

pub mod api;
pub mod extract;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Local;
use log::{debug, warn};
use std::time::Duration;

use crate::config::Config;
use crate::draft::TaskDraft;
use crate::parser::rules;
use crate::parser::traits::TaskParser;

pub struct HuggingFaceParser {
    model: String,
    timeout: Duration,
    default_reminder_minutes: u32,
}

impl HuggingFaceParser {
    pub fn new(config: &Config) -> Self {
        Self {
            model: config.language_model.model.clone(),
            timeout: Duration::from_secs(config.language_model.request_timeout_secs),
            default_reminder_minutes: config.parser.default_reminder_minutes,
        }
    }
}

#[async_trait]
impl TaskParser for HuggingFaceParser {
    async fn parse_message(&self, input: &str) -> Result<TaskDraft> {
        let now = Local::now();
        let rule_based = rules::parse_task_from_text(input, now, self.default_reminder_minutes);

        match api::generate_task_fields(input, &self.model, self.timeout, now).await {
            Ok(generated) => {
                debug!("Merging generated fields into rule-based draft");
                Ok(extract::merge_generated_fields(&generated, &rule_based, now))
            }
            Err(e) => {
                warn!("Enrichment unavailable, using rule-based parse: {}", e);
                Ok(rule_based)
            }
        }
    }
}
