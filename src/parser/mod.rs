//! Parser module
//!
//! `rules` is the deterministic pattern-matching pipeline; `huggingface`
//! wraps it with an optional hosted-model enrichment pass. The factory
//! picks an implementation from configuration.

pub mod huggingface;
pub mod rules;
pub mod traits;

use anyhow::Result;
use log::info;

use crate::config::{Config, Provider};
pub use traits::{RuleBasedParser, TaskParser};

/// Factory for creating the configured parser.
pub struct ParserFactory;

impl ParserFactory {
    pub fn create_parser(config: &Config) -> Result<Box<dyn TaskParser + Send + Sync>> {
        match config.language_model.provider {
            Some(Provider::HuggingFace) => {
                info!("Using Hugging Face enrichment with rule-based fallback");
                Ok(Box::new(huggingface::HuggingFaceParser::new(config)))
            }
            None => {
                info!("Using rule-based parser (no model configured)");
                Ok(Box::new(RuleBasedParser::new(config)))
            }
        }
    }
}
