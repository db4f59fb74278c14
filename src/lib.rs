//! taskdraft: natural-language task and reminder parsing
//!
//! Converts a free-text message like "remind me to call mom at 3 PM"
//! into a structured task draft (title, description, due time, reminder
//! offset). A deterministic rule-based pipeline does the work; a hosted
//! language model can optionally enrich the result and transparently
//! falls back to the rules when unavailable.

pub mod cli;
pub mod config;
pub mod draft;
pub mod parser;

pub use config::{Config, Provider, DEFAULT_REMINDER_MINUTES};
pub use draft::TaskDraft;
pub use parser::{ParserFactory, TaskParser};

use env_logger::Env;

pub fn init_logger() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();
}
