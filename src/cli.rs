use clap::{Parser, Subcommand};

/// taskdraft - turn natural-language messages into structured task drafts
#[derive(Debug, Parser)]
#[command(name = "taskdraft")]
#[command(about = "Turn natural-language messages into structured task drafts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute (if not specified, enters interactive mode)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse a single message and print the draft as JSON
    Parse {
        /// The natural-language message, e.g. "remind me to call mom at 3 PM"
        message: String,

        /// Skip model enrichment even when a provider is configured
        #[arg(long = "no-enrich")]
        no_enrich: bool,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        action: ConfigActions,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigActions {
    /// Display the effective configuration
    Show,
}
