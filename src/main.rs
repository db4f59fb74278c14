use anyhow::Result;
use clap::Parser as ClapParser;
use log::info;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use taskdraft::cli::{Cli, Commands, ConfigActions};
use taskdraft::parser::{ParserFactory, RuleBasedParser, TaskParser};
use taskdraft::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads credentials
    let _ = dotenvy::dotenv();
    taskdraft::init_logger();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Some(Commands::Parse { message, no_enrich }) => {
            let parser: Box<dyn TaskParser + Send + Sync> = if no_enrich {
                Box::new(RuleBasedParser::new(&config))
            } else {
                ParserFactory::create_parser(&config)?
            };
            let draft = parser.parse_message(&message).await?;
            println!("{}", serde_json::to_string_pretty(&draft)?);
        }
        Some(Commands::Config { action: ConfigActions::Show }) => {
            println!("{}", toml::to_string_pretty(&config)?);
        }
        None => run_interactive(&config).await?,
    }

    Ok(())
}

/// Interactive loop: each entered message is parsed and the resulting
/// draft printed as JSON.
async fn run_interactive(config: &Config) -> Result<()> {
    info!("Starting taskdraft interactive mode (ctrl-d to exit)");
    let parser = ParserFactory::create_parser(config)?;
    let mut editor = DefaultEditor::new()?;

    loop {
        match editor.readline("taskdraft> ") {
            Ok(line) => {
                let message = line.trim();
                if message.is_empty() {
                    continue;
                }
                editor.add_history_entry(message)?;
                let draft = parser.parse_message(message).await?;
                println!("{}", serde_json::to_string_pretty(&draft)?);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
