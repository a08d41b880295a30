//! chatline - Main CLI Entry Point

use anyhow::{Context, Result};
use chatline::cli::{Args, Commands};
use chatline::config::Config;
use chatline::repl::ReplSession;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load().context("Failed to load configuration")?;
    args.apply(&mut config);

    match args.command {
        Some(Commands::Config) => {
            let rendered =
                toml::to_string_pretty(&config).context("Failed to render configuration")?;
            print!("{}", rendered);
        }
        Some(Commands::Reset) => {
            let defaults = Config::default();
            defaults.save().context("Failed to save configuration")?;
            println!("Configuration restored to defaults");
        }
        None => {
            let mut repl = ReplSession::new(config, args.raw)?;
            repl.run().await?;
        }
    }

    Ok(())
}
