//! Command-line argument parsing for chatline
//!
//! Provides clap-based CLI with subcommands; flags override loaded
//! settings for the run without persisting them.

use crate::config::{Config, ResponseMode};
use clap::{Parser, Subcommand};

/// chatline - Chat with an OpenAI-compatible streaming endpoint from the terminal
#[derive(Parser, Debug)]
#[command(name = "chatline")]
#[command(version = "0.3.0")]
#[command(about = "Terminal chat client for OpenAI-compatible streaming endpoints", long_about = None)]
pub struct Args {
    /// Completion endpoint base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Seed forwarded to the backend
    #[arg(long)]
    pub seed: Option<i64>,

    /// System prompt prepended to every request
    #[arg(long)]
    pub system_prompt: Option<String>,

    /// Generation length bound (-1 lets the backend decide)
    #[arg(long)]
    pub max_tokens: Option<i64>,

    /// Use the raw byte-stream endpoint instead of structured deltas
    #[arg(long)]
    pub raw: bool,

    /// Hand completed responses to the speech engine
    #[arg(long)]
    pub voice: bool,

    /// Dark terminal theme
    #[arg(long)]
    pub dark: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Display current configuration
    Config,

    /// Restore default configuration and save it
    Reset,
}

impl Args {
    /// Overlay CLI flags onto loaded settings
    pub fn apply(&self, config: &mut Config) {
        if let Some(base_url) = &self.base_url {
            config.api_base_url = base_url.clone();
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(system_prompt) = &self.system_prompt {
            config.system_prompt = system_prompt.clone();
        }
        if let Some(max_tokens) = self.max_tokens {
            config.max_tokens = max_tokens;
        }
        if self.voice {
            config.response_mode = ResponseMode::Voice;
        }
        if self.dark {
            config.dark_theme = true;
        }
    }
}
