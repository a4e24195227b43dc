//! Command-line interface for advisor-scribe
//!
//! Running without a subcommand analyzes the configured meeting.

use clap::{Parser, Subcommand};

/// Post-meeting analysis for financial advisor conversations
#[derive(Parser, Debug)]
#[command(name = "advisor-scribe", version, about)]
pub struct Cli {
    /// Subcommand to execute (default: run)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The subcommand, with `run` when none was given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run)
    }
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the analysis pipeline on the configured transcript
    Run,

    /// Save an API key in the OS keychain
    StoreKey {
        /// Provider the key belongs to (openai, anthropic)
        provider: String,
        /// The API key
        key: String,
    },
}
