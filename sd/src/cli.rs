//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// Slotdesk - conversational scheduling assistant
#[derive(Parser)]
#[command(
    name = "sd",
    about = "Conversational scheduling assistant backed by Gemini",
    version,
    after_help = after_help()
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute (default: chat)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Talk to the scheduling assistant
    Chat {
        /// First message sent on the customer's behalf
        #[arg(short, long)]
        greeting: Option<String>,
    },

    /// Look up the first free slot for a day without the assistant
    Lookup {
        /// Weekday name, e.g. monday
        day: String,
    },

    /// Print the availability table
    Schedule,
}

impl Default for Command {
    fn default() -> Self {
        Command::Chat { greeting: None }
    }
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("slotdesk")
        .join("logs")
        .join("slotdesk.log")
}

fn after_help() -> String {
    format!(
        "Config is read from --config, ./config.toml, ./.slotdesk.yml or the user config directory.\nLogs are written to: {}",
        get_log_path().display()
    )
}
