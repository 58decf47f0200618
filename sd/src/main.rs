//! Slotdesk - conversational scheduling assistant
//!
//! CLI entry point.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};

use slotdesk::cli::{Cli, Command, get_log_path};
use slotdesk::config::Config;
use slotdesk::repl::{self, SessionEnd};
use slotdesk::schedule::{AvailabilityStore, SlotResolver};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Logging isn't initialized yet, so nothing here can be traced
    let log_path = get_log_path();
    let log_dir = log_path.parent().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(provider = %config.provider, model = %config.gemini.model, "Slotdesk loaded config");

    let command = cli.command.unwrap_or_default();
    debug!(?command, "main: dispatching command");
    match command {
        Command::Chat { greeting } => cmd_chat(&config, greeting).await,
        Command::Lookup { day } => cmd_lookup(&config, &day),
        Command::Schedule => cmd_schedule(&config),
    }
}

async fn cmd_chat(config: &Config, greeting: Option<String>) -> Result<ExitCode> {
    debug!(?greeting, "cmd_chat: called");
    match repl::run_interactive(config, greeting).await? {
        SessionEnd::UserExit => Ok(ExitCode::SUCCESS),
        SessionEnd::AgentFailed => Ok(ExitCode::FAILURE),
    }
}

fn cmd_lookup(config: &Config, day: &str) -> Result<ExitCode> {
    debug!(%day, "cmd_lookup: called");
    let store = config.availability().context("Invalid configuration")?;
    let resolution = SlotResolver::new(Arc::new(store)).resolve(day);
    info!(day = %resolution.day(), ?resolution, "cmd_lookup: resolved");

    println!("{}", resolution);
    Ok(ExitCode::SUCCESS)
}

fn cmd_schedule(config: &Config) -> Result<ExitCode> {
    debug!("cmd_schedule: called");
    let store = config.availability().context("Invalid configuration")?;
    print!("{}", render_schedule(&store));
    Ok(ExitCode::SUCCESS)
}

fn render_schedule(store: &AvailabilityStore) -> String {
    let width = store.days().iter().map(|d| d.chars().count()).max().unwrap_or(0);
    let mut out = String::new();

    for day in store.days() {
        let slots = store.slots_for(day).unwrap_or_default();
        let entries: Vec<String> = slots
            .iter()
            .map(|slot| {
                if slot.is_free() {
                    slot.to_string().green().to_string()
                } else {
                    slot.to_string().dimmed().to_string()
                }
            })
            .collect();
        let entries = if entries.is_empty() {
            "(no slots)".dimmed().to_string()
        } else {
            entries.join(", ")
        };
        out.push_str(&format!("{:width$}  {}\n", day.bold(), entries, width = width));
    }

    out
}
