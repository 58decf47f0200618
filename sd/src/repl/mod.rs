//! Interactive scheduling conversation
//!
//! Wires the configured agent to the terminal and runs the conversation
//! driver until the customer leaves or a turn fails.

mod input;
mod printer;
mod session;

pub use input::{LineSource, RustylineSource};
pub use printer::ConsolePrinter;
pub use session::{ConversationDriver, DriverState, FAREWELL, INPUT_PROMPT, SessionEnd};

use std::io;
use std::sync::Arc;

use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};

use crate::agent::{Agent, AgentOptions, BootstrapError};
use crate::config::Config;
use crate::llm::create_client;
use crate::prompts::{PromptContext, PromptLoader};
use crate::schedule::SlotResolver;
use crate::tools::ToolExecutor;
use crate::tools::builtin::NextSlotTool;

/// Build the agent described by `config`
///
/// The system prompt override is looked up under the current directory.
pub fn build_agent(config: &Config) -> Result<Agent> {
    debug!("build_agent: called");
    config.validate().context("Invalid configuration")?;

    let store = Arc::new(config.availability().context("Invalid configuration")?);
    let llm = create_client(config).map_err(BootstrapError::from)?;
    let resolver = SlotResolver::new(store.clone());

    let days = store.days().into_iter().map(str::to_string).collect();
    let context = PromptContext::new(NextSlotTool::NAME, days);

    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let system_prompt = PromptLoader::new(cwd)
        .scheduler_prompt(&context)
        .map_err(BootstrapError::from)?;

    let agent = Agent::bootstrap(
        llm,
        system_prompt,
        ToolExecutor::standard(resolver),
        AgentOptions {
            max_steps: config.assistant.max_steps,
            max_tokens: config.gemini.max_tokens,
        },
    )?;
    Ok(agent)
}

/// Run the interactive assistant
///
/// This is the main entry point for `sd chat`.
pub async fn run_interactive(config: &Config, greeting: Option<String>) -> Result<SessionEnd> {
    let agent = build_agent(config)?;
    let greeting = greeting.unwrap_or_else(|| config.assistant.greeting.clone());
    info!(session_id = %agent.session_id(), "Starting conversation");

    println!("{}", "--- Scheduling Assistant (powered by Gemini) ---".bright_cyan().bold());

    let mut driver = ConversationDriver::new(agent, RustylineSource::new()?, io::stdout(), io::stderr(), greeting)
        .with_exit_keyword(config.assistant.exit_keyword.clone());
    driver.run().await
}
