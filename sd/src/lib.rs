//! Slotdesk - conversational scheduling assistant
//!
//! A console assistant that asks the customer for a weekday and answers with
//! the first free appointment slot, using Gemini function calling to look the
//! slot up in an availability table.
//!
//! # Modules
//!
//! - [`schedule`] - Availability table and slot resolution
//! - [`tools`] - Tools the model may call (`get_next_time`)
//! - [`llm`] - LLM client trait and Gemini implementation
//! - [`agent`] - Multi-step model/tool loop for a conversation
//! - [`repl`] - Conversation driver and console rendering
//! - [`prompts`] - System prompt templates
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod agent;
pub mod cli;
pub mod config;
pub mod llm;
pub mod prompts;
pub mod repl;
pub mod schedule;
pub mod tools;

pub use agent::{Agent, AgentOptions, BootstrapError, Conversation, TurnError, TurnEvents, TurnOutcome};
pub use config::{Config, ConfigError};
pub use llm::{LlmClient, LlmError};
pub use schedule::{AvailabilityStore, Resolution, SlotEntry, SlotResolver};
