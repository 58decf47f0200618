//! Conversation driver - the REPL state machine

use std::io::Write;

use colored::Colorize;
use eyre::Result;
use tracing::{debug, info, warn};

use crate::agent::Conversation;

use super::input::LineSource;
use super::printer::ConsolePrinter;

/// Prompt shown when waiting for the customer
pub const INPUT_PROMPT: &str = ">> Enter desired weekday (e.g. monday): ";

/// Printed when the customer ends the conversation
pub const FAREWELL: &str = "Conversation ended by user.";

const SEPARATOR: &str = "----------------------------------------------------";

/// Where the driver is in the conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverState {
    /// A message is ready to be sent to the agent
    AwaitingAgentResponse(String),
    /// The agent answered; waiting for the next line
    AwaitingUserInput,
    Terminated,
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Exit keyword, blank line or closed input
    UserExit,
    /// A turn failed
    AgentFailed,
}

/// Alternates between agent turns and user input until one side ends it
pub struct ConversationDriver<C, L, W, E>
where
    C: Conversation,
    L: LineSource,
    W: Write + Send,
    E: Write,
{
    conversation: C,
    input: L,
    out: W,
    err: E,
    exit_keyword: String,
    state: DriverState,
}

impl<C, L, W, E> ConversationDriver<C, L, W, E>
where
    C: Conversation,
    L: LineSource,
    W: Write + Send,
    E: Write,
{
    /// Create a driver whose first message is `greeting`
    pub fn new(conversation: C, input: L, out: W, err: E, greeting: impl Into<String>) -> Self {
        let greeting = greeting.into();
        debug!(%greeting, "ConversationDriver::new: called");
        Self {
            conversation,
            input,
            out,
            err,
            exit_keyword: "exit".to_string(),
            state: DriverState::AwaitingAgentResponse(greeting),
        }
    }

    /// Input that ends the conversation (compared exactly, after trimming)
    pub fn with_exit_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.exit_keyword = keyword.into().trim().to_string();
        self
    }

    pub fn state(&self) -> &DriverState {
        &self.state
    }

    /// Run until the conversation terminates
    pub async fn run(&mut self) -> Result<SessionEnd> {
        debug!("ConversationDriver::run: called");
        let mut end = SessionEnd::UserExit;

        loop {
            match std::mem::replace(&mut self.state, DriverState::Terminated) {
                DriverState::AwaitingAgentResponse(message) => {
                    end = self.respond(&message).await?;
                }
                DriverState::AwaitingUserInput => {
                    self.read_input()?;
                }
                DriverState::Terminated => {
                    info!(?end, "Conversation terminated");
                    return Ok(end);
                }
            }
        }
    }

    async fn respond(&mut self, message: &str) -> Result<SessionEnd> {
        debug!(message_len = message.len(), "ConversationDriver::respond: called");
        writeln!(self.out, "{}", "Generating...".dimmed())?;

        let mut printer = ConsolePrinter::new(&mut self.out);
        match self.conversation.submit_turn(message, &mut printer).await {
            Ok(outcome) => {
                debug!(
                    finish_reason = %outcome.finish_reason,
                    steps = outcome.steps.len(),
                    tool_calls = outcome.tool_call_count(),
                    "ConversationDriver::respond: turn completed"
                );
                self.state = DriverState::AwaitingUserInput;
                Ok(SessionEnd::UserExit)
            }
            Err(e) => {
                warn!(error = %e, "ConversationDriver::respond: turn failed");
                writeln!(self.err, "\n{} {}", "Error generating response:".red(), e)?;
                self.state = DriverState::Terminated;
                Ok(SessionEnd::AgentFailed)
            }
        }
    }

    fn read_input(&mut self) -> Result<()> {
        writeln!(self.out, "\n{}", SEPARATOR)?;
        self.out.flush()?;

        let line = self.input.read_line(INPUT_PROMPT)?;
        match line.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() && text != self.exit_keyword => {
                debug!(%text, "ConversationDriver::read_input: got message");
                self.state = DriverState::AwaitingAgentResponse(text.to_string());
            }
            _ => {
                debug!("ConversationDriver::read_input: user ended conversation");
                writeln!(self.out, "\n{}", FAREWELL)?;
                self.state = DriverState::Terminated;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;

    use crate::agent::{TurnError, TurnEvents, TurnOutcome};
    use crate::llm::{LlmError, StopReason, TokenUsage};
    use crate::repl::input::scripted::ScriptedSource;

    /// Answers each prompt with the next scripted reply
    struct ScriptedConversation {
        replies: VecDeque<Result<String, String>>,
        prompts: Vec<String>,
    }

    impl ScriptedConversation {
        fn new(replies: Vec<Result<&str, &str>>) -> Self {
            Self {
                replies: replies
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
                prompts: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl Conversation for ScriptedConversation {
        async fn submit_turn(&mut self, prompt: &str, events: &mut dyn TurnEvents) -> Result<TurnOutcome, TurnError> {
            self.prompts.push(prompt.to_string());
            match self.replies.pop_front() {
                Some(Ok(text)) => {
                    events.on_text_delta(&text)?;
                    Ok(TurnOutcome {
                        finish_reason: StopReason::EndTurn,
                        steps: vec![],
                        usage: TokenUsage::default(),
                        text,
                    })
                }
                Some(Err(message)) => Err(TurnError::Llm(LlmError::InvalidResponse(message))),
                None => Err(TurnError::Llm(LlmError::InvalidResponse("no reply".to_string()))),
            }
        }
    }

    type Driver = ConversationDriver<ScriptedConversation, ScriptedSource, Vec<u8>, Vec<u8>>;

    fn driver(replies: Vec<Result<&str, &str>>, lines: &[&str]) -> Driver {
        ConversationDriver::new(
            ScriptedConversation::new(replies),
            ScriptedSource::new(lines),
            Vec::new(),
            Vec::new(),
            "Hello, I would like to schedule an appointment.",
        )
    }

    fn stdout(driver: &Driver) -> String {
        String::from_utf8(driver.out.clone()).unwrap()
    }

    fn stderr(driver: &Driver) -> String {
        String::from_utf8(driver.err.clone()).unwrap()
    }

    #[test]
    fn test_initial_state_holds_greeting() {
        let driver = driver(vec![], &[]);
        assert_eq!(
            driver.state(),
            &DriverState::AwaitingAgentResponse("Hello, I would like to schedule an appointment.".to_string())
        );
    }

    #[tokio::test]
    async fn test_greeting_then_user_turn_then_exit() {
        let mut driver = driver(vec![Ok("Which day?"), Ok("Monday at 10:00.")], &["monday", "exit"]);

        let end = driver.run().await.unwrap();

        assert_eq!(end, SessionEnd::UserExit);
        assert_eq!(driver.state(), &DriverState::Terminated);
        assert_eq!(
            driver.conversation.prompts,
            vec!["Hello, I would like to schedule an appointment.", "monday"]
        );
        assert_eq!(driver.input.prompts, vec![INPUT_PROMPT, INPUT_PROMPT]);

        let out = stdout(&driver);
        assert!(out.contains("Generating..."));
        assert!(out.contains("Which day?"));
        assert!(out.contains("Monday at 10:00."));
        assert!(out.contains(SEPARATOR));
        assert!(out.contains(FAREWELL));
    }

    #[tokio::test]
    async fn test_blank_line_terminates_without_agent_call() {
        let mut driver = driver(vec![Ok("Which day?")], &["   "]);

        let end = driver.run().await.unwrap();

        assert_eq!(end, SessionEnd::UserExit);
        assert_eq!(driver.conversation.prompts.len(), 1);
        assert!(stdout(&driver).contains(FAREWELL));
    }

    #[tokio::test]
    async fn test_exit_keyword_is_case_sensitive() {
        let mut driver = driver(vec![Ok("Which day?"), Ok("Sorry?")], &["Exit", "exit"]);

        driver.run().await.unwrap();

        assert_eq!(driver.conversation.prompts[1], "Exit");
        assert_eq!(driver.conversation.prompts.len(), 2);
    }

    #[tokio::test]
    async fn test_custom_exit_keyword() {
        let mut driver = driver(vec![Ok("Qual dia?")], &["sair"]).with_exit_keyword("sair");

        assert_eq!(driver.run().await.unwrap(), SessionEnd::UserExit);
        assert_eq!(driver.conversation.prompts.len(), 1);
    }

    #[tokio::test]
    async fn test_padded_exit_keyword_still_matches() {
        let mut driver = driver(vec![Ok("Qual dia?")], &["  sair"]).with_exit_keyword(" sair \n");

        assert_eq!(driver.run().await.unwrap(), SessionEnd::UserExit);
        assert_eq!(driver.conversation.prompts.len(), 1);
        assert_eq!(driver.state(), &DriverState::Terminated);
    }

    #[tokio::test]
    async fn test_input_is_trimmed() {
        let mut driver = driver(vec![Ok("Which day?"), Ok("Tuesday at 16:00.")], &["  tuesday \n"]);

        driver.run().await.unwrap();

        assert_eq!(driver.conversation.prompts[1], "tuesday");
    }

    #[tokio::test]
    async fn test_end_of_input_counts_as_exit() {
        let mut driver = driver(vec![Ok("Which day?")], &[]);

        assert_eq!(driver.run().await.unwrap(), SessionEnd::UserExit);
        assert!(stdout(&driver).contains(FAREWELL));
    }

    #[tokio::test]
    async fn test_turn_error_ends_without_prompting() {
        let mut driver = driver(vec![Err("model unavailable")], &["monday"]);

        let end = driver.run().await.unwrap();

        assert_eq!(end, SessionEnd::AgentFailed);
        assert!(driver.input.prompts.is_empty());
        assert!(!stdout(&driver).contains(FAREWELL));

        let err = stderr(&driver);
        assert!(err.contains("Error generating response:"));
        assert!(err.contains("model unavailable"));
    }

    #[tokio::test]
    async fn test_later_turn_error_ends_session() {
        let mut driver = driver(vec![Ok("Which day?"), Err("quota exceeded")], &["friday", "monday"]);

        let end = driver.run().await.unwrap();

        assert_eq!(end, SessionEnd::AgentFailed);
        assert_eq!(driver.input.prompts.len(), 1);
        assert!(stderr(&driver).contains("quota exceeded"));
    }
}
