//! Agent - multi-step model/tool loop for one conversation

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::llm::{CompletionRequest, CompletionResponse, ContentBlock, LlmClient, Message, StreamChunk, TokenUsage};
use crate::tools::{ToolContext, ToolExecutor};

use super::{BootstrapError, StepResult, TurnError, TurnEvents, TurnOutcome};

/// Capacity of the chunk channel between client and agent
const CHUNK_BUFFER: usize = 100;

/// Something that can take a turn of conversation
///
/// The REPL driver only talks to this trait.
#[async_trait]
pub trait Conversation: Send {
    /// Submit one prompt and run it to completion, reporting events as they happen
    async fn submit_turn(&mut self, prompt: &str, events: &mut dyn TurnEvents) -> Result<TurnOutcome, TurnError>;
}

/// Tunables for an agent
#[derive(Debug, Clone, Copy)]
pub struct AgentOptions {
    /// Maximum model round-trips per turn
    pub max_steps: usize,
    /// Maximum tokens per model response
    pub max_tokens: u32,
}

impl Default for AgentOptions {
    fn default() -> Self {
        Self {
            max_steps: 8,
            max_tokens: 8192,
        }
    }
}

/// Conversational agent backed by an LLM client and a tool registry
///
/// Keeps the conversation history across turns. A failed turn leaves the
/// history as it was before the turn.
pub struct Agent {
    llm: Arc<dyn LlmClient>,
    executor: ToolExecutor,
    system_prompt: String,
    history: Vec<Message>,
    options: AgentOptions,
    session_id: String,
    turn: usize,
}

impl Agent {
    /// Set up an agent with its system prompt and tools
    pub fn bootstrap(
        llm: Arc<dyn LlmClient>,
        system_prompt: impl Into<String>,
        executor: ToolExecutor,
        options: AgentOptions,
    ) -> Result<Self, BootstrapError> {
        let system_prompt = system_prompt.into();
        debug!(model = %llm.model(), tools = ?executor.tool_names(), ?options, "Agent::bootstrap: called");

        if system_prompt.trim().is_empty() {
            return Err(BootstrapError::EmptySystemPrompt);
        }
        if executor.tool_names().is_empty() {
            return Err(BootstrapError::NoTools);
        }

        let session_id = Uuid::now_v7().to_string();
        info!(%session_id, model = %llm.model(), "Agent bootstrapped");

        Ok(Self {
            llm,
            executor,
            system_prompt,
            history: Vec::new(),
            options: AgentOptions {
                max_steps: options.max_steps.max(1),
                ..options
            },
            session_id,
            turn: 0,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Number of turns submitted so far
    pub fn turn(&self) -> usize {
        self.turn
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Run one turn: append the prompt and step until the model stops asking for tools
    pub async fn submit_turn(&mut self, prompt: &str, events: &mut dyn TurnEvents) -> Result<TurnOutcome, TurnError> {
        self.turn += 1;
        debug!(turn = self.turn, prompt_len = prompt.len(), "Agent::submit_turn: called");

        let checkpoint = self.history.len();
        self.history.push(Message::user(prompt));

        match self.run_steps(events).await {
            Ok(outcome) => {
                info!(
                    turn = self.turn,
                    steps = outcome.steps.len(),
                    finish_reason = %outcome.finish_reason,
                    total_tokens = outcome.usage.total(),
                    "Turn completed"
                );
                Ok(outcome)
            }
            Err(e) => {
                warn!(turn = self.turn, error = %e, "Turn failed, rolling back history");
                self.history.truncate(checkpoint);
                Err(e)
            }
        }
    }

    async fn run_steps(&mut self, events: &mut dyn TurnEvents) -> Result<TurnOutcome, TurnError> {
        let ctx = ToolContext::new(self.session_id.clone(), self.turn);
        let mut steps = Vec::new();
        let mut usage = TokenUsage::default();
        let mut text = String::new();

        for step in 1..=self.options.max_steps {
            debug!(step, "Agent::run_steps: starting step");
            let response = self.stream_step(events).await?;
            usage.add(&response.usage);
            if let Some(ref content) = response.content {
                text.push_str(content);
            }

            let result = StepResult {
                step,
                stop_reason: response.stop_reason.clone(),
                text: response.content.clone(),
                tool_calls: response.tool_calls.clone(),
                usage: response.usage,
            };

            // Requested calls run whatever the stop reason; MAX_TOKENS can follow a complete call
            if !response.tool_calls.is_empty() {
                let mut blocks = Vec::with_capacity(response.tool_calls.len() + 1);
                if let Some(ref content) = response.content {
                    blocks.push(ContentBlock::text(content));
                }
                blocks.extend(response.tool_calls.iter().map(ContentBlock::tool_use));
                self.history.push(Message::assistant_blocks(blocks));

                let mut result_blocks = Vec::with_capacity(response.tool_calls.len());
                for call in &response.tool_calls {
                    let tool_result = self.executor.execute(call, &ctx).await;
                    debug!(id = %call.id, is_error = tool_result.is_error, "Agent::run_steps: tool executed");
                    events.on_tool_result(call, &tool_result)?;
                    result_blocks.push(ContentBlock::tool_result(call, tool_result.content(), tool_result.is_error));
                }
                self.history.push(Message::user_blocks(result_blocks));

                events.on_step_finish(&result)?;
                steps.push(result);
                continue;
            }

            if let Some(ref content) = response.content {
                self.history.push(Message::assistant(content));
            }
            events.on_step_finish(&result)?;
            steps.push(result);

            return Ok(TurnOutcome {
                finish_reason: response.stop_reason,
                steps,
                usage,
                text,
            });
        }

        Err(TurnError::StepLimit {
            max_steps: self.options.max_steps,
        })
    }

    /// Stream one completion, dispatching chunks to `events` while it is in flight
    ///
    /// A handler error returns immediately, dropping the in-flight request.
    async fn stream_step(&self, events: &mut dyn TurnEvents) -> Result<CompletionResponse, TurnError> {
        let request = CompletionRequest {
            system_prompt: self.system_prompt.clone(),
            messages: self.history.clone(),
            tools: self.executor.definitions(),
            max_tokens: self.options.max_tokens,
        };

        let (tx, mut rx) = mpsc::channel::<StreamChunk>(CHUNK_BUFFER);
        let call = self.llm.stream(request, tx);
        tokio::pin!(call);

        let response = loop {
            tokio::select! {
                biased;
                Some(chunk) = rx.recv() => dispatch(chunk, events)?,
                result = &mut call => break result?,
            }
        };

        while let Ok(chunk) = rx.try_recv() {
            dispatch(chunk, events)?;
        }

        Ok(response)
    }
}

fn dispatch(chunk: StreamChunk, events: &mut dyn TurnEvents) -> Result<(), TurnError> {
    match chunk {
        StreamChunk::TextDelta(text) => events.on_text_delta(&text)?,
        StreamChunk::ToolUseStart { id, name } => {
            debug!(%id, %name, "dispatch: tool call starting");
        }
        StreamChunk::ToolUseEnd { call } => events.on_tool_call(&call)?,
        StreamChunk::MessageDone { stop_reason, usage } => {
            debug!(%stop_reason, total_tokens = usage.total(), "dispatch: message done");
        }
        StreamChunk::Error(message) => {
            debug!(%message, "dispatch: stream error");
        }
    }
    Ok(())
}

#[async_trait]
impl Conversation for Agent {
    async fn submit_turn(&mut self, prompt: &str, events: &mut dyn TurnEvents) -> Result<TurnOutcome, TurnError> {
        Agent::submit_turn(self, prompt, events).await
    }
}
