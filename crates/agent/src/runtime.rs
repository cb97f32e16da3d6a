//! The agent turn runtime.
//!
//! One conversational turn is a small state machine:
//!
//! ```text
//! Idle → AwaitingModel → (ToolRequested → ExecutingTool → AwaitingModel)* → Complete
//! ```
//!
//! The runtime holds no per-call state — system prompt, history, user
//! message, and tool set arrive as explicit parameters on every
//! invocation, so the same runtime serves any number of sessions without
//! configuration drift. Tool calls execute strictly in the order the
//! model requested them, and their results are fed back in that same
//! order on the next round.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use archloom_config::AppConfig;
use archloom_core::error::ProviderError;
use archloom_core::event::{DomainEvent, EventBus};
use archloom_core::graph::ProjectId;
use archloom_core::message::{Message, MessageToolCall};
use archloom_core::provider::{ProviderRequest, ProviderResponse, Usage};
use archloom_core::tool::{ToolCall, ToolRegistry};
use archloom_providers::ModelHandle;

use crate::stream_event::AgentStreamEvent;

/// Text appended when a turn ends because the tool-call round cap was hit.
const LOOP_EXCEEDED_MARKER: &str = "[tool-call round limit reached — response may be incomplete]";

/// How a turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    /// The model produced a final text response.
    Complete,
    /// The tool-call round cap was hit; the text is best-effort partial.
    ToolLoopExceeded,
}

/// Everything one turn needs, passed explicitly on every invocation.
pub struct TurnRequest {
    /// Which project this turn is about (observability only).
    pub project_id: ProjectId,

    /// The system prompt for this turn.
    pub system_prompt: String,

    /// Prior conversation messages, caller-owned.
    pub history: Vec<Message>,

    /// The new user message.
    pub user_message: String,

    /// The capability set bound for this turn. Empty for one-shot
    /// generation calls.
    pub tools: Arc<ToolRegistry>,
}

/// The result of a completed (non-streaming) turn.
#[derive(Debug)]
pub struct TurnOutcome {
    /// The assistant's final text (partial if the loop cap was hit).
    pub text: String,

    /// How the turn ended.
    pub status: TurnStatus,

    /// Number of model calls made.
    pub iterations: u32,

    /// Number of tool calls executed.
    pub tool_calls_made: usize,

    /// Messages produced during the turn, in order (assistant tool-call
    /// messages, tool results, final assistant text). The caller owns
    /// persistence.
    pub transcript: Vec<Message>,

    /// Accumulated token usage across all model calls in the turn.
    pub usage: Option<Usage>,
}

/// Runtime knobs, resolved once from configuration.
#[derive(Debug, Clone)]
pub struct RuntimeSettings {
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    /// Maximum model-call rounds per turn.
    pub max_tool_rounds: u32,
    /// Bounded timeout applied to every upstream call.
    pub request_timeout: Duration,
}

impl RuntimeSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            temperature: config.default_temperature,
            max_tokens: Some(config.default_max_tokens),
            max_tool_rounds: config.agent.max_tool_rounds,
            request_timeout: Duration::from_secs(config.agent.request_timeout_secs),
        }
    }
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: None,
            max_tool_rounds: 8,
            request_timeout: Duration::from_secs(120),
        }
    }
}

/// A tool call that has been executed, with its textual result.
struct ExecutedTool {
    call: MessageToolCall,
    success: bool,
    output: String,
}

/// Drives one conversational turn against a resolved model handle.
#[derive(Clone)]
pub struct AgentRuntime {
    handle: ModelHandle,
    settings: RuntimeSettings,
    events: Arc<EventBus>,
}

impl AgentRuntime {
    pub fn new(handle: ModelHandle, settings: RuntimeSettings, events: Arc<EventBus>) -> Self {
        Self {
            handle,
            settings,
            events,
        }
    }

    /// Override the tool-call round cap.
    pub fn with_max_tool_rounds(mut self, max: u32) -> Self {
        self.settings.max_tool_rounds = max.max(1);
        self
    }

    /// Override the per-call upstream timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.settings.request_timeout = timeout;
        self
    }

    /// Run one non-streaming turn to completion.
    pub async fn run_turn(&self, req: TurnRequest) -> Result<TurnOutcome, ProviderError> {
        info!(
            project_id = %req.project_id,
            history = req.history.len(),
            tools = req.tools.names().len(),
            "Running turn"
        );

        let mut messages = self.compose_messages(&req);
        let tool_definitions = req.tools.definitions();

        let mut transcript: Vec<Message> = Vec::new();
        let mut tool_calls_made = 0usize;
        let mut usage: Option<Usage> = None;
        let mut partial_text = String::new();

        for round in 1..=self.settings.max_tool_rounds {
            debug!(project_id = %req.project_id, round, "Awaiting model");

            let request = ProviderRequest {
                model: self.handle.model.clone(),
                messages: messages.clone(),
                temperature: self.settings.temperature,
                max_tokens: self.settings.max_tokens,
                tools: tool_definitions.clone(),
                stream: false,
            };

            let response = self.call_model(request).await?;
            self.record_response(&req.project_id, &response, &mut usage);

            if response.message.tool_calls.is_empty() {
                // Complete: no further tool calls.
                let text = response.message.content.clone();
                transcript.push(response.message);

                return Ok(TurnOutcome {
                    text,
                    status: TurnStatus::Complete,
                    iterations: round,
                    tool_calls_made,
                    transcript,
                    usage,
                });
            }

            // ToolRequested → ExecutingTool
            if !response.message.content.is_empty() {
                if !partial_text.is_empty() {
                    partial_text.push('\n');
                }
                partial_text.push_str(&response.message.content);
            }

            let calls = response.message.tool_calls.clone();
            transcript.push(response.message.clone());
            messages.push(response.message);

            for executed in self.execute_tools(&req.tools, &calls).await {
                let result_msg = Message::tool_result(&executed.call.id, &executed.output);
                transcript.push(result_msg.clone());
                messages.push(result_msg);
                tool_calls_made += 1;
            }
            // Loop back to AwaitingModel with the results appended.
        }

        // Round cap hit: end the turn with whatever text accumulated.
        warn!(
            project_id = %req.project_id,
            rounds = self.settings.max_tool_rounds,
            "Tool-call round cap reached, ending turn early"
        );
        self.events.publish(DomainEvent::ToolLoopExceeded {
            project_id: req.project_id.to_string(),
            rounds: self.settings.max_tool_rounds,
            timestamp: chrono::Utc::now(),
        });

        let text = if partial_text.is_empty() {
            LOOP_EXCEEDED_MARKER.to_string()
        } else {
            format!("{partial_text}\n\n{LOOP_EXCEEDED_MARKER}")
        };
        transcript.push(Message::assistant(&text));

        Ok(TurnOutcome {
            text,
            status: TurnStatus::ToolLoopExceeded,
            iterations: self.settings.max_tool_rounds,
            tool_calls_made,
            transcript,
            usage,
        })
    }

    /// Run one streaming turn.
    ///
    /// Returns immediately with a channel of [`AgentStreamEvent`]s. The
    /// final text is the concatenation of `Chunk` contents. Dropping the
    /// receiver cancels the turn cooperatively: the pump stops on its next
    /// send, which releases the upstream provider stream.
    pub fn stream_turn(&self, req: TurnRequest) -> mpsc::Receiver<AgentStreamEvent> {
        let (tx, rx) = mpsc::channel(64);
        let runtime = self.clone();

        tokio::spawn(async move {
            runtime.pump_stream(req, tx).await;
        });

        rx
    }

    async fn pump_stream(&self, req: TurnRequest, tx: mpsc::Sender<AgentStreamEvent>) {
        info!(
            project_id = %req.project_id,
            history = req.history.len(),
            "Running streaming turn"
        );

        let mut messages = self.compose_messages(&req);
        let tool_definitions = req.tools.definitions();

        let mut tool_calls_made = 0usize;
        let mut usage: Option<Usage> = None;

        for round in 1..=self.settings.max_tool_rounds {
            let request = ProviderRequest {
                model: self.handle.model.clone(),
                messages: messages.clone(),
                temperature: self.settings.temperature,
                max_tokens: self.settings.max_tokens,
                tools: tool_definitions.clone(),
                stream: true,
            };

            let mut chunk_rx = match tokio::time::timeout(
                self.settings.request_timeout,
                self.handle.provider.stream(request),
            )
            .await
            {
                Ok(Ok(rx)) => rx,
                Ok(Err(e)) => {
                    let _ = tx.send(stream_error(&e)).await;
                    return;
                }
                Err(_) => {
                    let _ = tx
                        .send(AgentStreamEvent::Error {
                            kind: "timeout".into(),
                            message: format!(
                                "model call exceeded {}s",
                                self.settings.request_timeout.as_secs()
                            ),
                        })
                        .await;
                    return;
                }
            };

            let mut round_text = String::new();
            let mut round_tool_calls: Vec<MessageToolCall> = Vec::new();

            loop {
                let item = match tokio::time::timeout(
                    self.settings.request_timeout,
                    chunk_rx.recv(),
                )
                .await
                {
                    Ok(item) => item,
                    Err(_) => {
                        let _ = tx
                            .send(AgentStreamEvent::Error {
                                kind: "timeout".into(),
                                message: format!(
                                    "stream stalled for {}s",
                                    self.settings.request_timeout.as_secs()
                                ),
                            })
                            .await;
                        return;
                    }
                };

                match item {
                    None => break, // upstream closed without a done marker
                    Some(Err(e)) => {
                        let _ = tx.send(stream_error(&e)).await;
                        return;
                    }
                    Some(Ok(chunk)) => {
                        if let Some(content) = chunk.content {
                            if !content.is_empty() {
                                round_text.push_str(&content);
                                if tx
                                    .send(AgentStreamEvent::Chunk { content })
                                    .await
                                    .is_err()
                                {
                                    // Consumer disconnected — dropping
                                    // chunk_rx propagates the cancel upstream.
                                    debug!(project_id = %req.project_id, "Stream consumer gone, cancelling turn");
                                    return;
                                }
                            }
                        }
                        if let Some(u) = chunk.usage {
                            accumulate_usage(&mut usage, &u);
                        }
                        if chunk.done {
                            round_tool_calls = chunk.tool_calls;
                            break;
                        }
                    }
                }
            }

            if round_tool_calls.is_empty() {
                let _ = tx
                    .send(AgentStreamEvent::Done {
                        status: TurnStatus::Complete,
                        iterations: round,
                        tool_calls_made,
                        usage,
                    })
                    .await;
                return;
            }

            // Record the assistant message with its tool calls, then execute.
            let mut assistant = Message::assistant(&round_text);
            assistant.tool_calls = round_tool_calls.clone();
            messages.push(assistant);

            for executed in self.execute_tools(&req.tools, &round_tool_calls).await {
                let input: serde_json::Value =
                    serde_json::from_str(&executed.call.arguments).unwrap_or_default();
                if tx
                    .send(AgentStreamEvent::ToolCall {
                        id: executed.call.id.clone(),
                        name: executed.call.name.clone(),
                        input,
                    })
                    .await
                    .is_err()
                {
                    return;
                }
                if tx
                    .send(AgentStreamEvent::ToolResult {
                        id: executed.call.id.clone(),
                        name: executed.call.name.clone(),
                        output: executed.output.clone(),
                        success: executed.success,
                    })
                    .await
                    .is_err()
                {
                    return;
                }

                messages.push(Message::tool_result(&executed.call.id, &executed.output));
                tool_calls_made += 1;
            }
        }

        warn!(
            project_id = %req.project_id,
            rounds = self.settings.max_tool_rounds,
            "Tool-call round cap reached in streaming turn"
        );
        self.events.publish(DomainEvent::ToolLoopExceeded {
            project_id: req.project_id.to_string(),
            rounds: self.settings.max_tool_rounds,
            timestamp: chrono::Utc::now(),
        });

        if tx
            .send(AgentStreamEvent::Chunk {
                content: format!("\n\n{LOOP_EXCEEDED_MARKER}"),
            })
            .await
            .is_err()
        {
            return;
        }
        let _ = tx
            .send(AgentStreamEvent::Done {
                status: TurnStatus::ToolLoopExceeded,
                iterations: self.settings.max_tool_rounds,
                tool_calls_made,
                usage,
            })
            .await;
    }

    /// Compose the full message list: system + history + new user message.
    fn compose_messages(&self, req: &TurnRequest) -> Vec<Message> {
        let mut messages = Vec::with_capacity(req.history.len() + 2);
        messages.push(Message::system(&req.system_prompt));
        messages.extend(req.history.iter().cloned());
        messages.push(Message::user(&req.user_message));
        messages
    }

    /// Call the model with the configured bounded timeout.
    async fn call_model(
        &self,
        request: ProviderRequest,
    ) -> Result<ProviderResponse, ProviderError> {
        match tokio::time::timeout(
            self.settings.request_timeout,
            self.handle.provider.complete(request),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(format!(
                "model call exceeded {}s",
                self.settings.request_timeout.as_secs()
            ))),
        }
    }

    /// Execute requested tool calls strictly in request order.
    ///
    /// Every failure — unknown name included — is converted to
    /// descriptive text so the model can see it and recover; losing the
    /// turn over a tool error is worse than letting the model react.
    async fn execute_tools(
        &self,
        tools: &ToolRegistry,
        calls: &[MessageToolCall],
    ) -> Vec<ExecutedTool> {
        let mut executed = Vec::with_capacity(calls.len());

        for tc in calls {
            let call = ToolCall {
                id: tc.id.clone(),
                name: tc.name.clone(),
                arguments: serde_json::from_str(&tc.arguments).unwrap_or_default(),
            };

            let start = std::time::Instant::now();
            let result = tools.execute(&call).await;
            let duration_ms = start.elapsed().as_millis() as u64;

            let (success, output) = match result {
                Ok(r) => (r.success, r.output),
                Err(e) => {
                    warn!(tool = %tc.name, error = %e, "Tool execution failed");
                    (false, format!("Error: {e}"))
                }
            };

            self.events.publish(DomainEvent::ToolExecuted {
                tool_name: tc.name.clone(),
                success,
                duration_ms,
                timestamp: chrono::Utc::now(),
            });

            executed.push(ExecutedTool {
                call: tc.clone(),
                success,
                output,
            });
        }

        executed
    }

    fn record_response(
        &self,
        project_id: &ProjectId,
        response: &ProviderResponse,
        usage: &mut Option<Usage>,
    ) {
        if let Some(u) = &response.usage {
            accumulate_usage(usage, u);
            self.events.publish(DomainEvent::ResponseGenerated {
                project_id: project_id.to_string(),
                model: response.model.clone(),
                tokens_used: u.total_tokens,
                timestamp: chrono::Utc::now(),
            });
        }
    }
}

fn accumulate_usage(total: &mut Option<Usage>, u: &Usage) {
    match total {
        Some(t) => {
            t.prompt_tokens += u.prompt_tokens;
            t.completion_tokens += u.completion_tokens;
            t.total_tokens += u.total_tokens;
        }
        None => *total = Some(u.clone()),
    }
}

fn stream_error(e: &ProviderError) -> AgentStreamEvent {
    let kind = match e {
        ProviderError::Timeout(_) => "timeout",
        ProviderError::RateLimited { .. } => "rate_limited",
        ProviderError::AuthenticationFailed(_) => "auth",
        _ => "upstream",
    };
    AgentStreamEvent::Error {
        kind: kind.into(),
        message: e.to_string(),
    }
}
