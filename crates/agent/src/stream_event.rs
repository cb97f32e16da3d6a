//! Agent-level streaming events.
//!
//! `AgentStreamEvent` wraps provider-level stream chunks into higher-level
//! events that the serving layer can forward to clients over SSE or
//! WebSocket:
//! - `chunk`       — partial text token from the LLM
//! - `tool_call`   — the agent is invoking a tool
//! - `tool_result` — tool execution completed
//! - `done`        — the turn is complete (carries the turn status)
//! - `error`       — an error occurred mid-stream

use archloom_core::provider::Usage;
use serde::{Deserialize, Serialize};

use crate::runtime::TurnStatus;

/// Events emitted by the agent during streaming execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentStreamEvent {
    /// Partial text token from the LLM.
    Chunk { content: String },

    /// The agent is calling a tool.
    ToolCall {
        id: String,
        name: String,
        input: serde_json::Value,
    },

    /// Tool execution completed.
    ToolResult {
        id: String,
        name: String,
        output: String,
        success: bool,
    },

    /// The stream is complete — final metadata.
    Done {
        status: TurnStatus,
        iterations: u32,
        tool_calls_made: usize,
        usage: Option<Usage>,
    },

    /// An error occurred mid-stream. `kind` lets the caller decide retry
    /// policy without parsing the message.
    Error { kind: String, message: String },
}

impl AgentStreamEvent {
    /// SSE event name for this event type.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Chunk { .. } => "chunk",
            Self::ToolCall { .. } => "tool_call",
            Self::ToolResult { .. } => "tool_result",
            Self::Done { .. } => "done",
            Self::Error { .. } => "error",
        }
    }
}
