//! The partner session — one project's conversational exchange surface.
//!
//! Construction binds the canvas capability set to a project id and a
//! balanced-tier runtime; after that, every `chat` call is one complete
//! turn. The session holds no cross-turn state and no lock — callers
//! serialize turns, and concurrent turns on the same project race only
//! at the storage layer.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use archloom_agent::{AgentRuntime, AgentStreamEvent, RuntimeSettings, TurnOutcome, TurnRequest};
use archloom_core::error::ProviderError;
use archloom_core::event::EventBus;
use archloom_core::graph::ProjectId;
use archloom_core::message::Message;
use archloom_core::provider::ModelTier;
use archloom_core::store::GraphStore;
use archloom_core::tool::ToolRegistry;
use archloom_providers::{ModelHandle, TierSelector};
use archloom_tools::canvas_registry;

use crate::prompts::PARTNER_SYSTEM_PROMPT;

/// One conversational exchange: either the whole turn at once, or a
/// channel of incremental events the caller drains (and may drop to
/// cancel).
pub enum ChatReply {
    Complete(TurnOutcome),
    Stream(mpsc::Receiver<AgentStreamEvent>),
}

pub struct PartnerSession {
    project_id: ProjectId,
    runtime: AgentRuntime,
    tools: Arc<ToolRegistry>,
}

impl PartnerSession {
    /// Bind a session to a project using the balanced tier.
    pub fn new(
        selector: &TierSelector,
        store: Arc<dyn GraphStore>,
        project_id: ProjectId,
        settings: RuntimeSettings,
        events: Arc<EventBus>,
    ) -> Self {
        Self::with_handle(
            selector.resolve(ModelTier::Balanced).clone(),
            store,
            project_id,
            settings,
            events,
        )
    }

    /// Bind a session to an explicit model handle (tests, embedding callers).
    pub fn with_handle(
        handle: ModelHandle,
        store: Arc<dyn GraphStore>,
        project_id: ProjectId,
        settings: RuntimeSettings,
        events: Arc<EventBus>,
    ) -> Self {
        let tools = Arc::new(canvas_registry(project_id.clone(), store));
        let runtime = AgentRuntime::new(handle, settings, events);

        Self {
            project_id,
            runtime,
            tools,
        }
    }

    /// Run one conversational turn.
    ///
    /// The conversation history is caller-owned; pass it in full each
    /// time and persist the returned transcript.
    pub async fn chat(
        &self,
        message: &str,
        history: Vec<Message>,
        streaming: bool,
    ) -> Result<ChatReply, ProviderError> {
        debug!(project_id = %self.project_id, streaming, "Partner chat turn");

        let request = TurnRequest {
            project_id: self.project_id.clone(),
            system_prompt: PARTNER_SYSTEM_PROMPT.to_string(),
            history,
            user_message: format!(
                "User is working on project {}. {}",
                self.project_id, message
            ),
            tools: self.tools.clone(),
        };

        if streaming {
            Ok(ChatReply::Stream(self.runtime.stream_turn(request)))
        } else {
            Ok(ChatReply::Complete(self.runtime.run_turn(request).await?))
        }
    }

    /// The project this session is bound to.
    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }
}
