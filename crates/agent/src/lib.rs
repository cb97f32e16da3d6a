//! The Archloom agent runtime — one conversational turn at a time.
//!
//! Each turn follows the same cycle:
//!
//! 1. **Compose** the full prompt (system + history + new user message)
//! 2. **Send to the model** via the tier-resolved provider handle
//! 3. **If tool calls**: execute them in request order, append results,
//!    loop back to step 2
//! 4. **If text only**: the turn is complete
//!
//! The loop is bounded by a round cap; hitting it ends the turn with a
//! `ToolLoopExceeded` status and best-effort partial text. Streaming
//! turns emit the same lifecycle as `AgentStreamEvent`s over a
//! cancellable channel.

pub mod runtime;
pub mod stream_event;

pub use runtime::{AgentRuntime, RuntimeSettings, TurnOutcome, TurnRequest, TurnStatus};
pub use stream_event::AgentStreamEvent;
