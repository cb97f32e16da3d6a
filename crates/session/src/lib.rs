//! Partner session for Archloom.
//!
//! Binds a project's canvas to the agent runtime: the canvas capability
//! set is registered once at construction, closed over the project id,
//! and every `chat` call is one complete conversational turn — whole or
//! streamed. The serving layer in front of this crate owns history
//! persistence and turn serialization.

pub mod partner;
pub mod prompts;

pub use partner::{ChatReply, PartnerSession};
pub use prompts::PARTNER_SYSTEM_PROMPT;
