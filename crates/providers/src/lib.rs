//! LLM provider implementations for Archloom.
//!
//! All providers implement the `archloom_core::Provider` trait. The tier
//! selector maps capability classes (fast / balanced / high-quality) to
//! concrete provider + model pairs at startup.

pub mod anthropic;
pub mod openai_compat;
pub mod selector;

pub use anthropic::AnthropicProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use selector::{build_selector, ModelHandle, TierSelector};
