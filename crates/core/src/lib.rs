//! # Archloom Core
//!
//! Domain types, traits, and error definitions for the Archloom agent
//! orchestration layer. This crate has **zero framework dependencies** —
//! it defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every seam is a trait here: LLM backends (`Provider`), agent
//! capabilities (`Tool`), and the external stores (`GraphStore`,
//! `ProjectStore`). Implementations live in their respective crates,
//! which keeps the dependency graph pointing inward and makes every
//! piece testable with scripted stand-ins.

pub mod document;
pub mod error;
pub mod event;
pub mod graph;
pub mod message;
pub mod provider;
pub mod store;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use document::{DocumentType, GeneratedDocument};
pub use error::{Error, GenerationError, ProviderError, Result, StoreError, ToolError};
pub use event::{DomainEvent, EventBus};
pub use graph::{GraphSnapshot, Project, ProjectId};
pub use message::{Message, MessageToolCall, Role};
pub use provider::{ModelTier, Provider, ProviderRequest, ProviderResponse, StreamChunk, Usage};
pub use store::{GraphStore, InMemoryGraphStore, InMemoryProjectStore, ProjectStore};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult};
