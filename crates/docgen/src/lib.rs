//! Document generation pipeline for Archloom.
//!
//! Turns a project's canvas into a formal markdown artifact in one
//! non-conversational, no-tools model call on the high-quality tier:
//!
//! 1. Look up the document type's registered template
//! 2. Serialize nodes/edges as canonical JSON and compose the prompt
//! 3. Issue exactly one model call
//! 4. Hand the markdown back for the caller to persist

pub mod generator;
pub mod service;
pub mod templates;

pub use generator::DocumentGenerator;
pub use service::DocumentService;
pub use templates::{DocumentTemplate, TemplateRegistry};
