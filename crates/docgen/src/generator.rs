//! The document generator — one-shot, non-conversational.
//!
//! Renders graph state and project metadata into a deterministic prompt,
//! issues exactly one high-quality-tier model call with no tools bound,
//! and returns the generated markdown. It never mutates the snapshot and
//! never returns a half-written document: any upstream failure or empty
//! response surfaces as a typed error instead.

use std::sync::Arc;

use tracing::{debug, info};

use archloom_agent::{AgentRuntime, TurnRequest};
use archloom_core::document::DocumentType;
use archloom_core::error::GenerationError;
use archloom_core::graph::{GraphSnapshot, Project};
use archloom_core::tool::ToolRegistry;

use crate::templates::{DocumentTemplate, TemplateRegistry};

pub struct DocumentGenerator {
    runtime: AgentRuntime,
    templates: TemplateRegistry,
}

impl DocumentGenerator {
    /// Create a generator with the default template set.
    ///
    /// The runtime should be bound to the high-quality tier.
    pub fn new(runtime: AgentRuntime) -> Self {
        Self {
            runtime,
            templates: TemplateRegistry::with_defaults(),
        }
    }

    /// Create a generator with a custom template registry.
    pub fn with_templates(runtime: AgentRuntime, templates: TemplateRegistry) -> Self {
        Self { runtime, templates }
    }

    /// The registered template for a type, or an unsupported-type error.
    ///
    /// Exposed so callers can fail before touching stores or the model.
    pub fn template(&self, doc_type: DocumentType) -> Result<&DocumentTemplate, GenerationError> {
        self.templates
            .get(doc_type)
            .ok_or_else(|| GenerationError::UnsupportedDocumentType(doc_type.tag().into()))
    }

    /// Generate a document from the project's canvas.
    pub async fn generate(
        &self,
        doc_type: DocumentType,
        project: &Project,
        snapshot: &GraphSnapshot,
    ) -> Result<String, GenerationError> {
        let template = self.template(doc_type)?;

        let user_prompt = Self::compose_prompt(doc_type, project, snapshot)?;

        info!(
            project_id = %project.id,
            doc_type = %doc_type,
            nodes = snapshot.nodes.len(),
            edges = snapshot.edges.len(),
            "Generating document"
        );

        let outcome = self
            .runtime
            .run_turn(TurnRequest {
                project_id: project.id.clone(),
                system_prompt: template.system_prompt.to_string(),
                history: vec![],
                user_message: user_prompt,
                tools: Arc::new(ToolRegistry::new()),
            })
            .await
            .map_err(GenerationError::Upstream)?;

        if outcome.text.trim().is_empty() {
            return Err(GenerationError::EmptyDocument {
                doc_type: doc_type.tag().into(),
            });
        }

        debug!(
            project_id = %project.id,
            chars = outcome.text.len(),
            "Document generated"
        );

        Ok(outcome.text)
    }

    /// Compose the deterministic user prompt: project metadata plus the
    /// canonical, indentation-stable JSON of nodes and edges.
    fn compose_prompt(
        doc_type: DocumentType,
        project: &Project,
        snapshot: &GraphSnapshot,
    ) -> Result<String, GenerationError> {
        let nodes_str = serde_json::to_string_pretty(&snapshot.nodes)?;
        let edges_str = serde_json::to_string_pretty(&snapshot.edges)?;

        Ok(format!(
            "Generate a {} for Project: {}\nDescription: {}\n\nCanvas Nodes:\n{}\n\nCanvas Edges:\n{}\n",
            doc_type.tag(),
            project.name,
            project.description,
            nodes_str,
            edges_str,
        ))
    }
}
