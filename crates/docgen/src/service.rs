//! The `generate_document` entry point.
//!
//! Resolves the project and its canvas from the external stores, runs the
//! generator, and wraps the output as a `GeneratedDocument` for the caller
//! to persist. Caller-input errors (unknown type tag, missing project or
//! canvas) are reported before any model call is attempted.

use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use archloom_core::document::{DocumentType, GeneratedDocument};
use archloom_core::error::{Error, GenerationError, StoreError};
use archloom_core::event::{DomainEvent, EventBus};
use archloom_core::graph::ProjectId;
use archloom_core::store::{GraphStore, ProjectStore};

use crate::generator::DocumentGenerator;

/// First version assigned to a freshly generated document.
const INITIAL_VERSION: &str = "1.0";

pub struct DocumentService {
    projects: Arc<dyn ProjectStore>,
    graphs: Arc<dyn GraphStore>,
    generator: DocumentGenerator,
    events: Arc<EventBus>,
}

impl DocumentService {
    pub fn new(
        projects: Arc<dyn ProjectStore>,
        graphs: Arc<dyn GraphStore>,
        generator: DocumentGenerator,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            projects,
            graphs,
            generator,
            events,
        }
    }

    /// Generate a document of the given type for a project.
    ///
    /// The returned document is not persisted here — that's the document
    /// store's job, and it only ever sees complete content.
    pub async fn generate_document(
        &self,
        project_id: &ProjectId,
        type_tag: &str,
    ) -> Result<GeneratedDocument, Error> {
        let doc_type = DocumentType::from_str(type_tag)
            .map_err(GenerationError::UnsupportedDocumentType)?;

        // Fail on an unregistered template before touching stores.
        self.generator.template(doc_type)?;

        let project = self
            .projects
            .get_project(project_id)
            .await?
            .ok_or_else(|| StoreError::ProjectNotFound(project_id.to_string()))?;

        let snapshot = self
            .graphs
            .get_graph_snapshot(project_id)
            .await?
            .ok_or_else(|| StoreError::GraphNotFound(project_id.to_string()))?;

        let content = self.generator.generate(doc_type, &project, &snapshot).await?;

        self.events.publish(DomainEvent::DocumentGenerated {
            project_id: project_id.to_string(),
            doc_type: doc_type.tag().into(),
            timestamp: chrono::Utc::now(),
        });

        info!(project_id = %project_id, doc_type = %doc_type, "Document ready for persistence");

        Ok(GeneratedDocument {
            title: format!("{} - {}", doc_type.tag(), project.name),
            doc_type,
            content,
            version: INITIAL_VERSION.into(),
            project_id: project_id.clone(),
        })
    }
}
