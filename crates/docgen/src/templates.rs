//! Per-type document templates.
//!
//! Each document type maps to a system prompt that fixes the structural
//! sections of the generated artifact. Adding a document type is a
//! registration here, not a branch in the generator.

use std::collections::HashMap;

use archloom_core::document::DocumentType;

/// Technical Implementation Specification.
pub const TIS_SYSTEM_PROMPT: &str = "\
You are an expert Technical Architect and Software Engineer.
Your goal is to generate a comprehensive Technical Implementation Specification (TIS) based on a provided Canvas Architecture and Project Description.

The TIS should be detailed, actionable, and suitable for a senior developer to implement.

Structure of the TIS:
1.  **Project Overview**: Brief summary.
2.  **Architecture Diagram**: Description of the flow based on the canvas.
3.  **Component Specifications**:
    *   Frontend Components
    *   Backend Services/Endpoints
    *   Database Schema (suggested based on nodes)
4.  **Integration Points**: API contracts, external services.
5.  **Security Considerations**.
6.  **Implementation Phases**.

Input Data:
- Project Name and Description.
- Canvas Nodes (JSON structure).
- Canvas Edges (JSON structure).

Output Format: Markdown.
";

/// Product Requirements Document.
pub const PRD_SYSTEM_PROMPT: &str = "\
You are an expert Product Manager.
Your goal is to generate a Product Requirements Document (PRD) based on a provided Canvas Architecture.

The PRD should focus on user value, features, and acceptance criteria.

Structure:
1.  **Problem Statement**.
2.  **Target Audience**.
3.  **User Stories & Features**.
4.  **Acceptance Criteria**.
5.  **Non-Functional Requirements**.

Output Format: Markdown.
";

/// High-level architecture document.
pub const ARCHITECTURE_SYSTEM_PROMPT: &str = "\
You are an expert Systems Architect.
Your goal is to generate an Architecture Document based on a provided Canvas Architecture and Project Description.

The document should explain the system at a level useful to both engineers and technical stakeholders.

Structure:
1.  **System Context**: What the system is and what surrounds it.
2.  **Component Breakdown**: Responsibilities of each canvas node.
3.  **Data Flow**: How information moves along the canvas edges.
4.  **Technology Choices**: Suggested stacks with rationale.
5.  **Scalability & Reliability**.
6.  **Risks & Open Questions**.

Output Format: Markdown.
";

/// Specification for a conversational/autonomous agent.
pub const AGENT_SPEC_SYSTEM_PROMPT: &str = "\
You are an expert AI Systems Designer.
Your goal is to generate an Agent Specification based on a provided Canvas Architecture describing an agent or automation.

The specification should be concrete enough to implement the agent directly.

Structure:
1.  **Agent Role & Goal**.
2.  **Capabilities & Tools**: Each tool with inputs and outputs.
3.  **Conversation Flows**: Typical exchanges, derived from the canvas.
4.  **Guardrails & Escalation**: What the agent must never do alone.
5.  **Evaluation Criteria**.

Output Format: Markdown.
";

/// Specification for an automation flow.
pub const FLOW_SPEC_SYSTEM_PROMPT: &str = "\
You are an expert Automation Engineer.
Your goal is to generate a Flow Specification based on a provided Canvas Architecture describing an automation flow.

Structure:
1.  **Flow Overview**.
2.  **Trigger Conditions**.
3.  **Step-by-Step Flow**: One entry per canvas node, in execution order.
4.  **Branching & Error Paths**.
5.  **Data Contracts**: Payloads passed along edges.
6.  **Monitoring & Alerting**.

Output Format: Markdown.
";

/// A registered document template.
#[derive(Debug, Clone)]
pub struct DocumentTemplate {
    pub doc_type: DocumentType,
    /// The system prompt fixing the artifact's structure.
    pub system_prompt: &'static str,
}

/// The closed set of registered templates, keyed by document type.
pub struct TemplateRegistry {
    templates: HashMap<DocumentType, DocumentTemplate>,
}

impl TemplateRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// The default registry with all built-in document types.
    ///
    /// `DocumentType::Other` deliberately has no template — requesting it
    /// is an unsupported-type error, not a generic fallback.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(DocumentTemplate {
            doc_type: DocumentType::Tis,
            system_prompt: TIS_SYSTEM_PROMPT,
        });
        registry.register(DocumentTemplate {
            doc_type: DocumentType::Prd,
            system_prompt: PRD_SYSTEM_PROMPT,
        });
        registry.register(DocumentTemplate {
            doc_type: DocumentType::Architecture,
            system_prompt: ARCHITECTURE_SYSTEM_PROMPT,
        });
        registry.register(DocumentTemplate {
            doc_type: DocumentType::AgentSpec,
            system_prompt: AGENT_SPEC_SYSTEM_PROMPT,
        });
        registry.register(DocumentTemplate {
            doc_type: DocumentType::FlowSpec,
            system_prompt: FLOW_SPEC_SYSTEM_PROMPT,
        });
        registry
    }

    /// Register a template. Replaces any existing entry for the type.
    pub fn register(&mut self, template: DocumentTemplate) {
        self.templates.insert(template.doc_type, template);
    }

    /// Look up the template for a document type.
    pub fn get(&self, doc_type: DocumentType) -> Option<&DocumentTemplate> {
        self.templates.get(&doc_type)
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_all_registered_types() {
        let registry = TemplateRegistry::with_defaults();
        for ty in [
            DocumentType::Tis,
            DocumentType::Prd,
            DocumentType::Architecture,
            DocumentType::AgentSpec,
            DocumentType::FlowSpec,
        ] {
            assert!(registry.get(ty).is_some(), "missing template for {ty}");
        }
    }

    #[test]
    fn other_has_no_template() {
        let registry = TemplateRegistry::with_defaults();
        assert!(registry.get(DocumentType::Other).is_none());
    }

    #[test]
    fn tis_prompt_fixes_required_sections() {
        assert!(TIS_SYSTEM_PROMPT.contains("Project Overview"));
        assert!(TIS_SYSTEM_PROMPT.contains("Component Specifications"));
        assert!(TIS_SYSTEM_PROMPT.contains("Security Considerations"));
        assert!(TIS_SYSTEM_PROMPT.contains("Implementation Phases"));
    }

    #[test]
    fn registering_replaces_existing() {
        let mut registry = TemplateRegistry::with_defaults();
        registry.register(DocumentTemplate {
            doc_type: DocumentType::Tis,
            system_prompt: "custom",
        });
        assert_eq!(registry.get(DocumentType::Tis).unwrap().system_prompt, "custom");
    }
}
