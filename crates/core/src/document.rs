//! Document domain types — generated formal artifacts.
//!
//! The document generator produces markdown text; persistence of the
//! resulting `GeneratedDocument` belongs to the external document store.

use serde::{Deserialize, Serialize};
use crate::graph::ProjectId;

/// The kinds of formal documents the generator knows how to produce.
///
/// Adding a kind means registering a template for it — the runtime
/// doesn't change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Tis,
    Prd,
    Architecture,
    AgentSpec,
    FlowSpec,
    Other,
}

impl DocumentType {
    /// The wire tag used by clients and stored on documents.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Tis => "TIS",
            Self::Prd => "PRD",
            Self::Architecture => "ARCHITECTURE",
            Self::AgentSpec => "AGENT_SPEC",
            Self::FlowSpec => "FLOW_SPEC",
            Self::Other => "OTHER",
        }
    }
}

impl std::str::FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TIS" => Ok(Self::Tis),
            "PRD" => Ok(Self::Prd),
            "ARCHITECTURE" => Ok(Self::Architecture),
            "AGENT_SPEC" => Ok(Self::AgentSpec),
            "FLOW_SPEC" => Ok(Self::FlowSpec),
            "OTHER" => Ok(Self::Other),
            other => Err(other.to_string()),
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// A generated document, ready for the caller to persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub title: String,
    pub doc_type: DocumentType,
    /// Markdown text
    pub content: String,
    pub version: String,
    pub project_id: ProjectId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn tags_roundtrip() {
        for tag in ["TIS", "PRD", "ARCHITECTURE", "AGENT_SPEC", "FLOW_SPEC", "OTHER"] {
            let ty = DocumentType::from_str(tag).unwrap();
            assert_eq!(ty.tag(), tag);
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = DocumentType::from_str("UNKNOWN").unwrap_err();
        assert_eq!(err, "UNKNOWN");
    }

    #[test]
    fn serde_uses_wire_tags() {
        let json = serde_json::to_string(&DocumentType::AgentSpec).unwrap();
        assert_eq!(json, r#""AGENT_SPEC""#);
    }
}
