//! Graph domain types — the project's visual architecture canvas.
//!
//! A `GraphSnapshot` is the node/edge/viewport state of a project's
//! diagram at a point in time. The core treats it as read-only input:
//! tools and the document generator look at it, nothing in this layer
//! ever writes it back.

use serde::{Deserialize, Serialize};

/// Unique identifier for a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub String);

impl ProjectId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Project metadata the document generator interpolates into prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// The node/edge/viewport state of a project's canvas at a point in time.
///
/// Nodes and edges are opaque JSON records — their schema belongs to the
/// canvas UI, not to this layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Ordered node records
    #[serde(default)]
    pub nodes: Vec<serde_json::Value>,

    /// Ordered edge records
    #[serde(default)]
    pub edges: Vec<serde_json::Value>,

    /// Camera state ({x, y, zoom})
    #[serde(default = "default_viewport")]
    pub viewport: serde_json::Value,
}

fn default_viewport() -> serde_json::Value {
    serde_json::json!({"x": 0, "y": 0, "zoom": 1})
}

impl GraphSnapshot {
    /// An empty canvas with the default viewport.
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            viewport: default_viewport(),
        }
    }

    /// Canonical JSON document of the canvas contents (nodes and edges,
    /// not the viewport), pretty-printed with stable two-space
    /// indentation. This is the exact text tools hand to the model and
    /// the document generator interpolates into prompts.
    pub fn canvas_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&serde_json::json!({
            "nodes": self.nodes,
            "edges": self.edges,
        }))
    }
}

impl Default for GraphSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
