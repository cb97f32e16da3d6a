//! Canvas read tool — lets the partner agent see what the user is building.
//!
//! The project id is bound at session construction; the model doesn't get
//! to pick which project it reads. Every failure path returns descriptive
//! text instead of an error: the model has to be able to see a missing
//! canvas and react to it, and a raised error here would cost the whole
//! conversational turn.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use archloom_core::error::ToolError;
use archloom_core::graph::ProjectId;
use archloom_core::store::GraphStore;
use archloom_core::tool::{Tool, ToolResult};

/// The text returned when the project has no canvas.
pub const CANVAS_NOT_FOUND: &str = "Canvas not found for this project.";

pub struct ReadGraphStateTool {
    project_id: ProjectId,
    store: Arc<dyn GraphStore>,
}

impl ReadGraphStateTool {
    pub fn new(project_id: ProjectId, store: Arc<dyn GraphStore>) -> Self {
        Self { project_id, store }
    }
}

#[async_trait]
impl Tool for ReadGraphStateTool {
    fn name(&self) -> &str {
        "read_graph_state"
    }

    fn description(&self) -> &str {
        "Read the current state of the canvas for the project you are helping with. \
         Returns a JSON document of nodes and edges."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let snapshot = match self.store.get_graph_snapshot(&self.project_id).await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                debug!(project_id = %self.project_id, "Canvas lookup returned nothing");
                return Ok(ToolResult {
                    call_id: String::new(),
                    success: false,
                    output: CANVAS_NOT_FOUND.into(),
                });
            }
            Err(e) => {
                warn!(project_id = %self.project_id, error = %e, "Canvas read failed");
                return Ok(ToolResult {
                    call_id: String::new(),
                    success: false,
                    output: format!("Could not read the canvas: {e}"),
                });
            }
        };

        let output = match snapshot.canvas_json() {
            Ok(json) => json,
            Err(e) => {
                return Ok(ToolResult {
                    call_id: String::new(),
                    success: false,
                    output: format!("Could not serialize the canvas: {e}"),
                });
            }
        };

        Ok(ToolResult {
            call_id: String::new(),
            success: true,
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archloom_core::graph::GraphSnapshot;
    use archloom_core::store::InMemoryGraphStore;

    #[tokio::test]
    async fn reads_canvas_as_json() {
        let store = Arc::new(InMemoryGraphStore::new());
        store
            .insert(
                ProjectId::from("p1"),
                GraphSnapshot {
                    nodes: vec![serde_json::json!({"id": "n1", "type": "ProcessNode"})],
                    edges: vec![serde_json::json!({"id": "e1"})],
                    viewport: serde_json::json!({"x": 0, "y": 0, "zoom": 1}),
                },
            )
            .await;

        let tool = ReadGraphStateTool::new(ProjectId::from("p1"), store);
        let result = tool.execute(serde_json::json!({})).await.unwrap();

        assert!(result.success);
        assert!(result.output.contains("n1"));
        assert!(result.output.contains("ProcessNode"));
    }

    #[tokio::test]
    async fn output_roundtrips_to_snapshot_contents() {
        let store = Arc::new(InMemoryGraphStore::new());
        let nodes = vec![
            serde_json::json!({"id": "n1", "type": "ProcessNode"}),
            serde_json::json!({"id": "n2", "type": "DataNode"}),
        ];
        let edges = vec![serde_json::json!({"id": "e1", "source": "n1", "target": "n2"})];
        store
            .insert(
                ProjectId::from("p1"),
                GraphSnapshot {
                    nodes: nodes.clone(),
                    edges: edges.clone(),
                    viewport: serde_json::json!({}),
                },
            )
            .await;

        let tool = ReadGraphStateTool::new(ProjectId::from("p1"), store);
        let result = tool.execute(serde_json::json!({})).await.unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(parsed["nodes"], serde_json::Value::Array(nodes));
        assert_eq!(parsed["edges"], serde_json::Value::Array(edges));
    }

    #[tokio::test]
    async fn missing_canvas_returns_text_not_error() {
        let store = Arc::new(InMemoryGraphStore::new());
        let tool = ReadGraphStateTool::new(ProjectId::from("nowhere"), store);

        let result = tool.execute(serde_json::json!({})).await.unwrap();
        assert!(!result.success);
        assert_eq!(result.output, "Canvas not found for this project.");
    }

    #[test]
    fn definition_has_no_required_params() {
        let store = Arc::new(InMemoryGraphStore::new());
        let tool = ReadGraphStateTool::new(ProjectId::from("p1"), store);
        let def = tool.to_definition();
        assert_eq!(def.name, "read_graph_state");
        assert!(def.parameters.get("required").is_none());
    }
}
