//! Suggestion tool — the agent proposes, the user applies.
//!
//! This tool never touches the canvas. It only acknowledges the agent's
//! suggestion as text the UI can offer to the user; tool execution must
//! not produce an irreversible state change without a human confirming it.

use async_trait::async_trait;
use tracing::debug;

use archloom_core::error::ToolError;
use archloom_core::graph::ProjectId;
use archloom_core::tool::{Tool, ToolResult};

pub struct SuggestNodeAdditionsTool {
    project_id: ProjectId,
}

impl SuggestNodeAdditionsTool {
    pub fn new(project_id: ProjectId) -> Self {
        Self { project_id }
    }
}

#[async_trait]
impl Tool for SuggestNodeAdditionsTool {
    fn name(&self) -> &str {
        "suggest_node_additions"
    }

    fn description(&self) -> &str {
        "Record a suggestion for nodes or flows to add to the canvas. The suggestion is \
         shown to the user, who decides whether to apply it; the canvas is never modified \
         directly. Be specific about node types (e.g. a ProcessNode for 'User Validation')."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "suggestion": {
                    "type": "string",
                    "description": "The proposed nodes/flows, described concretely"
                }
            },
            "required": ["suggestion"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let suggestion = match arguments["suggestion"].as_str() {
            Some(s) if !s.trim().is_empty() => s.trim(),
            _ => {
                return Ok(ToolResult {
                    call_id: String::new(),
                    success: false,
                    output: "No suggestion provided — pass a 'suggestion' string describing \
                             the nodes to add."
                        .into(),
                });
            }
        };

        debug!(project_id = %self.project_id, "Node suggestion recorded");

        Ok(ToolResult {
            call_id: String::new(),
            success: true,
            output: format!("Suggestion recorded: {suggestion}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn acknowledges_suggestion() {
        let tool = SuggestNodeAdditionsTool::new(ProjectId::from("p1"));
        let result = tool
            .execute(serde_json::json!({
                "suggestion": "Add a ProcessNode for 'User Validation'"
            }))
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(
            result.output,
            "Suggestion recorded: Add a ProcessNode for 'User Validation'"
        );
    }

    #[tokio::test]
    async fn missing_suggestion_returns_text() {
        let tool = SuggestNodeAdditionsTool::new(ProjectId::from("p1"));
        let result = tool.execute(serde_json::json!({})).await.unwrap();

        assert!(!result.success);
        assert!(result.output.contains("No suggestion provided"));
    }

    #[test]
    fn definition_requires_suggestion() {
        let tool = SuggestNodeAdditionsTool::new(ProjectId::from("p1"));
        let def = tool.to_definition();
        assert_eq!(def.name, "suggest_node_additions");
        assert_eq!(def.parameters["required"][0], "suggestion");
    }
}
