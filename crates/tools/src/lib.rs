//! Canvas tool capability set for the Archloom partner agent.
//!
//! Two capabilities, both safe by construction: `read_graph_state` is a
//! pure query, `suggest_node_additions` is a side-effect-free suggestion.
//! Both close over the session's project id and the external graph store;
//! neither can mutate the canvas or call back into the agent runtime.

pub mod read_graph_state;
pub mod suggest_node_additions;

use std::sync::Arc;

use archloom_core::graph::ProjectId;
use archloom_core::store::GraphStore;
use archloom_core::tool::ToolRegistry;

pub use read_graph_state::{ReadGraphStateTool, CANVAS_NOT_FOUND};
pub use suggest_node_additions::SuggestNodeAdditionsTool;

/// Build the canvas capability set bound to one project.
///
/// Registered once at partner-session construction; the registry lives
/// for the session lifetime.
pub fn canvas_registry(project_id: ProjectId, store: Arc<dyn GraphStore>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(ReadGraphStateTool::new(
        project_id.clone(),
        store,
    )));
    registry.register(Box::new(SuggestNodeAdditionsTool::new(project_id)));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use archloom_core::store::InMemoryGraphStore;

    #[test]
    fn registry_contains_both_canvas_tools() {
        let store = Arc::new(InMemoryGraphStore::new());
        let registry = canvas_registry(ProjectId::from("p1"), store);

        assert!(registry.get("read_graph_state").is_some());
        assert!(registry.get("suggest_node_additions").is_some());
        assert_eq!(registry.definitions().len(), 2);
    }
}
