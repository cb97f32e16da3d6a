//! Boundary traits for the external graph and project stores.
//!
//! CRUD, schema validation, and the HTTP layer around these stores live
//! outside this core. The orchestration layer only ever needs two reads:
//! a project's metadata and its current canvas snapshot. Both are single
//! bounded lookups — the only suspension point a tool handler is allowed.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::graph::{GraphSnapshot, Project, ProjectId};

/// Read access to canvas snapshots.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Fetch the current snapshot for a project, `None` if the project
    /// has no canvas.
    async fn get_graph_snapshot(
        &self,
        project_id: &ProjectId,
    ) -> Result<Option<GraphSnapshot>, StoreError>;
}

/// Read access to project metadata.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Fetch a project's metadata, `None` if it doesn't exist.
    async fn get_project(&self, project_id: &ProjectId) -> Result<Option<Project>, StoreError>;
}

/// An in-memory graph store — for tests and embedding callers that
/// manage snapshots themselves.
pub struct InMemoryGraphStore {
    snapshots: RwLock<HashMap<ProjectId, GraphSnapshot>>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self {
            snapshots: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, project_id: ProjectId, snapshot: GraphSnapshot) {
        self.snapshots.write().await.insert(project_id, snapshot);
    }
}

impl Default for InMemoryGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn get_graph_snapshot(
        &self,
        project_id: &ProjectId,
    ) -> Result<Option<GraphSnapshot>, StoreError> {
        Ok(self.snapshots.read().await.get(project_id).cloned())
    }
}

/// An in-memory project store.
pub struct InMemoryProjectStore {
    projects: RwLock<HashMap<ProjectId, Project>>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self {
            projects: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, project: Project) {
        self.projects
            .write()
            .await
            .insert(project.id.clone(), project);
    }
}

impl Default for InMemoryProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn get_project(&self, project_id: &ProjectId) -> Result<Option<Project>, StoreError> {
        Ok(self.projects.read().await.get(project_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn graph_store_insert_and_get() {
        let store = InMemoryGraphStore::new();
        let id = ProjectId::from("p1");
        store.insert(id.clone(), GraphSnapshot::empty()).await;

        let snap = store.get_graph_snapshot(&id).await.unwrap();
        assert!(snap.is_some());
        assert!(store
            .get_graph_snapshot(&ProjectId::from("missing"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn project_store_insert_and_get() {
        let store = InMemoryProjectStore::new();
        store
            .insert(Project {
                id: ProjectId::from("p1"),
                name: "Checkout Service".into(),
                description: "Payment flow redesign".into(),
            })
            .await;

        let project = store.get_project(&ProjectId::from("p1")).await.unwrap().unwrap();
        assert_eq!(project.name, "Checkout Service");
        assert!(store
            .get_project(&ProjectId::from("p2"))
            .await
            .unwrap()
            .is_none());
    }
}
