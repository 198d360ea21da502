use std::collections::HashMap;

use super::{MetadataEntityStore, StoreError};

/// Resolves the entity store of another project for cross-collection reads
pub trait SessionLocator {
    /// Entity store serving `project`
    fn entity_store_for(&self, project: &str) -> Result<&dyn MetadataEntityStore, StoreError>;
}

/// Fixed mapping from project names to entity stores
#[derive(Default)]
pub struct ProjectRegistry<'a> {
    projects: HashMap<String, Box<dyn MetadataEntityStore + 'a>>,
}

impl<'a> ProjectRegistry<'a> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the entity store of a project
    pub fn register(&mut self, project: impl Into<String>, store: impl MetadataEntityStore + 'a) {
        self.projects.insert(project.into(), Box::new(store));
    }

    /// Registered project names
    pub fn projects(&self) -> impl Iterator<Item = &str> {
        self.projects.keys().map(String::as_str)
    }
}

impl SessionLocator for ProjectRegistry<'_> {
    fn entity_store_for(&self, project: &str) -> Result<&dyn MetadataEntityStore, StoreError> {
        self.projects
            .get(project)
            .map(|store| store.as_ref() as &dyn MetadataEntityStore)
            .ok_or_else(|| StoreError::UnknownProject(project.to_string()))
    }
}
