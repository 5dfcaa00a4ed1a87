//! Named projection registry with scoped lifetimes.
//!
//! `project` is an upsert: the existence check, the drop of a same-named
//! projection and the build of the new one all happen under one write lock,
//! so no reader can observe the name half-replaced. Readers get an
//! `Arc<Projection>` and keep a complete view for as long as they hold it.

use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;
use crate::projection::{Projection, ProjectionSpec};
use crate::store::GraphStore;

/// Registry of live projections, keyed by name.
#[derive(Debug, Default)]
pub struct ProjectionCatalog {
    entries: RwLock<HashMap<String, Arc<Projection>>>,
}

impl ProjectionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and register a projection, replacing any projection of the same name.
    ///
    /// The returned guard drops the registration when it goes out of scope.
    /// If the build fails the old projection is already gone and nothing is
    /// registered under the name.
    pub fn project(&self, store: &GraphStore, spec: &ProjectionSpec) -> Result<ProjectionGuard<'_>> {
        let mut entries = self.entries.write();

        if let Some(previous) = entries.remove(&spec.name) {
            tracing::debug!(
                projection = %spec.name,
                generation = %previous.id(),
                "Replacing existing projection"
            );
        }

        let projection = Arc::new(Projection::build(store, spec)?);
        entries.insert(spec.name.clone(), Arc::clone(&projection));
        drop(entries);

        Ok(ProjectionGuard {
            catalog: self,
            projection,
        })
    }

    /// Current projection registered under `name`.
    pub fn get(&self, name: &str) -> Option<Arc<Projection>> {
        self.entries.read().get(name).cloned()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    /// Remove a projection by name. Returns whether one was registered.
    pub fn drop_projection(&self, name: &str) -> bool {
        let removed = self.entries.write().remove(name);
        if let Some(projection) = &removed {
            tracing::debug!(projection = %name, generation = %projection.id(), "Projection dropped");
        }
        removed.is_some()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Remove `projection` only if it is still the registered generation.
    fn release(&self, projection: &Projection) {
        let mut entries = self.entries.write();
        let current = entries
            .get(projection.name())
            .is_some_and(|p| p.id() == projection.id());
        if current {
            entries.remove(projection.name());
            tracing::debug!(
                projection = %projection.name(),
                generation = %projection.id(),
                "Projection released"
            );
        }
    }
}

/// Scoped handle to a registered projection.
///
/// Dropping the guard unregisters the projection unless it has been replaced
/// in the meantime. Other holders of the `Arc` keep their view.
#[derive(Debug)]
pub struct ProjectionGuard<'a> {
    catalog: &'a ProjectionCatalog,
    projection: Arc<Projection>,
}

impl ProjectionGuard<'_> {
    pub fn projection(&self) -> &Arc<Projection> {
        &self.projection
    }
}

impl Deref for ProjectionGuard<'_> {
    type Target = Projection;

    fn deref(&self) -> &Projection {
        &self.projection
    }
}

impl Drop for ProjectionGuard<'_> {
    fn drop(&mut self) {
        self.catalog.release(&self.projection);
    }
}
