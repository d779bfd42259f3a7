use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{info, warn};

use crate::error::{ModError, ModResult};
use crate::handle::{op_channel, OpHandle, OpStatus};
use crate::loader::CatalogHandle;
use crate::resources::{LocationRef, ObjectHandle, ResourceBackend, ResourceKind};

/// Handle to one in-flight instantiation.
pub type AsyncInstantiation = OpHandle<ObjectHandle>;

/// What `instantiate` does when no location matches the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyLabelPolicy {
    /// Treat it as an error (`ModError::NoLocations`).
    #[default]
    Error,
    /// Return an empty set of instantiations.
    AllowEmpty,
}

/// Materializes catalog entries into live objects.
pub struct ResourceInstantiator {
    backend: Arc<dyn ResourceBackend>,
    empty_policy: EmptyLabelPolicy,
}

impl ResourceInstantiator {
    pub fn new(backend: Arc<dyn ResourceBackend>) -> Self {
        Self {
            backend,
            empty_policy: EmptyLabelPolicy::default(),
        }
    }

    pub fn with_empty_policy(mut self, policy: EmptyLabelPolicy) -> Self {
        self.empty_policy = policy;
        self
    }

    /// Spawn every instantiable object tagged `label` in the loaded catalog.
    ///
    /// The handle must already have succeeded; the backend is not touched
    /// otherwise. Each returned instantiation runs independently — one
    /// failure neither cancels nor reorders its siblings.
    pub fn instantiate(
        &self,
        handle: &CatalogHandle,
        label: &str,
    ) -> ModResult<Vec<AsyncInstantiation>> {
        let locator = match handle.status() {
            OpStatus::Succeeded(locator) => locator,
            status => {
                return Err(ModError::CatalogNotReady {
                    state: status.name(),
                })
            }
        };

        let locations = locator.locate(label, ResourceKind::Object);
        if locations.is_empty() {
            return match self.empty_policy {
                EmptyLabelPolicy::Error => Err(ModError::NoLocations {
                    label: label.to_string(),
                }),
                EmptyLabelPolicy::AllowEmpty => Ok(Vec::new()),
            };
        }

        info!(
            "Instantiating {} '{}' objects from catalog {}",
            locations.len(),
            label,
            locator.catalog_id()
        );
        Ok(locations
            .into_iter()
            .map(|location| self.spawn_one(location))
            .collect())
    }

    fn spawn_one(&self, location: LocationRef) -> AsyncInstantiation {
        let (completer, handle) = op_channel();
        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            let result = backend.instantiate(&location).await;
            if let Err(error) = &result {
                warn!("Instantiation of {} failed: {}", location.internal_id, error);
            }
            completer.complete(result);
        });
        handle
    }
}

/// Wait for every instantiation to finish, preserving request order.
pub async fn await_all(
    instantiations: Vec<AsyncInstantiation>,
) -> Vec<Result<ObjectHandle, Arc<ModError>>> {
    join_all(
        instantiations
            .into_iter()
            .map(|mut handle| async move { handle.wait().await }),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::MemoryBackend;

    fn location(id: &str, label: &str, kind: ResourceKind) -> LocationRef {
        LocationRef {
            internal_id: id.to_string(),
            labels: vec![label.to_string()],
            kind,
        }
    }

    async fn loaded_handle(backend: &Arc<MemoryBackend>, bundle: &str) -> CatalogHandle {
        let locator = backend.load_catalog(bundle).await.unwrap();
        let (completer, handle) = op_channel();
        completer.complete(Ok(locator));
        handle
    }

    #[tokio::test]
    async fn pending_handle_is_rejected_before_touching_the_backend() {
        let (_completer, pending) = op_channel();
        let spawner = ResourceInstantiator::new(Arc::new(MemoryBackend::new()));

        let err = spawner.instantiate(&pending, "spawnable").unwrap_err();
        assert!(matches!(err, ModError::CatalogNotReady { state: "pending" }));
    }

    #[tokio::test]
    async fn spawns_one_instantiation_per_matching_location() {
        let backend = Arc::new(MemoryBackend::new());
        backend
            .register_catalog(
                "alpha.bundle",
                vec![
                    location("Assets/Rocket.prefab", "spawnable", ResourceKind::Object),
                    location("Assets/Car.prefab", "spawnable", ResourceKind::Object),
                    location("Assets/Theme.ogg", "spawnable", ResourceKind::Asset),
                ],
            )
            .await;
        let handle = loaded_handle(&backend, "alpha.bundle").await;

        let spawner = ResourceInstantiator::new(backend);
        let instantiations = spawner.instantiate(&handle, "spawnable").unwrap();
        assert_eq!(instantiations.len(), 2);

        let results = await_all(instantiations).await;
        let ids: Vec<_> = results
            .into_iter()
            .map(|r| r.unwrap().internal_id)
            .collect();
        assert!(ids.contains(&"Assets/Rocket.prefab".to_string()));
        assert!(ids.contains(&"Assets/Car.prefab".to_string()));
    }

    #[tokio::test]
    async fn unmatched_label_follows_the_empty_policy() {
        let backend = Arc::new(MemoryBackend::new());
        backend.register_catalog("alpha.bundle", Vec::new()).await;
        let handle = loaded_handle(&backend, "alpha.bundle").await;

        let strict = ResourceInstantiator::new(backend.clone());
        let err = strict.instantiate(&handle, "spawnable").unwrap_err();
        assert!(matches!(err, ModError::NoLocations { .. }));

        let lenient =
            ResourceInstantiator::new(backend).with_empty_policy(EmptyLabelPolicy::AllowEmpty);
        let instantiations = lenient.instantiate(&handle, "spawnable").unwrap();
        assert!(instantiations.is_empty());
    }
}
