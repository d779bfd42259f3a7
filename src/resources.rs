// ─── Resource Subsystem Boundary ───
// The core never reads bundle files itself; the host engine's asset layer
// implements these traits. `MemoryBackend` is the built-in in-process
// implementation for headless hosts and tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ModError, ModResult};

/// What a resource location materializes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// An instantiable object (prefab-like).
    Object,
    Scene,
    Asset,
}

/// One concrete resource location inside a loaded catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRef {
    /// Identifier of the resource inside its bundle.
    pub internal_id: String,
    /// Labels the author tagged the resource with.
    pub labels: Vec<String>,
    pub kind: ResourceKind,
}

/// A live object spawned from a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectHandle {
    pub id: Uuid,
    /// The location the object came from.
    pub internal_id: String,
}

/// Resolved catalog index: maps labels to concrete resource locations.
pub trait ResourceLocator: Send + Sync {
    /// All locations tagged with `label` and of the given kind.
    fn locate(&self, label: &str, kind: ResourceKind) -> Vec<LocationRef>;

    /// Identifier of the catalog this locator was resolved from.
    fn catalog_id(&self) -> &str;
}

impl std::fmt::Debug for dyn ResourceLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceLocator")
            .field("catalog_id", &self.catalog_id())
            .finish()
    }
}

/// The host engine's asset-bundle layer.
#[async_trait]
pub trait ResourceBackend: Send + Sync {
    /// Resolve a bundle reference into a locator.
    async fn load_catalog(&self, bundle_path: &str) -> ModResult<Arc<dyn ResourceLocator>>;

    /// Materialize one location into a live object.
    async fn instantiate(&self, location: &LocationRef) -> ModResult<ObjectHandle>;
}

// ─── In-memory backend ──────────────────────────────────

/// In-process `ResourceBackend` keyed by bundle path.
///
/// Catalogs are registered up front rather than read from bundle files.
#[derive(Default)]
pub struct MemoryBackend {
    catalogs: RwLock<HashMap<String, Arc<MemoryLocator>>>,
}

/// Locator served by `MemoryBackend`.
pub struct MemoryLocator {
    id: String,
    locations: Vec<LocationRef>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the locations served for `bundle_path`.
    pub async fn register_catalog(
        &self,
        bundle_path: impl Into<String>,
        locations: Vec<LocationRef>,
    ) {
        let bundle_path = bundle_path.into();
        let locator = Arc::new(MemoryLocator {
            id: bundle_path.clone(),
            locations,
        });
        self.catalogs.write().await.insert(bundle_path, locator);
    }
}

impl ResourceLocator for MemoryLocator {
    fn locate(&self, label: &str, kind: ResourceKind) -> Vec<LocationRef> {
        self.locations
            .iter()
            .filter(|location| location.kind == kind && location.labels.iter().any(|l| l == label))
            .cloned()
            .collect()
    }

    fn catalog_id(&self) -> &str {
        &self.id
    }
}

#[async_trait]
impl ResourceBackend for MemoryBackend {
    async fn load_catalog(&self, bundle_path: &str) -> ModResult<Arc<dyn ResourceLocator>> {
        let catalogs = self.catalogs.read().await;
        match catalogs.get(bundle_path) {
            Some(locator) => Ok(locator.clone() as Arc<dyn ResourceLocator>),
            None => Err(ModError::MissingBundle(bundle_path.to_string())),
        }
    }

    async fn instantiate(&self, location: &LocationRef) -> ModResult<ObjectHandle> {
        Ok(ObjectHandle {
            id: Uuid::new_v4(),
            internal_id: location.internal_id.clone(),
        })
    }
}
