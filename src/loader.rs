use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{ModError, ModResult};
use crate::handle::{op_channel, OpHandle};
use crate::manifest::ModManifest;
use crate::registry::ModCatalog;
use crate::resources::{ResourceBackend, ResourceLocator};

/// Handle to an in-flight catalog load.
pub type CatalogHandle = OpHandle<Arc<dyn ResourceLocator>>;

/// Issues asynchronous catalog loads against the resource backend.
///
/// One load task per call, keyed by the manifest's primary bundle
/// reference. No internal retry: a failed load resolves the handle to
/// failed and the caller decides whether to call again.
pub struct CatalogLoader {
    backend: Arc<dyn ResourceBackend>,
    load_timeout: Option<Duration>,
}

impl CatalogLoader {
    pub fn new(backend: Arc<dyn ResourceBackend>) -> Self {
        Self {
            backend,
            load_timeout: None,
        }
    }

    /// Resolve stuck loads to failed after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = Some(timeout);
        self
    }

    /// Start loading `manifest`'s catalog.
    ///
    /// Returns immediately with a pending handle; the terminal state is
    /// delivered exactly once and broadcast to every clone of the handle.
    pub fn load_catalog(&self, manifest: &ModManifest) -> CatalogHandle {
        let bundle = manifest.primary_bundle().to_string();
        info!(
            "Loading catalog for mod '{}' from {}",
            manifest.name(),
            bundle
        );

        let (completer, handle) = op_channel();
        let backend = Arc::clone(&self.backend);
        let timeout = self.load_timeout;
        tokio::spawn(async move {
            let result = match timeout {
                Some(limit) => {
                    match tokio::time::timeout(limit, backend.load_catalog(&bundle)).await {
                        Ok(result) => result,
                        Err(_) => Err(ModError::LoadTimeout(limit)),
                    }
                }
                None => backend.load_catalog(&bundle).await,
            };
            match &result {
                Ok(locator) => debug!("Catalog {} resolved", locator.catalog_id()),
                Err(error) => debug!("Catalog load for {} failed: {}", bundle, error),
            }
            completer.complete(result);
        });

        handle
    }

    /// Load the registry's currently selected mod.
    /// Fails fast if nothing is selected.
    pub fn load_selected(&self, catalog: &ModCatalog) -> ModResult<CatalogHandle> {
        let manifest = catalog.selected().ok_or(ModError::NothingSelected)?;
        Ok(self.load_catalog(manifest))
    }
}
