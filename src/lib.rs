// ─── Mod-loading runtime core ───
// Discovers externally-authored mods on disk, resolves their manifests,
// and loads their bundled content into a running game.
//
// Architecture:
//   manifest/    — manifest model, bundle-path repair, recursive discovery
//   registry     — installed mod list + selection
//   resources    — resource subsystem boundary (traits) + in-memory backend
//   handle       — one-shot broadcast completion handles
//   loader       — asynchronous catalog loading
//   instantiator — label-filtered object instantiation
//   config       — mods root resolution
//   error        — central error type

pub mod config;
pub mod error;
pub mod handle;
pub mod instantiator;
pub mod loader;
pub mod manifest;
pub mod registry;
pub mod resources;

pub use config::ModsConfig;
pub use error::{ModError, ModResult};
pub use handle::{OpHandle, OpStatus};
pub use instantiator::{await_all, AsyncInstantiation, EmptyLabelPolicy, ResourceInstantiator};
pub use loader::{CatalogHandle, CatalogLoader};
pub use manifest::{ManifestData, ModManifest};
pub use registry::{ModCatalog, ScanReport};
pub use resources::{
    LocationRef, MemoryBackend, ObjectHandle, ResourceBackend, ResourceKind, ResourceLocator,
};

use tracing_subscriber::EnvFilter;

/// Initialize structured logging.
///
/// Intended to be called once by the host; honors `RUST_LOG`.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
