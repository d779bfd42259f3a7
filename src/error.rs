use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the mod-loading core.
/// Every module returns `Result<T, ModError>`.
#[derive(Debug, Error)]
pub enum ModError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Configuration ───────────────────────────────────
    #[error("Mods root directory does not exist: {0:?}")]
    MissingModsRoot(PathBuf),

    // ── Manifest ────────────────────────────────────────
    #[error("Manifest parse error at {path:?}: {source}")]
    ManifestParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid manifest at {path:?}: {reason}")]
    InvalidManifest { path: PathBuf, reason: String },

    // ── Registry ────────────────────────────────────────
    #[error("Mod '{0}' is not in the installed list")]
    NotInstalled(String),

    #[error("No mod selected; select one before loading")]
    NothingSelected,

    // ── Catalog / instantiation ─────────────────────────
    #[error("Catalog handle is {state}, not succeeded")]
    CatalogNotReady { state: &'static str },

    #[error("No locations in the catalog match label '{label}'")]
    NoLocations { label: String },

    #[error("No catalog registered for bundle {0}")]
    MissingBundle(String),

    #[error("Catalog load timed out after {0:?}")]
    LoadTimeout(std::time::Duration),

    #[error("Operation task terminated without delivering a result")]
    TaskAbandoned,

    // ── Resource subsystem ──────────────────────────────
    #[error("Resource backend error: {0}")]
    Backend(String),
}

/// Convenience alias used throughout the crate.
pub type ModResult<T> = Result<T, ModError>;

impl From<std::io::Error> for ModError {
    fn from(source: std::io::Error) -> Self {
        ModError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

// ── Serialization for host IPC ──────────────────────────
// Hosts forward errors to their UI layer as plain strings.
impl serde::Serialize for ModError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
