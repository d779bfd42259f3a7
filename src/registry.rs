use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{ModError, ModResult};
use crate::manifest::{scanner, ModManifest};

/// Outcome of one registry rescan.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    /// Number of manifests now installed.
    pub installed: usize,
    /// Manifest files that were found but could not be loaded.
    pub skipped: Vec<SkippedManifest>,
}

/// One manifest file a rescan discovered but rejected.
#[derive(Debug, Serialize)]
pub struct SkippedManifest {
    pub path: PathBuf,
    pub error: ModError,
}

/// Registry of discovered mods plus the current selection.
///
/// `rescan` is the only operation that touches the filesystem. The installed
/// list is rebuilt in full before it replaces the previous one, so readers
/// never observe a half-built list; the selection is cleared on every rescan
/// because records are replaced wholesale.
#[derive(Debug, Default)]
pub struct ModCatalog {
    installed: Vec<Arc<ModManifest>>,
    selected: Option<usize>,
    last_scan: Option<DateTime<Utc>>,
}

impl ModCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `root` and rebuild the installed list from what is found.
    ///
    /// One malformed manifest does not abort the scan: it is logged,
    /// reported in the returned `ScanReport`, and excluded from the list.
    pub fn rescan(&mut self, root: &Path) -> ModResult<ScanReport> {
        let paths = scanner::find_manifest_files(root)?;

        let mut next = Vec::with_capacity(paths.len());
        let mut skipped = Vec::new();
        for path in paths {
            match ModManifest::load(&path) {
                Ok(manifest) => next.push(Arc::new(manifest)),
                Err(error) => {
                    warn!("Skipping manifest {:?}: {}", path, error);
                    skipped.push(SkippedManifest { path, error });
                }
            }
        }

        // Swap in only after the full rebuild.
        self.installed = next;
        self.selected = None;
        self.last_scan = Some(Utc::now());

        info!(
            "Installed mod list rebuilt: {} mods, {} skipped",
            self.installed.len(),
            skipped.len()
        );
        Ok(ScanReport {
            installed: self.installed.len(),
            skipped,
        })
    }

    /// Installed mods in discovery order.
    pub fn installed(&self) -> &[Arc<ModManifest>] {
        &self.installed
    }

    pub fn len(&self) -> usize {
        self.installed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installed.is_empty()
    }

    /// Mark `manifest` as the current selection.
    ///
    /// Fails if it is not a member of the installed list; records kept from
    /// a previous scan do not count, even if they look identical.
    pub fn select(&mut self, manifest: &Arc<ModManifest>) -> ModResult<()> {
        match self.installed.iter().position(|m| Arc::ptr_eq(m, manifest)) {
            Some(index) => {
                self.selected = Some(index);
                Ok(())
            }
            None => Err(ModError::NotInstalled(manifest.name().to_string())),
        }
    }

    pub fn selected(&self) -> Option<&Arc<ModManifest>> {
        self.selected.and_then(|index| self.installed.get(index))
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Arc<ModManifest>> {
        self.installed.iter().find(|m| m.name() == name)
    }

    /// When the last rescan completed, if one has run.
    pub fn last_scan(&self) -> Option<DateTime<Utc>> {
        self.last_scan
    }
}
