use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{ModError, ModResult};

/// File extension manifests are discovered by.
const MANIFEST_EXTENSION: &str = "json";

/// Recursively collect every manifest file under `root`.
///
/// Files are gathered before subdirectories at each level; sibling order is
/// whatever the filesystem enumerates (stable within one run, not sorted).
/// Unreadable subdirectories are skipped with a warning so one broken mod
/// install cannot hide the rest. Fails only if `root` itself is missing.
pub fn find_manifest_files(root: &Path) -> ModResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(ModError::MissingModsRoot(root.to_path_buf()));
    }

    let mut found = Vec::new();
    walk(root, &mut found);
    debug!("Found {} manifest files under {:?}", found.len(), root);
    Ok(found)
}

fn walk(dir: &Path, found: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Skipping unreadable directory {:?}: {}", dir, e);
            return;
        }
    };

    let mut subdirs = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry in {:?}: {}", dir, e);
                continue;
            }
        };

        // file_type() does not follow symlinks, so linked directory
        // cycles are never traversed.
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                warn!("Cannot stat {:?}: {}", entry.path(), e);
                continue;
            }
        };

        let path = entry.path();
        if file_type.is_file() {
            if path.extension().and_then(|e| e.to_str()) == Some(MANIFEST_EXTENSION) {
                found.push(path);
            }
        } else if file_type.is_dir() {
            subdirs.push(path);
        }
    }

    for subdir in subdirs {
        walk(&subdir, found);
    }
}
