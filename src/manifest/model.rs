use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ModError, ModResult};

/// Raw parsed manifest content.
///
/// Only `name` and `bundles` matter to the core; everything else the author
/// put in the file is carried through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestData {
    /// Human-readable mod name.
    pub name: String,
    /// References to the binary asset bundles this mod ships.
    pub bundles: Vec<String>,
    /// Fields the core does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One installed mod, built from a discovered manifest file.
///
/// Construction repairs every bundle reference: manifests are authored on
/// one machine and deployed to another, so prefixes baked in at authoring
/// time are rewritten to the manifest's own directory, keeping only the
/// file name. Records are immutable after that and replaced wholesale on
/// the next scan.
#[derive(Debug, Clone, Serialize)]
pub struct ModManifest {
    source_path: PathBuf,
    data: ManifestData,
}

impl ModManifest {
    /// Read and parse the manifest at `path`, then repair its bundle paths.
    pub fn load(path: &Path) -> ModResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ModError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let data: ManifestData =
            serde_json::from_str(&raw).map_err(|source| ModError::ManifestParse {
                path: path.to_path_buf(),
                source,
            })?;

        let mut manifest = Self {
            source_path: path.to_path_buf(),
            data,
        };
        manifest.validate()?;
        manifest.fix_bundle_paths();
        Ok(manifest)
    }

    fn validate(&self) -> ModResult<()> {
        if self.data.name.trim().is_empty() {
            return Err(ModError::InvalidManifest {
                path: self.source_path.clone(),
                reason: "mod name is empty".into(),
            });
        }
        if self.data.bundles.is_empty() {
            return Err(ModError::InvalidManifest {
                path: self.source_path.clone(),
                reason: "manifest references no bundles".into(),
            });
        }
        Ok(())
    }

    /// Rewrite every bundle reference to `<manifest dir>/<file name>`,
    /// forward-slash normalized. Bundle files are co-located with the
    /// manifest after deployment, so the authored directory prefix (often
    /// an absolute path from a foreign machine) is discarded. Idempotent.
    fn fix_bundle_paths(&mut self) {
        let dir = normalize_separators(
            &self
                .source_path
                .parent()
                .unwrap_or(Path::new(""))
                .to_string_lossy(),
        );
        let dir = dir.trim_end_matches('/');
        for bundle in &mut self.data.bundles {
            let file_name = bundle_file_name(bundle).to_string();
            *bundle = if dir.is_empty() {
                file_name
            } else {
                format!("{dir}/{file_name}")
            };
        }
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    /// Absolute path of the manifest file this record was built from.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Repaired bundle paths, in manifest order.
    pub fn bundle_paths(&self) -> &[String] {
        &self.data.bundles
    }

    /// The bundle reference a catalog load is keyed by.
    /// Always present: construction rejects manifests with no bundles.
    pub fn primary_bundle(&self) -> &str {
        &self.data.bundles[0]
    }

    pub fn data(&self) -> &ManifestData {
        &self.data
    }
}

/// Last path component, splitting on both separator styles so references
/// authored on Windows are handled on any platform.
fn bundle_file_name(reference: &str) -> &str {
    reference.rsplit(['/', '\\']).next().unwrap_or(reference)
}

fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_manifest(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("manifest.json");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn load_parses_name_and_bundles() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(
            dir.path(),
            r#"{"name":"Alpha Mod","bundles":["alpha.bundle"],"author":"someone"}"#,
        );

        let manifest = ModManifest::load(&path).unwrap();
        assert_eq!(manifest.name(), "Alpha Mod");
        assert_eq!(manifest.source_path(), path);
        assert_eq!(manifest.bundle_paths().len(), 1);
        // Unknown fields survive the round trip.
        assert_eq!(
            manifest.data().extra.get("author").and_then(|v| v.as_str()),
            Some("someone")
        );
    }

    #[test]
    fn repair_rewrites_foreign_absolute_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(
            dir.path(),
            r#"{"name":"Alpha Mod","bundles":["C:\\build\\bundles\\alpha.bundle"]}"#,
        );

        let manifest = ModManifest::load(&path).unwrap();
        let expected = format!("{}/alpha.bundle", dir.path().to_string_lossy());
        assert_eq!(manifest.primary_bundle(), expected);
    }

    #[test]
    fn repair_handles_filename_only_references() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(dir.path(), r#"{"name":"Beta Mod","bundles":["beta.bundle"]}"#);

        let manifest = ModManifest::load(&path).unwrap();
        let expected = format!("{}/beta.bundle", dir.path().to_string_lossy());
        assert_eq!(manifest.primary_bundle(), expected);
    }

    #[test]
    fn repair_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(
            dir.path(),
            r#"{"name":"Alpha Mod","bundles":["C:/build/bundles/alpha.bundle","extra.bundle"]}"#,
        );

        let manifest = ModManifest::load(&path).unwrap();
        let mut repaired_again = manifest.clone();
        repaired_again.fix_bundle_paths();
        assert_eq!(manifest.bundle_paths(), repaired_again.bundle_paths());
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(dir.path(), "this is not json");

        let err = ModManifest::load(&path).unwrap_err();
        assert!(matches!(err, ModError::ManifestParse { .. }));
    }

    #[test]
    fn empty_bundle_list_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(dir.path(), r#"{"name":"Hollow Mod","bundles":[]}"#);

        let err = ModManifest::load(&path).unwrap_err();
        assert!(matches!(err, ModError::InvalidManifest { .. }));
    }

    #[test]
    fn blank_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(dir.path(), r#"{"name":"  ","bundles":["a.bundle"]}"#);

        let err = ModManifest::load(&path).unwrap_err();
        assert!(matches!(err, ModError::InvalidManifest { .. }));
    }
}
