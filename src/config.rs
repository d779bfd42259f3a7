use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default name of the mods folder under the application data directory.
pub const DEFAULT_MODS_FOLDER: &str = "Mods";

/// Where to look for installed mods.
///
/// Resolves to `<data_dir>/<folder_name>`. The config only computes paths;
/// a missing root surfaces as `ModError::MissingModsRoot` at scan time and
/// is never created by the runtime core — creating the folder is an
/// authoring-time concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModsConfig {
    pub data_dir: PathBuf,
    pub folder_name: String,
}

impl ModsConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            folder_name: DEFAULT_MODS_FOLDER.to_string(),
        }
    }

    /// Platform default: `<os data dir>/<app_name>`.
    pub fn for_app(app_name: &str) -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join(app_name))
    }

    pub fn with_folder_name(mut self, name: impl Into<String>) -> Self {
        self.folder_name = name.into();
        self
    }

    /// Root directory scanned for mod manifests.
    pub fn mods_root(&self) -> PathBuf {
        self.data_dir.join(&self.folder_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_folder_name_is_mods() {
        let config = ModsConfig::new("/opt/game");
        assert_eq!(config.folder_name, "Mods");
        assert_eq!(config.mods_root(), PathBuf::from("/opt/game/Mods"));
    }

    #[test]
    fn folder_name_can_be_overridden() {
        let config = ModsConfig::new("/opt/game").with_folder_name("Addons");
        assert_eq!(config.mods_root(), PathBuf::from("/opt/game/Addons"));
    }
}
