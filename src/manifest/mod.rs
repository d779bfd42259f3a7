// ─── Mod Manifests ───
// On-disk manifest model with bundle-path repair, plus recursive discovery.

pub mod model;
pub mod scanner;

pub use model::{ManifestData, ModManifest};
pub use scanner::find_manifest_files;
