//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod list;
pub(crate) mod serve;

use std::sync::Arc;

use dv_config::Config;
use dv_manifest::{EntityRegistration, Manifest, ManifestConfig};
use dv_storage::FsStorage;

pub(crate) use check::CheckArgs;
pub(crate) use list::ListArgs;
pub(crate) use serve::ServeArgs;

/// Manifest settings from a loaded configuration.
pub(crate) fn manifest_config(config: &Config) -> ManifestConfig {
    ManifestConfig {
        entities: config
            .entities_resolved
            .iter()
            .map(|entity| EntityRegistration {
                key: entity.key.clone(),
                title: entity.title.clone(),
                path: entity.path.clone(),
                version: entity.version.clone(),
                stable: entity.stable,
            })
            .collect(),
        link_base: config.docs.link_base.clone(),
        languages: config.docs.languages.clone(),
        default_language: config.docs.default_language.clone(),
        default_version: config.docs.default_version.clone(),
    }
}

/// Manifest over the local file system.
pub(crate) fn fs_manifest(config: &Config) -> Manifest {
    Manifest::new(Arc::new(FsStorage::new()), manifest_config(config))
}
