//! Documentation manifest and page resolution.
//!
//! A [`Manifest`] scans registered documentation trees through a
//! [`Storage`](dv_storage::Storage) and builds an index of:
//!
//! - [`Entity`]: a documented module, identified by its key
//! - [`EntityLanguage`]: one language of an entity, holding its version roots
//! - [`Page`]: one markdown file, addressed by a cleaned relative URL
//!
//! URLs have the shape `/<link_base>/<language>/<entity-key>/[<version>/]<page>/`.
//! The version segment is omitted for the stable version.
//!
//! # Example
//!
//! ```
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! use dv_manifest::{EntityRegistration, Manifest, ManifestConfig, VersionStatus};
//! use dv_storage::FsStorage;
//!
//! let dir = std::env::temp_dir().join("dv-manifest-doc");
//! std::fs::create_dir_all(dir.join("2.4")).unwrap();
//! std::fs::write(dir.join("2.4/index.md"), "# Home").unwrap();
//!
//! let manifest = Manifest::new(
//!     Arc::new(FsStorage::new()),
//!     ManifestConfig {
//!         entities: vec![EntityRegistration {
//!             key: "testdocs".to_owned(),
//!             title: "Doc Test".to_owned(),
//!             path: dir,
//!             version: None,
//!             stable: false,
//!         }],
//!         ..ManifestConfig::default()
//!     },
//! );
//!
//! let found = manifest.get_page("/docs/en/testdocs/").unwrap();
//! assert_eq!(found.version(), "2.4");
//! assert_eq!(found.version_status(), Some(VersionStatus::Current));
//! ```

mod entity;
mod manifest;
pub mod metadata;
mod page;
pub mod path_helper;
mod scanner;
pub mod version;

pub use entity::{Entity, EntityLanguage, VersionRoot};
pub use manifest::{EntityRegistration, Manifest, ManifestConfig, ManifestState, PageMatch};
pub use page::{Page, PageOwner};
pub use scanner::ScanWarning;
pub use version::{VersionStatus, compare_versions};
