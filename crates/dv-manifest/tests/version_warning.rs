//! Stable, outdated and future versions of one entity registered from three
//! separate trees.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use dv_manifest::{EntityRegistration, Manifest, ManifestConfig, VersionStatus};
use dv_storage::FsStorage;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn registration(root: &Path, dir: &str, version: &str, stable: bool) -> EntityRegistration {
    EntityRegistration {
        key: "testdocs".to_owned(),
        title: "Doc Test".to_owned(),
        path: root.join(dir),
        version: Some(version.to_owned()),
        stable,
    }
}

fn setup() -> (TempDir, Manifest) {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    for dir in ["docs", "docs-v2.4", "docs-v3.0"] {
        write(&root.join(dir).join("index.md"), "# Doc Test\n");
        write(&root.join(dir).join("test.md"), "title: Test Page\n\nBody\n");
    }
    write(&root.join("docs/sort/basic.md"), "# Basic\n");

    let manifest = Manifest::new(
        Arc::new(FsStorage::new()),
        ManifestConfig {
            entities: vec![
                registration(root, "docs", "2.3", false),
                registration(root, "docs-v2.4", "2.4", true),
                registration(root, "docs-v3.0", "3.0", false),
            ],
            link_base: "dev/docs".to_owned(),
            ..ManifestConfig::default()
        },
    );
    (temp, manifest)
}

#[test]
fn test_stable_version_is_current() {
    let (_temp, manifest) = setup();

    let found = manifest.get_page("en/testdocs/").unwrap();

    assert_eq!(found.version(), "2.4");
    assert!(!found.is_explicit_version());
    assert_eq!(found.version_status(), Some(VersionStatus::Current));
    assert_eq!(found.link(), "/dev/docs/en/testdocs/");
}

#[test]
fn test_older_version_is_outdated() {
    let (_temp, manifest) = setup();

    let found = manifest.get_page("en/testdocs/2.3/").unwrap();

    assert_eq!(found.version(), "2.3");
    assert!(found.is_explicit_version());
    assert_eq!(found.version_status(), Some(VersionStatus::Outdated));
    assert_eq!(found.link(), "/dev/docs/en/testdocs/2.3/");
}

#[test]
fn test_newer_version_is_future() {
    let (_temp, manifest) = setup();

    let found = manifest.get_page("/dev/docs/en/testdocs/3.0/test/").unwrap();

    assert_eq!(found.version_status(), Some(VersionStatus::Future));
    assert_eq!(found.link(), "/dev/docs/en/testdocs/3.0/test/");
}

#[test]
fn test_explicit_stable_version_resolves() {
    let (_temp, manifest) = setup();

    let found = manifest.get_page("en/testdocs/2.4/test/").unwrap();

    assert_eq!(found.version_status(), Some(VersionStatus::Current));
    assert_eq!(found.link(), "/dev/docs/en/testdocs/test/");
}

#[test]
fn test_pages_only_in_older_version() {
    let (_temp, manifest) = setup();

    assert!(manifest.get_page("en/testdocs/sort/basic/").is_none());
    assert!(manifest.get_page("en/testdocs/2.3/sort/basic/").is_some());
}

#[test]
fn test_entity_versions_sorted_with_stable_flag() {
    let (_temp, manifest) = setup();

    let state = manifest.state();
    let entity = state.entity("testdocs").unwrap();

    assert_eq!(entity.versions(), ["2.3", "2.4", "3.0"]);
    assert_eq!(entity.stable_version(), "2.4");
    assert!(entity.is_stable("2.4"));
    assert!(state.warnings().is_empty());
}

#[test]
fn test_metadata_title_after_reading() {
    let (_temp, manifest) = setup();
    let storage = Arc::clone(manifest.storage());

    let mut found = manifest.get_page("en/testdocs/test/").unwrap();
    assert_eq!(found.page().title(), "Test");

    let body = found.markdown(storage.as_ref(), true).unwrap();

    assert_eq!(body, "Body\n");
    assert_eq!(found.page().title(), "Test Page");
    assert_eq!(found.breadcrumb_title(" - "), "Doc Test - Test - Test Page");
}
