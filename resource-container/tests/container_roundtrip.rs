//! Integration tests for the container lifecycle and archive codec.
//!
//! These tests verify the complete flow across modules:
//! - create -> write chunks -> close (archive) -> open -> read
//! - loading hand-written manifests through the standard load path
//! - project addressing on single- and multi-project containers
//!
//! Run with: `cargo test --test container_roundtrip`

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use resource_container::{
    archive, create, load, ArchiveOptions, Checking, CompressionMethod, ContainerError,
    ContainerSpec, DublinCore, Language, Manifest, Project,
};

// ============================================================================
// Helper Functions
// ============================================================================

/// Build the manifest used by most fixtures, optionally with two projects.
fn book_manifest(multi: bool) -> Manifest {
    let mut manifest = Manifest {
        dublin_core: DublinCore {
            resource_type: "book".to_string(),
            conformsto: "rc0.2".to_string(),
            format: "text/usfm".to_string(),
            identifier: "en-ulb".to_string(),
            title: "Unlocked Literal Bible".to_string(),
            language: Language {
                identifier: "en".to_string(),
                title: "English".to_string(),
                direction: "ltr".to_string(),
            },
            rights: "CC BY-SA 4.0".to_string(),
            ..Default::default()
        },
        checking: Checking {
            checking_entity: vec!["Wycliffe Associates".to_string()],
            checking_level: "3".to_string(),
        },
        projects: vec![Project {
            identifier: "gen".to_string(),
            title: "Genesis".to_string(),
            versification: "kjv".to_string(),
            sort: 1,
            path: "./gen".to_string(),
            categories: vec!["bible-ot".to_string()],
        }],
    };
    if multi {
        manifest.projects.push(Project {
            identifier: "exo".to_string(),
            title: "Exodus".to_string(),
            versification: "kjv".to_string(),
            sort: 2,
            path: "./exo".to_string(),
            categories: vec!["bible-ot".to_string()],
        });
    }
    manifest
}

/// Write a complete expanded container to disk, chunk files included.
fn make_rc(dir: &Path, multi: bool) {
    let manifest = book_manifest(multi);
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join("manifest.yaml"),
        serde_yaml::to_string(&manifest).unwrap(),
    )
    .unwrap();

    for project in &manifest.projects {
        let content = dir.join(&project.path);
        fs::create_dir_all(content.join("01")).unwrap();
        fs::create_dir_all(content.join("02")).unwrap();
        let id = &project.identifier;
        fs::write(content.join("01/01.usfm"), format!("{} 1:1", id)).unwrap();
        fs::write(content.join("01/02.usfm"), format!("{} 1:2", id)).unwrap();
        fs::write(content.join("01/03.usfm"), format!("{} 1:3", id)).unwrap();
        fs::write(content.join("02/01.usfm"), format!("{} 2:1", id)).unwrap();
        fs::write(content.join("02/02.usfm"), format!("{} 2:2", id)).unwrap();
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn loads_a_single_book_container() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("container");
    make_rc(&dir, false);

    let container = load(&dir, true).unwrap();
    assert_eq!(container.path(), dir);
    assert_eq!(container.conforms_to(), Some("0.2".to_string()));
    assert_eq!(container.chapters(None).unwrap().len(), 2);
    assert_eq!(container.chunks(None, "01").unwrap().len(), 3);
    assert_eq!(container.chunks(None, "02").unwrap().len(), 2);
    assert_eq!(container.read_chunk(None, "01", "03").unwrap(), "gen 1:3");
}

#[test]
fn loads_a_multi_book_container() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("big_container");
    make_rc(&dir, true);

    let container = load(&dir, true).unwrap();
    assert_eq!(container.project_count(), 2);

    assert_eq!(container.chapters(Some("gen")).unwrap().len(), 2);
    assert_eq!(container.read_chunk(Some("gen"), "01", "03").unwrap(), "gen 1:3");
    assert_eq!(container.chapters(Some("exo")).unwrap().len(), 2);
    assert_eq!(container.read_chunk(Some("exo"), "01", "03").unwrap(), "exo 1:3");
}

#[test]
fn multi_project_addressing_requires_an_identifier() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("big_container");
    make_rc(&dir, true);

    let container = load(&dir, true).unwrap();
    assert!(matches!(
        container.chapters(None),
        Err(ContainerError::AmbiguousProject)
    ));
    assert!(matches!(
        container.chunks(None, "01"),
        Err(ContainerError::AmbiguousProject)
    ));
    assert!(matches!(
        container.read_chunk(None, "01", "01"),
        Err(ContainerError::AmbiguousProject)
    ));
    assert!(matches!(
        container.write_chunk(None, "01", "01", "test"),
        Err(ContainerError::AmbiguousProject)
    ));
}

#[test]
fn updates_a_container_in_place() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("updated");
    make_rc(&dir, false);

    let container = load(&dir, true).unwrap();
    container.write_chunk(None, "02", "03", "Hello world!").unwrap();
    container.write_chunk(None, "03", "01", "Hello world!").unwrap();

    assert_eq!(container.read_chunk(None, "02", "03").unwrap(), "Hello world!");
    assert_eq!(container.read_chunk(None, "03", "01").unwrap(), "Hello world!");

    container.write_chunk(None, "03", "01", "").unwrap();
    assert_eq!(container.read_chunk(None, "03", "01").unwrap(), "");
}

#[test]
fn creates_a_container_that_loads_back() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("new_rc");

    let manifest = Manifest {
        dublin_core: DublinCore {
            resource_type: "book".to_string(),
            format: "text/usfm".to_string(),
            identifier: "en-me".to_string(),
            language: Language {
                identifier: "en".to_string(),
                title: "English".to_string(),
                direction: "ltr".to_string(),
            },
            rights: "CC BY-SA 4.0".to_string(),
            ..Default::default()
        },
        ..Default::default()
    };

    let container = create(&dir, manifest).unwrap();
    assert_eq!(
        container.conforms_to(),
        Some(resource_container::SPEC_VERSION.to_string())
    );
    assert_eq!(container.resource_type(), "book");
}

// ============================================================================
// Archive round trips
// ============================================================================

async fn archive_round_trip(method: CompressionMethod) {
    let temp = TempDir::new().unwrap();
    let spec = ContainerSpec::default();
    let dir = temp.path().join("en_gen_ulb");
    make_rc(&dir, false);

    let container = load(&dir, true).unwrap();
    container
        .write_chunk(None, "50", "20", "And Joseph said")
        .unwrap();

    let opts = ArchiveOptions {
        compression_method: method,
        clean: true,
    };
    let archive_path = archive::close(&spec, &dir, &opts).await.unwrap();
    assert!(archive_path.exists());
    assert!(!dir.exists());

    let reopened_dir = temp.path().join("reopened");
    let reopened = archive::open(&spec, &archive_path, &reopened_dir, &opts)
        .await
        .unwrap();
    assert_eq!(
        reopened.read_chunk(None, "50", "20").unwrap(),
        "And Joseph said"
    );
    assert_eq!(reopened.read_chunk(None, "01", "03").unwrap(), "gen 1:3");
    assert_eq!(reopened.chapters(None).unwrap().len(), 3);
}

#[tokio::test]
async fn tar_archive_round_trip_preserves_chunks() {
    archive_round_trip(CompressionMethod::Tar).await;
}

#[tokio::test]
async fn zip_archive_round_trip_preserves_chunks() {
    archive_round_trip(CompressionMethod::Zip).await;
}

#[tokio::test]
async fn default_archive_extension_is_configurable() {
    let temp = TempDir::new().unwrap();
    let spec = ContainerSpec::new("0.2", "box");
    let dir = temp.path().join("en_gen_ulb");
    make_rc(&dir, false);

    let opts = ArchiveOptions {
        compression_method: CompressionMethod::Tar,
        clean: false,
    };
    let archive_path = archive::close(&spec, &dir, &opts).await.unwrap();
    assert_eq!(
        archive_path.file_name().unwrap().to_str().unwrap(),
        "en_gen_ulb.box"
    );
}
