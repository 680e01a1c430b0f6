//! Archive codec for resource containers.
//!
//! Moves a container between its expanded (queryable) directory form and a
//! single compressed distributable artifact. Two pipelines are supported:
//!
//! - **zip**: a plain zip of the container directory contents.
//! - **tar** (default): a tar of the directory, bzip2-compressed. Packing
//!   and compression are two separate phases joined by a scoped temporary
//!   `.tmp.tar` file which is removed whether or not the second phase
//!   succeeds. The phases are not atomic as a pair; a crash between them
//!   can orphan the temporary file.
//!
//! Bzip2 operates on the entire buffered tar, which bounds practical
//! container size to available memory.
//!
//! Container files sit at the archive root, so extraction lands them
//! directly in the destination directory.
//!
//! [`inspect`] peeks at a container's manifest without leaving the
//! container open.

mod error;

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::container::{Container, ContainerSpec, Manifest};

pub use error::{ArchiveError, ArchiveResult};

/// Compression pipeline used when packing or unpacking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompressionMethod {
    /// Plain zip archive.
    Zip,

    /// Bzip2-compressed tar archive.
    #[default]
    Tar,
}

/// Options for [`open`] and [`close`].
#[derive(Debug, Clone)]
pub struct ArchiveOptions {
    /// Compression pipeline to use.
    pub compression_method: CompressionMethod,

    /// Whether [`close`] removes the expanded directory after a
    /// successful archive write.
    pub clean: bool,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            compression_method: CompressionMethod::Tar,
            clean: true,
        }
    }
}

/// Open an archived resource container.
///
/// When `dest_dir` already holds an expanded container this short-circuits
/// to loading it; the archive is not touched. Otherwise the archive is
/// extracted into `dest_dir` using the configured pipeline and the result
/// is loaded strictly.
pub async fn open(
    spec: &ContainerSpec,
    archive_path: impl AsRef<Path>,
    dest_dir: impl AsRef<Path>,
    opts: &ArchiveOptions,
) -> ArchiveResult<Container> {
    let archive_path = archive_path.as_ref();
    let dest_dir = dest_dir.as_ref();

    if dest_dir.exists() {
        return Ok(spec.load(dest_dir, true)?);
    }
    if !archive_path.exists() {
        return Err(ArchiveError::MissingArchive(archive_path.to_path_buf()));
    }

    match opts.compression_method {
        CompressionMethod::Zip => unzip(archive_path, dest_dir)?,
        CompressionMethod::Tar => untar(archive_path, dest_dir).await?,
    }

    Ok(spec.load(dest_dir, true)?)
}

/// Close (archive) an expanded resource container.
///
/// The archive is written next to the directory as
/// `<dir>.<spec.file_ext>`. An already existing archive is kept as is.
/// With `opts.clean` the expanded directory is removed after the archive
/// is in place. Returns the archive path.
pub async fn close(
    spec: &ContainerSpec,
    dir: impl AsRef<Path>,
    opts: &ArchiveOptions,
) -> ArchiveResult<PathBuf> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Err(ArchiveError::MissingContainer(dir.to_path_buf()));
    }

    let archive_path = spec.archive_path(dir);
    if !archive_path.exists() {
        match opts.compression_method {
            CompressionMethod::Zip => zip_dir(dir, &archive_path)?,
            CompressionMethod::Tar => tar_dir(dir, &archive_path).await?,
        }
    }

    if opts.clean {
        tokio::fs::remove_dir_all(dir)
            .await
            .map_err(|e| ArchiveError::Io {
                path: dir.to_path_buf(),
                source: e,
            })?;
    }

    Ok(archive_path)
}

/// Read a container's manifest without leaving it open.
///
/// Works on packed archives and expanded directories alike; either way
/// the path must carry the spec's archive extension. A packed archive is
/// extracted next to itself, read, and closed again through [`close`], so
/// with `opts.clean` no expanded directory is left behind. An expanded
/// directory is simply loaded.
pub async fn inspect(
    spec: &ContainerSpec,
    container_path: impl AsRef<Path>,
    opts: &ArchiveOptions,
) -> ArchiveResult<Manifest> {
    let container_path = container_path.as_ref();
    let has_ext = container_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext == spec.file_ext);
    if !has_ext {
        return Err(ArchiveError::InvalidExtension {
            path: container_path.to_path_buf(),
            expected: spec.file_ext.clone(),
        });
    }

    let meta = tokio::fs::metadata(container_path)
        .await
        .map_err(|_| ArchiveError::MissingArchive(container_path.to_path_buf()))?;
    if !meta.is_file() {
        return Ok(spec.load(container_path, true)?.manifest().clone());
    }

    let dir = container_path.with_extension("");
    let container = open(spec, container_path, &dir, opts).await?;
    let manifest = container.manifest().clone();
    close(spec, &dir, opts).await?;
    Ok(manifest)
}

fn temp_tar_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.tmp.tar", path.display()))
}

/// Extract a zip archive into the destination directory.
fn unzip(archive_path: &Path, dest_dir: &Path) -> ArchiveResult<()> {
    debug!("extracting zip {}", archive_path.display());
    let file = File::open(archive_path).map_err(|e| ArchiveError::Io {
        path: archive_path.to_path_buf(),
        source: e,
    })?;
    let mut archive = ZipArchive::new(file).map_err(|e| ArchiveError::Zip {
        path: archive_path.to_path_buf(),
        source: e,
    })?;
    archive.extract(dest_dir).map_err(|e| ArchiveError::Zip {
        path: archive_path.to_path_buf(),
        source: e,
    })
}

/// Zip the contents of a directory into an archive.
fn zip_dir(source_dir: &Path, archive_path: &Path) -> ArchiveResult<()> {
    debug!(
        "zipping {} into {}",
        source_dir.display(),
        archive_path.display()
    );
    let file = File::create(archive_path).map_err(|e| ArchiveError::Io {
        path: archive_path.to_path_buf(),
        source: e,
    })?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    add_zip_entries(&mut writer, source_dir, "", &options, archive_path)?;

    writer.finish().map_err(|e| ArchiveError::Zip {
        path: archive_path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

fn add_zip_entries(
    writer: &mut ZipWriter<File>,
    dir: &Path,
    prefix: &str,
    options: &SimpleFileOptions,
    archive_path: &Path,
) -> ArchiveResult<()> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |e: std::io::Error| ArchiveError::Io { path, source: e }
    };
    let zip_err = |e: zip::result::ZipError| ArchiveError::Zip {
        path: archive_path.to_path_buf(),
        source: e,
    };

    let entries = std::fs::read_dir(dir).map_err(io_err(dir))?;
    for entry in entries {
        let entry = entry.map_err(io_err(dir))?;
        let path = entry.path();
        let name = if prefix.is_empty() {
            entry.file_name().to_string_lossy().into_owned()
        } else {
            format!("{}/{}", prefix, entry.file_name().to_string_lossy())
        };

        if path.is_dir() {
            writer
                .add_directory(format!("{}/", name), *options)
                .map_err(zip_err)?;
            add_zip_entries(writer, &path, &name, options, archive_path)?;
        } else {
            writer.start_file(name, *options).map_err(zip_err)?;
            let bytes = std::fs::read(&path).map_err(io_err(&path))?;
            writer.write_all(&bytes).map_err(io_err(&path))?;
        }
    }
    Ok(())
}

/// Unpack a bzip2-compressed tar archive into the destination directory.
///
/// Phase one decompresses the whole archive into a temporary tar file,
/// phase two stream-extracts that tar. The temporary file is removed
/// regardless of the extraction outcome.
async fn untar(archive_path: &Path, dest_dir: &Path) -> ArchiveResult<()> {
    let temp_path = temp_tar_path(archive_path);

    let result = match decompress_to_tar(archive_path, &temp_path).await {
        Ok(()) => unpack_tar(&temp_path, dest_dir),
        Err(err) => Err(err),
    };

    if tokio::fs::remove_file(&temp_path).await.is_ok() {
        debug!("removed temporary tar {}", temp_path.display());
    }
    result
}

async fn decompress_to_tar(archive_path: &Path, temp_path: &Path) -> ArchiveResult<()> {
    debug!("decompressing {}", archive_path.display());
    let compressed = tokio::fs::read(archive_path)
        .await
        .map_err(|e| ArchiveError::Io {
            path: archive_path.to_path_buf(),
            source: e,
        })?;

    let mut decoder = bzip2::read::BzDecoder::new(compressed.as_slice());
    let mut tar_bytes = Vec::new();
    decoder
        .read_to_end(&mut tar_bytes)
        .map_err(|e| ArchiveError::Io {
            path: archive_path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::write(temp_path, tar_bytes)
        .await
        .map_err(|e| ArchiveError::Io {
            path: temp_path.to_path_buf(),
            source: e,
        })
}

fn unpack_tar(temp_path: &Path, dest_dir: &Path) -> ArchiveResult<()> {
    debug!("unpacking tar into {}", dest_dir.display());
    let file = File::open(temp_path).map_err(|e| ArchiveError::Io {
        path: temp_path.to_path_buf(),
        source: e,
    })?;
    let mut archive = tar::Archive::new(file);
    archive.unpack(dest_dir).map_err(|e| ArchiveError::Io {
        path: dest_dir.to_path_buf(),
        source: e,
    })
}

/// Pack a directory into a bzip2-compressed tar archive.
///
/// Phase one stream-tars the directory into a temporary file, phase two
/// bzip2-compresses that file's full bytes into the destination. The
/// temporary file is removed on both the success and failure path.
async fn tar_dir(source_dir: &Path, archive_path: &Path) -> ArchiveResult<()> {
    let temp_path = temp_tar_path(archive_path);

    let result = match pack_tar(source_dir, &temp_path) {
        Ok(()) => compress_tar(&temp_path, archive_path).await,
        Err(err) => Err(err),
    };

    if tokio::fs::remove_file(&temp_path).await.is_ok() {
        debug!("removed temporary tar {}", temp_path.display());
    }
    result
}

fn pack_tar(source_dir: &Path, temp_path: &Path) -> ArchiveResult<()> {
    debug!(
        "packing {} into {}",
        source_dir.display(),
        temp_path.display()
    );
    let file = File::create(temp_path).map_err(|e| ArchiveError::Io {
        path: temp_path.to_path_buf(),
        source: e,
    })?;
    let mut builder = tar::Builder::new(file);
    builder
        .append_dir_all(".", source_dir)
        .map_err(|e| ArchiveError::Io {
            path: source_dir.to_path_buf(),
            source: e,
        })?;
    builder
        .into_inner()
        .and_then(|mut f| f.flush())
        .map_err(|e| ArchiveError::Io {
            path: temp_path.to_path_buf(),
            source: e,
        })?;
    Ok(())
}

async fn compress_tar(temp_path: &Path, archive_path: &Path) -> ArchiveResult<()> {
    debug!("compressing into {}", archive_path.display());
    let tar_bytes = tokio::fs::read(temp_path)
        .await
        .map_err(|e| ArchiveError::Io {
            path: temp_path.to_path_buf(),
            source: e,
        })?;

    let mut encoder = bzip2::read::BzEncoder::new(tar_bytes.as_slice(), bzip2::Compression::best());
    let mut compressed = Vec::new();
    encoder
        .read_to_end(&mut compressed)
        .map_err(|e| ArchiveError::Io {
            path: archive_path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::write(archive_path, compressed)
        .await
        .map_err(|e| ArchiveError::Io {
            path: archive_path.to_path_buf(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{create, Checking, DublinCore, Language, Manifest, Project};
    use tempfile::TempDir;

    fn book_manifest() -> Manifest {
        Manifest {
            dublin_core: DublinCore {
                resource_type: "book".to_string(),
                format: "text/usfm".to_string(),
                identifier: "en-ulb".to_string(),
                language: Language {
                    identifier: "en".to_string(),
                    title: "English".to_string(),
                    direction: "ltr".to_string(),
                },
                rights: "CC BY-SA 4.0".to_string(),
                ..Default::default()
            },
            checking: Checking::default(),
            projects: vec![Project {
                identifier: "gen".to_string(),
                title: "Genesis".to_string(),
                path: "./gen".to_string(),
                sort: 1,
                ..Default::default()
            }],
        }
    }

    fn make_container(dir: &Path) {
        let container = create(dir, book_manifest()).unwrap();
        container.write_chunk(None, "01", "01", "gen 1:1").unwrap();
        container.write_chunk(None, "01", "02", "gen 1:2").unwrap();
    }

    async fn round_trip(method: CompressionMethod) {
        let temp = TempDir::new().unwrap();
        let spec = ContainerSpec::default();
        let dir = temp.path().join("en_gen_ulb");
        make_container(&dir);

        let opts = ArchiveOptions {
            compression_method: method,
            clean: true,
        };
        let archive_path = close(&spec, &dir, &opts).await.unwrap();
        assert!(archive_path.exists());
        assert!(!dir.exists(), "clean should remove the expanded directory");
        assert!(
            !temp_tar_path(&archive_path).exists(),
            "temporary tar must not survive"
        );

        let fresh = temp.path().join("reopened");
        let container = open(&spec, &archive_path, &fresh, &opts).await.unwrap();
        assert_eq!(container.read_chunk(None, "01", "01").unwrap(), "gen 1:1");
        assert_eq!(container.read_chunk(None, "01", "02").unwrap(), "gen 1:2");
        assert!(!temp_tar_path(&archive_path).exists());
    }

    #[tokio::test]
    async fn test_tar_round_trip() {
        round_trip(CompressionMethod::Tar).await;
    }

    #[tokio::test]
    async fn test_zip_round_trip() {
        round_trip(CompressionMethod::Zip).await;
    }

    #[tokio::test]
    async fn test_open_missing_archive_fails() {
        let temp = TempDir::new().unwrap();
        let spec = ContainerSpec::default();

        let result = open(
            &spec,
            temp.path().join("missing.tsrc"),
            temp.path().join("dest"),
            &ArchiveOptions::default(),
        )
        .await;
        assert!(matches!(result, Err(ArchiveError::MissingArchive(_))));
    }

    #[tokio::test]
    async fn test_open_short_circuits_to_expanded_container() {
        let temp = TempDir::new().unwrap();
        let spec = ContainerSpec::default();
        let dir = temp.path().join("en_gen_ulb");
        make_container(&dir);

        // the archive does not exist, but the expanded directory does
        let container = open(
            &spec,
            temp.path().join("en_gen_ulb.tsrc"),
            &dir,
            &ArchiveOptions::default(),
        )
        .await
        .unwrap();
        assert_eq!(container.read_chunk(None, "01", "01").unwrap(), "gen 1:1");
    }

    #[tokio::test]
    async fn test_close_missing_container_fails() {
        let temp = TempDir::new().unwrap();
        let spec = ContainerSpec::default();

        let result = close(&spec, temp.path().join("missing"), &ArchiveOptions::default()).await;
        assert!(matches!(result, Err(ArchiveError::MissingContainer(_))));
    }

    #[tokio::test]
    async fn test_close_without_clean_keeps_directory() {
        let temp = TempDir::new().unwrap();
        let spec = ContainerSpec::default();
        let dir = temp.path().join("en_gen_ulb");
        make_container(&dir);

        let opts = ArchiveOptions {
            compression_method: CompressionMethod::Tar,
            clean: false,
        };
        let archive_path = close(&spec, &dir, &opts).await.unwrap();
        assert!(archive_path.exists());
        assert!(dir.exists());
    }

    #[tokio::test]
    async fn test_close_keeps_existing_archive() {
        let temp = TempDir::new().unwrap();
        let spec = ContainerSpec::default();
        let dir = temp.path().join("en_gen_ulb");
        make_container(&dir);

        let archive_path = spec.archive_path(&dir);
        std::fs::write(&archive_path, b"sentinel").unwrap();

        let opts = ArchiveOptions {
            compression_method: CompressionMethod::Tar,
            clean: false,
        };
        let reported = close(&spec, &dir, &opts).await.unwrap();
        assert_eq!(reported, archive_path);
        assert_eq!(std::fs::read(&archive_path).unwrap(), b"sentinel");
    }

    #[tokio::test]
    async fn test_inspect_reads_manifest_from_archive() {
        let temp = TempDir::new().unwrap();
        let spec = ContainerSpec::default();
        let dir = temp.path().join("en_gen_ulb");
        make_container(&dir);

        let opts = ArchiveOptions::default();
        let archive_path = close(&spec, &dir, &opts).await.unwrap();
        assert!(!dir.exists());

        let manifest = inspect(&spec, &archive_path, &opts).await.unwrap();
        assert_eq!(manifest.dublin_core.identifier, "en-ulb");
        assert_eq!(manifest.projects[0].identifier, "gen");

        // the archive stays packed and no expanded directory survives
        assert!(archive_path.exists());
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_inspect_rejects_foreign_extension() {
        let temp = TempDir::new().unwrap();
        let spec = ContainerSpec::default();
        let path = temp.path().join("en_gen_ulb.zip");
        std::fs::write(&path, b"not ours").unwrap();

        let result = inspect(&spec, &path, &ArchiveOptions::default()).await;
        assert!(matches!(result, Err(ArchiveError::InvalidExtension { .. })));
    }

    #[tokio::test]
    async fn test_inspect_missing_archive_fails() {
        let temp = TempDir::new().unwrap();
        let spec = ContainerSpec::default();

        let result = inspect(
            &spec,
            temp.path().join("missing.tsrc"),
            &ArchiveOptions::default(),
        )
        .await;
        assert!(matches!(result, Err(ArchiveError::MissingArchive(_))));
    }

    #[test]
    fn test_default_options() {
        let opts = ArchiveOptions::default();
        assert_eq!(opts.compression_method, CompressionMethod::Tar);
        assert!(opts.clean);
    }
}
