//! The container entity: addressing, chunk I/O and sidecar documents.
//!
//! A [`Container`] is a directory plus its parsed manifest. The manifest is
//! read once when the container is constructed; chunk content is never
//! cached, so every read and write goes straight to the backing store.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::warn;

use super::error::{ContainerError, ContainerResult};
use super::manifest::{Language, Manifest, Project};

/// File name of a project's configuration sidecar.
pub const CONFIG_FILENAME: &str = "config.yml";

/// File name of a project's table-of-contents sidecar.
pub const TOC_FILENAME: &str = "toc.yml";

/// An expanded resource container on disk.
///
/// Obtained from [`load`](crate::container::load),
/// [`create`](crate::container::create) or
/// [`archive::open`](crate::archive::open). Addressing follows the
/// project -> chapter -> chunk hierarchy declared by the manifest.
///
/// Every addressing and I/O operation takes an optional project
/// identifier. When the container holds exactly one project the
/// identifier may be omitted; with multiple projects an omitted
/// identifier is an [`ContainerError::AmbiguousProject`] error.
#[derive(Debug, Clone)]
pub struct Container {
    dir: PathBuf,
    manifest: Manifest,
}

impl Container {
    pub(crate) fn new(dir: PathBuf, manifest: Manifest) -> Self {
        Self { dir, manifest }
    }

    /// Path to the container directory.
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// The parsed container manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// The language block of the manifest.
    pub fn language(&self) -> &Language {
        &self.manifest.dublin_core.language
    }

    /// Convenience accessor for the container type, e.g. `book`.
    pub fn resource_type(&self) -> &str {
        &self.manifest.dublin_core.resource_type
    }

    /// The file extension used for chunks, derived from the content format.
    pub fn chunk_ext(&self) -> &'static str {
        self.manifest.dublin_core.chunk_ext()
    }

    /// The spec version this container conforms to, without the `rc` prefix.
    pub fn conforms_to(&self) -> Option<String> {
        self.manifest.dublin_core.conforms_to()
    }

    /// Identifiers of all projects in this container, in manifest order.
    pub fn project_ids(&self) -> Vec<String> {
        self.manifest
            .projects
            .iter()
            .map(|p| p.identifier.clone())
            .collect()
    }

    /// Number of projects in this container.
    pub fn project_count(&self) -> usize {
        self.manifest.projects.len()
    }

    /// Resolve a project.
    ///
    /// With an identifier, returns the matching project or `None`. Without
    /// one: a single-project container resolves to its project, an empty
    /// container to `None`, and a multi-project container fails with
    /// [`ContainerError::AmbiguousProject`].
    pub fn project(&self, identifier: Option<&str>) -> ContainerResult<Option<&Project>> {
        match identifier {
            Some(id) => Ok(self.manifest.projects.iter().find(|p| p.identifier == id)),
            None => match self.manifest.projects.len() {
                0 => Ok(None),
                1 => Ok(Some(&self.manifest.projects[0])),
                _ => Err(ContainerError::AmbiguousProject),
            },
        }
    }

    fn project_dir(&self, project: &Project) -> PathBuf {
        self.dir.join(&project.path)
    }

    /// List the chapter identifiers of a project, sorted.
    ///
    /// Returns an empty list when the project cannot be resolved or its
    /// content directory does not exist. Entries that fail the
    /// directory-type check are logged and excluded.
    pub fn chapters(&self, project: Option<&str>) -> ContainerResult<Vec<String>> {
        let Some(p) = self.project(project)? else {
            return Ok(Vec::new());
        };
        Ok(list_entries(&self.project_dir(p), EntryKind::Directory))
    }

    /// List the chunk file names of a chapter, sorted.
    ///
    /// Names are returned as stored, extension included. The same tolerant
    /// filtering as [`chapters`](Self::chapters) applies, restricted to
    /// file-type entries.
    pub fn chunks(&self, project: Option<&str>, chapter: &str) -> ContainerResult<Vec<String>> {
        let Some(p) = self.project(project)? else {
            return Ok(Vec::new());
        };
        Ok(list_entries(
            &self.project_dir(p).join(chapter),
            EntryKind::File,
        ))
    }

    fn chunk_path(&self, project: &Project, chapter: &str, chunk: &str) -> PathBuf {
        self.project_dir(project)
            .join(chapter)
            .join(format!("{}.{}", chunk, self.chunk_ext()))
    }

    /// Read the contents of a chunk.
    ///
    /// Returns an empty string when the chunk does not exist or cannot be
    /// read; absence is not an error.
    pub fn read_chunk(
        &self,
        project: Option<&str>,
        chapter: &str,
        chunk: &str,
    ) -> ContainerResult<String> {
        let Some(p) = self.project(project)? else {
            return Ok(String::new());
        };
        let file = self.chunk_path(p, chapter, chunk);
        match fs::read_to_string(&file) {
            Ok(content) => Ok(content),
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("failed to read chunk {}: {}", file.display(), err);
                }
                Ok(String::new())
            }
        }
    }

    /// Write content to a chunk, creating parent directories as needed.
    ///
    /// Empty content deletes the chunk file if it exists. Non-empty content
    /// overwrites unconditionally.
    pub fn write_chunk(
        &self,
        project: Option<&str>,
        chapter: &str,
        chunk: &str,
        content: &str,
    ) -> ContainerResult<()> {
        let Some(p) = self.project(project)? else {
            return Ok(());
        };
        let file = self.chunk_path(p, chapter, chunk);

        if content.is_empty() {
            if file.exists() {
                fs::remove_file(&file).map_err(|e| ContainerError::RemoveFailed {
                    path: file.clone(),
                    source: e,
                })?;
            }
            return Ok(());
        }

        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).map_err(|e| ContainerError::CreateDirectoryFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        fs::write(&file, content).map_err(|e| ContainerError::WriteFailed {
            path: file.clone(),
            source: e,
        })
    }

    /// Read a project's configuration sidecar.
    ///
    /// Returns `None` when the file is absent or cannot be parsed.
    pub fn config(&self, project: Option<&str>) -> ContainerResult<Option<Value>> {
        self.read_sidecar(project, CONFIG_FILENAME)
    }

    /// Read a project's table-of-contents sidecar.
    ///
    /// Returns `None` when the file is absent or cannot be parsed.
    pub fn toc(&self, project: Option<&str>) -> ContainerResult<Option<Value>> {
        self.read_sidecar(project, TOC_FILENAME)
    }

    /// Write a project's configuration sidecar.
    ///
    /// `None` deletes the sidecar. `Some` fully replaces the existing
    /// document; content is never merged.
    pub fn write_config(
        &self,
        project: Option<&str>,
        content: Option<&Value>,
    ) -> ContainerResult<()> {
        self.write_sidecar(project, CONFIG_FILENAME, content)
    }

    /// Write a project's table-of-contents sidecar.
    ///
    /// `None` deletes the sidecar. `Some` fully replaces the existing
    /// document; content is never merged.
    pub fn write_toc(&self, project: Option<&str>, content: Option<&Value>) -> ContainerResult<()> {
        self.write_sidecar(project, TOC_FILENAME, content)
    }

    fn read_sidecar(&self, project: Option<&str>, filename: &str) -> ContainerResult<Option<Value>> {
        let Some(p) = self.project(project)? else {
            return Ok(None);
        };
        let file = self.project_dir(p).join(filename);
        let text = match fs::read_to_string(&file) {
            Ok(text) => text,
            Err(_) => return Ok(None),
        };
        match serde_yaml::from_str(&text) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!("failed to parse {}: {}", file.display(), err);
                Ok(None)
            }
        }
    }

    fn write_sidecar(
        &self,
        project: Option<&str>,
        filename: &str,
        content: Option<&Value>,
    ) -> ContainerResult<()> {
        let Some(p) = self.project(project)? else {
            return Ok(());
        };
        let file = self.project_dir(p).join(filename);

        let Some(value) = content else {
            if file.exists() {
                fs::remove_file(&file).map_err(|e| ContainerError::RemoveFailed {
                    path: file.clone(),
                    source: e,
                })?;
            }
            return Ok(());
        };

        let text = serde_yaml::to_string(value).map_err(|e| ContainerError::Yaml {
            path: file.clone(),
            source: e,
        })?;
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).map_err(|e| ContainerError::CreateDirectoryFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        fs::write(&file, text).map_err(|e| ContainerError::WriteFailed {
            path: file.clone(),
            source: e,
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Directory,
    File,
}

/// List entry names of the wanted kind under `dir`, sorted.
///
/// A missing directory yields an empty list. Entries whose type cannot be
/// determined are logged and excluded.
fn list_entries(dir: &Path, kind: EntryKind) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("failed to list entry in {}: {}", dir.display(), err);
                continue;
            }
        };
        match entry.file_type() {
            Ok(file_type) => {
                let keep = match kind {
                    EntryKind::Directory => file_type.is_dir(),
                    EntryKind::File => file_type.is_file(),
                };
                if keep {
                    names.push(entry.file_name().to_string_lossy().into_owned());
                }
            }
            Err(err) => {
                warn!("failed to stat {}: {}", entry.path().display(), err);
            }
        }
    }
    names.sort();
    names
}
