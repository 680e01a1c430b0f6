//! Legacy resource converter.
//!
//! Ingests the six structurally different legacy JSON schemas and emits a
//! new, valid resource container tree. Dispatch is driven by the resource
//! descriptors in [`ResourceProps`]:
//!
//! | type   | slug | converter               |
//! |--------|------|-------------------------|
//! | `book` | any  | book (USX or markdown)  |
//! | `help` | `tn` | translation notes       |
//! | `help` | `tq` | translation questions   |
//! | `dict` | any  | dictionary              |
//! | `man`  | any  | manual                  |
//!
//! The converter drives the container lifecycle: the manifest is written
//! through [`ContainerSpec::create`] and the finished tree is re-loaded
//! through the standard strict `load` path, so conversion output always
//! satisfies the same validation the loader enforces. On any failure the
//! partially written destination is removed before the error propagates.

mod book;
mod dictionary;
mod error;
mod helps;
mod manual;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::container::{
    ext_for_format, Checking, Container, ContainerSpec, DublinCore, Language, Manifest, Project,
};

pub use error::{ConvertError, ConvertResult};

/// Descriptive properties of a legacy resource to convert.
///
/// `language`, `project`, `resource` and `resource.type` are required;
/// everything else is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResourceProps {
    pub language: Option<LanguageProps>,
    pub project: Option<ProjectProps>,
    pub resource: Option<ResourceInfo>,

    /// Modification timestamp recorded in the manifest (`YYYY-MM-DD`).
    pub modified_at: Option<String>,

    /// Word assignments keyed by chapter slug, then chunk slug.
    pub tw_assignments: Option<HashMap<String, HashMap<String, Vec<String>>>>,
}

/// Language descriptor of a legacy resource.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LanguageProps {
    pub slug: String,
    pub name: String,
    pub dir: String,
}

/// Project descriptor of a legacy resource.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectProps {
    pub slug: String,
    pub name: String,
    pub sort: i64,
    pub categories: Vec<String>,
}

/// Resource descriptor of a legacy resource.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResourceInfo {
    pub slug: String,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub status: ResourceStatus,
}

/// Publication status block of a legacy resource descriptor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResourceStatus {
    pub license: String,
    pub version: String,
    pub checking_entity: Vec<String>,
    pub checking_level: String,
}

/// A single table-of-contents entry accumulated during conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TocEntry {
    pub chapter: String,
    pub chunks: Vec<String>,
}

/// The legacy schema family a resource belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResourceKind {
    Book,
    HelpNotes,
    HelpQuestions,
    Dictionary,
    Manual,
}

impl ResourceKind {
    fn resolve(resource: &ResourceInfo) -> ConvertResult<Self> {
        match resource.resource_type.as_str() {
            "book" => Ok(ResourceKind::Book),
            "help" => match resource.slug.as_str() {
                "tn" => Ok(ResourceKind::HelpNotes),
                "tq" => Ok(ResourceKind::HelpQuestions),
                other => Err(ConvertError::UnsupportedType(format!("help/{}", other))),
            },
            "dict" => Ok(ResourceKind::Dictionary),
            "man" => Ok(ResourceKind::Manual),
            other => Err(ConvertError::UnsupportedType(other.to_string())),
        }
    }

    /// Helps and dictionaries carry no translatable title.
    fn has_front_matter(self) -> bool {
        matches!(self, ResourceKind::Book | ResourceKind::Manual)
    }
}

/// Shared state handed to the per-schema converters.
struct ConvertContext<'a> {
    spec: &'a ContainerSpec,
    dest: &'a Path,
    content_dir: PathBuf,
    ext: &'static str,
    language: LanguageProps,
    project: ProjectProps,
    resource: ResourceInfo,
    modified_at: Option<String>,
    tw_assignments: Option<HashMap<String, HashMap<String, Vec<String>>>>,
    kind: ResourceKind,
}

impl ConvertContext<'_> {
    fn manifest(&self, format: &str) -> Manifest {
        Manifest {
            dublin_core: DublinCore {
                resource_type: self.resource.resource_type.clone(),
                format: format.to_string(),
                identifier: self.resource.slug.clone(),
                title: self.resource.name.clone(),
                language: Language {
                    identifier: self.language.slug.clone(),
                    title: self.language.name.clone(),
                    direction: self.language.dir.clone(),
                },
                rights: self.resource.status.license.clone(),
                version: self.resource.status.version.clone(),
                modified: self.modified_at.clone().unwrap_or_default(),
                ..Default::default()
            },
            checking: Checking {
                checking_entity: self.resource.status.checking_entity.clone(),
                checking_level: self.resource.status.checking_level.clone(),
            },
            projects: vec![Project {
                identifier: self.project.slug.clone(),
                title: self.project.name.clone(),
                sort: self.project.sort,
                path: "./content".to_string(),
                categories: self.project.categories.clone(),
                ..Default::default()
            }],
        }
    }

    /// Words assigned to a chunk, if any.
    fn words_for(&self, chapter: &str, chunk: &str) -> Option<Vec<String>> {
        self.tw_assignments.as_ref()?.get(chapter)?.get(chunk).cloned()
    }
}

/// Convert a legacy resource into a resource container.
///
/// `data` is the raw legacy JSON payload; `props` describes the resource.
/// An existing packed archive at the destination is an error; an existing
/// expanded directory is removed first, making regeneration idempotent.
/// Returns the converted container, loaded through the strict `load` path.
pub async fn convert_resource(
    spec: &ContainerSpec,
    data: &str,
    dest_dir: impl AsRef<Path>,
    props: ResourceProps,
) -> ConvertResult<Container> {
    let dest = dest_dir.as_ref();

    let language = props
        .language
        .ok_or(ConvertError::MissingParameters("language"))?;
    let project = props
        .project
        .ok_or(ConvertError::MissingParameters("project"))?;
    let resource = props
        .resource
        .ok_or(ConvertError::MissingParameters("resource"))?;
    if resource.resource_type.is_empty() {
        return Err(ConvertError::MissingParameters("resource.type"));
    }
    let kind = ResourceKind::resolve(&resource)?;

    let archive_path = spec.archive_path(dest);
    if archive_path.exists() {
        return Err(ConvertError::AlreadyExists(archive_path));
    }
    if dest.exists() {
        // regeneration: a previously opened container is replaced
        tokio::fs::remove_dir_all(dest)
            .await
            .map_err(|e| ConvertError::Io {
                path: dest.to_path_buf(),
                source: e,
            })?;
    }

    // the old book content was distributed as USX
    let format = if kind == ResourceKind::Book && project.slug != "obs" {
        "text/usx"
    } else {
        "text/markdown"
    };

    let ctx = ConvertContext {
        spec,
        dest,
        content_dir: dest.join("content"),
        ext: ext_for_format(format),
        language,
        project,
        resource,
        modified_at: props.modified_at,
        tw_assignments: props.tw_assignments,
        kind,
    };

    match build_container(&ctx, data, format).await {
        Ok(container) => {
            info!(
                "converted {} resource into {}",
                ctx.resource.resource_type,
                dest.display()
            );
            Ok(container)
        }
        Err(err) => {
            // no partial containers persist
            let _ = tokio::fs::remove_dir_all(dest).await;
            Err(err)
        }
    }
}

async fn build_container(
    ctx: &ConvertContext<'_>,
    data: &str,
    format: &str,
) -> ConvertResult<Container> {
    ctx.spec.create(ctx.dest, ctx.manifest(format))?;

    let license_path = ctx.dest.join("LICENSE.md");
    tokio::fs::write(&license_path, &ctx.resource.status.license)
        .await
        .map_err(|e| ConvertError::Io {
            path: license_path,
            source: e,
        })?;

    tokio::fs::create_dir_all(&ctx.content_dir)
        .await
        .map_err(|e| ConvertError::Io {
            path: ctx.content_dir.clone(),
            source: e,
        })?;

    let mut toc: Vec<TocEntry> = Vec::new();
    if ctx.kind.has_front_matter() {
        let front_dir = ctx.content_dir.join("front");
        write_chunk_file(&front_dir, "title", ctx.ext, ctx.project.name.trim()).await?;
        toc.push(TocEntry {
            chapter: "front".to_string(),
            chunks: vec!["title".to_string()],
        });
    }

    let config = match ctx.kind {
        ResourceKind::Book => book::convert(ctx, data, &mut toc).await?,
        ResourceKind::HelpNotes => helps::convert_notes(ctx, data).await?,
        ResourceKind::HelpQuestions => helps::convert_questions(ctx, data).await?,
        ResourceKind::Dictionary => dictionary::convert(ctx, data).await?,
        ResourceKind::Manual => manual::convert(ctx, data, &mut toc).await?,
    };

    write_yaml_file(&ctx.content_dir.join(crate::container::CONFIG_FILENAME), &config).await?;
    write_yaml_file(&ctx.content_dir.join(crate::container::TOC_FILENAME), &toc).await?;

    Ok(ctx.spec.load(ctx.dest, true)?)
}

/// Write a chunk file, creating the chapter directory as needed.
async fn write_chunk_file(dir: &Path, slug: &str, ext: &str, content: &str) -> ConvertResult<()> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| ConvertError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;
    let path = dir.join(format!("{}.{}", slug, ext));
    tokio::fs::write(&path, content)
        .await
        .map_err(|e| ConvertError::Io { path, source: e })
}

async fn write_yaml_file<T: Serialize>(path: &Path, value: &T) -> ConvertResult<()> {
    let text = serde_yaml::to_string(value)?;
    tokio::fs::write(path, text)
        .await
        .map_err(|e| ConvertError::Io {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Split a compound `chapter-chunk` identifier into its two segments.
///
/// Returns `None` unless the identifier has exactly two segments.
fn split_compound_id(id: &str) -> Option<(&str, &str)> {
    let mut parts = id.split('-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(chapter), Some(chunk), None) => Some((chapter, chunk)),
        _ => None,
    }
}
