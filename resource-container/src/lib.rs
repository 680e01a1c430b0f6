//! Resource container toolkit for chunked translation content.
//!
//! A resource container is a portable, versioned package of hierarchical
//! text content (Bible books and translation helps), exchanged between
//! systems as plain directories or compressed archives without any server
//! component. This library provides the container entity and addressing,
//! the lifecycle (load/create), the archive codec, and the legacy format
//! converter.
//!
//! # Overview
//!
//! - [`container`] - the [`Container`] entity (project/chapter/chunk
//!   addressing, chunk and sidecar I/O), the [`Manifest`] schema, and the
//!   lifecycle driven by an injected [`ContainerSpec`].
//! - [`archive`] - moves containers between expanded directory form and a
//!   single compressed artifact (zip, or tar+bzip2 by default).
//! - [`convert`] - ingests legacy JSON resources and emits valid
//!   containers.
//! - [`naming`] - slug normalization, localized chapter titles and mime
//!   type mapping used throughout.
//!
//! Cheap metadata operations are blocking; bulk writes (conversion,
//! archiving) are async. The library assumes a single writer per
//! container directory and performs no locking.
//!
//! # Example
//!
//! ```no_run
//! use resource_container::load;
//!
//! # fn main() -> Result<(), resource_container::ContainerError> {
//! let container = load("/path/to/en_gen_ulb", true)?;
//! for chapter in container.chapters(None)? {
//!     println!("{}: {:?}", chapter, container.chunks(None, &chapter)?);
//! }
//! let text = container.read_chunk(None, "01", "01")?;
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod container;
pub mod convert;
pub mod naming;

pub use container::{
    create, load, Checking, Container, ContainerError, ContainerResult, ContainerSpec, DublinCore,
    Language, Manifest, Project, SourceRef, ARCHIVE_EXT, MANIFEST_FILENAME, SPEC_VERSION,
};

pub use archive::{ArchiveError, ArchiveOptions, ArchiveResult, CompressionMethod};

pub use convert::{
    convert_resource, ConvertError, ConvertResult, LanguageProps, ProjectProps, ResourceInfo,
    ResourceProps, ResourceStatus,
};

pub use naming::{
    container_slug, localize_chapter_title, mime_to_type, normalize_slug, type_to_mime, SlugError,
};
