//! Resource container entity and lifecycle.
//!
//! An expanded resource container is a directory with this layout:
//!
//! ```text
//! root/
//! ├── manifest.yaml            container manifest (see [`Manifest`])
//! ├── LICENSE.md               license text (converter output)
//! └── <project.path>/          one subtree per manifest project
//!     ├── config.yml           optional configuration sidecar
//!     ├── toc.yml              optional table-of-contents sidecar
//!     └── <chapter>/           chapter directory
//!         └── <chunk>.<ext>    chunk text file
//! ```
//!
//! [`load`] reads an existing container, [`create`] bootstraps a new one,
//! and [`Container`] provides project/chapter/chunk addressing on top.
//! Which spec generation is enforced is decided by the injected
//! [`ContainerSpec`].

mod core;
mod error;
mod lifecycle;
mod manifest;

pub use self::core::{Container, CONFIG_FILENAME, TOC_FILENAME};
pub use error::{ContainerError, ContainerResult};
pub use lifecycle::{create, load, ContainerSpec, ARCHIVE_EXT, SPEC_VERSION};
pub use manifest::{
    ext_for_format, Checking, DublinCore, Language, Manifest, Project, SourceRef,
    MANIFEST_FILENAME,
};
