//! Manifest schema for resource containers.
//!
//! The manifest (`manifest.yaml`) is the container's descriptive and
//! versioning document. It embeds a Dublin Core metadata block, checking
//! information and the ordered list of projects whose content subtrees the
//! container aggregates.
//!
//! All types deserialize with defaults so partial manifests parse: missing
//! keys become empty strings or empty lists. Validation of the fields a
//! complete manifest must carry lives in the lifecycle, not in the schema.

use serde::{Deserialize, Serialize};

/// File name of the container manifest.
pub const MANIFEST_FILENAME: &str = "manifest.yaml";

/// The container manifest document.
///
/// # Example
///
/// ```
/// use resource_container::Manifest;
///
/// let yaml = r#"
/// dublin_core:
///   type: book
///   conformsto: rc0.2
///   format: text/usfm
///   identifier: en-ulb
///   language:
///     identifier: en
///     title: English
///     direction: ltr
///   rights: CC BY-SA 4.0
/// projects:
///   - identifier: gen
///     title: Genesis
///     path: ./gen
/// "#;
///
/// let manifest: Manifest = serde_yaml::from_str(yaml).unwrap();
/// assert_eq!(manifest.dublin_core.identifier, "en-ulb");
/// assert_eq!(manifest.projects.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Dublin Core metadata block.
    pub dublin_core: DublinCore,

    /// Checking (quality) information.
    pub checking: Checking,

    /// Ordered list of projects contained in this container.
    pub projects: Vec<Project>,
}

/// Dublin Core metadata embedded in the manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DublinCore {
    /// Container type, e.g. `book`, `help`, `dict`, `man`.
    #[serde(rename = "type")]
    pub resource_type: String,

    /// Spec version this container conforms to, e.g. `rc0.2`.
    pub conformsto: String,

    /// Content mime type, e.g. `text/usfm`. Determines the chunk extension.
    pub format: String,

    /// Resource identifier, e.g. `ulb`.
    pub identifier: String,

    /// Human readable resource title.
    pub title: String,

    pub subject: String,
    pub description: String,

    /// The language of the contained text.
    pub language: Language,

    /// Source texts this resource was translated from.
    pub source: Vec<SourceRef>,

    /// License string, e.g. `CC BY-SA 4.0`.
    pub rights: String,

    pub creator: String,
    pub contributor: Vec<String>,
    pub relation: Vec<String>,
    pub publisher: String,

    /// Date of first publication (`YYYY-MM-DD`).
    pub issued: String,

    /// Date of last modification (`YYYY-MM-DD`).
    pub modified: String,

    /// Resource (not spec) version.
    pub version: String,
}

impl DublinCore {
    /// The spec version with the leading `rc` prefix stripped.
    ///
    /// Returns `None` when `conformsto` is missing or empty.
    pub fn conforms_to(&self) -> Option<String> {
        let stripped = self.conformsto.strip_prefix("rc").unwrap_or(&self.conformsto);
        if stripped.is_empty() {
            None
        } else {
            Some(stripped.to_string())
        }
    }

    /// The file extension used for content files (chunks).
    pub fn chunk_ext(&self) -> &'static str {
        ext_for_format(&self.format)
    }
}

/// Map a content mime type to the chunk file extension.
///
/// Unrecognized formats fall back to plain text.
pub fn ext_for_format(format: &str) -> &'static str {
    match format {
        "text/usx" => "usx",
        "text/usfm" => "usfm",
        "text/markdown" => "md",
        _ => "txt",
    }
}

/// Language block of the Dublin Core metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Language {
    /// Language code, e.g. `en`.
    pub identifier: String,

    /// Human readable language name.
    pub title: String,

    /// Script direction, `ltr` or `rtl`.
    pub direction: String,
}

/// A reference to a source text in the Dublin Core metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceRef {
    pub language: String,
    pub identifier: String,
    pub version: String,
}

/// Checking information block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Checking {
    pub checking_entity: Vec<String>,
    pub checking_level: String,
}

/// A project declared in the manifest.
///
/// Each project owns a content subtree at `path`, relative to the
/// container root, holding chapter directories and sidecar documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    /// Project identifier, unique within the manifest, e.g. `gen`.
    pub identifier: String,

    /// Human readable project title.
    pub title: String,

    /// Versification scheme, e.g. `kjv`.
    pub versification: String,

    /// Sort weight among sibling projects.
    pub sort: i64,

    /// Content directory, relative to the container root, e.g. `./gen`.
    pub path: String,

    pub categories: Vec<String>,
}
