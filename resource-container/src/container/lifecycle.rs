//! Container lifecycle: spec configuration, loading and creation.
//!
//! The spec generation a container conforms to (version number and archive
//! file extension) is carried by [`ContainerSpec`], an immutable value
//! injected into every lifecycle and archive operation. This allows
//! multiple spec generations to coexist; [`ContainerSpec::default`] is the
//! generation this library targets.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use semver::Version;

use super::core::Container;
use super::error::{ContainerError, ContainerResult};
use super::manifest::{Manifest, MANIFEST_FILENAME};

/// Spec version targeted by this library.
pub const SPEC_VERSION: &str = "0.2";

/// File extension of packed container archives.
pub const ARCHIVE_EXT: &str = "tsrc";

/// An immutable description of a container spec generation.
///
/// # Example
///
/// ```
/// use resource_container::ContainerSpec;
///
/// let spec = ContainerSpec::default();
/// assert_eq!(spec.version, "0.2");
/// assert_eq!(spec.conformsto(), "rc0.2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    /// Spec version, e.g. `0.2`.
    pub version: String,

    /// Archive file extension, e.g. `tsrc`.
    pub file_ext: String,
}

impl Default for ContainerSpec {
    fn default() -> Self {
        Self {
            version: SPEC_VERSION.to_string(),
            file_ext: ARCHIVE_EXT.to_string(),
        }
    }
}

impl ContainerSpec {
    /// Create a spec description for a custom generation.
    pub fn new(version: impl Into<String>, file_ext: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            file_ext: file_ext.into(),
        }
    }

    /// The `conformsto` value written into manifests of this generation.
    pub fn conformsto(&self) -> String {
        format!("rc{}", self.version)
    }

    /// The archive path for an expanded container directory.
    pub fn archive_path(&self, dir: &Path) -> PathBuf {
        PathBuf::from(format!("{}.{}", dir.display(), self.file_ext))
    }

    /// Load an expanded resource container from disk.
    ///
    /// In strict mode the manifest must be present, declare a `conformsto`
    /// version, and match this spec's version exactly: older containers
    /// fail with [`ContainerError::OutdatedVersion`], newer ones with
    /// [`ContainerError::UnsupportedVersion`]. Version comparison is
    /// numeric major-then-minor, not lexical.
    ///
    /// In non-strict mode a missing manifest yields a container with an
    /// empty manifest and no version gating is applied. A manifest that is
    /// present but unparseable is an error in both modes.
    pub fn load(&self, dir: impl AsRef<Path>, strict: bool) -> ContainerResult<Container> {
        let dir = dir.as_ref();
        match fs::metadata(dir) {
            Ok(meta) if meta.is_dir() => {}
            _ => return Err(ContainerError::NotFound(dir.to_path_buf())),
        }

        let manifest_path = dir.join(MANIFEST_FILENAME);
        let manifest = match fs::read_to_string(&manifest_path) {
            Ok(text) => {
                serde_yaml::from_str(&text).map_err(|e| ContainerError::Yaml {
                    path: manifest_path.clone(),
                    source: e,
                })?
            }
            Err(_) => {
                if strict {
                    return Err(ContainerError::NotAContainer {
                        path: dir.to_path_buf(),
                        missing: MANIFEST_FILENAME.to_string(),
                    });
                }
                Manifest::default()
            }
        };

        let container = Container::new(dir.to_path_buf(), manifest);
        if !strict {
            return Ok(container);
        }

        let not_a_container = || ContainerError::NotAContainer {
            path: dir.to_path_buf(),
            missing: "dublin_core.conformsto".to_string(),
        };
        let found = container.conforms_to().ok_or_else(not_a_container)?;
        let found_version = parse_rc_version(&found).ok_or_else(not_a_container)?;
        let supported = parse_rc_version(&self.version)
            .ok_or_else(|| ContainerError::InvalidSpecVersion(self.version.clone()))?;

        match found_version.cmp(&supported) {
            Ordering::Less => Err(ContainerError::OutdatedVersion {
                found,
                supported: self.version.clone(),
            }),
            Ordering::Greater => Err(ContainerError::UnsupportedVersion {
                found,
                supported: self.version.clone(),
            }),
            Ordering::Equal => Ok(container),
        }
    }

    /// Create a new resource container.
    ///
    /// The caller's manifest fields are merged over schema defaults:
    /// `conformsto` is always set from this spec, empty `issued`/`modified`
    /// dates are filled with today, and an empty language direction
    /// defaults to `ltr`. The manifest must carry a non-empty type,
    /// format, identifier, language identifier and rights; anything less
    /// fails with [`ContainerError::MissingField`].
    pub fn create(&self, dir: impl AsRef<Path>, manifest: Manifest) -> ContainerResult<Container> {
        let dir = dir.as_ref();
        if dir.exists() {
            return Err(ContainerError::AlreadyExists(dir.to_path_buf()));
        }

        let mut manifest = manifest;
        manifest.dublin_core.conformsto = self.conformsto();
        let today = Utc::now().format("%Y-%m-%d").to_string();
        if manifest.dublin_core.issued.is_empty() {
            manifest.dublin_core.issued = today.clone();
        }
        if manifest.dublin_core.modified.is_empty() {
            manifest.dublin_core.modified = today;
        }
        if manifest.dublin_core.language.direction.is_empty() {
            manifest.dublin_core.language.direction = "ltr".to_string();
        }

        validate_required(&manifest)?;

        fs::create_dir_all(dir).map_err(|e| ContainerError::CreateDirectoryFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let manifest_path = dir.join(MANIFEST_FILENAME);
        let text = serde_yaml::to_string(&manifest).map_err(|e| ContainerError::Yaml {
            path: manifest_path.clone(),
            source: e,
        })?;
        fs::write(&manifest_path, text).map_err(|e| ContainerError::WriteFailed {
            path: manifest_path.clone(),
            source: e,
        })?;

        self.load(dir, true)
    }
}

/// Load an expanded resource container using the default spec generation.
///
/// See [`ContainerSpec::load`].
pub fn load(dir: impl AsRef<Path>, strict: bool) -> ContainerResult<Container> {
    ContainerSpec::default().load(dir, strict)
}

/// Create a new resource container using the default spec generation.
///
/// See [`ContainerSpec::create`].
pub fn create(dir: impl AsRef<Path>, manifest: Manifest) -> ContainerResult<Container> {
    ContainerSpec::default().create(dir, manifest)
}

fn validate_required(manifest: &Manifest) -> ContainerResult<()> {
    let dc = &manifest.dublin_core;
    if dc.resource_type.is_empty() {
        return Err(ContainerError::MissingField("dublin_core.type"));
    }
    if dc.format.is_empty() {
        return Err(ContainerError::MissingField("dublin_core.format"));
    }
    if dc.identifier.is_empty() {
        return Err(ContainerError::MissingField("dublin_core.identifier"));
    }
    if dc.language.identifier.is_empty() {
        return Err(ContainerError::MissingField("dublin_core.language.identifier"));
    }
    if dc.rights.is_empty() {
        return Err(ContainerError::MissingField("dublin_core.rights"));
    }
    Ok(())
}

/// Parse a dotted-numeric container version.
///
/// Container versions carry one to three segments; missing segments are
/// padded with zeros so `0.2` and `0.2.0` compare equal.
fn parse_rc_version(value: &str) -> Option<Version> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut segments: Vec<&str> = trimmed.split('.').collect();
    if segments.len() > 3 {
        return None;
    }
    while segments.len() < 3 {
        segments.push("0");
    }
    Version::parse(&segments.join(".")).ok()
}
