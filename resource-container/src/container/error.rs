//! Error types for the container module.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type for container operations.
pub type ContainerResult<T> = Result<T, ContainerError>;

/// Errors that can occur while loading, creating or addressing a container.
#[derive(Debug)]
pub enum ContainerError {
    /// No container directory exists at the specified path.
    NotFound(PathBuf),

    /// The directory exists but is not a valid resource container.
    NotAContainer { path: PathBuf, missing: String },

    /// The container conforms to an older spec version than supported.
    OutdatedVersion { found: String, supported: String },

    /// The container conforms to a newer spec version than supported.
    UnsupportedVersion { found: String, supported: String },

    /// The configured spec version is not a dotted-numeric version.
    InvalidSpecVersion(String),

    /// Multiple projects exist and no project identifier was given.
    AmbiguousProject,

    /// A container already exists at the creation target.
    AlreadyExists(PathBuf),

    /// A required manifest field is missing or empty.
    MissingField(&'static str),

    /// A YAML document could not be parsed or serialized.
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// Failed to create directory.
    CreateDirectoryFailed { path: PathBuf, source: io::Error },

    /// Failed to read file.
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write file.
    WriteFailed { path: PathBuf, source: io::Error },

    /// Failed to remove a file or directory.
    RemoveFailed { path: PathBuf, source: io::Error },
}

impl fmt::Display for ContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerError::NotFound(path) => {
                write!(f, "resource container does not exist at {}", path.display())
            }
            ContainerError::NotAContainer { path, missing } => {
                write!(
                    f,
                    "not a resource container at {}: missing required key {}",
                    path.display(),
                    missing
                )
            }
            ContainerError::OutdatedVersion { found, supported } => {
                write!(
                    f,
                    "outdated resource container version: found {} but expected {}",
                    found, supported
                )
            }
            ContainerError::UnsupportedVersion { found, supported } => {
                write!(
                    f,
                    "unsupported resource container version: found {} but expected {}",
                    found, supported
                )
            }
            ContainerError::InvalidSpecVersion(version) => {
                write!(f, "invalid container spec version: {}", version)
            }
            ContainerError::AmbiguousProject => {
                write!(f, "multiple projects found, specify the project identifier")
            }
            ContainerError::AlreadyExists(path) => {
                write!(
                    f,
                    "resource container already exists at {}",
                    path.display()
                )
            }
            ContainerError::MissingField(field) => {
                write!(f, "manifest is missing required field {}", field)
            }
            ContainerError::Yaml { path, source } => {
                write!(f, "invalid YAML at {}: {}", path.display(), source)
            }
            ContainerError::CreateDirectoryFailed { path, source } => {
                write!(
                    f,
                    "failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            ContainerError::ReadFailed { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            ContainerError::WriteFailed { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
            ContainerError::RemoveFailed { path, source } => {
                write!(f, "failed to remove {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ContainerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContainerError::Yaml { source, .. } => Some(source),
            ContainerError::CreateDirectoryFailed { source, .. } => Some(source),
            ContainerError::ReadFailed { source, .. } => Some(source),
            ContainerError::WriteFailed { source, .. } => Some(source),
            ContainerError::RemoveFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_not_found_display() {
        let err = ContainerError::NotFound(PathBuf::from("/test/path"));
        assert!(err.to_string().contains("/test/path"));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_version_errors_display_both_versions() {
        let err = ContainerError::OutdatedVersion {
            found: "0.1".to_string(),
            supported: "0.2".to_string(),
        };
        assert!(err.to_string().contains("0.1"));
        assert!(err.to_string().contains("0.2"));

        let err = ContainerError::UnsupportedVersion {
            found: "999.1".to_string(),
            supported: "0.2".to_string(),
        };
        assert!(err.to_string().contains("999.1"));
    }

    #[test]
    fn test_ambiguous_project_display() {
        let err = ContainerError::AmbiguousProject;
        assert!(err.to_string().contains("project identifier"));
    }

    #[test]
    fn test_error_source_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = ContainerError::ReadFailed {
            path: PathBuf::from("/test"),
            source: io_err,
        };
        assert!(err.source().is_some());
    }

    #[test]
    fn test_error_source_none() {
        assert!(ContainerError::AmbiguousProject.source().is_none());
        assert!(ContainerError::MissingField("dublin_core.rights")
            .source()
            .is_none());
    }
}
