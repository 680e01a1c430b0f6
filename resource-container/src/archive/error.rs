//! Error types for the archive codec.

use std::fmt;
use std::io;
use std::path::PathBuf;

use zip::result::ZipError;

use crate::container::ContainerError;

/// Result type for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Errors that can occur while packing or unpacking container archives.
#[derive(Debug)]
pub enum ArchiveError {
    /// The archive to open does not exist.
    MissingArchive(PathBuf),

    /// The expanded container directory to pack does not exist.
    MissingContainer(PathBuf),

    /// The path does not carry the configured archive extension.
    InvalidExtension { path: PathBuf, expected: String },

    /// An I/O operation on the named path failed.
    Io { path: PathBuf, source: io::Error },

    /// The zip codec rejected the archive.
    Zip { path: PathBuf, source: ZipError },

    /// The resulting container failed to load.
    Container(ContainerError),
}

impl fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveError::MissingArchive(path) => {
                write!(f, "missing resource container archive at {}", path.display())
            }
            ArchiveError::MissingContainer(path) => {
                write!(f, "missing resource container at {}", path.display())
            }
            ArchiveError::InvalidExtension { path, expected } => {
                write!(
                    f,
                    "invalid resource container file extension at {}: expected .{}",
                    path.display(),
                    expected
                )
            }
            ArchiveError::Io { path, source } => {
                write!(f, "archive I/O failed at {}: {}", path.display(), source)
            }
            ArchiveError::Zip { path, source } => {
                write!(f, "zip codec failed at {}: {}", path.display(), source)
            }
            ArchiveError::Container(err) => {
                write!(f, "archived container is invalid: {}", err)
            }
        }
    }
}

impl std::error::Error for ArchiveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArchiveError::Io { source, .. } => Some(source),
            ArchiveError::Zip { source, .. } => Some(source),
            ArchiveError::Container(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ContainerError> for ArchiveError {
    fn from(err: ContainerError) -> Self {
        ArchiveError::Container(err)
    }
}
