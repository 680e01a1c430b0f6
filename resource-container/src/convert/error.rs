//! Error types for the legacy converter.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::container::ContainerError;
use crate::naming::SlugError;

/// Result type for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors that can occur while converting a legacy resource.
#[derive(Debug)]
pub enum ConvertError {
    /// A required conversion property was missing.
    MissingParameters(&'static str),

    /// A packed archive already exists at the conversion target.
    AlreadyExists(PathBuf),

    /// The resource type/slug combination has no converter.
    UnsupportedType(String),

    /// The legacy payload violated a structural assumption.
    MalformedSource(String),

    /// The legacy payload was not valid JSON.
    Json(serde_json::Error),

    /// A sidecar document could not be serialized.
    Yaml(serde_yaml::Error),

    /// An I/O operation on the named path failed.
    Io { path: PathBuf, source: io::Error },

    /// Writing or re-loading the produced container failed.
    Container(ContainerError),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::MissingParameters(name) => {
                write!(f, "missing required parameter: {}", name)
            }
            ConvertError::AlreadyExists(path) => {
                write!(
                    f,
                    "resource container already exists at {}",
                    path.display()
                )
            }
            ConvertError::UnsupportedType(kind) => {
                write!(f, "unsupported resource container type: {}", kind)
            }
            ConvertError::MalformedSource(msg) => {
                write!(f, "malformed legacy resource: {}", msg)
            }
            ConvertError::Json(err) => {
                write!(f, "invalid legacy resource data: {}", err)
            }
            ConvertError::Yaml(err) => {
                write!(f, "failed to serialize sidecar: {}", err)
            }
            ConvertError::Io { path, source } => {
                write!(f, "conversion I/O failed at {}: {}", path.display(), source)
            }
            ConvertError::Container(err) => {
                write!(f, "converted container is invalid: {}", err)
            }
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::Json(err) => Some(err),
            ConvertError::Yaml(err) => Some(err),
            ConvertError::Io { source, .. } => Some(source),
            ConvertError::Container(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ContainerError> for ConvertError {
    fn from(err: ContainerError) -> Self {
        ConvertError::Container(err)
    }
}

impl From<serde_json::Error> for ConvertError {
    fn from(err: serde_json::Error) -> Self {
        ConvertError::Json(err)
    }
}

impl From<serde_yaml::Error> for ConvertError {
    fn from(err: serde_yaml::Error) -> Self {
        ConvertError::Yaml(err)
    }
}

impl From<SlugError> for ConvertError {
    fn from(err: SlugError) -> Self {
        ConvertError::MalformedSource(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameters_display() {
        let err = ConvertError::MissingParameters("resource.type");
        assert!(err.to_string().contains("resource.type"));
    }

    #[test]
    fn test_unsupported_type_display() {
        let err = ConvertError::UnsupportedType("help/obs".to_string());
        assert!(err.to_string().contains("help/obs"));
    }

    #[test]
    fn test_slug_error_maps_to_malformed_source() {
        let err: ConvertError = SlugError::Empty.into();
        assert!(matches!(err, ConvertError::MalformedSource(_)));
    }
}
