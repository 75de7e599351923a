use std::path::PathBuf;
use thiserror::Error;

use super::ResolutionError;

/// Failure to read or interpret an artifact source. Fatal for a selection session.
#[derive(Error, Debug)]
pub enum ReferenceScanError {
    #[error("artifact directory not found: {path}")]
    SourceNotFound { path: PathBuf },

    #[error("failed to scan artifact directory at {path}: {source}")]
    DirectoryScanError {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("failed to read manifest '{path}': {message}")]
    ManifestReadError { path: PathBuf, message: String },

    #[error("failed to parse manifest '{path}': {message}")]
    ManifestParseError { path: PathBuf, message: String },

    #[error("unsupported manifest format: {format} (expected json or yaml)")]
    UnsupportedFormat { format: String },

    #[error("{kind} artifact '{artifact}' cannot be attributed to a module: {source}")]
    UnresolvableArtifact {
        kind: String,
        artifact: String,
        source: ResolutionError,
    },

    #[error("page '{page}' depends on unknown constraint '{constraint}'")]
    UnknownConstraint { page: String, constraint: String },
}

impl ReferenceScanError {
    pub fn source_not_found(path: impl Into<PathBuf>) -> Self {
        Self::SourceNotFound { path: path.into() }
    }

    pub fn manifest_read_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ManifestReadError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn manifest_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ManifestParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub fn unresolvable_artifact(
        kind: impl Into<String>,
        artifact: impl Into<String>,
        source: ResolutionError,
    ) -> Self {
        Self::UnresolvableArtifact {
            kind: kind.into(),
            artifact: artifact.into(),
            source,
        }
    }

    pub fn unknown_constraint(page: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::UnknownConstraint {
            page: page.into(),
            constraint: constraint.into(),
        }
    }
}
