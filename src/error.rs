//! Error types for stubpack
//!
//! Component errors are collected into [`StubpackError`]; callers branch on
//! [`StubpackError::kind`] rather than on messages.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::application::unpack::UnpackError;
use crate::config::ConfigError;
use crate::domain::entities::WorkspaceError;
use crate::domain::ports::{BackendError, BuildError};
use crate::domain::value_objects::IgnoreError;
use crate::embedder::EmbedError;
use crate::generator::GenerateError;

/// Result type alias for stubpack operations
pub type StubpackResult<T> = Result<T, StubpackError>;

/// Failure category of a [`StubpackError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Settings could not be resolved.
    Configuration,
    /// The environment is not in a state the run can start from.
    Precondition,
    /// Storage backend failure.
    Backend,
    /// Stub rendering or payload embedding failed.
    Generation,
    /// The toolchain failed.
    Build,
    /// Running a stub failed.
    Unpack,
    /// Post-run cleanup failed or was skipped.
    Cleanup,
    /// Unclassified local I/O.
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Precondition => "precondition",
            ErrorKind::Backend => "backend",
            ErrorKind::Generation => "generation",
            ErrorKind::Build => "build",
            ErrorKind::Unpack => "unpack",
            ErrorKind::Cleanup => "cleanup",
            ErrorKind::Io => "io",
        })
    }
}

/// Main error type for stubpack operations
#[derive(Error, Debug)]
pub enum StubpackError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ignore(#[from] IgnoreError),

    /// The asset to pack is not on disk.
    #[error("unable to find asset under specified path: {path}")]
    AssetNotFound { path: PathBuf },

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Embed(#[from] EmbedError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Unpack(#[from] UnpackError),

    /// Cleanup could not remove everything, or was disabled.
    #[error("cleanup incomplete: {message}")]
    Cleanup { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StubpackError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StubpackError::Config(_) | StubpackError::Ignore(_) => ErrorKind::Configuration,
            StubpackError::AssetNotFound { .. } => ErrorKind::Precondition,
            StubpackError::Workspace(WorkspaceError::AlreadyExists { .. }) => {
                ErrorKind::Precondition
            }
            StubpackError::Workspace(WorkspaceError::Create { .. }) => ErrorKind::Io,
            StubpackError::Workspace(WorkspaceError::Remove { .. }) => ErrorKind::Cleanup,
            StubpackError::Generate(_) | StubpackError::Embed(_) => ErrorKind::Generation,
            StubpackError::Build(_) => ErrorKind::Build,
            StubpackError::Backend(_) => ErrorKind::Backend,
            StubpackError::Unpack(UnpackError::Backend(_)) => ErrorKind::Backend,
            StubpackError::Unpack(UnpackError::RemoveStub { .. }) => ErrorKind::Cleanup,
            StubpackError::Unpack(_) => ErrorKind::Unpack,
            StubpackError::Cleanup { .. } => ErrorKind::Cleanup,
            StubpackError::Io(_) => ErrorKind::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_of_workspace_collision() {
        let err = StubpackError::from(WorkspaceError::AlreadyExists {
            path: PathBuf::from("/out/demo_1_0_temp"),
        });
        assert_eq!(err.kind(), ErrorKind::Precondition);
    }

    #[test]
    fn test_kind_of_backend_errors() {
        let err = StubpackError::from(BackendError::DuplicateObject {
            object: "gs://assets/demo/demo_1_0".to_string(),
        });
        assert_eq!(err.kind(), ErrorKind::Backend);
        assert_eq!(
            err.to_string(),
            "asset with current version already exists at the backend as gs://assets/demo/demo_1_0"
        );
    }

    #[test]
    fn test_kind_of_config_errors() {
        let err = StubpackError::from(ConfigError::FileNotFound {
            path: PathBuf::from("pack.yaml"),
        });
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ErrorKind::Generation.to_string(), "generation");
    }
}
