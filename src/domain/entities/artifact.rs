//! Built artifact entity

use std::path::PathBuf;

use crate::domain::entities::PackRequest;

/// A compiled stub and where it is (or will be) stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltArtifact {
    /// Executable produced by the build tool.
    pub path: PathBuf,
    pub name: String,
    pub version: String,
    /// Key of the artifact in the backend.
    pub object_key: String,
}

impl BuiltArtifact {
    /// Artifact for `request`, located at `path`.
    pub fn for_request(request: &PackRequest, path: PathBuf) -> Self {
        Self {
            path,
            name: request.name.clone(),
            version: request.version.clone(),
            object_key: request.object_key(),
        }
    }
}
