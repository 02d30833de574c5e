//! Unpack request entity

use std::path::PathBuf;

use crate::domain::entities::BackendConfig;

/// Where the stub to run comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubSource {
    /// A stub already on local disk.
    Local(PathBuf),
    /// A stub stored in a backend, fetched into `staging_dir` before running.
    Backend {
        config: BackendConfig,
        object: String,
        staging_dir: PathBuf,
    },
}

/// Request to materialize a packed asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackRequest {
    /// Directory the asset is materialized into.
    pub target: PathBuf,
    pub source: StubSource,
    /// Materialize under `<target>/<name>` instead of `<target>`.
    pub name: Option<String>,
    /// Delete the stub once the asset was materialized.
    pub clean_stub: bool,
}

impl UnpackRequest {
    /// Unpack a local stub into `target`.
    pub fn local(stub: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            source: StubSource::Local(stub.into()),
            name: None,
            clean_stub: false,
        }
    }
}
