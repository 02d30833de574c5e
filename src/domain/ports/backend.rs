//! Backend port - where packed stubs are stored and fetched from
//!
//! One implementation per variant lives in `infrastructure::backend`;
//! a [`BackendFactory`] selects it from a [`BackendConfig`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::entities::{BackendConfig, BuiltArtifact};
use crate::domain::value_objects::{Variant, SUPPORTED_CLOUDS};

/// Errors raised by backend operations.
///
/// Each failure mode is its own variant so callers can word messages
/// without inspecting text.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The configured cloud is not one of the recognized variants.
    #[error("unsupported cloud '{cloud}', supported clouds are: {}", SUPPORTED_CLOUDS.join(", "))]
    UnsupportedCloud { cloud: String },

    /// The variant is recognized but has no implementation.
    #[error("unsupported cloud '{variant}': this backend is not supported at the moment")]
    NotImplemented { variant: Variant },

    /// Credentials could not be resolved or the client could not be built.
    #[error("could not resolve {variant} credentials: {message}")]
    Credentials { variant: Variant, message: String },

    /// The bucket could not be reached.
    #[error("could not connect to {variant} bucket {bucket}: {message}")]
    Connection {
        variant: Variant,
        bucket: String,
        message: String,
    },

    /// A cloud backend was configured without a bucket.
    #[error("backend {variant} requires a bucket")]
    MissingBucket { variant: Variant },

    /// The object already exists remotely and the duplicate check is enabled.
    #[error("asset with current version already exists at the backend as {object}")]
    DuplicateObject { object: String },

    /// A fetch would overwrite an existing local file.
    #[error("asset already fetched in the specified path: {path}")]
    DestinationPopulated { path: PathBuf },

    /// The artifact to store is not on disk.
    #[error("unable to find asset under specified path: {path}")]
    ArtifactMissing { path: PathBuf },

    /// The remote object to fetch does not exist.
    #[error("object {object} was not found in {bucket}")]
    ObjectNotFound { object: String, bucket: String },

    /// Upload or download failed after the connection was established.
    #[error("transfer of {object} failed: {message}")]
    Transfer { object: String, message: String },

    /// Local I/O failed while reading or writing the artifact.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where an artifact ended up after `store`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredLocation {
    pub variant: Variant,
    pub uri: String,
}

impl fmt::Display for StoredLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

/// Storage backend for built stubs.
///
/// Implementations:
/// - `FilesystemBackend` - artifacts stay where the build put them
/// - `GcpBackend` / `AwsBackend` - cloud object stores
/// - `UnsupportedBackend` - recognized variants without an implementation
pub trait Backend {
    /// Variant this backend serves.
    fn variant(&self) -> Variant;

    /// Check whether `object` already exists.
    fn exists(&self, object: &str) -> Result<bool, BackendError>;

    /// Persist a built artifact together with its metadata.
    fn store(
        &self,
        artifact: &BuiltArtifact,
        metadata: &BTreeMap<String, String>,
    ) -> Result<StoredLocation, BackendError>;

    /// Make `object` available as a local file under `target_dir` and return its path.
    fn fetch(&self, object: &str, target_dir: &Path) -> Result<PathBuf, BackendError>;
}

/// Selects and initializes a backend for a descriptor.
///
/// Initialization resolves credentials and opens clients, so a returned
/// backend is ready for `exists`/`store`/`fetch`.
pub trait BackendFactory {
    fn initialize(&self, config: &BackendConfig) -> Result<Box<dyn Backend>, BackendError>;
}
