//! Object store plumbing shared by the cloud backends
//!
//! The pipeline is synchronous, so each backend owns a current-thread tokio
//! runtime and blocks on every object store call.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::StreamExt;
use object_store::path::Path as ObjectPath;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};
use tempfile::NamedTempFile;
use tokio::runtime::Runtime;
use tracing::{debug, info};

use crate::domain::entities::BuiltArtifact;
use crate::domain::ports::{BackendError, StoredLocation};
use crate::domain::value_objects::Variant;

/// Blocking wrapper around an [`ObjectStore`] bucket.
pub struct ObjectStoreBackend {
    variant: Variant,
    bucket: String,
    store: Arc<dyn ObjectStore>,
    runtime: Runtime,
    skip_remote_check: bool,
}

impl std::fmt::Debug for ObjectStoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreBackend")
            .field("variant", &self.variant)
            .field("bucket", &self.bucket)
            .field("skip_remote_check", &self.skip_remote_check)
            .finish()
    }
}

impl ObjectStoreBackend {
    pub fn new(
        variant: Variant,
        bucket: impl Into<String>,
        store: Arc<dyn ObjectStore>,
        skip_remote_check: bool,
    ) -> Result<Self, BackendError> {
        let bucket = bucket.into();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| BackendError::Connection {
                variant,
                bucket: bucket.clone(),
                message: format!("failed to start I/O runtime: {}", e),
            })?;
        Ok(Self {
            variant,
            bucket,
            store,
            runtime,
            skip_remote_check,
        })
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    fn uri(&self, object: &str) -> String {
        format!("{}{}/{}", self.variant.scheme(), self.bucket, object)
    }

    fn connection_error(&self, error: object_store::Error) -> BackendError {
        BackendError::Connection {
            variant: self.variant,
            bucket: self.bucket.clone(),
            message: error.to_string(),
        }
    }

    pub fn exists(&self, object: &str) -> Result<bool, BackendError> {
        let location = ObjectPath::from(object);
        match self.runtime.block_on(self.store.head(&location)) {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(self.connection_error(e)),
        }
    }

    /// Upload the artifact with `metadata` attached to the object.
    pub fn store(
        &self,
        artifact: &BuiltArtifact,
        metadata: &BTreeMap<String, String>,
    ) -> Result<StoredLocation, BackendError> {
        if !artifact.path.is_file() {
            return Err(BackendError::ArtifactMissing {
                path: artifact.path.clone(),
            });
        }

        let uri = self.uri(&artifact.object_key);
        if !self.skip_remote_check && self.exists(&artifact.object_key)? {
            return Err(BackendError::DuplicateObject { object: uri });
        }

        let bytes = fs::read(&artifact.path).map_err(|source| BackendError::Io {
            path: artifact.path.clone(),
            source,
        })?;

        let mut attributes = Attributes::new();
        for (key, value) in metadata {
            attributes.insert(Attribute::Metadata(key.clone().into()), value.clone().into());
        }
        let mut options = PutOptions::default();
        options.attributes = attributes;

        let location = ObjectPath::from(artifact.object_key.as_str());
        debug!("Uploading {} ({} bytes) to {}", artifact.path.display(), bytes.len(), uri);
        self.runtime
            .block_on(
                self.store
                    .put_opts(&location, PutPayload::from(bytes), options),
            )
            .map_err(|e| BackendError::Transfer {
                object: uri.clone(),
                message: e.to_string(),
            })?;

        info!("Stored {} as {}", artifact.name, uri);
        Ok(StoredLocation {
            variant: self.variant,
            uri,
        })
    }

    /// Download `object` into `target_dir`, named after its last key segment.
    ///
    /// Never overwrites: an existing local file fails before any download,
    /// and the final rename refuses to clobber a file that appeared meanwhile.
    pub fn fetch(&self, object: &str, target_dir: &Path) -> Result<PathBuf, BackendError> {
        let file_name = object.rsplit('/').next().unwrap_or(object);
        let dest = target_dir.join(file_name);
        if dest.exists() {
            return Err(BackendError::DestinationPopulated { path: dest });
        }

        fs::create_dir_all(target_dir).map_err(|source| BackendError::Io {
            path: target_dir.to_path_buf(),
            source,
        })?;

        let location = ObjectPath::from(object);
        let result = match self.runtime.block_on(self.store.get(&location)) {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => {
                return Err(BackendError::ObjectNotFound {
                    object: object.to_string(),
                    bucket: self.bucket.clone(),
                })
            }
            Err(e) => return Err(self.connection_error(e)),
        };

        let mut staging = NamedTempFile::new_in(target_dir).map_err(|source| BackendError::Io {
            path: target_dir.to_path_buf(),
            source,
        })?;

        self.runtime.block_on(async {
            let mut stream = result.into_stream();
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(|e| BackendError::Transfer {
                    object: self.uri(object),
                    message: e.to_string(),
                })?;
                staging
                    .write_all(&chunk)
                    .map_err(|source| BackendError::Io {
                        path: staging.path().to_path_buf(),
                        source,
                    })?;
            }
            Ok::<(), BackendError>(())
        })?;

        staging.persist_noclobber(&dest).map_err(|e| {
            if e.error.kind() == std::io::ErrorKind::AlreadyExists {
                BackendError::DestinationPopulated { path: dest.clone() }
            } else {
                BackendError::Io {
                    path: dest.clone(),
                    source: e.error,
                }
            }
        })?;
        make_executable(&dest)?;

        info!("Fetched {} to {}", self.uri(object), dest.display());
        Ok(dest)
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<(), BackendError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(|source| {
        BackendError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<(), BackendError> {
    Ok(())
}
