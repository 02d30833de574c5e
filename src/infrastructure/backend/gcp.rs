//! Google Cloud Storage backend

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use object_store::gcp::GoogleCloudStorageBuilder;
use tracing::{debug, warn};

use super::cloud::ObjectStoreBackend;
use crate::domain::entities::{BackendConfig, BuiltArtifact};
use crate::domain::ports::{Backend, BackendError, StoredLocation};
use crate::domain::value_objects::{CredentialMode, Variant};

#[derive(Debug)]
pub struct GcpBackend {
    inner: ObjectStoreBackend,
}

impl GcpBackend {
    /// Resolve credentials and open a client for the configured bucket.
    ///
    /// `file` mode reads a service account key from the credential path;
    /// `default` mode uses application default credentials.
    pub fn connect(config: &BackendConfig) -> Result<Self, BackendError> {
        let bucket = super::require_bucket(config)?;

        let mut builder = GoogleCloudStorageBuilder::from_env().with_bucket_name(bucket);
        match (config.credentials_mode, &config.credentials_path) {
            (CredentialMode::File, Some(path)) => {
                if !path.is_file() {
                    return Err(BackendError::Credentials {
                        variant: Variant::Gcp,
                        message: format!("credentials file {} not found", path.display()),
                    });
                }
                debug!("Using GCP service account {}", path.display());
                builder = builder.with_service_account_path(path.to_string_lossy());
            }
            (CredentialMode::File, None) => {
                warn!("Credential mode 'file' without a credentials path, using default credentials");
            }
            (CredentialMode::Default, _) => {}
        }

        let store = builder.build().map_err(|e| BackendError::Credentials {
            variant: Variant::Gcp,
            message: e.to_string(),
        })?;

        Ok(Self {
            inner: ObjectStoreBackend::new(
                Variant::Gcp,
                bucket,
                Arc::new(store),
                config.skip_remote_check,
            )?,
        })
    }
}

impl Backend for GcpBackend {
    fn variant(&self) -> Variant {
        self.inner.variant()
    }

    fn exists(&self, object: &str) -> Result<bool, BackendError> {
        self.inner.exists(object)
    }

    fn store(
        &self,
        artifact: &BuiltArtifact,
        metadata: &BTreeMap<String, String>,
    ) -> Result<StoredLocation, BackendError> {
        self.inner.store(artifact, metadata)
    }

    fn fetch(&self, object: &str, target_dir: &Path) -> Result<PathBuf, BackendError> {
        self.inner.fetch(object, target_dir)
    }
}
