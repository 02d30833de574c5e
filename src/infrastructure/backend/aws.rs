//! Amazon S3 backend

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use object_store::aws::AmazonS3Builder;
use tracing::{debug, warn};

use super::cloud::ObjectStoreBackend;
use crate::domain::entities::{BackendConfig, BuiltArtifact};
use crate::domain::ports::{Backend, BackendError, StoredLocation};
use crate::domain::value_objects::{CredentialMode, Variant};

/// Profile read from a shared credentials file.
const PROFILE: &str = "default";

#[derive(Debug)]
pub struct AwsBackend {
    inner: ObjectStoreBackend,
}

/// Keys of one profile in an AWS shared credentials file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl AwsBackend {
    /// Resolve credentials and open a client for the configured bucket.
    ///
    /// `file` mode reads the `[default]` profile of a shared credentials
    /// file; `default` mode uses the standard AWS environment variables and
    /// instance metadata.
    pub fn connect(config: &BackendConfig) -> Result<Self, BackendError> {
        let bucket = super::require_bucket(config)?;

        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
        if let Some(region) = &config.region {
            builder = builder.with_region(region);
        }
        match (config.credentials_mode, &config.credentials_path) {
            (CredentialMode::File, Some(path)) => {
                let credentials = read_shared_credentials(path, PROFILE).map_err(|message| {
                    BackendError::Credentials {
                        variant: Variant::Aws,
                        message,
                    }
                })?;
                debug!("Using AWS profile [{}] from {}", PROFILE, path.display());
                builder = builder
                    .with_access_key_id(credentials.access_key_id)
                    .with_secret_access_key(credentials.secret_access_key);
                if let Some(token) = credentials.session_token {
                    builder = builder.with_token(token);
                }
            }
            (CredentialMode::File, None) => {
                warn!("Credential mode 'file' without a credentials path, using default credentials");
            }
            (CredentialMode::Default, _) => {}
        }

        let store = builder.build().map_err(|e| BackendError::Credentials {
            variant: Variant::Aws,
            message: e.to_string(),
        })?;

        Ok(Self {
            inner: ObjectStoreBackend::new(
                Variant::Aws,
                bucket,
                Arc::new(store),
                config.skip_remote_check,
            )?,
        })
    }
}

/// Read `profile` from an INI style shared credentials file.
pub fn read_shared_credentials(path: &Path, profile: &str) -> Result<SharedCredentials, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read credentials file {}: {}", path.display(), e))?;

    let mut in_profile = false;
    let mut credentials = SharedCredentials::default();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            in_profile = section.trim() == profile;
            continue;
        }
        if !in_profile {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim().to_string();
        match key.trim() {
            "aws_access_key_id" => credentials.access_key_id = value,
            "aws_secret_access_key" => credentials.secret_access_key = value,
            "aws_session_token" => credentials.session_token = Some(value),
            _ => {}
        }
    }

    if credentials.access_key_id.is_empty() || credentials.secret_access_key.is_empty() {
        return Err(format!(
            "profile [{}] in {} has no access key",
            profile,
            path.display()
        ));
    }
    Ok(credentials)
}

impl Backend for AwsBackend {
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
