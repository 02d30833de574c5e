//! Pack request entity
//!
//! The fully resolved description of one packing run. Built by the config
//! resolver and passed by reference through every pipeline stage.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::domain::value_objects::{name_for_temp, object_key, CredentialMode, Variant};

/// Suffix appended to the temp name to form the workspace directory.
pub const WORKSPACE_SUFFIX: &str = "_temp";

/// Backend descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BackendConfig {
    pub variant: Variant,
    /// Bucket (cloud) or directory (fs), normalized with the variant scheme.
    pub bucket: Option<String>,
    /// Folder under which objects are placed.
    pub folder: Option<String>,
    /// Explicit object name; defaults to the temp name.
    pub object_name: Option<String>,
    pub credentials_path: Option<PathBuf>,
    pub credentials_mode: CredentialMode,
    pub region: Option<String>,
    /// Upload even if an object with the same key exists.
    pub skip_remote_check: bool,
}

impl BackendConfig {
    /// Filesystem backend with no bucket.
    pub fn filesystem() -> Self {
        Self::default()
    }

    /// Bucket without the variant scheme.
    pub fn bare_bucket(&self) -> Option<&str> {
        self.bucket
            .as_deref()
            .map(|bucket| self.variant.bare_bucket(bucket))
    }
}

/// Resolved packing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackRequest {
    /// Asset name; also the stub binary name.
    pub name: String,
    pub version: String,
    /// Absolute path of the asset to pack.
    pub asset_path: PathBuf,
    /// Absolute directory receiving the built stub and the workspace.
    pub output_path: PathBuf,
    pub environment: String,
    pub ignore: Vec<String>,
    pub metadata: BTreeMap<String, String>,
    pub backend: BackendConfig,
    /// Config file the request was read from, if any.
    pub config_path: Option<PathBuf>,
    /// Remove the workspace (and remote staging copies) when the run ends.
    pub clean_cache: bool,
}

impl PackRequest {
    /// `<name>_<version with dots as underscores>`.
    pub fn temp_name(&self) -> String {
        name_for_temp(&self.name, &self.version)
    }

    /// Workspace directory for this (name, version).
    pub fn workspace_path(&self) -> PathBuf {
        self.output_path
            .join(format!("{}{}", self.temp_name(), WORKSPACE_SUFFIX))
    }

    /// Where the built stub lands locally.
    pub fn artifact_path(&self) -> PathBuf {
        self.output_path
            .join(format!("{}{}", self.name, std::env::consts::EXE_SUFFIX))
    }

    /// Remote object key: `<folder>/<name>/<object name or temp name>`.
    pub fn object_key(&self) -> String {
        let object = self
            .backend
            .object_name
            .clone()
            .unwrap_or_else(|| self.temp_name());
        object_key(self.backend.folder.as_deref(), &self.name, &object)
    }
}
