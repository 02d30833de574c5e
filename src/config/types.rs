//! Configuration type definitions
//!
//! Every field is optional so a layer can say "not set" and leave the value
//! of a lower layer in place.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Resolvable fields of a pack request, as read from one configuration layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackSettings {
    /// Asset name; becomes the stub binary name.
    pub name: Option<String>,

    #[serde(alias = "asset_version", alias = "assetversion")]
    pub version: Option<String>,

    #[serde(alias = "assetpath")]
    pub asset_path: Option<PathBuf>,

    /// Directory receiving the stub and the temp workspace.
    #[serde(alias = "path")]
    pub output_path: Option<PathBuf>,

    pub environment: Option<String>,

    /// Regular expressions matched against relative asset paths.
    pub ignore: Vec<String>,

    #[serde(alias = "assetmetadata")]
    pub metadata: BTreeMap<String, String>,

    pub backend: BackendSettings,

    #[serde(alias = "clean_local_cache", alias = "cleancache")]
    pub clean_cache: Option<bool>,

    /// Config file the settings came from. Never read from the file itself.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Backend section of the configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// `fs`, `gcp`, `aws` or `azure`.
    pub cloud: Option<String>,
    pub bucket: Option<String>,
    pub folder: Option<String>,
    pub object_name: Option<String>,
    #[serde(alias = "credspath")]
    pub credentials_path: Option<PathBuf>,
    /// `default` or `file`.
    #[serde(alias = "credstype")]
    pub credentials_mode: Option<String>,
    pub region: Option<String>,
    #[serde(alias = "skipremotecheck")]
    pub skip_remote_check: Option<bool>,
}

impl PackSettings {
    /// Overlay `higher` on top of `self`.
    ///
    /// Set, non-empty values of `higher` win; empty strings, paths, lists and
    /// maps never replace what is already there. Booleans are overlaid
    /// whenever they are set, including `false`.
    pub fn merge(&mut self, higher: PackSettings) {
        overlay_str(&mut self.name, higher.name);
        overlay_str(&mut self.version, higher.version);
        overlay_path(&mut self.asset_path, higher.asset_path);
        overlay_path(&mut self.output_path, higher.output_path);
        overlay_str(&mut self.environment, higher.environment);
        if !higher.ignore.is_empty() {
            self.ignore = higher.ignore;
        }
        if !higher.metadata.is_empty() {
            self.metadata = higher.metadata;
        }
        self.backend.merge(higher.backend);
        if higher.clean_cache.is_some() {
            self.clean_cache = higher.clean_cache;
        }
        overlay_path(&mut self.config_path, higher.config_path);
    }
}

impl BackendSettings {
    pub fn merge(&mut self, higher: BackendSettings) {
        overlay_str(&mut self.cloud, higher.cloud);
        overlay_str(&mut self.bucket, higher.bucket);
        overlay_str(&mut self.folder, higher.folder);
        overlay_str(&mut self.object_name, higher.object_name);
        overlay_path(&mut self.credentials_path, higher.credentials_path);
        overlay_str(&mut self.credentials_mode, higher.credentials_mode);
        overlay_str(&mut self.region, higher.region);
        if higher.skip_remote_check.is_some() {
            self.skip_remote_check = higher.skip_remote_check;
        }
    }
}

fn overlay_str(slot: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        *slot = Some(value);
    }
}

fn overlay_path(slot: &mut Option<PathBuf>, value: Option<PathBuf>) {
    if let Some(value) = value.filter(|v| !v.as_os_str().is_empty()) {
        *slot = Some(value);
    }
}
