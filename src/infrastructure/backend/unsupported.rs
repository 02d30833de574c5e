//! Backends that are recognized but not implemented

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::entities::{BackendConfig, BuiltArtifact};
use crate::domain::ports::{Backend, BackendError, StoredLocation};
use crate::domain::value_objects::Variant;

/// Stands in for a variant without an implementation; every operation fails.
#[derive(Debug)]
pub struct UnsupportedBackend {
    variant: Variant,
}

impl UnsupportedBackend {
    /// Always fails: there is no client to open.
    pub fn connect(config: &BackendConfig) -> Result<Self, BackendError> {
        Err(Self::new(config.variant).not_implemented())
    }

    pub fn new(variant: Variant) -> Self {
        Self { variant }
    }

    fn not_implemented(&self) -> BackendError {
        BackendError::NotImplemented {
            variant: self.variant,
        }
    }
}

impl Backend for UnsupportedBackend {
    fn variant(&self) -> Variant {
        self.variant
    }

    fn exists(&self, _object: &str) -> Result<bool, BackendError> {
        Err(self.not_implemented())
    }

    fn store(
        &self,
        _artifact: &BuiltArtifact,
        _metadata: &BTreeMap<String, String>,
    ) -> Result<StoredLocation, BackendError> {
        Err(self.not_implemented())
    }

    fn fetch(&self, _object: &str, _target_dir: &Path) -> Result<PathBuf, BackendError> {
        Err(self.not_implemented())
    }
}
