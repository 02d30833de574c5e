//! Filesystem backend
//!
//! Artifacts stay where the build put them. Fetching only resolves a path;
//! it never copies anything.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::entities::{BackendConfig, BuiltArtifact};
use crate::domain::ports::{Backend, BackendError, StoredLocation};
use crate::domain::value_objects::Variant;

pub struct FilesystemBackend {
    /// Directory stubs are resolved against, taken from the bucket.
    root: Option<PathBuf>,
}

impl FilesystemBackend {
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            root: config
                .bare_bucket()
                .filter(|bucket| !bucket.is_empty())
                .map(PathBuf::from),
        }
    }

    fn resolve(&self, object: &str, fallback: &Path) -> PathBuf {
        self.root.as_deref().unwrap_or(fallback).join(object)
    }
}

impl Backend for FilesystemBackend {
    fn variant(&self) -> Variant {
        Variant::Fs
    }

    fn exists(&self, object: &str) -> Result<bool, BackendError> {
        Ok(self.resolve(object, Path::new("")).exists())
    }

    fn store(
        &self,
        artifact: &BuiltArtifact,
        _metadata: &BTreeMap<String, String>,
    ) -> Result<StoredLocation, BackendError> {
        if !artifact.path.is_file() {
            return Err(BackendError::ArtifactMissing {
                path: artifact.path.clone(),
            });
        }
        debug!("Filesystem backend keeps {} in place", artifact.path.display());
        Ok(StoredLocation {
            variant: Variant::Fs,
            uri: Variant::Fs.normalize_bucket(&artifact.path.to_string_lossy()),
        })
    }

    fn fetch(&self, object: &str, target_dir: &Path) -> Result<PathBuf, BackendError> {
        Ok(self.resolve(object, target_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn artifact(path: PathBuf) -> BuiltArtifact {
        BuiltArtifact {
            path,
            name: "demo".to_string(),
            version: "1.0".to_string(),
            object_key: "demo/demo_1_0".to_string(),
        }
    }

    #[test]
    fn store_is_a_no_op_for_existing_artifact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demo");
        fs::write(&path, "bin").unwrap();

        let location = FilesystemBackend::new(&BackendConfig::filesystem())
            .store(&artifact(path.clone()), &BTreeMap::new())
            .unwrap();

        assert_eq!(location.variant, Variant::Fs);
        assert_eq!(location.uri, format!("file://{}", path.display()));
        assert_eq!(fs::read(&path).unwrap(), b"bin");
    }

    #[test]
    fn store_requires_the_artifact() {
        let dir = tempdir().unwrap();
        let err = FilesystemBackend::new(&BackendConfig::filesystem())
            .store(&artifact(dir.path().join("missing")), &BTreeMap::new())
            .unwrap_err();
        assert!(matches!(err, BackendError::ArtifactMissing { .. }));
    }

    #[test]
    fn fetch_rewrites_target_path() {
        let backend = FilesystemBackend::new(&BackendConfig::filesystem());
        assert_eq!(
            backend.fetch("demo", Path::new("/tmp/stubs")).unwrap(),
            PathBuf::from("/tmp/stubs/demo")
        );
    }

    #[test]
    fn fetch_prefers_bucket_directory() {
        let config = BackendConfig {
            bucket: Some("file:///srv/stubs".to_string()),
            ..BackendConfig::filesystem()
        };
        let backend = FilesystemBackend::new(&config);
        assert_eq!(
            backend.fetch("demo", Path::new("/tmp")).unwrap(),
            PathBuf::from("/srv/stubs/demo")
        );
    }

    #[test]
    fn exists_checks_local_path() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("demo"), "bin").unwrap();
        let config = BackendConfig {
            bucket: Some(dir.path().to_string_lossy().into_owned()),
            ..BackendConfig::filesystem()
        };
        let backend = FilesystemBackend::new(&config);

        assert!(backend.exists("demo").unwrap());
        assert!(!backend.exists("other").unwrap());
    }
}
