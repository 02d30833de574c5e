//! Shared fixtures for stubpack integration tests.
//!
//! - `request`: a filesystem-backed pack request rooted in a temp directory
//! - `FakeBuildTool`: records build steps and writes a placeholder executable
//! - `RecordingFactory`: wraps the real factory, optionally failing `store`
//! - `MemoryFactory`: a gcp backend over an in-memory object store

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use object_store::memory::InMemory;

use stubpack::domain::entities::{BackendConfig, BuiltArtifact, PackRequest};
use stubpack::domain::ports::{
    Backend, BackendError, BackendFactory, BuildError, BuildFlags, BuildTool, StoredLocation,
};
use stubpack::domain::value_objects::Variant;
use stubpack::infrastructure::ObjectStoreBackend;
use stubpack::DefaultBackendFactory;

/// Pack request for `<root>/asset` written to `<root>/out`.
pub fn request(root: &Path) -> PackRequest {
    let asset = root.join("asset");
    fs::create_dir_all(asset.join("nested")).unwrap();
    fs::write(asset.join("hello.txt"), "hello\n").unwrap();
    fs::write(asset.join("nested/data.bin"), [0u8, 1, 2, 255]).unwrap();

    PackRequest {
        name: "demo".to_string(),
        version: "1.0".to_string(),
        asset_path: asset,
        output_path: root.join("out"),
        environment: "development".to_string(),
        ignore: Vec::new(),
        metadata: BTreeMap::new(),
        backend: BackendConfig::filesystem(),
        config_path: None,
        clean_cache: true,
    }
}

/// Build tool that never starts a process.
#[derive(Default)]
pub struct FakeBuildTool {
    /// Shared so a test can inspect it after handing the tool over.
    pub steps: Rc<RefCell<Vec<String>>>,
    /// Fail the step with this name.
    pub fail_on: Option<&'static str>,
}

impl FakeBuildTool {
    pub fn failing(step: &'static str) -> Self {
        Self {
            fail_on: Some(step),
            ..Self::default()
        }
    }

    pub fn step_log(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.steps)
    }

    fn step(&self, name: &str) -> Result<(), BuildError> {
        self.steps.borrow_mut().push(name.to_string());
        if self.fail_on == Some(name) {
            return Err(BuildError::StepFailed {
                step: name.to_string(),
                status: "exit status: 101".to_string(),
                output: "error: could not compile `stub-demo`".to_string(),
            });
        }
        Ok(())
    }
}

impl BuildTool for FakeBuildTool {
    fn init_module(&self, work_dir: &Path, package: &str) -> Result<(), BuildError> {
        self.step("init")?;
        fs::write(
            work_dir.join("Cargo.toml"),
            format!("[package]\nname = \"stub-{}\"\n", package),
        )
        .unwrap();
        Ok(())
    }

    fn vendor_dependencies(&self, _work_dir: &Path) -> Result<(), BuildError> {
        self.step("vendor")
    }

    fn compile(
        &self,
        work_dir: &Path,
        output: &Path,
        flags: &BuildFlags,
    ) -> Result<PathBuf, BuildError> {
        self.step("compile")?;
        assert!(work_dir.join("src/main.rs").is_file());
        assert!(flags.offline);
        fs::create_dir_all(output.parent().unwrap()).unwrap();
        fs::write(output, format!("binary:{}", flags.bin_name)).unwrap();
        Ok(output.to_path_buf())
    }
}

/// Backend factory delegating to the real one, with an injectable store failure.
#[derive(Default)]
pub struct RecordingFactory {
    pub fail_store: bool,
    pub initialized: RefCell<Vec<Variant>>,
}

impl BackendFactory for RecordingFactory {
    fn initialize(&self, config: &BackendConfig) -> Result<Box<dyn Backend>, BackendError> {
        self.initialized.borrow_mut().push(config.variant);
        let inner = DefaultBackendFactory.initialize(config)?;
        Ok(Box::new(RecordingBackend {
            inner,
            fail_store: self.fail_store,
        }))
    }
}

struct RecordingBackend {
    inner: Box<dyn Backend>,
    fail_store: bool,
}

impl Backend for RecordingBackend {
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
        if self.fail_store {
            return Err(BackendError::Transfer {
                object: artifact.object_key.clone(),
                message: "connection reset".to_string(),
            });
        }
        self.inner.store(artifact, metadata)
    }

    fn fetch(&self, object: &str, target_dir: &Path) -> Result<PathBuf, BackendError> {
        self.inner.fetch(object, target_dir)
    }
}

/// Backend factory serving every variant from one in-memory bucket.
pub struct MemoryFactory {
    pub memory: Arc<InMemory>,
    /// After a successful store, put a directory where the local artifact was
    /// so that removing it fails.
    pub pin_artifact: bool,
}

impl Default for MemoryFactory {
    fn default() -> Self {
        Self {
            memory: Arc::new(InMemory::new()),
            pin_artifact: false,
        }
    }
}

/// Whether `object` was uploaded to `memory`.
pub fn uploaded(memory: &Arc<InMemory>, object: &str) -> bool {
    ObjectStoreBackend::new(Variant::Gcp, "assets", memory.clone(), true)
        .unwrap()
        .exists(object)
        .unwrap()
}

impl BackendFactory for MemoryFactory {
    fn initialize(&self, config: &BackendConfig) -> Result<Box<dyn Backend>, BackendError> {
        let bucket = config.bare_bucket().unwrap_or("assets").to_string();
        Ok(Box::new(MemoryBackend {
            inner: ObjectStoreBackend::new(
                config.variant,
                bucket,
                self.memory.clone(),
                config.skip_remote_check,
            )?,
            pin_artifact: self.pin_artifact,
        }))
    }
}

struct MemoryBackend {
    inner: ObjectStoreBackend,
    pin_artifact: bool,
}

impl Backend for MemoryBackend {
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
        let location = self.inner.store(artifact, metadata)?;
        if self.pin_artifact {
            fs::remove_file(&artifact.path).unwrap();
            fs::create_dir(&artifact.path).unwrap();
            fs::write(artifact.path.join("pinned"), "x").unwrap();
        }
        Ok(location)
    }

    fn fetch(&self, object: &str, target_dir: &Path) -> Result<PathBuf, BackendError> {
        self.inner.fetch(object, target_dir)
    }
}
