//! Unpack Use Case
//!
//! Resolves a stub (local path or backend fetch), runs its `generate`
//! command against the target and optionally removes the stub afterwards.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::entities::{StubSource, UnpackRequest};
use crate::domain::ports::{BackendError, BackendFactory};

#[derive(Error, Debug)]
pub enum UnpackError {
    #[error("unable to find stub under specified path: {path}")]
    StubNotFound { path: PathBuf },

    #[error("stub path {path} is a directory, expected an executable")]
    StubIsDirectory { path: PathBuf },

    #[error("failed to run stub {path}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stub exited unsuccessfully.
    #[error("stub {path} failed with {status}: {output}")]
    StubFailed {
        path: PathBuf,
        status: String,
        output: String,
    },

    /// The stub exited successfully but reported something; a silent run
    /// prints nothing.
    #[error("stub {path} reported: {output}")]
    StubOutput { path: PathBuf, output: String },

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("failed to remove stub {path}: {source}")]
    RemoveStub {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of a successful unpack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackReport {
    /// Stub that was run.
    pub stub: PathBuf,
    /// Directory the asset was written to.
    pub target: PathBuf,
    pub stub_removed: bool,
}

/// Unpack use case, parameterized by the backend factory used for fetches.
pub struct UnpackUseCase<F: BackendFactory> {
    backends: F,
}

impl<F: BackendFactory> UnpackUseCase<F> {
    pub fn new(backends: F) -> Self {
        Self { backends }
    }

    /// Execute the unpack use case
    pub fn execute(&self, request: &UnpackRequest) -> Result<UnpackReport, UnpackError> {
        let stub = self.resolve_stub(&request.source)?;
        validate_stub(&stub)?;

        let mut command = Command::new(runnable(&stub));
        command
            .arg("generate")
            .arg("--path")
            .arg(&request.target)
            .arg("--silent");
        if let Some(name) = &request.name {
            command.arg("--name").arg(name);
        }

        let output = run_stub(&stub, &mut command)?;
        let combined = combined_output(&output);
        if !output.status.success() {
            return Err(UnpackError::StubFailed {
                path: stub,
                status: output.status.to_string(),
                output: combined,
            });
        }
        if !combined.is_empty() {
            return Err(UnpackError::StubOutput {
                path: stub,
                output: combined,
            });
        }

        let target = match &request.name {
            Some(name) => request.target.join(name),
            None => request.target.clone(),
        };
        info!("Unpacked {} into {}", stub.display(), target.display());

        let stub_removed = if request.clean_stub {
            fs::remove_file(&stub).map_err(|source| UnpackError::RemoveStub {
                path: stub.clone(),
                source,
            })?;
            debug!("Removed stub {}", stub.display());
            true
        } else {
            false
        };

        Ok(UnpackReport {
            stub,
            target,
            stub_removed,
        })
    }

    /// Ask a stub for the bare version of its asset.
    pub fn stub_version(&self, stub: &Path) -> Result<String, UnpackError> {
        validate_stub(stub)?;
        let output = run_stub(stub, Command::new(runnable(stub)).arg("version").arg("-s"))?;
        if !output.status.success() {
            return Err(UnpackError::StubFailed {
                path: stub.to_path_buf(),
                status: output.status.to_string(),
                output: combined_output(&output),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn resolve_stub(&self, source: &StubSource) -> Result<PathBuf, UnpackError> {
        match source {
            StubSource::Local(path) => Ok(path.clone()),
            StubSource::Backend {
                config,
                object,
                staging_dir,
            } => {
                let backend = self.backends.initialize(config)?;
                let path = backend.fetch(object, staging_dir)?;
                debug!("Fetched stub {} from {}", path.display(), backend.variant());
                Ok(path)
            }
        }
    }
}

/// The resolved stub must be an existing regular file.
fn validate_stub(stub: &Path) -> Result<(), UnpackError> {
    match fs::metadata(stub) {
        Err(_) => Err(UnpackError::StubNotFound {
            path: stub.to_path_buf(),
        }),
        Ok(meta) if meta.is_dir() => Err(UnpackError::StubIsDirectory {
            path: stub.to_path_buf(),
        }),
        Ok(meta) if !meta.is_file() => Err(UnpackError::StubNotFound {
            path: stub.to_path_buf(),
        }),
        Ok(_) => Ok(()),
    }
}

/// A bare file name would be looked up on `PATH`; anchor it to the
/// working directory instead.
fn runnable(stub: &Path) -> PathBuf {
    if stub.is_relative() && stub.parent().is_some_and(|p| p.as_os_str().is_empty()) {
        Path::new(".").join(stub)
    } else {
        stub.to_path_buf()
    }
}

fn run_stub(stub: &Path, command: &mut Command) -> Result<Output, UnpackError> {
    debug!("Running {:?}", command);
    command.output().map_err(|source| UnpackError::Spawn {
        path: stub.to_path_buf(),
        source,
    })
}

fn combined_output(output: &Output) -> String {
    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    combined.trim().to_string()
}
