//! BuildTool port - the external toolchain that turns a stub tree into an executable
//!
//! The toolchain is a black box: it gets a working directory, must run
//! synchronously, and its failures are surfaced verbatim.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Build tool failures.
#[derive(Error, Debug)]
pub enum BuildError {
    /// The toolchain binary could not be started.
    #[error("build tool '{tool}' could not be started: {source}")]
    ToolMissing {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// A build step exited unsuccessfully.
    #[error("{step} failed with {status}:\n{output}")]
    StepFailed {
        step: String,
        status: String,
        output: String,
    },

    /// The build reported success but the executable is missing.
    #[error("build finished but no executable was found at {path}")]
    ExecutableMissing { path: PathBuf },

    /// I/O failed around the build (manifest, vendoring config, copying the output).
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Options for `compile`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildFlags {
    /// Name of the binary target inside the stub.
    pub bin_name: String,
    /// Strip symbols from the produced executable.
    pub strip_symbols: bool,
    /// Forbid network access during the build.
    pub offline: bool,
}

impl BuildFlags {
    pub fn release(bin_name: impl Into<String>) -> Self {
        Self {
            bin_name: bin_name.into(),
            strip_symbols: true,
            offline: true,
        }
    }
}

/// External build toolchain.
pub trait BuildTool {
    /// Write the package manifest for the stub rooted at `work_dir`.
    fn init_module(&self, work_dir: &Path, package: &str) -> Result<(), BuildError>;

    /// Resolve and vendor all dependencies so `compile` needs no network.
    fn vendor_dependencies(&self, work_dir: &Path) -> Result<(), BuildError>;

    /// Build the stub and place the executable at `output`, returning its path.
    fn compile(
        &self,
        work_dir: &Path,
        output: &Path,
        flags: &BuildFlags,
    ) -> Result<PathBuf, BuildError>;
}
